use anyhow::{Result, Context};
use std::fs;
use std::path::{Path, PathBuf};

// @module: File and directory utilities

/// UTF-8 byte-order marker expected by studio spreadsheet tools.
const UTF8_BOM: &str = "\u{feff}";

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)?;
        }
        Ok(())
    }

    // @generates: Output path for an exported table
    // @params: input_file, checked speakers (embedded in the name), extension
    pub fn generate_output_path<P: AsRef<Path>>(
        input_file: P,
        speakers: &[String],
        extension: &str,
    ) -> PathBuf {
        let input_file = input_file.as_ref();
        let stem = input_file.file_stem().unwrap_or_default();

        let mut output_filename = stem.to_string_lossy().to_string();
        if !speakers.is_empty() {
            output_filename.push_str(&format!(" ({})", speakers.join(",")));
        }
        output_filename.push('.');
        output_filename.push_str(extension);

        input_file
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join(output_filename)
    }

    /// Read a file to a string, stripping a UTF-8 byte-order marker if present
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))?;

        Ok(content
            .strip_prefix(UTF8_BOM)
            .map(|stripped| stripped.to_string())
            .unwrap_or(content))
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Write a string to a file as UTF-8 with a leading byte-order marker
    pub fn write_with_bom<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        let mut prefixed = String::with_capacity(UTF8_BOM.len() + content.len());
        prefixed.push_str(UTF8_BOM);
        prefixed.push_str(content);

        Self::write_to_file(path, &prefixed)
    }

    /// Detect whether a file is a previously exported delimited table or a
    /// subtitle script, by extension
    pub fn detect_file_type<P: AsRef<Path>>(path: P) -> FileType {
        match path
            .as_ref()
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .as_deref()
        {
            Some("csv") => FileType::DelimitedTable,
            Some("ass") | Some("ssa") | Some("srt") => FileType::Script,
            _ => FileType::Unknown,
        }
    }
}

/// Enum representing different input file types
#[derive(Debug, PartialEq, Eq)]
pub enum FileType {
    /// Previously exported delimited table (round-trip editing)
    DelimitedTable,
    /// Subtitle script (SSA/ASS/SRT)
    Script,
    /// Unknown file type
    Unknown,
}
