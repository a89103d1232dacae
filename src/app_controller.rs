use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use log::{info, warn};

use crate::app_config::Config;
use crate::delimited_reader::DelimitedReader;
use crate::errors::TableError;
use crate::file_utils::{FileManager, FileType};
use crate::phrase;
use crate::script;
use crate::table_exporter::{
    self, ExportFormat, ExportOptions, SpeakerFilter, CSV_COLUMN_COUNT, CSV_SEPARATOR,
};

// @module: Conversion orchestration

/// One conversion request: input script or re-imported table, target format,
/// optional explicit output path, speaker filter.
#[derive(Debug, Clone)]
pub struct ConvertRequest {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub format: ExportFormat,
    pub speakers: Vec<String>,
    pub force_overwrite: bool,
}

/// Drives a single conversion from input file to written deliverable.
///
/// Every conversion is a one-shot synchronous transformation; nothing is
/// written until the full output string has been built.
pub struct Controller {
    config: Config,
}

impl Controller {
    /// Create a controller with a validated configuration.
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Controller { config })
    }

    /// Run one conversion end to end.
    pub fn run(&self, request: &ConvertRequest) -> Result<()> {
        if !FileManager::file_exists(&request.input) {
            return Err(anyhow!("Input file does not exist: {:?}", request.input));
        }

        let output_path = match &request.output {
            Some(path) => path.clone(),
            None => FileManager::generate_output_path(
                &request.input,
                &request.speakers,
                request.format.extension(),
            ),
        };

        if FileManager::file_exists(&output_path) && !request.force_overwrite {
            warn!(
                "Output file already exists: {:?}. Use -f to force overwrite.",
                output_path
            );
            return Ok(());
        }

        let filter = SpeakerFilter::new(&request.speakers);
        let content = FileManager::read_to_string(&request.input)?;

        let output_text = match FileManager::detect_file_type(&request.input) {
            FileType::DelimitedTable => {
                if request.format != ExportFormat::Csv {
                    return Err(anyhow!(
                        "A re-imported table can only be saved back as CSV"
                    ));
                }
                self.resave_table(&content, &filter)?
            }
            FileType::Script | FileType::Unknown => {
                self.convert_script(&content, request.format, &filter, &title_for(&request.input))?
            }
        };

        if request.format.wants_bom() {
            FileManager::write_with_bom(&output_path, &output_text)?;
        } else {
            FileManager::write_to_file(&output_path, &output_text)?;
        }

        info!("Saved {:?}", output_path);

        Ok(())
    }

    /// Convert subtitle script content into the requested deliverable text.
    pub fn convert_script(
        &self,
        content: &str,
        format: ExportFormat,
        filter: &SpeakerFilter,
        title: &str,
    ) -> Result<String> {
        let script_format = script::detect_format(content);
        let events = script::parse(content, script_format)?;

        info!("Parsed {} events ({:?})", events.len(), script_format);

        let phrases = phrase::consolidate(&events, self.config.join_interval_ms);

        let options = ExportOptions {
            format,
            fps: self.config.fps,
            start_offset_ms: self.config.start_offset_ms,
            speakers: filter.clone(),
            title: title.to_string(),
        };

        Ok(table_exporter::export(&phrases, &options))
    }

    /// Re-serialize a previously exported CSV table (round-trip save).
    ///
    /// The reader itself is permissive; the fixed column count is enforced
    /// here, before anything is written back.
    fn resave_table(&self, content: &str, filter: &SpeakerFilter) -> Result<String> {
        let reader = DelimitedReader::new(CSV_SEPARATOR);
        let rows = reader.read_str(content);

        for (index, row) in rows.iter().enumerate() {
            if row.len() != CSV_COLUMN_COUNT {
                return Err(TableError::ColumnCount {
                    expected: CSV_COLUMN_COUNT,
                    row: index + 1,
                    found: row.len(),
                }
                .into());
            }
        }

        info!("Re-imported {} table rows", rows.len());

        Ok(table_exporter::serialize_rows(&rows, filter))
    }
}

fn title_for(input: &Path) -> String {
    input
        .file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .unwrap_or_else(|| String::from("Dialogue list"))
}
