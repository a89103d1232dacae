/*!
 * End-to-end conversion tests: script file in, deliverable file out
 */

use std::fs;
use anyhow::Result;
use dubtab::app_config::Config;
use dubtab::app_controller::{Controller, ConvertRequest};
use dubtab::table_exporter::ExportFormat;
use crate::common;

fn test_config() -> Config {
    let mut config = Config::default();
    config.join_interval_ms = 500;
    config
}

fn request(input: std::path::PathBuf, format: ExportFormat) -> ConvertRequest {
    ConvertRequest {
        input,
        output: None,
        format,
        speakers: Vec::new(),
        force_overwrite: false,
    }
}

/// Test the full ASS-to-CSV conversion, including merge and BOM
#[test]
fn test_run_withAssInput_shouldWriteCsvDeliverable() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_ass_script(&temp_dir.path().to_path_buf(), "episode.ass")?;

    let controller = Controller::with_config(test_config())?;
    controller.run(&request(input, ExportFormat::Csv))?;

    let output = temp_dir.path().join("episode.csv");
    let raw = fs::read(&output)?;
    assert_eq!(&raw[..3], &[0xEF, 0xBB, 0xBF], "CSV must carry a UTF-8 BOM");

    let content = String::from_utf8(raw[3..].to_vec())?;
    assert_eq!(
        content,
        "00:00:00:00;00:00:02:00;A;Hello. World.\n00:00:05:00;00:00:06:00;B;Bye.\n"
    );

    Ok(())
}

/// Test TSV output with the legacy two-column layout
#[test]
fn test_run_withAssInput_shouldWriteTsvDeliverable() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_ass_script(&temp_dir.path().to_path_buf(), "episode.ass")?;

    let controller = Controller::with_config(test_config())?;
    controller.run(&request(input, ExportFormat::Tsv))?;

    let content = dubtab::file_utils::FileManager::read_to_string(temp_dir.path().join("episode.tsv"))?;
    assert_eq!(content, "A\t00:00:00:00\nB\t00:00:05:00\n");

    Ok(())
}

/// Test HTML output: no BOM, self-contained document, title from the stem
#[test]
fn test_run_withAssInput_shouldWriteHtmlDeliverable() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_ass_script(&temp_dir.path().to_path_buf(), "episode.ass")?;

    let controller = Controller::with_config(test_config())?;
    controller.run(&request(input, ExportFormat::Html))?;

    let raw = fs::read(temp_dir.path().join("episode.html"))?;
    assert_ne!(&raw[..3], &[0xEF, 0xBB, 0xBF], "HTML must not carry a BOM");

    let content = String::from_utf8(raw)?;
    assert!(content.starts_with("<!DOCTYPE html>"));
    assert!(content.contains("<tr><th colspan=\"3\">episode</th></tr>"));
    assert!(content.contains("Hello. World."));

    Ok(())
}

/// Test SRT input flows through the same pipeline
#[test]
fn test_run_withSrtInput_shouldWriteCsvDeliverable() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(
        &temp_dir.path().to_path_buf(),
        "episode.srt",
        common::sample_srt_script(),
    )?;

    let controller = Controller::with_config(test_config())?;
    controller.run(&request(input, ExportFormat::Csv))?;

    let content =
        dubtab::file_utils::FileManager::read_to_string(temp_dir.path().join("episode.csv"))?;
    let lines: Vec<&str> = content.lines().collect();

    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("00:00:01:00;00:00:04:00;[unassigned];"));
    // Repeated placeholder speaker is suppressed on later rows
    assert!(lines[1].starts_with("00:00:05:00;00:00:09:00;;"));

    Ok(())
}

/// Test the speaker filter: filename suffix and row filtering
#[test]
fn test_run_withSpeakerFilter_shouldFilterAndSuffixFilename() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_ass_script(&temp_dir.path().to_path_buf(), "episode.ass")?;

    let controller = Controller::with_config(test_config())?;
    controller.run(&ConvertRequest {
        input,
        output: None,
        format: ExportFormat::Csv,
        speakers: vec!["b".to_string()],
        force_overwrite: false,
    })?;

    let output = temp_dir.path().join("episode (b).csv");
    let content = dubtab::file_utils::FileManager::read_to_string(&output)?;

    assert_eq!(content, "00:00:05:00;00:00:06:00;B;Bye.\n");

    Ok(())
}

/// Test the round trip: exported CSV read back and re-saved unchanged
#[test]
fn test_run_withExportedCsv_shouldRoundTrip() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_ass_script(&temp_dir.path().to_path_buf(), "episode.ass")?;

    let controller = Controller::with_config(test_config())?;
    controller.run(&request(input, ExportFormat::Csv))?;

    let exported = temp_dir.path().join("episode.csv");
    let first = dubtab::file_utils::FileManager::read_to_string(&exported)?;

    let resaved = temp_dir.path().join("resaved.csv");
    controller.run(&ConvertRequest {
        input: exported,
        output: Some(resaved.clone()),
        format: ExportFormat::Csv,
        speakers: Vec::new(),
        force_overwrite: true,
    })?;

    let second = dubtab::file_utils::FileManager::read_to_string(&resaved)?;
    assert_eq!(first, second);

    Ok(())
}

/// Test the round trip of a tag-only cue: its text column is empty after
/// normalization, and the trailing empty cell must survive re-import
#[test]
fn test_run_withEmptyTextColumn_shouldRoundTrip() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let script = "[Events]\n\
        Format: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text\n\
        Dialogue: 0,0:00:00.00,0:00:01.00,Default,A,0,0,0,,{\\i1}\n\
        Dialogue: 0,0:00:02.00,0:00:03.00,Default,B,0,0,0,,Spoken.\n";
    let input = common::create_test_file(&temp_dir.path().to_path_buf(), "tags.ass", script)?;

    let controller = Controller::with_config(test_config())?;
    controller.run(&request(input, ExportFormat::Csv))?;

    let exported = temp_dir.path().join("tags.csv");
    let first = dubtab::file_utils::FileManager::read_to_string(&exported)?;
    assert!(first.starts_with("00:00:00:00;00:00:01:00;A;\n"));

    let resaved = temp_dir.path().join("tags-resaved.csv");
    controller.run(&ConvertRequest {
        input: exported,
        output: Some(resaved.clone()),
        format: ExportFormat::Csv,
        speakers: Vec::new(),
        force_overwrite: true,
    })?;

    let second = dubtab::file_utils::FileManager::read_to_string(&resaved)?;
    assert_eq!(first, second);

    Ok(())
}

/// Test that a re-imported table with a wrong column count is rejected
#[test]
fn test_run_withWrongColumnCount_shouldFailValidation() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(
        &temp_dir.path().to_path_buf(),
        "broken.csv",
        "a;b;c\n",
    )?;

    let controller = Controller::with_config(test_config())?;
    let result = controller.run(&ConvertRequest {
        input,
        output: Some(temp_dir.path().join("out.csv")),
        format: ExportFormat::Csv,
        speakers: Vec::new(),
        force_overwrite: true,
    });

    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("column count"));
    // No partial output is committed
    assert!(!temp_dir.path().join("out.csv").exists());

    Ok(())
}

/// Test that unrecognized input content is rejected
#[test]
fn test_run_withUnknownScriptContent_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(
        &temp_dir.path().to_path_buf(),
        "notes.txt",
        "this is not a subtitle script\n",
    )?;

    let controller = Controller::with_config(test_config())?;
    let result = controller.run(&request(input, ExportFormat::Csv));

    assert!(result.is_err());

    Ok(())
}

/// Test that an existing output file is not clobbered without force
#[test]
fn test_run_withExistingOutput_shouldSkipWithoutForce() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_ass_script(&temp_dir.path().to_path_buf(), "episode.ass")?;
    let output =
        common::create_test_file(&temp_dir.path().to_path_buf(), "episode.csv", "keep me")?;

    let controller = Controller::with_config(test_config())?;
    controller.run(&request(input, ExportFormat::Csv))?;

    assert_eq!(fs::read_to_string(&output)?, "keep me");

    Ok(())
}

/// Test that a missing input file is reported as an error
#[test]
fn test_run_withMissingInput_shouldFail() -> Result<()> {
    let controller = Controller::with_config(test_config())?;
    let result = controller.run(&request("no_such_input.ass".into(), ExportFormat::Csv));

    assert!(result.is_err());

    Ok(())
}
