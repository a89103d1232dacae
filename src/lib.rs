/*!
 * # dubtab - dubbing tables from subtitle scripts
 *
 * A Rust library for converting timed dialogue scripts into dubbing-studio
 * deliverables.
 *
 * ## Features
 *
 * - Parse SSA/ASS and SRT subtitle scripts with format auto-detection
 * - Strip inline override tags and line-break escapes from cue text
 * - Merge adjacent same-speaker cues into spoken phrases under a
 *   configurable silence-gap rule
 * - Render studio timecodes (`HH:MM:SS:FF`) from a frame rate and a signed
 *   start offset with a frame-accurate sub-second component
 * - Export CSV, TSV, and self-contained HTML dialogue tables with speaker
 *   filtering
 * - Re-import a previously exported CSV table for an edit-then-save round
 *   trip
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `script`: Subtitle script detection and parsing
 * - `text_normalizer`: Cue text cleanup
 * - `phrase`: Phrase consolidation
 * - `timecode`: Studio timecode formatting
 * - `table_exporter`: CSV/TSV/HTML serialization
 * - `delimited_reader`: Round-trip delimited table ingestion
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod delimited_reader;
pub mod errors;
pub mod file_utils;
pub mod phrase;
pub mod script;
pub mod table_exporter;
pub mod text_normalizer;
pub mod timecode;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::{Controller, ConvertRequest};
pub use delimited_reader::DelimitedReader;
pub use errors::{AppError, ScriptError, TableError};
pub use phrase::{consolidate, Phrase};
pub use script::{detect_format, parse, ScriptEvent, ScriptFormat};
pub use table_exporter::{export, ExportFormat, ExportOptions, SpeakerFilter};
pub use timecode::{format_timecode, Timecode};
