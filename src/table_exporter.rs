use std::collections::HashSet;

use log::debug;

use crate::phrase::Phrase;
use crate::timecode::format_timecode;

// @module: Phrase table serialization (CSV/TSV/HTML)

/// Field separator used by the CSV deliverable and the re-import path.
pub const CSV_SEPARATOR: char = ';';

/// Field separator used by the TSV deliverable.
pub const TSV_SEPARATOR: char = '\t';

/// Column count of the CSV deliverable: start, end, speaker, text.
pub const CSV_COLUMN_COUNT: usize = 4;

/// Index of the speaker column within a CSV row.
pub const CSV_SPEAKER_COLUMN: usize = 2;

/// Target deliverable format.
///
/// Each format owns its column set and row builder; the delimiter never
/// selects the schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// `;`-separated, 4 columns: start, end, speaker-or-blank, text
    Csv,
    /// Tab-separated, 2 columns: speaker, start (legacy column set)
    Tsv,
    /// Self-contained HTML table document
    Html,
}

impl ExportFormat {
    /// File extension for the deliverable.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Tsv => "tsv",
            Self::Html => "html",
        }
    }

    /// Whether the written file gets a UTF-8 byte-order marker.
    pub fn wants_bom(&self) -> bool {
        matches!(self, Self::Csv | Self::Tsv)
    }
}

/// Case-insensitive speaker/style filter. Empty means no restriction.
#[derive(Debug, Clone, Default)]
pub struct SpeakerFilter {
    labels: HashSet<String>,
}

impl SpeakerFilter {
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        SpeakerFilter {
            labels: labels
                .into_iter()
                .map(|label| label.as_ref().trim().to_lowercase())
                .filter(|label| !label.is_empty())
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// True when `speaker` passes the filter.
    pub fn matches(&self, speaker: &str) -> bool {
        self.labels.is_empty() || self.labels.contains(&speaker.trim().to_lowercase())
    }
}

/// Parameters for one export call, supplied by the calling shell.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Target format
    pub format: ExportFormat,

    /// Frame rate used for timecode frames; must be positive
    pub fps: f64,

    /// Signed start offset in ms; the sub-second part counts frames
    pub start_offset_ms: i64,

    /// Speaker/style filter
    pub speakers: SpeakerFilter,

    /// Document title, used by the HTML view
    pub title: String,
}

/// Serialize consolidated phrases into the requested deliverable.
///
/// Rows whose speaker is not a member of the filter are dropped entirely.
/// The produced text uses `\n` line terminators only; writing it to storage
/// (with encoding and byte-order marker) is the caller's concern.
pub fn export(phrases: &[Phrase], options: &ExportOptions) -> String {
    let filtered: Vec<&Phrase> = phrases
        .iter()
        .filter(|phrase| options.speakers.matches(&phrase.speaker))
        .collect();

    debug!(
        "Exporting {} of {} phrases as {:?}",
        filtered.len(),
        phrases.len(),
        options.format
    );

    match options.format {
        ExportFormat::Csv => export_csv(&filtered, options),
        ExportFormat::Tsv => export_tsv(&filtered, options),
        ExportFormat::Html => export_html(&filtered, options),
    }
}

/// Build the 4-column CSV table.
///
/// The speaker cell is a group header: it is emitted only when it differs
/// from the previous emitted row's speaker. Repeat-speaker suppression runs
/// over the already-filtered sequence.
fn export_csv(phrases: &[&Phrase], options: &ExportOptions) -> String {
    let mut result = String::new();
    let mut prev_speaker = "";

    for phrase in phrases {
        let row = [
            format_timecode(phrase.start_ms, options.start_offset_ms, options.fps),
            format_timecode(phrase.end_ms, options.start_offset_ms, options.fps),
            if phrase.speaker != prev_speaker {
                phrase.speaker.clone()
            } else {
                String::new()
            },
            phrase.text.clone(),
        ];

        push_row(&mut result, &row, CSV_SEPARATOR);
        prev_speaker = &phrase.speaker;
    }

    result
}

/// Build the 2-column TSV table (speaker, start).
///
/// The narrow column set mirrors the studio's legacy cue-sheet layout and is
/// intentionally not aligned with the CSV one.
fn export_tsv(phrases: &[&Phrase], options: &ExportOptions) -> String {
    let mut result = String::new();

    for phrase in phrases {
        let row = [
            phrase.speaker.clone(),
            format_timecode(phrase.start_ms, options.start_offset_ms, options.fps),
        ];

        push_row(&mut result, &row, TSV_SEPARATOR);
    }

    result
}

/// Build a self-contained HTML document with one table: a title row spanning
/// all columns, then one row per phrase (start, speaker, text).
fn export_html(phrases: &[&Phrase], options: &ExportOptions) -> String {
    let title = escape_html(&options.title);
    let mut lines = vec![
        "<!DOCTYPE html>".to_string(),
        "<html>".to_string(),
        "<head>".to_string(),
        "<meta charset=\"utf-8\">".to_string(),
        format!("<title>{}</title>", title),
        "<style>".to_string(),
        "body { font-family: Helvetica, Arial, sans-serif; font-size: 14px; }".to_string(),
        "table { border-collapse: collapse; width: 100%; }".to_string(),
        "th, td { border: 1px solid #999; padding: 4px 8px; text-align: left; vertical-align: top; }".to_string(),
        "th { background: #e8e8e8; }".to_string(),
        "td.tc { font-family: monospace; white-space: nowrap; }".to_string(),
        "td.speaker { font-weight: bold; white-space: nowrap; }".to_string(),
        "</style>".to_string(),
        "</head>".to_string(),
        "<body>".to_string(),
        "<table>".to_string(),
        format!("<tr><th colspan=\"3\">{}</th></tr>", title),
    ];

    for phrase in phrases {
        lines.push(format!(
            "<tr><td class=\"tc\">{}</td><td class=\"speaker\">{}</td><td>{}</td></tr>",
            format_timecode(phrase.start_ms, options.start_offset_ms, options.fps),
            escape_html(&phrase.speaker),
            escape_html(&phrase.text)
        ));
    }

    lines.push("</table>".to_string());
    lines.push("</body>".to_string());
    lines.push("</html>".to_string());

    let mut result = lines.join("\n");
    result.push('\n');
    result
}

/// Re-serialize rows read back from a delimited table (round-trip save).
///
/// Blank speaker cells continue the group above them, so filtering resolves
/// them to the last non-blank speaker before testing membership.
pub fn serialize_rows(rows: &[Vec<String>], filter: &SpeakerFilter) -> String {
    let mut result = String::new();
    let mut group_speaker = String::new();

    for row in rows {
        let cell = row.get(CSV_SPEAKER_COLUMN).map_or("", |s| s.trim());
        if !cell.is_empty() {
            group_speaker = cell.to_string();
        }

        if filter.matches(&group_speaker) {
            push_row(&mut result, row, CSV_SEPARATOR);
        }
    }

    result
}

fn push_row<S: AsRef<str>>(result: &mut String, cells: &[S], separator: char) {
    let quoted: Vec<String> = cells
        .iter()
        .map(|cell| quote_field(cell.as_ref(), separator))
        .collect();

    result.push_str(&quoted.join(&separator.to_string()));
    result.push('\n');
}

/// Apply delimited-text escaping to one cell: a cell containing the active
/// separator is wrapped in double quotes with internal quotes doubled.
pub fn quote_field(text: &str, separator: char) -> String {
    if text.contains(separator) {
        format!("\"{}\"", text.replace('"', "\"\""))
    } else {
        text.to_string()
    }
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
