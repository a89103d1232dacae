use once_cell::sync::Lazy;
use regex::Regex;
use log::warn;

use crate::errors::ScriptError;

// @module: Subtitle script detection and parsing

// @const: SRT timestamp line regex
static TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{2}):(\d{2}):(\d{2})[,.](\d{3}) --> (\d{2}):(\d{2}):(\d{2})[,.](\d{3})")
        .unwrap()
});

// @const: SSA/ASS dialogue timestamp (H:MM:SS.cc)
static SSA_TIME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+):(\d{2}):(\d{2})\.(\d{2})$").unwrap());

/// Default ASS event field order, used when the [Events] section carries no
/// Format: line of its own.
const DEFAULT_EVENT_FORMAT: [&str; 10] = [
    "Layer", "Start", "End", "Style", "Name", "MarginL", "MarginR", "MarginV", "Effect", "Text",
];

// @struct: Single timed dialogue cue as authored in the source script
#[derive(Debug, Clone)]
pub struct ScriptEvent {
    // @field: Start time in ms
    pub start_ms: u64,

    // @field: End time in ms
    pub end_ms: u64,

    // @field: Speaker or style label, possibly empty
    pub speaker: String,

    // @field: Raw cue text, possibly tag-laden
    pub text: String,
}

impl ScriptEvent {
    pub fn new(start_ms: u64, end_ms: u64, speaker: &str, text: &str) -> Self {
        ScriptEvent {
            start_ms,
            end_ms,
            speaker: speaker.to_string(),
            text: text.to_string(),
        }
    }
}

/// Detected script flavor of an input file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptFormat {
    /// SubStation Alpha and its ASS successor
    SsaLike,
    /// SubRip
    Srt,
    /// Not a recognized subtitle script
    Unknown,
}

/// Detect the script format from file content.
///
/// SSA/ASS is recognized by its section headers or a Dialogue: line; SRT by
/// the `-->` timestamp arrow. Detection is deliberately shallow - full
/// grammar checking happens during parsing.
pub fn detect_format(content: &str) -> ScriptFormat {
    for line in content.lines() {
        let trimmed = line.trim_start_matches('\u{feff}').trim();
        if trimmed.is_empty() {
            continue;
        }

        let lower = trimmed.to_lowercase();
        if lower == "[script info]" || lower == "[events]" || lower.starts_with("dialogue:") {
            return ScriptFormat::SsaLike;
        }

        if TIMESTAMP_REGEX.is_match(trimmed) {
            return ScriptFormat::Srt;
        }
    }

    ScriptFormat::Unknown
}

/// Parse script content into an ordered event list.
///
/// Events are returned in source file order; no re-sorting is applied, so a
/// script authored out of chronological order stays that way.
pub fn parse(content: &str, format: ScriptFormat) -> Result<Vec<ScriptEvent>, ScriptError> {
    match format {
        ScriptFormat::SsaLike => parse_ssa(content),
        ScriptFormat::Srt => parse_srt(content),
        ScriptFormat::Unknown => Err(ScriptError::UnknownFormat),
    }
}

/// Parse SSA/ASS content into events.
///
/// Only the [Events] section is read. Field order follows the section's
/// Format: line when present, the standard ASS ordering otherwise. The
/// speaker label is the Name (actor) field, falling back to Style when the
/// actor cell is blank.
fn parse_ssa(content: &str) -> Result<Vec<ScriptEvent>, ScriptError> {
    let mut events = Vec::new();
    let mut field_order: Vec<String> = DEFAULT_EVENT_FORMAT
        .iter()
        .map(|s| s.to_string())
        .collect();
    let mut in_events = false;

    for (line_no, line) in content.lines().enumerate() {
        let trimmed = line.trim_start_matches('\u{feff}').trim();
        if trimmed.is_empty() {
            continue;
        }

        if trimmed.starts_with('[') {
            in_events = trimmed.eq_ignore_ascii_case("[events]");
            continue;
        }

        if !in_events {
            continue;
        }

        if let Some(rest) = strip_prefix_ci(trimmed, "format:") {
            field_order = rest.split(',').map(|f| f.trim().to_string()).collect();
            continue;
        }

        if let Some(rest) = strip_prefix_ci(trimmed, "dialogue:") {
            // The trailing Text field may itself contain commas
            let fields: Vec<&str> = rest.trim().splitn(field_order.len(), ',').collect();
            if fields.len() != field_order.len() {
                warn!("Skipping malformed dialogue line {}", line_no + 1);
                continue;
            }

            let field = |name: &str| -> &str {
                field_order
                    .iter()
                    .position(|f| f.eq_ignore_ascii_case(name))
                    .map_or("", |idx| fields[idx].trim())
            };

            let (start, end) = match (
                parse_ssa_timestamp(field("Start")),
                parse_ssa_timestamp(field("End")),
            ) {
                (Some(start), Some(end)) => (start, end),
                _ => {
                    warn!("Skipping dialogue with bad timestamp at line {}", line_no + 1);
                    continue;
                }
            };

            let actor = field("Name");
            let speaker = if actor.is_empty() { field("Style") } else { actor };
            let text = fields.last().map_or("", |t| t.trim());

            events.push(ScriptEvent::new(start, end, speaker, text));
        }
    }

    if events.is_empty() {
        return Err(ScriptError::GrammarMismatch("SSA/ASS".to_string()));
    }

    Ok(events)
}

/// Parse SRT content into events.
///
/// SRT carries no speaker labels, so every event gets an empty one and the
/// consolidator maps it to the unassigned-speaker placeholder. Multi-line
/// cue text is joined with single spaces.
fn parse_srt(content: &str) -> Result<Vec<ScriptEvent>, ScriptError> {
    let mut events = Vec::new();

    // State for the entry being assembled
    let mut current_times: Option<(u64, u64)> = None;
    let mut current_text = String::new();
    let mut seen_seq_num = false;

    let mut flush =
        |times: &mut Option<(u64, u64)>, text: &mut String, seen_seq: &mut bool| {
            if let Some((start, end)) = times.take() {
                if text.trim().is_empty() {
                    warn!("Skipping empty subtitle entry ending at {} ms", end);
                } else {
                    events.push(ScriptEvent::new(start, end, "", text.trim()));
                }
            }
            text.clear();
            *seen_seq = false;
        };

    for line in content.lines() {
        let trimmed = line.trim_start_matches('\u{feff}').trim();

        if trimmed.is_empty() {
            flush(&mut current_times, &mut current_text, &mut seen_seq_num);
            continue;
        }

        // Sequence number opens a new entry
        if current_times.is_none() && !seen_seq_num && trimmed.parse::<u64>().is_ok() {
            seen_seq_num = true;
            continue;
        }

        if current_times.is_none() {
            if let Some(caps) = TIMESTAMP_REGEX.captures(trimmed) {
                let start = srt_capture_to_ms(&caps, 1);
                let end = srt_capture_to_ms(&caps, 5);
                current_times = Some((start, end));
                continue;
            }
        }

        if current_times.is_some() {
            if !current_text.is_empty() {
                current_text.push(' ');
            }
            current_text.push_str(trimmed);
        }
    }

    flush(&mut current_times, &mut current_text, &mut seen_seq_num);

    if events.is_empty() {
        return Err(ScriptError::GrammarMismatch("SRT".to_string()));
    }

    Ok(events)
}

fn strip_prefix_ci<'a>(line: &'a str, prefix: &str) -> Option<&'a str> {
    let head = line.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        Some(&line[prefix.len()..])
    } else {
        None
    }
}

/// Convert an SSA `H:MM:SS.cc` timestamp to milliseconds.
fn parse_ssa_timestamp(timestamp: &str) -> Option<u64> {
    let caps = SSA_TIME_REGEX.captures(timestamp)?;
    let get = |idx: usize| caps.get(idx).and_then(|m| m.as_str().parse::<u64>().ok());

    let hours = get(1)?;
    let minutes = get(2)?;
    let seconds = get(3)?;
    let centis = get(4)?;

    // `\d+` puts no bound on the hour field, so an absurd value must not
    // overflow; such a timestamp is rejected instead.
    hours
        .checked_mul(3600)?
        .checked_add(minutes * 60 + seconds)?
        .checked_mul(1000)?
        .checked_add(centis * 10)
}

/// Convert one half of an SRT timestamp capture to milliseconds.
fn srt_capture_to_ms(caps: &regex::Captures, start_idx: usize) -> u64 {
    let part = |offset: usize| -> u64 {
        caps.get(start_idx + offset)
            .map_or(0, |m| m.as_str().parse().unwrap_or(0))
    };

    (part(0) * 3600 + part(1) * 60 + part(2)) * 1000 + part(3)
}
