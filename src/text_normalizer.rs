use once_cell::sync::Lazy;
use regex::Regex;

// @module: Cue text normalization

// @const: SSA/ASS line-break escape (`\N`, case-insensitive)
static LINE_BREAK_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\\n").unwrap());

// @const: Inline override tag, `{...}` non-greedy, no nesting
static OVERRIDE_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{[^}]*\}").unwrap());

/// Normalize raw cue text for export.
///
/// Trims surrounding whitespace, replaces every `\N` line-break escape with a
/// single space, and removes inline `{...}` override tags entirely. Always
/// returns a string, possibly empty.
pub fn normalize(raw: &str) -> String {
    let trimmed = raw.trim();
    let unbroken = LINE_BREAK_TAG.replace_all(trimmed, " ");
    OVERRIDE_TAG.replace_all(&unbroken, "").into_owned()
}
