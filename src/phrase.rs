use log::debug;

use crate::script::ScriptEvent;
use crate::text_normalizer;

// @module: Phrase consolidation

/// Placeholder label for cues whose speaker/style cell is blank.
pub const UNASSIGNED_SPEAKER: &str = "[unassigned]";

/// A cue, or a run of cues merged under the gap rule, ready for export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Phrase {
    /// Start time in ms
    pub start_ms: u64,

    /// End time in ms
    pub end_ms: u64,

    /// Speaker label of the first cue in the run
    pub speaker: String,

    /// Normalized text of the whole run
    pub text: String,
}

impl Phrase {
    fn from_event(event: &ScriptEvent) -> Self {
        let speaker = event.speaker.trim();
        Phrase {
            start_ms: event.start_ms,
            end_ms: event.end_ms,
            speaker: if speaker.is_empty() {
                UNASSIGNED_SPEAKER.to_string()
            } else {
                speaker.to_string()
            },
            text: text_normalizer::normalize(&event.text),
        }
    }

    /// True when `event` may be absorbed into this open phrase: same
    /// speaker, no overlap, and a silence gap within the join interval.
    fn accepts(&self, event: &ScriptEvent, join_interval_ms: i64) -> bool {
        if join_interval_ms <= 0 {
            return false;
        }

        let speaker = event.speaker.trim();
        let speaker = if speaker.is_empty() {
            UNASSIGNED_SPEAKER
        } else {
            speaker
        };

        speaker == self.speaker
            && event.start_ms >= self.end_ms
            && (event.start_ms - self.end_ms) as i64 <= join_interval_ms
    }

    fn extend(&mut self, event: &ScriptEvent) {
        self.end_ms = event.end_ms;
        self.text.push(' ');
        self.text.push_str(&text_normalizer::normalize(&event.text));
    }
}

/// Merge adjacent same-speaker cues into spoken phrases.
///
/// Events are consumed in source order. Consecutive cues merge into one
/// phrase while the speaker stays the same and the silence between them does
/// not exceed `join_interval_ms`. A non-positive interval disables merging
/// entirely, yielding one normalized phrase per cue.
pub fn consolidate(events: &[ScriptEvent], join_interval_ms: i64) -> Vec<Phrase> {
    let mut phrases = Vec::new();
    let mut open: Option<Phrase> = None;

    for event in events {
        match open.as_mut() {
            Some(phrase) if phrase.accepts(event, join_interval_ms) => {
                phrase.extend(event);
            }
            _ => {
                if let Some(done) = open.take() {
                    phrases.push(done);
                }
                open = Some(Phrase::from_event(event));
            }
        }
    }

    if let Some(done) = open {
        phrases.push(done);
    }

    debug!(
        "Consolidated {} events into {} phrases (join interval {} ms)",
        events.len(),
        phrases.len(),
        join_interval_ms
    );

    phrases
}
