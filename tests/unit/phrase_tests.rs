/*!
 * Tests for phrase consolidation
 */

use dubtab::phrase::{consolidate, UNASSIGNED_SPEAKER};
use dubtab::script::ScriptEvent;
use crate::common::event;

/// Test the canonical merge scenario: two adjacent same-speaker cues merge,
/// a distant other-speaker cue stays separate
#[test]
fn test_consolidate_withAdjacentSameSpeakerCues_shouldMerge() {
    let events = vec![
        event(0, 1000, "A", "Hello."),
        event(1000, 2000, "A", "World."),
        event(5000, 6000, "B", "Bye."),
    ];

    let phrases = consolidate(&events, 500);

    assert_eq!(phrases.len(), 2);
    assert_eq!(phrases[0].start_ms, 0);
    assert_eq!(phrases[0].end_ms, 2000);
    assert_eq!(phrases[0].speaker, "A");
    assert_eq!(phrases[0].text, "Hello. World.");
    assert_eq!(phrases[1].start_ms, 5000);
    assert_eq!(phrases[1].end_ms, 6000);
    assert_eq!(phrases[1].speaker, "B");
    assert_eq!(phrases[1].text, "Bye.");
}

/// Test that a gap exactly equal to the join interval still merges
#[test]
fn test_consolidate_withGapEqualToInterval_shouldMerge() {
    let events = vec![
        event(0, 1000, "A", "One."),
        event(1500, 2000, "A", "Two."),
    ];

    let phrases = consolidate(&events, 500);
    assert_eq!(phrases.len(), 1);
    assert_eq!(phrases[0].text, "One. Two.");
}

/// Test that a gap one millisecond past the interval does not merge
#[test]
fn test_consolidate_withGapPastInterval_shouldNotMerge() {
    let events = vec![
        event(0, 1000, "A", "One."),
        event(1501, 2000, "A", "Two."),
    ];

    let phrases = consolidate(&events, 500);
    assert_eq!(phrases.len(), 2);
}

/// Test that a zero interval disables merging regardless of gap
#[test]
fn test_consolidate_withZeroInterval_shouldNeverMerge() {
    let events = vec![
        event(0, 1000, "A", "One."),
        event(1000, 2000, "A", "Two."),
    ];

    let phrases = consolidate(&events, 0);
    assert_eq!(phrases.len(), 2);
}

/// Test that a speaker change always breaks the run
#[test]
fn test_consolidate_withSpeakerChange_shouldBreakRun() {
    let events = vec![
        event(0, 1000, "A", "One."),
        event(1000, 2000, "B", "Two."),
        event(2000, 3000, "A", "Three."),
    ];

    let phrases = consolidate(&events, 5000);
    assert_eq!(phrases.len(), 3);
    assert_eq!(phrases[0].speaker, "A");
    assert_eq!(phrases[1].speaker, "B");
    assert_eq!(phrases[2].speaker, "A");
}

/// Test that an overlapping cue (start before the open phrase's end) does
/// not merge
#[test]
fn test_consolidate_withOverlappingCue_shouldNotMerge() {
    let events = vec![
        event(0, 2000, "A", "One."),
        event(1500, 3000, "A", "Two."),
    ];

    let phrases = consolidate(&events, 5000);
    assert_eq!(phrases.len(), 2);
}

/// Test that blank speaker labels map to the unassigned placeholder, and
/// that two such cues can merge with each other
#[test]
fn test_consolidate_withBlankSpeakers_shouldUsePlaceholder() {
    let events = vec![
        event(0, 1000, "", "One."),
        event(1200, 2000, "  ", "Two."),
    ];

    let phrases = consolidate(&events, 500);
    assert_eq!(phrases.len(), 1);
    assert_eq!(phrases[0].speaker, UNASSIGNED_SPEAKER);
    assert_eq!(phrases[0].text, "One. Two.");
}

/// Test that cue text is normalized during consolidation
#[test]
fn test_consolidate_withTaggedText_shouldNormalize() {
    let events = vec![event(0, 1000, "A", r" {\i1}Hello\Nthere{\i0} ")];

    let phrases = consolidate(&events, 0);
    assert_eq!(phrases[0].text, "Hello there");
}

/// Test that empty input yields empty output
#[test]
fn test_consolidate_withEmptyInput_shouldReturnEmpty() {
    let phrases = consolidate(&[], 500);
    assert!(phrases.is_empty());
}

/// Test idempotence: consolidating the consolidated output again produces
/// the same sequence (no further merges occur)
#[test]
fn test_consolidate_withOwnOutput_shouldBeIdempotent() {
    let events = vec![
        event(0, 1000, "A", "Hello."),
        event(1000, 2000, "A", "World."),
        event(2100, 3000, "B", "Hi."),
        event(8000, 9000, "B", "Again."),
    ];

    let first = consolidate(&events, 500);

    let reshaped: Vec<ScriptEvent> = first
        .iter()
        .map(|p| ScriptEvent::new(p.start_ms, p.end_ms, &p.speaker, &p.text))
        .collect();
    let second = consolidate(&reshaped, 500);

    assert_eq!(first, second);
}
