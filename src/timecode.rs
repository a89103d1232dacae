use std::fmt;

// @module: Studio timecode formatting

/// A display timecode in `HH:MM:SS:FF` form, where `FF` is a frame index
/// derived from the frame rate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timecode {
    negative: bool,
    hours: u64,
    minutes: u64,
    seconds: u64,
    frames: u64,
}

impl Timecode {
    /// Compute the studio timecode for a cue offset.
    ///
    /// `start_offset_ms` is a signed shift applied to every cue. Its whole
    /// seconds shift the time directly; the sub-second remainder is a frame
    /// count expressed as milliseconds and is re-scaled by `fps` before it is
    /// applied, rounding away from zero.
    ///
    /// Precondition: `fps > 0`. Callers validate the frame rate up front
    /// (see `Config::validate`); non-positive values are not handled here.
    pub fn from_offset(offset_ms: u64, start_offset_ms: i64, fps: f64) -> Self {
        let whole_seconds_ms = (start_offset_ms / 1000) * 1000;
        let frame_remainder = start_offset_ms % 1000;

        let scaled = frame_remainder as f64 * 1000.0 / fps;
        let correction_ms = if frame_remainder < 0 {
            scaled.floor()
        } else {
            scaled.ceil()
        } as i64;

        let total = offset_ms as i64 + whole_seconds_ms + correction_ms;
        let (negative, total) = if total < 0 {
            (true, total.unsigned_abs())
        } else {
            (false, total as u64)
        };

        Timecode {
            negative,
            // No hour wraparound: totals past 24h keep counting up
            hours: total / 3_600_000,
            minutes: total % 3_600_000 / 60_000,
            seconds: total % 60_000 / 1_000,
            frames: ((total % 1_000) as f64 * fps / 1000.0).floor() as u64,
        }
    }
}

impl fmt::Display for Timecode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{:02}:{:02}:{:02}:{:02}",
            if self.negative { "-" } else { "" },
            self.hours,
            self.minutes,
            self.seconds,
            self.frames
        )
    }
}

/// Format a cue offset directly to its timecode string.
pub fn format_timecode(offset_ms: u64, start_offset_ms: i64, fps: f64) -> String {
    Timecode::from_offset(offset_ms, start_offset_ms, fps).to_string()
}
