// Copyright (C) 2026 Michael Wilson <mike@mdwn.dev>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//

//! Duration arithmetic: note lengths and tempo to seconds, seconds to frames.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The note-length denominators the notation accepts, whole through sixty-fourth.
pub const CANONICAL_LENGTHS: [u32; 7] = [1, 2, 4, 8, 16, 32, 64];

/// A length of 4 is one beat.
const BEAT_LENGTH: f64 = 4.0;

/// The longest a single note, rest or chord may last, in seconds.
pub const MAX_DURATION_SECONDS: f64 = 3600.0;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DurationError {
    #[error("Invalid duration argument: {0}")]
    InvalidArgument(String),
}

/// A musical note length, stored as its denominator (1 = whole, 4 = quarter, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct NoteLength(u32);

impl NoteLength {
    pub const WHOLE: NoteLength = NoteLength(1);
    pub const QUARTER: NoteLength = NoteLength(4);

    /// Returns the length if the denominator is one of the canonical lengths.
    pub fn new(denominator: u32) -> Option<NoteLength> {
        CANONICAL_LENGTHS
            .contains(&denominator)
            .then_some(NoteLength(denominator))
    }

    /// Gets the denominator.
    pub fn denominator(&self) -> u32 {
        self.0
    }

    /// Number of beats this length spans (a quarter note is one beat).
    pub fn beats(&self) -> f64 {
        BEAT_LENGTH / self.0 as f64
    }
}

impl TryFrom<u32> for NoteLength {
    type Error = String;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        NoteLength::new(value).ok_or_else(|| {
            format!(
                "note length must be one of {:?}, got {}",
                CANONICAL_LENGTHS, value
            )
        })
    }
}

impl From<NoteLength> for u32 {
    fn from(length: NoteLength) -> u32 {
        length.0
    }
}

impl fmt::Display for NoteLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Resolves the playback duration in seconds.
///
/// A positive `explicit_seconds` always wins. Otherwise the duration is derived from
/// the note length and tempo: `(60 / tempo) * (4 / length)`, so a whole note at
/// 60 BPM lasts four seconds and a quarter note at 120 BPM half a second.
pub fn resolve_duration(
    explicit_seconds: f64,
    length: u32,
    tempo_bpm: f64,
) -> Result<f64, DurationError> {
    if explicit_seconds > 0.0 {
        return Ok(explicit_seconds);
    }
    if length == 0 {
        return Err(DurationError::InvalidArgument(
            "note length must be greater than 0".to_string(),
        ));
    }
    if !tempo_bpm.is_finite() || tempo_bpm <= 0.0 {
        return Err(DurationError::InvalidArgument(format!(
            "tempo must be greater than 0, got {}",
            tempo_bpm
        )));
    }

    let seconds_per_beat = 60.0 / tempo_bpm;
    let ratio = BEAT_LENGTH / length as f64;
    Ok(seconds_per_beat * ratio)
}

/// Converts a duration in seconds to a frame count at the given sample rate.
///
/// Non-positive durations are zero frames. Durations above [`MAX_DURATION_SECONDS`]
/// are rejected rather than allocated.
pub fn frame_count(seconds: f64, sample_rate: u32) -> Result<usize, DurationError> {
    if seconds.is_nan() || seconds <= 0.0 {
        return Ok(0);
    }
    if seconds > MAX_DURATION_SECONDS {
        return Err(DurationError::InvalidArgument(format!(
            "{} seconds is longer than the maximum of {} seconds",
            seconds, MAX_DURATION_SECONDS
        )));
    }
    Ok((seconds * sample_rate as f64).round() as usize)
}
