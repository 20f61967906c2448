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
use std::fmt;
use std::path::{Path, PathBuf};

use pest::Parser;
use serde::Serialize;
use tracing::warn;

use super::error::NotationError;
use super::instrument::{Instrument, InstrumentFamily};
use super::{NotationParser, Rule};
use crate::duration::{resolve_duration, DurationError, NoteLength};

/// The highest octave the sample library provides.
pub const MAX_OCTAVE: u8 = 8;

/// Drum samples without a variant suffix use the first variant.
const DEFAULT_DRUM_VARIANT: &str = "01";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Accidental {
    Natural,
    Sharp,
    Flat,
}

/// A pitch letter (always uppercase) with its accidental.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Pitch {
    pub letter: char,
    pub accidental: Accidental,
}

impl Pitch {
    /// The pitch name used by the sample library. The library only has naturals and
    /// flats, so sharps are spelled as their enharmonic flat. The octave is never
    /// adjusted, so B# maps to C and Cb to B within the same octave number.
    pub fn canonical_name(&self) -> String {
        match (self.letter, self.accidental) {
            (letter, Accidental::Natural) => letter.to_string(),
            ('E', Accidental::Sharp) => "F".to_string(),
            ('B', Accidental::Sharp) => "C".to_string(),
            (letter, Accidental::Sharp) => format!("{}b", next_letter(letter)),
            ('C', Accidental::Flat) => "B".to_string(),
            ('F', Accidental::Flat) => "E".to_string(),
            (letter, Accidental::Flat) => format!("{}b", letter),
        }
    }
}

impl fmt::Display for Pitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.accidental {
            Accidental::Natural => write!(f, "{}", self.letter),
            Accidental::Sharp => write!(f, "{}#", self.letter),
            Accidental::Flat => write!(f, "{}b", self.letter),
        }
    }
}

fn next_letter(letter: char) -> char {
    match letter {
        'G' => 'A',
        letter => (letter as u8 + 1) as char,
    }
}

/// What a note plays: a pitch for pitched instruments, a sample name otherwise.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Sound {
    Pitched { pitch: Pitch },
    Named { name: String },
}

/// The defaults a note falls back on, taken from the interpreter state at the time
/// the note is read.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoteDefaults {
    pub octave: u8,
    pub length: NoteLength,
}

/// A fully resolved note.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NoteDescriptor {
    pub instrument: Instrument,
    pub sound: Sound,
    pub octave: u8,
    /// Note length. `None` plays the sample for its natural duration.
    pub length: Option<NoteLength>,
    /// Explicit duration in seconds, overriding the length.
    pub explicit_seconds: Option<f64>,
}

impl NoteDescriptor {
    /// The sample file name for this note within its instrument directory.
    pub fn file_name(&self) -> String {
        let name = match &self.sound {
            Sound::Pitched { pitch } => {
                return format!(
                    "{}{}-{}.wav",
                    pitch.canonical_name(),
                    self.octave,
                    self.instrument.abbreviation()
                )
            }
            Sound::Named { name } => name,
        };

        match self.instrument.family() {
            InstrumentFamily::Percussive => drum_file_name(name),
            InstrumentFamily::Noise => noise_file_name(name),
            _ => format!("{}.wav", name),
        }
    }

    /// The full sample path within the given library.
    pub fn sample_path(&self, library: &Path) -> PathBuf {
        library
            .join(self.instrument.directory())
            .join(self.file_name())
    }

    /// The target duration in seconds at the given tempo. `None` means the sample
    /// plays for its natural duration.
    pub fn target_seconds(&self, tempo_bpm: f64) -> Result<Option<f64>, DurationError> {
        match (self.explicit_seconds, self.length) {
            (Some(seconds), _) => resolve_duration(seconds, 0, tempo_bpm).map(Some),
            (None, Some(length)) => {
                resolve_duration(0.0, length.denominator(), tempo_bpm).map(Some)
            }
            (None, None) => Ok(None),
        }
    }
}

/// `bass` -> `DRUMS-bass01.wav`, `snare02` -> `DRUMS-snare02.wav`.
fn drum_file_name(name: &str) -> String {
    let bytes = name.as_bytes();
    let has_variant =
        bytes.len() >= 2 && bytes[bytes.len() - 2..].iter().all(|b| b.is_ascii_digit());
    if has_variant {
        let (style, variant) = name.split_at(name.len() - 2);
        format!("DRUMS-{}{}.wav", style, variant)
    } else {
        format!("DRUMS-{}{}.wav", name, DEFAULT_DRUM_VARIANT)
    }
}

/// `white1s` -> `white-1s.wav`. Names without a trailing `<digits>s` are used as is.
fn noise_file_name(name: &str) -> String {
    if let Some(stem) = name.strip_suffix('s') {
        let kind = stem.trim_end_matches(|c: char| c.is_ascii_digit());
        let seconds = &stem[kind.len()..];
        if !seconds.is_empty() && !kind.is_empty() && !kind.ends_with('-') {
            return format!("{}-{}s.wav", kind, seconds);
        }
    }
    format!("{}.wav", name)
}

/// Resolves a note argument for the given instrument.
///
/// Non-pitched instruments take the whole argument as the sample name. Pitched
/// instruments parse a letter, an optional accidental and an optional octave; an
/// out of range octave or trailing characters are logged and ignored. The length
/// always comes from the defaults.
pub fn resolve_note(
    instrument: &Instrument,
    argument: &str,
    explicit_seconds: Option<f64>,
    defaults: NoteDefaults,
) -> Result<NoteDescriptor, NotationError> {
    let (sound, octave) = if instrument.family() == InstrumentFamily::Pitched {
        parse_pitch(argument, defaults.octave)?
    } else {
        if argument.is_empty() {
            return Err(NotationError::malformed(argument, "missing sound name"));
        }
        (
            Sound::Named {
                name: argument.to_string(),
            },
            defaults.octave,
        )
    };

    Ok(NoteDescriptor {
        instrument: instrument.clone(),
        sound,
        octave,
        length: Some(defaults.length),
        explicit_seconds,
    })
}

fn parse_pitch(argument: &str, default_octave: u8) -> Result<(Sound, u8), NotationError> {
    let spec = NotationParser::parse(Rule::pitch_spec, argument)
        .ok()
        .and_then(|mut pairs| pairs.next())
        .ok_or_else(|| NotationError::malformed(argument, "expected a note letter A-G"))?;

    let mut letter = None;
    let mut accidental = Accidental::Natural;
    let mut octave = default_octave;

    for pair in spec.into_inner() {
        match pair.as_rule() {
            Rule::pitch_letter => {
                letter = pair.as_str().chars().next().map(|c| c.to_ascii_uppercase());
            }
            Rule::accidental => {
                accidental = match pair.as_str() {
                    "+" | "#" => Accidental::Sharp,
                    _ => Accidental::Flat,
                };
            }
            Rule::octave => match pair.as_str().parse::<u8>() {
                Ok(value) if value <= MAX_OCTAVE => octave = value,
                _ => warn!(
                    note = argument,
                    octave = pair.as_str(),
                    default = default_octave,
                    "Octave out of range, using default"
                ),
            },
            Rule::remainder if !pair.as_str().is_empty() => {
                warn!(
                    note = argument,
                    ignored = pair.as_str(),
                    "Ignoring trailing characters in note"
                );
            }
            _ => {}
        }
    }

    let letter =
        letter.ok_or_else(|| NotationError::malformed(argument, "expected a note letter A-G"))?;

    Ok((
        Sound::Pitched {
            pitch: Pitch { letter, accidental },
        },
        octave,
    ))
}
