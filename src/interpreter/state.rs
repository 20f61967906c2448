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
use serde::Serialize;

use crate::config::Defaults;
use crate::duration::NoteLength;
use crate::notation::{NoteDefaults, NotationError, MAX_OCTAVE};

const MAX_VOLUME: u8 = 100;

const TEMPO_EXPECTED: &str = "a number greater than 0";
const OCTAVE_EXPECTED: &str = "an integer from 0 to 8";
const LENGTH_EXPECTED: &str = "one of 1, 2, 4, 8, 16, 32, 64";
const VOLUME_EXPECTED: &str = "an integer from 0 to 100";

/// The global defaults a document can change as it goes. Every value is validated
/// before it is accepted; a rejected update leaves the previous value in place.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct InterpreterState {
    tempo: f64,
    octave: u8,
    length: NoteLength,
    volume: u8,
}

impl InterpreterState {
    /// Creates the state from configured defaults.
    pub fn new(defaults: Defaults) -> Result<InterpreterState, NotationError> {
        if !valid_tempo(defaults.tempo) {
            return Err(NotationError::invalid(
                "tempo",
                &defaults.tempo.to_string(),
                TEMPO_EXPECTED,
            ));
        }
        if defaults.octave > MAX_OCTAVE {
            return Err(NotationError::invalid(
                "octave",
                &defaults.octave.to_string(),
                OCTAVE_EXPECTED,
            ));
        }
        if defaults.volume > MAX_VOLUME {
            return Err(NotationError::invalid(
                "volume",
                &defaults.volume.to_string(),
                VOLUME_EXPECTED,
            ));
        }

        Ok(InterpreterState {
            tempo: defaults.tempo,
            octave: defaults.octave,
            length: defaults.length,
            volume: defaults.volume,
        })
    }

    pub fn tempo(&self) -> f64 {
        self.tempo
    }

    pub fn octave(&self) -> u8 {
        self.octave
    }

    pub fn length(&self) -> NoteLength {
        self.length
    }

    pub fn volume(&self) -> u8 {
        self.volume
    }

    /// What a note falls back on when it omits its octave or length.
    pub fn note_defaults(&self) -> NoteDefaults {
        NoteDefaults {
            octave: self.octave,
            length: self.length,
        }
    }

    pub fn set_tempo(&mut self, value: &str) -> Result<f64, NotationError> {
        match value.parse::<f64>() {
            Ok(tempo) if valid_tempo(tempo) => {
                self.tempo = tempo;
                Ok(tempo)
            }
            _ => Err(NotationError::invalid("tempo", value, TEMPO_EXPECTED)),
        }
    }

    pub fn set_octave(&mut self, value: &str) -> Result<u8, NotationError> {
        match value.parse::<u8>() {
            Ok(octave) if octave <= MAX_OCTAVE => {
                self.octave = octave;
                Ok(octave)
            }
            _ => Err(NotationError::invalid("octave", value, OCTAVE_EXPECTED)),
        }
    }

    pub fn set_length(&mut self, value: &str) -> Result<NoteLength, NotationError> {
        let length = parse_length(value)
            .ok_or_else(|| NotationError::invalid("length", value, LENGTH_EXPECTED))?;
        self.length = length;
        Ok(length)
    }

    pub fn set_volume(&mut self, value: &str) -> Result<u8, NotationError> {
        match value.parse::<u8>() {
            Ok(volume) if volume <= MAX_VOLUME => {
                self.volume = volume;
                Ok(volume)
            }
            _ => Err(NotationError::invalid("volume", value, VOLUME_EXPECTED)),
        }
    }
}

/// Parses a note length denominator.
pub(crate) fn parse_length(value: &str) -> Option<NoteLength> {
    value.parse::<u32>().ok().and_then(NoteLength::new)
}

/// Volume as a linear gain.
pub(crate) fn gain(volume: u8) -> f32 {
    volume as f32 / MAX_VOLUME as f32
}

fn valid_tempo(tempo: f64) -> bool {
    tempo.is_finite() && tempo > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> InterpreterState {
        InterpreterState::new(Defaults::default()).unwrap()
    }

    #[test]
    fn test_accepts_valid_updates() {
        let mut state = state();
        assert_eq!(state.set_tempo("96.5").unwrap(), 96.5);
        assert_eq!(state.set_octave("0").unwrap(), 0);
        assert_eq!(state.set_octave("8").unwrap(), 8);
        assert_eq!(state.set_length("16").unwrap(), NoteLength::new(16).unwrap());
        assert_eq!(state.set_volume("0").unwrap(), 0);
        assert_eq!(state.set_volume("100").unwrap(), 100);

        assert_eq!(state.tempo(), 96.5);
        assert_eq!(state.octave(), 8);
        assert_eq!(state.length().denominator(), 16);
        assert_eq!(state.volume(), 100);
    }

    #[test]
    fn test_rejected_updates_keep_previous_value() {
        let mut state = state();
        for value in ["-5", "0", "abc", "", "inf", "NaN"] {
            assert!(state.set_tempo(value).is_err(), "{}", value);
        }
        for value in ["9", "-1", "4.0", "x"] {
            assert!(state.set_octave(value).is_err(), "{}", value);
        }
        for value in ["0", "3", "128", "4s"] {
            assert!(state.set_length(value).is_err(), "{}", value);
        }
        for value in ["101", "-1", "50%"] {
            assert!(state.set_volume(value).is_err(), "{}", value);
        }
        assert_eq!(state, self::state());
    }

    #[test]
    fn test_rejects_invalid_defaults() {
        let defaults = Defaults {
            tempo: 0.0,
            ..Defaults::default()
        };
        assert!(InterpreterState::new(defaults).is_err());
        let defaults = Defaults {
            octave: 9,
            ..Defaults::default()
        };
        assert!(InterpreterState::new(defaults).is_err());
        let defaults = Defaults {
            volume: 255,
            ..Defaults::default()
        };
        assert!(InterpreterState::new(defaults).is_err());
    }

    #[test]
    fn test_gain() {
        assert_eq!(gain(100), 1.0);
        assert_eq!(gain(50), 0.5);
        assert_eq!(gain(0), 0.0);
    }
}
