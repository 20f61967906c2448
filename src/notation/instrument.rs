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
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// The sound family of an instrument. Decides file naming and whether a sample is
/// looped to fill a note or played once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstrumentFamily {
    /// Pitched waveforms, looped to the note duration.
    Pitched,
    /// Drum hits.
    Percussive,
    /// Noise recordings.
    Noise,
    /// Miscellaneous effects.
    Miscellaneous,
    /// Chorus effects.
    Chorus,
}

impl InstrumentFamily {
    /// One-shot families play their sample once and pad or truncate.
    pub fn is_one_shot(&self) -> bool {
        !matches!(self, InstrumentFamily::Pitched)
    }
}

/// An instrument category as written before the ':' of a note token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "InstrumentEntry")]
pub struct Instrument {
    /// The abbreviation used in notation, e.g. "sqr" or "x".
    abbreviation: String,
    /// The library directory holding this instrument's samples.
    directory: String,
    /// The sound family.
    family: InstrumentFamily,
}

impl Instrument {
    /// Creates a new instrument. Abbreviations are case-insensitive and stored lowercase.
    pub fn new(abbreviation: &str, directory: &str, family: InstrumentFamily) -> Instrument {
        Instrument {
            abbreviation: abbreviation.to_lowercase(),
            directory: directory.to_string(),
            family,
        }
    }

    /// Gets the abbreviation.
    pub fn abbreviation(&self) -> &str {
        &self.abbreviation
    }

    /// Gets the library directory.
    pub fn directory(&self) -> &str {
        &self.directory
    }

    /// Gets the family.
    pub fn family(&self) -> InstrumentFamily {
        self.family
    }
}

/// An instrument as written in a config file, before its abbreviation is normalized.
#[derive(Deserialize)]
struct InstrumentEntry {
    abbreviation: String,
    directory: String,
    family: InstrumentFamily,
}

impl From<InstrumentEntry> for Instrument {
    fn from(entry: InstrumentEntry) -> Self {
        Instrument::new(&entry.abbreviation, &entry.directory, entry.family)
    }
}

/// The table of instruments known to the interpreter, keyed by abbreviation.
#[derive(Debug, Clone)]
pub struct Instruments {
    instruments: HashMap<String, Instrument>,
}

impl Instruments {
    /// Creates an instrument table from the given instruments. Later entries replace
    /// earlier ones with the same abbreviation.
    pub fn new(instruments: Vec<Instrument>) -> Instruments {
        Instruments {
            instruments: instruments
                .into_iter()
                .map(|instrument| (instrument.abbreviation.clone(), instrument))
                .collect(),
        }
    }

    /// The waveform library layout the notation was written against.
    pub fn builtin() -> Instruments {
        use InstrumentFamily::*;

        Instruments::new(vec![
            Instrument::new("imp", "impulsewave", Pitched),
            Instrument::new("i05", "impulse-05-wave", Pitched),
            Instrument::new("i25", "impulse-25-wave", Pitched),
            Instrument::new("sqr", "squarewave", Pitched),
            Instrument::new("tri", "trianglewave", Pitched),
            Instrument::new("x", "casio-drums", Percussive),
            Instrument::new("noise", "noise", Noise),
            Instrument::new("miscellaneous", "miscellaneous", Miscellaneous),
            Instrument::new("sk-5", "sk-5", Chorus),
        ])
    }

    /// Looks up an instrument by abbreviation, ignoring case.
    pub fn get(&self, abbreviation: &str) -> Option<&Instrument> {
        self.instruments.get(&abbreviation.to_lowercase())
    }

    /// Number of known instruments.
    pub fn len(&self) -> usize {
        self.instruments.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.instruments.is_empty()
    }
}

impl Default for Instruments {
    fn default() -> Self {
        Instruments::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_table() {
        let instruments = Instruments::builtin();
        assert_eq!(instruments.len(), 9);

        let sqr = instruments.get("sqr").unwrap();
        assert_eq!(sqr.directory(), "squarewave");
        assert_eq!(sqr.family(), InstrumentFamily::Pitched);
        assert!(!sqr.family().is_one_shot());

        let drums = instruments.get("x").unwrap();
        assert_eq!(drums.directory(), "casio-drums");
        assert!(drums.family().is_one_shot());

        assert_eq!(
            instruments.get("sk-5").unwrap().family(),
            InstrumentFamily::Chorus
        );
    }

    #[test]
    fn test_lookup_ignores_case() {
        let instruments = Instruments::builtin();
        assert_eq!(instruments.get("X").unwrap().abbreviation(), "x");
        assert_eq!(instruments.get("SQR").unwrap().abbreviation(), "sqr");
        assert_eq!(
            instruments.get("Miscellaneous").unwrap().directory(),
            "miscellaneous"
        );
        assert!(instruments.get("saw").is_none());
    }

    #[test]
    fn test_custom_table_replaces_duplicates() {
        let instruments = Instruments::new(vec![
            Instrument::new("SAW", "sawwave", InstrumentFamily::Pitched),
            Instrument::new("saw", "sawtooth", InstrumentFamily::Pitched),
        ]);
        assert_eq!(instruments.len(), 1);
        assert_eq!(instruments.get("saw").unwrap().directory(), "sawtooth");
        assert!(instruments.get("sqr").is_none());
    }

    #[test]
    fn test_deserialized_abbreviation_is_lowercased() {
        let instrument: Instrument = serde_json::from_str(
            r#"{"abbreviation": "SAW", "directory": "sawwave", "family": "pitched"}"#,
        )
        .unwrap();
        assert_eq!(instrument.abbreviation(), "saw");

        let note = crate::notation::resolve_note(
            &instrument,
            "C",
            None,
            crate::notation::NoteDefaults {
                octave: 4,
                length: crate::duration::NoteLength::QUARTER,
            },
        )
        .unwrap();
        assert_eq!(note.file_name(), "C4-saw.wav");
    }
}
