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

use super::note::NoteDescriptor;
use crate::duration::NoteLength;

/// Command names that come before the ':' of a token. They take precedence over
/// instrument abbreviations.
pub const COMMAND_NAMES: &[&str] = &["tempo", "octave", "length", "volume", "r", "chord"];

/// One interpreted command, in document order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommandRecord {
    /// The source token. Includes a consumed duration token, e.g. `sqr:C 1s`.
    pub source: String,
    pub line: usize,
    pub column: usize,
    #[serde(flatten)]
    pub kind: RecordKind,
}

impl CommandRecord {
    /// Whether the command was accepted.
    pub fn is_valid(&self) -> bool {
        !matches!(self.kind, RecordKind::Unknown { .. })
    }
}

/// What a command does. Notes and chords carry the tempo and volume that were in
/// effect when they were read.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RecordKind {
    Tempo {
        bpm: f64,
    },
    Octave {
        octave: u8,
    },
    Length {
        length: NoteLength,
    },
    Volume {
        volume: u8,
    },
    Rest {
        seconds: f64,
    },
    Note {
        note: NoteDescriptor,
        tempo: f64,
        volume: u8,
    },
    Chord {
        notes: Vec<NoteDescriptor>,
        seconds: Option<f64>,
        tempo: f64,
        volume: u8,
    },
    Unknown {
        error: String,
    },
}
