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

//! Turns resolved notes into sample buffers.
//!
//! Pitched instruments loop their sample to fill the note. Every other family plays
//! the sample once, then pads with silence or truncates.

mod chord;
mod error;

use std::path::{Path, PathBuf};

use tracing::warn;

use crate::duration::{frame_count, DurationError};
use crate::notation::NoteDescriptor;
use crate::samples::{Decoder, SampleStore, SymphoniaDecoder};

pub use chord::mix;
pub use error::RenderError;

/// Sample rate and channel count of rendered audio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioFormat {
    pub sample_rate: u32,
    pub channels: u16,
}

/// Renders notes and chords from a sample library.
pub struct Synthesizer<D: Decoder = SymphoniaDecoder> {
    /// Root of the sample library.
    library: PathBuf,
    store: SampleStore<D>,
    /// Set by the first sample used. All later samples must match its channel count.
    format: Option<AudioFormat>,
}

impl<D: Decoder> Synthesizer<D> {
    /// Creates a new synthesizer over the given library.
    pub fn new(library: impl Into<PathBuf>, store: SampleStore<D>) -> Self {
        Self {
            library: library.into(),
            store,
            format: None,
        }
    }

    /// Gets the library root.
    pub fn library(&self) -> &Path {
        &self.library
    }

    /// Gets the sample store.
    pub fn store(&self) -> &SampleStore<D> {
        &self.store
    }

    /// Gets the sample store mutably.
    pub fn store_mut(&mut self) -> &mut SampleStore<D> {
        &mut self.store
    }

    /// The output format, once a sample has been used.
    pub fn format(&self) -> Option<AudioFormat> {
        self.format
    }

    /// The sample path for a note.
    pub fn sample_path(&self, note: &NoteDescriptor) -> PathBuf {
        note.sample_path(&self.library)
    }

    /// Loads the sample for a note and returns the output format, establishing it from
    /// this sample if nothing has been rendered yet.
    pub fn prepare(&mut self, note: &NoteDescriptor) -> Result<AudioFormat, RenderError> {
        let path = self.sample_path(note);
        let asset = self.store.load(&path)?;
        Ok(*self.format.get_or_insert(AudioFormat {
            sample_rate: asset.sample_rate(),
            channels: asset.channels(),
        }))
    }

    /// Renders a single note at the given tempo.
    ///
    /// The target duration is the note's explicit duration, else its length at the
    /// tempo, else the sample's natural duration. The buffer holds
    /// `round(target * rate)` frames at the sample's own rate.
    pub fn render(&mut self, note: &NoteDescriptor, tempo_bpm: f64) -> Result<Vec<f32>, RenderError> {
        let path = self.sample_path(note);
        let target = note.target_seconds(tempo_bpm)?;
        let asset = self.store.load(&path)?;

        match self.format {
            None => {
                self.format = Some(AudioFormat {
                    sample_rate: asset.sample_rate(),
                    channels: asset.channels(),
                })
            }
            Some(format) if format.channels != asset.channels() => {
                return Err(RenderError::ChannelMismatch {
                    path,
                    expected: format.channels,
                    found: asset.channels(),
                });
            }
            Some(format) if format.sample_rate != asset.sample_rate() => {
                warn!(
                    path = ?path,
                    sample_rate = asset.sample_rate(),
                    output_rate = format.sample_rate,
                    "Sample rate differs from output, playing without conversion"
                );
            }
            Some(_) => {}
        }

        let seconds = target.unwrap_or_else(|| asset.natural_duration());
        let frames = frame_count(seconds, asset.sample_rate())?;
        if frames == 0 {
            return Err(DurationError::InvalidArgument(format!(
                "{} seconds is shorter than one frame",
                seconds
            ))
            .into());
        }

        let len = frames * asset.channels() as usize;
        if note.instrument.family().is_one_shot() {
            Ok(one_shot(asset.samples(), len))
        } else {
            Ok(sustain(asset.samples(), len))
        }
    }

    /// Renders the notes of a chord and mixes them. Members that fail to render are
    /// logged and left out.
    pub fn render_chord(
        &mut self,
        notes: &[NoteDescriptor],
        tempo_bpm: f64,
    ) -> Result<Vec<f32>, RenderError> {
        let mut voices = Vec::with_capacity(notes.len());
        for note in notes {
            match self.render(note, tempo_bpm) {
                Ok(voice) => voices.push(voice),
                Err(e) => warn!(sample = %note.file_name(), error = %e, "Skipping chord member"),
            }
        }

        if voices.is_empty() {
            return Err(RenderError::EmptyChord);
        }
        Ok(mix(voices))
    }
}

/// Plays the source once, then pads with silence or truncates to `len` samples.
fn one_shot(source: &[f32], len: usize) -> Vec<f32> {
    let mut buffer = source[..len.min(source.len())].to_vec();
    buffer.resize(len, 0.0);
    buffer
}

/// Tiles the source until `len` samples are filled. The last copy may be partial.
fn sustain(source: &[f32], len: usize) -> Vec<f32> {
    source.iter().copied().cycle().take(len).collect()
}
