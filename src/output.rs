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

//! Writes rendered audio to disk.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use hound::{SampleFormat, WavSpec, WavWriter};
use tracing::info;

use crate::interpreter::Rendering;

#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    #[error("Failed to write WAV output: {0}")]
    Wav(#[from] hound::Error),

    #[error("Failed to write PCM output: {0}")]
    Io(#[from] std::io::Error),
}

/// How the output was encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    /// 32-bit float WAV.
    Wav,
    /// Headerless little-endian f32 samples.
    RawF32,
}

impl OutputKind {
    /// `.wav` paths get a WAV file, anything else raw samples.
    pub fn for_path(path: &Path) -> OutputKind {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("wav") => OutputKind::Wav,
            _ => OutputKind::RawF32,
        }
    }
}

/// Writes the rendering to the given path, choosing the encoding from the extension.
pub fn write(path: &Path, rendering: &Rendering) -> Result<OutputKind, OutputError> {
    let kind = OutputKind::for_path(path);
    match kind {
        OutputKind::Wav => write_wav(path, rendering)?,
        OutputKind::RawF32 => write_raw(path, rendering)?,
    }

    info!(
        path = ?path,
        kind = ?kind,
        sample_rate = rendering.format.sample_rate,
        channels = rendering.format.channels,
        duration_secs = rendering.duration(),
        "Wrote output"
    );
    Ok(kind)
}

fn write_wav(path: &Path, rendering: &Rendering) -> Result<(), OutputError> {
    let mut writer = WavWriter::create(
        path,
        WavSpec {
            channels: rendering.format.channels,
            sample_rate: rendering.format.sample_rate,
            bits_per_sample: 32,
            sample_format: SampleFormat::Float,
        },
    )?;
    for sample in &rendering.samples {
        writer.write_sample(*sample)?;
    }
    writer.finalize()?;
    Ok(())
}

fn write_raw(path: &Path, rendering: &Rendering) -> Result<(), OutputError> {
    let mut writer = BufWriter::new(File::create(path)?);
    for sample in &rendering.samples {
        writer.write_all(&sample.to_le_bytes())?;
    }
    writer.flush()?;
    Ok(())
}
