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
use std::error::Error;
use std::fs::{self, File};
use std::path::Path;

use hound::{SampleFormat, WavSpec, WavWriter};

/// Writes interleaved f32 samples to a 32-bit float WAV file, creating parent
/// directories as needed.
pub fn write_wav(
    path: &Path,
    samples: &[f32],
    sample_rate: u32,
    channels: u16,
) -> Result<(), Box<dyn Error>> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tempwav = File::create(path)?;

    let mut writer = WavWriter::new(
        tempwav,
        WavSpec {
            channels,
            sample_rate,
            bits_per_sample: 32,
            sample_format: SampleFormat::Float,
        },
    )?;
    for sample in samples {
        writer.write_sample(*sample)?;
    }
    writer.finalize()?;

    Ok(())
}

/// A mono sample of `frames` frames, all at the given amplitude.
pub fn constant(amplitude: f32, frames: usize) -> Vec<f32> {
    vec![amplitude; frames]
}

/// A mono ramp 1, 2, ... `frames`, scaled down so it stays within [-1, 1]. Useful to
/// see where a loop restarts.
pub fn ramp(frames: usize) -> Vec<f32> {
    (1..=frames).map(|i| i as f32 / 1024.0).collect()
}
