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
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{debug, info, warn};

use super::decoder::{DecodedAudio, Decoder, SymphoniaDecoder};
use super::error::SampleError;

/// A decoded sample held in memory for the rest of the run.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleAsset {
    /// The sample data as f32 samples (interleaved if multi-channel).
    samples: Vec<f32>,
    /// Sample rate of the audio data.
    sample_rate: u32,
    /// Number of channels in the sample.
    channels: u16,
}

impl SampleAsset {
    /// Gets the interleaved samples.
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Gets the sample rate.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Gets the channel count.
    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// Number of frames (samples per channel).
    pub fn frames(&self) -> usize {
        self.samples.len() / self.channels as usize
    }

    /// Duration of the sample in seconds.
    pub fn natural_duration(&self) -> f64 {
        self.samples.len() as f64 / (self.sample_rate as f64 * self.channels as f64)
    }

    /// Returns the memory size in bytes.
    pub fn memory_size(&self) -> usize {
        self.samples.len() * std::mem::size_of::<f32>()
    }
}

/// Decodes samples on first use and keeps them for the rest of the run.
///
/// Failures are remembered as well, so each path is decoded at most once.
pub struct SampleStore<D: Decoder = SymphoniaDecoder> {
    decoder: D,
    /// Cache of loaded samples by file path.
    cache: HashMap<PathBuf, SampleAsset>,
    /// Paths that failed to decode.
    failed: HashSet<PathBuf>,
}

impl SampleStore<SymphoniaDecoder> {
    /// Creates a store decoding from disk with symphonia.
    pub fn with_symphonia() -> Self {
        SampleStore::new(SymphoniaDecoder)
    }
}

impl<D: Decoder> SampleStore<D> {
    /// Creates a new sample store.
    pub fn new(decoder: D) -> Self {
        Self {
            decoder,
            cache: HashMap::new(),
            failed: HashSet::new(),
        }
    }

    /// Gets the decoder.
    pub fn decoder(&self) -> &D {
        &self.decoder
    }

    /// Loads a sample, returning the cached version if already loaded.
    pub fn load(&mut self, path: &Path) -> Result<&SampleAsset, SampleError> {
        if self.cache.contains_key(path) {
            debug!(path = ?path, "Using cached sample");
            return Ok(&self.cache[path]);
        }
        if self.failed.contains(path) {
            return Err(SampleError::Unavailable {
                path: path.to_path_buf(),
            });
        }

        let decoded = self.decoder.decode(path);
        self.admit(path, decoded)
    }

    /// Decodes the given paths in parallel, skipping duplicates and paths already
    /// cached or known to fail. Failures are logged and remembered; they surface
    /// again when the path is loaded.
    pub fn prefetch(&mut self, paths: &[PathBuf]) {
        let mut seen = HashSet::new();
        let pending: Vec<&PathBuf> = paths
            .iter()
            .filter(|path| !self.cache.contains_key(*path) && !self.failed.contains(*path))
            .filter(|path| seen.insert(*path))
            .collect();
        if pending.is_empty() {
            return;
        }

        info!(samples = pending.len(), "Prefetching samples");
        let decoder = &self.decoder;
        let decoded: Vec<(&PathBuf, Result<DecodedAudio, SampleError>)> = pending
            .par_iter()
            .map(|path| (*path, decoder.decode(path)))
            .collect();

        // Results come back in input order, so insertion is deterministic.
        for (path, result) in decoded {
            if let Err(e) = self.admit(path, result) {
                warn!(path = ?path, error = %e, "Failed to prefetch sample");
            }
        }
    }

    /// Whether the path has been decoded successfully.
    pub fn is_cached(&self, path: &Path) -> bool {
        self.cache.contains_key(path)
    }

    /// Number of cached samples.
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// Whether nothing has been cached yet.
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// Returns the total memory used by cached samples.
    pub fn total_memory_usage(&self) -> usize {
        self.cache.values().map(|s| s.memory_size()).sum()
    }

    fn admit(
        &mut self,
        path: &Path,
        decoded: Result<DecodedAudio, SampleError>,
    ) -> Result<&SampleAsset, SampleError> {
        let audio = match decoded {
            Ok(audio) if audio.channels > 0 && audio.sample_rate > 0 && !audio.samples.is_empty() => {
                audio
            }
            Ok(_) => {
                self.failed.insert(path.to_path_buf());
                return Err(SampleError::Empty {
                    path: path.to_path_buf(),
                });
            }
            Err(e) => {
                self.failed.insert(path.to_path_buf());
                return Err(e);
            }
        };

        let asset = SampleAsset {
            samples: audio.samples,
            sample_rate: audio.sample_rate,
            channels: audio.channels,
        };
        info!(
            path = ?path,
            channels = asset.channels,
            sample_rate = asset.sample_rate,
            duration_ms = (asset.natural_duration() * 1000.0).round() as u64,
            memory_kb = asset.memory_size() / 1024,
            "Sample loaded"
        );

        Ok(&*self.cache.entry(path.to_path_buf()).or_insert(asset))
    }
}
