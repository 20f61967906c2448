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

//! Sample decoding and caching.
//!
//! Samples are decoded entirely into memory the first time they are used and kept
//! for the rest of the run.

mod decoder;
mod error;
mod store;

pub use decoder::{DecodedAudio, Decoder, SymphoniaDecoder};
pub use error::SampleError;
pub use store::{SampleAsset, SampleStore};

#[cfg(test)]
pub(crate) use decoder::memory::MemoryDecoder;
