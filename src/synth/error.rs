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
use std::path::PathBuf;

use crate::duration::DurationError;
use crate::samples::SampleError;

/// Errors rendering a single note or chord. The interpreter skips the command.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Sample decode failure: {0}")]
    SampleDecodeFailure(#[from] SampleError),

    #[error("Invalid duration: {0}")]
    InvalidDuration(#[from] DurationError),

    #[error("Sample {} has {found} channels, output has {expected}", .path.display())]
    ChannelMismatch {
        path: PathBuf,
        expected: u16,
        found: u16,
    },

    #[error("Chord has no playable members")]
    EmptyChord,
}
