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

//! Renders music macro notation to PCM audio from a library of waveform samples.

pub mod config;
pub mod duration;
pub mod interpreter;
pub mod notation;
pub mod output;
pub mod samples;
pub mod synth;
#[cfg(test)]
pub(crate) mod testutil;

pub use config::RenderConfig;
pub use interpreter::{Interpreter, Rendering};
pub use synth::Synthesizer;
