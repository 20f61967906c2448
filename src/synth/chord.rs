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

/// Mixes rendered voices into one buffer.
///
/// The first voice sets the length of the result; later voices are summed sample by
/// sample over the overlap and anything beyond it is dropped. If any summed sample
/// exceeds 1.0 in magnitude, the whole buffer is hard clipped to [-1, 1].
pub fn mix<I>(voices: I) -> Vec<f32>
where
    I: IntoIterator<Item = Vec<f32>>,
{
    let mut voices = voices.into_iter();
    let Some(mut mixed) = voices.next() else {
        return Vec::new();
    };

    for voice in voices {
        for (out, sample) in mixed.iter_mut().zip(voice) {
            *out += sample;
        }
    }

    if mixed.iter().any(|sample| sample.abs() > 1.0) {
        for sample in mixed.iter_mut() {
            *sample = sample.clamp(-1.0, 1.0);
        }
    }

    mixed
}
