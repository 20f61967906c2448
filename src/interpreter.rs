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

//! The command interpreter.
//!
//! Interpretation happens in two passes. The first walks the tokens in document
//! order, tracks the global state and turns every token into a [`CommandRecord`].
//! The second renders the records into one buffer. Invalid commands are logged and
//! skipped; they never stop a document.

mod state;

use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::config::{ConfigError, RenderConfig};
use crate::duration::{frame_count, resolve_duration};
use crate::notation::{
    explicit_seconds, resolve_note, split_command, tokenize, CommandRecord, Instruments,
    NotationError, NoteDescriptor, RecordKind, Token,
};
use crate::samples::Decoder;
use crate::synth::{AudioFormat, RenderError, Synthesizer};

pub use state::InterpreterState;

/// The result of rendering a document.
#[derive(Debug, Clone, PartialEq)]
pub struct Rendering {
    /// Interleaved samples.
    pub samples: Vec<f32>,
    pub format: AudioFormat,
    /// Number of commands in the document, valid or not.
    pub commands: usize,
    /// Commands that were skipped because they were invalid or failed to render.
    pub skipped: usize,
}

impl Rendering {
    /// Number of frames.
    pub fn frames(&self) -> usize {
        self.samples.len() / self.format.channels.max(1) as usize
    }

    /// Duration in seconds.
    pub fn duration(&self) -> f64 {
        self.frames() as f64 / self.format.sample_rate as f64
    }
}

/// The notated length of a document, computed without decoding any samples.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NotatedDuration {
    pub seconds: f64,
    /// Notes and chords whose length depends on their sample.
    pub untimed: usize,
}

/// Interprets notation documents.
pub struct Interpreter {
    config: RenderConfig,
    instruments: Instruments,
    initial_state: InterpreterState,
}

impl Interpreter {
    /// Creates a new interpreter.
    pub fn new(config: RenderConfig) -> Result<Interpreter, ConfigError> {
        config.validate()?;
        let initial_state =
            InterpreterState::new(config.defaults()).map_err(|e| ConfigError::Invalid {
                field: "defaults",
                reason: e.to_string(),
            })?;

        Ok(Interpreter {
            instruments: config.instruments(),
            config,
            initial_state,
        })
    }

    /// Gets the configuration.
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Interprets a document without rendering it. Every token becomes a record;
    /// invalid tokens become `Unknown` records carrying the error.
    pub fn inspect(&self, content: &str) -> Result<Vec<CommandRecord>, NotationError> {
        let tokens = tokenize(content)?;
        let mut state = self.initial_state;
        let mut records = Vec::with_capacity(tokens.len());

        let mut index = 0;
        while index < tokens.len() {
            let token = tokens[index];
            index += 1;

            // A duration directly after a note, rest or chord belongs to it.
            let mut source = token.text.to_string();
            let mut duration = None;
            if takes_duration(token.text) {
                if let Some(next) = tokens.get(index) {
                    if let Some(seconds) = explicit_seconds(next.text) {
                        source = format!("{} {}", token.text, next.text);
                        duration = Some((seconds, next.text));
                        index += 1;
                    }
                }
            }

            let kind = match self
                .interpret(token, duration, &mut state)
                .and_then(|kind| self.check_duration(&source, kind))
            {
                Ok(kind) => kind,
                Err(e) => {
                    warn!(
                        line = token.line,
                        column = token.column,
                        token = %source,
                        error = %e,
                        "Skipping invalid command"
                    );
                    RecordKind::Unknown {
                        error: e.to_string(),
                    }
                }
            };

            records.push(CommandRecord {
                source,
                line: token.line,
                column: token.column,
                kind,
            });
        }

        Ok(records)
    }

    /// Interprets and renders a document.
    ///
    /// Fails only if the document cannot be tokenized or contains no valid commands.
    /// Rests are rendered at the output format: the format of the first usable sample,
    /// or the configured sample rate in mono if there is none.
    pub fn render<D: Decoder>(
        &self,
        content: &str,
        synth: &mut Synthesizer<D>,
    ) -> Result<Rendering, NotationError> {
        let records = self.inspect(content)?;
        if !records.iter().any(CommandRecord::is_valid) {
            return Err(NotationError::NoValidCommands);
        }

        if self.config.prefetch() {
            let paths: Vec<PathBuf> = records
                .iter()
                .flat_map(notes)
                .map(|note| synth.sample_path(note))
                .collect();
            synth.store_mut().prefetch(&paths);
        }

        let format = match synth.format() {
            Some(format) => format,
            None => records
                .iter()
                .flat_map(notes)
                .find_map(|note| synth.prepare(note).ok())
                .unwrap_or(AudioFormat {
                    sample_rate: self.config.sample_rate(),
                    channels: 1,
                }),
        };

        let mut samples = Vec::new();
        let mut skipped = records.iter().filter(|record| !record.is_valid()).count();
        for record in &records {
            let rendered = match &record.kind {
                RecordKind::Rest { seconds } => frame_count(*seconds, format.sample_rate)
                    .map(|frames| (vec![0.0; frames * format.channels as usize], 1.0))
                    .map_err(RenderError::from),
                RecordKind::Note {
                    note,
                    tempo,
                    volume,
                } => synth
                    .render(note, *tempo)
                    .map(|buffer| (buffer, state::gain(*volume))),
                RecordKind::Chord {
                    notes,
                    tempo,
                    volume,
                    ..
                } => synth
                    .render_chord(notes, *tempo)
                    .map(|buffer| (buffer, state::gain(*volume))),
                _ => continue,
            };

            match rendered {
                Ok((buffer, gain)) if samples.len().checked_add(buffer.len()).is_some() => {
                    samples.extend(buffer.into_iter().map(|sample| sample * gain));
                }
                Ok(_) => {
                    warn!(
                        line = record.line,
                        column = record.column,
                        token = %record.source,
                        "Skipping command, the rendering is too long"
                    );
                    skipped += 1;
                }
                Err(e) => {
                    warn!(
                        line = record.line,
                        column = record.column,
                        token = %record.source,
                        error = %e,
                        "Skipping command that failed to render"
                    );
                    skipped += 1;
                }
            }
        }

        let rendering = Rendering {
            samples,
            format,
            commands: records.len(),
            skipped,
        };
        info!(
            commands = rendering.commands,
            skipped = rendering.skipped,
            frames = rendering.frames(),
            sample_rate = format.sample_rate,
            channels = format.channels,
            "Rendered notation"
        );
        Ok(rendering)
    }

    fn interpret(
        &self,
        token: Token<'_>,
        duration: Option<(f64, &str)>,
        state: &mut InterpreterState,
    ) -> Result<RecordKind, NotationError> {
        if explicit_seconds(token.text).is_some() {
            return Err(NotationError::malformed(
                token.text,
                "duration does not follow a note, rest or chord",
            ));
        }

        let explicit = match duration {
            Some((seconds, _)) if seconds > 0.0 => Some(seconds),
            Some((_, text)) => {
                return Err(NotationError::invalid(
                    "duration",
                    text,
                    "a positive number of seconds",
                ))
            }
            None => None,
        };

        let (command, argument) = split_command(token.text);
        let command = command.map(str::to_lowercase);
        match command.as_deref() {
            Some("tempo") => {
                let bpm = state.set_tempo(argument)?;
                debug!(tempo = bpm, "Tempo changed");
                Ok(RecordKind::Tempo { bpm })
            }
            Some("octave") => {
                let octave = state.set_octave(argument)?;
                debug!(octave, "Octave changed");
                Ok(RecordKind::Octave { octave })
            }
            Some("length") => {
                let length = state.set_length(argument)?;
                debug!(length = length.denominator(), "Length changed");
                Ok(RecordKind::Length { length })
            }
            Some("volume") => {
                let volume = state.set_volume(argument)?;
                debug!(volume, "Volume changed");
                Ok(RecordKind::Volume { volume })
            }
            Some("r") => rest(argument, explicit, state),
            Some("chord") => self.chord(token, argument, explicit, state),
            category => {
                let note = self.resolve(token.text, category, argument, explicit, state)?;
                Ok(RecordKind::Note {
                    note,
                    tempo: state.tempo(),
                    volume: state.volume(),
                })
            }
        }
    }

    /// Rejects notes, rests and chords that last longer than the configured maximum.
    fn check_duration(
        &self,
        source: &str,
        kind: RecordKind,
    ) -> Result<RecordKind, NotationError> {
        let seconds = match &kind {
            RecordKind::Rest { seconds } => Some(*seconds),
            RecordKind::Note { note, tempo, .. } => note.target_seconds(*tempo).ok().flatten(),
            RecordKind::Chord { notes, tempo, .. } => notes
                .first()
                .and_then(|note| note.target_seconds(*tempo).ok().flatten()),
            _ => None,
        };

        match seconds {
            Some(seconds) if seconds > self.config.max_duration() => {
                Err(NotationError::malformed(
                    source,
                    format!(
                        "lasts {} seconds, longer than the maximum of {} seconds",
                        seconds,
                        self.config.max_duration()
                    ),
                ))
            }
            _ => Ok(kind),
        }
    }

    fn chord(
        &self,
        token: Token<'_>,
        argument: &str,
        explicit: Option<f64>,
        state: &InterpreterState,
    ) -> Result<RecordKind, NotationError> {
        let mut members: Vec<&str> = argument.split(',').collect();

        let mut seconds = explicit;
        if let Some(trailing) = members.last().and_then(|member| explicit_seconds(member)) {
            members.pop();
            if seconds.is_some() {
                warn!(
                    line = token.line,
                    column = token.column,
                    "Chord has two durations, using the one after the chord"
                );
            } else if trailing > 0.0 {
                seconds = Some(trailing);
            } else {
                return Err(NotationError::invalid(
                    "chord duration",
                    &format!("{}s", trailing),
                    "a positive number of seconds",
                ));
            }
        }

        let mut notes = Vec::with_capacity(members.len());
        for member in members {
            if member.is_empty() {
                continue;
            }
            if explicit_seconds(member).is_some() {
                warn!(
                    line = token.line,
                    column = token.column,
                    member,
                    "Ignoring duration inside chord, only a trailing duration applies"
                );
                continue;
            }

            let (category, spec) = split_command(member);
            match self.resolve(member, category, spec, seconds, state) {
                Ok(note) => notes.push(note),
                Err(e) => warn!(
                    line = token.line,
                    column = token.column,
                    member,
                    error = %e,
                    "Skipping invalid chord member"
                ),
            }
        }

        if notes.is_empty() {
            return Err(NotationError::malformed(
                token.text,
                "chord has no valid members",
            ));
        }

        Ok(RecordKind::Chord {
            notes,
            seconds,
            tempo: state.tempo(),
            volume: state.volume(),
        })
    }

    fn resolve(
        &self,
        source: &str,
        category: Option<&str>,
        spec: &str,
        explicit: Option<f64>,
        state: &InterpreterState,
    ) -> Result<NoteDescriptor, NotationError> {
        let abbreviation = category.unwrap_or(self.config.default_instrument());
        let instrument = self.instruments.get(abbreviation).ok_or_else(|| {
            NotationError::malformed(source, format!("unknown instrument '{}'", abbreviation))
        })?;
        resolve_note(instrument, spec, explicit, state.note_defaults())
    }
}

fn rest(
    argument: &str,
    explicit: Option<f64>,
    state: &InterpreterState,
) -> Result<RecordKind, NotationError> {
    const EXPECTED: &str = "a note length or a positive number of seconds";

    let from_argument = if argument.is_empty() {
        None
    } else if let Some(seconds) = explicit_seconds(argument) {
        if seconds <= 0.0 {
            return Err(NotationError::invalid("rest", argument, EXPECTED));
        }
        Some(seconds)
    } else {
        let length = state::parse_length(argument)
            .ok_or_else(|| NotationError::invalid("rest", argument, EXPECTED))?;
        let seconds = resolve_duration(0.0, length.denominator(), state.tempo())
            .map_err(|e| NotationError::malformed(argument, e.to_string()))?;
        Some(seconds)
    };

    // A duration after the rest wins over its argument.
    match explicit.or(from_argument) {
        Some(seconds) => Ok(RecordKind::Rest { seconds }),
        None => Err(NotationError::invalid("rest", argument, EXPECTED)),
    }
}

/// Global state commands never take a following duration, and neither does a
/// duration itself.
fn takes_duration(token: &str) -> bool {
    if explicit_seconds(token).is_some() {
        return false;
    }
    !matches!(
        split_command(token).0.map(str::to_lowercase).as_deref(),
        Some("tempo" | "octave" | "length" | "volume")
    )
}

/// The notes a record plays.
fn notes(record: &CommandRecord) -> &[NoteDescriptor] {
    match &record.kind {
        RecordKind::Note { note, .. } => std::slice::from_ref(note),
        RecordKind::Chord { notes, .. } => notes,
        _ => &[],
    }
}

/// Sums the notated length of the records. Rests, and notes and chords with a length
/// or explicit duration, count. A chord lasts as long as its first member.
pub fn notated_duration(records: &[CommandRecord]) -> NotatedDuration {
    let mut total = NotatedDuration {
        seconds: 0.0,
        untimed: 0,
    };

    for record in records {
        let seconds = match &record.kind {
            RecordKind::Rest { seconds } => Some(*seconds),
            RecordKind::Note { note, tempo, .. } => note.target_seconds(*tempo).ok().flatten(),
            RecordKind::Chord { notes, tempo, .. } => notes
                .first()
                .and_then(|note| note.target_seconds(*tempo).ok().flatten()),
            _ => continue,
        };

        match seconds {
            Some(seconds) => total.seconds += seconds,
            None => total.untimed += 1,
        }
    }

    total
}
