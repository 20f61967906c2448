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
use std::path::Path;

use config::{Config, File};
use serde::Deserialize;

use crate::duration::{NoteLength, MAX_DURATION_SECONDS};
use crate::interpreter::InterpreterState;
use crate::notation::{Instrument, Instruments, COMMAND_NAMES};

mod error;

pub use error::ConfigError;

/// The default output sample rate, used until the first sample is decoded.
pub const DEFAULT_SAMPLE_RATE: u32 = 44100;

/// The instrument used for notes written without a category.
pub const DEFAULT_INSTRUMENT: &str = "sqr";

/// The interpreter state a document starts with.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
#[serde(default)]
pub struct Defaults {
    /// Tempo in beats per minute.
    pub tempo: f64,
    /// Octave, 0 to 8.
    pub octave: u8,
    /// Note length.
    pub length: NoteLength,
    /// Volume, 0 to 100.
    pub volume: u8,
}

impl Default for Defaults {
    fn default() -> Self {
        Defaults {
            tempo: 120.0,
            octave: 4,
            length: NoteLength::QUARTER,
            volume: 100,
        }
    }
}

/// The configuration for a render.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct RenderConfig {
    /// Initial interpreter state.
    defaults: Defaults,
    /// Output sample rate used before any sample has been decoded.
    sample_rate: u32,
    /// Instrument for notes without a category.
    default_instrument: String,
    /// Whether to decode all referenced samples in parallel before rendering.
    prefetch: bool,
    /// The longest a single note, rest or chord may last, in seconds.
    max_duration: f64,
    /// Replaces the built-in instrument table when present.
    instruments: Option<Vec<Instrument>>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            defaults: Defaults::default(),
            sample_rate: DEFAULT_SAMPLE_RATE,
            default_instrument: DEFAULT_INSTRUMENT.to_string(),
            prefetch: true,
            max_duration: MAX_DURATION_SECONDS,
            instruments: None,
        }
    }
}

impl RenderConfig {
    /// Parse a render config from a YAML file.
    pub fn deserialize(path: &Path) -> Result<RenderConfig, ConfigError> {
        let config = Config::builder()
            .add_source(File::from(path))
            .build()?
            .try_deserialize::<RenderConfig>()?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that the defaults are valid interpreter state, that no instrument
    /// shadows a command and that the default instrument exists.
    pub fn validate(&self) -> Result<(), ConfigError> {
        InterpreterState::new(self.defaults).map_err(|e| ConfigError::Invalid {
            field: "defaults",
            reason: e.to_string(),
        })?;
        if self.sample_rate == 0 {
            return Err(ConfigError::Invalid {
                field: "sample_rate",
                reason: "must be greater than 0".to_string(),
            });
        }
        if self.max_duration.is_nan()
            || self.max_duration <= 0.0
            || self.max_duration > MAX_DURATION_SECONDS
        {
            return Err(ConfigError::Invalid {
                field: "max_duration",
                reason: format!(
                    "must be greater than 0 and at most {} seconds",
                    MAX_DURATION_SECONDS
                ),
            });
        }
        if let Some(instruments) = &self.instruments {
            if instruments.is_empty() {
                return Err(ConfigError::Invalid {
                    field: "instruments",
                    reason: "must not be empty".to_string(),
                });
            }
            if let Some(instrument) = instruments
                .iter()
                .find(|instrument| COMMAND_NAMES.contains(&instrument.abbreviation()))
            {
                return Err(ConfigError::Invalid {
                    field: "instruments",
                    reason: format!(
                        "'{}' is a command and cannot be an instrument",
                        instrument.abbreviation()
                    ),
                });
            }
        }
        if self.instruments().get(&self.default_instrument).is_none() {
            return Err(ConfigError::Invalid {
                field: "default_instrument",
                reason: format!("unknown instrument '{}'", self.default_instrument),
            });
        }
        Ok(())
    }

    /// Gets the initial interpreter state.
    pub fn defaults(&self) -> Defaults {
        self.defaults
    }

    /// Gets the fallback output sample rate.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Gets the default instrument abbreviation.
    pub fn default_instrument(&self) -> &str {
        &self.default_instrument
    }

    /// Whether to prefetch samples.
    pub fn prefetch(&self) -> bool {
        self.prefetch
    }

    /// Gets the longest duration a note, rest or chord may last.
    pub fn max_duration(&self) -> f64 {
        self.max_duration
    }

    /// The instrument table: the configured one, or the built-in one.
    pub fn instruments(&self) -> Instruments {
        match &self.instruments {
            Some(instruments) => Instruments::new(instruments.clone()),
            None => Instruments::builtin(),
        }
    }

    /// Replaces the initial interpreter state.
    pub fn with_defaults(mut self, defaults: Defaults) -> Self {
        self.defaults = defaults;
        self
    }

    /// Sets the longest duration a note, rest or chord may last.
    pub fn with_max_duration(mut self, max_duration: f64) -> Self {
        self.max_duration = max_duration;
        self
    }

    /// Enables or disables prefetching.
    pub fn with_prefetch(mut self, prefetch: bool) -> Self {
        self.prefetch = prefetch;
        self
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::notation::InstrumentFamily;

    fn load(yaml: &str) -> Result<RenderConfig, ConfigError> {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("render.yaml");
        fs::write(&path, yaml).unwrap();
        RenderConfig::deserialize(&path)
    }

    #[test]
    fn test_defaults() {
        let config = RenderConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.defaults().tempo, 120.0);
        assert_eq!(config.defaults().octave, 4);
        assert_eq!(config.defaults().length, NoteLength::QUARTER);
        assert_eq!(config.defaults().volume, 100);
        assert_eq!(config.sample_rate(), 44100);
        assert_eq!(config.default_instrument(), "sqr");
        assert!(config.prefetch());
        assert_eq!(config.max_duration(), MAX_DURATION_SECONDS);
        assert_eq!(config.instruments().len(), 9);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = load("defaults:\n  tempo: 90\n  length: 8\nprefetch: false\n").unwrap();
        assert_eq!(config.defaults().tempo, 90.0);
        assert_eq!(config.defaults().length, NoteLength::new(8).unwrap());
        assert_eq!(config.defaults().octave, 4);
        assert_eq!(config.defaults().volume, 100);
        assert!(!config.prefetch());
        assert_eq!(config.sample_rate(), 44100);
    }

    #[test]
    fn test_custom_instruments() {
        let config = load(
            r#"
default_instrument: saw
instruments:
  - abbreviation: saw
    directory: sawwave
    family: pitched
  - abbreviation: kit
    directory: drums
    family: percussive
"#,
        )
        .unwrap();
        let instruments = config.instruments();
        assert_eq!(instruments.len(), 2);
        assert_eq!(instruments.get("saw").unwrap().directory(), "sawwave");
        assert_eq!(
            instruments.get("kit").unwrap().family(),
            InstrumentFamily::Percussive
        );
        assert!(instruments.get("sqr").is_none());
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            load("defaults:\n  tempo: -5\n"),
            Err(ConfigError::Invalid {
                field: "defaults",
                ..
            })
        ));
        assert!(matches!(
            load("defaults:\n  octave: 9\n"),
            Err(ConfigError::Invalid { .. })
        ));
        assert!(matches!(
            load("defaults:\n  volume: 101\n"),
            Err(ConfigError::Invalid { .. })
        ));
        assert!(matches!(
            load("sample_rate: 0\n"),
            Err(ConfigError::Invalid {
                field: "sample_rate",
                ..
            })
        ));
        assert!(matches!(
            load("default_instrument: kazoo\n"),
            Err(ConfigError::Invalid {
                field: "default_instrument",
                ..
            })
        ));
    }

    #[test]
    fn test_max_duration() {
        assert_eq!(load("max_duration: 60\n").unwrap().max_duration(), 60.0);
        for yaml in ["max_duration: 0\n", "max_duration: -1\n", "max_duration: 100000\n"] {
            assert!(matches!(
                load(yaml),
                Err(ConfigError::Invalid {
                    field: "max_duration",
                    ..
                })
            ));
        }
    }

    #[test]
    fn test_instruments_cannot_shadow_commands() {
        for abbreviation in ["r", "chord", "tempo", "octave", "length", "volume", "Tempo"] {
            let yaml = format!(
                "instruments:\n  - {{ abbreviation: sqr, directory: squarewave, family: pitched }}\n  - {{ abbreviation: {}, directory: other, family: pitched }}\n",
                abbreviation
            );
            assert!(
                matches!(
                    load(&yaml),
                    Err(ConfigError::Invalid {
                        field: "instruments",
                        ..
                    })
                ),
                "{}",
                abbreviation
            );
        }
    }

    #[test]
    fn test_configured_abbreviations_are_lowercased() {
        let config = load(
            "default_instrument: saw\ninstruments:\n  - { abbreviation: SAW, directory: sawwave, family: pitched }\n",
        )
        .unwrap();
        let instruments = config.instruments();
        assert_eq!(instruments.get("Saw").unwrap().abbreviation(), "saw");
    }

    #[test]
    fn test_invalid_length_fails_to_parse() {
        assert!(matches!(
            load("defaults:\n  length: 3\n"),
            Err(ConfigError::Load(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            RenderConfig::deserialize(&dir.path().join("missing.yaml")),
            Err(ConfigError::Load(_))
        ));
    }
}
