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
use std::fs;
use std::path::{Path, PathBuf};

use clap::{crate_version, Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use mmlrender::interpreter::notated_duration;
use mmlrender::output::{self, OutputKind};
use mmlrender::samples::SampleStore;
use mmlrender::{Interpreter, RenderConfig, Synthesizer};

/// Where `render` writes when no output path is given.
const DEFAULT_OUTPUT: &str = "output.pcm";

#[derive(Parser)]
#[clap(
    author = "Michael Wilson",
    version = crate_version!(),
    about = "Renders music macro notation to PCM audio."
)]
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Renders a notation file with the given sample library.
    Render {
        /// The path to the sample library.
        library: PathBuf,
        /// The path to the notation file.
        notation: PathBuf,
        /// The output path. Files ending in .wav are written as WAV, anything else as
        /// raw little-endian f32 samples.
        output: Option<PathBuf>,
        /// The path to a render config.
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Prints the interpreted commands of a notation file without rendering it.
    Inspect {
        /// The path to the notation file.
        notation: PathBuf,
        /// The output format.
        #[arg(short, long, value_enum, default_value_t = Format::Json)]
        format: Format,
        /// The path to a render config.
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Prints the notated duration of a notation file in seconds.
    Duration {
        /// The path to the notation file.
        notation: PathBuf,
        /// The path to a render config.
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Yaml,
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Render {
            library,
            notation,
            output,
            config,
        } => {
            let interpreter = interpreter(config.as_deref())?;
            let content = read_notation(&notation)?;
            let mut synth = Synthesizer::new(library, SampleStore::with_symphonia());

            let rendering = interpreter.render(&content, &mut synth)?;
            if rendering.samples.is_empty() {
                return Err(format!("Rendering {} produced no audio", notation.display()).into());
            }

            let output_path = output.unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));
            if output::write(&output_path, &rendering)? == OutputKind::RawF32 {
                info!(
                    "Play with: ffplay -f f32le -ar {} -ch_layout {} {}",
                    rendering.format.sample_rate,
                    if rendering.format.channels == 1 {
                        "mono".to_string()
                    } else {
                        format!("{}c", rendering.format.channels)
                    },
                    output_path.display()
                );
            }

            println!(
                "Rendered {:.3}s to {} ({} commands, {} skipped).",
                rendering.duration(),
                output_path.display(),
                rendering.commands,
                rendering.skipped
            );
        }
        Commands::Inspect {
            notation,
            format,
            config,
        } => {
            let records = interpreter(config.as_deref())?.inspect(&read_notation(&notation)?)?;
            match format {
                Format::Json => println!("{}", serde_json::to_string_pretty(&records)?),
                Format::Yaml => print!("{}", serde_yml::to_string(&records)?),
            }
        }
        Commands::Duration { notation, config } => {
            let records = interpreter(config.as_deref())?.inspect(&read_notation(&notation)?)?;
            let duration = notated_duration(&records);
            println!("{:.3}", duration.seconds);
            if duration.untimed > 0 {
                println!(
                    "{} notes or chords play for the natural length of their sample and are not counted.",
                    duration.untimed
                );
            }
        }
    }

    Ok(())
}

fn interpreter(config: Option<&Path>) -> Result<Interpreter, Box<dyn Error>> {
    let config = match config {
        Some(path) => RenderConfig::deserialize(path)?,
        None => RenderConfig::default(),
    };
    Ok(Interpreter::new(config)?)
}

fn read_notation(path: &Path) -> Result<String, Box<dyn Error>> {
    fs::read_to_string(path)
        .map_err(|e| format!("Failed to read notation file {}: {}", path.display(), e).into())
}
