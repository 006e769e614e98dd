//! metronome - practice metronome for the terminal
//!
//! Run with: cargo run -- play --bpm 96 --pattern 6/8

mod app;
mod ui;

use std::{fs::File, path::PathBuf, sync::Mutex};

use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::{Result as EyreResult, WrapErr};
use tracing_subscriber::EnvFilter;

use app::Settings;
use practice_metronome::{config::MetronomeConfig, pattern::AccentPattern, synth::Sound};

#[derive(Parser, Debug)]
#[command(author, version, about = "Practice metronome with a terminal UI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Open the interactive metronome.
    Play {
        #[command(flatten)]
        tempo: TempoArgs,
        /// Count down an exercise of this many minutes.
        #[arg(long)]
        minutes: Option<u64>,
    },
    /// Render clicks to a WAV file without touching the audio device.
    Bounce {
        #[command(flatten)]
        tempo: TempoArgs,
        #[arg(long)]
        out: PathBuf,
        #[arg(long, default_value_t = 4)]
        bars: u32,
        #[arg(long, default_value_t = 48_000)]
        sample_rate: u32,
    },
}

#[derive(Args, Debug, Clone)]
struct TempoArgs {
    /// Beats per minute (20-300).
    #[arg(long)]
    bpm: Option<i32>,
    /// click, woodblock or beep.
    #[arg(long)]
    sound: Option<Sound>,
    /// Preset name (4/4, 3/4, 6/8, 2&4, exercise-1, exercise-2) or X/. notation.
    #[arg(long)]
    pattern: Option<AccentPattern>,
    /// JSON settings file; flags override its values.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Write logs here. The interactive UI logs nowhere without it.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl TempoArgs {
    fn settings(&self) -> EyreResult<Settings> {
        let config = match &self.config {
            Some(path) => MetronomeConfig::load(path)
                .wrap_err_with(|| format!("failed to load config {}", path.display()))?,
            None => MetronomeConfig::default(),
        };
        let pattern = match &self.pattern {
            Some(pattern) => pattern.clone(),
            None => config
                .accent_pattern()
                .wrap_err("invalid pattern in config")?,
        };

        Ok(Settings {
            bpm: self.bpm.unwrap_or(config.bpm),
            sound: self.sound.unwrap_or(config.sound),
            pattern,
        })
    }
}

fn init_tracing(log_file: Option<&PathBuf>, stderr_fallback: bool) -> EyreResult<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match log_file {
        Some(path) => {
            let file = File::create(path)
                .wrap_err_with(|| format!("failed to create log file {}", path.display()))?;
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init();
        }
        // Logging to stderr would draw over the terminal UI
        None if stderr_fallback => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .try_init();
        }
        None => {}
    }
    Ok(())
}

fn main() -> EyreResult<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    match cli.command {
        Command::Play { tempo, minutes } => {
            init_tracing(tempo.log_file.as_ref(), false)?;
            app::run_play(tempo.settings()?, minutes)
        }
        Command::Bounce {
            tempo,
            out,
            bars,
            sample_rate,
        } => {
            init_tracing(tempo.log_file.as_ref(), true)?;
            app::run_bounce(tempo.settings()?, &out, bars, sample_rate)
        }
    }
}
