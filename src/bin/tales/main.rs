//! tales - play the synth engine through the default output device
//!
//! Run with: cargo run --bin tales -- --waveform square --cutoff 1800

mod player;

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use tales_synth::{dsp::Waveform, EngineConfig};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tales")]
#[command(author, version, about = "Polyphonic synth engine demo player", long_about = None)]
struct Cli {
    /// TOML engine config; flags below override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(short, long, value_enum)]
    waveform: Option<WaveArg>,

    /// Lowpass cutoff in Hz
    #[arg(long)]
    cutoff: Option<f32>,

    /// Lowpass resonance (Q)
    #[arg(long)]
    resonance: Option<f32>,

    /// Voices in the pool
    #[arg(short, long)]
    polyphony: Option<usize>,

    /// Tempo of the demo phrase
    #[arg(long, default_value_t = 110.0)]
    bpm: f32,

    /// How many times to loop the phrase
    #[arg(long, default_value_t = 2)]
    loops: usize,
}

#[derive(Clone, Copy, ValueEnum)]
enum WaveArg {
    Sine,
    Saw,
    Square,
}

impl From<WaveArg> for Waveform {
    fn from(arg: WaveArg) -> Self {
        match arg {
            WaveArg::Sine => Waveform::Sine,
            WaveArg::Saw => Waveform::Saw,
            WaveArg::Square => Waveform::Square,
        }
    }
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    if let Some(waveform) = cli.waveform {
        config.params.waveform = waveform.into();
    }
    if let Some(cutoff) = cli.cutoff {
        config.params.filter_cutoff_hz = cutoff;
    }
    if let Some(q) = cli.resonance {
        config.params.filter_resonance = q;
    }
    if let Some(polyphony) = cli.polyphony {
        config.polyphony = polyphony;
    }
    config.params = config.params.clamped();

    player::Player::new(config)
        .bpm(cli.bpm)
        .loops(cli.loops)
        .run()
}
