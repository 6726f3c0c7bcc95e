use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use murmur::assets::ModelAssets;
use murmur::config::EngineConfig;
use murmur::constants::CLIP_SAMPLES;
use murmur::spectrogram::log_mel_spectrogram;
use murmur::wav::decode_wav_bytes;

#[derive(Debug, Parser)]
#[command(name = "murmur")]
#[command(about = "Speech-to-text audio frontend", long_about = None)]
struct Args {
    /// Path to a WAV file.
    #[arg(long)]
    audio: Option<PathBuf>,

    /// Read audio from stdin (WAV or raw s16le 16kHz mono).
    #[arg(long, default_value_t = false)]
    stdin: bool,

    /// Path to the combined filter/vocabulary resource blob.
    #[arg(long)]
    resources: Option<PathBuf>,

    /// Engine configuration file; flags override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Use the multilingual vocabulary table.
    #[arg(long, default_value_t = false)]
    multilingual: bool,

    /// Spectrogram worker threads (defaults to available parallelism).
    #[arg(long)]
    workers: Option<usize>,

    /// Print resource dimensions without processing audio.
    #[arg(long, default_value_t = false)]
    inspect_resources: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_target(false).init();
    let args = Args::parse();

    let cfg = args
        .config
        .as_ref()
        .map(EngineConfig::from_path)
        .transpose()?;

    let resources = args
        .resources
        .clone()
        .or_else(|| cfg.as_ref().map(|c| c.resources.clone()))
        .context("--resources (or a config file naming it) is required")?;
    let multilingual = args.multilingual || cfg.as_ref().is_some_and(|c| c.multilingual);
    let workers = args
        .workers
        .or_else(|| cfg.as_ref().and_then(|c| c.workers))
        .unwrap_or_else(|| std::thread::available_parallelism().map_or(1, |n| n.get()));

    let assets = ModelAssets::from_path(&resources, multilingual)
        .with_context(|| format!("load resources {}", resources.display()))?;

    if args.inspect_resources {
        let special = assets.vocab.special();
        eprintln!(
            "resources ok: mel_bands={} fft_bins={} vocab_size={} eot={} sot={}",
            assets.filters.n_mel(),
            assets.filters.n_fft(),
            assets.vocab.len(),
            special.eot,
            special.sot
        );
        return Ok(());
    }

    let audio = args
        .audio
        .clone()
        .or_else(|| cfg.as_ref().and_then(|c| c.default_audio.clone()));
    let modes = u32::from(audio.is_some()) + u32::from(args.stdin);
    if modes != 1 {
        anyhow::bail!("choose exactly one input mode: --audio or --stdin");
    }

    let samples = if let Some(path) = audio {
        let bytes = std::fs::read(&path).with_context(|| format!("read file {path:?}"))?;
        decode_wav_bytes(&bytes).context("decode wav")?.samples
    } else {
        read_stdin_samples()?
    };

    let spectrogram = log_mel_spectrogram(&samples, samples.len(), workers, &assets.filters);
    if spectrogram.is_empty() {
        anyhow::bail!("input produced no spectrogram frames");
    }

    let max = spectrogram
        .data
        .iter()
        .cloned()
        .fold(f32::NEG_INFINITY, f32::max);
    let min = spectrogram.data.iter().cloned().fold(f32::INFINITY, f32::min);
    eprintln!(
        "mel bands: {} frames: {} value range: [{min:.4}, {max:.4}]",
        spectrogram.n_mel, spectrogram.n_frames
    );
    Ok(())
}

fn read_stdin_samples() -> Result<Vec<f32>> {
    let mut buf = Vec::new();
    std::io::stdin()
        .read_to_end(&mut buf)
        .context("read stdin")?;

    if buf.len() >= 4 && &buf[0..4] == b"RIFF" {
        return Ok(decode_wav_bytes(&buf).context("decode wav")?.samples);
    }

    // raw s16le 16kHz mono, padded/truncated like the WAV path
    if buf.len() % 2 != 0 {
        buf.pop();
    }
    let mut samples = vec![0.0f32; CLIP_SAMPLES];
    for (out, b) in samples.iter_mut().zip(buf.chunks_exact(2)) {
        *out = (i16::from_le_bytes([b[0], b[1]]) as f32) / 32768.0;
    }
    Ok(samples)
}
