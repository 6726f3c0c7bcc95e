//! Transcription pipeline: WAV bytes -> spectrogram -> tokens -> text.

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::assets::ModelAssets;
use crate::constants::CLIP_SAMPLES;
use crate::filters::FilterBank;
use crate::spectrogram::{log_mel_spectrogram, Spectrogram};
use crate::vocab::Vocabulary;
use crate::wav::decode_wav_bytes;

/// Narrow seam to the pretrained network.
///
/// Implementations reshape the flat spectrogram into their input tensor
/// and return the raw token ids, end-of-transcript included.
pub trait InferenceAdapter: Send + Sync {
    fn infer(&self, spectrogram: &Spectrogram) -> Result<Vec<i32>>;
}

/// Loaded assets plus the inference seam.
///
/// Built once before the first request and shared (typically behind an
/// `Arc`) by every call afterwards; nothing in here mutates per request.
pub struct TranscriptionEngine {
    filters: FilterBank,
    vocab: Vocabulary,
    adapter: Box<dyn InferenceAdapter>,
    workers: usize,
}

impl TranscriptionEngine {
    #[must_use]
    pub fn new(assets: ModelAssets, adapter: Box<dyn InferenceAdapter>, workers: usize) -> Self {
        Self {
            filters: assets.filters,
            vocab: assets.vocab,
            adapter,
            workers: workers.max(1),
        }
    }

    #[must_use]
    pub fn vocab(&self) -> &Vocabulary {
        &self.vocab
    }

    #[must_use]
    pub fn filters(&self) -> &FilterBank {
        &self.filters
    }

    /// Front half of the pipeline: decode the WAV payload and build its
    /// log-mel spectrogram.
    pub fn build_spectrogram(&self, wav_bytes: &[u8]) -> Result<Spectrogram> {
        let audio = decode_wav_bytes(wav_bytes).context("decode wav input")?;
        let spectrogram =
            log_mel_spectrogram(&audio.samples, CLIP_SAMPLES, self.workers, &self.filters);
        anyhow::ensure!(
            !spectrogram.is_empty(),
            "input produced no spectrogram frames"
        );
        Ok(spectrogram)
    }

    /// Full request: WAV bytes in, transcript text out.
    pub fn transcribe_wav_bytes(&self, wav_bytes: &[u8]) -> Result<String> {
        let spectrogram = self.build_spectrogram(wav_bytes)?;
        debug!(
            bands = spectrogram.n_mel,
            frames = spectrogram.n_frames,
            "spectrogram ready"
        );

        let tokens = self.adapter.infer(&spectrogram).context("run inference")?;
        let text = self.vocab.render_transcript(&tokens);
        info!(
            tokens = tokens.len(),
            chars = text.len(),
            "transcription finished"
        );
        Ok(text)
    }
}
