//! Murmur core library.
//!
//! Speech-to-text frontend matching the Whisper tiny preprocessing:
//! - WAV decoding into a fixed 30-second sample buffer
//! - log-mel spectrogram construction (Hann window, radix-2 FFT, mel
//!   filter bank), parallelized across worker threads
//! - filter/vocabulary resource loading and token-to-text rendering
//!
//! The pretrained network itself stays behind the
//! [`pipeline::InferenceAdapter`] seam; this crate ships no model.

pub mod assets;
pub mod config;
pub mod constants;
pub mod fft;
pub mod filters;
pub mod pipeline;
pub mod queue;
pub mod spectrogram;
pub mod vocab;
pub mod wav;
