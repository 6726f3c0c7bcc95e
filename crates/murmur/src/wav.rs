//! WAV decoding into the fixed-length model input buffer.
//!
//! Minimal canonical-header parser: a 44-byte RIFF header with the PCM
//! payload starting immediately after it. 16-bit and 32-bit linear PCM
//! only. Channels are not de-interleaved; multi-channel input is treated
//! as a flat interleaved sample stream, so callers wanting mono fidelity
//! must downmix first.

use thiserror::Error;
use tracing::debug;

use crate::constants::CLIP_SAMPLES;

/// Canonical RIFF/WAVE header length.
pub const HEADER_LEN: usize = 44;

#[derive(Debug, Clone)]
pub struct WavAudio {
    pub sample_rate_hz: u32,
    pub bits_per_sample: u16,
    /// Normalized samples, always exactly [`CLIP_SAMPLES`] long.
    pub samples: Vec<f32>,
}

#[derive(Debug, Error)]
pub enum WavError {
    #[error("not a valid WAV stream (missing RIFF marker)")]
    InvalidHeader,
    #[error("unsupported bits per sample: {0} (need 16 or 32)")]
    UnsupportedBitsPerSample(u16),
}

fn read_u16_le(p: &[u8]) -> u16 {
    u16::from_le_bytes([p[0], p[1]])
}

fn read_u32_le(p: &[u8]) -> u32 {
    u32::from_le_bytes([p[0], p[1], p[2], p[3]])
}

/// Decode WAV bytes into exactly [`CLIP_SAMPLES`] normalized `f32` samples.
///
/// The header is taken at face value: sample rate at offset 24, bit depth
/// at offset 34, everything after offset 44 as raw PCM. Longer audio is
/// truncated, shorter audio zero-padded.
pub fn decode_wav_bytes(data: &[u8]) -> Result<WavAudio, WavError> {
    if data.len() < HEADER_LEN || &data[0..4] != b"RIFF" {
        return Err(WavError::InvalidHeader);
    }

    let sample_rate_hz = read_u32_le(&data[24..28]);
    let bits_per_sample = read_u16_le(&data[34..36]);
    if bits_per_sample != 16 && bits_per_sample != 32 {
        return Err(WavError::UnsupportedBitsPerSample(bits_per_sample));
    }

    let pcm = &data[HEADER_LEN..];
    let mut samples = vec![0.0f32; CLIP_SAMPLES];
    if bits_per_sample == 16 {
        for (out, b) in samples.iter_mut().zip(pcm.chunks_exact(2)) {
            let s = i16::from_le_bytes([b[0], b[1]]);
            *out = (s as f32) / 32768.0;
        }
    } else {
        for (out, b) in samples.iter_mut().zip(pcm.chunks_exact(4)) {
            *out = f32::from_le_bytes([b[0], b[1], b[2], b[3]]);
        }
    }

    debug!(sample_rate_hz, bits_per_sample, "decoded wav payload");
    Ok(WavAudio {
        sample_rate_hz,
        bits_per_sample,
        samples,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(sample_rate: u32, bits: u16, data_len: u32) -> Vec<u8> {
        let block_align = u32::from(bits / 8);
        let mut wav = Vec::<u8>::new();
        wav.extend_from_slice(b"RIFF");
        wav.extend_from_slice(&(36 + data_len).to_le_bytes());
        wav.extend_from_slice(b"WAVE");
        wav.extend_from_slice(b"fmt ");
        wav.extend_from_slice(&16u32.to_le_bytes());
        wav.extend_from_slice(&1u16.to_le_bytes()); // PCM
        wav.extend_from_slice(&1u16.to_le_bytes()); // mono
        wav.extend_from_slice(&sample_rate.to_le_bytes());
        wav.extend_from_slice(&(sample_rate * block_align).to_le_bytes());
        wav.extend_from_slice(&(bits / 8).to_le_bytes());
        wav.extend_from_slice(&bits.to_le_bytes());
        wav.extend_from_slice(b"data");
        wav.extend_from_slice(&data_len.to_le_bytes());
        assert_eq!(wav.len(), HEADER_LEN);
        wav
    }

    #[test]
    fn sixteen_bit_samples_are_normalized() {
        let values = [i16::MIN, -1, 0, 1, i16::MAX];
        let mut wav = header(16_000, 16, (values.len() * 2) as u32);
        for v in values {
            wav.extend_from_slice(&v.to_le_bytes());
        }

        let audio = decode_wav_bytes(&wav).expect("decode");
        assert_eq!(audio.sample_rate_hz, 16_000);
        assert_eq!(audio.samples.len(), CLIP_SAMPLES);
        for i in 0..values.len() {
            assert!((-1.0..=1.0).contains(&audio.samples[i]));
        }
        assert!((audio.samples[0] + 1.0).abs() < 1e-6);
        assert!((audio.samples[4] - 32767.0 / 32768.0).abs() < 1e-6);
        // zero padding past the payload
        assert_eq!(audio.samples[values.len()], 0.0);
    }

    #[test]
    fn thirty_two_bit_samples_are_bit_exact() {
        let values = [0.5f32, -1.25, 3.5e-3, 0.0];
        let mut wav = header(16_000, 32, (values.len() * 4) as u32);
        for v in values {
            wav.extend_from_slice(&v.to_le_bytes());
        }

        let audio = decode_wav_bytes(&wav).expect("decode");
        for (i, v) in values.iter().enumerate() {
            assert_eq!(audio.samples[i].to_bits(), v.to_bits());
        }
    }

    #[test]
    fn long_payload_is_truncated() {
        let n = CLIP_SAMPLES + 100;
        let mut wav = header(16_000, 16, (n * 2) as u32);
        wav.extend(std::iter::repeat(0x01).take(n * 2));

        let audio = decode_wav_bytes(&wav).expect("decode");
        assert_eq!(audio.samples.len(), CLIP_SAMPLES);
    }

    #[test]
    fn missing_riff_marker_is_rejected() {
        let mut wav = header(16_000, 16, 0);
        wav[0..4].copy_from_slice(b"RIFX");
        assert!(matches!(
            decode_wav_bytes(&wav),
            Err(WavError::InvalidHeader)
        ));
    }

    #[test]
    fn short_input_is_rejected() {
        assert!(matches!(
            decode_wav_bytes(b"RIFF"),
            Err(WavError::InvalidHeader)
        ));
    }

    #[test]
    fn unsupported_bit_depth_is_rejected() {
        let wav = header(16_000, 24, 0);
        assert!(matches!(
            decode_wav_bytes(&wav),
            Err(WavError::UnsupportedBitsPerSample(24))
        ));
    }
}
