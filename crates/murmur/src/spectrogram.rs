//! Log-mel spectrogram construction.
//!
//! Each analysis frame is Hann-windowed, transformed, folded into a
//! one-sided power spectrum and projected through the mel filter bank.
//! Frame indices are stride-partitioned across worker threads: worker `w`
//! owns every frame `f` with `f % workers == w`, so no two threads ever
//! write the same output element and the hot path needs no locks. The
//! normalization pass runs single-threaded after all workers have joined.

use std::f64::consts::PI;

use tracing::debug;

use crate::constants::{FRAME_SIZE, FRAME_STEP, MEL_BANDS, N_FFT_BINS};
use crate::fft::fft;
use crate::filters::FilterBank;

/// Flat band-major spectrogram: element `(band, frame)` lives at
/// `band * n_frames + frame`.
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrogram {
    pub n_mel: usize,
    pub n_frames: usize,
    pub data: Vec<f32>,
}

impl Spectrogram {
    fn empty() -> Self {
        Self {
            n_mel: MEL_BANDS,
            n_frames: 0,
            data: Vec::new(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Raw output pointer shared by the workers.
///
/// SAFETY: soundness rests on the frame partition above; each element is
/// written by exactly one worker, and the scope join orders all writes
/// before the main thread reads the buffer back.
#[derive(Clone, Copy)]
struct OutPtr(*mut f32);

unsafe impl Send for OutPtr {}
unsafe impl Sync for OutPtr {}

/// Build the 80-band log-mel spectrogram for a fixed-length sample buffer.
///
/// `n_samples` bounds how far analysis windows may read into `samples`;
/// anything past it is treated as zero. `workers` only affects wall-clock
/// time, never the produced values. Degenerate input (no full frame, or a
/// filter bank smaller than the 80x201 projection) yields an empty
/// spectrogram.
#[must_use]
pub fn log_mel_spectrogram(
    samples: &[f32],
    n_samples: usize,
    workers: usize,
    filters: &FilterBank,
) -> Spectrogram {
    let n_samples = n_samples.min(samples.len());
    let n_frames = n_samples / FRAME_STEP;
    if n_frames == 0 || filters.n_mel() < MEL_BANDS || filters.n_fft() < N_FFT_BINS {
        return Spectrogram::empty();
    }

    let mut hann = [0.0f32; FRAME_SIZE];
    for (i, w) in hann.iter_mut().enumerate() {
        *w = (0.5 * (1.0 - (2.0 * PI * (i as f64) / (FRAME_SIZE as f64)).cos())) as f32;
    }
    let workers = workers.clamp(1, n_frames);
    let mut data = vec![0.0f32; MEL_BANDS * n_frames];
    let out = OutPtr(data.as_mut_ptr());

    std::thread::scope(|scope| {
        for worker in 0..workers {
            let hann = &hann;
            scope.spawn(move || {
                // Capture the whole `OutPtr` (which is Send), not just its
                // `*mut f32` field, which edition-2021 disjoint capture would
                // otherwise grab and reject as non-Send.
                let out = out;
                debug!(worker, "spectrogram worker started");
                let mut frame_in = [0.0f32; FRAME_SIZE];
                let mut frame_out = [0.0f32; FRAME_SIZE * 2];

                let mut frame = worker;
                while frame < n_frames {
                    let offset = frame * FRAME_STEP;

                    for j in 0..FRAME_SIZE {
                        frame_in[j] = if offset + j < n_samples {
                            hann[j] * samples[offset + j]
                        } else {
                            0.0
                        };
                    }

                    fft(&frame_in, &mut frame_out);

                    // magnitude squared, in place over the interleaved pairs
                    // (slot j is always consumed before it is overwritten)
                    for j in 0..FRAME_SIZE {
                        frame_out[j] = frame_out[2 * j] * frame_out[2 * j]
                            + frame_out[2 * j + 1] * frame_out[2 * j + 1];
                    }
                    // fold negative-frequency energy onto the positive half
                    for j in 1..FRAME_SIZE / 2 {
                        frame_out[j] += frame_out[FRAME_SIZE - j];
                    }

                    for band in 0..MEL_BANDS {
                        let coeffs = filters.band(band);
                        let mut sum = 0.0f64;
                        for k in 0..N_FFT_BINS {
                            sum += f64::from(frame_out[k]) * f64::from(coeffs[k]);
                        }
                        if sum < 1e-10 {
                            sum = 1e-10;
                        }
                        let value = sum.log10() as f32;
                        // SAFETY: frame % workers == worker, so this element
                        // belongs to this thread alone.
                        unsafe { *out.0.add(band * n_frames + frame) = value };
                    }

                    frame += workers;
                }
            });
        }
    });
    // the scope has joined every worker; normalization sees all writes

    let mut max = f32::NEG_INFINITY;
    for &v in &data {
        if v > max {
            max = v;
        }
    }
    let floor = max - 8.0;
    for v in &mut data {
        if *v < floor {
            *v = floor;
        }
        *v = (*v + 4.0) / 4.0;
    }

    Spectrogram {
        n_mel: MEL_BANDS,
        n_frames,
        data,
    }
}
