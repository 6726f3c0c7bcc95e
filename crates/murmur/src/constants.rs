//! Signal-processing and resource constants.

// Audio preprocessing (matches the Whisper tiny frontend).
pub const SAMPLE_RATE_HZ: u32 = 16_000;
pub const CLIP_SECONDS: usize = 30;
pub const CLIP_SAMPLES: usize = (SAMPLE_RATE_HZ as usize) * CLIP_SECONDS; // 480_000

pub const MEL_BANDS: usize = 80;
pub const FRAME_STEP: usize = 160; // 10ms @ 16kHz
pub const FRAME_SIZE: usize = 400; // 25ms @ 16kHz
pub const N_FFT_BINS: usize = FRAME_SIZE / 2 + 1; // 201

// Sentinel at the head of the combined filter/vocabulary blob.
pub const RESOURCE_MAGIC: i32 = 0x5553_454e;
