//! Combined filter/vocabulary resource loading.
//!
//! The resource is a single binary blob: magic sentinel, filter matrix
//! dimensions, the matrix itself, then the stored vocabulary as
//! length-prefixed byte strings. Offsets are positional, so the blob is
//! parsed in one sequential pass and both halves come back together.
//! All integers and floats are native-endian.

use std::path::Path;

use thiserror::Error;
use tracing::debug;

use crate::constants::RESOURCE_MAGIC;
use crate::filters::FilterBank;
use crate::vocab::Vocabulary;

/// Everything the transcription pipeline loads from disk.
#[derive(Debug)]
pub struct ModelAssets {
    pub filters: FilterBank,
    pub vocab: Vocabulary,
}

#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("bad resource magic: {found:#010x} (expected {expected:#010x})")]
    BadMagic { found: i32, expected: i32 },
    #[error("truncated resource: needed {needed} more bytes at offset {offset}")]
    Truncated { offset: usize, needed: usize },
    #[error("negative count {value} at offset {offset}")]
    NegativeCount { value: i32, offset: usize },
}

struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], ResourceError> {
        if self.remaining() < n {
            return Err(ResourceError::Truncated {
                offset: self.pos,
                needed: n - self.remaining(),
            });
        }
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn read_i32(&mut self) -> Result<i32, ResourceError> {
        let b = self.take(4)?;
        Ok(i32::from_ne_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn read_count(&mut self) -> Result<usize, ResourceError> {
        let offset = self.pos;
        let value = self.read_i32()?;
        usize::try_from(value).map_err(|_| ResourceError::NegativeCount { value, offset })
    }

    fn read_f32_vec(&mut self, count: usize) -> Result<Vec<f32>, ResourceError> {
        let bytes = self.take(count * 4)?;
        Ok(bytes
            .chunks_exact(4)
            .map(|c| f32::from_ne_bytes([c[0], c[1], c[2], c[3]]))
            .collect())
    }
}

impl ModelAssets {
    /// Parse the combined filter/vocabulary blob.
    ///
    /// `multilingual` selects the vocabulary table variant; it shifts the
    /// control-token ids and grows the synthetic label range by one.
    pub fn from_bytes(data: &[u8], multilingual: bool) -> Result<Self, ResourceError> {
        let mut r = ByteReader::new(data);

        let magic = r.read_i32()?;
        if magic != RESOURCE_MAGIC {
            return Err(ResourceError::BadMagic {
                found: magic,
                expected: RESOURCE_MAGIC,
            });
        }

        let n_mel = r.read_count()?;
        let n_fft = r.read_count()?;
        let matrix = r.read_f32_vec(n_mel * n_fft)?;
        let filters = FilterBank::new(n_mel, n_fft, matrix);

        let n_vocab = r.read_count()?;
        let mut words = Vec::with_capacity(n_vocab.min(r.remaining()));
        for _ in 0..n_vocab {
            let len = r.read_count()?;
            let bytes = r.take(len)?;
            words.push(String::from_utf8_lossy(bytes).into_owned());
        }

        debug!(
            n_mel,
            n_fft,
            n_vocab,
            multilingual,
            "loaded filter/vocabulary resource"
        );
        Ok(Self {
            filters,
            vocab: Vocabulary::with_control_labels(words, multilingual),
        })
    }

    pub fn from_path(path: impl AsRef<Path>, multilingual: bool) -> Result<Self, ResourceError> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(&bytes, multilingual)
    }
}
