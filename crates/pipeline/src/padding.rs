//! Fixed-width padding for token sequences.
//!
//! ## Convention
//! - Short sequences get leading `PAD_ID`s, so content is right-aligned
//! - Long sequences lose their leading tokens, so the tail is kept
//!
//! Both match the layout the classifier saw during training. Getting either
//! one backwards does not fail, it just produces meaningless scores.

use review_data::PAD_ID;

/// A batch of sequences padded to a common width, stored row-major
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaddedBatch {
    data: Vec<u32>,
    batch_size: usize,
    max_len: usize,
}

impl PaddedBatch {
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }

    pub fn is_empty(&self) -> bool {
        self.batch_size == 0
    }

    /// Flat row-major view, `batch_size * max_len` ids
    pub fn as_slice(&self) -> &[u32] {
        &self.data
    }

    pub fn row(&self, index: usize) -> Option<&[u32]> {
        if index >= self.batch_size {
            return None;
        }
        let start = index * self.max_len;
        Some(&self.data[start..start + self.max_len])
    }

    pub fn rows(&self) -> impl Iterator<Item = &[u32]> {
        // chunks_exact panics on 0
        self.data.chunks_exact(self.max_len.max(1)).take(self.batch_size)
    }

    pub fn into_vec(self) -> Vec<u32> {
        self.data
    }
}

/// Pad or truncate every sequence to exactly `max_len` ids
pub fn pad_sequences<S: AsRef<[u32]>>(sequences: &[S], max_len: usize) -> PaddedBatch {
    let mut data = Vec::with_capacity(sequences.len() * max_len);

    for sequence in sequences {
        let sequence = sequence.as_ref();
        if sequence.len() >= max_len {
            data.extend_from_slice(&sequence[sequence.len() - max_len..]);
        } else {
            data.extend(std::iter::repeat_n(PAD_ID, max_len - sequence.len()));
            data.extend_from_slice(sequence);
        }
    }

    PaddedBatch {
        data,
        batch_size: sequences.len(),
        max_len,
    }
}
