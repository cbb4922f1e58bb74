//! Exact inner-product vector index

use crate::errors::{DeskError, Result};

/// Index id returned for slots with no hit
pub const NO_HIT: i64 = -1;

/// Brute-force inner-product index over fixed-dimension vectors
///
/// With L2-normalised vectors the scores are cosine similarities.
#[derive(Debug, Clone)]
pub struct FlatIndex {
    dimension: usize,
    data: Vec<f32>,
}

impl FlatIndex {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            data: Vec::new(),
        }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Number of stored vectors
    pub fn len(&self) -> usize {
        if self.dimension == 0 {
            0
        } else {
            self.data.len() / self.dimension
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append vectors; ids continue from the current length
    pub fn add(&mut self, vectors: &[Vec<f32>]) -> Result<()> {
        if self.dimension == 0 {
            return Err(DeskError::IndexError("index dimension is zero".to_string()));
        }
        if let Some(bad) = vectors.iter().find(|v| v.len() != self.dimension) {
            return Err(DeskError::IndexError(format!(
                "vector dimension {} does not match index dimension {}",
                bad.len(),
                self.dimension
            )));
        }
        for vector in vectors {
            self.data.extend_from_slice(vector);
        }
        Ok(())
    }

    /// Top-`k` ids by inner product with `query`
    ///
    /// Always returns exactly `k` slots; missing hits are padded with
    /// [`NO_HIT`] and a score of `f32::MIN`.
    pub fn search(&self, query: &[f32], k: usize) -> Result<(Vec<f32>, Vec<i64>)> {
        if query.len() != self.dimension {
            return Err(DeskError::IndexError(format!(
                "query dimension {} does not match index dimension {}",
                query.len(),
                self.dimension
            )));
        }

        let mut scored: Vec<(usize, f32)> = self
            .data
            .chunks_exact(self.dimension)
            .map(|row| row.iter().zip(query).map(|(a, b)| a * b).sum::<f32>())
            .enumerate()
            .collect();
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(k);

        let mut scores = Vec::with_capacity(k);
        let mut ids = Vec::with_capacity(k);
        for (id, score) in scored {
            scores.push(score);
            ids.push(id as i64);
        }
        while ids.len() < k {
            scores.push(f32::MIN);
            ids.push(NO_HIT);
        }

        Ok((scores, ids))
    }
}
