//! Shared white-noise buffer for noise-based percussion.

use std::sync::Arc;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Length of the noise buffer in seconds.
pub const NOISE_SECONDS: f64 = 0.15;

/// Mono buffer of independent uniform samples in [-1, 1].
///
/// Generated once per device and read-only afterwards; clones share storage.
#[derive(Debug, Clone)]
pub struct NoiseBuffer {
    data: Arc<[f64]>,
    pub sample_rate: u32,
}

impl NoiseBuffer {
    pub fn generate(sample_rate: u32, seed: u64) -> Self {
        let len = (NOISE_SECONDS * sample_rate as f64).round() as usize;
        let mut rng = SmallRng::seed_from_u64(seed);
        let data: Arc<[f64]> = (0..len).map(|_| rng.random_range(-1.0..=1.0)).collect();
        NoiseBuffer { data, sample_rate }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn samples(&self) -> &[f64] {
        &self.data
    }

    /// True when both handles point at the same storage.
    pub fn shares_storage(&self, other: &NoiseBuffer) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }
}

/// Reads a `NoiseBuffer` once from the start at rate 1, then falls silent.
#[derive(Debug, Clone)]
pub struct NoisePlayer {
    buffer: NoiseBuffer,
    position: usize,
}

impl NoisePlayer {
    pub fn new(buffer: NoiseBuffer) -> Self {
        NoisePlayer {
            buffer,
            position: 0,
        }
    }

    pub fn next_sample(&mut self) -> f64 {
        let sample = self.buffer.samples().get(self.position).copied().unwrap_or(0.0);
        self.position = self.position.saturating_add(1);
        sample
    }
}
