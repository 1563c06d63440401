//! Mixer: sums live voices into an output block with master gain.

use super::voice::Voice;

/// Additive mixer for one render block.
#[derive(Debug, Clone)]
pub struct Mixer {
    pub master_gain: f64,
    buffer: Vec<f64>,
}

impl Mixer {
    pub fn new(master_gain: f64) -> Self {
        Mixer {
            master_gain,
            buffer: Vec::new(),
        }
    }

    /// Mix `voices` over `frames` samples starting at device time `start`.
    pub fn mix(&mut self, voices: &mut [Voice], start: f64, frames: usize, sample_rate: f64) {
        self.buffer.clear();
        self.buffer.resize(frames, 0.0);
        for voice in voices.iter_mut() {
            for (i, out) in self.buffer.iter_mut().enumerate() {
                *out += voice.next_sample(start + i as f64 / sample_rate);
            }
        }
    }

    /// The mixed block with master gain and soft clipping applied.
    pub fn output(&self) -> Vec<f32> {
        self.buffer
            .iter()
            .map(|&s| soft_clip(s * self.master_gain) as f32)
            .collect()
    }
}

/// Soft clipper using tanh to prevent harsh digital clipping.
fn soft_clip(x: f64) -> f64 {
    x.tanh()
}
