//! Biquad highpass: matches WebAudio BiquadFilterNode coefficients.

use std::f64::consts::PI;

/// A 2nd-order IIR highpass in Direct Form II Transposed.
///
/// Coefficients from the Audio EQ Cookbook (Robert Bristow-Johnson).
#[derive(Debug, Clone)]
pub struct BiquadFilter {
    pub cutoff: f64,
    pub q: f64,
    b0: f64,
    b1: f64,
    b2: f64,
    a1: f64,
    a2: f64,
    z1: f64,
    z2: f64,
}

impl BiquadFilter {
    /// Butterworth.
    pub const DEFAULT_Q: f64 = std::f64::consts::FRAC_1_SQRT_2;

    pub fn highpass(cutoff: f64, sample_rate: f64) -> Self {
        let mut f = BiquadFilter {
            cutoff,
            q: Self::DEFAULT_Q,
            b0: 1.0,
            b1: 0.0,
            b2: 0.0,
            a1: 0.0,
            a2: 0.0,
            z1: 0.0,
            z2: 0.0,
        };
        f.set_coefficients(sample_rate);
        f
    }

    fn set_coefficients(&mut self, sample_rate: f64) {
        let nyquist = sample_rate / 2.0;
        let w0 = 2.0 * PI * self.cutoff.clamp(1.0, nyquist * 0.999) / sample_rate;
        let (sin_w0, cos_w0) = w0.sin_cos();
        let alpha = sin_w0 / (2.0 * self.q);

        let b0 = (1.0 + cos_w0) / 2.0;
        let (b1, b2) = (-(1.0 + cos_w0), b0);
        let a0 = 1.0 + alpha;

        self.b0 = b0 / a0;
        self.b1 = b1 / a0;
        self.b2 = b2 / a0;
        self.a1 = -2.0 * cos_w0 / a0;
        self.a2 = (1.0 - alpha) / a0;
    }

    /// Process a single sample.
    pub fn process(&mut self, input: f64) -> f64 {
        let output = self.b0 * input + self.z1;
        self.z1 = self.b1 * input - self.a1 * output + self.z2;
        self.z2 = self.b2 * input - self.a2 * output;
        output
    }
}
