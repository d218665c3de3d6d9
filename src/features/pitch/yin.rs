//! YIN fundamental frequency estimation for a single frame
//!
//! The squared difference function of a frame against itself,
//! `d(τ) = Σ_{j<W} (x[j] - x[j+τ])²`, is expanded into
//! `E(0) + E(τ) - 2 r(τ)`: energies come from prefix sums of squares and the
//! correlation term `r(τ)` from one FFT cross-correlation of the first `W` samples with
//! the whole frame. The cumulative mean normalized difference (CMND) is then searched
//! for its first trough under the threshold.
//!
//! # Reference
//!
//! de Cheveigné, A., & Kawahara, H. (2002). YIN, a fundamental frequency estimator for
//! speech and music. *The Journal of the Acoustical Society of America*, 111(4), 1917-1930.

use std::sync::Arc;

use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};

/// Frames whose energy is at or below this are unvoiced
const SILENCE_ENERGY: f32 = 1e-10;

/// Reusable FFT plans and buffers for a fixed frame layout
pub struct YinAnalyzer {
    frame_size: usize,
    window: usize,
    min_tau: usize,
    max_tau: usize,
    threshold: f32,
    fft: Arc<dyn Fft<f32>>,
    ifft: Arc<dyn Fft<f32>>,
    frame_buf: Vec<Complex<f32>>,
    head_buf: Vec<Complex<f32>>,
    prefix_sq: Vec<f32>,
    diff: Vec<f32>,
    cmnd: Vec<f32>,
}

impl YinAnalyzer {
    /// Create an analyzer for frames of `frame_size` samples
    ///
    /// The integration window is `frame_size / 2`; lags run from `min_tau` to
    /// `max_tau` inclusive, with `max_tau` capped so `window + max_tau <= frame_size`.
    pub fn new(frame_size: usize, min_tau: usize, max_tau: usize, threshold: f32) -> Self {
        let window = frame_size / 2;
        let max_tau = max_tau.min(frame_size.saturating_sub(window));
        let min_tau = min_tau.clamp(1, max_tau.max(1));
        let fft_len = (frame_size + window).next_power_of_two().max(2);

        let mut planner = FftPlanner::new();
        Self {
            frame_size,
            window,
            min_tau,
            max_tau,
            threshold,
            fft: planner.plan_fft_forward(fft_len),
            ifft: planner.plan_fft_inverse(fft_len),
            frame_buf: vec![Complex::new(0.0, 0.0); fft_len],
            head_buf: vec![Complex::new(0.0, 0.0); fft_len],
            prefix_sq: vec![0.0; frame_size + 1],
            diff: vec![0.0; max_tau + 1],
            cmnd: vec![0.0; max_tau + 1],
        }
    }

    /// Frame length this analyzer expects
    pub fn frame_size(&self) -> usize {
        self.frame_size
    }

    /// Fill `self.diff[0..=max_tau]` for `frame`
    fn difference_function(&mut self, frame: &[f32]) {
        let fft_len = self.frame_buf.len();

        self.frame_buf.fill(Complex::new(0.0, 0.0));
        self.head_buf.fill(Complex::new(0.0, 0.0));
        for (i, &x) in frame.iter().enumerate() {
            self.frame_buf[i].re = x;
            if i < self.window {
                self.head_buf[i].re = x;
            }
        }

        self.fft.process(&mut self.frame_buf);
        self.fft.process(&mut self.head_buf);
        for (f, h) in self.frame_buf.iter_mut().zip(self.head_buf.iter()) {
            *f *= h.conj();
        }
        self.ifft.process(&mut self.frame_buf);

        self.prefix_sq[0] = 0.0;
        for (i, &x) in frame.iter().enumerate() {
            self.prefix_sq[i + 1] = self.prefix_sq[i] + x * x;
        }

        let scale = 1.0 / fft_len as f32;
        let energy_head = self.prefix_sq[self.window];
        for tau in 0..=self.max_tau {
            let energy_lag = self.prefix_sq[tau + self.window] - self.prefix_sq[tau];
            let corr = self.frame_buf[tau].re * scale;
            // Rounding in the FFT can leave tiny negative values
            self.diff[tau] = (energy_head + energy_lag - 2.0 * corr).max(0.0);
        }
    }

    /// Fill `self.cmnd` from `self.diff`
    fn cumulative_mean_normalized_difference(&mut self) {
        self.cmnd[0] = 1.0;
        let mut running_sum = 0.0f32;
        for tau in 1..=self.max_tau {
            running_sum += self.diff[tau];
            self.cmnd[tau] = if running_sum > 0.0 {
                self.diff[tau] * tau as f32 / running_sum
            } else {
                1.0
            };
        }
    }

    /// Pick the period (in lag samples, fractional) from the CMND
    ///
    /// First trough in `[min_tau, max_tau]` whose value is under the threshold,
    /// otherwise the global minimum of that range.
    fn pick_period(&self) -> f32 {
        let lo = self.min_tau;
        let hi = self.max_tau;

        let trough = (lo..=hi).find(|&tau| {
            let value = self.cmnd[tau];
            let falling = tau == lo || self.cmnd[tau - 1] > value;
            let rising = tau == hi || value <= self.cmnd[tau + 1];
            falling && rising && value < self.threshold
        });

        let tau = trough.unwrap_or_else(|| {
            let mut best = lo;
            for tau in lo..=hi {
                if self.cmnd[tau] < self.cmnd[best] {
                    best = tau;
                }
            }
            best
        });

        parabolic_interpolation(&self.cmnd, tau)
    }

    /// Estimate f0 in Hz for one frame of `frame_size` samples (0.0 when unvoiced)
    pub fn estimate(&mut self, frame: &[f32], sample_rate: u32) -> f32 {
        if self.max_tau < 2 || frame.len() < self.window + self.max_tau {
            return 0.0;
        }

        let energy: f32 = frame.iter().map(|x| x * x).sum();
        if energy <= SILENCE_ENERGY {
            return 0.0;
        }

        self.difference_function(frame);
        self.cumulative_mean_normalized_difference();
        let period = self.pick_period();

        if period > 0.0 {
            let f0 = sample_rate as f32 / period;
            if f0.is_finite() {
                return f0;
            }
        }
        0.0
    }
}

/// Refine a minimum at `tau` with a parabola through its neighbours
pub fn parabolic_interpolation(values: &[f32], tau: usize) -> f32 {
    if tau == 0 || tau + 1 >= values.len() {
        return tau as f32;
    }
    let y1 = values[tau - 1];
    let y2 = values[tau];
    let y3 = values[tau + 1];
    let denom = y1 - 2.0 * y2 + y3;
    if denom.abs() < 1e-12 {
        return tau as f32;
    }
    let delta = (0.5 * (y1 - y3) / denom).clamp(-1.0, 1.0);
    tau as f32 + delta
}
