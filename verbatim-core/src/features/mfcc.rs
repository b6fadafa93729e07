//! Built-in MFCC frontend.
//!
//! ## Pipeline (per window)
//!
//! 1. Zero-pad the window to `N_FFT` and run a forward FFT.
//! 2. Periodogram power spectrum over the `N_FFT/2 + 1` real bins.
//! 3. Triangular mel filterbank (HTK mel scale), one filter per coefficient.
//! 4. Natural log of the filterbank energies.
//! 5. Orthonormal DCT-II down to the cepstral coefficients.
//! 6. Sinusoidal liftering (`CEP_LIFTER` = 22).
//! 7. Coefficient 0 is replaced with the log of the total frame energy.
//!
//! Preemphasis is *not* applied here: the streaming audio buffer has
//! already filtered its samples before windowing.

use std::f32::consts::PI;
use std::sync::Arc;

use rustfft::{num_complex::Complex, Fft, FftPlanner};

use super::FeatureExtractor;

/// FFT size. Windows shorter than this are zero-padded.
const N_FFT: usize = 512;
const N_FREQS: usize = N_FFT / 2 + 1;
/// Sinusoidal lifter parameter.
const CEP_LIFTER: f32 = 22.0;
/// Energy floor before taking logs.
const LOG_FLOOR: f32 = 1e-10;

/// Mel-frequency cepstral coefficient extractor.
pub struct MfccExtractor {
    n_cep: usize,
    mel_filters: Vec<Vec<f32>>,
    lifter: Vec<f32>,
    fft: Arc<dyn Fft<f32>>,
    fft_buf: Vec<Complex<f32>>,
}

impl MfccExtractor {
    /// Create an extractor producing `n_cep` coefficients for audio at
    /// `sample_rate` Hz. The filterbank spans 0 Hz to the Nyquist frequency
    /// with one triangular filter per coefficient.
    pub fn new(sample_rate: u32, n_cep: usize) -> Self {
        assert!(n_cep > 0, "n_cep must be non-zero");
        let mel_filters = build_mel_filters(N_FFT, sample_rate, n_cep, 0.0, sample_rate as f32 / 2.0);
        let lifter = (0..n_cep)
            .map(|k| 1.0 + (CEP_LIFTER / 2.0) * (PI * k as f32 / CEP_LIFTER).sin())
            .collect();
        let fft = FftPlanner::<f32>::new().plan_fft_forward(N_FFT);

        Self {
            n_cep,
            mel_filters,
            lifter,
            fft,
            fft_buf: vec![Complex::new(0.0, 0.0); N_FFT],
        }
    }

    fn power_spectrum(&mut self, window: &[f32]) -> Vec<f32> {
        for v in self.fft_buf.iter_mut() {
            *v = Complex::new(0.0, 0.0);
        }
        for (slot, &s) in self.fft_buf.iter_mut().zip(window.iter()) {
            *slot = Complex::new(s, 0.0);
        }
        self.fft.process(&mut self.fft_buf);

        self.fft_buf[..N_FREQS]
            .iter()
            .map(|c| c.norm_sqr() / N_FFT as f32)
            .collect()
    }
}

impl FeatureExtractor for MfccExtractor {
    fn feature_width(&self) -> usize {
        self.n_cep
    }

    fn extract(&mut self, window: &[f32]) -> Vec<f32> {
        let window = if window.len() > N_FFT {
            &window[..N_FFT]
        } else {
            window
        };

        let power = self.power_spectrum(window);
        let frame_energy: f32 = power.iter().sum::<f32>().max(LOG_FLOOR);

        let log_mel: Vec<f32> = self
            .mel_filters
            .iter()
            .map(|filter| {
                let energy: f32 = filter
                    .iter()
                    .zip(power.iter())
                    .map(|(w, p)| w * p)
                    .sum();
                energy.max(LOG_FLOOR).ln()
            })
            .collect();

        let mut ceps = dct2_ortho(&log_mel, self.n_cep);
        for (c, l) in ceps.iter_mut().zip(self.lifter.iter()) {
            *c *= l;
        }
        // Append-energy convention: total log energy replaces c0.
        ceps[0] = frame_energy.ln();
        ceps
    }
}

/// Orthonormal DCT-II of `input`, truncated to `n_out` coefficients.
fn dct2_ortho(input: &[f32], n_out: usize) -> Vec<f32> {
    let n = input.len();
    let scale0 = (1.0 / n as f32).sqrt();
    let scale = (2.0 / n as f32).sqrt();

    (0..n_out)
        .map(|k| {
            let sum: f32 = input
                .iter()
                .enumerate()
                .map(|(j, &x)| x * (PI * k as f32 * (2 * j + 1) as f32 / (2 * n) as f32).cos())
                .sum();
            sum * if k == 0 { scale0 } else { scale }
        })
        .collect()
}

fn build_mel_filters(
    fft_size: usize,
    sample_rate: u32,
    n_filters: usize,
    fmin: f32,
    fmax: f32,
) -> Vec<Vec<f32>> {
    let n_freqs = fft_size / 2 + 1;
    let mel_min = hz_to_mel(fmin);
    let mel_max = hz_to_mel(fmax);

    let mel_pts: Vec<f32> = (0..=(n_filters + 1))
        .map(|i| mel_min + (mel_max - mel_min) * i as f32 / (n_filters + 1) as f32)
        .collect();
    let hz_pts: Vec<f32> = mel_pts.iter().map(|&m| mel_to_hz(m)).collect();
    let fft_freqs: Vec<f32> = (0..n_freqs)
        .map(|k| k as f32 * sample_rate as f32 / fft_size as f32)
        .collect();

    let mut filters = vec![vec![0f32; n_freqs]; n_filters];
    for m in 0..n_filters {
        let lower = hz_pts[m];
        let center = hz_pts[m + 1];
        let upper = hz_pts[m + 2];
        let down_denom = (center - lower).max(1e-10);
        let up_denom = (upper - center).max(1e-10);

        for (k, &freq) in fft_freqs.iter().enumerate() {
            filters[m][k] = if freq >= lower && freq <= center {
                (freq - lower) / down_denom
            } else if freq > center && freq <= upper {
                (upper - freq) / up_denom
            } else {
                0.0
            };
        }
    }
    filters
}

/// HTK mel scale.
fn hz_to_mel(hz: f32) -> f32 {
    2595.0 * (1.0 + hz / 700.0).log10()
}

fn mel_to_hz(mel: f32) -> f32 {
    700.0 * (10f32.powf(mel / 2595.0) - 1.0)
}
