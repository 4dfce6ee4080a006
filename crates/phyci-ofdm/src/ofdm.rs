//! OFDM framing utilities.

use std::sync::Arc;

use rustfft::num_complex::Complex64;
use rustfft::{Fft, FftPlanner};

use crate::error::{SimError, SimResult};

/// Single-symbol OFDM framer with energy-preserving transforms.
///
/// Frequency-domain symbols occupy subcarriers `0..n` directly; there is no
/// guard band, DC null or cyclic prefix.
pub struct OfdmFramer {
    nfft: usize,
    scale: f64,
    ifft: Arc<dyn Fft<f64>>,
    fft: Arc<dyn Fft<f64>>,
}

impl OfdmFramer {
    /// Create a framer for `subcarriers` bins.
    pub fn new(subcarriers: usize) -> SimResult<Self> {
        if subcarriers == 0 {
            return Err(SimError::ZeroSubcarriers);
        }

        let mut planner = FftPlanner::<f64>::new();
        Ok(Self {
            nfft: subcarriers,
            scale: 1.0 / (subcarriers as f64).sqrt(),
            ifft: planner.plan_fft_inverse(subcarriers),
            fft: planner.plan_fft_forward(subcarriers),
        })
    }

    pub fn subcarriers(&self) -> usize {
        self.nfft
    }

    /// Build one time-domain frame.
    ///
    /// `symbols` is truncated to the subcarrier count, or zero-padded up to it.
    /// The output always holds exactly `subcarriers()` samples with the same
    /// average power as the padded frequency-domain input.
    pub fn frame(&self, symbols: &[Complex64]) -> Vec<Complex64> {
        let used = symbols.len().min(self.nfft);
        let mut bins = vec![Complex64::new(0.0, 0.0); self.nfft];
        bins[..used].copy_from_slice(&symbols[..used]);

        // rustfft's inverse is unscaled; 1/sqrt(N) makes it unitary.
        self.ifft.process(&mut bins);
        for bin in &mut bins {
            *bin *= self.scale;
        }
        bins
    }

    /// Recover the frequency-domain symbols from one received frame.
    ///
    /// Input shorter than the frame is zero-padded, longer input is truncated.
    pub fn deframe(&self, samples: &[Complex64]) -> Vec<Complex64> {
        let used = samples.len().min(self.nfft);
        let mut bins = vec![Complex64::new(0.0, 0.0); self.nfft];
        bins[..used].copy_from_slice(&samples[..used]);

        self.fft.process(&mut bins);
        for bin in &mut bins {
            *bin *= self.scale;
        }
        bins
    }
}

impl std::fmt::Debug for OfdmFramer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OfdmFramer")
            .field("nfft", &self.nfft)
            .finish_non_exhaustive()
    }
}

/// Mean squared magnitude of `samples`. Zero for an empty slice.
pub fn average_power(samples: &[Complex64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    samples.iter().map(|s| s.norm_sqr()).sum::<f64>() / samples.len() as f64
}
