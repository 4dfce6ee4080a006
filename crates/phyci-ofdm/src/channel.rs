//! Additive white Gaussian noise channel.

use rand::Rng;
use rand_distr::{Distribution, Normal};
use rustfft::num_complex::Complex64;

use crate::error::{SimError, SimResult};
use crate::ofdm::average_power;

/// Flat, memoryless AWGN channel calibrated to a target SNR.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AwgnChannel {
    snr_db: f64,
}

impl AwgnChannel {
    /// Create a channel at `snr_db`. Negative values are allowed as long as
    /// the linear ratio stays above zero in `f64`.
    pub fn new(snr_db: f64) -> SimResult<Self> {
        if !snr_db.is_finite() {
            return Err(SimError::NonFiniteSnr(snr_db));
        }
        let channel = Self { snr_db };
        if !(channel.snr_linear() > 0.0) {
            return Err(SimError::SnrOutOfRange(snr_db));
        }
        Ok(channel)
    }

    pub fn snr_db(&self) -> f64 {
        self.snr_db
    }

    /// Linear power ratio corresponding to the configured SNR.
    pub fn snr_linear(&self) -> f64 {
        10f64.powf(self.snr_db / 10.0)
    }

    /// Total complex noise power for a signal of the given average power.
    pub fn noise_power(&self, signal_power: f64) -> f64 {
        signal_power / self.snr_linear()
    }

    /// Return `signal` with one independent complex Gaussian sample added to
    /// each element. Noise power is split evenly between I and Q.
    pub fn apply<R: Rng + ?Sized>(
        &self,
        signal: &[Complex64],
        rng: &mut R,
    ) -> SimResult<Vec<Complex64>> {
        let noise_power = self.noise_power(average_power(signal));
        let sigma = (noise_power / 2.0).sqrt();
        if !sigma.is_finite() {
            return Err(SimError::NoisePowerOutOfRange(noise_power));
        }
        let normal = Normal::new(0.0, sigma)
            .map_err(|_| SimError::NoisePowerOutOfRange(noise_power))?;

        Ok(signal
            .iter()
            .map(|s| {
                let re = normal.sample(rng);
                let im = normal.sample(rng);
                s + Complex64::new(re, im)
            })
            .collect())
    }
}
