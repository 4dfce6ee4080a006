use phyci_ofdm::{Modulation, OfdmSimulator, SimError};
use thiserror::Error;
use tracing::warn;

/// Minimum SNR at which the BER threshold applies.
pub const THRESHOLD_MIN_SNR_DB: i32 = 15;
/// Highest acceptable BER at or above [`THRESHOLD_MIN_SNR_DB`].
pub const THRESHOLD_MAX_BER: f64 = 1e-5;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SweepError {
    #[error("SNR step must be positive, got {0}")]
    NonPositiveStep(i32),

    #[error("SNR stop {stop} is below start {start}")]
    EmptyRange { start: i32, stop: i32 },

    #[error(transparent)]
    Simulation(#[from] SimError),
}

/// Inclusive integer SNR range in dB.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnrRange {
    pub start: i32,
    pub stop: i32,
    pub step: i32,
}

impl SnrRange {
    pub fn new(start: i32, stop: i32, step: i32) -> Result<Self, SweepError> {
        if step <= 0 {
            return Err(SweepError::NonPositiveStep(step));
        }
        if stop < start {
            return Err(SweepError::EmptyRange { start, stop });
        }
        Ok(Self { start, stop, step })
    }

    /// `start`, `start + step`, ... up to and including `stop`.
    pub fn values(&self) -> impl Iterator<Item = i32> {
        let stop = self.stop;
        (self.start..=stop).step_by(self.step as usize)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepPoint {
    pub snr_db: i32,
    pub ber: f64,
}

impl SweepPoint {
    /// True when this point is in the thresholded SNR region and its BER is too high.
    pub fn exceeds_threshold(&self) -> bool {
        self.snr_db >= THRESHOLD_MIN_SNR_DB && self.ber > THRESHOLD_MAX_BER
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SweepReport {
    pub modulation: Modulation,
    pub bit_count: usize,
    pub range: SnrRange,
    pub points: Vec<SweepPoint>,
}

impl SweepReport {
    /// Point with the lowest BER. The first one wins on ties.
    pub fn best(&self) -> Option<SweepPoint> {
        let mut best: Option<SweepPoint> = None;
        for point in &self.points {
            match best {
                Some(b) if point.ber >= b.ber => {}
                _ => best = Some(*point),
            }
        }
        best
    }

    /// Points at or above the threshold SNR whose BER exceeds the limit.
    pub fn threshold_violations(&self) -> impl Iterator<Item = &SweepPoint> {
        self.points.iter().filter(|p| p.exceeds_threshold())
    }
}

/// Run one transmission per SNR value on a single simulator.
pub fn run_sweep(
    simulator: &mut OfdmSimulator,
    bit_count: usize,
    range: SnrRange,
) -> Result<SweepReport, SweepError> {
    let mut points = Vec::new();
    for snr_db in range.values() {
        let result = simulator.simulate(bit_count, f64::from(snr_db))?;
        let point = SweepPoint {
            snr_db,
            ber: result.ber,
        };
        if point.exceeds_threshold() {
            warn!(snr_db, ber = point.ber, "high BER above threshold SNR");
        }
        points.push(point);
    }

    Ok(SweepReport {
        modulation: simulator.modulation(),
        bit_count,
        range,
        points,
    })
}
