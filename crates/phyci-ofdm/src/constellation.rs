//! Constellation tables for the supported modulation schemes.

use phf::phf_map;
use rustfft::num_complex::Complex64;

use crate::error::{SimError, SimResult};

/// Supported modulation schemes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modulation {
    Qpsk,
    Qam16,
}

static MODULATION_NAMES: phf::Map<&'static str, Modulation> = phf_map! {
    "QPSK" => Modulation::Qpsk,
    "16QAM" => Modulation::Qam16,
    "16-QAM" => Modulation::Qam16,
    "QAM16" => Modulation::Qam16,
};

// Unnormalised grid coordinates, indexed by the MSB-first bit group.
const QPSK_GRID: [(f64, f64); 4] = [(1.0, 1.0), (-1.0, 1.0), (-1.0, -1.0), (1.0, -1.0)];

const QAM16_GRID: [(f64, f64); 16] = [
    (-3.0, -3.0),
    (-3.0, -1.0),
    (-3.0, 3.0),
    (-3.0, 1.0),
    (-1.0, -3.0),
    (-1.0, -1.0),
    (-1.0, 3.0),
    (-1.0, 1.0),
    (3.0, -3.0),
    (3.0, -1.0),
    (3.0, 3.0),
    (3.0, 1.0),
    (1.0, -3.0),
    (1.0, -1.0),
    (1.0, 3.0),
    (1.0, 1.0),
];

impl Modulation {
    /// Look up a scheme by name, ignoring case.
    pub fn from_name(name: &str) -> SimResult<Self> {
        MODULATION_NAMES
            .get(name.trim().to_ascii_uppercase().as_str())
            .copied()
            .ok_or_else(|| SimError::UnsupportedModulation(name.to_string()))
    }

    /// Canonical display name.
    pub fn name(self) -> &'static str {
        match self {
            Modulation::Qpsk => "QPSK",
            Modulation::Qam16 => "16QAM",
        }
    }

    fn grid(self) -> &'static [(f64, f64)] {
        match self {
            Modulation::Qpsk => &QPSK_GRID,
            Modulation::Qam16 => &QAM16_GRID,
        }
    }
}

impl std::fmt::Display for Modulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Modulation {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}

/// Unit-energy point table for one modulation scheme.
#[derive(Debug, Clone, PartialEq)]
pub struct Constellation {
    modulation: Modulation,
    points: Vec<Complex64>,
    bits_per_symbol: usize,
}

impl Constellation {
    /// Build the normalised table for `modulation`.
    pub fn new(modulation: Modulation) -> Self {
        let raw: Vec<Complex64> = modulation
            .grid()
            .iter()
            .map(|&(re, im)| Complex64::new(re, im))
            .collect();

        let mean_energy = raw.iter().map(|p| p.norm_sqr()).sum::<f64>() / raw.len() as f64;
        let rms = mean_energy.sqrt();
        let points = raw.into_iter().map(|p| p / rms).collect::<Vec<_>>();

        debug_assert!(points.len().is_power_of_two());
        let bits_per_symbol = points.len().trailing_zeros() as usize;

        Self {
            modulation,
            points,
            bits_per_symbol,
        }
    }

    /// Build the table for a scheme given by name.
    pub fn from_name(name: &str) -> SimResult<Self> {
        Modulation::from_name(name).map(Self::new)
    }

    pub fn modulation(&self) -> Modulation {
        self.modulation
    }

    /// Points in index order.
    pub fn points(&self) -> &[Complex64] {
        &self.points
    }

    pub fn bits_per_symbol(&self) -> usize {
        self.bits_per_symbol
    }

    /// Number of points in the table.
    pub fn order(&self) -> usize {
        self.points.len()
    }
}
