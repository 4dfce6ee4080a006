//! Bit-error-rate simulation of a single-frame OFDM link over AWGN.

pub mod ber;
pub mod bits;
pub mod channel;
pub mod constellation;
pub mod error;
pub mod modem;
pub mod ofdm;
pub mod simulator;

pub use ber::bit_error_rate;
pub use channel::AwgnChannel;
pub use constellation::{Constellation, Modulation};
pub use error::{SimError, SimResult};
pub use ofdm::OfdmFramer;
pub use simulator::{Diagnostics, OfdmSimulator, SimulationResult, SimulatorBuilder};

pub use rustfft::num_complex::Complex64;
