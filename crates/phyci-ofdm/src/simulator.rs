//! End-to-end OFDM transmission over an AWGN channel.

use bitvec::slice::BitSlice;
use bitvec::vec::BitVec;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rustfft::num_complex::Complex64;
use tracing::{debug, trace};

use crate::ber::bit_error_rate;
use crate::bits::random_bits;
use crate::channel::AwgnChannel;
use crate::constellation::{Constellation, Modulation};
use crate::error::{SimError, SimResult};
use crate::modem::{demodulate, modulate};
use crate::ofdm::OfdmFramer;

pub const DEFAULT_SUBCARRIERS: usize = 64;
pub const DEFAULT_SEED: u64 = 42;

/// Intermediate arrays from one transmission.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostics {
    pub tx_bits: BitVec,
    pub tx_symbols: Vec<Complex64>,
    /// Time-domain frame before the channel.
    pub tx_frame: Vec<Complex64>,
    /// Time-domain frame after the channel.
    pub rx_frame: Vec<Complex64>,
    /// All recovered subcarriers, including zero-padded ones.
    pub rx_symbols: Vec<Complex64>,
    pub rx_bits: BitVec,
    pub snr_db: f64,
    pub bit_count: usize,
    pub modulation: Modulation,
}

/// Outcome of [`OfdmSimulator::simulate`].
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationResult {
    pub ber: f64,
    pub diagnostics: Diagnostics,
}

/// Seeded OFDM link simulator.
///
/// Each instance owns its random stream. Calls advance that stream, so the
/// result of a call depends on every call made before it on the same instance.
#[derive(Debug)]
pub struct OfdmSimulator {
    constellation: Constellation,
    framer: OfdmFramer,
    rng: ChaCha8Rng,
}

impl OfdmSimulator {
    /// Create a builder with default settings.
    pub fn builder() -> SimulatorBuilder {
        SimulatorBuilder::new()
    }

    /// Create a simulator for a scheme given by name.
    pub fn new(subcarriers: usize, modulation: &str, seed: u64) -> SimResult<Self> {
        Self::builder()
            .subcarriers(subcarriers)
            .modulation(Modulation::from_name(modulation)?)
            .seed(seed)
            .build()
    }

    pub fn modulation(&self) -> Modulation {
        self.constellation.modulation()
    }

    pub fn constellation(&self) -> &Constellation {
        &self.constellation
    }

    pub fn subcarriers(&self) -> usize {
        self.framer.subcarriers()
    }

    pub fn bits_per_symbol(&self) -> usize {
        self.constellation.bits_per_symbol()
    }

    /// Draw fresh bits from the owned stream.
    pub fn generate_bits(&mut self, count: usize) -> BitVec {
        random_bits(&mut self.rng, count)
    }

    pub fn modulate(&self, bits: &BitSlice) -> Vec<Complex64> {
        modulate(&self.constellation, bits)
    }

    pub fn demodulate(&self, symbols: &[Complex64]) -> BitVec {
        demodulate(&self.constellation, symbols)
    }

    pub fn frame(&self, symbols: &[Complex64]) -> Vec<Complex64> {
        self.framer.frame(symbols)
    }

    pub fn deframe(&self, samples: &[Complex64]) -> Vec<Complex64> {
        self.framer.deframe(samples)
    }

    /// Pass `signal` through an AWGN channel, drawing noise from the owned stream.
    pub fn add_noise(&mut self, signal: &[Complex64], snr_db: f64) -> SimResult<Vec<Complex64>> {
        AwgnChannel::new(snr_db)?.apply(signal, &mut self.rng)
    }

    /// Run one transmit, channel, receive pass and measure the bit error rate.
    ///
    /// Only the subcarriers that carried data are demodulated. All arguments are
    /// checked before the random stream is touched.
    pub fn simulate(&mut self, bit_count: usize, snr_db: f64) -> SimResult<SimulationResult> {
        if bit_count == 0 {
            return Err(SimError::ZeroBitCount);
        }
        let bits_per_symbol = self.bits_per_symbol();
        if bit_count < bits_per_symbol {
            return Err(SimError::TooFewBits {
                bit_count,
                bits_per_symbol,
            });
        }
        AwgnChannel::new(snr_db)?;

        let tx_bits = self.generate_bits(bit_count);
        let tx_symbols = self.modulate(&tx_bits);
        let tx_frame = self.frame(&tx_symbols);
        let rx_frame = self.add_noise(&tx_frame, snr_db)?;
        let rx_symbols = self.deframe(&rx_frame);

        let carried = tx_symbols.len().min(rx_symbols.len());
        let rx_bits = self.demodulate(&rx_symbols[..carried]);
        trace!(
            symbols = tx_symbols.len(),
            carried,
            subcarriers = self.subcarriers(),
            "frame built"
        );

        let ber = bit_error_rate(&tx_bits, &rx_bits)?;
        debug!(
            modulation = %self.modulation(),
            bit_count,
            snr_db,
            ber,
            "transmission complete"
        );

        Ok(SimulationResult {
            ber,
            diagnostics: Diagnostics {
                tx_bits,
                tx_symbols,
                tx_frame,
                rx_frame,
                rx_symbols,
                rx_bits,
                snr_db,
                bit_count,
                modulation: self.modulation(),
            },
        })
    }
}

/// Builder for configuring an OfdmSimulator.
#[derive(Debug, Clone)]
pub struct SimulatorBuilder {
    subcarriers: usize,
    modulation: Modulation,
    seed: u64,
}

impl Default for SimulatorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatorBuilder {
    /// 64 subcarriers, QPSK, seed 42.
    pub fn new() -> Self {
        Self {
            subcarriers: DEFAULT_SUBCARRIERS,
            modulation: Modulation::Qpsk,
            seed: DEFAULT_SEED,
        }
    }

    /// Set the number of subcarriers, which is also the frame length.
    pub fn subcarriers(mut self, subcarriers: usize) -> Self {
        self.subcarriers = subcarriers;
        self
    }

    pub fn modulation(mut self, modulation: Modulation) -> Self {
        self.modulation = modulation;
        self
    }

    /// Set the seed of the simulator's random stream.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Build the simulator.
    pub fn build(self) -> SimResult<OfdmSimulator> {
        let framer = OfdmFramer::new(self.subcarriers)?;
        Ok(OfdmSimulator {
            constellation: Constellation::new(self.modulation),
            framer,
            rng: ChaCha8Rng::seed_from_u64(self.seed),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn qpsk() -> OfdmSimulator {
        OfdmSimulator::builder().build().expect("simulator")
    }

    #[test]
    fn builder_defaults() {
        let sim = qpsk();
        assert_eq!(sim.subcarriers(), 64);
        assert_eq!(sim.modulation(), Modulation::Qpsk);
        assert_eq!(sim.bits_per_symbol(), 2);
    }

    #[test]
    fn new_parses_scheme_name() {
        let sim = OfdmSimulator::new(32, "16QAM", 1).expect("simulator");
        assert_eq!(sim.modulation(), Modulation::Qam16);
        assert_eq!(sim.constellation().order(), 16);
        assert_eq!(sim.subcarriers(), 32);
    }

    #[test]
    fn construction_errors() {
        assert_eq!(
            OfdmSimulator::new(64, "BPSK", 42).unwrap_err(),
            SimError::UnsupportedModulation("BPSK".to_string())
        );
        assert_eq!(
            OfdmSimulator::builder().subcarriers(0).build().unwrap_err(),
            SimError::ZeroSubcarriers
        );
    }

    #[test]
    fn call_precondition_errors() {
        let mut sim = OfdmSimulator::builder()
            .modulation(Modulation::Qam16)
            .build()
            .expect("simulator");
        assert_eq!(sim.simulate(0, 10.0).unwrap_err(), SimError::ZeroBitCount);
        assert_eq!(
            sim.simulate(3, 10.0).unwrap_err(),
            SimError::TooFewBits {
                bit_count: 3,
                bits_per_symbol: 4
            }
        );
        assert!(matches!(
            sim.simulate(100, f64::NAN),
            Err(SimError::NonFiniteSnr(_))
        ));
    }

    #[test]
    fn rejected_calls_do_not_advance_the_stream() {
        let mut a = qpsk();
        let mut b = qpsk();
        assert!(a.simulate(0, 10.0).is_err());
        assert!(a.simulate(100, f64::INFINITY).is_err());
        assert_eq!(a.simulate(100, 5.0), b.simulate(100, 5.0));
    }

    #[test]
    fn snr_below_representable_range_is_rejected() {
        let mut a = qpsk();
        let mut b = qpsk();
        assert_eq!(
            a.simulate(128, -4000.0).unwrap_err(),
            SimError::SnrOutOfRange(-4000.0)
        );
        assert_eq!(a.simulate(128, 5.0), b.simulate(128, 5.0));
    }

    #[test]
    fn very_low_snr_is_noisy() {
        let mut sim = qpsk();
        let result = sim.simulate(128, -300.0).expect("simulate");
        assert_ne!(result.diagnostics.rx_frame, result.diagnostics.tx_frame);
        assert!(result.ber > 0.1, "BER {}", result.ber);
    }

    #[test]
    fn stage_by_stage_matches_simulate() {
        let mut whole = qpsk();
        let mut staged = qpsk();
        let expected = whole.simulate(128, 5.0).expect("simulate").diagnostics;

        let bits = staged.generate_bits(128);
        let frame = staged.frame(&staged.modulate(&bits));
        let received = staged.add_noise(&frame, 5.0).expect("add_noise");

        assert_eq!(bits, expected.tx_bits);
        assert_eq!(frame, expected.tx_frame);
        assert_eq!(received, expected.rx_frame);
        assert_eq!(staged.generate_bits(64), whole.generate_bits(64));
    }

    #[test]
    fn diagnostics_shapes() {
        let mut sim = qpsk();
        let result = sim.simulate(101, 10.0).expect("simulate");
        let d = &result.diagnostics;

        assert_eq!(d.tx_bits.len(), 101);
        assert_eq!(d.tx_symbols.len(), 50);
        assert_eq!(d.tx_frame.len(), 64);
        assert_eq!(d.rx_frame.len(), 64);
        assert_eq!(d.rx_symbols.len(), 64);
        assert_eq!(d.rx_bits.len(), 100);
        assert_eq!(d.bit_count, 101);
        assert_eq!(d.snr_db, 10.0);
        assert_eq!(d.modulation, Modulation::Qpsk);
        assert!((0.0..=1.0).contains(&result.ber));
    }

    #[test]
    fn more_symbols_than_subcarriers_only_compares_the_frame() {
        let mut sim = qpsk();
        let result = sim.simulate(1000, 30.0).expect("simulate");
        assert_eq!(result.diagnostics.tx_symbols.len(), 500);
        assert_eq!(result.diagnostics.rx_bits.len(), 128);
    }

    #[test]
    fn identical_seeds_are_bit_identical() {
        let mut a = OfdmSimulator::new(64, "16QAM", 7).expect("simulator");
        let mut b = OfdmSimulator::new(64, "16QAM", 7).expect("simulator");
        for snr in [0.0, 5.0, -3.0] {
            let ra = a.simulate(256, snr).expect("simulate");
            let rb = b.simulate(256, snr).expect("simulate");
            assert_eq!(ra.ber.to_bits(), rb.ber.to_bits());
            assert_eq!(ra, rb);
        }
    }

    #[test]
    fn different_seeds_draw_different_bits() {
        let mut a = OfdmSimulator::new(64, "QPSK", 1).expect("simulator");
        let mut b = OfdmSimulator::new(64, "QPSK", 2).expect("simulator");
        assert_ne!(a.generate_bits(128), b.generate_bits(128));
    }

    #[test]
    fn successive_calls_continue_the_stream() {
        let mut a = qpsk();
        let first = a.simulate(128, 10.0).expect("simulate");
        let second = a.simulate(128, 10.0).expect("simulate");
        assert_ne!(first.diagnostics.tx_bits, second.diagnostics.tx_bits);
    }

    #[rstest]
    #[case("QPSK")]
    #[case("16QAM")]
    fn noiseless_chain_recovers_bits(#[case] scheme: &str) {
        let mut sim = OfdmSimulator::new(64, scheme, 42).expect("simulator");
        let bits = sim.generate_bits(64 * sim.bits_per_symbol());
        let symbols = sim.modulate(&bits);
        let recovered = sim.deframe(&sim.frame(&symbols));
        assert_eq!(sim.demodulate(&recovered[..symbols.len()]), bits);
    }

    #[rstest]
    #[case("QPSK")]
    #[case("16QAM")]
    fn high_snr_is_error_free(#[case] scheme: &str) {
        let mut sim = OfdmSimulator::new(64, scheme, 42).expect("simulator");
        let result = sim.simulate(50_000, 40.0).expect("simulate");
        assert_eq!(result.ber, 0.0);
    }

    #[test]
    fn low_snr_produces_errors() {
        let mut sim = OfdmSimulator::new(64, "16QAM", 42).expect("simulator");
        let mut total = 0.0;
        for _ in 0..20 {
            total += sim.simulate(256, 0.0).expect("simulate").ber;
        }
        assert!(total / 20.0 > 0.05, "mean BER {}", total / 20.0);
    }

    #[rstest]
    #[case("QPSK")]
    #[case("16QAM")]
    fn ber_does_not_increase_with_snr(#[case] scheme: &str) {
        const TRIALS: usize = 100;
        let mut sim = OfdmSimulator::new(64, scheme, 42).expect("simulator");

        let mut means = Vec::new();
        for snr in [0.0, 5.0, 10.0, 15.0, 20.0] {
            let total: f64 = (0..TRIALS)
                .map(|_| sim.simulate(10_000, snr).expect("simulate").ber)
                .sum();
            means.push(total / TRIALS as f64);
        }

        for pair in means.windows(2) {
            assert!(pair[1] <= pair[0] + 0.005, "means {:?}", means);
        }
        assert!(means[0] > means[4], "means {:?}", means);
    }
}
