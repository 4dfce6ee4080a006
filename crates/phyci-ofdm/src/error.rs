use thiserror::Error;

/// Result type for simulator operations.
pub type SimResult<T> = Result<T, SimError>;

/// Errors raised before a transmission produces any output.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    /// Modulation name not recognised.
    #[error("unsupported modulation: {0}")]
    UnsupportedModulation(String),

    #[error("subcarrier count must be positive")]
    ZeroSubcarriers,

    #[error("bit count must be positive")]
    ZeroBitCount,

    /// Not enough bits to form a single symbol.
    #[error("{bit_count} bits do not fill one symbol of {bits_per_symbol} bits")]
    TooFewBits {
        bit_count: usize,
        bits_per_symbol: usize,
    },

    #[error("cannot compute a bit error rate over zero bits")]
    EmptyComparison,

    #[error("SNR must be finite, got {0} dB")]
    NonFiniteSnr(f64),

    /// The dB value underflows to a zero linear ratio.
    #[error("SNR {0} dB is outside the representable range")]
    SnrOutOfRange(f64),

    #[error("noise power {0} cannot be sampled")]
    NoisePowerOutOfRange(f64),
}

impl SimError {
    /// True for construction-time configuration errors, false for
    /// precondition violations on a call.
    pub fn is_configuration(&self) -> bool {
        matches!(self, SimError::UnsupportedModulation(_))
    }
}
