use bitvec::slice::BitSlice;

use crate::error::{SimError, SimResult};

/// Fraction of differing bits over the common prefix of `tx` and `rx`.
///
/// The longer sequence is truncated; an empty common prefix is an error.
pub fn bit_error_rate(tx: &BitSlice, rx: &BitSlice) -> SimResult<f64> {
    let compared = tx.len().min(rx.len());
    if compared == 0 {
        return Err(SimError::EmptyComparison);
    }
    let errors = bit_errors(tx, rx);
    Ok(errors as f64 / compared as f64)
}

/// Number of differing positions over the common prefix.
pub fn bit_errors(tx: &BitSlice, rx: &BitSlice) -> usize {
    tx.iter()
        .by_vals()
        .zip(rx.iter().by_vals())
        .filter(|(a, b)| a != b)
        .count()
}
