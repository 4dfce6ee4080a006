//! Bit-group to symbol mapping and hard-decision slicing.

use bitvec::slice::BitSlice;
use bitvec::vec::BitVec;
use rustfft::num_complex::Complex64;

use crate::constellation::Constellation;

/// Map bits onto constellation points.
///
/// Bits are taken in groups of `bits_per_symbol`, most significant bit first,
/// and each group indexes the point table. A trailing partial group is dropped.
pub fn modulate(constellation: &Constellation, bits: &BitSlice) -> Vec<Complex64> {
    let points = constellation.points();
    bits.chunks_exact(constellation.bits_per_symbol())
        .map(|group| {
            let index = group
                .iter()
                .by_vals()
                .fold(0usize, |acc, bit| (acc << 1) | bit as usize);
            points[index]
        })
        .collect()
}

/// Recover bits by choosing the nearest point for each symbol.
pub fn demodulate(constellation: &Constellation, symbols: &[Complex64]) -> BitVec {
    let bps = constellation.bits_per_symbol();
    let mut bits = BitVec::with_capacity(symbols.len() * bps);
    for symbol in symbols {
        let index = nearest_index(constellation.points(), *symbol);
        for shift in (0..bps).rev() {
            bits.push((index >> shift) & 1 == 1);
        }
    }
    bits
}

/// Index of the closest point. Equal distances resolve to the lowest index.
pub fn nearest_index(points: &[Complex64], symbol: Complex64) -> usize {
    let mut best = 0;
    let mut best_dist = f64::INFINITY;
    for (i, point) in points.iter().enumerate() {
        let dist = (symbol - point).norm();
        if dist < best_dist {
            best_dist = dist;
            best = i;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constellation::Modulation;
    use bitvec::prelude::*;
    use rstest::rstest;

    #[test]
    fn qpsk_known_pattern() {
        let qpsk = Constellation::new(Modulation::Qpsk);
        let bits = bitvec![0, 0, 0, 1, 1, 0, 1, 1];
        let symbols = modulate(&qpsk, &bits);

        assert_eq!(symbols.len(), 4);
        for (i, symbol) in symbols.iter().enumerate() {
            assert!((symbol - qpsk.points()[i]).norm() < 1e-10);
        }
        assert_eq!(demodulate(&qpsk, &symbols), bits);
    }

    #[test]
    fn qam16_known_pattern() {
        let qam = Constellation::new(Modulation::Qam16);
        let bits = bitvec![0, 0, 0, 0, 1, 1, 1, 1];
        let symbols = modulate(&qam, &bits);

        assert_eq!(symbols.len(), 2);
        assert_eq!(symbols[0], qam.points()[0]);
        assert_eq!(symbols[1], qam.points()[15]);
    }

    #[test]
    fn trailing_partial_group_is_dropped() {
        let qam = Constellation::new(Modulation::Qam16);
        let bits = bitvec![1, 0, 1, 0, 1, 1];
        let symbols = modulate(&qam, &bits);
        assert_eq!(symbols, vec![qam.points()[0b1010]]);
        assert_eq!(demodulate(&qam, &symbols).len(), 4);
    }

    #[rstest]
    #[case(Modulation::Qpsk)]
    #[case(Modulation::Qam16)]
    fn every_index_survives_a_noiseless_pass(#[case] modulation: Modulation) {
        let c = Constellation::new(modulation);
        let bps = c.bits_per_symbol();
        let mut bits = BitVec::new();
        for index in 0..c.order() {
            for shift in (0..bps).rev() {
                bits.push((index >> shift) & 1 == 1);
            }
        }
        assert_eq!(demodulate(&c, &modulate(&c, &bits)), bits);
    }

    #[test]
    fn small_offsets_do_not_change_decisions() {
        let qam = Constellation::new(Modulation::Qam16);
        for (i, point) in qam.points().iter().enumerate() {
            let noisy = point + Complex64::new(0.05, -0.03);
            assert_eq!(nearest_index(qam.points(), noisy), i);
        }
    }

    #[test]
    fn ties_resolve_to_lowest_index() {
        let qpsk = Constellation::new(Modulation::Qpsk);
        // The origin is equidistant from all four points.
        assert_eq!(nearest_index(qpsk.points(), Complex64::new(0.0, 0.0)), 0);
        // On the imaginary axis, points 0 and 1 tie.
        assert_eq!(nearest_index(qpsk.points(), Complex64::new(0.0, 0.5)), 0);
        // On the negative real axis, points 1 and 2 tie.
        assert_eq!(nearest_index(qpsk.points(), Complex64::new(-0.5, 0.0)), 1);
    }
}
