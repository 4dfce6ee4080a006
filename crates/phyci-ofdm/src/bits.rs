use bitvec::vec::BitVec;
use rand::Rng;

/// Draw `count` uniformly distributed bits from `rng`.
pub fn random_bits<R: Rng + ?Sized>(rng: &mut R, count: usize) -> BitVec {
    (0..count).map(|_| rng.gen::<bool>()).collect()
}
