//! Per-criterion auxiliary-variable prefixes.
//!
//! Each relaxed criterion gets a 3-character `[A-Z0-9]` prefix from its own
//! ChaCha8Rng. With a configured seed the RNG is seeded from
//! `(seed + criterion_index)`, so the same config yields the same names.

use std::collections::HashSet;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const PREFIX_LEN: usize = 3;

/// RNG for one criterion.
pub fn criterion_rng(seed: Option<u64>, criterion_index: u64) -> ChaCha8Rng {
    match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed.wrapping_add(criterion_index)),
        None => ChaCha8Rng::from_entropy(),
    }
}

pub fn random_prefix<R: Rng>(rng: &mut R) -> String {
    (0..PREFIX_LEN)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect()
}

/// Hands out prefixes that are unique within one formulation.
#[derive(Debug)]
pub struct PrefixAllocator {
    seed: Option<u64>,
    used: HashSet<String>,
}

impl PrefixAllocator {
    pub fn new(seed: Option<u64>) -> Self {
        Self {
            seed,
            used: HashSet::new(),
        }
    }

    pub fn next(&mut self, criterion_index: u64) -> String {
        let mut rng = criterion_rng(self.seed, criterion_index);
        loop {
            let prefix = random_prefix(&mut rng);
            if self.used.insert(prefix.clone()) {
                return prefix;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_prefix_is_deterministic() {
        let mut a = PrefixAllocator::new(Some(42));
        let mut b = PrefixAllocator::new(Some(42));
        assert_eq!(a.next(0), b.next(0));
        assert_eq!(a.next(1), b.next(1));
    }

    #[test]
    fn test_prefix_shape() {
        let mut rng = criterion_rng(Some(7), 0);
        let prefix = random_prefix(&mut rng);
        assert_eq!(prefix.len(), 3);
        assert!(prefix
            .bytes()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit()));
    }

    #[test]
    fn test_prefixes_never_collide() {
        let mut alloc = PrefixAllocator::new(Some(1));
        let prefixes: HashSet<String> = (0..200).map(|i| alloc.next(i)).collect();
        assert_eq!(prefixes.len(), 200);
    }

    #[test]
    fn test_same_index_twice_still_unique() {
        let mut alloc = PrefixAllocator::new(Some(9));
        let first = alloc.next(3);
        let second = alloc.next(3);
        assert_ne!(first, second);
    }
}
