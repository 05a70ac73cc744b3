//! Weighted random selection
//!
//! Selection works by cumulative-weight comparison against a uniform draw.
//! Every call site takes `&mut impl Rng` so a run seeded through
//! [`seeded_rng`] reproduces the exact same sequence of choices.

use crate::error::SelectionError;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A fixed table of options with positive total weight
#[derive(Debug, Clone)]
pub struct WeightedChoice<T> {
    items: Vec<(T, f64)>,
    total: f64,
}

impl<T> WeightedChoice<T> {
    /// Build a selection table. Individual zero weights are allowed as long
    /// as the total is positive; negative weights are not.
    pub fn new(items: Vec<(T, f64)>) -> Result<Self, SelectionError> {
        if items.is_empty() {
            return Err(SelectionError::Empty);
        }

        let total: f64 = items.iter().map(|(_, w)| *w).sum();
        if total <= 0.0 || items.iter().any(|(_, w)| *w < 0.0) {
            return Err(SelectionError::NonPositiveTotal(total));
        }

        Ok(Self { items, total })
    }

    /// Draw one option by cumulative-weight comparison
    pub fn pick<'a, R: Rng + ?Sized>(&'a self, rng: &mut R) -> &'a T {
        let roll: f64 = rng.gen_range(0.0..self.total);
        let mut cumulative = 0.0;

        for (item, weight) in &self.items {
            cumulative += weight;
            if roll < cumulative {
                return item;
            }
        }

        // Float accumulation can land exactly on the total
        &self.items[self.items.len() - 1].0
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Bernoulli draw with the given probability
pub fn roll<R: Rng + ?Sized>(rng: &mut R, probability: f64) -> bool {
    if probability <= 0.0 {
        return false;
    }
    if probability >= 1.0 {
        return true;
    }
    rng.gen_range(0.0..1.0) < probability
}

/// Build a generator RNG. A configured seed makes the run reproducible;
/// the stream index keeps independent workers from sharing a sequence.
pub fn seeded_rng(seed: Option<u64>, stream: u64) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(stream.wrapping_mul(0x9E37_79B9_7F4A_7C15))),
        None => StdRng::from_entropy(),
    }
}
