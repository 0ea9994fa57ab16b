//! Winner selection and the randomness source shared with the challenge
//! dispenser.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::contact::{Contact, TouchId};

// ════════════════════════════════════════════════════════════════════════════
// RandomIndex
// ════════════════════════════════════════════════════════════════════════════

/// Source of uniform indices.  Not required to be cryptographically strong.
pub trait RandomIndex {
    /// Uniform index in `[0, len)`.  `len` is never zero.
    fn index(&mut self, len: usize) -> usize;
}

/// Adapter turning any `rand` generator into a [`RandomIndex`].
#[derive(Debug, Clone)]
pub struct RngIndex<R>(pub R);

/// The generator used outside of tests.
pub type DefaultRandom = RngIndex<StdRng>;

impl RngIndex<StdRng> {
    pub fn from_os_rng() -> Self {
        RngIndex(StdRng::from_os_rng())
    }

    /// Reproducible sequence, for demos and debugging.
    pub fn seeded(seed: u64) -> Self {
        RngIndex(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> RandomIndex for RngIndex<R> {
    fn index(&mut self, len: usize) -> usize {
        self.0.random_range(0..len)
    }
}

impl<T: RandomIndex + ?Sized> RandomIndex for &mut T {
    fn index(&mut self, len: usize) -> usize {
        (**self).index(len)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// select_winner
// ════════════════════════════════════════════════════════════════════════════

/// Pick one of `active` uniformly at random.
///
/// The caller only selects after the hold gate fired, so `active` holds at
/// least two contacts.  An empty slice is an internal bug: it trips a debug
/// assertion and yields `None` in release builds.
pub fn select_winner<R: RandomIndex + ?Sized>(active: &[Contact], rng: &mut R) -> Option<TouchId> {
    debug_assert!(!active.is_empty(), "selection attempted with no active contacts");
    if active.is_empty() {
        return None;
    }
    let i = rng.index(active.len());
    debug_assert!(i < active.len(), "random index {} out of range for {} contacts", i, active.len());
    Some(active[i.min(active.len() - 1)].id)
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contact::Point;

    struct Fixed(usize);
    impl RandomIndex for Fixed {
        fn index(&mut self, _len: usize) -> usize { self.0 }
    }

    fn contacts(ids: &[u64]) -> Vec<Contact> {
        ids.iter()
            .map(|&id| Contact { id: TouchId(id), position: Point::default() })
            .collect()
    }

    #[test]
    fn picks_by_index() {
        let active = contacts(&[4, 8, 15]);
        assert_eq!(select_winner(&active, &mut Fixed(0)), Some(TouchId(4)));
        assert_eq!(select_winner(&active, &mut Fixed(2)), Some(TouchId(15)));
    }

    #[test]
    #[should_panic(expected = "out of range")]
    #[cfg(debug_assertions)]
    fn out_of_range_source_fails_loudly() {
        select_winner(&contacts(&[1, 2]), &mut Fixed(2));
    }

    #[test]
    #[cfg(not(debug_assertions))]
    fn out_of_range_source_is_clamped() {
        let active = contacts(&[1, 2]);
        assert_eq!(select_winner(&active, &mut Fixed(99)), Some(TouchId(2)));
    }

    #[test]
    fn seeded_rng_stays_in_range() {
        let active = contacts(&[1, 2, 3]);
        let mut rng = RngIndex::seeded(7);
        for _ in 0..200 {
            let w = select_winner(&active, &mut rng).unwrap();
            assert!(active.iter().any(|c| c.id == w));
        }
    }

    #[test]
    fn seeded_rng_reaches_every_index() {
        let mut rng = RngIndex::seeded(42);
        let mut seen = [false; 4];
        for _ in 0..400 {
            seen[rng.index(4)] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    #[should_panic(expected = "no active contacts")]
    #[cfg(debug_assertions)]
    fn empty_selection_fails_loudly() {
        select_winner(&[], &mut Fixed(0));
    }
}
