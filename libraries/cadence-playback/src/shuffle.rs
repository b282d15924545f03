//! Shuffle index selection
//!
//! Shuffle does not reorder the queues. Each step draws the next position
//! uniformly from the active queue instead, so the queue the listener sees
//! keeps its original order.

use rand::Rng;

/// Draw a uniformly random index in `[0, len)`
///
/// Returns `None` for an empty queue. A single-element queue always yields 0.
pub fn random_index<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Option<usize> {
    match len {
        0 => None,
        1 => Some(0),
        _ => Some(rng.gen_range(0..len)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn empty_queue_has_no_index() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(random_index(0, &mut rng), None);
    }

    #[test]
    fn single_track_always_reselected() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            assert_eq!(random_index(1, &mut rng), Some(0));
        }
    }

    #[test]
    fn indices_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..1000 {
            let index = random_index(5, &mut rng).unwrap();
            assert!(index < 5);
        }
    }
}
