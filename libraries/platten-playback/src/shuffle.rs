//! Shuffle draws for the queue's play order
//!
//! The queue keeps a play order of indices into its track list. Shuffling
//! never permutes the whole order up front: each step draws one index from
//! the not-yet-played remainder, so toggling shuffle mid-pass only affects
//! what comes next, and the undrawn remainder always stays in original order.

use rand::{thread_rng, Rng};

/// Draw a random element of `remainder` and move it to the front
///
/// Every element has the same chance of being picked. The elements that were
/// not picked keep their relative order. Does nothing on slices shorter than
/// two.
pub(crate) fn draw_to_front(remainder: &mut [usize]) {
    draw_to_front_with(remainder, &mut thread_rng());
}

/// Same as [`draw_to_front`] with a caller-supplied random source
pub(crate) fn draw_to_front_with<R: Rng + ?Sized>(remainder: &mut [usize], rng: &mut R) {
    if remainder.len() < 2 {
        return;
    }
    let pick = rng.gen_range(0..remainder.len());
    remainder[..=pick].rotate_right(1);
}

/// Pick a random start position for a fresh shuffled pass
pub(crate) fn random_start(len: usize) -> Option<usize> {
    (len > 0).then(|| thread_rng().gen_range(0..len))
}
