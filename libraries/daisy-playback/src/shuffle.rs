//! Shuffle selection
//!
//! Shuffle never permutes the playlist. It only picks which index plays next.

use rand::Rng;

/// Pick a uniformly random index different from `current`
///
/// Uses rejection sampling. Degenerates to 0 when the playlist has at most
/// one track.
pub fn pick_next<R: Rng + ?Sized>(len: usize, current: usize, rng: &mut R) -> usize {
    if len <= 1 {
        return 0;
    }

    loop {
        let candidate = rng.gen_range(0..len);
        if candidate != current {
            return candidate;
        }
    }
}
