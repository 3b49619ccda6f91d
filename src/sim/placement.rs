//! Puzzle piece placement
//!
//! Two policies produce the tray layout each time the puzzle opens or closes:
//! - `Scatter`: each piece lands uniformly inside a rectangle. Pieces may overlap.
//! - `ShuffleSlots`: the hand-placed home slots are permuted, so every slot is
//!   used exactly once.

use glam::Vec2;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlacementPolicy {
    /// Uniform scatter inside `x_range` (min, max) × `y_range` (min, max)
    Scatter { x_range: Vec2, y_range: Vec2 },
    /// Unbiased permutation of the home slots captured at setup
    ShuffleSlots,
}

/// Uniform sample in [a, b] regardless of argument order
fn sample_axis<R: Rng>(rng: &mut R, range: Vec2) -> f32 {
    let (lo, hi) = (range.x.min(range.y), range.x.max(range.y));
    if !lo.is_finite() || !hi.is_finite() {
        return 0.0;
    }
    // rand rescales the span internally, so keep clear of f32::MAX
    let span = hi - lo;
    if span.is_finite() && span < f32::MAX * 0.5 {
        return rng.random_range(lo..=hi);
    }
    log::warn!("Scatter range [{}, {}] too wide, sampling by blend", lo, hi);
    let t: f32 = rng.random();
    (lo * (1.0 - t) + hi * t).clamp(lo, hi)
}

/// Independent uniform positions, one per piece
pub fn scatter<R: Rng>(rng: &mut R, count: usize, x_range: Vec2, y_range: Vec2) -> Vec<Vec2> {
    (0..count)
        .map(|_| {
            let x = sample_axis(rng, x_range);
            let y = sample_axis(rng, y_range);
            Vec2::new(x, y)
        })
        .collect()
}

/// Fisher-Yates permutation of the home slots
pub fn shuffle_slots<R: Rng>(rng: &mut R, slots: &[Vec2]) -> Vec<Vec2> {
    let mut shuffled = slots.to_vec();
    shuffled.shuffle(rng);
    shuffled
}

/// Produce `count` positions under `policy`.
///
/// `home_slots` is only read by `ShuffleSlots`; if it holds fewer slots than
/// pieces the remainder keep their previous positions (callers get a shorter list).
pub fn place<R: Rng>(
    policy: &PlacementPolicy,
    rng: &mut R,
    count: usize,
    home_slots: &[Vec2],
) -> Vec<Vec2> {
    if count == 0 {
        return Vec::new();
    }
    match policy {
        PlacementPolicy::Scatter { x_range, y_range } => scatter(rng, count, *x_range, *y_range),
        PlacementPolicy::ShuffleSlots => {
            if home_slots.len() < count {
                log::warn!(
                    "Only {} home slots for {} pieces; extra pieces stay put",
                    home_slots.len(),
                    count
                );
            }
            let mut positions = shuffle_slots(rng, home_slots);
            positions.truncate(count);
            positions
        }
    }
}
