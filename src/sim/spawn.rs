//! Target placement
//!
//! Uniform, independent per axis, no minimum distance from the previous spot.

use glam::Vec2;
use rand::Rng;

use super::state::PlayArea;
use crate::consts::{PADDING, TARGET_SIZE};

/// Width/height of the range the top-left corner may be drawn from.
/// Clamped to zero when the area can't fit a target plus padding.
pub fn placement_range(area: PlayArea) -> Vec2 {
    Vec2::new(
        (area.width - TARGET_SIZE - PADDING * 2.0).max(0.0),
        (area.height - TARGET_SIZE - PADDING * 2.0).max(0.0),
    )
}

/// Random top-left corner for a new target
pub fn random_position<R: Rng + ?Sized>(rng: &mut R, area: PlayArea) -> Vec2 {
    let range = placement_range(area);
    let x = rng.random::<f32>() * range.x + PADDING;
    let y = rng.random::<f32>() * range.y + PADDING;
    Vec2::new(x, y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_placement_range() {
        let range = placement_range(PlayArea::new(400.0, 300.0));
        assert_eq!(range, Vec2::new(320.0, 220.0));
    }

    #[test]
    fn test_degenerate_area_clamps_to_padding() {
        let mut rng = Pcg32::seed_from_u64(7);
        for area in [
            PlayArea::new(0.0, 0.0),
            PlayArea::new(50.0, 50.0),
            PlayArea::new(80.0, 10.0),
        ] {
            assert_eq!(placement_range(area), Vec2::ZERO);
            let pos = random_position(&mut rng, area);
            assert_eq!(pos, Vec2::splat(PADDING));
        }
    }

    #[test]
    fn test_same_seed_same_positions() {
        let area = PlayArea::new(640.0, 480.0);
        let mut a = Pcg32::seed_from_u64(42);
        let mut b = Pcg32::seed_from_u64(42);
        for _ in 0..10 {
            assert_eq!(random_position(&mut a, area), random_position(&mut b, area));
        }
    }

    proptest! {
        #[test]
        fn prop_position_within_bounds(
            seed in any::<u64>(),
            width in 0.0f32..2000.0,
            height in 0.0f32..2000.0,
        ) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let area = PlayArea::new(width, height);
            let pos = random_position(&mut rng, area);

            let range = placement_range(area);
            let max_x = range.x + PADDING;
            let max_y = range.y + PADDING;
            prop_assert!(max_x <= (width - TARGET_SIZE - PADDING).max(PADDING) + 0.001);
            prop_assert!(pos.x >= PADDING && pos.x <= max_x);
            prop_assert!(pos.y >= PADDING && pos.y <= max_y);
        }
    }
}
