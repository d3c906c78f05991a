//! Scatter fixture
//!
//! Seeded random placement of colored rectangles around the viewer, used by
//! the demo and by tests that need a deterministic multi-billboard scene.

#![allow(dead_code)]

use super::{Billboard, BillboardId, PanelImage, ScenePair};
use glam::{Vec2, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Number of rectangles in the fixture
pub const SCATTER_COUNT: usize = 10;
/// Unscaled rectangle edge length in world units
pub const SCATTER_BASE_SIZE: f32 = 100.0;

/// One generated rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScatterRect {
    pub color: [u8; 4],
    pub position: Vec3,
    pub scale: f32,
}

/// Generate the fixture rectangles for a seed. Colors are uniform over the
/// 24-bit RGB range, coordinates uniform in [-100, 300) per axis, scale
/// uniform in [0.5, 1.5).
pub fn scatter_rects(seed: u64) -> Vec<ScatterRect> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..SCATTER_COUNT)
        .map(|_| {
            let rgb = rng.random_range(0..0x1000000u32);
            let color = [(rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8, 255];
            let position = Vec3::new(
                rng.random_range(-100.0..300.0),
                rng.random_range(-100.0..300.0),
                rng.random_range(-100.0..300.0),
            );
            let scale = rng.random_range(0.5..1.5);
            ScatterRect {
                color,
                position,
                scale,
            }
        })
        .collect()
}

/// Place the fixture into both scenes, returning the (left, right) handle
/// for each rectangle.
pub fn populate_scatter(pair: &mut ScenePair, seed: u64) -> Vec<(BillboardId, BillboardId)> {
    scatter_rects(seed)
        .into_iter()
        .enumerate()
        .map(|(i, rect)| {
            let size = Vec2::splat(SCATTER_BASE_SIZE * rect.scale);
            let name = format!("rect-{}", i);
            let mut left = Billboard::new(&name, PanelImage::solid(8, 8, rect.color), size);
            left.position = rect.position;
            let mut right = Billboard::new(&name, PanelImage::solid(8, 8, rect.color), size);
            right.position = rect.position;
            (pair.left.add(left), pair.right.add(right))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_rects() {
        assert_eq!(scatter_rects(7), scatter_rects(7));
    }

    #[test]
    fn test_different_seeds_differ() {
        assert_ne!(scatter_rects(1), scatter_rects(2));
    }

    #[test]
    fn test_rects_within_ranges() {
        for rect in scatter_rects(42) {
            for coord in [rect.position.x, rect.position.y, rect.position.z] {
                assert!((-100.0..300.0).contains(&coord));
            }
            assert!((0.5..1.5).contains(&rect.scale));
            assert_eq!(rect.color[3], 255);
        }
    }

    #[test]
    fn test_populate_fills_both_scenes() {
        let mut pair = ScenePair::default();
        let handles = populate_scatter(&mut pair, 42);
        assert_eq!(handles.len(), SCATTER_COUNT);
        assert_eq!(pair.left.len(), SCATTER_COUNT);
        assert_eq!(pair.right.len(), SCATTER_COUNT);
        for (left, right) in &handles {
            let l = pair.left.get(*left).unwrap();
            let r = pair.right.get(*right).unwrap();
            assert_eq!(l.position, r.position);
            assert_eq!(l.size, r.size);
            assert_eq!(l.image, r.image);
        }
    }

    #[test]
    fn test_populated_scenes_are_independent() {
        let mut pair = ScenePair::default();
        let handles = populate_scatter(&mut pair, 42);
        let (left, right) = handles[0];
        pair.left.get_mut(left).unwrap().position = Vec3::ZERO;
        let original = scatter_rects(42)[0].position;
        assert_eq!(pair.right.get(right).unwrap().position, original);
    }
}
