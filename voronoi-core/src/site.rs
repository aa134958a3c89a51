//! Site, viewport and bounding box types.

use std::collections::HashSet;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// 2D position in world coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Squared distance to another position
    pub fn dist_sq(&self, other: &Position) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// Hashable identity of the exact coordinates.
    pub fn key(&self) -> SiteKey {
        SiteKey::from(*self)
    }
}

impl From<(f64, f64)> for Position {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Bit pattern of a position. Two keys are equal iff the positions are `==`.
///
/// `-0.0` is folded into `0.0` so the key agrees with float equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SiteKey(u64, u64);

impl From<Position> for SiteKey {
    fn from(p: Position) -> Self {
        // adding 0.0 turns -0.0 into 0.0 and leaves everything else alone
        SiteKey((p.x + 0.0).to_bits(), (p.y + 0.0).to_bits())
    }
}

/// Order-independent, duplicate-insensitive equality of two site lists.
///
/// Lists of different length are never equal, even if they hold the same
/// distinct positions.
pub fn same_site_set(a: &[Position], b: &[Position]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let left: HashSet<SiteKey> = a.iter().map(Position::key).collect();
    let right: HashSet<SiteKey> = b.iter().map(Position::key).collect();
    left == right
}

/// Size of the rendering surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Clipping box centered at the origin.
    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox {
            xmin: -self.width / 2.0,
            xmax: self.width / 2.0,
            ymin: -self.height / 2.0,
            ymax: self.height / 2.0,
        }
    }
}

/// Axis-aligned clipping rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub xmin: f64,
    pub xmax: f64,
    pub ymin: f64,
    pub ymax: f64,
}

impl BoundingBox {
    pub fn new(xmin: f64, xmax: f64, ymin: f64, ymax: f64) -> Self {
        Self { xmin, xmax, ymin, ymax }
    }

    pub fn width(&self) -> f64 {
        self.xmax - self.xmin
    }

    pub fn height(&self) -> f64 {
        self.ymax - self.ymin
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    pub fn contains(&self, p: &Position) -> bool {
        p.x >= self.xmin && p.x <= self.xmax && p.y >= self.ymin && p.y <= self.ymax
    }

    /// Corners in counter-clockwise order, starting bottom-left.
    pub fn corners(&self) -> [Position; 4] {
        [
            Position::new(self.xmin, self.ymin),
            Position::new(self.xmax, self.ymin),
            Position::new(self.xmax, self.ymax),
            Position::new(self.xmin, self.ymax),
        ]
    }
}

/// Sites at uniformly random positions inside the centered `width` x `height` box.
///
/// The same seed always yields the same sites.
pub fn random_sites(count: usize, width: f64, height: f64, seed: u64) -> Vec<Position> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            Position::new(
                rng.gen::<f64>() * width - width / 2.0,
                rng.gen::<f64>() * height - height / 2.0,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_site_set_ignores_order() {
        let a = [Position::new(1.0, 2.0), Position::new(3.0, 4.0)];
        let b = [Position::new(3.0, 4.0), Position::new(1.0, 2.0)];
        assert!(same_site_set(&a, &b));
    }

    #[test]
    fn test_same_site_set_length_mismatch() {
        let a = [Position::new(1.0, 2.0)];
        let b = [Position::new(1.0, 2.0), Position::new(1.0, 2.0)];
        assert!(!same_site_set(&a, &b));
    }

    #[test]
    fn test_same_site_set_is_exact() {
        let a = [Position::new(0.1 + 0.2, 0.0)];
        let b = [Position::new(0.3, 0.0)];
        assert!(!same_site_set(&a, &b));
    }

    #[test]
    fn test_signed_zero_keys_match() {
        assert_eq!(Position::new(-0.0, 0.0).key(), Position::new(0.0, -0.0).key());
    }

    #[test]
    fn test_bounding_box_is_centered() {
        let bbox = Viewport::new(800.0, 600.0).bounding_box();
        assert_eq!(bbox, BoundingBox::new(-400.0, 400.0, -300.0, 300.0));
    }

    #[test]
    fn test_random_sites_reproducible() {
        let a = random_sites(30, 1000.0, 500.0, 7);
        let b = random_sites(30, 1000.0, 500.0, 7);
        let c = random_sites(30, 1000.0, 500.0, 8);
        assert_eq!(a, b);
        assert_ne!(a, c);

        let bbox = Viewport::new(1000.0, 500.0).bounding_box();
        assert!(a.iter().all(|p| bbox.contains(p)));
    }
}
