use glam::Vec2;

/// Axis-aligned rectangle in play-area coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl Bounds {
    /// An inverted rectangle: the identity for `union`.
    pub const NOTHING: Bounds = Bounds {
        min: Vec2::splat(f32::INFINITY),
        max: Vec2::splat(f32::NEG_INFINITY),
    };

    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Build from `x, y, width, height`.
    pub fn from_rect(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self::new(Vec2::new(x, y), Vec2::new(x + width, y + height))
    }

    /// Square bounds around a circle.
    pub fn around(center: Vec2, radius: f32) -> Self {
        Self::new(center - Vec2::splat(radius), center + Vec2::splat(radius))
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds::new(self.min.min(other.min), self.max.max(other.max))
    }

    /// Grow by `amount` in total along each axis (half on each side).
    pub fn padded(&self, amount: f32) -> Bounds {
        let half = Vec2::splat(amount / 2.0);
        Bounds::new(self.min - half, self.max + half)
    }

    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Strict overlap: rectangles that only touch along an edge do not intersect.
    pub fn intersects(&self, other: &Bounds) -> bool {
        self.min.x < other.max.x
            && other.min.x < self.max.x
            && self.min.y < other.max.y
            && other.min.y < self.max.y
    }
}
