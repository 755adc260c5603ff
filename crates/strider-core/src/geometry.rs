//! Axis-aligned rectangles and the collision footprint derived from a sprite.
//!
//! The collision rectangle of an actor is never stored independently: it is
//! recomputed from the actor's position and the sprite size through a
//! [`Footprint`] every time the position changes.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle given by its minimum corner and size.
///
/// # Example
///
/// ```
/// use strider_core::geometry::Rect;
/// use glam::Vec2;
///
/// let a = Rect::new(Vec2::new(0.0, 0.0), Vec2::new(10.0, 4.0));
/// let b = a.translated(Vec2::new(5.0, 0.0));
///
/// assert!(a.intersects(&b));
/// assert_eq!(b.max(), Vec2::new(15.0, 4.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Minimum corner (bottom-left in a y-up world).
    pub origin: Vec2,
    /// Width and height. Both are non-negative.
    pub size: Vec2,
}

impl Rect {
    /// Creates a rectangle. Negative size components are clamped to zero.
    #[must_use]
    pub fn new(origin: Vec2, size: Vec2) -> Self {
        Self {
            origin,
            size: size.max(Vec2::ZERO),
        }
    }

    /// Maximum corner.
    #[must_use]
    pub fn max(&self) -> Vec2 {
        self.origin + self.size
    }

    /// Width of the rectangle.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.size.x
    }

    /// Height of the rectangle.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.size.y
    }

    /// Returns this rectangle shifted by `delta`, same size.
    #[must_use]
    pub fn translated(&self, delta: Vec2) -> Self {
        Self {
            origin: self.origin + delta,
            size: self.size,
        }
    }

    /// Whether `point` lies inside the rectangle (edges inclusive).
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        let max = self.max();
        point.x >= self.origin.x && point.x <= max.x && point.y >= self.origin.y && point.y <= max.y
    }

    /// Whether the two rectangles overlap with positive area.
    #[must_use]
    pub fn intersects(&self, other: &Rect) -> bool {
        let a_max = self.max();
        let b_max = other.max();
        self.origin.x < b_max.x
            && other.origin.x < a_max.x
            && self.origin.y < b_max.y
            && other.origin.y < a_max.y
    }
}

/// Proportions of the collision footprint relative to the sprite cell.
///
/// The footprint is narrower than the sprite and only a thin strip at the
/// sprite's feet, so characters can overlap walls visually with their heads
/// while their feet still collide.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Footprint {
    /// Footprint width as a fraction of the sprite width, in `(0, 1]`.
    pub width_scale: f32,
    /// Footprint height as a fraction of the sprite height, in `(0, 1]`.
    pub height_scale: f32,
}

impl Default for Footprint {
    fn default() -> Self {
        Self {
            width_scale: 0.5,
            height_scale: 0.2,
        }
    }
}

impl Footprint {
    /// Collision rectangle of a sprite whose bottom-left corner is at
    /// `position`.
    ///
    /// The rectangle is centered horizontally on the sprite and sits on its
    /// bottom edge.
    ///
    /// # Example
    ///
    /// ```
    /// use strider_core::geometry::Footprint;
    /// use glam::Vec2;
    ///
    /// let footprint = Footprint { width_scale: 0.5, height_scale: 0.25 };
    /// let rect = footprint.collision_rect(Vec2::new(100.0, 50.0), Vec2::new(32.0, 48.0));
    ///
    /// assert_eq!(rect.origin, Vec2::new(108.0, 50.0));
    /// assert_eq!(rect.size, Vec2::new(16.0, 12.0));
    /// ```
    #[must_use]
    pub fn collision_rect(&self, position: Vec2, sprite_size: Vec2) -> Rect {
        let size = Vec2::new(
            sprite_size.x * self.width_scale,
            sprite_size.y * self.height_scale,
        );
        let inset = Vec2::new((sprite_size.x - size.x) / 2.0, 0.0);
        Rect::new(position + inset, size)
    }
}
