//! Direction vocabulary shared by movement and animation lookup.
//!
//! A [`Direction`] is both a movement selector (which axis and sign to move
//! along) and an index into the walk tracks of an
//! [`AnimationSet`](crate::animation::AnimationSet). [`Direction::None`]
//! selects no movement and maps to the static idle frame, never to a
//! looping track.
//!
//! # Example
//!
//! ```
//! use strider_core::direction::{Axis, Direction};
//! use glam::Vec2;
//!
//! assert_eq!(Direction::Left.unit(), Vec2::new(-1.0, 0.0));
//! assert_eq!(Direction::Up.axis(), Some(Axis::Vertical));
//! assert_eq!(Direction::None.axis(), None);
//! assert_eq!(Direction::Down.opposite(), Direction::Up);
//! ```

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Facing and movement direction of an actor.
///
/// `Up` moves towards positive y, matching a y-up world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Direction {
    /// No movement; the actor shows its idle frame.
    #[default]
    None,
    /// Negative x.
    Left,
    /// Positive x.
    Right,
    /// Positive y.
    Up,
    /// Negative y.
    Down,
}

/// Movement axis of a non-`None` direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    /// Left/right.
    Horizontal,
    /// Up/down.
    Vertical,
}

impl Direction {
    /// The four movement directions, in polling order.
    pub const MOVING: [Direction; 4] = [
        Direction::Left,
        Direction::Right,
        Direction::Up,
        Direction::Down,
    ];

    /// Unit vector for this direction. `None` is the zero vector.
    #[must_use]
    pub const fn unit(self) -> Vec2 {
        match self {
            Self::None => Vec2::ZERO,
            Self::Left => Vec2::new(-1.0, 0.0),
            Self::Right => Vec2::new(1.0, 0.0),
            Self::Up => Vec2::new(0.0, 1.0),
            Self::Down => Vec2::new(0.0, -1.0),
        }
    }

    /// Axis this direction moves along.
    #[must_use]
    pub const fn axis(self) -> Option<Axis> {
        match self {
            Self::None => None,
            Self::Left | Self::Right => Some(Axis::Horizontal),
            Self::Up | Self::Down => Some(Axis::Vertical),
        }
    }

    /// The direction pointing the other way on the same axis.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::None => Self::None,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
            Self::Up => Self::Down,
            Self::Down => Self::Up,
        }
    }

    /// Whether this is [`Direction::None`].
    #[must_use]
    pub const fn is_none(self) -> bool {
        matches!(self, Self::None)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Left => write!(f, "left"),
            Self::Right => write!(f, "right"),
            Self::Up => write!(f, "up"),
            Self::Down => write!(f, "down"),
        }
    }
}
