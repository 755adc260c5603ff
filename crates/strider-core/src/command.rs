//! Input-triggered behaviors applied to a [`CharacterActor`].
//!
//! A [`Command`] is a plain tag. It carries no state, so one value can be
//! reused across frames and across actors. Applying it does exactly one
//! thing: a movement command records a movement request for the frame, the
//! attack command starts an attack.
//!
//! # Example
//!
//! ```
//! use strider_core::command::Command;
//! use strider_core::direction::Direction;
//!
//! assert_eq!(Command::MoveUp.direction(), Some(Direction::Up));
//! assert_eq!(Command::Attack.direction(), None);
//! assert_eq!(Command::for_direction(Direction::Left), Some(Command::MoveLeft));
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::actor::CharacterActor;
use crate::direction::Direction;
use crate::error::ActorError;

/// One input-triggered behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Command {
    /// Request movement to the left.
    MoveLeft,
    /// Request movement to the right.
    MoveRight,
    /// Request movement up.
    MoveUp,
    /// Request movement down.
    MoveDown,
    /// Start an attack.
    Attack,
}

impl Command {
    /// Every command, movement first.
    pub const ALL: [Command; 5] = [
        Command::MoveLeft,
        Command::MoveRight,
        Command::MoveUp,
        Command::MoveDown,
        Command::Attack,
    ];

    /// Movement direction carried by this command, if any.
    #[must_use]
    pub const fn direction(self) -> Option<Direction> {
        match self {
            Self::MoveLeft => Some(Direction::Left),
            Self::MoveRight => Some(Direction::Right),
            Self::MoveUp => Some(Direction::Up),
            Self::MoveDown => Some(Direction::Down),
            Self::Attack => None,
        }
    }

    /// Movement command for `direction`. `None` has no command.
    #[must_use]
    pub const fn for_direction(direction: Direction) -> Option<Self> {
        match direction {
            Direction::None => None,
            Direction::Left => Some(Self::MoveLeft),
            Direction::Right => Some(Self::MoveRight),
            Direction::Up => Some(Self::MoveUp),
            Direction::Down => Some(Self::MoveDown),
        }
    }

    /// Applies this command to `actor`.
    ///
    /// Movement commands only record the request; the position changes when
    /// the actor resolves movement for the frame.
    ///
    /// # Errors
    ///
    /// [`Command::Attack`] returns [`ActorError::Audio`] if the attack sound
    /// could not be played. Movement commands never fail.
    pub fn apply(self, actor: &mut CharacterActor) -> Result<(), ActorError> {
        match self.direction() {
            Some(direction) => {
                actor.request_move(direction);
                Ok(())
            }
            None => actor.set_attacking(true),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MoveLeft => write!(f, "move-left"),
            Self::MoveRight => write!(f, "move-right"),
            Self::MoveUp => write!(f, "move-up"),
            Self::MoveDown => write!(f, "move-down"),
            Self::Attack => write!(f, "attack"),
        }
    }
}
