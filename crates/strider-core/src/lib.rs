//! # Strider Core
//!
//! Per-frame character control for 2D action games.
//!
//! This crate turns player or AI input into movement, sprite animation frames
//! and audio cues for a character, one frame at a time. It owns no window,
//! renderer, tile map or audio device: those are reached through the traits
//! in [`ports`].
//!
//! ## Architecture
//!
//! - **Input**: [`input::InputHandler`] reads logical bindings from a device
//!   and yields [`command::Command`]s, cancelling opposing pairs
//! - **Actor**: [`actor::CharacterActor`] applies commands, validates
//!   movement against a [`ports::MapPort`], keeps the collision rectangle in
//!   step with the body and plays the attack sound on the rising edge
//! - **Animation**: [`animation::AnimationSet`] maps a direction and elapsed
//!   time to the frame to draw
//! - **Control**: [`controller::CharacterController`] composes a body, an
//!   actor and a [`controller::MovementSource`]; [`roster::Roster`] updates
//!   many controllers in parallel
//!
//! ## Usage
//!
//! ```
//! use std::sync::Arc;
//! use glam::Vec2;
//! use strider_core::prelude::*;
//! # struct OpenMap;
//! # impl MapPort for OpenMap {
//! #     fn valid_movement(&self, _: ActorRef<'_>, _: Direction) -> Result<bool, CollaboratorError> {
//! #         Ok(true)
//! #     }
//! # }
//!
//! let sheet = SpriteSheet::new("hero.png", 96, 128, 3, 4);
//! let animations = Arc::new(AnimationSet::from_sheet(&sheet, &AnimationTiming::default()).unwrap());
//! let body = CharacterBody::new(Vec2::ZERO, 100.0);
//! let actor = CharacterActor::new(ActorId::new(1), &body, animations, &ActorConfig::default(), Arc::new(MutedAudio)).unwrap();
//!
//! let mut roster = Roster::new();
//! roster.add(CharacterController::new(body, actor, Box::new(PlayerInput::new(BindingSet::MOVE_RIGHT)))).unwrap();
//!
//! let reports = roster.update_all(&OpenMap, 0.05);
//! assert_eq!(reports[0].as_ref().unwrap().position, Vec2::new(5.0, 0.0));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod actor;
pub mod animation;
pub mod command;
pub mod config;
pub mod controller;
pub mod direction;
pub mod error;
pub mod geometry;
pub mod input;
pub mod ports;
pub mod roster;

#[cfg(test)]
mod tests;

/// Commonly used types, for glob import.
pub mod prelude {
    pub use crate::actor::{ActorId, ActorRef, ActorState, CharacterActor, CharacterBody};
    pub use crate::animation::{AnimationSet, AnimationTiming, Frame, SpriteSheet, TrackId};
    pub use crate::command::Command;
    pub use crate::config::{ActorConfig, AudioCues};
    pub use crate::controller::{
        CharacterController, FrameReport, MovementSource, PlayerInput, ScriptStep, ScriptedPath,
        WanderConfig, Wanderer,
    };
    pub use crate::direction::Direction;
    pub use crate::error::{ActorError, CollaboratorError, ConfigError, RosterError, SheetError};
    pub use crate::geometry::{Footprint, Rect};
    pub use crate::input::{Binding, BindingSet, InputHandler, KeyCode, KeyMap, KeyboardState};
    pub use crate::ports::{AnimationAssetSource, AudioPort, InputDeviceSource, MapPort, MutedAudio, SheetCatalog};
    pub use crate::roster::Roster;
}
