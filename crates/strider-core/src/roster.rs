//! A collection of characters updated together each frame.
//!
//! Characters never observe each other during an update: each one reads only
//! its own body, actor and source, plus the shared map and audio ports. That
//! makes the update embarrassingly parallel, so [`Roster::update_all`] runs it
//! on the rayon thread pool. Results come back in insertion order regardless
//! of scheduling.

use rayon::prelude::*;
use tracing::warn;

use crate::actor::ActorId;
use crate::controller::{CharacterController, FrameReport};
use crate::error::{ActorError, RosterError};
use crate::ports::MapPort;

/// Characters updated as a group.
#[derive(Debug, Default)]
pub struct Roster {
    controllers: Vec<CharacterController>,
}

impl Roster {
    /// Creates an empty roster.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a character and returns its actor id.
    ///
    /// # Errors
    ///
    /// Returns [`RosterError::DuplicateActor`] if a character with the same
    /// id is already present. The roster is left unchanged.
    pub fn add(&mut self, controller: CharacterController) -> Result<ActorId, RosterError> {
        let id = controller.actor().id();
        if self.position(id).is_some() {
            return Err(RosterError::DuplicateActor(id));
        }
        self.controllers.push(controller);
        Ok(id)
    }

    /// Removes the character with `id`, returning it.
    pub fn remove(&mut self, id: ActorId) -> Option<CharacterController> {
        let index = self.position(id)?;
        Some(self.controllers.remove(index))
    }

    /// The character with `id`.
    #[must_use]
    pub fn get(&self, id: ActorId) -> Option<&CharacterController> {
        self.controllers.iter().find(|c| c.actor().id() == id)
    }

    /// Mutable access to the character with `id`.
    pub fn get_mut(&mut self, id: ActorId) -> Option<&mut CharacterController> {
        self.controllers.iter_mut().find(|c| c.actor().id() == id)
    }

    /// Number of characters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.controllers.len()
    }

    /// Whether the roster is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.controllers.is_empty()
    }

    /// Characters in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &CharacterController> {
        self.controllers.iter()
    }

    /// Updates every character by `dt` seconds.
    ///
    /// One character's failure does not stop the others; each gets its own
    /// result, in insertion order.
    pub fn update_all(&mut self, map: &dyn MapPort, dt: f32) -> Vec<Result<FrameReport, ActorError>> {
        let results: Vec<_> = self
            .controllers
            .par_iter_mut()
            .map(|controller| controller.update(map, dt))
            .collect();

        for (controller, result) in self.controllers.iter().zip(&results) {
            if let Err(err) = result {
                warn!(actor = %controller.actor().id(), error = %err, "update failed");
            }
        }
        results
    }

    fn position(&self, id: ActorId) -> Option<usize> {
        self.controllers.iter().position(|c| c.actor().id() == id)
    }
}
