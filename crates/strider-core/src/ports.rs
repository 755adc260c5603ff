//! Interfaces to the collaborators the core consumes but does not own.
//!
//! The actor never talks to a tile map, an audio device, an asset loader or
//! an input device directly. Each of those is reached through one of the
//! traits in this module:
//!
//! - [`MapPort`]: answers whether a proposed movement is legal
//! - [`AudioPort`]: plays sound effects and music
//! - [`AnimationAssetSource`]: describes a character sheet by texture id
//! - [`InputDeviceSource`]: reports whether a logical binding is held
//!
//! Map and audio ports are shared between actors and may be used from
//! several threads when actors are updated in parallel, so they are
//! `Send + Sync` and take `&self`. Fallible calls return a
//! [`CollaboratorError`] which the core hands back to its caller untouched.

use std::collections::HashMap;

use crate::actor::ActorRef;
use crate::animation::SpriteSheet;
use crate::direction::Direction;
use crate::error::CollaboratorError;
use crate::input::Binding;

/// Movement validation against map constraints.
///
/// Implementations must be side-effect free as far as the core can observe:
/// the actor may ask about each candidate direction once per frame.
///
/// # Example
///
/// ```
/// use strider_core::actor::ActorRef;
/// use strider_core::direction::Direction;
/// use strider_core::error::CollaboratorError;
/// use strider_core::ports::MapPort;
///
/// /// A map with a wall along x = 100.
/// struct Corridor;
///
/// impl MapPort for Corridor {
///     fn valid_movement(
///         &self,
///         actor: ActorRef<'_>,
///         direction: Direction,
///     ) -> Result<bool, CollaboratorError> {
///         Ok(actor.probe_rect(direction).max().x <= 100.0)
///     }
/// }
/// ```
pub trait MapPort: Send + Sync {
    /// Whether `actor` may move one frame's worth in `direction`.
    ///
    /// # Errors
    ///
    /// Returns the map's own error if it cannot answer the query.
    fn valid_movement(&self, actor: ActorRef<'_>, direction: Direction) -> Result<bool, CollaboratorError>;
}

/// Fire-and-forget audio playback.
pub trait AudioPort: Send + Sync {
    /// Plays a one-shot sound effect.
    ///
    /// # Errors
    ///
    /// Returns the audio backend's error if playback could not start.
    fn play_sound_effect(&self, id: &str, volume: f32) -> Result<(), CollaboratorError>;

    /// Starts a music track, optionally looping.
    ///
    /// # Errors
    ///
    /// Returns the audio backend's error if playback could not start.
    fn play_music(&self, id: &str, looping: bool, volume: f32) -> Result<(), CollaboratorError>;
}

/// Source of character sheet descriptions.
pub trait AnimationAssetSource {
    /// Describes the sheet stored under `texture`.
    ///
    /// # Errors
    ///
    /// Returns the loader's error if the texture cannot be found or decoded.
    fn describe_sheet(&self, texture: &str) -> Result<SpriteSheet, CollaboratorError>;
}

/// Current state of the input device, by logical binding.
pub trait InputDeviceSource {
    /// Whether `binding` is actuated this frame.
    fn is_actuated(&self, binding: Binding) -> bool;
}

/// Audio sink that discards everything. Useful for silent characters.
#[derive(Debug, Clone, Copy, Default)]
pub struct MutedAudio;

impl AudioPort for MutedAudio {
    fn play_sound_effect(&self, _id: &str, _volume: f32) -> Result<(), CollaboratorError> {
        Ok(())
    }

    fn play_music(&self, _id: &str, _looping: bool, _volume: f32) -> Result<(), CollaboratorError> {
        Ok(())
    }
}

/// Asset source backed by a fixed table of sheet descriptions.
#[derive(Debug, Clone, Default)]
pub struct SheetCatalog {
    sheets: HashMap<String, SpriteSheet>,
}

impl SheetCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a sheet under its texture id, replacing any previous entry.
    pub fn insert(&mut self, sheet: SpriteSheet) {
        self.sheets.insert(sheet.texture.clone(), sheet);
    }

    /// Number of registered sheets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sheets.len()
    }

    /// Whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }
}

impl FromIterator<SpriteSheet> for SheetCatalog {
    fn from_iter<I: IntoIterator<Item = SpriteSheet>>(iter: I) -> Self {
        let mut catalog = Self::new();
        for sheet in iter {
            catalog.insert(sheet);
        }
        catalog
    }
}

impl AnimationAssetSource for SheetCatalog {
    fn describe_sheet(&self, texture: &str) -> Result<SpriteSheet, CollaboratorError> {
        self.sheets
            .get(texture)
            .cloned()
            .ok_or_else(|| format!("unknown texture '{texture}'").into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_describes_known_sheets() {
        let catalog: SheetCatalog = [SpriteSheet::new("hero.png", 96, 128, 3, 4)].into_iter().collect();
        assert_eq!(catalog.len(), 1);
        let sheet = catalog.describe_sheet("hero.png").unwrap();
        assert_eq!(sheet.width, 96);
    }

    #[test]
    fn catalog_reports_unknown_textures() {
        let catalog = SheetCatalog::new();
        let err = catalog.describe_sheet("ghost.png").unwrap_err();
        assert_eq!(err.to_string(), "unknown texture 'ghost.png'");
    }

    #[test]
    fn muted_audio_accepts_everything() {
        let audio = MutedAudio;
        assert!(audio.play_sound_effect("swing", 1.0).is_ok());
        assert!(audio.play_music("theme", true, 0.5).is_ok());
    }

    #[test]
    fn ports_are_object_safe() {
        fn _map(_port: &dyn MapPort) {}
        fn _audio(_port: std::sync::Arc<dyn AudioPort>) {}
        fn _assets(_port: &dyn AnimationAssetSource) {}
        fn _input(_port: &dyn InputDeviceSource) {}
    }
}
