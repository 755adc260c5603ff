//! Fake collaborators and fixtures for tests.
//!
//! The fakes record what the core asked of them so tests can assert on the
//! exact calls, e.g. how many times the attack sound played.

use std::sync::{Arc, Mutex};

use glam::Vec2;

use crate::actor::{ActorId, ActorRef, CharacterActor, CharacterBody};
use crate::animation::{AnimationSet, AnimationTiming, SpriteSheet};
use crate::config::ActorConfig;
use crate::controller::{CharacterController, MovementSource};
use crate::direction::Direction;
use crate::error::CollaboratorError;
use crate::ports::{AudioPort, MapPort};

// =============================================================================
// Maps
// =============================================================================

/// Map that allows every movement.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenMap;

impl MapPort for OpenMap {
    fn valid_movement(&self, _actor: ActorRef<'_>, _direction: Direction) -> Result<bool, CollaboratorError> {
        Ok(true)
    }
}

/// Map that rejects every movement.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlockedMap;

impl MapPort for BlockedMap {
    fn valid_movement(&self, _actor: ActorRef<'_>, _direction: Direction) -> Result<bool, CollaboratorError> {
        Ok(false)
    }
}

/// Map whose every query fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingMap;

impl MapPort for FailingMap {
    fn valid_movement(&self, _actor: ActorRef<'_>, _direction: Direction) -> Result<bool, CollaboratorError> {
        Err("map not loaded".into())
    }
}

/// Map allowing a fixed set of directions and recording every query.
#[derive(Debug, Default)]
pub struct ScriptedMap {
    allowed: Vec<Direction>,
    queries: Mutex<Vec<Direction>>,
}

impl ScriptedMap {
    /// Allows exactly `directions`.
    pub fn allowing(directions: &[Direction]) -> Self {
        Self {
            allowed: directions.to_vec(),
            queries: Mutex::new(Vec::new()),
        }
    }

    /// Directions queried so far, in order.
    pub fn queries(&self) -> Vec<Direction> {
        self.queries.lock().unwrap().clone()
    }
}

impl MapPort for ScriptedMap {
    fn valid_movement(&self, _actor: ActorRef<'_>, direction: Direction) -> Result<bool, CollaboratorError> {
        self.queries.lock().unwrap().push(direction);
        Ok(self.allowed.contains(&direction))
    }
}

/// Map with a wall: anything whose probe rectangle crosses `x = wall_x`
/// moving right is rejected.
#[derive(Debug, Clone, Copy)]
pub struct WallMap {
    /// X coordinate of the wall.
    pub wall_x: f32,
}

impl MapPort for WallMap {
    fn valid_movement(&self, actor: ActorRef<'_>, direction: Direction) -> Result<bool, CollaboratorError> {
        Ok(actor.probe_rect(direction).max().x <= self.wall_x)
    }
}

// =============================================================================
// Audio
// =============================================================================

/// Audio sink recording every call.
#[derive(Debug, Default)]
pub struct RecordingAudio {
    effects: Mutex<Vec<(String, f32)>>,
    music: Mutex<Vec<(String, bool, f32)>>,
}

impl RecordingAudio {
    /// Number of sound effects played.
    pub fn effect_count(&self) -> usize {
        self.effects.lock().unwrap().len()
    }

    /// Sound effects played, as `(id, volume)`.
    pub fn effects(&self) -> Vec<(String, f32)> {
        self.effects.lock().unwrap().clone()
    }

    /// Music cues, as `(id, looping, volume)`.
    pub fn music(&self) -> Vec<(String, bool, f32)> {
        self.music.lock().unwrap().clone()
    }
}

impl AudioPort for RecordingAudio {
    fn play_sound_effect(&self, id: &str, volume: f32) -> Result<(), CollaboratorError> {
        self.effects.lock().unwrap().push((id.to_string(), volume));
        Ok(())
    }

    fn play_music(&self, id: &str, looping: bool, volume: f32) -> Result<(), CollaboratorError> {
        self.music.lock().unwrap().push((id.to_string(), looping, volume));
        Ok(())
    }
}

/// Audio sink whose every call fails.
#[derive(Debug, Default)]
pub struct BrokenAudio;

impl AudioPort for BrokenAudio {
    fn play_sound_effect(&self, _id: &str, _volume: f32) -> Result<(), CollaboratorError> {
        Err("audio device lost".into())
    }

    fn play_music(&self, _id: &str, _looping: bool, _volume: f32) -> Result<(), CollaboratorError> {
        Err("audio device lost".into())
    }
}

// =============================================================================
// Fixtures
// =============================================================================

/// Speed of every test body, in units per second.
pub const TEST_SPEED: f32 = 100.0;

/// A 96x128 sheet of 32x32 cells.
pub fn test_sheet() -> SpriteSheet {
    SpriteSheet::new("hero.png", 96, 128, 3, 4)
}

/// Animation set built from [`test_sheet`] with default timing.
pub fn test_animations() -> Arc<AnimationSet> {
    Arc::new(AnimationSet::from_sheet(&test_sheet(), &AnimationTiming::default()).unwrap())
}

/// Config with attack sound `"attack-id"` at full effect volume.
pub fn test_config() -> ActorConfig {
    ActorConfig::default()
        .with_attack_sound("attack-id")
        .with_effect_volume(1.0)
}

/// Creates an actor with id `id` whose body sits at `position`.
pub fn actor_at(
    id: u64,
    position: Vec2,
    audio: Arc<dyn AudioPort>,
) -> (CharacterActor, CharacterBody) {
    let body = CharacterBody::new(position, TEST_SPEED);
    let actor = CharacterActor::new(ActorId::new(id), &body, test_animations(), &test_config(), audio).unwrap();
    (actor, body)
}

/// Creates an actor at the origin wired to a [`RecordingAudio`].
pub fn actor_with_recorder() -> (CharacterActor, CharacterBody, Arc<RecordingAudio>) {
    let audio = Arc::new(RecordingAudio::default());
    let (actor, body) = actor_at(1, Vec2::ZERO, audio.clone());
    (actor, body, audio)
}

/// Creates a controller at the origin driven by `source`.
pub fn controller_with(source: Box<dyn MovementSource>) -> (CharacterController, Arc<RecordingAudio>) {
    let (actor, body, audio) = actor_with_recorder();
    (CharacterController::new(body, actor, source), audio)
}

/// Creates a controller with id `id` at `position`, muted.
pub fn controller_at(id: u64, position: Vec2, source: Box<dyn MovementSource>) -> CharacterController {
    let (actor, body) = actor_at(id, position, Arc::new(crate::ports::MutedAudio));
    CharacterController::new(body, actor, source)
}

/// Installs a test-writer tracing subscriber. Safe to call from every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();
}
