//! The character actor: movement, animation and audio state of one character.
//!
//! A [`CharacterActor`] keeps the per-frame state of a character consistent:
//! which way it faces, whether it moved this frame, whether it is attacking,
//! and where its collision rectangle is. It does not own the character's
//! position or speed; those live in the character model's [`CharacterBody`],
//! which the actor borrows for each frame's movement resolution.
//!
//! # Frame Protocol
//!
//! Each frame the caller:
//!
//! 1. applies zero or more [`Command`](crate::command::Command)s, which call
//!    [`request_move`](CharacterActor::request_move) or
//!    [`set_attacking`](CharacterActor::set_attacking);
//! 2. calls [`resolve_movement`](CharacterActor::resolve_movement) exactly
//!    once, which validates the requests against the [`MapPort`], moves the
//!    body and recomputes the collision rectangle;
//! 3. asks [`current_frame`](CharacterActor::current_frame) what to draw.
//!
//! # Attack Sound
//!
//! The attack sound is edge-triggered: it plays when the attack state goes
//! from `false` to `true` and at no other time. Requesting an attack while
//! one is running is a no-op.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use glam::Vec2;
//! use strider_core::actor::{ActorId, CharacterActor, CharacterBody};
//! use strider_core::animation::{AnimationSet, AnimationTiming, SpriteSheet};
//! use strider_core::config::ActorConfig;
//! use strider_core::direction::Direction;
//! use strider_core::ports::MutedAudio;
//!
//! # use strider_core::{actor::ActorRef, error::CollaboratorError, ports::MapPort};
//! # struct OpenMap;
//! # impl MapPort for OpenMap {
//! #     fn valid_movement(&self, _: ActorRef<'_>, _: Direction) -> Result<bool, CollaboratorError> {
//! #         Ok(true)
//! #     }
//! # }
//! let sheet = SpriteSheet::new("hero.png", 96, 128, 3, 4);
//! let animations = Arc::new(AnimationSet::from_sheet(&sheet, &AnimationTiming::default()).unwrap());
//! let mut body = CharacterBody::new(Vec2::ZERO, 100.0);
//! let mut actor = CharacterActor::new(
//!     ActorId::new(1),
//!     &body,
//!     animations,
//!     &ActorConfig::default(),
//!     Arc::new(MutedAudio),
//! )
//! .unwrap();
//!
//! actor.request_move(Direction::Right);
//! actor.resolve_movement(&mut body, &OpenMap, 0.05).unwrap();
//!
//! assert_eq!(body.position, Vec2::new(5.0, 0.0));
//! assert_eq!(actor.direction(), Direction::Right);
//! assert!(actor.is_moving());
//! ```

use std::fmt;
use std::sync::Arc;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::animation::{AnimationSet, Frame, TrackId};
use crate::config::{ActorConfig, AudioCues};
use crate::direction::{Axis, Direction};
use crate::error::ActorError;
use crate::geometry::{Footprint, Rect};
use crate::ports::{AnimationAssetSource, AudioPort, MapPort};

// =============================================================================
// Identity and Body
// =============================================================================

/// Unique identifier for an actor.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ActorId(u64);

impl ActorId {
    /// Creates a new `ActorId` from a raw value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "actor:{}", self.0)
    }
}

impl From<u64> for ActorId {
    fn from(id: u64) -> Self {
        Self::new(id)
    }
}

/// Position and speed of a character, owned by the character model.
///
/// `position` is the bottom-left corner of the sprite. `speed` is in world
/// units per second.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CharacterBody {
    /// Bottom-left corner of the sprite.
    pub position: Vec2,
    /// Movement speed in units per second.
    pub speed: f32,
}

impl CharacterBody {
    /// Creates a body.
    #[must_use]
    pub const fn new(position: Vec2, speed: f32) -> Self {
        Self { position, speed }
    }
}

/// Read-only view of an actor together with its body.
///
/// This is what the [`MapPort`] sees when asked to validate a movement.
#[derive(Clone, Copy)]
pub struct ActorRef<'a> {
    actor: &'a CharacterActor,
    body: &'a CharacterBody,
}

impl<'a> ActorRef<'a> {
    /// Pairs an actor with its body.
    #[must_use]
    pub fn new(actor: &'a CharacterActor, body: &'a CharacterBody) -> Self {
        Self { actor, body }
    }

    /// The actor.
    #[must_use]
    pub fn actor(&self) -> &'a CharacterActor {
        self.actor
    }

    /// The actor's id.
    #[must_use]
    pub fn id(&self) -> ActorId {
        self.actor.id
    }

    /// Current position.
    #[must_use]
    pub fn position(&self) -> Vec2 {
        self.body.position
    }

    /// Movement speed.
    #[must_use]
    pub fn speed(&self) -> f32 {
        self.body.speed
    }

    /// Current collision rectangle.
    #[must_use]
    pub fn collision_rect(&self) -> Rect {
        self.actor.collision_rect
    }

    /// Current direction.
    #[must_use]
    pub fn direction(&self) -> Direction {
        self.actor.direction
    }

    /// Distance one step in any direction covers during the frame being
    /// resolved.
    #[must_use]
    pub fn step_length(&self) -> f32 {
        step_length(self.body.speed, self.actor.frame_dt)
    }

    /// Collision rectangle after one step in `direction`.
    #[must_use]
    pub fn probe_rect(&self, direction: Direction) -> Rect {
        self.actor
            .collision_rect
            .translated(direction.unit() * self.step_length())
    }
}

impl fmt::Debug for ActorRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActorRef")
            .field("id", &self.actor.id)
            .field("position", &self.body.position)
            .field("direction", &self.actor.direction)
            .finish()
    }
}

fn sanitize_dt(dt: f32) -> f32 {
    if dt.is_finite() {
        dt.max(0.0)
    } else {
        0.0
    }
}

fn step_length(speed: f32, dt: f32) -> f32 {
    let length = speed * dt;
    if length.is_finite() {
        length.max(0.0)
    } else {
        0.0
    }
}

// =============================================================================
// State
// =============================================================================

/// Coarse state of an actor, as seen by frame selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActorState {
    /// Not moving and not attacking.
    Idle,
    /// Moved this frame in the given direction.
    Moving(Direction),
    /// Attacking. Takes precedence over movement.
    Attacking,
}

/// Movement requested on one axis during the current frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum AxisIntent {
    #[default]
    Free,
    Toward(Direction),
    Cancelled,
}

impl AxisIntent {
    fn request(self, direction: Direction) -> Self {
        match self {
            Self::Free => Self::Toward(direction),
            Self::Toward(current) if current == direction => self,
            Self::Toward(_) | Self::Cancelled => Self::Cancelled,
        }
    }

    fn direction(self) -> Option<Direction> {
        match self {
            Self::Toward(direction) => Some(direction),
            Self::Free | Self::Cancelled => None,
        }
    }
}

// =============================================================================
// Character Actor
// =============================================================================

/// Runtime movement, animation and audio state of one character.
pub struct CharacterActor {
    id: ActorId,
    animations: Arc<AnimationSet>,
    footprint: Footprint,
    cues: AudioCues,
    audio: Arc<dyn AudioPort>,
    direction: Direction,
    attacking: bool,
    moving: bool,
    collision_rect: Rect,
    horizontal: AxisIntent,
    vertical: AxisIntent,
    frame_dt: f32,
}

impl fmt::Debug for CharacterActor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CharacterActor")
            .field("id", &self.id)
            .field("direction", &self.direction)
            .field("attacking", &self.attacking)
            .field("moving", &self.moving)
            .field("collision_rect", &self.collision_rect)
            .field("audio", &"[dyn AudioPort]")
            .finish_non_exhaustive()
    }
}

impl CharacterActor {
    /// Creates an actor from an already built animation set.
    ///
    /// The set may be shared between actors using the same sheet.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::Config`] if `config` fails validation.
    pub fn new(
        id: ActorId,
        body: &CharacterBody,
        animations: Arc<AnimationSet>,
        config: &ActorConfig,
        audio: Arc<dyn AudioPort>,
    ) -> Result<Self, ActorError> {
        config.validate()?;
        let collision_rect = config
            .footprint
            .collision_rect(body.position, animations.cell_size());
        Ok(Self {
            id,
            animations,
            footprint: config.footprint,
            cues: config.audio.clone(),
            audio,
            direction: Direction::None,
            attacking: false,
            moving: false,
            collision_rect,
            horizontal: AxisIntent::Free,
            vertical: AxisIntent::Free,
            frame_dt: 0.0,
        })
    }

    /// Creates an actor for the sheet stored under `texture`.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::AssetSource`] if the asset source cannot
    /// describe the texture, [`ActorError::Sheet`] if the sheet does not have
    /// the expected layout, and [`ActorError::Config`] for invalid config.
    pub fn load(
        id: ActorId,
        body: &CharacterBody,
        texture: &str,
        assets: &dyn AnimationAssetSource,
        config: &ActorConfig,
        audio: Arc<dyn AudioPort>,
    ) -> Result<Self, ActorError> {
        let sheet = assets.describe_sheet(texture).map_err(ActorError::AssetSource)?;
        let animations = AnimationSet::from_sheet(&sheet, &config.animation)?;
        Self::new(id, body, Arc::new(animations), config, audio)
    }

    /// The actor's id.
    #[must_use]
    pub fn id(&self) -> ActorId {
        self.id
    }

    /// The animation set.
    #[must_use]
    pub fn animations(&self) -> &Arc<AnimationSet> {
        &self.animations
    }

    /// Current facing and movement direction. `None` while idle.
    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Whether an attack is in progress.
    #[must_use]
    pub fn is_attacking(&self) -> bool {
        self.attacking
    }

    /// Whether the actor moved during the last resolved frame.
    #[must_use]
    pub fn is_moving(&self) -> bool {
        self.moving
    }

    /// Collision rectangle at the current position.
    #[must_use]
    pub fn collision_rect(&self) -> Rect {
        self.collision_rect
    }

    /// Size of the drawn sprite.
    #[must_use]
    pub fn sprite_size(&self) -> Vec2 {
        self.animations.cell_size()
    }

    /// Audio cues in use.
    #[must_use]
    pub fn cues(&self) -> &AudioCues {
        &self.cues
    }

    /// Coarse state for frame selection.
    #[must_use]
    pub fn state(&self) -> ActorState {
        if self.attacking {
            ActorState::Attacking
        } else if self.moving {
            ActorState::Moving(self.direction)
        } else {
            ActorState::Idle
        }
    }

    /// Pairs this actor with its body for read-only queries.
    #[must_use]
    pub fn view<'a>(&'a self, body: &'a CharacterBody) -> ActorRef<'a> {
        ActorRef::new(self, body)
    }

    /// Records a movement request for the current frame.
    ///
    /// Requests for both directions of one axis cancel each other for the
    /// rest of the frame. `Direction::None` is ignored.
    pub fn request_move(&mut self, direction: Direction) {
        match direction.axis() {
            Some(Axis::Horizontal) => self.horizontal = self.horizontal.request(direction),
            Some(Axis::Vertical) => self.vertical = self.vertical.request(direction),
            None => {}
        }
    }

    /// Starts or ends the attack.
    ///
    /// Starting an attack that is not running plays the attack sound once.
    /// Starting one that is already running does nothing. Ending an attack
    /// never plays audio.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::Audio`] if the attack sound could not be played.
    /// The attack has begun regardless.
    pub fn set_attacking(&mut self, attacking: bool) -> Result<(), ActorError> {
        match (self.attacking, attacking) {
            (false, true) => {
                self.attacking = true;
                debug!(actor = %self.id, sound = %self.cues.attack_sound, "attack started");
                self.audio
                    .play_sound_effect(&self.cues.attack_sound, self.cues.effect_volume)
                    .map_err(ActorError::Audio)
            }
            (true, false) => {
                self.attacking = false;
                debug!(actor = %self.id, "attack ended");
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// Resolves this frame's movement requests against the map.
    ///
    /// Each requested axis is validated separately. A valid step moves the
    /// body by `speed * dt` along that axis; a rejected step leaves the body
    /// where it is. When both axes move, the vertical direction becomes the
    /// facing direction. With no valid step the actor is idle and faces
    /// [`Direction::None`]. The collision rectangle is recomputed from the
    /// body's position in every case, and the frame's requests are cleared.
    ///
    /// Negative, NaN and infinite `dt` are treated as zero.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::Map`] if the map fails to answer. Steps
    /// committed before the failure stay committed and the collision
    /// rectangle still matches the body.
    pub fn resolve_movement(
        &mut self,
        body: &mut CharacterBody,
        map: &dyn MapPort,
        dt: f32,
    ) -> Result<(), ActorError> {
        self.frame_dt = sanitize_dt(dt);
        let requests = [
            std::mem::take(&mut self.horizontal).direction(),
            std::mem::take(&mut self.vertical).direction(),
        ];

        let was = self.state();
        let mut facing = Direction::None;
        let mut outcome = Ok(());

        for direction in requests.into_iter().flatten() {
            match map.valid_movement(self.view(body), direction) {
                Ok(true) => {
                    let delta = direction.unit() * step_length(body.speed, self.frame_dt);
                    body.position += delta;
                    self.collision_rect = self.rect_at(body.position);
                    facing = direction;
                    trace!(actor = %self.id, %direction, dx = delta.x, dy = delta.y, "step");
                }
                Ok(false) => {
                    trace!(actor = %self.id, %direction, "movement rejected by map");
                }
                Err(source) => {
                    outcome = Err(ActorError::Map(source));
                    break;
                }
            }
        }

        self.direction = facing;
        self.moving = !facing.is_none();
        self.collision_rect = self.rect_at(body.position);

        let now = self.state();
        if was != now {
            debug!(actor = %self.id, from = ?was, to = ?now, "state changed");
        }
        outcome
    }

    /// Recomputes the collision rectangle after the body was moved outside
    /// of [`resolve_movement`](Self::resolve_movement), e.g. a teleport.
    pub fn sync_body(&mut self, body: &CharacterBody) {
        self.collision_rect = self.rect_at(body.position);
    }

    /// Frame to draw `elapsed` seconds into the current state.
    ///
    /// Attacking shows the attack track, moving shows the walk track of the
    /// current direction, anything else shows the idle frame.
    #[must_use]
    pub fn current_frame(&self, elapsed: f32) -> Frame {
        match self.state() {
            ActorState::Attacking => self.animations.frame_at(TrackId::Attack, elapsed),
            ActorState::Moving(direction) => self.frame_for(direction, elapsed),
            ActorState::Idle => self.animations.idle(),
        }
    }

    /// Walk frame for `direction`, or the idle frame for `Direction::None`.
    #[must_use]
    pub fn frame_for(&self, direction: Direction, elapsed: f32) -> Frame {
        self.animations.frame_for_direction(direction, elapsed)
    }

    /// Whether the attack track has played out after `elapsed` seconds.
    #[must_use]
    pub fn attack_finished(&self, elapsed: f32) -> bool {
        self.animations.is_finished(TrackId::Attack, elapsed)
    }

    /// Plays a music track at the configured music volume.
    ///
    /// # Errors
    ///
    /// Returns [`ActorError::Audio`] if playback could not start.
    pub fn cue_music(&self, id: &str, looping: bool) -> Result<(), ActorError> {
        self.audio
            .play_music(id, looping, self.cues.music_volume)
            .map_err(ActorError::Audio)
    }

    /// Replaces the audio sink for all subsequent sounds and music cues.
    /// Sounds already playing on the old sink are unaffected.
    pub fn replace_audio(&mut self, audio: Arc<dyn AudioPort>) {
        debug!(actor = %self.id, "audio sink replaced");
        self.audio = audio;
    }

    fn rect_at(&self, position: Vec2) -> Rect {
        self.footprint
            .collision_rect(position, self.animations.cell_size())
    }
}
