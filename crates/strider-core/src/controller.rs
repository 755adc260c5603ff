//! Movement sources and the character controller that composes them.
//!
//! A character is driven by exactly one [`MovementSource`]: the capability to
//! produce this frame's commands. The player's source reads the input device;
//! scripted and AI sources decide on their own. The [`CharacterController`]
//! owns a body, an actor and a source, and runs the frame protocol:
//!
//! 1. end an attack whose track has played out
//! 2. ask the source for commands and apply them
//! 3. resolve movement against the map
//! 4. pick the frame to draw and advance the animation clocks
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use glam::Vec2;
//! use strider_core::actor::{ActorId, CharacterActor, CharacterBody};
//! use strider_core::animation::{AnimationSet, AnimationTiming, SpriteSheet};
//! use strider_core::command::Command;
//! use strider_core::config::ActorConfig;
//! use strider_core::controller::{CharacterController, ScriptStep, ScriptedPath};
//! use strider_core::direction::Direction;
//! use strider_core::ports::MutedAudio;
//! # use strider_core::{actor::ActorRef, error::CollaboratorError, ports::MapPort};
//! # struct OpenMap;
//! # impl MapPort for OpenMap {
//! #     fn valid_movement(&self, _: ActorRef<'_>, _: Direction) -> Result<bool, CollaboratorError> {
//! #         Ok(true)
//! #     }
//! # }
//!
//! let sheet = SpriteSheet::new("guard.png", 96, 128, 3, 4);
//! let animations = Arc::new(AnimationSet::from_sheet(&sheet, &AnimationTiming::default()).unwrap());
//! let body = CharacterBody::new(Vec2::ZERO, 40.0);
//! let actor = CharacterActor::new(ActorId::new(7), &body, animations, &ActorConfig::default(), Arc::new(MutedAudio)).unwrap();
//!
//! let patrol = ScriptedPath::looping(vec![
//!     ScriptStep::hold(Command::MoveRight, 2),
//!     ScriptStep::hold(Command::MoveLeft, 2),
//! ]);
//! let mut guard = CharacterController::new(body, actor, Box::new(patrol));
//!
//! let report = guard.update(&OpenMap, 0.5).unwrap();
//! assert_eq!(report.direction, Direction::Right);
//! assert_eq!(guard.body().position, Vec2::new(20.0, 0.0));
//! ```

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::actor::{ActorId, ActorRef, CharacterActor, CharacterBody};
use crate::animation::Frame;
use crate::command::Command;
use crate::direction::Direction;
use crate::error::ActorError;
use crate::geometry::Rect;
use crate::input::InputHandler;
use crate::ports::{InputDeviceSource, MapPort};

// =============================================================================
// Movement Sources
// =============================================================================

/// Produces the commands a character performs this frame.
pub trait MovementSource: Send {
    /// Commands for the coming frame. `actor` shows the state left by the
    /// previous frame.
    fn next_commands(&mut self, actor: ActorRef<'_>) -> Vec<Command>;
}

/// Player-controlled source backed by an [`InputHandler`].
#[derive(Debug, Clone)]
pub struct PlayerInput<D> {
    handler: InputHandler<D>,
}

impl<D: InputDeviceSource> PlayerInput<D> {
    /// Creates a source reading from `device`.
    #[must_use]
    pub fn new(device: D) -> Self {
        Self {
            handler: InputHandler::new(device),
        }
    }

    /// The input handler.
    #[must_use]
    pub fn handler(&self) -> &InputHandler<D> {
        &self.handler
    }

    /// Mutable access to the input device, e.g. to feed key events.
    pub fn device_mut(&mut self) -> &mut D {
        self.handler.device_mut()
    }
}

impl<D: InputDeviceSource + Send> MovementSource for PlayerInput<D> {
    fn next_commands(&mut self, _actor: ActorRef<'_>) -> Vec<Command> {
        self.handler.poll()
    }
}

/// One step of a scripted path: a command (or a pause) held for a number of
/// frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptStep {
    /// Command issued every frame of the step. `None` waits.
    pub command: Option<Command>,
    /// Number of frames the step lasts.
    pub frames: u32,
}

impl ScriptStep {
    /// Issues `command` for `frames` frames.
    #[must_use]
    pub const fn hold(command: Command, frames: u32) -> Self {
        Self {
            command: Some(command),
            frames,
        }
    }

    /// Does nothing for `frames` frames.
    #[must_use]
    pub const fn wait(frames: u32) -> Self {
        Self {
            command: None,
            frames,
        }
    }
}

/// Scripted source replaying a fixed list of steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptedPath {
    steps: Vec<ScriptStep>,
    looping: bool,
    cursor: usize,
    elapsed_frames: u32,
}

impl ScriptedPath {
    /// Plays `steps` once, then idles.
    #[must_use]
    pub fn once(steps: Vec<ScriptStep>) -> Self {
        Self::with_looping(steps, false)
    }

    /// Plays `steps` forever.
    #[must_use]
    pub fn looping(steps: Vec<ScriptStep>) -> Self {
        Self::with_looping(steps, true)
    }

    fn with_looping(steps: Vec<ScriptStep>, looping: bool) -> Self {
        let steps = steps.into_iter().filter(|step| step.frames > 0).collect();
        Self {
            steps,
            looping,
            cursor: 0,
            elapsed_frames: 0,
        }
    }

    /// Whether a non-looping script has run out of steps.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.cursor >= self.steps.len()
    }

    fn advance(&mut self) -> Option<Command> {
        if self.is_done() {
            if !self.looping || self.steps.is_empty() {
                return None;
            }
            self.cursor = 0;
        }
        let step = self.steps[self.cursor];
        self.elapsed_frames += 1;
        if self.elapsed_frames >= step.frames {
            self.cursor += 1;
            self.elapsed_frames = 0;
        }
        step.command
    }
}

impl MovementSource for ScriptedPath {
    fn next_commands(&mut self, _actor: ActorRef<'_>) -> Vec<Command> {
        self.advance().into_iter().collect()
    }
}

/// Tuning of a [`Wanderer`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WanderConfig {
    /// Fewest frames a chosen direction is held.
    pub min_hold_frames: u32,
    /// Most frames a chosen direction is held.
    pub max_hold_frames: u32,
    /// Chance of standing still instead of picking a direction.
    pub rest_chance: f64,
    /// Chance per frame of starting an attack.
    pub attack_chance: f64,
}

impl Default for WanderConfig {
    fn default() -> Self {
        Self {
            min_hold_frames: 15,
            max_hold_frames: 60,
            rest_chance: 0.25,
            attack_chance: 0.0,
        }
    }
}

/// AI source that wanders in random directions, reproducibly from a seed.
///
/// When the map blocks the current direction the wanderer picks a new one
/// on the next frame.
#[derive(Debug, Clone)]
pub struct Wanderer {
    rng: ChaCha8Rng,
    config: WanderConfig,
    heading: Option<Direction>,
    frames_left: u32,
}

impl Wanderer {
    /// Creates a wanderer seeded with `seed`.
    #[must_use]
    pub fn new(seed: u64, config: WanderConfig) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            config,
            heading: None,
            frames_left: 0,
        }
    }

    fn pick_heading(&mut self) {
        let min = self.config.min_hold_frames.max(1);
        let max = self.config.max_hold_frames.max(min);
        self.frames_left = self.rng.gen_range(min..=max);
        self.heading = if self.rng.gen_bool(probability(self.config.rest_chance)) {
            None
        } else {
            Some(Direction::MOVING[self.rng.gen_range(0..Direction::MOVING.len())])
        };
    }
}

/// `chance` as a valid probability. NaN and infinities count as never.
fn probability(chance: f64) -> f64 {
    if chance.is_finite() {
        chance.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

impl MovementSource for Wanderer {
    fn next_commands(&mut self, actor: ActorRef<'_>) -> Vec<Command> {
        let blocked = self.heading.is_some_and(|heading| actor.direction() != heading);
        if self.frames_left == 0 || blocked {
            self.pick_heading();
        }
        self.frames_left = self.frames_left.saturating_sub(1);

        let mut commands: Vec<Command> = self
            .heading
            .and_then(Command::for_direction)
            .into_iter()
            .collect();
        if !actor.actor().is_attacking() && self.rng.gen_bool(probability(self.config.attack_chance)) {
            commands.push(Command::Attack);
        }
        commands
    }
}

// =============================================================================
// Character Controller
// =============================================================================

/// What a controller did during one update.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameReport {
    /// Actor that was updated.
    pub actor: ActorId,
    /// Direction after movement resolution.
    pub direction: Direction,
    /// Whether the actor moved.
    pub moving: bool,
    /// Whether an attack is in progress.
    pub attacking: bool,
    /// Frame to draw.
    pub frame: Frame,
    /// Position after the update.
    pub position: Vec2,
    /// Collision rectangle after the update.
    pub collision_rect: Rect,
}

/// A character: body, actor and the source that drives them.
///
/// The controller keeps two animation clocks. The walk clock runs while the
/// actor moves and resets when it stops; the attack clock restarts whenever
/// an attack begins. Once the attack track has played out the controller
/// ends the attack, so holding the attack binding attacks repeatedly, with
/// one sound per attack.
pub struct CharacterController {
    body: CharacterBody,
    actor: CharacterActor,
    source: Box<dyn MovementSource>,
    walk_clock: f32,
    attack_clock: f32,
}

impl std::fmt::Debug for CharacterController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CharacterController")
            .field("body", &self.body)
            .field("actor", &self.actor)
            .field("walk_clock", &self.walk_clock)
            .field("attack_clock", &self.attack_clock)
            .finish_non_exhaustive()
    }
}

impl CharacterController {
    /// Composes a controller. `actor` should have been created for `body`.
    #[must_use]
    pub fn new(body: CharacterBody, actor: CharacterActor, source: Box<dyn MovementSource>) -> Self {
        Self {
            body,
            actor,
            source,
            walk_clock: 0.0,
            attack_clock: 0.0,
        }
    }

    /// The character's body.
    #[must_use]
    pub fn body(&self) -> &CharacterBody {
        &self.body
    }

    /// Moves the body directly (spawn, teleport) and resyncs the actor.
    pub fn place(&mut self, position: Vec2) {
        self.body.position = position;
        self.actor.sync_body(&self.body);
    }

    /// Sets the body's speed.
    pub fn set_speed(&mut self, speed: f32) {
        self.body.speed = speed;
    }

    /// The actor.
    #[must_use]
    pub fn actor(&self) -> &CharacterActor {
        &self.actor
    }

    /// Mutable access to the actor.
    pub fn actor_mut(&mut self) -> &mut CharacterActor {
        &mut self.actor
    }

    /// Replaces the movement source, e.g. to hand a character to a cutscene
    /// script.
    pub fn set_source(&mut self, source: Box<dyn MovementSource>) {
        debug!(actor = %self.actor.id(), "movement source replaced");
        self.source = source;
    }

    /// Seconds the current walk cycle has been running.
    #[must_use]
    pub fn walk_clock(&self) -> f32 {
        self.walk_clock
    }

    /// Seconds since the current attack began.
    #[must_use]
    pub fn attack_clock(&self) -> f32 {
        self.attack_clock
    }

    /// Frame to draw for the current state and clocks.
    #[must_use]
    pub fn current_frame(&self) -> Frame {
        let elapsed = if self.actor.is_attacking() {
            self.attack_clock
        } else {
            self.walk_clock
        };
        self.actor.current_frame(elapsed)
    }

    /// Runs one frame.
    ///
    /// # Errors
    ///
    /// Propagates [`ActorError::Audio`] from starting an attack and
    /// [`ActorError::Map`] from movement resolution. The frame still runs to
    /// the end: clocks advance and the actor state stays consistent. When
    /// both fail, the audio error is returned and the map error is logged.
    pub fn update(&mut self, map: &dyn MapPort, dt: f32) -> Result<FrameReport, ActorError> {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };

        if self.actor.is_attacking() && self.actor.attack_finished(self.attack_clock) {
            self.actor.set_attacking(false)?;
        }

        let commands = self.source.next_commands(self.actor.view(&self.body));
        let was_attacking = self.actor.is_attacking();
        let mut applied = Ok(());
        for command in commands {
            if let Err(err) = command.apply(&mut self.actor) {
                applied = Err(err);
            }
        }
        if !was_attacking && self.actor.is_attacking() {
            self.attack_clock = 0.0;
        }

        let resolved = self.actor.resolve_movement(&mut self.body, map, dt);
        if !self.actor.is_moving() {
            self.walk_clock = 0.0;
        }

        let report = FrameReport {
            actor: self.actor.id(),
            direction: self.actor.direction(),
            moving: self.actor.is_moving(),
            attacking: self.actor.is_attacking(),
            frame: self.current_frame(),
            position: self.body.position,
            collision_rect: self.actor.collision_rect(),
        };

        if self.actor.is_moving() {
            self.walk_clock += dt;
        }
        if self.actor.is_attacking() {
            self.attack_clock += dt;
        }

        match (applied, resolved) {
            (Ok(()), Ok(())) => Ok(report),
            (Err(err), Ok(())) | (Ok(()), Err(err)) => Err(err),
            (Err(audio), Err(map)) => {
                warn!(actor = %self.actor.id(), error = %map, "map failed in the same frame as audio");
                Err(audio)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::TrackId;
    use crate::input::{BindingSet, KeyCode, KeyMap, KeyboardState};
    use std::collections::HashSet;
    use std::sync::Arc;

    use crate::tests::{
        actor_at, actor_with_recorder, controller_with, BlockedMap, BrokenAudio, FailingMap, OpenMap,
    };

    fn steady_wanderer(seed: u64) -> Wanderer {
        let config = WanderConfig {
            min_hold_frames: 1000,
            max_hold_frames: 1000,
            rest_chance: 0.0,
            attack_chance: 0.0,
        };
        Wanderer::new(seed, config)
    }

    /// Runs `frames` frames of `wanderer` against `map` and returns the
    /// movement commands it issued.
    fn wander(wanderer: &mut Wanderer, map: &dyn MapPort, frames: usize) -> HashSet<Command> {
        let (mut actor, mut body, _) = actor_with_recorder();
        let mut issued = HashSet::new();
        for _ in 0..frames {
            for command in wanderer.next_commands(actor.view(&body)) {
                issued.insert(command);
                command.apply(&mut actor).unwrap();
            }
            actor.resolve_movement(&mut body, map, 0.1).unwrap();
        }
        issued
    }

    #[test]
    fn player_input_feeds_commands() {
        let mut keyboard = KeyboardState::new(KeyMap::default());
        keyboard.press(KeyCode::RIGHT);
        let (mut hero, _audio) = controller_with(Box::new(PlayerInput::new(keyboard)));

        let report = hero.update(&OpenMap, 0.05).unwrap();
        assert_eq!(report.direction, Direction::Right);
        assert_eq!(report.position, Vec2::new(5.0, 0.0));
    }

    #[test]
    fn player_input_device_can_be_updated_between_frames() {
        let mut source = PlayerInput::new(BindingSet::MOVE_UP);
        let (actor, body, _) = actor_with_recorder();
        assert_eq!(source.next_commands(actor.view(&body)), vec![Command::MoveUp]);
        *source.device_mut() = BindingSet::empty();
        assert!(source.next_commands(actor.view(&body)).is_empty());
    }

    #[test]
    fn scripted_path_holds_each_step() {
        let mut path = ScriptedPath::once(vec![
            ScriptStep::hold(Command::MoveUp, 2),
            ScriptStep::wait(1),
            ScriptStep::hold(Command::Attack, 1),
        ]);
        let (actor, body, _) = actor_with_recorder();
        let mut issued = Vec::new();
        for _ in 0..6 {
            issued.push(path.next_commands(actor.view(&body)));
        }
        assert_eq!(
            issued,
            vec![
                vec![Command::MoveUp],
                vec![Command::MoveUp],
                vec![],
                vec![Command::Attack],
                vec![],
                vec![],
            ]
        );
        assert!(path.is_done());
    }

    #[test]
    fn looping_path_restarts() {
        let mut path = ScriptedPath::looping(vec![
            ScriptStep::hold(Command::MoveLeft, 1),
            ScriptStep::hold(Command::MoveRight, 1),
            ScriptStep::wait(0),
        ]);
        let (actor, body, _) = actor_with_recorder();
        let issued: Vec<_> = (0..4).map(|_| path.next_commands(actor.view(&body))).collect();
        assert_eq!(
            issued,
            vec![
                vec![Command::MoveLeft],
                vec![Command::MoveRight],
                vec![Command::MoveLeft],
                vec![Command::MoveRight],
            ]
        );
    }

    #[test]
    fn empty_looping_path_idles() {
        let mut path = ScriptedPath::looping(Vec::new());
        let (actor, body, _) = actor_with_recorder();
        assert!(path.next_commands(actor.view(&body)).is_empty());
    }

    #[test]
    fn wanderer_is_reproducible() {
        let (actor, body, _) = actor_with_recorder();
        let config = WanderConfig {
            attack_chance: 0.1,
            ..WanderConfig::default()
        };
        let mut a = Wanderer::new(42, config);
        let mut b = Wanderer::new(42, config);
        for _ in 0..200 {
            assert_eq!(a.next_commands(actor.view(&body)), b.next_commands(actor.view(&body)));
        }
    }

    #[test]
    fn wanderer_never_issues_opposing_moves() {
        let (actor, body, _) = actor_with_recorder();
        let mut wanderer = Wanderer::new(7, WanderConfig::default());
        for _ in 0..500 {
            let moves = wanderer
                .next_commands(actor.view(&body))
                .into_iter()
                .filter(|c| c.direction().is_some())
                .count();
            assert!(moves <= 1);
        }
    }

    #[test]
    fn walk_clock_runs_only_while_moving() {
        let (mut hero, _) = controller_with(Box::new(ScriptedPath::once(vec![
            ScriptStep::hold(Command::MoveDown, 3),
        ])));
        for _ in 0..3 {
            hero.update(&OpenMap, 0.1).unwrap();
        }
        assert!((hero.walk_clock() - 0.3).abs() < 1e-5);

        hero.update(&OpenMap, 0.1).unwrap();
        assert_eq!(hero.walk_clock(), 0.0);
        assert_eq!(hero.current_frame(), hero.actor().animations().idle());
    }

    #[test]
    fn blocked_walker_shows_idle() {
        let (mut hero, _) = controller_with(Box::new(ScriptedPath::looping(vec![ScriptStep::hold(
            Command::MoveLeft,
            1,
        )])));
        let report = hero.update(&BlockedMap, 0.1).unwrap();
        assert_eq!(report.direction, Direction::None);
        assert!(!report.moving);
        assert_eq!(report.frame, hero.actor().animations().idle());
    }

    #[test]
    fn attack_ends_after_track_and_can_repeat() {
        let (mut hero, audio) = controller_with(Box::new(ScriptedPath::looping(vec![ScriptStep::hold(
            Command::Attack,
            1,
        )])));
        let attack = hero.actor().animations().track(TrackId::Attack).duration();

        let first = hero.update(&OpenMap, 0.1).unwrap();
        assert!(first.attacking);
        assert_eq!(first.frame, hero.actor().animations().frame_at(TrackId::Attack, 0.0));
        assert_eq!(audio.effect_count(), 1);

        // Still attacking while the track plays, no new sound.
        let mut frames = 1;
        while hero.attack_clock() < attack {
            hero.update(&OpenMap, 0.1).unwrap();
            frames += 1;
        }
        assert!(frames > 1);
        assert_eq!(audio.effect_count(), 1);

        // Track finished: the attack ends and the held binding starts a new one.
        hero.update(&OpenMap, 0.1).unwrap();
        assert_eq!(audio.effect_count(), 2);
        assert!(hero.attack_clock() < attack);
    }

    #[test]
    fn place_moves_collision_rect() {
        let (mut hero, _) = controller_with(Box::new(ScriptedPath::once(Vec::new())));
        let before = hero.actor().collision_rect();
        hero.place(Vec2::new(10.0, 20.0));
        assert_eq!(hero.actor().collision_rect(), before.translated(Vec2::new(10.0, 20.0)));
    }

    #[test]
    fn controller_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<CharacterController>();
    }

    #[test]
    fn wanderer_keeps_heading_while_free() {
        let issued = wander(&mut steady_wanderer(3), &OpenMap, 20);
        assert_eq!(issued.len(), 1);
    }

    #[test]
    fn blocked_wanderer_picks_new_headings() {
        let issued = wander(&mut steady_wanderer(3), &BlockedMap, 20);
        assert!(issued.len() > 1);
    }

    #[test]
    fn certain_attack_chance_attacks_when_idle() {
        let config = WanderConfig {
            attack_chance: 1.0,
            ..WanderConfig::default()
        };
        let mut wanderer = Wanderer::new(11, config);
        let (mut actor, body, _) = actor_with_recorder();

        let first = wanderer.next_commands(actor.view(&body));
        assert!(first.contains(&Command::Attack));
        actor.set_attacking(true).unwrap();

        let second = wanderer.next_commands(actor.view(&body));
        assert!(!second.contains(&Command::Attack));
    }

    #[test]
    fn non_finite_chances_count_as_never() {
        let config = WanderConfig {
            rest_chance: f64::NAN,
            attack_chance: f64::INFINITY,
            ..WanderConfig::default()
        };
        let mut wanderer = Wanderer::new(5, config);
        let (actor, body, _) = actor_with_recorder();
        for _ in 0..50 {
            let commands = wanderer.next_commands(actor.view(&body));
            assert_eq!(commands.len(), 1);
            assert!(commands[0].direction().is_some());
        }
    }

    #[test]
    fn attack_ends_while_map_keeps_failing() {
        let (mut hero, _) = controller_with(Box::new(ScriptedPath::looping(vec![ScriptStep::hold(
            Command::MoveLeft,
            1,
        )])));
        hero.actor_mut().set_attacking(true).unwrap();

        for _ in 0..4 {
            let err = hero.update(&FailingMap, 0.1).unwrap_err();
            assert!(matches!(err, ActorError::Map(_)));
        }
        assert!(!hero.actor().is_attacking());
    }

    #[test]
    fn audio_failure_wins_over_map_failure() {
        let (actor, body) = actor_at(4, Vec2::ZERO, Arc::new(BrokenAudio));
        let held = BindingSet::ATTACK | BindingSet::MOVE_LEFT;
        let mut hero = CharacterController::new(body, actor, Box::new(PlayerInput::new(held)));

        let err = hero.update(&FailingMap, 0.1).unwrap_err();
        assert!(matches!(err, ActorError::Audio(_)));
        assert!(hero.actor().is_attacking());
        assert!((hero.attack_clock() - 0.1).abs() < 1e-6);
    }
}
