//! Sprite animation tracks and the per-character [`AnimationSet`].
//!
//! An animation set holds one static idle frame, four looping walk tracks
//! (one per movement [`Direction`]) and one attack track that plays once and
//! then holds its last frame. Frame lookup is a pure function of the track
//! and the elapsed time supplied by the caller; nothing here reads a clock.
//!
//! # Sheet Layout
//!
//! Character sheets are a grid of [`SHEET_COLUMNS`] x [`SHEET_ROWS`] equal
//! cells:
//!
//! | Row | Contents                                   |
//! |-----|--------------------------------------------|
//! | 0   | walk up, columns 0..3                      |
//! | 1   | walk right, columns 0..3 (also the attack) |
//! | 2   | walk down, columns 0..3; idle is column 1  |
//! | 3   | walk left, played from column 2 down to 0  |
//!
//! # Example
//!
//! ```
//! use strider_core::animation::{AnimationSet, AnimationTiming, SpriteSheet, TrackId};
//!
//! let sheet = SpriteSheet::new("hero.png", 96, 128, 3, 4);
//! let set = AnimationSet::from_sheet(&sheet, &AnimationTiming::default()).unwrap();
//!
//! // Walk tracks loop, so one full cycle later the same frame shows.
//! let period = set.track(TrackId::Right).duration();
//! assert_eq!(set.frame_at(TrackId::Right, 0.2), set.frame_at(TrackId::Right, 0.2 + period));
//!
//! // The attack track holds its last frame once it has played.
//! let last = *set.track(TrackId::Attack).frames().last().unwrap();
//! assert_eq!(set.frame_at(TrackId::Attack, 10.0), last);
//! ```

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::direction::Direction;
use crate::error::SheetError;

/// Columns every character sheet must have.
pub const SHEET_COLUMNS: u32 = 3;

/// Rows every character sheet must have.
pub const SHEET_ROWS: u32 = 4;

// =============================================================================
// Frames
// =============================================================================

/// Pixel region inside a texture. Origin is the texture's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PixelRegion {
    /// Left edge in pixels.
    pub x: u32,
    /// Top edge in pixels.
    pub y: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// One drawable animation frame: a cell of the character sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Frame {
    /// Column of the cell in the sheet grid.
    pub column: u32,
    /// Row of the cell in the sheet grid.
    pub row: u32,
    /// Pixel region the renderer should sample.
    pub region: PixelRegion,
}

/// Description of a character sheet as reported by the asset source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpriteSheet {
    /// Texture identifier, as given to the asset source.
    pub texture: String,
    /// Texture width in pixels.
    pub width: u32,
    /// Texture height in pixels.
    pub height: u32,
    /// Grid columns.
    pub columns: u32,
    /// Grid rows.
    pub rows: u32,
}

impl SpriteSheet {
    /// Creates a sheet description.
    #[must_use]
    pub fn new(texture: impl Into<String>, width: u32, height: u32, columns: u32, rows: u32) -> Self {
        Self {
            texture: texture.into(),
            width,
            height,
            columns,
            rows,
        }
    }

    fn validate(&self) -> Result<(u32, u32), SheetError> {
        if self.columns != SHEET_COLUMNS || self.rows != SHEET_ROWS {
            return Err(SheetError::GridMismatch {
                texture: self.texture.clone(),
                expected_columns: SHEET_COLUMNS,
                expected_rows: SHEET_ROWS,
                actual_columns: self.columns,
                actual_rows: self.rows,
            });
        }
        if self.width == 0 || self.height == 0 {
            return Err(SheetError::EmptySheet {
                texture: self.texture.clone(),
                width: self.width,
                height: self.height,
            });
        }
        if self.width % self.columns != 0 || self.height % self.rows != 0 {
            return Err(SheetError::UnevenCells {
                texture: self.texture.clone(),
                width: self.width,
                height: self.height,
                columns: self.columns,
                rows: self.rows,
            });
        }
        Ok((self.width / self.columns, self.height / self.rows))
    }
}

// =============================================================================
// Tracks
// =============================================================================

/// Identifies one of the five animation tracks of a set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrackId {
    /// Walking left.
    Left,
    /// Walking right.
    Right,
    /// Walking up.
    Up,
    /// Walking down.
    Down,
    /// Attacking, independent of direction.
    Attack,
}

impl TrackId {
    /// Walk track for a movement direction. `None` has no track.
    #[must_use]
    pub const fn for_direction(direction: Direction) -> Option<Self> {
        match direction {
            Direction::None => None,
            Direction::Left => Some(Self::Left),
            Direction::Right => Some(Self::Right),
            Direction::Up => Some(Self::Up),
            Direction::Down => Some(Self::Down),
        }
    }

    /// Name used in logs and errors.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Up => "up",
            Self::Down => "down",
            Self::Attack => "attack",
        }
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What a track does once elapsed time passes its last frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Playback {
    /// Wrap around to the first frame.
    Loop,
    /// Stay on the last frame.
    Hold,
}

/// A fixed sequence of frames with a per-track frame duration.
///
/// Deserialization goes through [`Track::new`], so a decoded track is never
/// empty and always has a positive frame duration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TrackRepr")]
pub struct Track {
    frames: Vec<Frame>,
    frame_duration: f32,
    playback: Playback,
}

/// Unchecked wire form of a [`Track`].
#[derive(Deserialize)]
struct TrackRepr {
    frames: Vec<Frame>,
    frame_duration: f32,
    playback: Playback,
}

impl TrackRepr {
    fn into_track(self, name: &'static str) -> Result<Track, SheetError> {
        Track::new(name, self.frames, self.frame_duration, self.playback)
    }
}

impl TryFrom<TrackRepr> for Track {
    type Error = SheetError;

    fn try_from(repr: TrackRepr) -> Result<Self, Self::Error> {
        repr.into_track("track")
    }
}

impl Track {
    /// Creates a track.
    ///
    /// # Errors
    ///
    /// Returns [`SheetError::EmptyTrack`] if `frames` is empty and
    /// [`SheetError::InvalidFrameDuration`] if `frame_duration` is not a
    /// positive finite number.
    pub fn new(
        name: &'static str,
        frames: Vec<Frame>,
        frame_duration: f32,
        playback: Playback,
    ) -> Result<Self, SheetError> {
        if frames.is_empty() {
            return Err(SheetError::EmptyTrack(name));
        }
        if !frame_duration.is_finite() || frame_duration <= 0.0 {
            return Err(SheetError::InvalidFrameDuration {
                track: name,
                duration: frame_duration,
            });
        }
        Ok(Self {
            frames,
            frame_duration,
            playback,
        })
    }

    /// Frames in playback order.
    #[must_use]
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Seconds each frame is shown.
    #[must_use]
    pub fn frame_duration(&self) -> f32 {
        self.frame_duration
    }

    /// Loop or hold behavior.
    #[must_use]
    pub fn playback(&self) -> Playback {
        self.playback
    }

    /// Total duration of one pass through the track.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn duration(&self) -> f32 {
        self.frame_duration * self.frames.len() as f32
    }

    /// Index of the frame shown `elapsed` seconds into the track.
    ///
    /// Negative and NaN times are treated as zero.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn frame_index(&self, elapsed: f32) -> usize {
        let elapsed = elapsed.max(0.0);
        let step = (elapsed / self.frame_duration).floor() as u64;
        let len = self.frames.len() as u64;
        let index = match self.playback {
            Playback::Loop => step % len,
            Playback::Hold => step.min(len - 1),
        };
        index as usize
    }

    /// Frame shown `elapsed` seconds into the track.
    #[must_use]
    pub fn frame_at(&self, elapsed: f32) -> Frame {
        self.frames[self.frame_index(elapsed)]
    }

    /// Whether a held track has reached its final frame. Looping tracks
    /// never finish.
    #[must_use]
    pub fn is_finished(&self, elapsed: f32) -> bool {
        match self.playback {
            Playback::Loop => false,
            Playback::Hold => elapsed >= self.duration(),
        }
    }
}

// =============================================================================
// Animation Set
// =============================================================================

/// Per-track frame durations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationTiming {
    /// Seconds per frame of every walk track.
    pub walk_frame_duration: f32,
    /// Seconds per frame of the attack track.
    pub attack_frame_duration: f32,
}

impl Default for AnimationTiming {
    fn default() -> Self {
        Self {
            walk_frame_duration: 1.0 / 8.0,
            attack_frame_duration: 1.0 / 12.0,
        }
    }
}

/// Frame lists of the four walk tracks.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WalkFrames {
    /// Walking left.
    pub left: Vec<Frame>,
    /// Walking right.
    pub right: Vec<Frame>,
    /// Walking up.
    pub up: Vec<Frame>,
    /// Walking down.
    pub down: Vec<Frame>,
}

/// The complete animation data of one character.
///
/// Walk tracks always loop and the attack track always holds; the
/// constructors enforce this. The set is immutable once built and can be
/// shared between actors using the same sheet. Deserialization applies the
/// same checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "AnimationSetRepr")]
pub struct AnimationSet {
    idle: Frame,
    left: Track,
    right: Track,
    up: Track,
    down: Track,
    attack: Track,
    cell_size: Vec2,
}

/// Unchecked wire form of an [`AnimationSet`].
#[derive(Deserialize)]
struct AnimationSetRepr {
    idle: Frame,
    left: TrackRepr,
    right: TrackRepr,
    up: TrackRepr,
    down: TrackRepr,
    attack: TrackRepr,
    cell_size: Vec2,
}

impl TryFrom<AnimationSetRepr> for AnimationSet {
    type Error = SheetError;

    fn try_from(repr: AnimationSetRepr) -> Result<Self, Self::Error> {
        Self::from_tracks(
            repr.idle,
            [
                repr.left.into_track("left")?,
                repr.right.into_track("right")?,
                repr.up.into_track("up")?,
                repr.down.into_track("down")?,
            ],
            repr.attack.into_track("attack")?,
            repr.cell_size,
        )
    }
}

impl AnimationSet {
    /// Builds a set from explicit frame lists.
    ///
    /// `cell_size` is the size of one sprite in world units, used for the
    /// collision footprint.
    ///
    /// # Errors
    ///
    /// Returns a [`SheetError`] if any track is empty, a frame duration in
    /// `timing` is invalid or `cell_size` is not positive.
    pub fn new(
        idle: Frame,
        walk: WalkFrames,
        attack: Vec<Frame>,
        timing: &AnimationTiming,
        cell_size: Vec2,
    ) -> Result<Self, SheetError> {
        let walk_track = |name, frames| Track::new(name, frames, timing.walk_frame_duration, Playback::Loop);
        Self::from_tracks(
            idle,
            [
                walk_track("left", walk.left)?,
                walk_track("right", walk.right)?,
                walk_track("up", walk.up)?,
                walk_track("down", walk.down)?,
            ],
            Track::new("attack", attack, timing.attack_frame_duration, Playback::Hold)?,
            cell_size,
        )
    }

    /// Assembles a set from built tracks, in left, right, up, down order.
    fn from_tracks(idle: Frame, walk: [Track; 4], attack: Track, cell_size: Vec2) -> Result<Self, SheetError> {
        let [left, right, up, down] = walk;
        for (name, track) in [("left", &left), ("right", &right), ("up", &up), ("down", &down)] {
            expect_playback(name, track, Playback::Loop)?;
        }
        expect_playback("attack", &attack, Playback::Hold)?;
        if !(cell_size.is_finite() && cell_size.cmpgt(Vec2::ZERO).all()) {
            return Err(SheetError::InvalidCellSize {
                width: cell_size.x,
                height: cell_size.y,
            });
        }
        Ok(Self {
            idle,
            left,
            right,
            up,
            down,
            attack,
            cell_size,
        })
    }

    /// Builds a set from a standard character sheet.
    ///
    /// # Errors
    ///
    /// Returns [`SheetError::GridMismatch`] if the sheet is not a
    /// [`SHEET_COLUMNS`] x [`SHEET_ROWS`] grid, [`SheetError::EmptySheet`] or
    /// [`SheetError::UnevenCells`] if its pixel size cannot be split into
    /// cells, and [`SheetError::InvalidFrameDuration`] for bad timing.
    #[allow(clippy::cast_precision_loss)]
    pub fn from_sheet(sheet: &SpriteSheet, timing: &AnimationTiming) -> Result<Self, SheetError> {
        let (cell_width, cell_height) = sheet.validate()?;
        let cell = |row: u32, column: u32| Frame {
            column,
            row,
            region: PixelRegion {
                x: column * cell_width,
                y: row * cell_height,
                width: cell_width,
                height: cell_height,
            },
        };
        let row_frames =
            |row: u32| -> Vec<Frame> { (0..SHEET_COLUMNS).map(|column| cell(row, column)).collect() };

        let walk = WalkFrames {
            up: row_frames(0),
            right: row_frames(1),
            down: row_frames(2),
            left: (0..SHEET_COLUMNS).rev().map(|column| cell(3, column)).collect(),
        };
        let attack = row_frames(1);

        Self::new(
            cell(2, 1),
            walk,
            attack,
            timing,
            Vec2::new(cell_width as f32, cell_height as f32),
        )
    }

    /// The static idle frame.
    #[must_use]
    pub fn idle(&self) -> Frame {
        self.idle
    }

    /// Size of one sprite cell.
    #[must_use]
    pub fn cell_size(&self) -> Vec2 {
        self.cell_size
    }

    /// Looks up a track.
    #[must_use]
    pub fn track(&self, id: TrackId) -> &Track {
        match id {
            TrackId::Left => &self.left,
            TrackId::Right => &self.right,
            TrackId::Up => &self.up,
            TrackId::Down => &self.down,
            TrackId::Attack => &self.attack,
        }
    }

    /// Frame of `track` at `elapsed` seconds.
    #[must_use]
    pub fn frame_at(&self, track: TrackId, elapsed: f32) -> Frame {
        self.track(track).frame_at(elapsed)
    }

    /// Walk frame for `direction`, or the idle frame for [`Direction::None`].
    #[must_use]
    pub fn frame_for_direction(&self, direction: Direction, elapsed: f32) -> Frame {
        match TrackId::for_direction(direction) {
            Some(track) => self.frame_at(track, elapsed),
            None => self.idle,
        }
    }

    /// Whether `track` has finished playing at `elapsed` seconds.
    #[must_use]
    pub fn is_finished(&self, track: TrackId, elapsed: f32) -> bool {
        self.track(track).is_finished(elapsed)
    }
}

fn expect_playback(name: &'static str, track: &Track, expected: Playback) -> Result<(), SheetError> {
    if track.playback == expected {
        Ok(())
    } else {
        Err(SheetError::WrongPlayback {
            track: name,
            expected,
            actual: track.playback,
        })
    }
}
