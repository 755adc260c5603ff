//! Error types for actor construction and per-frame operations.
//!
//! These failures reach the caller:
//!
//! - [`SheetError`]: the character sheet does not have the layout the
//!   animation builder expects. Fatal at construction.
//! - [`ConfigError`]: actor configuration could not be parsed or holds
//!   values outside their valid range.
//! - Collaborator failures from the map, audio or asset ports. These are
//!   carried inside [`ActorError`] with the original error kept as the
//!   [`source`](std::error::Error::source).
//! - [`RosterError`]: a roster was asked to hold two characters with the
//!   same id.
//!
//! Rejected movement and repeated attack requests are not errors and never
//! show up here.

use thiserror::Error;

use crate::actor::ActorId;
use crate::animation::Playback;

/// Boxed error produced by an external collaborator (map, audio device,
/// asset loader).
pub type CollaboratorError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors raised while building an [`AnimationSet`](crate::animation::AnimationSet)
/// from a character sheet.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SheetError {
    /// The sheet is not laid out as the expected grid.
    #[error(
        "sheet '{texture}' has a {actual_columns}x{actual_rows} grid, expected {expected_columns}x{expected_rows}"
    )]
    GridMismatch {
        /// Texture identifier of the sheet.
        texture: String,
        /// Columns the layout requires.
        expected_columns: u32,
        /// Rows the layout requires.
        expected_rows: u32,
        /// Columns reported by the asset source.
        actual_columns: u32,
        /// Rows reported by the asset source.
        actual_rows: u32,
    },

    /// The sheet has no pixels in at least one dimension.
    #[error("sheet '{texture}' is empty ({width}x{height} px)")]
    EmptySheet {
        /// Texture identifier of the sheet.
        texture: String,
        /// Width in pixels.
        width: u32,
        /// Height in pixels.
        height: u32,
    },

    /// The pixel size cannot be split evenly into cells.
    #[error("sheet '{texture}' ({width}x{height} px) does not divide into {columns}x{rows} cells")]
    UnevenCells {
        /// Texture identifier of the sheet.
        texture: String,
        /// Width in pixels.
        width: u32,
        /// Height in pixels.
        height: u32,
        /// Grid columns.
        columns: u32,
        /// Grid rows.
        rows: u32,
    },

    /// A track was given no frames.
    #[error("track '{0}' has no frames")]
    EmptyTrack(&'static str),

    /// A track was given a frame duration that is zero, negative or not finite.
    #[error("track '{track}' has invalid frame duration {duration}")]
    InvalidFrameDuration {
        /// Track name.
        track: &'static str,
        /// The rejected duration in seconds.
        duration: f32,
    },

    /// A track does not play back the way its role requires.
    #[error("track '{track}' must use {expected:?} playback, got {actual:?}")]
    WrongPlayback {
        /// Track name.
        track: &'static str,
        /// Playback the role requires.
        expected: Playback,
        /// Playback found.
        actual: Playback,
    },

    /// The sprite cell size is zero, negative or not finite.
    #[error("cell size {width}x{height} must be positive")]
    InvalidCellSize {
        /// Cell width in world units.
        width: f32,
        /// Cell height in world units.
        height: f32,
    },
}

/// Errors raised while loading or validating an
/// [`ActorConfig`](crate::config::ActorConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// JSON parsing failed.
    #[error("failed to parse actor config: {0}")]
    Parse(#[from] serde_json::Error),

    /// A volume is outside `0.0..=1.0`.
    #[error("{field} must be within 0.0..=1.0, got {value}")]
    VolumeOutOfRange {
        /// Name of the offending field.
        field: &'static str,
        /// The rejected value.
        value: f32,
    },

    /// A footprint scale is outside `(0.0, 1.0]`.
    #[error("{field} must be within (0.0, 1.0], got {value}")]
    ScaleOutOfRange {
        /// Name of the offending field.
        field: &'static str,
        /// The rejected value.
        value: f32,
    },

    /// A sound or music identifier is empty.
    #[error("{0} must not be empty")]
    EmptyIdentifier(&'static str),
}

/// Error returned by fallible actor operations.
#[derive(Debug, Error)]
pub enum ActorError {
    /// The character sheet was rejected.
    #[error(transparent)]
    Sheet(#[from] SheetError),

    /// The actor configuration was rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The map failed to answer a movement query.
    #[error("map movement query failed")]
    Map(#[source] CollaboratorError),

    /// The audio sink failed to play a sound or music track.
    #[error("audio playback failed")]
    Audio(#[source] CollaboratorError),

    /// The asset source failed to describe a character sheet.
    #[error("asset source failed to describe sheet")]
    AssetSource(#[source] CollaboratorError),
}

/// Errors raised while managing a [`Roster`](crate::roster::Roster).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RosterError {
    /// A character with this id is already in the roster.
    #[error("{0} is already in the roster")]
    DuplicateActor(ActorId),
}
