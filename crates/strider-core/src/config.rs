//! Per-actor configuration.
//!
//! Everything tunable about an actor lives in [`ActorConfig`]: animation
//! timing, collision footprint proportions and the audio cues with their
//! volumes. Missing fields fall back to their defaults, so a config file
//! only needs to name what it changes.
//!
//! # Example
//!
//! ```
//! use strider_core::config::ActorConfig;
//!
//! let config = ActorConfig::from_json(r#"{
//!     "audio": { "attack_sound": "sfx/hadouken", "effect_volume": 0.8 },
//!     "animation": { "attack_frame_duration": 0.05 }
//! }"#).unwrap();
//!
//! assert_eq!(config.audio.attack_sound, "sfx/hadouken");
//! assert_eq!(config.animation.attack_frame_duration, 0.05);
//! assert_eq!(config.animation.walk_frame_duration, 0.125);
//! ```

use serde::{Deserialize, Serialize};

use crate::animation::AnimationTiming;
use crate::error::ConfigError;
use crate::geometry::Footprint;

/// Sound identifiers and volumes used by an actor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioCues {
    /// Sound effect played when an attack begins.
    pub attack_sound: String,
    /// Volume of sound effects, `0.0..=1.0`.
    pub effect_volume: f32,
    /// Volume of music cues, `0.0..=1.0`.
    pub music_volume: f32,
}

impl Default for AudioCues {
    fn default() -> Self {
        Self {
            attack_sound: "sfx/attack".to_string(),
            effect_volume: 1.0,
            music_volume: 0.5,
        }
    }
}

/// Complete configuration of one actor.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ActorConfig {
    /// Frame durations of the animation tracks.
    pub animation: AnimationTiming,
    /// Collision footprint proportions.
    pub footprint: Footprint,
    /// Audio cues.
    pub audio: AudioCues,
}

impl ActorConfig {
    /// Parses and validates a JSON config.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON and the matching
    /// [`ConfigError`] variant for out-of-range values.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Returns this config with a different attack sound.
    #[must_use]
    pub fn with_attack_sound(mut self, id: impl Into<String>) -> Self {
        self.audio.attack_sound = id.into();
        self
    }

    /// Returns this config with a different effect volume.
    #[must_use]
    pub fn with_effect_volume(mut self, volume: f32) -> Self {
        self.audio.effect_volume = volume;
        self
    }

    /// Checks every value against its valid range.
    ///
    /// Frame durations are checked when the animation set is built.
    ///
    /// # Errors
    ///
    /// Returns the first violation found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.audio.attack_sound.is_empty() {
            return Err(ConfigError::EmptyIdentifier("audio.attack_sound"));
        }
        check_volume("audio.effect_volume", self.audio.effect_volume)?;
        check_volume("audio.music_volume", self.audio.music_volume)?;
        check_scale("footprint.width_scale", self.footprint.width_scale)?;
        check_scale("footprint.height_scale", self.footprint.height_scale)?;
        Ok(())
    }
}

fn check_volume(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::VolumeOutOfRange { field, value })
    }
}

fn check_scale(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(ConfigError::ScaleOutOfRange { field, value })
    }
}
