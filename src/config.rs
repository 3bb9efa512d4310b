use std::fs;
use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

// Character dimensions
pub const EYE_HEIGHT: f32 = 1.7;
pub const CHARACTER_HEIGHT: f32 = 2.0;
pub const CHARACTER_RADIUS: f32 = 0.4;
pub const STEP_OVER_HEIGHT: f32 = 0.3; // can step over obstacles this tall
pub const PATH_HIT_MARGIN: f32 = 0.02;

// Locomotion
pub const GROUND_CONTACT_VELOCITY: f32 = -2.0; // keeps the body pressed to the floor
pub const SPRINT_DEAD_ZONE: f32 = 0.1;

// Simulation
pub const MAX_FRAME_DT: f32 = 0.1; // long frames are clamped, not sub-stepped

// Look
pub const PITCH_LIMIT: f32 = 90.0;
pub const LOOK_INPUT_SCALE: f32 = 10.0;

// Animation
pub const ANIM_MOVE_THRESHOLD: f32 = 0.1;
pub const ANIM_SPEED_IDLE: f32 = 0.0;
pub const ANIM_SPEED_CROUCH: f32 = 0.3;
pub const ANIM_SPEED_WALK: f32 = 0.5;
pub const ANIM_SPEED_RUN: f32 = 1.0;
pub const ANIM_SPEED_SMOOTHING: f32 = 10.0;

/// Optional feature modules layered on top of the shared locomotion core.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    pub crouch: bool,
    pub attack: bool,
    pub chase: bool,
}

/// Per-character tuning, fixed at construction time.
///
/// Speeds are in world units per second, angles in degrees, durations in
/// seconds. Fields omitted from a JSON document fall back to the monster
/// preset.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    pub walk_speed: f32,
    pub sprint_speed: f32,
    pub crouch_speed: f32,
    pub jump_speed: f32,
    pub gravity: f32,

    pub mouse_sensitivity: f32,
    pub snappiness: f32,

    /// Probe origin relative to the body's base.
    pub ground_check_offset: Vec3,
    pub ground_distance: f32,

    pub attack_cooldown: f32,

    pub third_person_distance: f32,
    pub third_person_height: f32,
    pub third_person_look_height: f32,
    pub third_person_follow_rate: f32,
    pub hide_body_in_first_person: bool,

    pub chase_warmup: f32,
    pub chase_duration: f32,
    pub start_in_stealth: bool,

    pub capabilities: Capabilities,
}

impl ControllerConfig {
    pub fn monster() -> Self {
        Self {
            walk_speed: 4.0,
            sprint_speed: 7.0,
            crouch_speed: 0.0,
            jump_speed: 3.0,
            gravity: 9.81,
            mouse_sensitivity: 50.0,
            snappiness: 100.0,
            ground_check_offset: Vec3::ZERO,
            ground_distance: 0.2,
            attack_cooldown: 1.0,
            third_person_distance: 5.0,
            third_person_height: 2.0,
            third_person_look_height: 1.5,
            third_person_follow_rate: 5.0,
            hide_body_in_first_person: true,
            chase_warmup: 5.0,
            chase_duration: 15.0,
            start_in_stealth: true,
            capabilities: Capabilities {
                crouch: false,
                attack: true,
                chase: true,
            },
        }
    }

    pub fn survivor() -> Self {
        Self {
            walk_speed: 3.0,
            sprint_speed: 5.0,
            crouch_speed: 1.5,
            start_in_stealth: false,
            capabilities: Capabilities {
                crouch: true,
                attack: false,
                chase: false,
            },
            ..Self::monster()
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("Loaded controller config from {}", path.display());
        Self::from_json_str(&text)
    }

    /// Rejects tuning that would make the controller misbehave at runtime.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let non_negative = [
            ("walk_speed", self.walk_speed),
            ("sprint_speed", self.sprint_speed),
            ("crouch_speed", self.crouch_speed),
            ("jump_speed", self.jump_speed),
            ("gravity", self.gravity),
            ("mouse_sensitivity", self.mouse_sensitivity),
            ("snappiness", self.snappiness),
            ("attack_cooldown", self.attack_cooldown),
            ("third_person_distance", self.third_person_distance),
            ("third_person_follow_rate", self.third_person_follow_rate),
        ];
        let positive = [
            ("ground_distance", self.ground_distance),
            ("chase_warmup", self.chase_warmup),
            ("chase_duration", self.chase_duration),
        ];

        // Heights may sit below the body base, so they only need to be finite.
        let signed = [
            ("third_person_height", self.third_person_height),
            ("third_person_look_height", self.third_person_look_height),
        ];

        for &(field, value) in non_negative.iter().chain(&positive).chain(&signed) {
            if !value.is_finite() {
                return Err(ConfigError::NotFinite { field });
            }
        }
        if !self.ground_check_offset.is_finite() {
            return Err(ConfigError::NotFinite {
                field: "ground_check_offset",
            });
        }
        for (field, value) in non_negative {
            if value < 0.0 {
                return Err(ConfigError::Negative { field, value });
            }
        }
        for (field, value) in positive {
            if value <= 0.0 {
                return Err(ConfigError::NonPositive { field, value });
            }
        }
        Ok(())
    }
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self::monster()
    }
}
