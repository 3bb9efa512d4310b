use glam::Vec2;

use crate::config::{LOOK_INPUT_SCALE, PITCH_LIMIT};
use crate::player::CharacterBody;

/// Smoothed mouse look.
///
/// Pointer deltas accumulate into target angles; the body's applied yaw and
/// pitch chase those targets at `snappiness`, so rotation lags input by a
/// rate-dependent amount.
#[derive(Clone, Debug, PartialEq)]
pub struct LookController {
    sensitivity: f32,
    snappiness: f32,
    target_yaw: f32,
    target_pitch: f32,
}

impl LookController {
    /// Starts with targets equal to the body's current orientation.
    pub fn new(sensitivity: f32, snappiness: f32, body: &CharacterBody) -> Self {
        Self {
            sensitivity,
            snappiness,
            target_yaw: body.yaw,
            target_pitch: body.pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT),
        }
    }

    pub fn target(&self) -> (f32, f32) {
        (self.target_yaw, self.target_pitch)
    }

    pub fn update(&mut self, body: &mut CharacterBody, delta: Vec2, dt: f32) {
        let scale = LOOK_INPUT_SCALE * self.sensitivity * dt;
        self.target_yaw += delta.x * scale;
        self.target_pitch = (self.target_pitch + delta.y * scale).clamp(-PITCH_LIMIT, PITCH_LIMIT);

        let t = (self.snappiness * dt).clamp(0.0, 1.0);
        body.yaw += (self.target_yaw - body.yaw) * t;
        body.pitch += (self.target_pitch - body.pitch) * t;
    }
}
