use glam::{Quat, Vec2, Vec3};

use crate::config::*;

/// Simulated state of one character.
///
/// Yaw and pitch are the applied (smoothed) angles in degrees. Positive yaw
/// turns right, positive pitch looks up.
#[derive(Clone, Debug, PartialEq)]
pub struct CharacterBody {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub vertical_velocity: f32,
    /// Strafe/forward intent, magnitude never above 1.
    pub move_intent: Vec2,
    pub grounded: bool,
    pub sprinting: bool,
    pub jumping: bool,
    pub crouching: bool,
}

impl CharacterBody {
    pub fn new(spawn_position: Vec3, yaw: f32) -> Self {
        Self {
            position: spawn_position,
            yaw,
            pitch: 0.0,
            vertical_velocity: 0.0,
            move_intent: Vec2::ZERO,
            grounded: false,
            sprinting: false,
            jumping: false,
            crouching: false,
        }
    }

    pub fn forward(&self) -> Vec3 {
        let yaw = self.yaw.to_radians();
        Vec3::new(yaw.sin(), 0.0, -yaw.cos())
    }

    pub fn right(&self) -> Vec3 {
        let yaw = self.yaw.to_radians();
        Vec3::new(yaw.cos(), 0.0, yaw.sin())
    }

    /// Body orientation; yaw only.
    pub fn rotation(&self) -> Quat {
        Quat::from_rotation_y(-self.yaw.to_radians())
    }

    /// Head/camera pivot rotation relative to the body; pitch only.
    pub fn camera_local_rotation(&self) -> Quat {
        Quat::from_rotation_x(self.pitch.to_radians())
    }

    /// Intent in world space, still unit-bounded.
    pub fn world_direction(&self, intent: Vec2) -> Vec3 {
        self.right() * intent.x + self.forward() * intent.y
    }

    pub fn eye_position(&self) -> Vec3 {
        self.position + Vec3::new(0.0, EYE_HEIGHT, 0.0)
    }

    pub fn look_direction(&self) -> Vec3 {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        Vec3::new(
            yaw.sin() * pitch.cos(),
            pitch.sin(),
            -yaw.cos() * pitch.cos(),
        )
        .normalize()
    }
}
