use glam::{Vec2, Vec3};

use crate::config::{ControllerConfig, GROUND_CONTACT_VELOCITY, SPRINT_DEAD_ZONE};
use crate::input::{Action, Axis, InputSource};
use crate::physics::PhysicsEngine;
use crate::player::CharacterBody;

/// Movement inputs sampled once per tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MotionInput {
    /// Raw strafe/forward axes, each in [-1, 1].
    pub axes: Vec2,
    pub sprint_held: bool,
    pub crouch_held: bool,
    pub jump_pressed: bool,
}

impl MotionInput {
    pub fn poll(input: &impl InputSource) -> Self {
        Self {
            axes: Vec2::new(input.axis(Axis::Horizontal), input.axis(Axis::Vertical)),
            sprint_held: input.is_held(Action::Sprint),
            crouch_held: input.is_held(Action::Crouch),
            jump_pressed: input.was_pressed(Action::Jump),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MotionOutcome {
    pub displacement: Vec3,
    pub jumped: bool,
}

/// Turns move intent, gravity and jumps into a per-tick displacement.
#[derive(Clone, Debug, PartialEq)]
pub struct MotionIntegrator {
    walk_speed: f32,
    sprint_speed: f32,
    crouch_speed: Option<f32>,
    jump_speed: f32,
    gravity: f32,
}

impl MotionIntegrator {
    pub fn from_config(config: &ControllerConfig) -> Self {
        Self {
            walk_speed: config.walk_speed,
            sprint_speed: config.sprint_speed,
            crouch_speed: config.capabilities.crouch.then_some(config.crouch_speed),
            jump_speed: config.jump_speed,
            gravity: config.gravity,
        }
    }

    /// Speed for this tick. Crouch beats sprint, sprint beats walk.
    fn select_speed(&self, body: &mut CharacterBody, input: &MotionInput, intent: Vec2) -> f32 {
        body.crouching = self.crouch_speed.is_some() && input.crouch_held;
        body.sprinting = !body.crouching
            && input.sprint_held
            && intent.y > SPRINT_DEAD_ZONE
            && body.grounded;

        match self.crouch_speed {
            Some(speed) if body.crouching => speed,
            _ if body.sprinting => self.sprint_speed,
            _ => self.walk_speed,
        }
    }

    /// Advances `body` by one tick.
    ///
    /// With `enabled` false the horizontal intent is zeroed and jumps are
    /// ignored, but gravity keeps integrating so a frozen body still falls.
    pub fn update(
        &self,
        body: &mut CharacterBody,
        input: &MotionInput,
        enabled: bool,
        dt: f32,
        physics: &impl PhysicsEngine,
    ) -> MotionOutcome {
        let horizontal = if enabled {
            let intent = input.axes.clamp_length_max(1.0);
            body.move_intent = intent;
            let speed = self.select_speed(body, input, intent);
            body.world_direction(intent) * speed
        } else {
            body.move_intent = Vec2::ZERO;
            body.sprinting = false;
            // Posture still follows the key so the animator sees it released.
            body.crouching = self.crouch_speed.is_some() && input.crouch_held;
            Vec3::ZERO
        };

        let mut jumped = false;
        if body.grounded {
            // A jump launched last tick may still be inside the probe radius.
            if body.vertical_velocity <= 0.0 {
                body.vertical_velocity = GROUND_CONTACT_VELOCITY;
            }
            if enabled && input.jump_pressed && !body.crouching {
                body.vertical_velocity = self.jump_speed;
                body.jumping = true;
                jumped = true;
            }
        } else {
            body.vertical_velocity -= self.gravity * dt;
        }

        let displacement = (horizontal + Vec3::Y * body.vertical_velocity) * dt;
        body.position = physics.move_character(body.position, displacement);

        MotionOutcome {
            displacement,
            jumped,
        }
    }
}
