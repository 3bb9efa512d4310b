use glam::Vec3;

use crate::config::GROUND_CONTACT_VELOCITY;
use crate::physics::{LayerMask, PhysicsEngine};
use crate::player::CharacterBody;

/// Sphere probe anchored below the character.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GroundProbe {
    /// Probe origin relative to the body position.
    pub offset: Vec3,
    pub radius: f32,
    pub mask: LayerMask,
}

impl GroundProbe {
    pub fn new(offset: Vec3, radius: f32, mask: LayerMask) -> Self {
        Self {
            offset,
            radius,
            mask,
        }
    }

    pub fn origin(&self, body: &CharacterBody) -> Vec3 {
        body.position + self.offset
    }

    /// Refreshes the grounded flag. Returns true on the tick the body lands.
    pub fn update(&self, body: &mut CharacterBody, physics: &impl PhysicsEngine) -> bool {
        let was_grounded = body.grounded;
        body.grounded = physics.check_sphere(self.origin(body), self.radius, self.mask);

        let landed = !was_grounded && body.grounded;
        if landed {
            body.jumping = false;
        }

        if body.grounded && body.vertical_velocity < 0.0 {
            body.vertical_velocity = GROUND_CONTACT_VELOCITY;
        }
        landed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::MockPhysicsEngine;
    use mockall::predicate::{always, eq};
    use rstest::rstest;

    fn probe() -> GroundProbe {
        GroundProbe::new(Vec3::new(0.0, -0.5, 0.0), 0.2, LayerMask::GROUND)
    }

    fn physics(touching: bool) -> MockPhysicsEngine {
        let mut physics = MockPhysicsEngine::new();
        physics
            .expect_check_sphere()
            .return_const(touching);
        physics
    }

    #[rstest]
    fn queries_probe_origin_with_mask() {
        let mut body = CharacterBody::new(Vec3::new(1.0, 2.0, 3.0), 0.0);
        let mut physics = MockPhysicsEngine::new();
        physics
            .expect_check_sphere()
            .with(eq(Vec3::new(1.0, 1.5, 3.0)), eq(0.2), eq(LayerMask::GROUND))
            .times(1)
            .return_const(true);
        probe().update(&mut body, &physics);
        assert!(body.grounded);
    }

    #[rstest]
    fn landing_clears_jump() {
        let mut body = CharacterBody::new(Vec3::ZERO, 0.0);
        body.jumping = true;
        body.vertical_velocity = -7.5;

        assert!(probe().update(&mut body, &physics(true)));
        assert!(!body.jumping);
        assert_eq!(body.vertical_velocity, GROUND_CONTACT_VELOCITY);
    }

    #[rstest]
    #[case(-0.01)]
    #[case(-2.0)]
    #[case(-350.0)]
    fn grounded_fall_speed_resets_to_contact_constant(#[case] vy: f32) {
        let mut body = CharacterBody::new(Vec3::ZERO, 0.0);
        body.grounded = true;
        body.vertical_velocity = vy;
        assert!(!probe().update(&mut body, &physics(true)));
        assert_eq!(body.vertical_velocity, GROUND_CONTACT_VELOCITY);
    }

    #[rstest]
    fn rising_body_keeps_velocity() {
        let mut body = CharacterBody::new(Vec3::ZERO, 0.0);
        body.vertical_velocity = 3.0;
        probe().update(&mut body, &physics(true));
        assert_eq!(body.vertical_velocity, 3.0);
    }

    #[rstest]
    fn leaving_ground_keeps_jump_flag() {
        let mut body = CharacterBody::new(Vec3::ZERO, 0.0);
        body.grounded = true;
        body.jumping = true;
        let mut physics = MockPhysicsEngine::new();
        physics
            .expect_check_sphere()
            .with(always(), always(), always())
            .return_const(false);
        assert!(!probe().update(&mut body, &physics));
        assert!(!body.grounded);
        assert!(body.jumping);
    }
}
