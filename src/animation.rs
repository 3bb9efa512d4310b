//! Animation parameter contract.
//!
//! The controller only pushes named parameters; playback belongs to
//! whatever implements [`AnimationDriver`].

use std::collections::HashMap;

use crate::config::*;
use crate::player::CharacterBody;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AnimFloat {
    Speed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AnimBool {
    IsGrounded,
    IsJumping,
    IsCrouching,
}

/// Fire-once triggers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AnimTrigger {
    Jump,
    Attack,
    Roar,
}

impl AnimFloat {
    pub const fn name(self) -> &'static str {
        match self {
            AnimFloat::Speed => "Speed",
        }
    }
}

impl AnimBool {
    pub const fn name(self) -> &'static str {
        match self {
            AnimBool::IsGrounded => "IsGrounded",
            AnimBool::IsJumping => "IsJumping",
            AnimBool::IsCrouching => "IsCrouching",
        }
    }
}

impl AnimTrigger {
    pub const fn name(self) -> &'static str {
        match self {
            AnimTrigger::Jump => "Jump",
            AnimTrigger::Attack => "Attack",
            AnimTrigger::Roar => "Roar",
        }
    }
}

#[cfg_attr(test, mockall::automock)]
pub trait AnimationDriver {
    fn float(&self, param: AnimFloat) -> f32;
    fn set_float(&mut self, param: AnimFloat, value: f32);
    fn set_bool(&mut self, param: AnimBool, value: bool);
    fn set_trigger(&mut self, trigger: AnimTrigger);
}

/// In-memory parameter store. Triggers queue up until taken.
#[derive(Clone, Debug, Default)]
pub struct AnimatorState {
    floats: HashMap<AnimFloat, f32>,
    bools: HashMap<AnimBool, bool>,
    pending: Vec<AnimTrigger>,
}

impl AnimatorState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bool(&self, param: AnimBool) -> bool {
        self.bools.get(&param).copied().unwrap_or(false)
    }

    pub fn pending_triggers(&self) -> &[AnimTrigger] {
        &self.pending
    }

    pub fn take_triggers(&mut self) -> Vec<AnimTrigger> {
        std::mem::take(&mut self.pending)
    }

    pub fn count(&self, trigger: AnimTrigger) -> usize {
        self.pending.iter().filter(|&&t| t == trigger).count()
    }
}

impl AnimationDriver for AnimatorState {
    fn float(&self, param: AnimFloat) -> f32 {
        self.floats.get(&param).copied().unwrap_or(0.0)
    }

    fn set_float(&mut self, param: AnimFloat, value: f32) {
        self.floats.insert(param, value);
    }

    fn set_bool(&mut self, param: AnimBool, value: bool) {
        self.bools.insert(param, value);
    }

    fn set_trigger(&mut self, trigger: AnimTrigger) {
        self.pending.push(trigger);
    }
}

/// Blend-tree speed the body is heading toward this tick.
pub fn target_speed(body: &CharacterBody) -> f32 {
    if body.move_intent.length() <= ANIM_MOVE_THRESHOLD {
        ANIM_SPEED_IDLE
    } else if body.sprinting {
        ANIM_SPEED_RUN
    } else if body.crouching {
        ANIM_SPEED_CROUCH
    } else {
        ANIM_SPEED_WALK
    }
}

/// Pushes the locomotion parameters for one tick.
pub fn push_locomotion(
    driver: &mut impl AnimationDriver,
    body: &CharacterBody,
    with_crouch: bool,
    dt: f32,
) {
    let current = driver.float(AnimFloat::Speed);
    let t = (dt * ANIM_SPEED_SMOOTHING).clamp(0.0, 1.0);
    driver.set_float(AnimFloat::Speed, current + (target_speed(body) - current) * t);
    driver.set_bool(AnimBool::IsGrounded, body.grounded);
    driver.set_bool(AnimBool::IsJumping, body.jumping);
    if with_crouch {
        driver.set_bool(AnimBool::IsCrouching, body.crouching);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use glam::{Vec2, Vec3};
    use mockall::predicate::eq;
    use rstest::rstest;

    fn moving_body(sprinting: bool, crouching: bool) -> CharacterBody {
        let mut body = CharacterBody::new(Vec3::ZERO, 0.0);
        body.move_intent = Vec2::new(0.0, 1.0);
        body.sprinting = sprinting;
        body.crouching = crouching;
        body
    }

    #[rstest]
    #[case::run(true, false, ANIM_SPEED_RUN)]
    #[case::crouch(false, true, ANIM_SPEED_CROUCH)]
    #[case::walk(false, false, ANIM_SPEED_WALK)]
    fn target_speed_by_gait(#[case] sprinting: bool, #[case] crouching: bool, #[case] expected: f32) {
        assert_eq!(target_speed(&moving_body(sprinting, crouching)), expected);
    }

    #[rstest]
    fn tiny_intent_is_idle() {
        let mut body = moving_body(true, false);
        body.move_intent = Vec2::new(0.05, 0.05);
        assert_eq!(target_speed(&body), ANIM_SPEED_IDLE);
    }

    #[rstest]
    fn speed_is_smoothed_toward_target() {
        let mut animator = AnimatorState::new();
        let body = moving_body(true, false);
        push_locomotion(&mut animator, &body, false, 0.05);
        assert_relative_eq!(animator.float(AnimFloat::Speed), 0.5);
        push_locomotion(&mut animator, &body, false, 0.05);
        assert_relative_eq!(animator.float(AnimFloat::Speed), 0.75);
    }

    #[rstest]
    fn crouch_flag_only_pushed_when_supported() {
        let body = moving_body(false, true);
        let mut driver = MockAnimationDriver::new();
        driver.expect_float().return_const(0.0);
        driver.expect_set_float().return_const(());
        driver
            .expect_set_bool()
            .with(eq(AnimBool::IsCrouching), eq(true))
            .never();
        driver.expect_set_bool().times(2).return_const(());
        push_locomotion(&mut driver, &body, false, 0.016);
    }

    #[rstest]
    fn triggers_queue_until_taken() {
        let mut animator = AnimatorState::new();
        animator.set_trigger(AnimTrigger::Roar);
        animator.set_trigger(AnimTrigger::Attack);
        animator.set_trigger(AnimTrigger::Attack);
        assert_eq!(animator.count(AnimTrigger::Attack), 2);
        assert_eq!(
            animator.take_triggers(),
            vec![AnimTrigger::Roar, AnimTrigger::Attack, AnimTrigger::Attack]
        );
        assert!(animator.pending_triggers().is_empty());
    }

    #[rstest]
    fn parameter_names_match_animator_assets() {
        assert_eq!(AnimFloat::Speed.name(), "Speed");
        assert_eq!(AnimBool::IsCrouching.name(), "IsCrouching");
        assert_eq!(AnimTrigger::Roar.name(), "Roar");
    }
}
