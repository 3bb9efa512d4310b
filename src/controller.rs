//! Per-character composition root.
//!
//! Each tick runs, in order: ground probe, look, motion, combat, animation
//! push, view, chase. Optional collaborators (animator, cameras, body mesh)
//! are injected at build time; whatever is missing turns into a no-op.

use glam::{Vec2, Vec3};

use crate::animation::{push_locomotion, AnimTrigger, AnimationDriver, AnimatorState};
use crate::chase::{ChaseEvent, ChaseFlags, ChasePhase, ChaseSequence};
use crate::combat::CombatTrigger;
use crate::config::ControllerConfig;
use crate::error::ConfigError;
use crate::ground::GroundProbe;
use crate::input::{Action, CursorState, InputSource};
use crate::look::LookController;
use crate::motion::{MotionInput, MotionIntegrator};
use crate::physics::{LayerMask, PhysicsEngine};
use crate::player::CharacterBody;
use crate::view::{BodyMesh, CameraRig, ViewModeManager};

/// What happened during one tick.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    pub landed: bool,
    pub jumped: bool,
    pub attacked: bool,
    pub view_toggled: bool,
    /// Chase transitions in the order they were applied.
    pub chase_events: Vec<ChaseEvent>,
}

pub struct ControllerBuilder<A> {
    config: ControllerConfig,
    spawn_position: Vec3,
    spawn_yaw: f32,
    ground_mask: Option<LayerMask>,
    animator: Option<A>,
    first_person_camera: Option<CameraRig>,
    third_person_camera: Option<CameraRig>,
    body_mesh: Option<BodyMesh>,
}

impl ControllerBuilder<AnimatorState> {
    pub fn new(config: ControllerConfig) -> Self {
        Self {
            config,
            spawn_position: Vec3::ZERO,
            spawn_yaw: 0.0,
            ground_mask: None,
            animator: None,
            first_person_camera: None,
            third_person_camera: None,
            body_mesh: None,
        }
    }
}

impl<A: AnimationDriver> ControllerBuilder<A> {
    pub fn spawn(mut self, position: Vec3, yaw: f32) -> Self {
        self.spawn_position = position;
        self.spawn_yaw = yaw;
        self
    }

    /// Anchors the ground probe; the offset and radius come from the config.
    pub fn ground_probe(mut self, mask: LayerMask) -> Self {
        self.ground_mask = Some(mask);
        self
    }

    pub fn animator<B: AnimationDriver>(self, animator: B) -> ControllerBuilder<B> {
        ControllerBuilder {
            config: self.config,
            spawn_position: self.spawn_position,
            spawn_yaw: self.spawn_yaw,
            ground_mask: self.ground_mask,
            animator: Some(animator),
            first_person_camera: self.first_person_camera,
            third_person_camera: self.third_person_camera,
            body_mesh: self.body_mesh,
        }
    }

    pub fn first_person_camera(mut self, camera: CameraRig) -> Self {
        self.first_person_camera = Some(camera);
        self
    }

    pub fn third_person_camera(mut self, camera: CameraRig) -> Self {
        self.third_person_camera = Some(camera);
        self
    }

    pub fn body_mesh(mut self, mesh: BodyMesh) -> Self {
        self.body_mesh = Some(mesh);
        self
    }

    pub fn build(self) -> Result<CharacterController<A>, ConfigError> {
        let config = self.config;
        config.validate()?;
        let mask = self.ground_mask.ok_or(ConfigError::MissingGroundProbe)?;

        if self.animator.is_none() {
            log::warn!("No animator bound; animation parameters will be skipped");
        }
        if self.first_person_camera.is_none() {
            log::warn!("No first-person camera bound");
        }
        if self.third_person_camera.is_none() {
            log::warn!("No third-person camera bound; third-person view will not render");
        }
        if self.body_mesh.is_none() {
            log::warn!("No body mesh bound; visibility changes will be skipped");
        }

        let body = CharacterBody::new(self.spawn_position, self.spawn_yaw);
        let flags = ChaseFlags::new(config.start_in_stealth);

        let mut view = ViewModeManager::new(
            &config,
            self.first_person_camera,
            self.third_person_camera,
            self.body_mesh,
        );
        view.set_first_person(true, &body, flags.stealth_active);
        if flags.stealth_active {
            view.apply_stealth(true);
        }
        view.update(&body, 0.0);

        Ok(CharacterController {
            probe: GroundProbe::new(config.ground_check_offset, config.ground_distance, mask),
            look: LookController::new(config.mouse_sensitivity, config.snappiness, &body),
            motion: MotionIntegrator::from_config(&config),
            combat: config
                .capabilities
                .attack
                .then(|| CombatTrigger::new(config.attack_cooldown)),
            chase: config
                .capabilities
                .chase
                .then(|| ChaseSequence::new(config.chase_warmup, config.chase_duration)),
            view,
            animator: self.animator,
            flags,
            look_enabled: true,
            move_enabled: true,
            cursor: CursorState::captured(),
            clock: 0.0,
            body,
            config,
        })
    }
}

/// One playable character: shared locomotion core plus optional combat and
/// chase modules.
pub struct CharacterController<A = AnimatorState> {
    config: ControllerConfig,
    body: CharacterBody,
    probe: GroundProbe,
    look: LookController,
    motion: MotionIntegrator,
    combat: Option<CombatTrigger>,
    chase: Option<ChaseSequence>,
    view: ViewModeManager,
    animator: Option<A>,
    /// Written only by the chase sequence and `set_stealth`.
    flags: ChaseFlags,
    look_enabled: bool,
    move_enabled: bool,
    cursor: CursorState,
    clock: f64,
}

impl CharacterController {
    pub fn builder(config: ControllerConfig) -> ControllerBuilder<AnimatorState> {
        ControllerBuilder::new(config)
    }
}

impl<A: AnimationDriver> CharacterController<A> {
    pub fn tick(
        &mut self,
        dt: f32,
        input: &impl InputSource,
        physics: &impl PhysicsEngine,
    ) -> TickReport {
        let mut report = TickReport {
            landed: self.probe.update(&mut self.body, physics),
            ..TickReport::default()
        };

        if self.look_enabled {
            self.look.update(&mut self.body, input.look_delta(), dt);
        }

        let motion_input = MotionInput::poll(input);
        let enabled = self.movement_enabled();
        let outcome = self
            .motion
            .update(&mut self.body, &motion_input, enabled, dt, physics);
        if outcome.jumped {
            report.jumped = true;
            self.fire(AnimTrigger::Jump);
        }

        if self.flags.movement_enabled && input.was_pressed(Action::Attack) {
            report.attacked = self.trigger_attack();
        }

        if let Some(animator) = self.animator.as_mut() {
            push_locomotion(animator, &self.body, self.config.capabilities.crouch, dt);
        }

        if input.was_pressed(Action::ToggleView) {
            self.toggle_view();
            report.view_toggled = true;
        }
        self.view.update(&self.body, dt);

        report.chase_events = self.update_chase(dt, input.was_pressed(Action::TriggerChase));

        self.clock += f64::from(dt);
        report
    }

    fn update_chase(&mut self, dt: f32, trigger_pressed: bool) -> Vec<ChaseEvent> {
        let Some(chase) = self.chase.as_mut() else {
            return Vec::new();
        };

        // A long tick can cross both deadlines; overshoot carries over, so
        // keep advancing by zero until nothing else fires.
        let mut events = Vec::new();
        let mut step = dt;
        while let Some(event) = chase.advance(step, &mut self.flags) {
            events.push(event);
            step = 0.0;
        }
        if trigger_pressed {
            events.extend(chase.trigger(&mut self.flags));
        }

        for &event in &events {
            self.apply_chase_event(event);
        }
        events
    }

    fn apply_chase_event(&mut self, event: ChaseEvent) {
        match event {
            ChaseEvent::Revealed => {
                self.view.apply_stealth(false);
                self.fire(AnimTrigger::Roar);
            }
            ChaseEvent::Hunting => {}
            ChaseEvent::Ended => self.view.apply_stealth(true),
        }
    }

    fn fire(&mut self, trigger: AnimTrigger) {
        if let Some(animator) = self.animator.as_mut() {
            animator.set_trigger(trigger);
        }
    }

    /// Attacks if off cooldown. Works even while frozen by the chase.
    pub fn trigger_attack(&mut self) -> bool {
        let Some(combat) = self.combat.as_mut() else {
            return false;
        };
        if !combat.try_attack(self.clock) {
            return false;
        }
        log::info!("Attack at t={:.2}s", self.clock);
        self.fire(AnimTrigger::Attack);
        true
    }

    /// Starts a chase session as if the trigger key had been pressed.
    /// Returns false when chasing is unsupported or a session is running.
    pub fn trigger_chase(&mut self) -> bool {
        let Some(chase) = self.chase.as_mut() else {
            return false;
        };
        match chase.trigger(&mut self.flags) {
            Some(event) => {
                self.apply_chase_event(event);
                true
            }
            None => false,
        }
    }

    pub fn toggle_view(&mut self) {
        self.view.toggle(&self.body, self.flags.stealth_active);
    }

    pub fn set_stealth(&mut self, active: bool) {
        self.flags.stealth_active = active;
        self.view.apply_stealth(active);
    }

    pub fn set_control(&mut self, enabled: bool) {
        self.set_look_control(enabled);
        self.set_move_control(enabled);
    }

    pub fn set_look_control(&mut self, enabled: bool) {
        self.look_enabled = enabled;
    }

    pub fn set_move_control(&mut self, enabled: bool) {
        self.move_enabled = enabled;
    }

    pub fn set_cursor_visibility(&mut self, visible: bool) {
        self.cursor.set_visible(visible);
    }

    pub fn cursor(&self) -> CursorState {
        self.cursor
    }

    pub fn is_look_enabled(&self) -> bool {
        self.look_enabled
    }

    /// External move control combined with the chase freeze.
    pub fn movement_enabled(&self) -> bool {
        self.move_enabled && self.flags.movement_enabled
    }

    pub fn is_stealthed(&self) -> bool {
        self.flags.stealth_active
    }

    pub fn is_sprinting(&self) -> bool {
        self.body.sprinting
    }

    pub fn is_jumping(&self) -> bool {
        self.body.jumping
    }

    pub fn is_crouching(&self) -> bool {
        self.body.crouching
    }

    pub fn move_input(&self) -> Vec2 {
        self.body.move_intent
    }

    pub fn is_chasing(&self) -> bool {
        self.chase.as_ref().is_some_and(ChaseSequence::is_chasing)
    }

    pub fn chase_phase(&self) -> ChasePhase {
        self.chase
            .as_ref()
            .map_or(ChasePhase::Dormant, ChaseSequence::phase)
    }

    pub fn body(&self) -> &CharacterBody {
        &self.body
    }

    pub fn view(&self) -> &ViewModeManager {
        &self.view
    }

    pub fn animator(&self) -> Option<&A> {
        self.animator.as_ref()
    }

    pub fn animator_mut(&mut self) -> Option<&mut A> {
        self.animator.as_mut()
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Simulated seconds since spawn.
    pub fn clock(&self) -> f64 {
        self.clock
    }
}

impl<A> Drop for CharacterController<A> {
    fn drop(&mut self) {
        if self.chase.as_ref().is_some_and(ChaseSequence::is_chasing) {
            log::debug!("Character torn down mid-chase; session cancelled");
        }
    }
}
