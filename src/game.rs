use glam::Vec3;
use web_time::Instant;

use crate::animation::AnimatorState;
use crate::config::*;
use crate::controller::{CharacterController, TickReport};
use crate::error::ConfigError;
use crate::input::InputState;
use crate::physics::{LayerMask, PhysicsWorld};
use crate::view::{BodyMesh, CameraRig};

/// One character in a static world, driven by wall-clock frames.
pub struct GameState {
    pub controller: CharacterController,
    pub physics: PhysicsWorld,
    last_update: Instant,
}

impl GameState {
    /// Spawns a fully equipped character: animator, both cameras and a body
    /// mesh, probing the ground layer.
    pub fn new(
        config: ControllerConfig,
        physics: PhysicsWorld,
        spawn: Vec3,
        yaw: f32,
    ) -> Result<Self, ConfigError> {
        let controller = CharacterController::builder(config)
            .spawn(spawn, yaw)
            .ground_probe(LayerMask::GROUND)
            .animator(AnimatorState::new())
            .first_person_camera(CameraRig::new(true))
            .third_person_camera(CameraRig::new(false))
            .body_mesh(BodyMesh::new(true))
            .build()?;

        log::info!("Spawned character at {spawn:?}, facing {yaw:.0}°");

        Ok(Self {
            controller,
            physics,
            last_update: Instant::now(),
        })
    }

    /// Advances by the wall-clock time since the previous call. Edges in
    /// `input` are not cleared; call `InputState::end_frame` afterwards.
    pub fn update(&mut self, input: &InputState) -> TickReport {
        let now = Instant::now();
        let dt = (now - self.last_update).as_secs_f32();
        self.last_update = now;
        self.step(dt, input)
    }

    /// Advances by a fixed `dt`, clamped to [`MAX_FRAME_DT`].
    pub fn step(&mut self, dt: f32, input: &InputState) -> TickReport {
        let dt = dt.clamp(0.0, MAX_FRAME_DT);
        self.controller.tick(dt, input, &self.physics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::{fixture, rstest};
    use winit::keyboard::KeyCode;

    #[fixture]
    fn game() -> GameState {
        let physics = PhysicsWorld::flat_ground(50.0, 0.0).expect("flat ground is valid geometry");
        GameState::new(ControllerConfig::survivor(), physics, Vec3::new(0.0, 1.0, 0.0), 0.0)
            .expect("survivor preset is valid")
    }

    #[rstest]
    fn long_frames_are_clamped(mut game: GameState) {
        game.step(5.0, &InputState::new());
        assert_relative_eq!(game.controller.clock(), f64::from(MAX_FRAME_DT), epsilon = 1e-6);
    }

    #[rstest]
    fn negative_frames_do_not_rewind(mut game: GameState) {
        game.step(-1.0, &InputState::new());
        assert_eq!(game.controller.clock(), 0.0);
    }

    #[rstest]
    fn dropped_character_settles_on_floor(mut game: GameState) {
        let input = InputState::new();
        for _ in 0..120 {
            game.step(1.0 / 60.0, &input);
        }
        assert_relative_eq!(game.controller.body().position.y, 0.0, epsilon = 1e-3);
    }

    #[rstest]
    fn walking_forward_moves_along_negative_z(mut game: GameState) {
        let mut input = InputState::new();
        input.handle_key_press(KeyCode::KeyW);
        for _ in 0..60 {
            game.step(1.0 / 60.0, &input);
            input.end_frame();
        }
        assert!(game.controller.body().position.z < -1.0);
    }

    #[rstest]
    fn wall_clock_update_runs_a_tick(mut game: GameState) {
        game.update(&InputState::new());
        assert!(game.controller.clock() >= 0.0);
        assert!(game.controller.clock() <= f64::from(MAX_FRAME_DT));
    }
}
