#![allow(dead_code)]

use glam::Vec3;
use stalker::{
    AnimatorState, BodyMesh, CameraRig, CharacterController, ControllerConfig, InputState,
    LayerMask, PhysicsEngine,
};
use winit::keyboard::KeyCode;

/// Infinite floor at y = 0 on the ground layer.
pub struct FlatFloor;

impl PhysicsEngine for FlatFloor {
    fn check_sphere(&self, center: Vec3, radius: f32, mask: LayerMask) -> bool {
        mask.intersects(LayerMask::GROUND) && center.y - radius <= 0.0
    }

    fn move_character(&self, position: Vec3, displacement: Vec3) -> Vec3 {
        let next = position + displacement;
        Vec3::new(next.x, next.y.max(0.0), next.z)
    }
}

pub fn controller(config: ControllerConfig, spawn: Vec3) -> CharacterController {
    CharacterController::builder(config)
        .spawn(spawn, 0.0)
        .ground_probe(LayerMask::GROUND)
        .animator(AnimatorState::new())
        .first_person_camera(CameraRig::new(true))
        .third_person_camera(CameraRig::new(false))
        .body_mesh(BodyMesh::new(true))
        .build()
        .expect("preset config is valid")
}

pub fn holding(keys: &[KeyCode]) -> InputState {
    let mut input = InputState::new();
    for &key in keys {
        input.handle_key_press(key);
    }
    input
}

/// Ticks `n` times, clearing press edges after each tick.
pub fn run(controller: &mut CharacterController, input: &mut InputState, n: usize, dt: f32) {
    for _ in 0..n {
        controller.tick(dt, input, &FlatFloor);
        input.end_frame();
    }
}
