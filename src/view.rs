use glam::{Mat4, Quat, Vec3};

use crate::config::ControllerConfig;
use crate::player::CharacterBody;

/// A positionable, activatable camera handle.
#[derive(Clone, Debug, PartialEq)]
pub struct CameraRig {
    pub active: bool,
    pub position: Vec3,
    pub rotation: Quat,
}

impl CameraRig {
    pub fn new(active: bool) -> Self {
        Self {
            active,
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }

    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }

    /// Re-aims at `target`, keeping world up. No-op when looking straight
    /// along the up axis.
    pub fn look_at(&mut self, target: Vec3) {
        let dir = target - self.position;
        if dir.length_squared() <= f32::EPSILON
            || dir.normalize().cross(Vec3::Y).length_squared() <= 1e-8
        {
            return;
        }
        let (_, rotation, _) = Mat4::look_at_rh(self.position, target, Vec3::Y)
            .inverse()
            .to_scale_rotation_translation();
        self.rotation = rotation;
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation, self.position).inverse()
    }
}

/// The body's renderer switch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BodyMesh {
    pub enabled: bool,
}

impl BodyMesh {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct FollowOffset {
    distance: f32,
    height: f32,
    look_height: f32,
    rate: f32,
}

impl FollowOffset {
    fn ideal_position(&self, body: &CharacterBody) -> Vec3 {
        body.position - body.forward() * self.distance + Vec3::Y * self.height
    }

    fn look_target(&self, body: &CharacterBody) -> Vec3 {
        body.position + Vec3::Y * self.look_height
    }
}

/// First/third-person presentation.
///
/// Mesh visibility follows `!stealth && (third_person || !hide_body_in_first_person)`
/// on every view change.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewModeManager {
    first_person: bool,
    hide_body_in_first_person: bool,
    follow: FollowOffset,
    first_person_camera: Option<CameraRig>,
    third_person_camera: Option<CameraRig>,
    body_mesh: Option<BodyMesh>,
}

impl ViewModeManager {
    pub fn new(
        config: &ControllerConfig,
        first_person_camera: Option<CameraRig>,
        third_person_camera: Option<CameraRig>,
        body_mesh: Option<BodyMesh>,
    ) -> Self {
        Self {
            first_person: true,
            hide_body_in_first_person: config.hide_body_in_first_person,
            follow: FollowOffset {
                distance: config.third_person_distance,
                height: config.third_person_height,
                look_height: config.third_person_look_height,
                rate: config.third_person_follow_rate,
            },
            first_person_camera,
            third_person_camera,
            body_mesh,
        }
    }

    pub fn is_first_person(&self) -> bool {
        self.first_person
    }

    pub fn first_person_camera(&self) -> Option<&CameraRig> {
        self.first_person_camera.as_ref()
    }

    pub fn third_person_camera(&self) -> Option<&CameraRig> {
        self.third_person_camera.as_ref()
    }

    pub fn body_mesh(&self) -> Option<&BodyMesh> {
        self.body_mesh.as_ref()
    }

    pub fn mesh_visible(&self) -> Option<bool> {
        self.body_mesh.map(|mesh| mesh.enabled)
    }

    /// The camera that is currently rendering, if it exists.
    pub fn active_camera(&self) -> Option<&CameraRig> {
        if self.first_person {
            self.first_person_camera.as_ref()
        } else {
            self.third_person_camera.as_ref()
        }
    }

    /// Sets the mesh directly to `!stealth`, whatever the view mode.
    pub fn apply_stealth(&mut self, stealth: bool) {
        if let Some(mesh) = self.body_mesh.as_mut() {
            mesh.enabled = !stealth;
        }
    }

    pub fn toggle(&mut self, body: &CharacterBody, stealth: bool) {
        self.set_first_person(!self.first_person, body, stealth);
    }

    pub fn set_first_person(&mut self, first_person: bool, body: &CharacterBody, stealth: bool) {
        self.first_person = first_person;
        log::debug!(
            "View switched to {}",
            if first_person { "first person" } else { "third person" }
        );

        if let Some(camera) = self.first_person_camera.as_mut() {
            camera.active = first_person;
        }
        if let Some(camera) = self.third_person_camera.as_mut() {
            camera.active = !first_person;
            if !first_person {
                camera.position = self.follow.ideal_position(body);
                camera.look_at(self.follow.look_target(body));
            }
        }

        if let Some(mesh) = self.body_mesh.as_mut() {
            if first_person {
                if self.hide_body_in_first_person {
                    mesh.enabled = false;
                }
            } else {
                mesh.enabled = !stealth;
            }
        }
    }

    /// Per-tick camera follow.
    pub fn update(&mut self, body: &CharacterBody, dt: f32) {
        if self.first_person {
            if let Some(camera) = self.first_person_camera.as_mut() {
                camera.position = body.eye_position();
                camera.rotation = body.rotation() * body.camera_local_rotation();
            }
        } else if let Some(camera) = self.third_person_camera.as_mut() {
            let t = (dt * self.follow.rate).clamp(0.0, 1.0);
            camera.position = camera.position.lerp(self.follow.ideal_position(body), t);
            camera.look_at(self.follow.look_target(body));
        }
    }
}
