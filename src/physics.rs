use glam::Vec3;
use parry3d::math::{Pose3, Vector};
use parry3d::query::{Ray, RayCast};
use parry3d::shape::TriMesh;

use crate::config::*;
use crate::error::PhysicsError;

/// Bit set of collision layers a query considers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LayerMask(pub u32);

impl LayerMask {
    pub const NONE: Self = Self(0);
    pub const GROUND: Self = Self(1);
    pub const WALLS: Self = Self(1 << 1);
    pub const ALL: Self = Self(u32::MAX);

    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

/// Collision services the controller consumes.
#[cfg_attr(test, mockall::automock)]
pub trait PhysicsEngine {
    /// Whether a sphere at `center` touches geometry on any layer in `mask`.
    fn check_sphere(&self, center: Vec3, radius: f32, mask: LayerMask) -> bool;
    /// Moves a character standing at `position` by `displacement`, resolving
    /// collisions, and returns where it ends up.
    fn move_character(&self, position: Vec3, displacement: Vec3) -> Vec3;
}

struct CollisionLayer {
    mask: LayerMask,
    trimesh: TriMesh,
}

/// Static level geometry as layered triangle meshes.
pub struct PhysicsWorld {
    layers: Vec<CollisionLayer>,
}

impl PhysicsWorld {
    pub fn new() -> Self {
        Self { layers: Vec::new() }
    }

    /// Square floor of side `2 * half_extent` at height `y`.
    pub fn flat_ground(half_extent: f32, y: f32) -> Result<Self, PhysicsError> {
        let mut world = Self::new();
        world.add_quad(
            LayerMask::GROUND,
            [
                Vec3::new(-half_extent, y, -half_extent),
                Vec3::new(half_extent, y, -half_extent),
                Vec3::new(half_extent, y, half_extent),
                Vec3::new(-half_extent, y, half_extent),
            ],
        )?;
        Ok(world)
    }

    pub fn add_quad(&mut self, mask: LayerMask, corners: [Vec3; 4]) -> Result<(), PhysicsError> {
        self.add_mesh(mask, &corners, &[[0, 1, 2], [0, 2, 3]])
    }

    pub fn add_mesh(
        &mut self,
        mask: LayerMask,
        vertices: &[Vec3],
        indices: &[[u32; 3]],
    ) -> Result<(), PhysicsError> {
        if vertices.is_empty() || indices.is_empty() {
            return Err(PhysicsError::EmptyMesh);
        }
        for (triangle, tri) in indices.iter().enumerate() {
            if let Some(&index) = tri.iter().find(|&&i| i as usize >= vertices.len()) {
                return Err(PhysicsError::IndexOutOfRange {
                    triangle,
                    index,
                    vertex_count: vertices.len(),
                });
            }
        }

        let points: Vec<Vector> = vertices
            .iter()
            .map(|v| Vector::new(v.x, v.y, v.z))
            .collect();
        let trimesh = TriMesh::new(points, indices.to_vec())
            .map_err(|e| PhysicsError::InvalidMesh(format!("{e:?}")))?;

        log::debug!(
            "Added collision mesh: {} triangles on layer mask {:#x}",
            indices.len(),
            mask.0
        );
        self.layers.push(CollisionLayer { mask, trimesh });
        Ok(())
    }

    /// Nearest hit across every layer matching `mask`.
    fn cast_ray(&self, origin: Vec3, dir: Vec3, max_dist: f32, mask: LayerMask) -> Option<f32> {
        let ray = Ray::new(
            Vector::new(origin.x, origin.y, origin.z),
            Vector::new(dir.x, dir.y, dir.z),
        );
        self.layers
            .iter()
            .filter(|layer| layer.mask.intersects(mask))
            .filter_map(|layer| layer.trimesh.cast_ray(&Pose3::IDENTITY, &ray, max_dist, true))
            .min_by(f32::total_cmp)
    }

    /// Pulls `to` back along the segment from `from` so the body stops just
    /// short of the first obstacle at step or head height.
    fn clamp_desired_to_path(&self, from: Vec3, to: Vec3) -> Vec3 {
        let travel = to - from;
        let distance = travel.length();
        if distance <= 1e-6 {
            return to;
        }
        let dir = travel / distance;

        // Hits this close to the start mean we already touch the surface.
        const SKIN: f32 = 0.005;

        let first_hit = [STEP_OVER_HEIGHT, CHARACTER_HEIGHT]
            .into_iter()
            .filter_map(|height| {
                self.cast_ray(from + Vec3::Y * height, dir, distance, LayerMask::ALL)
            })
            .filter(|&toi| toi > SKIN)
            .min_by(f32::total_cmp);

        match first_hit {
            Some(toi) => from + dir * (toi - PATH_HIT_MARGIN).max(0.0),
            None => to,
        }
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicsEngine for PhysicsWorld {
    /// Approximates the overlap with probe rays of length `radius` along
    /// the six axes.
    fn check_sphere(&self, center: Vec3, radius: f32, mask: LayerMask) -> bool {
        [
            Vec3::NEG_Y,
            Vec3::Y,
            Vec3::X,
            Vec3::NEG_X,
            Vec3::Z,
            Vec3::NEG_Z,
        ]
        .into_iter()
        .any(|dir| self.cast_ray(center, dir, radius, mask).is_some())
    }

    fn move_character(&self, position: Vec3, displacement: Vec3) -> Vec3 {
        let target = position + displacement;

        let mut final_pos = self.clamp_desired_to_path(
            position,
            Vec3::new(target.x, position.y, target.z),
        );
        final_pos.y = target.y;

        // Floor: anything between the feet and a step above the higher of
        // the start and end heights.
        let top = position.y.max(final_pos.y) + STEP_OVER_HEIGHT;
        let drop = top - final_pos.y;
        let ground_origin = Vec3::new(final_pos.x, top, final_pos.z);
        if let Some(toi) = self.cast_ray(ground_origin, Vec3::NEG_Y, drop, LayerMask::ALL) {
            let ground_y = top - toi;
            if final_pos.y < ground_y {
                final_pos.y = ground_y;
            }
        }

        // Push out of walls at step and head height.
        for height in [STEP_OVER_HEIGHT, CHARACTER_HEIGHT] {
            let wall_origin = final_pos + Vec3::new(0.0, height, 0.0);
            for (dx, dz) in [(1.0, 0.0), (-1.0, 0.0), (0.0, 1.0), (0.0, -1.0)] {
                let dir = Vec3::new(dx, 0.0, dz);
                if let Some(toi) =
                    self.cast_ray(wall_origin, dir, CHARACTER_RADIUS, LayerMask::ALL)
                {
                    if toi < CHARACTER_RADIUS {
                        final_pos.x -= dx * (CHARACTER_RADIUS - toi);
                        final_pos.z -= dz * (CHARACTER_RADIUS - toi);
                    }
                }
            }
        }

        // Ceiling, only while rising.
        if displacement.y > 0.0 {
            let head_clearance = CHARACTER_HEIGHT - EYE_HEIGHT;
            let eye_origin = final_pos + Vec3::new(0.0, EYE_HEIGHT, 0.0);
            if let Some(toi) = self.cast_ray(eye_origin, Vec3::Y, head_clearance, LayerMask::ALL) {
                if toi < head_clearance {
                    final_pos.y -= head_clearance - toi;
                }
            }
        }

        final_pos
    }
}
