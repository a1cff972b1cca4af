//! Camera frustum for chunk visibility tests

use crate::core::types::{Vec3, Vec4, Mat4};
use super::aabb::Aabb;

/// A plane defined by normal and distance from origin
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Plane {
    pub normal: Vec3,
    pub distance: f32,
}

impl Plane {
    pub fn new(normal: Vec3, distance: f32) -> Self {
        Self { normal, distance }
    }

    /// Signed distance from point to plane (positive = in front)
    pub fn distance_to_point(&self, point: Vec3) -> f32 {
        self.normal.dot(point) + self.distance
    }

    fn from_raw(plane: Vec4) -> Self {
        let normal = Vec3::new(plane.x, plane.y, plane.z);
        let len = normal.length();
        if len > 0.0 {
            Plane { normal: normal / len, distance: plane.w / len }
        } else {
            // Degenerate row, accept everything
            Plane { normal: Vec3::ZERO, distance: 0.0 }
        }
    }
}

/// View frustum with 6 inward-facing planes (Near, Far, Left, Right, Top, Bottom)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Frustum {
    pub planes: [Plane; 6],
}

impl Frustum {
    /// Build from planes already supplied by the host renderer
    pub fn from_planes(planes: [Plane; 6]) -> Self {
        Self { planes }
    }

    /// Extract frustum planes from view-projection matrix (Gribb/Hartmann).
    ///
    /// Expects 0..1 clip depth, as produced by glam's `perspective_rh` and
    /// `orthographic_rh`.
    pub fn from_view_projection(vp: &Mat4) -> Self {
        let rows = [vp.row(0), vp.row(1), vp.row(2), vp.row(3)];

        Self {
            planes: [
                Plane::from_raw(rows[2]),           // near
                Plane::from_raw(rows[3] - rows[2]), // far
                Plane::from_raw(rows[3] + rows[0]), // left
                Plane::from_raw(rows[3] - rows[0]), // right
                Plane::from_raw(rows[3] - rows[1]), // top
                Plane::from_raw(rows[3] + rows[1]), // bottom
            ],
        }
    }

    /// Check if point is inside frustum
    pub fn contains_point(&self, point: Vec3) -> bool {
        self.planes.iter().all(|plane| plane.distance_to_point(point) >= 0.0)
    }

    /// Check if AABB intersects frustum (conservative test)
    pub fn intersects_aabb(&self, aabb: &Aabb) -> bool {
        for plane in &self.planes {
            // p-vertex: the corner furthest along the plane normal
            let p = Vec3::new(
                if plane.normal.x >= 0.0 { aabb.max.x } else { aabb.min.x },
                if plane.normal.y >= 0.0 { aabb.max.y } else { aabb.min.y },
                if plane.normal.z >= 0.0 { aabb.max.z } else { aabb.min.z },
            );

            if plane.distance_to_point(p) < 0.0 {
                return false;
            }
        }
        true
    }
}
