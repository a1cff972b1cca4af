//! Per-query set of camera frustums used for grass visibility.

use glam::Mat4;
use crate::math::Frustum;

/// Host-assigned camera identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CameraId(pub u32);

/// Frustums of every camera that should see grass this frame.
///
/// Each camera contributes once; an editor/scene-view camera that is also
/// one of the active cameras is not counted twice.
#[derive(Debug, Clone, Default)]
pub struct ViewSet {
    cameras: Vec<CameraId>,
    frustums: Vec<Frustum>,
}

impl ViewSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a camera by frustum. Returns `false` if the camera was already added.
    pub fn add(&mut self, id: CameraId, frustum: Frustum) -> bool {
        if self.cameras.contains(&id) {
            return false;
        }
        self.cameras.push(id);
        self.frustums.push(frustum);
        true
    }

    /// Add a camera by its view-projection matrix
    pub fn add_view_projection(&mut self, id: CameraId, view_proj: &Mat4) -> bool {
        self.add(id, Frustum::from_view_projection(view_proj))
    }

    /// Add the optional current/editor camera
    pub fn add_current(&mut self, current: Option<(CameraId, Frustum)>) -> bool {
        match current {
            Some((id, frustum)) => self.add(id, frustum),
            None => false,
        }
    }

    pub fn frustums(&self) -> &[Frustum] {
        &self.frustums
    }

    pub fn len(&self) -> usize {
        self.frustums.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frustums.is_empty()
    }

    /// Forget all cameras, keeping allocations for the next frame
    pub fn clear(&mut self) {
        self.cameras.clear();
        self.frustums.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn frustum() -> Frustum {
        let proj = Mat4::perspective_rh(1.0, 1.0, 0.1, 100.0);
        let view = Mat4::look_at_rh(Vec3::new(0.0, 2.0, 5.0), Vec3::ZERO, Vec3::Y);
        Frustum::from_view_projection(&(proj * view))
    }

    #[test]
    fn test_editor_camera_not_counted_twice() {
        let mut views = ViewSet::new();
        assert!(views.add(CameraId(1), frustum()));
        assert!(views.add(CameraId(2), frustum()));
        assert!(!views.add_current(Some((CameraId(1), frustum()))));
        assert_eq!(views.len(), 2);

        assert!(views.add_current(Some((CameraId(99), frustum()))));
        assert!(!views.add_current(None));
        assert_eq!(views.frustums().len(), 3);
    }

    #[test]
    fn test_clear() {
        let mut views = ViewSet::new();
        let vp = Mat4::perspective_rh(1.0, 1.0, 0.1, 100.0);
        views.add_view_projection(CameraId(0), &vp);
        views.clear();
        assert!(views.is_empty());
        assert!(views.add_view_projection(CameraId(0), &vp));
    }
}
