//! CPU staging for the grass instancing buffer.
//!
//! The host copies `as_bytes()` into its GPU instance buffer. Staging
//! remembers the index revision it was filled from so the host knows when a
//! re-upload is due.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

use super::index::ChunkedPointIndex;
use super::view::ViewSet;

/// One instanced blade cluster. Must match `GrassInstance` in grass.wgsl.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct GrassInstance {
    pub position: [f32; 3],
    pub scale: f32,
    // Total: 16 bytes
}

/// Integer hash producing a value in [0, 1]
fn hash_3d(p: Vec3) -> f32 {
    let mut h = p.x.to_bits().wrapping_mul(374761393)
        .wrapping_add(p.y.to_bits().wrapping_mul(668265263))
        .wrapping_add(p.z.to_bits().wrapping_mul(1274126177));
    h = (h ^ (h >> 13)).wrapping_mul(1103515245);
    h = h ^ (h >> 16);
    (h & 0x7FFFFFFF) as f32 / 0x7FFFFFFF_u32 as f32
}

impl GrassInstance {
    /// Instance at `p` with a per-position scale in `[min_scale, max_scale]`
    pub fn at(p: Vec3, min_scale: f32, max_scale: f32) -> Self {
        Self {
            position: p.to_array(),
            scale: min_scale + hash_3d(p) * (max_scale - min_scale),
        }
    }
}

/// CPU-side copy of the instance buffer contents
#[derive(Debug, Clone)]
pub struct InstanceStaging {
    instances: Vec<GrassInstance>,
    scratch: Vec<Vec3>,
    /// Index revision the contents were built from
    built_revision: Option<u64>,
    pub min_scale: f32,
    pub max_scale: f32,
}

impl InstanceStaging {
    pub fn new(min_scale: f32, max_scale: f32) -> Self {
        Self {
            instances: Vec::new(),
            scratch: Vec::new(),
            built_revision: None,
            min_scale,
            max_scale,
        }
    }

    /// True if the index changed since the last refresh
    pub fn is_stale(&self, index: &ChunkedPointIndex) -> bool {
        self.built_revision != Some(index.revision())
    }

    /// Fill with every point of the index
    pub fn refresh_all(&mut self, index: &ChunkedPointIndex) {
        let points = index.all_points();
        self.fill(&points);
        self.built_revision = Some(index.revision());
    }

    /// Fill with the points seen by `views`.
    ///
    /// Returns `false` and keeps the previous contents when nothing is visible.
    pub fn refresh_visible(&mut self, index: &ChunkedPointIndex, views: &ViewSet) -> bool {
        let mut scratch = std::mem::take(&mut self.scratch);
        let visible = index.visible_points(views.frustums(), &mut scratch);
        if visible {
            self.fill(&scratch);
            self.built_revision = Some(index.revision());
        }
        self.scratch = scratch;
        visible
    }

    fn fill(&mut self, points: &[Vec3]) {
        let (min_scale, max_scale) = (self.min_scale, self.max_scale);
        self.instances.clear();
        self.instances.extend(points.iter().map(|p| GrassInstance::at(*p, min_scale, max_scale)));
    }

    pub fn instances(&self) -> &[GrassInstance] {
        &self.instances
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Raw bytes for upload
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.instances)
    }
}

impl Default for InstanceStaging {
    fn default() -> Self {
        Self::new(0.8, 1.2)
    }
}
