//! Chunk addressing: which grid cell a grass point belongs to.

use glam::Vec3;
use crate::math::Aabb;

/// Smallest allowed chunk extent along any axis, in meters.
pub const MIN_CHUNK_SIZE: f32 = 1.0;

/// Integer coordinate of one chunk in the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ChunkKey {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl ChunkKey {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// The 3x3x3 block of keys centered on this one (self included).
    ///
    /// Keys on the `i32` limits get a clipped block; no key repeats.
    pub fn neighborhood(self) -> impl Iterator<Item = ChunkKey> {
        let span = |c: i32| c.saturating_sub(1)..=c.saturating_add(1);
        let (ys, zs) = (span(self.y), span(self.z));
        span(self.x).flat_map(move |x| {
            let zs = zs.clone();
            ys.clone().flat_map(move |y| zs.clone().map(move |z| ChunkKey::new(x, y, z)))
        })
    }

    fn as_vec3(self) -> Vec3 {
        Vec3::new(self.x as f32, self.y as f32, self.z as f32)
    }
}

/// Chunk extent plus the padding applied to chunk bounds for culling.
///
/// Padding covers geometry that overhangs its root point (blade height, sway),
/// it never affects which chunk a point lands in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChunkLayout {
    size: Vec3,
    padding: Vec3,
}

impl ChunkLayout {
    /// Create a layout; size is clamped to `MIN_CHUNK_SIZE` and padding to zero.
    pub fn new(size: Vec3, padding: Vec3) -> Self {
        Self {
            size: Self::clamp_size(size),
            padding: padding.max(Vec3::ZERO),
        }
    }

    /// Clamp each axis of a requested chunk size to the allowed minimum.
    ///
    /// NaN components also fall back to the minimum.
    pub fn clamp_size(size: Vec3) -> Vec3 {
        let clamp = |v: f32| if v >= MIN_CHUNK_SIZE { v } else { MIN_CHUNK_SIZE };
        Vec3::new(clamp(size.x), clamp(size.y), clamp(size.z))
    }

    pub fn size(&self) -> Vec3 {
        self.size
    }

    pub fn padding(&self) -> Vec3 {
        self.padding
    }

    /// Same size, different padding
    pub fn with_padding(self, padding: Vec3) -> Self {
        Self::new(self.size, padding)
    }

    /// Chunk containing `p`. Uses floor so negative coordinates stay consistent.
    pub fn chunk_of(&self, p: Vec3) -> ChunkKey {
        let c = (p / self.size).floor();
        ChunkKey::new(c.x as i32, c.y as i32, c.z as i32)
    }

    /// Unpadded extent of a chunk
    pub fn chunk_extent(&self, key: ChunkKey) -> Aabb {
        let min = key.as_vec3() * self.size;
        Aabb::new(min, min + self.size)
    }

    /// Extent of a chunk grown by the layout padding
    pub fn chunk_bounds(&self, key: ChunkKey) -> Aabb {
        self.chunk_extent(key).padded(self.padding)
    }
}

impl Default for ChunkLayout {
    fn default() -> Self {
        Self::new(Vec3::splat(16.0), Vec3::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_of_uses_floor() {
        let layout = ChunkLayout::new(Vec3::splat(2.0), Vec3::ZERO);
        assert_eq!(layout.chunk_of(Vec3::new(-0.1, 0.0, 0.0)), ChunkKey::new(-1, 0, 0));
        assert_eq!(layout.chunk_of(Vec3::new(1.9, 0.0, 0.0)), ChunkKey::new(0, 0, 0));
        assert_eq!(layout.chunk_of(Vec3::new(2.0, 0.0, 0.0)), ChunkKey::new(1, 0, 0));
        assert_eq!(layout.chunk_of(Vec3::new(5.0, -4.0, -4.1)), ChunkKey::new(2, -2, -3));
    }

    #[test]
    fn test_size_is_clamped() {
        let layout = ChunkLayout::new(Vec3::new(0.25, -3.0, 8.0), Vec3::splat(-1.0));
        assert_eq!(layout.size(), Vec3::new(1.0, 1.0, 8.0));
        assert_eq!(layout.padding(), Vec3::ZERO);

        let nan = ChunkLayout::clamp_size(Vec3::new(f32::NAN, 2.0, 2.0));
        assert_eq!(nan, Vec3::new(1.0, 2.0, 2.0));
    }

    #[test]
    fn test_per_axis_size() {
        let layout = ChunkLayout::new(Vec3::new(4.0, 100.0, 2.0), Vec3::ZERO);
        assert_eq!(layout.chunk_of(Vec3::new(9.0, 50.0, 3.0)), ChunkKey::new(2, 0, 1));
    }

    #[test]
    fn test_chunk_bounds_include_padding() {
        let layout = ChunkLayout::new(Vec3::splat(2.0), Vec3::new(0.0, 1.0, 0.5));
        let key = ChunkKey::new(1, 0, -1);
        let extent = layout.chunk_extent(key);
        assert_eq!(extent.min, Vec3::new(2.0, 0.0, -2.0));
        assert_eq!(extent.max, Vec3::new(4.0, 2.0, 0.0));

        let bounds = layout.chunk_bounds(key);
        assert_eq!(bounds.min, Vec3::new(2.0, -1.0, -2.5));
        assert_eq!(bounds.max, Vec3::new(4.0, 3.0, 0.5));
    }

    #[test]
    fn test_neighborhood() {
        let keys: Vec<_> = ChunkKey::new(0, 0, 0).neighborhood().collect();
        assert_eq!(keys.len(), 27);
        assert!(keys.contains(&ChunkKey::new(0, 0, 0)));
        assert!(keys.contains(&ChunkKey::new(-1, 1, -1)));
        assert!(!keys.contains(&ChunkKey::new(2, 0, 0)));
    }

    #[test]
    fn test_neighborhood_at_grid_limits() {
        let corner = ChunkKey::new(i32::MAX, i32::MIN, 0);
        let keys: Vec<_> = corner.neighborhood().collect();
        assert_eq!(keys.len(), 2 * 2 * 3);
        assert!(keys.contains(&corner));
        assert!(keys.contains(&ChunkKey::new(i32::MAX - 1, i32::MIN + 1, -1)));

        let mut deduped = keys.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(deduped.len(), keys.len());
    }

    #[test]
    fn test_far_coordinates_saturate() {
        let layout = ChunkLayout::new(Vec3::ONE, Vec3::ZERO);
        assert_eq!(layout.chunk_of(Vec3::new(3.0e9, -3.0e9, 0.0)), ChunkKey::new(i32::MAX, i32::MIN, 0));
    }
}
