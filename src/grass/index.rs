//! Chunked point index - sparse grid of grass instance points.
//!
//! Points are bucketed into fixed-size axis-aligned chunks so brush strokes
//! and culling only ever touch the handful of chunks around them. Every
//! neighborhood query covers the 3x3x3 block of chunks around the query
//! point, so callers should keep query radii at or below the chunk size.

use std::collections::HashMap;
use glam::Vec3;

use crate::math::{Aabb, Frustum};
use super::chunk::{ChunkKey, ChunkLayout};
use super::flat::FlatPoints;

/// Sparse grid of grass points keyed by chunk.
///
/// A chunk key is present only while it holds at least one point.
#[derive(Debug, Clone, Default)]
pub struct ChunkedPointIndex {
    layout: ChunkLayout,
    chunks: HashMap<ChunkKey, Vec<Vec3>>,
    /// Last saved flat form
    saved: FlatPoints,
    /// Union of chunk bounds as of the last save/load
    total_bounds: Aabb,
    point_count: usize,
    /// Bumped on every mutation
    revision: u64,
}

impl ChunkedPointIndex {
    /// Create an empty index
    pub fn new(layout: ChunkLayout) -> Self {
        Self {
            layout,
            chunks: HashMap::new(),
            saved: FlatPoints::new(),
            total_bounds: Aabb::default(),
            point_count: 0,
            revision: 0,
        }
    }

    /// Create an empty index with the given chunk size and no padding
    pub fn with_chunk_size(size: Vec3) -> Self {
        Self::new(ChunkLayout::new(size, Vec3::ZERO))
    }

    /// Create an index from a persisted flat form
    pub fn from_flat(layout: ChunkLayout, flat: FlatPoints) -> Self {
        let mut index = Self::new(layout);
        index.load(flat);
        index
    }

    pub fn layout(&self) -> &ChunkLayout {
        &self.layout
    }

    /// Chunk containing `p`
    pub fn chunk_of(&self, p: Vec3) -> ChunkKey {
        self.layout.chunk_of(p)
    }

    /// Padded bounds of a chunk
    pub fn chunk_bounds(&self, key: ChunkKey) -> Aabb {
        self.layout.chunk_bounds(key)
    }

    /// Points stored in one chunk
    pub fn chunk(&self, key: ChunkKey) -> Option<&[Vec3]> {
        self.chunks.get(&key).map(Vec::as_slice)
    }

    /// Iterate all chunks with their points
    pub fn chunks(&self) -> impl Iterator<Item = (ChunkKey, &[Vec3])> {
        self.chunks.iter().map(|(k, v)| (*k, v.as_slice()))
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    pub fn point_count(&self) -> usize {
        self.point_count
    }

    pub fn is_empty(&self) -> bool {
        self.point_count == 0
    }

    /// Mutation counter; derived buffers built at an older revision are stale
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Cached union of all chunk bounds, refreshed by `save` and `load`
    pub fn total_bounds(&self) -> Aabb {
        self.total_bounds
    }

    /// Last saved flat form
    pub fn flat(&self) -> &FlatPoints {
        &self.saved
    }

    /// Add one point
    pub fn insert(&mut self, p: Vec3) {
        let key = self.layout.chunk_of(p);
        self.chunks.entry(key).or_default().push(p);
        self.point_count += 1;
        self.revision += 1;
    }

    /// Add many points
    pub fn insert_many<I: IntoIterator<Item = Vec3>>(&mut self, points: I) {
        for p in points {
            self.insert(p);
        }
    }

    /// Remove every point strictly closer than `radius` to `center`.
    ///
    /// Searches the 27 chunks around `center`; emptied chunks are dropped.
    /// Returns the number of points removed.
    pub fn remove_near(&mut self, center: Vec3, radius: f32) -> usize {
        if self.chunks.is_empty() || !(radius > 0.0) {
            return 0;
        }

        let mut removed = 0;
        for key in self.layout.chunk_of(center).neighborhood() {
            let Some(points) = self.chunks.get_mut(&key) else {
                continue;
            };

            let before = points.len();
            // NaN distances are not inside the radius
            points.retain(|p| !(p.distance(center) < radius));
            removed += before - points.len();

            if points.is_empty() {
                self.chunks.remove(&key);
            }
        }

        if removed > 0 {
            self.point_count -= removed;
            self.revision += 1;
        }
        removed
    }

    /// All points in the 27 chunks around `p` (never a full scan)
    pub fn points_near(&self, p: Vec3) -> Vec<Vec3> {
        let mut out = Vec::new();
        for key in self.layout.chunk_of(p).neighborhood() {
            if let Some(points) = self.chunks.get(&key) {
                out.extend_from_slice(points);
            }
        }
        out
    }

    /// Every point in the index, in no particular order
    pub fn all_points(&self) -> Vec<Vec3> {
        let mut out = Vec::with_capacity(self.point_count);
        for points in self.chunks.values() {
            out.extend_from_slice(points);
        }
        out
    }

    /// Collect points of chunks seen by at least one frustum.
    ///
    /// The cached total bounds are tested first; when no frustum sees them the
    /// chunks are never visited. Returns `false` and leaves `out` untouched when
    /// nothing is visible. On `true`, `out` is replaced with the visible points
    /// (each chunk contributes once) and holds at least one point.
    pub fn visible_points(&self, frustums: &[Frustum], out: &mut Vec<Vec3>) -> bool {
        if self.chunks.is_empty() {
            return false;
        }

        let candidates: Vec<&Frustum> = frustums
            .iter()
            .filter(|f| f.intersects_aabb(&self.total_bounds))
            .collect();
        if candidates.is_empty() {
            return false;
        }

        let mut any = false;
        for (key, points) in &self.chunks {
            let bounds = self.layout.chunk_bounds(*key);
            if candidates.iter().any(|f| f.intersects_aabb(&bounds)) {
                if !any {
                    out.clear();
                    any = true;
                }
                out.extend_from_slice(points);
            }
        }
        any
    }

    /// Regroup every point under a new chunk size.
    ///
    /// No-op (returns `false`) when the clamped size equals the current one.
    /// Saves afterwards since the flat chunk table no longer matches.
    pub fn rebuild(&mut self, new_size: Vec3) -> bool {
        let new_size = ChunkLayout::clamp_size(new_size);
        if new_size == self.layout.size() {
            return false;
        }

        let points = self.all_points();
        self.layout = ChunkLayout::new(new_size, self.layout.padding());
        self.chunks.clear();
        self.point_count = 0;
        self.insert_many(points);
        self.save();

        log::info!(
            "Rebuilt grass index: {} points in {} chunks (chunk size {:?})",
            self.point_count, self.chunks.len(), new_size
        );
        true
    }

    /// Change chunk padding; refreshes the cached bounds
    pub fn set_padding(&mut self, padding: Vec3) {
        self.layout = self.layout.with_padding(padding);
        self.refresh_total_bounds();
    }

    /// Remove every point
    pub fn clear(&mut self) {
        self.chunks.clear();
        self.point_count = 0;
        self.revision += 1;
    }

    /// Write the live chunks into the flat form and refresh total bounds
    pub fn save(&mut self) {
        self.saved.clear();
        self.saved.points.reserve(self.point_count);
        for (key, points) in &self.chunks {
            self.saved.push_chunk(*key, points);
        }
        self.refresh_total_bounds();
    }

    /// Replace the live chunks with the contents of a flat form
    pub fn load(&mut self, flat: FlatPoints) {
        self.saved = flat;
        self.load_saved();
    }

    /// Rebuild the live chunks from the last saved flat form
    pub fn load_saved(&mut self) {
        self.chunks.clear();
        self.point_count = 0;

        for chunk in &self.saved.chunks {
            let Some(points) = self.saved.slice(chunk) else {
                log::warn!(
                    "Skipping chunk {:?}: slice {}..{} exceeds {} saved points",
                    chunk.key, chunk.start, chunk.start as u64 + chunk.count as u64,
                    self.saved.points.len()
                );
                continue;
            };
            if points.is_empty() {
                continue;
            }
            self.chunks.entry(chunk.key).or_default().extend_from_slice(points);
            self.point_count += points.len();
        }

        self.revision += 1;
        self.refresh_total_bounds();
    }

    /// True when the flat form no longer matches the live point count
    pub fn is_save_stale(&self) -> bool {
        self.saved.points.len() != self.point_count
    }

    fn refresh_total_bounds(&mut self) {
        self.total_bounds = self
            .chunks
            .keys()
            .map(|key| self.layout.chunk_bounds(*key))
            .reduce(|a, b| a.merged(&b))
            .unwrap_or_default();
    }
}
