//! Flat persisted form of a chunked point index.
//!
//! A hash map does not persist directly, so the index is stored as one
//! contiguous point array plus a table mapping each chunk to its slice.

use glam::Vec3;
use super::chunk::ChunkKey;

/// Which contiguous slice of `FlatPoints::points` belongs to a chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkSlice {
    pub key: ChunkKey,
    pub start: u32,
    pub count: u32,
}

impl ChunkSlice {
    pub fn new(key: ChunkKey, start: u32, count: u32) -> Self {
        Self { key, start, count }
    }

    /// Index range into the flat point array
    pub fn range(&self) -> std::ops::Range<usize> {
        let start = self.start as usize;
        start..start + self.count as usize
    }
}

/// Flat point array plus its chunk table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlatPoints {
    pub points: Vec<Vec3>,
    pub chunks: Vec<ChunkSlice>,
}

impl FlatPoints {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one chunk's points at the current running offset
    pub fn push_chunk(&mut self, key: ChunkKey, points: &[Vec3]) {
        let start = self.points.len() as u32;
        self.points.extend_from_slice(points);
        self.chunks.push(ChunkSlice::new(key, start, points.len() as u32));
    }

    /// Points belonging to a slice, `None` if the slice runs past the array
    pub fn slice(&self, chunk: &ChunkSlice) -> Option<&[Vec3]> {
        self.points.get(chunk.range())
    }

    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty() && self.chunks.is_empty()
    }

    pub fn clear(&mut self) {
        self.points.clear();
        self.chunks.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_chunk_offsets() {
        let mut flat = FlatPoints::new();
        flat.push_chunk(ChunkKey::new(0, 0, 0), &[Vec3::ZERO, Vec3::ONE]);
        flat.push_chunk(ChunkKey::new(1, 0, 0), &[Vec3::X]);

        assert_eq!(flat.point_count(), 3);
        assert_eq!(flat.chunks[0], ChunkSlice::new(ChunkKey::new(0, 0, 0), 0, 2));
        assert_eq!(flat.chunks[1], ChunkSlice::new(ChunkKey::new(1, 0, 0), 2, 1));
        assert_eq!(flat.slice(&flat.chunks[1]), Some(&[Vec3::X][..]));
    }

    #[test]
    fn test_slice_past_end() {
        let mut flat = FlatPoints::new();
        flat.push_chunk(ChunkKey::new(0, 0, 0), &[Vec3::ZERO]);
        let bogus = ChunkSlice::new(ChunkKey::new(3, 3, 3), 0, 5);
        assert!(flat.slice(&bogus).is_none());
    }
}
