//! Grass field serialization and disk I/O
//!
//! File layout: `MAGIC`, little-endian `u32` version, then an LZ4 block
//! (size-prepended) holding the rkyv archive of [`FieldData`].

use std::path::Path;
use glam::Vec3;
use rkyv::{Archive, Deserialize, Serialize};

use crate::core::{Error, Result};
use crate::grass::chunk::{ChunkKey, ChunkLayout};
use crate::grass::flat::{ChunkSlice, FlatPoints};

const MAGIC: &[u8; 4] = b"VRDG";
const VERSION: u32 = 1;
const HEADER_LEN: usize = 8;

/// File extension for grass field files
pub const FIELD_FILE_EXTENSION: &str = "vgf";

/// Serializable chunk slice
#[derive(Debug, Clone, PartialEq, Archive, Deserialize, Serialize)]
pub struct ChunkSliceData {
    pub x: i32,
    pub y: i32,
    pub z: i32,
    pub start: u32,
    pub count: u32,
}

/// Serializable grass field: chunk layout plus the flat point form
#[derive(Debug, Clone, PartialEq, Archive, Deserialize, Serialize)]
pub struct FieldData {
    pub chunk_size: [f32; 3],
    pub chunk_padding: [f32; 3],
    pub points: Vec<[f32; 3]>,
    pub chunks: Vec<ChunkSliceData>,
}

impl FieldData {
    /// Capture a layout and its saved flat form
    pub fn from_flat(layout: &ChunkLayout, flat: &FlatPoints) -> Self {
        Self {
            chunk_size: layout.size().to_array(),
            chunk_padding: layout.padding().to_array(),
            points: flat.points.iter().map(|p| p.to_array()).collect(),
            chunks: flat
                .chunks
                .iter()
                .map(|c| ChunkSliceData {
                    x: c.key.x,
                    y: c.key.y,
                    z: c.key.z,
                    start: c.start,
                    count: c.count,
                })
                .collect(),
        }
    }

    pub fn layout(&self) -> ChunkLayout {
        ChunkLayout::new(Vec3::from_array(self.chunk_size), Vec3::from_array(self.chunk_padding))
    }

    pub fn to_flat(&self) -> FlatPoints {
        FlatPoints {
            points: self.points.iter().map(|p| Vec3::from_array(*p)).collect(),
            chunks: self
                .chunks
                .iter()
                .map(|c| ChunkSlice::new(ChunkKey::new(c.x, c.y, c.z), c.start, c.count))
                .collect(),
        }
    }
}

/// Serialize field data to bytes (uncompressed)
pub fn serialize_field(data: &FieldData) -> Result<Vec<u8>> {
    let bytes = rkyv::to_bytes::<rkyv::rancor::Error>(data)
        .map_err(|e| Error::Serialization(e.to_string()))?;
    Ok(bytes.to_vec())
}

/// Deserialize field data from bytes (uncompressed)
pub fn deserialize_field(data: &[u8]) -> Result<FieldData> {
    // rkyv needs an aligned buffer; slices cut from a file read are not
    let mut aligned = rkyv::util::AlignedVec::<16>::with_capacity(data.len());
    aligned.extend_from_slice(data);

    let archived = rkyv::access::<ArchivedFieldData, rkyv::rancor::Error>(&aligned[..])
        .map_err(|e| Error::Format(e.to_string()))?;

    rkyv::deserialize::<FieldData, rkyv::rancor::Error>(archived)
        .map_err(|e| Error::Format(e.to_string()))
}

/// Encode a field as a complete file image (header + LZ4 payload)
pub fn encode_field(data: &FieldData) -> Result<Vec<u8>> {
    let serialized = serialize_field(data)?;
    let compressed = lz4_flex::compress_prepend_size(&serialized);

    let mut out = Vec::with_capacity(HEADER_LEN + compressed.len());
    out.extend_from_slice(MAGIC);
    out.extend_from_slice(&VERSION.to_le_bytes());
    out.extend_from_slice(&compressed);
    Ok(out)
}

/// Decode a file image produced by [`encode_field`]
pub fn decode_field(bytes: &[u8]) -> Result<FieldData> {
    if bytes.len() < HEADER_LEN {
        return Err(Error::Format("File too short for header".into()));
    }
    if &bytes[0..4] != MAGIC {
        return Err(Error::Format("Invalid magic bytes".into()));
    }

    let mut version_bytes = [0u8; 4];
    version_bytes.copy_from_slice(&bytes[4..8]);
    let version = u32::from_le_bytes(version_bytes);
    if version != VERSION {
        return Err(Error::Format(format!("Unsupported version: {}", version)));
    }

    let decompressed = lz4_flex::decompress_size_prepended(&bytes[HEADER_LEN..])
        .map_err(|e| Error::Format(format!("LZ4 decompression failed: {}", e)))?;
    deserialize_field(&decompressed)
}

/// Save a field to disk, creating parent directories
pub fn save_field(path: &Path, data: &FieldData) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, encode_field(data)?)?;
    Ok(())
}

/// Load a field from disk (if it exists)
pub fn load_field(path: &Path) -> Result<Option<FieldData>> {
    if !path.exists() {
        return Ok(None);
    }
    let bytes = std::fs::read(path)?;
    Ok(Some(decode_field(&bytes)?))
}
