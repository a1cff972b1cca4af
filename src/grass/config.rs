//! Grass configuration (user-facing settings, JSON on disk).

use std::path::Path;
use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::core::Result;
use super::chunk::ChunkLayout;

/// Brush defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrushConfig {
    /// Brush radius in meters.
    pub radius: f32,
    /// Minimum distance between painted points.
    pub spacing: f32,
    /// Disc sampling attempts per active point.
    pub attempts: u32,
    /// Seed for point placement.
    pub seed: u64,
}

impl Default for BrushConfig {
    fn default() -> Self {
        Self {
            radius: 1.0,
            spacing: 0.25,
            attempts: 30,
            seed: 0,
        }
    }
}

/// Wind settings fed to the shader
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindConfig {
    pub direction: [f32; 3],
    pub strength: f32,
    /// Sway cycles per second.
    pub frequency: f32,
}

impl Default for WindConfig {
    fn default() -> Self {
        Self {
            direction: [1.0, 0.0, 0.0],
            strength: 0.3,
            frequency: 1.5,
        }
    }
}

/// User-facing grass configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrassConfig {
    /// Chunk extent per axis; values below 1m are clamped.
    pub chunk_size: [f32; 3],
    /// Extra margin added to chunk bounds for culling (blade height, sway).
    pub chunk_padding: [f32; 3],
    pub brush: BrushConfig,
    pub wind: WindConfig,
    /// Render blades as camera-facing billboards.
    pub billboard: bool,
    /// Per-instance scale range.
    pub min_scale: f32,
    pub max_scale: f32,
}

impl Default for GrassConfig {
    fn default() -> Self {
        Self {
            chunk_size: [16.0, 16.0, 16.0],
            chunk_padding: [0.0, 1.0, 0.0],
            brush: BrushConfig::default(),
            wind: WindConfig::default(),
            billboard: false,
            min_scale: 0.8,
            max_scale: 1.2,
        }
    }
}

impl GrassConfig {
    /// Chunk layout with sizes clamped to the minimum
    pub fn layout(&self) -> ChunkLayout {
        ChunkLayout::new(Vec3::from_array(self.chunk_size), Vec3::from_array(self.chunk_padding))
    }

    /// Parse from JSON; missing fields take defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load_sync(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn save_sync(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let cfg = GrassConfig::default();
        assert!(cfg.max_scale >= cfg.min_scale);
        assert_eq!(cfg.layout().size(), Vec3::splat(16.0));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let cfg = GrassConfig::from_json_str(r#"{ "chunk_size": [8, 4, 8], "brush": { "radius": 2.5 } }"#).unwrap();
        assert_eq!(cfg.chunk_size, [8.0, 4.0, 8.0]);
        assert_eq!(cfg.brush.radius, 2.5);
        assert_eq!(cfg.brush.spacing, BrushConfig::default().spacing);
        assert_eq!(cfg.wind, WindConfig::default());
    }

    #[test]
    fn test_layout_clamps() {
        let cfg = GrassConfig { chunk_size: [0.0, 0.5, 3.0], ..Default::default() };
        assert_eq!(cfg.layout().size(), Vec3::new(1.0, 1.0, 3.0));
    }

    #[test]
    fn test_bad_json_is_config_error() {
        let err = GrassConfig::from_json_str("{ chunk_size: ").unwrap_err();
        assert!(matches!(err, crate::core::Error::Config(_)));
    }

    #[test]
    fn test_save_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grass.json");
        let mut cfg = GrassConfig::default();
        cfg.billboard = true;
        cfg.save_sync(&path).unwrap();
        assert_eq!(GrassConfig::load_sync(&path).unwrap(), cfg);
    }
}
