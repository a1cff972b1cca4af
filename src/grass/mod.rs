//! Instanced grass placement.
//!
//! Grass points live in a [`ChunkedPointIndex`]; brush strokes add and remove
//! points, visibility queries pick the chunks the cameras can see, and the
//! result is staged as [`GrassInstance`] records for the host renderer.

pub mod brush;
pub mod chunk;
pub mod config;
pub mod flat;
pub mod index;
pub mod instances;
pub mod params;
pub mod sampling;
pub mod view;

pub use brush::{BrushMode, GrassBrush, StrokeOutcome};
pub use chunk::{ChunkKey, ChunkLayout};
pub use config::{BrushConfig, GrassConfig, WindConfig};
pub use flat::{ChunkSlice, FlatPoints};
pub use index::ChunkedPointIndex;
pub use instances::{GrassInstance, InstanceStaging};
pub use params::{GpuInteractor, GrassParams, Interactor, MAX_INTERACTORS};
pub use sampling::{DiscSampler, FlatGround, GroundProbe, SampleRng};
pub use view::{CameraId, ViewSet};

use std::path::Path;
use glam::Vec3;

use crate::core::Result;
use crate::storage::disk_io::{self, FieldData};

/// A grass field: config, point index, brush and instance staging.
pub struct GrassField {
    config: GrassConfig,
    index: ChunkedPointIndex,
    brush: GrassBrush,
    staging: InstanceStaging,
    interactors: Vec<Interactor>,
}

fn brush_from_config(cfg: &BrushConfig) -> GrassBrush {
    let mut brush = GrassBrush::new(cfg.radius, cfg.spacing, cfg.seed);
    brush.attempts = cfg.attempts;
    brush
}

impl GrassField {
    /// Empty field
    pub fn new(config: GrassConfig) -> Self {
        let index = ChunkedPointIndex::new(config.layout());
        Self::with_index(config, index)
    }

    fn with_index(config: GrassConfig, index: ChunkedPointIndex) -> Self {
        Self {
            brush: brush_from_config(&config.brush),
            staging: InstanceStaging::new(config.min_scale, config.max_scale),
            index,
            config,
            interactors: Vec::new(),
        }
    }

    /// Field restored from persisted data, then brought in line with `config`
    pub fn from_field_data(config: GrassConfig, data: &FieldData) -> Self {
        let index = ChunkedPointIndex::from_flat(data.layout(), data.to_flat());
        let mut field = Self::with_index(config.clone(), index);
        field.apply_config(config);
        field
    }

    pub fn config(&self) -> &GrassConfig {
        &self.config
    }

    pub fn index(&self) -> &ChunkedPointIndex {
        &self.index
    }

    pub fn index_mut(&mut self) -> &mut ChunkedPointIndex {
        &mut self.index
    }

    pub fn brush(&self) -> &GrassBrush {
        &self.brush
    }

    pub fn brush_mut(&mut self) -> &mut GrassBrush {
        &mut self.brush
    }

    /// Re-validate settings. Returns `true` if the chunk size changed and the
    /// index was rebuilt.
    pub fn apply_config(&mut self, config: GrassConfig) -> bool {
        let layout = config.layout();
        let rebuilt = self.index.rebuild(layout.size());
        if layout.padding() != self.index.layout().padding() {
            self.index.set_padding(layout.padding());
        }

        if config.brush != self.config.brush {
            let mode = self.brush.mode;
            self.brush = brush_from_config(&config.brush).with_mode(mode);
        }

        if config.min_scale != self.staging.min_scale || config.max_scale != self.staging.max_scale {
            self.staging = InstanceStaging::new(config.min_scale, config.max_scale);
        }

        self.config = config;
        rebuilt
    }

    /// Apply the brush at `center` and persist the flat form if anything changed
    pub fn stroke<G: GroundProbe + ?Sized>(&mut self, center: Vec3, ground: &G) -> StrokeOutcome {
        let outcome = self.brush.apply(&mut self.index, center, ground);
        if outcome.changed() {
            self.index.save();
        }
        outcome
    }

    /// Instances seen by `views`, `None` when nothing is visible
    pub fn visible_instances(&mut self, views: &ViewSet) -> Option<&[GrassInstance]> {
        if self.staging.refresh_visible(&self.index, views) {
            Some(self.staging.instances())
        } else {
            None
        }
    }

    /// Every instance, rebuilt only when the index changed
    pub fn all_instances(&mut self) -> &[GrassInstance] {
        if self.staging.is_stale(&self.index) {
            self.staging.refresh_all(&self.index);
        }
        self.staging.instances()
    }

    pub fn set_interactors(&mut self, interactors: Vec<Interactor>) {
        self.interactors = interactors;
    }

    pub fn interactors(&self) -> &[Interactor] {
        &self.interactors
    }

    /// Shader uniform plus the interactor array, nearest to `focus` first
    pub fn build_params(&self, time: f32, focus: Vec3) -> (GrassParams, [GpuInteractor; MAX_INTERACTORS]) {
        let (interactors, count) = params::pack_interactors(&self.interactors, focus);
        let direction = Vec3::from_array(self.config.wind.direction).normalize_or_zero();
        let params = GrassParams {
            wind_direction: direction.to_array(),
            wind_strength: self.config.wind.strength,
            wind_frequency: self.config.wind.frequency,
            time,
            billboard: u32::from(self.config.billboard),
            interactor_count: count,
        };
        (params, interactors)
    }

    /// Snapshot for persistence; saves the index first if the flat form is stale
    pub fn to_field_data(&mut self) -> FieldData {
        if self.index.is_save_stale() {
            self.index.save();
        }
        FieldData::from_flat(self.index.layout(), self.index.flat())
    }

    pub fn save_to_file(&mut self, path: &Path) -> Result<()> {
        let data = self.to_field_data();
        disk_io::save_field(path, &data)?;
        log::info!(
            "Saved grass field to {}: {} points in {} chunks",
            path.display(), data.points.len(), data.chunks.len()
        );
        Ok(())
    }

    /// Load a field; a missing file yields an empty field
    pub fn load_from_file(path: &Path, config: GrassConfig) -> Result<Self> {
        match disk_io::load_field(path)? {
            Some(data) => {
                let field = Self::from_field_data(config, &data);
                log::info!(
                    "Loaded grass field from {}: {} points in {} chunks",
                    path.display(), field.index.point_count(), field.index.chunk_count()
                );
                Ok(field)
            }
            None => {
                log::info!("No grass field at {}, starting empty", path.display());
                Ok(Self::new(config))
            }
        }
    }
}

impl Default for GrassField {
    fn default() -> Self {
        Self::new(GrassConfig::default())
    }
}
