//! Grass brush: paint and erase strokes against a point index.

use glam::Vec3;

use super::index::ChunkedPointIndex;
use super::sampling::{DiscSampler, GroundProbe, SampleRng};

/// What a stroke does to the grass under the brush
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BrushMode {
    #[default]
    Paint,  // Scatter new points with disc sampling
    Erase,  // Remove points inside the brush radius
}

/// Result of applying one stroke
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StrokeOutcome {
    pub added: usize,
    pub removed: usize,
}

impl StrokeOutcome {
    /// True when the stroke changed the index
    pub fn changed(&self) -> bool {
        self.added > 0 || self.removed > 0
    }
}

/// Brush settings plus the RNG driving point placement.
///
/// Every paint stroke advances the RNG, so consecutive dabs at the same spot
/// differ while a session replayed from the same seed is identical.
#[derive(Debug, Clone)]
pub struct GrassBrush {
    pub mode: BrushMode,
    /// Brush radius in meters
    pub radius: f32,
    /// Minimum distance between painted points
    pub spacing: f32,
    /// Disc sampling attempts per active point
    pub attempts: u32,
    rng: SampleRng,
}

impl GrassBrush {
    pub fn new(radius: f32, spacing: f32, seed: u64) -> Self {
        Self {
            mode: BrushMode::Paint,
            radius,
            spacing,
            attempts: DiscSampler::default().attempts,
            rng: SampleRng::new(seed),
        }
    }

    /// Builder-style mode selection
    pub fn with_mode(mut self, mode: BrushMode) -> Self {
        self.mode = mode;
        self
    }

    /// Restart the placement sequence
    pub fn reseed(&mut self, seed: u64) {
        self.rng = SampleRng::new(seed);
    }

    /// Apply one stroke centered on `center`.
    ///
    /// Neighborhood queries cover the 3x3x3 chunks around `center`, so a
    /// radius above the smallest chunk axis can miss points; this is logged.
    pub fn apply<G: GroundProbe + ?Sized>(
        &mut self,
        index: &mut ChunkedPointIndex,
        center: Vec3,
        ground: &G,
    ) -> StrokeOutcome {
        let min_axis = index.layout().size().min_element();
        if self.radius > min_axis {
            log::warn!(
                "Brush radius {} exceeds chunk size {}; points beyond adjacent chunks are not reached",
                self.radius, min_axis
            );
        }

        let outcome = match self.mode {
            BrushMode::Paint => {
                let nearby = index.points_near(center);
                let sampler = DiscSampler::new(self.spacing, self.attempts);
                let points = sampler.sample_around(center, self.radius, &nearby, ground, &mut self.rng);
                let added = points.len();
                index.insert_many(points);
                StrokeOutcome { added, removed: 0 }
            }
            BrushMode::Erase => StrokeOutcome {
                added: 0,
                removed: index.remove_near(center, self.radius),
            },
        };

        log::debug!(
            "{:?} stroke at {:?}: +{} -{} ({} points total)",
            self.mode, center, outcome.added, outcome.removed, index.point_count()
        );
        outcome
    }
}

impl Default for GrassBrush {
    fn default() -> Self {
        Self::new(1.0, 0.25, 0)
    }
}
