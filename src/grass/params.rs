//! GPU-ready grass uniforms (wind, interactor bending, billboarding).

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

/// Maximum interactors uploaded per frame
pub const MAX_INTERACTORS: usize = 8;

/// GPU uniform for the grass shader. Must match `GrassParams` in grass.wgsl.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct GrassParams {
    pub wind_direction: [f32; 3],
    pub wind_strength: f32,
    // -- 16 bytes --
    pub wind_frequency: f32,
    pub time: f32,
    pub billboard: u32,
    pub interactor_count: u32,
    // -- 16 bytes --
    // Total: 32 bytes
}

/// GPU form of an interactor. Must match `GrassInteractor` in grass.wgsl.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct GpuInteractor {
    pub position: [f32; 3],
    pub radius: f32,
    // -- 16 bytes --
    pub strength: f32,
    pub _pad: [f32; 3],
    // -- 16 bytes --
}

/// Something that bends nearby grass away from itself (player, projectile).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interactor {
    pub position: Vec3,
    /// Bend falloff radius in meters
    pub radius: f32,
    /// Bend strength in [0, 1]
    pub strength: f32,
}

impl Interactor {
    pub fn new(position: Vec3, radius: f32, strength: f32) -> Self {
        Self { position, radius, strength }
    }

    pub fn to_gpu(&self) -> GpuInteractor {
        GpuInteractor {
            position: self.position.to_array(),
            radius: self.radius.max(0.0),
            strength: self.strength.clamp(0.0, 1.0),
            _pad: [0.0; 3],
        }
    }
}

/// Pack interactors into a fixed-size upload array, nearest to `focus` first.
///
/// Returns the array and the number of live entries.
pub fn pack_interactors(interactors: &[Interactor], focus: Vec3) -> ([GpuInteractor; MAX_INTERACTORS], u32) {
    let mut sorted: Vec<&Interactor> = interactors.iter().collect();
    sorted.sort_by(|a, b| {
        a.position.distance_squared(focus).total_cmp(&b.position.distance_squared(focus))
    });

    let mut out = [GpuInteractor::zeroed(); MAX_INTERACTORS];
    let count = sorted.len().min(MAX_INTERACTORS);
    for (slot, interactor) in out.iter_mut().zip(sorted.iter()) {
        *slot = interactor.to_gpu();
    }
    (out, count as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grass_params_size() {
        assert_eq!(std::mem::size_of::<GrassParams>(), 32);
        assert_eq!(std::mem::size_of::<GrassParams>() % 16, 0);
    }

    #[test]
    fn test_interactor_size() {
        assert_eq!(std::mem::size_of::<GpuInteractor>(), 32);
    }

    #[test]
    fn test_bytemuck_cast() {
        let p = GrassParams::zeroed();
        let bytes = bytemuck::bytes_of(&p);
        assert_eq!(bytes.len(), 32);
    }

    #[test]
    fn test_pack_nearest_first() {
        let interactors: Vec<Interactor> = (0..12)
            .map(|i| Interactor::new(Vec3::new(i as f32, 0.0, 0.0), 1.0, 2.0))
            .rev()
            .collect();
        let (packed, count) = pack_interactors(&interactors, Vec3::ZERO);

        assert_eq!(count, MAX_INTERACTORS as u32);
        assert_eq!(packed[0].position, [0.0, 0.0, 0.0]);
        assert_eq!(packed[7].position, [7.0, 0.0, 0.0]);
        assert_eq!(packed[0].strength, 1.0);
    }

    #[test]
    fn test_pack_fewer_than_max() {
        let (packed, count) = pack_interactors(&[Interactor::new(Vec3::ONE, 2.0, 0.5)], Vec3::ZERO);
        assert_eq!(count, 1);
        assert_eq!(packed[1], GpuInteractor::zeroed());
    }
}
