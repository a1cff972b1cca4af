//! Poisson-disc sampling for placing new grass points.
//!
//! Candidates are spawned in an annulus around already accepted points on the
//! XZ plane, lifted onto the ground through a [`GroundProbe`], and rejected if
//! they land too close to anything already there.

use glam::Vec3;

/// Ground height lookup used to lift sampled candidates onto a surface.
pub trait GroundProbe {
    /// Surface height at world XZ, `None` where there is no ground.
    fn height_at(&self, x: f32, z: f32) -> Option<f32>;
}

/// Infinite horizontal ground at a fixed height
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlatGround(pub f32);

impl GroundProbe for FlatGround {
    fn height_at(&self, _x: f32, _z: f32) -> Option<f32> {
        Some(self.0)
    }
}

impl<F> GroundProbe for F
where
    F: Fn(f32, f32) -> Option<f32>,
{
    fn height_at(&self, x: f32, z: f32) -> Option<f32> {
        self(x, z)
    }
}

/// Simple deterministic RNG using hash function
#[derive(Debug, Clone)]
pub struct SampleRng {
    state: u64,
}

impl SampleRng {
    pub fn new(seed: u64) -> Self {
        Self { state: seed.wrapping_add(1) }
    }

    /// Advance state and return next u32
    pub fn next_u32(&mut self) -> u32 {
        // PCG-like state update
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        let mut h = (self.state >> 32) as u32;
        h = h.wrapping_mul(0x45d9f3b);
        h ^= h >> 16;
        h = h.wrapping_mul(0x45d9f3b);
        h ^= h >> 16;
        h
    }

    /// Generate f32 in range [0, 1)
    pub fn next_float(&mut self) -> f32 {
        // 24 bits keeps the result strictly below 1.0
        (self.next_u32() >> 8) as f32 / (1u32 << 24) as f32
    }

    /// Generate f32 in range [min, max)
    pub fn range(&mut self, min: f32, max: f32) -> f32 {
        min + self.next_float() * (max - min)
    }
}

/// Poisson-disc sampler with a minimum spacing between points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiscSampler {
    /// Minimum distance between any two points
    pub spacing: f32,
    /// Candidates tried around each active point before it retires
    pub attempts: u32,
}

impl DiscSampler {
    pub fn new(spacing: f32, attempts: u32) -> Self {
        Self { spacing, attempts }
    }

    /// Sample new points within `radius` (XZ) of `center`.
    ///
    /// `nearby` holds existing points that candidates must keep `spacing`
    /// away from. The center is accepted first if it is clear of `nearby`;
    /// either way every candidate also keeps `spacing` from the center.
    pub fn sample_around<G: GroundProbe + ?Sized>(
        &self,
        center: Vec3,
        radius: f32,
        nearby: &[Vec3],
        ground: &G,
        rng: &mut SampleRng,
    ) -> Vec<Vec3> {
        let mut accepted: Vec<Vec3> = Vec::new();
        if !(self.spacing > 0.0) || !(radius >= 0.0) || !radius.is_finite() {
            return accepted;
        }

        let clear_of = |p: Vec3, others: &[Vec3]| {
            others.iter().all(|q| q.distance(p) >= self.spacing)
        };

        if clear_of(center, nearby) {
            accepted.push(center);
        }

        // Spawn points; the center seeds the search even when rejected
        let mut active = vec![center];
        while let Some(&origin) = active.last() {
            let mut spawned = false;

            for _ in 0..self.attempts {
                let angle = rng.range(0.0, std::f32::consts::TAU);
                let dist = rng.range(self.spacing, self.spacing * 2.0);
                let x = origin.x + angle.cos() * dist;
                let z = origin.z + angle.sin() * dist;

                let dx = x - center.x;
                let dz = z - center.z;
                if dx * dx + dz * dz > radius * radius {
                    continue;
                }

                let Some(y) = ground.height_at(x, z) else {
                    continue;
                };
                let candidate = Vec3::new(x, y, z);

                if candidate.distance(center) < self.spacing
                    || !clear_of(candidate, nearby)
                    || !clear_of(candidate, &accepted)
                {
                    continue;
                }

                accepted.push(candidate);
                active.push(candidate);
                spawned = true;
                break;
            }

            if !spawned {
                active.pop();
            }
        }

        accepted
    }
}

impl Default for DiscSampler {
    fn default() -> Self {
        Self { spacing: 0.25, attempts: 30 }
    }
}
