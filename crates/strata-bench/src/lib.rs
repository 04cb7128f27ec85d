//! Benchmark profiles and utilities for Strata containers.
//!
//! Provides a particle workload stored both ways, so benchmarks can compare
//! the struct-of-arrays layout against a plain `Vec` of structs:
//!
//! - [`soa_profile`]: `n` particles in a [`SoaVec`]
//! - [`aos_profile`]: the same particles in a `Vec<Particle>`
//! - [`init_particles`]: deterministic particle generation via seed

#![deny(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use strata_arena::SoaVec;

strata_arena::soa_record! {
    /// A point mass. Hot fields (`pos`, `vel`) are touched every step;
    /// `mass` and `id` only by bookkeeping passes.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct Particle {
        pub pos: [f32; 3],
        pub vel: [f32; 3],
        pub mass: f32,
        pub id: u32,
    }
}

/// Generate `n` deterministic particles from `seed`.
pub fn init_particles(n: usize, seed: u64) -> impl Iterator<Item = Particle> {
    let mut state = seed;
    (0..n).map(move |i| {
        let mut next = || {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            ((state >> 40) as f32) / (1u64 << 24) as f32
        };
        Particle {
            pos: [next(), next(), next()],
            vel: [next() - 0.5, next() - 0.5, next() - 0.5],
            mass: 1.0 + next(),
            id: i as u32,
        }
    })
}

/// `n` particles stored column-wise.
pub fn soa_profile(n: usize, seed: u64) -> SoaVec<Particle> {
    let mut vec = SoaVec::with_capacity(n);
    vec.extend(init_particles(n, seed));
    vec
}

/// `n` particles stored as structs.
pub fn aos_profile(n: usize, seed: u64) -> Vec<Particle> {
    init_particles(n, seed).collect()
}

/// Advance positions by `vel * dt`, touching only the hot columns.
pub fn integrate_soa(particles: &mut SoaVec<Particle>, dt: f32) {
    let ParticleColumnsMut { mut pos, vel, .. } = particles.columns_mut();
    for (p, v) in pos.iter_mut().zip(vel.iter()) {
        for k in 0..3 {
            p[k] += v[k] * dt;
        }
    }
}

/// Advance positions by `vel * dt` over the struct layout.
pub fn integrate_aos(particles: &mut [Particle], dt: f32) {
    for particle in particles {
        for k in 0..3 {
            particle.pos[k] += particle.vel[k] * dt;
        }
    }
}

/// Sum of every particle's mass, reading one column.
pub fn total_mass_soa(particles: &SoaVec<Particle>) -> f32 {
    particles.field::<2>().iter().sum()
}

/// Sum of every particle's mass over the struct layout.
pub fn total_mass_aos(particles: &[Particle]) -> f32 {
    particles.iter().map(|p| p.mass).sum()
}
