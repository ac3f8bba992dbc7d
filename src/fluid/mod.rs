//! SPH-like Newtonian fluid simulator (spec.md §3, §4.6), grounded in
//! `fluids/fluid.hpp` and `fluids/newtonian.cpp` (original_source): density
//! and pressure are recomputed every step from a kernel-weighted
//! neighborhood found via the octree (C3), then a pressure + viscosity
//! acceleration is written back into each particle's force.

mod kernel;

use crate::math::Vec3;
use crate::octree::Octree;
use crate::particles::FluidParticle;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Owns `n` fluid particles plus the physical constants that parametrize
/// the kernels (spec.md §4.6 "State").
pub struct NewtonianFluid {
    pub particles: Vec<FluidParticle>,
    pub rest_density: f32,
    pub viscosity: f32,
    pub speed_of_sound: f32,
    pub kernel_radius: f32,
    pub volume: f32,
    particle_mass: f32,
}

impl NewtonianFluid {
    pub fn new(positions: &[Vec3], rest_density: f32, viscosity: f32, speed_of_sound: f32, kernel_radius: f32, volume: f32) -> Self {
        let n = positions.len().max(1);
        let particle_mass = rest_density * volume / n as f32;
        let particles = positions
            .iter()
            .map(|&p| FluidParticle::new(p, Vec3::ZERO, particle_mass))
            .collect();
        Self {
            particles,
            rest_density,
            viscosity,
            speed_of_sound,
            kernel_radius,
            volume,
            particle_mass,
        }
    }

    fn build_octree(&self) -> Octree {
        let positions: Vec<Vec3> = self.particles.iter().map(|p| p.base.cur_pos).collect();
        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);
        for p in &positions {
            min = min.min(*p);
            max = max.max(*p);
        }
        let pad = Vec3::splat(self.kernel_radius.max(1e-3));
        Octree::build_points(&positions, min - pad, max + pad, 8, 1e-4)
    }

    fn neighbors_of(&self, octree: &Octree, i: usize) -> Vec<(usize, f32)> {
        let pos_i = self.particles[i].base.cur_pos;
        octree
            .indices_in_sphere(pos_i, self.kernel_radius)
            .into_iter()
            .map(|j| j as usize)
            .map(|j| (j, (self.particles[j].base.cur_pos - pos_i).length_squared()))
            .collect()
    }

    /// Sequential density → pressure → acceleration pass (spec.md §4.6
    /// steps 1-6). Forces are zeroed first (step 8 of the previous call is
    /// folded into the start of this one).
    pub fn step_sequential(&mut self) {
        let octree = self.build_octree();
        let n = self.particles.len();
        let neighbor_lists: Vec<Vec<(usize, f32)>> = (0..n).map(|i| self.neighbors_of(&octree, i)).collect();

        for i in 0..n {
            self.particles[i].density = self.density_of(i, &neighbor_lists[i]);
        }
        for i in 0..n {
            self.particles[i].pressure =
                self.speed_of_sound * self.speed_of_sound * (self.particles[i].density - self.rest_density);
        }
        for i in 0..n {
            let accel = self.acceleration_of(i, &neighbor_lists[i]);
            self.particles[i].base.force = accel * self.particles[i].base.mass;
        }
    }

    /// Work-partitioned variant: splits the index range into `worker_count`
    /// contiguous chunks, identical math to `step_sequential` per chunk, so
    /// results match up to floating-point summation order (spec.md §4.6
    /// "Parallelism", §9 DESIGN NOTES "use a work-partition on index range,
    /// not a work-stealing queue").
    #[cfg(feature = "parallel")]
    pub fn step_parallel(&mut self, worker_count: usize) {
        let octree = self.build_octree();
        let n = self.particles.len();
        let neighbor_lists: Vec<Vec<(usize, f32)>> = (0..n).map(|i| self.neighbors_of(&octree, i)).collect();

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(worker_count.max(1))
            .build()
            .expect("failed to build fluid worker pool");

        let densities: Vec<f32> = pool.install(|| {
            (0..n).into_par_iter().map(|i| self.density_of(i, &neighbor_lists[i])).collect()
        });
        for i in 0..n {
            self.particles[i].density = densities[i];
        }

        for i in 0..n {
            self.particles[i].pressure =
                self.speed_of_sound * self.speed_of_sound * (self.particles[i].density - self.rest_density);
        }

        let accelerations: Vec<Vec3> = pool.install(|| {
            (0..n).into_par_iter().map(|i| self.acceleration_of(i, &neighbor_lists[i])).collect()
        });
        for i in 0..n {
            self.particles[i].base.force = accelerations[i] * self.particles[i].base.mass;
        }
    }

    fn density_of(&self, i: usize, neighbors: &[(usize, f32)]) -> f32 {
        let mut rho = self.particle_mass * kernel::poly6(0.0, self.kernel_radius);
        for &(j, r2) in neighbors {
            if j == i {
                continue;
            }
            rho += self.particles[j].base.mass * kernel::poly6(r2, self.kernel_radius);
        }
        rho
    }

    fn acceleration_of(&self, i: usize, neighbors: &[(usize, f32)]) -> Vec3 {
        let pi = &self.particles[i];
        let mut accel = Vec3::ZERO;
        for &(j, r2) in neighbors {
            if j == i {
                continue;
            }
            let pj = &self.particles[j];
            let r_ij = pi.base.cur_pos - pj.base.cur_pos;

            let p_ij = -pj.base.mass * (pi.pressure / (pi.density * pi.density) + pj.pressure / (pj.density * pj.density));
            accel += p_ij * kernel::spiky_gradient(r_ij, r2, self.kernel_radius);

            let v_ij = self.viscosity * pj.base.mass * (pj.base.cur_vel - pi.base.cur_vel) / (pi.density * pj.density);
            accel += v_ij * kernel::viscosity_laplacian(r2, self.kernel_radius);
        }
        accel
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_block(n_per_axis: usize, spacing: f32) -> Vec<Vec3> {
        let mut pts = Vec::new();
        for x in 0..n_per_axis {
            for y in 0..n_per_axis {
                for z in 0..n_per_axis {
                    pts.push(Vec3::new(x as f32, y as f32, z as f32) * spacing);
                }
            }
        }
        pts
    }

    #[test]
    fn density_is_positive_for_nonempty_neighborhood() {
        let positions = small_block(4, 0.02);
        let mut fluid = NewtonianFluid::new(&positions, 1000.0, 0.001, 1500.0, 0.05, 0.001);
        fluid.step_sequential();
        for p in &fluid.particles {
            assert!(p.density > 0.0);
        }
    }

    #[test]
    fn isolated_particle_has_density_from_self_kernel_only() {
        let positions = vec![Vec3::ZERO, Vec3::new(100.0, 100.0, 100.0)];
        let mut fluid = NewtonianFluid::new(&positions, 1000.0, 0.001, 1500.0, 0.05, 0.001);
        fluid.step_sequential();
        let expected = fluid.particle_mass * kernel::poly6(0.0, fluid.kernel_radius);
        assert!((fluid.particles[1].density - expected).abs() < 1e-6);
    }
}
