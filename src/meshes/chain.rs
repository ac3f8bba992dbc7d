// src/meshes/chain.rs
use crate::math::Vec3;
use crate::particles::MeshParticle;

/// A 1-D spring chain: particles `0..n`, a spring between consecutive
/// particles, rest lengths recorded at build time (spec.md §4.5).
pub struct SpringChain {
    pub particles: Vec<MeshParticle>,
    rest_lengths: Vec<f32>,
    pub k_elastic: f32,
    pub k_damping: f32,
    /// Collision attributes applied when a chain particle hits static
    /// geometry (spec.md §4.5's "meshes are time-stepped as free
    /// particles", grounded in `sim_meshes.cpp`'s `coll_pred.bouncing =
    /// m->get_bouncing()`).
    pub bounce: f32,
    pub friction: f32,
}

impl SpringChain {
    pub fn new(positions: &[Vec3], mass: f32, k_elastic: f32, k_damping: f32) -> Self {
        let particles: Vec<MeshParticle> = positions.iter().map(|&p| MeshParticle::new(p, mass)).collect();
        let rest_lengths = positions.windows(2).map(|w| (w[1] - w[0]).length()).collect();
        Self {
            particles,
            rest_lengths,
            k_elastic,
            k_damping,
            bounce: 0.3,
            friction: 0.1,
        }
    }

    pub fn pin(&mut self, index: usize) {
        self.particles[index].fixed = true;
    }

    /// Accumulates the Hookean + damped spring force into each endpoint's
    /// `base.force` (spec.md §4.5). Does not zero forces first; the caller
    /// (stepper) is responsible for that per the shared per-step pipeline.
    pub fn accumulate_forces(&mut self) {
        for i in 0..self.rest_lengths.len() {
            let (pi, pj) = (self.particles[i].base, self.particles[i + 1].base);
            let d = pj.cur_pos - pi.cur_pos;
            let len = d.length();
            if len < 1e-9 {
                continue;
            }
            let u_hat = d / len;
            let dv = pj.cur_vel - pi.cur_vel;
            let force = (self.k_elastic * (len - self.rest_lengths[i]) + self.k_damping * dv.dot(u_hat)) * u_hat;
            self.particles[i].base.force += force;
            self.particles[i + 1].base.force -= force;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rest_elongation_spring_pulls_inward() {
        let positions = [Vec3::new(0.0, 0.0, 0.0), Vec3::new(2.0, 0.0, 0.0)];
        let mut chain = SpringChain::new(&positions, 1.0, 10.0, 0.0);
        // Stretch beyond rest length.
        chain.particles[1].base.cur_pos = Vec3::new(3.0, 0.0, 0.0);
        chain.accumulate_forces();
        assert!(chain.particles[0].base.force.x > 0.0);
        assert!(chain.particles[1].base.force.x < 0.0);
    }

    #[test]
    fn spring_force_is_antisymmetric() {
        let positions = [Vec3::new(0.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0), Vec3::new(2.0, 0.0, 0.0)];
        let mut chain = SpringChain::new(&positions, 1.0, 5.0, 0.2);
        chain.particles[1].base.cur_pos = Vec3::new(1.3, 0.0, 0.0);
        chain.particles[2].base.cur_pos = Vec3::new(2.5, 0.0, 0.0);
        chain.accumulate_forces();
        let total: Vec3 = chain.particles.iter().map(|p| p.base.force).sum();
        assert!(total.length() < 1e-4);
    }
}
