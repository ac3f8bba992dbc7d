// src/emitters/sources.rs
use super::Emitter;
use crate::math::Vec3;
use rand::Rng;

/// Samples positions on a `w×h` parallelogram spanned by `(u_hat, v_hat)`
/// from corner `s` (spec.md §4.7 "Rectangle source"). Velocity is left at
/// the emitter's default; callers wanting a velocity law should override
/// `vel` after construction.
pub struct RectangleSource;

impl RectangleSource {
    pub fn build(s: Vec3, u_hat: Vec3, v_hat: Vec3, w: f32, h: f32) -> Emitter {
        let mut e = Emitter::constant();
        e.pos = Box::new(move |_| {
            let mut rng = rand::thread_rng();
            let lambda: f32 = rng.gen_range(0.0..1.0);
            let mu: f32 = rng.gen_range(0.0..1.0);
            s + lambda * w * u_hat + mu * h * v_hat
        });
        e
    }
}

/// Cone-parametrized source (spec.md §4.7 "Hose"). Position is always the
/// apex `source`; velocity aims at a uniformly sampled point on the base
/// disc, giving speeds in `[h, √(h²+r²)]`.
pub struct Hose;

impl Hose {
    pub fn build(source: Vec3, u_hat: Vec3, r: f32, h: f32) -> Emitter {
        let base_center = source + h * u_hat;
        let (v_hat, w_hat) = orthonormal_basis(u_hat);

        let mut e = Emitter::constant();
        e.pos = Box::new(move |_| source);
        e.vel = Box::new(move |_| {
            let mut rng = rand::thread_rng();
            let u1: f32 = rng.gen_range(0.0..1.0);
            let u2: f32 = rng.gen_range(0.0..1.0);
            let rho = r * u1.sqrt();
            let theta = std::f32::consts::TAU * u2;
            let p = base_center + rho * (theta.cos() * v_hat + theta.sin() * w_hat);
            p - source
        });
        e
    }
}

fn orthonormal_basis(axis: Vec3) -> (Vec3, Vec3) {
    let helper = if axis.x.abs() < 0.9 { Vec3::X } else { Vec3::Y };
    let v = axis.cross(helper).normalize();
    let w = axis.cross(v).normalize();
    (v, w)
}

/// Partitions a population of `n` particles across `s` sub-emitters in
/// roughly equal chunks (spec.md §4.7 "Multisource"): chunk `k` owns
/// indices `[k·⌊n/s⌋, (k+1)·⌊n/s⌋)`, with the last chunk extended to `n`.
pub struct Multisource {
    sources: Vec<Emitter>,
    particle_count: usize,
}

impl Multisource {
    pub fn new(sources: Vec<Emitter>, particle_count: usize) -> Self {
        Self { sources, particle_count }
    }

    /// Builds a single `Emitter` whose per-attribute callables dispatch to
    /// the sub-emitter owning `index`'s chunk. `Emitter` isn't `Clone`
    /// (it holds trait-object closures), so this consumes `self` and the
    /// returned emitter owns the sub-emitters behind an `Arc`-free `Rc`-free
    /// plain `Vec` captured by the dispatch closures via a shared index.
    pub fn into_emitter(self) -> Emitter {
        use std::sync::Arc;
        let sources = Arc::new(self.sources);
        let particle_count = self.particle_count;

        macro_rules! dispatch {
            ($field:ident) => {{
                let sources = sources.clone();
                Box::new(move |i| {
                    let k = chunk_index(particle_count, sources.len(), i);
                    (sources[k].$field)(i)
                })
            }};
        }

        Emitter {
            pos: dispatch!(pos),
            vel: dispatch!(vel),
            mass: dispatch!(mass),
            charge: dispatch!(charge),
            friction: dispatch!(friction),
            bounce: dispatch!(bounce),
            lifetime: dispatch!(lifetime),
            starttime: dispatch!(starttime),
            fixed: dispatch!(fixed),
            radius: dispatch!(radius),
        }
    }
}

/// Chunk `k` owns indices `[k·⌊n/s⌋, (k+1)·⌊n/s⌋)`, with the last chunk
/// extended to `n` (spec.md §4.7 "Multisource").
fn chunk_index(particle_count: usize, num_sources: usize, index: usize) -> usize {
    let s = num_sources.max(1);
    let n = particle_count.max(1);
    let chunk_size = (n / s).max(1);
    (index / chunk_size).min(s - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rectangle_source_samples_stay_in_bounds() {
        let e = RectangleSource::build(Vec3::ZERO, Vec3::X, Vec3::Z, 2.0, 3.0);
        for i in 0..50 {
            let p = (e.pos)(i);
            assert!(p.x >= -1e-4 && p.x <= 2.0 + 1e-4);
            assert!(p.z >= -1e-4 && p.z <= 3.0 + 1e-4);
            assert!(p.y.abs() < 1e-4);
        }
    }

    #[test]
    fn hose_velocity_magnitude_is_bounded() {
        let e = Hose::build(Vec3::ZERO, Vec3::Y, 1.0, 2.0);
        let max_speed = (2.0f32 * 2.0 + 1.0 * 1.0).sqrt();
        for i in 0..50 {
            let v = (e.vel)(i);
            assert!(v.length() <= max_speed + 1e-3);
            assert!(v.length() >= 2.0 - 1e-3);
        }
    }

    #[test]
    fn multisource_routes_by_chunk() {
        let a = RectangleSource::build(Vec3::new(0.0, 0.0, 0.0), Vec3::X, Vec3::Z, 0.0, 0.0);
        let b = RectangleSource::build(Vec3::new(100.0, 0.0, 0.0), Vec3::X, Vec3::Z, 0.0, 0.0);
        let multi = Multisource::new(vec![a, b], 10);
        let emitter = multi.into_emitter();
        let p_low = (emitter.pos)(0);
        let p_high = (emitter.pos)(9);
        assert!(p_low.x < 50.0);
        assert!(p_high.x >= 50.0);
    }
}
