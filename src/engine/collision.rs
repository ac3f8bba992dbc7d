// src/engine/collision.rs
use crate::math::Vec3;
use crate::particles::{Base, Free};

/// Builds a transient `Free` wrapper around a mesh/fluid particle's base
/// state so it can go through the same `Geometry::resolve_free` path as a
/// real free particle (spec.md §4.5/§4.6 "time-stepped as free particles"),
/// grounded in `physim/particles/conversions.hpp`'s `from_mesh_to_free` /
/// `from_fluid_to_free`.
pub fn free_view(base: Base, bounce: f32, friction: f32) -> Free {
    Free {
        base,
        bouncing: bounce,
        friction,
        charge: 0.0,
        lifetime: f32::INFINITY,
        starttime: 0.0,
        fixed: false,
    }
}

/// Particle-particle collision response (spec.md §4.3): on overlap,
/// exchanges normal velocity components scaled by the lower of the two
/// restitution coefficients and separates the pair along the contact
/// normal in proportion to their masses. Returns `None` when the pair does
/// not overlap (including the zero-radius free-free case, per spec.md §9
/// Open Questions: "Treat free-free as zero-radius").
#[allow(clippy::too_many_arguments)]
pub fn resolve_pair(
    pos_i: Vec3,
    vel_i: Vec3,
    mass_i: f32,
    bounce_i: f32,
    radius_i: f32,
    pos_j: Vec3,
    vel_j: Vec3,
    mass_j: f32,
    bounce_j: f32,
    radius_j: f32,
) -> Option<(Vec3, Vec3, Vec3, Vec3)> {
    let delta = pos_i - pos_j;
    let dist = delta.length();
    let min_dist = radius_i + radius_j;
    if dist >= min_dist || dist < 1e-9 {
        return None;
    }

    let normal = delta / dist;
    let overlap = min_dist - dist;
    let total_mass = mass_i + mass_j;
    let new_pos_i = pos_i + normal * (overlap * (mass_j / total_mass));
    let new_pos_j = pos_j - normal * (overlap * (mass_i / total_mass));

    let rel_vel = vel_i - vel_j;
    let vn = rel_vel.dot(normal);
    if vn >= 0.0 {
        // Already separating: fix the overlap but leave velocities alone.
        return Some((new_pos_i, vel_i, new_pos_j, vel_j));
    }

    let bounce = bounce_i.min(bounce_j);
    let impulse_mag = -(1.0 + bounce) * vn / (1.0 / mass_i + 1.0 / mass_j);
    let impulse = normal * impulse_mag;
    let new_vel_i = vel_i + impulse / mass_i;
    let new_vel_j = vel_j - impulse / mass_j;

    Some((new_pos_i, new_vel_i, new_pos_j, new_vel_j))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_overlapping_spheres_do_not_collide() {
        let r = resolve_pair(
            Vec3::new(-10.0, 0.0, 0.0),
            Vec3::ZERO,
            1.0,
            0.5,
            1.0,
            Vec3::new(10.0, 0.0, 0.0),
            Vec3::ZERO,
            1.0,
            0.5,
            1.0,
        );
        assert!(r.is_none());
    }

    #[test]
    fn zero_radius_pair_never_collides() {
        let r = resolve_pair(Vec3::ZERO, Vec3::ZERO, 1.0, 0.8, 0.0, Vec3::ZERO, Vec3::ZERO, 1.0, 0.8, 0.0);
        assert!(r.is_none());
    }

    #[test]
    fn overlapping_equal_mass_spheres_separate_and_bounce() {
        let (pos_i, vel_i, pos_j, vel_j) = resolve_pair(
            Vec3::new(-0.5, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            1.0,
            1.0,
            1.0,
            Vec3::new(0.5, 0.0, 0.0),
            Vec3::new(-1.0, 0.0, 0.0),
            1.0,
            1.0,
            1.0,
        )
        .unwrap();
        // Equal masses, perfectly elastic, head-on: velocities swap.
        assert!((vel_i.x - (-1.0)).abs() < 1e-4);
        assert!((vel_j.x - 1.0).abs() < 1e-4);
        assert!(pos_i.x < -0.5);
        assert!(pos_j.x > 0.5);
    }

    #[test]
    fn restitution_uses_the_lower_of_the_two_coefficients() {
        let (_, vel_i, _, vel_j) = resolve_pair(
            Vec3::new(-0.5, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            1.0,
            0.0,
            1.0,
            Vec3::new(0.5, 0.0, 0.0),
            Vec3::ZERO,
            1.0,
            1.0,
            1.0,
        )
        .unwrap();
        // bounce = min(0.0, 1.0) = 0: perfectly inelastic along the normal.
        assert!((vel_i.x - vel_j.x).abs() < 1e-4);
    }
}
