// src/fluid/kernel.rs
//! Poly6/Spiky/viscosity-Laplacian SPH kernels (Müller et al. 2003),
//! matching the three kernel shapes spec.md §4.6 calls for: density
//! (scalar of squared distance), pressure gradient (vector of `(r_ij,
//! ‖r_ij‖²)`), viscosity Laplacian (scalar of squared distance).

use crate::math::Vec3;
use std::f32::consts::PI;

/// Density kernel `W_ρ`. Zero outside the support radius `h`.
pub fn poly6(r2: f32, h: f32) -> f32 {
    let h2 = h * h;
    if r2 > h2 {
        return 0.0;
    }
    let coeff = 315.0 / (64.0 * PI * h.powi(9));
    coeff * (h2 - r2).powi(3)
}

/// Gradient of the pressure kernel `∇W_∇p`, oriented along `r_ij`.
pub fn spiky_gradient(r_ij: Vec3, r2: f32, h: f32) -> Vec3 {
    let r = r2.sqrt();
    if r < 1e-9 || r > h {
        return Vec3::ZERO;
    }
    let coeff = -45.0 / (PI * h.powi(6));
    r_ij * (coeff * (h - r).powi(2) / r)
}

/// Laplacian of the viscosity kernel `W_μ`.
pub fn viscosity_laplacian(r2: f32, h: f32) -> f32 {
    let h2 = h * h;
    if r2 > h2 {
        return 0.0;
    }
    let r = r2.sqrt();
    45.0 / (PI * h.powi(6)) * (h - r)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn poly6_is_zero_outside_support() {
        assert_eq!(poly6(100.0, 1.0), 0.0);
    }

    #[test]
    fn poly6_peaks_at_zero_distance() {
        let h = 1.0;
        assert!(poly6(0.0, h) > poly6(0.5, h));
    }

    #[test]
    fn spiky_gradient_points_away_from_neighbor() {
        let r_ij = Vec3::new(0.5, 0.0, 0.0);
        let g = spiky_gradient(r_ij, r_ij.length_squared(), 1.0);
        assert!(g.x > 0.0);
    }
}
