// src/math/mod.rs
//! 2D/3D/4D vectors are re-exported `glam` types, matching the rest of the
//! stack. `Vec6` has no `glam` equivalent so it lives here as a plain value
//! type.

mod vec6;

pub use glam::{Vec2, Vec3, Vec4};
pub use vec6::Vec6;

/// Clamps to `[-1, 1]` before calling `acos`, per spec: angle computations
/// must never panic/NaN on a slightly-out-of-range dot product.
#[inline]
pub fn clamp_acos(x: f32) -> f32 {
    x.clamp(-1.0, 1.0).acos()
}

/// Unsigned angle between two vectors, in radians.
#[inline]
pub fn angle_between(a: Vec3, b: Vec3) -> f32 {
    let denom = a.length() * b.length();
    if denom < 1e-12 {
        return 0.0;
    }
    clamp_acos(a.dot(b) / denom)
}

/// Returns `v` truncated to at most `max_len` in magnitude, direction preserved.
#[inline]
pub fn truncate(v: Vec3, max_len: f32) -> Vec3 {
    let len_sq = v.length_squared();
    if len_sq <= max_len * max_len || len_sq < 1e-12 {
        v
    } else {
        v * (max_len / len_sq.sqrt())
    }
}

/// Any unit vector perpendicular to `v`. Used by geometry frames and by agent
/// steering. Picks the axis least aligned with `v` to avoid degenerate cross
/// products.
#[inline]
pub fn perpendicular(v: Vec3) -> Vec3 {
    let axis = if v.x.abs() < v.y.abs() && v.x.abs() < v.z.abs() {
        Vec3::X
    } else if v.y.abs() < v.z.abs() {
        Vec3::Y
    } else {
        Vec3::Z
    };
    v.cross(axis).normalize_or_zero()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_acos_never_panics_out_of_domain() {
        assert!((clamp_acos(1.5) - 0.0).abs() < 1e-6);
        assert!((clamp_acos(-1.5) - std::f32::consts::PI).abs() < 1e-6);
    }

    #[test]
    fn angle_between_orthogonal_is_half_pi() {
        let a = angle_between(Vec3::X, Vec3::Y);
        assert!((a - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn truncate_shrinks_long_vectors_only() {
        let short = Vec3::new(1.0, 0.0, 0.0);
        assert_eq!(truncate(short, 5.0), short);

        let long = Vec3::new(10.0, 0.0, 0.0);
        let t = truncate(long, 5.0);
        assert!((t.length() - 5.0).abs() < 1e-5);
    }

    #[test]
    fn perpendicular_is_actually_perpendicular() {
        for v in [Vec3::X, Vec3::Y, Vec3::Z, Vec3::new(1.0, 2.0, 3.0)] {
            let p = perpendicular(v);
            assert!(p.dot(v).abs() < 1e-5, "v={v:?} p={p:?}");
        }
    }
}
