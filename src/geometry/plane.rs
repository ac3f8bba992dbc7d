// src/geometry/plane.rs
use crate::error::{SimError, SimResult};
use crate::math::Vec3;
use crate::particles::Free;

/// `n·x + d = 0`. `n` is always unit-length (spec.md §3, §8 universal
/// invariant `‖n‖ = 1`).
#[derive(Clone, Copy, Debug)]
pub struct Plane {
    pub normal: Vec3,
    pub d: f32,
}

impl Plane {
    pub fn new(normal: Vec3, d: f32) -> SimResult<Self> {
        let len = normal.length();
        if len < 1e-6 {
            return Err(SimError::DegeneratePlaneNormal);
        }
        Ok(Self {
            normal: normal / len,
            d,
        })
    }

    /// Builds the plane through `point` with the given (not necessarily
    /// unit) normal.
    pub fn from_point_normal(point: Vec3, normal: Vec3) -> SimResult<Self> {
        let len = normal.length();
        if len < 1e-6 {
            return Err(SimError::DegeneratePlaneNormal);
        }
        let n = normal / len;
        Ok(Self {
            normal: n,
            d: -n.dot(point),
        })
    }

    #[inline]
    pub fn signed_dist(&self, p: Vec3) -> f32 {
        self.normal.dot(p) + self.d
    }

    pub fn is_inside(&self, p: Vec3, tol: f32) -> bool {
        self.signed_dist(p).abs() <= tol
    }

    /// Orthogonal projection of `p` onto the plane.
    #[inline]
    pub fn closest_point(&self, p: Vec3) -> Vec3 {
        p - self.signed_dist(p) * self.normal
    }

    pub fn intersects_segment(&self, p: Vec3, q: Vec3) -> bool {
        self.signed_dist(p) * self.signed_dist(q) <= 0.0
    }

    pub fn intersects_segment_point(&self, p: Vec3, q: Vec3) -> Option<Vec3> {
        if !self.intersects_segment(p, q) {
            return None;
        }
        let denom = self.normal.dot(q - p);
        if denom.abs() < 1e-9 {
            return Some(p);
        }
        let r = (-self.d - self.normal.dot(p)) / denom;
        Some(p + r.clamp(0.0, 1.0) * (q - p))
    }

    /// Free-particle response against this plane (spec.md §4.2). `pred_pos`
    /// / `pred_vel` are the integrator's prediction; `cur_vel` is the
    /// particle's velocity before this step, used for the tangential term.
    pub fn resolve_free(&self, pred_pos: Vec3, pred_vel: Vec3, cur_vel: Vec3, p: &Free) -> (Vec3, Vec3) {
        let w = self.signed_dist(pred_pos) * self.normal;
        let new_pos = pred_pos - (1.0 + p.bouncing) * w;
        let v1 = pred_vel - (1.0 + p.bouncing) * self.normal.dot(pred_vel) * self.normal;
        let v_t = cur_vel - self.normal.dot(cur_vel) * self.normal;
        let new_vel = v1 - p.friction * v_t;
        (new_pos, new_vel)
    }

    /// Pushes a sphere center out of penetration along the contact normal,
    /// then applies the same response law as a free particle (spec.md §4.2,
    /// triangle/plane correction for sized particles).
    pub fn resolve_sphere(
        &self,
        pred_pos: Vec3,
        pred_vel: Vec3,
        cur_vel: Vec3,
        radius: f32,
        bounce: f32,
        friction: f32,
    ) -> (Vec3, Vec3) {
        let dist = self.signed_dist(pred_pos);
        let corrected = if dist < radius {
            pred_pos + (radius - dist) * self.normal
        } else {
            pred_pos
        };
        let w = self.signed_dist(corrected) * self.normal;
        let new_pos = corrected - (1.0 + bounce) * w;
        let v1 = pred_vel - (1.0 + bounce) * self.normal.dot(pred_vel) * self.normal;
        let v_t = cur_vel - self.normal.dot(cur_vel) * self.normal;
        let new_vel = v1 - friction * v_t;
        (new_pos, new_vel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn built_from_point_has_zero_signed_distance() {
        let p = Plane::from_point_normal(Vec3::new(1.0, 2.0, 3.0), Vec3::Y).unwrap();
        assert!(p.signed_dist(Vec3::new(1.0, 2.0, 3.0)).abs() < 1e-6);
    }

    #[test]
    fn segment_intersection_is_commutative() {
        let plane = Plane::new(Vec3::Y, 0.0).unwrap();
        let p = Vec3::new(0.0, 1.0, 0.0);
        let q = Vec3::new(0.0, -1.0, 0.0);
        assert_eq!(plane.intersects_segment(p, q), plane.intersects_segment(q, p));
    }

    #[test]
    fn resting_contact_response_is_idempotent() {
        let plane = Plane::new(Vec3::Y, 0.0).unwrap();
        let free = Free::new(Vec3::ZERO, Vec3::ZERO, 1.0);
        let x = Vec3::new(0.0, 0.0, 0.0);
        let v = Vec3::ZERO;
        let (x1, v1) = plane.resolve_free(x, v, v, &free);
        assert!((x1 - x).length() < 1e-6);
        assert!((v1 - v).length() < 1e-6);
        let (x2, v2) = plane.resolve_free(x1, v1, v1, &free);
        assert!((x2 - x1).length() < 1e-6);
        assert!((v2 - v1).length() < 1e-6);
    }

    #[test]
    fn zero_normal_is_rejected() {
        assert!(matches!(Plane::new(Vec3::ZERO, 0.0), Err(SimError::DegeneratePlaneNormal)));
    }
}
