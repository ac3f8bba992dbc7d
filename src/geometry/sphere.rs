// src/geometry/sphere.rs
use super::Plane;
use crate::error::{SimError, SimResult};
use crate::math::Vec3;
use crate::particles::Free;

#[derive(Clone, Copy, Debug)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,
}

impl Sphere {
    pub fn new(center: Vec3, radius: f32) -> SimResult<Self> {
        if radius <= 0.0 {
            return Err(SimError::NonPositiveRadius(radius));
        }
        Ok(Self { center, radius })
    }

    pub fn is_inside(&self, point: Vec3, _tol: f32) -> bool {
        (point - self.center).length_squared() <= self.radius * self.radius
    }

    pub fn intersects_sphere(&self, center: Vec3, r: f32) -> bool {
        let d2 = (center - self.center).length_squared();
        let rr = self.radius + r;
        d2 <= rr * rr
    }

    /// Nearest point on the sphere's surface to `p`.
    #[inline]
    pub fn closest_point(&self, p: Vec3) -> Vec3 {
        let delta = p - self.center;
        let dist = delta.length();
        if dist < 1e-9 {
            self.center + Vec3::Y * self.radius
        } else {
            self.center + delta / dist * self.radius
        }
    }

    /// Line-sphere quadratic along `[p,q]`; selects the root in `[0,1]`
    /// closest to the segment start (spec.md §4.2).
    pub fn intersects_segment_point(&self, p: Vec3, q: Vec3) -> Option<Vec3> {
        let d = q - p;
        let f = p - self.center;
        let a = d.dot(d);
        if a < 1e-12 {
            return None;
        }
        let b = 2.0 * f.dot(d);
        let c = f.dot(f) - self.radius * self.radius;
        let disc = b * b - 4.0 * a * c;
        if disc < 0.0 {
            return None;
        }
        let sqrt_disc = disc.sqrt();
        let t1 = (-b - sqrt_disc) / (2.0 * a);
        let t2 = (-b + sqrt_disc) / (2.0 * a);

        let mut best: Option<f32> = None;
        for t in [t1, t2] {
            if (0.0..=1.0).contains(&t) {
                best = Some(match best {
                    Some(cur) if cur <= t => cur,
                    _ => t,
                });
            }
        }
        best.map(|t| p + d * t)
    }

    pub fn intersects_segment(&self, p: Vec3, q: Vec3) -> bool {
        self.intersects_segment_point(p, q).is_some()
    }

    /// Tangent plane at the intersection point, normal `C − I`, delegating
    /// response to `Plane` (spec.md §4.2).
    pub fn tangent_plane_at(&self, intersection: Vec3) -> Plane {
        let normal = self.center - intersection;
        Plane::from_point_normal(intersection, normal)
            .unwrap_or_else(|_| Plane::new(Vec3::Y, -intersection.y).expect("axis-aligned fallback normal is unit"))
    }

    pub fn resolve_free(&self, pred_pos: Vec3, pred_vel: Vec3, cur_vel: Vec3, intersection: Vec3, p: &Free) -> (Vec3, Vec3) {
        self.tangent_plane_at(intersection).resolve_free(pred_pos, pred_vel, cur_vel, p)
    }

    pub fn resolve_sphere(
        &self,
        pred_pos: Vec3,
        pred_vel: Vec3,
        cur_vel: Vec3,
        radius: f32,
        bounce: f32,
        friction: f32,
    ) -> (Vec3, Vec3) {
        let delta = pred_pos - self.center;
        let dist = delta.length();
        let surface_point = if dist > 1e-9 {
            self.center + delta / dist * self.radius
        } else {
            self.center + Vec3::Y * self.radius
        };
        self.tangent_plane_at(surface_point)
            .resolve_sphere(pred_pos, pred_vel, cur_vel, radius, bounce, friction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_positive_radius() {
        assert!(matches!(Sphere::new(Vec3::ZERO, 0.0), Err(SimError::NonPositiveRadius(_))));
    }

    #[test]
    fn segment_through_center_hits_near_surface() {
        let s = Sphere::new(Vec3::ZERO, 1.0).unwrap();
        let hit = s
            .intersects_segment_point(Vec3::new(-2.0, 0.0, 0.0), Vec3::new(2.0, 0.0, 0.0))
            .unwrap();
        assert!((hit.length() - 1.0).abs() < 1e-4);
    }

    #[test]
    fn point_on_surface_is_inside_with_tolerance() {
        let s = Sphere::new(Vec3::ZERO, 1.0).unwrap();
        assert!(s.is_inside(Vec3::new(1.0, 0.0, 0.0), 1e-6));
    }
}
