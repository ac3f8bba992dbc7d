// src/geometry/rectangle.rs
use super::Plane;
use crate::error::SimResult;
use crate::math::Vec3;
use crate::particles::Free;

/// Four coplanar points with an in-plane 2D frame plus axis-aligned bounds
/// of the four vertices in that frame (spec.md §3).
#[derive(Clone, Copy, Debug)]
pub struct Rectangle {
    pub corners: [Vec3; 4],
    pub plane: Plane,
    u_axis: Vec3,
    v_axis: Vec3,
    min2: (f32, f32),
    max2: (f32, f32),
}

impl Rectangle {
    pub fn new(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3) -> SimResult<Self> {
        let raw_normal = (p1 - p0).cross(p2 - p0);
        let plane = Plane::from_point_normal(p0, raw_normal)?;
        let u_axis = (p1 - p0).normalize();
        let v_axis = plane.normal.cross(u_axis).normalize();

        let to2d = |p: Vec3| -> (f32, f32) {
            let d = p - p0;
            (d.dot(u_axis), d.dot(v_axis))
        };
        let pts = [to2d(p0), to2d(p1), to2d(p2), to2d(p3)];
        let min2 = (
            pts.iter().map(|p| p.0).fold(f32::INFINITY, f32::min),
            pts.iter().map(|p| p.1).fold(f32::INFINITY, f32::min),
        );
        let max2 = (
            pts.iter().map(|p| p.0).fold(f32::NEG_INFINITY, f32::max),
            pts.iter().map(|p| p.1).fold(f32::NEG_INFINITY, f32::max),
        );

        Ok(Self {
            corners: [p0, p1, p2, p3],
            plane,
            u_axis,
            v_axis,
            min2,
            max2,
        })
    }

    fn to_2d(&self, p: Vec3) -> (f32, f32) {
        let d = p - self.corners[0];
        (d.dot(self.u_axis), d.dot(self.v_axis))
    }

    pub fn is_inside(&self, point: Vec3, tol: f32) -> bool {
        if !self.plane.is_inside(point, tol) {
            return false;
        }
        let (u, v) = self.to_2d(point);
        u >= self.min2.0 - tol && u <= self.max2.0 + tol && v >= self.min2.1 - tol && v <= self.max2.1 + tol
    }

    pub fn intersects_segment(&self, p: Vec3, q: Vec3) -> bool {
        self.intersects_segment_point(p, q).is_some()
    }

    /// Approximates sphere-vs-rectangle by clamping the plane projection of
    /// `center` to the rectangle's 2D bounds and comparing distance to `r`.
    pub fn intersects_sphere(&self, center: Vec3, r: f32) -> bool {
        (self.closest_point(center) - center).length_squared() <= r * r
    }

    /// Nearest point on the (bounded) rectangle to `p`: the plane
    /// projection, clamped to the rectangle's 2D bounds.
    pub fn closest_point(&self, p: Vec3) -> Vec3 {
        let (u, v) = self.to_2d(p);
        let cu = u.clamp(self.min2.0, self.max2.0);
        let cv = v.clamp(self.min2.1, self.max2.1);
        self.corners[0] + self.u_axis * cu + self.v_axis * cv
    }

    pub fn intersects_segment_point(&self, p: Vec3, q: Vec3) -> Option<Vec3> {
        let hit = self.plane.intersects_segment_point(p, q)?;
        if self.is_inside(hit, 1e-6) {
            Some(hit)
        } else {
            None
        }
    }

    /// Response delegates to the plane (spec.md §4.2).
    pub fn resolve_free(&self, pred_pos: Vec3, pred_vel: Vec3, cur_vel: Vec3, p: &Free) -> (Vec3, Vec3) {
        self.plane.resolve_free(pred_pos, pred_vel, cur_vel, p)
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
        self.plane.resolve_sphere(pred_pos, pred_vel, cur_vel, radius, bounce, friction)
    }
}
