// src/geometry/triangle.rs
use super::Plane;
use crate::error::{SimError, SimResult};
use crate::math::Vec3;

/// A triangle with its supporting plane and a precomputed 2D in-plane frame
/// (spec.md §3, §9 DESIGN NOTES: "bake into constructor-time data; never
/// recompute in hot paths").
#[derive(Clone, Copy, Debug)]
pub struct Triangle {
    pub v0: Vec3,
    pub v1: Vec3,
    pub v2: Vec3,
    pub plane: Plane,
    /// In-plane orthonormal basis.
    u_axis: Vec3,
    v_axis: Vec3,
    /// 2D coordinates of the three vertices in the (u_axis, v_axis) frame.
    p0: (f32, f32),
    p1: (f32, f32),
    p2: (f32, f32),
    /// Edge vectors in 2D: e0 = p1-p0, e1 = p2-p1, e2 = p0-p2.
    edges: [(f32, f32); 3],
    /// Outward edge normals (2D) paired with a point on that edge, used for
    /// the sign-consistency inside-test.
    edge_normals: [(f32, f32); 3],
}

impl Triangle {
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3) -> SimResult<Self> {
        let raw_normal = (v1 - v0).cross(v2 - v0);
        if raw_normal.length_squared() < 1e-12 {
            return Err(SimError::DegenerateTriangle);
        }
        let plane = Plane::from_point_normal(v0, raw_normal)?;

        let u_axis = (v1 - v0).normalize();
        let v_axis = plane.normal.cross(u_axis).normalize();

        let to2d = |p: Vec3| -> (f32, f32) {
            let d = p - v0;
            (d.dot(u_axis), d.dot(v_axis))
        };
        let p0 = to2d(v0);
        let p1 = to2d(v1);
        let p2 = to2d(v2);

        let e0 = (p1.0 - p0.0, p1.1 - p0.1);
        let e1 = (p2.0 - p1.0, p2.1 - p1.1);
        let e2 = (p0.0 - p2.0, p0.1 - p2.1);

        // Outward normal of a 2D edge (a,b) is the edge rotated -90deg.
        let outward = |e: (f32, f32)| -> (f32, f32) { (e.1, -e.0) };

        Ok(Self {
            v0,
            v1,
            v2,
            plane,
            u_axis,
            v_axis,
            p0,
            p1,
            p2,
            edges: [e0, e1, e2],
            edge_normals: [outward(e0), outward(e1), outward(e2)],
        })
    }

    pub fn centroid(&self) -> Vec3 {
        (self.v0 + self.v1 + self.v2) / 3.0
    }

    pub fn aabb(&self) -> (Vec3, Vec3) {
        (self.v0.min(self.v1).min(self.v2), self.v0.max(self.v1).max(self.v2))
    }

    fn to_2d(&self, p: Vec3) -> (f32, f32) {
        let d = p - self.v0;
        (d.dot(self.u_axis), d.dot(self.v_axis))
    }

    /// Sign-consistency test against the three outward edge normals.
    fn inside_2d(&self, p: (f32, f32), tol: f32) -> bool {
        let verts = [self.p0, self.p1, self.p2];
        for i in 0..3 {
            let edge_point = verts[i];
            let n = self.edge_normals[i];
            let rel = (p.0 - edge_point.0, p.1 - edge_point.1);
            if rel.0 * n.0 + rel.1 * n.1 > tol {
                return false;
            }
        }
        true
    }

    pub fn is_inside(&self, point: Vec3, tol: f32) -> bool {
        if !self.plane.is_inside(point, tol) {
            return false;
        }
        self.inside_2d(self.to_2d(point), tol)
    }

    pub fn intersects_segment(&self, p: Vec3, q: Vec3) -> bool {
        self.intersects_segment_point(p, q).is_some()
    }

    pub fn intersects_segment_point(&self, p: Vec3, q: Vec3) -> Option<Vec3> {
        let hit = self.plane.intersects_segment_point(p, q)?;
        if self.inside_2d(self.to_2d(hit), 1e-6) {
            Some(hit)
        } else {
            None
        }
    }

    /// Closest point on the (bounded) triangle to `p`, via edge/vertex
    /// Voronoi-region classification in the 2D frame.
    pub fn closest_point(&self, p: Vec3) -> Vec3 {
        let ab = self.v1 - self.v0;
        let ac = self.v2 - self.v0;
        let ap = p - self.v0;

        let d1 = ab.dot(ap);
        let d2 = ac.dot(ap);
        if d1 <= 0.0 && d2 <= 0.0 {
            return self.v0;
        }

        let bp = p - self.v1;
        let d3 = ab.dot(bp);
        let d4 = ac.dot(bp);
        if d3 >= 0.0 && d4 <= d3 {
            return self.v1;
        }

        let vc = d1 * d4 - d3 * d2;
        if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 {
            let v = d1 / (d1 - d3);
            return self.v0 + ab * v;
        }

        let cp = p - self.v2;
        let d5 = ab.dot(cp);
        let d6 = ac.dot(cp);
        if d6 >= 0.0 && d5 <= d6 {
            return self.v2;
        }

        let vb = d5 * d2 - d1 * d6;
        if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 {
            let w = d2 / (d2 - d6);
            return self.v0 + ac * w;
        }

        let va = d3 * d6 - d5 * d4;
        if va <= 0.0 && (d4 - d3) >= 0.0 && (d5 - d6) >= 0.0 {
            let w = (d4 - d3) / ((d4 - d3) + (d5 - d6));
            return self.v1 + (self.v2 - self.v1) * w;
        }

        let denom = 1.0 / (va + vb + vc);
        let v = vb * denom;
        let w = vc * denom;
        self.v0 + ab * v + ac * w
    }

    pub fn intersects_sphere(&self, center: Vec3, r: f32) -> bool {
        (self.closest_point(center) - center).length_squared() <= r * r
    }

    /// Free-particle response: no penetration correction, delegates straight
    /// to the supporting plane (spec.md §4.2).
    pub fn resolve_free(
        &self,
        pred_pos: Vec3,
        pred_vel: Vec3,
        cur_vel: Vec3,
        p: &crate::particles::Free,
    ) -> (Vec3, Vec3) {
        self.plane.resolve_free(pred_pos, pred_vel, cur_vel, p)
    }

    /// Plane response, with the sized-particle penetration correction:
    /// push the center out along the contact normal by `r − distance`
    /// first (spec.md §4.2).
    pub fn resolve_sphere(
        &self,
        pred_pos: Vec3,
        pred_vel: Vec3,
        cur_vel: Vec3,
        radius: f32,
        bounce: f32,
        friction: f32,
    ) -> (Vec3, Vec3) {
        let closest = self.closest_point(pred_pos);
        let delta = pred_pos - closest;
        let dist = delta.length();
        let normal = if dist > 1e-9 { delta / dist } else { self.plane.normal };
        let corrected = if dist < radius {
            closest + normal * radius
        } else {
            pred_pos
        };
        let w = normal.dot(corrected - closest) - radius;
        let w_vec = w * normal;
        let new_pos = corrected - (1.0 + bounce) * w_vec;
        let v1 = pred_vel - (1.0 + bounce) * normal.dot(pred_vel) * normal;
        let v_t = cur_vel - normal.dot(cur_vel) * normal;
        let new_vel = v1 - friction * v_t;
        (new_pos, new_vel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centroid_is_inside() {
        let t = Triangle::new(
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        )
        .unwrap();
        assert!(t.is_inside(t.centroid(), 1e-4));
    }

    #[test]
    fn degenerate_triangle_is_rejected() {
        let t = Triangle::new(Vec3::ZERO, Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0));
        assert!(matches!(t, Err(SimError::DegenerateTriangle)));
    }

    #[test]
    fn segment_through_triangle_hits_inside() {
        let t = Triangle::new(
            Vec3::new(-1.0, -1.0, 0.0),
            Vec3::new(1.0, -1.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        )
        .unwrap();
        let hit = t.intersects_segment_point(Vec3::new(0.0, 0.0, -1.0), Vec3::new(0.0, 0.0, 1.0));
        assert!(hit.is_some());
    }
}
