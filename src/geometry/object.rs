// src/geometry/object.rs
use super::Triangle;
use crate::error::SimResult;
use crate::math::Vec3;
use crate::octree::Octree;
use crate::particles::Free;

/// A triangle soup plus bounds and an octree over its triangles (spec.md
/// §3, §4.2 "Triangular object"). Owns its triangles; the octree is
/// immutable for the object's lifetime unless it is rebuilt explicitly.
pub struct TriangularObject {
    pub triangles: Vec<Triangle>,
    pub min: Vec3,
    pub max: Vec3,
    octree: Octree,
}

impl TriangularObject {
    /// `vertices` is a flat point list; `indices` holds vertex-index
    /// triples (spec.md §6 "vertex list and a flat triangle-index list").
    pub fn new(vertices: &[Vec3], indices: &[[u32; 3]], lod: usize) -> SimResult<Self> {
        let mut triangles = Vec::with_capacity(indices.len());
        for tri in indices {
            triangles.push(Triangle::new(
                vertices[tri[0] as usize],
                vertices[tri[1] as usize],
                vertices[tri[2] as usize],
            )?);
        }

        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);
        for v in vertices {
            min = min.min(*v);
            max = max.max(*v);
        }
        let min_extent = ((max - min).max_element() * 1e-4).max(1e-4);
        let octree = Octree::build_triangles(vertices, indices, min, max, lod, min_extent);

        Ok(Self {
            triangles,
            min,
            max,
            octree,
        })
    }

    pub fn intersects_segment(&self, p: Vec3, q: Vec3) -> bool {
        self.intersects_segment_point(p, q).is_some()
    }

    /// Unions the octree indices covering both endpoints, tests each
    /// candidate triangle (spec.md §4.2).
    pub fn intersects_segment_point(&self, p: Vec3, q: Vec3) -> Option<(Vec3, usize)> {
        let mut candidates = self.octree.indices_for_point(p);
        candidates.extend(self.octree.indices_for_point(q));
        let mut best: Option<(f32, Vec3, usize)> = None;
        for idx in candidates {
            let tri = &self.triangles[idx as usize];
            if let Some(hit) = tri.intersects_segment_point(p, q) {
                let t = (hit - p).length_squared();
                if best.as_ref().map_or(true, |(bt, ..)| t < *bt) {
                    best = Some((t, hit, idx as usize));
                }
            }
        }
        best.map(|(_, hit, idx)| (hit, idx))
    }

    pub fn intersects_sphere(&self, center: Vec3, r: f32) -> bool {
        self.first_intersecting_triangle(center, r).is_some()
    }

    /// Finds the first intersecting triangle for sphere response, per
    /// spec.md §4.2 "Response: find the first intersecting triangle and
    /// delegate."
    pub fn first_intersecting_triangle(&self, center: Vec3, r: f32) -> Option<usize> {
        let candidates = self.octree.indices_in_sphere(center, r);
        candidates
            .into_iter()
            .find(|&idx| self.triangles[idx as usize].intersects_sphere(center, r))
            .map(|idx| idx as usize)
    }

    /// Approximate nearest point for steering purposes: clamps to the
    /// object's bounding box rather than searching every triangle (spec.md
    /// §4.2's response path always has an explicit hit triangle in hand;
    /// this is only used by agent collision-avoidance steering, which
    /// needs a cheap repulsion point, not an exact nearest surface point).
    pub fn closest_point(&self, p: Vec3) -> Vec3 {
        p.clamp(self.min, self.max)
    }

    pub fn resolve_free(&self, pred_pos: Vec3, pred_vel: Vec3, cur_vel: Vec3, hit_triangle: usize, p: &Free) -> (Vec3, Vec3) {
        self.triangles[hit_triangle].resolve_free(pred_pos, pred_vel, cur_vel, p)
    }

    pub fn resolve_sphere(
        &self,
        pred_pos: Vec3,
        pred_vel: Vec3,
        cur_vel: Vec3,
        radius: f32,
        bounce: f32,
        friction: f32,
    ) -> Option<(Vec3, Vec3)> {
        let idx = self.first_intersecting_triangle(pred_pos, radius)?;
        Some(self.triangles[idx].resolve_sphere(pred_pos, pred_vel, cur_vel, radius, bounce, friction))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tetrahedron() -> (Vec<Vec3>, Vec<[u32; 3]>) {
        let verts = vec![
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(-1.0, -1.0, 1.0),
            Vec3::new(1.0, -1.0, 1.0),
            Vec3::new(0.0, -1.0, -1.0),
        ];
        let tris = vec![[0, 1, 2], [0, 2, 3], [0, 3, 1], [1, 3, 2]];
        (verts, tris)
    }

    #[test]
    fn segment_through_object_hits_a_face() {
        let (verts, tris) = tetrahedron();
        let obj = TriangularObject::new(&verts, &tris, 2).unwrap();
        let hit = obj.intersects_segment_point(Vec3::new(0.0, -0.5, 2.0), Vec3::new(0.0, -0.5, -2.0));
        assert!(hit.is_some());
    }

    #[test]
    fn far_sphere_does_not_intersect() {
        let (verts, tris) = tetrahedron();
        let obj = TriangularObject::new(&verts, &tris, 2).unwrap();
        assert!(!obj.intersects_sphere(Vec3::new(100.0, 100.0, 100.0), 0.5));
    }
}
