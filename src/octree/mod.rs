//! Generic spatial index over either triangle or point indices (spec.md
//! §3, §4.4). Nodes live in a flat arena (`Vec<OctreeNode>`) addressed by
//! index rather than individually heap-allocated, per §9 DESIGN NOTES
//! ("node-array with parent/child indices... keeps locality for the
//! hottest query path"), grounded in the cell-array layout of
//! `StaticSpatialHash` (collision/spatial/static_grid.rs) generalized from
//! a uniform grid to a recursive octree.

use crate::math::Vec3;
use rustc_hash::FxHashSet;

#[derive(Clone, Debug)]
struct OctreeNode {
    min: Vec3,
    max: Vec3,
    center: Vec3,
    /// `Some` for an internal node (eight children, octant-ordered by the
    /// `x|y<<1|z<<2` bit convention below); `None` for a leaf.
    children: Option<[u32; 8]>,
    /// Owned indices; populated only on leaves.
    indices: Vec<u32>,
}

impl OctreeNode {
    fn leaf(min: Vec3, max: Vec3) -> Self {
        Self {
            min,
            max,
            center: (min + max) * 0.5,
            children: None,
            indices: Vec::new(),
        }
    }

    fn is_leaf(&self) -> bool {
        self.children.is_none()
    }
}

#[inline]
fn octant_of(p: Vec3, center: Vec3) -> usize {
    let bx = (p.x >= center.x) as usize;
    let by = (p.y >= center.y) as usize;
    let bz = (p.z >= center.z) as usize;
    bx | (by << 1) | (bz << 2)
}

#[inline]
fn octant_bounds(min: Vec3, max: Vec3, center: Vec3, octant: usize) -> (Vec3, Vec3) {
    let bx = octant & 1;
    let by = (octant >> 1) & 1;
    let bz = (octant >> 2) & 1;
    let cmin = Vec3::new(
        if bx == 1 { center.x } else { min.x },
        if by == 1 { center.y } else { min.y },
        if bz == 1 { center.z } else { min.z },
    );
    let cmax = Vec3::new(
        if bx == 1 { max.x } else { center.x },
        if by == 1 { max.y } else { center.y },
        if bz == 1 { max.z } else { center.z },
    );
    (cmin, cmax)
}

#[inline]
fn aabb_overlaps(a_min: Vec3, a_max: Vec3, b_min: Vec3, b_max: Vec3) -> bool {
    a_min.x <= b_max.x
        && a_max.x >= b_min.x
        && a_min.y <= b_max.y
        && a_max.y >= b_min.y
        && a_min.z <= b_max.z
        && a_max.z >= b_min.z
}

#[inline]
fn aabb_intersects_sphere(min: Vec3, max: Vec3, center: Vec3, r: f32) -> bool {
    let closest = center.clamp(min, max);
    (closest - center).length_squared() <= r * r
}

/// LOD/min-extent-driven octree (spec.md §4.4). Triangle-mode leaves may
/// hold duplicated indices (a triangle spanning an octant boundary is
/// recorded in every octant it overlaps); point-mode leaves own each index
/// exactly once.
pub struct Octree {
    nodes: Vec<OctreeNode>,
    lod: usize,
    min_extent: f32,
}

impl Octree {
    /// Builds over a triangle soup given as vertex positions and
    /// triples-of-vertex-index (spec.md §4.4 "Build (triangles)").
    pub fn build_triangles(
        vertices: &[Vec3],
        triangles: &[[u32; 3]],
        min: Vec3,
        max: Vec3,
        lod: usize,
        min_extent: f32,
    ) -> Self {
        let aabbs: Vec<(Vec3, Vec3)> = triangles
            .iter()
            .map(|tri| {
                let a = vertices[tri[0] as usize];
                let b = vertices[tri[1] as usize];
                let c = vertices[tri[2] as usize];
                (a.min(b).min(c), a.max(b).max(c))
            })
            .collect();
        let all: Vec<u32> = (0..triangles.len() as u32).collect();

        let mut tree = Self {
            nodes: vec![OctreeNode::leaf(min, max)],
            lod,
            min_extent,
        };
        tree.split_triangles(0, &all, &aabbs);
        tree
    }

    /// Builds over raw points, one owner octant per point (spec.md §4.4
    /// "Build (points)").
    pub fn build_points(points: &[Vec3], min: Vec3, max: Vec3, lod: usize, min_extent: f32) -> Self {
        let all: Vec<u32> = (0..points.len() as u32).collect();
        let mut tree = Self {
            nodes: vec![OctreeNode::leaf(min, max)],
            lod,
            min_extent,
        };
        tree.split_points(0, &all, points);
        tree
    }

    fn should_split(&self, node_idx: usize, count: usize) -> bool {
        if count <= self.lod {
            return false;
        }
        let node = &self.nodes[node_idx];
        let extent = node.max - node.min;
        extent.x.max(extent.y).max(extent.z) > self.min_extent
    }

    fn push_children(&mut self, node_idx: usize) -> [usize; 8] {
        let (min, max, center) = {
            let n = &self.nodes[node_idx];
            (n.min, n.max, n.center)
        };
        let mut child_indices = [0usize; 8];
        for octant in 0..8 {
            let (cmin, cmax) = octant_bounds(min, max, center, octant);
            child_indices[octant] = self.nodes.len();
            self.nodes.push(OctreeNode::leaf(cmin, cmax));
        }
        let mut children_u32 = [0u32; 8];
        for (i, c) in child_indices.iter().enumerate() {
            children_u32[i] = *c as u32;
        }
        self.nodes[node_idx].children = Some(children_u32);
        child_indices
    }

    fn split_triangles(&mut self, node_idx: usize, items: &[u32], aabbs: &[(Vec3, Vec3)]) {
        if !self.should_split(node_idx, items.len()) {
            self.nodes[node_idx].indices = items.to_vec();
            return;
        }
        let children = self.push_children(node_idx);
        for (octant, &child_idx) in children.iter().enumerate() {
            let (cmin, cmax) = {
                let c = &self.nodes[child_idx];
                (c.min, c.max)
            };
            let subset: Vec<u32> = items
                .iter()
                .copied()
                .filter(|&i| {
                    let (a_min, a_max) = aabbs[i as usize];
                    aabb_overlaps(a_min, a_max, cmin, cmax)
                })
                .collect();
            let _ = octant;
            if !subset.is_empty() {
                self.split_triangles(child_idx, &subset, aabbs);
            }
        }
    }

    fn split_points(&mut self, node_idx: usize, items: &[u32], points: &[Vec3]) {
        if !self.should_split(node_idx, items.len()) {
            self.nodes[node_idx].indices = items.to_vec();
            return;
        }
        let center = self.nodes[node_idx].center;
        let children = self.push_children(node_idx);
        let mut buckets: [Vec<u32>; 8] = Default::default();
        for &i in items {
            buckets[octant_of(points[i as usize], center)].push(i);
        }
        for (octant, &child_idx) in children.iter().enumerate() {
            if !buckets[octant].is_empty() {
                self.split_points(child_idx, &buckets[octant], points);
            }
        }
    }

    /// Descends to the unique leaf covering `p` (spec.md §4.4).
    pub fn indices_for_point(&self, p: Vec3) -> FxHashSet<u32> {
        let mut node_idx = 0usize;
        loop {
            let node = &self.nodes[node_idx];
            match node.children {
                None => return node.indices.iter().copied().collect(),
                Some(children) => {
                    node_idx = children[octant_of(p, node.center)] as usize;
                }
            }
        }
    }

    /// Descends every child whose AABB intersects the sphere, unique-ifying
    /// on collection so duplicated triangle indices are returned once
    /// (spec.md §4.4).
    pub fn indices_in_sphere(&self, center: Vec3, r: f32) -> FxHashSet<u32> {
        let mut out = FxHashSet::default();
        self.collect_in_sphere(0, center, r, &mut out);
        out
    }

    fn collect_in_sphere(&self, node_idx: usize, center: Vec3, r: f32, out: &mut FxHashSet<u32>) {
        let node = &self.nodes[node_idx];
        if !aabb_intersects_sphere(node.min, node.max, center, r) {
            return;
        }
        match node.children {
            None => out.extend(node.indices.iter().copied()),
            Some(children) => {
                for c in children {
                    self.collect_in_sphere(c as usize, center, r, out);
                }
            }
        }
    }

    /// All leaf regions, for debugging/visualization (spec.md §4.4).
    pub fn boxes(&self) -> Vec<(Vec3, Vec3)> {
        self.nodes
            .iter()
            .filter(|n| n.is_leaf())
            .map(|n| (n.min, n.max))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_cube_mesh() -> (Vec<Vec3>, Vec<[u32; 3]>) {
        // Two triangles per face isn't needed for coverage tests; a handful
        // of triangles scattered through the cube is enough.
        let verts = vec![
            Vec3::new(-1.0, -1.0, -1.0),
            Vec3::new(1.0, -1.0, -1.0),
            Vec3::new(-1.0, 1.0, -1.0),
            Vec3::new(1.0, 1.0, -1.0),
            Vec3::new(-1.0, -1.0, 1.0),
            Vec3::new(1.0, -1.0, 1.0),
            Vec3::new(-1.0, 1.0, 1.0),
            Vec3::new(1.0, 1.0, 1.0),
        ];
        let tris = vec![
            [0, 1, 2],
            [1, 3, 2],
            [4, 5, 6],
            [5, 7, 6],
            [0, 1, 4],
            [1, 5, 4],
            [2, 3, 6],
            [3, 7, 6],
        ];
        (verts, tris)
    }

    #[test]
    fn point_query_finds_covering_triangles() {
        let (verts, tris) = unit_cube_mesh();
        let tree = Octree::build_triangles(&verts, &tris, Vec3::splat(-1.0), Vec3::splat(1.0), 2, 0.01);
        for (idx, tri) in tris.iter().enumerate() {
            let centroid = (verts[tri[0] as usize] + verts[tri[1] as usize] + verts[tri[2] as usize]) / 3.0;
            let hits = tree.indices_for_point(centroid);
            assert!(hits.contains(&(idx as u32)), "triangle {idx} missing from its own leaf");
        }
    }

    #[test]
    fn sphere_query_never_under_approximates() {
        let (verts, tris) = unit_cube_mesh();
        let tree = Octree::build_triangles(&verts, &tris, Vec3::splat(-1.0), Vec3::splat(1.0), 2, 0.01);
        let query_center = Vec3::ZERO;
        let r = 3.0;
        let hits = tree.indices_in_sphere(query_center, r);
        // Every triangle's centroid is within r of the origin at this radius.
        assert_eq!(hits.len(), tris.len());
    }

    #[test]
    fn point_mode_assigns_each_point_once() {
        let points: Vec<Vec3> = (0..64)
            .map(|i| Vec3::new((i % 4) as f32, ((i / 4) % 4) as f32, (i / 16) as f32))
            .collect();
        let tree = Octree::build_points(&points, Vec3::splat(-0.1), Vec3::splat(4.0), 4, 0.01);
        let total: usize = tree.boxes().len();
        assert!(total > 0);
        for (i, &p) in points.iter().enumerate() {
            let hits = tree.indices_for_point(p);
            assert!(hits.contains(&(i as u32)));
        }
    }
}
