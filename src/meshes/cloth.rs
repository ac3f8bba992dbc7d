// src/meshes/cloth.rs
use crate::error::{SimError, SimResult};
use crate::math::Vec3;
use crate::particles::MeshParticle;

#[derive(Clone, Copy, Debug)]
struct Edge {
    a: usize,
    b: usize,
    rest_length: f32,
}

/// A 2-D regular grid (`R×C` particles), with up to three independently
/// toggleable edge classes: stretch, shear, bend (spec.md §4.5).
pub struct ClothGrid {
    pub particles: Vec<MeshParticle>,
    pub rows: usize,
    pub cols: usize,
    stretch: Vec<Edge>,
    shear: Vec<Edge>,
    bend: Vec<Edge>,
    pub stretch_enabled: bool,
    pub shear_enabled: bool,
    pub bend_enabled: bool,
    pub k_elastic: f32,
    pub k_damping: f32,
    /// Collision attributes applied when a cloth particle hits static
    /// geometry (spec.md §4.5, grounded in `sim_meshes.cpp`).
    pub bounce: f32,
    pub friction: f32,
}

impl ClothGrid {
    /// `positions` is row-major, `rows * cols` long (spec.md §7.1: a grid
    /// whose `R*C` does not match its particle count fails loudly at the
    /// API boundary rather than panicking).
    pub fn new(positions: &[Vec3], rows: usize, cols: usize, mass: f32, k_elastic: f32, k_damping: f32) -> SimResult<Self> {
        if positions.len() != rows * cols {
            return Err(SimError::MeshGridMismatch { rows, cols, count: positions.len() });
        }
        let particles = positions.iter().map(|&p| MeshParticle::new(p, mass)).collect();
        let idx = |i: usize, j: usize| i * cols + j;
        let dist = |a: usize, b: usize| (positions[a] - positions[b]).length();

        let mut stretch = Vec::new();
        let mut shear = Vec::new();
        let mut bend = Vec::new();

        for i in 0..rows {
            for j in 0..cols {
                if j + 1 < cols {
                    let (a, b) = (idx(i, j), idx(i, j + 1));
                    stretch.push(Edge { a, b, rest_length: dist(a, b) });
                }
                if i + 1 < rows {
                    let (a, b) = (idx(i, j), idx(i + 1, j));
                    stretch.push(Edge { a, b, rest_length: dist(a, b) });
                }
                if i + 1 < rows && j + 1 < cols {
                    let (a, b) = (idx(i, j), idx(i + 1, j + 1));
                    shear.push(Edge { a, b, rest_length: dist(a, b) });
                }
                if i + 1 < rows && j >= 1 {
                    let (a, b) = (idx(i, j), idx(i + 1, j - 1));
                    shear.push(Edge { a, b, rest_length: dist(a, b) });
                }
                if j + 2 < cols {
                    let (a, b) = (idx(i, j), idx(i, j + 2));
                    bend.push(Edge { a, b, rest_length: dist(a, b) });
                }
                if i + 2 < rows {
                    let (a, b) = (idx(i, j), idx(i + 2, j));
                    bend.push(Edge { a, b, rest_length: dist(a, b) });
                }
            }
        }

        Ok(Self {
            particles,
            rows,
            cols,
            stretch,
            shear,
            bend,
            stretch_enabled: true,
            shear_enabled: true,
            bend_enabled: true,
            k_elastic,
            k_damping,
            bounce: 0.3,
            friction: 0.1,
        })
    }

    pub fn pin(&mut self, i: usize, j: usize) {
        let idx = i * self.cols + j;
        self.particles[idx].fixed = true;
    }

    fn accumulate_edge_set(&mut self, edges: &[Edge]) {
        for e in edges {
            let (pi, pj) = (self.particles[e.a].base, self.particles[e.b].base);
            let d = pj.cur_pos - pi.cur_pos;
            let len = d.length();
            if len < 1e-9 {
                continue;
            }
            let u_hat = d / len;
            let dv = pj.cur_vel - pi.cur_vel;
            let force = (self.k_elastic * (len - e.rest_length) + self.k_damping * dv.dot(u_hat)) * u_hat;
            self.particles[e.a].base.force += force;
            self.particles[e.b].base.force -= force;
        }
    }

    /// Iterates every enabled edge class once, applying the same spring
    /// force law as the 1-D chain (spec.md §4.5).
    pub fn accumulate_forces(&mut self) {
        if self.stretch_enabled {
            let edges = std::mem::take(&mut self.stretch);
            self.accumulate_edge_set(&edges);
            self.stretch = edges;
        }
        if self.shear_enabled {
            let edges = std::mem::take(&mut self.shear);
            self.accumulate_edge_set(&edges);
            self.shear = edges;
        }
        if self.bend_enabled {
            let edges = std::mem::take(&mut self.bend);
            self.accumulate_edge_set(&edges);
            self.bend = edges;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_grid(rows: usize, cols: usize, spacing: f32) -> Vec<Vec3> {
        let mut pts = Vec::with_capacity(rows * cols);
        for i in 0..rows {
            for j in 0..cols {
                pts.push(Vec3::new(j as f32 * spacing, 0.0, i as f32 * spacing));
            }
        }
        pts
    }

    #[test]
    fn edge_classes_built_with_expected_counts() {
        let pts = flat_grid(5, 5, 1.0);
        let grid = ClothGrid::new(&pts, 5, 5, 1.0, 500.0, 0.5).unwrap();
        // stretch: horizontal (5*4) + vertical (4*5) = 40
        assert_eq!(grid.stretch.len(), 40);
        assert!(!grid.shear.is_empty());
        assert!(!grid.bend.is_empty());
    }

    #[test]
    fn toggling_off_all_classes_yields_zero_force() {
        let pts = flat_grid(3, 3, 1.0);
        let mut grid = ClothGrid::new(&pts, 3, 3, 1.0, 500.0, 0.5).unwrap();
        grid.particles[4].base.cur_pos += Vec3::new(0.3, 0.1, 0.0);
        grid.stretch_enabled = false;
        grid.shear_enabled = false;
        grid.bend_enabled = false;
        grid.accumulate_forces();
        for p in &grid.particles {
            assert_eq!(p.base.force, Vec3::ZERO);
        }
    }

    #[test]
    fn mismatched_grid_dimensions_are_rejected() {
        let pts = flat_grid(2, 2, 1.0);
        let err = ClothGrid::new(&pts, 3, 3, 1.0, 500.0, 0.5).unwrap_err();
        assert_eq!(err, SimError::MeshGridMismatch { rows: 3, cols: 3, count: 4 });
    }
}
