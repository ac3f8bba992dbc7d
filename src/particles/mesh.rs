// src/particles/mesh.rs
use super::Base;
use crate::math::Vec3;

/// A node in a spring mesh (spec.md §3, §3.7). Unlike `Free`, a mesh node
/// has no bounce/friction/lifetime: its motion is governed entirely by the
/// spring forces its owning `SpringChain`/`ClothGrid` accumulates into
/// `base.force` each step, plus collision against static geometry.
#[derive(Clone, Copy, Debug)]
pub struct MeshParticle {
    pub base: Base,
    /// A fixed node never integrates; it still participates in spring force
    /// accumulation (so its neighbors feel it) and collision queries.
    pub fixed: bool,
}

impl MeshParticle {
    pub fn new(pos: Vec3, mass: f32) -> Self {
        Self {
            base: Base::new(pos, Vec3::ZERO, mass),
            fixed: false,
        }
    }

    pub fn pinned(pos: Vec3, mass: f32) -> Self {
        Self {
            base: Base::new(pos, Vec3::ZERO, mass),
            fixed: true,
        }
    }
}

impl Default for MeshParticle {
    fn default() -> Self {
        Self::new(Vec3::ZERO, 1.0)
    }
}
