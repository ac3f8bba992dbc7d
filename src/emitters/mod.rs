//! Per-kind initializers that stamp newly added or recycled particles
//! (spec.md §3, §4.7, §9 DESIGN NOTES: "preserve the per-attribute
//! callable model: an emitter is a record of closures... applied in the
//! fixed order"). Evaluation order per attribute is fixed: position,
//! velocity, mass, then kind-specific attributes.

mod sources;

pub use sources::{Hose, Multisource, RectangleSource};

use crate::math::Vec3;
use crate::particles::{Free, Sized};

/// Every attribute callable is keyed by the particle's assigned index, so
/// that a `Multisource` can route the call to the right sub-emitter
/// (spec.md §4.7).
pub type PosFn = Box<dyn Fn(usize) -> Vec3 + Send + Sync>;
pub type ScalarFn = Box<dyn Fn(usize) -> f32 + Send + Sync>;
pub type BoolFn = Box<dyn Fn(usize) -> bool + Send + Sync>;

/// A bundle of per-attribute callables for free (and, via `radius`, sized)
/// particles. Parametric emitters (rectangle/hose/multisource) override
/// `pos` and usually `vel`; the rest keep their defaults unless the caller
/// overrides them too.
pub struct Emitter {
    pub pos: PosFn,
    pub vel: PosFn,
    pub mass: ScalarFn,
    pub charge: ScalarFn,
    pub friction: ScalarFn,
    pub bounce: ScalarFn,
    pub lifetime: ScalarFn,
    pub starttime: ScalarFn,
    pub fixed: BoolFn,
    pub radius: ScalarFn,
}

impl Emitter {
    /// Matches the default-construction values of a free particle (spec.md
    /// §3): callables reproduce `Free::default()`/`Sized::default()`.
    pub fn constant() -> Self {
        Self {
            pos: Box::new(|_| Vec3::ZERO),
            vel: Box::new(|_| Vec3::ZERO),
            mass: Box::new(|_| 1.0),
            charge: Box::new(|_| 0.0),
            friction: Box::new(|_| 0.2),
            bounce: Box::new(|_| 0.8),
            lifetime: Box::new(|_| 10.0),
            starttime: Box::new(|_| 0.0),
            fixed: Box::new(|_| false),
            radius: Box::new(|_| 1.0),
        }
    }

    /// Applies every free-particle attribute in the fixed order (spec.md
    /// §4.7). `index` is the slot assigned by the simulator before this
    /// call, per the insertion-order guarantee.
    pub fn init_free(&self, index: usize) -> Free {
        let pos = (self.pos)(index);
        let vel = (self.vel)(index);
        let mass = (self.mass)(index);
        let mut p = Free::new(pos, vel, mass);
        p.base.index = index;
        p.charge = (self.charge)(index);
        p.bouncing = (self.bounce)(index);
        p.friction = (self.friction)(index);
        p.lifetime = (self.lifetime)(index);
        p.starttime = (self.starttime)(index);
        p.fixed = (self.fixed)(index);
        p
    }

    /// Same as `init_free`, plus the `radius` attribute (spec.md §3, §4.7).
    pub fn init_sized(&self, index: usize) -> Sized {
        let free = self.init_free(index);
        Sized {
            free,
            radius: (self.radius)(index),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_emitter_reproduces_free_default() {
        let e = Emitter::constant();
        let p = e.init_free(3);
        assert_eq!(p.base.index, 3);
        assert_eq!(p.bouncing, 0.8);
        assert_eq!(p.friction, 0.2);
        assert!(!p.fixed);
    }

    #[test]
    fn constant_emitter_sized_carries_radius() {
        let e = Emitter::constant();
        let p = e.init_sized(0);
        assert_eq!(p.radius, 1.0);
    }
}
