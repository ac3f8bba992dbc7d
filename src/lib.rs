//! Real-time physics simulation core: a time-stepped engine that advances
//! point-like and structured entities through a 3D scene, resolving
//! collisions against static geometry and, optionally, each other.
//!
//! The crate is organized leaves-first: [`math`] and [`geometry`] have no
//! internal dependencies; [`octree`] indexes geometry and fluid particles;
//! [`fields`], [`particles`], and [`emitters`] describe what can be
//! simulated; [`meshes`] and [`fluid`] are structured entity simulators
//! built on top of [`particles`]; [`engine`] ties everything together into
//! the stepper.

pub mod emitters;
pub mod engine;
pub mod error;
pub mod fields;
pub mod fluid;
pub mod geometry;
pub mod math;
pub mod meshes;
pub mod octree;
pub mod particles;

pub use emitters::{Emitter, Hose, Multisource, RectangleSource};
pub use engine::{Simulator, SimulatorConfig, SolverKind};
pub use error::{SimError, SimResult};
pub use fields::Field;
pub use fluid::NewtonianFluid;
pub use geometry::{Geometry, Plane, Rectangle, Sphere, Triangle, TriangularObject};
pub use meshes::{ClothGrid, Mesh, SpringChain};
pub use octree::Octree;
pub use particles::{Agent, AgentBehavior, Base, Free, FluidParticle, MeshParticle, Sized};
