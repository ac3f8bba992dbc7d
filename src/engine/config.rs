// src/engine/config.rs
use crate::math::Vec3;

/// Integrator choice (spec.md §4.1, §6 "set-solver (enum of
/// `EulerOrig|EulerSemi|Verlet`)").
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SolverKind {
    /// `pred_pos = cur_pos + cur_vel·Δt`; `pred_vel = cur_vel + a·Δt`.
    EulerOrig,
    /// `pred_vel = cur_vel + a·Δt`; `pred_pos = cur_pos + pred_vel·Δt`.
    EulerSemi,
    /// `pred_pos = 2·cur_pos − prev_pos + a·Δt²`; `pred_vel = (pred_pos −
    /// cur_pos) / Δt`.
    Verlet,
}

/// Tuning knobs owned by the [`Simulator`](super::Simulator), generalized
/// from the teacher's `PhysicsConfig` (`engine::config`) to the spec.md
/// §4.1 stepper surface plus the structural-mesh and SPH tuning
/// `original_source/physim/simulator.hpp` exposes as simulator-level
/// defaults rather than hardcoded constants.
#[derive(Clone, Debug)]
pub struct SimulatorConfig {
    pub time_step: f32,
    pub solver: SolverKind,
    pub viscous_drag: f32,
    /// Convenience default gravity, materialized as a `Field::Gravity` on
    /// construction (spec.md §6 "set-gravity: convenience: inserts a
    /// uniform acceleration field").
    pub gravity: Vec3,
    pub particle_particle_collisions: bool,
    /// If true, stepping a particle with no emitter installed and a dead
    /// lifetime is an error rather than a frozen no-op (spec.md §7.2).
    pub strict_missing_emitter: bool,
}

impl SimulatorConfig {
    pub fn default() -> Self {
        Self {
            time_step: 1.0 / 60.0,
            solver: SolverKind::EulerSemi,
            viscous_drag: 0.05,
            gravity: Vec3::new(0.0, -9.81, 0.0),
            particle_particle_collisions: false,
            strict_missing_emitter: false,
        }
    }
}
