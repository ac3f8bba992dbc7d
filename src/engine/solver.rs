// src/engine/solver.rs
use super::SolverKind;
use crate::fields::Field;
use crate::math::Vec3;
use crate::particles::Base;

/// Predicts `(pos, vel)` one `dt` ahead from `base.force`, per the chosen
/// integrator (spec.md §4.1, grounded in `physim/sim_solver.cpp`'s
/// `apply_solver`).
pub fn integrate(base: &Base, solver: SolverKind, dt: f32) -> (Vec3, Vec3) {
    let accel = base.acceleration();
    match solver {
        SolverKind::EulerOrig => {
            let pred_pos = base.cur_pos + base.cur_vel * dt;
            let pred_vel = base.cur_vel + accel * dt;
            (pred_pos, pred_vel)
        }
        SolverKind::EulerSemi => {
            let pred_vel = base.cur_vel + accel * dt;
            let pred_pos = base.cur_pos + pred_vel * dt;
            (pred_pos, pred_vel)
        }
        SolverKind::Verlet => {
            let pred_pos = 2.0 * base.cur_pos - base.prev_pos + accel * dt * dt;
            let pred_vel = (pred_pos - base.cur_pos) / dt;
            (pred_pos, pred_vel)
        }
    }
}

/// Sums every force field's contribution plus uniform viscous drag
/// (spec.md §4.1 step 4, grounded in `sim_solver.cpp`'s `compute_forces`).
pub fn accumulate_field_forces(pos: Vec3, vel: Vec3, mass: f32, fields: &[Field], viscous_drag: f32) -> Vec3 {
    let mut force = Vec3::ZERO;
    for f in fields {
        force += f.apply(pos, mass);
    }
    force - viscous_drag * vel
}

/// `true` if any component of `v` is NaN or infinite (spec.md §7.4's
/// per-step numerical guard).
#[inline]
pub fn is_degenerate(v: Vec3) -> bool {
    !v.is_finite()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::particles::Base;

    #[test]
    fn euler_orig_uses_cur_vel_for_position() {
        let mut base = Base::new(Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0), 1.0);
        base.force = Vec3::new(0.0, -10.0, 0.0);
        let (pos, vel) = integrate(&base, SolverKind::EulerOrig, 0.1);
        assert!((pos.x - 0.1).abs() < 1e-6);
        assert!((vel.y - (-1.0)).abs() < 1e-5);
    }

    #[test]
    fn euler_semi_uses_predicted_vel_for_position() {
        let mut base = Base::new(Vec3::ZERO, Vec3::ZERO, 1.0);
        base.force = Vec3::new(0.0, -10.0, 0.0);
        let (pos, vel) = integrate(&base, SolverKind::EulerSemi, 0.1);
        assert!((vel.y - (-1.0)).abs() < 1e-5);
        assert!((pos.y - (-0.1)).abs() < 1e-5);
    }

    #[test]
    fn verlet_reproduces_seeded_velocity_on_first_step() {
        let dt = 0.1;
        let mut base = Base::new(Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0), 1.0);
        base.seed_prev_pos_for_verlet(dt);
        let (_, vel) = integrate(&base, SolverKind::Verlet, dt);
        assert!((vel - base.cur_vel).length() < 1e-5);
    }
}
