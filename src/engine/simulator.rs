// src/engine/simulator.rs
use super::collision::{free_view, resolve_pair};
use super::solver::{accumulate_field_forces, integrate, is_degenerate};
use super::{SimulatorConfig, SolverKind};
use crate::emitters::Emitter;
use crate::error::{SimError, SimResult};
use crate::fields::Field;
use crate::fluid::NewtonianFluid;
use crate::geometry::Geometry;
use crate::math::Vec3;
use crate::meshes::Mesh;
use crate::particles::{Agent, Free, Sized};

/// Fluid-particle collision attributes are not configurable per spec.md
/// §4.6 step 7 ("small bounce, friction proportional to viscosity"),
/// grounded in `original_source/physim/fluids/newtonian.cpp`'s hardcoded
/// `coll_pred.bouncing = 0.1f` / `coll_pred.friction = viscosity / 50000.0f`.
const FLUID_BOUNCE: f32 = 0.1;
const FLUID_FRICTION_DIVISOR: f32 = 50_000.0;

/// Owns the whole scene (spec.md §3 "Scene ownership") and implements the
/// stepper's public contract (spec.md §4.1, §6). Generalized from the
/// teacher's `engine::simulation::Simulation`, which owns a single cloth
/// plus a fixed set of colliders, to own heterogeneous populations keyed by
/// kind.
pub struct Simulator {
    config: SimulatorConfig,
    sized: Vec<Sized>,
    agents: Vec<Agent>,
    free: Vec<Free>,
    meshes: Vec<Mesh>,
    fluids: Vec<NewtonianFluid>,
    geometries: Vec<Geometry>,
    fields: Vec<Field>,
    free_emitter: Option<Emitter>,
    sized_emitter: Option<Emitter>,
}

impl Simulator {
    pub fn new(config: SimulatorConfig) -> Self {
        let gravity = config.gravity;
        let mut sim = Self {
            config,
            sized: Vec::new(),
            agents: Vec::new(),
            free: Vec::new(),
            meshes: Vec::new(),
            fluids: Vec::new(),
            geometries: Vec::new(),
            fields: Vec::new(),
            free_emitter: None,
            sized_emitter: None,
        };
        sim.fields.push(Field::gravity(gravity));
        sim
    }

    // ---- construction / insertion (spec.md §4.1, §6) ----

    /// Appends a free particle, assigning its index and, under Verlet,
    /// backfilling `prev_pos` (spec.md §4.1 "add_free_particle").
    pub fn add_free_particle(&mut self, mut p: Free) -> SimResult<usize> {
        if p.base.mass <= 0.0 {
            return Err(SimError::NonPositiveMass(p.base.mass));
        }
        let index = self.free.len();
        p.base.index = index;
        if self.config.solver == SolverKind::Verlet {
            p.base.seed_prev_pos_for_verlet(self.config.time_step);
        }
        self.free.push(p);
        Ok(index)
    }

    pub fn add_sized_particle(&mut self, mut p: Sized) -> SimResult<usize> {
        if p.free.base.mass <= 0.0 {
            return Err(SimError::NonPositiveMass(p.free.base.mass));
        }
        if p.radius <= 0.0 {
            return Err(SimError::NonPositiveRadius(p.radius));
        }
        let index = self.sized.len();
        p.free.base.index = index;
        if self.config.solver == SolverKind::Verlet {
            p.free.base.seed_prev_pos_for_verlet(self.config.time_step);
        }
        self.sized.push(p);
        Ok(index)
    }

    pub fn add_agent_particle(&mut self, mut p: Agent) -> SimResult<usize> {
        if p.sized.free.base.mass <= 0.0 {
            return Err(SimError::NonPositiveMass(p.sized.free.base.mass));
        }
        if p.sized.radius <= 0.0 {
            return Err(SimError::NonPositiveRadius(p.sized.radius));
        }
        let index = self.agents.len();
        p.sized.free.base.index = index;
        self.agents.push(p);
        Ok(index)
    }

    /// Bulk insert via the installed free emitter, or `Emitter::constant()`
    /// if none is installed yet (spec.md §4.1 "add_free_particles(n)").
    pub fn add_free_particles(&mut self, n: usize) -> SimResult<()> {
        let fallback = Emitter::constant();
        let emitter = self.free_emitter.as_ref().unwrap_or(&fallback);
        for _ in 0..n {
            let index = self.free.len();
            let mut p = emitter.init_free(index);
            if self.config.solver == SolverKind::Verlet {
                p.base.seed_prev_pos_for_verlet(self.config.time_step);
            }
            self.free.push(p);
        }
        Ok(())
    }

    pub fn add_sized_particles(&mut self, n: usize) -> SimResult<()> {
        let fallback = Emitter::constant();
        let emitter = self.sized_emitter.as_ref().unwrap_or(&fallback);
        for _ in 0..n {
            let index = self.sized.len();
            let mut p = emitter.init_sized(index);
            if self.config.solver == SolverKind::Verlet {
                p.free.base.seed_prev_pos_for_verlet(self.config.time_step);
            }
            self.sized.push(p);
        }
        Ok(())
    }

    pub fn add_geometry(&mut self, g: Geometry) {
        self.geometries.push(g);
    }

    pub fn add_field(&mut self, f: Field) {
        self.fields.push(f);
    }

    pub fn add_mesh(&mut self, m: Mesh) {
        self.meshes.push(m);
    }

    pub fn add_fluid(&mut self, fl: NewtonianFluid) -> SimResult<()> {
        if fl.particles.is_empty() {
            return Err(SimError::EmptyFluid);
        }
        self.fluids.push(fl);
        Ok(())
    }

    // ---- teardown (spec.md §4.1 "clear_*, reset_simulation") ----

    pub fn clear_free(&mut self) {
        self.free.clear();
    }

    pub fn clear_sized(&mut self) {
        self.sized.clear();
    }

    pub fn clear_agents(&mut self) {
        self.agents.clear();
    }

    pub fn clear_meshes(&mut self) {
        self.meshes.clear();
    }

    pub fn clear_fluids(&mut self) {
        self.fluids.clear();
    }

    pub fn clear_simulation(&mut self) {
        self.clear_free();
        self.clear_sized();
        self.clear_agents();
        self.clear_meshes();
        self.clear_fluids();
        self.geometries.clear();
    }

    /// Re-runs the installed emitter on every non-fixed free particle,
    /// leaving index assignment and population size unchanged.
    pub fn reset_simulation(&mut self) -> SimResult<()> {
        let fallback = Emitter::constant();
        let emitter = self.free_emitter.as_ref().unwrap_or(&fallback);
        for p in self.free.iter_mut() {
            if p.fixed {
                continue;
            }
            let index = p.base.index;
            *p = emitter.init_free(index);
        }
        Ok(())
    }

    // ---- tuning (spec.md §6) ----

    pub fn set_time_step(&mut self, dt: f32) -> SimResult<()> {
        if dt <= 0.0 {
            return Err(SimError::NonPositiveTimeStep(dt));
        }
        self.config.time_step = dt;
        Ok(())
    }

    pub fn set_solver(&mut self, solver: SolverKind) {
        self.config.solver = solver;
    }

    pub fn set_viscous_drag(&mut self, drag: f32) -> SimResult<()> {
        if drag < 0.0 {
            return Err(SimError::NegativeViscousDrag(drag));
        }
        self.config.viscous_drag = drag;
        Ok(())
    }

    /// Convenience: rewrites the first `Field::Gravity` in place, or
    /// appends one if none exists yet (spec.md §6 "set-gravity", SPEC_FULL
    /// §4 supplemented-features note).
    pub fn set_gravity_acceleration(&mut self, a: Vec3) {
        self.config.gravity = a;
        for f in self.fields.iter_mut() {
            if let Field::Gravity { acceleration } = f {
                *acceleration = a;
                return;
            }
        }
        self.fields.push(Field::gravity(a));
    }

    pub fn set_particle_particle_collisions(&mut self, enabled: bool) {
        self.config.particle_particle_collisions = enabled;
    }

    pub fn set_free_emitter(&mut self, e: Emitter) {
        self.free_emitter = Some(e);
    }

    pub fn set_sized_emitter(&mut self, e: Emitter) {
        self.sized_emitter = Some(e);
    }

    // ---- accessors (spec.md §4.1, §6) ----

    pub fn free_particles(&self) -> &[Free] {
        &self.free
    }

    pub fn sized_particles(&self) -> &[Sized] {
        &self.sized
    }

    pub fn agent_particles(&self) -> &[Agent] {
        &self.agents
    }

    pub fn meshes(&self) -> &[Mesh] {
        &self.meshes
    }

    pub fn fluids(&self) -> &[NewtonianFluid] {
        &self.fluids
    }

    pub fn geometries(&self) -> &[Geometry] {
        &self.geometries
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn time_step(&self) -> f32 {
        self.config.time_step
    }

    pub fn particle_particle_collisions_enabled(&self) -> bool {
        self.config.particle_particle_collisions
    }

    // ---- stepping (spec.md §4.1, §5) ----

    pub fn apply_time_step(&mut self) -> SimResult<()> {
        self.apply_time_step_with_workers(1)
    }

    /// Advances the whole scene by `Δt`, in the fixed per-kind order sized
    /// → agent → free → mesh → fluid (spec.md §4.1, §5).
    pub fn apply_time_step_with_workers(&mut self, worker_count: usize) -> SimResult<()> {
        let _step_span = tracing::debug_span!("step", dt = self.config.time_step).entered();
        let dt = self.config.time_step;

        {
            let _span = tracing::debug_span!("sized").entered();
            self.step_sized(dt)?;
        }
        {
            let _span = tracing::debug_span!("agents").entered();
            self.step_agents(dt);
        }
        {
            let _span = tracing::debug_span!("free").entered();
            self.step_free(dt)?;
        }
        {
            let _span = tracing::debug_span!("meshes").entered();
            self.step_meshes(dt);
        }
        {
            let _span = tracing::debug_span!("fluids").entered();
            self.step_fluids(dt, worker_count);
        }
        Ok(())
    }

    fn step_sized(&mut self, dt: f32) -> SimResult<()> {
        let n = self.sized.len();
        let mut predicted: Vec<Option<(Vec3, Vec3, bool)>> = vec![None; n];

        for i in 0..n {
            if self.sized[i].free.fixed {
                continue;
            }
            if self.sized[i].free.lifetime <= 0.0 {
                self.reinit_sized(i)?;
                continue;
            }
            self.sized[i].free.starttime -= dt;
            if self.sized[i].free.starttime > 0.0 {
                continue;
            }

            // Work on a local copy (`Sized` is `Copy`); only the final
            // commit pass writes back into `self.sized`.
            let mut item = self.sized[i];
            item.free.base.zero_force();
            item.free.base.force = accumulate_field_forces(
                item.free.base.cur_pos,
                item.free.base.cur_vel,
                item.free.base.mass,
                &self.fields,
                self.config.viscous_drag,
            );
            item.free.lifetime -= dt;
            self.sized[i] = item;

            let (mut pred_pos, mut pred_vel) = integrate(&item.free.base, self.config.solver, dt);
            if is_degenerate(pred_pos) || is_degenerate(pred_vel) {
                self.reinit_sized(i)?;
                continue;
            }

            let mut collided = false;
            let radius = item.radius;
            let bounce = item.free.bouncing;
            let friction = item.free.friction;
            let cur_vel = item.free.base.cur_vel;
            for g in &self.geometries {
                if let Some((new_pos, new_vel)) = g.resolve_sphere(pred_pos, pred_vel, cur_vel, radius, bounce, friction) {
                    pred_pos = new_pos;
                    pred_vel = new_vel;
                    collided = true;
                }
            }
            predicted[i] = Some((pred_pos, pred_vel, collided));
        }

        if self.config.particle_particle_collisions {
            for i in 0..n {
                let Some((mut pos_i, mut vel_i, _)) = predicted[i] else { continue };
                for j in 0..i {
                    let Some((pos_j, vel_j, _)) = predicted[j] else { continue };
                    if let Some((npi, nvi, npj, nvj)) = resolve_pair(
                        pos_i,
                        vel_i,
                        self.sized[i].free.base.mass,
                        self.sized[i].free.bouncing,
                        self.sized[i].radius,
                        pos_j,
                        vel_j,
                        self.sized[j].free.base.mass,
                        self.sized[j].free.bouncing,
                        self.sized[j].radius,
                    ) {
                        pos_i = npi;
                        vel_i = nvi;
                        if let Some((_, _, c)) = predicted[j].as_mut() {
                            predicted[j] = Some((npj, nvj, *c));
                        }
                    }
                }
                if let Some((_, _, c)) = predicted[i].as_mut() {
                    predicted[i] = Some((pos_i, vel_i, *c));
                }
            }
        }

        for i in 0..n {
            if let Some((pos, vel, collided)) = predicted[i] {
                let base = &mut self.sized[i].free.base;
                base.prev_pos = base.cur_pos;
                base.cur_pos = pos;
                base.cur_vel = vel;
                if collided && self.config.solver == SolverKind::Verlet {
                    base.prev_pos = pos - vel * dt;
                }
            }
        }
        Ok(())
    }

    fn reinit_sized(&mut self, index: usize) -> SimResult<bool> {
        match &self.sized_emitter {
            Some(e) => {
                let mut p = e.init_sized(index);
                p.free.base.index = index;
                self.sized[index] = p;
                Ok(true)
            }
            None if self.config.strict_missing_emitter => Err(SimError::MissingEmitter),
            None => {
                self.sized[index].free.fixed = true;
                Ok(false)
            }
        }
    }

    fn reinit_free(&mut self, index: usize) -> SimResult<bool> {
        match &self.free_emitter {
            Some(e) => {
                let mut p = e.init_free(index);
                p.base.index = index;
                self.free[index] = p;
                Ok(true)
            }
            None if self.config.strict_missing_emitter => Err(SimError::MissingEmitter),
            None => {
                self.free[index].fixed = true;
                Ok(false)
            }
        }
    }

    fn step_agents(&mut self, dt: f32) {
        let n = self.agents.len();

        // Pass 1: every agent's steering force, against a stable snapshot
        // of the whole population (original `sim_agent_particles.cpp`
        // always computes every agent's behavior before moving any of
        // them).
        let mut force = vec![Vec3::ZERO; n];
        for i in 0..n {
            if self.agents[i].sized.free.fixed || self.agents[i].sized.free.lifetime <= 0.0 {
                continue;
            }
            force[i] = self.agents[i].steering_force(&self.geometries, &self.agents, i);
        }

        // Pass 2: integrate, collide, commit, reorient. Agents always use
        // semi-implicit Euler regardless of `config.solver` (original
        // source hardcodes it; see DESIGN.md).
        for i in 0..n {
            if self.agents[i].sized.free.fixed {
                continue;
            }
            if self.agents[i].sized.free.lifetime <= 0.0 {
                self.agents[i].sized.free.fixed = true;
                continue;
            }
            self.agents[i].sized.free.lifetime -= dt;

            let base = &self.agents[i].sized.free.base;
            let accel = force[i] / base.mass;
            let pred_vel = base.cur_vel + accel * dt;
            let mut pred_pos = base.cur_pos + pred_vel * dt;
            let mut pred_vel = pred_vel;

            if is_degenerate(pred_pos) || is_degenerate(pred_vel) {
                self.agents[i].sized.free.fixed = true;
                continue;
            }

            let radius = self.agents[i].sized.radius;
            let bounce = self.agents[i].sized.free.bouncing;
            let friction = self.agents[i].sized.free.friction;
            let cur_vel = self.agents[i].sized.free.base.cur_vel;
            for g in &self.geometries {
                if let Some((new_pos, new_vel)) = g.resolve_sphere(pred_pos, pred_vel, cur_vel, radius, bounce, friction) {
                    pred_pos = new_pos;
                    pred_vel = new_vel;
                }
            }

            let base = &mut self.agents[i].sized.free.base;
            base.prev_pos = base.cur_pos;
            base.cur_pos = pred_pos;
            base.cur_vel = pred_vel;
            self.agents[i].update_orientation();
        }
    }

    fn step_free(&mut self, dt: f32) -> SimResult<()> {
        let n = self.free.len();
        let mut predicted: Vec<Option<(Vec3, Vec3, bool)>> = vec![None; n];

        for i in 0..n {
            if self.free[i].fixed {
                continue;
            }
            if self.free[i].lifetime <= 0.0 {
                self.reinit_free(i)?;
                continue;
            }
            self.free[i].starttime -= dt;
            if self.free[i].starttime > 0.0 {
                continue;
            }

            let p = &mut self.free[i];
            p.base.zero_force();
            p.base.force = accumulate_field_forces(p.base.cur_pos, p.base.cur_vel, p.base.mass, &self.fields, self.config.viscous_drag);
            p.lifetime -= dt;

            let (mut pred_pos, mut pred_vel) = integrate(&p.base, self.config.solver, dt);
            if is_degenerate(pred_pos) || is_degenerate(pred_vel) {
                self.reinit_free(i)?;
                continue;
            }

            let cur_pos = self.free[i].base.cur_pos;
            let cur_vel = self.free[i].base.cur_vel;
            let mut collided = false;
            for g in &self.geometries {
                if let Some((new_pos, new_vel)) = g.resolve_free(cur_pos, pred_pos, pred_vel, cur_vel, &self.free[i]) {
                    pred_pos = new_pos;
                    pred_vel = new_vel;
                    collided = true;
                }
            }
            predicted[i] = Some((pred_pos, pred_vel, collided));
        }

        if self.config.particle_particle_collisions {
            for i in 0..n {
                let Some((mut pos_i, mut vel_i, _)) = predicted[i] else { continue };
                for j in 0..i {
                    let Some((pos_j, vel_j, _)) = predicted[j] else { continue };
                    if let Some((npi, nvi, npj, nvj)) = resolve_pair(
                        pos_i,
                        vel_i,
                        self.free[i].base.mass,
                        self.free[i].bouncing,
                        0.0,
                        pos_j,
                        vel_j,
                        self.free[j].base.mass,
                        self.free[j].bouncing,
                        0.0,
                    ) {
                        pos_i = npi;
                        vel_i = nvi;
                        if let Some((_, _, c)) = predicted[j].as_mut() {
                            predicted[j] = Some((npj, nvj, *c));
                        }
                    }
                }
                if let Some((_, _, c)) = predicted[i].as_mut() {
                    predicted[i] = Some((pos_i, vel_i, *c));
                }
            }
        }

        for i in 0..n {
            if let Some((pos, vel, collided)) = predicted[i] {
                let base = &mut self.free[i].base;
                base.prev_pos = base.cur_pos;
                base.cur_pos = pos;
                base.cur_vel = vel;
                if collided && self.config.solver == SolverKind::Verlet {
                    base.prev_pos = pos - vel * dt;
                }
            }
        }
        Ok(())
    }

    /// Steps every mesh's particles as free particles, with internal spring
    /// forces accumulated before field forces (spec.md §4.5).
    fn step_meshes(&mut self, dt: f32) {
        for mesh in self.meshes.iter_mut() {
            for p in mesh.particles_mut() {
                p.base.zero_force();
            }
            mesh.accumulate_forces();

            let bounce = mesh.bounce();
            let friction = mesh.friction();
            let n = mesh.particles().len();

            for i in 0..n {
                if mesh.particles()[i].fixed {
                    continue;
                }
                let base = mesh.particles()[i].base;
                let mut base = base;
                base.force += accumulate_field_forces(base.cur_pos, base.cur_vel, base.mass, &self.fields, self.config.viscous_drag);

                let (mut pred_pos, mut pred_vel) = integrate(&base, self.config.solver, dt);
                if is_degenerate(pred_pos) || is_degenerate(pred_vel) {
                    continue;
                }

                let view = free_view(base, bounce, friction);
                let mut collided = false;
                for g in &self.geometries {
                    if let Some((new_pos, new_vel)) = g.resolve_free(base.cur_pos, pred_pos, pred_vel, base.cur_vel, &view) {
                        pred_pos = new_pos;
                        pred_vel = new_vel;
                        collided = true;
                    }
                }

                let node = &mut mesh.particles_mut()[i];
                node.base.prev_pos = node.base.cur_pos;
                node.base.cur_pos = pred_pos;
                node.base.cur_vel = pred_vel;
                if collided && self.config.solver == SolverKind::Verlet {
                    node.base.prev_pos = pred_pos - pred_vel * dt;
                }
            }
        }
    }

    /// Runs each fluid's SPH pass, then fields/drag, integration, and
    /// geometry collision through the shared free-particle path (spec.md
    /// §4.6 step 7).
    fn step_fluids(&mut self, dt: f32, worker_count: usize) {
        for fluid in self.fluids.iter_mut() {
            #[cfg(feature = "parallel")]
            if worker_count > 1 {
                fluid.step_parallel(worker_count);
            } else {
                fluid.step_sequential();
            }
            #[cfg(not(feature = "parallel"))]
            {
                let _ = worker_count;
                fluid.step_sequential();
            }

            let friction = fluid.viscosity / FLUID_FRICTION_DIVISOR;
            let n = fluid.particles.len();
            for i in 0..n {
                let mut base = fluid.particles[i].base;
                base.force += accumulate_field_forces(base.cur_pos, base.cur_vel, base.mass, &self.fields, self.config.viscous_drag);

                let (mut pred_pos, mut pred_vel) = integrate(&base, self.config.solver, dt);
                if is_degenerate(pred_pos) || is_degenerate(pred_vel) {
                    continue;
                }

                let view = free_view(base, FLUID_BOUNCE, friction);
                let mut collided = false;
                for g in &self.geometries {
                    if let Some((new_pos, new_vel)) = g.resolve_free(base.cur_pos, pred_pos, pred_vel, base.cur_vel, &view) {
                        pred_pos = new_pos;
                        pred_vel = new_vel;
                        collided = true;
                    }
                }

                let node = &mut fluid.particles[i];
                node.base.prev_pos = node.base.cur_pos;
                node.base.cur_pos = pred_pos;
                node.base.cur_vel = pred_vel;
                if collided && self.config.solver == SolverKind::Verlet {
                    node.base.prev_pos = pred_pos - pred_vel * dt;
                }
            }
        }
    }
}

impl Default for Simulator {
    fn default() -> Self {
        Self::new(SimulatorConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Plane;
    use crate::math::Vec3;

    fn floor_sim() -> Simulator {
        let mut sim = Simulator::new(SimulatorConfig {
            time_step: 0.01,
            solver: SolverKind::EulerSemi,
            viscous_drag: 0.0,
            gravity: Vec3::new(0.0, -9.81, 0.0),
            particle_particle_collisions: false,
            strict_missing_emitter: false,
        });
        sim.add_geometry(Geometry::Plane(Plane::new(Vec3::new(0.0, 1.0, 0.0), 0.0).unwrap()));
        sim
    }

    #[test]
    fn free_particle_falls_and_bounces_off_floor() {
        let mut sim = floor_sim();
        let mut p = Free::new(Vec3::new(0.0, 10.0, 0.0), Vec3::ZERO, 1.0);
        p.bouncing = 0.8;
        p.friction = 0.0;
        p.lifetime = f32::INFINITY;
        sim.add_free_particle(p).unwrap();

        let mut saw_upward_velocity = false;
        for _ in 0..2000 {
            sim.apply_time_step().unwrap();
            if sim.free_particles()[0].base.cur_vel.y > 0.0 {
                saw_upward_velocity = true;
            }
        }
        assert!(saw_upward_velocity, "particle never rebounded off the floor");
        assert!(sim.free_particles()[0].base.cur_pos.y > -1e-3);
    }

    #[test]
    fn fixed_free_particle_never_moves() {
        let mut sim = floor_sim();
        let mut p = Free::new(Vec3::new(0.0, 5.0, 0.0), Vec3::ZERO, 1.0);
        p.fixed = true;
        sim.add_free_particle(p).unwrap();
        for _ in 0..10 {
            sim.apply_time_step().unwrap();
        }
        assert_eq!(sim.free_particles()[0].base.cur_pos, Vec3::new(0.0, 5.0, 0.0));
    }

    #[test]
    fn set_gravity_acceleration_rewrites_in_place() {
        let mut sim = floor_sim();
        let before = sim.fields().len();
        sim.set_gravity_acceleration(Vec3::new(0.0, -1.0, 0.0));
        assert_eq!(sim.fields().len(), before);
    }

    #[test]
    fn particle_particle_collision_separates_overlapping_free_particles() {
        let mut sim = floor_sim();
        sim.set_gravity_acceleration(Vec3::ZERO);
        sim.set_particle_particle_collisions(true);
        let mut a = Free::new(Vec3::new(-0.05, 5.0, 0.0), Vec3::new(1.0, 0.0, 0.0), 1.0);
        a.lifetime = f32::INFINITY;
        let mut b = Free::new(Vec3::new(0.05, 5.0, 0.0), Vec3::new(-1.0, 0.0, 0.0), 1.0);
        b.lifetime = f32::INFINITY;
        sim.add_free_particle(a).unwrap();
        sim.add_free_particle(b).unwrap();
        sim.apply_time_step().unwrap();
        let dist = (sim.free_particles()[0].base.cur_pos - sim.free_particles()[1].base.cur_pos).length();
        assert!(dist > 0.0);
    }
}
