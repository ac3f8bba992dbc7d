// src/particles/agent.rs
use super::Sized;
use crate::geometry::Geometry;
use crate::math::{truncate, Vec3};

/// Bitmask of active steering behaviors (Reynolds, "Steering Behaviors for
/// Autonomous Characters"), combinable with bitwise-or per spec.md §3.
/// A plain bitmask rather than a crate-level `bitflags!` type: the set is
/// small, fixed, and only ever consumed by `Agent`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AgentBehavior(pub u32);

impl AgentBehavior {
    pub const NONE: Self = Self(0);
    pub const SEEK: Self = Self(1 << 0);
    pub const FLEE: Self = Self(1 << 1);
    pub const ARRIVAL: Self = Self(1 << 2);
    pub const COLLISION_AVOIDANCE: Self = Self(1 << 3);
    pub const UNALIGNED_COLLISION_AVOIDANCE: Self = Self(1 << 4);
    pub const WALK_WITH_ME: Self = Self(1 << 5);

    #[inline]
    pub fn contains(&self, b: Self) -> bool {
        (self.0 & b.0) == b.0 && b.0 != 0
    }

    #[inline]
    pub fn set(&mut self, b: Self) {
        self.0 |= b.0;
    }

    #[inline]
    pub fn unset(&mut self, b: Self) {
        self.0 &= !b.0;
    }
}

impl std::ops::BitOr for AgentBehavior {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// A sized particle steered by a weighted combination of Reynolds behaviors
/// (spec.md §3, §9 REDESIGN FLAGS). Its `starttime` (inherited through
/// `sized.free`) is ignored by the stepper; its `lifetime` is not.
#[derive(Clone, Copy, Debug)]
pub struct Agent {
    pub sized: Sized,
    pub target: Vec3,
    pub orientation: Vec3,
    pub behavior: AgentBehavior,
    pub max_speed: f32,
    pub max_force: f32,
    pub align_weight: f32,
    pub seek_weight: f32,
    pub flee_weight: f32,
    pub arrival_weight: f32,
    pub arrival_distance: f32,
    pub coll_weight: f32,
    pub coll_distance: f32,
    pub ucoll_weight: f32,
    pub ucoll_distance: f32,
    pub wow_weight: f32,
    pub wow_distance: f32,
}

impl Agent {
    pub fn new(pos: Vec3, vel: Vec3, mass: f32, radius: f32) -> Self {
        let w = 1.0 / 7.0;
        Self {
            sized: Sized::new(pos, vel, mass, radius),
            target: Vec3::ZERO,
            orientation: vel.normalize_or_zero(),
            behavior: AgentBehavior::NONE,
            max_speed: 1.0,
            max_force: 1.0,
            align_weight: w,
            seek_weight: w,
            flee_weight: w,
            arrival_weight: w,
            arrival_distance: 0.0,
            coll_weight: w,
            coll_distance: 5.0,
            ucoll_weight: w,
            ucoll_distance: 5.0,
            wow_weight: w,
            wow_distance: 5.0,
        }
    }
}

impl Agent {
    #[inline]
    fn pos(&self) -> Vec3 {
        self.sized.free.base.cur_pos
    }

    #[inline]
    fn vel(&self) -> Vec3 {
        self.sized.free.base.cur_vel
    }

    /// Reynolds seek: steer toward `target` at `max_speed` (agent_particle.hpp
    /// §"seek_behaviour").
    fn seek_force(&self) -> Vec3 {
        let desired = (self.target - self.pos()).normalize_or_zero() * self.max_speed;
        desired - self.vel()
    }

    /// Reynolds flee: the mirror image of seek, steering away from `target`.
    fn flee_force(&self) -> Vec3 {
        let desired = (self.pos() - self.target).normalize_or_zero() * self.max_speed;
        desired - self.vel()
    }

    /// Reynolds arrival: seek, but the desired speed ramps down to zero
    /// inside `arrival_distance` of the target.
    fn arrival_force(&self) -> Vec3 {
        let to_target = self.target - self.pos();
        let dist = to_target.length();
        let speed = if self.arrival_distance > 1e-6 && dist < self.arrival_distance {
            self.max_speed * (dist / self.arrival_distance)
        } else {
            self.max_speed
        };
        let desired = to_target.normalize_or_zero() * speed;
        desired - self.vel()
    }

    /// Obstacle avoidance against static scene geometry (agent_particle.hpp
    /// §"collision_avoidance_behaviour"): projects an "ahead" point along
    /// the current velocity and steers away from any geometry whose
    /// approximate surface point falls within the agent's radius of it.
    fn collision_avoidance_force(&self, scene: &[Geometry]) -> Vec3 {
        let heading = self.vel().normalize_or_zero();
        if heading.length_squared() < 1e-12 {
            return Vec3::ZERO;
        }
        let ahead = self.pos() + heading * self.coll_distance;
        let mut steer = Vec3::ZERO;
        for g in scene {
            let closest = g.closest_point(ahead);
            let delta = ahead - closest;
            let dist = delta.length();
            if dist < self.sized.radius {
                steer += delta.normalize_or_zero() * (self.sized.radius - dist);
            }
        }
        steer
    }

    /// Unaligned collision avoidance against other agents (agent_particle.hpp
    /// §"unaligned_collision_avoidance_behaviour"): steers away from any
    /// agent within `ucoll_distance` that lies in this agent's forward
    /// field of view.
    fn unaligned_collision_avoidance_force(&self, agents: &[Agent], self_index: usize) -> Vec3 {
        let heading = self.vel().normalize_or_zero();
        if heading.length_squared() < 1e-12 {
            return Vec3::ZERO;
        }
        let mut steer = Vec3::ZERO;
        for (j, other) in agents.iter().enumerate() {
            if j == self_index {
                continue;
            }
            let delta = other.pos() - self.pos();
            let surface_dist = delta.length() - self.sized.radius - other.sized.radius;
            if surface_dist > self.ucoll_distance {
                continue;
            }
            let dir = delta.normalize_or_zero();
            if heading.dot(dir) < 0.0 {
                continue;
            }
            steer -= dir * (self.ucoll_distance - surface_dist).max(0.0);
        }
        steer
    }

    /// "Walk with me" (agent_particle.hpp §"wwm_behaviour"): steers this
    /// agent's velocity toward the average velocity of nearby agents ahead
    /// of it, within `wow_distance` and its forward field of view.
    fn walk_with_me_force(&self, agents: &[Agent], self_index: usize) -> Vec3 {
        let heading = self.vel().normalize_or_zero();
        let mut sum = Vec3::ZERO;
        let mut count = 0u32;
        for (j, other) in agents.iter().enumerate() {
            if j == self_index {
                continue;
            }
            let delta = other.pos() - self.pos();
            let surface_dist = delta.length() - self.sized.radius - other.sized.radius;
            if surface_dist > self.wow_distance {
                continue;
            }
            if heading.length_squared() > 1e-12 && heading.dot(delta.normalize_or_zero()) < 0.0 {
                continue;
            }
            sum += other.vel();
            count += 1;
        }
        if count == 0 {
            return Vec3::ZERO;
        }
        sum / count as f32 - self.vel()
    }

    /// Weighted combination of every active behavior (agent_particle.hpp
    /// §"apply_behaviours"), truncated to `max_force` (spec.md §9 REDESIGN
    /// FLAGS: agents steer before colliding with scene geometry, so this
    /// runs ahead of the stepper's collision pass).
    pub fn steering_force(&self, scene: &[Geometry], agents: &[Agent], self_index: usize) -> Vec3 {
        let mut total = Vec3::ZERO;
        if self.behavior.contains(AgentBehavior::SEEK) {
            total += self.seek_force() * self.seek_weight;
        }
        if self.behavior.contains(AgentBehavior::FLEE) {
            total += self.flee_force() * self.flee_weight;
        }
        if self.behavior.contains(AgentBehavior::ARRIVAL) {
            total += self.arrival_force() * self.arrival_weight;
        }
        if self.behavior.contains(AgentBehavior::COLLISION_AVOIDANCE) {
            total += self.collision_avoidance_force(scene) * self.coll_weight;
        }
        if self.behavior.contains(AgentBehavior::UNALIGNED_COLLISION_AVOIDANCE) {
            total += self.unaligned_collision_avoidance_force(agents, self_index) * self.ucoll_weight;
        }
        if self.behavior.contains(AgentBehavior::WALK_WITH_ME) {
            total += self.walk_with_me_force(agents, self_index) * self.wow_weight;
        }
        truncate(total, self.max_force)
    }

    /// Rotates `orientation` a fraction (`align_weight`) of the way toward
    /// the current velocity direction, then renormalizes (original
    /// `_simulate_agent_particles`'s end-of-step orientation update).
    pub fn update_orientation(&mut self) {
        let alignment = (self.vel() - self.orientation).normalize_or_zero();
        self.orientation = (self.orientation + alignment * self.align_weight).normalize_or_zero();
    }
}

impl Default for Agent {
    fn default() -> Self {
        Self::new(Vec3::ZERO, Vec3::ZERO, 1.0, 1.0)
    }
}
