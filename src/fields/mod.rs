//! Force fields: objects that, given a particle's state, yield a 3D force
//! vector (spec.md §3, §4.1). Flattened to an enum, the same way as
//! `Geometry` (spec.md §9 DESIGN NOTES), since the set of field kinds is
//! closed and small.

use crate::math::Vec3;

pub enum Field {
    /// Constant acceleration (gravity expressed as acceleration, scaled by
    /// the particle's mass when applied).
    Gravity { acceleration: Vec3 },
    /// A punctual attractor: `F = G · mass_source · mass_particle / d² · û`.
    PointGravity { source: Vec3, mass: f32, g: f32 },
}

impl Field {
    pub fn gravity(acceleration: Vec3) -> Self {
        Field::Gravity { acceleration }
    }

    pub fn point_gravity(source: Vec3, mass: f32) -> Self {
        Field::PointGravity { source, mass, g: 6.674e-11 }
    }

    /// Force contributed to `particle_mass` at `particle_pos`.
    pub fn apply(&self, particle_pos: Vec3, particle_mass: f32) -> Vec3 {
        match self {
            Field::Gravity { acceleration } => *acceleration * particle_mass,
            Field::PointGravity { source, mass, g } => {
                let delta = *source - particle_pos;
                let dist2 = delta.length_squared().max(1e-6);
                let dist = dist2.sqrt();
                let magnitude = g * mass * particle_mass / dist2;
                delta / dist * magnitude
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gravity_scales_with_mass() {
        let field = Field::gravity(Vec3::new(0.0, -9.81, 0.0));
        let f = field.apply(Vec3::ZERO, 2.0);
        assert!((f - Vec3::new(0.0, -19.62, 0.0)).length() < 1e-4);
    }

    #[test]
    fn point_gravity_pulls_toward_source() {
        let field = Field::point_gravity(Vec3::new(10.0, 0.0, 0.0), 1.0e12);
        let f = field.apply(Vec3::ZERO, 1.0);
        assert!(f.x > 0.0);
        assert!(f.y.abs() < 1e-6 && f.z.abs() < 1e-6);
    }
}
