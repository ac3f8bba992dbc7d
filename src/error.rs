//! Construction-time and setter-time error kinds (spec.md §7). Step-time
//! numerical faults never reach here: they're absorbed by particle reset
//! inside the stepper.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("time step must be positive, got {0}")]
    NonPositiveTimeStep(f32),

    #[error("particle mass must be positive, got {0}")]
    NonPositiveMass(f32),

    #[error("sphere radius must be positive, got {0}")]
    NonPositiveRadius(f32),

    #[error("viscous drag must be non-negative, got {0}")]
    NegativeViscousDrag(f32),

    #[error("plane normal must be non-zero")]
    DegeneratePlaneNormal,

    #[error("triangle has zero area")]
    DegenerateTriangle,

    #[error("fluid must own at least one particle")]
    EmptyFluid,

    #[error("mesh grid dimensions {rows}x{cols} do not match particle count {count}")]
    MeshGridMismatch {
        rows: usize,
        cols: usize,
        count: usize,
    },

    #[error("no emitter installed for a particle requiring recycling (strict mode)")]
    MissingEmitter,
}

pub type SimResult<T> = Result<T, SimError>;
