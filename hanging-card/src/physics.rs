pub mod constraint;
pub mod integrator;
mod state;

pub use constraint::{Constraint, TetherForce};
pub use integrator::{StepOutcome, REFERENCE_FRAME_MS, STOP_VELOCITY};
pub use state::PhysicsState;
