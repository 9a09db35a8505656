pub mod config;
pub mod formats;
pub mod input;
pub mod math;
pub mod physics;
pub mod scheduler;
pub mod transform;

pub use config::{ConfigError, DeviceClass, PhysicsConfig, ViewportHint};
pub use input::NudgeDirection;
pub use physics::PhysicsState;
pub use scheduler::{FrameHost, HangingCard, ManualHost, SimulationMode, TickHandle};
pub use transform::{CardTransform, TetherGeometry};

/// Host clock reading, in milliseconds.
pub type Timestamp = f64;
