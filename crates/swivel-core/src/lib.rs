// swivel-core: machine description, validation, and configuration loading
// for the swivel five-axis kinematics solver.

pub mod config;
pub mod error;
pub mod types;

pub use config::{MachineConfig, MIN_AXIS_LEN};
pub use error::ConfigError;
pub use types::{JointValues, MachineType, RotaryAxis, ToolAxis};
