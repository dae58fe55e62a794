//! Five-axis CNC kinematics core.
//!
//! Converts between machine joint coordinates (three linear axes plus two
//! rotary stages) and the Cartesian tool-tip position/orientation in the
//! machine's world frame, for table-tilting, spindle-tilting, and mixed
//! machines. The second rotary stage is carried by the first, so its
//! effective axis direction rotates with the first stage's angle.
//!
//! # Architecture
//!
//! ```text
//! MachineConfig ──► MachineFrames ──► KinematicSolver ──► tip pose / linear axes
//! ```
//!
//! [`MachineFrames`] is derived once from a validated
//! [`MachineConfig`](swivel_core::MachineConfig): it normalizes the rotary
//! axis directions (nominal fallback for unmeasured ones) and re-expresses
//! the measured mechanical offsets in each stage's zero-position local
//! frame. The solver then runs pure, allocation-free forward and
//! linear-only inverse solves against the cached frames, safe to call
//! concurrently from a real-time control loop.
//!
//! Non-finite solve inputs (NaN/infinite angles, offsets, targets) are a
//! caller precondition; the hot path does not validate them.

pub mod frames;
pub mod math;
pub mod solver;

pub use frames::MachineFrames;
pub use solver::{KinematicSolver, ToolPose};
