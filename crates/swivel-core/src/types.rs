//! Core data types describing a five-axis machine.
//!
//! These types are the canonical in-memory representation of a machine's
//! rotary topology, independent of how the description was loaded. Vectors
//! are plain `[f64; 3]` arrays in the machine's world frame; the kinematics
//! crate converts them to nalgebra types at the boundary.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// MachineType
// ---------------------------------------------------------------------------

/// Where the two rotary stages are mounted.
///
/// Documentation/validation metadata only: the solving formulas are shared
/// across all three topologies, and the differences live entirely in which
/// measured offsets of the configuration are nonzero (a table-tilting
/// machine has a zero spindle-swing offset, for example).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MachineType {
    /// Both rotary stages carry the table.
    TableTilting,
    /// Both rotary stages carry the spindle head.
    SpindleTilting,
    /// One stage on the table, one on the spindle head.
    TableSpindleTilting,
}

// ---------------------------------------------------------------------------
// RotaryAxis
// ---------------------------------------------------------------------------

/// Conventional identity of a rotary stage.
///
/// The identity fixes the stage's nominal world direction (A rotates about
/// +X, B about +Y, C about +Z) and which column of its zero-position local
/// basis must align with the rotation axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RotaryAxis {
    A,
    B,
    C,
}

impl RotaryAxis {
    /// Nominal world direction for this identity (A→+X, B→+Y, C→+Z).
    pub const fn nominal_dir(self) -> [f64; 3] {
        match self {
            Self::A => [1.0, 0.0, 0.0],
            Self::B => [0.0, 1.0, 0.0],
            Self::C => [0.0, 0.0, 1.0],
        }
    }

    /// Column of the zero-position local basis that must equal the rotation
    /// axis direction (A→x, B→y, C→z).
    pub const fn basis_column(self) -> usize {
        match self {
            Self::A => 0,
            Self::B => 1,
            Self::C => 2,
        }
    }
}

// ---------------------------------------------------------------------------
// ToolAxis
// ---------------------------------------------------------------------------

/// Nominal (zero-position) direction of the tool axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ToolAxis {
    X,
    Y,
    Z,
}

impl ToolAxis {
    /// Unit world direction for this axis letter.
    pub const fn direction(self) -> [f64; 3] {
        match self {
            Self::X => [1.0, 0.0, 0.0],
            Self::Y => [0.0, 1.0, 0.0],
            Self::Z => [0.0, 0.0, 1.0],
        }
    }
}

// ---------------------------------------------------------------------------
// JointValues
// ---------------------------------------------------------------------------

/// One commanded machine state: linear carriage positions plus the two
/// rotary control angles.
///
/// Control angles are the values as commanded/read for the rotary axes,
/// before the per-axis sign convention is applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JointValues {
    /// X carriage position (world units).
    pub x: f64,
    /// Y carriage position (world units).
    pub y: f64,
    /// Z carriage position (world units).
    pub z: f64,
    /// First-stage control angle (degrees).
    pub angle1_deg: f64,
    /// Second-stage control angle (degrees).
    pub angle2_deg: f64,
}

impl JointValues {
    pub const fn new(x: f64, y: f64, z: f64, angle1_deg: f64, angle2_deg: f64) -> Self {
        Self {
            x,
            y,
            z,
            angle1_deg,
            angle2_deg,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
