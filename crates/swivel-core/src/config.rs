//! Machine configuration: the static description of a five-axis machine's
//! rotary topology, measured offsets, and tool geometry.
//!
//! All offsets and directions are measured in the world frame with both
//! rotary angles at zero (the machine's zero position). The kinematics
//! crate derives its cached solver state from a validated [`MachineConfig`];
//! reconfiguration means building that state again from a new config.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::{MachineType, RotaryAxis, ToolAxis};

/// Axis directions shorter than this are treated as degenerate.
pub const MIN_AXIS_LEN: f64 = 1e-12;

// ---------------------------------------------------------------------------
// Serde default functions
// ---------------------------------------------------------------------------

const fn default_machine_type() -> MachineType {
    MachineType::TableTilting
}
const fn default_axis1() -> RotaryAxis {
    RotaryAxis::C
}
const fn default_axis2() -> RotaryAxis {
    RotaryAxis::A
}
const fn default_sign() -> i8 {
    1
}
const fn default_vec3() -> [f64; 3] {
    [0.0; 3]
}
const fn default_tool_dir() -> ToolAxis {
    ToolAxis::Z
}

// ---------------------------------------------------------------------------
// MachineConfig
// ---------------------------------------------------------------------------

/// Static description of a five-axis machine.
///
/// `axis2` is the child stage: it is mounted on `axis1`, so its effective
/// axis direction rotates with the first stage during solving.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MachineConfig {
    /// Rotary topology (default: TABLE_TILTING). Metadata only; it does not
    /// change the solving formula.
    #[serde(default = "default_machine_type")]
    pub machine_type: MachineType,

    /// Identity of the first (carrier) rotary stage (default: C).
    #[serde(default = "default_axis1")]
    pub axis1: RotaryAxis,

    /// Identity of the second (child) rotary stage (default: A).
    #[serde(default = "default_axis2")]
    pub axis2: RotaryAxis,

    /// Maps the first stage's control angle to physical rotation direction
    /// (+1 or -1).
    #[serde(default = "default_sign")]
    pub sign_axis1: i8,

    /// Maps the second stage's control angle to physical rotation direction
    /// (+1 or -1).
    #[serde(default = "default_sign")]
    pub sign_axis2: i8,

    /// Measured world direction of the first rotary axis at zero position.
    /// All-zero means "use the nominal direction for `axis1`".
    #[serde(default = "default_vec3")]
    pub axis1_dir_world: [f64; 3],

    /// Measured world direction of the second rotary axis at zero position.
    /// All-zero means "use the nominal direction for `axis2`".
    #[serde(default = "default_vec3")]
    pub axis2_dir_world: [f64; 3],

    /// Pivot of the first rotary stage in world coordinates, at zero
    /// position.
    #[serde(default = "default_vec3")]
    pub primary_center_world: [f64; 3],

    /// Pivot of the second stage relative to the first stage's pivot,
    /// measured in world coordinates at zero position.
    #[serde(default = "default_vec3")]
    pub secondary_offset_world: [f64; 3],

    /// Offset of the spindle/tool holder from the second stage's pivot, for
    /// head-tilting designs. Zero when absent.
    #[serde(default = "default_vec3")]
    pub spindle_swing_world: [f64; 3],

    /// Tool axis letter at zero position (default: Z).
    #[serde(default = "default_tool_dir")]
    pub tool_dir: ToolAxis,

    /// Sign of the tool's zero-position direction (+1 or -1).
    #[serde(default = "default_sign")]
    pub tool_axis_sign: i8,

    /// Distance the tool extends from the final frame along its local -Z
    /// (must be >= 0).
    #[serde(default)]
    pub tool_length: f64,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            machine_type: default_machine_type(),
            axis1: default_axis1(),
            axis2: default_axis2(),
            sign_axis1: default_sign(),
            sign_axis2: default_sign(),
            axis1_dir_world: default_vec3(),
            axis2_dir_world: default_vec3(),
            primary_center_world: default_vec3(),
            secondary_offset_world: default_vec3(),
            spindle_swing_world: default_vec3(),
            tool_dir: default_tool_dir(),
            tool_axis_sign: default_sign(),
            tool_length: 0.0,
        }
    }
}

impl MachineConfig {
    /// Validate configuration. Returns Err on invalid values.
    ///
    /// Finite-ness of offsets and of later solve inputs is a caller
    /// precondition and is not checked here.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_sign("sign_axis1", self.sign_axis1)?;
        check_sign("sign_axis2", self.sign_axis2)?;
        check_sign("tool_axis_sign", self.tool_axis_sign)?;

        if self.tool_length < 0.0 || !self.tool_length.is_finite() {
            return Err(ConfigError::InvalidToolLength(self.tool_length));
        }

        // A measured direction must be either exactly zero (nominal
        // fallback) or long enough to normalize.
        check_axis_dir("axis1", self.axis1_dir_world)?;
        check_axis_dir("axis2", self.axis2_dir_world)?;
        Ok(())
    }

    /// Load and validate a machine description from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }
}

fn check_sign(field: &'static str, value: i8) -> Result<(), ConfigError> {
    if value == 1 || value == -1 {
        Ok(())
    } else {
        Err(ConfigError::InvalidSign { field, value })
    }
}

fn check_axis_dir(axis: &'static str, dir: [f64; 3]) -> Result<(), ConfigError> {
    if dir == [0.0; 3] {
        return Ok(());
    }
    let norm = (dir[0] * dir[0] + dir[1] * dir[1] + dir[2] * dir[2]).sqrt();
    if norm < MIN_AXIS_LEN {
        return Err(ConfigError::DegenerateAxis { axis });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
