//! Per-configuration frame precomputation.
//!
//! [`MachineFrames`] is derived once from a validated
//! [`MachineConfig`] and caches everything the solvers need: the
//! normalized zero-position directions of both rotary axes and the
//! measured offsets re-expressed in each stage's own zero-position local
//! frame, so they can later be re-oriented by whatever rotation the stage
//! currently has.
//!
//! The struct is immutable after construction; reconfiguration means
//! building a new value. Solves against a built `MachineFrames` are
//! read-only and safe to run concurrently.

use nalgebra::Vector3;

use swivel_core::{ConfigError, MachineConfig, RotaryAxis, MIN_AXIS_LEN};

use crate::math::zero_frame;

/// Cached solver state derived from one machine configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct MachineFrames {
    config: MachineConfig,
    /// Normalized zero-position world direction of the first rotary axis.
    n1_world: Vector3<f64>,
    /// Normalized zero-position world direction of the second rotary axis.
    n2_world: Vector3<f64>,
    /// Second-stage pivot offset, expressed in the first stage's
    /// zero-position local frame.
    t12_local0: Vector3<f64>,
    /// Spindle-swing offset, expressed in the second stage's zero-position
    /// local frame.
    swing_local0: Vector3<f64>,
}

impl MachineFrames {
    /// Derive the cached frames from a machine configuration.
    ///
    /// Pure and idempotent: identical configs produce identical frames.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the config fails validation or an axis
    /// direction is still degenerate after nominal fallback.
    pub fn from_config(config: &MachineConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let n1_world = resolve_axis_dir(config.axis1, config.axis1_dir_world, "axis1")?;
        let n2_world = resolve_axis_dir(config.axis2, config.axis2_dir_world, "axis2")?;

        let basis1 = zero_frame(config.axis1, &n1_world);
        let basis2 = zero_frame(config.axis2, &n2_world);

        // local = basisᵗ · world; the basis is orthonormal, so the
        // transpose is its inverse.
        let t12_local0 = basis1.transpose() * Vector3::from(config.secondary_offset_world);
        let swing_local0 = basis2.transpose() * Vector3::from(config.spindle_swing_world);

        Ok(Self {
            config: config.clone(),
            n1_world,
            n2_world,
            t12_local0,
            swing_local0,
        })
    }

    /// The configuration these frames were derived from.
    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    /// Unit world direction of the first rotary axis at zero position.
    pub fn n1_world(&self) -> Vector3<f64> {
        self.n1_world
    }

    /// Unit world direction of the second rotary axis at zero position.
    pub fn n2_world(&self) -> Vector3<f64> {
        self.n2_world
    }

    /// Second-stage pivot offset in the first stage's zero-position frame.
    pub fn t12_local0(&self) -> Vector3<f64> {
        self.t12_local0
    }

    /// Spindle-swing offset in the second stage's zero-position frame.
    pub fn swing_local0(&self) -> Vector3<f64> {
        self.swing_local0
    }
}

/// Normalize a measured axis direction, substituting the identity's nominal
/// world direction when the measurement is all-zero.
fn resolve_axis_dir(
    identity: RotaryAxis,
    measured: [f64; 3],
    axis: &'static str,
) -> Result<Vector3<f64>, ConfigError> {
    let v = if measured == [0.0; 3] {
        Vector3::from(identity.nominal_dir())
    } else {
        Vector3::from(measured)
    };
    v.try_normalize(MIN_AXIS_LEN)
        .ok_or(ConfigError::DegenerateAxis { axis })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
