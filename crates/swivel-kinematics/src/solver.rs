//! Forward and linear-only inverse kinematics.
//!
//! The forward solve composes the two stage rotations (the second stage's
//! axis is carried by the first) and accumulates the fixed translation:
//! primary pivot, rotated secondary pivot offset, rotated spindle swing,
//! and the rotated tool-length vector. Linear carriage motion is
//! independent of rotation and simply superposed.
//!
//! Because the fixed translation never depends on the linear axes, the
//! inverse with known rotary angles is exact and closed-form:
//! `XYZ = target − fixed_translation(angles)`.

use nalgebra::{Matrix3, Vector3};

use swivel_core::{ConfigError, JointValues, MachineConfig};

use crate::frames::MachineFrames;
use crate::math::{normalize_or_zero, rodrigues};

// ---------------------------------------------------------------------------
// ToolPose
// ---------------------------------------------------------------------------

/// Tool tip state in the world frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToolPose {
    /// Tool tip position.
    pub tip: Vector3<f64>,
    /// Unit tool axis direction.
    pub tool_axis: Vector3<f64>,
}

// ---------------------------------------------------------------------------
// KinematicSolver
// ---------------------------------------------------------------------------

/// Five-axis kinematics solver over precomputed machine frames.
///
/// Solves take `&self`, allocate nothing, and run in bounded time; once
/// built, a solver may be shared across threads.
#[derive(Debug, Clone)]
pub struct KinematicSolver {
    frames: MachineFrames,
}

impl KinematicSolver {
    /// Build a solver from a machine configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the configuration fails validation or
    /// leaves a rotary axis direction degenerate.
    pub fn new(config: &MachineConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            frames: MachineFrames::from_config(config)?,
        })
    }

    /// Wrap already-derived frames.
    pub const fn from_frames(frames: MachineFrames) -> Self {
        Self { frames }
    }

    /// The cached frame data this solver runs on.
    pub const fn frames(&self) -> &MachineFrames {
        &self.frames
    }

    /// First-stage rotation for a control angle, after sign correction.
    fn stage1_rotation(&self, angle1_deg: f64) -> Matrix3<f64> {
        let sign = f64::from(self.frames.config().sign_axis1);
        rodrigues(&self.frames.n1_world(), sign * angle1_deg)
    }

    /// Effective instantaneous direction of the second rotary axis for a
    /// given first-stage control angle.
    ///
    /// The second stage is mounted on the first, so its axis direction is
    /// the zero-position direction rotated by the first stage.
    pub fn axis2_effective(&self, angle1_deg: f64) -> Vector3<f64> {
        let r1 = self.stage1_rotation(angle1_deg);
        normalize_or_zero(&(r1 * self.frames.n2_world()))
    }

    /// Combined stage rotation and the fixed (linear-axis-independent)
    /// translation for the given control angles.
    fn fixed_transform(&self, angle1_deg: f64, angle2_deg: f64) -> (Matrix3<f64>, Vector3<f64>) {
        let cfg = self.frames.config();

        let r1 = self.stage1_rotation(angle1_deg);
        let n2_eff = normalize_or_zero(&(r1 * self.frames.n2_world()));
        let r2 = rodrigues(&n2_eff, f64::from(cfg.sign_axis2) * angle2_deg);
        // Stage 1 applies before stage 2: stage 2 is the child.
        let r = r1 * r2;

        let mut translation = Vector3::from(cfg.primary_center_world);
        translation += r1 * self.frames.t12_local0();
        translation += r * self.frames.swing_local0();
        translation += r * Vector3::new(0.0, 0.0, -cfg.tool_length);
        (r, translation)
    }

    /// Forward kinematics: joint values to tool tip position and tool axis
    /// direction, both in the world frame.
    pub fn forward(&self, q: &JointValues) -> ToolPose {
        let (r, fixed) = self.fixed_transform(q.angle1_deg, q.angle2_deg);
        let tip = Vector3::new(q.x, q.y, q.z) + fixed;

        let cfg = self.frames.config();
        let tool_dir0 =
            Vector3::from(cfg.tool_dir.direction()) * f64::from(cfg.tool_axis_sign);
        let tool_axis = normalize_or_zero(&(r * tool_dir0));

        ToolPose { tip, tool_axis }
    }

    /// Linear-only inverse kinematics: the X/Y/Z carriage positions that
    /// put the tool tip at `target` for the given rotary control angles.
    ///
    /// Exact closed form; the rotary angles fully determine the fixed
    /// translation, so no iteration or numerical solving is involved.
    /// Solving the rotary angles from a desired tool orientation is out of
    /// scope.
    pub fn inverse_linear(
        &self,
        target: &Vector3<f64>,
        angle1_deg: f64,
        angle2_deg: f64,
    ) -> Vector3<f64> {
        let (_, fixed) = self.fixed_transform(angle1_deg, angle2_deg);
        target - fixed
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::Rng;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use swivel_core::{MachineType, RotaryAxis, ToolAxis};

    /// Bare config: all offsets zero, nominal axes, tool along +Z.
    fn bare_config() -> MachineConfig {
        MachineConfig::default()
    }

    /// Fully-populated skewed config for round-trip testing.
    fn skewed_config() -> MachineConfig {
        MachineConfig {
            machine_type: MachineType::TableSpindleTilting,
            axis1: RotaryAxis::B,
            axis2: RotaryAxis::A,
            sign_axis1: -1,
            sign_axis2: 1,
            axis1_dir_world: [0.1, 1.0, 0.05],
            axis2_dir_world: [1.0, -0.07, 0.1],
            primary_center_world: [120.0, -40.0, 33.0],
            secondary_offset_world: [5.0, 6.0, -7.0],
            spindle_swing_world: [0.5, -0.25, 1.5],
            tool_dir: ToolAxis::Z,
            tool_axis_sign: -1,
            tool_length: 75.0,
        }
    }

    #[test]
    fn canonical_zero_case() {
        let solver = KinematicSolver::new(&bare_config()).unwrap();
        let pose = solver.forward(&JointValues::new(1.0, 2.0, 3.0, 0.0, 0.0));
        assert_relative_eq!(pose.tip, Vector3::new(1.0, 2.0, 3.0), epsilon = 1e-15);
        assert_relative_eq!(pose.tool_axis, Vector3::z(), epsilon = 1e-15);
    }

    #[test]
    fn tool_length_only() {
        let cfg = MachineConfig {
            tool_length: 5.0,
            ..bare_config()
        };
        let solver = KinematicSolver::new(&cfg).unwrap();
        let pose = solver.forward(&JointValues::new(0.0, 0.0, 0.0, 0.0, 0.0));
        assert_relative_eq!(pose.tip, Vector3::new(0.0, 0.0, -5.0), epsilon = 1e-15);
    }

    #[test]
    fn pure_axis1_rotation_90_deg() {
        // A-axis (nominal +X) at 90°, tool length L, everything else zero.
        // R(+X, 90°) maps the tool vector (0, 0, -L) to (0, L, 0) and the
        // tool direction (0, 0, 1) to (0, -1, 0).
        let l = 2.0;
        let cfg = MachineConfig {
            axis1: RotaryAxis::A,
            axis2: RotaryAxis::C,
            tool_length: l,
            ..bare_config()
        };
        let solver = KinematicSolver::new(&cfg).unwrap();
        let pose = solver.forward(&JointValues::new(0.0, 0.0, 0.0, 90.0, 0.0));
        assert_relative_eq!(pose.tip, Vector3::new(0.0, l, 0.0), epsilon = 1e-12);
        assert_relative_eq!(pose.tool_axis, Vector3::new(0.0, -1.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn sign_flips_physical_rotation() {
        let l = 2.0;
        let cfg = MachineConfig {
            axis1: RotaryAxis::A,
            axis2: RotaryAxis::C,
            sign_axis1: -1,
            tool_length: l,
            ..bare_config()
        };
        let solver = KinematicSolver::new(&cfg).unwrap();
        // Control +90° with sign -1 is a physical -90° about +X, which
        // maps (0, 0, -L) to (0, -L, 0).
        let pose = solver.forward(&JointValues::new(0.0, 0.0, 0.0, 90.0, 0.0));
        assert_relative_eq!(pose.tip, Vector3::new(0.0, -l, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn axis2_effective_rotates_with_axis1() {
        // axis1 = A (+X), axis2 = C (+Z): at 90° about +X, the second
        // stage's axis is carried to -Y.
        let cfg = MachineConfig {
            axis1: RotaryAxis::A,
            axis2: RotaryAxis::C,
            ..bare_config()
        };
        let solver = KinematicSolver::new(&cfg).unwrap();
        let n2_eff = solver.axis2_effective(90.0);
        assert_relative_eq!(n2_eff, Vector3::new(0.0, -1.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn axis2_effective_is_rotated_zero_dir() {
        // n2_eff must be exactly R1 · n2_world (normalized), unit length,
        // for an arbitrary skewed machine and angle.
        let solver = KinematicSolver::new(&skewed_config()).unwrap();
        let frames = solver.frames();
        let angle1 = 37.0;

        let n2_eff = solver.axis2_effective(angle1);
        assert_relative_eq!(n2_eff.norm(), 1.0, epsilon = 1e-12);

        let sign = f64::from(frames.config().sign_axis1);
        let r1 = rodrigues(&frames.n1_world(), sign * angle1);
        assert_relative_eq!(n2_eff, r1 * frames.n2_world(), epsilon = 1e-12);
    }

    #[test]
    fn secondary_offset_rotates_with_axis1_only() {
        // t12 = (1, 0, 0) on a C carrier: 90° about +Z carries it to
        // (0, 1, 0). The second-stage angle must not move it.
        let cfg = MachineConfig {
            axis1: RotaryAxis::C,
            axis2: RotaryAxis::A,
            secondary_offset_world: [1.0, 0.0, 0.0],
            ..bare_config()
        };
        let solver = KinematicSolver::new(&cfg).unwrap();
        for angle2 in [0.0, 55.0, -120.0] {
            let pose = solver.forward(&JointValues::new(0.0, 0.0, 0.0, 90.0, angle2));
            assert_relative_eq!(pose.tip, Vector3::new(0.0, 1.0, 0.0), epsilon = 1e-12);
        }
    }

    #[test]
    fn spindle_swing_rotates_with_both_stages() {
        // Swing (0, 0, 1) on an A-on-C head machine, both angles at 90°.
        // R1 = 90° about +Z carries the A axis to +Y, so R2 = 90° about
        // +Y, which maps (0, 0, 1) to (1, 0, 0); R1 then carries that to
        // (0, 1, 0).
        let cfg = MachineConfig {
            machine_type: MachineType::SpindleTilting,
            axis1: RotaryAxis::C,
            axis2: RotaryAxis::A,
            spindle_swing_world: [0.0, 0.0, 1.0],
            ..bare_config()
        };
        let solver = KinematicSolver::new(&cfg).unwrap();
        let pose = solver.forward(&JointValues::new(0.0, 0.0, 0.0, 90.0, 90.0));
        assert_relative_eq!(pose.tip, Vector3::new(0.0, 1.0, 0.0), epsilon = 1e-12);

        // Second stage alone: angle1 = 0 keeps the A axis at +X, and
        // R2 = 90° about +X carries a (0, 1, 0) swing to (0, 0, 1).
        let cfg = MachineConfig {
            spindle_swing_world: [0.0, 1.0, 0.0],
            ..cfg
        };
        let solver = KinematicSolver::new(&cfg).unwrap();
        let pose = solver.forward(&JointValues::new(0.0, 0.0, 0.0, 0.0, 90.0));
        assert_relative_eq!(pose.tip, Vector3::new(0.0, 0.0, 1.0), epsilon = 1e-12);
    }

    #[test]
    fn linear_motion_superposes() {
        let solver = KinematicSolver::new(&skewed_config()).unwrap();
        let a = solver.forward(&JointValues::new(0.0, 0.0, 0.0, 33.0, -71.0));
        let b = solver.forward(&JointValues::new(10.0, 20.0, 30.0, 33.0, -71.0));
        assert_relative_eq!(
            b.tip - a.tip,
            Vector3::new(10.0, 20.0, 30.0),
            epsilon = 1e-9
        );
        // Orientation is independent of the linear axes.
        assert_relative_eq!(b.tool_axis, a.tool_axis, epsilon = 1e-15);
    }

    #[test]
    fn tool_axis_stays_unit_length() {
        let solver = KinematicSolver::new(&skewed_config()).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..50 {
            let q = JointValues::new(
                0.0,
                0.0,
                0.0,
                rng.gen_range(-360.0..360.0),
                rng.gen_range(-360.0..360.0),
            );
            let pose = solver.forward(&q);
            assert_relative_eq!(pose.tool_axis.norm(), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn inverse_recovers_linear_axes() {
        // Round trip: forward then linear-only inverse with the same rotary
        // angles must recover X/Y/Z, across a fully-offset skewed machine.
        let solver = KinematicSolver::new(&skewed_config()).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(42);

        for _ in 0..200 {
            let q = JointValues::new(
                rng.gen_range(-500.0..500.0),
                rng.gen_range(-500.0..500.0),
                rng.gen_range(-500.0..500.0),
                rng.gen_range(-360.0..360.0),
                rng.gen_range(-360.0..360.0),
            );
            let pose = solver.forward(&q);
            let linear = solver.inverse_linear(&pose.tip, q.angle1_deg, q.angle2_deg);
            assert_relative_eq!(linear, Vector3::new(q.x, q.y, q.z), epsilon = 1e-9);
        }
    }

    #[test]
    fn inverse_is_exact_at_zero_angles() {
        let solver = KinematicSolver::new(&bare_config()).unwrap();
        let target = Vector3::new(7.0, -3.0, 11.0);
        let linear = solver.inverse_linear(&target, 0.0, 0.0);
        assert_relative_eq!(linear, target, epsilon = 1e-15);
    }

    #[test]
    fn inverse_accounts_for_tool_length() {
        let cfg = MachineConfig {
            tool_length: 5.0,
            ..bare_config()
        };
        let solver = KinematicSolver::new(&cfg).unwrap();
        // Tool hangs 5 below the carriage at zero angles, so reaching a
        // target needs the carriage 5 above it.
        let linear = solver.inverse_linear(&Vector3::new(1.0, 2.0, 3.0), 0.0, 0.0);
        assert_relative_eq!(linear, Vector3::new(1.0, 2.0, 8.0), epsilon = 1e-15);
    }

    #[test]
    fn tool_dir_and_sign_select_zero_direction() {
        let cfg = MachineConfig {
            tool_dir: ToolAxis::X,
            tool_axis_sign: -1,
            ..bare_config()
        };
        let solver = KinematicSolver::new(&cfg).unwrap();
        let pose = solver.forward(&JointValues::new(0.0, 0.0, 0.0, 0.0, 0.0));
        assert_relative_eq!(pose.tool_axis, Vector3::new(-1.0, 0.0, 0.0), epsilon = 1e-15);
    }

    #[test]
    fn machine_type_does_not_change_the_formula() {
        // Same offsets, different declared topology: identical results.
        let base = skewed_config();
        let solver_a = KinematicSolver::new(&base).unwrap();
        let solver_b = KinematicSolver::new(&MachineConfig {
            machine_type: MachineType::SpindleTilting,
            ..base
        })
        .unwrap();
        let q = JointValues::new(5.0, -5.0, 12.0, 48.0, -97.0);
        assert_eq!(solver_a.forward(&q).tip, solver_b.forward(&q).tip);
    }

    #[test]
    fn solver_from_prebuilt_frames_matches_new() {
        let cfg = skewed_config();
        let frames = crate::frames::MachineFrames::from_config(&cfg).unwrap();
        let a = KinematicSolver::from_frames(frames);
        let b = KinematicSolver::new(&cfg).unwrap();
        let q = JointValues::new(1.0, 2.0, 3.0, 15.0, -40.0);
        assert_eq!(a.forward(&q).tip, b.forward(&q).tip);
    }

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn solver_is_send_sync() {
        assert_send_sync::<KinematicSolver>();
    }
}
