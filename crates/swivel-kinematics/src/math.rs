//! Shared 3D math helpers for the kinematics core.
//!
//! Pure functions over nalgebra types. Angles are in degrees throughout,
//! matching machine control conventions.

use nalgebra::{Matrix3, Vector3};

use swivel_core::{RotaryAxis, MIN_AXIS_LEN};

/// When the axis direction is at least this close to parallel with world
/// +Z, the local-frame up hint falls back to world +X.
const UP_HINT_PARALLEL_LIMIT: f64 = 0.9;

/// Normalize `v`, returning the zero vector for zero-length input.
pub fn normalize_or_zero(v: &Vector3<f64>) -> Vector3<f64> {
    v.try_normalize(MIN_AXIS_LEN).unwrap_or_else(Vector3::zeros)
}

/// Cross-product (skew-symmetric) matrix `[u]×` of `u`.
pub fn skew(u: &Vector3<f64>) -> Matrix3<f64> {
    Matrix3::new(
        0.0, -u.z, u.y, //
        u.z, 0.0, -u.x, //
        -u.y, u.x, 0.0,
    )
}

/// Rotation by `angle_deg` about `axis`, via the Rodrigues formula
/// `R = cosθ·I + (1−cosθ)·uuᵗ + sinθ·[u]×`.
///
/// `axis` must be unit length; a non-unit axis silently produces a
/// non-orthonormal matrix.
pub fn rodrigues(axis: &Vector3<f64>, angle_deg: f64) -> Matrix3<f64> {
    let theta = angle_deg.to_radians();
    let (s, c) = theta.sin_cos();
    let u = *axis;
    Matrix3::identity() * c + (u * u.transpose()) * (1.0 - c) + skew(axis) * s
}

/// Zero-position local basis for a rotary stage with unit direction `dir`.
///
/// The returned matrix has orthonormal columns and determinant +1, and the
/// column designated by the identity (A→x, B→y, C→z) equals `dir`. The
/// in-plane orientation comes from projecting an up hint (world +Z, or
/// world +X when `dir` is nearly parallel to +Z) orthogonal to `dir` and
/// completing the basis by cross product. Deterministic: the same inputs
/// always produce the same basis, and a nominal direction yields the
/// identity matrix.
pub fn zero_frame(identity: RotaryAxis, dir: &Vector3<f64>) -> Matrix3<f64> {
    let hint = if dir.z.abs() > UP_HINT_PARALLEL_LIMIT {
        Vector3::x()
    } else {
        Vector3::z()
    };
    let hint = normalize_or_zero(&(hint - dir * dir.dot(&hint)));

    let (x, y, z) = match identity {
        RotaryAxis::A => (*dir, hint.cross(dir), hint),
        RotaryAxis::B => (dir.cross(&hint), *dir, hint),
        RotaryAxis::C => (hint, dir.cross(&hint), *dir),
    };
    Matrix3::from_columns(&[x, y, z])
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
