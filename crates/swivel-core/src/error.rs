//! Error types for machine-description loading and validation.

use std::path::PathBuf;

/// Errors from loading or validating a machine description.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the machine description file.
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to parse TOML content.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A rotary-axis direction is unusable even after nominal fallback.
    #[error("degenerate {axis} direction: zero length after nominal fallback")]
    DegenerateAxis { axis: &'static str },

    /// A sign field was something other than +1 or -1.
    #[error("invalid value for {field}: {value} (must be 1 or -1)")]
    InvalidSign { field: &'static str, value: i8 },

    /// Tool length was negative or non-finite.
    #[error("invalid tool_length: {0} (must be finite and >= 0)")]
    InvalidToolLength(f64),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
