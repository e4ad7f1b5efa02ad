use thiserror::Error;

/// Crate-wide result type alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the simulation engine and its configuration layer.
///
/// Construction problems are reported as [`Error::Config`] and are always fatal:
/// nothing is silently defaulted. Coincident particle centres during a step are
/// not errors at all; the engine skips that pair.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid construction parameters (speed scale, bounds, radius, mass, charge, ...).
    #[error("configuration error: {0}")]
    Config(String),

    /// Invalid runtime argument (e.g., particle index out of range, non-finite override).
    #[error("invalid parameter: {0}")]
    InvalidParam(String),

    /// Propagated I/O errors while reading configuration files.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Malformed YAML configuration.
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

/// Reject anything that is not a finite, strictly positive number.
pub(crate) fn require_positive(name: &str, value: f64) -> Result<f64> {
    if !value.is_finite() || value <= 0.0 {
        return Err(Error::Config(format!(
            "{name} must be finite and > 0 (got {value})"
        )));
    }
    Ok(value)
}
