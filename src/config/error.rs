use thiserror::Error;

#[derive(Debug, Error)]
pub enum HolepunchConfigError {
    #[error("Grammar depth must be non-negative, got {0}")]
    NegativeDepth(i64),
    #[error("No examples were provided")]
    EmptyExampleSet,
    #[error("Example row {row} has arity {found}, expected {expected}")]
    ArityMismatch {
        expected: usize,
        found: usize,
        row: usize,
    },
    #[error("An error reading a file referenced from the config")]
    Io(#[from] std::io::Error),
    #[cfg(feature = "toml")]
    #[error("Error parsing config file: {0}")]
    Toml(#[from] toml_edit::de::Error),
}
