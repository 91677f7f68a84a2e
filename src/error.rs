use thiserror::Error;

use crate::config::error::HolepunchConfigError;
use crate::synthesis::builder::SynthesisParamsBuilderError;

#[derive(Debug, Error)]
pub enum HolepunchError {
    #[error("The example store is empty")]
    EmptyExamples,
    #[error("The examples have arity {found}, but the sketch takes {expected} parameters")]
    ArityMismatch { expected: usize, found: usize },
    #[error("The operator set is empty")]
    EmptyOperatorSet,
    #[error("The solver could not decide the query: {reason}")]
    SolverUnknown { reason: String },
    #[error("Z3 failed to return a model for a satisfiable query")]
    ModelGenerationError,
    #[error("Unexpected terms found in the solver model")]
    ModelParsingError,
    #[error("Ill-sorted term encountered while lowering the sketch")]
    SortMismatch,
    #[error("Synthesized program disagrees with example row {row}")]
    UnsoundModel { row: usize },
    #[error("Config error: {0}")]
    Config(#[from] HolepunchConfigError),
    #[error("Invalid synthesis params")]
    SynthesisParams(#[from] SynthesisParamsBuilderError),
}
