pub mod config;
pub mod error;
pub mod examples;
pub mod grammar;
pub mod synthesis;

pub use crate::error::HolepunchError;
pub use crate::examples::{Example, ExampleSet};
pub use crate::synthesis::builder::{SynthesisParams, SynthesisParamsBuilder};
pub use crate::synthesis::program::Program;
pub use crate::synthesis::{ProgramSynthesis, SynthesisResult};
