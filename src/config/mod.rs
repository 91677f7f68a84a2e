use serde::{Deserialize, Serialize};

use crate::config::error::HolepunchConfigError;
use crate::config::grammar::GrammarConfig;
use crate::config::meta::MetaConfig;
use crate::config::solver::SolverConfig;
use crate::config::synthesis::SynthesisConfig;
use crate::error::HolepunchError;
use crate::examples::{Example, ExampleSet};
use crate::synthesis::builder::{SynthesisParams, SynthesisParamsBuilder};

pub mod error;
pub mod grammar;
pub mod meta;
pub mod solver;
pub mod synthesis;

/// This struct represents the serializable configuration found in a
/// holepunch .toml file. Once parsed from a file or constructed
/// programmatically, it can be used to produce a
/// [crate::synthesis::builder::SynthesisParams] struct, which can run the
/// actual algorithm.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct HolepunchConfig {
    #[serde(default)]
    pub meta: MetaConfig,
    pub examples: Vec<Example>,
    pub grammar: GrammarConfig,
    #[serde(default)]
    pub solver: SolverConfig,
    #[serde(default)]
    pub synthesis: SynthesisConfig,
}

impl HolepunchConfig {
    pub fn resolve(&self) -> Result<SynthesisParams, HolepunchError> {
        if self.grammar.max_depth < 0 {
            return Err(HolepunchConfigError::NegativeDepth(self.grammar.max_depth).into());
        }
        let examples = ExampleSet::new(self.examples.clone())?;
        let mut b = SynthesisParamsBuilder::default();
        b.parameters(self.grammar.parameters.clone())
            .operators(self.grammar.operators.clone())
            .max_depth(self.grammar.max_depth as u32)
            .examples(examples);
        b.timeout_ms(self.solver.timeout_ms)
            .seed(Some(self.meta.seed))
            .deepening(self.synthesis.deepening);
        let params = b.build()?;
        Ok(params)
    }

    #[cfg(feature = "toml")]
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, HolepunchError> {
        let raw = std::fs::read_to_string(path).map_err(HolepunchConfigError::from)?;
        let config: HolepunchConfig =
            toml_edit::de::from_str(&raw).map_err(HolepunchConfigError::from)?;
        Ok(config)
    }
}
