use derive_builder::Builder;
use z3::Context;

use crate::error::HolepunchError;
use crate::examples::ExampleSet;
use crate::grammar::Operator;
use crate::synthesis::ProgramSynthesis;

/// Everything one synthesis attempt needs, resolved from a config file or
/// assembled programmatically through [SynthesisParamsBuilder].
#[derive(Clone, Debug, Builder)]
pub struct SynthesisParams {
    /// Names of the candidate's integer parameters, in signature order.
    /// The example store's arity must match.
    pub parameters: Vec<String>,
    pub operators: Vec<Operator>,
    /// Recursion budget for the sketch. Depth 0 admits only terminals and
    /// holes.
    pub max_depth: u32,
    pub examples: ExampleSet,
    /// Solver wall-clock budget; exceeding it is a fatal `SolverUnknown`,
    /// not an unsat result.
    #[builder(default)]
    pub timeout_ms: Option<u32>,
    #[builder(default)]
    pub seed: Option<u32>,
    /// Retry at increasing depth and report the shallowest solution.
    #[builder(default)]
    pub deepening: bool,
}

impl SynthesisParams {
    pub fn build<'ctx>(&self, z3: &'ctx Context) -> Result<ProgramSynthesis<'ctx>, HolepunchError> {
        ProgramSynthesis::new(z3, self)
    }
}
