use z3::ast::Bool;
use z3::{Context, Model, Params, SatResult, Solver};

use crate::error::HolepunchError;

/// What a decided query produced.
#[derive(Debug)]
pub enum SolveOutcome<'ctx> {
    Sat(Model<'ctx>),
    Unsat,
}

/// Minimal capability surface over the underlying Z3 solver: one blocking
/// satisfiability query per formula. The checked frame is pushed and popped
/// around each query so repeated attempts never see stale assertions.
pub struct SolverAdapter<'ctx> {
    solver: Solver<'ctx>,
}

impl<'ctx> SolverAdapter<'ctx> {
    pub fn new(z3: &'ctx Context, timeout_ms: Option<u32>, seed: Option<u32>) -> Self {
        let solver = Solver::new(z3);
        if timeout_ms.is_some() || seed.is_some() {
            let mut params = Params::new(z3);
            if let Some(ms) = timeout_ms {
                params.set_u32("timeout", ms);
            }
            if let Some(seed) = seed {
                params.set_u32("random_seed", seed);
            }
            solver.set_params(&params);
        }
        Self { solver }
    }

    /// `Unknown` (a timeout or a solver-internal failure) is surfaced as an
    /// error carrying the solver's reason, never conflated with `Unsat`.
    pub fn check(&self, formula: &Bool<'ctx>) -> Result<SolveOutcome<'ctx>, HolepunchError> {
        self.solver.push();
        self.solver.assert(formula);
        let outcome = match self.solver.check() {
            SatResult::Sat => self
                .solver
                .get_model()
                .map(SolveOutcome::Sat)
                .ok_or(HolepunchError::ModelGenerationError),
            SatResult::Unsat => Ok(SolveOutcome::Unsat),
            SatResult::Unknown => Err(HolepunchError::SolverUnknown {
                reason: self
                    .solver
                    .get_reason_unknown()
                    .unwrap_or_else(|| "unknown".to_string()),
            }),
        };
        self.solver.pop(1);
        outcome
    }
}
