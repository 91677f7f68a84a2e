use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Default, Deserialize, Serialize)]
pub struct SolverConfig {
    /// Wall-clock budget for one query, in milliseconds. Exceeding it
    /// surfaces as a fatal solver error, never as an unsat result. Absent a
    /// budget, a hard query blocks indefinitely.
    pub timeout_ms: Option<u32>,
}
