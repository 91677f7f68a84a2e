use serde::{Deserialize, Serialize};

use crate::grammar::Operator;

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct GrammarConfig {
    /// Names of the candidate's integer parameters, in signature order.
    pub parameters: Vec<String>,
    /// Recursion budget for the sketch; must be non-negative. How it should
    /// scale with the operator set or example count is a tuning concern left
    /// to the caller.
    pub max_depth: i64,
    /// Allowed operator alphabet, e.g. `["<", ">", "and"]`.
    pub operators: Vec<Operator>,
}
