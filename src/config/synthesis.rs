use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Deserialize, Serialize)]
pub struct SynthesisConfig {
    /// Retry at increasing depth and report the shallowest solution instead
    /// of solving once at the configured maximum.
    pub deepening: bool,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        SynthesisConfig { deepening: false }
    }
}
