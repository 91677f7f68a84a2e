use rand::random;
use serde::{Deserialize, Serialize};
use tracing::Level;

#[derive(Copy, Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HolepunchLogLevel {
    Trace,
    Debug,
    Warn,
    Info,
    Error,
}

impl From<HolepunchLogLevel> for Level {
    fn from(value: HolepunchLogLevel) -> Self {
        match value {
            HolepunchLogLevel::Trace => Level::TRACE,
            HolepunchLogLevel::Debug => Level::DEBUG,
            HolepunchLogLevel::Warn => Level::WARN,
            HolepunchLogLevel::Info => Level::INFO,
            HolepunchLogLevel::Error => Level::ERROR,
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct MetaConfig {
    /// Seed handed to the solver. Randomized by default; pin it to make
    /// solver tie-breaks reproducible across runs.
    #[serde(default = "random")]
    pub seed: u32,
    pub log_level: HolepunchLogLevel,
}

impl Default for MetaConfig {
    fn default() -> Self {
        Self {
            seed: random(),
            log_level: HolepunchLogLevel::Info,
        }
    }
}
