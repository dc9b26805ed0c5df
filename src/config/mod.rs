pub mod toml_config;

#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{validate_range, Validate};
#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "clip-check")]
#[command(about = "Continuity and short-circuit self-test for debug clip adapters")]
pub struct CliConfig {
    /// Path to a TOML harness file (defaults to the built-in debug clip map)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Fault to inject into the simulated clip: open:<label>, short:<label>=<label>, stuck:<label>
    #[arg(long = "fault")]
    pub faults: Vec<String>,

    /// Number of start-press cycles to simulate
    #[arg(long, default_value = "1")]
    pub scans: usize,

    /// Override the delay between entries
    #[arg(long)]
    pub step_delay_ms: Option<u64>,
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_range("scans", self.scans, 1, 1_000)
    }
}
