pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::toml_config::HarnessConfig;

pub use adapters::{
    console::{ConsoleReporter, MemoryReporter},
    simulated::{Fault, SimulatedBoard},
};
pub use crate::core::{
    controller::{Controller, PollEvent},
    verifier::ContinuityVerifier,
};
pub use utils::error::{ClipError, Result};
