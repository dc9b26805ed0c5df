pub mod controller;
pub mod gate;
pub mod indicators;
pub mod scan;
pub mod verifier;

pub use crate::domain::model::{EntryOutcome, PinId, PinMap, ScanResult};
pub use crate::domain::ports::{Board, ConfigProvider, Reporter};
pub use crate::utils::error::Result;
