use crate::domain::model::{Direction, EntryOutcome, PinId, PinMap, Pull, ScanResult};
use crate::utils::error::Result;
use std::time::Duration;

/// Digital lines of the test fixture.
pub trait Board {
    fn configure(&mut self, pin: &PinId, direction: Direction, pull: Pull) -> Result<()>;
    fn write(&mut self, pin: &PinId, level: bool) -> Result<()>;
    fn read(&mut self, pin: &PinId) -> Result<bool>;
}

pub trait Reporter {
    fn entry(&mut self, outcome: &EntryOutcome);
    fn summary(&mut self, result: &ScanResult);
}

pub trait ConfigProvider {
    fn pin_map(&self) -> &PinMap;
    fn red_indicator(&self) -> &PinId;
    fn green_indicator(&self) -> &PinId;
    fn start_pin(&self) -> &PinId;
    fn step_delay(&self) -> Duration;
    fn release_poll(&self) -> Duration;
    fn idle_poll(&self) -> Duration;
}
