use crate::core::ConfigProvider;
use crate::domain::model::{PinId, PinMap, PinMapEntry};
use crate::utils::error::{ClipError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

const MAX_DELAY_MS: u64 = 10_000;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarnessConfig {
    pub harness: HarnessSection,
    #[serde(default)]
    pub indicators: IndicatorConfig,
    #[serde(default)]
    pub start: StartConfig,
    #[serde(default)]
    pub timing: TimingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarnessSection {
    pub name: String,
    pub entries: PinMap,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorConfig {
    pub red: PinId,
    pub green: PinId,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            red: PinId::new("SDA"),
            green: PinId::new("SCL"),
        }
    }
}

/// Start control, pulled up and active-low.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StartConfig {
    pub pin: PinId,
}

impl Default for StartConfig {
    fn default() -> Self {
        Self {
            pin: PinId::new("D5"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub step_delay_ms: u64,
    pub release_poll_ms: u64,
    pub idle_poll_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            step_delay_ms: 200,
            release_poll_ms: 150,
            idle_poll_ms: 10,
        }
    }
}

impl Default for HarnessConfig {
    /// The debug clip adapter wiring.
    fn default() -> Self {
        Self {
            harness: HarnessSection {
                name: "debug-clip".to_string(),
                entries: PinMap::new(vec![
                    PinMapEntry::new("GND 1", "D13", "A4"),
                    PinMapEntry::new("GND 2", "D13", "A5"),
                    PinMapEntry::new("GND 3", "D13", "SCK"),
                    PinMapEntry::new("SWDIO", "D10", "MISO"),
                    PinMapEntry::new("SWO", "D12", "A1"),
                    PinMapEntry::new("nRESET", "D11", "A3"),
                    PinMapEntry::new("SWCK", "D9", "A0"),
                    PinMapEntry::new("VTRef", "D6", "MOSI"),
                ]),
            },
            indicators: IndicatorConfig::default(),
            start: StartConfig::default(),
            timing: TimingConfig::default(),
        }
    }
}

impl HarnessConfig {
    /// Loads a harness description from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// Parses a harness description from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| ClipError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    pub fn name(&self) -> &str {
        &self.harness.name
    }

    pub fn with_step_delay(mut self, step_delay_ms: u64) -> Self {
        self.timing.step_delay_ms = step_delay_ms;
        self
    }

    /// Zero pacing, for tests and fast simulation.
    pub fn without_delays(mut self) -> Self {
        self.timing = TimingConfig {
            step_delay_ms: 0,
            release_poll_ms: 0,
            idle_poll_ms: 0,
        };
        self
    }

    /// Checks the map is wired one input per entry and the control pins stay clear of it.
    pub fn validate_config(&self) -> Result<()> {
        validation::validate_non_empty_string("harness.name", &self.harness.name)?;

        let pin_map = &self.harness.entries;
        if pin_map.is_empty() {
            return Err(ClipError::InvalidConfigValueError {
                field: "harness.entries".to_string(),
                value: "[]".to_string(),
                reason: "At least one entry is required".to_string(),
            });
        }

        for entry in pin_map.entries() {
            validation::validate_non_empty_string("harness.entries.label", &entry.label)?;
            validation::validate_pin_name("harness.entries.output", entry.output.as_str())?;
            validation::validate_pin_name("harness.entries.input", entry.input.as_str())?;
        }

        validation::validate_unique(
            "harness.entries.label",
            pin_map.entries().iter().map(|e| e.label.as_str()),
        )?;
        validation::validate_unique(
            "harness.entries.input",
            pin_map.inputs().map(|p| p.as_str()),
        )?;

        let outputs: HashSet<&PinId> = pin_map.outputs().into_iter().collect();
        if let Some(pin) = pin_map.inputs().find(|p| outputs.contains(p)) {
            return Err(ClipError::InvalidConfigValueError {
                field: "harness.entries".to_string(),
                value: pin.to_string(),
                reason: "Pin is used both as an output and as an input".to_string(),
            });
        }

        validation::validate_pin_name("indicators.red", self.indicators.red.as_str())?;
        validation::validate_pin_name("indicators.green", self.indicators.green.as_str())?;
        validation::validate_pin_name("start.pin", self.start.pin.as_str())?;

        // control pins must not overlap the map
        let map_pins = pin_map
            .outputs()
            .into_iter()
            .chain(pin_map.inputs())
            .map(|p| p.as_str());
        validation::validate_unique(
            "indicators/start",
            [
                self.indicators.red.as_str(),
                self.indicators.green.as_str(),
                self.start.pin.as_str(),
            ]
            .into_iter()
            .chain(map_pins),
        )?;

        validation::validate_range("timing.step_delay_ms", self.timing.step_delay_ms, 0, MAX_DELAY_MS)?;
        validation::validate_range("timing.release_poll_ms", self.timing.release_poll_ms, 0, MAX_DELAY_MS)?;
        validation::validate_range("timing.idle_poll_ms", self.timing.idle_poll_ms, 0, MAX_DELAY_MS)?;

        Ok(())
    }
}

impl ConfigProvider for HarnessConfig {
    fn pin_map(&self) -> &PinMap {
        &self.harness.entries
    }

    fn red_indicator(&self) -> &PinId {
        &self.indicators.red
    }

    fn green_indicator(&self) -> &PinId {
        &self.indicators.green
    }

    fn start_pin(&self) -> &PinId {
        &self.start.pin
    }

    fn step_delay(&self) -> Duration {
        Duration::from_millis(self.timing.step_delay_ms)
    }

    fn release_poll(&self) -> Duration {
        Duration::from_millis(self.timing.release_poll_ms)
    }

    fn idle_poll(&self) -> Duration {
        Duration::from_millis(self.timing.idle_poll_ms)
    }
}

impl Validate for HarnessConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
