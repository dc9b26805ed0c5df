use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Board pin name, e.g. `D13`, `A4` or `MOSI`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PinId(String);

impl PinId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PinId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PinId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Input,
    Output,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Pull {
    None,
    /// Unconnected input reads low.
    #[default]
    Down,
    Up,
}

/// A boolean signal bound to a physical pin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub pin: PinId,
    pub direction: Direction,
    pub pull: Pull,
}

impl Line {
    pub fn output(pin: PinId) -> Self {
        Self {
            pin,
            direction: Direction::Output,
            pull: Pull::None,
        }
    }

    pub fn input(pin: PinId, pull: Pull) -> Self {
        Self {
            pin,
            direction: Direction::Input,
            pull,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinMapEntry {
    pub label: String,
    pub output: PinId,
    pub input: PinId,
}

impl PinMapEntry {
    pub fn new(label: impl Into<String>, output: impl Into<PinId>, input: impl Into<PinId>) -> Self {
        Self {
            label: label.into(),
            output: output.into(),
            input: input.into(),
        }
    }
}

/// The wiring under test. Order is the order outputs are exercised and reported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PinMap {
    entries: Vec<PinMapEntry>,
}

impl PinMap {
    pub fn new(entries: Vec<PinMapEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[PinMapEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entry(&self, label: &str) -> Option<&PinMapEntry> {
        self.entries.iter().find(|e| e.label == label)
    }

    /// Distinct output pins in first-use order.
    pub fn outputs(&self) -> Vec<&PinId> {
        let mut outputs: Vec<&PinId> = Vec::new();
        for entry in &self.entries {
            if !outputs.contains(&&entry.output) {
                outputs.push(&entry.output);
            }
        }
        outputs
    }

    pub fn inputs(&self) -> impl Iterator<Item = &PinId> {
        self.entries.iter().map(|e| &e.input)
    }

    pub fn is_output(&self, pin: &PinId) -> bool {
        self.entries.iter().any(|e| &e.output == pin)
    }

    /// Line declarations for every output and input of the map.
    pub fn lines(&self) -> Vec<Line> {
        let mut lines: Vec<Line> = self
            .outputs()
            .into_iter()
            .map(|pin| Line::output(pin.clone()))
            .collect();
        lines.extend(self.inputs().map(|pin| Line::input(pin.clone(), Pull::Down)));
        lines
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryOutcome {
    pub label: String,
    pub output: PinId,
    pub passed: bool,
}

impl fmt::Display for EntryOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.passed {
            write!(f, "{} passed", self.label)
        } else {
            write!(f, "{} failed", self.label)
        }
    }
}

/// Outcome of one pass over the pin map.
#[derive(Debug, Clone)]
pub struct ScanResult {
    pub outcomes: Vec<EntryOutcome>,
    pub error_count: usize,
    pub started_at: DateTime<Utc>,
    pub elapsed: Duration,
}

impl ScanResult {
    pub fn passed(&self) -> bool {
        self.error_count == 0
    }

    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn failed_labels(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|o| !o.passed)
            .map(|o| o.label.as_str())
            .collect()
    }
}

impl fmt::Display for ScanResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.passed() {
            write!(f, "Scan completed correctly")
        } else {
            write!(
                f,
                "Scan of {} pins completed with {} errors",
                self.total(),
                self.error_count
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_map() -> PinMap {
        PinMap::new(vec![
            PinMapEntry::new("GND 1", "D13", "A4"),
            PinMapEntry::new("GND 2", "D13", "A5"),
            PinMapEntry::new("SWO", "D12", "A1"),
        ])
    }

    #[test]
    fn test_outputs_are_distinct_in_table_order() {
        let map = sample_map();
        let outputs: Vec<&str> = map.outputs().into_iter().map(PinId::as_str).collect();
        assert_eq!(outputs, vec!["D13", "D12"]);
    }

    #[test]
    fn test_lines_pull_inputs_down() {
        let lines = sample_map().lines();
        assert_eq!(lines.len(), 5);
        assert!(lines
            .iter()
            .filter(|l| l.direction == Direction::Input)
            .all(|l| l.pull == Pull::Down));
    }

    #[test]
    fn test_report_wording() {
        let outcome = EntryOutcome {
            label: "SWO".to_string(),
            output: PinId::new("D12"),
            passed: false,
        };
        assert_eq!(outcome.to_string(), "SWO failed");

        let result = ScanResult {
            outcomes: vec![outcome],
            error_count: 1,
            started_at: Utc::now(),
            elapsed: Duration::ZERO,
        };
        assert_eq!(result.to_string(), "Scan of 1 pins completed with 1 errors");
        assert_eq!(result.failed_labels(), vec!["SWO"]);
    }
}
