use crate::domain::model::{EntryOutcome, ScanResult};
use crate::domain::ports::Reporter;

/// Prints the scan report to stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleReporter;

impl ConsoleReporter {
    pub fn new() -> Self {
        Self
    }
}

impl Reporter for ConsoleReporter {
    fn entry(&mut self, outcome: &EntryOutcome) {
        println!("{}", outcome);
    }

    fn summary(&mut self, result: &ScanResult) {
        println!("{}", result);
        println!();
        println!();
    }
}

/// Keeps report lines in memory, blank separators included.
#[derive(Debug, Default, Clone)]
pub struct MemoryReporter {
    lines: Vec<String>,
}

impl MemoryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn text(&self) -> String {
        self.lines.iter().map(|l| format!("{}\n", l)).collect()
    }
}

impl Reporter for MemoryReporter {
    fn entry(&mut self, outcome: &EntryOutcome) {
        self.lines.push(outcome.to_string());
    }

    fn summary(&mut self, result: &ScanResult) {
        self.lines.push(result.to_string());
        self.lines.push(String::new());
        self.lines.push(String::new());
    }
}
