use crate::core::indicators::StatusIndicators;
use crate::core::verifier::ContinuityVerifier;
use crate::core::{Board, EntryOutcome, PinMap, Reporter, ScanResult};
use crate::domain::model::{Direction, Pull};
use crate::utils::error::Result;
use chrono::Utc;
use std::time::{Duration, Instant};

/// One pass over the pin map, in table order.
pub struct ScanOrchestrator<'a> {
    pin_map: &'a PinMap,
    indicators: &'a StatusIndicators,
    step_delay: Duration,
}

impl<'a> ScanOrchestrator<'a> {
    pub fn new(pin_map: &'a PinMap, indicators: &'a StatusIndicators, step_delay: Duration) -> Self {
        Self {
            pin_map,
            indicators,
            step_delay,
        }
    }

    pub async fn scan<B: Board, R: Reporter>(
        &self,
        board: &mut B,
        reporter: &mut R,
    ) -> Result<ScanResult> {
        let started_at = Utc::now();
        let start = Instant::now();
        let verifier = ContinuityVerifier::new(self.pin_map);

        let mut outcomes = Vec::with_capacity(self.pin_map.len());
        let mut error_count = 0;
        let mut blink = false;

        tracing::info!("Scanning {} pins", self.pin_map.len());

        for entry in self.pin_map.entries() {
            blink = !blink;
            self.indicators.activity(board, blink)?;

            board.configure(&entry.output, Direction::Output, Pull::None)?;
            let passed = verifier.verify(board, &entry.output)?;
            if !passed {
                error_count += 1;
            }

            let outcome = EntryOutcome {
                label: entry.label.clone(),
                output: entry.output.clone(),
                passed,
            };
            reporter.entry(&outcome);
            outcomes.push(outcome);

            tokio::time::sleep(self.step_delay).await;
        }

        if error_count == 0 {
            self.indicators.success(board)?;
        } else {
            self.indicators.failure(board)?;
        }

        let result = ScanResult {
            outcomes,
            error_count,
            started_at,
            elapsed: start.elapsed(),
        };

        if result.passed() {
            tracing::info!("✅ All {} pins passed in {:?}", result.total(), result.elapsed);
        } else {
            tracing::warn!(
                "❌ {} of {} pins failed: {}",
                result.error_count,
                result.total(),
                result.failed_labels().join(", ")
            );
        }

        reporter.summary(&result);
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::console::MemoryReporter;
    use crate::adapters::simulated::{Fault, SimulatedBoard};
    use crate::config::toml_config::HarnessConfig;
    use crate::core::ConfigProvider;
    use crate::domain::model::Line;

    fn setup(config: &HarnessConfig, faults: &[&str]) -> SimulatedBoard {
        let mut board = SimulatedBoard::wired(config.pin_map());
        for spec in faults {
            board.inject(Fault::parse(spec, config.pin_map()).unwrap());
        }
        board.declare(&config.pin_map().lines()).unwrap();
        board
            .declare(&[
                Line::output(config.red_indicator().clone()),
                Line::output(config.green_indicator().clone()),
            ])
            .unwrap();
        board
    }

    fn indicators(config: &HarnessConfig) -> StatusIndicators {
        StatusIndicators::new(
            config.red_indicator().clone(),
            config.green_indicator().clone(),
        )
    }

    #[tokio::test]
    async fn test_scan_reports_every_entry_in_order() {
        let config = HarnessConfig::default();
        let mut board = setup(&config, &[]);
        let indicators = indicators(&config);
        let mut reporter = MemoryReporter::new();

        let orchestrator = ScanOrchestrator::new(config.pin_map(), &indicators, Duration::ZERO);
        let result = orchestrator.scan(&mut board, &mut reporter).await.unwrap();

        assert!(result.passed());
        assert_eq!(result.total(), 8);
        let labels: Vec<&str> = result.outcomes.iter().map(|o| o.label.as_str()).collect();
        assert_eq!(
            labels,
            vec!["GND 1", "GND 2", "GND 3", "SWDIO", "SWO", "nRESET", "SWCK", "VTRef"]
        );
        assert_eq!(reporter.lines()[0], "GND 1 passed");
        assert_eq!(board.level(indicators.green()), Some(true));
        assert_eq!(board.level(indicators.red()), Some(false));
    }

    #[tokio::test]
    async fn test_open_entry_counts_one_error() {
        let config = HarnessConfig::default();
        let mut board = setup(&config, &["open:nRESET"]);
        let indicators = indicators(&config);
        let mut reporter = MemoryReporter::new();

        let orchestrator = ScanOrchestrator::new(config.pin_map(), &indicators, Duration::ZERO);
        let result = orchestrator.scan(&mut board, &mut reporter).await.unwrap();

        assert_eq!(result.error_count, 1);
        assert_eq!(result.failed_labels(), vec!["nRESET"]);
        assert!(reporter
            .lines()
            .contains(&"Scan of 8 pins completed with 1 errors".to_string()));
        assert_eq!(board.level(indicators.red()), Some(true));
        assert_eq!(board.level(indicators.green()), Some(false));
    }

    #[tokio::test]
    async fn test_indicators_alternate_per_entry() {
        let config = HarnessConfig::default();
        let mut board = setup(&config, &[]);
        let indicators = indicators(&config);
        let mut reporter = MemoryReporter::new();

        let orchestrator = ScanOrchestrator::new(config.pin_map(), &indicators, Duration::ZERO);
        orchestrator.scan(&mut board, &mut reporter).await.unwrap();

        let red_writes: Vec<bool> = board
            .write_log()
            .iter()
            .filter(|(pin, _)| pin == indicators.red())
            .map(|(_, level)| *level)
            .collect();
        // 8 blinks then the final result
        assert_eq!(
            red_writes,
            vec![true, false, true, false, true, false, true, false, false]
        );
    }
}
