use crate::core::gate::{ActivationGate, GateState};
use crate::core::indicators::StatusIndicators;
use crate::core::scan::ScanOrchestrator;
use crate::core::{Board, ConfigProvider, Reporter, ScanResult};
use crate::domain::model::{Direction, Line, Pull};
use crate::utils::error::Result;

/// What one iteration of the control loop did.
#[derive(Debug, Clone)]
pub enum PollEvent {
    /// Start control not pressed.
    Idle,
    Scanned(ScanResult),
    /// Scan finished but the control is still held.
    Holding,
    /// Control released, back to idle.
    Released,
}

/// The perpetual test loop: wait for the start control, scan, wait for release.
pub struct Controller<B: Board, C: ConfigProvider, R: Reporter> {
    board: B,
    config: C,
    reporter: R,
    gate: ActivationGate,
    indicators: StatusIndicators,
}

impl<B: Board, C: ConfigProvider, R: Reporter> Controller<B, C, R> {
    pub fn new(board: B, config: C, reporter: R) -> Self {
        let indicators = StatusIndicators::new(
            config.red_indicator().clone(),
            config.green_indicator().clone(),
        );
        Self {
            board,
            config,
            reporter,
            gate: ActivationGate::new(),
            indicators,
        }
    }

    pub fn board(&self) -> &B {
        &self.board
    }

    pub fn board_mut(&mut self) -> &mut B {
        &mut self.board
    }

    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    pub fn gate_state(&self) -> GateState {
        self.gate.state()
    }

    /// Declares every line, drives all outputs low and lights both indicators.
    pub fn setup(&mut self) -> Result<()> {
        let mut lines = self.config.pin_map().lines();
        lines.push(Line::output(self.indicators.red().clone()));
        lines.push(Line::output(self.indicators.green().clone()));
        lines.push(Line::input(self.config.start_pin().clone(), Pull::Up));

        for line in &lines {
            self.board.configure(&line.pin, line.direction, line.pull)?;
            if line.direction == Direction::Output {
                self.board.write(&line.pin, false)?;
            }
        }

        self.indicators.idle(&mut self.board)?;
        tracing::debug!("Configured {} lines", lines.len());
        Ok(())
    }

    pub async fn poll(&mut self) -> Result<PollEvent> {
        match self.gate.state() {
            GateState::Idle => {
                let level = self.board.read(self.config.start_pin())?;
                if self.gate.on_start_level(level) {
                    tracing::info!("▶️ Start pressed");
                    let result = self.scan().await?;
                    Ok(PollEvent::Scanned(result))
                } else {
                    tokio::time::sleep(self.config.idle_poll()).await;
                    Ok(PollEvent::Idle)
                }
            }
            // scan() never leaves the gate in Scanning
            GateState::Scanning | GateState::DoneWaitingForRelease => {
                tokio::time::sleep(self.config.release_poll()).await;
                let level = self.board.read(self.config.start_pin())?;
                self.gate.on_start_level(level);

                if self.gate.state() == GateState::Idle {
                    self.indicators.idle(&mut self.board)?;
                    tracing::debug!("Start released");
                    Ok(PollEvent::Released)
                } else {
                    Ok(PollEvent::Holding)
                }
            }
        }
    }

    /// Runs until the board fails.
    pub async fn run(&mut self) -> Result<()> {
        loop {
            self.poll().await?;
        }
    }

    /// Polls until `count` scans have completed and the control has been
    /// released after the last one.
    pub async fn run_scans(&mut self, count: usize) -> Result<Vec<ScanResult>> {
        let mut results = Vec::with_capacity(count);
        while results.len() < count || self.gate.state() != GateState::Idle {
            if let PollEvent::Scanned(result) = self.poll().await? {
                results.push(result);
            }
        }
        Ok(results)
    }

    async fn scan(&mut self) -> Result<ScanResult> {
        let orchestrator = ScanOrchestrator::new(
            self.config.pin_map(),
            &self.indicators,
            self.config.step_delay(),
        );
        let result = orchestrator.scan(&mut self.board, &mut self.reporter).await;

        // an aborted scan still needs a fresh press before the next one
        self.gate.on_scan_complete();
        result
    }
}
