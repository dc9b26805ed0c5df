use crate::core::{Board, PinId};
use crate::utils::error::Result;

/// Red/green status LEDs.
#[derive(Debug, Clone)]
pub struct StatusIndicators {
    red: PinId,
    green: PinId,
}

impl StatusIndicators {
    pub fn new(red: PinId, green: PinId) -> Self {
        Self { red, green }
    }

    pub fn red(&self) -> &PinId {
        &self.red
    }

    pub fn green(&self) -> &PinId {
        &self.green
    }

    /// Both lit while waiting for the start control.
    pub fn idle<B: Board>(&self, board: &mut B) -> Result<()> {
        self.show(board, true, true)
    }

    /// Alternating blink during a scan.
    pub fn activity<B: Board>(&self, board: &mut B, toggle: bool) -> Result<()> {
        self.show(board, toggle, !toggle)
    }

    pub fn success<B: Board>(&self, board: &mut B) -> Result<()> {
        self.show(board, false, true)
    }

    pub fn failure<B: Board>(&self, board: &mut B) -> Result<()> {
        self.show(board, true, false)
    }

    fn show<B: Board>(&self, board: &mut B, red: bool, green: bool) -> Result<()> {
        board.write(&self.red, red)?;
        board.write(&self.green, green)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::simulated::SimulatedBoard;
    use crate::domain::model::Line;

    fn setup() -> (StatusIndicators, SimulatedBoard) {
        let indicators = StatusIndicators::new(PinId::new("SDA"), PinId::new("SCL"));
        let mut board = SimulatedBoard::new();
        board
            .declare(&[
                Line::output(indicators.red().clone()),
                Line::output(indicators.green().clone()),
            ])
            .unwrap();
        (indicators, board)
    }

    fn lit(indicators: &StatusIndicators, board: &SimulatedBoard) -> (bool, bool) {
        (
            board.level(indicators.red()).unwrap(),
            board.level(indicators.green()).unwrap(),
        )
    }

    #[test]
    fn test_indicator_states() {
        let (indicators, mut board) = setup();

        indicators.idle(&mut board).unwrap();
        assert_eq!(lit(&indicators, &board), (true, true));

        indicators.activity(&mut board, true).unwrap();
        assert_eq!(lit(&indicators, &board), (true, false));
        indicators.activity(&mut board, false).unwrap();
        assert_eq!(lit(&indicators, &board), (false, true));

        indicators.success(&mut board).unwrap();
        assert_eq!(lit(&indicators, &board), (false, true));

        indicators.failure(&mut board).unwrap();
        assert_eq!(lit(&indicators, &board), (true, false));
    }
}
