use crate::core::{Board, PinId, PinMap};
use crate::utils::error::{ClipError, Result};

/// Why an input disagreed with the asserted output. Diagnostic only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MismatchKind {
    /// Paired input stayed low.
    Open,
    /// Unrelated input went high.
    Short,
}

/// Drives one output and checks that only its paired inputs follow.
pub struct ContinuityVerifier<'a> {
    pin_map: &'a PinMap,
}

impl<'a> ContinuityVerifier<'a> {
    pub fn new(pin_map: &'a PinMap) -> Self {
        Self { pin_map }
    }

    /// Returns `Ok(false)` for any wiring fault. `Err` is reserved for board I/O
    /// failures; the output is deasserted before returning in every case.
    pub fn verify<B: Board>(&self, board: &mut B, output: &PinId) -> Result<bool> {
        if !self.pin_map.is_output(output) {
            return Err(ClipError::UnknownOutput {
                pin: output.to_string(),
            });
        }

        if let Err(e) = board.write(output, true) {
            if let Err(cleanup) = board.write(output, false) {
                tracing::warn!("Failed to deassert {} after a failed assert: {}", output, cleanup);
            }
            return Err(e);
        }

        let checked = self.check_inputs(board, output);

        board.write(output, false)?;
        checked
    }

    fn check_inputs<B: Board>(&self, board: &mut B, output: &PinId) -> Result<bool> {
        let mut result = true;

        // no early exit, every mismatch gets logged
        for entry in self.pin_map.entries() {
            let expected = &entry.output == output;
            let level = board.read(&entry.input)?;

            if level != expected {
                let kind = if expected {
                    MismatchKind::Open
                } else {
                    MismatchKind::Short
                };
                tracing::debug!(
                    "{:?} on {} ({}): read {} while {} asserted",
                    kind,
                    entry.input,
                    entry.label,
                    level,
                    output
                );
                result = false;
            }
        }

        Ok(result)
    }
}
