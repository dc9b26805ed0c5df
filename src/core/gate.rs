/// Where the control loop stands relative to the start control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GateState {
    #[default]
    Idle,
    Scanning,
    DoneWaitingForRelease,
}

/// Start-control state machine. The control is active-low: a physical `false`
/// means pressed.
///
/// After a scan the control has to read released before another press is
/// honoured, so holding it down never re-triggers a scan.
#[derive(Debug, Clone, Default)]
pub struct ActivationGate {
    state: GateState,
}

impl ActivationGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    /// Feeds one physical reading of the start control. Returns `true` when the
    /// reading starts a scan.
    pub fn on_start_level(&mut self, physical: bool) -> bool {
        let pressed = !physical;
        match (self.state, pressed) {
            (GateState::Idle, true) => {
                self.state = GateState::Scanning;
                true
            }
            (GateState::DoneWaitingForRelease, false) => {
                self.state = GateState::Idle;
                false
            }
            _ => false,
        }
    }

    pub fn on_scan_complete(&mut self) {
        if self.state == GateState::Scanning {
            self.state = GateState::DoneWaitingForRelease;
        }
    }
}
