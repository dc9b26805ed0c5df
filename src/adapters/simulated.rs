use crate::domain::model::{Direction, Line, PinId, PinMap, Pull};
use crate::domain::ports::Board;
use crate::utils::error::{ClipError, Result};
use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

/// Wiring faults the simulated clip can carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fault {
    /// No wire reaches this input.
    Open { input: PinId },
    /// Two inputs share one net.
    Short { a: PinId, b: PinId },
    /// Input tied to the supply.
    StuckHigh { input: PinId },
}

impl Fault {
    /// Parses `open:<label>`, `short:<label>=<label>` or `stuck:<label>`.
    ///
    /// Labels name pin map entries and resolve to the entry's input pin. A bare
    /// input pin name is accepted as well.
    pub fn parse(spec: &str, pin_map: &PinMap) -> Result<Self> {
        let invalid = |reason: &str| ClipError::FaultSpecError {
            spec: spec.to_string(),
            reason: reason.to_string(),
        };

        let (kind, target) = spec
            .split_once(':')
            .ok_or_else(|| invalid("expected <kind>:<target>"))?;

        let resolve = |name: &str| -> Result<PinId> {
            let name = name.trim();
            if let Some(entry) = pin_map.entry(name) {
                return Ok(entry.input.clone());
            }
            pin_map
                .inputs()
                .find(|pin| pin.as_str() == name)
                .cloned()
                .ok_or_else(|| invalid(&format!("'{}' is neither a label nor an input pin", name)))
        };

        match kind.trim() {
            "open" => Ok(Fault::Open {
                input: resolve(target)?,
            }),
            "stuck" => Ok(Fault::StuckHigh {
                input: resolve(target)?,
            }),
            "short" => {
                let (a, b) = target
                    .split_once('=')
                    .ok_or_else(|| invalid("short needs <label>=<label>"))?;
                let (a, b) = (resolve(a)?, resolve(b)?);
                if a == b {
                    return Err(invalid("cannot short an input to itself"));
                }
                Ok(Fault::Short { a, b })
            }
            other => Err(invalid(&format!(
                "unknown fault kind '{}', expected open, short or stuck",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone)]
struct SimLine {
    direction: Direction,
    pull: Pull,
    level: bool,
}

/// Host model of the clip under test.
#[derive(Debug, Default)]
pub struct SimulatedBoard {
    lines: HashMap<PinId, SimLine>,
    wires: Vec<(PinId, PinId)>,
    faults: Vec<Fault>,
    external: HashMap<PinId, bool>,
    scripts: HashMap<PinId, VecDeque<bool>>,
    failing_reads: HashSet<PinId>,
    failing_writes: HashSet<PinId>,
    write_log: Vec<(PinId, bool)>,
}

impl SimulatedBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// A board whose wires follow the pin map exactly.
    pub fn wired(pin_map: &PinMap) -> Self {
        let mut board = Self::new();
        for entry in pin_map.entries() {
            board.wire(entry.output.clone(), entry.input.clone());
        }
        board
    }

    pub fn wire(&mut self, output: PinId, input: PinId) {
        self.wires.push((output, input));
    }

    pub fn inject(&mut self, fault: Fault) {
        tracing::debug!("Injecting fault: {:?}", fault);
        self.faults.push(fault);
    }

    pub fn declare(&mut self, lines: &[Line]) -> Result<()> {
        for line in lines {
            self.configure(&line.pin, line.direction, line.pull)?;
        }
        Ok(())
    }

    /// Holds an input at a level from outside the harness (e.g. a pressed switch).
    pub fn drive_external(&mut self, pin: &PinId, level: bool) {
        self.external.insert(pin.clone(), level);
    }

    pub fn release_external(&mut self, pin: &PinId) {
        self.external.remove(pin);
    }

    /// Queues levels returned by successive reads of `pin`; once drained the pin
    /// falls back to its external level or pull.
    pub fn script(&mut self, pin: &PinId, levels: impl IntoIterator<Item = bool>) {
        self.scripts.entry(pin.clone()).or_default().extend(levels);
    }

    pub fn fail_reads(&mut self, pin: &PinId) {
        self.failing_reads.insert(pin.clone());
    }

    pub fn fail_writes(&mut self, pin: &PinId) {
        self.failing_writes.insert(pin.clone());
    }

    /// Driven level of an output, `None` if the pin is not an output.
    pub fn level(&self, pin: &PinId) -> Option<bool> {
        self.lines
            .get(pin)
            .filter(|line| line.direction == Direction::Output)
            .map(|line| line.level)
    }

    pub fn asserted_outputs(&self) -> BTreeSet<PinId> {
        self.lines
            .iter()
            .filter(|(_, line)| line.direction == Direction::Output && line.level)
            .map(|(pin, _)| pin.clone())
            .collect()
    }

    pub fn write_log(&self) -> &[(PinId, bool)] {
        &self.write_log
    }

    /// Inputs joined to `pin` through shorts, `pin` included.
    fn net_of(&self, pin: &PinId) -> HashSet<PinId> {
        let mut net = HashSet::from([pin.clone()]);
        let mut pending = vec![pin.clone()];

        while let Some(current) = pending.pop() {
            for fault in &self.faults {
                if let Fault::Short { a, b } = fault {
                    let other = if a == &current {
                        b
                    } else if b == &current {
                        a
                    } else {
                        continue;
                    };
                    if net.insert(other.clone()) {
                        pending.push(other.clone());
                    }
                }
            }
        }
        net
    }

    fn is_open(&self, input: &PinId) -> bool {
        self.faults
            .iter()
            .any(|f| matches!(f, Fault::Open { input: open } if open == input))
    }

    fn net_is_driven(&self, net: &HashSet<PinId>) -> bool {
        let stuck = self
            .faults
            .iter()
            .any(|f| matches!(f, Fault::StuckHigh { input } if net.contains(input)));
        if stuck {
            return true;
        }

        self.wires.iter().any(|(output, input)| {
            net.contains(input) && !self.is_open(input) && self.level(output) == Some(true)
        })
    }
}

impl Board for SimulatedBoard {
    fn configure(&mut self, pin: &PinId, direction: Direction, pull: Pull) -> Result<()> {
        let line = self.lines.entry(pin.clone()).or_insert(SimLine {
            direction,
            pull,
            level: false,
        });
        if line.direction != direction {
            line.level = false;
        }
        line.direction = direction;
        line.pull = pull;
        Ok(())
    }

    fn write(&mut self, pin: &PinId, level: bool) -> Result<()> {
        if self.failing_writes.contains(pin) {
            return Err(ClipError::line(pin, "simulated write failure"));
        }

        let line = self
            .lines
            .get_mut(pin)
            .ok_or_else(|| ClipError::line(pin, "line is not configured"))?;
        if line.direction != Direction::Output {
            return Err(ClipError::line(pin, "cannot drive an input"));
        }
        line.level = level;
        self.write_log.push((pin.clone(), level));
        Ok(())
    }

    fn read(&mut self, pin: &PinId) -> Result<bool> {
        if self.failing_reads.contains(pin) {
            return Err(ClipError::line(pin, "simulated read failure"));
        }

        let pull = match self.lines.get(pin) {
            Some(line) if line.direction == Direction::Input => line.pull,
            Some(_) => return Err(ClipError::line(pin, "cannot read an output")),
            None => return Err(ClipError::line(pin, "line is not configured")),
        };

        if let Some(level) = self.scripts.get_mut(pin).and_then(|queue| queue.pop_front()) {
            return Ok(level);
        }

        if self.net_is_driven(&self.net_of(pin)) {
            return Ok(true);
        }

        if let Some(level) = self.external.get(pin) {
            return Ok(*level);
        }

        Ok(pull == Pull::Up)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::PinMapEntry;

    fn map() -> PinMap {
        PinMap::new(vec![
            PinMapEntry::new("SWO", "D12", "A1"),
            PinMapEntry::new("SWCK", "D9", "A0"),
            PinMapEntry::new("VTRef", "D6", "MOSI"),
        ])
    }

    fn board(faults: &[Fault]) -> SimulatedBoard {
        let map = map();
        let mut board = SimulatedBoard::wired(&map);
        for fault in faults {
            board.inject(fault.clone());
        }
        board.declare(&map.lines()).unwrap();
        board
    }

    #[test]
    fn test_wired_input_follows_output() {
        let mut board = board(&[]);
        let (d12, a1, a0) = (PinId::new("D12"), PinId::new("A1"), PinId::new("A0"));

        assert!(!board.read(&a1).unwrap());
        board.write(&d12, true).unwrap();
        assert!(board.read(&a1).unwrap());
        assert!(!board.read(&a0).unwrap());
    }

    #[test]
    fn test_short_joins_nets() {
        let mut board = board(&[Fault::Short {
            a: PinId::new("A1"),
            b: PinId::new("A0"),
        }]);

        board.write(&PinId::new("D9"), true).unwrap();
        assert!(board.read(&PinId::new("A1")).unwrap());
        assert!(!board.read(&PinId::new("MOSI")).unwrap());
    }

    #[test]
    fn test_open_input_stays_at_pull() {
        let mut board = board(&[Fault::Open {
            input: PinId::new("MOSI"),
        }]);

        board.write(&PinId::new("D6"), true).unwrap();
        assert!(!board.read(&PinId::new("MOSI")).unwrap());
    }

    #[test]
    fn test_pull_up_and_script() {
        let mut board = board(&[]);
        let start = PinId::new("D5");
        board.configure(&start, Direction::Input, Pull::Up).unwrap();

        assert!(board.read(&start).unwrap());
        board.script(&start, [false, false]);
        assert!(!board.read(&start).unwrap());
        assert!(!board.read(&start).unwrap());
        assert!(board.read(&start).unwrap());

        board.drive_external(&start, false);
        assert!(!board.read(&start).unwrap());
        board.release_external(&start);
        assert!(board.read(&start).unwrap());
    }

    #[test]
    fn test_direction_misuse_is_an_error() {
        let mut board = board(&[]);
        assert!(board.write(&PinId::new("A1"), true).is_err());
        assert!(board.read(&PinId::new("D12")).is_err());
        assert!(board.read(&PinId::new("D2")).is_err());
    }

    #[test]
    fn test_parse_faults() {
        let map = map();
        assert_eq!(
            Fault::parse("short:SWO=SWCK", &map).unwrap(),
            Fault::Short {
                a: PinId::new("A1"),
                b: PinId::new("A0"),
            }
        );
        assert_eq!(
            Fault::parse("open:MOSI", &map).unwrap(),
            Fault::Open {
                input: PinId::new("MOSI"),
            }
        );
        assert!(Fault::parse("stuck:VTRef", &map).is_ok());
        assert!(Fault::parse("open:GND 9", &map).is_err());
        assert!(Fault::parse("short:SWO", &map).is_err());
        assert!(Fault::parse("short:SWO=SWO", &map).is_err());
        assert!(Fault::parse("melt:SWO", &map).is_err());
        assert!(Fault::parse("SWO", &map).is_err());
    }
}
