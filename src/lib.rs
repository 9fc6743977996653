pub mod cpu;
pub mod error;
pub mod program;

use cpu::{Cpu, OpCode, State, UnknownOpCode};
use log::{debug, info};
use program::{Instruction, Program};

pub use error::{EmulatorError, LoadError, ParseError};

/// Outcome of a single run: the final registers plus how the run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunReport {
    pub state: State,
    pub acc: i64,
    pub ip: i64,
    /// Distinct instructions executed before the run stopped.
    pub executed: usize,
}

impl RunReport {
    pub fn loop_detected(&self) -> bool {
        self.state == State::LoopDetected
    }

    pub fn terminated(&self) -> bool {
        self.state == State::Terminated
    }
}

/// A single flipped instruction that makes the program terminate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repair {
    pub index: usize,
    pub original: Instruction,
    pub patched: Instruction,
    pub report: RunReport,
}

/// Executes a borrowed program, stopping on termination or on the first revisited instruction.
///
/// Every instruction index is marked visited right before it executes, so a run performs
/// at most `program.len() + 1` steps.
pub struct EmulationEngine<'p> {
    pub(crate) cpu: Cpu,
    program: &'p Program,
    visited: Vec<bool>,
    executed: usize,
}

impl<'p> EmulationEngine<'p> {
    pub fn new(program: &'p Program) -> Self {
        Self {
            cpu: Cpu::new(),
            program,
            visited: vec![false; program.len()],
            executed: 0,
        }
    }

    pub fn cpu(&self) -> &Cpu {
        &self.cpu
    }

    fn reset(&mut self) {
        self.cpu.reset();
        self.visited.iter_mut().for_each(|v| *v = false);
        self.executed = 0;
    }

    fn debug_state(&self, instr: Instruction) {
        debug!(
            "{} => State: IP: {:4}, ACC: {:6}",
            instr, self.cpu.ip, self.cpu.acc
        );
    }

    fn report(&self) -> RunReport {
        RunReport {
            state: self.cpu.state,
            acc: self.cpu.acc,
            ip: self.cpu.ip,
            executed: self.executed,
        }
    }

    /// Advances the machine by one instruction and returns the state it lands in.
    pub fn step(&mut self) -> Result<State, EmulatorError> {
        if self.cpu.state != State::Running {
            return Ok(self.cpu.state);
        }

        // Both directions leave the program the same way.
        let ip = match usize::try_from(self.cpu.ip) {
            Ok(ip) if ip < self.program.len() => ip,
            _ => {
                self.cpu.state = State::Terminated;
                return Ok(self.cpu.state);
            }
        };

        if self.visited[ip] {
            self.cpu.state = State::LoopDetected;
            return Ok(self.cpu.state);
        }
        self.visited[ip] = true;
        self.executed += 1;

        let instr = self.program.instructions()[ip];
        let op = OpCode::try_from(instr.code)
            .map_err(|UnknownOpCode(code)| EmulatorError::UnknownOpCode { code, ip })?;

        match op {
            OpCode::Acc => {
                self.cpu.acc = self.cpu.acc.wrapping_add(instr.argument);
                self.cpu.ip += 1;
            }
            OpCode::Jmp => {
                // Saturation still lands outside the program.
                self.cpu.ip = self.cpu.ip.saturating_add(instr.argument);
            }
            OpCode::Nop => {
                self.cpu.ip += 1;
            }
        }

        self.debug_state(instr);
        Ok(self.cpu.state)
    }

    /// Runs the program from a fresh state until it terminates or revisits an instruction.
    pub fn run(&mut self) -> Result<RunReport, EmulatorError> {
        self.reset();

        while self.step()? == State::Running {}

        info!("{}", self.cpu);
        Ok(self.report())
    }
}

/// Runs `program` once on a fresh engine.
pub fn run(program: &Program) -> Result<RunReport, EmulatorError> {
    EmulationEngine::new(program).run()
}

/// Tries flipping each `jmp`/`nop` in program order and returns the first flip that stops the
/// program from looping.
pub fn repair(program: &Program) -> Result<Option<Repair>, EmulatorError> {
    for (index, &original) in program.iter().enumerate() {
        let op = OpCode::try_from(original.code)
            .map_err(|UnknownOpCode(code)| EmulatorError::UnknownOpCode { code, ip: index })?;

        let Some(flipped) = op.flipped() else {
            continue;
        };

        let patched = Instruction::new(flipped, original.argument);
        debug!("changing {} => {} at {}", original, patched, index);

        let candidate = program.with_patch(index, patched);
        let report = run(&candidate)?;

        if report.loop_detected() {
            debug!("patched program still loops at {}", report.ip);
            continue;
        }

        info!(
            "repaired instruction {}: {} => {}, acc = {}",
            index, original, patched, report.acc
        );
        return Ok(Some(Repair {
            index,
            original,
            patched,
            report,
        }));
    }

    Ok(None)
}
