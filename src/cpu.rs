use std::{fmt::Display, str::FromStr};

/// Where a run currently stands. Both non-running states are absorbing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Running,
    Terminated,
    LoopDetected,
}

impl Display for State {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            State::Running => "running",
            State::Terminated => "terminated",
            State::LoopDetected => "loop-detected",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cpu {
    pub acc: i64,     // The accumulator register
    pub ip: i64,      // The instruction pointer, may leave the program in either direction
    pub state: State, // Flag keeping the current running state
}

impl Display for Cpu {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Cpu [ acc: {}, ip: {}, state: {} ]", self.acc, self.ip, self.state)
    }
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}

impl Cpu {
    pub fn new() -> Self {
        Cpu {
            acc: 0,
            ip: 0,
            state: State::Running,
        }
    }

    pub fn reset(&mut self) {
        *self = Cpu::new();
    }
}

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpCode {
    Acc = 0, // A += arg, IP += 1
    Jmp = 1, // IP += arg
    Nop = 2, // IP += 1
}

/// Returned when a raw code byte does not name any operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownOpCode(pub u8);

impl TryFrom<u8> for OpCode {
    type Error = UnknownOpCode;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        match v {
            0 => Ok(Self::Acc),
            1 => Ok(Self::Jmp),
            2 => Ok(Self::Nop),
            _ => Err(UnknownOpCode(v)),
        }
    }
}

impl OpCode {
    pub fn mnemonic(self) -> &'static str {
        match self {
            OpCode::Acc => "acc",
            OpCode::Jmp => "jmp",
            OpCode::Nop => "nop",
        }
    }

    /// The operation a single-fault repair swaps this one for. `acc` is never corrupted.
    pub fn flipped(self) -> Option<OpCode> {
        match self {
            OpCode::Acc => None,
            OpCode::Jmp => Some(OpCode::Nop),
            OpCode::Nop => Some(OpCode::Jmp),
        }
    }
}

impl Display for OpCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.mnemonic())
    }
}

/// Returned when a mnemonic does not name any operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMnemonic(pub String);

impl Display for UnknownMnemonic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown operation `{}`", self.0)
    }
}

impl std::error::Error for UnknownMnemonic {}

impl FromStr for OpCode {
    type Err = UnknownMnemonic;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "acc" => Ok(OpCode::Acc),
            "jmp" => Ok(OpCode::Jmp),
            "nop" => Ok(OpCode::Nop),
            other => Err(UnknownMnemonic(other.to_string())),
        }
    }
}
