use std::{fmt::Display, fs, path::Path, str::FromStr};

use crate::{
    cpu::{OpCode, UnknownMnemonic},
    error::{LoadError, ParseError},
};

/// A single encoded instruction. The code byte is decoded by the emulator at fetch time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    pub code: u8,
    pub argument: i64,
}

impl Instruction {
    pub fn new(op: OpCode, argument: i64) -> Self {
        Self {
            code: op as u8,
            argument,
        }
    }

    pub fn raw(code: u8, argument: i64) -> Self {
        Self { code, argument }
    }

    pub fn opcode(&self) -> Option<OpCode> {
        OpCode::try_from(self.code).ok()
    }
}

impl Display for Instruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.opcode() {
            Some(op) => write!(f, "{} {:+}", op, self.argument),
            None => write!(f, "?{} {:+}", self.code, self.argument),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    instructions: Vec<Instruction>,
}

impl Program {
    pub fn new(instructions: Vec<Instruction>) -> Self {
        Self { instructions }
    }

    /// Reads and parses the program stored at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let program = text.parse::<Program>()?;
        log::info!("loaded {} instructions from {}", program.len(), path.display());
        Ok(program)
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Instruction> {
        self.instructions.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Instruction> {
        self.instructions.iter()
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// A copy of this program with the instruction at `index` replaced.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn with_patch(&self, index: usize, instruction: Instruction) -> Program {
        let mut patched = self.clone();
        patched.instructions[index] = instruction;
        patched
    }
}

impl From<Vec<Instruction>> for Program {
    fn from(instructions: Vec<Instruction>) -> Self {
        Self::new(instructions)
    }
}

fn parse_line(line: usize, text: &str) -> Result<Instruction, ParseError> {
    let (mnemonic, rest) = text.split_once(' ').ok_or_else(|| ParseError::MissingArgument {
        line,
        text: text.to_string(),
    })?;

    let op = mnemonic
        .parse::<OpCode>()
        .map_err(|UnknownMnemonic(mnemonic)| ParseError::UnknownOperation { line, mnemonic })?;

    let mut fields = rest.split_whitespace();
    let argument = fields.next().ok_or_else(|| ParseError::MissingArgument {
        line,
        text: text.to_string(),
    })?;
    if let Some(extra) = fields.next() {
        return Err(ParseError::TrailingInput {
            line,
            rest: extra.to_string(),
        });
    }

    let argument = argument
        .parse::<i64>()
        .map_err(|source| ParseError::InvalidArgument {
            line,
            argument: argument.to_string(),
            source,
        })?;

    Ok(Instruction::new(op, argument))
}

impl FromStr for Program {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.lines()
            .enumerate()
            .map(|(index, line)| (index + 1, line.trim()))
            .filter(|(_, line)| !line.is_empty())
            .map(|(line, text)| parse_line(line, text))
            .collect::<Result<Vec<_>, _>>()
            .map(Program::new)
    }
}
