use std::{num::ParseIntError, path::PathBuf};

use thiserror::Error;

/// Malformed program text. Line numbers are 1-based.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("line {line}: expected `<operation> <argument>`, got `{text}`")]
    MissingArgument { line: usize, text: String },

    #[error("line {line}: unknown operation `{mnemonic}`")]
    UnknownOperation { line: usize, mnemonic: String },

    #[error("line {line}: invalid argument `{argument}`: {source}")]
    InvalidArgument {
        line: usize,
        argument: String,
        source: ParseIntError,
    },

    #[error("line {line}: unexpected trailing input `{rest}`")]
    TrailingInput { line: usize, rest: String },
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read program from `{}`", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Conditions that abort a run. Loops and normal termination are results, not errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EmulatorError {
    #[error("unknown opcode {code:#04x} at instruction {ip}")]
    UnknownOpCode { code: u8, ip: usize },
}
