use std::fmt;

use thiserror::Error;

/// Where a compile diagnostic points: the end of input or a concrete lexeme.
/// Scanner diagnostics carry no location suffix at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorLocation {
    End,
    Lexeme(String),
}

impl fmt::Display for ErrorLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorLocation::End => write!(f, " at end"),
            ErrorLocation::Lexeme(lexeme) => write!(f, " at '{lexeme}'"),
        }
    }
}

/// The three diagnostic tiers plus driver-level I/O failures. `Display`
/// renders the exact wire format the CLI writes to stderr.
#[derive(Debug, Error)]
pub enum LoxError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("[line {line}] Error: {message}")]
    Scan { message: String, line: usize },

    #[error("[line {line}] Error{at}: {message}")]
    Compile {
        message: String,
        line: usize,
        at: ErrorLocation,
    },

    #[error("{message}\n[line {line}] in script")]
    Runtime { message: String, line: usize },
}
