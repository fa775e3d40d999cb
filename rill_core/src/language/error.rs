use std::fmt;

use crate::language::token::{Token, TokenType};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Lexer,
    Parser,
    Runtime,
}

/// Where a diagnostic points inside the source, as rendered after `Error`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    None,
    AtEnd,
    At(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    pub kind: ErrorKind,
    pub message: String,
    pub line: usize,
    pub location: Location,
}

impl Error {
    /// Builds an error anchored at a token, pointing `at end` for the
    /// end-of-input sentinel and `at '<lexeme>'` for everything else.
    pub fn at_token(kind: ErrorKind, token: &Token, message: impl Into<String>) -> Self {
        let location = match token.token_type {
            TokenType::Eof => Location::AtEnd,
            _ => Location::At(token.lexeme.clone()),
        };
        Error {
            kind,
            message: message.into(),
            line: token.line,
            location,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::None => Ok(()),
            Location::AtEnd => write!(f, " at end"),
            Location::At(lexeme) => write!(f, " at '{lexeme}'"),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ErrorKind::Runtime => {
                write!(f, "[line {}] RuntimeError: {}", self.line, self.message)
            }
            _ => write!(
                f,
                "[line {}] Error{}: {}",
                self.line, self.location, self.message
            ),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(io_error: std::io::Error) -> Self {
        Error {
            kind: ErrorKind::Runtime,
            message: format!("Failed to write output: {io_error}"),
            line: 0,
            location: Location::None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[macro_export]
macro_rules! lexer_error {
    ($msg:expr, $line:expr) => {
        Err($crate::language::error::Error {
            kind: $crate::language::error::ErrorKind::Lexer,
            message: $msg.to_string(),
            line: $line,
            location: $crate::language::error::Location::None,
        })
    };
}

#[macro_export]
macro_rules! runtime_error {
    ($token:expr, $msg:expr) => {
        Err($crate::language::error::Error::at_token(
            $crate::language::error::ErrorKind::Runtime,
            $token,
            $msg,
        ))
    };
}
