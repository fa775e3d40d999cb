use std::io::Write;

use log::{debug, error, info};

pub mod language;

pub use language::error::{Error, ErrorKind, Result};
pub use language::interpreter::{Interpreter, Value};
pub use language::lexer::Lexer;
pub use language::parser::Parser;

/// How one interpretation batch ended. File mode maps this to the process
/// exit status; the interactive prompt ignores it and keeps going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Success,
    SyntaxError,
    RuntimeError,
}

/// One interpreter session. The session owns the interpreter, and with it
/// the global environment, so successive batches (a whole file, or prompt
/// lines one at a time) see each other's top-level state. Each `run` call is
/// its own batch: earlier syntax or runtime failures never leak into the
/// next call.
pub struct Session {
    interpreter: Interpreter,
}

impl Session {
    pub fn new() -> Self {
        Session {
            interpreter: Interpreter::new(),
        }
    }

    pub fn with_output(out: Box<dyn Write>) -> Self {
        Session {
            interpreter: Interpreter::with_output(out),
        }
    }

    /// Runs one batch of source text: scan, parse, report every syntax
    /// diagnostic, and only when there were none, interpret. A runtime error
    /// aborts the rest of the batch after being reported.
    pub fn run(&mut self, source: &str) -> RunOutcome {
        let (tokens, mut diagnostics) = Lexer::new(source).tokenize();
        debug!("Tokenization produced {} token(s)", tokens.len());

        let (statements, parse_errors) = Parser::new(tokens).parse();
        diagnostics.extend(parse_errors);

        if !diagnostics.is_empty() {
            for diagnostic in &diagnostics {
                self.report(diagnostic);
            }
            error!(
                "Batch rejected with {} syntax error(s)",
                diagnostics.len()
            );
            return RunOutcome::SyntaxError;
        }

        info!("Parsed {} statement(s), interpreting", statements.len());

        match self.interpreter.interpret(&statements) {
            Ok(()) => RunOutcome::Success,
            Err(runtime_error) => {
                self.report(&runtime_error);
                error!("Batch aborted: {runtime_error}");
                RunOutcome::RuntimeError
            }
        }
    }

    fn report(&mut self, diagnostic: &Error) {
        if let Err(io_error) = writeln!(self.interpreter.out(), "{diagnostic}") {
            error!("Failed to write diagnostic: {io_error}");
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Session::new()
    }
}
