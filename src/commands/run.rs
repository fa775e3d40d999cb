use std::fs;
use std::path::Path;

use log::info;
use rill_core::{RunOutcome, Session};

/// Runs a whole script file as one batch and maps the outcome to the process
/// exit status: 0 on success, 65 after syntax errors, 70 after a runtime
/// error, 1 when the file cannot be read at all.
pub fn run_file(path: &Path) -> i32 {
    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(read_error) => {
            eprintln!("Failed to read script '{}': {}", path.display(), read_error);
            return 1;
        }
    };

    info!("Running script: {}", path.display());

    let mut session = Session::new();
    match session.run(&source) {
        RunOutcome::Success => 0,
        RunOutcome::SyntaxError => 65,
        RunOutcome::RuntimeError => 70,
    }
}
