use std::io::{self, BufRead, Write};

use log::info;
use rill_core::Session;

/// Interactive prompt. Every line is one batch against a shared session, so
/// top-level variables persist from line to line while errors only ever
/// spoil the line that caused them. Ends cleanly at end-of-input.
pub fn run() -> io::Result<()> {
    info!("Starting interactive prompt");

    let mut session = Session::new();
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("> ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        session.run(&line);
    }

    Ok(())
}
