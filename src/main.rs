use std::path::PathBuf;
use std::process;

use clap::Parser;
use log::LevelFilter;

mod commands;

#[derive(Parser, Debug)]
#[command(name = "rill")]
#[command(about = "Rill runs small scripts from a file or an interactive prompt.")]
struct Cli {
    /// Script file to execute; omit it to start the interactive prompt.
    script: Vec<PathBuf>,

    /// Raise console logging from warnings to debug output.
    #[arg(short, long)]
    verbose: bool,

    /// Directory for timestamped log files; file logging is off without it.
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();

    let console_level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    if let Err(init_error) = rill_logger::init(cli.log_dir, console_level, LevelFilter::Trace) {
        eprintln!("Failed to initialize logging: {init_error}");
    }

    match cli.script.as_slice() {
        [] => {
            if let Err(prompt_error) = commands::repl::run() {
                eprintln!("Prompt failed: {prompt_error}");
                process::exit(1);
            }
        }
        [script] => process::exit(commands::run::run_file(script)),
        _ => {
            println!("Usage: rill [script]");
            process::exit(64);
        }
    }
}
