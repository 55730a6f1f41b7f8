mod completer;
mod repl;
mod report;

use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::Path;
use std::process::ExitCode;

use lox::LoxError;

use report::{exit_code_for, report_errors};

/// Compile-time debug toggle; tracing code is elided in normal builds.
const TRACE: bool = cfg!(feature = "trace");

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    ExitCode::from(dispatch(&args))
}

fn dispatch(args: &[String]) -> u8 {
    match args.len() {
        0 => {
            // Interactive terminal gets the REPL; piped stdin runs as a script
            if io::stdin().is_terminal() {
                repl::run(TRACE)
            } else {
                run_stdin()
            }
        }
        1 => run_file(Path::new(&args[0])),
        _ => {
            eprintln!("Usage: lox [path]");
            64
        }
    }
}

fn run_file(path: &Path) -> u8 {
    match fs::read_to_string(path) {
        Ok(source) => run_source(&source),
        Err(e) => fail(vec![LoxError::from(e)]),
    }
}

fn run_stdin() -> u8 {
    let mut source = String::new();
    match io::stdin().read_to_string(&mut source) {
        Ok(_) => run_source(&source),
        Err(e) => fail(vec![LoxError::from(e)]),
    }
}

fn run_source(source: &str) -> u8 {
    match lox_vm::run(source, &mut io::stdout(), TRACE) {
        Ok(()) => 0,
        Err(errors) => fail(errors),
    }
}

fn fail(errors: Vec<LoxError>) -> u8 {
    report_errors(&errors, io::stderr());
    exit_code_for(&errors)
}
