use std::io;

use rustyline::Editor;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;

use crate::completer::LoxHelper;
use crate::report::report_errors;

/// Interactive line REPL: each submitted line is interpreted on its own.
/// A line starting with `exit`, end-of-input, or Ctrl-C terminates.
pub fn run(trace: bool) -> u8 {
    let mut rl: Editor<LoxHelper, DefaultHistory> =
        Editor::with_config(rustyline::Config::default()).expect("failed to start the REPL");
    rl.set_helper(Some(LoxHelper::new()));

    loop {
        match rl.readline("> ") {
            Ok(line) => {
                if line.starts_with("exit") {
                    break;
                }
                let _ = rl.add_history_entry(&line);

                if let Err(errors) = lox_vm::run(&line, &mut io::stdout(), trace) {
                    report_errors(&errors, io::stderr());
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                break;
            }
            Err(err) => {
                eprintln!("REPL error: {err:?}");
                break;
            }
        }
    }

    0
}
