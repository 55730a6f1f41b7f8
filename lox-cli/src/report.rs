use std::io::Write;

use lox::LoxError;

/// Write each diagnostic to the given writer, one per line, in the wire
/// format carried by the error's `Display` impl.
pub fn report_errors<W: Write>(errors: &[LoxError], mut writer: W) {
    for error in errors {
        writeln!(writer, "{error}").ok();
    }
}

/// BSD-style exit code for a failed run: runtime failures dominate,
/// I/O failures come next, anything else is a compile failure.
pub fn exit_code_for(errors: &[LoxError]) -> u8 {
    if errors
        .iter()
        .any(|e| matches!(e, LoxError::Runtime { .. }))
    {
        70
    } else if errors.iter().any(|e| matches!(e, LoxError::Io(_))) {
        74
    } else {
        65
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lox::ErrorLocation;

    fn render(errors: &[LoxError]) -> String {
        let mut output = Vec::new();
        report_errors(errors, &mut output);
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn reports_scan_error() {
        let errors = vec![LoxError::Scan {
            message: "Unexpected character.".to_string(),
            line: 1,
        }];
        insta::assert_snapshot!(render(&errors), @"[line 1] Error: Unexpected character.");
    }

    #[test]
    fn reports_compile_error_at_lexeme() {
        let errors = vec![LoxError::Compile {
            message: "Expect expression.".to_string(),
            line: 1,
            at: ErrorLocation::Lexeme("+".to_string()),
        }];
        insta::assert_snapshot!(render(&errors), @"[line 1] Error at '+': Expect expression.");
    }

    #[test]
    fn reports_compile_error_at_end() {
        let errors = vec![LoxError::Compile {
            message: "Expect ')' after expression.".to_string(),
            line: 1,
            at: ErrorLocation::End,
        }];
        insta::assert_snapshot!(render(&errors), @"[line 1] Error at end: Expect ')' after expression.");
    }

    #[test]
    fn reports_runtime_error_with_script_location() {
        let errors = vec![LoxError::Runtime {
            message: "Operands must be numbers.".to_string(),
            line: 1,
        }];
        insta::assert_snapshot!(render(&errors), @r"
        Operands must be numbers.
        [line 1] in script
        ");
    }

    #[test]
    fn reports_each_error_on_its_own_line() {
        let errors = vec![
            LoxError::Scan {
                message: "Unexpected character.".to_string(),
                line: 1,
            },
            LoxError::Scan {
                message: "Unexpected character.".to_string(),
                line: 2,
            },
        ];
        assert_eq!(render(&errors).lines().count(), 2);
    }

    #[test]
    fn compile_errors_exit_65() {
        let errors = vec![LoxError::Scan {
            message: "Unexpected character.".to_string(),
            line: 1,
        }];
        assert_eq!(exit_code_for(&errors), 65);
    }

    #[test]
    fn runtime_errors_exit_70() {
        let errors = vec![LoxError::Runtime {
            message: "Operand must be a number.".to_string(),
            line: 1,
        }];
        assert_eq!(exit_code_for(&errors), 70);
    }

    #[test]
    fn runtime_beats_compile_when_both_present() {
        let errors = vec![
            LoxError::Compile {
                message: "Expect expression.".to_string(),
                line: 1,
                at: ErrorLocation::End,
            },
            LoxError::Runtime {
                message: "Operand must be a number.".to_string(),
                line: 1,
            },
        ];
        assert_eq!(exit_code_for(&errors), 70);
    }

    #[test]
    fn io_errors_exit_74() {
        let errors = vec![LoxError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "file not found",
        ))];
        assert_eq!(exit_code_for(&errors), 74);
    }
}
