use rustyline::Context;
use rustyline::Helper;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;

/// Rustyline helper that provides keyword completion and syntax
/// highlighting for the lox REPL
pub struct LoxHelper;

impl LoxHelper {
    pub fn new() -> Self {
        Self
    }

    /// Find the start position of the current word being typed
    fn find_word_start(line: &str, pos: usize) -> usize {
        let before_cursor = &line[..pos];
        for (i, c) in before_cursor.char_indices().rev() {
            if !lox::is_identifier_char(c) {
                return i + c.len_utf8();
            }
        }
        0
    }

    /// Get keyword completion candidates for the given prefix
    fn get_completions(prefix: &str) -> Vec<String> {
        if prefix.is_empty() {
            return Vec::new();
        }

        let mut completions: Vec<String> = lox::KEYWORDS
            .keys()
            .filter(|keyword| keyword.starts_with(prefix))
            .map(|keyword| (*keyword).to_string())
            .collect();
        completions.sort();
        completions
    }

    /// Highlight a line of lox code with ANSI colors using the scanner
    pub fn highlight_line(line: &str) -> String {
        if line.is_empty() {
            return String::new();
        }

        // ANSI color codes
        const KEYWORD: &str = "\x1b[35m"; // Magenta
        const STRING: &str = "\x1b[32m"; // Green
        const NUMBER: &str = "\x1b[33m"; // Yellow
        const RESET: &str = "\x1b[0m";

        let scanner = lox::Scanner::new(line);
        let mut result = String::new();
        let mut pos = 0usize; // byte position in line

        for token_result in scanner {
            match token_result {
                Ok(token) => {
                    if token.token_type == lox::TokenType::Eof {
                        break;
                    }

                    // Append any whitespace/characters before this token
                    if token.span.start > pos {
                        result.push_str(&line[pos..token.span.start]);
                    }

                    let color = match token.token_type {
                        lox::TokenType::String => Some(STRING),
                        lox::TokenType::Number => Some(NUMBER),
                        token_type if lox::KEYWORDS.values().any(|k| *k == token_type) => {
                            Some(KEYWORD)
                        }
                        // Operators, punctuation, identifiers - no highlighting
                        _ => None,
                    };

                    if let Some(c) = color {
                        result.push_str(c);
                        result.push_str(&line[token.span.clone()]);
                        result.push_str(RESET);
                    } else {
                        result.push_str(&line[token.span.clone()]);
                    }
                    pos = token.span.end;
                }
                Err(_) => {
                    // The scanner advanced past the bad character; it shows
                    // up uncolored in the gap before the next token
                }
            }
        }

        // Append any remaining characters (trailing whitespace or chars after errors)
        if pos < line.len() {
            result.push_str(&line[pos..]);
        }

        result
    }
}

impl Default for LoxHelper {
    fn default() -> Self {
        Self::new()
    }
}

impl Helper for LoxHelper {}

impl Highlighter for LoxHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> std::borrow::Cow<'l, str> {
        std::borrow::Cow::Owned(Self::highlight_line(line))
    }

    fn highlight_char(
        &self,
        _line: &str,
        _pos: usize,
        _kind: rustyline::highlight::CmdKind,
    ) -> bool {
        true // Always re-highlight
    }
}

impl Hinter for LoxHelper {
    type Hint = String;
}

impl Validator for LoxHelper {}

impl Completer for LoxHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let start = Self::find_word_start(line, pos);
        let prefix = &line[start..pos];
        let completions = Self::get_completions(prefix);

        let pairs: Vec<Pair> = completions
            .into_iter()
            .map(|s| Pair {
                display: s.clone(),
                replacement: s,
            })
            .collect();

        Ok((start, pairs))
    }
}
