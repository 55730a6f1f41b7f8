use phf::phf_map;

use crate::error::LoxError;
use crate::token::{Literal, Token, TokenType};

/// Check if a character can start an identifier
pub fn is_identifier_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

/// Check if a character can continue an identifier
pub fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// All lox keywords with their token types
pub static KEYWORDS: phf::Map<&'static str, TokenType> = phf_map! {
    "and" => TokenType::And,
    "class" => TokenType::Class,
    "else" => TokenType::Else,
    "false" => TokenType::False,
    "for" => TokenType::For,
    "fun" => TokenType::Fun,
    "if" => TokenType::If,
    "nil" => TokenType::Nil,
    "or" => TokenType::Or,
    "print" => TokenType::Print,
    "return" => TokenType::Return,
    "super" => TokenType::Super,
    "this" => TokenType::This,
    "true" => TokenType::True,
    "var" => TokenType::Var,
    "while" => TokenType::While,
};

/// Pull-model scanner over a source string. Tokens come out one at a time
/// through the `Iterator` impl; scan failures come out as the `Err` arm.
pub struct Scanner<'a> {
    source: &'a str,
    start: usize,
    current: usize,
    line: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            start: 0,
            current: 0,
            line: 1,
        }
    }
}

impl<'a> Iterator for Scanner<'a> {
    type Item = Result<Token, LoxError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.current > self.source.len() {
                return None;
            }

            if self.is_at_end() {
                let span = self.current..self.current;
                self.current += 1;
                return Some(Ok(Token {
                    token_type: TokenType::Eof,
                    lexeme: String::new(),
                    literal: None,
                    span,
                    line: self.line,
                }));
            }

            self.start = self.current;
            let c = self.advance();

            match c {
                // Whitespace
                ' ' | '\r' | '\t' => continue,
                '\n' => {
                    self.line += 1;
                    continue;
                }
                // Single-character tokens
                '(' => return Some(Ok(self.add_token(TokenType::LeftParen))),
                ')' => return Some(Ok(self.add_token(TokenType::RightParen))),
                '{' => return Some(Ok(self.add_token(TokenType::LeftBrace))),
                '}' => return Some(Ok(self.add_token(TokenType::RightBrace))),
                ',' => return Some(Ok(self.add_token(TokenType::Comma))),
                '.' => return Some(Ok(self.add_token(TokenType::Dot))),
                '-' => return Some(Ok(self.add_token(TokenType::Minus))),
                '+' => return Some(Ok(self.add_token(TokenType::Plus))),
                ';' => return Some(Ok(self.add_token(TokenType::Semicolon))),
                '*' => return Some(Ok(self.add_token(TokenType::Star))),
                // Slash or line comment
                '/' => {
                    if self.match_char('/') {
                        while self.peek() != Some('\n') && !self.is_at_end() {
                            self.advance();
                        }
                        continue;
                    } else {
                        return Some(Ok(self.add_token(TokenType::Slash)));
                    }
                }
                '!' => {
                    let token_type = if self.match_char('=') {
                        TokenType::BangEqual
                    } else {
                        TokenType::Bang
                    };
                    return Some(Ok(self.add_token(token_type)));
                }
                '=' => {
                    let token_type = if self.match_char('=') {
                        TokenType::EqualEqual
                    } else {
                        TokenType::Equal
                    };
                    return Some(Ok(self.add_token(token_type)));
                }
                '<' => {
                    let token_type = if self.match_char('=') {
                        TokenType::LessEqual
                    } else {
                        TokenType::Less
                    };
                    return Some(Ok(self.add_token(token_type)));
                }
                '>' => {
                    let token_type = if self.match_char('=') {
                        TokenType::GreaterEqual
                    } else {
                        TokenType::Greater
                    };
                    return Some(Ok(self.add_token(token_type)));
                }
                '"' => return Some(self.string()),
                c if c.is_ascii_digit() => return Some(Ok(self.number())),
                c if is_identifier_start(c) => return Some(Ok(self.identifier())),
                _ => {
                    return Some(Err(LoxError::Scan {
                        message: "Unexpected character.".to_string(),
                        line: self.line,
                    }));
                }
            }
        }
    }
}

impl<'a> Scanner<'a> {
    fn is_at_end(&self) -> bool {
        self.current >= self.source.len()
    }

    fn advance(&mut self) -> char {
        let c = self.source[self.current..].chars().next().unwrap();
        self.current += c.len_utf8();
        c
    }

    fn peek(&self) -> Option<char> {
        self.source[self.current..].chars().next()
    }

    fn peek_next(&self) -> Option<char> {
        let mut chars = self.source[self.current..].chars();
        chars.next();
        chars.next()
    }

    fn match_char(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn add_token(&self, token_type: TokenType) -> Token {
        Token {
            token_type,
            lexeme: self.source[self.start..self.current].to_string(),
            literal: None,
            span: self.start..self.current,
            line: self.line,
        }
    }

    fn add_token_with_literal(&self, token_type: TokenType, literal: Literal) -> Token {
        Token {
            token_type,
            lexeme: self.source[self.start..self.current].to_string(),
            literal: Some(literal),
            span: self.start..self.current,
            line: self.line,
        }
    }

    fn identifier(&mut self) -> Token {
        while self.peek().is_some_and(is_identifier_char) {
            self.advance();
        }

        let text = &self.source[self.start..self.current];
        let token_type = KEYWORDS.get(text).copied().unwrap_or(TokenType::Identifier);
        self.add_token(token_type)
    }

    fn number(&mut self) -> Token {
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }

        // A decimal point only counts if a digit follows it
        if self.peek() == Some('.') && self.peek_next().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
        }

        let value: f64 = self.source[self.start..self.current].parse().unwrap();
        self.add_token_with_literal(TokenType::Number, Literal::Number(value))
    }

    fn string(&mut self) -> Result<Token, LoxError> {
        loop {
            match self.peek() {
                None => {
                    return Err(LoxError::Scan {
                        message: "Unterminated string.".to_string(),
                        line: self.line,
                    });
                }
                Some('"') => {
                    let value = self.source[self.start + 1..self.current].to_string();
                    self.advance();
                    return Ok(self.add_token_with_literal(TokenType::String, Literal::String(value)));
                }
                Some('\n') => {
                    self.line += 1;
                    self.advance();
                }
                Some(_) => {
                    self.advance();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(source: &str) -> Vec<Token> {
        Scanner::new(source).map(|r| r.unwrap()).collect()
    }

    fn token_types(source: &str) -> Vec<TokenType> {
        scan(source).iter().map(|t| t.token_type).collect()
    }

    #[test]
    fn empty_source_yields_only_eof() {
        let tokens = scan("");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].token_type, TokenType::Eof);
        assert!(tokens[0].lexeme.is_empty());
    }

    #[test]
    fn scanner_terminates_after_eof() {
        let mut scanner = Scanner::new("");
        assert!(scanner.next().is_some());
        assert!(scanner.next().is_none());
    }

    #[test]
    fn scans_single_character_tokens() {
        assert_eq!(
            token_types("(){},.-+;/*"),
            vec![
                TokenType::LeftParen,
                TokenType::RightParen,
                TokenType::LeftBrace,
                TokenType::RightBrace,
                TokenType::Comma,
                TokenType::Dot,
                TokenType::Minus,
                TokenType::Plus,
                TokenType::Semicolon,
                TokenType::Slash,
                TokenType::Star,
                TokenType::Eof,
            ]
        );
    }

    #[test]
    fn scans_one_or_two_character_operators() {
        assert_eq!(
            token_types("! != = == < <= > >="),
            vec![
                TokenType::Bang,
                TokenType::BangEqual,
                TokenType::Equal,
                TokenType::EqualEqual,
                TokenType::Less,
                TokenType::LessEqual,
                TokenType::Greater,
                TokenType::GreaterEqual,
                TokenType::Eof,
            ]
        );
    }

    #[test]
    fn skips_whitespace_and_line_comments() {
        assert_eq!(
            token_types("  1 // the rest is ignored\n 2"),
            vec![TokenType::Number, TokenType::Number, TokenType::Eof]
        );
    }

    #[test]
    fn comment_without_trailing_newline_reaches_eof() {
        assert_eq!(token_types("// nothing here"), vec![TokenType::Eof]);
    }

    #[test]
    fn scans_number_literal() {
        let tokens = scan("42");
        assert_eq!(tokens[0].token_type, TokenType::Number);
        assert_eq!(tokens[0].lexeme, "42");
        assert_eq!(tokens[0].literal, Some(Literal::Number(42.0)));
    }

    #[test]
    fn scans_decimal_number() {
        let tokens = scan("3.25");
        assert_eq!(tokens[0].lexeme, "3.25");
        assert_eq!(tokens[0].literal, Some(Literal::Number(3.25)));
    }

    #[test]
    fn trailing_dot_is_not_part_of_number() {
        assert_eq!(
            token_types("4."),
            vec![TokenType::Number, TokenType::Dot, TokenType::Eof]
        );
    }

    #[test]
    fn number_has_no_exponent_syntax() {
        // "1e3" scans as a number followed by an identifier
        assert_eq!(
            token_types("1e3"),
            vec![TokenType::Number, TokenType::Identifier, TokenType::Eof]
        );
    }

    #[test]
    fn scans_string_literal_content() {
        let tokens = scan("\"hello\"");
        assert_eq!(tokens[0].token_type, TokenType::String);
        assert_eq!(tokens[0].lexeme, "\"hello\"");
        assert_eq!(
            tokens[0].literal,
            Some(Literal::String("hello".to_string()))
        );
    }

    #[test]
    fn string_may_span_lines() {
        let tokens = scan("\"a\nb\"");
        assert_eq!(tokens[0].token_type, TokenType::String);
        assert_eq!(tokens[0].literal, Some(Literal::String("a\nb".to_string())));
        // The closing quote is on line 2
        assert_eq!(tokens[0].line, 2);
    }

    #[test]
    fn unterminated_string_is_an_error() {
        let mut scanner = Scanner::new("\"abc");
        match scanner.next() {
            Some(Err(LoxError::Scan { message, line })) => {
                assert_eq!(message, "Unterminated string.");
                assert_eq!(line, 1);
            }
            other => panic!("expected scan error, got {other:?}"),
        }
    }

    #[test]
    fn unterminated_string_reports_line_after_newline() {
        let mut scanner = Scanner::new("\"abc\n");
        match scanner.next() {
            Some(Err(LoxError::Scan { message, line })) => {
                assert_eq!(message, "Unterminated string.");
                assert_eq!(line, 2);
            }
            other => panic!("expected scan error, got {other:?}"),
        }
    }

    #[test]
    fn scans_keywords() {
        assert_eq!(
            token_types("and class else false fun for if nil or print return super this true var while"),
            vec![
                TokenType::And,
                TokenType::Class,
                TokenType::Else,
                TokenType::False,
                TokenType::Fun,
                TokenType::For,
                TokenType::If,
                TokenType::Nil,
                TokenType::Or,
                TokenType::Print,
                TokenType::Return,
                TokenType::Super,
                TokenType::This,
                TokenType::True,
                TokenType::Var,
                TokenType::While,
                TokenType::Eof,
            ]
        );
    }

    #[test]
    fn keyword_prefix_is_an_identifier() {
        assert_eq!(
            token_types("orchid fora truthy"),
            vec![
                TokenType::Identifier,
                TokenType::Identifier,
                TokenType::Identifier,
                TokenType::Eof,
            ]
        );
    }

    #[test]
    fn underscore_starts_an_identifier() {
        let tokens = scan("_private");
        assert_eq!(tokens[0].token_type, TokenType::Identifier);
        assert_eq!(tokens[0].lexeme, "_private");
    }

    #[test]
    fn unexpected_character_is_an_error() {
        let mut scanner = Scanner::new("@");
        match scanner.next() {
            Some(Err(LoxError::Scan { message, line })) => {
                assert_eq!(message, "Unexpected character.");
                assert_eq!(line, 1);
            }
            other => panic!("expected scan error, got {other:?}"),
        }
    }

    #[test]
    fn scanning_continues_after_error() {
        let mut scanner = Scanner::new("@1");
        assert!(scanner.next().unwrap().is_err());
        let token = scanner.next().unwrap().unwrap();
        assert_eq!(token.token_type, TokenType::Number);
        assert_eq!(token.lexeme, "1");
    }

    #[test]
    fn lines_increment_on_newline() {
        let tokens = scan("1\n2\n\n3");
        let lines: Vec<usize> = tokens.iter().map(|t| t.line).collect();
        assert_eq!(lines, vec![1, 2, 4, 4]);
    }

    #[test]
    fn lines_are_monotonically_non_decreasing() {
        let tokens = scan("1 + 2\n* 3 // note\n- 4");
        let lines: Vec<usize> = tokens.iter().map(|t| t.line).collect();
        assert!(lines.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn spans_cover_the_source() {
        let source = "1 + (2 * 3)";
        let tokens = scan(source);
        for token in tokens.iter().filter(|t| t.token_type != TokenType::Eof) {
            assert_eq!(&source[token.span.clone()], token.lexeme);
        }
    }

    #[test]
    fn eof_token_has_zero_length() {
        let tokens = scan("1");
        let eof = tokens.last().unwrap();
        assert_eq!(eof.span.len(), 0);
    }
}
