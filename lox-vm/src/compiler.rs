//! Compiler - a single-pass Pratt parser that emits bytecode directly,
//! with no intermediate tree.

use lox::{ErrorLocation, Literal, LoxError, Scanner, Token, TokenType};

use crate::{Chunk, OpCode, Value};

/// Result type for compilation.
pub type CompileResult = Result<Chunk, Vec<LoxError>>;

/// Precedence levels from lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
enum Precedence {
    None,
    Assignment, // =
    Or,         // or
    And,        // and
    Equality,   // == !=
    Comparison, // < > <= >=
    Term,       // + -
    Factor,     // * /
    Unary,      // ! -
    Call,       // . ()
    Primary,
}

impl Precedence {
    fn next(self) -> Self {
        match self {
            Self::None => Self::Assignment,
            Self::Assignment => Self::Or,
            Self::Or => Self::And,
            Self::And => Self::Equality,
            Self::Equality => Self::Comparison,
            Self::Comparison => Self::Term,
            Self::Term => Self::Factor,
            Self::Factor => Self::Unary,
            Self::Unary => Self::Call,
            Self::Call => Self::Primary,
            Self::Primary => Self::Primary,
        }
    }
}

/// Parse function identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseFn {
    Grouping,
    Unary,
    Binary,
    Number,
    Literal,
}

impl ParseFn {
    fn call(self, compiler: &mut Compiler) {
        match self {
            Self::Grouping => compiler.grouping(),
            Self::Unary => compiler.unary(),
            Self::Binary => compiler.binary(),
            Self::Number => compiler.number(),
            Self::Literal => compiler.literal(),
        }
    }
}

/// A parse rule mapping a token to its prefix/infix parsers and precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ParseRule {
    prefix: Option<ParseFn>,
    infix: Option<ParseFn>,
    precedence: Precedence,
}

impl ParseRule {
    const fn new(
        prefix: Option<ParseFn>,
        infix: Option<ParseFn>,
        precedence: Precedence,
    ) -> Self {
        Self {
            prefix,
            infix,
            precedence,
        }
    }
}

impl From<TokenType> for ParseRule {
    fn from(token_type: TokenType) -> Self {
        match token_type {
            TokenType::LeftParen => Self::new(Some(ParseFn::Grouping), None, Precedence::None),
            TokenType::Minus => Self::new(
                Some(ParseFn::Unary),
                Some(ParseFn::Binary),
                Precedence::Term,
            ),
            TokenType::Plus => Self::new(None, Some(ParseFn::Binary), Precedence::Term),
            TokenType::Slash => Self::new(None, Some(ParseFn::Binary), Precedence::Factor),
            TokenType::Star => Self::new(None, Some(ParseFn::Binary), Precedence::Factor),
            TokenType::Bang => Self::new(Some(ParseFn::Unary), None, Precedence::None),
            TokenType::BangEqual => Self::new(None, Some(ParseFn::Binary), Precedence::Equality),
            TokenType::EqualEqual => Self::new(None, Some(ParseFn::Binary), Precedence::Equality),
            TokenType::Greater => Self::new(None, Some(ParseFn::Binary), Precedence::Comparison),
            TokenType::GreaterEqual => {
                Self::new(None, Some(ParseFn::Binary), Precedence::Comparison)
            }
            TokenType::Less => Self::new(None, Some(ParseFn::Binary), Precedence::Comparison),
            TokenType::LessEqual => Self::new(None, Some(ParseFn::Binary), Precedence::Comparison),
            TokenType::Number => Self::new(Some(ParseFn::Number), None, Precedence::None),
            TokenType::False | TokenType::True | TokenType::Nil => {
                Self::new(Some(ParseFn::Literal), None, Precedence::None)
            }
            _ => Self::new(None, None, Precedence::None),
        }
    }
}

/// The compiler - holds parser state and emits bytecode.
struct Compiler<'a> {
    scanner: Scanner<'a>,
    current: Token,
    previous: Token,
    chunk: Chunk,
    errors: Vec<LoxError>,
    /// Set on the first reported error; suppresses the cascade that would
    /// follow until synchronization (none yet in the expression grammar).
    panic_mode: bool,
}

impl<'a> Compiler<'a> {
    fn new(source: &'a str) -> Self {
        let scanner = Scanner::new(source);
        let placeholder = Token {
            token_type: TokenType::Eof,
            lexeme: String::new(),
            literal: None,
            span: 0..0,
            line: 1,
        };
        Self {
            scanner,
            current: placeholder.clone(),
            previous: placeholder,
            chunk: Chunk::new(),
            errors: Vec::new(),
            panic_mode: false,
        }
    }

    fn advance(&mut self) {
        let eof_placeholder = Token {
            token_type: TokenType::Eof,
            lexeme: String::new(),
            literal: None,
            span: self.current.span.end..self.current.span.end,
            line: self.current.line,
        };
        self.previous = std::mem::replace(&mut self.current, eof_placeholder);

        loop {
            match self.scanner.next() {
                Some(Ok(token)) => {
                    self.current = token;
                    break;
                }
                Some(Err(error)) => {
                    self.report(error);
                }
                None => {
                    // Already have the EOF placeholder in current
                    break;
                }
            }
        }
    }

    fn report(&mut self, error: LoxError) {
        if self.panic_mode {
            return;
        }
        self.panic_mode = true;
        self.errors.push(error);
    }

    fn error_at(&mut self, token: &Token, message: &str) {
        let at = if token.token_type == TokenType::Eof {
            ErrorLocation::End
        } else {
            ErrorLocation::Lexeme(token.lexeme.clone())
        };
        let error = LoxError::Compile {
            message: message.to_string(),
            line: token.line,
            at,
        };
        self.report(error);
    }

    fn error_at_current(&mut self, message: &str) {
        let token = self.current.clone();
        self.error_at(&token, message);
    }

    fn error_at_previous(&mut self, message: &str) {
        let token = self.previous.clone();
        self.error_at(&token, message);
    }

    fn consume(&mut self, expected: TokenType, message: &str) {
        if self.current.token_type == expected {
            self.advance();
        } else {
            self.error_at_current(message);
        }
    }

    fn emit_byte(&mut self, byte: u8) {
        let line = self.previous.line as i32;
        self.chunk.write(byte, line);
    }

    fn emit_op(&mut self, op: OpCode) {
        self.emit_byte(op.into());
    }

    fn emit_return(&mut self) {
        self.emit_op(OpCode::Return);
    }

    fn make_constant(&mut self, value: Value) -> u8 {
        if self.chunk.constants.len() >= 256 {
            self.error_at_previous("Too many constants in one chunk.");
            return 0;
        }
        self.chunk.add_constant(value) as u8
    }

    fn emit_constant(&mut self, value: Value) {
        let index = self.make_constant(value);
        self.emit_op(OpCode::Constant);
        self.emit_byte(index);
    }

    fn parse_precedence(&mut self, precedence: Precedence) {
        self.advance();

        // Prefix expression
        let rule = ParseRule::from(self.previous.token_type);
        match rule.prefix {
            Some(prefix_fn) => prefix_fn.call(self),
            None => {
                self.error_at_previous("Expect expression.");
                return;
            }
        }

        // Infix expressions
        while precedence <= ParseRule::from(self.current.token_type).precedence {
            self.advance();
            let infix_rule = ParseRule::from(self.previous.token_type);
            if let Some(infix_fn) = infix_rule.infix {
                infix_fn.call(self);
            }
        }
    }

    fn expression(&mut self) {
        self.parse_precedence(Precedence::Assignment);
    }

    fn grouping(&mut self) {
        self.expression();
        self.consume(TokenType::RightParen, "Expect ')' after expression.");
    }

    fn unary(&mut self) {
        let operator_type = self.previous.token_type;

        // Parse operand at unary precedence (binds tighter than binary ops)
        self.parse_precedence(Precedence::Unary);

        match operator_type {
            TokenType::Minus => self.emit_op(OpCode::Negate),
            TokenType::Bang => self.emit_op(OpCode::Not),
            _ => unreachable!("unary() called with non-unary operator"),
        }
    }

    fn binary(&mut self) {
        let operator_type = self.previous.token_type;
        let rule = ParseRule::from(operator_type);

        // Parse right operand at one higher precedence (left-associative)
        self.parse_precedence(rule.precedence.next());

        match operator_type {
            TokenType::Plus => self.emit_op(OpCode::Add),
            TokenType::Minus => self.emit_op(OpCode::Subtract),
            TokenType::Star => self.emit_op(OpCode::Multiply),
            TokenType::Slash => self.emit_op(OpCode::Divide),
            TokenType::EqualEqual => self.emit_op(OpCode::Equal),
            TokenType::BangEqual => {
                self.emit_op(OpCode::Equal);
                self.emit_op(OpCode::Not);
            }
            TokenType::Greater => self.emit_op(OpCode::Greater),
            TokenType::GreaterEqual => {
                self.emit_op(OpCode::Less);
                self.emit_op(OpCode::Not);
            }
            TokenType::Less => self.emit_op(OpCode::Less),
            TokenType::LessEqual => {
                self.emit_op(OpCode::Greater);
                self.emit_op(OpCode::Not);
            }
            _ => unreachable!("binary() called with non-binary operator"),
        }
    }

    fn number(&mut self) {
        if let Some(Literal::Number(value)) = self.previous.literal {
            self.emit_constant(Value::Number(value));
        }
    }

    fn literal(&mut self) {
        match self.previous.token_type {
            TokenType::False => self.emit_op(OpCode::False),
            TokenType::True => self.emit_op(OpCode::True),
            TokenType::Nil => self.emit_op(OpCode::Nil),
            _ => unreachable!("literal() called with non-literal token"),
        }
    }
}

/// Compile source code into bytecode.
///
/// Returns `Ok(chunk)` on success, `Err(errors)` on failure. A successful
/// chunk always ends with a return opcode.
pub fn compile(source: &str) -> CompileResult {
    let mut compiler = Compiler::new(source);

    compiler.advance();
    compiler.expression();
    compiler.consume(TokenType::Eof, "Expect end of expression.");
    compiler.emit_return();

    if compiler.errors.is_empty() {
        Ok(compiler.chunk)
    } else {
        Err(compiler.errors)
    }
}
