use std::io::Write;

use lox::LoxError;

use crate::{Chunk, OpCode, Value, disassemble_instruction};

pub type InterpretResult = Result<(), Vec<LoxError>>;

/// Value stack capacity reserved up front. Expression programs have a
/// small static stack effect, so this is never exceeded by compiled code.
const STACK_MAX: usize = 256;

pub struct VM<'a, W: Write> {
    chunk: &'a Chunk,
    ip: usize,
    output: &'a mut W,
    trace: bool,
    stack: Vec<Value>,
}

impl<'a, W: Write> VM<'a, W> {
    pub fn new(chunk: &'a Chunk, output: &'a mut W) -> Self {
        Self {
            chunk,
            ip: 0,
            output,
            trace: false,
            stack: Vec::with_capacity(STACK_MAX),
        }
    }

    pub fn set_trace(&mut self, trace: bool) {
        self.trace = trace;
    }

    pub fn push(&mut self, value: Value) {
        self.stack.push(value);
    }

    pub fn pop(&mut self) -> Value {
        self.stack.pop().expect("Stack underflow")
    }

    fn peek(&self, distance: usize) -> Value {
        self.stack[self.stack.len() - 1 - distance]
    }

    pub fn trace_stack(&mut self) {
        write!(self.output, "          ").unwrap();
        for value in &self.stack {
            write!(self.output, "[ {value} ]").unwrap();
        }
        writeln!(self.output).unwrap();
    }

    pub fn interpret(&mut self) -> InterpretResult {
        if self.trace {
            writeln!(self.output, "== trace ==").unwrap();
        }
        self.run()
    }

    fn run(&mut self) -> InterpretResult {
        loop {
            if self.trace {
                self.trace_stack();
                let (line, _) = disassemble_instruction(self.chunk, self.ip);
                write!(self.output, "{line}").unwrap();
            }
            let byte = self.read_byte();
            match byte {
                b if b == OpCode::Constant as u8 => {
                    let constant = self.read_constant();
                    self.push(constant);
                }
                b if b == OpCode::Nil as u8 => self.push(Value::Nil),
                b if b == OpCode::True as u8 => self.push(Value::Bool(true)),
                b if b == OpCode::False as u8 => self.push(Value::Bool(false)),
                b if b == OpCode::Equal as u8 => {
                    let b = self.pop();
                    let a = self.pop();
                    self.push(Value::Bool(a == b));
                }
                b if b == OpCode::Greater as u8 => self.binary_op(|a, b| (a > b).into())?,
                b if b == OpCode::Less as u8 => self.binary_op(|a, b| (a < b).into())?,
                b if b == OpCode::Add as u8 => self.binary_op(|a, b| (a + b).into())?,
                b if b == OpCode::Subtract as u8 => self.binary_op(|a, b| (a - b).into())?,
                b if b == OpCode::Multiply as u8 => self.binary_op(|a, b| (a * b).into())?,
                b if b == OpCode::Divide as u8 => self.binary_op(|a, b| (a / b).into())?,
                b if b == OpCode::Not as u8 => {
                    let value = self.pop();
                    self.push(Value::Bool(value.is_falsey()));
                }
                b if b == OpCode::Negate as u8 => {
                    if let Value::Number(n) = self.peek(0) {
                        self.pop();
                        self.push(Value::Number(-n));
                    } else {
                        return Err(vec![self.runtime_error("Operand must be a number.")]);
                    }
                }
                b if b == OpCode::Return as u8 => {
                    let value = self.pop();
                    writeln!(self.output, "{value}").unwrap();
                    return Ok(());
                }
                _ => unreachable!("Unknown opcode: {}", byte),
            }
        }
    }

    /// Type-check both operands without popping, then apply `op` to the
    /// pair in push order (`a` was pushed before `b`).
    fn binary_op(&mut self, op: fn(f64, f64) -> Value) -> InterpretResult {
        if let (Value::Number(b), Value::Number(a)) = (self.peek(0), self.peek(1)) {
            self.pop();
            self.pop();
            self.push(op(a, b));
            Ok(())
        } else {
            Err(vec![self.runtime_error("Operands must be numbers.")])
        }
    }

    fn runtime_error(&self, message: &str) -> LoxError {
        // The failing opcode is the byte just behind the instruction pointer
        let line = self.chunk.get_line(self.ip - 1) as usize;
        LoxError::Runtime {
            message: message.to_string(),
            line,
        }
    }

    fn read_byte(&mut self) -> u8 {
        let byte = self.chunk.code[self.ip];
        self.ip += 1;
        byte
    }

    fn read_constant(&mut self) -> Value {
        let index = self.read_byte() as usize;
        self.chunk.constants[index]
    }
}
