use crate::value::Value;

/// A chunk of bytecode: the code bytes, a parallel line table for
/// diagnostics, and the constant pool.
///
/// `lines[i]` is the 1-based source line that produced `code[i]`; the two
/// arrays always have the same length. `Vec`'s geometric growth keeps
/// appends amortized O(1).
#[derive(Default, Debug)]
pub struct Chunk {
    pub(crate) code: Vec<u8>,
    pub(crate) constants: Vec<Value>,
    pub(crate) lines: Vec<i32>,
}

impl Chunk {
    pub fn new() -> Self {
        Self {
            code: Vec::new(),
            constants: Vec::new(),
            lines: Vec::new(),
        }
    }

    pub fn write(&mut self, byte: u8, line: i32) {
        self.code.push(byte);
        self.lines.push(line);
    }

    pub fn get_line(&self, offset: usize) -> i32 {
        self.lines[offset]
    }

    pub fn add_constant(&mut self, value: Value) -> usize {
        self.constants.push(value);
        self.constants.len() - 1
    }

    pub fn len(&self) -> usize {
        self.code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }
}
