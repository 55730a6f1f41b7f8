use crate::{Chunk, OpCode};

pub fn disassemble_chunk(chunk: &Chunk, name: &str) -> String {
    let mut output = format!("== {} ==\n", name);
    let mut offset = 0;
    while offset < chunk.code.len() {
        let (line, next_offset) = disassemble_instruction(chunk, offset);
        output.push_str(&line);
        offset = next_offset;
    }
    output
}

pub fn disassemble_instruction(chunk: &Chunk, offset: usize) -> (String, usize) {
    let line = chunk.get_line(offset);
    let line_str = if offset > 0 && chunk.get_line(offset - 1) == line {
        "   |".to_string()
    } else {
        format!("{:4}", line)
    };

    let simple = |name: &str| (format!("{:04} {} {}\n", offset, line_str, name), offset + 1);

    let byte = chunk.code[offset];
    match byte {
        b if b == OpCode::Return as u8 => simple("OP_RETURN"),
        b if b == OpCode::Nil as u8 => simple("OP_NIL"),
        b if b == OpCode::True as u8 => simple("OP_TRUE"),
        b if b == OpCode::False as u8 => simple("OP_FALSE"),
        b if b == OpCode::Equal as u8 => simple("OP_EQUAL"),
        b if b == OpCode::Greater as u8 => simple("OP_GREATER"),
        b if b == OpCode::Less as u8 => simple("OP_LESS"),
        b if b == OpCode::Add as u8 => simple("OP_ADD"),
        b if b == OpCode::Subtract as u8 => simple("OP_SUBTRACT"),
        b if b == OpCode::Multiply as u8 => simple("OP_MULTIPLY"),
        b if b == OpCode::Divide as u8 => simple("OP_DIVIDE"),
        b if b == OpCode::Not as u8 => simple("OP_NOT"),
        b if b == OpCode::Negate as u8 => simple("OP_NEGATE"),
        b if b == OpCode::Constant as u8 => {
            let constant_idx = chunk.code[offset + 1];
            let value = chunk.constants[constant_idx as usize];
            (
                format!(
                    "{:04} {} OP_CONSTANT {:>9} '{}'\n",
                    offset, line_str, constant_idx, value
                ),
                offset + 2,
            )
        }
        _ => (
            format!("{:04} {} Unknown opcode {}\n", offset, line_str, byte),
            offset + 1,
        ),
    }
}
