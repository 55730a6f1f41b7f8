//! lox-vm: single-pass bytecode compiler and stack virtual machine

mod chunk;
mod compiler;
mod debug;
mod opcode;
mod value;
mod vm;

use std::io::Write;

use lox::LoxError;

pub use chunk::Chunk;
pub use compiler::{CompileResult, compile};
pub use debug::{disassemble_chunk, disassemble_instruction};
pub use opcode::OpCode;
pub use value::Value;
pub use vm::{InterpretResult, VM};

/// Run lox source code.
///
/// Compiles the source to bytecode and executes it in the VM. When trace is
/// enabled, dumps the compiled chunk before execution. The chunk lives only
/// for the duration of this call, on every exit path.
pub fn run<W: Write>(source: &str, output: &mut W, trace: bool) -> Result<(), Vec<LoxError>> {
    let chunk = compile(source)?;
    if trace {
        write!(output, "{}", disassemble_chunk(&chunk, "code")).unwrap();
    }
    let mut vm = VM::new(&chunk, output);
    vm.set_trace(trace);
    vm.interpret()
}
