//! The Host: owns the shared stack, brokers I/O, and is the handle
//! every nested interpreter borrows mutably while it runs.

use std::io::{BufRead, Write};

use crate::error::{VmError, VmResult};
use crate::stack::Stack;
use crate::value::Value;

/// Owns the single stack shared by a top-level interpreter and every
/// sub-interpreter it (transitively) spawns via `exec`/`while`, and
/// brokers reads from the input stream and writes to the output
/// stream on their behalf.
///
/// Because execution is strictly single-threaded and sub-interpreters
/// run to completion before returning control to their caller, handing
/// the same `&mut Host` down the call chain is enough to guarantee
/// that at most one interpreter is mutating the stack at a time — no
/// reference counting or interior mutability required.
pub struct Host<'io> {
    stack: Stack,
    input: Box<dyn BufRead + 'io>,
    output: Box<dyn Write + 'io>,
    /// Forces the `-trace` rendering independent of the `log` crate's
    /// own level filtering.
    pub trace: bool,
}

impl<'io> Host<'io> {
    /// Builds a host over the given input/output streams.
    pub fn new(
        input: impl BufRead + 'io,
        output: impl Write + 'io,
        trace: bool,
    ) -> Self {
        Self {
            stack: Stack::new(),
            input: Box::new(input),
            output: Box::new(output),
            trace,
        }
    }

    /// The shared stack.
    pub fn stack(&self) -> &Stack {
        &self.stack
    }

    /// The shared stack, mutably.
    pub fn stack_mut(&mut self) -> &mut Stack {
        &mut self.stack
    }

    /// Reads one byte, returning its ordinal as a Number, or `-1` at
    /// EOF.
    pub fn read_char(&mut self) -> VmResult<Value> {
        let mut byte = [0u8; 1];
        let n = self
            .input
            .read(&mut byte)
            .map_err(|e| VmError::stack(format!("read error: {e}")))?;
        if n == 0 {
            Ok(Value::Number(-1.0))
        } else {
            Ok(Value::Number(byte[0] as f64))
        }
    }

    /// Reads through the next newline inclusive, or returns an empty
    /// String at EOF; distinguishes an empty line (`"\n"`) from EOF
    /// (`""`) by the number of bytes read.
    pub fn read_line(&mut self) -> VmResult<Value> {
        let mut line = Vec::new();
        let n = self
            .input
            .read_until(b'\n', &mut line)
            .map_err(|e| VmError::stack(format!("read error: {e}")))?;
        if n == 0 {
            Ok(Value::Str(Vec::new()))
        } else {
            Ok(Value::Str(line))
        }
    }

    /// Writes raw bytes to the output stream and flushes, so output
    /// stays usable for interactive programs.
    pub fn write(&mut self, bytes: &[u8]) -> VmResult<()> {
        self.output
            .write_all(bytes)
            .and_then(|_| self.output.flush())
            .map_err(|e| VmError::stack(format!("write error: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_char_returns_minus_one_at_eof() {
        let mut host = Host::new(&b""[..], Vec::new(), false);
        assert_eq!(host.read_char().unwrap(), Value::Number(-1.0));
    }

    #[test]
    fn read_char_returns_byte_ordinal() {
        let mut host = Host::new(&b"A"[..], Vec::new(), false);
        assert_eq!(host.read_char().unwrap(), Value::Number(65.0));
    }

    #[test]
    fn read_line_distinguishes_empty_line_from_eof() {
        let mut host = Host::new(&b"\n"[..], Vec::new(), false);
        assert_eq!(host.read_line().unwrap(), Value::Str(b"\n".to_vec()));

        let mut eof_host = Host::new(&b""[..], Vec::new(), false);
        assert_eq!(eof_host.read_line().unwrap(), Value::Str(Vec::new()));
    }

    #[test]
    fn read_line_keeps_trailing_newline() {
        let mut host = Host::new(&b"hello\nworld"[..], Vec::new(), false);
        assert_eq!(host.read_line().unwrap(), Value::Str(b"hello\n".to_vec()));
        assert_eq!(host.read_line().unwrap(), Value::Str(b"world".to_vec()));
    }

    #[test]
    fn write_flushes_to_the_output_stream() {
        let mut out = Vec::new();
        {
            let mut host = Host::new(&b""[..], &mut out, false);
            host.write(b"hi").unwrap();
        }
        assert_eq!(out, b"hi");
    }
}
