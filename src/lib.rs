//! # Gibberish VM
//!
//! An interpreter for a small stack-based esoteric language whose
//! programs are single-character commands and bracketed string
//! literals, dispatched through one of four swappable instruction
//! sets.
//!
//! ## Architecture
//!
//! - [`parser`] — lifts source bytes into a [`program::Program`] of
//!   [`item::Item`]s.
//! - [`value`] — the two-variant `Value` (Number / String) every stack
//!   slot holds.
//! - [`stack`] — the LIFO value stack with positional and inverted
//!   addressing.
//! - [`instruction_sets`] — the four fixed command-to-handler tables,
//!   one of which (set 0) has dispatch priority over whichever is
//!   currently active.
//! - [`interpreter`] — the dispatch loop: one [`Interpreter`] per stack
//!   frame, recursing into child interpreters for `exec`/`while`.
//! - [`host`] — owns the shared [`stack::Stack`] and brokers I/O for
//!   every interpreter frame.
//! - [`error`] — the [`VmError`] enum and the context-window formatter
//!   shared by the parser and the dispatch loop.
//!
//! ## Example
//!
//! ```rust,no_run
//! use gibberish_vm::run;
//!
//! let mut out = Vec::new();
//! run(b"e1 1 a o", std::io::empty(), &mut out, false).unwrap();
//! assert_eq!(out, b"2\n");
//! ```

pub mod error;
pub mod host;
pub mod instruction_sets;
pub mod interpreter;
pub mod item;
pub mod parser;
pub mod program;
pub mod stack;
pub mod value;

pub use error::{VmError, VmResult};
pub use host::Host;
pub use interpreter::Interpreter;
pub use program::Program;
pub use value::Value;

use std::io::{BufRead, Write};

/// Parses `source` and runs it to completion against the given I/O
/// streams, starting with an empty stack and `active_set = 0`. This is
/// the one public entry point both the CLI driver and the integration
/// tests go through.
pub fn run(source: &[u8], input: impl BufRead, output: impl Write, trace: bool) -> VmResult<()> {
    let program = parser::parse(source)?;
    let mut interpreter = Interpreter::new(program, 0);
    let mut host = Host::new(input, output, trace);
    interpreter.run(&mut host)
}
