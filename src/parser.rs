//! Source text → [`Program`].

use crate::error::{context_window, VmError, VmResult};
use crate::item::Item;
use crate::program::Program;
use crate::value::Value;

/// Parses a source byte string into a [`Program`].
///
/// Digits `0`-`9` push single-digit numeric constants. `[...]` pushes a
/// bracketed string constant, tracking nesting depth so inner
/// `[...]` pairs are carried through verbatim. Whitespace (space,
/// newline, tab) is skipped. Every other byte becomes a command.
pub fn parse(source: &[u8]) -> VmResult<Program> {
    let mut items = Vec::new();
    let mut i = 0usize;

    while i < source.len() {
        let b = source[i];
        match b {
            b'0'..=b'9' => {
                items.push(Item::Constant(Value::Number((b - b'0') as f64)));
            }
            b'[' => {
                let open = i;
                let mut depth = 1i32;
                let mut content = Vec::new();
                loop {
                    i += 1;
                    if i >= source.len() {
                        return Err(VmError::parse(format!(
                            "unterminated [ at position {open} ({})",
                            source_context(source, open)
                        )));
                    }
                    match source[i] {
                        b']' => {
                            depth -= 1;
                            if depth == 0 {
                                break;
                            }
                            content.push(source[i]);
                        }
                        b'[' => {
                            depth += 1;
                            content.push(source[i]);
                        }
                        other => content.push(other),
                    }
                }
                items.push(Item::Constant(Value::Str(content)));
            }
            b']' => {
                return Err(VmError::parse(format!(
                    "] without [ at position {i} ({})",
                    source_context(source, i)
                )));
            }
            b' ' | b'\n' | b'\t' => {}
            other => items.push(Item::Command(other)),
        }
        i += 1;
    }

    Ok(Program::new(items))
}

fn source_context(source: &[u8], position: usize) -> String {
    let chars: Vec<u8> = source.to_vec();
    context_window(&chars, position, |b| (*b as char).to_string())
}
