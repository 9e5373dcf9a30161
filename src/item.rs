//! Parsed program elements.

use crate::value::Value;

/// A single parsed element of a [`crate::program::Program`]: either a
/// push-constant or a single-character command.
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    /// Pushes the embedded value onto the stack when executed.
    Constant(Value),
    /// Dispatches to whichever instruction set handles this byte.
    Command(u8),
}

impl std::fmt::Display for Item {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Item::Command(c) => write!(f, "{}", *c as char),
            Item::Constant(Value::Number(n)) => write!(f, "{n}"),
            Item::Constant(Value::Str(bytes)) => {
                write!(f, "[{}]", String::from_utf8_lossy(bytes))
            }
        }
    }
}
