//! Error types for the interpreter crate.
//!
//! This module provides the error type used across parsing, stack
//! addressing, and instruction dispatch, plus the context-window
//! formatting that both the parser and the dispatch loop use to
//! describe where in the source (or in the parsed program) a failure
//! happened.

use thiserror::Error;

/// The kind of value a [`crate::value::Value`] holds, used for type-error
/// reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeName {
    /// A `Number` value.
    Number,
    /// A `String` (byte sequence) value.
    String,
}

impl std::fmt::Display for TypeName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TypeName::Number => write!(f, "number"),
            TypeName::String => write!(f, "string"),
        }
    }
}

/// Interpreter errors.
///
/// `Quit` is not really an error: it is the cooperative termination
/// signal raised by set 3's `q` command. It is modeled as a variant of
/// this enum so it can unwind through every nested interpreter frame
/// with a plain `?`, but callers must special-case it before printing
/// or wrapping (see [`VmError::is_quit`]).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum VmError {
    /// Malformed source text: unterminated `[` or a stray `]`.
    #[error("Parse error: {message}")]
    Parse { message: String },

    /// A stack-addressing operation referenced a slot that doesn't exist,
    /// or popped from an empty stack.
    #[error("Stack error: {message}")]
    Stack { message: String },

    /// An operand had the wrong variant.
    #[error("Wrong type: expected {expected} instead of {actual}")]
    Type { expected: TypeName, actual: TypeName },

    /// `active_set` was out of range, or the active set has no handler
    /// for the dispatched command.
    #[error("{message}")]
    Dispatch { message: String },

    /// Division or modulo by zero.
    #[error("{operation}")]
    Arithmetic { operation: String },

    /// A char-at / replace-char index fell outside `[0, len)`.
    #[error("{message}")]
    Bounds { message: String },

    /// An error raised by a sub-interpreter spawned from `exec`, `while`,
    /// or `recall-while`, wrapped with the parent's context.
    #[error("exec: {message}")]
    Exec { message: String },

    /// Any handler-raised error, decorated with the ip-context the
    /// dispatch loop attaches before propagating it.
    #[error("{source} at ip {ip} ({context})")]
    AtIp {
        ip: usize,
        context: String,
        #[source]
        source: Box<VmError>,
    },

    /// Cooperative termination signal from the `q` command in set 3.
    /// Not printed, not wrapped; unwinds straight to the driver.
    #[error("quit")]
    Quit,
}

impl VmError {
    /// Creates a parse error.
    pub fn parse<S: Into<String>>(message: S) -> Self {
        Self::Parse { message: message.into() }
    }

    /// Creates a stack error.
    pub fn stack<S: Into<String>>(message: S) -> Self {
        Self::Stack { message: message.into() }
    }

    /// Creates a type error.
    pub fn type_mismatch(expected: TypeName, actual: TypeName) -> Self {
        Self::Type { expected, actual }
    }

    /// Creates a dispatch error.
    pub fn dispatch<S: Into<String>>(message: S) -> Self {
        Self::Dispatch { message: message.into() }
    }

    /// Creates an arithmetic error.
    pub fn arithmetic<S: Into<String>>(operation: S) -> Self {
        Self::Arithmetic { operation: operation.into() }
    }

    /// Creates a bounds error.
    pub fn bounds<S: Into<String>>(message: S) -> Self {
        Self::Bounds { message: message.into() }
    }

    /// Decorates `self` with the ip-context format. `Quit` is returned
    /// unchanged — it must never be decorated.
    pub fn at_ip(self, ip: usize, context: String) -> Self {
        if self.is_quit() {
            return self;
        }
        Self::AtIp { ip, context, source: Box::new(self) }
    }

    /// True for the `Quit` variant.
    pub fn is_quit(&self) -> bool {
        matches!(self, VmError::Quit)
    }

    /// Wraps a sub-interpreter's failure in an `exec:` context. `Quit`
    /// passes through unwrapped: it must keep unwinding as `Quit`, not
    /// become a reported error.
    pub fn wrap_exec(self) -> Self {
        match self {
            VmError::Quit => VmError::Quit,
            VmError::Parse { message } => {
                VmError::Exec { message: format!("parsing of string failed: {message}") }
            }
            other => VmError::Exec {
                message: format!("sub-interpreter runtime error: {other}"),
            },
        }
    }

    /// The category label the top-level driver prefixes its message
    /// with ("Parse error" / "Run-time error").
    pub fn category(&self) -> &'static str {
        match self {
            VmError::Parse { .. } => "Parse error",
            VmError::Quit => "",
            _ => "Run-time error",
        }
    }
}

/// Result alias used throughout the crate.
pub type VmResult<T> = Result<T, VmError>;

/// Formats a position-focused context window over a sequence of
/// `Display`-able tokens (source characters or parsed items), matching
/// the format both the parser and the dispatch loop use to report
/// where a failure happened: up to 5 tokens before and 5 after the
/// offending one, joined with `->token<-` markers, with ellipses where
/// the window was truncated.
pub fn context_window<T, I>(tokens: &[T], position: usize, render: I) -> String
where
    I: Fn(&T) -> String,
{
    let start = position.saturating_sub(5);
    let before: Vec<String> = tokens[start..position].iter().map(&render).collect();
    let before_prefix = if start > 0 { "..." } else { "" };

    let focal = tokens.get(position).map(&render).unwrap_or_default();

    let end = (position + 6).min(tokens.len());
    let after_start = (position + 1).min(tokens.len());
    let after: Vec<String> = tokens[after_start..end].iter().map(&render).collect();
    let after_suffix = if end < tokens.len() { "..." } else { "" };

    format!(
        "{before_prefix}{} ->{focal}<- {}{after_suffix}",
        before.join(""),
        after.join(""),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_exec_passes_quit_through_unwrapped() {
        let wrapped = VmError::Quit.wrap_exec();
        assert!(wrapped.is_quit());
    }

    #[test]
    fn wrap_exec_labels_parse_errors() {
        let wrapped = VmError::parse("unterminated [").wrap_exec();
        assert!(matches!(wrapped, VmError::Exec { .. }));
        assert!(wrapped.to_string().contains("parsing of string failed"));
    }

    #[test]
    fn wrap_exec_labels_runtime_errors() {
        let wrapped = VmError::stack("pop from empty stack").wrap_exec();
        assert!(wrapped.to_string().contains("sub-interpreter runtime error"));
    }

    #[test]
    fn context_window_marks_focal_char_with_ellipsis() {
        let chars: Vec<char> = "abcdefghijklmnop".chars().collect();
        let window = context_window(&chars, 10, |c| c.to_string());
        assert!(window.contains("->k<-"));
        assert!(window.starts_with("..."));
    }
}
