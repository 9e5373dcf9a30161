//! Set 3: quit/recall-while, integer queries and bitwise ops, char
//! handling, and the inverted (bottom-indexed) stack operations.

use super::InstructionSet;
use crate::error::{VmError, VmResult};
use crate::host::Host;
use crate::interpreter::Interpreter;
use crate::value::Value;

pub fn register_handlers(set: &mut InstructionSet) {
    set.register(b'q', quit);
    set.register(b'w', recall_while);
    set.register(b'n', is_number);
    set.register(b's', is_string);
    set.register(b'a', bitwise_and);
    set.register(b'o', bitwise_or);
    set.register(b'i', truncate);
    set.register(b'm', modulo);
    set.register(b't', chr);
    set.register(b'c', char_at);
    set.register(b'r', replace_char);
    set.register(b'p', inverted_copy);
    set.register(b'k', inverted_move);
    set.register(b'b', swap);
    set.register(b'd', swap2);
    set.register(b'h', swap3);
}

/// The Python-style modulo used by `m` and `t`: the result's sign
/// follows the divisor, not the dividend.
fn python_mod(a: f64, b: f64) -> f64 {
    let r = a % b;
    if r != 0.0 && (r < 0.0) != (b < 0.0) {
        r + b
    } else {
        r
    }
}

fn quit(_interp: &mut Interpreter, _host: &mut Host) -> VmResult<()> {
    Err(VmError::Quit)
}

fn recall_while(interp: &mut Interpreter, host: &mut Host) -> VmResult<()> {
    let code = interp.pop_bytes(host)?;
    loop {
        let test = interp.pop_value(host)?;
        if !test.is_truthy() {
            break;
        }
        interp.exec_str(&code, host)?;
    }
    Ok(())
}

fn is_number(interp: &mut Interpreter, host: &mut Host) -> VmResult<()> {
    let value = interp.pop_value(host)?;
    host.stack_mut()
        .push(Value::Number(if matches!(value, Value::Number(_)) { 1.0 } else { 0.0 }));
    Ok(())
}

fn is_string(interp: &mut Interpreter, host: &mut Host) -> VmResult<()> {
    let value = interp.pop_value(host)?;
    host.stack_mut()
        .push(Value::Number(if matches!(value, Value::Str(_)) { 1.0 } else { 0.0 }));
    Ok(())
}

fn int_operands(interp: &mut Interpreter, host: &mut Host) -> VmResult<(i64, i64)> {
    let b = interp.pop_index(host)?;
    let a = interp.pop_index(host)?;
    Ok((a, b))
}

fn bitwise_and(interp: &mut Interpreter, host: &mut Host) -> VmResult<()> {
    let (a, b) = int_operands(interp, host)?;
    host.stack_mut().push(Value::Number((a & b) as f64));
    Ok(())
}

fn bitwise_or(interp: &mut Interpreter, host: &mut Host) -> VmResult<()> {
    let (a, b) = int_operands(interp, host)?;
    host.stack_mut().push(Value::Number((a | b) as f64));
    Ok(())
}

fn truncate(interp: &mut Interpreter, host: &mut Host) -> VmResult<()> {
    let n = interp.pop_number(host)?;
    host.stack_mut().push(Value::Number(n.trunc()));
    Ok(())
}

fn modulo(interp: &mut Interpreter, host: &mut Host) -> VmResult<()> {
    let b = interp.pop_number(host)?;
    let a = interp.pop_number(host)?;
    if b == 0.0 {
        return Err(VmError::arithmetic("modulo by zero"));
    }
    host.stack_mut().push(Value::Number(python_mod(a, b)));
    Ok(())
}

fn chr(interp: &mut Interpreter, host: &mut Host) -> VmResult<()> {
    let k = interp.pop_index(host)?;
    let byte = python_mod(k as f64, 256.0) as u8;
    host.stack_mut().push(Value::Str(vec![byte]));
    Ok(())
}

fn char_at(interp: &mut Interpreter, host: &mut Host) -> VmResult<()> {
    let idx = interp.pop_index(host)?;
    let bytes = interp.pop_bytes(host)?;
    let byte = indexed_byte(&bytes, idx)?;
    host.stack_mut().push(Value::Number(byte as f64));
    Ok(())
}

fn replace_char(interp: &mut Interpreter, host: &mut Host) -> VmResult<()> {
    let repl = interp.pop_bytes(host)?;
    let idx = interp.pop_index(host)?;
    let mut bytes = interp.pop_bytes(host)?;
    indexed_byte(&bytes, idx)?;
    let repl_byte = repl.first().copied().ok_or_else(|| {
        VmError::bounds("replace-char requires a non-empty replacement string")
    })?;
    bytes[idx as usize] = repl_byte;
    host.stack_mut().push(Value::Str(bytes));
    Ok(())
}

fn indexed_byte(bytes: &[u8], idx: i64) -> VmResult<u8> {
    if idx < 0 || idx as usize >= bytes.len() {
        return Err(VmError::bounds(format!(
            "index {idx} out of bounds for a string of length {}",
            bytes.len()
        )));
    }
    Ok(bytes[idx as usize])
}

fn inverted_copy(interp: &mut Interpreter, host: &mut Host) -> VmResult<()> {
    let n = interp.pop_index(host)?;
    let n = non_negative(n)?;
    host.stack_mut().invcopy(n)
}

fn inverted_move(interp: &mut Interpreter, host: &mut Host) -> VmResult<()> {
    let n = interp.pop_index(host)?;
    let n = non_negative(n)?;
    host.stack_mut().invmove(n)
}

fn non_negative(n: i64) -> VmResult<usize> {
    if n < 0 {
        return Err(VmError::stack(format!("negative index: {n}")));
    }
    Ok(n as usize)
}

fn swap(_interp: &mut Interpreter, host: &mut Host) -> VmResult<()> {
    host.stack_mut().swapn(1)
}

fn swap2(_interp: &mut Interpreter, host: &mut Host) -> VmResult<()> {
    host.stack_mut().swapn(2)
}

fn swap3(_interp: &mut Interpreter, host: &mut Host) -> VmResult<()> {
    host.stack_mut().swapn(3)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn run(source: &[u8]) -> (VmResult<()>, String) {
        let program = parse(source).unwrap();
        let mut interp = Interpreter::new(program, 3);
        let mut out = Vec::new();
        let result = {
            let mut host = Host::new(&b""[..], &mut out, false);
            interp.run(&mut host)
        };
        (result, String::from_utf8(out).unwrap())
    }

    #[test]
    fn quit_unwinds_as_a_quit_not_a_reported_error() {
        let (result, _) = run(b"q");
        assert!(result.unwrap_err().is_quit());
    }

    #[test]
    fn python_mod_matches_reference_examples() {
        assert_eq!(python_mod(-3.0, 4.0), 1.0);
        assert_eq!(python_mod(3.0, -4.0), -1.0);
        assert_eq!(python_mod(5.0, 3.0), 2.0);
    }

    #[test]
    fn char_at_rejects_out_of_range_index() {
        let (result, _) = run(b"[ab]5c");
        assert!(result.is_err());
    }

    #[test]
    fn replace_char_swaps_a_single_byte() {
        let (result, out) = run(b"[cat]1[o]r e o");
        result.unwrap();
        assert_eq!(out, "cot\n");
    }
}
