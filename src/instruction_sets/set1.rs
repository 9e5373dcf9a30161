//! Set 1: arithmetic, I/O, and plain stack shuffling.

use super::InstructionSet;
use crate::error::{VmError, VmResult};
use crate::host::Host;
use crate::interpreter::Interpreter;
use crate::value::Value;

pub fn register_handlers(set: &mut InstructionSet) {
    set.register(b'u', duplicate);
    set.register(b'a', add);
    set.register(b's', subtract);
    set.register(b'm', multiply);
    set.register(b'd', divide);
    set.register(b't', to_string);
    set.register(b'i', to_number);
    set.register(b'c', concat);
    set.register(b'o', output_line);
    set.register(b'q', output_inline);
    set.register(b'n', read_char);
    set.register(b'l', read_line);
    set.register(b'h', substring);
    set.register(b'y', strlen);
    set.register(b'v', discard);
    set.register(b'p', copy_n);
    set.register(b'k', move_n);
    set.register(b'r', stack_size);
}

/// Pops `b` then `a`, the order every binary arithmetic op in this set
/// uses.
fn pop_operands(interp: &Interpreter, host: &mut Host) -> VmResult<(f64, f64)> {
    let b = interp.pop_number(host)?;
    let a = interp.pop_number(host)?;
    Ok((a, b))
}

fn non_negative_index(n: i64) -> VmResult<usize> {
    if n < 0 {
        return Err(VmError::stack(format!("negative index: {n}")));
    }
    Ok(n as usize)
}

fn duplicate(_interp: &mut Interpreter, host: &mut Host) -> VmResult<()> {
    host.stack_mut().copy(0)
}

fn add(interp: &mut Interpreter, host: &mut Host) -> VmResult<()> {
    let (a, b) = pop_operands(interp, host)?;
    host.stack_mut().push(Value::Number(a + b));
    Ok(())
}

fn subtract(interp: &mut Interpreter, host: &mut Host) -> VmResult<()> {
    let (a, b) = pop_operands(interp, host)?;
    host.stack_mut().push(Value::Number(a - b));
    Ok(())
}

fn multiply(interp: &mut Interpreter, host: &mut Host) -> VmResult<()> {
    let (a, b) = pop_operands(interp, host)?;
    host.stack_mut().push(Value::Number(a * b));
    Ok(())
}

fn divide(interp: &mut Interpreter, host: &mut Host) -> VmResult<()> {
    let (a, b) = pop_operands(interp, host)?;
    if b == 0.0 {
        return Err(VmError::arithmetic("division by zero"));
    }
    host.stack_mut().push(Value::Number(a / b));
    Ok(())
}

fn to_string(interp: &mut Interpreter, host: &mut Host) -> VmResult<()> {
    let n = interp.pop_number(host)?;
    host.stack_mut().push(Value::Str(Value::Number(n).v2str()));
    Ok(())
}

fn to_number(interp: &mut Interpreter, host: &mut Host) -> VmResult<()> {
    let bytes = interp.pop_bytes(host)?;
    match std::str::from_utf8(&bytes).ok().and_then(|s| s.trim().parse::<f64>().ok()) {
        Some(n) => host.stack_mut().push(Value::Number(n)),
        None => host.stack_mut().push(Value::Str(bytes)),
    }
    Ok(())
}

fn concat(interp: &mut Interpreter, host: &mut Host) -> VmResult<()> {
    let b = interp.pop_bytes(host)?;
    let a = interp.pop_bytes(host)?;
    let mut result = a;
    result.extend_from_slice(&b);
    host.stack_mut().push(Value::Str(result));
    Ok(())
}

fn output_line(interp: &mut Interpreter, host: &mut Host) -> VmResult<()> {
    let value = interp.pop_value(host)?;
    let mut bytes = value.v2str();
    bytes.push(b'\n');
    host.write(&bytes)
}

fn output_inline(interp: &mut Interpreter, host: &mut Host) -> VmResult<()> {
    let value = interp.pop_value(host)?;
    host.write(&value.v2str())
}

fn read_char(_interp: &mut Interpreter, host: &mut Host) -> VmResult<()> {
    let value = host.read_char()?;
    host.stack_mut().push(value);
    Ok(())
}

fn read_line(_interp: &mut Interpreter, host: &mut Host) -> VmResult<()> {
    let value = host.read_line()?;
    host.stack_mut().push(value);
    Ok(())
}

fn substring(interp: &mut Interpreter, host: &mut Host) -> VmResult<()> {
    let end = interp.pop_index(host)?;
    let start = interp.pop_index(host)?;
    let bytes = interp.pop_bytes(host)?;
    let start = non_negative_index(start)?.min(bytes.len());
    let end = non_negative_index(end)?.min(bytes.len()).max(start);
    host.stack_mut().push(Value::Str(bytes[start..end].to_vec()));
    Ok(())
}

fn strlen(interp: &mut Interpreter, host: &mut Host) -> VmResult<()> {
    let bytes = interp.pop_bytes(host)?;
    host.stack_mut().push(Value::Number(bytes.len() as f64));
    Ok(())
}

fn discard(interp: &mut Interpreter, host: &mut Host) -> VmResult<()> {
    interp.pop_value(host)?;
    Ok(())
}

fn copy_n(interp: &mut Interpreter, host: &mut Host) -> VmResult<()> {
    let n = interp.pop_index(host)?;
    let n = non_negative_index(n)?;
    host.stack_mut().copy(n)
}

fn move_n(interp: &mut Interpreter, host: &mut Host) -> VmResult<()> {
    let n = interp.pop_index(host)?;
    let n = non_negative_index(n)?;
    host.stack_mut().move_to_top(n)
}

fn stack_size(_interp: &mut Interpreter, host: &mut Host) -> VmResult<()> {
    let len = host.stack().len();
    host.stack_mut().push(Value::Number(len as f64));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn run(source: &[u8]) -> (VmResult<()>, String) {
        let program = parse(source).unwrap();
        let mut interp = Interpreter::new(program, 1);
        let mut out = Vec::new();
        let result = {
            let mut host = Host::new(&b""[..], &mut out, false);
            interp.run(&mut host)
        };
        (result, String::from_utf8(out).unwrap())
    }

    #[test]
    fn to_number_falls_back_to_the_original_string_on_parse_failure() {
        let (result, out) = run(b"[abc] i [!] c o");
        result.unwrap();
        assert_eq!(out, "abc!\n");
    }

    #[test]
    fn to_number_pushes_a_number_on_success() {
        let (result, out) = run(b"[42] i 1 a o");
        result.unwrap();
        assert_eq!(out, "43\n");
    }

    #[test]
    fn substring_is_half_open() {
        let (result, out) = run(b"[hello]0 3 h o");
        result.unwrap();
        assert_eq!(out, "hel\n");
    }

    #[test]
    fn substring_end_past_the_string_clamps_instead_of_erroring() {
        let (result, out) = run(b"[hello]0 9 h o");
        result.unwrap();
        assert_eq!(out, "hello\n");
    }

    #[test]
    fn division_by_zero_is_an_arithmetic_error() {
        let (result, _) = run(b"4 0 d");
        assert!(result.is_err());
    }
}
