//! Set 2: comparison, control flow, and logic.

use super::InstructionSet;
use crate::error::{VmError, VmResult};
use crate::host::Host;
use crate::interpreter::Interpreter;
use crate::value::Value;

pub fn register_handlers(set: &mut InstructionSet) {
    set.register(b'u', greater_than);
    set.register(b'd', less_than);
    set.register(b's', skip);
    set.register(b't', skip_two);
    set.register(b'p', insert);
    set.register(b'a', logical_and);
    set.register(b'o', logical_or);
    set.register(b'n', logical_not);
    set.register(b'c', exec);
    set.register(b'w', while_classic);
    set.register(b'q', equal);
    set.register(b'l', shift_left);
    set.register(b'r', shift_right);
}

fn as_bool(flag: bool) -> Value {
    Value::Number(if flag { 1.0 } else { 0.0 })
}

/// Generic ordering/equality comparison: Number against Number
/// compares numerically, String against String compares bytes
/// lexicographically. Comparing across variants is a type error — the
/// source's host language compares polymorphically, but Rust has no
/// such built-in total order across an untagged pair of kinds.
fn compare(a: &Value, b: &Value) -> VmResult<std::cmp::Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            Ok(x.partial_cmp(y).unwrap_or(std::cmp::Ordering::Equal))
        }
        (Value::Str(x), Value::Str(y)) => Ok(x.cmp(y)),
        _ => Err(VmError::type_mismatch(a.type_name(), b.type_name())),
    }
}

fn greater_than(interp: &mut Interpreter, host: &mut Host) -> VmResult<()> {
    let b = interp.pop_value(host)?;
    let a = interp.pop_value(host)?;
    let ordering = compare(&a, &b)?;
    host.stack_mut().push(as_bool(ordering == std::cmp::Ordering::Greater));
    Ok(())
}

fn less_than(interp: &mut Interpreter, host: &mut Host) -> VmResult<()> {
    let b = interp.pop_value(host)?;
    let a = interp.pop_value(host)?;
    let ordering = compare(&a, &b)?;
    host.stack_mut().push(as_bool(ordering == std::cmp::Ordering::Less));
    Ok(())
}

fn equal(interp: &mut Interpreter, host: &mut Host) -> VmResult<()> {
    let b = interp.pop_value(host)?;
    let a = interp.pop_value(host)?;
    let ordering = compare(&a, &b)?;
    host.stack_mut().push(as_bool(ordering == std::cmp::Ordering::Equal));
    Ok(())
}

fn skip(interp: &mut Interpreter, host: &mut Host) -> VmResult<()> {
    let n = interp.pop_index(host)?;
    interp.adjust_ip(n);
    Ok(())
}

fn skip_two(interp: &mut Interpreter, host: &mut Host) -> VmResult<()> {
    let n = interp.pop_number(host)?;
    interp.adjust_ip((n * 2.0).trunc() as i64);
    Ok(())
}

fn insert(interp: &mut Interpreter, host: &mut Host) -> VmResult<()> {
    let where_ = interp.pop_index(host)?;
    let thing = interp.pop_value(host)?;
    host.stack_mut().insert(where_, thing)
}

fn logical_and(interp: &mut Interpreter, host: &mut Host) -> VmResult<()> {
    let b = interp.pop_value(host)?;
    let a = interp.pop_value(host)?;
    host.stack_mut().push(as_bool(a.is_truthy() && b.is_truthy()));
    Ok(())
}

fn logical_or(interp: &mut Interpreter, host: &mut Host) -> VmResult<()> {
    let b = interp.pop_value(host)?;
    let a = interp.pop_value(host)?;
    host.stack_mut().push(as_bool(a.is_truthy() || b.is_truthy()));
    Ok(())
}

fn logical_not(interp: &mut Interpreter, host: &mut Host) -> VmResult<()> {
    let a = interp.pop_value(host)?;
    host.stack_mut().push(as_bool(!a.is_truthy()));
    Ok(())
}

fn exec(interp: &mut Interpreter, host: &mut Host) -> VmResult<()> {
    let code = interp.pop_bytes(host)?;
    interp.exec_str(&code, host)
}

fn while_classic(interp: &mut Interpreter, host: &mut Host) -> VmResult<()> {
    loop {
        let test = interp.pop_value(host)?;
        if !test.is_truthy() {
            break;
        }
        let code = interp.pop_bytes(host)?;
        interp.exec_str(&code, host)?;
    }
    Ok(())
}

fn int_operands(interp: &mut Interpreter, host: &mut Host) -> VmResult<(i64, i64)> {
    let b = interp.pop_index(host)?;
    let a = interp.pop_index(host)?;
    Ok((a, b))
}

fn shift_left(interp: &mut Interpreter, host: &mut Host) -> VmResult<()> {
    let (a, b) = int_operands(interp, host)?;
    host.stack_mut().push(Value::Number((a << b) as f64));
    Ok(())
}

fn shift_right(interp: &mut Interpreter, host: &mut Host) -> VmResult<()> {
    let (a, b) = int_operands(interp, host)?;
    host.stack_mut().push(Value::Number((a >> b) as f64));
    Ok(())
}
