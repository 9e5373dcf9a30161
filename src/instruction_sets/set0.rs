//! Set 0: the priority set. Consulted on every dispatch before
//! whichever set is currently active; only `x` (and the literals
//! `e`/`f`/`g`) may change `active_set`.

use super::{InstructionSet, InstructionSets};
use crate::error::VmError;
use crate::host::Host;
use crate::interpreter::Interpreter;
use crate::value::Value;

pub fn register_handlers(set: &mut InstructionSet) {
    set.register(b'e', activate1);
    set.register(b'f', activate2);
    set.register(b'g', activate3);
    set.register(b'x', activate_from_stack);
    set.register(b'j', push_active);
    set.register(b'z', nop);
}

fn activate1(interp: &mut Interpreter, _host: &mut Host) -> crate::error::VmResult<()> {
    interp.set_active_set(1);
    Ok(())
}

fn activate2(interp: &mut Interpreter, _host: &mut Host) -> crate::error::VmResult<()> {
    interp.set_active_set(2);
    Ok(())
}

fn activate3(interp: &mut Interpreter, _host: &mut Host) -> crate::error::VmResult<()> {
    interp.set_active_set(3);
    Ok(())
}

fn activate_from_stack(interp: &mut Interpreter, host: &mut Host) -> crate::error::VmResult<()> {
    let n = interp.pop_index(host)?;
    if n < 0 || n as usize >= InstructionSets::COUNT {
        return Err(VmError::dispatch(format!("no such set: {n}")));
    }
    interp.set_active_set(n as usize);
    Ok(())
}

fn push_active(interp: &mut Interpreter, host: &mut Host) -> crate::error::VmResult<()> {
    host.stack_mut().push(Value::Number(interp.active_set() as f64));
    Ok(())
}

fn nop(_interp: &mut Interpreter, _host: &mut Host) -> crate::error::VmResult<()> {
    Ok(())
}
