//! The four swappable instruction sets.
//!
//! Each set is a fixed `[Option<Handler>; 256]` array indexed by command
//! byte, built once by a `register_handlers` function per set and
//! composed into a single shared [`InstructionSets`] at first use —
//! the same jump-table shape as the reference virtual machine's own
//! dispatch tables, but assembled lazily behind a `once_cell::sync::Lazy`
//! rather than a `static mut` guarded by `unsafe`.

pub mod set0;
pub mod set1;
pub mod set2;
pub mod set3;

use once_cell::sync::Lazy;

use crate::error::VmResult;
use crate::host::Host;
use crate::interpreter::Interpreter;

/// The number of instruction sets (one priority set plus three active
/// sets).
pub const COUNT: usize = 4;

/// A single command handler: given the interpreter frame that dispatched
/// it and the host it shares with every other frame, perform the
/// command's effect.
pub type Handler = fn(&mut Interpreter, &mut Host) -> VmResult<()>;

/// One fixed mapping from command byte to handler.
#[derive(Clone, Copy)]
pub struct InstructionSet {
    handlers: [Option<Handler>; 256],
}

impl InstructionSet {
    fn empty() -> Self {
        Self { handlers: [None; 256] }
    }

    fn register(&mut self, command: u8, handler: Handler) {
        self.handlers[command as usize] = Some(handler);
    }

    /// The handler registered for `command`, if any.
    pub fn get(&self, command: u8) -> Option<Handler> {
        self.handlers[command as usize]
    }
}

/// The four instruction sets, built once and shared by every interpreter
/// frame.
pub struct InstructionSets {
    sets: [InstructionSet; COUNT],
}

impl InstructionSets {
    /// Instruction-set count, re-exported for callers that already hold
    /// an `InstructionSets` and want the bound without a free function.
    pub const COUNT: usize = COUNT;

    fn build() -> Self {
        let mut sets = [InstructionSet::empty(); COUNT];
        set0::register_handlers(&mut sets[0]);
        set1::register_handlers(&mut sets[1]);
        set2::register_handlers(&mut sets[2]);
        set3::register_handlers(&mut sets[3]);
        Self { sets }
    }

    /// The set consulted first on every dispatch.
    pub fn priority(&self) -> &InstructionSet {
        &self.sets[0]
    }

    /// The set at `index`. Panics if `index >= COUNT`; callers must
    /// range-check first (the dispatch loop does, via `VmError::dispatch`).
    pub fn get(&self, index: usize) -> &InstructionSet {
        &self.sets[index]
    }

    /// The process-wide shared instance, built on first access.
    pub fn shared() -> &'static InstructionSets {
        static SHARED: Lazy<InstructionSets> = Lazy::new(InstructionSets::build);
        &SHARED
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_set_has_the_six_set0_commands() {
        let sets = InstructionSets::shared();
        for c in b"efgxjz" {
            assert!(sets.priority().get(*c).is_some(), "missing handler for {}", *c as char);
        }
    }

    #[test]
    fn set_1_has_arithmetic_and_io_commands() {
        let sets = InstructionSets::shared();
        for c in b"uasmdticoqnlhyvpkr" {
            assert!(sets.get(1).get(*c).is_some(), "missing handler for {}", *c as char);
        }
    }

    #[test]
    fn unregistered_command_is_none() {
        let sets = InstructionSets::shared();
        assert!(sets.get(1).get(b'Q').is_none());
    }
}
