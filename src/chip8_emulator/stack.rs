use crate::chip8_emulator::config::STACK_DEPTH;
use crate::chip8_emulator::error::Chip8Error;

/// Return addresses for CALL/RET. Nothing else is ever pushed.
#[derive(Debug, Clone, Default)]
pub struct Stack {
    slots: [u16; STACK_DEPTH],
    sp: usize,
}

impl Stack {
    pub fn push(&mut self, address: u16) -> Result<(), Chip8Error> {
        if self.sp >= STACK_DEPTH {
            return Err(Chip8Error::StackOverflow);
        }
        self.slots[self.sp] = address;
        self.sp += 1;
        Ok(())
    }

    pub fn pop(&mut self) -> Result<u16, Chip8Error> {
        if self.sp == 0 {
            return Err(Chip8Error::StackUnderflow);
        }
        self.sp -= 1;
        Ok(self.slots[self.sp])
    }

    pub fn depth(&self) -> usize {
        self.sp
    }

    pub fn is_empty(&self) -> bool {
        self.sp == 0
    }

    /// Live frames, oldest first.
    pub fn frames(&self) -> &[u16] {
        &self.slots[..self.sp]
    }
}
