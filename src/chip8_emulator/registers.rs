use crate::chip8_emulator::config::{ADDRESS_MASK, FLAG_REGISTER, PROGRAM_START, REGISTER_COUNT};
use crate::chip8_emulator::error::Chip8Error;

/// `V0..VF`, the index register `I` and the program counter.
///
/// `I` and `PC` are 12-bit quantities; every setter masks them.
#[derive(Debug, Clone)]
pub struct Registers {
    v: [u8; REGISTER_COUNT],
    index: u16,
    pc: u16,
}

impl Default for Registers {
    fn default() -> Self {
        Self {
            v: [0; REGISTER_COUNT],
            index: 0,
            pc: PROGRAM_START as u16,
        }
    }
}

impl Registers {
    pub fn v(&self, register: usize) -> Result<u8, Chip8Error> {
        self.v
            .get(register)
            .copied()
            .ok_or(Chip8Error::InvalidRegister(register))
    }

    pub fn set_v(&mut self, register: usize, value: u8) -> Result<(), Chip8Error> {
        let slot = self
            .v
            .get_mut(register)
            .ok_or(Chip8Error::InvalidRegister(register))?;
        *slot = value;
        Ok(())
    }

    pub fn flag(&self) -> u8 {
        self.v[FLAG_REGISTER]
    }

    pub fn set_flag(&mut self, set: bool) {
        self.v[FLAG_REGISTER] = u8::from(set);
    }

    /// Commits a result that also produces a flag. VF is written before the
    /// destination, so `VF` as destination ends up holding the result.
    pub fn set_with_flag(
        &mut self,
        register: usize,
        value: u8,
        flag: bool,
    ) -> Result<(), Chip8Error> {
        if register >= REGISTER_COUNT {
            return Err(Chip8Error::InvalidRegister(register));
        }
        self.set_flag(flag);
        self.v[register] = value;
        Ok(())
    }

    pub fn all(&self) -> &[u8; REGISTER_COUNT] {
        &self.v
    }

    pub fn index(&self) -> u16 {
        self.index
    }

    pub fn set_index(&mut self, value: u16) {
        self.index = value & ADDRESS_MASK;
    }

    pub fn pc(&self) -> u16 {
        self.pc
    }

    pub fn set_pc(&mut self, value: u16) {
        self.pc = value & ADDRESS_MASK;
    }

    pub fn advance_pc(&mut self, by: u16) {
        self.set_pc(self.pc.wrapping_add(by));
    }
}
