use crate::chip8_emulator::config::{
    FONT_BASE, FONT_BYTES, FONT_SIZE, MAX_PROGRAM_SIZE, MEMORY_SIZE, PROGRAM_START,
};
use crate::chip8_emulator::error::Chip8Error;

/// Flat 4 KiB address space. Every access is bounds-checked.
#[derive(Debug, Clone)]
pub struct Memory {
    bytes: [u8; MEMORY_SIZE],
}

impl Default for Memory {
    fn default() -> Self {
        let mut memory = Self {
            bytes: [0; MEMORY_SIZE],
        };
        memory.load_fontset(&FONT_BYTES);
        memory
    }
}

impl Memory {
    pub fn read(&self, address: usize) -> Result<u8, Chip8Error> {
        self.bytes
            .get(address)
            .copied()
            .ok_or(Chip8Error::AddressOutOfRange(address))
    }

    pub fn write(&mut self, address: usize, value: u8) -> Result<(), Chip8Error> {
        let slot = self
            .bytes
            .get_mut(address)
            .ok_or(Chip8Error::AddressOutOfRange(address))?;
        *slot = value;
        Ok(())
    }

    /// Reads `len` consecutive bytes, failing before anything is returned if
    /// any of them falls outside memory.
    pub fn read_range(&self, address: usize, len: usize) -> Result<&[u8], Chip8Error> {
        let end = checked_end(address, len)?;
        Ok(&self.bytes[address..end])
    }

    /// Writes all of `values` or nothing.
    pub fn write_range(&mut self, address: usize, values: &[u8]) -> Result<(), Chip8Error> {
        let end = checked_end(address, values.len())?;
        self.bytes[address..end].copy_from_slice(values);
        Ok(())
    }

    pub fn load_fontset(&mut self, glyphs: &[u8; FONT_SIZE]) {
        self.bytes[FONT_BASE..FONT_BASE + glyphs.len()].copy_from_slice(glyphs);
    }

    pub fn load_program(&mut self, program: &[u8]) -> Result<(), Chip8Error> {
        if program.len() > MAX_PROGRAM_SIZE {
            return Err(Chip8Error::ProgramTooLarge {
                size: program.len(),
                max: MAX_PROGRAM_SIZE,
            });
        }

        self.bytes[PROGRAM_START..PROGRAM_START + program.len()].copy_from_slice(program);
        Ok(())
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }
}

fn checked_end(address: usize, len: usize) -> Result<usize, Chip8Error> {
    match address.checked_add(len) {
        Some(end) if end <= MEMORY_SIZE => Ok(end),
        // Report the first byte that does not exist.
        _ => Err(Chip8Error::AddressOutOfRange(address.max(MEMORY_SIZE))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_then_read_every_address() {
        let mut memory = Memory::default();
        for address in 0..MEMORY_SIZE {
            let value = (address * 7 % 256) as u8;
            memory.write(address, value).unwrap();
            assert_eq!(memory.read(address).unwrap(), value);
        }
    }

    #[test]
    fn out_of_range_access_fails() {
        let mut memory = Memory::default();

        assert!(matches!(
            memory.read(MEMORY_SIZE),
            Err(Chip8Error::AddressOutOfRange(0x1000))
        ));
        assert!(matches!(
            memory.write(MEMORY_SIZE + 3, 1),
            Err(Chip8Error::AddressOutOfRange(0x1003))
        ));
    }

    #[test]
    fn write_range_is_all_or_nothing() {
        let mut memory = Memory::default();

        let result = memory.write_range(MEMORY_SIZE - 2, &[1, 2, 3]);

        assert!(matches!(result, Err(Chip8Error::AddressOutOfRange(_))));
        assert_eq!(memory.read(MEMORY_SIZE - 2).unwrap(), 0);
        assert_eq!(memory.read(MEMORY_SIZE - 1).unwrap(), 0);
    }

    #[test]
    fn font_is_preloaded_and_low_memory_otherwise_zero() {
        let memory = Memory::default();

        assert_eq!(memory.read_range(FONT_BASE, 5).unwrap(), &[0xF0, 0x90, 0x90, 0x90, 0xF0]);
        assert!(memory.as_slice()[..FONT_BASE].iter().all(|byte| *byte == 0));
        assert!(memory.as_slice()[PROGRAM_START..].iter().all(|byte| *byte == 0));
    }

    #[test]
    fn program_fills_all_available_space() {
        let mut memory = Memory::default();
        let program = vec![0xAB; MAX_PROGRAM_SIZE];

        memory.load_program(&program).unwrap();

        assert_eq!(memory.read(PROGRAM_START).unwrap(), 0xAB);
        assert_eq!(memory.read(MEMORY_SIZE - 1).unwrap(), 0xAB);
    }

    #[test]
    fn oversized_program_is_rejected() {
        let mut memory = Memory::default();
        let program = vec![0xAB; MAX_PROGRAM_SIZE + 1];

        let result = memory.load_program(&program);

        assert!(matches!(
            result,
            Err(Chip8Error::ProgramTooLarge { size: 3585, max: 3584 })
        ));
        assert_eq!(memory.read(PROGRAM_START).unwrap(), 0);
    }
}
