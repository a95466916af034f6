use crate::chip8_emulator::config::KEY_COUNT;
use crate::chip8_emulator::error::Chip8Error;

/// State of the 16-key hex keypad. Written by the host, read by the VM.
#[derive(Debug, Clone, Default)]
pub struct Keypad {
    keys: [bool; KEY_COUNT],
}

impl Keypad {
    /// Returns true when this call moved the key from released to pressed.
    pub fn set_key(&mut self, key: usize, pressed: bool) -> Result<bool, Chip8Error> {
        let slot = self.keys.get_mut(key).ok_or(Chip8Error::InvalidKey(key))?;
        let transitioned = pressed && !*slot;
        *slot = pressed;
        Ok(transitioned)
    }

    pub fn is_key_down(&self, key: usize) -> Result<bool, Chip8Error> {
        self.keys
            .get(key)
            .copied()
            .ok_or(Chip8Error::InvalidKey(key))
    }

    /// Lowest-numbered key currently held.
    pub fn any_key_down(&self) -> Option<u8> {
        self.keys
            .iter()
            .position(|pressed| *pressed)
            .map(|index| index as u8)
    }

    pub fn release_all(&mut self) {
        self.keys = [false; KEY_COUNT];
    }
}
