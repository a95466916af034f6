use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::chip8_emulator::display::{DisplayBuffer, Framebuffer};
use crate::chip8_emulator::error::Chip8Error;
use crate::chip8_emulator::input::Keypad;
use crate::chip8_emulator::memory::Memory;
use crate::chip8_emulator::quirks::{Chip8Quirks, UnknownOpcodePolicy};
use crate::chip8_emulator::registers::Registers;
use crate::chip8_emulator::stack::Stack;
use crate::chip8_emulator::timers::Timers;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Running,
    /// Suspended on `LD Vx, K`. `pressed` latches the first key to go down
    /// while waiting; the next cycle stores it and resumes.
    AwaitingKey {
        register: usize,
        pressed: Option<u8>,
    },
}

#[derive(Debug, Clone)]
pub struct EmulatorState {
    pub memory: Memory,
    pub registers: Registers,
    pub stack: Stack,
    pub timers: Timers,
    pub display: DisplayBuffer,
    pub keypad: Keypad,
    pub run_state: RunState,
    pub quirks: Chip8Quirks,
    pub unknown_opcode_policy: UnknownOpcodePolicy,
    /// Last opcode that completed.
    pub op: u16,
    pub cycles: u64,
    pub rom_path: Option<PathBuf>,
    pub(crate) rng: StdRng,
}

impl Default for EmulatorState {
    fn default() -> Self {
        Self {
            memory: Memory::default(),
            registers: Registers::default(),
            stack: Stack::default(),
            timers: Timers::default(),
            display: DisplayBuffer::default(),
            keypad: Keypad::default(),
            run_state: RunState::Running,
            quirks: Chip8Quirks::default(),
            unknown_opcode_policy: UnknownOpcodePolicy::default(),
            op: 0,
            cycles: 0,
            rom_path: None,
            rng: StdRng::from_entropy(),
        }
    }
}

pub fn create_state(rom_path: Option<&Path>) -> Result<EmulatorState, Chip8Error> {
    let mut state = EmulatorState::default();
    if let Some(path) = rom_path {
        load_rom(&mut state, path)?;
    }
    Ok(state)
}

/// Back to power-on state. Quirks, policy and the ROM path survive; the ROM
/// is reloaded from disk if one was loaded from a file.
pub fn reset_state(state: &mut EmulatorState) -> Result<(), Chip8Error> {
    state.memory = Memory::default();
    state.registers = Registers::default();
    state.stack = Stack::default();
    state.timers = Timers::default();
    state.keypad.release_all();
    state.run_state = RunState::Running;
    state.op = 0;
    state.cycles = 0;
    clear_display(state);
    debug!("vm reset");

    if let Some(path) = state.rom_path.clone() {
        load_rom(state, &path)?;
    }

    Ok(())
}

pub fn seed_rng(state: &mut EmulatorState, seed: u64) {
    state.rng = StdRng::seed_from_u64(seed);
}

pub fn clear_display(state: &mut EmulatorState) {
    state.display.clear();
}

pub fn load_program(state: &mut EmulatorState, program: &[u8]) -> Result<(), Chip8Error> {
    state.memory.load_program(program)?;
    debug!("loaded {} program bytes at 0x200", program.len());
    Ok(())
}

pub fn load_rom(state: &mut EmulatorState, path: &Path) -> Result<(), Chip8Error> {
    let rom_bytes = fs::read(path)?;
    load_program(state, &rom_bytes)?;
    state.rom_path = Some(path.to_path_buf());
    Ok(())
}

pub fn first_pressed_key(state: &EmulatorState) -> Option<u8> {
    state.keypad.any_key_down()
}

pub fn set_key_state(
    state: &mut EmulatorState,
    key_index: usize,
    is_pressed: bool,
) -> Result<(), Chip8Error> {
    let newly_pressed = state.keypad.set_key(key_index, is_pressed)?;

    if let RunState::AwaitingKey {
        register,
        pressed: None,
    } = state.run_state
    {
        if newly_pressed {
            state.run_state = RunState::AwaitingKey {
                register,
                pressed: Some(key_index as u8),
            };
        }
    }

    Ok(())
}

pub fn is_awaiting_key(state: &EmulatorState) -> bool {
    matches!(state.run_state, RunState::AwaitingKey { .. })
}

pub fn is_sound_active(state: &EmulatorState) -> bool {
    state.timers.is_sound_active()
}

pub fn framebuffer(state: &EmulatorState) -> Framebuffer {
    state.display.snapshot()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chip8_emulator::config::PROGRAM_START;

    #[test]
    fn new_state_is_zeroed_with_pc_at_program_start() {
        let state = create_state(None).unwrap();

        assert_eq!(state.registers.pc(), PROGRAM_START as u16);
        assert_eq!(state.registers.index(), 0);
        assert!(state.stack.is_empty());
        assert_eq!(state.timers.delay(), 0);
        assert_eq!(state.display.lit_count(), 0);
        assert_eq!(state.run_state, RunState::Running);
    }

    #[test]
    fn key_press_is_latched_only_while_awaiting() {
        let mut state = create_state(None).unwrap();
        set_key_state(&mut state, 0x4, true).unwrap();
        assert_eq!(state.run_state, RunState::Running);

        state.run_state = RunState::AwaitingKey {
            register: 2,
            pressed: None,
        };
        // Already held, so no new press.
        set_key_state(&mut state, 0x4, true).unwrap();
        set_key_state(&mut state, 0x9, true).unwrap();
        set_key_state(&mut state, 0xB, true).unwrap();

        assert_eq!(
            state.run_state,
            RunState::AwaitingKey {
                register: 2,
                pressed: Some(0x9)
            }
        );
    }

    #[test]
    fn first_pressed_key_tracks_keypad() {
        let mut state = create_state(None).unwrap();
        assert_eq!(first_pressed_key(&state), None);

        set_key_state(&mut state, 0xE, true).unwrap();
        set_key_state(&mut state, 0x5, true).unwrap();
        assert_eq!(first_pressed_key(&state), Some(0x5));

        set_key_state(&mut state, 0x5, false).unwrap();
        assert_eq!(first_pressed_key(&state), Some(0xE));
    }

    #[test]
    fn invalid_key_is_rejected() {
        let mut state = create_state(None).unwrap();
        assert!(matches!(
            set_key_state(&mut state, 16, true),
            Err(Chip8Error::InvalidKey(16))
        ));
    }

    #[test]
    fn reset_restores_power_on_state() {
        let mut state = create_state(None).unwrap();
        load_program(&mut state, &[0x12, 0x00]).unwrap();
        state.registers.set_pc(0x300);
        state.registers.set_v(3, 9).unwrap();
        state.stack.push(0x202).unwrap();
        state.display.draw_sprite(0, 0, &[0xFF]);

        reset_state(&mut state).unwrap();

        assert_eq!(state.registers.pc(), PROGRAM_START as u16);
        assert_eq!(state.registers.v(3).unwrap(), 0);
        assert!(state.stack.is_empty());
        assert_eq!(state.display.lit_count(), 0);
        assert_eq!(state.memory.read(PROGRAM_START).unwrap(), 0);
    }
}
