use log::{trace, warn};
use rand::Rng;

use crate::chip8_emulator::config::{ADDRESS_MASK, FONT_BASE, FONT_GLYPH_HEIGHT};
use crate::chip8_emulator::error::Chip8Error;
use crate::chip8_emulator::instruction::Instruction;
use crate::chip8_emulator::memory::Memory;
use crate::chip8_emulator::quirks::UnknownOpcodePolicy;
use crate::chip8_emulator::state::{clear_display, EmulatorState, RunState};

/// How the program counter moves once an instruction has committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Next,
    Skip,
    Jump(u16),
    Wait,
}

fn skip_if(condition: bool) -> Flow {
    if condition {
        Flow::Skip
    } else {
        Flow::Next
    }
}

fn fetch_opcode(memory: &Memory, pc: u16) -> Result<u16, Chip8Error> {
    let bytes = memory.read_range(pc as usize, 2)?;
    Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
}

/// Runs one fetch-decode-execute step. Timers are not touched.
///
/// While the VM waits on `LD Vx, K` this makes no progress until a key press
/// has been latched through `set_key_state`. On error the state is exactly
/// what it was before the failing instruction.
pub fn execute_cycle(state: &mut EmulatorState) -> Result<(), Chip8Error> {
    if let RunState::AwaitingKey { register, pressed } = state.run_state {
        return resume_after_key(state, register, pressed);
    }

    let pc = state.registers.pc();
    // Opcode is reported as zero when the word itself could not be fetched.
    let opcode = fetch_opcode(&state.memory, pc).map_err(|error| error.at(0, pc))?;

    execute_opcode(state, opcode)
}

/// Executes `opcode` as if it had been fetched from the current PC.
pub fn execute_opcode(state: &mut EmulatorState, opcode: u16) -> Result<(), Chip8Error> {
    let pc = state.registers.pc();
    let instruction = Instruction::decode(opcode);
    trace!(
        "0x{pc:03x}: {opcode:04x}  {}",
        instruction.disassemble(&state.quirks)
    );

    match execute_instruction(state, instruction) {
        Ok(flow) => {
            apply_flow(state, flow);
        }
        Err(Chip8Error::UnknownOpcode(word))
            if state.unknown_opcode_policy == UnknownOpcodePolicy::Skip =>
        {
            warn!("skipping unknown opcode 0x{word:04x} at 0x{pc:03x}");
            state.registers.advance_pc(2);
        }
        Err(error) => return Err(error.at(opcode, pc)),
    }

    state.op = opcode;
    state.cycles += 1;
    Ok(())
}

/// Moves past the instruction at PC without executing it, for hosts that
/// choose to continue after a fault.
pub fn skip_instruction(state: &mut EmulatorState) {
    state.registers.advance_pc(2);
    state.run_state = RunState::Running;
}

pub fn tick_timers(state: &mut EmulatorState, mut sound_callback: Option<&mut dyn FnMut()>) {
    let sounding = state.timers.is_sound_active();
    state.timers.tick();

    if sounding {
        if let Some(callback) = sound_callback.as_mut() {
            callback();
        }
    }
}

fn resume_after_key(
    state: &mut EmulatorState,
    register: usize,
    pressed: Option<u8>,
) -> Result<(), Chip8Error> {
    let Some(key) = pressed else {
        return Ok(());
    };

    let pc = state.registers.pc();
    state
        .registers
        .set_v(register, key)
        .map_err(|error| error.at(state.op, pc))?;
    state.run_state = RunState::Running;
    state.registers.advance_pc(2);
    state.cycles += 1;
    Ok(())
}

fn apply_flow(state: &mut EmulatorState, flow: Flow) {
    match flow {
        Flow::Next => state.registers.advance_pc(2),
        Flow::Skip => state.registers.advance_pc(4),
        Flow::Jump(address) => state.registers.set_pc(address),
        Flow::Wait => {}
    }
}

fn execute_instruction(
    state: &mut EmulatorState,
    instruction: Instruction,
) -> Result<Flow, Chip8Error> {
    let quirks = state.quirks;
    let registers = &mut state.registers;

    match instruction {
        Instruction::Sys(_) => Ok(Flow::Next),
        Instruction::ClearScreen => {
            clear_display(state);
            Ok(Flow::Next)
        }
        Instruction::Return => {
            let ret = state.stack.pop()?;
            Ok(Flow::Jump(ret))
        }
        Instruction::Jump(nnn) => Ok(Flow::Jump(nnn)),
        Instruction::Call(nnn) => {
            let ret = registers.pc().wrapping_add(2) & ADDRESS_MASK;
            state.stack.push(ret)?;
            Ok(Flow::Jump(nnn))
        }
        Instruction::SkipEqImmediate { x, nn } => Ok(skip_if(registers.v(x)? == nn)),
        Instruction::SkipNeImmediate { x, nn } => Ok(skip_if(registers.v(x)? != nn)),
        Instruction::SkipEqRegister { x, y } => Ok(skip_if(registers.v(x)? == registers.v(y)?)),
        Instruction::SkipNeRegister { x, y } => Ok(skip_if(registers.v(x)? != registers.v(y)?)),
        Instruction::LoadImmediate { x, nn } => {
            registers.set_v(x, nn)?;
            Ok(Flow::Next)
        }
        Instruction::AddImmediate { x, nn } => {
            let value = registers.v(x)?.wrapping_add(nn);
            registers.set_v(x, value)?;
            Ok(Flow::Next)
        }
        Instruction::Copy { x, y } => {
            let value = registers.v(y)?;
            registers.set_v(x, value)?;
            Ok(Flow::Next)
        }
        Instruction::Or { x, y } => {
            let value = registers.v(x)? | registers.v(y)?;
            registers.set_v(x, value)?;
            Ok(Flow::Next)
        }
        Instruction::And { x, y } => {
            let value = registers.v(x)? & registers.v(y)?;
            registers.set_v(x, value)?;
            Ok(Flow::Next)
        }
        Instruction::Xor { x, y } => {
            let value = registers.v(x)? ^ registers.v(y)?;
            registers.set_v(x, value)?;
            Ok(Flow::Next)
        }
        Instruction::AddWithCarry { x, y } => {
            let sum = u16::from(registers.v(x)?) + u16::from(registers.v(y)?);
            registers.set_with_flag(x, sum as u8, sum > 0xFF)?;
            Ok(Flow::Next)
        }
        Instruction::Subtract { x, y } => {
            let difference = i16::from(registers.v(x)?) - i16::from(registers.v(y)?);
            registers.set_with_flag(x, difference as u8, difference >= 0)?;
            Ok(Flow::Next)
        }
        Instruction::SubtractReversed { x, y } => {
            let difference = i16::from(registers.v(y)?) - i16::from(registers.v(x)?);
            registers.set_with_flag(x, difference as u8, difference >= 0)?;
            Ok(Flow::Next)
        }
        Instruction::ShiftRight { x, y } => {
            let source = if quirks.shift_uses_vy { y } else { x };
            let value = registers.v(source)?;
            registers.set_with_flag(x, value >> 1, value & 0x1 == 1)?;
            Ok(Flow::Next)
        }
        Instruction::ShiftLeft { x, y } => {
            let source = if quirks.shift_uses_vy { y } else { x };
            let shifted = u16::from(registers.v(source)?) << 1;
            registers.set_with_flag(x, shifted as u8, shifted > 0xFF)?;
            Ok(Flow::Next)
        }
        Instruction::LoadIndex(nnn) => {
            registers.set_index(nnn);
            Ok(Flow::Next)
        }
        Instruction::JumpOffset { x, nnn } => {
            let jump_register = if quirks.jump_with_vx { x } else { 0 };
            let target = nnn + u16::from(registers.v(jump_register)?);
            Ok(Flow::Jump(target))
        }
        Instruction::Random { x, nn } => {
            let byte: u8 = state.rng.gen();
            registers.set_v(x, byte & nn)?;
            Ok(Flow::Next)
        }
        Instruction::Draw { x, y, n } => {
            let x_start = registers.v(x)? as usize;
            let y_start = registers.v(y)? as usize;
            let sprite = state
                .memory
                .read_range(registers.index() as usize, n as usize)?;

            let collided = state.display.draw_sprite(x_start, y_start, sprite);
            registers.set_flag(collided);
            Ok(Flow::Next)
        }
        Instruction::SkipKeyPressed { x } => {
            let key = (registers.v(x)? & 0x0F) as usize;
            Ok(skip_if(state.keypad.is_key_down(key)?))
        }
        Instruction::SkipKeyNotPressed { x } => {
            let key = (registers.v(x)? & 0x0F) as usize;
            Ok(skip_if(!state.keypad.is_key_down(key)?))
        }
        Instruction::WaitKey { x } => {
            registers.v(x)?;
            state.run_state = RunState::AwaitingKey {
                register: x,
                pressed: None,
            };
            Ok(Flow::Wait)
        }
        Instruction::LoadDelay { x } => {
            registers.set_v(x, state.timers.delay())?;
            Ok(Flow::Next)
        }
        Instruction::SetDelay { x } => {
            state.timers.set_delay(registers.v(x)?);
            Ok(Flow::Next)
        }
        Instruction::SetSound { x } => {
            state.timers.set_sound(registers.v(x)?);
            Ok(Flow::Next)
        }
        Instruction::AddIndex { x } => {
            let index = registers.index() + u16::from(registers.v(x)?);
            registers.set_index(index);
            Ok(Flow::Next)
        }
        Instruction::FontGlyph { x } => {
            let digit = (registers.v(x)? & 0x0F) as usize;
            registers.set_index((FONT_BASE + digit * FONT_GLYPH_HEIGHT) as u16);
            Ok(Flow::Next)
        }
        Instruction::StoreBcd { x } => {
            let value = registers.v(x)?;
            let digits = [value / 100, (value % 100) / 10, value % 10];
            state
                .memory
                .write_range(registers.index() as usize, &digits)?;
            Ok(Flow::Next)
        }
        Instruction::StoreRegisters { x } => {
            let values = registers
                .all()
                .get(..=x)
                .ok_or(Chip8Error::InvalidRegister(x))?;
            state
                .memory
                .write_range(registers.index() as usize, values)?;
            if quirks.load_store_increment_i {
                registers.set_index(registers.index() + x as u16 + 1);
            }
            Ok(Flow::Next)
        }
        Instruction::LoadRegisters { x } => {
            registers.v(x)?;
            let values = state
                .memory
                .read_range(registers.index() as usize, x + 1)?;
            for (register, value) in values.iter().enumerate() {
                registers.set_v(register, *value)?;
            }
            if quirks.load_store_increment_i {
                registers.set_index(registers.index() + x as u16 + 1);
            }
            Ok(Flow::Next)
        }
        Instruction::Unknown(opcode) => Err(Chip8Error::UnknownOpcode(opcode)),
    }
}
