pub mod chip8_emulator;

#[cfg(feature = "window")]
pub use chip8_emulator::app::run_emulator_app;
pub use chip8_emulator::app::{run_emulator_headless, RunConfig};
pub use chip8_emulator::config::{
    FONT_BASE, FONT_BYTES, MEMORY_SIZE, PROGRAM_START, SCREEN_HEIGHT, SCREEN_WIDTH,
};
pub use chip8_emulator::cpu::{execute_cycle, execute_opcode, skip_instruction, tick_timers};
pub use chip8_emulator::display::{DisplayBuffer, Framebuffer};
pub use chip8_emulator::error::Chip8Error;
pub use chip8_emulator::instruction::Instruction;
pub use chip8_emulator::quirks::{
    load_quirks_profile, load_quirks_profile_from_env, load_unknown_opcode_policy,
    load_unknown_opcode_policy_from_env, Chip8Quirks, UnknownOpcodePolicy, MODERN_QUIRKS,
    ORIGINAL_QUIRKS,
};
pub use chip8_emulator::state::{
    clear_display, create_state, first_pressed_key, framebuffer, is_awaiting_key,
    is_sound_active, load_program, load_rom, reset_state, seed_rng, set_key_state,
    EmulatorState, RunState,
};
