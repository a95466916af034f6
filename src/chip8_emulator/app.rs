use std::path::Path;

use log::{error, info};

use crate::chip8_emulator::config::TIMER_HZ;
use crate::chip8_emulator::cpu::{execute_cycle, tick_timers};
use crate::chip8_emulator::error::Chip8Error;
use crate::chip8_emulator::quirks::{Chip8Quirks, UnknownOpcodePolicy};
use crate::chip8_emulator::state::{create_state, seed_rng, EmulatorState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunConfig {
    pub quirks: Chip8Quirks,
    pub unknown_opcode_policy: UnknownOpcodePolicy,
    pub cpu_hz: usize,
    pub seed: Option<u64>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            quirks: Chip8Quirks::default(),
            unknown_opcode_policy: UnknownOpcodePolicy::default(),
            cpu_hz: 700,
            seed: None,
        }
    }
}

fn prepare_state(config: &RunConfig, rom_path: &Path) -> Result<EmulatorState, Chip8Error> {
    if config.cpu_hz == 0 {
        return Err(Chip8Error::InvalidArgument("cpu_hz must be > 0"));
    }

    let mut state = create_state(Some(rom_path))?;
    state.quirks = config.quirks;
    state.unknown_opcode_policy = config.unknown_opcode_policy;
    if let Some(seed) = config.seed {
        seed_rng(&mut state, seed);
    }
    info!("loaded {}", rom_path.display());
    Ok(state)
}

/// Runs `max_cycles` steps with no window, ticking the timers once every
/// `cpu_hz / 60` steps.
pub fn run_emulator_headless(
    config: &RunConfig,
    rom_path: &Path,
    max_cycles: usize,
) -> Result<EmulatorState, Chip8Error> {
    if max_cycles == 0 {
        return Err(Chip8Error::InvalidArgument("max_cycles must be > 0"));
    }

    let mut state = prepare_state(config, rom_path)?;
    let cycles_per_timer_tick = usize::max(1, config.cpu_hz / TIMER_HZ);

    for i in 0..max_cycles {
        if let Err(fault) = execute_cycle(&mut state) {
            error!("halting after {i} cycles: {fault}");
            return Err(fault);
        }

        if ((i + 1) % cycles_per_timer_tick) == 0 {
            tick_timers(&mut state, None);
        }
    }

    Ok(state)
}

#[cfg(feature = "window")]
pub fn run_emulator_app(
    config: &RunConfig,
    rom_path: &Path,
    scale: usize,
    target_fps: usize,
) -> Result<EmulatorState, Chip8Error> {
    use std::time::Instant;

    use raylib::prelude::{Color, KeyboardKey, RaylibDraw};

    use crate::chip8_emulator::config::{SCREEN_HEIGHT, SCREEN_WIDTH};
    use crate::chip8_emulator::state::{framebuffer, is_sound_active, set_key_state};

    if scale == 0 {
        return Err(Chip8Error::InvalidArgument("scale must be > 0"));
    }
    if target_fps == 0 {
        return Err(Chip8Error::InvalidArgument("target_fps must be > 0"));
    }

    let mut state = prepare_state(config, rom_path)?;

    let width = (SCREEN_WIDTH * scale) as i32;
    let height = (SCREEN_HEIGHT * scale) as i32;
    let (mut rl, thread) = raylib::init()
        .size(width, height)
        .title("chip8-vm")
        .build();
    rl.set_target_fps(target_fps as u32);

    let key_map = [
        (KeyboardKey::KEY_ONE, 0x1usize),
        (KeyboardKey::KEY_TWO, 0x2),
        (KeyboardKey::KEY_THREE, 0x3),
        (KeyboardKey::KEY_FOUR, 0xC),
        (KeyboardKey::KEY_Q, 0x4),
        (KeyboardKey::KEY_W, 0x5),
        (KeyboardKey::KEY_E, 0x6),
        (KeyboardKey::KEY_R, 0xD),
        (KeyboardKey::KEY_A, 0x7),
        (KeyboardKey::KEY_S, 0x8),
        (KeyboardKey::KEY_D, 0x9),
        (KeyboardKey::KEY_F, 0xE),
        (KeyboardKey::KEY_Z, 0xA),
        (KeyboardKey::KEY_X, 0x0),
        (KeyboardKey::KEY_C, 0xB),
        (KeyboardKey::KEY_V, 0xF),
    ];

    let cycle_interval = 1.0f32 / config.cpu_hz as f32;
    let timer_interval = 1.0f32 / TIMER_HZ as f32;
    let max_cycles_per_frame = usize::max(1, (config.cpu_hz / target_fps) * 3);
    let mut accumulated_time = 0.0f32;
    let mut timer_accumulated_time = 0.0f32;
    let mut previous_tick = Instant::now();

    while !rl.window_should_close() {
        if rl.is_key_pressed(KeyboardKey::KEY_ESCAPE) {
            break;
        }

        for (key, mapped) in key_map {
            set_key_state(&mut state, mapped, rl.is_key_down(key))?;
        }

        let now = Instant::now();
        let frame_dt = (now - previous_tick).as_secs_f32().min(0.1);
        previous_tick = now;
        accumulated_time += frame_dt;
        timer_accumulated_time += frame_dt;

        let mut cycles_run = 0;
        while accumulated_time >= cycle_interval && cycles_run < max_cycles_per_frame {
            if let Err(fault) = execute_cycle(&mut state) {
                error!("halting: {fault}");
                return Err(fault);
            }
            accumulated_time -= cycle_interval;
            cycles_run += 1;
        }

        // Timers keep running while the VM waits on a key.
        while timer_accumulated_time >= timer_interval {
            tick_timers(&mut state, None);
            timer_accumulated_time -= timer_interval;
        }

        let front_buffer = framebuffer(&state);
        let background = if is_sound_active(&state) {
            Color::DARKGRAY
        } else {
            Color::BLACK
        };

        let mut d = rl.begin_drawing(&thread);
        d.clear_background(background);
        for (index, lit) in front_buffer.iter().enumerate() {
            if !*lit {
                continue;
            }
            let x = (index % SCREEN_WIDTH) as i32;
            let y = (index / SCREEN_WIDTH) as i32;
            d.draw_rectangle(
                x * scale as i32,
                y * scale as i32,
                scale as i32,
                scale as i32,
                Color::WHITE,
            );
        }
    }

    Ok(state)
}
