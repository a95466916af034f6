use chip8_vm::{
    create_state, execute_cycle, execute_opcode, reset_state, run_emulator_headless, Chip8Error,
    RunConfig, RunState, UnknownOpcodePolicy, PROGRAM_START,
};

fn rom_file(bytes: &[u8]) -> tempfile::NamedTempFile {
    let tmp = tempfile::NamedTempFile::new().unwrap();
    std::fs::write(tmp.path(), bytes).unwrap();
    tmp
}

#[test]
fn headless_draws_font_glyph() {
    // LD V0, 0x0A; LD F, V0; DRW V0, V0, 5 at (10, 10); JP self
    let rom = rom_file(&[0x60, 0x0A, 0xF0, 0x29, 0xD0, 0x05, 0x12, 0x06]);

    let state = run_emulator_headless(&RunConfig::default(), rom.path(), 64).unwrap();

    assert!(state.display.lit_count() > 0);
    assert!(state.display.is_set(10, 10));
    assert_eq!(state.registers.pc(), 0x206);
}

#[test]
fn headless_ticks_timers_at_sixty_hertz() {
    // LD V0, 0xFF; LD DT, V0; JP self
    let rom = rom_file(&[0x60, 0xFF, 0xF0, 0x15, 0x12, 0x04]);
    let config = RunConfig {
        cpu_hz: 600,
        ..RunConfig::default()
    };

    let state = run_emulator_headless(&config, rom.path(), 100).unwrap();

    // 100 cycles at 10 cycles per tick; the first tick lands after DT is set.
    assert_eq!(state.timers.delay(), 0xFF - 10);
}

#[test]
fn headless_stops_on_fault() {
    let rom = rom_file(&[0x00, 0xEE]);

    let result = run_emulator_headless(&RunConfig::default(), rom.path(), 10);

    assert!(matches!(
        result.map(|_| ()).unwrap_err().cause(),
        Chip8Error::StackUnderflow
    ));
}

#[test]
fn headless_skip_policy_runs_past_unknown_words() {
    let rom = rom_file(&[0xFF, 0xFF, 0x61, 0x2A, 0x12, 0x04]);
    let config = RunConfig {
        unknown_opcode_policy: UnknownOpcodePolicy::Skip,
        ..RunConfig::default()
    };

    let state = run_emulator_headless(&config, rom.path(), 8).unwrap();

    assert_eq!(state.registers.v(1).unwrap(), 0x2A);
}

#[test]
fn oversized_rom_is_rejected_before_running() {
    let rom = rom_file(&vec![0x00; 4096 - 0x200 + 1]);

    let result = run_emulator_headless(&RunConfig::default(), rom.path(), 10);

    assert!(matches!(
        result.map(|_| ()).unwrap_err(),
        Chip8Error::ProgramTooLarge { size: 3585, max: 3584 }
    ));
}

#[test]
fn missing_rom_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();

    let result = run_emulator_headless(&RunConfig::default(), &dir.path().join("none.ch8"), 10);

    assert!(matches!(result.map(|_| ()).unwrap_err(), Chip8Error::Io(_)));
}

#[test]
fn zero_arguments_are_rejected() {
    let rom = rom_file(&[0x12, 0x00]);
    let config = RunConfig {
        cpu_hz: 0,
        ..RunConfig::default()
    };

    assert!(matches!(
        run_emulator_headless(&RunConfig::default(), rom.path(), 0).map(|_| ()),
        Err(Chip8Error::InvalidArgument(_))
    ));
    assert!(matches!(
        run_emulator_headless(&config, rom.path(), 10).map(|_| ()),
        Err(Chip8Error::InvalidArgument(_))
    ));
}

#[test]
fn reset_reloads_rom_from_disk_and_leaves_key_wait() {
    // LD V1, 0x2A; LD V2, K
    let rom = rom_file(&[0x61, 0x2A, 0xF2, 0x0A]);
    let mut state = create_state(Some(rom.path())).unwrap();
    execute_cycle(&mut state).unwrap();
    execute_cycle(&mut state).unwrap();
    assert!(matches!(state.run_state, RunState::AwaitingKey { register: 2, .. }));
    state.memory.write(PROGRAM_START, 0xFF).unwrap();
    execute_opcode(&mut state, 0x6100).unwrap();

    reset_state(&mut state).unwrap();

    assert_eq!(state.run_state, RunState::Running);
    assert_eq!(state.registers.pc(), PROGRAM_START as u16);
    assert_eq!(
        state.memory.read_range(PROGRAM_START, 4).unwrap(),
        &[0x61, 0x2A, 0xF2, 0x0A]
    );
    assert_eq!(state.registers.v(1).unwrap(), 0);

    execute_cycle(&mut state).unwrap();
    assert_eq!(state.registers.v(1).unwrap(), 0x2A);
}
