use std::path::PathBuf;

use clap::Parser;

use chip8_vm::{
    load_quirks_profile, load_quirks_profile_from_env, load_unknown_opcode_policy,
    load_unknown_opcode_policy_from_env, run_emulator_headless, Chip8Error, RunConfig,
};

#[derive(Debug, Parser)]
#[command(name = "chip8-vm")]
#[command(about = "Run a CHIP-8 program")]
struct Args {
    #[arg(long)]
    rom: PathBuf,

    /// Defaults to $CHIP8_QUIRKS, then "original".
    #[arg(long, value_parser = ["original", "modern"])]
    quirks: Option<String>,

    /// Defaults to $CHIP8_UNKNOWN_OPCODE, then "halt".
    #[arg(long, value_parser = ["halt", "skip"])]
    unknown_opcode: Option<String>,

    #[arg(long, default_value_t = 16)]
    scale: usize,

    #[arg(long, default_value_t = 700)]
    hz: usize,

    #[arg(long, default_value_t = 60)]
    fps: usize,

    #[arg(long, default_value_t = 2000)]
    max_cycles: usize,

    #[arg(long)]
    seed: Option<u64>,

    #[arg(long)]
    headless: bool,
}

fn main() -> Result<(), Chip8Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    let quirks = match &args.quirks {
        Some(profile) => load_quirks_profile(profile),
        None => load_quirks_profile_from_env().map(|(_, quirks)| quirks),
    }
    .map_err(|message| {
        log::error!("{message}");
        Chip8Error::InvalidArgument("quirks must be original or modern")
    })?;
    let unknown_opcode_policy = match &args.unknown_opcode {
        Some(policy) => load_unknown_opcode_policy(policy),
        None => load_unknown_opcode_policy_from_env(),
    }
    .map_err(|message| {
        log::error!("{message}");
        Chip8Error::InvalidArgument("unknown-opcode must be halt or skip")
    })?;

    let config = RunConfig {
        quirks,
        unknown_opcode_policy,
        cpu_hz: args.hz,
        seed: args.seed,
    };

    if args.headless {
        let state = run_emulator_headless(&config, &args.rom, args.max_cycles)?;
        print!("{}", state.display);
        println!(
            "headless finished: cycles={} pc=0x{:03x} awaiting_key={}",
            state.cycles,
            state.registers.pc(),
            chip8_vm::is_awaiting_key(&state)
        );
        return Ok(());
    }

    run_windowed(&config, &args)
}

#[cfg(feature = "window")]
fn run_windowed(config: &RunConfig, args: &Args) -> Result<(), Chip8Error> {
    let _state = chip8_vm::run_emulator_app(config, &args.rom, args.scale, args.fps)?;
    Ok(())
}

#[cfg(not(feature = "window"))]
fn run_windowed(_config: &RunConfig, args: &Args) -> Result<(), Chip8Error> {
    log::debug!("window requested at scale {} and {} fps", args.scale, args.fps);
    Err(Chip8Error::InvalidArgument(
        "built without the `window` feature; pass --headless",
    ))
}
