use std::env;

/// Behaviours that differ between the COSMAC VIP interpreter and later ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chip8Quirks {
    pub shift_uses_vy: bool,
    pub load_store_increment_i: bool,
    pub jump_with_vx: bool,
}

pub const ORIGINAL_QUIRKS: Chip8Quirks = Chip8Quirks {
    shift_uses_vy: true,
    load_store_increment_i: true,
    jump_with_vx: false,
};

pub const MODERN_QUIRKS: Chip8Quirks = Chip8Quirks {
    shift_uses_vy: false,
    load_store_increment_i: false,
    jump_with_vx: true,
};

impl Default for Chip8Quirks {
    fn default() -> Self {
        ORIGINAL_QUIRKS
    }
}

/// What `execute_cycle` does with a word that decodes to no instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownOpcodePolicy {
    /// Return the fault and leave the VM on the offending instruction.
    #[default]
    Halt,
    /// Log the word and continue with the next instruction.
    Skip,
}

pub fn load_quirks_profile(profile: &str) -> Result<Chip8Quirks, String> {
    match profile.trim().to_ascii_lowercase().as_str() {
        "original" => Ok(ORIGINAL_QUIRKS),
        "modern" => Ok(MODERN_QUIRKS),
        other => Err(format!(
            "invalid CHIP8_QUIRKS '{other}', expected one of: modern, original"
        )),
    }
}

pub fn load_quirks_profile_from_env() -> Result<(String, Chip8Quirks), String> {
    let profile = env::var("CHIP8_QUIRKS").unwrap_or_else(|_| "original".to_owned());
    let normalized = profile.trim().to_ascii_lowercase();
    let quirks = load_quirks_profile(&normalized)?;
    Ok((normalized, quirks))
}

pub fn load_unknown_opcode_policy(policy: &str) -> Result<UnknownOpcodePolicy, String> {
    match policy.trim().to_ascii_lowercase().as_str() {
        "halt" => Ok(UnknownOpcodePolicy::Halt),
        "skip" => Ok(UnknownOpcodePolicy::Skip),
        other => Err(format!(
            "invalid CHIP8_UNKNOWN_OPCODE '{other}', expected one of: halt, skip"
        )),
    }
}

pub fn load_unknown_opcode_policy_from_env() -> Result<UnknownOpcodePolicy, String> {
    let policy = env::var("CHIP8_UNKNOWN_OPCODE").unwrap_or_else(|_| "halt".to_owned());
    load_unknown_opcode_policy(&policy)
}
