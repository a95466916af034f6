use std::fmt::{Display, Formatter};

use crate::chip8_emulator::quirks::Chip8Quirks;

fn x_register_index(opcode: u16) -> usize {
    ((opcode & 0x0F00) >> 8) as usize
}

fn y_register_index(opcode: u16) -> usize {
    ((opcode & 0x00F0) >> 4) as usize
}

fn address_nnn(opcode: u16) -> u16 {
    opcode & 0x0FFF
}

fn byte_nn(opcode: u16) -> u8 {
    (opcode & 0x00FF) as u8
}

fn nibble_n(opcode: u16) -> u8 {
    (opcode & 0x000F) as u8
}

/// One decoded instruction word. `x`/`y` are register indices, `nn` an
/// immediate byte, `nnn` a 12-bit address, `n` a sprite height.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// 0NNN: machine-code routine on the original hardware; executes as a no-op.
    Sys(u16),
    ClearScreen,
    Return,
    Jump(u16),
    Call(u16),
    SkipEqImmediate { x: usize, nn: u8 },
    SkipNeImmediate { x: usize, nn: u8 },
    SkipEqRegister { x: usize, y: usize },
    SkipNeRegister { x: usize, y: usize },
    LoadImmediate { x: usize, nn: u8 },
    AddImmediate { x: usize, nn: u8 },
    Copy { x: usize, y: usize },
    Or { x: usize, y: usize },
    And { x: usize, y: usize },
    Xor { x: usize, y: usize },
    AddWithCarry { x: usize, y: usize },
    Subtract { x: usize, y: usize },
    ShiftRight { x: usize, y: usize },
    SubtractReversed { x: usize, y: usize },
    ShiftLeft { x: usize, y: usize },
    LoadIndex(u16),
    /// BNNN. `x` only matters when the jump-with-VX quirk is on.
    JumpOffset { x: usize, nnn: u16 },
    Random { x: usize, nn: u8 },
    Draw { x: usize, y: usize, n: u8 },
    SkipKeyPressed { x: usize },
    SkipKeyNotPressed { x: usize },
    WaitKey { x: usize },
    LoadDelay { x: usize },
    SetDelay { x: usize },
    SetSound { x: usize },
    AddIndex { x: usize },
    FontGlyph { x: usize },
    StoreBcd { x: usize },
    StoreRegisters { x: usize },
    LoadRegisters { x: usize },
    Unknown(u16),
}

impl Instruction {
    pub fn decode(opcode: u16) -> Self {
        let x = x_register_index(opcode);
        let y = y_register_index(opcode);
        let n = nibble_n(opcode);
        let nn = byte_nn(opcode);
        let nnn = address_nnn(opcode);

        match opcode & 0xF000 {
            0x0000 => match opcode {
                0x00E0 => Self::ClearScreen,
                0x00EE => Self::Return,
                _ => Self::Sys(nnn),
            },
            0x1000 => Self::Jump(nnn),
            0x2000 => Self::Call(nnn),
            0x3000 => Self::SkipEqImmediate { x, nn },
            0x4000 => Self::SkipNeImmediate { x, nn },
            0x5000 if n == 0 => Self::SkipEqRegister { x, y },
            0x6000 => Self::LoadImmediate { x, nn },
            0x7000 => Self::AddImmediate { x, nn },
            0x8000 => match n {
                0x0 => Self::Copy { x, y },
                0x1 => Self::Or { x, y },
                0x2 => Self::And { x, y },
                0x3 => Self::Xor { x, y },
                0x4 => Self::AddWithCarry { x, y },
                0x5 => Self::Subtract { x, y },
                0x6 => Self::ShiftRight { x, y },
                0x7 => Self::SubtractReversed { x, y },
                0xE => Self::ShiftLeft { x, y },
                _ => Self::Unknown(opcode),
            },
            0x9000 if n == 0 => Self::SkipNeRegister { x, y },
            0xA000 => Self::LoadIndex(nnn),
            0xB000 => Self::JumpOffset { x, nnn },
            0xC000 => Self::Random { x, nn },
            0xD000 => Self::Draw { x, y, n },
            0xE000 => match nn {
                0x9E => Self::SkipKeyPressed { x },
                0xA1 => Self::SkipKeyNotPressed { x },
                _ => Self::Unknown(opcode),
            },
            0xF000 => match nn {
                0x07 => Self::LoadDelay { x },
                0x0A => Self::WaitKey { x },
                0x15 => Self::SetDelay { x },
                0x18 => Self::SetSound { x },
                0x1E => Self::AddIndex { x },
                0x29 => Self::FontGlyph { x },
                0x33 => Self::StoreBcd { x },
                0x55 => Self::StoreRegisters { x },
                0x65 => Self::LoadRegisters { x },
                _ => Self::Unknown(opcode),
            },
            _ => Self::Unknown(opcode),
        }
    }

    /// Mnemonic as executed under `quirks`. Only BNNN reads differently: with
    /// `jump_with_vx` it is `JP VX, XNN`.
    pub fn disassemble(&self, quirks: &Chip8Quirks) -> String {
        match *self {
            Self::JumpOffset { x, nnn } if quirks.jump_with_vx => {
                format!("JP V{x:X}, 0x{nnn:03X}")
            }
            other => other.to_string(),
        }
    }
}

// BNNN always prints as `JP V0, NNN` here; `disassemble` knows the quirk.
impl Display for Instruction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match *self {
            Self::Sys(nnn) => write!(f, "SYS 0x{nnn:03X}"),
            Self::ClearScreen => write!(f, "CLS"),
            Self::Return => write!(f, "RET"),
            Self::Jump(nnn) => write!(f, "JP 0x{nnn:03X}"),
            Self::Call(nnn) => write!(f, "CALL 0x{nnn:03X}"),
            Self::SkipEqImmediate { x, nn } => write!(f, "SE V{x:X}, 0x{nn:02X}"),
            Self::SkipNeImmediate { x, nn } => write!(f, "SNE V{x:X}, 0x{nn:02X}"),
            Self::SkipEqRegister { x, y } => write!(f, "SE V{x:X}, V{y:X}"),
            Self::SkipNeRegister { x, y } => write!(f, "SNE V{x:X}, V{y:X}"),
            Self::LoadImmediate { x, nn } => write!(f, "LD V{x:X}, 0x{nn:02X}"),
            Self::AddImmediate { x, nn } => write!(f, "ADD V{x:X}, 0x{nn:02X}"),
            Self::Copy { x, y } => write!(f, "LD V{x:X}, V{y:X}"),
            Self::Or { x, y } => write!(f, "OR V{x:X}, V{y:X}"),
            Self::And { x, y } => write!(f, "AND V{x:X}, V{y:X}"),
            Self::Xor { x, y } => write!(f, "XOR V{x:X}, V{y:X}"),
            Self::AddWithCarry { x, y } => write!(f, "ADD V{x:X}, V{y:X}"),
            Self::Subtract { x, y } => write!(f, "SUB V{x:X}, V{y:X}"),
            Self::ShiftRight { x, y } => write!(f, "SHR V{x:X}, V{y:X}"),
            Self::SubtractReversed { x, y } => write!(f, "SUBN V{x:X}, V{y:X}"),
            Self::ShiftLeft { x, y } => write!(f, "SHL V{x:X}, V{y:X}"),
            Self::LoadIndex(nnn) => write!(f, "LD I, 0x{nnn:03X}"),
            Self::JumpOffset { nnn, .. } => write!(f, "JP V0, 0x{nnn:03X}"),
            Self::Random { x, nn } => write!(f, "RND V{x:X}, 0x{nn:02X}"),
            Self::Draw { x, y, n } => write!(f, "DRW V{x:X}, V{y:X}, {n}"),
            Self::SkipKeyPressed { x } => write!(f, "SKP V{x:X}"),
            Self::SkipKeyNotPressed { x } => write!(f, "SKNP V{x:X}"),
            Self::WaitKey { x } => write!(f, "LD V{x:X}, K"),
            Self::LoadDelay { x } => write!(f, "LD V{x:X}, DT"),
            Self::SetDelay { x } => write!(f, "LD DT, V{x:X}"),
            Self::SetSound { x } => write!(f, "LD ST, V{x:X}"),
            Self::AddIndex { x } => write!(f, "ADD I, V{x:X}"),
            Self::FontGlyph { x } => write!(f, "LD F, V{x:X}"),
            Self::StoreBcd { x } => write!(f, "LD B, V{x:X}"),
            Self::StoreRegisters { x } => write!(f, "LD [I], V{x:X}"),
            Self::LoadRegisters { x } => write!(f, "LD V{x:X}, [I]"),
            Self::Unknown(opcode) => write!(f, "DW 0x{opcode:04X}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Instruction;
    use crate::chip8_emulator::quirks::{MODERN_QUIRKS, ORIGINAL_QUIRKS};

    #[test]
    fn decodes_operand_fields() {
        assert_eq!(Instruction::decode(0xA22A), Instruction::LoadIndex(0x22A));
        assert_eq!(
            Instruction::decode(0xD015),
            Instruction::Draw { x: 0, y: 1, n: 5 }
        );
        assert_eq!(
            Instruction::decode(0x3CFE),
            Instruction::SkipEqImmediate { x: 0xC, nn: 0xFE }
        );
        assert_eq!(
            Instruction::decode(0xBA10),
            Instruction::JumpOffset { x: 0xA, nnn: 0xA10 }
        );
    }

    #[test]
    fn low_byte_disambiguates_families() {
        assert_eq!(Instruction::decode(0x00E0), Instruction::ClearScreen);
        assert_eq!(Instruction::decode(0x00EE), Instruction::Return);
        assert_eq!(Instruction::decode(0x0000), Instruction::Sys(0x000));
        assert_eq!(
            Instruction::decode(0x812E),
            Instruction::ShiftLeft { x: 1, y: 2 }
        );
        assert_eq!(Instruction::decode(0xE59E), Instruction::SkipKeyPressed { x: 5 });
        assert_eq!(Instruction::decode(0xF30A), Instruction::WaitKey { x: 3 });
        assert_eq!(Instruction::decode(0xF765), Instruction::LoadRegisters { x: 7 });
    }

    #[test]
    fn unmatched_patterns_decode_as_unknown() {
        for opcode in [0x5121, 0x9121, 0x8128, 0x812F, 0xE1FF, 0xF1FF, 0xF100] {
            assert_eq!(Instruction::decode(opcode), Instruction::Unknown(opcode));
        }
    }

    #[test]
    fn disassembles_to_mnemonics() {
        assert_eq!(Instruction::decode(0x6A2A).to_string(), "LD VA, 0x2A");
        assert_eq!(Instruction::decode(0xD125).to_string(), "DRW V1, V2, 5");
        assert_eq!(Instruction::decode(0xF155).to_string(), "LD [I], V1");
        assert_eq!(Instruction::decode(0x1206).to_string(), "JP 0x206");
        assert_eq!(Instruction::decode(0xFFFF).to_string(), "DW 0xFFFF");
    }

    #[test]
    fn jump_offset_names_the_register_its_profile_reads() {
        let instruction = Instruction::decode(0xB123);

        assert_eq!(instruction.to_string(), "JP V0, 0x123");
        assert_eq!(instruction.disassemble(&ORIGINAL_QUIRKS), "JP V0, 0x123");
        assert_eq!(instruction.disassemble(&MODERN_QUIRKS), "JP V1, 0x123");
        assert_eq!(
            Instruction::decode(0x6A2A).disassemble(&MODERN_QUIRKS),
            "LD VA, 0x2A"
        );
    }
}
