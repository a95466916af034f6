use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum Chip8Error {
    Io(std::io::Error),
    ProgramTooLarge { size: usize, max: usize },
    AddressOutOfRange(usize),
    InvalidRegister(usize),
    InvalidKey(usize),
    StackOverflow,
    StackUnderflow,
    UnknownOpcode(u16),
    InvalidArgument(&'static str),
    /// A runtime error raised while executing the instruction at `pc`.
    Fault {
        opcode: u16,
        pc: u16,
        cause: Box<Chip8Error>,
    },
}

impl Chip8Error {
    pub(crate) fn at(self, opcode: u16, pc: u16) -> Self {
        Self::Fault {
            opcode,
            pc,
            cause: Box::new(self),
        }
    }

    /// The underlying error with any `Fault` context removed.
    pub fn cause(&self) -> &Chip8Error {
        match self {
            Self::Fault { cause, .. } => cause.cause(),
            other => other,
        }
    }
}

impl Display for Chip8Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(error) => write!(f, "io error: {error}"),
            Self::ProgramTooLarge { size, max } => {
                write!(f, "program too large: {size} bytes (max {max})")
            }
            Self::AddressOutOfRange(address) => {
                write!(f, "memory access out of range: 0x{address:04x}")
            }
            Self::InvalidRegister(index) => write!(f, "invalid register index: {index}"),
            Self::InvalidKey(key) => write!(f, "invalid key index: {key}"),
            Self::StackOverflow => write!(f, "call stack overflow"),
            Self::StackUnderflow => write!(f, "return instruction with empty stack"),
            Self::UnknownOpcode(opcode) => write!(f, "unknown opcode: 0x{opcode:04x}"),
            Self::InvalidArgument(argument) => write!(f, "invalid argument: {argument}"),
            Self::Fault { opcode, pc, cause } => {
                write!(f, "fault at pc 0x{pc:03x} (opcode 0x{opcode:04x}): {cause}")
            }
        }
    }
}

impl std::error::Error for Chip8Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(error) => Some(error),
            Self::Fault { cause, .. } => Some(cause.as_ref()),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Chip8Error {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}
