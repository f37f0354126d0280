//! Error type shared by the cartridge loader, the memory controller and the CPU.

use std::fmt;
use std::io;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Address space an access was aimed at. Only used to tag memory errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemorySpace {
    /// CPU address space ($0000–$FFFF).
    Cpu,
    /// PPU address space ($0000–$3FFF).
    Video,
}

impl fmt::Display for MemorySpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemorySpace::Cpu => f.write_str("Memory"),
            MemorySpace::Video => f.write_str("Video Memory"),
        }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    /// The stream does not start with the iNES magic `NES\x1A`.
    #[error("unknown ROM format: missing iNES magic")]
    UnknownRomFormat,

    #[error("incorrect offset ${offset:04X} accessing {space} during a read")]
    ReadOutOfMemory { offset: u16, space: MemorySpace },

    #[error("value ${value:02X} written at incorrect offset ${offset:04X} accessing {space}")]
    WriteOutOfMemory {
        offset: u16,
        value: u8,
        space: MemorySpace,
    },

    /// No opcode mapping, or no implementation for an (instruction, mode) pair.
    #[error("unknown operation: {0}")]
    UnknownOperation(String),

    /// The executor was asked to run before anything was fetched.
    #[error("no instruction has been decoded yet")]
    NotInitialised,

    /// Kept for callers that want to flag a write to a region known to be ROM.
    /// The memory controller itself reports those as `WriteOutOfMemory`.
    #[error("offset ${offset:04X} is read-only")]
    ReadOnly { offset: u16 },

    #[error("{width}-bit register overflow: ${value:04X} + {by}")]
    RegisterOverflow { width: u8, value: u16, by: u16 },

    #[error("{width}-bit register underflow: ${value:04X} - {by}")]
    RegisterUnderflow { width: u8, value: u16, by: u16 },

    #[error("opcode table line {line}: {reason}")]
    OpcodeTable { line: usize, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// True for the decode/execute failures that abort a run.
    pub fn is_unknown_operation(&self) -> bool {
        matches!(self, Error::UnknownOperation(_))
    }
}
