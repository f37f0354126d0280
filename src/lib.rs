//! rp2a03: a Ricoh 2A03 (NES CPU) core written in Rust.
//!
//! Executes official 6502 instructions (no decimal mode) from an
//! [iNES](https://www.nesdev.org/wiki/INES) cartridge for a bounded number of steps.
//!
//! ## Modules (NESdev references)
//!
//! - **bus** – [CPU memory map](https://www.nesdev.org/wiki/CPU_memory_map): 32 KiB RAM,
//!   PRG ROM at $8000–$FFFF, plus the PPU side (VRAM, CHR ROM)
//! - **cartridge** – [iNES](https://www.nesdev.org/wiki/INES) loading; [NROM](https://www.nesdev.org/wiki/NROM) mapper (0)
//! - **cpu** – [6502](https://www.nesdev.org/wiki/CPU) / 2A03: table-driven decode, official opcodes, soft reset
//! - **config**, **logger** – command line and console output for the binary
//! - **error** – the crate-wide error type

use std::io::Read;

pub mod bus;
pub mod cartridge;
pub mod config;
pub mod cpu;
pub mod error;
pub mod logger;

pub use bus::{Bus, MemoryController};
pub use cartridge::cartridge::Cartridge;
pub use cpu::cpu::{CPU, PowerState};
pub use cpu::trace::{LogTracer, NullTracer, TraceLine, Tracer};
pub use error::{Error, Result};

/// Load an iNES image from `reader` and run up to `budget` instructions from $C000.
///
/// The reader is consumed and dropped before execution starts.
pub fn emulate<R: Read>(
    reader: R,
    budget: u64,
    tracer: &mut impl Tracer,
) -> Result<CPU<MemoryController>> {
    let cart = Cartridge::from_reader(reader)?;
    let mut cpu = CPU::new(MemoryController::new(cart))?;
    cpu.run(budget, tracer)?;
    Ok(cpu)
}
