//! Ricoh 2A03 CPU core: a 6502 without decimal mode.
//!
//! Table-driven: `decode` turns the byte at PC into an (instruction, addressing
//! mode) pair from the opcode table, `execute` applies it. The [`Bus`](crate::bus::Bus)
//! trait is the only way the core reaches memory.

pub mod cpu;
pub mod decode;
pub mod execute;
pub mod flags;
pub mod opcode;
pub mod register;
pub mod trace;

#[cfg(test)]
mod tests;
