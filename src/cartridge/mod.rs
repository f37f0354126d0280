//! NES cartridge loading and mapper support.
//!
//! - **cartridge**: Loads iNES (.nes) images, holds the trailer and the PRG/CHR banks.
//! - **mapper**: NROM (0); resolves CPU PRG and PPU CHR addresses to bank bytes.

pub mod cartridge;
pub mod mapper;
