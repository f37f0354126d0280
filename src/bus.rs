//! Memory bus and address decoding for the 2A03 core.
//!
//! CPU view: $0000–$7FFF flat RAM (no mirroring or PPU register aliasing at this layer),
//! $8000–$BFFF PRG slot 0, $C000–$FFFF PRG slot 1.
//! PPU view: $0000–$1FFF VRAM, $2000–$3FFF CHR ROM.

use crate::cartridge::cartridge::Cartridge;
use crate::cartridge::mapper::mapper::Mapper;
use crate::error::{Error, MemorySpace, Result};

pub const RAM_SIZE: usize = 0x8000;
pub const VRAM_SIZE: usize = 0x2000;
/// First byte past the PPU address space.
pub const VIDEO_SPACE_END: u16 = 0x4000;

/// Memory access used by the CPU.
pub trait Bus {
    fn read(&mut self, addr: u16) -> Result<u8>;
    fn write(&mut self, addr: u16, data: u8) -> Result<()>;
}

/// Main bus: RAM, VRAM and the cartridge mapper.
pub struct MemoryController {
    ram: Box<[u8]>,
    vram: Box<[u8]>,
    mapper: Box<dyn Mapper>,
}

impl MemoryController {
    /// Create a new bus; the cartridge banks move into its mapper.
    pub fn new(cart: Cartridge) -> Self {
        Self::with_mapper(cart.into_mapper())
    }

    pub fn with_mapper(mapper: Box<dyn Mapper>) -> Self {
        Self {
            ram: vec![0; RAM_SIZE].into_boxed_slice(),
            vram: vec![0; VRAM_SIZE].into_boxed_slice(),
            mapper,
        }
    }

    /// Every 16-bit offset reaches the CPU space, $FFFF included.
    pub fn is_memory_accessible(&self, _addr: u16) -> bool {
        true
    }

    pub fn is_memory_writable(&self, addr: u16) -> bool {
        (addr as usize) < RAM_SIZE
    }

    pub fn is_video_memory_accessible(&self, addr: u16) -> bool {
        addr < VIDEO_SPACE_END
    }

    pub fn is_video_memory_writable(&self, addr: u16) -> bool {
        (addr as usize) < VRAM_SIZE
    }

    pub fn read_memory(&self, addr: u16) -> Result<u8> {
        if !self.is_memory_accessible(addr) {
            return Err(read_error(addr, MemorySpace::Cpu));
        }
        if self.is_memory_writable(addr) {
            return Ok(self.ram[addr as usize]);
        }
        self.mapper
            .read(addr)
            .ok_or(read_error(addr, MemorySpace::Cpu))
    }

    pub fn write_memory(&mut self, addr: u16, data: u8) -> Result<()> {
        if self.is_memory_accessible(addr) && self.is_memory_writable(addr) {
            self.ram[addr as usize] = data;
            return Ok(());
        }
        // Board registers, if the mapper has any
        if self.mapper.write(addr, data) {
            return Ok(());
        }
        Err(write_error(addr, data, MemorySpace::Cpu))
    }

    pub fn read_video_memory(&self, addr: u16) -> Result<u8> {
        if !self.is_video_memory_accessible(addr) {
            return Err(read_error(addr, MemorySpace::Video));
        }
        if self.is_video_memory_writable(addr) {
            return Ok(self.vram[addr as usize]);
        }
        self.mapper
            .read_chr(addr - VRAM_SIZE as u16)
            .ok_or(read_error(addr, MemorySpace::Video))
    }

    pub fn write_video_memory(&mut self, addr: u16, data: u8) -> Result<()> {
        if self.is_video_memory_accessible(addr) && self.is_video_memory_writable(addr) {
            self.vram[addr as usize] = data;
            Ok(())
        } else {
            Err(write_error(addr, data, MemorySpace::Video))
        }
    }
}

impl Bus for MemoryController {
    fn read(&mut self, addr: u16) -> Result<u8> {
        self.read_memory(addr)
    }

    fn write(&mut self, addr: u16, data: u8) -> Result<()> {
        self.write_memory(addr, data)
    }
}

fn read_error(offset: u16, space: MemorySpace) -> Error {
    Error::ReadOutOfMemory { offset, space }
}

fn write_error(offset: u16, value: u8, space: MemorySpace) -> Error {
    Error::WriteOutOfMemory {
        offset,
        value,
        space,
    }
}
