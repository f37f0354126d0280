//! Mapper trait: PRG/CHR bank access.

/// Trait for NES cartridge mappers. The memory controller routes all cartridge space through it.
pub trait Mapper {
    /// Read from PRG ROM ($8000–$FFFF). `None` when no bank backs the address.
    fn read(&self, addr: u16) -> Option<u8>;
    /// Read from CHR ROM, `addr` relative to the start of the CHR window ($0000–$1FFF).
    fn read_chr(&self, addr: u16) -> Option<u8>;
    /// Write to mapper registers in PRG space. Returns false when the board ignores the write.
    fn write(&mut self, addr: u16, data: u8) -> bool;
}
