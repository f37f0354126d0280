//! Mapper 0 (NROM): no bank switching, 16/32KB PRG, 8KB CHR.

use crate::cartridge::cartridge::{Bank, PRG_BANK_SIZE};
use crate::cartridge::mapper::mapper::Mapper;

/// NROM mapper: fixed PRG and CHR, 16KB PRG mirrored into both slots.
pub struct Mapper0 {
    prg_banks: Vec<Bank>,
    chr_banks: Vec<Bank>,
}

impl Mapper0 {
    /// Create Mapper0 with the PRG and CHR banks from the cartridge.
    pub fn new(prg_banks: Vec<Bank>, chr_banks: Vec<Bank>) -> Self {
        Self {
            prg_banks,
            chr_banks,
        }
    }

    fn prg_bank(&self, slot: usize) -> Option<&Bank> {
        if self.prg_banks.len() == 1 {
            self.prg_banks.first()
        } else {
            self.prg_banks.get(slot)
        }
    }
}

impl Mapper for Mapper0 {
    fn read(&self, addr: u16) -> Option<u8> {
        match addr {
            // PRG ROM: $8000-$BFFF slot 0, $C000-$FFFF slot 1
            0x8000..=0xFFFF => {
                let offset = (addr - 0x8000) as usize;
                let bank = self.prg_bank(offset / PRG_BANK_SIZE)?;
                bank.get(offset % PRG_BANK_SIZE).copied()
            }
            _ => None,
        }
    }

    fn read_chr(&self, addr: u16) -> Option<u8> {
        // One 8KB bank visible; further banks need a switching board
        self.chr_banks
            .first()
            .and_then(|bank| bank.get(addr as usize).copied())
    }

    fn write(&mut self, _addr: u16, _data: u8) -> bool {
        // PRG ROM: no writes, no registers
        false
    }
}
