//! NES cartridge loading from iNES format (.nes files).
//!
//! Implements the [iNES](https://www.nesdev.org/wiki/INES) container: magic "NES\x1A", then a
//! 12-byte trailer (byte 0 = PRG size in 16 KiB units, byte 1 = CHR size in 8 KiB units, the rest
//! flags/mapper, carried but not interpreted), then PRG ROM banks, then CHR ROM banks.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use log::debug;

use crate::cartridge::mapper::mapper::Mapper;
use crate::cartridge::mapper::mapper0::Mapper0;
use crate::error::{Error, Result};

pub const INES_MAGIC: [u8; 4] = *b"NES\x1A";
pub const TRAILER_SIZE: usize = 12;
pub const PRG_BANK_SIZE: usize = 16 * 1024;
pub const CHR_BANK_SIZE: usize = 8 * 1024;

/// Raw PRG ROM / CHR ROM bank contents.
pub type Bank = Box<[u8]>;

/// Cartridge: the iNES trailer plus the PRG and CHR banks, in file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cartridge {
    trailer: [u8; TRAILER_SIZE],
    prg_banks: Vec<Bank>,
    chr_banks: Vec<Bank>,
}

impl Cartridge {
    /// Load cartridge from an iNES file. The file is closed before returning.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::from_reader(data)
    }

    /// Parse an iNES image. The reader is consumed; any short read is an I/O error.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut magic = [0u8; 4];
        reader.read_exact(&mut magic)?;
        if magic != INES_MAGIC {
            return Err(Error::UnknownRomFormat);
        }

        let mut trailer = [0u8; TRAILER_SIZE];
        reader.read_exact(&mut trailer)?;

        let prg_count = trailer[0] as usize;
        let chr_count = trailer[1] as usize;

        let prg_banks = read_banks(&mut reader, prg_count, PRG_BANK_SIZE)?;
        let chr_banks = read_banks(&mut reader, chr_count, CHR_BANK_SIZE)?;

        debug!(
            "cartridge: {} PRG bank(s), {} CHR bank(s), mapper {}",
            prg_count,
            chr_count,
            mapper_id(&trailer)
        );

        Ok(Self {
            trailer,
            prg_banks,
            chr_banks,
        })
    }

    /// The 12 bytes following the magic.
    pub fn trailer(&self) -> &[u8; TRAILER_SIZE] {
        &self.trailer
    }

    pub fn prg_bank_count(&self) -> usize {
        self.prg_banks.len()
    }

    pub fn chr_bank_count(&self) -> usize {
        self.chr_banks.len()
    }

    pub fn prg_banks(&self) -> &[Bank] {
        &self.prg_banks
    }

    pub fn chr_banks(&self) -> &[Bank] {
        &self.chr_banks
    }

    /// PRG bank visible in CPU slot 0 ($8000) or 1 ($C000). A single bank fills both slots.
    pub fn prg_slot(&self, slot: usize) -> Option<&[u8]> {
        match (slot, self.prg_banks.len()) {
            (0, _) => self.prg_banks.first().map(|b| &b[..]),
            (1, 1) => self.prg_banks.first().map(|b| &b[..]),
            (1, _) => self.prg_banks.get(1).map(|b| &b[..]),
            _ => None,
        }
    }

    /// Mapper number from flags 6 / 7 (high nibbles). Informational only.
    pub fn mapper_id(&self) -> u8 {
        mapper_id(&self.trailer)
    }

    /// Serialise back to an iNES image, banks in their original order.
    pub fn to_bytes(&self) -> Vec<u8> {
        let size = 4
            + TRAILER_SIZE
            + self.prg_banks.len() * PRG_BANK_SIZE
            + self.chr_banks.len() * CHR_BANK_SIZE;
        let mut out = Vec::with_capacity(size);
        out.extend_from_slice(&INES_MAGIC);
        out.extend_from_slice(&self.trailer);
        for bank in self.prg_banks.iter().chain(&self.chr_banks) {
            out.extend_from_slice(bank);
        }
        out
    }

    /// Hand the banks over to the mapper that serves them on the bus.
    pub fn into_mapper(self) -> Box<dyn Mapper> {
        Box::new(Mapper0::new(self.prg_banks, self.chr_banks))
    }
}

fn read_banks<R: Read>(reader: &mut R, count: usize, size: usize) -> Result<Vec<Bank>> {
    let mut banks = Vec::with_capacity(count);
    for _ in 0..count {
        let mut bank = vec![0u8; size].into_boxed_slice();
        reader.read_exact(&mut bank)?;
        banks.push(bank);
    }
    Ok(banks)
}

fn mapper_id(trailer: &[u8; TRAILER_SIZE]) -> u8 {
    // trailer[2] is header byte 6, trailer[3] is header byte 7.
    (trailer[2] >> 4) | (trailer[3] & 0xF0)
}
