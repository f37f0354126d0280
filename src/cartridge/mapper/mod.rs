//! NES mappers for PRG/CHR memory mapping.
//!
//! Mapper0 (NROM) and the trait other boards would implement.

pub mod mapper;

pub mod mapper0;
