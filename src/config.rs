//! Command-line configuration for the `rp2a03` binary.

use std::path::PathBuf;

use clap::Parser;
use log::LevelFilter;

/// Run a Ricoh 2A03 program from an iNES cartridge and trace every instruction
#[derive(Parser, Debug)]
#[command(name = "rp2a03", version)]
#[command(about = "Ricoh 2A03 (NES CPU) core", long_about = None)]
pub struct Config {
    /// Path to the iNES ROM file, or `-` for stdin
    pub rom: PathBuf,

    /// Number of instructions to execute before powering off
    #[arg(short, long, default_value_t = 50)]
    pub cycles: u64,

    /// Opcode table to use instead of the built-in one
    #[arg(long, value_name = "FILE")]
    pub opcodes: Option<PathBuf>,

    /// Start from the reset vector instead of $C000
    #[arg(long)]
    pub reset: bool,

    /// Most verbose level printed (off, error, warn, info, debug, trace)
    #[arg(long, default_value_t = LevelFilter::Info)]
    pub log_level: LevelFilter,
}

impl Config {
    pub fn reads_stdin(&self) -> bool {
        self.rom.as_os_str() == "-"
    }
}
