//! rp2a03 entry point.
//!
//! Loads a cartridge, runs the CPU for the configured number of instructions
//! and logs one trace line per instruction.
//! Usage: rp2a03 [--cycles N] [--opcodes FILE] [--reset] <path/to/game.nes | ->

use std::fs;
use std::io;
use std::process::ExitCode;

use clap::Parser;
use log::{error, info};

use rp2a03::cpu::opcode::OpcodeTable;
use rp2a03::{
    CPU, Cartridge, LogTracer, MemoryController, Result, config::Config, logger::ConsoleLogger,
};

fn main() -> ExitCode {
    let config = Config::parse();

    if let Err(e) = ConsoleLogger::new(config.log_level).init() {
        eprintln!("failed to install logger: {e}");
    }

    match run(&config) {
        Ok(executed) => {
            info!("powered off after {executed} instruction(s)");
            ExitCode::SUCCESS
        }
        // Already reported by the core loop
        Err(e) if e.is_unknown_operation() => ExitCode::from(1),
        Err(e) => {
            error!("{e}");
            ExitCode::from(2)
        }
    }
}

fn run(config: &Config) -> Result<u64> {
    let cart = if config.reads_stdin() {
        Cartridge::from_reader(io::stdin().lock())?
    } else {
        Cartridge::load(&config.rom)?
    };
    info!(
        "loaded {}: {} PRG bank(s), {} CHR bank(s)",
        config.rom.display(),
        cart.prg_bank_count(),
        cart.chr_bank_count()
    );

    let table = match &config.opcodes {
        Some(path) => OpcodeTable::parse(&fs::read_to_string(path)?)?,
        None => OpcodeTable::builtin()?,
    };

    let mut cpu = CPU::with_table(MemoryController::new(cart), table);
    if config.reset {
        cpu.reset();
    }
    cpu.run(config.cycles, &mut LogTracer)
}
