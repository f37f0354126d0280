//! Per-instruction diagnostic lines.

use std::fmt;

use log::info;

use crate::cpu::opcode::OperationCode;

/// CPU state captured between fetch and execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceLine {
    /// Address the opcode was read from.
    pub pc: u16,
    pub op: OperationCode,
    pub operand: u16,
    pub a: u8,
    pub x: u8,
    pub y: u8,
}

/// `C000 0xA2 42 A:00 X:00 Y:00`
impl fmt::Display for TraceLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04X} {}", self.pc, self.op)?;
        match self.op.mode.operand_size() {
            0 => {}
            1 => write!(f, " {:02X}", self.operand)?,
            _ => write!(f, " {:04X}", self.operand)?,
        }
        write!(f, " A:{:02X} X:{:02X} Y:{:02X}", self.a, self.x, self.y)
    }
}

/// Receives one line per executed instruction.
pub trait Tracer {
    fn trace(&mut self, line: &TraceLine);
}

/// Forwards trace lines to the `log` facade at info level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogTracer;

impl Tracer for LogTracer {
    fn trace(&mut self, line: &TraceLine) {
        info!("{line}");
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NullTracer;

impl Tracer for NullTracer {
    fn trace(&mut self, _line: &TraceLine) {}
}

impl Tracer for Vec<TraceLine> {
    fn trace(&mut self, line: &TraceLine) {
        self.push(*line);
    }
}
