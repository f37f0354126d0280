use log::{debug, error};

use crate::{
    bus::Bus,
    cpu::{
        decode::Fetched,
        flags::Status,
        opcode::OpcodeTable,
        register::Register,
        trace::{TraceLine, Tracer},
    },
    error::Result,
};

/// PC on entry to [`CPU::run`]; the NROM start address used by CPU test ROMs.
pub const ENTRY_POINT: u16 = 0xC000;
pub const STACK_PAGE: u16 = 0x0100;
/// SP on entry to [`CPU::run`], as a full address.
pub const STACK_TOP: u16 = 0x01FF;
pub const RESET_VECTOR: u16 = 0xFFFC;
pub const IRQ_VECTOR: u16 = 0xFFFE;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerState {
    Off,
    Running,
    /// The next fetch jumps through the reset vector.
    ResetPending,
}

pub struct CPU<B: Bus> {
    pub a: Register,
    pub x: Register,
    pub y: Register,
    pub sp: Register,
    pub pc: Register,
    pub status: Status,
    pub bus: B,
    pub(super) table: OpcodeTable,
    pub(super) state: PowerState,
    pub(super) current: Option<Fetched>,
    pub(super) last_instruction_offset: u16,
}

impl<B: Bus> CPU<B> {
    /// CPU with zeroed registers and the built-in opcode table.
    pub fn new(bus: B) -> Result<Self> {
        Ok(Self::with_table(bus, OpcodeTable::builtin()?))
    }

    pub fn with_table(bus: B, table: OpcodeTable) -> Self {
        Self {
            a: Register::new8(),
            x: Register::new8(),
            y: Register::new8(),
            sp: Register::new8(),
            pc: Register::new16(),
            status: Status::empty(),
            bus,
            table,
            state: PowerState::Running,
            current: None,
            last_instruction_offset: 0,
        }
    }

    pub fn state(&self) -> PowerState {
        self.state
    }

    pub fn is_powered_on(&self) -> bool {
        self.state != PowerState::Off
    }

    pub fn power_on(&mut self) {
        if self.state == PowerState::Off {
            self.state = PowerState::Running;
        }
    }

    pub fn stop(&mut self) {
        self.state = PowerState::Off;
    }

    /// Latch a reset; served by the next fetch.
    pub fn reset(&mut self) {
        if self.state == PowerState::Running {
            debug!("reset latched");
            self.state = PowerState::ResetPending;
        }
    }

    /// Full address SP points at.
    pub fn stack_address(&self) -> u16 {
        STACK_PAGE | self.sp.get()
    }

    /// Offset of the most recently fetched opcode.
    pub fn last_instruction_offset(&self) -> u16 {
        self.last_instruction_offset
    }

    /// The decoded instruction waiting for, or last run by, [`CPU::execute`].
    pub fn current(&self) -> Option<Fetched> {
        self.current
    }

    pub fn trace_line(&self, fetched: &Fetched) -> TraceLine {
        TraceLine {
            pc: fetched.offset,
            op: fetched.op,
            operand: fetched.operand,
            a: self.a.byte(),
            x: self.x.byte(),
            y: self.y.byte(),
        }
    }

    /// Fetch, trace, execute.
    pub fn step(&mut self, tracer: &mut impl Tracer) -> Result<()> {
        let fetched = self.fetch()?;
        tracer.trace(&self.trace_line(&fetched));
        self.execute()
    }

    /// Run at most `budget` instructions from [`ENTRY_POINT`]. Returns how many ran.
    ///
    /// The CPU is powered off when this returns, whatever the outcome.
    pub fn run(&mut self, budget: u64, tracer: &mut impl Tracer) -> Result<u64> {
        self.pc.set(ENTRY_POINT);
        self.sp.set(STACK_TOP);

        let mut executed = 0;
        while self.is_powered_on() && executed < budget {
            if let Err(e) = self.step(tracer) {
                if e.is_unknown_operation() {
                    error!("{e}");
                }
                self.stop();
                return Err(e);
            }
            executed += 1;
        }

        self.stop();
        Ok(executed)
    }
}
