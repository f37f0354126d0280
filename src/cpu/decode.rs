//! Fetch stage: opcode byte, reset override, operand bytes.

use log::debug;

use crate::bus::Bus;
use crate::cpu::cpu::{CPU, PowerState, RESET_VECTOR};
use crate::cpu::opcode::{AddressingMode, Instruction, OperationCode};
use crate::error::{Error, Result};

/// Injected in place of whatever was fetched while a reset is latched.
pub const RESET_OPERATION: OperationCode =
    OperationCode::new(Instruction::JMP, AddressingMode::Absolute);

/// One decoded instruction and its operand, little endian.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fetched {
    pub op: OperationCode,
    pub operand: u16,
    /// Address of the opcode byte.
    pub offset: u16,
}

impl<B: Bus> CPU<B> {
    /// Decode the instruction at PC and latch it for [`CPU::execute`].
    pub fn fetch(&mut self) -> Result<Fetched> {
        self.current = None;

        let offset = self.pc.get();
        self.last_instruction_offset = offset;

        let code = self.bus.read(offset)?;
        self.pc.increment(1)?;

        let op = if self.state == PowerState::ResetPending {
            debug!("reset: jumping through vector ${RESET_VECTOR:04X}");
            self.pc.set(RESET_VECTOR);
            self.state = PowerState::Running;
            RESET_OPERATION
        } else {
            self.table.get(code).ok_or_else(|| {
                Error::UnknownOperation(format!("opcode 0x{code:02X} at 0x{offset:04X}"))
            })?
        };

        let operand = self.fetch_operand(op.mode.operand_size())?;
        let fetched = Fetched {
            op,
            operand,
            offset,
        };
        self.current = Some(fetched);
        Ok(fetched)
    }

    fn fetch_operand(&mut self, size: u16) -> Result<u16> {
        let mut operand = 0u16;
        for i in 0..size {
            let byte = self.bus.read(self.pc.get())?;
            self.pc.increment(1)?;
            operand |= (byte as u16) << (8 * i);
        }
        Ok(operand)
    }
}
