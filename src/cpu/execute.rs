//! Execute stage: operand resolution and instruction semantics.
//!
//! Address arithmetic wraps at 16 bits; zero page indexing and the indirect
//! pointer lookups wrap inside page zero. Decimal mode is never consulted.

use crate::bus::Bus;
use crate::cpu::cpu::{CPU, IRQ_VECTOR};
use crate::cpu::decode::Fetched;
use crate::cpu::flags::Status;
use crate::cpu::opcode::{AddressingMode, Instruction};
use crate::cpu::register::Register;
use crate::error::{Error, Result};

impl<B: Bus> CPU<B> {
    /// Run the instruction latched by the last [`CPU::fetch`].
    pub fn execute(&mut self) -> Result<()> {
        let Fetched { op, operand, .. } = self.current.ok_or(Error::NotInitialised)?;
        let mode = op.mode;

        if !op.instruction.accepts(mode) {
            return Err(Error::UnknownOperation(format!(
                "{} with {} addressing",
                op.instruction,
                mode.name()
            )));
        }

        use Instruction::*;
        match op.instruction {
            LDA => {
                let value = self.source_value(mode, operand)?;
                Self::load(&mut self.a, &mut self.status, value);
            }
            LDX => {
                let value = self.source_value(mode, operand)?;
                Self::load(&mut self.x, &mut self.status, value);
            }
            LDY => {
                let value = self.source_value(mode, operand)?;
                Self::load(&mut self.y, &mut self.status, value);
            }
            STA => self.store(mode, operand, self.a.byte())?,
            STX => self.store(mode, operand, self.x.byte())?,
            STY => self.store(mode, operand, self.y.byte())?,

            ADC => {
                let value = self.source_value(mode, operand)?;
                self.add_with_carry(value);
            }
            SBC => {
                let value = self.source_value(mode, operand)?;
                self.add_with_carry(!value);
            }
            AND => {
                let value = self.a.byte() & self.source_value(mode, operand)?;
                Self::load(&mut self.a, &mut self.status, value);
            }
            ORA => {
                let value = self.a.byte() | self.source_value(mode, operand)?;
                Self::load(&mut self.a, &mut self.status, value);
            }
            EOR => {
                let value = self.a.byte() ^ self.source_value(mode, operand)?;
                Self::load(&mut self.a, &mut self.status, value);
            }
            BIT => {
                let value = self.source_value(mode, operand)?;
                self.status.set(Status::NEGATIVE, value & 0x80 != 0);
                self.status.set(Status::OVERFLOW, value & 0x40 != 0);
                self.status.set(Status::ZERO, value & self.a.byte() == 0);
            }
            CMP => {
                let value = self.source_value(mode, operand)?;
                self.compare(self.a.byte(), value);
            }
            CPX => {
                let value = self.source_value(mode, operand)?;
                self.compare(self.x.byte(), value);
            }
            CPY => {
                let value = self.source_value(mode, operand)?;
                self.compare(self.y.byte(), value);
            }

            INC => self.read_modify_write(mode, operand, |_, v| (v.wrapping_add(1), None))?,
            DEC => self.read_modify_write(mode, operand, |_, v| (v.wrapping_sub(1), None))?,
            ASL => self.read_modify_write(mode, operand, |_, v| (v << 1, Some(v & 0x80 != 0)))?,
            LSR => self.read_modify_write(mode, operand, |_, v| (v >> 1, Some(v & 0x01 != 0)))?,
            ROL => self.read_modify_write(mode, operand, |carry, v| {
                ((v << 1) | carry as u8, Some(v & 0x80 != 0))
            })?,
            ROR => self.read_modify_write(mode, operand, |carry, v| {
                ((v >> 1) | ((carry as u8) << 7), Some(v & 0x01 != 0))
            })?,
            INX => Self::step_index(&mut self.x, &mut self.status, 1),
            INY => Self::step_index(&mut self.y, &mut self.status, 1),
            DEX => Self::step_index(&mut self.x, &mut self.status, -1),
            DEY => Self::step_index(&mut self.y, &mut self.status, -1),

            TAX => Self::load(&mut self.x, &mut self.status, self.a.byte()),
            TAY => Self::load(&mut self.y, &mut self.status, self.a.byte()),
            TXA => Self::load(&mut self.a, &mut self.status, self.x.byte()),
            TYA => Self::load(&mut self.a, &mut self.status, self.y.byte()),
            TSX => Self::load(&mut self.x, &mut self.status, self.sp.byte()),
            TXS => self.sp.set(self.x.get()),

            PHA => self.push(self.a.byte())?,
            PLA => {
                let value = self.pop()?;
                Self::load(&mut self.a, &mut self.status, value);
            }
            PHP => self.push((self.status | Status::BREAK).to_stack_byte())?,
            PLP => {
                let p = self.pop()?;
                self.status = Status::from_stack_byte(p) - Status::BREAK;
            }

            CLC => self.status.remove(Status::CARRY),
            SEC => self.status.insert(Status::CARRY),
            CLI => self.status.remove(Status::IRQ_DISABLE),
            SEI => self.status.insert(Status::IRQ_DISABLE),
            CLD => self.status.remove(Status::DECIMAL),
            SED => self.status.insert(Status::DECIMAL),
            CLV => self.status.remove(Status::OVERFLOW),

            JMP => self.jump(mode, operand)?,
            JSR => {
                self.push(self.pc.high())?;
                self.push(self.pc.byte())?;
                self.jump(mode, operand)?;
            }
            RTS => {
                let lo = self.pop()? as u16;
                let hi = self.pop()? as u16;
                self.pc.set((hi << 8) | lo);
            }
            BRK => {
                // Skip the padding byte
                let ret = self.pc.get().wrapping_add(1);
                self.push((ret >> 8) as u8)?;
                self.push(ret as u8)?;
                self.push((self.status | Status::BREAK).to_stack_byte())?;
                self.status.insert(Status::IRQ_DISABLE);
                let target = self.read_word(IRQ_VECTOR)?;
                self.pc.set(target);
            }
            RTI => {
                let p = self.pop()?;
                self.status = Status::from_stack_byte(p) - Status::BREAK;
                let lo = self.pop()? as u16;
                let hi = self.pop()? as u16;
                self.pc.set((hi << 8) | lo);
            }

            BCC => self.branch(!self.status.carry(), operand),
            BCS => self.branch(self.status.carry(), operand),
            BEQ => self.branch(self.status.zero(), operand),
            BNE => self.branch(!self.status.zero(), operand),
            BMI => self.branch(self.status.negative(), operand),
            BPL => self.branch(!self.status.negative(), operand),
            BVC => self.branch(!self.status.overflow(), operand),
            BVS => self.branch(self.status.overflow(), operand),

            NOP => {}
        }

        Ok(())
    }

    /// Address a memory operand refers to.
    pub fn effective_address(&mut self, mode: AddressingMode, operand: u16) -> Result<u16> {
        let x = self.x.get();
        let y = self.y.get();
        let addr = match mode {
            AddressingMode::ZeroPage => operand & 0xFF,
            AddressingMode::ZeroPageX => operand.wrapping_add(x) & 0xFF,
            AddressingMode::ZeroPageY => operand.wrapping_add(y) & 0xFF,
            AddressingMode::Absolute => operand,
            AddressingMode::AbsoluteX => operand.wrapping_add(x),
            AddressingMode::AbsoluteY => operand.wrapping_add(y),
            AddressingMode::IndirectXPre => {
                let ptr = operand.wrapping_add(x) & 0xFF;
                self.read_zero_page_word(ptr as u8)?
            }
            AddressingMode::IndirectYPost => {
                let base = self.read_zero_page_word(operand as u8)?;
                base.wrapping_add(y)
            }
            _ => {
                return Err(Error::UnknownOperation(format!(
                    "no effective address for {} addressing",
                    mode.name()
                )));
            }
        };
        Ok(addr)
    }

    /// The byte an instruction operates on.
    pub fn source_value(&mut self, mode: AddressingMode, operand: u16) -> Result<u8> {
        match mode {
            AddressingMode::Immediate => Ok(operand as u8),
            AddressingMode::Accumulator => Ok(self.a.byte()),
            _ => {
                let addr = self.effective_address(mode, operand)?;
                self.bus.read(addr)
            }
        }
    }

    fn store(&mut self, mode: AddressingMode, operand: u16, value: u8) -> Result<()> {
        let addr = self.effective_address(mode, operand)?;
        self.bus.write(addr, value)
    }

    /// Shared by the shifts, rotates and memory INC/DEC. `op` gets the carry
    /// in and the value, and returns the result plus the carry out, if any.
    fn read_modify_write<F>(&mut self, mode: AddressingMode, operand: u16, op: F) -> Result<()>
    where
        F: FnOnce(bool, u8) -> (u8, Option<bool>),
    {
        let (value, addr) = if mode == AddressingMode::Accumulator {
            (self.a.byte(), None)
        } else {
            let addr = self.effective_address(mode, operand)?;
            (self.bus.read(addr)?, Some(addr))
        };

        let (result, carry) = op(self.status.carry(), value);
        if let Some(carry) = carry {
            self.status.set(Status::CARRY, carry);
        }
        self.status.update_zero_and_negative(result);

        match addr {
            Some(addr) => self.bus.write(addr, result),
            None => {
                self.a.set(result as u16);
                Ok(())
            }
        }
    }

    fn add_with_carry(&mut self, value: u8) {
        let a = self.a.get();
        let s = value as u16;
        let r = a + s + self.status.carry() as u16;

        self.status.set_carry_from(r);
        self.status.set_zero_from(r);
        self.status.set_negative_from(r);
        self.status.set_overflow_from(!(a ^ s) & (a ^ r) & 0x80);

        self.a.set(r);
    }

    fn compare(&mut self, register: u8, value: u8) {
        self.status.set(Status::CARRY, register >= value);
        self.status
            .update_zero_and_negative(register.wrapping_sub(value));
    }

    fn step_index(register: &mut Register, status: &mut Status, delta: i8) {
        register.set(register.get().wrapping_add_signed(delta as i16));
        status.update_zero_and_negative(register.byte());
    }

    /// Register write that owns Z and N.
    fn load(register: &mut Register, status: &mut Status, value: u8) {
        register.set(value as u16);
        status.update_zero_and_negative(value);
    }

    fn jump(&mut self, mode: AddressingMode, operand: u16) -> Result<()> {
        let target = match mode {
            AddressingMode::Relative => self.relative_target(operand),
            AddressingMode::Absolute => operand,
            AddressingMode::Indirect => {
                // The high byte is fetched without carrying into the next page.
                let lo = self.bus.read(operand)? as u16;
                let hi_addr = (operand & 0xFF00) | (operand.wrapping_add(1) & 0x00FF);
                let hi = self.bus.read(hi_addr)? as u16;
                (hi << 8) | lo
            }
            _ => {
                return Err(Error::UnknownOperation(format!(
                    "JMP with {} addressing",
                    mode.name()
                )));
            }
        };
        self.pc.set(target);
        Ok(())
    }

    fn branch(&mut self, condition: bool, operand: u16) {
        if condition {
            let target = self.relative_target(operand);
            self.pc.set(target);
        }
    }

    fn relative_target(&self, operand: u16) -> u16 {
        let offset = operand as u8 as i8;
        self.pc.get().wrapping_add_signed(offset as i16)
    }

    pub(crate) fn push(&mut self, value: u8) -> Result<()> {
        self.bus.write(self.stack_address(), value)?;
        self.sp.decrement(1)
    }

    pub(crate) fn pop(&mut self) -> Result<u8> {
        self.sp.increment(1)?;
        self.bus.read(self.stack_address())
    }

    fn read_word(&mut self, addr: u16) -> Result<u16> {
        let lo = self.bus.read(addr)? as u16;
        let hi = self.bus.read(addr.wrapping_add(1))? as u16;
        Ok((hi << 8) | lo)
    }

    fn read_zero_page_word(&mut self, ptr: u8) -> Result<u16> {
        let lo = self.bus.read(ptr as u16)? as u16;
        let hi = self.bus.read(ptr.wrapping_add(1) as u16)? as u16;
        Ok((hi << 8) | lo)
    }
}
