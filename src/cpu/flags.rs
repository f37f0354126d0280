//! 2A03 processor status register.
//!
//! Flags are kept at their ordinal positions (carry = bit 0 ... negative =
//! bit 6). The 6502 stack image of P puts overflow and negative one bit
//! higher and always sets bit 5; [`Status::to_stack_byte`] and
//! [`Status::from_stack_byte`] convert between the two.

use bitflags::bitflags;

bitflags! {
    #[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Status: u8 {
        const CARRY = 1 << 0;
        const ZERO = 1 << 1;
        const IRQ_DISABLE = 1 << 2;
        /// Present on the 2A03 but never consulted by the ALU.
        const DECIMAL = 1 << 3;
        const BREAK = 1 << 4;
        const OVERFLOW = 1 << 5;
        const NEGATIVE = 1 << 6;
    }
}

const P_UNUSED: u8 = 1 << 5;
const P_OVERFLOW: u8 = 1 << 6;
const P_NEGATIVE: u8 = 1 << 7;

/// Flags that keep the same bit in both layouts.
const LOW_FLAGS: u8 = 0b0001_1111;

impl Status {
    pub fn carry(&self) -> bool {
        self.contains(Status::CARRY)
    }

    pub fn zero(&self) -> bool {
        self.contains(Status::ZERO)
    }

    pub fn overflow(&self) -> bool {
        self.contains(Status::OVERFLOW)
    }

    pub fn negative(&self) -> bool {
        self.contains(Status::NEGATIVE)
    }

    /// Carry out of an 8-bit operation computed on a wider integer.
    pub fn set_carry_from(&mut self, result: u16) {
        self.set(Status::CARRY, result > 0xFF);
    }

    pub fn set_zero_from(&mut self, result: u16) {
        self.set(Status::ZERO, result & 0xFF == 0);
    }

    pub fn set_negative_from(&mut self, result: u16) {
        self.set(Status::NEGATIVE, result & 0x80 != 0);
    }

    /// Any non-zero overflow word sets V.
    pub fn set_overflow_from(&mut self, word: u16) {
        self.set(Status::OVERFLOW, word != 0);
    }

    pub fn update_zero_and_negative(&mut self, value: u8) {
        self.set_zero_from(value as u16);
        self.set_negative_from(value as u16);
    }

    /// P as pushed by PHP/BRK: NV1BDIZC.
    pub fn to_stack_byte(self) -> u8 {
        let mut p = (self.bits() & LOW_FLAGS) | P_UNUSED;
        if self.overflow() {
            p |= P_OVERFLOW;
        }
        if self.negative() {
            p |= P_NEGATIVE;
        }
        p
    }

    /// Inverse of [`Status::to_stack_byte`]. Bit 5 is dropped.
    pub fn from_stack_byte(p: u8) -> Self {
        let mut status = Status::from_bits_truncate(p & LOW_FLAGS);
        status.set(Status::OVERFLOW, p & P_OVERFLOW != 0);
        status.set(Status::NEGATIVE, p & P_NEGATIVE != 0);
        status
    }
}
