//! Fixed-width CPU register.
//!
//! The stored value is always masked to the register width. Stepping past the
//! top or below zero is refused with an error instead of wrapping, and the
//! value is left untouched.

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Width {
    Eight,
    Sixteen,
}

impl Width {
    pub fn bits(self) -> u8 {
        match self {
            Width::Eight => 8,
            Width::Sixteen => 16,
        }
    }

    fn mask(self) -> u16 {
        match self {
            Width::Eight => 0x00FF,
            Width::Sixteen => 0xFFFF,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Register {
    width: Width,
    value: u16,
}

impl Register {
    pub const fn new8() -> Self {
        Self {
            width: Width::Eight,
            value: 0,
        }
    }

    pub const fn new16() -> Self {
        Self {
            width: Width::Sixteen,
            value: 0,
        }
    }

    pub fn width(&self) -> Width {
        self.width
    }

    pub fn get(&self) -> u16 {
        self.value & self.width.mask()
    }

    /// Low byte of the register.
    pub fn byte(&self) -> u8 {
        (self.value & 0xFF) as u8
    }

    pub fn high(&self) -> u8 {
        (self.get() >> 8) as u8
    }

    pub fn set(&mut self, value: u16) {
        self.value = value & self.width.mask();
    }

    pub fn increment(&mut self, by: u16) -> Result<()> {
        match self.value.checked_add(by) {
            Some(next) if next <= self.width.mask() => {
                self.value = next;
                Ok(())
            }
            _ => Err(Error::RegisterOverflow {
                width: self.width.bits(),
                value: self.value,
                by,
            }),
        }
    }

    pub fn decrement(&mut self, by: u16) -> Result<()> {
        match self.value.checked_sub(by) {
            Some(next) => {
                self.value = next;
                Ok(())
            }
            None => Err(Error::RegisterUnderflow {
                width: self.width.bits(),
                value: self.value,
                by,
            }),
        }
    }
}
