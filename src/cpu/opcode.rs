//! Instruction set, addressing modes and the opcode table.
//!
//! The table is declarative: one `0xHH = MNEMONIC;ADDRESSING_MODE` entry per
//! line, read from `opcodes/2a03.opcodes` (embedded at build time) or from a
//! user supplied file. Blank lines and lines starting with `#` or `!` are
//! comments.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Built-in 2A03 table (the 151 official opcodes).
pub const BUILTIN_OPCODES: &str = include_str!("../../opcodes/2a03.opcodes");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressingMode {
    Implied,
    Accumulator,
    Immediate,
    Relative,
    ZeroPage,
    ZeroPageX,
    ZeroPageY,
    Absolute,
    Indirect,
    AbsoluteX,
    AbsoluteY,
    /// `(zp,X)`
    IndirectXPre,
    /// `(zp),Y`
    IndirectYPost,
}

const MODE_NAMES: [(&str, AddressingMode); 13] = [
    ("IMPLIED", AddressingMode::Implied),
    ("ACCUMULATOR", AddressingMode::Accumulator),
    ("IMMEDIATE", AddressingMode::Immediate),
    ("RELATIVE", AddressingMode::Relative),
    ("ZERO_PAGE", AddressingMode::ZeroPage),
    ("ZERO_PAGE_X", AddressingMode::ZeroPageX),
    ("ZERO_PAGE_Y", AddressingMode::ZeroPageY),
    ("ABSOLUTE", AddressingMode::Absolute),
    ("INDIRECT", AddressingMode::Indirect),
    ("ABSOLUTE_X", AddressingMode::AbsoluteX),
    ("ABSOLUTE_Y", AddressingMode::AbsoluteY),
    ("INDIRECT_X_PRE", AddressingMode::IndirectXPre),
    ("INDIRECT_Y_POST", AddressingMode::IndirectYPost),
];

impl AddressingMode {
    /// Number of operand bytes following the opcode.
    pub fn operand_size(self) -> u16 {
        match self {
            AddressingMode::Implied | AddressingMode::Accumulator => 0,
            AddressingMode::Absolute
            | AddressingMode::Indirect
            | AddressingMode::AbsoluteX
            | AddressingMode::AbsoluteY => 2,
            _ => 1,
        }
    }

    pub fn name(self) -> &'static str {
        MODE_NAMES
            .iter()
            .find(|(_, mode)| *mode == self)
            .map(|(name, _)| *name)
            .unwrap_or("?")
    }
}

impl FromStr for AddressingMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        MODE_NAMES
            .iter()
            .find(|(name, _)| *name == s)
            .map(|(_, mode)| *mode)
            .ok_or_else(|| format!("unknown addressing mode `{s}`"))
    }
}

macro_rules! instructions {
    ($($name:ident),* $(,)?) => {
        /// The 56 official 6502 mnemonics.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Instruction {
            $($name,)*
        }

        const INSTRUCTION_NAMES: &[(&str, Instruction)] = &[
            $((stringify!($name), Instruction::$name),)*
        ];
    };
}

instructions![
    ADC, AND, ASL, BCC, BCS, BEQ, BIT, BMI, BNE, BPL, BRK, BVC, BVS, CLC, CLD, CLI, CLV, CMP, CPX,
    CPY, DEC, DEX, DEY, EOR, INC, INX, INY, JMP, JSR, LDA, LDX, LDY, LSR, NOP, ORA, PHA, PHP, PLA,
    PLP, ROL, ROR, RTI, RTS, SBC, SEC, SED, SEI, STA, STX, STY, TAX, TAY, TSX, TXA, TXS, TYA,
];

use AddressingMode as M;

const ALU_MODES: &[AddressingMode] = &[
    M::Immediate,
    M::ZeroPage,
    M::ZeroPageX,
    M::Absolute,
    M::AbsoluteX,
    M::AbsoluteY,
    M::IndirectXPre,
    M::IndirectYPost,
];
const STA_MODES: &[AddressingMode] = &[
    M::ZeroPage,
    M::ZeroPageX,
    M::Absolute,
    M::AbsoluteX,
    M::AbsoluteY,
    M::IndirectXPre,
    M::IndirectYPost,
];
const SHIFT_MODES: &[AddressingMode] = &[
    M::Accumulator,
    M::ZeroPage,
    M::ZeroPageX,
    M::Absolute,
    M::AbsoluteX,
];
const MEMORY_RMW_MODES: &[AddressingMode] = &[M::ZeroPage, M::ZeroPageX, M::Absolute, M::AbsoluteX];
const LDX_MODES: &[AddressingMode] = &[
    M::Immediate,
    M::ZeroPage,
    M::ZeroPageY,
    M::Absolute,
    M::AbsoluteY,
];
const LDY_MODES: &[AddressingMode] = &[
    M::Immediate,
    M::ZeroPage,
    M::ZeroPageX,
    M::Absolute,
    M::AbsoluteX,
];
const STX_MODES: &[AddressingMode] = &[M::ZeroPage, M::ZeroPageY, M::Absolute];
const STY_MODES: &[AddressingMode] = &[M::ZeroPage, M::ZeroPageX, M::Absolute];
const COMPARE_INDEX_MODES: &[AddressingMode] = &[M::Immediate, M::ZeroPage, M::Absolute];
const BIT_MODES: &[AddressingMode] = &[M::ZeroPage, M::Absolute];
const JMP_MODES: &[AddressingMode] = &[M::Relative, M::Absolute, M::Indirect];
const ABSOLUTE_ONLY: &[AddressingMode] = &[M::Absolute];
const RELATIVE_ONLY: &[AddressingMode] = &[M::Relative];
const IMPLIED_ONLY: &[AddressingMode] = &[M::Implied];

impl Instruction {
    pub fn mnemonic(self) -> &'static str {
        INSTRUCTION_NAMES
            .iter()
            .find(|(_, i)| *i == self)
            .map(|(name, _)| *name)
            .unwrap_or("???")
    }

    /// Addressing modes the executor accepts for this instruction.
    pub fn modes(self) -> &'static [AddressingMode] {
        use Instruction::*;
        match self {
            ADC | AND | CMP | EOR | LDA | ORA | SBC => ALU_MODES,
            STA => STA_MODES,
            ASL | LSR | ROL | ROR => SHIFT_MODES,
            INC | DEC => MEMORY_RMW_MODES,
            LDX => LDX_MODES,
            LDY => LDY_MODES,
            STX => STX_MODES,
            STY => STY_MODES,
            CPX | CPY => COMPARE_INDEX_MODES,
            BIT => BIT_MODES,
            JMP => JMP_MODES,
            JSR => ABSOLUTE_ONLY,
            BCC | BCS | BEQ | BMI | BNE | BPL | BVC | BVS => RELATIVE_ONLY,
            _ => IMPLIED_ONLY,
        }
    }

    pub fn accepts(self, mode: AddressingMode) -> bool {
        self.modes().contains(&mode)
    }
}

impl FromStr for Instruction {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        INSTRUCTION_NAMES
            .iter()
            .find(|(name, _)| *name == s)
            .map(|(_, i)| *i)
            .ok_or_else(|| format!("unknown instruction `{s}`"))
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

/// A decoded (instruction, addressing mode) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationCode {
    pub instruction: Instruction,
    pub mode: AddressingMode,
    /// Byte this entry was declared under; `None` for synthetic operations.
    pub code: Option<u8>,
}

impl OperationCode {
    pub const fn new(instruction: Instruction, mode: AddressingMode) -> Self {
        Self {
            instruction,
            mode,
            code: None,
        }
    }
}

/// Label used in trace lines: `0xA9`, or the mnemonic for synthetic entries.
impl fmt::Display for OperationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "0x{code:02X}"),
            None => f.write_str(self.instruction.mnemonic()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct OpcodeTable {
    entries: [Option<OperationCode>; 0x100],
}

impl OpcodeTable {
    pub fn builtin() -> Result<Self> {
        Self::parse(BUILTIN_OPCODES)
    }

    pub fn parse(source: &str) -> Result<Self> {
        let mut entries = [None; 0x100];

        for (index, raw) in source.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
                continue;
            }
            let bad = |reason: String| Error::OpcodeTable {
                line: index + 1,
                reason,
            };

            let (key, value) = line
                .split_once(|c: char| c == '=' || c == ':')
                .ok_or_else(|| bad(format!("expected `0xHH = MNEMONIC;MODE`, got `{line}`")))?;
            let key = key.trim();
            let hex = key
                .strip_prefix("0x")
                .or_else(|| key.strip_prefix("0X"))
                .ok_or_else(|| bad(format!("key `{key}` is not 0x-prefixed")))?;
            let code = u8::from_str_radix(hex, 16)
                .map_err(|_| bad(format!("key `{key}` is not a byte")))?;

            let (mnemonic, mode) = value
                .trim()
                .split_once(';')
                .ok_or_else(|| bad(format!("value `{}` lacks `;`", value.trim())))?;
            let instruction = mnemonic.trim().parse::<Instruction>().map_err(bad)?;
            let mode = mode.trim().parse::<AddressingMode>().map_err(bad)?;

            entries[code as usize] = Some(OperationCode {
                instruction,
                mode,
                code: Some(code),
            });
        }

        Ok(Self { entries })
    }

    /// `None` marks an unmapped (illegal) opcode.
    pub fn get(&self, code: u8) -> Option<OperationCode> {
        self.entries[code as usize]
    }

    pub fn len(&self) -> usize {
        self.entries.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
