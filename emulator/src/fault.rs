use common::asm::DoubleOperandOpcode;
use common::constants::MEM_SIZE;

use thiserror::Error;

// Conditions that stop the machine. Each leaves the state as it was before
// the faulting instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Fault {
    #[error("invalid instruction {opcode:#010b} at address {pc:#04x}")]
    InvalidOpcode { pc: u8, opcode: u8 },

    #[error("invalid register operand {reg} at address {pc:#04x}")]
    InvalidRegister { pc: u8, reg: u8 },

    #[error("ALU doesn't implement {op}")]
    UnsupportedAluOp { op: DoubleOperandOpcode },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("image of {len} bytes doesn't fit in memory at {start:#04x} ({max} bytes)", max = MEM_SIZE)]
    TooLarge { len: usize, start: u8 },
}
