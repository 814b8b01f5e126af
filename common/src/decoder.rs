use super::asm::*;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("empty input")]
    Empty,

    #[error("invalid opcode {0:#010b}")]
    InvalidOpcode(u8),

    #[error("invalid register operand {0}")]
    InvalidRegister(u8),

    #[error("opcode {0:#010b} is missing an operand")]
    MissingOperand(u8),
}

type Decoder = fn(&[u8]) -> Result<Option<Ins>, DecodeError>;

// Opcode groups are disjoint, so the order only affects speed.
const DECODERS: &[Decoder] = &[
    ImmIns::decode,
    DoubleOperandIns::decode,
    SingleOperandIns::decode,
    MiscIns::decode,
];


// input[0] is the opcode; operands follow.
pub fn decode(input: &[u8]) -> Result<Ins, DecodeError> {
    let Some(&opcode) = input.first() else {
        return Err(DecodeError::Empty);
    };

    for decoder in DECODERS {
        if let Some(ins) = decoder(input)? {
            return Ok(ins);
        }
    }

    Err(DecodeError::InvalidOpcode(opcode))
}
