use crate::decoder::DecodeError;

use std::fmt;
use std::io::{self, Write};

use num_derive::FromPrimitive;
use num_traits::FromPrimitive;
use derive_more::{IsVariant, Unwrap};
use delegate::delegate;


pub trait InstrVariant<Opcode: FromPrimitive> {
    // Operand bytes following the opcode. Hardwired per group; never derived
    // from the opcode's bit pattern.
    const NUM_OPERANDS: u8;

    fn decode_opcode(input: u8) -> Option<Opcode> {
        Opcode::from_u8(input)
    }
}

fn decode_reg(input: &[u8], idx: usize) -> Result<Reg, DecodeError> {
    let Some(&raw) = input.get(idx) else {
        return Err(DecodeError::MissingOperand(input[0]));
    };
    Reg::from_u8(raw).ok_or(DecodeError::InvalidRegister(raw))
}

fn decode_imm(input: &[u8], idx: usize) -> Result<u8, DecodeError> {
    input.get(idx).copied().ok_or(DecodeError::MissingOperand(input[0]))
}


////////////////////////////////////////////////////////////////////////////////


#[derive(Debug, Clone, Copy, FromPrimitive, PartialEq, Eq)]
pub enum Reg {
    R0 = 0,
    R1,
    R2,
    R3,
    R4,
    R5,
    R6,
    R7,
}

pub const NUM_REGS: usize = 8;

impl Reg {
    // R5 and R6 stay ordinary registers; the interrupt check also reads them.
    pub const IM: Reg = Reg::R5;
    pub const IS: Reg = Reg::R6;
    pub const SP: Reg = Reg::R7;

    pub const ALL: [Reg; NUM_REGS] = [
        Reg::R0, Reg::R1, Reg::R2, Reg::R3, Reg::R4, Reg::R5, Reg::R6, Reg::R7,
    ];

    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Reg {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", format!("{:?}", self).to_lowercase())
    }
}


////////////////////////////////////////////////////////////////////////////////


#[derive(Debug, Clone, Copy, FromPrimitive, PartialEq, Eq)]
pub enum MiscOpcode {
    Ret = 0b00010000,
    Iret = 0b00011010,
    Hlt = 0b00011011,
}

impl fmt::Display for MiscOpcode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", format!("{:?}", self).to_lowercase())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MiscIns {
    pub op: MiscOpcode,
}

impl MiscIns {
    pub fn num_operands(&self) -> u8 {
        Self::NUM_OPERANDS
    }

    pub fn opcode(&self) -> u8 {
        self.op as u8
    }

    pub fn emit(&self, out: &mut impl Write) -> io::Result<()> {
        out.write_all(&[self.opcode()])
    }

    pub(crate) fn decode(input: &[u8]) -> Result<Option<Ins>, DecodeError> {
        let Some(op) = Self::decode_opcode(input[0]) else {
            return Ok(None);
        };
        Ok(Some(Ins::Misc(Self{op})))
    }
}

impl InstrVariant<MiscOpcode> for MiscIns {
    const NUM_OPERANDS: u8 = 0;
}

impl fmt::Display for MiscIns {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.op)
    }
}


////////////////////////////////////////////////////////////////////////////////


#[derive(Debug, Clone, Copy, FromPrimitive, PartialEq, Eq)]
pub enum SingleOperandOpcode {
    Prn = 0b00000110,
    Pra = 0b00000111,
    Push = 0b00001010,
    Pop = 0b00001011,
    Call = 0b00001111,
    Jmp = 0b00010001,
}

impl fmt::Display for SingleOperandOpcode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", format!("{:?}", self).to_lowercase())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SingleOperandIns {
    pub op: SingleOperandOpcode,
    pub reg: Reg,
}

impl SingleOperandIns {
    pub fn num_operands(&self) -> u8 {
        Self::NUM_OPERANDS
    }

    pub fn opcode(&self) -> u8 {
        self.op as u8
    }

    pub fn emit(&self, out: &mut impl Write) -> io::Result<()> {
        out.write_all(&[self.opcode(), self.reg as u8])
    }

    pub(crate) fn decode(input: &[u8]) -> Result<Option<Ins>, DecodeError> {
        let Some(op) = Self::decode_opcode(input[0]) else {
            return Ok(None);
        };
        let reg = decode_reg(input, 1)?;
        Ok(Some(Ins::SingleOperand(Self{op, reg})))
    }
}

impl InstrVariant<SingleOperandOpcode> for SingleOperandIns {
    const NUM_OPERANDS: u8 = 1;
}

impl fmt::Display for SingleOperandIns {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}\t{}", self.op, self.reg)
    }
}


////////////////////////////////////////////////////////////////////////////////


#[derive(Debug, Clone, Copy, FromPrimitive, PartialEq, Eq)]
pub enum DoubleOperandOpcode {
    Mul = 0b00000101,
    St = 0b00001001,
    Add = 0b00001100,
}

impl fmt::Display for DoubleOperandOpcode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", format!("{:?}", self).to_lowercase())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DoubleOperandIns {
    pub op: DoubleOperandOpcode,
    pub a: Reg,
    pub b: Reg,
}

impl DoubleOperandIns {
    pub fn num_operands(&self) -> u8 {
        Self::NUM_OPERANDS
    }

    pub fn opcode(&self) -> u8 {
        self.op as u8
    }

    pub fn emit(&self, out: &mut impl Write) -> io::Result<()> {
        out.write_all(&[self.opcode(), self.a as u8, self.b as u8])
    }

    pub(crate) fn decode(input: &[u8]) -> Result<Option<Ins>, DecodeError> {
        let Some(op) = Self::decode_opcode(input[0]) else {
            return Ok(None);
        };
        let a = decode_reg(input, 1)?;
        let b = decode_reg(input, 2)?;
        Ok(Some(Ins::DoubleOperand(Self{op, a, b})))
    }
}

impl InstrVariant<DoubleOperandOpcode> for DoubleOperandIns {
    const NUM_OPERANDS: u8 = 2;
}

impl fmt::Display for DoubleOperandIns {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}\t{}, {}", self.op, self.a, self.b)
    }
}


////////////////////////////////////////////////////////////////////////////////


#[derive(Debug, Clone, Copy, FromPrimitive, PartialEq, Eq)]
pub enum ImmOpcode {
    Ldi = 0b00000100,
}

impl fmt::Display for ImmOpcode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", format!("{:?}", self).to_lowercase())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImmIns {
    pub op: ImmOpcode,
    pub reg: Reg,
    pub imm: u8,
}

impl ImmIns {
    pub fn num_operands(&self) -> u8 {
        Self::NUM_OPERANDS
    }

    pub fn opcode(&self) -> u8 {
        self.op as u8
    }

    pub fn emit(&self, out: &mut impl Write) -> io::Result<()> {
        out.write_all(&[self.opcode(), self.reg as u8, self.imm])
    }

    pub(crate) fn decode(input: &[u8]) -> Result<Option<Ins>, DecodeError> {
        let Some(op) = Self::decode_opcode(input[0]) else {
            return Ok(None);
        };
        let reg = decode_reg(input, 1)?;
        let imm = decode_imm(input, 2)?;
        Ok(Some(Ins::Imm(Self{op, reg, imm})))
    }
}

impl InstrVariant<ImmOpcode> for ImmIns {
    const NUM_OPERANDS: u8 = 2;
}

impl fmt::Display for ImmIns {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}\t{}, {}", self.op, self.reg, self.imm)
    }
}


////////////////////////////////////////////////////////////////////////////////


#[derive(Debug, Clone, Copy, PartialEq, Eq, IsVariant, Unwrap)]
pub enum Ins {
    Misc(MiscIns),
    SingleOperand(SingleOperandIns),
    DoubleOperand(DoubleOperandIns),
    Imm(ImmIns),
}

impl Ins {
    delegate! {
        to match self {
            Ins::Misc(x) => x,
            Ins::SingleOperand(x) => x,
            Ins::DoubleOperand(x) => x,
            Ins::Imm(x) => x,
        } {
            pub fn num_operands(&self) -> u8;
            pub fn opcode(&self) -> u8;
            pub fn emit(&self, out: &mut impl Write) -> io::Result<()>;
        }
    }

    // Bytes occupied, which is also the default PC advance.
    pub fn size(&self) -> u8 {
        1 + self.num_operands()
    }
}

impl fmt::Display for Ins {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Ins::Misc(ins) => write!(f, "{ins}"),
            Ins::SingleOperand(ins) => write!(f, "{ins}"),
            Ins::DoubleOperand(ins) => write!(f, "{ins}"),
            Ins::Imm(ins) => write!(f, "{ins}"),
        }
    }
}


////////////////////////////////////////////////////////////////////////////////


// Operations the ALU implements. Only a subset of the two register
// instructions go through it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AluOp {
    Add,
    Mul,
}

impl AluOp {
    pub fn apply(self, a: u8, b: u8) -> u8 {
        match self {
            AluOp::Add => a.wrapping_add(b),
            AluOp::Mul => a.wrapping_mul(b),
        }
    }
}

impl TryFrom<DoubleOperandOpcode> for AluOp {
    type Error = DoubleOperandOpcode;

    fn try_from(op: DoubleOperandOpcode) -> Result<Self, Self::Error> {
        match op {
            DoubleOperandOpcode::Add => Ok(AluOp::Add),
            DoubleOperandOpcode::Mul => Ok(AluOp::Mul),
            DoubleOperandOpcode::St => Err(op),
        }
    }
}
