use std::io::{Read, Write};

use common::constants::MEM_SIZE;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("line {line}: expected a binary byte, found {text:?}")]
    InvalidByte { line: usize, text: String },

    #[error("program is {len} bytes, memory holds {max}", max = MEM_SIZE)]
    TooLarge { len: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// A program image in the LS-8 text format: one byte per line written in
// binary, `#` to end of line is a comment.
//
//     10000010 # LDI R0,8
//     00000000
//     00001000
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    pub text: Vec<u8>,
}

impl Program {
    const COMMENT: char = '#';

    pub fn from_bytes(text: Vec<u8>) -> Result<Program, ParseError> {
        if text.len() > MEM_SIZE {
            return Err(ParseError::TooLarge { len: text.len() });
        }
        Ok(Program { text })
    }

    pub fn parse(input: &str) -> Result<Program, ParseError> {
        let mut text = vec![];
        for (i, line) in input.lines().enumerate() {
            let code = match line.split_once(Self::COMMENT) {
                Some((code, _comment)) => code,
                None => line,
            };
            let code = code.trim();
            if code.is_empty() {
                continue;
            }

            let byte = Self::parse_byte(code).ok_or_else(|| ParseError::InvalidByte {
                line: i + 1,
                text: code.to_string(),
            })?;
            text.push(byte);
        }

        Self::from_bytes(text)
    }

    fn parse_byte(code: &str) -> Option<u8> {
        if code.len() > u8::BITS as usize || !code.chars().all(|c| c == '0' || c == '1') {
            return None;
        }
        u8::from_str_radix(code, 2).ok()
    }

    pub fn read_from(reader: &mut impl Read) -> Result<Program, ParseError> {
        let mut input = String::new();
        reader.read_to_string(&mut input)?;
        Self::parse(&input)
    }

    pub fn write_to(&self, writer: &mut impl Write) -> std::io::Result<()> {
        for byte in &self.text {
            writeln!(writer, "{byte:08b}")?;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}
