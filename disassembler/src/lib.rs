
use common::decoder::decode;
use common::constants::MAX_INS_SIZE;

use std::fmt;

use log::trace;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Disassembled {
    pub addr: u8,
    pub repr: Vec<u8>,
    pub interp: Option<String>,
}

impl fmt::Display for Disassembled {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let bytes: Vec<String> = self.repr.iter().map(|b| format!("{b:02x}")).collect();
        write!(f, "{:#04x}:\t{:<8}\t", self.addr, bytes.join(" "))?;
        match &self.interp {
            Some(interp) => write!(f, "{interp}"),
            None => write!(f, ".byte\t{:#04x}", self.repr[0]),
        }
    }
}

// Linear sweep; bytes that don't decode are emitted one at a time.
pub fn disassemble(bin: &[u8]) -> Vec<Disassembled> {
    assert!(bin.len() <= (u8::MAX as usize) + 1);
    let mut out = vec![];
    let mut addr: usize = 0;
    while addr < bin.len() {
        let upper = usize::min(addr + MAX_INS_SIZE, bin.len());
        match decode(&bin[addr..upper]) {
            Ok(ins) => {
                let size = ins.size() as usize;
                out.push(Disassembled{
                    addr: addr as u8,
                    repr: bin[addr..addr + size].into(),
                    interp: Some(ins.to_string()),
                });
                addr += size;
            },
            Err(e) => {
                trace!("{addr:#04x}: {e}");
                out.push(Disassembled{
                    addr: addr as u8,
                    repr: vec![bin[addr]],
                    interp: None,
                });
                addr += 1;
            },
        }
    }

    out
}
