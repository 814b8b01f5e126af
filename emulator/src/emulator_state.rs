use crate::io::{Memory, Ram};

use common::asm::{NUM_REGS, Reg};
use common::constants::{MAX_INS_SIZE, STACK_TOP};

use log::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Flags {
    pub interrupts_enabled: bool,
    // Reserved. No instruction sets or reads it.
    pub overflow: bool,
}

impl Default for Flags {
    fn default() -> Self {
        Flags {
            interrupts_enabled: true,
            overflow: false,
        }
    }
}

// The register file and the memory it runs against. PC and IR live beside
// the eight general registers, not in the same array.
pub struct EmulatorState {
    num_cycles: usize,
    mem: Box<dyn Memory>,
    regs: [u8; NUM_REGS],
    pc: u8,
    ir: u8,
    flags: Flags,
}

impl EmulatorState {
    pub fn new() -> Self {
        Self::with_memory(Box::new(Ram::new()))
    }

    pub fn with_memory(mem: Box<dyn Memory>) -> Self {
        let mut regs = [0; NUM_REGS];
        regs[Reg::SP.index()] = STACK_TOP;
        EmulatorState {
            num_cycles: 0usize,
            mem,
            regs,
            pc: 0,
            ir: 0,
            flags: Flags::default(),
        }
    }

    pub fn inc_cycles(&mut self) {
        self.num_cycles += 1;
    }

    pub fn num_cycles(&self) -> usize {
        self.num_cycles
    }

    pub fn mem_read(&self, addr: u8) -> u8 {
        self.mem.read(addr)
    }

    pub fn mem_write(&mut self, addr: u8, val: u8) {
        trace!("Mem: writing {val:#04x} to {addr:#04x}");
        self.mem.write(addr, val);
    }

    pub fn reg_read(&self, reg: Reg) -> u8 {
        self.regs[reg.index()]
    }

    pub fn reg_write(&mut self, reg: Reg, val: u8) {
        trace!("Reg: writing {val:#04x} to {reg}");
        self.regs[reg.index()] = val;
    }

    pub fn regs(&self) -> &[u8; NUM_REGS] {
        &self.regs
    }

    pub fn pc(&self) -> u8 {
        self.pc
    }

    pub fn set_pc(&mut self, val: u8) {
        trace!("Reg: writing {val:#04x} to pc");
        self.pc = val;
    }

    pub fn ir(&self) -> u8 {
        self.ir
    }

    pub fn set_ir(&mut self, val: u8) {
        self.ir = val;
    }

    // Opcode at PC and the bytes after it; addresses wrap.
    pub fn next_ins(&self) -> [u8; MAX_INS_SIZE] {
        let pc = self.pc;
        std::array::from_fn(|i| self.mem_read(pc.wrapping_add(i as u8)))
    }

    pub fn get_flags(&self) -> &Flags {
        &self.flags
    }

    pub fn get_flags_mut(&mut self) -> &mut Flags {
        &mut self.flags
    }
}

impl Default for EmulatorState {
    fn default() -> Self {
        Self::new()
    }
}
