pub mod printer;
pub mod timer;

use common::constants::MEM_SIZE;

// Byte-addressable store the CPU runs against. Bounds are the implementor's
// concern; with 8-bit addresses any u8 is in range for a full-size memory.
pub trait Memory: Send {
    fn read(&self, addr: u8) -> u8;
    fn write(&mut self, addr: u8, val: u8);
}

pub struct Ram {
    bytes: [u8; MEM_SIZE],
}

impl Ram {
    pub fn new() -> Self {
        Ram { bytes: [0; MEM_SIZE] }
    }
}

impl Default for Ram {
    fn default() -> Self {
        Self::new()
    }
}

impl Memory for Ram {
    fn read(&self, addr: u8) -> u8 {
        self.bytes[addr as usize]
    }

    fn write(&mut self, addr: u8, val: u8) {
        self.bytes[addr as usize] = val;
    }
}
