pub const MEM_SIZE: usize = 256; // Bytes

pub const STACK_TOP: u8 = 0xf8; // Initial SP; first push lands just below.
pub const INTERRUPT_VECTORS: u8 = 0xf8; // Entry i holds the handler for line i.
pub const NUM_INTERRUPTS: u8 = 8;

pub const TIMER_INTERRUPT: u8 = 0;

// Longest instruction: opcode plus two operands.
pub const MAX_INS_SIZE: usize = 3;
