pub mod clock;
pub mod emulator;
pub mod emulator_state;
pub mod fault;
pub mod io;

pub use clock::{Clock, StopReason};
pub use emulator::{Emulator, ExecRet};
pub use emulator_state::{EmulatorState, Flags};
pub use fault::{Fault, LoadError};
pub use io::Memory;
