
use emu_lib::Emulator;
use emu_lib::io::printer::PipePrinter;
use ls8file::Program;

use std::sync::Arc;

pub fn load(src: &str) -> (Emulator, Arc<PipePrinter>) {
    let prog = Program::parse(src).unwrap();
    let printer = Arc::new(PipePrinter::default());
    let mut emu = Emulator::new();
    emu.set_printer(printer.clone());
    emu.load_image(&prog.text, 0).unwrap();
    (emu, printer)
}

// Assumes the program halts.
pub fn run(src: &str) -> (Emulator, String) {
    let (mut emu, printer) = load(src);
    emu.run().unwrap();
    assert!(emu.is_halted());
    (emu, printer.take_string())
}
