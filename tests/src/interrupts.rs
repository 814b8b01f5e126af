use crate::helpers::load;

use common::asm::Reg;
use emu_lib::{Clock, ExecRet, StopReason};
use emu_lib::io::timer::CycleTimer;

use std::time::Duration;

const PROG: &str = include_str!("../../demos/interrupts.ls8");
const SPIN: u8 = 15;
const HANDLER: u8 = 17;

#[test]
fn timer_handler_runs_and_returns() {
    let (mut emu, printer) = load(PROG);
    emu.run_for(6).unwrap();
    assert_eq!(emu.get_state().pc(), SPIN);
    assert_eq!(emu.mem_read(0xf8), HANDLER);
    assert_eq!(emu.reg_read(Reg::IM), 1);

    let before = *emu.get_state().regs();
    emu.raise_timer_interrupt();
    assert_eq!(emu.step(), Ok(ExecRet::Interrupt(0)));
    assert_eq!(emu.get_state().pc(), HANDLER);
    assert_eq!(emu.reg_read(Reg::SP), 0xf8 - 9);

    emu.run_for(3).unwrap();
    assert_eq!(printer.take_string(), "A\n");
    assert_eq!(emu.get_state().regs(), &before);
    assert_eq!(emu.get_state().pc(), SPIN);
    assert!(emu.get_state().get_flags().interrupts_enabled);
}

#[test]
fn no_nesting() {
    let (mut emu, printer) = load(PROG);
    emu.run_for(6).unwrap();
    emu.raise_timer_interrupt();
    assert_eq!(emu.step(), Ok(ExecRet::Interrupt(0)));

    // A second tick inside the handler is latched, not taken.
    emu.raise_timer_interrupt();
    assert_eq!(emu.step(), Ok(ExecRet::Ok));
    assert_eq!(emu.get_state().pc(), HANDLER + 3);
    assert_eq!(emu.reg_read(Reg::IS), 1);
    assert_eq!(emu.reg_read(Reg::SP), 0xf8 - 9);

    emu.run_for(2).unwrap();
    assert_eq!(printer.take_string(), "A\n");
    assert_eq!(emu.get_state().pc(), SPIN);
}

#[test]
fn masked_timer_is_ignored() {
    let (mut emu, printer) = load(PROG);
    emu.run_for(6).unwrap();
    emu.reg_write(Reg::IM, 0);
    emu.raise_timer_interrupt();
    for _ in 0..10 {
        assert_eq!(emu.step(), Ok(ExecRet::Ok));
        assert_eq!(emu.get_state().pc(), SPIN);
    }
    assert_eq!(emu.reg_read(Reg::IS), 1);
    assert!(printer.is_empty());

    // Unmasking delivers the latched request.
    emu.reg_write(Reg::IM, 1);
    assert_eq!(emu.step(), Ok(ExecRet::Interrupt(0)));
}

#[test]
fn highest_line_vector() {
    let src = r#"
        00000100 # LDI R5,0x80
        00000101
        10000000
        00011011 # HLT
    "#;
    let (mut emu, _) = load(src);
    emu.load_image(&[0x1b], 0x40).unwrap();
    emu.mem_write(0xff, 0x40);
    emu.step().unwrap();

    emu.raise_interrupt(7);
    emu.raise_interrupt(0);
    assert_eq!(emu.step(), Ok(ExecRet::Interrupt(7)));
    assert_eq!(emu.get_state().pc(), 0x40);
    assert_eq!(emu.reg_read(Reg::IS), 1);
    assert_eq!(emu.mem_read(0xf7), 3);
}

#[test]
fn clock_driven() {
    let (mut emu, printer) = load(PROG);
    let mut clock = Clock::new(Duration::ZERO, Box::new(CycleTimer::new(50)));
    clock.set_max_cycles(Some(500));
    assert_eq!(clock.run(&mut emu), Ok(StopReason::CycleLimit));
    assert_eq!(printer.take_string(), "A\n".repeat(9));
}
