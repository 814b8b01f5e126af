use crate::helpers::{load, run};

use common::asm::Reg;
use emu_lib::{ExecRet, Fault};
use ls8file::{ParseError, Program};

fn snapshot(emu: &emu_lib::Emulator) -> Vec<u8> {
    (0..=u8::MAX).map(|addr| emu.mem_read(addr)).collect()
}

#[test]
fn halt_changes_nothing() {
    let src = r#"
        00000100 # LDI R2,3
        00000010
        00000011
        00011011 # HLT
        00000110 # PRN R2 ; never reached
        00000010
    "#;
    let (mut emu, printer) = load(src);
    emu.step().unwrap();
    let regs = *emu.get_state().regs();
    let mem = snapshot(&emu);

    assert_eq!(emu.step(), Ok(ExecRet::Halt));
    assert_eq!(emu.get_state().regs(), &regs);
    assert_eq!(snapshot(&emu), mem);
    assert_eq!(emu.get_state().pc(), 3);

    for _ in 0..3 {
        assert_eq!(emu.step(), Ok(ExecRet::Halt));
    }
    assert_eq!(emu.get_state().num_cycles(), 2);
    assert!(printer.is_empty());
}

#[test]
fn empty_memory_faults() {
    let (mut emu, _) = load("");
    assert_eq!(emu.run(), Err(Fault::InvalidOpcode{pc: 0, opcode: 0}));
}

#[test]
fn invalid_opcode_stops() {
    let src = r#"
        00000100 # LDI R0,1
        00000000
        00000001
        00000110 # PRN R0
        00000000
        11111111 # not an instruction
        00000110 # PRN R0
        00000000
        00011011 # HLT
    "#;
    let (mut emu, printer) = load(src);
    let fault = Fault::InvalidOpcode{pc: 5, opcode: 0xff};
    assert_eq!(emu.run(), Err(fault));
    assert_eq!(emu.fault(), Some(fault));
    assert_eq!(emu.get_state().ir(), 0xff);
    assert_eq!(emu.get_state().pc(), 5);
    assert_eq!(printer.take_string(), "1\n");

    assert_eq!(emu.step(), Err(fault));
    assert!(printer.is_empty());
    assert_eq!(fault.to_string(), "invalid instruction 0b11111111 at address 0x05");
}

#[test]
fn invalid_register_stops() {
    let src = r#"
        00000100 # LDI R8,1
        00001000
        00000001
    "#;
    let (mut emu, _) = load(src);
    assert_eq!(emu.step(), Err(Fault::InvalidRegister{pc: 0, reg: 8}));
    assert_eq!(emu.get_state().regs(), &[0, 0, 0, 0, 0, 0, 0, 0xf8]);
}

#[test]
fn ldi_special_registers() {
    let src = r#"
        00000100 # LDI R5,0xFF
        00000101
        11111111
        00000100 # LDI R6,0x02
        00000110
        00000010
        00000100 # LDI R7,0xE0
        00000111
        11100000
        00011011 # HLT
    "#;
    let (emu, _) = run(src);
    assert_eq!(emu.reg_read(Reg::IM), 0xff);
    assert_eq!(emu.reg_read(Reg::IS), 0x02);
    assert_eq!(emu.reg_read(Reg::SP), 0xe0);
}

#[test]
fn store_to_vector_table() {
    let src = r#"
        00000100 # LDI R0,0xFB
        00000000
        11111011
        00000100 # LDI R1,0x33
        00000001
        00110011
        00001001 # ST R0,R1
        00000000
        00000001
        00011011 # HLT
    "#;
    let (emu, _) = run(src);
    assert_eq!(emu.mem_read(0xfb), 0x33);
}

#[test]
fn bad_program_file() {
    let err = Program::parse("00000100\n2\n").unwrap_err();
    assert!(matches!(err, ParseError::InvalidByte { line: 2, .. }));
    assert_eq!(err.to_string(), "line 2: expected a binary byte, found \"2\"");
}
