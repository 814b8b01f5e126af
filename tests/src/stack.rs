use crate::helpers::{load, run};

use common::asm::Reg;
use emu_lib::ExecRet;

#[test]
fn push_pop_roundtrip() {
    let src = r#"
        00000100 # LDI R4,0x5A
        00000100
        01011010
        00001010 # PUSH R4
        00000100
        00001011 # POP R1
        00000001
        00011011 # HLT
    "#;
    let (mut emu, _) = load(src);
    emu.run_for(2).unwrap();
    assert_eq!(emu.reg_read(Reg::SP), 0xf7);
    assert_eq!(emu.mem_read(0xf7), 0x5a);

    emu.run().unwrap();
    assert_eq!(emu.reg_read(Reg::R1), 0x5a);
    assert_eq!(emu.reg_read(Reg::SP), 0xf8);
}

#[test]
fn call_returns_past_call() {
    let src = r#"
        00000100 # LDI R2,9
        00000010
        00001001
        00000100 # LDI R0,1
        00000000
        00000001
        00001111 # CALL R2
        00000010
        00011011 # HLT

        # address 9
        00001100 # ADD R0,R0
        00000000
        00000000
        00010000 # RET
    "#;
    let (mut emu, _) = load(src);
    emu.run_for(3).unwrap();
    assert_eq!(emu.get_state().pc(), 9);
    assert_eq!(emu.mem_read(0xf7), 8);

    emu.run_for(2).unwrap();
    assert_eq!(emu.get_state().pc(), 8);
    assert_eq!(emu.step(), Ok(ExecRet::Halt));
    assert_eq!(emu.reg_read(Reg::R0), 2);
}

#[test]
fn nested_calls() {
    let src = r#"
        00000100 # LDI R1,11  ; outer
        00000001
        00001011
        00000100 # LDI R2,19  ; inner
        00000010
        00010011
        00001111 # CALL R1
        00000001
        00000110 # PRN R0
        00000000
        00011011 # HLT

        # outer, address 11
        00000100 # LDI R0,5
        00000000
        00000101
        00001111 # CALL R2
        00000010
        00000110 # PRN R0
        00000000
        00010000 # RET

        # inner, address 19
        00000101 # MUL R0,R0
        00000000
        00000000
        00010000 # RET
    "#;
    let (emu, out) = run(src);
    assert_eq!(out, "25\n25\n");
    assert_eq!(emu.reg_read(Reg::SP), 0xf8);
}

#[test]
fn jmp_does_not_push() {
    let src = r#"
        00000100 # LDI R0,7
        00000000
        00000111
        00010001 # JMP R0
        00000000
        00000110 # PRN R0 ; skipped
        00000000
        00011011 # HLT
    "#;
    let (emu, out) = run(src);
    assert_eq!(out, "");
    assert_eq!(emu.get_state().pc(), 7);
    assert_eq!(emu.reg_read(Reg::SP), 0xf8);
}
