
use common::asm::*;
use common::decoder::{decode, DecodeError};
use common::constants::*;
use crate::EmulatorState;
use crate::fault::{Fault, LoadError};
use crate::io::Memory;
use crate::io::printer::{Printer, StdoutPrinter};

use std::sync::Arc;

use derive_more::IsVariant;
use log::{debug, error, trace};


#[derive(Debug, Clone, Copy, PartialEq, Eq, IsVariant)]
pub enum ExecRet {
    Ok,
    // The cycle was spent entering the handler for this line.
    Interrupt(u8),
    Halt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunState {
    Running,
    Halted,
    Faulted(Fault),
}


pub struct Emulator {
    state: EmulatorState,
    printer: Arc<dyn Printer>,
    run_state: RunState,
}

impl Emulator {
    pub fn new() -> Emulator {
        Self::with_state(EmulatorState::new())
    }

    pub fn with_memory(mem: Box<dyn Memory>) -> Emulator {
        Self::with_state(EmulatorState::with_memory(mem))
    }

    fn with_state(state: EmulatorState) -> Emulator {
        Emulator {
            state,
            printer: Arc::new(StdoutPrinter()),
            run_state: RunState::Running,
        }
    }

    pub fn set_printer(&mut self, printer: Arc<dyn Printer>) {
        self.printer = printer;
    }

    // Run until a halt or fault.
    pub fn run(&mut self) -> Result<(), Fault> {
        while !self.step()?.is_halt() {}
        Ok(())
    }

    // Run at most max_cycles cycles, returning what the last one did.
    pub fn run_for(&mut self, max_cycles: usize) -> Result<ExecRet, Fault> {
        let mut ret = ExecRet::Ok;
        for _ in 0..max_cycles {
            ret = self.step()?;
            if ret.is_halt() {
                break;
            }
        }
        Ok(ret)
    }

    // Advance by one cycle: either enter one pending interrupt handler or
    // execute one instruction. Once halted or faulted, the machine stays put.
    pub fn step(&mut self) -> Result<ExecRet, Fault> {
        match self.run_state {
            RunState::Halted => return Ok(ExecRet::Halt),
            RunState::Faulted(fault) => return Err(fault),
            RunState::Running => (),
        }

        self.state.inc_cycles();
        let ret = self.cycle();
        match ret {
            Ok(ExecRet::Halt) => self.run_state = RunState::Halted,
            Err(fault) => {
                error!("{fault}; stopping");
                self.run_state = RunState::Faulted(fault);
            }
            Ok(_) => (),
        }
        ret
    }

    fn cycle(&mut self) -> Result<ExecRet, Fault> {
        if let Some(line) = self.pending_interrupt() {
            self.interrupt(line);
            return Ok(ExecRet::Interrupt(line));
        }

        let ins = self.decode()?;
        debug!("PC: {:#04x}: {}", self.state.pc(), ins);
        self.exec(&ins)
    }

    pub fn is_halted(&self) -> bool {
        self.run_state == RunState::Halted
    }

    pub fn fault(&self) -> Option<Fault> {
        match self.run_state {
            RunState::Faulted(fault) => Some(fault),
            _ => None,
        }
    }

    fn decode(&mut self) -> Result<Ins, Fault> {
        let pc = self.state.pc();
        let next_ins = self.state.next_ins();
        self.state.set_ir(next_ins[0]);
        decode(&next_ins).map_err(|e| match e {
            DecodeError::InvalidRegister(reg) => Fault::InvalidRegister{pc, reg},
            _ => Fault::InvalidOpcode{pc, opcode: next_ins[0]},
        })
    }

    pub fn load_image(&mut self, data: &[u8], start: u8) -> Result<(), LoadError> {
        if start as usize + data.len() > MEM_SIZE {
            return Err(LoadError::TooLarge{len: data.len(), start});
        }
        for (byte, ptr) in data.iter().zip(start..=u8::MAX) {
            self.state.mem_write(ptr, *byte);
        }
        Ok(())
    }


    ///////////////////////////////////////////////////////////////////////////
    // Interrupts
    ///////////////////////////////////////////////////////////////////////////

    // Latch a request on the given line. It's acted on at the start of a
    // later cycle, if unmasked and interrupts are enabled. Lines past the
    // vector table are dropped.
    pub fn raise_interrupt(&mut self, line: u8) {
        if line >= NUM_INTERRUPTS {
            error!("No interrupt line {line}; ignoring");
            return;
        }
        let is = self.state.reg_read(Reg::IS) | (1 << line);
        self.state.reg_write(Reg::IS, is);
    }

    pub fn raise_timer_interrupt(&mut self) {
        self.raise_interrupt(TIMER_INTERRUPT);
    }

    // Lowest unmasked pending line, if we'd accept one now.
    fn pending_interrupt(&self) -> Option<u8> {
        if !self.state.get_flags().interrupts_enabled {
            return None;
        }
        let masked = self.state.reg_read(Reg::IS) & self.state.reg_read(Reg::IM);
        if masked == 0 {
            return None;
        }
        Some(masked.trailing_zeros() as u8)
    }

    fn interrupt(&mut self, line: u8) {
        let is = self.state.reg_read(Reg::IS) & !(1 << line);
        self.state.reg_write(Reg::IS, is);
        self.state.get_flags_mut().interrupts_enabled = false;

        let old_pc = self.state.pc();
        self.push(old_pc);
        for reg in Reg::ALL {
            self.push_reg(reg);
        }

        let new_pc = self.state.mem_read(INTERRUPT_VECTORS + line);
        debug!("Interrupt {line}; saving pc {old_pc:#04x}; loading pc {new_pc:#04x}");
        self.state.set_pc(new_pc);
    }

    fn exec_iret_ins(&mut self) {
        // The saved SP is stale by the time it's read back; popping the
        // frame restores SP on its own.
        let _ = self.pop();
        for reg in Reg::ALL[..Reg::SP.index()].iter().rev() {
            let val = self.pop();
            self.state.reg_write(*reg, val);
        }
        let new_pc = self.pop();
        debug!("IRET to pc {new_pc:#04x}");
        self.state.set_pc(new_pc);
        self.state.get_flags_mut().interrupts_enabled = true;
    }


    ///////////////////////////////////////////////////////////////////////////


    pub fn mem_read(&self, addr: u8) -> u8 {
        self.state.mem_read(addr)
    }

    pub fn mem_write(&mut self, addr: u8, val: u8) {
        self.state.mem_write(addr, val)
    }

    pub fn reg_read(&self, reg: Reg) -> u8 {
        self.state.reg_read(reg)
    }

    pub fn reg_write(&mut self, reg: Reg, val: u8) {
        self.state.reg_write(reg, val)
    }

    pub fn get_state(&self) -> &EmulatorState {
        &self.state
    }

    pub fn get_state_mut(&mut self) -> &mut EmulatorState {
        &mut self.state
    }

    fn push(&mut self, val: u8) {
        let sp = self.state.reg_read(Reg::SP).wrapping_sub(1);
        self.state.reg_write(Reg::SP, sp);
        self.state.mem_write(sp, val);
    }

    // The register is read after SP moves, so pushing SP saves the
    // decremented value.
    fn push_reg(&mut self, reg: Reg) {
        let sp = self.state.reg_read(Reg::SP).wrapping_sub(1);
        self.state.reg_write(Reg::SP, sp);
        let val = self.state.reg_read(reg);
        self.state.mem_write(sp, val);
    }

    fn pop(&mut self) -> u8 {
        let sp = self.state.reg_read(Reg::SP);
        let val = self.state.mem_read(sp);
        self.state.reg_write(Reg::SP, sp.wrapping_add(1));
        val
    }

    fn advance_pc(&mut self, ins: &Ins) {
        let pc = self.state.pc().wrapping_add(ins.size());
        self.state.set_pc(pc);
    }

    // 8-bit arithmetic. Opcodes outside the ALU's set are a fault rather than
    // a no-op.
    pub fn alu(op: DoubleOperandOpcode, a: u8, b: u8) -> Result<u8, Fault> {
        let alu_op = AluOp::try_from(op).map_err(|op| Fault::UnsupportedAluOp{op})?;
        Ok(alu_op.apply(a, b))
    }


    ///////////////////////////////////////////////////////////////////////////
    // Execute
    ///////////////////////////////////////////////////////////////////////////

    fn exec_misc_ins(&mut self, ins: &MiscIns) -> ExecRet {
        match ins.op {
            MiscOpcode::Hlt => {
                debug!("Halted at pc {:#04x}", self.state.pc());
                return ExecRet::Halt;
            },
            MiscOpcode::Ret => {
                let new_pc = self.pop();
                trace!("RET to {new_pc:#04x}");
                self.state.set_pc(new_pc);
            },
            MiscOpcode::Iret => self.exec_iret_ins(),
        }
        ExecRet::Ok
    }

    fn exec_single_operand_ins(&mut self, ins: &SingleOperandIns) {
        use SingleOperandOpcode::*;
        let val = self.state.reg_read(ins.reg);
        match ins.op {
            Prn => self.printer.write(format!("{val}\n").as_bytes()),
            Pra => self.printer.write(format!("{}\n", val as char).as_bytes()),
            Push => self.push_reg(ins.reg),
            Pop => {
                let val = self.pop();
                self.state.reg_write(ins.reg, val);
            },
            Call => {
                let ret = self.state.pc().wrapping_add(2);
                self.push(ret);
                let new_pc = self.state.reg_read(ins.reg);
                trace!("CALL {new_pc:#04x}, returning to {ret:#04x}");
                self.state.set_pc(new_pc);
                return;
            },
            Jmp => {
                trace!("JMP to {val:#04x}");
                self.state.set_pc(val);
                return;
            },
        }
        self.advance_pc(&Ins::SingleOperand(*ins));
    }

    fn exec_double_operand_ins(&mut self, ins: &DoubleOperandIns) -> Result<(), Fault> {
        let a = self.state.reg_read(ins.a);
        let b = self.state.reg_read(ins.b);
        match ins.op {
            DoubleOperandOpcode::Add | DoubleOperandOpcode::Mul => {
                let res = Self::alu(ins.op, a, b)?;
                self.state.reg_write(ins.a, res);
            },
            DoubleOperandOpcode::St => self.state.mem_write(a, b),
        }
        self.advance_pc(&Ins::DoubleOperand(*ins));
        Ok(())
    }

    fn exec_imm_ins(&mut self, ins: &ImmIns) {
        match ins.op {
            ImmOpcode::Ldi => self.state.reg_write(ins.reg, ins.imm),
        }
        self.advance_pc(&Ins::Imm(*ins));
    }

    fn exec(&mut self, ins: &Ins) -> Result<ExecRet, Fault> {
        match ins {
            Ins::Misc(ins) => { return Ok(self.exec_misc_ins(ins)); },
            Ins::SingleOperand(ins) => self.exec_single_operand_ins(ins),
            Ins::DoubleOperand(ins) => self.exec_double_operand_ins(ins)?,
            Ins::Imm(ins) => self.exec_imm_ins(ins),
        }

        Ok(ExecRet::Ok)
    }
}

impl Default for Emulator {
    fn default() -> Self {
        Self::new()
    }
}
