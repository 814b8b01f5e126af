
use disassembler::{Disassembled, disassemble};
use ls8file::Program;

use std::ops::Range;
use std::process::ExitCode;

use clap::Parser;

/// LS-8 Disassembler
#[derive(Parser)]
struct Args {
    /// Program to disassemble (.ls8)
    program: String,
}

fn remove_long_zeros(disassembly: &mut Vec<Disassembled>) {
    const THRESH: usize = 8;

    let mut ranges = vec![];
    let mut range_start = None;
    for (i, dis) in disassembly.iter().enumerate() {
        if dis.repr == [0] {
            if range_start.is_none() {
                range_start = Some(i);
            }
        } else if let Some(start) = range_start {
            ranges.push(Range{start, end: i});
            range_start = None;
        }
    }
    if let Some(start) = range_start {
        ranges.push(Range{start, end: disassembly.len()});
    }

    for range in ranges.iter().rev() {
        if range.len() > THRESH {
            // Leave the first and last, an ellipses will be added between.
            disassembly.drain(range.start + 1..range.end - 1);
        }
    }
}


fn main() -> ExitCode {
    env_logger::init();

    let args = Args::parse();
    let prog = match std::fs::read_to_string(&args.program)
        .map_err(ls8file::ParseError::from)
        .and_then(|input| Program::parse(&input))
    {
        Ok(prog) => prog,
        Err(e) => {
            eprintln!("disassembler: {}: {e}", args.program);
            return ExitCode::FAILURE;
        }
    };
    let mut disassembly = disassemble(&prog.text);

    remove_long_zeros(&mut disassembly);

    let mut prev: Option<Disassembled> = None;
    for dis in disassembly {
        if let Some(p) = &prev {
            if (p.addr as usize) + p.repr.len() != (dis.addr as usize) {
                println!("...");
            }
        }
        println!("{}", dis);
        prev = Some(dis);
    }
    ExitCode::SUCCESS
}
