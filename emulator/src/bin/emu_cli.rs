
use emu_lib::{Clock, Emulator, StopReason};
use emu_lib::io::timer::{CycleTimer, NoTimer, TimerSource, WallClockTimer};
use ls8file::Program;

use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use clap_stdin::FileOrStdin;


/// LS-8 Emulator
#[derive(Parser)]
#[command(about)]
struct Args {
    /// Program to execute (.ls8), or - for stdin
    program: FileOrStdin,

    /// Microseconds between cycles.
    #[arg(long, default_value_t=1000)]
    cycle_us: u64,

    /// Milliseconds between timer interrupts.
    #[arg(long, default_value_t=1000, value_parser = clap::value_parser!(u64).range(1..))]
    timer_ms: u64,

    /// Don't raise timer interrupts.
    #[arg(long)]
    no_timer: bool,

    /// Stop after this many cycles, running flat out. The timer then fires
    /// every timer-ms / cycle-us cycles instead of by wall time.
    #[arg(long)]
    max_cycles: Option<usize>,
}


fn main() -> ExitCode {
    env_logger::init();

    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("emu_cli: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let mut clock = if args.max_cycles.is_some() {
        Clock::new(Duration::ZERO, timer(&args, true))
    } else {
        Clock::new(Duration::from_micros(args.cycle_us), timer(&args, false))
    };
    clock.set_max_cycles(args.max_cycles);

    let input = args.program.contents()?;
    let prog = Program::parse(&input)?;

    let mut emu = Emulator::new();
    emu.load_image(&prog.text, 0)?;

    match clock.run(&mut emu)? {
        StopReason::Halted => (),
        reason => eprintln!("emu_cli: stopped ({reason:?}) after {} cycles", emu.get_state().num_cycles()),
    }
    Ok(())
}

// Without wall-clock pacing, time is measured in cycles of cycle-us each.
fn timer(args: &Args, by_cycles: bool) -> Box<dyn TimerSource> {
    if args.no_timer {
        Box::new(NoTimer())
    } else if by_cycles {
        Box::new(CycleTimer::new(timer_period_cycles(args.timer_ms, args.cycle_us)))
    } else {
        Box::new(WallClockTimer::new(Duration::from_millis(args.timer_ms)))
    }
}

fn timer_period_cycles(timer_ms: u64, cycle_us: u64) -> usize {
    let cycles = timer_ms.saturating_mul(1000) / cycle_us.max(1);
    usize::try_from(cycles).unwrap_or(usize::MAX).max(1)
}
