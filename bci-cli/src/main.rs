//! bci CLI — assemble, verify, disassemble, and run bytecode.
//!
//! Exit codes:
//! - 0: Success
//! - 1: Usage, input, decode, or assembly error
//! - 2: Verification failure
//! - 3: Runtime fault

mod commands;

use std::process;

use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let (verbosity, args) = split_verbosity(&args);
    init_logging(verbosity);

    let Some((command, rest)) = args.split_first() else {
        print_usage();
        process::exit(1);
    };

    let result = match command.as_str() {
        "assemble" => commands::assemble(rest),
        "verify" => commands::verify(rest),
        "run" => commands::run(rest),
        "disassemble" => commands::disassemble(rest),
        "--help" | "-h" | "help" => {
            print_usage();
            process::exit(0);
        }
        other => {
            eprintln!("error: unknown command '{other}'");
            eprintln!();
            print_usage();
            process::exit(1);
        }
    };

    if let Err(code) = result {
        process::exit(code);
    }
}

/// Count leading `-v` flags (`-v -v` and `-vv` are equivalent) and return
/// the remaining arguments.
fn split_verbosity(args: &[String]) -> (usize, &[String]) {
    let mut verbosity = 0;
    let mut consumed = 0;
    for arg in args {
        match arg.strip_prefix('-') {
            Some(vs) if !vs.is_empty() && vs.chars().all(|c| c == 'v') => {
                verbosity += vs.len();
                consumed += 1;
            }
            _ => break,
        }
    }
    (verbosity, &args[consumed..])
}

/// Log to stderr; stdout carries program output.
fn init_logging(verbosity: usize) {
    let level = match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    // Only fails if a logger is already installed.
    let _ = TermLogger::init(
        level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    );
}

fn print_usage() {
    eprintln!("Usage: bci [-v...] <command> [args]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  run <program.bc> [--max-steps N]          Execute a bytecode program");
    eprintln!("  assemble <input.bcs> [-o output.bc]       Assemble text to bytecode");
    eprintln!("  disassemble <program.bc> [--offsets]      Disassemble bytecode to text");
    eprintln!("  verify <program.bc>                       Statically check a program");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -v, -vv, -vvv   Log at info, debug, or trace level on stderr");
}
