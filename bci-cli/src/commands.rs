//! CLI command implementations.
//!
//! Each command prints its own diagnostics and returns the exit code on
//! failure.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use bci_vm::Config;
use log::info;

/// Arguments of `bci run`.
struct RunArgs<'a> {
    paths: Vec<&'a str>,
    max_steps: Option<u64>,
}

fn parse_run_args(args: &[String]) -> Result<RunArgs<'_>, i32> {
    let mut paths = Vec::new();
    let mut max_steps = None;
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        if arg == "--max-steps" {
            let value = iter.next().ok_or_else(|| {
                eprintln!("error: --max-steps requires a value");
                1
            })?;
            let n = value.parse::<u64>().map_err(|_| {
                eprintln!("error: invalid --max-steps value '{value}'");
                1
            })?;
            max_steps = Some(n);
        } else {
            paths.push(arg.as_str());
        }
    }

    Ok(RunArgs { paths, max_steps })
}

/// Load and execute a bytecode program. PRINT output goes to stdout.
pub fn run(args: &[String]) -> Result<(), i32> {
    let RunArgs { paths, max_steps } = parse_run_args(args)?;
    let [input] = paths.as_slice() else {
        eprintln!("error: run requires exactly one program file");
        eprintln!("Usage: bci run <program.bc> [--max-steps N]");
        return Err(1);
    };

    let config = match max_steps {
        Some(n) => Config::default().with_step_budget(n),
        None => Config::default(),
    };

    let mut machine = bci_vm::load_file(input, config).map_err(|e| {
        eprintln!("error: {e}");
        1
    })?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let result = machine.run(&mut out);
    let _ = out.flush();

    match result {
        Ok(()) => {
            info!("{input}: stopped after {} steps", machine.steps());
            Ok(())
        }
        Err(e) => {
            eprintln!("runtime error: {e}");
            Err(3)
        }
    }
}

/// Assemble a .bcs text file to .bc bytecode.
pub fn assemble(args: &[String]) -> Result<(), i32> {
    if args.is_empty() {
        eprintln!("error: assemble requires an input file");
        eprintln!("Usage: bci assemble <input.bcs> [-o output.bc]");
        return Err(1);
    }

    let input = &args[0];

    let output = match &args[1..] {
        [] => Path::new(input).with_extension("bc"),
        [flag, path] if flag == "-o" => Path::new(path).to_path_buf(),
        _ => {
            eprintln!("Usage: bci assemble <input.bcs> [-o output.bc]");
            return Err(1);
        }
    };

    let text = fs::read_to_string(input).map_err(|e| {
        eprintln!("error: cannot read '{input}': {e}");
        1
    })?;

    let program = bci_assembler::assemble_program(&text).map_err(|e| {
        eprintln!("error: {e}");
        1
    })?;

    let bytes = program.encode();

    fs::write(&output, &bytes).map_err(|e| {
        eprintln!("error: cannot write '{}': {e}", output.display());
        1
    })?;

    eprintln!(
        "assembled {} instructions ({} bytes) -> {}",
        program.len(),
        bytes.len(),
        output.display()
    );
    Ok(())
}

/// Statically check a bytecode program.
pub fn verify(args: &[String]) -> Result<(), i32> {
    let [input] = args else {
        eprintln!("error: verify requires an input file");
        eprintln!("Usage: bci verify <program.bc>");
        return Err(1);
    };

    let bytes = read_binary(input)?;

    match bci_verifier::verify(&bytes) {
        Ok(()) => {
            println!("OK: {input} ({} bytes)", bytes.len());
            Ok(())
        }
        Err(errors) => {
            for e in &errors {
                eprintln!("error: {e}");
            }
            Err(2)
        }
    }
}

/// Disassemble bytecode to text.
pub fn disassemble(args: &[String]) -> Result<(), i32> {
    let (input, offsets) = match args {
        [input] => (input, false),
        [input, flag] if flag == "--offsets" => (input, true),
        _ => {
            eprintln!("error: disassemble requires an input file");
            eprintln!("Usage: bci disassemble <program.bc> [--offsets]");
            return Err(1);
        }
    };

    let bytes = read_binary(input)?;
    let decoded = if offsets {
        bci_assembler::listing(&bytes)
    } else {
        bci_assembler::disassemble(&bytes)
    };
    let text = decoded.map_err(|e| {
        eprintln!("error: invalid bytecode: {e}");
        1
    })?;

    print!("{text}");
    Ok(())
}

fn read_binary(path: &str) -> Result<Vec<u8>, i32> {
    fs::read(path).map_err(|e| {
        eprintln!("error: cannot read '{path}': {e}");
        1
    })
}
