//! Brainfuck compiler driver.
//!
//! Parses the command line, runs the translator and either writes the
//! generated NASM listing (`-S`) or assembles and links it into an ELF
//! executable with `nasm` and `ld`.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{self, Command, Stdio};

use clap::Parser;
use log::{debug, info, warn};

use bfcomp::{compile, CellWidth, Settings, DEFAULT_TAPE_LEN};

/// Command line interface of the compiler.
///
/// Input and output can be given either as positional arguments (input
/// first, output second) or explicitly with `-i` and `-o`.
#[derive(Parser, Debug)]
#[command(
    name = "bfcomp",
    version,
    about = "Compiles Brainfuck into x86-64 executables via NASM assembly"
)]
struct Cli {
    /// Input source file, then output file
    #[arg(value_name = "FILE")]
    files: Vec<PathBuf>,

    /// Brainfuck source file to compile
    #[arg(short, long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// File the executable (or the listing with -S) is written to
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Number of cells on the tape (decimal, 0x hex or 0b binary)
    #[arg(
        short = 's',
        long,
        value_name = "N",
        default_value_t = DEFAULT_TAPE_LEN,
        value_parser = parse_number
    )]
    tape_size: u64,

    /// Size of one cell in bytes: 1, 2, 4 or 8
    #[arg(
        short,
        long,
        value_name = "N",
        default_value_t = 1,
        value_parser = parse_number
    )]
    cell_size: u64,

    /// Write the NASM listing instead of assembling and linking it
    #[arg(short = 'S', long)]
    assembly: bool,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let (input, output) = resolve_files(&cli);

    if cli.tape_size == 0 {
        die("tape size must be greater than 0");
    }
    let width = match CellWidth::from_bytes(cli.cell_size) {
        Some(width) => width,
        None => die("cell size must be 1, 2, 4 or 8 bytes"),
    };
    let settings = Settings {
        tape_len: cli.tape_size,
        width,
    };
    debug!(
        "settings: tape of {} cells, one {} each",
        settings.tape_len,
        settings.width.unit()
    );

    let source = match fs::read(&input) {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(e) => die(&format!("could not read '{}': {}", input.display(), e)),
    };

    let asm = match compile(&source, &settings) {
        Ok(asm) => asm,
        Err(e) => die(&e.to_string()),
    };

    if cli.assembly {
        if let Err(e) = fs::write(&output, &asm) {
            die(&format!("could not write '{}': {}", output.display(), e));
        }
        info!("wrote NASM listing to {}", output.display());
        return;
    }

    assemble_and_link(&asm, &output);
}

/// Fills the input and output slots from `-i`/`-o` first, then from the
/// positional file arguments in order.
fn resolve_files(cli: &Cli) -> (PathBuf, PathBuf) {
    let mut input = cli.input.clone();
    let mut output = cli.output.clone();
    for file in &cli.files {
        if input.is_none() {
            input = Some(file.clone());
        } else if output.is_none() {
            output = Some(file.clone());
        } else {
            die(&format!("unexpected extra file argument '{}'", file.display()));
        }
    }
    let Some(input) = input else {
        die("no input file provided");
    };
    let Some(output) = output else {
        die("no output file provided");
    };
    (input, output)
}

/// Parses a decimal, `0x` hexadecimal or `0b` binary numeral.
fn parse_number(text: &str) -> Result<u64, String> {
    let trimmed = text.trim();
    let parsed = if let Some(digits) = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        u64::from_str_radix(digits, 16)
    } else if let Some(digits) = trimmed
        .strip_prefix("0b")
        .or_else(|| trimmed.strip_prefix("0B"))
    {
        u64::from_str_radix(digits, 2)
    } else {
        trimmed.parse()
    };
    parsed.map_err(|_| format!("'{}' is not a valid number", text))
}

/// Assembles the listing with `nasm -f elf64` and links the object file
/// with `ld`. Intermediate files live in the system temporary directory
/// and are removed before returning.
fn assemble_and_link(asm: &str, output: &Path) {
    for tool in ["nasm", "ld"] {
        if !tool_available(tool) {
            die(&format!(
                "'{}' was not found, install it or pass -S to emit assembly instead",
                tool
            ));
        }
    }

    let stem = env::temp_dir().join(format!("bfcomp-{}", process::id()));
    let asm_path = stem.with_extension("asm");
    let obj_path = stem.with_extension("o");

    if let Err(e) = fs::write(&asm_path, asm) {
        die(&format!("could not write '{}': {}", asm_path.display(), e));
    }

    debug!("assembling {}", asm_path.display());
    let assembled = Command::new("nasm")
        .arg("-f")
        .arg("elf64")
        .arg(&asm_path)
        .arg("-o")
        .arg(&obj_path)
        .status();
    if !matches!(assembled, Ok(status) if status.success()) {
        remove_quietly(&asm_path);
        die("nasm failed to assemble the generated listing");
    }

    debug!("linking {}", obj_path.display());
    let linked = Command::new("ld")
        .arg(&obj_path)
        .arg("-o")
        .arg(output)
        .status();
    let linked_ok = matches!(linked, Ok(status) if status.success());
    remove_quietly(&asm_path);
    remove_quietly(&obj_path);
    if !linked_ok {
        die("ld failed to link the object file");
    }

    info!("wrote executable to {}", output.display());
}

/// Checks that an external tool runs at all by asking for its version.
fn tool_available(tool: &str) -> bool {
    Command::new(tool)
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

fn remove_quietly(path: &Path) {
    if let Err(e) = fs::remove_file(path) {
        warn!("could not remove {}: {}", path.display(), e);
    }
}

/// Prints an error message and terminates with a nonzero exit code.
fn die(message: &str) -> ! {
    eprintln!("Error: {}", message);
    process::exit(1);
}
