//! End-to-end tests for the bfcomp driver binary.
//!
//! These run the compiled binary in `-S` mode, so argument handling, file
//! I/O and diagnostics are covered without needing nasm or ld installed.

use std::env;
use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};

/// Path of the driver binary under test.
fn bfcomp() -> &'static str {
    env!("CARGO_BIN_EXE_bfcomp")
}

/// A scratch file path unique to this process and test.
fn scratch(name: &str) -> PathBuf {
    env::temp_dir().join(format!("bfcomp-test-{}-{}", std::process::id(), name))
}

/// Helper to run the binary and capture its output.
fn run(args: &[&str]) -> Output {
    Command::new(bfcomp())
        .args(args)
        .output()
        .expect("failed to spawn bfcomp")
}

fn stderr_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_assembly_mode_writes_listing() {
    let input = scratch("listing.bf");
    let output_path = scratch("listing.s");
    fs::write(&input, "+[-].").unwrap();

    let output = run(&[
        input.to_str().unwrap(),
        output_path.to_str().unwrap(),
        "-S",
    ]);
    assert!(
        output.status.success(),
        "bfcomp failed: {}",
        stderr_of(&output)
    );

    let asm = fs::read_to_string(&output_path).unwrap();
    assert!(asm.starts_with("section .bss\ntape: resb 30000\n"));
    assert!(asm.contains("add r12b, 1"));
    assert!(asm.ends_with("mov rax, 0x3c\nmov rdi, 0\nsyscall\n"));

    let _ = fs::remove_file(&input);
    let _ = fs::remove_file(&output_path);
}

#[test]
fn test_hex_tape_size_reaches_the_listing() {
    let input = scratch("hex.bf");
    let output_path = scratch("hex.s");
    fs::write(&input, "+").unwrap();

    let output = run(&[
        "-s",
        "0x100",
        input.to_str().unwrap(),
        output_path.to_str().unwrap(),
        "-S",
    ]);
    assert!(
        output.status.success(),
        "bfcomp failed: {}",
        stderr_of(&output)
    );

    let asm = fs::read_to_string(&output_path).unwrap();
    assert!(asm.contains("tape: resb 256\n"));

    let _ = fs::remove_file(&input);
    let _ = fs::remove_file(&output_path);
}

#[test]
fn test_missing_input_is_a_diagnostic() {
    let output = run(&[]);

    assert!(!output.status.success());
    assert!(stderr_of(&output).contains("no input file"));
}

#[test]
fn test_zero_tape_size_is_rejected() {
    let input = scratch("zero.bf");
    fs::write(&input, "+").unwrap();

    let output = run(&["-s", "0", "-S", input.to_str().unwrap(), "out.s"]);
    assert!(!output.status.success());
    assert!(stderr_of(&output).contains("tape size"));

    let _ = fs::remove_file(&input);
}

#[test]
fn test_unsupported_cell_size_is_rejected() {
    let input = scratch("cell.bf");
    fs::write(&input, "+").unwrap();

    let output = run(&["-c", "3", "-S", input.to_str().unwrap(), "out.s"]);
    assert!(!output.status.success());
    assert!(stderr_of(&output).contains("cell size"));

    let _ = fs::remove_file(&input);
}

#[test]
fn test_compile_errors_surface_on_stderr() {
    let input = scratch("stray.bf");
    let output_path = scratch("stray.s");
    fs::write(&input, "]").unwrap();

    let output = run(&[
        input.to_str().unwrap(),
        output_path.to_str().unwrap(),
        "-S",
    ]);
    assert!(!output.status.success());
    assert!(stderr_of(&output).contains("unmatched ']'"));
    // Nothing was written for a failed compilation.
    assert!(!output_path.exists());

    let _ = fs::remove_file(&input);
}

#[test]
fn test_unreadable_input_is_a_diagnostic() {
    let missing = scratch("does-not-exist.bf");

    let output = run(&["-S", missing.to_str().unwrap(), "out.s"]);
    assert!(!output.status.success());
    assert!(stderr_of(&output).contains("could not read"));
}
