//! bfcomp - Brainfuck to x86-64 NASM compilation.
//!
//! bfcomp translates Brainfuck source into textual NASM assembly for
//! x86-64 Linux in a single linear scan. The generated program is
//! freestanding: raw syscalls for byte I/O and exit, a `.bss` tape, one
//! `_start` entry, ready for `nasm -f elf64` plus `ld`.
//!
//! # Primary Usage
//!
//! ```
//! use bfcomp::{compile, Settings};
//!
//! let settings = Settings::default();
//! let asm = compile("++>,.", &settings)?;
//! assert!(asm.starts_with("section .bss"));
//! # Ok::<(), bfcomp::CompileError>(())
//! ```
//!
//! # Architecture
//!
//! - [`compiler`] - The one-pass translator driving the scan
//! - [`core`] - Shared infrastructure (settings, buffer, labels, pending)
//! - [`x64`] - x86-64 specific code (NASM text emission, register plan)

pub mod compiler;
pub mod core;
pub mod x64;

// Re-export the public surface from organized modules
pub use crate::compiler::compile;
pub use crate::core::{
    // Configuration
    CellWidth, Settings, DEFAULT_TAPE_LEN,
    // Errors
    CompileError, CompileResult,
};
pub use crate::x64::Emitter;
