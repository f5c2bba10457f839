// This module defines error types for the bfcomp translator using the thiserror crate for
// idiomatic Rust error handling. CompileError is the main error enum covering the failure
// classes a translation pass can hit: source text with no Brainfuck instructions at all,
// loops opened but never closed, a closing bracket with no opener, and allocation failure
// while growing the output buffer or the label stack. Each variant carries relevant context
// (open-loop count, byte offset of the stray closer, the underlying reservation error) for
// diagnostics. The module also provides CompileResult<T> as a convenience type alias for
// Result<T, CompileError>. User-facing presentation of these errors is the CLI's job; the
// translator only guarantees unambiguous classification.

//! Error types for the bfcomp translator.
//!
//! Using thiserror for more idiomatic error handling.

use std::collections::TryReserveError;

use thiserror::Error;

/// Main error type for Brainfuck compilation.
#[derive(Error, Debug)]
pub enum CompileError {
    /// Nothing but comment characters (or nothing at all) in the source.
    #[error("source contains no Brainfuck instructions")]
    NoCode,

    /// One or more `[` without a matching `]` at end of input.
    #[error("unclosed loop: {open} bracket(s) still open at end of input")]
    UnclosedLoop { open: usize },

    /// A `]` appeared while no loop was open. Detected at occurrence.
    #[error("unmatched ']' at byte offset {position}")]
    UnmatchedCloser { position: usize },

    /// Growing the output buffer or the label stack ran out of memory.
    #[error("allocation failed: {0}")]
    ResourceExhausted(#[from] TryReserveError),
}

/// Result type alias for compile operations.
pub type CompileResult<T> = Result<T, CompileError>;
