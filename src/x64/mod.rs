//! x86-64 architecture-specific components.
//!
//! This module contains all x86-64 specific code:
//! - NASM text emission for every code block the translator produces
//! - Register conventions (`r13` pointer offset, `r14` cell address, `r12`
//!   slice as the working register)
//! - Freestanding program framing: `.bss` tape, `_start`, raw syscalls

pub mod emitter;

pub use emitter::Emitter;
