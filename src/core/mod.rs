// This module serves as the central hub for bfcomp's core infrastructure components,
// the target-independent building blocks of the translator. It exports and organizes
// the subsystems: compilation settings (tape geometry and cell width with the operand
// tokens derived from it), the growable output buffer (headroom-checked, doubling,
// fallible growth), the loop label stack (pre-sized bracket matching with monotonic
// label numbers), the pending-instruction accumulator (run-length fusion plus the three
// owed side-effect flags), and the error taxonomy. Everything target-specific, meaning
// the actual NASM text, lives under x64 instead.

//! Core bfcomp infrastructure.
//!
//! Target-independent building blocks of the one-pass translator.
//!
//! # Key Components
//!
//! ## Settings (`settings`)
//! - Explicit read-only configuration per compilation call
//! - Cell width with derived operand keyword and working register
//!
//! ## Output Buffer (`buffer`)
//! - Worst-case emission headroom, doubling growth
//! - Fallible reservation: out-of-memory becomes a typed error
//!
//! ## Loop Labels (`labels`)
//! - LIFO bracket matching, storage pre-sized from a pre-scan opener count
//! - Monotonic label numbers, never reused within a pass
//!
//! ## Pending Instruction (`pending`)
//! - Single-slot accumulator with run-length fusion for `>`/`<` and `+`/`-`
//! - The three owed side effects carried across instructions

pub mod buffer;
pub mod error;
pub mod labels;
pub mod pending;
pub mod settings;

// Re-export core components
pub use buffer::{CodeBuffer, EMISSION_HEADROOM, INITIAL_CAPACITY};
pub use error::{CompileError, CompileResult};
pub use labels::{Label, LabelStack};
pub use pending::{Owed, Pending};
pub use settings::{CellWidth, Settings, DEFAULT_TAPE_LEN};
