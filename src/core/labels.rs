//! Loop label stack.
//!
//! Textbook bracket matching: every `[` pushes a freshly numbered label,
//! every `]` pops the most recent one. The source is scanned left to right,
//! so strict LIFO pairing is guaranteed correct. Storage is pre-sized from a
//! pre-scan count of openers, which also bounds the stack depth, so pushes
//! never reallocate mid-pass.

use crate::core::error::CompileResult;

/// Number identifying one loop's open/close jump targets.
pub type Label = u64;

/// LIFO stack of labels for the loops currently open.
pub struct LabelStack {
    /// Open loops, innermost last.
    stack: Vec<Label>,
    /// Next label to hand out. Monotonic per compilation; never reused.
    next: Label,
}

impl LabelStack {
    /// Create a stack with room for `opener_count` labels reserved up front.
    pub fn with_opener_count(opener_count: usize) -> CompileResult<Self> {
        let mut stack = Vec::new();
        stack.try_reserve_exact(opener_count)?;
        Ok(LabelStack { stack, next: 0 })
    }

    /// Allocate a fresh label for a loop opener and push it.
    pub fn open(&mut self) -> Label {
        let label = self.next;
        self.next += 1;
        self.stack.push(label);
        label
    }

    /// Pop the label of the innermost open loop, if any.
    pub fn close(&mut self) -> Option<Label> {
        self.stack.pop()
    }

    /// Number of loops still open.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }
}
