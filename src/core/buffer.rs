//! Growable output buffer for generated assembly text.
//!
//! The translator appends many small emissions, so the buffer keeps a fixed
//! worst-case headroom free: whenever remaining capacity drops below it, the
//! buffer at least doubles. Growth goes through fallible reservation, so
//! running out of memory surfaces as a typed error instead of aborting, and
//! the text accumulated so far stays intact.

use std::fmt::{self, Write as _};

use crate::core::error::CompileResult;

/// Starting capacity of the output buffer.
pub const INITIAL_CAPACITY: usize = 8192;

/// Upper bound on a single emission (one flushed instruction, the prologue
/// or the epilogue). Every emission site stays well under this.
pub const EMISSION_HEADROOM: usize = 256;

/// Accumulates generated assembly text.
pub struct CodeBuffer {
    text: String,
}

impl CodeBuffer {
    /// Create a buffer with the initial capacity already reserved.
    pub fn new() -> CompileResult<Self> {
        let mut text = String::new();
        text.try_reserve(INITIAL_CAPACITY)?;
        Ok(CodeBuffer { text })
    }

    /// Make sure at least `needed` bytes of capacity remain, at least
    /// doubling the buffer when they do not.
    fn grow_for(&mut self, needed: usize) -> CompileResult<()> {
        if self.text.capacity() - self.text.len() < needed {
            let additional = self.text.capacity().max(needed);
            self.text.try_reserve(additional)?;
        }
        Ok(())
    }

    /// Append literal text.
    pub fn append(&mut self, s: &str) -> CompileResult<()> {
        self.grow_for(s.len().max(EMISSION_HEADROOM))?;
        self.text.push_str(s);
        Ok(())
    }

    /// Append one formatted emission. Capacity for the worst-case emission
    /// is secured up front, so the write itself cannot reallocate.
    pub fn append_fmt(&mut self, args: fmt::Arguments<'_>) -> CompileResult<()> {
        self.grow_for(EMISSION_HEADROOM)?;
        // Writing into a String is infallible.
        let _ = self.text.write_fmt(args);
        Ok(())
    }

    /// Bytes of text accumulated so far.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// True when nothing has been emitted yet.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Hand the accumulated text to the caller.
    pub fn finish(self) -> String {
        self.text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_accumulates() {
        let mut buf = CodeBuffer::new().unwrap();
        assert!(buf.is_empty());

        buf.append("section .text\n").unwrap();
        buf.append_fmt(format_args!("add r12b, {}\n", 4)).unwrap();

        let text = buf.finish();
        assert_eq!(text, "section .text\nadd r12b, 4\n");
    }

    #[test]
    fn test_growth_preserves_content() {
        let mut buf = CodeBuffer::new().unwrap();

        // Push well past the initial capacity to force at least one growth.
        let line = "mov rax, r13\n";
        let rounds = (2 * INITIAL_CAPACITY / line.len()) + 1;
        for _ in 0..rounds {
            buf.append(line).unwrap();
        }

        assert_eq!(buf.len(), rounds * line.len());
        let text = buf.finish();
        assert!(text.starts_with(line));
        assert!(text.ends_with(line));
        assert_eq!(text.len(), rounds * line.len());
    }

    #[test]
    fn test_initial_capacity_reserved() {
        let buf = CodeBuffer::new().unwrap();
        // A fresh buffer can take a full worst-case emission without growing.
        assert!(buf.text.capacity() >= INITIAL_CAPACITY);
        assert!(buf.text.capacity() - buf.len() >= EMISSION_HEADROOM);
    }
}
