//! Pending-instruction accumulator.
//!
//! The translator keeps at most one not-yet-emitted instruction at a time.
//! Runs of `>`/`<` and of `+`/`-` fuse into that single instruction, carrying
//! the signed sum of unit contributions instead of one code block per
//! character; any other significant character forces a flush first.
//!
//! Alongside the pending instruction ride three owed side effects. They are
//! deferred work (a register store, a register load, an address recompute)
//! that some earlier instruction promised and a later flush must materialize
//! before its own emission can be correct.

use crate::core::labels::Label;

/// The single not-yet-emitted instruction.
///
/// Accumulated values exist only on the fusable kinds and labels only on the
/// loop kinds, so states like "an output carrying a delta" cannot be
/// represented at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pending {
    /// Nothing accumulated yet. Only seen before the first significant
    /// character; a source that ends in this state contains no code.
    Empty,
    /// Fused `>`/`<` run: signed sum of unit pointer moves.
    Move(i64),
    /// Fused `+`/`-` run: signed sum of unit cell deltas.
    Delta(i64),
    /// `.`: write the addressed cell to stdout.
    Write,
    /// `,`: read one byte from stdin into the addressed cell.
    Read,
    /// `[` carrying its freshly allocated label.
    LoopOpen(Label),
    /// `]` carrying the matching opener's label.
    LoopClose(Label),
}

impl Pending {
    /// Try to fuse one source character into this pending instruction.
    ///
    /// Returns true when the character extended the accumulated value; false
    /// means the kinds differ and the caller must flush before starting a
    /// new pending instruction.
    pub fn fuse(&mut self, ch: u8) -> bool {
        match (self, ch) {
            (Pending::Move(n), b'>') => {
                *n += 1;
                true
            }
            (Pending::Move(n), b'<') => {
                *n -= 1;
                true
            }
            (Pending::Delta(v), b'+') => {
                *v += 1;
                true
            }
            (Pending::Delta(v), b'-') => {
                *v -= 1;
                true
            }
            _ => false,
        }
    }
}

/// Deferred side effects not yet materialized in the emitted code.
///
/// `store` set means the working register runs ahead of memory. That state
/// never coexists with the other two, which mean the register or the cached
/// address lags behind the logical tape position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Owed {
    /// Persist the working register to the addressed cell.
    pub store: bool,
    /// Reload the working register from the addressed cell.
    pub load: bool,
    /// Recompute the absolute cell address from the logical pointer.
    pub recompute: bool,
}
