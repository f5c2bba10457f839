// This module implements the one-pass Brainfuck translator that drives everything else.
// Compilation is a single left-to-right scan over the source bytes: runs of '>'/'<' and
// '+'/'-' fuse into one pending instruction carrying the signed sum, any other significant
// character flushes the pending instruction first, and everything else is a comment. The
// flush rules materialize owed side effects lazily (a register store before the pointer
// leaves a dirty cell, an address recompute and register load before cell arithmetic, all
// three before a loop test), so straight-line runs touch memory once instead of per
// character. Loops resolve through a LIFO label stack pre-sized by a pre-scan opener
// count; a stray ']' is reported immediately with its byte offset. After the last flush
// the translator verifies that code was generated at all, that every loop was closed, and
// only then appends the exit-syscall epilogue. The whole pass is a pure function from
// source text plus settings to assembly text or a typed error.

//! The one-pass Brainfuck → NASM translator.
//!
//! `compile` is the entry point: source text in, freestanding x86-64
//! assembly text (or a typed [`CompileError`]) out. One linear scan, no
//! intermediate representation, no optimization beyond run-length fusion of
//! adjacent pointer moves and cell deltas.

use crate::core::error::{CompileError, CompileResult};
use crate::core::labels::LabelStack;
use crate::core::pending::{Owed, Pending};
use crate::core::settings::Settings;
use crate::x64::Emitter;

/// Compile Brainfuck source into NASM x86-64 assembly text.
///
/// Only the eight significant characters are interpreted; every other byte
/// is a comment. The returned text is a complete freestanding program:
/// prologue (tape reservation and zero-fill), translated body, exit-syscall
/// epilogue.
pub fn compile(source: &str, settings: &Settings) -> CompileResult<String> {
    Compiler::new(source, settings)?.run()
}

/// State of one translation pass. Owns the emitter (and through it the
/// output buffer), the label stack and the pending-instruction accumulator;
/// none of them outlive the pass.
struct Compiler<'src> {
    source: &'src [u8],
    emitter: Emitter,
    labels: LabelStack,
    pending: Pending,
    owed: Owed,
}

impl<'src> Compiler<'src> {
    /// Pre-scan the source for loop openers and set up the pass.
    fn new(source: &'src str, settings: &Settings) -> CompileResult<Self> {
        debug_assert!(settings.tape_len > 0, "tape length must be nonzero");

        let source = source.as_bytes();
        let openers = source.iter().filter(|&&b| b == b'[').count();
        log::debug!("pre-scan: {} bytes, {} loop openers", source.len(), openers);

        Ok(Compiler {
            source,
            emitter: Emitter::new(settings)?,
            labels: LabelStack::with_opener_count(openers)?,
            pending: Pending::Empty,
            owed: Owed::default(),
        })
    }

    /// Run the scan and hand back the finished assembly text.
    fn run(mut self) -> CompileResult<String> {
        log::info!("🔧 Compiling {} bytes of Brainfuck source", self.source.len());

        self.emitter.emit_prologue()?;

        let source = self.source;
        for (position, &ch) in source.iter().enumerate() {
            match ch {
                b'>' | b'<' | b'+' | b'-' => {
                    if self.pending.fuse(ch) {
                        continue;
                    }
                    self.flush()?;
                    self.pending = match ch {
                        b'>' => Pending::Move(1),
                        b'<' => Pending::Move(-1),
                        b'+' => Pending::Delta(1),
                        _ => Pending::Delta(-1),
                    };
                }
                b'.' => {
                    self.flush()?;
                    self.pending = Pending::Write;
                }
                b',' => {
                    self.flush()?;
                    self.pending = Pending::Read;
                }
                b'[' => {
                    self.flush()?;
                    let label = self.labels.open();
                    log::trace!("loop {} opens at byte {}", label, position);
                    self.pending = Pending::LoopOpen(label);
                }
                b']' => {
                    self.flush()?;
                    let label = self
                        .labels
                        .close()
                        .ok_or(CompileError::UnmatchedCloser { position })?;
                    log::trace!("loop {} closes at byte {}", label, position);
                    self.pending = Pending::LoopClose(label);
                }
                // Comment byte: skipped without flushing, so it cannot break
                // up a fusable run.
                _ => {}
            }
        }

        if self.pending == Pending::Empty {
            return Err(CompileError::NoCode);
        }
        self.flush()?;

        let open = self.labels.depth();
        if open > 0 {
            return Err(CompileError::UnclosedLoop { open });
        }

        self.emitter.emit_epilogue()?;

        log::debug!("📊 Emitted {} bytes of assembly", self.emitter.len());
        Ok(self.emitter.finish())
    }

    /// Emit the pending instruction, materializing the owed side effects it
    /// depends on and recording the ones it leaves behind.
    fn flush(&mut self) -> CompileResult<()> {
        match self.pending {
            Pending::Empty => Ok(()),

            Pending::Move(cells) => {
                // The dirty register must reach the old cell before the
                // pointer leaves it; the new cell's address and value are
                // owed until something needs them.
                if self.owed.store {
                    self.emitter.emit_store()?;
                    self.owed.store = false;
                }
                self.emitter.emit_move(cells)?;
                self.owed.load = true;
                self.owed.recompute = true;
                Ok(())
            }

            Pending::Delta(amount) => {
                // Address before value: the load reads through r14.
                if self.owed.recompute {
                    self.emitter.emit_recompute()?;
                    self.owed.recompute = false;
                }
                if self.owed.load {
                    self.emitter.emit_load()?;
                    self.owed.load = false;
                }
                self.emitter.emit_delta(amount)?;
                self.owed.store = true;
                Ok(())
            }

            Pending::Write => {
                // The syscall reads memory directly: the true value must be
                // in the cell and r14 must point at it.
                if self.owed.store {
                    self.emitter.emit_store()?;
                    self.owed.store = false;
                }
                if self.owed.recompute {
                    self.emitter.emit_recompute()?;
                    self.owed.recompute = false;
                }
                self.emitter.emit_write()
            }

            Pending::Read => {
                if self.owed.recompute {
                    self.emitter.emit_recompute()?;
                    self.owed.recompute = false;
                }
                self.emitter.emit_read()?;
                // The syscall rewrote the cell: the cached register is stale,
                // and a pending store would clobber the fresh byte.
                self.owed.load = true;
                self.owed.store = false;
                Ok(())
            }

            Pending::LoopOpen(label) => {
                self.settle_for_test()?;
                self.emitter.emit_loop_open(label)
            }

            Pending::LoopClose(label) => {
                self.settle_for_test()?;
                self.emitter.emit_loop_close(label)
            }
        }
    }

    /// Materialize every owed effect. The working register holds the true
    /// cell value afterwards, which a loop test requires.
    fn settle_for_test(&mut self) -> CompileResult<()> {
        if self.owed.store {
            self.emitter.emit_store()?;
            self.owed.store = false;
        }
        if self.owed.recompute {
            self.emitter.emit_recompute()?;
            self.owed.recompute = false;
        }
        if self.owed.load {
            self.emitter.emit_load()?;
            self.owed.load = false;
        }
        Ok(())
    }
}
