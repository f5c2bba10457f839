// This module provides the x86-64 NASM text emission backend for the bfcomp translator.
// Emitter is the core component that turns translator decisions into assembly text: tape
// pointer moves (modular arithmetic keeping the logical pointer inside the circular tape),
// cell arithmetic at the configured operand width, single-byte read/write syscalls, the
// compare-and-jump pairs framing loops, and the lazy materializations (register store,
// register load, base-address recompute) the translator owes between instructions. It also
// emits the program framing: a prologue reserving and zero-filling the .bss tape and
// initializing the pointer registers, and an epilogue issuing the exit syscall. Register
// conventions: r13 holds the logical pointer as a byte offset, r14 caches the absolute
// cell address, and the working register is the r12 slice matching the cell width. All
// text goes through the headroom-checked CodeBuffer so allocation failure is a typed error.

//! x86-64 NASM text emission.
//!
//! One method per distinct code block the translator can emit. The emitted
//! program is freestanding: raw syscalls, a `.bss` tape, one `_start` entry.

use crate::core::buffer::CodeBuffer;
use crate::core::error::CompileResult;
use crate::core::labels::Label;
use crate::core::settings::Settings;

/// NASM text emitter for one compilation pass.
///
/// Owns the output buffer; `finish` hands the accumulated text back.
pub struct Emitter {
    /// Accumulated assembly text.
    buf: CodeBuffer,
    /// Read-only pass configuration (tape geometry, cell width tokens).
    settings: Settings,
}

impl Emitter {
    /// Create an emitter with a fresh output buffer.
    pub fn new(settings: &Settings) -> CompileResult<Self> {
        Ok(Emitter {
            buf: CodeBuffer::new()?,
            settings: settings.clone(),
        })
    }

    /// Bytes of assembly text emitted so far.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Hand the accumulated assembly text to the caller.
    pub fn finish(self) -> String {
        self.buf.finish()
    }

    /// Emit the program framing that precedes the first instruction.
    ///
    /// Reserves the tape in `.bss`, zero-fills it with `rep stos`, and zeroes
    /// the logical pointer (`r13`), the working register and the cached cell
    /// address (`r14` = start of tape).
    pub fn emit_prologue(&mut self) -> CompileResult<()> {
        let width = self.settings.width;
        self.buf.append_fmt(format_args!(
            "section .bss\n\
             tape: res{letter} {len}\n\
             section .text\n\
             global _start\n\
             _start:\n\
             mov rdi, tape\n\
             mov rcx, {len}\n\
             xor rax, rax\n\
             rep stos{letter}\n\
             xor r13, r13\n\
             xor {reg}, {reg}\n\
             mov r14, tape\n",
            letter = width.letter(),
            len = self.settings.tape_len,
            reg = width.reg(),
        ))
    }

    /// Emit the exit syscall terminating the program.
    pub fn emit_epilogue(&mut self) -> CompileResult<()> {
        self.buf.append(
            "mov rax, 0x3c\n\
             mov rdi, 0\n\
             syscall\n",
        )
    }

    /// Persist the working register to the currently addressed cell.
    pub fn emit_store(&mut self) -> CompileResult<()> {
        let width = self.settings.width;
        self.buf.append_fmt(format_args!(
            "mov {unit} [r14], {reg}\n",
            unit = width.unit(),
            reg = width.reg(),
        ))
    }

    /// Load the currently addressed cell into the working register.
    pub fn emit_load(&mut self) -> CompileResult<()> {
        let width = self.settings.width;
        self.buf.append_fmt(format_args!(
            "mov {reg}, {unit} [r14]\n",
            reg = width.reg(),
            unit = width.unit(),
        ))
    }

    /// Recompute the absolute cell address from the logical pointer.
    pub fn emit_recompute(&mut self) -> CompileResult<()> {
        self.buf.append(
            "mov r14, tape\n\
             add r14, r13\n",
        )
    }

    /// Move the logical pointer by `cells`, wrapping on the circular tape.
    ///
    /// `r13` is a byte offset. The emitted sequence adds a pre-normalized
    /// non-negative displacement and reduces modulo the tape's byte length
    /// with an unsigned `div`, so the result is always in `[0, len*width)`
    /// and moving left of cell 0 lands on the last cell.
    pub fn emit_move(&mut self, cells: i64) -> CompileResult<()> {
        // Wide intermediates: `(cells % len + len) * width` must not wrap
        // for any configured tape length.
        let len = self.settings.tape_len as i128;
        let width = self.settings.width.bytes() as i128;
        let displacement = (cells as i128 % len + len) * width;
        let modulus = len * width;

        self.buf.append_fmt(format_args!(
            "mov rax, r13\n\
             add rax, {displacement}\n\
             mov rcx, {modulus}\n\
             xor rdx, rdx\n\
             div rcx\n\
             mov r13, rdx\n",
        ))
    }

    /// Add a fused signed delta to the working register.
    ///
    /// Cell wraparound is the hardware's: the add/sub runs at the configured
    /// operand width and overflow simply wraps there.
    pub fn emit_delta(&mut self, amount: i64) -> CompileResult<()> {
        let reg = self.settings.width.reg();
        let (mnemonic, magnitude) = if amount < 0 {
            ("sub", amount.unsigned_abs())
        } else {
            ("add", amount as u64)
        };
        self.buf
            .append_fmt(format_args!("{mnemonic} {reg}, {magnitude}\n"))
    }

    /// Write the byte at the addressed cell to stdout.
    pub fn emit_write(&mut self) -> CompileResult<()> {
        self.buf.append(
            "mov rax, 1\n\
             mov rdi, 1\n\
             mov rsi, r14\n\
             mov rdx, 1\n\
             syscall\n",
        )
    }

    /// Read one byte from stdin into the addressed cell.
    pub fn emit_read(&mut self) -> CompileResult<()> {
        self.buf.append(
            "mov rax, 0\n\
             mov rdi, 0\n\
             mov rsi, r14\n\
             mov rdx, 1\n\
             syscall\n",
        )
    }

    /// Emit the loop head: skip past the matching close when the cell is
    /// zero, then place the open label.
    pub fn emit_loop_open(&mut self, label: Label) -> CompileResult<()> {
        let reg = self.settings.width.reg();
        self.buf.append_fmt(format_args!(
            "cmp {reg}, 0\n\
             je endloop{label}\n\
             loop{label}:\n",
        ))
    }

    /// Emit the loop tail: jump back to the open label while the cell is
    /// nonzero, then place the close label.
    pub fn emit_loop_close(&mut self, label: Label) -> CompileResult<()> {
        let reg = self.settings.width.reg();
        self.buf.append_fmt(format_args!(
            "cmp {reg}, 0\n\
             jne loop{label}\n\
             endloop{label}:\n",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::settings::CellWidth;

    fn emitter() -> Emitter {
        Emitter::new(&Settings::default()).unwrap()
    }

    #[test]
    fn test_prologue_default_width() {
        let mut e = emitter();
        e.emit_prologue().unwrap();
        let text = e.finish();

        assert!(text.starts_with("section .bss\ntape: resb 30000\n"));
        assert!(text.contains("global _start\n_start:\n"));
        assert!(text.contains("mov rcx, 30000\nxor rax, rax\nrep stosb\n"));
        assert!(text.contains("xor r13, r13\nxor r12b, r12b\nmov r14, tape\n"));
    }

    #[test]
    fn test_prologue_word_width() {
        let settings = Settings {
            tape_len: 500,
            width: CellWidth::Word,
        };
        let mut e = Emitter::new(&settings).unwrap();
        e.emit_prologue().unwrap();
        let text = e.finish();

        assert!(text.contains("tape: resw 500\n"));
        assert!(text.contains("rep stosw\n"));
        assert!(text.contains("xor r12w, r12w\n"));
    }

    #[test]
    fn test_move_displacement_is_normalized() {
        let mut e = emitter();
        e.emit_move(1).unwrap();
        let text = e.finish();

        // 1 % 30000 + 30000 = 30001, reduced modulo 30000 at run time.
        assert_eq!(
            text,
            "mov rax, r13\nadd rax, 30001\nmov rcx, 30000\nxor rdx, rdx\ndiv rcx\nmov r13, rdx\n"
        );
    }

    #[test]
    fn test_move_left_stays_non_negative() {
        let mut e = emitter();
        e.emit_move(-1).unwrap();
        let text = e.finish();

        // -1 % 30000 + 30000 = 29999: the displacement is never negative.
        assert!(text.contains("add rax, 29999\n"));
    }

    #[test]
    fn test_move_scales_by_cell_width() {
        let settings = Settings {
            tape_len: 100,
            width: CellWidth::Dword,
        };
        let mut e = Emitter::new(&settings).unwrap();
        e.emit_move(3).unwrap();
        let text = e.finish();

        // (3 % 100 + 100) * 4 = 412, modulo 100 * 4 = 400.
        assert!(text.contains("add rax, 412\n"));
        assert!(text.contains("mov rcx, 400\n"));
    }

    #[test]
    fn test_delta_sign_selects_mnemonic() {
        let mut e = emitter();
        e.emit_delta(4).unwrap();
        e.emit_delta(-7).unwrap();
        e.emit_delta(0).unwrap();
        let text = e.finish();

        assert_eq!(text, "add r12b, 4\nsub r12b, 7\nadd r12b, 0\n");
    }

    #[test]
    fn test_loop_pair_text() {
        let mut e = emitter();
        e.emit_loop_open(2).unwrap();
        e.emit_loop_close(2).unwrap();
        let text = e.finish();

        assert_eq!(
            text,
            "cmp r12b, 0\nje endloop2\nloop2:\ncmp r12b, 0\njne loop2\nendloop2:\n"
        );
    }

    #[test]
    fn test_syscall_blocks() {
        let mut e = emitter();
        e.emit_write().unwrap();
        e.emit_read().unwrap();
        e.emit_epilogue().unwrap();
        let text = e.finish();

        assert!(text.starts_with("mov rax, 1\nmov rdi, 1\nmov rsi, r14\nmov rdx, 1\nsyscall\n"));
        assert!(text.contains("mov rax, 0\nmov rdi, 0\nmov rsi, r14\nmov rdx, 1\nsyscall\n"));
        assert!(text.ends_with("mov rax, 0x3c\nmov rdi, 0\nsyscall\n"));
    }

    #[test]
    fn test_store_load_use_width_tokens() {
        let settings = Settings {
            tape_len: 30000,
            width: CellWidth::Qword,
        };
        let mut e = Emitter::new(&settings).unwrap();
        e.emit_store().unwrap();
        e.emit_load().unwrap();
        let text = e.finish();

        assert_eq!(text, "mov qword [r14], r12\nmov r12, qword [r14]\n");
    }
}
