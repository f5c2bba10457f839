//! Compilation settings.
//!
//! An explicit, read-only configuration value passed into each translation
//! call. Nothing here is global: two sequential compilations may share one
//! `Settings` or use different ones, and the translator never mutates it.

/// Tape length used when the caller does not pick one.
pub const DEFAULT_TAPE_LEN: u64 = 30000;

/// Width of one tape cell, together with the x86-64 tokens derived from it.
///
/// The working register is the matching slice of `r12`: `syscall` clobbers
/// `rax`, `rcx` and `r11`, and the pointer-move sequence clobbers `rax`,
/// `rcx` and `rdx`, so the cached cell value lives in a register none of
/// those touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellWidth {
    /// 1-byte cells (the classic Brainfuck tape).
    #[default]
    Byte,
    /// 2-byte cells.
    Word,
    /// 4-byte cells.
    Dword,
    /// 8-byte cells.
    Qword,
}

impl CellWidth {
    /// Map a byte count to a width. Anything outside {1, 2, 4, 8} is
    /// rejected here, before a translation pass ever sees it.
    pub fn from_bytes(bytes: u64) -> Option<Self> {
        match bytes {
            1 => Some(CellWidth::Byte),
            2 => Some(CellWidth::Word),
            4 => Some(CellWidth::Dword),
            8 => Some(CellWidth::Qword),
            _ => None,
        }
    }

    /// Cell size in bytes.
    pub fn bytes(self) -> u64 {
        match self {
            CellWidth::Byte => 1,
            CellWidth::Word => 2,
            CellWidth::Dword => 4,
            CellWidth::Qword => 8,
        }
    }

    /// NASM operand-size keyword for memory accesses of this width.
    pub fn unit(self) -> &'static str {
        match self {
            CellWidth::Byte => "byte",
            CellWidth::Word => "word",
            CellWidth::Dword => "dword",
            CellWidth::Qword => "qword",
        }
    }

    /// Working register holding the current cell value.
    pub fn reg(self) -> &'static str {
        match self {
            CellWidth::Byte => "r12b",
            CellWidth::Word => "r12w",
            CellWidth::Dword => "r12d",
            CellWidth::Qword => "r12",
        }
    }

    /// Size suffix shared by the `res` reservation directive and the
    /// `rep stos` fill in the prologue.
    pub fn letter(self) -> char {
        match self {
            CellWidth::Byte => 'b',
            CellWidth::Word => 'w',
            CellWidth::Dword => 'd',
            CellWidth::Qword => 'q',
        }
    }
}

/// Read-only parameters for one compilation pass.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Number of cells on the tape. Must be positive; the CLI enforces that
    /// and debug builds assert it at the start of a pass.
    pub tape_len: u64,
    /// Cell width, deciding the operand-size keyword and working register in
    /// every cell-touching emission.
    pub width: CellWidth,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            tape_len: DEFAULT_TAPE_LEN,
            width: CellWidth::Byte,
        }
    }
}
