//! Fixed-capacity input line

/// Longest accepted line, terminator excluded
pub const LINE_SIZE: usize = 256;

/// Line input buffer. Bytes past capacity are dropped and remembered as an
/// overflow until the next clear.
pub struct LineBuffer {
    buf: [u8; LINE_SIZE],
    len: usize,
    overflowed: bool,
}

impl LineBuffer {
    /// Create empty buffer
    pub const fn new() -> Self {
        Self {
            buf: [0u8; LINE_SIZE],
            len: 0,
            overflowed: false,
        }
    }

    /// Push a byte
    pub fn push(&mut self, c: u8) {
        if self.len < LINE_SIZE {
            self.buf[self.len] = c;
            self.len += 1;
        } else {
            self.overflowed = true;
        }
    }

    /// Remove last byte
    pub fn backspace(&mut self) {
        if self.len > 0 {
            self.len -= 1;
        }
    }

    /// Clear buffer and overflow flag
    pub fn clear(&mut self) {
        self.len = 0;
        self.overflowed = false;
    }

    /// Buffer as text; non-UTF-8 input reads as empty
    pub fn as_str(&self) -> &str {
        core::str::from_utf8(&self.buf[..self.len]).unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// More bytes arrived than fit since the last clear
    pub fn overflowed(&self) -> bool {
        self.overflowed
    }
}

impl Default for LineBuffer {
    fn default() -> Self {
        Self::new()
    }
}
