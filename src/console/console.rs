//! Grbl protocol console: assembles bytes into lines and answers each one
//! with `ok` or `error:N`.

use core::fmt::Write;

use super::LineBuffer;
use crate::dispatch::{self, Context};
use crate::status::{write_status, CommandResult, Status};

/// Version string (set by build.rs, includes git hash)
pub const VERSION: &str = env!("VERSION_STRING");

/// Line assembler for one transport
pub struct Console {
    line: LineBuffer,
}

impl Console {
    /// Create new console
    pub const fn new() -> Self {
        Self { line: LineBuffer::new() }
    }

    /// Process a single input byte
    ///
    /// Returns Some(result) when a non-empty line completed; the
    /// acknowledgement has already been written to `ctx.out`.
    pub fn process_byte(&mut self, byte: u8, ctx: &mut Context<'_>) -> Option<CommandResult> {
        match byte {
            b'\r' | b'\n' => {
                if self.line.is_empty() && !self.line.overflowed() {
                    return None;
                }
                let result = if self.line.overflowed() {
                    Err(Status::Overflow)
                } else {
                    execute(self.line.as_str(), ctx)
                };
                self.line.clear();
                write_status(ctx.out, result);
                Some(result)
            }

            // Backspace / DEL
            0x08 | 0x7F => {
                self.line.backspace();
                None
            }

            // Printable character
            0x20..=0x7E => {
                self.line.push(byte);
                None
            }

            _ => None,
        }
    }

    /// Feed a whole chunk, returning how many lines completed
    pub fn process(&mut self, bytes: &[u8], ctx: &mut Context<'_>) -> usize {
        bytes
            .iter()
            .filter_map(|b| self.process_byte(*b, ctx))
            .count()
    }

    /// Print welcome banner
    pub fn print_banner(&self, ctx: &mut Context<'_>) {
        let _ = write!(ctx.out, "\r\nGrbl {} ['$' for help]\r\n", VERSION);
    }
}

impl Default for Console {
    fn default() -> Self {
        Self::new()
    }
}

/// `$`/`[` lines go to the command dispatcher, the rest to the interpreter
fn execute(line: &str, ctx: &mut Context<'_>) -> CommandResult {
    let line = line.trim();
    match line.as_bytes().first() {
        Some(b'$') | Some(b'[') => dispatch::execute_line(line, ctx),
        _ => ctx.machine.execute_line(line, ctx.client),
    }
}
