//! Serial console speaking the Grbl line protocol
//!
//! One line is fully dispatched before the next byte is consumed.

pub mod console;
pub mod line_buffer;

pub use console::{Console, VERSION};
pub use line_buffer::{LineBuffer, LINE_SIZE};
