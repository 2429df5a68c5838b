//! Keypad calculator core.
//!
//! This module provides:
//! - Number formatting between values and localized display text
//! - The literal accumulator used while typing
//! - The state machine driving the display and history
//! - Copying results to the clipboard

mod clipboard;
mod engine;
mod format;
mod input;
mod operand;
mod ports;

pub use clipboard::{ClipboardError, copy_to_clipboard};
pub use engine::{Calculator, CalculatorState, Event};
pub use format::{
    ERROR_TEXT, FormatConfig, Locale, MAX_DIGITS, MAX_FRACTION_DIGITS, NumberFormatter,
};
pub use input::{Digit, InputAccumulator};
pub use operand::{ArithmeticError, Operand, Operator, apply, percent, square_root};
pub use ports::{DisplayPort, HistorySink};
