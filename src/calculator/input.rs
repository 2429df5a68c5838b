//! The literal being typed on the keypad.

use std::fmt;

use super::format::{ERROR_TEXT, NumberFormatter};

/// A single decimal digit key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Digit(u8);

impl Digit {
    pub fn new(value: u8) -> Option<Self> {
        (value <= 9).then_some(Self(value))
    }

    pub fn from_char(c: char) -> Option<Self> {
        c.to_digit(10).map(|d| Self(d as u8))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn as_char(self) -> char {
        char::from(b'0' + self.0)
    }
}

impl fmt::Display for Digit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Buffer of the literal under construction, without grouping separators.
#[derive(Clone, Debug)]
pub struct InputAccumulator {
    buffer: String,
}

impl Default for InputAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

impl InputAccumulator {
    pub fn new() -> Self {
        Self {
            buffer: "0".to_string(),
        }
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Append a digit, or start over with it when `fresh` is set.
    ///
    /// Presses beyond `max_digits` significant digits are ignored.
    pub fn append_digit(&mut self, digit: Digit, fresh: bool, fmt: &NumberFormatter) -> String {
        if fresh {
            self.buffer = digit.as_char().to_string();
        } else {
            let digit_count = self.buffer.chars().filter(char::is_ascii_digit).count();
            if digit_count >= fmt.config().max_digits {
                return fmt.format_input(&self.buffer);
            }

            if self.buffer == "0" {
                self.buffer.clear();
            }
            self.buffer.push(digit.as_char());
        }

        fmt.format_input(&self.buffer)
    }

    /// Append the decimal separator. At most one ever appears in the buffer.
    pub fn append_decimal(&mut self, fresh: bool, fmt: &NumberFormatter) -> String {
        let separator = fmt.decimal_separator();

        if fresh {
            self.buffer = format!("0{}", separator);
        } else if !self.buffer.contains(separator) {
            self.buffer.push(separator);
        }

        fmt.format_input(&self.buffer)
    }

    /// Drop the last character of what is currently displayed.
    ///
    /// Works on the visible text rather than on the buffer, which is
    /// resynchronized to the result.
    pub fn backspace(&mut self, display_text: &str, fmt: &NumberFormatter) -> String {
        let current = fmt.strip_grouping(display_text);

        if current == ERROR_TEXT || current.chars().count() <= 1 || current == "0" {
            self.reset();
            return self.buffer.clone();
        }

        let mut edited = current;
        edited.pop();

        // A lone sign has nothing left to show
        if edited == "-" {
            self.reset();
            return self.buffer.clone();
        }

        self.buffer = edited;
        fmt.format_input(&self.buffer)
    }

    /// Take over whatever text is displayed, e.g. after a sign flip.
    pub fn sync(&mut self, display_text: &str, fmt: &NumberFormatter) {
        self.buffer = fmt.strip_grouping(display_text);
    }

    pub fn reset(&mut self) {
        self.buffer = "0".to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(c: char) -> Digit {
        Digit::from_char(c).unwrap()
    }

    fn type_digits(input: &mut InputAccumulator, digits: &str, fmt: &NumberFormatter) -> String {
        let mut shown = String::new();
        for c in digits.chars() {
            shown = input.append_digit(d(c), false, fmt);
        }
        shown
    }

    #[test]
    fn test_digit_construction() {
        assert_eq!(Digit::new(9).map(Digit::as_char), Some('9'));
        assert_eq!(Digit::new(10), None);
        assert_eq!(Digit::from_char('x'), None);
        assert_eq!(d('0').value(), 0);
    }

    #[test]
    fn test_leading_zero_is_replaced() {
        let fmt = NumberFormatter::default();
        let mut input = InputAccumulator::new();
        assert_eq!(input.append_digit(d('0'), false, &fmt), "0");
        assert_eq!(input.append_digit(d('7'), false, &fmt), "7");
        assert_eq!(input.buffer(), "7");
    }

    #[test]
    fn test_grouping_while_typing() {
        let fmt = NumberFormatter::default();
        let mut input = InputAccumulator::new();
        assert_eq!(type_digits(&mut input, "1234567", &fmt), "1.234.567");
        assert_eq!(input.buffer(), "1234567");
    }

    #[test]
    fn test_digit_limit() {
        let fmt = NumberFormatter::default();
        let mut input = InputAccumulator::new();
        let full = type_digits(&mut input, "1234567890123456", &fmt);
        assert_eq!(input.append_digit(d('7'), false, &fmt), full);
        assert_eq!(input.buffer(), "1234567890123456");
    }

    #[test]
    fn test_digit_limit_ignores_separator_and_sign() {
        let fmt = NumberFormatter::default();
        let mut input = InputAccumulator::new();
        input.sync("-1,5", &fmt);
        let shown = type_digits(&mut input, "12345678901234", &fmt);
        assert_eq!(shown, "-1,512345678901234");
        assert_eq!(input.append_digit(d('9'), false, &fmt), shown);
    }

    #[test]
    fn test_fresh_digit_replaces_buffer() {
        let fmt = NumberFormatter::default();
        let mut input = InputAccumulator::new();
        type_digits(&mut input, "42", &fmt);
        assert_eq!(input.append_digit(d('3'), true, &fmt), "3");
    }

    #[test]
    fn test_single_decimal_separator() {
        let fmt = NumberFormatter::default();
        let mut input = InputAccumulator::new();
        input.append_digit(d('5'), false, &fmt);
        assert_eq!(input.append_decimal(false, &fmt), "5,");
        assert_eq!(input.append_decimal(false, &fmt), "5,");
        assert_eq!(input.append_digit(d('2'), false, &fmt), "5,2");
        assert_eq!(input.append_decimal(true, &fmt), "0,");
    }

    #[test]
    fn test_backspace() {
        let fmt = NumberFormatter::default();
        let mut input = InputAccumulator::new();
        assert_eq!(input.backspace("1.234,5", &fmt), "1.234,");
        assert_eq!(input.backspace("1.234", &fmt), "123");
        assert_eq!(input.buffer(), "123");
        assert_eq!(input.backspace("7", &fmt), "0");
        assert_eq!(input.backspace("0", &fmt), "0");
        assert_eq!(input.backspace("-7", &fmt), "0");
        assert_eq!(input.backspace("Error", &fmt), "0");
        assert_eq!(input.buffer(), "0");
    }
}
