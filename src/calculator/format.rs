//! Number formatting for the calculator display.
//!
//! Converts between numeric values and the localized text shown on screen
//! (grouping separators, a configurable decimal separator and a bounded
//! number of fractional digits).

use serde::{Deserialize, Serialize};

use super::operand::Operand;

/// Text shown in place of a number after a failed operation.
pub const ERROR_TEXT: &str = "Error";

/// Maximum number of significant digits accepted while typing.
pub const MAX_DIGITS: usize = 16;

/// Maximum number of fractional digits shown for a computed value.
pub const MAX_FRACTION_DIGITS: usize = 10;

/// Largest magnitude below which every integer is exactly representable.
const EXACT_INTEGER_LIMIT: f64 = 9_007_199_254_740_992.0;

/// Separator presets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// `1.234,5`
    #[default]
    German,
    /// `1,234.5`
    English,
}

/// Formatting rules, fixed once a calculator is constructed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatConfig {
    /// Inserted every three integer digits.
    pub grouping_separator: char,
    /// Separates the integer part from the fraction.
    pub decimal_separator: char,
    /// Significant digits accepted while typing a literal.
    pub max_digits: usize,
    /// Fractional digits kept (rounded) when showing a computed value.
    pub max_fraction_digits: usize,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self::for_locale(Locale::German)
    }
}

impl FormatConfig {
    /// Separators of the given locale with the default digit limits.
    pub fn for_locale(locale: Locale) -> Self {
        let (grouping_separator, decimal_separator) = match locale {
            Locale::German => ('.', ','),
            Locale::English => (',', '.'),
        };

        Self {
            grouping_separator,
            decimal_separator,
            max_digits: MAX_DIGITS,
            max_fraction_digits: MAX_FRACTION_DIGITS,
        }
    }

    /// Replace only the separator pair, keeping the digit limits.
    pub fn with_locale(mut self, locale: Locale) -> Self {
        let preset = Self::for_locale(locale);
        self.grouping_separator = preset.grouping_separator;
        self.decimal_separator = preset.decimal_separator;
        self
    }
}

/// Pure conversions between numbers and display text.
#[derive(Clone, Debug, Default)]
pub struct NumberFormatter {
    config: FormatConfig,
}

impl NumberFormatter {
    pub fn new(config: FormatConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FormatConfig {
        &self.config
    }

    pub fn decimal_separator(&self) -> char {
        self.config.decimal_separator
    }

    /// Format an operand for display.
    ///
    /// Returns [`ERROR_TEXT`] for the error marker.
    pub fn format(&self, value: Operand) -> String {
        match value {
            Operand::Value(v) => self.format_value(v),
            Operand::Error => ERROR_TEXT.to_string(),
        }
    }

    /// Format a raw number, rounding to at most `max_fraction_digits` and
    /// dropping trailing zeros. Non-finite values render as [`ERROR_TEXT`].
    pub fn format_value(&self, value: f64) -> String {
        if !value.is_finite() {
            return ERROR_TEXT.to_string();
        }

        let rendered = self.render_decimal(value.abs());
        let (int_part, frac_part) = match rendered.split_once('.') {
            Some((int_part, frac_part)) => (int_part, frac_part.trim_end_matches('0')),
            None => (rendered.as_str(), ""),
        };

        // Values that round to zero lose their sign
        let is_zero = frac_part.is_empty() && int_part.bytes().all(|b| b == b'0');

        let mut result = String::new();
        if value.is_sign_negative() && !is_zero {
            result.push('-');
        }
        result.push_str(&self.group_digits(int_part));
        if !frac_part.is_empty() {
            result.push(self.config.decimal_separator);
            result.push_str(frac_part);
        }
        result
    }

    /// Parse display text back into a number.
    ///
    /// The error marker and anything unparsable read back as `0`.
    pub fn parse(&self, text: &str) -> f64 {
        if text == ERROR_TEXT {
            return 0.0;
        }

        let normalized: String = text
            .trim()
            .chars()
            .filter(|&c| c != self.config.grouping_separator)
            .map(|c| if c == self.config.decimal_separator { '.' } else { c })
            .collect();

        normalized
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .unwrap_or(0.0)
    }

    /// Format a literal that is still being typed.
    ///
    /// The integer part gets grouping separators, the decimal part (even an
    /// empty one) is reattached verbatim so `"5,"` stays visible.
    pub fn format_input(&self, buffer: &str) -> String {
        let (int_part, decimal_part) = match buffer.split_once(self.config.decimal_separator) {
            Some((int_part, decimal_part)) => (int_part, Some(decimal_part)),
            None => (buffer, None),
        };

        let (sign, digits) = match int_part.strip_prefix('-') {
            Some(rest) => ("-", rest),
            None => ("", int_part),
        };
        let digits = digits.trim_start_matches('0');
        let digits = if digits.is_empty() { "0" } else { digits };

        let mut formatted = format!("{}{}", sign, self.group_digits(digits));
        if let Some(decimal_part) = decimal_part {
            formatted.push(self.config.decimal_separator);
            formatted.push_str(decimal_part);
        }
        formatted
    }

    /// Remove every grouping separator from display text.
    pub fn strip_grouping(&self, text: &str) -> String {
        text.chars()
            .filter(|&c| c != self.config.grouping_separator)
            .collect()
    }

    /// Clipboard form of display text: raw number, `.` decimal, no grouping.
    ///
    /// The error marker is passed through so it can still be copied.
    pub fn plain(&self, text: &str) -> String {
        if text == ERROR_TEXT {
            return text.to_string();
        }

        let value = self.parse(text);
        let formatted = self.render_decimal(value);
        let trimmed = if formatted.contains('.') {
            formatted.trim_end_matches('0').trim_end_matches('.')
        } else {
            formatted.as_str()
        };

        match trimmed {
            "-0" => "0".to_string(),
            other => other.to_string(),
        }
    }

    /// Plain decimal rendering rounded to `max_fraction_digits`.
    ///
    /// Beyond 2^53 a double has no fractional digits and its exact binary
    /// expansion shows noise, so the shortest round-trip digits are used.
    fn render_decimal(&self, value: f64) -> String {
        if value.abs() >= EXACT_INTEGER_LIMIT {
            format!("{}", value)
        } else {
            format!("{:.*}", self.config.max_fraction_digits, value)
        }
    }

    /// Insert the grouping separator every three digits, counted from the right.
    fn group_digits(&self, digits: &str) -> String {
        let mut result = String::new();
        for (i, c) in digits.chars().rev().enumerate() {
            if i > 0 && i % 3 == 0 {
                result.push(self.config.grouping_separator);
            }
            result.push(c);
        }

        result.chars().rev().collect()
    }
}
