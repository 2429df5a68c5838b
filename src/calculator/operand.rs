//! Operands, operators and the arithmetic core.

use std::fmt;

use thiserror::Error;

/// Why an operation produced the error marker.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum ArithmeticError {
    #[error("cannot divide by zero")]
    DivisionByZero,

    #[error("cannot take the square root of a negative number")]
    NegativeSquareRoot,

    #[error("result is not finite")]
    NonFinite,

    #[error("operand is already an error")]
    ErrorOperand,
}

/// A finite number, or the marker left behind by a failed operation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Operand {
    Value(f64),
    Error,
}

impl Operand {
    /// Wrap a number, turning NaN and infinities into [`Operand::Error`].
    pub fn from_f64(value: f64) -> Self {
        if value.is_finite() {
            Self::Value(value)
        } else {
            Self::Error
        }
    }

    pub fn is_error(self) -> bool {
        matches!(self, Self::Error)
    }

    /// The numeric value, with the error marker reading back as `0`.
    pub fn value_or_zero(self) -> f64 {
        match self {
            Self::Value(v) => v,
            Self::Error => 0.0,
        }
    }
}

impl From<f64> for Operand {
    fn from(value: f64) -> Self {
        Self::from_f64(value)
    }
}

impl From<Result<f64, ArithmeticError>> for Operand {
    fn from(result: Result<f64, ArithmeticError>) -> Self {
        match result {
            Ok(value) => Self::from_f64(value),
            Err(err) => {
                tracing::warn!(error = %err, "arithmetic error");
                Self::Error
            }
        }
    }
}

/// Binary operators on the keypad.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operator {
    /// Glyph used in equation text.
    pub fn symbol(self) -> char {
        match self {
            Self::Add => '+',
            Self::Subtract => '−',
            Self::Multiply => '×',
            Self::Divide => '÷',
        }
    }

    /// Accepts both the ASCII keys and the display glyphs.
    pub fn from_symbol(c: char) -> Option<Self> {
        match c {
            '+' => Some(Self::Add),
            '-' | '−' => Some(Self::Subtract),
            '*' | '×' => Some(Self::Multiply),
            '/' | '÷' => Some(Self::Divide),
            _ => None,
        }
    }

    pub fn checked_apply(self, a: f64, b: f64) -> Result<f64, ArithmeticError> {
        let result = match self {
            Self::Add => a + b,
            Self::Subtract => a - b,
            Self::Multiply => a * b,
            Self::Divide => {
                if b == 0.0 {
                    return Err(ArithmeticError::DivisionByZero);
                }
                a / b
            }
        };

        if result.is_finite() {
            Ok(result)
        } else {
            Err(ArithmeticError::NonFinite)
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Apply a binary operator. Every failure is encoded as [`Operand::Error`].
pub fn apply(op: Operator, a: Operand, b: Operand) -> Operand {
    match (a, b) {
        (Operand::Value(a), Operand::Value(b)) => op.checked_apply(a, b).into(),
        _ => Operand::from(Err::<f64, _>(ArithmeticError::ErrorOperand)),
    }
}

/// Principal square root.
pub fn square_root(value: f64) -> Result<f64, ArithmeticError> {
    if value < 0.0 {
        Err(ArithmeticError::NegativeSquareRoot)
    } else {
        Ok(value.sqrt())
    }
}

pub fn percent(value: f64) -> Operand {
    Operand::from_f64(value / 100.0)
}
