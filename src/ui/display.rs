//! In-memory display used by the terminal front end.

use crate::calculator::{DisplayPort, NumberFormatter};

/// Keeps the value and equation line the calculator last pushed.
#[derive(Clone, Debug)]
pub struct BufferDisplay {
    formatter: NumberFormatter,
    value: String,
    equation: Option<String>,
}

impl BufferDisplay {
    pub fn new(formatter: NumberFormatter) -> Self {
        Self {
            formatter,
            value: "0".to_string(),
            equation: None,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn equation(&self) -> Option<&str> {
        self.equation.as_deref()
    }

    /// Parse the shown value back into a number.
    pub fn current_numeric_value(&self) -> f64 {
        self.formatter.parse(&self.value)
    }
}

impl DisplayPort for BufferDisplay {
    fn set_value(&mut self, text: &str) {
        self.value = text.to_string();
    }

    fn set_equation(&mut self, text: &str) {
        self.equation = Some(text.to_string());
    }

    fn clear_equation(&mut self) {
        self.equation = None;
    }
}
