//! Collaborators the calculator talks to.

/// Where the current value and the equation line are shown.
pub trait DisplayPort {
    /// Show `text` as the current value.
    fn set_value(&mut self, text: &str);
    /// Show `text` on the equation line.
    fn set_equation(&mut self, text: &str);
    /// Blank the equation line.
    fn clear_equation(&mut self);
}

/// Ordered record of completed equations.
pub trait HistorySink {
    /// Record a finished equation and its formatted result.
    fn append(&mut self, equation: &str, result: &str);
    /// Forget every recorded entry.
    fn clear(&mut self);
}

impl<T: DisplayPort + ?Sized> DisplayPort for &mut T {
    fn set_value(&mut self, text: &str) {
        (**self).set_value(text);
    }

    fn set_equation(&mut self, text: &str) {
        (**self).set_equation(text);
    }

    fn clear_equation(&mut self) {
        (**self).clear_equation();
    }
}

impl<T: HistorySink + ?Sized> HistorySink for &mut T {
    fn append(&mut self, equation: &str, result: &str) {
        (**self).append(equation, result);
    }

    fn clear(&mut self) {
        (**self).clear();
    }
}
