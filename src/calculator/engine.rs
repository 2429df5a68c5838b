//! The calculator state machine.
//!
//! Turns keypad events into a running computation. Binary operators are
//! applied eagerly when chained, percent and square root are terminal
//! operations whose equation is replayed into the history by a following
//! equals press.

use super::format::NumberFormatter;
use super::input::{Digit, InputAccumulator};
use super::operand::{self, Operand, Operator};
use super::ports::{DisplayPort, HistorySink};

/// Bookkeeping between key presses.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CalculatorState {
    /// Left-hand value of a pending or just-completed operation.
    pub first_operand: Option<Operand>,
    /// Operator waiting for its right-hand operand.
    pub pending_operator: Option<Operator>,
    /// The next digit starts a new literal instead of appending.
    pub awaiting_new_operand: bool,
    /// Equals, percent or square root just produced a result.
    pub just_finalized: bool,
    /// Equation of the last percent/square root, replayed by equals.
    pub last_equation: Option<String>,
}

/// A single keypad action.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    Digit(Digit),
    DecimalPoint,
    Operator(Operator),
    Equals,
    Percent,
    SquareRoot,
    Negate,
    Clear,
    ClearEntry,
    Backspace,
}

/// Keypad state machine pushing its output into a display and a history.
pub struct Calculator<D, H> {
    formatter: NumberFormatter,
    input: InputAccumulator,
    state: CalculatorState,
    current: Operand,
    display_text: String,
    display: D,
    history: H,
}

impl<D: DisplayPort, H: HistorySink> Calculator<D, H> {
    /// Create a calculator showing `0` with an empty equation line.
    pub fn new(formatter: NumberFormatter, mut display: D, history: H) -> Self {
        let display_text = formatter.format_value(0.0);
        display.set_value(&display_text);
        display.clear_equation();

        Self {
            formatter,
            input: InputAccumulator::new(),
            state: CalculatorState::default(),
            current: Operand::Value(0.0),
            display_text,
            display,
            history,
        }
    }

    pub fn state(&self) -> &CalculatorState {
        &self.state
    }

    pub fn formatter(&self) -> &NumberFormatter {
        &self.formatter
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn history(&self) -> &H {
        &self.history
    }

    /// Text currently shown as the value.
    pub fn display_text(&self) -> &str {
        &self.display_text
    }

    /// The operand behind the displayed text.
    pub fn current(&self) -> Operand {
        self.current
    }

    /// Numeric value of the display; the error marker reads as `0`.
    pub fn current_value(&self) -> f64 {
        self.current.value_or_zero()
    }

    /// Dispatch a single keypad event to its handler.
    pub fn handle(&mut self, event: Event) {
        tracing::debug!(?event, display = %self.display_text, "handling event");

        match event {
            Event::Digit(digit) => self.digit(digit),
            Event::DecimalPoint => self.decimal_point(),
            Event::Operator(op) => self.operator(op),
            Event::Equals => self.equals(),
            Event::Percent => self.percent(),
            Event::SquareRoot => self.square_root(),
            Event::Negate => self.negate(),
            Event::Clear => self.clear(),
            Event::ClearEntry => self.clear_entry(),
            Event::Backspace => self.backspace(),
        }
    }

    /// Type a digit, starting a new literal after an operator or result.
    pub fn digit(&mut self, digit: Digit) {
        self.begin_literal();
        let fresh = std::mem::take(&mut self.state.awaiting_new_operand);
        let text = self.input.append_digit(digit, fresh, &self.formatter);
        self.show_input(text);
    }

    /// Type the decimal separator.
    pub fn decimal_point(&mut self) {
        self.begin_literal();
        let fresh = std::mem::take(&mut self.state.awaiting_new_operand);
        let text = self.input.append_decimal(fresh, &self.formatter);
        self.show_input(text);
    }

    /// Press a binary operator, applying any pending one first.
    pub fn operator(&mut self, op: Operator) {
        self.state.just_finalized = false;
        self.state.last_equation = None;

        let current = Operand::Value(self.current_value());

        match (self.state.first_operand, self.state.pending_operator) {
            (Some(first), Some(pending)) if !self.state.awaiting_new_operand => {
                let result = operand::apply(pending, first, current);
                self.record(self.binary_equation(first, pending, current), result);
                self.show_operand(result);
                self.state.first_operand = Some(result);
            }
            // Swapping the operator before a new operand keeps the left side
            (Some(_), Some(_)) => {}
            _ => self.state.first_operand = Some(current),
        }

        self.state.pending_operator = Some(op);
        self.state.awaiting_new_operand = true;

        let first = self.state.first_operand.unwrap_or(current);
        let equation = format!("{} {}", self.formatter.format(first), op);
        self.display.set_equation(&equation);
    }

    /// Finish the pending operation, or echo the current value.
    pub fn equals(&mut self) {
        let Some(pending) = self.state.pending_operator else {
            self.echo_equals();
            return;
        };

        let first = match self.state.first_operand {
            Some(first) if !self.state.awaiting_new_operand => first,
            _ => {
                tracing::debug!("equals without a second operand, ignoring");
                return;
            }
        };

        let second = Operand::Value(self.current_value());
        let result = operand::apply(pending, first, second);
        self.record(self.binary_equation(first, pending, second), result);
        self.show_operand(result);
        self.display.clear_equation();

        self.state = CalculatorState {
            first_operand: Some(result),
            pending_operator: None,
            awaiting_new_operand: true,
            just_finalized: true,
            last_equation: None,
        };
    }

    /// Divide the current value by 100 as a terminal operation.
    pub fn percent(&mut self) {
        let value = self.current_value();
        let equation = format!("percent({})", self.formatter.format_value(value));
        self.finish_unary(operand::percent(value), equation);
    }

    /// Take the square root of the current value as a terminal operation.
    pub fn square_root(&mut self) {
        let value = self.current_value();

        match operand::square_root(value) {
            Ok(root) => {
                let equation = format!("sqrt({})", self.formatter.format_value(value));
                self.finish_unary(Operand::from_f64(root), equation);
            }
            Err(err) => {
                tracing::warn!(error = %err, value, "square root failed");
                self.show_operand(Operand::Error);
                self.state.awaiting_new_operand = true;
                self.state.just_finalized = true;
                self.state.last_equation = None;
                self.state.pending_operator = None;
            }
        }
    }

    /// Flip the sign of the current value.
    pub fn negate(&mut self) {
        if self.state.just_finalized {
            self.state.just_finalized = false;
            self.state.last_equation = None;
        }

        let value = self.current_value();
        let negated = if value == 0.0 { 0.0 } else { -value };
        self.show_operand(Operand::Value(negated));
        self.input.sync(&self.display_text, &self.formatter);
    }

    /// Reset everything, including the history.
    pub fn clear(&mut self) {
        self.state = CalculatorState::default();
        self.input.reset();
        self.show_operand(Operand::Value(0.0));
        self.display.clear_equation();
        self.history.clear();
    }

    /// Reset only the current entry; a pending operation survives.
    pub fn clear_entry(&mut self) {
        self.input.reset();
        self.show_operand(Operand::Value(0.0));
        self.state.just_finalized = false;
        self.state.last_equation = None;
    }

    /// Drop the last displayed character.
    pub fn backspace(&mut self) {
        if self.state.just_finalized {
            self.reset_finalized();
        }

        let text = self.input.backspace(&self.display_text, &self.formatter);
        self.show_input(text);
    }

    /// Equals with nothing pending: echo the current value into the history.
    fn echo_equals(&mut self) {
        let value = self.current_value();
        let formatted = self.formatter.format_value(value);
        let equation = match self.state.last_equation.take() {
            Some(last) => format!("{} =", last),
            None => format!("{} =", formatted),
        };

        self.history.append(&equation, &formatted);
        self.display.set_equation(&equation);

        self.state.first_operand = Some(Operand::Value(value));
        self.state.pending_operator = None;
        self.state.awaiting_new_operand = true;
        self.state.just_finalized = true;
    }

    fn finish_unary(&mut self, result: Operand, equation: String) {
        self.show_operand(result);
        self.display.set_equation(&equation);

        self.state = CalculatorState {
            first_operand: Some(result),
            pending_operator: None,
            awaiting_new_operand: true,
            just_finalized: true,
            last_equation: Some(equation),
        };
    }

    /// Digit entry after a result starts a new computation.
    fn begin_literal(&mut self) {
        if self.state.just_finalized {
            self.reset_finalized();
        }
        self.state.last_equation = None;
    }

    fn reset_finalized(&mut self) {
        self.state.first_operand = None;
        self.state.pending_operator = None;
        self.state.just_finalized = false;
        self.state.last_equation = None;
        self.display.clear_equation();
    }

    fn binary_equation(&self, first: Operand, op: Operator, second: Operand) -> String {
        format!(
            "{} {} {} =",
            self.formatter.format(first),
            op,
            self.formatter.format(second)
        )
    }

    fn record(&mut self, equation: String, result: Operand) {
        let result = self.formatter.format(result);
        tracing::debug!(%equation, %result, "history entry");
        self.history.append(&equation, &result);
    }

    fn show_operand(&mut self, value: Operand) {
        self.current = value;
        self.display_text = self.formatter.format(value);
        self.display.set_value(&self.display_text);
    }

    fn show_input(&mut self, text: String) {
        self.current = Operand::Value(self.formatter.parse(&text));
        self.display.set_value(&text);
        self.display_text = text;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::History;
    use crate::keys::parse_keys;
    use crate::ui::BufferDisplay;

    type TestCalculator = Calculator<BufferDisplay, History>;

    fn calculator() -> TestCalculator {
        let formatter = NumberFormatter::default();
        Calculator::new(formatter.clone(), BufferDisplay::new(formatter), History::new())
    }

    fn press(calc: &mut TestCalculator, keys: &str) {
        for event in parse_keys(keys).unwrap() {
            calc.handle(event);
        }
    }

    fn run(keys: &str) -> TestCalculator {
        let mut calc = calculator();
        press(&mut calc, keys);
        calc
    }

    fn history(calc: &TestCalculator) -> Vec<(String, String)> {
        calc.history()
            .entries()
            .iter()
            .map(|e| (e.equation.clone(), e.result.clone()))
            .collect()
    }

    fn entry(equation: &str, result: &str) -> (String, String) {
        (equation.to_string(), result.to_string())
    }

    #[test]
    fn test_initial_state() {
        let calc = calculator();
        assert_eq!(calc.display_text(), "0");
        assert_eq!(calc.display().equation(), None);
        assert_eq!(calc.state(), &CalculatorState::default());
    }

    #[test]
    fn test_operator_sets_equation_without_touching_value() {
        for (key, glyph) in [('+', '+'), ('-', '−'), ('*', '×'), ('/', '÷')] {
            let calc = run(&format!("12{}", key));
            assert_eq!(calc.display_text(), "12");
            assert_eq!(calc.display().equation(), Some(format!("12 {}", glyph).as_str()));
            assert!(calc.history().is_empty());
        }
    }

    #[test]
    fn test_chained_operations() {
        let mut calc = run("5+3*");
        assert_eq!(calc.display_text(), "8");
        assert_eq!(calc.display().equation(), Some("8 ×"));

        press(&mut calc, "2=");
        assert_eq!(calc.display_text(), "16");
        assert_eq!(calc.display().equation(), None);
        assert_eq!(
            history(&calc),
            vec![entry("5 + 3 =", "8"), entry("8 × 2 =", "16")]
        );
    }

    #[test]
    fn test_swapping_operator_keeps_operand() {
        let calc = run("5+*3=");
        assert_eq!(calc.display_text(), "15");
        assert_eq!(history(&calc), vec![entry("5 × 3 =", "15")]);
    }

    #[test]
    fn test_equals_without_second_operand_is_ignored() {
        let calc = run("9+=");
        assert_eq!(calc.display_text(), "9");
        assert_eq!(calc.display().equation(), Some("9 +"));
        assert!(calc.history().is_empty());
    }

    #[test]
    fn test_square_root_then_equals() {
        let mut calc = run("9 sqrt");
        assert_eq!(calc.display_text(), "3");
        assert_eq!(calc.display().equation(), Some("sqrt(9)"));
        assert!(calc.history().is_empty());

        press(&mut calc, "=");
        assert_eq!(history(&calc), vec![entry("sqrt(9) =", "3")]);
        assert_eq!(calc.display().equation(), Some("sqrt(9) ="));
        assert_eq!(calc.state().last_equation, None);
    }

    #[test]
    fn test_percent_then_equals() {
        let calc = run("50%=");
        assert_eq!(calc.display_text(), "0,5");
        assert_eq!(history(&calc), vec![entry("percent(50) =", "0,5")]);
    }

    #[test]
    fn test_repeated_equals_echoes() {
        let calc = run("9 sqrt==");
        assert_eq!(
            history(&calc),
            vec![entry("sqrt(9) =", "3"), entry("3 =", "3")]
        );
    }

    #[test]
    fn test_result_chains_into_operator() {
        let calc = run("9 sqrt +1=");
        assert_eq!(calc.display_text(), "4");
        assert_eq!(history(&calc), vec![entry("3 + 1 =", "4")]);
    }

    #[test]
    fn test_negative_square_root() {
        let calc = run("4 neg sqrt");
        assert_eq!(calc.display_text(), "Error");
        assert!(calc.current().is_error());
        assert!(calc.state().just_finalized);
        assert_eq!(calc.state().last_equation, None);
        assert!(calc.history().is_empty());
    }

    #[test]
    fn test_division_by_zero_recovers_from_zero() {
        let mut calc = run("7/0=");
        assert_eq!(calc.display_text(), "Error");
        assert_eq!(history(&calc), vec![entry("7 ÷ 0 =", "Error")]);
        assert_eq!(calc.current_value(), 0.0);

        press(&mut calc, "+2=");
        assert_eq!(calc.display_text(), "2");
        assert_eq!(history(&calc)[1], entry("0 + 2 =", "2"));
    }

    #[test]
    fn test_digit_after_result_starts_over() {
        let mut calc = run("2+2=");
        press(&mut calc, "7");
        assert_eq!(calc.display_text(), "7");
        assert_eq!(calc.display().equation(), None);
        assert_eq!(calc.state().first_operand, None);
        assert_eq!(calc.state().pending_operator, None);
    }

    #[test]
    fn test_digit_limit() {
        let calc = run("12345678901234567");
        assert_eq!(calc.display_text(), "1.234.567.890.123.456");
        assert_eq!(calc.current_value(), 1_234_567_890_123_456.0);
    }

    #[test]
    fn test_decimal_entry() {
        let calc = run("5,");
        assert_eq!(calc.display_text(), "5,");
        let calc = run("5,25*2=");
        assert_eq!(calc.display_text(), "10,5");
    }

    #[test]
    fn test_backspace_never_empties() {
        let mut calc = run("7");
        press(&mut calc, "bs");
        assert_eq!(calc.display_text(), "0");
        press(&mut calc, "bs");
        assert_eq!(calc.display_text(), "0");

        let calc = run("1234 bs");
        assert_eq!(calc.display_text(), "123");
    }

    #[test]
    fn test_backspace_after_result_edits_result() {
        let calc = run("6*7= bs");
        assert_eq!(calc.display_text(), "4");
        assert_eq!(calc.display().equation(), None);
        assert_eq!(calc.state().pending_operator, None);
        assert!(!calc.state().just_finalized);
    }

    #[test]
    fn test_clear_entry_keeps_pending_operator() {
        let calc = run("5+9 ce 3=");
        assert_eq!(calc.display_text(), "8");
        assert_eq!(history(&calc), vec![entry("5 + 3 =", "8")]);
    }

    #[test]
    fn test_negate_twice() {
        let mut calc = run("7 neg");
        assert_eq!(calc.display_text(), "-7");
        press(&mut calc, "neg");
        assert_eq!(calc.display_text(), "7");
    }

    #[test]
    fn test_negate_then_keep_typing() {
        let calc = run("7 neg 5");
        assert_eq!(calc.display_text(), "-75");
        assert_eq!(calc.current_value(), -75.0);
    }

    #[test]
    fn test_negate_keeps_pending_operation() {
        let calc = run("5+2 neg =");
        assert_eq!(calc.display_text(), "3");
        assert_eq!(history(&calc), vec![entry("5 + -2 =", "3")]);
    }

    #[test]
    fn test_negate_after_square_root_drops_replay() {
        let calc = run("9 sqrt neg =");
        assert_eq!(history(&calc), vec![entry("-3 =", "-3")]);
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut calc = run("5+3*2");
        press(&mut calc, "c");
        assert_eq!(calc.display_text(), "0");
        assert_eq!(calc.display().equation(), None);
        assert_eq!(calc.state(), &CalculatorState::default());
        assert!(calc.history().is_empty());
    }

    #[test]
    fn test_square_root_discards_pending_operator() {
        let mut calc = run("5+9 sqrt");
        assert_eq!(calc.display_text(), "3");
        assert_eq!(calc.display().equation(), Some("sqrt(9)"));
        assert_eq!(calc.state().pending_operator, None);
        assert_eq!(calc.state().first_operand, Some(Operand::Value(3.0)));

        press(&mut calc, "=");
        assert_eq!(history(&calc), vec![entry("sqrt(9) =", "3")]);
        assert_eq!(calc.state().pending_operator, None);
    }

    #[test]
    fn test_percent_discards_pending_operator() {
        let calc = run("50+10%=");
        assert_eq!(calc.display_text(), "0,1");
        assert_eq!(history(&calc), vec![entry("percent(10) =", "0,1")]);
        assert_eq!(calc.state().pending_operator, None);
    }

    #[test]
    fn test_clear_entry_drops_unary_replay() {
        let mut calc = run("9 sqrt ce");
        assert_eq!(calc.state().last_equation, None);
        assert!(!calc.state().just_finalized);

        press(&mut calc, "=");
        assert_eq!(history(&calc), vec![entry("0 =", "0")]);
        assert_eq!(calc.display().equation(), Some("0 ="));
    }

    #[test]
    fn test_backspace_drops_unary_replay() {
        let mut calc = run("9 sqrt bs");
        assert_eq!(calc.display_text(), "0");
        assert_eq!(calc.state().last_equation, None);
        assert_eq!(calc.state().first_operand, None);

        press(&mut calc, "=");
        assert_eq!(history(&calc), vec![entry("0 =", "0")]);
    }

    #[test]
    fn test_negative_square_root_with_pending_operator() {
        let calc = run("5+4 neg sqrt");
        assert_eq!(calc.display_text(), "Error");
        assert_eq!(calc.state().pending_operator, None);
        assert_eq!(calc.state().last_equation, None);
        assert!(calc.state().awaiting_new_operand);
        assert!(calc.history().is_empty());
    }

    #[test]
    fn test_large_product_has_no_binary_noise() {
        let calc = run("9999999999999999*9999999999999999=");
        assert_eq!(
            history(&calc),
            vec![entry(
                "10.000.000.000.000.000 × 10.000.000.000.000.000 =",
                "100.000.000.000.000.000.000.000.000.000.000"
            )]
        );
    }

    #[test]
    fn test_display_port_mirrors_text() {
        let calc = run("1234,5");
        assert_eq!(calc.display().value(), "1.234,5");
        assert_eq!(calc.display().current_numeric_value(), 1234.5);
    }
}
