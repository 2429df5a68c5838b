//! Keyboard bindings for the calculator.
//!
//! Maps key names to calculator events and splits key scripts such as
//! `12+7*sqrt=` into the events they stand for.

use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

use crate::calculator::{Digit, Event, Operator};

/// Named keys, longest first so `ce` wins over `c`.
const NAMED_KEYS: &[&str] = &[
    "backspace", "escape", "enter", "sqrt", "neg", "ce", "bs",
];

lazy_static! {
    /// One key at the start of the input, or a run of whitespace.
    static ref KEY_TOKEN: Regex = Regex::new(
        r"^(?i:backspace|escape|enter|sqrt|neg|ce|bs)|^[0-9.,+\-*/−×÷=%cC]|^\s+"
    ).unwrap();

    /// Matches strings built only from key characters and key names.
    static ref KEY_SAFE_CHARS: Regex = Regex::new(
        r"^[\d\s.,+\-*/−×÷=%a-zA-Z]+$"
    ).unwrap();
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum KeyError {
    #[error("unknown key {found:?} at position {position}")]
    UnknownKey { position: usize, found: String },
}

/// Look up the event bound to a key.
///
/// Besides single characters this accepts the key names `Enter`, `Escape`
/// and `Backspace`, plus `sqrt`, `neg`, `ce` and `bs` for the keypad
/// buttons that have no keyboard shortcut.
pub fn event_for_key(key: &str) -> Option<Event> {
    let mut chars = key.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return event_for_char(c);
    }

    match key.to_ascii_lowercase().as_str() {
        "enter" => Some(Event::Equals),
        "escape" => Some(Event::Clear),
        "backspace" | "bs" => Some(Event::Backspace),
        "sqrt" => Some(Event::SquareRoot),
        "neg" => Some(Event::Negate),
        "ce" => Some(Event::ClearEntry),
        _ => None,
    }
}

fn event_for_char(c: char) -> Option<Event> {
    if let Some(digit) = Digit::from_char(c) {
        return Some(Event::Digit(digit));
    }

    if let Some(op) = Operator::from_symbol(c) {
        return Some(Event::Operator(op));
    }

    match c {
        '.' | ',' => Some(Event::DecimalPoint),
        '=' => Some(Event::Equals),
        '%' => Some(Event::Percent),
        'c' | 'C' => Some(Event::Clear),
        _ => None,
    }
}

/// Split a key script into events. Whitespace only separates keys.
pub fn parse_keys(script: &str) -> Result<Vec<Event>, KeyError> {
    let mut events = Vec::new();
    let mut position = 0;

    while position < script.len() {
        let rest = &script[position..];
        let Some(token) = KEY_TOKEN.find(rest) else {
            let found = rest.chars().next().map(String::from).unwrap_or_default();
            return Err(KeyError::UnknownKey { position, found });
        };

        let text = token.as_str();
        if !text.trim().is_empty() {
            match event_for_key(text) {
                Some(event) => events.push(event),
                None => {
                    return Err(KeyError::UnknownKey {
                        position,
                        found: text.to_string(),
                    });
                }
            }
        }

        position += token.end();
    }

    Ok(events)
}

/// Fast pre-check: does the input only contain key characters and names?
pub fn looks_like_key_script(input: &str) -> bool {
    let trimmed = input.trim();

    if trimmed.is_empty() || !KEY_SAFE_CHARS.is_match(trimmed) {
        return false;
    }

    // Letters are only allowed as part of a key name
    let lower = trimmed.to_ascii_lowercase();
    let mut stripped = lower;
    for name in NAMED_KEYS {
        stripped = stripped.replace(name, " ");
    }
    stripped
        .chars()
        .all(|c| !c.is_ascii_alphabetic() || c == 'c')
}
