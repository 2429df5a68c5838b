//! Keypad calculator with a running equation line and a history of results.

pub mod app;
pub mod calculator;
pub mod config;
pub mod history;
pub mod keys;
pub mod ui;
