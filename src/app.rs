//! A calculator session as seen by the terminal front end.

use serde::Serialize;

use crate::calculator::{Calculator, Event, NumberFormatter, copy_to_clipboard};
use crate::config::Config;
use crate::history::{History, HistoryEntry};
use crate::keys::{KeyError, looks_like_key_script, parse_keys};
use crate::ui::{BufferDisplay, render_history, render_panel};

/// Serializable view of the session.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Snapshot {
    pub display: String,
    pub equation: Option<String>,
    pub history: Vec<HistoryEntry>,
}

/// One line typed into the interactive session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReplCommand {
    Quit,
    ToggleHistory,
    Json,
    /// Copy the displayed value.
    Copy,
    /// Copy the result of the latest history entry.
    CopyLast,
    Keys(String),
    Unknown(String),
}

impl ReplCommand {
    /// Classify a line; `None` for a blank line.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();

        let command = match line {
            "" => return None,
            ":q" | ":quit" => Self::Quit,
            ":history" => Self::ToggleHistory,
            ":json" => Self::Json,
            ":copy" => Self::Copy,
            ":copy last" => Self::CopyLast,
            script if looks_like_key_script(script) => Self::Keys(script.to_string()),
            other => Self::Unknown(other.to_string()),
        };
        Some(command)
    }
}

pub struct App {
    calculator: Calculator<BufferDisplay, History>,
    sidebar_open: bool,
    width: usize,
}

impl App {
    pub fn new(config: &Config) -> Self {
        let formatter = NumberFormatter::new(config.format.clone());
        let display = BufferDisplay::new(formatter.clone());

        Self {
            calculator: Calculator::new(formatter, display, History::new()),
            sidebar_open: config.ui.show_history,
            width: config.ui.width,
        }
    }

    pub fn calculator(&self) -> &Calculator<BufferDisplay, History> {
        &self.calculator
    }

    pub fn handle(&mut self, event: Event) {
        self.calculator.handle(event);
    }

    /// Run a key script. Nothing is applied when the script has an unknown key.
    pub fn feed(&mut self, script: &str) -> Result<(), KeyError> {
        let events = parse_keys(script)?;
        for event in events {
            self.calculator.handle(event);
        }
        Ok(())
    }

    pub fn sidebar_open(&self) -> bool {
        self.sidebar_open
    }

    pub fn toggle_sidebar(&mut self) {
        self.sidebar_open = !self.sidebar_open;
    }

    /// Panel, followed by the history sidebar when it is open.
    pub fn render(&self) -> String {
        let panel = render_panel(self.calculator.display(), self.width);
        if !self.sidebar_open {
            return panel;
        }

        format!(
            "{}\n\nHistory\n{}",
            panel,
            render_history(self.calculator.history(), self.width)
        )
    }

    pub fn snapshot(&self) -> Snapshot {
        let display = self.calculator.display();
        Snapshot {
            display: display.value().to_string(),
            equation: display.equation().map(str::to_string),
            history: self.calculator.history().entries().to_vec(),
        }
    }

    /// Text that `copy` puts on the clipboard.
    pub fn clipboard_text(&self) -> String {
        self.calculator
            .formatter()
            .plain(self.calculator.display_text())
    }

    /// Text of the latest history result, in clipboard form.
    pub fn last_result_text(&self) -> Option<String> {
        let latest = self.calculator.history().latest()?;
        Some(
            self.calculator
                .formatter()
                .plain(latest.text_for_clipboard()),
        )
    }

    pub fn copy(&self) -> anyhow::Result<String> {
        let text = self.clipboard_text();
        copy_to_clipboard(&text)?;
        Ok(text)
    }

    pub fn copy_last(&self) -> anyhow::Result<String> {
        let text = self
            .last_result_text()
            .ok_or_else(|| anyhow::anyhow!("History is empty"))?;
        copy_to_clipboard(&text)?;
        Ok(text)
    }
}
