//! History of completed equations.

use serde::{Deserialize, Serialize};

use crate::calculator::{ERROR_TEXT, HistorySink};

/// One finished equation and its result.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Unique identifier for this entry.
    pub id: String,
    /// Equation text, e.g. `5 + 3 =`.
    pub equation: String,
    /// Result formatted for display.
    pub result: String,
    /// Whether the result is the error marker.
    pub is_error: bool,
}

impl HistoryEntry {
    pub fn new(id: u64, equation: &str, result: &str) -> Self {
        Self {
            id: format!("history-{}", id),
            equation: equation.to_string(),
            result: result.to_string(),
            is_error: result == ERROR_TEXT,
        }
    }

    /// Text to copy when the entry is picked.
    pub fn text_for_clipboard(&self) -> &str {
        &self.result
    }
}

/// In-memory history, oldest entry first.
#[derive(Clone, Debug, Default, Serialize)]
pub struct History {
    entries: Vec<HistoryEntry>,
    #[serde(skip)]
    next_id: u64,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Pretty-printed JSON array of the entries.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.entries)
    }
}

impl HistorySink for History {
    fn append(&mut self, equation: &str, result: &str) {
        self.next_id += 1;
        self.entries
            .push(HistoryEntry::new(self.next_id, equation, result));
    }

    fn clear(&mut self) {
        tracing::debug!(count = self.entries.len(), "clearing history");
        self.entries.clear();
    }
}
