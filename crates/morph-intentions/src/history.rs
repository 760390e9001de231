//! Per-intention change log.
//!
//! Every step that creates or rewrites an intention appends a tagged entry.
//! Emitters can print the log above the declaration it belongs to, e.g.
//!
//! ```text
//! [Creation] A.h line 2 column 1
//! [PropertyMergePass] Removed method MyClass.value() -> Bool since deduced it is a getter for property MyClass.value: Bool
//! ```

use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryEntry {
    pub tag: String,
    pub description: String,
}

impl fmt::Display for HistoryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.tag, self.description)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IntentionHistory {
    entries: Vec<HistoryEntry>,
}

impl IntentionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, tag: impl Into<String>, description: impl Into<String>) {
        self.entries.push(HistoryEntry {
            tag: tag.into(),
            description: description.into(),
        });
    }

    /// Append every entry of `other`, keeping its order.
    pub fn merge(&mut self, other: &IntentionHistory) {
        self.entries.extend(other.entries.iter().cloned());
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// One entry per line.
    pub fn summary(&self) -> String {
        self.entries
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }
}
