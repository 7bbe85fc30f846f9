//! Append-only in-memory conversation log.
//!
//! Independent of the pipeline's correctness but required for audit:
//! every exchange lands here in insertion order. Appends are atomic per
//! entry and readers never observe a partial write.

use crate::answer::types::ConversationEntry;
use std::sync::RwLock;

#[derive(Debug, Default)]
pub struct ConversationLog {
    entries: RwLock<Vec<ConversationEntry>>,
}

impl ConversationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one entry. The only mutation the log supports.
    pub fn append(&self, entry: ConversationEntry) {
        let mut entries = self.entries.write().expect("conversation log poisoned");
        entries.push(entry);
    }

    /// Snapshot of all entries in insertion order.
    pub fn entries(&self) -> Vec<ConversationEntry> {
        self.entries
            .read()
            .expect("conversation log poisoned")
            .clone()
    }

    pub fn len(&self) -> usize {
        self.entries.read().expect("conversation log poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
