//! Pending message stack
//!
//! Deferred messages wait here. The most recently pushed message is shown
//! first; removal is by identity so a message can be dropped from several
//! call sites without index bookkeeping.

use crate::message::{Message, MessageId};

/// Insertion-ordered stack of deferred messages
#[derive(Debug, Default)]
pub struct PendingStack {
    entries: Vec<Message>,
}

impl PendingStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a message. A message already present is not added twice.
    pub fn push(&mut self, message: Message) {
        if self.contains(message.id()) {
            tracing::debug!(message_id = %message.id(), "message already stacked");
            return;
        }
        self.entries.push(message);
    }

    /// Most recently pushed message, left in place.
    pub fn peek_last(&self) -> Option<&Message> {
        self.entries.last()
    }

    /// Remove every entry with this identity. Returns how many were removed.
    pub fn remove_all(&mut self, id: MessageId) -> usize {
        let before = self.entries.len();
        self.entries.retain(|m| m.id() != id);
        before - self.entries.len()
    }

    pub fn contains(&self, id: MessageId) -> bool {
        self.entries.iter().any(|m| m.id() == id)
    }

    /// Empty the stack, handing back the entries in insertion order.
    pub fn drain(&mut self) -> Vec<Message> {
        std::mem::take(&mut self.entries)
    }

    /// Entries in insertion order (oldest first).
    pub fn as_slice(&self) -> &[Message] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
