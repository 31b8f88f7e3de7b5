//! Ordered message store backing the chat view.
//!
//! The transcript is append-only apart from two mutations: the pending
//! placeholder at the tail may be replaced once it settles, and [`Transcript::reset`]
//! swaps the whole sequence for a fresh greeting.

use std::collections::VecDeque;

use thiserror::Error;

use crate::core::message::Message;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TranscriptError {
    #[error("the last transcript record is not pending")]
    NoPendingRecord,
}

#[derive(Debug, Clone)]
pub struct Transcript {
    messages: VecDeque<Message>,
    greeting: String,
}

impl Transcript {
    pub fn new(greeting: impl Into<String>) -> Self {
        let greeting = greeting.into();
        let mut messages = VecDeque::new();
        messages.push_back(Message::assistant(greeting.clone()));
        Self { messages, greeting }
    }

    pub fn append(&mut self, message: Message) {
        self.messages.push_back(message);
    }

    /// Overwrite the tail record. Only a pending placeholder may be replaced.
    pub fn replace_last(&mut self, message: Message) -> Result<(), TranscriptError> {
        match self.messages.back_mut() {
            Some(last) if last.is_pending => {
                *last = message;
                Ok(())
            }
            _ => Err(TranscriptError::NoPendingRecord),
        }
    }

    pub fn reset(&mut self) {
        self.messages.clear();
        self.messages
            .push_back(Message::assistant(self.greeting.clone()));
    }

    pub fn messages(&self) -> &VecDeque<Message> {
        &self.messages
    }

    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter()
    }

    /// Never zero: the greeting is always present.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.back()
    }

    pub fn has_pending(&self) -> bool {
        self.messages.iter().any(|message| message.is_pending)
    }
}
