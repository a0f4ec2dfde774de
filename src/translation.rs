//! Hand-off boundary for the translation collaborator. Translated content
//! arrives asynchronously over a bounded channel; the assembler consumes it
//! as a pull stream and stops at the first terminal error.

use crate::error::{AssemblerError, Result};
use tokio::sync::mpsc;

/// One translated resource for one locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslatedItem {
    pub resource: String,
    pub locale: String,
    pub content: String,
}

pub type TranslationSender = mpsc::Sender<Result<TranslatedItem>>;

/// Pull side of the hand-off channel.
pub struct TranslationStream {
    rx: mpsc::Receiver<Result<TranslatedItem>>,
}

impl TranslationStream {
    /// Bounded channel: the producer blocks once `capacity` items are
    /// in flight, so a slow consumer applies backpressure.
    pub fn channel(capacity: usize) -> (TranslationSender, TranslationStream) {
        let (tx, rx) = mpsc::channel(capacity);
        (tx, TranslationStream { rx })
    }

    /// Next item, or `None` once the producer hangs up.
    pub async fn next(&mut self) -> Option<Result<TranslatedItem>> {
        self.rx.recv().await
    }

    /// Drains the stream. Stops at the first error and returns it; items
    /// received before the error are dropped with it, matching the
    /// all-or-nothing expectation of a locale import.
    pub async fn collect(mut self) -> Result<Vec<TranslatedItem>> {
        let mut items = Vec::new();
        while let Some(next) = self.next().await {
            items.push(next?);
        }
        Ok(items)
    }
}
