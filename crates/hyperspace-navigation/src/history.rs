//! Back/forward navigation stack

use serde::{Deserialize, Serialize};

/// Ordered navigation history with a cursor.
///
/// `entries[..=cursor]` is what back can still reach and
/// `entries[cursor + 1..]` is what forward can still reach. The cursor is
/// `None` only while the history is empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct History {
    entries: Vec<String>,
    cursor: Option<usize>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new navigation, dropping any forward entries
    pub fn navigate(&mut self, url: impl Into<String>) {
        let keep = self.cursor.map_or(0, |c| c + 1);
        self.entries.truncate(keep);
        self.entries.push(url.into());
        self.cursor = Some(self.entries.len() - 1);

        tracing::debug!(
            cursor = self.entries.len() - 1,
            len = self.entries.len(),
            "History navigate"
        );
    }

    /// Step back one entry. No-op at the start of history.
    pub fn back(&mut self) -> Option<&str> {
        let cursor = self.cursor.filter(|&c| c > 0)?;
        self.cursor = Some(cursor - 1);
        self.current()
    }

    /// Step forward one entry. No-op at the end of history.
    pub fn forward(&mut self) -> Option<&str> {
        let cursor = self.cursor.filter(|&c| c + 1 < self.entries.len())?;
        self.cursor = Some(cursor + 1);
        self.current()
    }

    pub fn can_go_back(&self) -> bool {
        self.cursor.is_some_and(|c| c > 0)
    }

    pub fn can_go_forward(&self) -> bool {
        self.cursor.is_some_and(|c| c + 1 < self.entries.len())
    }

    pub fn current(&self) -> Option<&str> {
        self.cursor
            .and_then(|c| self.entries.get(c))
            .map(String::as_str)
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
