use voxroom_types::{Speaker, TranscriptEntry};

/// Append-only conversation log for one session.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a line stamped with the current time.
    pub fn push(&mut self, speaker: Speaker, text: impl Into<String>) -> &TranscriptEntry {
        self.entries.push(TranscriptEntry::now(speaker, text));
        &self.entries[self.entries.len() - 1]
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
