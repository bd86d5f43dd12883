//! Presentational view of a live session: status, transcript, documents and
//! the upload sub-panel. Holds no state of its own.

use crate::transcript::Transcript;
use crate::upload::{UploadPanel, UploadStatus};
use voxroom_types::{DocumentRef, Speaker, VoiceActivity};

/// Placeholder shown before anything has been said.
pub const EMPTY_TRANSCRIPT: &str = "Your conversation will appear here";

/// Placeholder shown when the index holds no documents.
pub const EMPTY_DOCUMENTS: &str = "No documents indexed yet";

/// One rendered transcript row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptLine {
    pub speaker: Speaker,
    pub label: &'static str,
    pub text: String,
    pub time: String,
}

#[derive(Debug, Clone, Copy)]
pub struct PanelView<'a> {
    pub transcript: &'a Transcript,
    pub activity: VoiceActivity,
    pub documents: &'a [DocumentRef],
    pub upload: &'a UploadPanel,
}

impl<'a> PanelView<'a> {
    pub fn status_line(&self) -> &'static str {
        self.activity.status_line()
    }

    pub fn headline(&self) -> (&'static str, &'static str) {
        self.activity.headline()
    }

    /// Transcript rows in insertion order.
    pub fn transcript_lines(&self) -> Vec<TranscriptLine> {
        self.transcript
            .entries()
            .iter()
            .map(|entry| TranscriptLine {
                speaker: entry.speaker,
                label: entry.speaker.label(),
                text: entry.text.clone(),
                time: entry.time_label(),
            })
            .collect()
    }

    pub fn document_names(&self) -> Vec<&'a str> {
        self.documents.iter().map(|d| d.name.as_str()).collect()
    }

    /// Text of the upload control: the typed path, or progress while busy.
    pub fn upload_prompt(&self) -> String {
        match self.upload.status() {
            UploadStatus::Uploading { file_name } => format!("Uploading {file_name}..."),
            _ => self.upload.input().to_string(),
        }
    }

    pub fn upload_message(&self) -> Option<(&'a str, bool)> {
        self.upload.message()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transcript_lines_follow_insertion_order() {
        let mut transcript = Transcript::new();
        transcript.push(Speaker::Assistant, "How can I help?");
        transcript.push(Speaker::User, "hello");
        let upload = UploadPanel::new(1024);

        let view = PanelView {
            transcript: &transcript,
            activity: VoiceActivity::default(),
            documents: &[],
            upload: &upload,
        };

        let lines = view.transcript_lines();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].label, "Assistant");
        assert_eq!(lines[1].label, "You");
        assert_eq!(lines[1].text, "hello");
        assert_eq!(lines[1].time.len(), 8);
    }

    #[test]
    fn upload_prompt_shows_progress_while_busy() {
        let transcript = Transcript::new();
        let mut upload = UploadPanel::new(1024);
        upload.set_input("notes.txt");

        let view = PanelView {
            transcript: &transcript,
            activity: VoiceActivity::default(),
            documents: &[],
            upload: &upload,
        };
        assert_eq!(view.upload_prompt(), "notes.txt");
        assert_eq!(view.upload_message(), None);
    }

    #[test]
    fn document_names_are_listed() {
        let transcript = Transcript::new();
        let upload = UploadPanel::new(1024);
        let docs = vec![DocumentRef::named("a.pdf"), DocumentRef::named("b.md")];
        let view = PanelView {
            transcript: &transcript,
            activity: VoiceActivity::default(),
            documents: &docs,
            upload: &upload,
        };
        assert_eq!(view.document_names(), vec!["a.pdf", "b.md"]);
    }
}
