//! Shared types for the voxroom client.
//!
//! This crate holds the domain values that cross crate boundaries: who said
//! what in the transcript, the voice-activity flags reported by the media
//! session, and the document references listed by the backend. The JSON
//! shapes exchanged with the backend live in [`wire`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod wire;

/// Who produced a transcript line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    /// The local participant.
    User,
    /// The voice assistant on the other end of the room.
    Assistant,
}

impl Speaker {
    /// Returns the label shown next to a transcript line.
    pub fn label(self) -> &'static str {
        match self {
            Self::User => "You",
            Self::Assistant => "Assistant",
        }
    }

    /// Returns the wire name of this speaker.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }

    /// Parses a wire name. Anything other than `"user"` is the assistant,
    /// matching how transcript lines are attributed on screen.
    pub fn from_wire(s: &str) -> Self {
        if s == "user" {
            Self::User
        } else {
            Self::Assistant
        }
    }
}

/// One line of the conversation transcript.
///
/// Entries are stamped when they are appended and never change afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub speaker: Speaker,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl TranscriptEntry {
    /// Creates an entry stamped with the current time.
    pub fn now(speaker: Speaker, text: impl Into<String>) -> Self {
        Self {
            speaker,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }

    /// Formats the timestamp as local wall-clock time (`HH:MM:SS`).
    pub fn time_label(&self) -> String {
        self.timestamp
            .with_timezone(&chrono::Local)
            .format("%H:%M:%S")
            .to_string()
    }
}

/// Listening/speaking flags reported by the media session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VoiceActivity {
    /// The local microphone is being listened to.
    pub listening: bool,
    /// The assistant is currently speaking.
    pub speaking: bool,
}

impl VoiceActivity {
    /// Short status shown next to the session indicator.
    pub fn status_line(self) -> &'static str {
        if self.listening {
            "Listening..."
        } else {
            "Ready"
        }
    }

    /// Headline and sub-line shown under the pulse visualization.
    ///
    /// Speaking takes precedence over listening.
    pub fn headline(self) -> (&'static str, &'static str) {
        if self.speaking {
            ("Assistant is speaking...", "Listening to response")
        } else if self.listening {
            ("I'm listening", "Speak naturally")
        } else {
            ("Ready to talk", "Start speaking anytime")
        }
    }
}

/// A document held in the backend index.
///
/// Only `name` is interpreted by the client; every other field the backend
/// sends is preserved untouched in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRef {
    pub name: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl DocumentRef {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            extra: serde_json::Map::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn speaker_labels() {
        assert_eq!(Speaker::User.label(), "You");
        assert_eq!(Speaker::Assistant.label(), "Assistant");
    }

    #[test]
    fn speaker_from_wire_defaults_to_assistant() {
        assert_eq!(Speaker::from_wire("user"), Speaker::User);
        assert_eq!(Speaker::from_wire("assistant"), Speaker::Assistant);
        assert_eq!(Speaker::from_wire("agent"), Speaker::Assistant);
    }

    #[test]
    fn speaker_serializes_lowercase() {
        let json = serde_json::to_string(&Speaker::User).unwrap();
        assert_eq!(json, "\"user\"");
    }

    #[test]
    fn voice_activity_status_and_headline() {
        let idle = VoiceActivity::default();
        assert_eq!(idle.status_line(), "Ready");
        assert_eq!(idle.headline().0, "Ready to talk");

        let listening = VoiceActivity {
            listening: true,
            speaking: false,
        };
        assert_eq!(listening.status_line(), "Listening...");
        assert_eq!(listening.headline().0, "I'm listening");

        let both = VoiceActivity {
            listening: true,
            speaking: true,
        };
        assert_eq!(both.headline().0, "Assistant is speaking...");
    }

    #[test]
    fn document_ref_keeps_backend_fields() {
        let json = r#"{"name": "faq.md", "size": 120, "indexed_at": "2024-01-01"}"#;
        let doc: DocumentRef = serde_json::from_str(json).unwrap();
        assert_eq!(doc.name, "faq.md");
        assert_eq!(doc.extra["size"], 120);
        assert_eq!(doc.extra["indexed_at"], "2024-01-01");
    }

    #[test]
    fn transcript_time_label_is_clock_time() {
        let entry = TranscriptEntry::now(Speaker::User, "hello");
        let label = entry.time_label();
        assert_eq!(label.len(), 8);
        assert_eq!(label.matches(':').count(), 2);
    }
}
