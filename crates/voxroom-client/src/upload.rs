//! Document upload sub-panel: local validation and the
//! `idle → uploading → (success | error) → idle` state machine.
//!
//! Nothing here touches the network. The application spawns the request
//! once [`UploadPanel::begin`] hands back an accepted file, and reports the
//! outcome through [`UploadPanel::finish`].

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Allowed MIME types for document uploads.
const ALLOWED_CONTENT_TYPES: &[&str] = &[
    "application/pdf",
    "text/plain",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "text/markdown",
];

/// Allowed file extensions, compared case-insensitively.
const ALLOWED_EXTENSIONS: &[&str] = &["pdf", "txt", "doc", "docx", "md"];

/// Content type sent when the type cannot be guessed from the file name.
const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// Why a selection was refused before any request was made.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UploadRejection {
    #[error("No file selected")]
    NothingSelected,

    #[error("Cannot read {path}: {reason}")]
    Unreadable { path: String, reason: String },

    #[error("Unsupported file type: {name}. Allowed: PDF, TXT, DOC, DOCX, MD")]
    UnsupportedType { name: String },

    #[error("File too large: {name}. Maximum size is {} MB", .limit / (1024 * 1024))]
    TooLarge { name: String, size: u64, limit: u64 },

    #[error("An upload is already in progress")]
    Busy,
}

/// A file picked for upload, described by what validation needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub path: PathBuf,
    pub name: String,
    pub content_type: Option<String>,
    pub size: u64,
}

impl SelectedFile {
    /// Describes the file at `path` from its name and metadata. The contents
    /// are not read.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, UploadRejection> {
        let path = path.as_ref();
        let unreadable = |reason: String| UploadRejection::Unreadable {
            path: path.display().to_string(),
            reason,
        };

        let metadata = std::fs::metadata(path).map_err(|e| unreadable(e.to_string()))?;
        if !metadata.is_file() {
            return Err(unreadable("not a regular file".to_string()));
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Ok(Self {
            path: path.to_path_buf(),
            content_type: mime_guess::from_path(path).first_raw().map(str::to_string),
            name,
            size: metadata.len(),
        })
    }

    /// Content type to send with the upload.
    pub fn content_type_or_default(&self) -> &str {
        self.content_type.as_deref().unwrap_or(FALLBACK_CONTENT_TYPE)
    }

    fn extension(&self) -> Option<String> {
        Path::new(&self.name)
            .extension()
            .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
    }
}

/// Accepts a file whose MIME type or extension is allowed and whose size is
/// at most `max_bytes`.
pub fn validate(file: &SelectedFile, max_bytes: u64) -> Result<(), UploadRejection> {
    let type_ok = file
        .content_type
        .as_deref()
        .is_some_and(|ct| ALLOWED_CONTENT_TYPES.contains(&ct))
        || file
            .extension()
            .is_some_and(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()));

    if !type_ok {
        return Err(UploadRejection::UnsupportedType {
            name: file.name.clone(),
        });
    }

    if file.size > max_bytes {
        return Err(UploadRejection::TooLarge {
            name: file.name.clone(),
            size: file.size,
            limit: max_bytes,
        });
    }

    Ok(())
}

/// Upload progress as shown in the panel.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum UploadStatus {
    #[default]
    Idle,
    Uploading {
        file_name: String,
    },
    Succeeded {
        message: String,
    },
    Failed {
        message: String,
    },
}

/// Upload sub-panel state: the path being typed plus the upload status.
#[derive(Debug, Clone)]
pub struct UploadPanel {
    input: String,
    status: UploadStatus,
    max_bytes: u64,
    generation: u64,
}

impl UploadPanel {
    pub fn new(max_bytes: u64) -> Self {
        Self {
            input: String::new(),
            status: UploadStatus::Idle,
            max_bytes,
            generation: 0,
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn status(&self) -> &UploadStatus {
        &self.status
    }

    pub fn is_uploading(&self) -> bool {
        matches!(self.status, UploadStatus::Uploading { .. })
    }

    /// The selector is disabled while an upload is in flight.
    pub fn push_char(&mut self, c: char) {
        if !self.is_uploading() {
            self.input.push(c);
        }
    }

    pub fn backspace(&mut self) {
        if !self.is_uploading() {
            self.input.pop();
        }
    }

    pub fn set_input(&mut self, value: impl Into<String>) {
        if !self.is_uploading() {
            self.input = value.into();
        }
    }

    /// Validates the typed path and, if accepted, enters `Uploading`.
    ///
    /// The input is cleared after every attempt, accepted or not, so the same
    /// file can be picked again. A rejection is shown as a failure message.
    pub fn begin(&mut self) -> Result<SelectedFile, UploadRejection> {
        if self.is_uploading() {
            return Err(UploadRejection::Busy);
        }

        let path = self.input.trim().to_string();
        self.input.clear();
        self.generation += 1;

        let selected = if path.is_empty() {
            Err(UploadRejection::NothingSelected)
        } else {
            SelectedFile::from_path(&path)
                .and_then(|file| validate(&file, self.max_bytes).map(|()| file))
        };

        match &selected {
            Ok(file) => {
                self.status = UploadStatus::Uploading {
                    file_name: file.name.clone(),
                };
            }
            Err(rejection) => {
                self.status = UploadStatus::Failed {
                    message: rejection.to_string(),
                };
            }
        }
        selected
    }

    /// Records the outcome of the in-flight upload.
    ///
    /// On success returns the generation to pass to [`UploadPanel::expire`]
    /// once the success message should disappear.
    pub fn finish(&mut self, outcome: Result<String, String>) -> Option<u64> {
        self.input.clear();
        self.generation += 1;
        match outcome {
            Ok(message) => {
                self.status = UploadStatus::Succeeded { message };
                Some(self.generation)
            }
            Err(message) => {
                self.status = UploadStatus::Failed { message };
                None
            }
        }
    }

    /// Clears a success message, unless something happened since it was set.
    pub fn expire(&mut self, generation: u64) -> bool {
        if generation == self.generation && matches!(self.status, UploadStatus::Succeeded { .. })
        {
            self.status = UploadStatus::Idle;
            true
        } else {
            false
        }
    }

    /// The message to show, with `true` for errors.
    pub fn message(&self) -> Option<(&str, bool)> {
        match &self.status {
            UploadStatus::Succeeded { message } => Some((message, false)),
            UploadStatus::Failed { message } => Some((message, true)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const LIMIT: u64 = 10 * 1024 * 1024;

    fn file(name: &str, content_type: Option<&str>, size: u64) -> SelectedFile {
        SelectedFile {
            path: PathBuf::from(name),
            name: name.to_string(),
            content_type: content_type.map(str::to_string),
            size,
        }
    }

    fn temp_file(dir: &tempfile::TempDir, name: &str, size: usize) -> PathBuf {
        let path = dir.path().join(name);
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(&vec![b'x'; size]).unwrap();
        path
    }

    #[test]
    fn accepts_allowed_extensions_case_insensitively() {
        for name in ["a.pdf", "b.TXT", "c.doc", "d.Docx", "e.md"] {
            assert_eq!(validate(&file(name, None, 10), LIMIT), Ok(()), "{name}");
        }
    }

    #[test]
    fn accepts_allowed_mime_without_extension() {
        assert_eq!(
            validate(&file("README", Some("text/plain"), 10), LIMIT),
            Ok(())
        );
    }

    #[test]
    fn rejects_executables() {
        let err = validate(
            &file("report.exe", Some("application/x-msdownload"), 10),
            LIMIT,
        )
        .unwrap_err();
        assert!(matches!(err, UploadRejection::UnsupportedType { .. }));
    }

    #[test]
    fn size_limit_is_inclusive() {
        assert_eq!(validate(&file("big.pdf", None, LIMIT), LIMIT), Ok(()));
        let err = validate(&file("big.pdf", None, LIMIT + 1), LIMIT).unwrap_err();
        assert_eq!(err.to_string(), "File too large: big.pdf. Maximum size is 10 MB");
    }

    #[test]
    fn from_path_reads_metadata_and_guesses_type() {
        let dir = tempfile::tempdir().unwrap();
        let path = temp_file(&dir, "notes.txt", 1024);

        let selected = SelectedFile::from_path(&path).unwrap();
        assert_eq!(selected.name, "notes.txt");
        assert_eq!(selected.size, 1024);
        assert_eq!(selected.content_type.as_deref(), Some("text/plain"));
    }

    #[test]
    fn from_path_reports_missing_files() {
        let err = SelectedFile::from_path("/no/such/file.pdf").unwrap_err();
        assert!(matches!(err, UploadRejection::Unreadable { .. }));
    }

    #[test]
    fn begin_accepts_then_refuses_while_busy() {
        let dir = tempfile::tempdir().unwrap();
        let path = temp_file(&dir, "notes.txt", 1024);

        let mut panel = UploadPanel::new(LIMIT);
        panel.set_input(path.display().to_string());
        let selected = panel.begin().expect("valid file");
        assert_eq!(selected.name, "notes.txt");
        assert!(panel.is_uploading());
        assert_eq!(panel.input(), "");

        panel.push_char('x');
        assert_eq!(panel.input(), "", "selector is disabled while uploading");
        assert_eq!(panel.begin().unwrap_err(), UploadRejection::Busy);
    }

    #[test]
    fn rejection_shows_message_and_resets_input() {
        let dir = tempfile::tempdir().unwrap();
        let path = temp_file(&dir, "report.exe", 16);

        let mut panel = UploadPanel::new(LIMIT);
        panel.set_input(path.display().to_string());
        let err = panel.begin().unwrap_err();

        assert!(matches!(err, UploadRejection::UnsupportedType { .. }));
        assert_eq!(panel.input(), "");
        assert!(!panel.is_uploading());
        let (message, is_error) = panel.message().unwrap();
        assert!(is_error);
        assert!(message.contains("report.exe"));
    }

    #[test]
    fn empty_selection_is_rejected() {
        let mut panel = UploadPanel::new(LIMIT);
        assert_eq!(panel.begin().unwrap_err(), UploadRejection::NothingSelected);
    }

    #[test]
    fn success_message_expires_only_for_its_generation() {
        let mut panel = UploadPanel::new(LIMIT);
        let gen = panel.finish(Ok("Indexed notes.txt".to_string())).unwrap();
        assert_eq!(panel.message(), Some(("Indexed notes.txt", false)));

        assert!(!panel.expire(gen + 1));
        assert!(panel.expire(gen));
        assert_eq!(panel.status(), &UploadStatus::Idle);
        assert!(!panel.expire(gen), "expiring twice is a no-op");
    }

    #[test]
    fn stale_expiry_does_not_clear_newer_message() {
        let mut panel = UploadPanel::new(LIMIT);
        let first = panel.finish(Ok("first".to_string())).unwrap();
        let second = panel.finish(Ok("second".to_string())).unwrap();

        assert!(!panel.expire(first));
        assert_eq!(panel.message(), Some(("second", false)));
        assert!(panel.expire(second));
    }

    #[test]
    fn failure_is_not_scheduled_for_clearing() {
        let mut panel = UploadPanel::new(LIMIT);
        assert_eq!(panel.finish(Err("Could not parse".to_string())), None);
        assert_eq!(panel.message(), Some(("Could not parse", true)));
    }
}
