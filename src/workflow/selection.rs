use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Largest upload the server accepts.
pub const MAX_UPLOAD_BYTES: u64 = 100 * 1024 * 1024;

const ACCEPTED_EXTENSION: &str = "pptx";

/// Reasons a submission is refused before any request is made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please select a PowerPoint file to translate.")]
    NoFile,
    #[error("Please select at least one target language.")]
    NoLanguage,
    #[error("Please select at least one output format.")]
    NoFormat,
    #[error("A translation is already running.")]
    InProgress,
}

impl ValidationError {
    /// Short heading for the alert dialog.
    pub fn heading(&self) -> &'static str {
        match self {
            ValidationError::NoFile => "No File Selected",
            ValidationError::NoLanguage => "No Language Selected",
            ValidationError::NoFormat => "No Format Selected",
            ValidationError::InProgress => "Please Wait",
        }
    }
}

/// Reasons a picked or dropped file is not accepted.
#[derive(Debug, Error)]
pub enum FileRejected {
    #[error("{0} is not a .pptx presentation")]
    UnsupportedType(String),
    #[error(
        "{name} is {}, over the {} upload limit",
        format_size(*.size),
        format_size(MAX_UPLOAD_BYTES)
    )]
    TooLarge { name: String, size: u64 },
    #[error("Could not read {name}: {source}")]
    Unreadable {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

/// The presentation chosen for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub path: PathBuf,
    pub name: String,
    pub size_bytes: u64,
}

impl SelectedFile {
    /// Accept `path` if it is a readable `.pptx` within the upload limit.
    pub fn from_path(path: &Path) -> Result<Self, FileRejected> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let is_pptx = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(ACCEPTED_EXTENSION));
        if !is_pptx {
            return Err(FileRejected::UnsupportedType(name));
        }

        let metadata = std::fs::metadata(path).map_err(|source| FileRejected::Unreadable {
            name: name.clone(),
            source,
        })?;
        let size = metadata.len();
        if size > MAX_UPLOAD_BYTES {
            return Err(FileRejected::TooLarge { name, size });
        }

        Ok(Self {
            path: path.to_path_buf(),
            name,
            size_bytes: size,
        })
    }

    pub fn display_size(&self) -> String {
        format_size(self.size_bytes)
    }
}

/// Human-readable byte count, e.g. "1.5 MB".
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    if bytes == 0 {
        return "0 B".into();
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    let rounded = format!("{value:.2}");
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{trimmed} {}", UNITS[unit])
}

/// What the user has picked so far. Built up incrementally by the form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    pub file: Option<SelectedFile>,
    target_languages: Vec<String>,
    formats: BTreeSet<String>,
    service: String,
}

impl SelectionState {
    pub fn set_file(&mut self, file: Option<SelectedFile>) {
        self.file = file;
    }

    /// Languages in the order they were first selected.
    #[cfg(test)]
    pub fn target_languages(&self) -> &[String] {
        &self.target_languages
    }

    pub fn select_language(&mut self, code: &str) {
        let code = code.trim();
        if !code.is_empty() && !self.target_languages.iter().any(|c| c == code) {
            self.target_languages.push(code.to_string());
        }
    }

    pub fn deselect_language(&mut self, code: &str) {
        let code = code.trim();
        self.target_languages.retain(|c| c != code);
    }

    #[cfg(test)]
    pub fn formats(&self) -> &BTreeSet<String> {
        &self.formats
    }

    /// Check or uncheck an output format. ".PDF" and "pdf" are the same format.
    pub fn set_format(&mut self, format: &str, enabled: bool) {
        let normalized = format.trim().trim_start_matches('.').to_lowercase();
        if normalized.is_empty() {
            return;
        }
        if enabled {
            self.formats.insert(normalized);
        } else {
            self.formats.remove(&normalized);
        }
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    pub fn set_service(&mut self, service: &str) {
        self.service = service.trim().to_string();
    }

    /// Check the selection and snapshot it for submission.
    pub fn validate(&self) -> Result<ValidatedSelection, ValidationError> {
        let file = self.file.clone().ok_or(ValidationError::NoFile)?;
        if self.target_languages.is_empty() {
            return Err(ValidationError::NoLanguage);
        }
        if self.formats.is_empty() {
            return Err(ValidationError::NoFormat);
        }
        Ok(ValidatedSelection {
            file,
            target_languages: self.target_languages.clone(),
            formats: self.formats.iter().cloned().collect(),
            service: self.service.clone(),
        })
    }
}

/// Immutable snapshot of a selection that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedSelection {
    pub file: SelectedFile,
    pub target_languages: Vec<String>,
    pub formats: Vec<String>,
    pub service: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deck() -> SelectedFile {
        SelectedFile {
            path: PathBuf::from("/tmp/deck.pptx"),
            name: "deck.pptx".into(),
            size_bytes: 2048,
        }
    }

    fn complete() -> SelectionState {
        let mut s = SelectionState::default();
        s.set_file(Some(deck()));
        s.select_language("fr");
        s.set_format("pptx", true);
        s.set_service("google");
        s
    }

    #[test]
    fn complete_selection_validates() {
        let validated = complete().validate().unwrap();
        assert_eq!(validated.file.name, "deck.pptx");
        assert_eq!(validated.target_languages, ["fr"]);
        assert_eq!(validated.formats, ["pptx"]);
        assert_eq!(validated.service, "google");
    }

    #[test]
    fn missing_file() {
        let mut s = complete();
        s.set_file(None);
        assert_eq!(s.validate(), Err(ValidationError::NoFile));
    }

    #[test]
    fn missing_language() {
        let mut s = complete();
        s.deselect_language("fr");
        assert_eq!(s.validate(), Err(ValidationError::NoLanguage));
    }

    #[test]
    fn missing_format() {
        let mut s = complete();
        s.set_format("pptx", false);
        assert_eq!(s.validate(), Err(ValidationError::NoFormat));
    }

    #[test]
    fn empty_selection_reports_file_first() {
        assert_eq!(SelectionState::default().validate(), Err(ValidationError::NoFile));
    }

    #[test]
    fn languages_keep_selection_order_without_duplicates() {
        let mut s = SelectionState::default();
        s.select_language("ja");
        s.select_language(" de ");
        s.select_language("ja");
        s.select_language("");
        assert_eq!(s.target_languages(), ["ja", "de"]);
    }

    #[test]
    fn formats_are_normalized() {
        let mut s = SelectionState::default();
        s.set_format(".PDF", true);
        s.set_format("pdf", true);
        s.set_format("  ", true);
        assert_eq!(s.formats().len(), 1);
        assert!(s.formats().contains("pdf"));
        s.set_format("Pdf", false);
        assert!(s.formats().is_empty());
    }

    #[test]
    fn rejects_non_pptx() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.docx");
        std::fs::write(&path, b"x").unwrap();
        assert!(matches!(
            SelectedFile::from_path(&path),
            Err(FileRejected::UnsupportedType(name)) if name == "notes.docx"
        ));
    }

    #[test]
    fn accepts_pptx_with_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Deck.PPTX");
        std::fs::write(&path, vec![0u8; 1536]).unwrap();
        let file = SelectedFile::from_path(&path).unwrap();
        assert_eq!(file.name, "Deck.PPTX");
        assert_eq!(file.size_bytes, 1536);
        assert_eq!(file.display_size(), "1.5 KB");
    }

    #[test]
    fn rejects_oversized_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("huge.pptx");
        let f = std::fs::File::create(&path).unwrap();
        f.set_len(150 * 1024 * 1024).unwrap();
        let err = SelectedFile::from_path(&path).unwrap_err();
        assert!(matches!(err, FileRejected::TooLarge { size, .. } if size == 150 * 1024 * 1024));
        assert_eq!(
            err.to_string(),
            "huge.pptx is 150 MB, over the 100 MB upload limit"
        );
    }

    #[test]
    fn missing_pptx_is_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            SelectedFile::from_path(&dir.path().join("gone.pptx")),
            Err(FileRejected::Unreadable { .. })
        ));
    }

    #[test]
    fn sizes_are_human_readable() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(1024), "1 KB");
        assert_eq!(format_size(5 * 1024 * 1024), "5 MB");
        assert_eq!(format_size(MAX_UPLOAD_BYTES), "100 MB");
    }
}
