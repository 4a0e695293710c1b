//! File extension classification.
//!
//! Maps a file extension to a coarse content category and validates whether
//! a file name carries an extension acceptable for upload. The lookup is
//! table-driven and total: unknown extensions classify to `None`. Categories
//! are mutually exclusive by construction; the check order is fixed so
//! classification is deterministic.

use serde::{Deserialize, Serialize};

const AUDIO_EXTENSIONS: &[&str] = &[".MP3", ".WAV"];
const CSV_EXTENSIONS: &[&str] = &[".CSV"];
const DOCUMENT_EXTENSIONS: &[&str] = &[".DOC", ".DOCX", ".ODT"];
const EXCEL_EXTENSIONS: &[&str] = &[".XLS", ".XLSX"];
const IMAGE_EXTENSIONS: &[&str] = &[".BMP", ".GIF", ".JPEG", ".JPG", ".PNG", ".TIF", ".TIFF"];
const MOVIE_EXTENSIONS: &[&str] = &[
    ".AVI", ".ASF", ".MPG", ".MPEG", ".MOV", ".MP4", ".MKV", ".3GP", ".WMV", ".WEBM", ".OGG",
];
const PDF_EXTENSIONS: &[&str] = &[".PDF"];
const POWERPOINT_EXTENSIONS: &[&str] = &[".PPT", ".PPS", ".PPTX", ".PPSX"];
const TEXT_EXTENSIONS: &[&str] = &[".TXT"];

/// Coarse content category for an uploaded file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileKind {
    Audio,
    Csv,
    Document,
    Excel,
    Image,
    Movie,
    Pdf,
    Powerpoint,
    Text,
}

impl FileKind {
    /// Lower-case category token stored in the document row.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Audio => "audio",
            Self::Csv => "csv",
            Self::Document => "document",
            Self::Excel => "excel",
            Self::Image => "image",
            Self::Movie => "movie",
            Self::Pdf => "pdf",
            Self::Powerpoint => "powerpoint",
            Self::Text => "text",
        }
    }
}

impl std::fmt::Display for FileKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Ordered category tables; first match wins.
const TABLES: &[(&[&str], FileKind)] = &[
    (IMAGE_EXTENSIONS, FileKind::Image),
    (MOVIE_EXTENSIONS, FileKind::Movie),
    (EXCEL_EXTENSIONS, FileKind::Excel),
    (POWERPOINT_EXTENSIONS, FileKind::Powerpoint),
    (TEXT_EXTENSIONS, FileKind::Text),
    (DOCUMENT_EXTENSIONS, FileKind::Document),
    (PDF_EXTENSIONS, FileKind::Pdf),
    (CSV_EXTENSIONS, FileKind::Csv),
    (AUDIO_EXTENSIONS, FileKind::Audio),
];

/// Classify a file extension (with or without the leading dot).
///
/// Case-insensitive and total: unknown or empty extensions yield `None`.
pub fn classify(extension: &str) -> Option<FileKind> {
    if extension.is_empty() {
        return None;
    }
    let normalized = if extension.starts_with('.') {
        extension.to_uppercase()
    } else {
        format!(".{}", extension.to_uppercase())
    };
    for (table, kind) in TABLES {
        if table.contains(&normalized.as_str()) {
            return Some(*kind);
        }
    }
    None
}

/// Whether the file name carries an extension from any known category.
pub fn is_accepted(filename: &str) -> bool {
    match filename.rfind('.') {
        Some(n) => classify(&filename[n..]).is_some(),
        None => false,
    }
}
