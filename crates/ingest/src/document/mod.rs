pub mod chunker;
pub mod export;
mod md;
mod txt;

use std::path::Path;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Unsupported file type: {0}")]
    UnsupportedType(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result of extracting text from a document.
#[derive(Debug, Clone)]
pub struct ExtractedDocument {
    /// Original filename.
    pub filename: String,
    /// File type: "md" or "txt"
    pub file_type: String,
    /// The extracted text, trimmed.
    pub text: String,
    /// Header titles found in the text (markdown only).
    pub headings: Vec<String>,
}

impl ExtractedDocument {
    /// Document id derived from the file stem (`notes/guide.md` → `guide`).
    pub fn doc_id(&self) -> String {
        Path::new(&self.filename)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.filename.clone())
    }

    /// Display title: the bare file name.
    pub fn title(&self) -> String {
        Path::new(&self.filename)
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.filename.clone())
    }

    /// Character count of the extracted text.
    pub fn total_chars(&self) -> usize {
        self.text.chars().count()
    }
}

/// Whether `filename` has an extension `extract_text` understands.
pub fn is_supported(filename: &str) -> bool {
    matches!(
        extension_of(filename).as_str(),
        "md" | "markdown" | "txt" | "text"
    )
}

fn extension_of(filename: &str) -> String {
    Path::new(filename)
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

/// Extract text from file bytes based on file type.
pub fn extract_text(bytes: &[u8], filename: &str) -> Result<ExtractedDocument, ExtractionError> {
    let ext = extension_of(filename);

    let (file_type, text, headings) = match ext.as_str() {
        "md" | "markdown" => {
            let (text, headings) = md::extract_md(bytes);
            ("md", text, headings)
        }
        "txt" | "text" => ("txt", txt::extract_txt(bytes), Vec::new()),
        other => return Err(ExtractionError::UnsupportedType(other.to_string())),
    };

    Ok(ExtractedDocument {
        filename: filename.to_string(),
        file_type: file_type.to_string(),
        text,
        headings,
    })
}

/// Read and extract a file from disk.
pub fn extract_file(path: &Path) -> Result<ExtractedDocument, ExtractionError> {
    let bytes = std::fs::read(path)?;
    extract_text(&bytes, &path.to_string_lossy())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatches_on_extension() {
        let doc = extract_text(b"# Title\n\nBody.", "notes/guide.MD").unwrap();
        assert_eq!(doc.file_type, "md");
        assert_eq!(doc.headings, vec!["Title"]);

        let doc = extract_text(b"plain", "a.txt").unwrap();
        assert_eq!(doc.file_type, "txt");
        assert!(doc.headings.is_empty());
    }

    #[test]
    fn rejects_unknown_extension() {
        let err = extract_text(b"%PDF", "report.pdf").unwrap_err();
        assert!(matches!(err, ExtractionError::UnsupportedType(t) if t == "pdf"));
        assert!(!is_supported("report.pdf"));
        assert!(is_supported("readme.markdown"));
    }

    #[test]
    fn id_and_title_come_from_filename() {
        let doc = extract_text(b"x", "data/handbook.md").unwrap();
        assert_eq!(doc.doc_id(), "handbook");
        assert_eq!(doc.title(), "handbook.md");
    }
}
