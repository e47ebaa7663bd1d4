use std::fmt;
use std::path::Path;

use crate::api::ApiError;

pub const PDF_MIME: &str = "application/pdf";

/// Opaque identifier the backend hands back for an uploaded document
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentRef(String);

impl DocumentRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single PDF ready to be sent to the upload endpoint
#[derive(Debug, Clone)]
pub struct UploadFile {
    name: String,
    bytes: Vec<u8>,
}

impl UploadFile {
    /// Build from a file name and its contents. Only the extension is
    /// checked; size and content are left to the backend.
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Result<Self, ApiError> {
        let name = name.into();
        if !is_pdf_path(Path::new(&name)) {
            return Err(ApiError::UnsupportedFile(name));
        }
        Ok(Self { name, bytes })
    }

    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, ApiError> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| ApiError::UnsupportedFile(path.display().to_string()))?;

        // Refuse before touching the disk
        if !is_pdf_path(path) {
            return Err(ApiError::UnsupportedFile(name));
        }

        let bytes = tokio::fs::read(path).await.map_err(|e| ApiError::ReadFile {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        Self::new(name, bytes)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// `.pdf` extension, any case
pub fn is_pdf_path(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    #[test]
    fn test_is_pdf_path() {
        assert!(is_pdf_path(Path::new("report.pdf")));
        assert!(is_pdf_path(Path::new("/tmp/REPORT.PDF")));
        assert!(!is_pdf_path(Path::new("report.pdf.txt")));
        assert!(!is_pdf_path(Path::new("report")));
    }

    #[test]
    fn test_new_rejects_non_pdf() {
        let err = UploadFile::new("notes.txt", vec![1, 2, 3]).unwrap_err();
        assert_eq!(err, ApiError::UnsupportedFile("notes.txt".to_string()));
    }

    #[tokio::test]
    async fn test_from_path_reads_bytes() {
        let mut file = Builder::new().suffix(".pdf").tempfile().unwrap();
        file.write_all(b"%PDF-1.4 test").unwrap();

        let upload = UploadFile::from_path(file.path()).await.unwrap();
        assert_eq!(upload.bytes(), b"%PDF-1.4 test");
        assert!(upload.name().ends_with(".pdf"));
    }

    #[tokio::test]
    async fn test_from_path_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.pdf");

        let err = UploadFile::from_path(&path).await.unwrap_err();
        assert!(matches!(err, ApiError::ReadFile { .. }));
    }
}
