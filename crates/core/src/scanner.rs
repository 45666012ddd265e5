//! Directory scanning for PDF files
//!
//! Lists a single directory (no recursion) and keeps the entries the rest of
//! the tool cares about: visible files with a `.pdf` extension.

use std::fs;
use std::io;
use std::path::Path;

/// Error types for directory scanning
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("failed to read directory {path}: {source}")]
    ReadDir { path: String, source: io::Error },
}

/// Returns true if `filename` is a visible PDF file name.
///
/// Hidden files (names starting with `.`, which also covers macOS `._*`
/// metadata files) are excluded. The extension check is case-insensitive,
/// so `a.pdf` and `B.PDF` both qualify.
pub fn is_valid_pdf(filename: &str) -> bool {
    if filename.starts_with('.') {
        return false;
    }
    filename.to_lowercase().ends_with(".pdf")
}

/// Scan a directory for PDF files
///
/// Returns the file names (not full paths) of all visible PDFs directly in
/// `dir`, sorted ascending by byte value. The collation is deliberately
/// code-point ordered: `B.PDF` sorts before `a.pdf`.
///
/// # Errors
/// Returns `ScanError::ReadDir` if the directory cannot be read.
pub fn scan_pdf_directory<P: AsRef<Path>>(dir: P) -> Result<Vec<String>, ScanError> {
    let dir = dir.as_ref();

    let entries = fs::read_dir(dir).map_err(|source| ScanError::ReadDir {
        path: dir.display().to_string(),
        source,
    })?;

    let mut files: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map(|t| !t.is_dir()).unwrap_or(false))
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| is_valid_pdf(name))
        .collect();

    files.sort();

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::TempDir;

    fn touch(dir: &TempDir, name: &str) {
        File::create(dir.path().join(name)).unwrap();
    }

    #[test]
    fn test_is_valid_pdf() {
        assert!(is_valid_pdf("report.pdf"));
        assert!(is_valid_pdf("REPORT.PDF"));
        assert!(is_valid_pdf("mixed.Pdf"));
        assert!(!is_valid_pdf(".hidden.pdf"));
        assert!(!is_valid_pdf("._metadata.pdf"));
        assert!(!is_valid_pdf("readme.txt"));
        assert!(!is_valid_pdf("pdf"));
    }

    #[test]
    fn test_scan_filters_and_sorts() {
        let dir = TempDir::new().unwrap();
        touch(&dir, "a.pdf");
        touch(&dir, "B.PDF");
        touch(&dir, ".hidden.pdf");
        touch(&dir, "readme.txt");

        let files = scan_pdf_directory(dir.path()).unwrap();

        // Byte-wise sort: uppercase before lowercase
        assert_eq!(files, vec!["B.PDF".to_string(), "a.pdf".to_string()]);
    }

    #[test]
    fn test_scan_skips_subdirectories() {
        let dir = TempDir::new().unwrap();
        touch(&dir, "doc.pdf");
        std::fs::create_dir(dir.path().join("nested.pdf")).unwrap();

        let files = scan_pdf_directory(dir.path()).unwrap();
        assert_eq!(files, vec!["doc.pdf".to_string()]);
    }

    #[test]
    fn test_scan_empty_directory() {
        let dir = TempDir::new().unwrap();
        assert!(scan_pdf_directory(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn test_scan_missing_directory_errors() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("no-such-dir");
        assert!(scan_pdf_directory(&missing).is_err());
    }
}
