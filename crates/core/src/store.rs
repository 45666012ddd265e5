//! Annotation store with CSV sidecar persistence
//!
//! Holds the per-file note text and flagged status for one directory of
//! PDFs, loaded from and saved to a `pdf_notes.csv` sidecar file colocated
//! with the documents.
//!
//! The sidecar format is a header row (`PDF File,Note,Flagged`) followed by
//! one row per file. Loading is deliberately lenient to tolerate hand-edited
//! or legacy files: a two-column row (no Flagged column) is accepted with
//! the flag defaulting to false, and rows with fewer than two columns are
//! skipped. Saving always rewrites the whole file in the three-column
//! format, one row per file in the current directory listing.

use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};

/// File name of the CSV sidecar stored alongside the PDFs
pub const SIDECAR_FILE_NAME: &str = "pdf_notes.csv";

/// Error types for store persistence
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Returns the sidecar path for a directory of PDFs
pub fn sidecar_path(dir: &Path) -> PathBuf {
    dir.join(SIDECAR_FILE_NAME)
}

/// In-memory mapping from PDF file name to note text and flagged status
///
/// File names are the natural key: unique within one directory, matched
/// case-sensitively. An empty note is equivalent to no note, so the notes
/// map only ever holds non-empty entries.
#[derive(Debug, Default, Clone)]
pub struct AnnotationStore {
    notes: HashMap<String, String>,
    flags: HashMap<String, bool>,
}

impl AnnotationStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Load annotations from the sidecar file in `dir`
    ///
    /// A missing sidecar is not an error: it yields an empty store. Entries
    /// for files no longer present in the directory are kept in memory; the
    /// live directory listing decides what is displayed and written back.
    ///
    /// # Errors
    /// Returns `StoreError` if the sidecar exists but cannot be read.
    pub fn load(dir: &Path) -> StoreResult<Self> {
        let csv_path = sidecar_path(dir);
        if !csv_path.exists() {
            return Ok(Self::new());
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(&csv_path)?;

        let mut store = Self::new();
        for record in reader.records() {
            let record = record?;
            match record.len() {
                // Current format: file, note, flag marker
                len if len >= 3 => {
                    let file = record[0].to_string();
                    if !record[1].is_empty() {
                        store.notes.insert(file.clone(), record[1].to_string());
                    }
                    store.flags.insert(file, &record[2] == "1");
                }
                // Legacy format without the Flagged column
                2 => {
                    if !record[1].is_empty() {
                        store
                            .notes
                            .insert(record[0].to_string(), record[1].to_string());
                    }
                }
                // Malformed row, skip
                _ => {}
            }
        }

        Ok(store)
    }

    /// Save annotations to the sidecar file in `dir`
    ///
    /// Rewrites the whole file: header plus exactly one row per entry of
    /// `pdf_files`, in the given order. There is no merging with external
    /// edits; the last writer wins.
    ///
    /// # Errors
    /// Returns `StoreError` if the sidecar cannot be written.
    pub fn save(&self, dir: &Path, pdf_files: &[String]) -> StoreResult<()> {
        let file = File::create(sidecar_path(dir))?;
        let mut writer = csv::Writer::from_writer(file);

        writer.write_record(["PDF File", "Note", "Flagged"])?;
        for pdf_file in pdf_files {
            let note = self.notes.get(pdf_file).map(String::as_str).unwrap_or("");
            let flagged = if self.is_flagged(pdf_file) { "1" } else { "0" };
            writer.write_record([pdf_file.as_str(), note, flagged])?;
        }
        writer.flush()?;

        Ok(())
    }

    /// Returns the note for a file, if one is set
    pub fn note(&self, pdf_file: &str) -> Option<&str> {
        self.notes.get(pdf_file).map(String::as_str)
    }

    /// Returns the flagged status for a file (false when unknown)
    pub fn is_flagged(&self, pdf_file: &str) -> bool {
        self.flags.get(pdf_file).copied().unwrap_or(false)
    }

    /// Set or clear the note for a file
    ///
    /// Text is stored verbatim; any case normalization is the caller's
    /// responsibility. An empty string removes the entry, since an empty
    /// note and an absent note are equivalent.
    pub fn set_note(&mut self, pdf_file: &str, text: &str) {
        if text.is_empty() {
            self.notes.remove(pdf_file);
        } else {
            self.notes.insert(pdf_file.to_string(), text.to_string());
        }
    }

    /// Flip the flagged status for a file and return the new value
    ///
    /// A file with no prior entry is treated as unflagged, so the first
    /// toggle sets it to true.
    pub fn toggle_flag(&mut self, pdf_file: &str) -> bool {
        let flag = !self.is_flagged(pdf_file);
        self.flags.insert(pdf_file.to_string(), flag);
        flag
    }

    /// Returns true if the file has a non-empty note
    pub fn is_complete(&self, pdf_file: &str) -> bool {
        self.notes.get(pdf_file).is_some_and(|n| !n.is_empty())
    }

    /// Number of files in `pdf_files` that have a non-empty note
    ///
    /// Drives the "PDF N of M" counter; derived, never persisted.
    pub fn completed_count(&self, pdf_files: &[String]) -> usize {
        pdf_files.iter().filter(|f| self.is_complete(f)).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn files(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_load_missing_sidecar_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = AnnotationStore::load(dir.path()).unwrap();
        assert_eq!(store.note("a.pdf"), None);
        assert!(!store.is_flagged("a.pdf"));
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let listing = files(&["a.pdf", "b.pdf", "c.pdf"]);

        let mut store = AnnotationStore::new();
        store.set_note("a.pdf", "INVOICE 42");
        store.toggle_flag("b.pdf");
        store.save(dir.path(), &listing).unwrap();

        let loaded = AnnotationStore::load(dir.path()).unwrap();
        assert_eq!(loaded.note("a.pdf"), Some("INVOICE 42"));
        assert_eq!(loaded.note("b.pdf"), None);
        assert!(loaded.is_flagged("b.pdf"));
        assert!(!loaded.is_flagged("a.pdf"));
        assert!(!loaded.is_flagged("c.pdf"));
    }

    #[test]
    fn test_save_is_byte_identical() {
        let dir = TempDir::new().unwrap();
        let listing = files(&["a.pdf", "b.pdf"]);

        let mut store = AnnotationStore::new();
        store.set_note("b.pdf", "HELLO");
        store.toggle_flag("a.pdf");

        store.save(dir.path(), &listing).unwrap();
        let first = fs::read(sidecar_path(dir.path())).unwrap();
        store.save(dir.path(), &listing).unwrap();
        let second = fs::read(sidecar_path(dir.path())).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_save_writes_one_row_per_listed_file() {
        let dir = TempDir::new().unwrap();

        let mut store = AnnotationStore::new();
        // Stale entry not in the current listing must not be written
        store.set_note("gone.pdf", "OLD");
        store.set_note("a.pdf", "KEPT");
        store.save(dir.path(), &files(&["a.pdf", "b.pdf"])).unwrap();

        let contents = fs::read_to_string(sidecar_path(dir.path())).unwrap();
        assert_eq!(contents, "PDF File,Note,Flagged\na.pdf,KEPT,0\nb.pdf,,0\n");
    }

    #[test]
    fn test_load_legacy_two_column_format() {
        let dir = TempDir::new().unwrap();
        fs::write(
            sidecar_path(dir.path()),
            "PDF File,Note\nfile.pdf,hello\n",
        )
        .unwrap();

        let store = AnnotationStore::load(dir.path()).unwrap();
        assert_eq!(store.note("file.pdf"), Some("hello"));
        assert!(!store.is_flagged("file.pdf"));
    }

    #[test]
    fn test_load_skips_malformed_rows() {
        let dir = TempDir::new().unwrap();
        fs::write(
            sidecar_path(dir.path()),
            "PDF File,Note,Flagged\njustonecolumn\na.pdf,NOTE,1\n",
        )
        .unwrap();

        let store = AnnotationStore::load(dir.path()).unwrap();
        assert_eq!(store.note("a.pdf"), Some("NOTE"));
        assert!(store.is_flagged("a.pdf"));
        assert_eq!(store.note("justonecolumn"), None);
    }

    #[test]
    fn test_load_keeps_stale_entries_in_memory() {
        let dir = TempDir::new().unwrap();
        fs::write(
            sidecar_path(dir.path()),
            "PDF File,Note,Flagged\ndeleted.pdf,STILL HERE,1\n",
        )
        .unwrap();

        let store = AnnotationStore::load(dir.path()).unwrap();
        assert_eq!(store.note("deleted.pdf"), Some("STILL HERE"));
        assert!(store.is_flagged("deleted.pdf"));
    }

    #[test]
    fn test_toggle_flag_defaults_to_false() {
        let mut store = AnnotationStore::new();
        assert!(store.toggle_flag("a.pdf"));
        assert!(!store.toggle_flag("a.pdf"));
    }

    #[test]
    fn test_empty_note_equals_absent_after_reload() {
        let dir = TempDir::new().unwrap();
        let listing = files(&["a.pdf"]);

        let mut store = AnnotationStore::new();
        store.set_note("a.pdf", "SOMETHING");
        store.set_note("a.pdf", "");
        store.save(dir.path(), &listing).unwrap();

        let loaded = AnnotationStore::load(dir.path()).unwrap();
        assert_eq!(loaded.note("a.pdf"), None);
        assert!(!loaded.is_complete("a.pdf"));
    }

    #[test]
    fn test_completed_count() {
        let mut store = AnnotationStore::new();
        store.set_note("a.pdf", "DONE");
        store.set_note("gone.pdf", "STALE");
        store.toggle_flag("b.pdf");

        let listing = files(&["a.pdf", "b.pdf", "c.pdf"]);
        assert_eq!(store.completed_count(&listing), 1);
    }
}
