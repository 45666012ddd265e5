//! Session model for one open directory
//!
//! Owns the current directory, the scanned listing, the annotation store,
//! and the selection. The UI issues intent calls (`save_note`,
//! `toggle_flag_at`, `select`) against this object and reads state back from
//! it; the session never reaches into UI objects.
//!
//! Persistence policy: the CSV sidecar is rewritten immediately after every
//! note save and flag toggle. There is no separate "save" step.

use std::path::{Path, PathBuf};

use crate::scanner::{scan_pdf_directory, ScanError};
use crate::store::{AnnotationStore, StoreError, StoreResult};

/// Errors raised while opening a directory
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// State for one scanned directory of PDFs
#[derive(Debug, Default)]
pub struct Session {
    directory: Option<PathBuf>,
    pdf_files: Vec<String>,
    store: AnnotationStore,
    selected: Option<usize>,
}

impl Session {
    /// Creates an empty session with no directory open
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a directory: scan it, load the sidecar, select the first file
    ///
    /// On failure the previous session state is left untouched.
    pub fn open_directory<P: AsRef<Path>>(&mut self, dir: P) -> Result<(), SessionError> {
        let dir = dir.as_ref();
        let pdf_files = scan_pdf_directory(dir)?;
        let store = AnnotationStore::load(dir)?;

        self.directory = Some(dir.to_path_buf());
        self.selected = if pdf_files.is_empty() { None } else { Some(0) };
        self.pdf_files = pdf_files;
        self.store = store;

        Ok(())
    }

    /// The currently open directory, if any
    pub fn directory(&self) -> Option<&Path> {
        self.directory.as_deref()
    }

    /// The sorted PDF listing for the open directory
    pub fn pdf_files(&self) -> &[String] {
        &self.pdf_files
    }

    /// Number of PDFs in the listing
    pub fn file_count(&self) -> usize {
        self.pdf_files.len()
    }

    /// Index of the selected file, if any
    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    /// Name of the selected file, if any
    pub fn current_file(&self) -> Option<&str> {
        self.selected
            .and_then(|i| self.pdf_files.get(i))
            .map(String::as_str)
    }

    /// Full path for a file in the open directory
    pub fn pdf_path(&self, pdf_file: &str) -> Option<PathBuf> {
        self.directory.as_ref().map(|d| d.join(pdf_file))
    }

    /// Select the file at `index`; out-of-range indices are ignored
    pub fn select(&mut self, index: usize) {
        if index < self.pdf_files.len() {
            self.selected = Some(index);
        }
    }

    /// Move the selection to the next file, stopping at the end
    pub fn select_next(&mut self) {
        if let Some(i) = self.selected {
            if i + 1 < self.pdf_files.len() {
                self.selected = Some(i + 1);
            }
        }
    }

    /// Move the selection to the previous file, stopping at the start
    pub fn select_previous(&mut self) {
        if let Some(i) = self.selected {
            if i > 0 {
                self.selected = Some(i - 1);
            }
        }
    }

    /// Note text for a file, if one is set
    pub fn note(&self, pdf_file: &str) -> Option<&str> {
        self.store.note(pdf_file)
    }

    /// Flagged status for a file
    pub fn is_flagged(&self, pdf_file: &str) -> bool {
        self.store.is_flagged(pdf_file)
    }

    /// True if the file has a non-empty note
    pub fn is_complete(&self, pdf_file: &str) -> bool {
        self.store.is_complete(pdf_file)
    }

    /// Number of files in the listing with a non-empty note
    pub fn completed_count(&self) -> usize {
        self.store.completed_count(&self.pdf_files)
    }

    /// Set the note for the current file and flush the sidecar
    ///
    /// Callers normalize case before passing `text`; the store keeps it
    /// verbatim. A no-op when nothing is selected.
    pub fn save_note(&mut self, text: &str) -> StoreResult<()> {
        let Some(file) = self.current_file().map(str::to_string) else {
            return Ok(());
        };
        self.store.set_note(&file, text);
        self.flush()
    }

    /// Toggle the flag for the file at `index` and flush the sidecar
    ///
    /// Returns the new flag value, or None for an out-of-range index.
    pub fn toggle_flag_at(&mut self, index: usize) -> StoreResult<Option<bool>> {
        let Some(file) = self.pdf_files.get(index).cloned() else {
            return Ok(None);
        };
        let flag = self.store.toggle_flag(&file);
        self.flush()?;
        Ok(Some(flag))
    }

    /// Toggle the flag for the selected file and flush the sidecar
    pub fn toggle_current_flag(&mut self) -> StoreResult<Option<bool>> {
        match self.selected {
            Some(i) => self.toggle_flag_at(i),
            None => Ok(None),
        }
    }

    fn flush(&self) -> StoreResult<()> {
        match &self.directory {
            Some(dir) => self.store.save(dir, &self.pdf_files),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use tempfile::TempDir;

    fn pdf_dir(names: &[&str]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for name in names {
            File::create(dir.path().join(name)).unwrap();
        }
        dir
    }

    #[test]
    fn test_open_directory_selects_first_file() {
        let dir = pdf_dir(&["b.pdf", "a.pdf"]);
        let mut session = Session::new();
        session.open_directory(dir.path()).unwrap();

        assert_eq!(session.pdf_files(), ["a.pdf", "b.pdf"]);
        assert_eq!(session.current_file(), Some("a.pdf"));
    }

    #[test]
    fn test_open_empty_directory_has_no_selection() {
        let dir = TempDir::new().unwrap();
        let mut session = Session::new();
        session.open_directory(dir.path()).unwrap();

        assert_eq!(session.current_file(), None);
        assert_eq!(session.file_count(), 0);
    }

    #[test]
    fn test_open_missing_directory_keeps_prior_state() {
        let dir = pdf_dir(&["a.pdf"]);
        let mut session = Session::new();
        session.open_directory(dir.path()).unwrap();

        let missing = dir.path().join("nope");
        assert!(session.open_directory(&missing).is_err());
        assert_eq!(session.current_file(), Some("a.pdf"));
    }

    #[test]
    fn test_selection_stops_at_bounds() {
        let dir = pdf_dir(&["a.pdf", "b.pdf"]);
        let mut session = Session::new();
        session.open_directory(dir.path()).unwrap();

        session.select_previous();
        assert_eq!(session.selected_index(), Some(0));
        session.select_next();
        session.select_next();
        assert_eq!(session.selected_index(), Some(1));
        session.select(99);
        assert_eq!(session.selected_index(), Some(1));
    }

    #[test]
    fn test_save_note_flushes_sidecar() {
        let dir = pdf_dir(&["a.pdf", "b.pdf"]);
        let mut session = Session::new();
        session.open_directory(dir.path()).unwrap();
        session.save_note("FIRST NOTE").unwrap();

        let contents =
            fs::read_to_string(dir.path().join(crate::store::SIDECAR_FILE_NAME)).unwrap();
        assert_eq!(
            contents,
            "PDF File,Note,Flagged\na.pdf,FIRST NOTE,0\nb.pdf,,0\n"
        );
        assert_eq!(session.completed_count(), 1);
    }

    #[test]
    fn test_toggle_flag_flushes_and_reports_new_value() {
        let dir = pdf_dir(&["a.pdf"]);
        let mut session = Session::new();
        session.open_directory(dir.path()).unwrap();

        assert_eq!(session.toggle_current_flag().unwrap(), Some(true));
        assert_eq!(session.toggle_current_flag().unwrap(), Some(false));
        assert_eq!(session.toggle_flag_at(7).unwrap(), None);
    }

    #[test]
    fn test_reopen_directory_reloads_annotations() {
        let dir = pdf_dir(&["a.pdf"]);
        let mut session = Session::new();
        session.open_directory(dir.path()).unwrap();
        session.save_note("KEPT").unwrap();

        let mut fresh = Session::new();
        fresh.open_directory(dir.path()).unwrap();
        assert_eq!(fresh.note("a.pdf"), Some("KEPT"));
    }
}
