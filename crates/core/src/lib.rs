//! PDF Notes Core Library
//!
//! Directory scanning, the annotation store, and the session model for the
//! PDF notes tool.

pub mod scanner;
pub mod session;
pub mod store;

pub use scanner::{scan_pdf_directory, ScanError};
pub use session::{Session, SessionError};
pub use store::{AnnotationStore, StoreError, StoreResult, SIDECAR_FILE_NAME};
