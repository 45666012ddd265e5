//! PDF Notes Render Library
//!
//! First-page preview rendering over PDFium: the top-right crop the note
//! taker reads from, rasterized and downscaled for display.

pub mod preview;

pub use preview::{PreviewError, PreviewImage, PreviewRenderer, PreviewResult};
