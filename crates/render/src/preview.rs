//! First-page preview rendering
//!
//! Renders the region of a PDF's first page that holds the identifying text
//! this tool annotates: the top-right quadrant (right half of the width, top
//! 30% of the height). The page is rasterized oversized through PDFium,
//! cropped, then downscaled with Lanczos3 to a display width.

use image::imageops::{self, FilterType};
use image::RgbaImage;
use pdfium_render::prelude::*;
use std::path::Path;

/// Horizontal start of the crop, as a fraction of page width
const CROP_LEFT_FRACTION: f32 = 0.5;

/// Vertical extent of the crop from the top, as a fraction of page height
const CROP_HEIGHT_FRACTION: f32 = 0.3;

/// Maximum width of the returned preview in pixels
const TARGET_MAX_WIDTH: u32 = 1200;

/// Oversampling factor applied before the downscale pass
const SUPERSAMPLE: f32 = 2.0;

/// Errors that can occur while rendering a preview
#[derive(Debug)]
pub enum PreviewError {
    /// Failed to initialize the PDFium library
    InitializationError(String),

    /// Failed to load the PDF document
    LoadError(String),

    /// Document has no pages
    EmptyDocument,

    /// Rasterization or image conversion error
    RenderError(String),
}

impl std::fmt::Display for PreviewError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PreviewError::InitializationError(msg) => {
                write!(f, "PDFium initialization error: {}", msg)
            }
            PreviewError::LoadError(msg) => write!(f, "PDF load error: {}", msg),
            PreviewError::EmptyDocument => write!(f, "PDF document has no pages"),
            PreviewError::RenderError(msg) => write!(f, "PDF render error: {}", msg),
        }
    }
}

impl std::error::Error for PreviewError {}

/// Result type for preview operations
pub type PreviewResult<T> = Result<T, PreviewError>;

/// A rendered preview bitmap
#[derive(Debug, Clone)]
pub struct PreviewImage {
    /// RGBA pixel data, 4 bytes per pixel, row-major from the top
    pub rgba: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Renders first-page previews through PDFium
///
/// Binds the PDFium library once at construction; each render call opens
/// the document, rasterizes, and drops the document handle before
/// returning, on success and failure paths alike.
pub struct PreviewRenderer {
    pdfium: Pdfium,
}

impl PreviewRenderer {
    /// Bind PDFium and create a renderer
    ///
    /// Search order:
    /// 1. Executable's directory (for app bundles: .app/Contents/MacOS/)
    /// 2. Current working directory
    /// 3. System library paths
    pub fn new() -> PreviewResult<Self> {
        let exe_dir = std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()));

        if let Some(ref dir) = exe_dir {
            if let Ok(bindings) =
                Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(dir))
            {
                return Ok(Self { pdfium: Pdfium::new(bindings) });
            }
        }

        let bindings = Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
            .or_else(|_| Pdfium::bind_to_system_library())
            .map_err(|e| PreviewError::InitializationError(e.to_string()))?;

        Ok(Self { pdfium: Pdfium::new(bindings) })
    }

    /// Render the top-right crop of the first page of `path`
    ///
    /// # Errors
    /// Returns `PreviewError` if the file cannot be opened or rasterized;
    /// callers treat any failure as "no preview available".
    pub fn render_preview<P: AsRef<Path>>(&self, path: P) -> PreviewResult<PreviewImage> {
        let document = self
            .pdfium
            .load_pdf_from_file(path.as_ref(), None)
            .map_err(|e| PreviewError::LoadError(e.to_string()))?;

        let page = document
            .pages()
            .get(0)
            .map_err(|_| PreviewError::EmptyDocument)?;

        let page_width = page.width().value;
        let page_height = page.height().value;
        if page_width <= 0.0 || page_height <= 0.0 {
            return Err(PreviewError::RenderError("page has no area".to_string()));
        }

        // Rasterize the full page wide enough that the crop comes out
        // oversampled relative to the display width.
        let crop_fraction = 1.0 - CROP_LEFT_FRACTION;
        let render_width = (TARGET_MAX_WIDTH as f32 * SUPERSAMPLE / crop_fraction) as u32;
        let render_height = (render_width as f32 * page_height / page_width) as u32;

        let config = PdfRenderConfig::new()
            .set_target_width(render_width as i32)
            .set_target_height(render_height as i32);

        let bitmap = page
            .render_with_config(&config)
            .map_err(|e| PreviewError::RenderError(e.to_string()))?;
        let rgba = bitmap.as_rgba_bytes().to_vec();

        let full = RgbaImage::from_raw(render_width, render_height, rgba)
            .ok_or_else(|| PreviewError::RenderError("unexpected bitmap size".to_string()))?;

        Ok(crop_and_scale(&full))
    }
}

/// Crop the top-right region of a rendered page and scale it to fit
/// `TARGET_MAX_WIDTH`
fn crop_and_scale(full: &RgbaImage) -> PreviewImage {
    let crop_x = (full.width() as f32 * CROP_LEFT_FRACTION) as u32;
    let crop_width = full.width() - crop_x;
    let crop_height = ((full.height() as f32 * CROP_HEIGHT_FRACTION) as u32).max(1);

    let cropped = imageops::crop_imm(full, crop_x, 0, crop_width, crop_height).to_image();

    let preview = if cropped.width() > TARGET_MAX_WIDTH {
        let ratio = TARGET_MAX_WIDTH as f32 / cropped.width() as f32;
        let target_height = ((cropped.height() as f32 * ratio) as u32).max(1);
        imageops::resize(&cropped, TARGET_MAX_WIDTH, target_height, FilterType::Lanczos3)
    } else {
        cropped
    };

    PreviewImage {
        width: preview.width(),
        height: preview.height(),
        rgba: preview.into_raw(),
    }
}
