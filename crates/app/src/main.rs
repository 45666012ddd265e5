//! PDF Notes - egui-based UI
//!
//! Browse a directory of PDFs, preview the top-right corner of each first
//! page, and attach an uppercase note and a flag per file. Annotations are
//! flushed to the `pdf_notes.csv` sidecar after every edit.

mod recent_dirs;

use eframe::egui;
use pdf_notes_core::Session;
use pdf_notes_render::PreviewRenderer;
use recent_dirs::RecentDirs;
use std::collections::HashMap;
use std::path::PathBuf;

fn main() -> eframe::Result {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 800.0])
            .with_min_inner_size([900.0, 600.0])
            .with_title("PDF Notes"),
        ..Default::default()
    };

    eframe::run_native(
        "PDF Notes",
        options,
        Box::new(|cc| Ok(Box::new(PdfNotesApp::new(cc)))),
    )
}

/// Note color for files with a saved note
const COMPLETED_COLOR: egui::Color32 = egui::Color32::from_rgb(0, 255, 0);

/// Note color for flagged files
const FLAGGED_COLOR: egui::Color32 = egui::Color32::from_rgb(255, 0, 0);

/// Preview texture for one PDF file
struct PreviewTexture {
    handle: egui::TextureHandle,
}

struct PdfNotesApp {
    // Directory, listing, annotations, selection
    session: Session,

    // Quick-open history
    recent_dirs: RecentDirs,

    // None when PDFium could not be bound; previews are then unavailable
    renderer: Option<PreviewRenderer>,

    // Note entry field (kept uppercase)
    note_input: String,

    // Preview cache: file name -> texture (None = render failed)
    previews: HashMap<String, Option<PreviewTexture>>,

    // Dialogs
    error_dialog: Option<ErrorDialogState>,
}

/// Error dialog state
struct ErrorDialogState {
    severity: ErrorSeverity,
    title: String,
    message: String,
}

#[derive(Clone, Copy, PartialEq)]
#[allow(dead_code)]
enum ErrorSeverity {
    Error,
    Warning,
    Info,
}

impl ErrorSeverity {
    fn icon(&self) -> &'static str {
        match self {
            ErrorSeverity::Error => "❌",
            ErrorSeverity::Warning => "⚠️",
            ErrorSeverity::Info => "ℹ️",
        }
    }

    fn title(&self) -> &'static str {
        match self {
            ErrorSeverity::Error => "Error",
            ErrorSeverity::Warning => "Warning",
            ErrorSeverity::Info => "Notice",
        }
    }
}

impl PdfNotesApp {
    fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let renderer = match PreviewRenderer::new() {
            Ok(renderer) => Some(renderer),
            Err(e) => {
                eprintln!("Warning: PDFium unavailable, previews disabled: {}", e);
                None
            }
        };

        let mut recent_dirs = RecentDirs::new();
        if let Err(e) = recent_dirs.load() {
            eprintln!("Warning: Could not load recent directories: {}", e);
        }

        Self {
            session: Session::new(),
            recent_dirs,
            renderer,
            note_input: String::new(),
            previews: HashMap::new(),
            error_dialog: None,
        }
    }

    fn show_error(&mut self, severity: ErrorSeverity, message: impl Into<String>) {
        self.error_dialog = Some(ErrorDialogState {
            severity,
            title: severity.title().to_string(),
            message: message.into(),
        });
    }

    /// Pick a directory with the folder picker; cancel is a no-op
    fn select_directory(&mut self) {
        if let Some(dir) = rfd::FileDialog::new().pick_folder() {
            self.open_directory(dir);
        }
    }

    /// Scan a directory and load its sidecar annotations
    fn open_directory(&mut self, dir: PathBuf) {
        match self.session.open_directory(&dir) {
            Ok(()) => {
                self.previews.clear();
                self.recent_dirs.add(&dir);
                if let Err(e) = self.recent_dirs.save() {
                    eprintln!("Warning: Could not save recent directories: {}", e);
                }
                self.sync_note_input();
            }
            Err(e) => {
                self.show_error(
                    ErrorSeverity::Error,
                    format!("Failed to open directory: {}", e),
                );
            }
        }
    }

    /// Put the selected file's saved note into the entry field
    fn sync_note_input(&mut self) {
        self.note_input = self
            .session
            .current_file()
            .and_then(|f| self.session.note(f))
            .unwrap_or("")
            .to_uppercase();
    }

    fn select_file(&mut self, index: usize) {
        self.session.select(index);
        self.sync_note_input();
    }

    fn select_next_file(&mut self) {
        self.session.select_next();
        self.sync_note_input();
    }

    fn select_previous_file(&mut self) {
        self.session.select_previous();
        self.sync_note_input();
    }

    /// Save the entry field as the current file's note and flush the CSV
    ///
    /// Empty input is ignored, matching the entry-and-advance workflow:
    /// clearing a note is done by saving over it from an edited row.
    fn save_note(&mut self) {
        let text = self.note_input.trim().to_uppercase();
        if text.is_empty() || self.session.current_file().is_none() {
            return;
        }

        match self.session.save_note(&text) {
            Ok(()) => self.note_input.clear(),
            Err(e) => {
                self.show_error(ErrorSeverity::Error, format!("Failed to save note: {}", e));
            }
        }
    }

    fn toggle_flag(&mut self, index: usize) {
        if let Err(e) = self.session.toggle_flag_at(index) {
            self.show_error(ErrorSeverity::Error, format!("Failed to save flag: {}", e));
        }
    }

    /// Render the preview for a file and cache it (None on failure)
    fn ensure_preview(&mut self, ctx: &egui::Context, pdf_file: &str) {
        if self.previews.contains_key(pdf_file) {
            return;
        }

        let Some(renderer) = &self.renderer else {
            self.previews.insert(pdf_file.to_string(), None);
            return;
        };
        let Some(path) = self.session.pdf_path(pdf_file) else {
            return;
        };

        let texture = match renderer.render_preview(&path) {
            Ok(preview) => {
                let image = egui::ColorImage::from_rgba_unmultiplied(
                    [preview.width as usize, preview.height as usize],
                    &preview.rgba,
                );
                let handle = ctx.load_texture(
                    format!("preview_{}", pdf_file),
                    image,
                    egui::TextureOptions::LINEAR,
                );
                Some(PreviewTexture { handle })
            }
            Err(e) => {
                eprintln!("Failed to render preview for {}: {}", pdf_file, e);
                None
            }
        };

        self.previews.insert(pdf_file.to_string(), texture);
    }
}

impl eframe::App for PdfNotesApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_keyboard_shortcuts(ctx);
        self.draw_sidebar(ctx);
        self.draw_note_panel(ctx);
        self.draw_error_dialog(ctx);
    }
}

impl PdfNotesApp {
    fn handle_keyboard_shortcuts(&mut self, ctx: &egui::Context) {
        let modifiers = ctx.input(|i| i.modifiers);
        let cmd_or_ctrl = modifiers.command || modifiers.ctrl;

        let (next, previous, toggle, escape) = ctx.input(|i| {
            (
                i.key_pressed(egui::Key::ArrowDown)
                    || (cmd_or_ctrl && i.key_pressed(egui::Key::N)),
                i.key_pressed(egui::Key::ArrowUp)
                    || (cmd_or_ctrl && i.key_pressed(egui::Key::P)),
                cmd_or_ctrl && i.key_pressed(egui::Key::F),
                i.key_pressed(egui::Key::Escape),
            )
        });

        if next {
            self.select_next_file();
        }
        if previous {
            self.select_previous_file();
        }
        if toggle {
            if let Some(index) = self.session.selected_index() {
                self.toggle_flag(index);
            }
        }
        if escape && self.error_dialog.is_some() {
            self.error_dialog = None;
        }
    }

    fn draw_sidebar(&mut self, ctx: &egui::Context) {
        egui::SidePanel::left("file_list")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                ui.add_space(4.0);
                if ui
                    .add_sized([ui.available_width(), 24.0], egui::Button::new("Select Directory"))
                    .clicked()
                {
                    self.select_directory();
                }

                self.draw_recent_dirs(ui);

                ui.separator();
                ui.strong(self.counter_text());
                ui.separator();

                if self.session.directory().is_none() {
                    ui.weak("No directory selected");
                    return;
                }

                let files = self.session.pdf_files().to_vec();
                egui::ScrollArea::vertical().show(ui, |ui| {
                    for (index, pdf_file) in files.iter().enumerate() {
                        self.draw_file_row(ui, index, pdf_file);
                    }
                });
            });
    }

    fn draw_recent_dirs(&mut self, ui: &mut egui::Ui) {
        let recent = self.recent_dirs.dirs().to_vec();
        if recent.is_empty() {
            return;
        }

        ui.collapsing("Recent", |ui| {
            for dir in recent {
                let label = dir
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| dir.display().to_string());
                if ui
                    .button(label)
                    .on_hover_text(dir.display().to_string())
                    .clicked()
                {
                    self.open_directory(dir);
                }
            }
        });
    }

    fn counter_text(&self) -> String {
        if self.session.file_count() == 0 {
            "No PDFs loaded".to_string()
        } else {
            format!(
                "PDF {} of {}",
                self.session.completed_count(),
                self.session.file_count()
            )
        }
    }

    fn draw_file_row(&mut self, ui: &mut egui::Ui, index: usize, pdf_file: &str) {
        let is_selected = self.session.selected_index() == Some(index);
        let is_complete = self.session.is_complete(pdf_file);
        let is_flagged = self.session.is_flagged(pdf_file);

        ui.horizontal(|ui| {
            let mut flagged = is_flagged;
            if ui.checkbox(&mut flagged, "").changed() {
                self.toggle_flag(index);
            }

            // Flagged wins over completed for the row tint
            let color = if is_flagged {
                FLAGGED_COLOR
            } else if is_complete {
                COMPLETED_COLOR
            } else {
                ui.visuals().text_color()
            };
            let prefix = if is_complete { "✓ " } else { "   " };
            let text = egui::RichText::new(format!("{}{}", prefix, pdf_file)).color(color);

            if ui.selectable_label(is_selected, text).clicked() {
                self.select_file(index);
            }
        });
        ui.separator();
    }

    fn draw_note_panel(&mut self, ctx: &egui::Context) {
        // Render the selected file's preview before drawing
        if let Some(file) = self.session.current_file().map(str::to_string) {
            self.ensure_preview(ctx, &file);
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            if self.session.directory().is_none() {
                ui.centered_and_justified(|ui| {
                    ui.heading("Select a directory of PDFs to get started");
                });
                return;
            }

            let Some(current) = self.session.current_file().map(str::to_string) else {
                ui.centered_and_justified(|ui| {
                    ui.heading("No PDF files in this directory");
                });
                return;
            };

            ui.add_space(8.0);
            self.draw_note_input(ui);
            ui.add_space(12.0);

            // Saved note, large and centered
            let note = self.session.note(&current).unwrap_or("").to_string();
            ui.vertical_centered(|ui| {
                ui.label(
                    egui::RichText::new(note)
                        .monospace()
                        .strong()
                        .size(32.0),
                );
            });

            ui.add_space(12.0);
            self.draw_preview(ui, &current);
            ui.add_space(12.0);
            draw_shortcut_help(ui);
        });
    }

    fn draw_note_input(&mut self, ui: &mut egui::Ui) {
        let mut save_clicked = false;
        let mut entered = false;

        ui.horizontal(|ui| {
            let response = ui.add(
                egui::TextEdit::singleline(&mut self.note_input)
                    .font(egui::TextStyle::Monospace)
                    .hint_text("Note for this PDF...")
                    .desired_width(ui.available_width() - 100.0),
            );

            // Keep the field uppercase as the user types
            if response.changed() {
                let upper = self.note_input.to_uppercase();
                if upper != self.note_input {
                    self.note_input = upper;
                }
            }

            entered = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            save_clicked = ui.button("Save Note").clicked();
        });

        if entered {
            // Enter saves and advances to the next file
            self.save_note();
            self.select_next_file();
        } else if save_clicked {
            self.save_note();
        }
    }

    fn draw_preview(&mut self, ui: &mut egui::Ui, pdf_file: &str) {
        ui.vertical_centered(|ui| match self.previews.get(pdf_file) {
            Some(Some(texture)) => {
                let size = texture.handle.size_vec2();
                let scale = (ui.available_width() / size.x).min(1.0);
                ui.image((texture.handle.id(), size * scale));
            }
            Some(None) => {
                ui.weak("No preview available");
            }
            None => {
                ui.weak("Rendering preview...");
            }
        });
    }

    fn draw_error_dialog(&mut self, ctx: &egui::Context) {
        let Some(error) = &self.error_dialog else {
            return;
        };

        let title = format!("{} {}", error.severity.icon(), error.title);
        let message = error.message.clone();

        let mut should_close = false;
        egui::Window::new(title)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(&message);
                ui.add_space(12.0);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Min), |ui| {
                    if ui.button("OK").clicked() {
                        should_close = true;
                    }
                });
            });

        if should_close {
            self.error_dialog = None;
        }
    }
}

fn draw_shortcut_help(ui: &mut egui::Ui) {
    ui.vertical_centered(|ui| {
        ui.weak("↑ / Ctrl+P: Previous PDF    ↓ / Ctrl+N: Next PDF");
        ui.weak("Enter: Save Note & Next PDF    Ctrl+F: Toggle Flag");
    });
}
