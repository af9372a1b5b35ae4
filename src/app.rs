//! Main application state and UI coordination

use std::path::PathBuf;
use std::sync::mpsc::{Receiver, TryRecvError};
use std::time::{Duration, Instant};

use eframe::egui;
use rfd::FileDialog;

use crate::core::config::{AppConfig, ThemeChoice};
use crate::core::intake;
use crate::core::merge::{self, MergeEvent};
use crate::core::queue::MergeQueue;
use crate::core::ui_state::{UiState, STATUS_NEED_TWO};
use crate::ui::drag::DragReorder;
use crate::ui::drop_zone::DropZone;
use crate::ui::file_list::FileListPanel;
use crate::ui::modal::MessageModal;

/// Status line while the worker is running
const STATUS_MERGING: &str = "Merging... this may take a moment.";
/// Status line after a successful merge and save
const STATUS_MERGED: &str = "Merge complete! Your file has been saved.";
/// Status line when a merge fails
const STATUS_MERGE_ERROR: &str = "Error merging files. Please try again.";
/// Modal body when an intake batch contains no PDFs at all
const MSG_ONLY_PDFS: &str = "Please upload only PDF files.";
/// Modal body when merging fails
const MSG_MERGE_ERROR: &str =
    "An error occurred while merging the PDFs. Please ensure all files are valid PDFs and try again.";
/// How long the success status lingers before the session resets
const RESET_DELAY: Duration = Duration::from_secs(3);

/// Main application state
pub struct BinderyApp {
    /// Ordered upload queue
    pub queue: MergeQueue,
    /// Drag-to-reorder controller
    pub drag: DragReorder,
    /// Modal message state
    pub modal: MessageModal,
    /// Status line under the controls
    pub status: String,
    /// Whether the merge action is available
    pub merge_enabled: bool,
    /// Events from the running merge worker, if any
    merge_rx: Option<Receiver<MergeEvent>>,
    /// When the post-merge session reset is due, if pending
    reset_deadline: Option<Instant>,
    /// Application configuration
    pub config: AppConfig,
}

impl BinderyApp {
    /// Create a new application instance
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        // Load config or use defaults
        let config = AppConfig::load().unwrap_or_default();
        Self::apply_theme(&cc.egui_ctx, config.theme);
        Self::with_config(config)
    }

    /// Build the application state without touching an egui context
    pub fn with_config(config: AppConfig) -> Self {
        let initial = UiState::for_queue_len(0);
        Self {
            queue: MergeQueue::new(),
            drag: DragReorder::new(),
            modal: MessageModal::new(),
            status: initial.status,
            merge_enabled: initial.merge_enabled,
            merge_rx: None,
            reset_deadline: None,
            config,
        }
    }

    /// Whether a merge worker is currently running
    pub fn merge_running(&self) -> bool {
        self.merge_rx.is_some()
    }

    /// Apply a theme choice to the egui context
    fn apply_theme(ctx: &egui::Context, theme: ThemeChoice) {
        let preference = match theme {
            ThemeChoice::System => egui::ThemePreference::System,
            ThemeChoice::Light => egui::ThemePreference::Light,
            ThemeChoice::Dark => egui::ThemePreference::Dark,
        };
        ctx.set_theme(preference);
    }

    /// Re-derive the size-dependent UI state from the queue.
    ///
    /// While a merge is running the status line belongs to the worker and
    /// only the disabled button is enforced.
    pub fn refresh_ui_state(&mut self) {
        if self.merge_running() {
            self.merge_enabled = false;
            return;
        }
        let state = UiState::for_queue_len(self.queue.len());
        self.merge_enabled = state.merge_enabled;
        self.status = state.status;
    }

    /// Filter, load, and append a batch of candidate files
    pub fn enqueue_paths(&mut self, paths: Vec<PathBuf>) {
        if paths.is_empty() {
            return;
        }
        let batch = match intake::filter_batch(paths) {
            Ok(batch) => batch,
            Err(err) => {
                tracing::warn!("rejected file batch: {}", err);
                self.modal.open("Invalid Files", MSG_ONLY_PDFS);
                return;
            }
        };
        if batch.rejected > 0 {
            tracing::debug!("dropped {} non-PDF files from the batch", batch.rejected);
        }

        let mut loaded = Vec::with_capacity(batch.accepted.len());
        let mut failed_reads = 0usize;
        for path in &batch.accepted {
            match intake::load_file(path) {
                Ok(file) => loaded.push(file),
                Err(err) => {
                    tracing::warn!("skipping unreadable file: {:#}", err);
                    failed_reads += 1;
                }
            }
        }
        if failed_reads > 0 {
            self.modal
                .open("Read Error", "Some files could not be read and were skipped.");
        }

        if !loaded.is_empty() {
            tracing::info!("queued {} files", loaded.len());
            self.queue.append(loaded);
            self.refresh_ui_state();
        }
    }

    /// Start merging the current queue on a worker thread
    pub fn start_merge(&mut self) {
        if self.merge_running() {
            return;
        }
        // Defensive: the button is disabled below two files, but the guard
        // keeps manual calls honest too
        if self.queue.len() < 2 {
            self.modal.open("Not Enough Files", STATUS_NEED_TWO);
            return;
        }
        self.merge_enabled = false;
        self.status = STATUS_MERGING.to_string();
        self.reset_deadline = None;
        self.merge_rx = Some(merge::spawn_merge(self.queue.snapshot()));
    }

    /// Drain pending worker events and keep the UI repainting while one runs
    fn poll_merge(&mut self, ctx: &egui::Context) {
        let Some(rx) = self.merge_rx.take() else {
            return;
        };
        let mut running = true;
        loop {
            match rx.try_recv() {
                Ok(MergeEvent::Progress { current, total }) => {
                    self.status = format!("Processing file {} of {}...", current, total);
                }
                Ok(MergeEvent::Finished(bytes)) => {
                    running = false;
                    self.finish_merge(bytes);
                    break;
                }
                Ok(MergeEvent::Failed(err)) => {
                    tracing::error!("merge failed: {}", err);
                    running = false;
                    self.fail_merge();
                    break;
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    tracing::error!("merge worker exited without a result");
                    running = false;
                    self.fail_merge();
                    break;
                }
            }
        }
        if running {
            self.merge_rx = Some(rx);
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }

    /// Offer the merged bytes through a save dialog and finish the session
    fn finish_merge(&mut self, bytes: Vec<u8>) {
        let mut dialog = FileDialog::new()
            .set_file_name(merge::OUTPUT_FILE_NAME)
            .add_filter("PDF files", &["pdf"]);
        if let Some(dir) = &self.config.last_output_dir {
            dialog = dialog.set_directory(dir);
        }

        let Some(path) = dialog.save_file() else {
            // Cancelled: keep the queue and fall back to the derived state
            self.refresh_ui_state();
            return;
        };

        match std::fs::write(&path, &bytes) {
            Ok(()) => {
                tracing::info!("saved merged document to: {}", path.display());
                self.config.set_last_output_dir(&path);
                let _ = self.config.save();
                self.status = STATUS_MERGED.to_string();
                self.modal.open(
                    "Merge Complete",
                    format!("PDFs merged successfully! Saved to {}.", path.display()),
                );
                self.reset_deadline = Some(Instant::now() + RESET_DELAY);
            }
            Err(err) => {
                tracing::error!("failed to write {}: {}", path.display(), err);
                self.modal.open(
                    "Save Failed",
                    "Could not write the merged file to disk. Please try again.",
                );
                self.refresh_ui_state();
            }
        }
    }

    /// Surface a merge failure; the queue is kept so the user can retry
    fn fail_merge(&mut self) {
        self.modal.open("Merge Failed", MSG_MERGE_ERROR);
        self.status = STATUS_MERGE_ERROR.to_string();
        self.merge_enabled = self.queue.len() >= 2;
    }

    /// Run the delayed post-merge session reset once its deadline passes
    fn tick_reset(&mut self, ctx: &egui::Context) {
        let Some(deadline) = self.reset_deadline else {
            return;
        };
        let now = Instant::now();
        if now >= deadline {
            self.reset_deadline = None;
            self.queue.clear();
            self.drag.end();
            self.refresh_ui_state();
        } else {
            ctx.request_repaint_after(deadline - now);
        }
    }

    /// Enqueue files dropped anywhere on the window
    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped: Vec<PathBuf> = ctx.input(|i| {
            i.raw
                .dropped_files
                .iter()
                .filter_map(|file| file.path.clone())
                .collect()
        });
        if !dropped.is_empty() {
            self.enqueue_paths(dropped);
        }
    }

    /// Render the top menu bar
    fn render_menu_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Add PDFs...").clicked() {
                        if let Some(paths) = FileDialog::new()
                            .add_filter("PDF files", &["pdf"])
                            .pick_files()
                        {
                            self.enqueue_paths(paths);
                        }
                        ui.close();
                    }
                    ui.separator();
                    if ui.button("Exit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });

                ui.menu_button("Theme", |ui| {
                    for (choice, label) in [
                        (ThemeChoice::System, "System"),
                        (ThemeChoice::Light, "Light"),
                        (ThemeChoice::Dark, "Dark"),
                    ] {
                        if ui
                            .selectable_label(self.config.theme == choice, label)
                            .clicked()
                        {
                            self.config.theme = choice;
                            Self::apply_theme(ctx, choice);
                            let _ = self.config.save();
                            ui.close();
                        }
                    }
                });
            });
        });
    }
}

impl eframe::App for BinderyApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_dropped_files(ctx);
        self.poll_merge(ctx);
        self.tick_reset(ctx);

        self.render_menu_bar(ctx);

        egui::TopBottomPanel::bottom("controls").show(ctx, |ui| {
            ui.add_space(6.0);
            ui.vertical_centered(|ui| {
                let clicked = ui
                    .add_enabled(self.merge_enabled, egui::Button::new("Merge PDFs"))
                    .clicked();
                if clicked {
                    self.start_merge();
                }
                ui.add_space(4.0);
                ui.label(&self.status);
            });
            ui.add_space(6.0);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_space(4.0);
            ui.vertical_centered(|ui| {
                ui.heading("PDF Merger");
                ui.label(
                    egui::RichText::new("Combine multiple PDFs into one document").weak(),
                );
            });
            ui.add_space(8.0);

            if let Some(paths) = DropZone::show(ui) {
                self.enqueue_paths(paths);
            }
            ui.add_space(8.0);

            if !self.queue.is_empty() {
                ui.label(
                    egui::RichText::new(format!("Files ({})", self.queue.len())).strong(),
                );
                ui.add_space(4.0);
                if FileListPanel::show(ui, &mut self.queue, &mut self.drag) {
                    self.refresh_ui_state();
                }
            }
        });

        self.modal.show(ctx);
    }
}
