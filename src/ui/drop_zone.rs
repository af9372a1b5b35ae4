//! Drop target for incoming PDF files

use std::path::PathBuf;

use rfd::FileDialog;

/// Drop zone panel: accepts dragged-in files and offers a browse dialog
pub struct DropZone;

impl DropZone {
    /// Render the drop target.
    ///
    /// Highlights while files hover over the window. Returns the paths
    /// picked through the browse dialog when the zone is clicked.
    pub fn show(ui: &mut egui::Ui) -> Option<Vec<PathBuf>> {
        let hovering_files = ui.ctx().input(|i| !i.raw.hovered_files.is_empty());

        let (rect, response) = ui.allocate_exact_size(
            egui::vec2(ui.available_width(), 96.0),
            egui::Sense::click(),
        );
        let response = response.on_hover_cursor(egui::CursorIcon::PointingHand);

        let visuals = ui.visuals();
        let (stroke, fill) = if hovering_files || response.hovered() {
            (
                egui::Stroke::new(2.0, visuals.selection.stroke.color),
                visuals.selection.bg_fill.linear_multiply(0.2),
            )
        } else {
            (
                egui::Stroke::new(1.0, visuals.widgets.noninteractive.bg_stroke.color),
                visuals.extreme_bg_color,
            )
        };

        let painter = ui.painter();
        painter.rect(
            rect,
            egui::CornerRadius::same(6),
            fill,
            stroke,
            egui::StrokeKind::Inside,
        );
        painter.text(
            rect.center(),
            egui::Align2::CENTER_CENTER,
            "Drag & drop PDF files here, or click to browse",
            egui::TextStyle::Body.resolve(ui.style()),
            visuals.text_color(),
        );

        if response.clicked() {
            return FileDialog::new()
                .add_filter("PDF files", &["pdf"])
                .pick_files();
        }
        None
    }
}
