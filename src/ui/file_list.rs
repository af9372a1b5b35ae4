//! Queued file list with drag-to-reorder rows

use super::drag::DragReorder;
use crate::core::queue::MergeQueue;

/// Height of one file row
const ROW_HEIGHT: f32 = 28.0;

/// File list panel
pub struct FileListPanel;

impl FileListPanel {
    /// Show the queued files. Returns true when the queue was modified.
    ///
    /// Rows sense drags; enter/leave/drop events for the reorder controller
    /// are synthesized from the pointer position each frame, and all queue
    /// mutations are deferred until after the rows have been drawn.
    pub fn show(ui: &mut egui::Ui, queue: &mut MergeQueue, drag: &mut DragReorder) -> bool {
        let mut changed = false;
        let mut removed: Option<usize> = None;
        let mut drag_stopped = false;
        let mut rows: Vec<(usize, egui::Rect)> = Vec::new();

        let output = egui::ScrollArea::vertical()
            .id_salt("file_list_scroll")
            .auto_shrink([false, true])
            .show(ui, |ui| {
                for (index, file) in queue.iter().enumerate() {
                    let (rect, response) = ui.allocate_exact_size(
                        egui::vec2(ui.available_width(), ROW_HEIGHT),
                        egui::Sense::drag(),
                    );
                    let response = response.on_hover_cursor(egui::CursorIcon::Grab);

                    let is_source = drag.source() == Some(index);
                    let is_target =
                        drag.is_dragging() && drag.target() == Some(index) && !is_source;

                    let bg =
                        row_fill(ui.visuals(), is_source, is_target, response.hovered(), index);
                    if bg != egui::Color32::TRANSPARENT {
                        ui.painter()
                            .rect_filled(rect, egui::CornerRadius::same(3), bg);
                    }

                    let builder = egui::UiBuilder::new()
                        .max_rect(rect.shrink2(egui::vec2(6.0, 0.0)))
                        .layout(egui::Layout::left_to_right(egui::Align::Center));
                    ui.scope_builder(builder, |ui| {
                        if is_source {
                            ui.set_opacity(0.4);
                        }
                        ui.label("\u{2630}");
                        ui.add(egui::Label::new(&file.name).truncate().selectable(false));
                        ui.with_layout(
                            egui::Layout::right_to_left(egui::Align::Center),
                            |ui| {
                                if ui
                                    .small_button("\u{2715}")
                                    .on_hover_text("Remove")
                                    .clicked()
                                {
                                    removed = Some(index);
                                }
                                ui.label(
                                    egui::RichText::new(format_size(file.size()))
                                        .weak()
                                        .small(),
                                );
                            },
                        );
                    });

                    if response.drag_started() {
                        drag.begin(index);
                    }
                    if response.drag_stopped() {
                        drag_stopped = true;
                    }

                    rows.push((index, rect));
                }
            });

        // Apply deferred mutations now that the queue is no longer borrowed
        if let Some(index) = removed {
            queue.remove_at(index);
            drag.end();
            changed = true;
        }

        // Rows keep their allocated rect even when scrolled out of view, so
        // only pointer positions inside the viewport count as row hits.
        let viewport = output.inner_rect;
        let pointer = ui
            .ctx()
            .input(|i| i.pointer.interact_pos())
            .filter(|pos| viewport.contains(*pos));
        let hovered_row = pointer.and_then(|pos| {
            rows.iter()
                .find(|(_, rect)| rect.contains(pos))
                .map(|(index, _)| *index)
        });

        if drag.is_dragging() {
            if drag_stopped {
                if let Some(target) = hovered_row {
                    if let Some(row_move) = drag.drop_on(target) {
                        queue.move_to(row_move.from, row_move.to);
                        changed = true;
                    }
                } else {
                    drag.end();
                }
            } else {
                match hovered_row {
                    Some(index) if drag.target() != Some(index) => drag.enter(index),
                    None => {
                        if let Some(target) = drag.target() {
                            drag.leave(target);
                        }
                    }
                    _ => {}
                }
                ui.ctx()
                    .output_mut(|o| o.cursor_icon = egui::CursorIcon::Grabbing);
            }
        }

        changed
    }
}

/// Row background. The drop target is highlighted whole, the same for
/// upward and downward drags; it outranks source, hover, and striping.
fn row_fill(
    visuals: &egui::Visuals,
    is_source: bool,
    is_target: bool,
    hovered: bool,
    index: usize,
) -> egui::Color32 {
    if is_target {
        visuals.selection.bg_fill.linear_multiply(0.3)
    } else if is_source {
        visuals.widgets.active.weak_bg_fill
    } else if hovered {
        visuals.widgets.hovered.weak_bg_fill
    } else if index % 2 == 1 {
        visuals.faint_bg_color
    } else {
        egui::Color32::TRANSPARENT
    }
}

/// Human-readable byte size
fn format_size(bytes: usize) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = 1024.0 * 1024.0;
    let size = bytes as f64;
    if size >= MB {
        format!("{:.1} MB", size / MB)
    } else if size >= KB {
        format!("{:.1} KB", size / KB)
    } else {
        format!("{} B", bytes)
    }
}
