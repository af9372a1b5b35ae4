//! Drag-to-reorder state machine
//!
//! Tracks one drag at a time, independent of any rendering. Row indices are
//! the positions of rows at the time the events fire; the caller applies the
//! returned move to its own collection.

/// A reorder request produced by a completed drop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowMove {
    /// Index the drag started on
    pub from: usize,
    /// Index the row was dropped onto
    pub to: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DragState {
    Idle,
    Dragging {
        source: usize,
        target: Option<usize>,
    },
}

/// Drag-to-reorder controller
#[derive(Debug)]
pub struct DragReorder {
    state: DragState,
}

impl Default for DragReorder {
    fn default() -> Self {
        Self::new()
    }
}

impl DragReorder {
    pub fn new() -> Self {
        Self {
            state: DragState::Idle,
        }
    }

    /// Row index the active drag started on, if any
    pub fn source(&self) -> Option<usize> {
        match self.state {
            DragState::Dragging { source, .. } => Some(source),
            DragState::Idle => None,
        }
    }

    /// Row currently hovered as the drop target, if any
    pub fn target(&self) -> Option<usize> {
        match self.state {
            DragState::Dragging { target, .. } => target,
            DragState::Idle => None,
        }
    }

    /// Whether a drag is in progress
    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// Start dragging the row at `source`. Ignored while a drag is active.
    pub fn begin(&mut self, source: usize) {
        if let DragState::Idle = self.state {
            self.state = DragState::Dragging {
                source,
                target: None,
            };
        }
    }

    /// The pointer entered the row at `index`
    pub fn enter(&mut self, index: usize) {
        if let DragState::Dragging { ref mut target, .. } = self.state {
            *target = Some(index);
        }
    }

    /// The pointer left the row at `index`.
    ///
    /// Leave events can arrive after the enter of the following row; the
    /// target is only cleared when it still matches the row being left.
    pub fn leave(&mut self, index: usize) {
        if let DragState::Dragging { ref mut target, .. } = self.state {
            if *target == Some(index) {
                *target = None;
            }
        }
    }

    /// Drop onto the row at `index`, ending the drag.
    ///
    /// Dropping a row onto itself yields no move.
    pub fn drop_on(&mut self, index: usize) -> Option<RowMove> {
        let result = match self.state {
            DragState::Dragging { source, .. } if source != index => Some(RowMove {
                from: source,
                to: index,
            }),
            _ => None,
        };
        self.state = DragState::Idle;
        result
    }

    /// End the drag without a drop (pointer released outside every row)
    pub fn end(&mut self) {
        self.state = DragState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drop_after_begin_produces_the_move() {
        let mut drag = DragReorder::new();
        drag.begin(0);
        drag.enter(2);
        assert_eq!(drag.drop_on(2), Some(RowMove { from: 0, to: 2 }));
        assert!(!drag.is_dragging());
    }

    #[test]
    fn dropping_a_row_onto_itself_is_a_no_op() {
        let mut drag = DragReorder::new();
        drag.begin(1);
        drag.enter(1);
        assert_eq!(drag.drop_on(1), None);
        assert!(!drag.is_dragging());
    }

    #[test]
    fn enter_replaces_the_previous_target() {
        let mut drag = DragReorder::new();
        drag.begin(0);
        drag.enter(1);
        drag.enter(2);
        assert_eq!(drag.target(), Some(2));
    }

    #[test]
    fn stale_leave_does_not_clear_a_newer_target() {
        let mut drag = DragReorder::new();
        drag.begin(0);
        drag.enter(1);
        drag.enter(2);
        // The leave for row 1 arrives after row 2 became the target
        drag.leave(1);
        assert_eq!(drag.target(), Some(2));
        drag.leave(2);
        assert_eq!(drag.target(), None);
    }

    #[test]
    fn events_without_an_active_drag_are_ignored() {
        let mut drag = DragReorder::new();
        drag.enter(1);
        drag.leave(1);
        assert_eq!(drag.drop_on(1), None);
        assert!(!drag.is_dragging());
        assert_eq!(drag.target(), None);
    }

    #[test]
    fn begin_while_dragging_keeps_the_original_source() {
        let mut drag = DragReorder::new();
        drag.begin(0);
        drag.begin(3);
        assert_eq!(drag.source(), Some(0));
    }

    #[test]
    fn end_cancels_without_a_move() {
        let mut drag = DragReorder::new();
        drag.begin(0);
        drag.enter(2);
        drag.end();
        assert!(!drag.is_dragging());
        assert_eq!(drag.target(), None);
    }
}
