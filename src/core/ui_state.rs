//! Derived UI state: merge availability and the status line

/// Status line for an empty queue
pub const STATUS_READY: &str = "Ready to merge.";
/// Status line when only one file is queued
pub const STATUS_NEED_TWO: &str = "Please upload at least two PDFs to merge.";

/// UI affordances derived from the number of queued files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiState {
    /// Whether the merge action is available
    pub merge_enabled: bool,
    /// Human-readable status line
    pub status: String,
}

impl UiState {
    /// Derive the UI state for a queue of `len` files.
    ///
    /// Merging needs at least two inputs; anything less keeps the action
    /// disabled with a hint about what is missing.
    pub fn for_queue_len(len: usize) -> Self {
        match len {
            0 => Self {
                merge_enabled: false,
                status: STATUS_READY.to_string(),
            },
            1 => Self {
                merge_enabled: false,
                status: STATUS_NEED_TWO.to_string(),
            },
            n => Self {
                merge_enabled: true,
                status: format!("{} files ready to merge. Drag to reorder.", n),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_queue_is_idle_and_disabled() {
        let state = UiState::for_queue_len(0);
        assert!(!state.merge_enabled);
        assert_eq!(state.status, STATUS_READY);
    }

    #[test]
    fn single_file_asks_for_more_and_stays_disabled() {
        let state = UiState::for_queue_len(1);
        assert!(!state.merge_enabled);
        assert_eq!(state.status, STATUS_NEED_TWO);
    }

    #[test]
    fn two_files_enable_merging() {
        let state = UiState::for_queue_len(2);
        assert!(state.merge_enabled);
        assert_eq!(state.status, "2 files ready to merge. Drag to reorder.");
    }

    #[test]
    fn many_files_report_their_count() {
        let state = UiState::for_queue_len(5);
        assert!(state.merge_enabled);
        assert_eq!(state.status, "5 files ready to merge. Drag to reorder.");
    }
}
