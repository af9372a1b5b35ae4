//! Ordered queue of PDF files pending merge

use std::sync::Arc;

/// A single uploaded PDF waiting in the merge queue
#[derive(Debug, Clone)]
pub struct QueuedPdf {
    /// Display name (usually the original file name)
    pub name: String,
    /// Raw file contents, shared with merge snapshots
    pub bytes: Arc<[u8]>,
}

impl QueuedPdf {
    /// Create a queued file from a name and its raw contents
    pub fn new(name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// Payload size in bytes
    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

/// The ordered list of files pending merge. Queue order is merge order.
///
/// Mutations never touch anything outside the queue itself; callers are
/// responsible for refreshing derived UI state afterwards.
#[derive(Debug, Clone, Default)]
pub struct MergeQueue {
    files: Vec<QueuedPdf>,
}

impl MergeQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Append files, preserving their relative order
    pub fn append(&mut self, files: Vec<QueuedPdf>) {
        self.files.extend(files);
    }

    /// Remove the file at `index`. Out-of-bounds indices are ignored.
    pub fn remove_at(&mut self, index: usize) {
        if index < self.files.len() {
            self.files.remove(index);
        }
    }

    /// Move the file at `from` so it ends up at position `to`.
    ///
    /// `to` addresses the sequence after the removal, so `move_to(0, len - 1)`
    /// sends the first file to the end. Does nothing when `from == to` or
    /// either index is out of bounds.
    pub fn move_to(&mut self, from: usize, to: usize) {
        let len = self.files.len();
        if from == to || from >= len || to >= len {
            return;
        }
        let file = self.files.remove(from);
        self.files.insert(to, file);
    }

    /// Number of queued files
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether the queue is empty
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// The file at `index`, if any
    pub fn get(&self, index: usize) -> Option<&QueuedPdf> {
        self.files.get(index)
    }

    /// Iterate the queued files in order
    pub fn iter(&self) -> std::slice::Iter<'_, QueuedPdf> {
        self.files.iter()
    }

    /// Clone the current ordering, e.g. to hand to the merge worker.
    /// Payloads are shared, so this is cheap.
    pub fn snapshot(&self) -> Vec<QueuedPdf> {
        self.files.clone()
    }

    /// Drop all queued files
    pub fn clear(&mut self) {
        self.files.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn queue_of(names: &[&str]) -> MergeQueue {
        let mut queue = MergeQueue::new();
        queue.append(
            names
                .iter()
                .map(|name| QueuedPdf::new(*name, Vec::new()))
                .collect(),
        );
        queue
    }

    fn names(queue: &MergeQueue) -> Vec<&str> {
        (0..queue.len())
            .filter_map(|i| queue.get(i))
            .map(|file| file.name.as_str())
            .collect()
    }

    #[test]
    fn append_preserves_order() {
        let mut queue = queue_of(&["a", "b"]);
        queue.append(vec![
            QueuedPdf::new("c", Vec::new()),
            QueuedPdf::new("d", Vec::new()),
        ]);
        assert_eq!(names(&queue), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn append_empty_is_noop() {
        let mut queue = queue_of(&["a"]);
        queue.append(Vec::new());
        assert_eq!(names(&queue), vec!["a"]);
    }

    #[test]
    fn duplicate_names_are_allowed() {
        let queue = queue_of(&["same", "same"]);
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn remove_shifts_following_files_left() {
        let mut queue = queue_of(&["a", "b", "c"]);
        queue.remove_at(1);
        assert_eq!(names(&queue), vec!["a", "c"]);
    }

    #[test]
    fn remove_out_of_bounds_is_noop() {
        let mut queue = queue_of(&["a", "b"]);
        queue.remove_at(2);
        queue.remove_at(usize::MAX);
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn move_first_onto_last() {
        let mut queue = queue_of(&["a", "b", "c"]);
        queue.move_to(0, 2);
        assert_eq!(names(&queue), vec!["b", "c", "a"]);
    }

    #[test]
    fn move_last_onto_first() {
        let mut queue = queue_of(&["a", "b", "c"]);
        queue.move_to(2, 0);
        assert_eq!(names(&queue), vec!["c", "a", "b"]);
    }

    #[test]
    fn move_same_index_is_noop() {
        let mut queue = queue_of(&["a", "b", "c"]);
        queue.move_to(1, 1);
        assert_eq!(names(&queue), vec!["a", "b", "c"]);
    }

    #[test]
    fn move_out_of_bounds_is_noop() {
        let mut queue = queue_of(&["a", "b", "c"]);
        queue.move_to(0, 3);
        queue.move_to(3, 0);
        assert_eq!(names(&queue), vec!["a", "b", "c"]);
    }

    #[test]
    fn move_preserves_the_set_of_files() {
        for from in 0..4 {
            for to in 0..4 {
                let mut queue = queue_of(&["a", "b", "c", "d"]);
                queue.move_to(from, to);
                let mut sorted = names(&queue);
                sorted.sort_unstable();
                assert_eq!(sorted, vec!["a", "b", "c", "d"]);
            }
        }
    }

    #[test]
    fn move_then_inverse_restores_order() {
        // The inverse of move_to(from, to) is move_to(to, from): the moved
        // file sits at `to` afterwards, and pulling it back out re-creates
        // the pre-move sequence.
        for from in 0..4 {
            for to in 0..4 {
                if from == to {
                    continue;
                }
                let mut queue = queue_of(&["a", "b", "c", "d"]);
                queue.move_to(from, to);
                queue.move_to(to, from);
                assert_eq!(names(&queue), vec!["a", "b", "c", "d"]);
            }
        }
    }

    #[test]
    fn clear_empties_the_queue() {
        let mut queue = queue_of(&["a", "b"]);
        queue.clear();
        assert!(queue.is_empty());
    }
}
