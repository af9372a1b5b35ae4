//! PDF composition: merging the queued files into a single document
//!
//! Every queued file is loaded strictly in queue order, its pages are
//! collected in their own order, and the output page tree is rebuilt from
//! that explicit ordering. The result is serialized once at the end, so the
//! output page order is exactly the concatenation of the inputs' pages.

use std::collections::BTreeMap;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use lopdf::{Document, Object, ObjectId};
use thiserror::Error;

use super::queue::QueuedPdf;

/// Suggested file name for the merged output
pub const OUTPUT_FILE_NAME: &str = "merged_document.pdf";

/// Failures while composing the merged document
#[derive(Debug, Error)]
pub enum MergeError {
    /// A queued file could not be parsed as a PDF
    #[error("failed to load {name}: {source}")]
    Load {
        name: String,
        source: lopdf::Error,
    },
    /// None of the inputs carried a page tree root
    #[error("no page tree found among the input documents")]
    MissingPagesRoot,
    /// None of the inputs carried a document catalog
    #[error("no catalog found among the input documents")]
    MissingCatalog,
    /// The merged document could not be serialized
    #[error("failed to serialize the merged document: {0}")]
    Save(#[source] std::io::Error),
}

/// Events emitted by the merge worker
#[derive(Debug)]
pub enum MergeEvent {
    /// About to process file `current` of `total` (1-based)
    Progress { current: usize, total: usize },
    /// The merged document, serialized and ready to save
    Finished(Vec<u8>),
    /// The merge failed; the queue is left untouched
    Failed(MergeError),
}

/// Spawn the merge worker for a queue snapshot.
///
/// Returns the channel to poll for [`MergeEvent`]s; the worker exits after
/// sending `Finished` or `Failed`.
pub fn spawn_merge(files: Vec<QueuedPdf>) -> Receiver<MergeEvent> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || run_merge(files, tx));
    rx
}

/// Merge `files` on the current thread, reporting through `events`.
///
/// Send failures mean the UI has gone away and are ignored.
fn run_merge(files: Vec<QueuedPdf>, events: Sender<MergeEvent>) {
    let total = files.len();
    let result = merge_files(&files, |current| {
        let _ = events.send(MergeEvent::Progress { current, total });
    });
    match result {
        Ok(bytes) => {
            tracing::info!("merged {} files into {} bytes", total, bytes.len());
            let _ = events.send(MergeEvent::Finished(bytes));
        }
        Err(err) => {
            let _ = events.send(MergeEvent::Failed(err));
        }
    }
}

/// Merge the given files, in slice order, into a single serialized PDF.
///
/// `progress` is invoked with the 1-based index of each file just before it
/// is processed.
pub fn merge_files(
    files: &[QueuedPdf],
    mut progress: impl FnMut(usize),
) -> Result<Vec<u8>, MergeError> {
    let mut merged = Document::with_version("1.5");
    let mut collected: BTreeMap<ObjectId, Object> = BTreeMap::new();
    let mut pages: BTreeMap<ObjectId, Object> = BTreeMap::new();
    // Output page order; never derived from object-id order, which within a
    // document does not have to match page order.
    let mut page_order: Vec<ObjectId> = Vec::new();
    let mut max_id = 1;

    for (index, file) in files.iter().enumerate() {
        progress(index + 1);

        let mut document =
            Document::load_mem(&file.bytes).map_err(|source| MergeError::Load {
                name: file.name.clone(),
                source,
            })?;

        // Shift this document's object ids past everything collected so far
        document.renumber_objects_with(max_id);
        max_id = document.max_id + 1;

        // get_pages() is keyed by page number, so iterating it yields this
        // document's pages in their own order.
        for (_, page_id) in document.get_pages() {
            let page = document
                .get_object(page_id)
                .map_err(|source| MergeError::Load {
                    name: file.name.clone(),
                    source,
                })?
                .to_owned();
            page_order.push(page_id);
            pages.insert(page_id, page);
        }

        collected.extend(document.objects);
    }

    // The first catalog and page tree root become the output skeleton.
    // Later page tree roots still contribute their dictionary entries
    // (inherited Resources and the like); pages are re-parented below and
    // outlines are dropped, matching the page-copy semantics of the merge.
    let mut catalog: Option<(ObjectId, Object)> = None;
    let mut pages_root: Option<(ObjectId, Object)> = None;

    for (object_id, object) in collected.iter() {
        match object.type_name().unwrap_or(b"") {
            b"Catalog" => {
                catalog.get_or_insert_with(|| (*object_id, object.clone()));
            }
            b"Pages" => {
                if let Ok(dictionary) = object.as_dict() {
                    let mut dictionary = dictionary.clone();
                    if let Some((_, ref existing)) = pages_root {
                        if let Ok(existing) = existing.as_dict() {
                            dictionary.extend(existing);
                        }
                    }
                    let root_id = pages_root
                        .as_ref()
                        .map(|(id, _)| *id)
                        .unwrap_or(*object_id);
                    pages_root = Some((root_id, Object::Dictionary(dictionary)));
                }
            }
            b"Page" => {}
            b"Outlines" | b"Outline" => {}
            _ => {
                merged.objects.insert(*object_id, object.clone());
            }
        }
    }

    let (pages_root_id, pages_root_object) =
        pages_root.ok_or(MergeError::MissingPagesRoot)?;
    let (catalog_id, catalog_object) = catalog.ok_or(MergeError::MissingCatalog)?;

    // Re-parent every page under the merged page tree root
    for page_id in &page_order {
        if let Some(Ok(dictionary)) = pages.get(page_id).map(|page| page.as_dict()) {
            let mut dictionary = dictionary.clone();
            dictionary.set("Parent", pages_root_id);
            merged
                .objects
                .insert(*page_id, Object::Dictionary(dictionary));
        }
    }

    // Rebuild the page tree root with the merged Kids list
    if let Ok(dictionary) = pages_root_object.as_dict() {
        let mut dictionary = dictionary.clone();
        dictionary.set("Count", page_order.len() as u32);
        dictionary.set(
            "Kids",
            page_order
                .iter()
                .map(|page_id| Object::Reference(*page_id))
                .collect::<Vec<_>>(),
        );
        merged
            .objects
            .insert(pages_root_id, Object::Dictionary(dictionary));
    }

    // Point the catalog at the merged page tree
    if let Ok(dictionary) = catalog_object.as_dict() {
        let mut dictionary = dictionary.clone();
        dictionary.set("Pages", pages_root_id);
        dictionary.remove(b"Outlines");
        merged
            .objects
            .insert(catalog_id, Object::Dictionary(dictionary));
    }

    merged.trailer.set("Root", catalog_id);
    merged.max_id = merged.objects.len() as u32;
    merged.renumber_objects();
    merged.compress();

    let mut bytes = Vec::new();
    merged.save_to(&mut bytes).map_err(MergeError::Save)?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::dictionary;

    /// Width encoding lets tests recognize (input, page index) pairs after
    /// the merge: input `marker`, page `index` gets width 1000*marker+index.
    fn media_width(marker: i64, index: usize) -> i64 {
        1_000 * marker + index as i64
    }

    /// Build a small but real PDF with `page_count` pages
    fn sample_pdf(name: &str, marker: i64, page_count: usize) -> QueuedPdf {
        let mut document = Document::with_version("1.5");
        let pages_id = document.new_object_id();
        let kids: Vec<Object> = (0..page_count)
            .map(|index| {
                let page_id = document.add_object(dictionary! {
                    "Type" => "Page",
                    "Parent" => pages_id,
                    "MediaBox" => vec![
                        0.into(),
                        0.into(),
                        Object::Integer(media_width(marker, index)),
                        842.into(),
                    ],
                });
                Object::Reference(page_id)
            })
            .collect();
        document.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => page_count as u32,
            }),
        );
        let catalog_id = document.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        document.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        document.save_to(&mut bytes).unwrap();
        QueuedPdf::new(name, bytes)
    }

    /// Page widths of a serialized PDF, in page order
    fn page_widths(bytes: &[u8]) -> Vec<i64> {
        let document = Document::load_mem(bytes).unwrap();
        document
            .get_pages()
            .into_values()
            .map(|page_id| {
                let page = document.get_object(page_id).unwrap().as_dict().unwrap();
                let media_box = page.get(b"MediaBox").unwrap().as_array().unwrap();
                media_box[2].as_i64().unwrap()
            })
            .collect()
    }

    #[test]
    fn two_files_concatenate_in_order() {
        let files = vec![sample_pdf("first.pdf", 1, 2), sample_pdf("second.pdf", 2, 3)];
        let bytes = merge_files(&files, |_| {}).unwrap();
        assert_eq!(
            page_widths(&bytes),
            vec![
                media_width(1, 0),
                media_width(1, 1),
                media_width(2, 0),
                media_width(2, 1),
                media_width(2, 2),
            ]
        );
    }

    #[test]
    fn output_order_follows_slice_order() {
        let files = vec![
            sample_pdf("c.pdf", 3, 1),
            sample_pdf("a.pdf", 1, 1),
            sample_pdf("b.pdf", 2, 1),
        ];
        let bytes = merge_files(&files, |_| {}).unwrap();
        assert_eq!(
            page_widths(&bytes),
            vec![media_width(3, 0), media_width(1, 0), media_width(2, 0)]
        );
    }

    #[test]
    fn reordered_queue_merges_in_the_new_order() {
        use crate::core::queue::MergeQueue;
        use crate::ui::drag::DragReorder;

        let mut queue = MergeQueue::new();
        queue.append(vec![
            sample_pdf("a.pdf", 1, 2),
            sample_pdf("b.pdf", 2, 1),
            sample_pdf("c.pdf", 3, 1),
        ]);

        // Drag the first row past the others and drop it on the last
        let mut drag = DragReorder::new();
        drag.begin(0);
        drag.enter(2);
        let row_move = drag.drop_on(2).unwrap();
        queue.move_to(row_move.from, row_move.to);

        let bytes = merge_files(&queue.snapshot(), |_| {}).unwrap();
        assert_eq!(
            page_widths(&bytes),
            vec![
                media_width(2, 0),
                media_width(3, 0),
                media_width(1, 0),
                media_width(1, 1),
            ]
        );
    }

    #[test]
    fn progress_reports_each_file_in_order() {
        let files = vec![
            sample_pdf("a.pdf", 1, 1),
            sample_pdf("b.pdf", 2, 1),
            sample_pdf("c.pdf", 3, 1),
        ];
        let mut seen = Vec::new();
        merge_files(&files, |current| seen.push(current)).unwrap();
        assert_eq!(seen, vec![1, 2, 3]);
    }

    #[test]
    fn garbage_input_fails_with_the_file_name() {
        let files = vec![
            sample_pdf("good.pdf", 1, 1),
            QueuedPdf::new("broken.pdf", b"not a pdf".to_vec()),
        ];
        let mut seen = Vec::new();
        match merge_files(&files, |current| seen.push(current)) {
            Err(MergeError::Load { name, .. }) => assert_eq!(name, "broken.pdf"),
            other => panic!("expected a load failure, got {:?}", other),
        }
        // The first file was already processed when the second one failed
        assert_eq!(seen, vec![1, 2]);
    }

    #[test]
    fn merging_nothing_reports_the_missing_page_tree() {
        match merge_files(&[], |_| {}) {
            Err(MergeError::MissingPagesRoot) => {}
            other => panic!("expected a missing page tree, got {:?}", other),
        }
    }

    #[test]
    fn worker_sends_progress_then_finished() {
        let files = vec![sample_pdf("a.pdf", 1, 1), sample_pdf("b.pdf", 2, 1)];
        let events = spawn_merge(files);

        let mut finished = None;
        let mut progress = Vec::new();
        for event in events.iter() {
            match event {
                MergeEvent::Progress { current, total } => progress.push((current, total)),
                MergeEvent::Finished(bytes) => {
                    finished = Some(bytes);
                    break;
                }
                MergeEvent::Failed(err) => panic!("merge failed: {}", err),
            }
        }

        assert_eq!(progress, vec![(1, 2), (2, 2)]);
        let bytes = finished.expect("merge never finished");
        assert_eq!(page_widths(&bytes).len(), 2);
    }
}
