//! Input collector - normalize drop payloads and picker lists into a batch.
//!
//! This is the only place that knows a drop may arrive either as a structured
//! item list or as a plain file list. Everything downstream sees a `Batch`.

use crate::types::{Batch, Candidate, DropPayload, ItemKind};

/// Collect a batch from a drop payload.
///
/// Structured items: only file-kind items that resolved to a file are kept;
/// with `allow_multiple == false` collection stops after the first file-kind
/// item. Plain file lists: with `allow_multiple == false` only the first
/// entry is taken.
pub fn collect_drop<F>(payload: DropPayload<F>, allow_multiple: bool) -> Batch<F> {
    let files: Vec<F> = match payload {
        DropPayload::Items(items) => {
            let mut files = Vec::new();
            for item in items {
                // Non-file items (links, text) are skipped
                if item.kind != ItemKind::File {
                    continue;
                }
                if let Some(file) = item.file {
                    files.push(file);
                }
                if !allow_multiple {
                    break;
                }
            }
            files
        }
        DropPayload::Files(files) => truncate(files, allow_multiple),
    };

    index(files)
}

/// Collect a batch from a file-picker selection.
pub fn collect_picker<F>(files: Vec<F>, allow_multiple: bool) -> Batch<F> {
    index(truncate(files, allow_multiple))
}

fn truncate<F>(mut files: Vec<F>, allow_multiple: bool) -> Vec<F> {
    if !allow_multiple {
        files.truncate(1);
    }
    files
}

fn index<F>(files: Vec<F>) -> Batch<F> {
    files
        .into_iter()
        .enumerate()
        .map(|(source_index, file)| Candidate { source_index, file })
        .collect()
}
