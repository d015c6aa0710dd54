//! Type validator - split a batch into accepted and rejected candidates.

use crate::types::{Batch, Blob, MimePrefix};

/// Outcome of checking one MIME type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Accepted,
    Rejected,
}

/// Accepted and rejected candidates, both in batch order.
#[derive(Debug, Clone, PartialEq)]
pub struct Partition<F> {
    pub accepted: Batch<F>,
    pub rejected: Batch<F>,
}

impl<F> Partition<F> {
    pub fn len(&self) -> usize {
        self.accepted.len() + self.rejected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The first configured prefix contained in `mime_type`, in configuration order.
pub fn matching_prefix<'a>(mime_type: &str, allowed: &'a [MimePrefix]) -> Option<&'a MimePrefix> {
    allowed.iter().find(|prefix| prefix.matches(mime_type))
}

/// Validation is opt-in: an empty allow-list accepts everything.
pub fn classify(mime_type: &str, allowed: &[MimePrefix]) -> Classification {
    if allowed.is_empty() || matching_prefix(mime_type, allowed).is_some() {
        Classification::Accepted
    } else {
        Classification::Rejected
    }
}

/// Partition a batch. Every candidate lands in exactly one side.
pub fn partition<F: Blob>(batch: Batch<F>, allowed: &[MimePrefix]) -> Partition<F> {
    let (accepted, rejected) = batch
        .into_iter()
        .partition(|candidate| classify(candidate.mime_type(), allowed) == Classification::Accepted);

    Partition { accepted, rejected }
}
