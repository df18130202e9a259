use std::collections::HashSet;

use super::diagnostics::{DiagnosticEvent, DiagnosticSink};
use crate::navis::tools::model::FlatRecord;

/// 1-based position of a view in traversal order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewSequence(u32);

impl ViewSequence {
    pub fn get(self) -> u32 {
        self.0
    }

    /// Image filename for this view: `{prefix}{n:04}.jpg`. Numbers wider than
    /// four digits are kept whole.
    pub fn image_reference(self, prefix: &str) -> String {
        format!("{prefix}{:04}.jpg", self.0)
    }
}

/// Hands out view sequence numbers. Each call to [`next`](Self::next)
/// consumes a number for good.
#[derive(Debug, Default)]
pub struct ViewSequencer {
    issued: u32,
}

impl ViewSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&mut self) -> ViewSequence {
        self.issued += 1;
        ViewSequence(self.issued)
    }

    pub fn issued(&self) -> u32 {
        self.issued
    }
}

/// Second half of a record's identity.
///
/// Rows of uncommented views carry the view's sequence number instead of an
/// empty comment id, so two such views never collapse into one row.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CommentKey {
    Comment(String),
    Uncommented(ViewSequence),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordKey {
    pub view_identifier: String,
    pub comment: CommentKey,
}

impl RecordKey {
    pub fn comment(view_identifier: &str, comment_id: &str) -> Self {
        Self {
            view_identifier: view_identifier.to_string(),
            comment: CommentKey::Comment(comment_id.to_string()),
        }
    }

    pub fn uncommented(view_identifier: &str, sequence: ViewSequence) -> Self {
        Self {
            view_identifier: view_identifier.to_string(),
            comment: CommentKey::Uncommented(sequence),
        }
    }
}

/// Accepts the first record seen for each [`RecordKey`] and drops the rest.
#[derive(Debug, Default)]
pub struct RecordDeduplicator {
    seen: HashSet<RecordKey>,
    accepted: Vec<FlatRecord>,
    duplicates: usize,
}

impl RecordDeduplicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` when the record was accepted. A rejected record is
    /// reported to `sink` and discarded.
    pub fn submit(
        &mut self,
        key: RecordKey,
        record: FlatRecord,
        sink: &mut dyn DiagnosticSink,
    ) -> bool {
        if self.seen.contains(&key) {
            self.duplicates += 1;
            sink.record(&DiagnosticEvent::DuplicateSkipped {
                view_identifier: record.view_identifier,
                comment_id: record.comment_id.unwrap_or_default(),
            });
            return false;
        }

        self.seen.insert(key);
        self.accepted.push(record);
        true
    }

    pub fn accepted(&self) -> &[FlatRecord] {
        &self.accepted
    }

    pub fn duplicates(&self) -> usize {
        self.duplicates
    }

    pub fn into_records(self) -> Vec<FlatRecord> {
        self.accepted
    }
}
