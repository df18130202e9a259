//! Flattening walk over a [`ViewpointDocument`].
//!
//! Folders are visited depth-first in document order: a folder's own views
//! first, then each child folder. Every view consumes one sequence number and
//! produces one row per comment, or a single row when it has none. Rows pass
//! through the deduplicator before they are accepted.

pub mod dates;
pub mod dedupe;
pub mod diagnostics;

use tracing::{debug, instrument};

use crate::navis::tools::model::{
    Comment, FlatRecord, FolderPath, View, ViewFolder, ViewpointDocument,
};

pub use dates::normalize_created_date;
pub use dedupe::{CommentKey, RecordDeduplicator, RecordKey, ViewSequence, ViewSequencer};
pub use diagnostics::{ConsoleMirror, DiagnosticEvent, DiagnosticLog, DiagnosticSink};

use diagnostics::Diagnostics;

/// Prefix used for image references when none is configured.
pub const DEFAULT_IMAGE_PREFIX: &str = "vp_";

/// Settings for a flattening walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlattenOptions {
    pub image_prefix: String,
}

impl Default for FlattenOptions {
    fn default() -> Self {
        Self {
            image_prefix: DEFAULT_IMAGE_PREFIX.to_string(),
        }
    }
}

/// Everything a walk produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlattenOutcome {
    pub records: Vec<FlatRecord>,
    pub diagnostics: DiagnosticLog,
    pub view_count: u32,
    pub duplicate_count: usize,
}

/// Flattens `document` into table rows, mirroring diagnostics to `mirror`
/// while the walk runs.
#[instrument(level = "debug", skip_all, fields(folders = document.folders.len()))]
pub fn flatten_document(
    document: &ViewpointDocument,
    options: &FlattenOptions,
    mirror: Option<&mut dyn DiagnosticSink>,
) -> FlattenOutcome {
    let mut session = FlattenSession::new(options, mirror);
    let root = FolderPath::root();
    for folder in &document.folders {
        session.walk_folder(folder, &root);
    }

    let outcome = session.finish();
    debug!(
        views = outcome.view_count,
        records = outcome.records.len(),
        duplicates = outcome.duplicate_count,
        "walk finished"
    );
    outcome
}

/// State owned by a single walk.
struct FlattenSession<'o, 'm> {
    options: &'o FlattenOptions,
    sequencer: ViewSequencer,
    dedupe: RecordDeduplicator,
    diagnostics: Diagnostics<'m>,
}

impl<'o, 'm> FlattenSession<'o, 'm> {
    fn new(options: &'o FlattenOptions, mirror: Option<&'m mut dyn DiagnosticSink>) -> Self {
        Self {
            options,
            sequencer: ViewSequencer::new(),
            dedupe: RecordDeduplicator::new(),
            diagnostics: Diagnostics::new(mirror),
        }
    }

    fn walk_folder(&mut self, folder: &ViewFolder, parent: &FolderPath) {
        let path = parent.child(&folder.name);
        self.diagnostics.record(&DiagnosticEvent::EnteredFolder { path: path.clone() });

        for view in &folder.views {
            self.visit_view(view, &path);
        }

        for child in &folder.folders {
            self.walk_folder(child, &path);
        }
    }

    fn visit_view(&mut self, view: &View, path: &FolderPath) {
        let sequence = self.sequencer.next();
        let image_reference = sequence.image_reference(&self.options.image_prefix);

        self.diagnostics.record(&DiagnosticEvent::FoundView {
            name: view.name.clone(),
            identifier: view.identifier.clone(),
            image_reference: image_reference.clone(),
        });

        let template = FlatRecord {
            category: path.category().map(str::to_string),
            subcategory: path.subcategory().map(str::to_string),
            detail_path: path.detail(),
            view_name: view.name.clone(),
            view_identifier: view.identifier.clone(),
            image_reference,
            ..FlatRecord::default()
        };

        if view.comments.is_empty() {
            self.diagnostics.record(&DiagnosticEvent::NoComments {
                view_name: view.name.clone(),
            });
            let key = RecordKey::uncommented(&view.identifier, sequence);
            self.dedupe.submit(key, template, &mut self.diagnostics);
            return;
        }

        for comment in &view.comments {
            let record = self.comment_record(&template, comment);
            let key = RecordKey::comment(&view.identifier, &comment.id);
            self.dedupe.submit(key, record, &mut self.diagnostics);
        }
    }

    fn comment_record(&mut self, template: &FlatRecord, comment: &Comment) -> FlatRecord {
        let created_date = normalize_created_date(comment.created.as_ref(), &mut self.diagnostics);

        self.diagnostics.record(&DiagnosticEvent::FoundComment {
            id: comment.id.clone(),
            status: comment.status.clone(),
            user: comment.user.clone(),
        });

        FlatRecord {
            comment_id: Some(comment.id.clone()),
            status: Some(comment.status.clone()),
            user: comment.user.clone(),
            body: comment.body.clone(),
            created_date,
            ..template.clone()
        }
    }

    fn finish(self) -> FlattenOutcome {
        FlattenOutcome {
            view_count: self.sequencer.issued(),
            duplicate_count: self.dedupe.duplicates(),
            records: self.dedupe.into_records(),
            diagnostics: self.diagnostics.into_log(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navis::tools::io::xml_read;
    use crate::navis::tools::model::{CreatedDate, DateDescriptor};

    fn comment(id: &str) -> Comment {
        Comment {
            user: Some("reviewer".to_string()),
            body: Some(format!("body of {id}")),
            ..Comment::new(id, "active")
        }
    }

    fn flatten(document: &ViewpointDocument) -> FlattenOutcome {
        flatten_document(document, &FlattenOptions::default(), None)
    }

    #[test]
    fn duplicate_comment_is_dropped_after_first_occurrence() {
        let document = ViewpointDocument {
            folders: vec![ViewFolder::new("A").with_view(
                View::new("V1", "G1")
                    .with_comment(comment("C1"))
                    .with_comment(comment("C2"))
                    .with_comment(Comment::new("C1", "resolved")),
            )],
        };

        let outcome = flatten(&document);

        assert_eq!(outcome.records.len(), 2);
        assert_eq!(outcome.duplicate_count, 1);
        let first = &outcome.records[0];
        assert_eq!(first.category.as_deref(), Some("A"));
        assert_eq!(first.subcategory, None);
        assert_eq!(first.detail_path, None);
        assert_eq!(first.comment_id.as_deref(), Some("C1"));
        assert_eq!(first.status.as_deref(), Some("active"));
        assert_eq!(outcome.records[1].comment_id.as_deref(), Some("C2"));

        let skipped: Vec<&String> = outcome
            .diagnostics
            .entries()
            .iter()
            .filter(|entry| entry.contains("Duplicate skipped"))
            .collect();
        assert_eq!(skipped, ["⚠️ Duplicate skipped: GUID=G1, CommentID=C1"]);
    }

    #[test]
    fn uncommented_view_yields_one_empty_row_and_one_warning() {
        let document = ViewpointDocument {
            folders: vec![ViewFolder::new("A").with_view(View::new("V1", "G1"))],
        };

        let outcome = flatten(&document);

        assert_eq!(
            outcome.records,
            [FlatRecord {
                category: Some("A".to_string()),
                view_name: "V1".to_string(),
                view_identifier: "G1".to_string(),
                image_reference: "vp_0001.jpg".to_string(),
                ..FlatRecord::default()
            }]
        );
        let warnings = outcome
            .diagnostics
            .entries()
            .iter()
            .filter(|entry| entry.contains("No comments found for V1"))
            .count();
        assert_eq!(warnings, 1);
    }

    #[test]
    fn traversal_is_depth_first_with_views_before_subfolders() {
        let document = ViewpointDocument {
            folders: vec![
                ViewFolder::new("Cat")
                    .with_folder(
                        ViewFolder::new("Sub").with_folder(
                            ViewFolder::new("D1")
                                .with_folder(ViewFolder::new("D2").with_view(View::new("deep", "G3"))),
                        ),
                    )
                    .with_view(View::new("top", "G1")),
                ViewFolder::new("Other").with_view(View::new("last", "G4")),
            ],
        };

        let outcome = flatten(&document);

        let order: Vec<(&str, &str)> = outcome
            .records
            .iter()
            .map(|record| (record.view_name.as_str(), record.image_reference.as_str()))
            .collect();
        assert_eq!(
            order,
            [
                ("top", "vp_0001.jpg"),
                ("deep", "vp_0002.jpg"),
                ("last", "vp_0003.jpg")
            ]
        );

        let deep = &outcome.records[1];
        assert_eq!(deep.category.as_deref(), Some("Cat"));
        assert_eq!(deep.subcategory.as_deref(), Some("Sub"));
        assert_eq!(deep.detail_path.as_deref(), Some("D1 > D2"));
        assert_eq!(outcome.view_count, 3);

        let folders: Vec<&String> = outcome
            .diagnostics
            .entries()
            .iter()
            .filter(|entry| entry.starts_with("📂"))
            .collect();
        assert_eq!(
            folders,
            [
                "📂 Entering folder: Cat",
                "📂 Entering folder: Cat > Sub",
                "📂 Entering folder: Cat > Sub > D1",
                "📂 Entering folder: Cat > Sub > D1 > D2",
                "📂 Entering folder: Other",
            ]
        );
    }

    #[test]
    fn sequence_advances_once_per_view_regardless_of_comments() {
        let document = ViewpointDocument {
            folders: vec![
                ViewFolder::new("A")
                    .with_view(
                        View::new("V1", "G1")
                            .with_comment(comment("C1"))
                            .with_comment(comment("C2"))
                            .with_comment(comment("C3")),
                    )
                    .with_view(View::new("V2", "G2")),
            ],
        };

        let outcome = flatten(&document);

        assert_eq!(outcome.view_count, 2);
        assert!(outcome.records[..3]
            .iter()
            .all(|record| record.image_reference == "vp_0001.jpg"));
        assert_eq!(outcome.records[3].image_reference, "vp_0002.jpg");
    }

    #[test]
    fn empty_comments_element_counts_as_uncommented() {
        let document = xml_read::parse_document(
            r#"<exchange><viewpoints><viewfolder name="A"><view name="V1" guid="G1"><comments/></view></viewfolder></viewpoints></exchange>"#,
        )
        .expect("document parsed");

        let outcome = flatten(&document);

        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.records[0].view_identifier, "G1");
        assert_eq!(outcome.records[0].comment_id, None);
        let warnings: Vec<&String> = outcome
            .diagnostics
            .entries()
            .iter()
            .filter(|entry| entry.contains("No comments found"))
            .collect();
        assert_eq!(warnings, ["    ⚠️ No comments found for V1"]);
    }

    #[test]
    fn uncommented_views_without_identifiers_are_all_kept() {
        let document = ViewpointDocument {
            folders: vec![ViewFolder::new("")
                .with_view(View::default())
                .with_view(View::default())],
        };

        let outcome = flatten(&document);

        assert_eq!(outcome.records.len(), 2);
        assert_eq!(outcome.duplicate_count, 0);
        assert_eq!(outcome.records[0].category.as_deref(), Some(""));
    }

    #[test]
    fn comment_dates_are_normalized_into_the_row() {
        let dated = Comment {
            created: Some(CreatedDate {
                date: Some(DateDescriptor::new(2024, 3, 5)),
                raw: String::new(),
            }),
            ..Comment::new("C1", "new")
        };
        let document = ViewpointDocument {
            folders: vec![ViewFolder::new("A").with_view(View::new("V1", "G1").with_comment(dated))],
        };

        let outcome = flatten(&document);

        assert_eq!(outcome.records[0].created_date.as_deref(), Some("2024/03/05"));
        assert_eq!(outcome.records[0].user, None);
    }

    #[test]
    fn mirror_sees_every_logged_entry() {
        let document = ViewpointDocument {
            folders: vec![ViewFolder::new("A").with_view(View::new("V1", "G1").with_comment(comment("C1")))],
        };
        let mut mirror = ConsoleMirror::new(Vec::new());

        let outcome = flatten_document(&document, &FlattenOptions::default(), Some(&mut mirror));

        let mirrored = String::from_utf8(mirror.into_inner()).expect("utf-8 output");
        let expected = format!("{}\n", outcome.diagnostics.render());
        assert_eq!(mirrored, expected);
        assert_eq!(outcome.diagnostics.len(), 3);
    }

    #[test]
    fn custom_prefix_is_used_for_image_references() {
        let document = ViewpointDocument {
            folders: vec![ViewFolder::new("A").with_view(View::new("V1", "G1"))],
        };
        let options = FlattenOptions {
            image_prefix: "report_vp".to_string(),
        };

        let outcome = flatten_document(&document, &options, None);

        assert_eq!(outcome.records[0].image_reference, "report_vp0001.jpg");
    }
}
