use std::fmt;
use std::io::Write;

use tracing::warn;

use crate::navis::tools::model::FolderPath;

/// A traversal decision worth recording in the diagnostic trace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticEvent {
    EnteredFolder {
        path: FolderPath,
    },
    FoundView {
        name: String,
        identifier: String,
        image_reference: String,
    },
    FoundComment {
        id: String,
        status: String,
        user: Option<String>,
    },
    NoComments {
        view_name: String,
    },
    DateRejected {
        reason: String,
        raw: String,
    },
    DuplicateSkipped {
        view_identifier: String,
        comment_id: String,
    },
}

impl fmt::Display for DiagnosticEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticEvent::EnteredFolder { path } => write!(f, "📂 Entering folder: {path}"),
            DiagnosticEvent::FoundView {
                name,
                identifier,
                image_reference,
            } => write!(
                f,
                "  👀 Found view: {name} (GUID={identifier}) → {image_reference}"
            ),
            DiagnosticEvent::FoundComment { id, status, user } => write!(
                f,
                "    💬 Comment ID={id}, Status={status}, User={}",
                user.as_deref().unwrap_or("None")
            ),
            DiagnosticEvent::NoComments { view_name } => {
                write!(f, "    ⚠️ No comments found for {view_name}")
            }
            DiagnosticEvent::DateRejected { reason, raw } => {
                write!(f, "❌ Failed to parse createddate: {reason}, raw={raw}")
            }
            DiagnosticEvent::DuplicateSkipped {
                view_identifier,
                comment_id,
            } => write!(
                f,
                "⚠️ Duplicate skipped: GUID={view_identifier}, CommentID={comment_id}"
            ),
        }
    }
}

/// Receiver of diagnostic events emitted during a flattening walk.
pub trait DiagnosticSink {
    fn record(&mut self, event: &DiagnosticEvent);
}

/// Buffers rendered entries for the trace artifact written at the end of a
/// run. Entries are only ever appended.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiagnosticLog {
    entries: Vec<String>,
}

impl DiagnosticLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The artifact text: one entry per line, no trailing newline.
    pub fn render(&self) -> String {
        self.entries.join("\n")
    }
}

impl DiagnosticSink for DiagnosticLog {
    fn record(&mut self, event: &DiagnosticEvent) {
        self.entries.push(event.to_string());
    }
}

/// Mirrors every entry to a writer as it happens, typically stdout.
pub struct ConsoleMirror<W: Write> {
    writer: W,
}

impl ConsoleMirror<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> ConsoleMirror<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> DiagnosticSink for ConsoleMirror<W> {
    fn record(&mut self, event: &DiagnosticEvent) {
        // The mirror is best effort; the buffered log stays authoritative.
        if let Err(error) = writeln!(self.writer, "{event}") {
            warn!(%error, "failed to mirror diagnostic entry");
        }
    }
}

/// Fans events out to the buffered log and, when present, a live mirror.
pub(crate) struct Diagnostics<'a> {
    log: DiagnosticLog,
    mirror: Option<&'a mut dyn DiagnosticSink>,
}

impl<'a> Diagnostics<'a> {
    pub(crate) fn new(mirror: Option<&'a mut dyn DiagnosticSink>) -> Self {
        Self {
            log: DiagnosticLog::new(),
            mirror,
        }
    }

    pub(crate) fn into_log(self) -> DiagnosticLog {
        self.log
    }
}

impl DiagnosticSink for Diagnostics<'_> {
    fn record(&mut self, event: &DiagnosticEvent) {
        self.log.record(event);
        if let Some(mirror) = self.mirror.as_deref_mut() {
            mirror.record(event);
        }
    }
}
