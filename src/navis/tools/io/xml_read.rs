use std::fs;
use std::path::Path;

use roxmltree::{Document, Node, ParsingOptions};

use crate::navis::tools::error::Result;
use crate::navis::tools::model::{
    Comment, CreatedDate, DateDescriptor, View, ViewFolder, ViewpointDocument,
};

/// Reads and parses a viewpoint export from disk.
pub fn read_document(path: &Path) -> Result<ViewpointDocument> {
    let source = fs::read_to_string(path)?;
    parse_document(&source)
}

/// Parses a viewpoint export held in memory.
///
/// Top-level folders are the `viewfolder` children of `viewpoints` elements
/// directly under the root. Missing attributes become empty strings.
pub fn parse_document(source: &str) -> Result<ViewpointDocument> {
    let source = source.strip_prefix('\u{feff}').unwrap_or(source);
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    let document = Document::parse_with_options(source, options)?;

    let folders = child_elements(document.root_element(), "viewpoints")
        .flat_map(|viewpoints| child_elements(viewpoints, "viewfolder"))
        .map(|folder| read_folder(folder, source))
        .collect();

    Ok(ViewpointDocument { folders })
}

fn read_folder(node: Node<'_, '_>, source: &str) -> ViewFolder {
    ViewFolder {
        name: attribute(node, "name"),
        views: child_elements(node, "view")
            .map(|view| read_view(view, source))
            .collect(),
        folders: child_elements(node, "viewfolder")
            .map(|folder| read_folder(folder, source))
            .collect(),
    }
}

fn read_view(node: Node<'_, '_>, source: &str) -> View {
    let comments = first_child(node, "comments")
        .map(|comments| {
            child_elements(comments, "comment")
                .map(|comment| read_comment(comment, source))
                .collect()
        })
        .unwrap_or_default();

    View {
        name: attribute(node, "name"),
        identifier: attribute(node, "guid"),
        comments,
    }
}

fn read_comment(node: Node<'_, '_>, source: &str) -> Comment {
    Comment {
        id: attribute(node, "id"),
        status: attribute(node, "status"),
        user: child_text(node, "user"),
        body: child_text(node, "body"),
        created: first_child(node, "createddate").map(|created| CreatedDate {
            date: first_child(created, "date").map(|date| DateDescriptor {
                year: date.attribute("year").map(str::to_string),
                month: date.attribute("month").map(str::to_string),
                day: date.attribute("day").map(str::to_string),
            }),
            raw: source[created.range()].to_string(),
        }),
    }
}

fn child_elements<'a, 'input>(
    node: Node<'a, 'input>,
    name: &'static str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children()
        .filter(move |child| child.is_element() && child.has_tag_name(name))
}

fn first_child<'a, 'input>(node: Node<'a, 'input>, name: &'static str) -> Option<Node<'a, 'input>> {
    child_elements(node, name).next()
}

fn attribute(node: Node<'_, '_>, name: &str) -> String {
    node.attribute(name).unwrap_or_default().to_string()
}

/// Text of the first `name` child. A present but empty element yields an
/// empty string, an absent one `None`.
fn child_text(node: Node<'_, '_>, name: &'static str) -> Option<String> {
    first_child(node, name).map(|child| child.text().unwrap_or_default().to_string())
}
