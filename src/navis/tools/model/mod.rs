use serde::Serialize;

/// Separator used when folder names are joined for display.
pub const PATH_SEPARATOR: &str = " > ";

/// Header row of the exported table, in column order.
pub const COLUMNS: [&str; 11] = [
    "Category",
    "Level",
    "Subfolder",
    "ViewName",
    "GUID",
    "CommentID",
    "Status",
    "User",
    "Body",
    "CreatedDate",
    "ImagePath",
];

/// A fully parsed viewpoint export. Only the top-level folders found under
/// the `viewpoints` element are kept; everything else in the file is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewpointDocument {
    pub folders: Vec<ViewFolder>,
}

impl ViewpointDocument {
    /// Total number of views across every folder, at any depth.
    pub fn view_count(&self) -> usize {
        self.folders.iter().map(ViewFolder::view_count).sum()
    }
}

/// A `viewfolder` element. Views and child folders keep document order
/// within their own lists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewFolder {
    pub name: String,
    pub views: Vec<View>,
    pub folders: Vec<ViewFolder>,
}

impl ViewFolder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_view(mut self, view: View) -> Self {
        self.views.push(view);
        self
    }

    pub fn with_folder(mut self, folder: ViewFolder) -> Self {
        self.folders.push(folder);
        self
    }

    fn view_count(&self) -> usize {
        self.views.len() + self.folders.iter().map(ViewFolder::view_count).sum::<usize>()
    }
}

/// A saved viewpoint. `identifier` is the export's `guid` attribute and is
/// treated as an opaque string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct View {
    pub name: String,
    pub identifier: String,
    pub comments: Vec<Comment>,
}

impl View {
    pub fn new(name: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            identifier: identifier.into(),
            comments: Vec::new(),
        }
    }

    pub fn with_comment(mut self, comment: Comment) -> Self {
        self.comments.push(comment);
        self
    }
}

/// A review comment attached to a view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Comment {
    pub id: String,
    pub status: String,
    pub user: Option<String>,
    pub body: Option<String>,
    pub created: Option<CreatedDate>,
}

impl Comment {
    pub fn new(id: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            status: status.into(),
            ..Self::default()
        }
    }
}

/// The `createddate` element of a comment.
///
/// `raw` keeps the element's source text so that normalisation failures can
/// be reported verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreatedDate {
    pub date: Option<DateDescriptor>,
    pub raw: String,
}

/// Unparsed `year`/`month`/`day` attributes of a `date` element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateDescriptor {
    pub year: Option<String>,
    pub month: Option<String>,
    pub day: Option<String>,
}

impl DateDescriptor {
    pub fn new(year: impl ToString, month: impl ToString, day: impl ToString) -> Self {
        Self {
            year: Some(year.to_string()),
            month: Some(month.to_string()),
            day: Some(day.to_string()),
        }
    }
}

/// Ordered folder names from the top-level category down to the current
/// folder. Extending a path yields a new value; the parent is never touched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FolderPath(Vec<String>);

impl FolderPath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn child(&self, name: &str) -> Self {
        let mut segments = self.0.clone();
        segments.push(name.to_string());
        Self(segments)
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }

    pub fn category(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    pub fn subcategory(&self) -> Option<&str> {
        self.0.get(1).map(String::as_str)
    }

    /// Everything below the subcategory, joined for display. `None` when the
    /// path is shallower than three folders.
    pub fn detail(&self) -> Option<String> {
        (self.0.len() > 2).then(|| self.0[2..].join(PATH_SEPARATOR))
    }
}

impl<S: Into<String>> FromIterator<S> for FolderPath {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl std::fmt::Display for FolderPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0.join(PATH_SEPARATOR))
    }
}

/// One row of the exported table. Field renames match [`COLUMNS`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FlatRecord {
    #[serde(rename = "Category")]
    pub category: Option<String>,
    #[serde(rename = "Level")]
    pub subcategory: Option<String>,
    #[serde(rename = "Subfolder")]
    pub detail_path: Option<String>,
    #[serde(rename = "ViewName")]
    pub view_name: String,
    #[serde(rename = "GUID")]
    pub view_identifier: String,
    #[serde(rename = "CommentID")]
    pub comment_id: Option<String>,
    #[serde(rename = "Status")]
    pub status: Option<String>,
    #[serde(rename = "User")]
    pub user: Option<String>,
    #[serde(rename = "Body")]
    pub body: Option<String>,
    #[serde(rename = "CreatedDate")]
    pub created_date: Option<String>,
    #[serde(rename = "ImagePath")]
    pub image_reference: String,
}

impl FlatRecord {
    /// Cell values in [`COLUMNS`] order, `None` for empty cells.
    pub fn cells(&self) -> [Option<&str>; 11] {
        [
            self.category.as_deref(),
            self.subcategory.as_deref(),
            self.detail_path.as_deref(),
            Some(self.view_name.as_str()),
            Some(self.view_identifier.as_str()),
            self.comment_id.as_deref(),
            self.status.as_deref(),
            self.user.as_deref(),
            self.body.as_deref(),
            self.created_date.as_deref(),
            Some(self.image_reference.as_str()),
        ]
    }
}
