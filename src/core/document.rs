//! In-memory model of the target document format: paragraphs holding runs,
//! runs holding text or field-code parts, and a package level carrying the
//! comments collection and its relationship entry.
//!
//! The tree is owned by the caller for the duration of a compile; the crate
//! mutates it in place and never manages load or save.

/// Relationship type linking a document part to its comments collection.
pub const COMMENTS_REL_TYPE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/comments";

#[derive(Debug, Clone, Default)]
pub struct Document {
    pub paragraphs: Vec<Paragraph>,
    pub package: Package,
}

#[derive(Debug, Clone, Default)]
pub struct Package {
    pub comments: Option<CommentStore>,
    pub relationships: Vec<Relationship>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    pub id: String,
    pub rel_type: String,
}

#[derive(Debug, Clone, Default)]
pub struct CommentStore {
    pub comments: Vec<Comment>,
}

#[derive(Debug, Clone)]
pub struct Comment {
    pub id: u32,
    pub author: String,
    pub text: String,
}

#[derive(Debug, Clone, Default)]
pub struct Paragraph {
    pub children: Vec<ParagraphChild>,
}

#[derive(Debug, Clone)]
pub enum ParagraphChild {
    Run(Run),
    CommentRangeStart(u32),
    CommentRangeEnd(u32),
}

#[derive(Debug, Clone, Default)]
pub struct Run {
    pub format: RunFormat,
    pub content: Vec<RunContent>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunContent {
    Text(String),
    FieldChar(FieldCharKind),
    InstrText(String),
    CommentReference(u32),
}

/// Field marker kinds: where instruction text starts, where a cached
/// display value begins, and where the field ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldCharKind {
    Begin,
    Separate,
    End,
}

/// Captured run attributes, copied by value so splitting a run for field
/// insertion never loses styling.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunFormat {
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    pub underline: Option<bool>,
    pub font_name: Option<String>,
    pub font_size: Option<f32>,
    pub color: Option<String>,
    pub highlight: Option<String>,
}

impl RunFormat {
    /// Snapshot with foreground color and highlight dropped, stamped onto
    /// injected field runs to de-emphasise legacy highlighting.
    pub fn without_color(&self) -> RunFormat {
        RunFormat {
            color: None,
            highlight: None,
            ..self.clone()
        }
    }
}

impl Run {
    pub fn text_run(text: impl Into<String>, format: RunFormat) -> Run {
        Run {
            format,
            content: vec![RunContent::Text(text.into())],
        }
    }

    /// Concatenated visible text of this run. Instruction text and field
    /// markers do not count as text.
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(|c| match c {
                RunContent::Text(t) => Some(t.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Paragraph {
    pub fn from_text(text: impl Into<String>) -> Paragraph {
        Paragraph {
            children: vec![ParagraphChild::Run(Run::text_run(text, RunFormat::default()))],
        }
    }

    /// Concatenated visible text across all runs.
    pub fn text(&self) -> String {
        self.runs().map(|r| r.text()).collect()
    }

    pub fn runs(&self) -> impl Iterator<Item = &Run> {
        self.children.iter().filter_map(|c| match c {
            ParagraphChild::Run(run) => Some(run),
            _ => None,
        })
    }

    pub fn first_run(&self) -> Option<&Run> {
        self.runs().next()
    }

    pub fn add_run(&mut self, run: Run) {
        self.children.push(ParagraphChild::Run(run));
    }

    /// Drops every existing run (non-run children survive) and installs the
    /// given list. The explicit replace-run-list operation: callers never
    /// hold onto run references across it.
    pub fn replace_runs(&mut self, runs: Vec<Run>) {
        self.children
            .retain(|c| !matches!(c, ParagraphChild::Run(_)));
        self.children
            .extend(runs.into_iter().map(ParagraphChild::Run));
    }
}

impl Document {
    /// One paragraph per line, each holding a single unformatted run. Feeds
    /// promoter input from plain transcripts.
    pub fn from_plain_text(text: &str) -> Document {
        Document {
            paragraphs: text.lines().map(Paragraph::from_text).collect(),
            package: Package::default(),
        }
    }

    /// Number of true fields, counted by their begin markers.
    pub fn field_count(&self) -> usize {
        self.paragraphs
            .iter()
            .flat_map(|p| p.runs())
            .flat_map(|r| r.content.iter())
            .filter(|c| matches!(c, RunContent::FieldChar(FieldCharKind::Begin)))
            .count()
    }
}
