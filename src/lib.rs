use core::render::FieldRenderer;

pub mod core;
pub mod errors;
pub mod fields;
pub mod mapping;
pub mod resolver;
pub mod segmenter;
pub mod types;

pub use core::document::{
    COMMENTS_REL_TYPE, Comment, CommentStore, Document, FieldCharKind, Package, Paragraph,
    ParagraphChild, Relationship, Run, RunContent, RunFormat,
};
pub use core::promote::{Promotion, promote_fields};
pub use core::render::strip_comments;
pub use errors::{CompileError, MappingError};
pub use fields::FieldStyle;
pub use mapping::{MappingEntry, MappingTable, Sheet};
pub use resolver::{ResolverConfig, resolve_condition};
pub use segmenter::segment;
pub use types::{ConditionResolution, Token};

/// Compiles template prose into word-processor field codes against one
/// mapping table snapshot.
///
/// The table and resolver config are read-only for the compiler's lifetime;
/// every call is a pure transformation over the caller-owned document tree
/// or input string, with no state kept between calls.
pub struct FieldCompiler {
    table: MappingTable,
    config: ResolverConfig,
}

impl FieldCompiler {
    pub fn new(table: MappingTable) -> Self {
        FieldCompiler {
            table,
            config: ResolverConfig::default(),
        }
    }

    pub fn with_config(table: MappingTable, config: ResolverConfig) -> Self {
        FieldCompiler { table, config }
    }

    /// Builds a compiler straight from a workbook-shaped mapping resource
    /// and an optional resolver config in JSON. Either load failure is
    /// reported whole; no partially configured compiler is produced.
    pub fn from_workbook(
        sheets: &[Sheet],
        config_json: Option<&str>,
    ) -> Result<Self, CompileError> {
        let table = MappingTable::from_workbook(sheets)?;
        let config = match config_json {
            Some(json) => ResolverConfig::from_json(json)?,
            None => ResolverConfig::default(),
        };
        Ok(FieldCompiler { table, config })
    }

    pub fn table(&self) -> &MappingTable {
        &self.table
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Rewrites a loaded document in place: strips comments, converts
    /// condition paragraphs and mapped titles into fields, preserves run
    /// formatting. Returns the review transcript.
    pub fn compile_document(&self, doc: &mut Document) -> String {
        FieldRenderer::new(&self.table, &self.config).compile_document(doc)
    }

    /// Builds a fresh document from raw template text, plus its transcript.
    pub fn compile_text(&self, text: &str) -> (Document, String) {
        FieldRenderer::new(&self.table, &self.config).compile_text(text)
    }

    /// Transcript only; needs no document at all.
    pub fn preview(&self, text: &str) -> String {
        FieldRenderer::new(&self.table, &self.config).preview(text)
    }

    /// Promotes field-shaped plain text into real fields. Independent of
    /// the mapping table; provided here for discoverability.
    pub fn promote(doc: &mut Document) -> Promotion {
        promote_fields(doc)
    }
}
