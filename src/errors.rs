use thiserror::Error;

/// Errors raised while building a [`crate::MappingTable`].
///
/// A failed load never produces a partial table.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MappingError {
    #[error("no sheet named 'query' in workbook")]
    MissingSheet,
    #[error("sheet 'query' is missing column '{0}'")]
    MissingColumn(String),
    #[error("empty title in row {0}")]
    EmptyTitle(usize),
    #[error("duplicate title '{0}'")]
    DuplicateTitle(String),
}

#[derive(Error, Debug)]
pub enum CompileError {
    #[error("mapping table error: {0}")]
    Mapping(#[from] MappingError),
    #[error("resolver config error: {0}")]
    Config(#[from] serde_json::Error),
}
