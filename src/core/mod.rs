// Declare submodules
pub mod document;
pub mod promote;
pub mod render;

// Re-export the document-facing surface
pub use document::{Document, Paragraph, Run, RunFormat};
pub use promote::{Promotion, promote_fields};
pub use render::{FieldRenderer, strip_comments};
