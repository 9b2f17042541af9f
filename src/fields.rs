//! Field-code construction: instruction text, marker sequences and the
//! plain-text transcript forms.
//!
//! Nesting is string-level instruction composition. The target format
//! stores nested fields as flat marker sequences with embedded instruction
//! text, never as a structural hierarchy, so a conditional field's inner
//! merge fields appear as `{ MERGEFIELD <key> }` text inside the outer IF
//! instruction. Whitespace inside instruction text is part of the required
//! syntax and must survive untouched.

use crate::core::document::{FieldCharKind, Run, RunContent, RunFormat};
use crate::types::Token;

/// Whether a serialized field carries a value-cache separator marker.
///
/// `Plain` is used for freshly generated paragraphs; `Cached` when editing
/// an existing document, so downstream viewers can show a cached display
/// value after the separator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldStyle {
    Plain,
    Cached,
}

pub fn merge_instruction(key: &str) -> String {
    format!(" MERGEFIELD {key} ")
}

pub fn condition_instruction(condition_key: &str, true_result_key: &str) -> String {
    format!(
        " IF \"J\" = \"{{ MERGEFIELD {condition_key} }}\" \"{{ MERGEFIELD {true_result_key} }}\" "
    )
}

/// Begin / instruction / [separator] / end marker sequence for one field.
pub fn field_content(instruction: &str, style: FieldStyle) -> Vec<RunContent> {
    let mut content = vec![
        RunContent::FieldChar(FieldCharKind::Begin),
        RunContent::InstrText(instruction.to_string()),
    ];
    if style == FieldStyle::Cached {
        content.push(RunContent::FieldChar(FieldCharKind::Separate));
    }
    content.push(RunContent::FieldChar(FieldCharKind::End));
    content
}

/// A single run holding one complete field construct.
pub fn field_run(instruction: &str, style: FieldStyle, format: RunFormat) -> Run {
    Run {
        format,
        content: field_content(instruction, style),
    }
}

/// Renders one token into the plain-text transcript form. Operates purely
/// on strings; the transcript never touches a document tree.
pub fn transcript_token(token: &Token) -> String {
    match token {
        Token::Literal(text) => text.clone(),
        Token::MergeField { key } => format!("{{ MERGEFIELD {key} }}"),
        Token::ConditionalField {
            condition_key,
            true_result_key,
        } => format!(
            "{{ IF \"{{ MERGEFIELD {condition_key} }}\" = \"J\" \"{{ MERGEFIELD {true_result_key} }}\" \"\" }}"
        ),
    }
}

pub fn transcript_line(tokens: &[Token]) -> String {
    tokens.iter().map(transcript_token).collect()
}
