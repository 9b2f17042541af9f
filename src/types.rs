/// One segment of a tokenized text unit, in source order.
///
/// A token stream is produced once per paragraph (or text unit) and consumed
/// once; it is never cached between runs of the compiler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Verbatim text, emitted unchanged.
    Literal(String),
    /// A mapped title, replaced by a data-merge placeholder.
    MergeField { key: String },
    /// A fully resolved inline condition phrase.
    ConditionalField {
        condition_key: String,
        true_result_key: String,
    },
}

/// Outcome of resolving one condition title against a mapping table.
///
/// Produced fresh per occurrence. `condition_key` absent means the title is
/// unknown; `true_result_key` absent with a known key means resolution was
/// partial and the occurrence degrades to literal text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionResolution {
    pub condition_title: String,
    pub condition_key: Option<String>,
    pub true_result_key: Option<String>,
}

impl ConditionResolution {
    pub fn is_complete(&self) -> bool {
        self.condition_key.is_some() && self.true_result_key.is_some()
    }
}
