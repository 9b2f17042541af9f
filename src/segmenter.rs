use log::trace;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::mapping::{MappingEntry, MappingTable};
use crate::resolver::{ResolverConfig, resolve_condition};
use crate::types::Token;

/// Inline conditional phrase: the words "if betingelse" (any casing)
/// followed by the condition title, running up to a Danish or straight
/// double quote. The title is trimmed; the raw match is kept for the
/// literal fallback.
static CONDITION_PHRASE: Lazy<Regex> =
    Lazy::new(|| Regex::new("(?i)if betingelse ([^”\"]+)").unwrap());

/// Tokenizes raw text into literals, merge fields and conditional fields,
/// in source order.
///
/// Conditional phrases are found first (left to right, non-overlapping);
/// the spans between them go through longest-title-first substitution. An
/// unresolvable condition phrase is emitted as a `Literal` holding the
/// matched phrase verbatim, so it is never silently dropped.
pub fn segment(text: &str, table: &MappingTable, config: &ResolverConfig) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut pos = 0;

    for caps in CONDITION_PHRASE.captures_iter(text) {
        let whole = caps.get(0).unwrap();
        if whole.start() > pos {
            substitute_titles(&text[pos..whole.start()], table, &mut tokens);
        }

        let condition_title = caps.get(1).unwrap().as_str().trim();
        let resolution = resolve_condition(condition_title, table, config);
        match (resolution.condition_key, resolution.true_result_key) {
            (Some(condition_key), Some(true_result_key)) => {
                tokens.push(Token::ConditionalField {
                    condition_key,
                    true_result_key,
                });
            }
            _ => {
                trace!("unresolved condition phrase kept literal: {:?}", whole.as_str());
                tokens.push(Token::Literal(whole.as_str().to_string()));
            }
        }
        pos = whole.end();
    }

    if pos < text.len() {
        substitute_titles(&text[pos..], table, &mut tokens);
    }
    tokens
}

/// Longest-first substring substitution over one literal span.
///
/// Repeatedly takes the earliest-occurring title (match-order list breaks
/// position ties, so longer titles win at the same offset), emits the text
/// before it and a merge field for it, and continues after the match.
fn substitute_titles(text: &str, table: &MappingTable, tokens: &mut Vec<Token>) {
    let mut remaining = text;
    while !remaining.is_empty() {
        match find_first_title(remaining, table) {
            Some((idx, entry)) => {
                if idx > 0 {
                    tokens.push(Token::Literal(remaining[..idx].to_string()));
                }
                tokens.push(Token::MergeField {
                    key: entry.key.clone(),
                });
                remaining = &remaining[idx + entry.title.len()..];
            }
            None => {
                tokens.push(Token::Literal(remaining.to_string()));
                break;
            }
        }
    }
}

/// Earliest occurrence of any mapped title in `text`, scanning titles in
/// match order so a longer title beats a shorter one at the same position.
pub(crate) fn find_first_title<'a>(
    text: &str,
    table: &'a MappingTable,
) -> Option<(usize, &'a MappingEntry)> {
    let mut best: Option<(usize, &MappingEntry)> = None;
    for entry in table.lookup_in_order() {
        if let Some(idx) = text.find(&entry.title) {
            if best.is_none_or(|(b, _)| idx < b) {
                best = Some((idx, entry));
            }
        }
    }
    best
}
