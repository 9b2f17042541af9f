//! Reverse field promotion: paragraphs whose plain text merely looks like
//! field syntax get their textual fields replaced by true field constructs.
//! Needs only the document, no mapping table.

use log::{debug, trace};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::core::document::{Document, Paragraph, ParagraphChild, Run};
use crate::fields::{FieldStyle, field_run, merge_instruction};

/// Four-part conditional with the special-cased "J" literal:
/// `{ IF "J" "{ MERGEFIELD <key> }" "<true>" "<false>" }`.
static IF_EXACT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\{ IF "J" "\{ MERGEFIELD ([^"}]+?) \}" "([^"]*)" "([^"]*)" \}"#).unwrap()
});

/// Generic conditional: arbitrary condition literal, with or without the
/// `=` comparand of the generation-direction grammar. Both shapes normalize
/// into the same comparison instruction.
static IF_GENERIC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\{ IF "([^"]*)" (?:= )?"([^"]*)" "([^"]*)" "([^"]*)" \}"#).unwrap()
});

static MERGE_FIELD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"\{ MERGEFIELD ([^"}]+?) \}"#).unwrap());

/// Outcome of one promotion pass: how many textual fields became real
/// fields, and what happened per paragraph.
#[derive(Debug, Default)]
pub struct Promotion {
    pub converted: usize,
    pub log: Vec<String>,
}

impl Promotion {
    /// True iff at least one conversion occurred.
    pub fn succeeded(&self) -> bool {
        self.converted > 0
    }
}

/// Scans every paragraph for field-shaped text and promotes it, in place.
/// Conditional patterns are tried first; if neither matches, standalone
/// merge-field text is promoted run by run. Zero matches is not an error.
pub fn promote_fields(doc: &mut Document) -> Promotion {
    let mut outcome = Promotion::default();
    for (i, para) in doc.paragraphs.iter_mut().enumerate() {
        let text = para.text();
        if let Some(caps) = IF_EXACT.captures(&text) {
            let key = &caps[1];
            debug!("paragraph {i}: exact conditional pattern, key {key:?}");
            let instruction =
                format!(" IF \"J\" = \"{{ MERGEFIELD {key} }}\" \"{}\" \"{}\" ", &caps[2], &caps[3]);
            replace_with_condition_field(para, &instruction);
            outcome.converted += 1;
            outcome
                .log
                .push(format!("paragraph {i}: conditional field promoted (key {key})"));
        } else if let Some(caps) = IF_GENERIC.captures(&text) {
            let condition = &caps[1];
            debug!("paragraph {i}: generic conditional pattern, condition {condition:?}");
            let instruction = format!(
                " IF \"{condition}\" = \"{}\" \"{}\" \"{}\" ",
                &caps[2], &caps[3], &caps[4]
            );
            replace_with_condition_field(para, &instruction);
            outcome.converted += 1;
            outcome.log.push(format!(
                "paragraph {i}: conditional field promoted (condition {condition})"
            ));
        } else {
            let promoted = promote_merge_fields(para);
            if promoted > 0 {
                outcome.converted += promoted;
                outcome
                    .log
                    .push(format!("paragraph {i}: {promoted} merge field(s) promoted"));
            }
        }
    }
    if outcome.converted == 0 {
        outcome
            .log
            .push("no field-code text found; nothing promoted".to_string());
    }
    outcome
}

/// Discards the paragraph's runs and installs one cached-value field run
/// holding the given instruction, stamped with the first run's formatting.
/// The true/false literals live directly in the instruction text, never as
/// nested fields.
fn replace_with_condition_field(para: &mut Paragraph, instruction: &str) {
    let snapshot = para
        .first_run()
        .map(|r| r.format.clone())
        .unwrap_or_default();
    para.replace_runs(vec![field_run(instruction, FieldStyle::Cached, snapshot)]);
}

/// Promotes every `{ MERGEFIELD <key> }` substring found in the paragraph's
/// runs, keeping surrounding literal text in runs of the same formatting.
fn promote_merge_fields(para: &mut Paragraph) -> usize {
    let mut promoted = 0;
    let mut i = 0;
    while i < para.children.len() {
        let ParagraphChild::Run(run) = &para.children[i] else {
            i += 1;
            continue;
        };
        let run_text = run.text();
        if !MERGE_FIELD.is_match(&run_text) {
            i += 1;
            continue;
        }

        let snapshot = run.format.clone();
        let mut replacement = Vec::new();
        let mut pos = 0;
        for caps in MERGE_FIELD.captures_iter(&run_text) {
            let whole = caps.get(0).unwrap();
            if whole.start() > pos {
                replacement.push(ParagraphChild::Run(Run::text_run(
                    &run_text[pos..whole.start()],
                    snapshot.clone(),
                )));
            }
            trace!("promoting merge field text for key {:?}", &caps[1]);
            replacement.push(ParagraphChild::Run(field_run(
                &merge_instruction(&caps[1]),
                FieldStyle::Plain,
                snapshot.clone(),
            )));
            promoted += 1;
            pos = whole.end();
        }
        if pos < run_text.len() {
            replacement.push(ParagraphChild::Run(Run::text_run(
                &run_text[pos..],
                snapshot,
            )));
        }

        let inserted = replacement.len();
        para.children.splice(i..i + 1, replacement);
        i += inserted;
    }
    promoted
}
