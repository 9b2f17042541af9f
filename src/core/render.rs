//! Document-facing rendering: walks a paragraph/run tree, applies the
//! segmenter and field serializer while keeping existing formatting, and
//! produces the plain-text transcript used for human review.

use log::{debug, trace};

use crate::core::document::{Document, Paragraph, ParagraphChild, Run, RunContent};
use crate::fields::{
    FieldStyle, condition_instruction, field_run, merge_instruction, transcript_line,
    transcript_token,
};
use crate::mapping::MappingTable;
use crate::resolver::{ResolverConfig, resolve_condition};
use crate::segmenter::{find_first_title, segment};
use crate::types::Token;

/// Sentinel prefix marking a whole-paragraph conditional. The remainder of
/// the trimmed paragraph text is the condition title, no quote delimiter
/// involved.
const CONDITION_PREFIX: &str = "IF Betingelse ";

pub struct FieldRenderer<'a> {
    table: &'a MappingTable,
    config: &'a ResolverConfig,
}

impl<'a> FieldRenderer<'a> {
    pub fn new(table: &'a MappingTable, config: &'a ResolverConfig) -> Self {
        FieldRenderer { table, config }
    }

    /// Rewrites an existing document in place and returns the transcript,
    /// one line per non-blank paragraph. Comments are stripped before any
    /// substitution so removed anchors cannot dangle.
    pub fn compile_document(&self, doc: &mut Document) -> String {
        strip_comments(doc);

        let mut transcript = Vec::new();
        for (i, para) in doc.paragraphs.iter_mut().enumerate() {
            let text = para.text();
            if text.trim().is_empty() {
                continue;
            }
            let line = if let Some(title) = text.trim().strip_prefix(CONDITION_PREFIX) {
                debug!("paragraph {i}: whole-paragraph conditional {:?}", title);
                self.render_condition_paragraph(para, title, &text)
            } else {
                self.render_ordinary_paragraph(para, &text)
            };
            transcript.push(line);
        }
        transcript.join("\n")
    }

    /// Builds a fresh document from raw template text. Freshly generated
    /// fields carry no separator marker. Blank lines are skipped. Returns
    /// the document together with its transcript.
    pub fn compile_text(&self, text: &str) -> (Document, String) {
        let mut doc = Document::default();
        let mut transcript = Vec::new();
        for line in text.lines() {
            if line.trim().is_empty() {
                continue;
            }
            let tokens = segment(line, self.table, self.config);
            transcript.push(transcript_line(&tokens));
            let mut para = Paragraph::default();
            for token in &tokens {
                para.add_run(self.token_run(token, FieldStyle::Plain));
            }
            doc.paragraphs.push(para);
        }
        (doc, transcript.join("\n"))
    }

    /// Transcript only, line for line. Text containing no mapped titles and
    /// no condition phrases comes back unchanged.
    pub fn preview(&self, text: &str) -> String {
        text.lines()
            .map(|line| transcript_line(&segment(line, self.table, self.config)))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn token_run(&self, token: &Token, style: FieldStyle) -> Run {
        match token {
            Token::Literal(t) => Run::text_run(t.clone(), Default::default()),
            Token::MergeField { key } => {
                field_run(&merge_instruction(key), style, Default::default())
            }
            Token::ConditionalField {
                condition_key,
                true_result_key,
            } => field_run(
                &condition_instruction(condition_key, true_result_key),
                style,
                Default::default(),
            ),
        }
    }

    /// Whole-paragraph conditional: snapshot the first run's formatting,
    /// replace every run with a single stamped run holding either the
    /// cached conditional field or, on partial resolution, the paragraph's
    /// original text.
    fn render_condition_paragraph(
        &self,
        para: &mut Paragraph,
        condition_title: &str,
        original_text: &str,
    ) -> String {
        let resolution = resolve_condition(condition_title, self.table, self.config);
        let snapshot = para
            .first_run()
            .map(|r| r.format.clone())
            .unwrap_or_default();

        match (resolution.condition_key, resolution.true_result_key) {
            (Some(condition_key), Some(true_result_key)) => {
                let token = Token::ConditionalField {
                    condition_key: condition_key.clone(),
                    true_result_key: true_result_key.clone(),
                };
                para.replace_runs(vec![field_run(
                    &condition_instruction(&condition_key, &true_result_key),
                    FieldStyle::Cached,
                    snapshot,
                )]);
                transcript_token(&token)
            }
            _ => {
                trace!("condition paragraph kept literal: {:?}", condition_title);
                para.replace_runs(vec![Run::text_run(original_text, snapshot)]);
                original_text.to_string()
            }
        }
    }

    /// Ordinary paragraph: the transcript is planned over the whole
    /// paragraph text, but substitution works per original run so existing
    /// formatting boundaries hold. Only the first occurring title in each
    /// run is replaced; remainder runs created by a split are not rescanned
    /// in the same pass.
    fn render_ordinary_paragraph(&self, para: &mut Paragraph, text: &str) -> String {
        let line = transcript_line(&segment(text, self.table, self.config));

        let mut i = 0;
        while i < para.children.len() {
            let ParagraphChild::Run(run) = &para.children[i] else {
                i += 1;
                continue;
            };
            let run_text = run.text();
            if run_text.trim().is_empty() {
                i += 1;
                continue;
            }
            let Some((idx, entry)) = find_first_title(&run_text, self.table) else {
                i += 1;
                continue;
            };
            trace!("replacing title {:?} in run {i}", entry.title);

            let snapshot = run.format.clone();
            let pre = &run_text[..idx];
            let post = &run_text[idx + entry.title.len()..];

            let mut replacement = Vec::new();
            if !pre.is_empty() {
                replacement.push(ParagraphChild::Run(Run::text_run(pre, snapshot.clone())));
            }
            // Color and highlight are cleared on the injected field run.
            replacement.push(ParagraphChild::Run(field_run(
                &merge_instruction(&entry.key),
                FieldStyle::Cached,
                snapshot.without_color(),
            )));
            if !post.is_empty() {
                replacement.push(ParagraphChild::Run(Run::text_run(post, snapshot)));
            }

            let inserted = replacement.len();
            para.children.splice(i..i + 1, replacement);
            i += inserted;
        }
        line
    }
}

/// Removes every comment anchor from the paragraphs, then the comments
/// collection and its package relationship. Must run before substitution.
pub fn strip_comments(doc: &mut Document) {
    for para in &mut doc.paragraphs {
        para.children.retain(|c| {
            !matches!(
                c,
                ParagraphChild::CommentRangeStart(_) | ParagraphChild::CommentRangeEnd(_)
            )
        });
        for child in &mut para.children {
            if let ParagraphChild::Run(run) = child {
                run.content
                    .retain(|c| !matches!(c, RunContent::CommentReference(_)));
            }
        }
    }
    if doc.package.comments.take().is_some() {
        debug!("removed comments collection");
    }
    doc.package
        .relationships
        .retain(|r| r.rel_type != crate::core::document::COMMENTS_REL_TYPE);
}
