//! # Character-Span to Token-Span Conversion
//!
//! The renderer highlights whole tokens, so each entity's character span must
//! be re-expressed as a half-open token range. Conversion is exact-match
//! only: the entity's `start` must equal some token's start offset and its
//! `end` some token's end offset. Anything that does not line up is dropped
//! with a diagnostic — an approximate token span would highlight the wrong
//! signs, which is worse than no highlight in an inspection tool.

use serde::{Deserialize, Serialize};

use crate::align::AlignedEntity;
use crate::diagnostics::{Diagnostics, Stage};
use crate::tokenizer::Token;

/// A half-open range of token indices carrying the raw label it was aligned
/// with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenSpan {
    /// Index of the first token (inclusive).
    pub start: usize,
    /// Index one past the last token (exclusive).
    pub end: usize,
    /// Raw role/type label carried through from alignment.
    pub label: String,
}

/// Converts aligned entities to token spans against one tokenization of the
/// sentence.
///
/// Every emitted span satisfies `end > start`; entities whose boundaries do
/// not both land on token boundaries are dropped with a
/// [`Stage::TokenBoundary`] diagnostic.
pub fn char_spans_to_token_spans(
    tokens: &[Token],
    entities: &[AlignedEntity],
    diags: &mut Diagnostics,
) -> Vec<TokenSpan> {
    let mut spans = Vec::new();

    for entity in entities {
        let mut token_start = None;
        let mut token_end = None;
        for token in tokens {
            if token.start == entity.start {
                token_start = Some(token.index);
            }
            if token.end == entity.end {
                token_end = Some(token.index + 1);
            }
        }

        match (token_start, token_end) {
            (Some(start), Some(end)) if end > start => {
                spans.push(TokenSpan {
                    start,
                    end,
                    label: entity.label.clone(),
                });
            }
            (Some(start), Some(end)) => {
                diags.push(
                    Stage::TokenBoundary,
                    entity.text.clone(),
                    format!("inverted token span {start}..{end} for bytes {}..{}", entity.start, entity.end),
                );
            }
            _ => {
                diags.push(
                    Stage::TokenBoundary,
                    entity.text.clone(),
                    format!("byte span {}..{} does not line up with token boundaries", entity.start, entity.end),
                );
            }
        }
    }

    spans
}
