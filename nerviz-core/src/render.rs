//! # Inline Highlight Rendering
//!
//! Turns one tokenized sentence plus its token spans into a fragment of HTML
//! with per-type background colors, and builds the legend shown next to it.
//! Colors come from one shared [`Palette`], keyed by the *canonical* label of
//! each span, so legend and inline highlights can never disagree.
//!
//! All text content (token text, labels, inter-token whitespace) is escaped;
//! the returned fragment is safe to embed in a page as-is. Rendering mutates
//! nothing and is idempotent for a fixed input.

use html_escape::encode_text;
use serde::{Deserialize, Serialize};

use crate::align::AlignedEntity;
use crate::span::TokenSpan;
use crate::taxonomy::{normalize_label, Palette};
use crate::tokenizer::Token;

/// One legend row: a canonical label and its display color.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendEntry {
    pub label: String,
    pub color: String,
}

/// Renders the sentence with inline highlighting.
///
/// Spans are taken in `(start, end)` order; a span overlapping an already
/// rendered one is skipped (nested/crossing highlights are not stacked).
/// Each highlighted group carries a small tag with the canonical label.
pub fn render_highlights(
    sentence: &str,
    tokens: &[Token],
    spans: &[TokenSpan],
    palette: &Palette,
) -> String {
    let mut ordered: Vec<&TokenSpan> = spans.iter().collect();
    ordered.sort_by_key(|s| (s.start, s.end));

    // First-come wins on overlap.
    let mut chosen: Vec<&TokenSpan> = Vec::new();
    let mut next_free = 0;
    for span in ordered {
        if span.start >= next_free {
            chosen.push(span);
            next_free = span.end;
        }
    }

    let mut html = String::new();
    let mut open_until: Option<(usize, &TokenSpan)> = None;
    let mut cursor = 0;

    for token in tokens {
        // Inter-token gap (whitespace in the source sentence).
        if token.start > cursor {
            html.push_str(&encode_text(&sentence[cursor..token.start]));
        }
        cursor = token.end;

        if open_until.is_none() {
            if let Some(span) = chosen.iter().find(|s| s.start == token.index) {
                let canonical = normalize_label(&span.label);
                html.push_str(&format!(
                    "<span class=\"hl\" style=\"background-color:{};\">",
                    palette.color_for(&canonical)
                ));
                open_until = Some((span.end, *span));
            }
        }

        html.push_str(&encode_text(&token.text));

        if let Some((end, span)) = open_until {
            if token.index + 1 == end {
                let canonical = normalize_label(&span.label);
                html.push_str(&format!(
                    "<span class=\"hl-tag\">{}</span></span>",
                    encode_text(&canonical)
                ));
                open_until = None;
            }
        }
    }
    if open_until.is_some() {
        // Span end past the last token: close the group so the fragment
        // stays well-formed.
        html.push_str("</span>");
    }
    if cursor < sentence.len() {
        html.push_str(&encode_text(&sentence[cursor..]));
    }

    html
}

/// Builds the legend for one sentence from its aligned entities (the page
/// uses the baseline variant's entities only).
///
/// Entries are canonicalized, deduplicated and sorted by label.
pub fn render_legend(entities: &[AlignedEntity], palette: &Palette) -> Vec<LegendEntry> {
    let mut entries: Vec<LegendEntry> = Vec::new();
    for entity in entities {
        let label = normalize_label(&entity.label);
        if entries.iter().any(|e| e.label == label) {
            continue;
        }
        let color = palette.color_for(&label).to_string();
        entries.push(LegendEntry { label, color });
    }
    entries.sort_by(|a, b| a.label.cmp(&b.label));
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::tokenize;

    fn span(start: usize, end: usize, label: &str) -> TokenSpan {
        TokenSpan { start, end, label: label.to_string() }
    }

    #[test]
    fn test_basic_highlight() {
        let text = "The king sold a donkey";
        let tokens = tokenize(text);
        let html = render_highlights(text, &tokens, &[span(1, 2, "King title")], &Palette::default());
        assert!(html.contains("background-color:#1E90FF;"));
        assert!(html.contains(">king<"));
        assert!(html.contains("<span class=\"hl-tag\">King</span>"));
        assert!(html.starts_with("The "));
        assert!(html.ends_with(" sold a donkey"));
    }

    #[test]
    fn test_unknown_label_gets_default_gray() {
        let text = "a scapegoat walked";
        let tokens = tokenize(text);
        let html = render_highlights(text, &tokens, &[span(1, 2, "scapegoat")], &Palette::default());
        assert!(html.contains("background-color:#D3D3D3;"));
    }

    #[test]
    fn test_multi_token_span_wraps_once() {
        let text = "field of Bīt Dakūru sold";
        let tokens = tokenize(text);
        let html = render_highlights(text, &tokens, &[span(2, 4, "Location")], &Palette::default());
        assert_eq!(html.matches("<span class=\"hl\"").count(), 1);
        assert!(html.contains("Bīt Dakūru"));
    }

    #[test]
    fn test_escapes_markup_in_text_and_label() {
        let text = "x <b>bold</b> y";
        let tokens = tokenize(text);
        let html = render_highlights(text, &tokens, &[span(1, 2, "<script>")], &Palette::default());
        assert!(!html.contains("<b>"));
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;b&gt;bold&lt;/b&gt;"));
    }

    #[test]
    fn test_overlapping_spans_first_wins() {
        let text = "a b c d";
        let tokens = tokenize(text);
        let spans = [span(1, 3, "Seller"), span(2, 4, "Buyer")];
        let html = render_highlights(text, &tokens, &spans, &Palette::default());
        assert_eq!(html.matches("<span class=\"hl\"").count(), 1);
        assert!(html.contains("Seller"));
        assert!(!html.contains("Buyer"));
    }

    #[test]
    fn test_idempotent_for_fixed_input() {
        let text = "The king spoke";
        let tokens = tokenize(text);
        let spans = [span(1, 2, "king")];
        let palette = Palette::default();
        let a = render_highlights(text, &tokens, &spans, &palette);
        let b = render_highlights(text, &tokens, &spans, &palette);
        assert_eq!(a, b);
    }

    #[test]
    fn test_legend_sorted_and_deduped() {
        let entities = vec![
            AlignedEntity { text: "x".into(), label: "seller of the house".into(), start: 0, end: 1 },
            AlignedEntity { text: "y".into(), label: "Seller".into(), start: 2, end: 3 },
            AlignedEntity { text: "z".into(), label: "buyer".into(), start: 4, end: 5 },
        ];
        let legend = render_legend(&entities, &Palette::default());
        assert_eq!(legend.len(), 2);
        assert_eq!(legend[0].label, "Buyer");
        assert_eq!(legend[0].color, "#F8F8FF");
        assert_eq!(legend[1].label, "Seller");
        assert_eq!(legend[1].color, "#FFD700");
    }
}
