//! # Entity Alignment
//!
//! The extraction model reports *what* it found ("king", "Commodity") but not
//! *where*: mentions come back as surface text with no offsets. This module
//! recovers a character span for each mention by exact first-occurrence
//! substring search inside the normalized sentence.
//!
//! The search is deliberately exact and case-sensitive. Fuzzy matching is an
//! obvious extension for noisy transliterations, but an approximate span that
//! straddles the wrong signs renders as a corrupted highlight; for an
//! inspection tool, dropping the mention (with a diagnostic) is the better
//! failure.
//!
//! A raw mention with list-valued `text` is treated as several independent
//! candidates sharing the same type; a list-valued `type` fans one found span
//! out into one [`AlignedEntity`] per label.

use serde::{Deserialize, Serialize};

use crate::diagnostics::{Diagnostics, Stage};
use crate::normalize::normalize_text;
use crate::reader::RawMention;

/// A mention pinned to a byte span of the *normalized* sentence.
///
/// `start` always points at a real occurrence of `text`. `end` is
/// `start + len(original mention text)` — the length of the text as the model
/// reported it, **before** normalization. When normalization changes the
/// mention's length the span is mis-sized and the exact token-boundary check
/// later drops it; this quirk is kept deliberately (see DESIGN.md).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignedEntity {
    /// Normalized mention text, exactly as found in the sentence.
    pub text: String,
    /// Raw role/type label, one per record after list expansion.
    pub label: String,
    /// Byte offset of the first occurrence in the normalized sentence.
    pub start: usize,
    /// `start` plus the byte length of the un-normalized mention text.
    pub end: usize,
}

/// Aligns every mention of one sentence, expanding list-valued fields and
/// dropping what cannot be placed.
///
/// Per candidate mention text:
/// - normalize it with the same rules as the sentence;
/// - find its first occurrence in `sentence` (already normalized);
/// - on a hit, emit one record per label;
/// - on a miss, record a [`Stage::Alignment`] diagnostic and move on.
///
/// Mentions with a missing `text` or a missing/`null`/empty `type` produce no
/// output. Repeated occurrences are never disambiguated: the first match is
/// the only match.
pub fn align_mentions(
    sentence: &str,
    mentions: &[RawMention],
    diags: &mut Diagnostics,
) -> Vec<AlignedEntity> {
    let mut aligned = Vec::new();

    for mention in mentions {
        let (Some(text), Some(label)) = (&mention.text, &mention.label) else {
            continue;
        };

        for candidate in text.values() {
            let normalized = normalize_text(candidate);
            let Some(start) = sentence.find(&normalized) else {
                diags.push(
                    Stage::Alignment,
                    candidate,
                    format!("entity not found in sentence: {sentence:?}"),
                );
                continue;
            };
            let end = start + candidate.len();

            for single_label in label.values() {
                if single_label.is_empty() {
                    continue;
                }
                aligned.push(AlignedEntity {
                    text: normalized.clone(),
                    label: single_label.to_string(),
                    start,
                    end,
                });
            }
        }
    }

    aligned
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::OneOrMany;

    fn mention(text: &str, label: &str) -> RawMention {
        RawMention {
            text: Some(OneOrMany::One(text.to_string())),
            label: Some(OneOrMany::One(label.to_string())),
        }
    }

    #[test]
    fn test_simple_alignment() {
        let sentence = "The king sold a donkey to the buyer";
        let mut diags = Diagnostics::new();
        let aligned = align_mentions(sentence, &[mention("king", "King title")], &mut diags);
        assert!(diags.is_empty());
        assert_eq!(
            aligned,
            vec![AlignedEntity {
                text: "king".to_string(),
                label: "King title".to_string(),
                start: 4,
                end: 8,
            }]
        );
    }

    #[test]
    fn test_found_span_reproduces_mention_text() {
        let sentence = "ina Nippur a donkey was sold";
        let mut diags = Diagnostics::new();
        let aligned = align_mentions(sentence, &[mention("Nippur", "Location")], &mut diags);
        let ent = &aligned[0];
        assert_eq!(&sentence[ent.start..ent.start + ent.text.len()], ent.text);
    }

    #[test]
    fn test_miss_is_dropped_with_diagnostic() {
        let sentence = "The king sold a donkey";
        let mut diags = Diagnostics::new();
        let aligned = align_mentions(sentence, &[mention("queen", "Royal")], &mut diags);
        assert!(aligned.is_empty());
        assert_eq!(diags.count_for(Stage::Alignment), 1);
        assert_eq!(diags.iter().next().unwrap().input, "queen");
    }

    #[test]
    fn test_one_miss_does_not_stop_the_batch() {
        let sentence = "The king sold a donkey";
        let mentions = [mention("queen", "Royal"), mention("donkey", "Animal")];
        let mut diags = Diagnostics::new();
        let aligned = align_mentions(sentence, &mentions, &mut diags);
        assert_eq!(aligned.len(), 1);
        assert_eq!(aligned[0].text, "donkey");
        assert_eq!(diags.len(), 1);
    }

    #[test]
    fn test_list_valued_text_expands() {
        let sentence = "from Nippur to Ur and back";
        let mentions = [RawMention {
            text: Some(OneOrMany::Many(vec!["Nippur".to_string(), "Ur".to_string()])),
            label: Some(OneOrMany::One("Location".to_string())),
        }];
        let mut diags = Diagnostics::new();
        let aligned = align_mentions(sentence, &mentions, &mut diags);
        assert_eq!(aligned.len(), 2);
        assert_eq!(aligned[0].start, 5);
        assert_eq!(aligned[1].start, 15);
        assert!(aligned.iter().all(|e| e.label == "Location"));
    }

    #[test]
    fn test_list_valued_label_fans_out_over_one_span() {
        let sentence = "Balāṭu received the silver";
        let mentions = [RawMention {
            text: Some(OneOrMany::One("Balāṭu".to_string())),
            label: Some(OneOrMany::Many(vec![
                "Recipient".to_string(),
                "Person".to_string(),
            ])),
        }];
        let mut diags = Diagnostics::new();
        let aligned = align_mentions(sentence, &mentions, &mut diags);
        assert_eq!(aligned.len(), 2);
        assert_eq!(aligned[0].start, aligned[1].start);
        assert_eq!(aligned[0].end, aligned[1].end);
        assert_eq!(aligned[0].label, "Recipient");
        assert_eq!(aligned[1].label, "Person");
    }

    #[test]
    fn test_missing_text_or_label_skipped_silently() {
        let sentence = "anything";
        let mentions = [
            RawMention { text: None, label: Some(OneOrMany::One("X".to_string())) },
            RawMention { text: Some(OneOrMany::One("anything".to_string())), label: None },
        ];
        let mut diags = Diagnostics::new();
        let aligned = align_mentions(sentence, &mentions, &mut diags);
        assert!(aligned.is_empty());
        assert!(diags.is_empty());
    }

    #[test]
    fn test_first_occurrence_only() {
        let sentence = "silver for silver";
        let mut diags = Diagnostics::new();
        let aligned = align_mentions(sentence, &[mention("silver", "Commodity")], &mut diags);
        assert_eq!(aligned.len(), 1);
        assert_eq!(aligned[0].start, 0);
    }

    #[test]
    fn test_mention_normalized_before_search() {
        // The sentence is normalized upstream; the mention arrives raw and
        // must go through the same rules to land.
        let sentence = normalize_text("[Nabû] spoke ... loudly");
        let mut diags = Diagnostics::new();
        let aligned = align_mentions(&sentence, &[mention("[Nabû]", "Person")], &mut diags);
        assert_eq!(aligned.len(), 1);
        assert_eq!(aligned[0].text, "Nabû");
        // End offset uses the raw length (8 bytes: brackets plus the
        // two-byte û) — the documented mis-sizing quirk.
        assert_eq!(aligned[0].end, aligned[0].start + "[Nabû]".len());
    }
}
