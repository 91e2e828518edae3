//! # Pipeline — From Raw Records to Page-Ready Views
//!
//! Wires the stages together: sentence normalization → entity alignment →
//! tokenization → token-span conversion → HTML rendering. Each record is
//! processed independently of every other record, so the batch step runs in
//! parallel with rayon; diagnostics are collected per record and merged back
//! in record order, keeping output deterministic.
//!
//! The two result files are paired purely by position — there is no sentence
//! identity in the file format. [`check_alignment`] makes that precondition
//! explicit: row-by-row comparison of the raw sentences, warning diagnostics
//! by default, a hard [`LoadError`] in strict mode.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::align::{align_mentions, AlignedEntity};
use crate::diagnostics::{Diagnostics, Stage};
use crate::error::LoadError;
use crate::normalize::normalize_text;
use crate::reader::ResultRecord;
use crate::render::{render_highlights, render_legend, LegendEntry};
use crate::span::char_spans_to_token_spans;
use crate::taxonomy::Palette;
use crate::tokenizer::tokenize;

/// One sentence after normalization and alignment, before rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessedSentence {
    /// The normalized sentence text.
    pub sentence: String,
    /// Entities successfully pinned to spans, post label expansion.
    pub entities: Vec<AlignedEntity>,
}

/// Everything the page needs for one sentence row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentenceView {
    /// Row index shared by both result files.
    pub index: usize,
    /// Baseline model output, highlighted.
    pub baseline_html: String,
    /// Fine-tuned model output, highlighted.
    pub finetuned_html: String,
    /// Legend built from the baseline entity set.
    pub legend: Vec<LegendEntry>,
}

/// Normalizes one record's sentence and aligns its mentions.
pub fn process_record(record: &ResultRecord, diags: &mut Diagnostics) -> ProcessedSentence {
    let sentence = normalize_text(&record.sentence);
    let entities = align_mentions(&sentence, &record.output.entities, diags);
    ProcessedSentence { sentence, entities }
}

/// Processes a whole parsed result list in parallel.
pub fn process_all(records: &[ResultRecord]) -> (Vec<ProcessedSentence>, Diagnostics) {
    let per_record: Vec<(ProcessedSentence, Diagnostics)> = records
        .par_iter()
        .map(|record| {
            let mut diags = Diagnostics::new();
            let processed = process_record(record, &mut diags);
            (processed, diags)
        })
        .collect();

    let mut sentences = Vec::with_capacity(per_record.len());
    let mut diags = Diagnostics::new();
    for (processed, record_diags) in per_record {
        sentences.push(processed);
        diags.extend(record_diags);
    }
    (sentences, diags)
}

/// Tokenizes one processed sentence and renders its highlights.
fn highlight(processed: &ProcessedSentence, palette: &Palette, diags: &mut Diagnostics) -> String {
    let tokens = tokenize(&processed.sentence);
    let spans = char_spans_to_token_spans(&tokens, &processed.entities, diags);
    render_highlights(&processed.sentence, &tokens, &spans, palette)
}

/// Assembles the side-by-side view for one row index.
pub fn build_view(
    index: usize,
    baseline: &ProcessedSentence,
    finetuned: &ProcessedSentence,
    palette: &Palette,
    diags: &mut Diagnostics,
) -> SentenceView {
    SentenceView {
        index,
        baseline_html: highlight(baseline, palette, diags),
        finetuned_html: highlight(finetuned, palette, diags),
        legend: render_legend(&baseline.entities, palette),
    }
}

/// Validates the positional-pairing precondition between the two files.
///
/// Rows are compared over the shared prefix; a count mismatch is reported as
/// well. Non-strict mode records [`Stage::FileAlignment`] diagnostics and
/// carries on; strict mode fails on the first divergence.
pub fn check_alignment(
    baseline: &[ResultRecord],
    finetuned: &[ResultRecord],
    strict: bool,
    diags: &mut Diagnostics,
) -> Result<(), LoadError> {
    for (index, (b, f)) in baseline.iter().zip(finetuned).enumerate() {
        if b.sentence != f.sentence {
            if strict {
                return Err(LoadError::Misaligned {
                    index,
                    baseline: b.sentence.clone(),
                    finetuned: f.sentence.clone(),
                });
            }
            diags.push(
                Stage::FileAlignment,
                b.sentence.clone(),
                format!("fine-tuned file has {:?} at row {index}", f.sentence),
            );
        }
    }

    if baseline.len() != finetuned.len() {
        if strict {
            return Err(LoadError::LengthMismatch {
                baseline: baseline.len(),
                finetuned: finetuned.len(),
            });
        }
        diags.push(
            Stage::FileAlignment,
            String::new(),
            format!(
                "record counts differ: baseline {} vs fine-tuned {}",
                baseline.len(),
                finetuned.len()
            ),
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::parse_records;
    use std::io::Cursor;

    fn records(input: &str) -> Vec<ResultRecord> {
        let mut diags = Diagnostics::new();
        parse_records(Cursor::new(input), &mut diags).unwrap()
    }

    #[test]
    fn test_end_to_end_single_sentence() {
        let input = "The king sold a donkey to the buyer\n\
                     {\"entities\": [{\"text\": \"king\", \"type\": \"King title\"},\
                     {\"text\": \"donkey\", \"type\": \"animal sold\"}]}|\n";
        let recs = records(input);
        let (processed, diags) = process_all(&recs);
        assert!(diags.is_empty());
        assert_eq!(processed[0].entities.len(), 2);
        assert_eq!(processed[0].entities[0].start, 4);
        assert_eq!(processed[0].entities[0].end, 8);

        let mut render_diags = Diagnostics::new();
        let view = build_view(0, &processed[0], &processed[0], &Palette::default(), &mut render_diags);
        assert!(render_diags.is_empty());
        assert!(view.baseline_html.contains("#1E90FF"));
        let labels: Vec<&str> = view.legend.iter().map(|l| l.label.as_str()).collect();
        assert_eq!(labels, vec!["Animals", "King"]);
    }

    #[test]
    fn test_sentence_normalized_before_alignment() {
        let input = "He said ... nothing about [it]\n\
                     {\"entities\": [{\"text\": \"nothing\", \"type\": \"document\"}]}|\n";
        let recs = records(input);
        let (processed, diags) = process_all(&recs);
        assert!(diags.is_empty());
        assert_eq!(processed[0].sentence, "He said {UNK} nothing about it");
        assert_eq!(processed[0].entities[0].start, 14);
    }

    #[test]
    fn test_diagnostics_merged_in_record_order() {
        let input = "first sentence\n\
                     {\"entities\": [{\"text\": \"missing-a\", \"type\": \"x\"}]}|\n\
                     second sentence\n\
                     {\"entities\": [{\"text\": \"missing-b\", \"type\": \"y\"}]}|\n";
        let recs = records(input);
        let (_, diags) = process_all(&recs);
        let inputs: Vec<&str> = diags.iter().map(|d| d.input.as_str()).collect();
        assert_eq!(inputs, vec!["missing-a", "missing-b"]);
    }

    #[test]
    fn test_check_alignment_lenient_warns() {
        let a = records("one\n{\"entities\": []}|\ntwo\n{\"entities\": []}|\n");
        let b = records("one\n{\"entities\": []}|\nTWO\n{\"entities\": []}|\n");
        let mut diags = Diagnostics::new();
        assert!(check_alignment(&a, &b, false, &mut diags).is_ok());
        assert_eq!(diags.count_for(Stage::FileAlignment), 1);
    }

    #[test]
    fn test_check_alignment_strict_fails() {
        let a = records("one\n{\"entities\": []}|\n");
        let b = records("uno\n{\"entities\": []}|\n");
        let mut diags = Diagnostics::new();
        let err = check_alignment(&a, &b, true, &mut diags).unwrap_err();
        assert!(matches!(err, LoadError::Misaligned { index: 0, .. }));
    }

    #[test]
    fn test_check_alignment_length_mismatch() {
        let a = records("one\n{\"entities\": []}|\ntwo\n{\"entities\": []}|\n");
        let b = records("one\n{\"entities\": []}|\n");
        let mut diags = Diagnostics::new();
        assert!(check_alignment(&a, &b, false, &mut diags).is_ok());
        assert_eq!(diags.count_for(Stage::FileAlignment), 1);
        let err = check_alignment(&a, &b, true, &mut diags).unwrap_err();
        assert!(matches!(err, LoadError::LengthMismatch { baseline: 2, finetuned: 1 }));
    }

    #[test]
    fn test_matching_files_pass_strict() {
        let a = records("one\n{\"entities\": []}|\n");
        let b = records("one\n{\"entities\": []}|\n");
        let mut diags = Diagnostics::new();
        assert!(check_alignment(&a, &b, true, &mut diags).is_ok());
        assert!(diags.is_empty());
    }
}
