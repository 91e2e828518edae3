//! # nerviz-core — NER Output Alignment and Highlighting
//!
//! This crate prepares LLM-extracted named entities over historical-text
//! transcriptions for visual inspection. The upstream model reports entity
//! surface text and a free-text role label, but no positions; everything here
//! exists to recover positions, regularize labels, and produce page-ready
//! highlighted markup.
//!
//! ## Pipeline
//!
//! Data flows through a linear pipeline, one stage per module:
//!
//! 1. **Reading** ([`reader`]): the pipe-delimited result files are parsed
//!    into `(sentence, entities)` records.
//! 2. **Normalization** ([`normalize`]): ellipsis runs collapse to `{UNK}`,
//!    editorial brackets are stripped.
//! 3. **Alignment** ([`align`]): each mention is pinned to its first
//!    occurrence in the normalized sentence.
//! 4. **Taxonomy** ([`taxonomy`]): free-text role labels fold onto a fixed
//!    controlled vocabulary; one palette maps labels to colors.
//! 5. **Tokenization** ([`tokenizer`]): the sentence is split into
//!    offset-preserving tokens.
//! 6. **Span conversion** ([`span`]): character spans become half-open token
//!    ranges, exact boundaries only.
//! 7. **Rendering** ([`render`]): token spans become inline-highlighted HTML
//!    plus a legend.
//!
//! Anything that cannot make it through a stage is dropped and recorded in
//! [`diagnostics`] — data problems degrade the view, they never crash it.
//!
//! ## Example
//!
//! ```rust
//! use nerviz_core::{Diagnostics, Palette};
//! use nerviz_core::{align_mentions, char_spans_to_token_spans, normalize_text,
//!                   render_highlights, tokenize};
//! use nerviz_core::reader::{OneOrMany, RawMention};
//!
//! let sentence = normalize_text("The king sold a donkey to the buyer");
//! let mentions = vec![RawMention {
//!     text: Some(OneOrMany::One("king".into())),
//!     label: Some(OneOrMany::One("King title".into())),
//! }];
//!
//! let mut diags = Diagnostics::new();
//! let entities = align_mentions(&sentence, &mentions, &mut diags);
//! let tokens = tokenize(&sentence);
//! let spans = char_spans_to_token_spans(&tokens, &entities, &mut diags);
//! let html = render_highlights(&sentence, &tokens, &spans, &Palette::default());
//!
//! assert!(html.contains("#1E90FF"));
//! assert!(diags.is_empty());
//! ```

pub mod align;
pub mod diagnostics;
pub mod error;
pub mod normalize;
pub mod pipeline;
pub mod reader;
pub mod render;
pub mod span;
pub mod taxonomy;
pub mod tokenizer;

pub use align::{align_mentions, AlignedEntity};
pub use diagnostics::{Diagnostic, Diagnostics, Stage};
pub use error::LoadError;
pub use normalize::normalize_text;
pub use pipeline::{build_view, check_alignment, process_all, process_record, ProcessedSentence, SentenceView};
pub use reader::{load_results, parse_records, ModelOutput, OneOrMany, RawMention, ResultRecord};
pub use render::{render_highlights, render_legend, LegendEntry};
pub use span::{char_spans_to_token_spans, TokenSpan};
pub use taxonomy::{normalize_label, Palette, DEFAULT_COLOR};
pub use tokenizer::{tokenize, Token};
