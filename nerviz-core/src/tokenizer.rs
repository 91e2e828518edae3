//! # Tokenizer for Transliterated Historical Text
//!
//! Splits a normalized sentence into tokens while preserving exact byte
//! offsets into the original string. Offsets are the whole point: the span
//! converter only accepts an entity whose character span lands precisely on
//! token boundaries, so the tokenizer must never invent or swallow a byte.
//!
//! Transliterated Akkadian is rich in intra-word structure that must stay
//! inside one token: hyphenated sign chains ("Nabû-šumu-ukīn"), determinative
//! groups in braces (and the `{UNK}` gap marker), dotted logogram chains
//! ("md.AMAR.UTU"). So the scheme is conservative:
//!
//! - whitespace delimits chunks;
//! - leading and trailing punctuation is peeled off a chunk as one-character
//!   tokens;
//! - everything interior stays glued together.

use serde::{Deserialize, Serialize};

/// A token with its exact position in the source sentence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// The token text (ex: "Nippur", ",", "{UNK}").
    pub text: String,
    /// Starting byte offset in the sentence (inclusive).
    pub start: usize,
    /// Ending byte offset in the sentence (exclusive).
    pub end: usize,
    /// Sequential index in the token list (0, 1, 2...).
    pub index: usize,
}

/// Punctuation peeled off chunk edges. Brackets are gone by normalization
/// time and braces are structural (determinatives, `{UNK}`), so neither
/// appears here.
const EDGE_PUNCT: &[char] = &[',', ';', ':', '!', '?', '.', '"', '(', ')'];

/// Tokenizes a normalized sentence.
pub fn tokenize(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();

    let mut chunk_start = None;
    for (pos, ch) in text.char_indices() {
        if ch.is_whitespace() {
            if let Some(start) = chunk_start.take() {
                split_chunk(&mut tokens, &text[start..pos], start);
            }
        } else if chunk_start.is_none() {
            chunk_start = Some(pos);
        }
    }
    if let Some(start) = chunk_start {
        split_chunk(&mut tokens, &text[start..], start);
    }

    for (i, token) in tokens.iter_mut().enumerate() {
        token.index = i;
    }
    tokens
}

/// Splits one whitespace-delimited chunk into edge punctuation and a core.
fn split_chunk(tokens: &mut Vec<Token>, chunk: &str, base: usize) {
    let mut start = 0;
    let mut end = chunk.len();

    // Peel leading punctuation, one char at a time, as long as something
    // else remains.
    while let Some(ch) = chunk[start..end].chars().next() {
        if !EDGE_PUNCT.contains(&ch) || start + ch.len_utf8() >= end {
            break;
        }
        push(tokens, chunk, base, start, start + ch.len_utf8());
        start += ch.len_utf8();
    }

    // Peel trailing punctuation into a stack so order comes out right.
    let mut trailing = Vec::new();
    while let Some((offset, ch)) = chunk[start..end].char_indices().last() {
        if !EDGE_PUNCT.contains(&ch) || offset == 0 {
            break;
        }
        trailing.push((start + offset, end));
        end = start + offset;
    }

    if end > start {
        push(tokens, chunk, base, start, end);
    }
    for (s, e) in trailing.into_iter().rev() {
        push(tokens, chunk, base, s, e);
    }
}

fn push(tokens: &mut Vec<Token>, chunk: &str, base: usize, start: usize, end: usize) {
    tokens.push(Token {
        text: chunk[start..end].to_string(),
        start: base + start,
        end: base + end,
        index: 0,
    });
}
