//! # Result-File Reader
//!
//! Parses the raw output files produced by the extraction run. The format is
//! line-oriented and slightly irregular, because it is a transcript of model
//! generations rather than a designed serialization:
//!
//! ```text
//! <sentence text>
//! <model output, possibly over several lines>
//! <... continued until a line containing '|'>
//! <next sentence>
//! ...
//! <blank line = end of data>
//! ```
//!
//! Everything up to (not including) the first `|` is concatenated into one
//! "blob" per record. The blob is expected to contain a JSON object of the
//! shape `{"entities": [{"text": ..., "type": ...}, ...]}` somewhere inside
//! surrounding prose; the reader isolates the outermost `{...}` match and
//! parses that. Records whose blob has no parseable object are skipped with a
//! [`Stage::Parse`] diagnostic; parsing continues with the next record.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::diagnostics::{Diagnostics, Stage};
use crate::error::LoadError;

/// A JSON field that the model emits either as one string or as a list of
/// strings. Both `"text": "Nippur"` and `"text": ["Nippur", "Ur"]` occur.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    /// All values, in order; a scalar yields exactly one.
    pub fn values(&self) -> Vec<&str> {
        match self {
            OneOrMany::One(s) => vec![s.as_str()],
            OneOrMany::Many(v) => v.iter().map(String::as_str).collect(),
        }
    }
}

/// One entity mention exactly as the model reported it: surface text and a
/// free-text role/type label, either of which may be a list, `null`, or
/// missing entirely. No positions — recovering those is the aligner's job.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawMention {
    #[serde(default)]
    pub text: Option<OneOrMany>,
    #[serde(default, rename = "type")]
    pub label: Option<OneOrMany>,
}

/// The parsed JSON object of one record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelOutput {
    #[serde(default)]
    pub entities: Vec<RawMention>,
}

/// One `(sentence, parsed output)` pair from a result file.
#[derive(Debug, Clone)]
pub struct ResultRecord {
    pub sentence: String,
    pub output: ModelOutput,
}

fn json_object_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Greedy: spans from the first '{' to the last '}' in the blob.
    RE.get_or_init(|| Regex::new(r"\{.*\}").unwrap())
}

/// Reads an entire result file into memory.
///
/// I/O failures are the only hard errors here; malformed records degrade to
/// diagnostics instead (the viewer shows fewer sentences, it does not crash).
pub fn load_results(path: impl AsRef<Path>, diags: &mut Diagnostics) -> Result<Vec<ResultRecord>, LoadError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_records(BufReader::new(file), diags).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Parses records out of any line source. A blank (whitespace-only) sentence
/// line, or end of input, terminates the read loop.
pub fn parse_records<R: BufRead>(reader: R, diags: &mut Diagnostics) -> io::Result<Vec<ResultRecord>> {
    let mut lines = reader.lines();
    let mut records = Vec::new();

    loop {
        let sentence = match lines.next() {
            Some(line) => line?.trim().to_string(),
            None => break,
        };
        if sentence.is_empty() {
            break;
        }

        // Collect the generation blob up to the '|' terminator.
        let mut blob = String::new();
        loop {
            let line = match lines.next() {
                Some(line) => line?.trim().to_string(),
                None => break,
            };
            if let Some(pipe) = line.find('|') {
                blob.push_str(&line[..pipe]);
                break;
            }
            blob.push_str(&line);
        }

        match parse_output_blob(&blob, diags) {
            Some(output) => records.push(ResultRecord { sentence, output }),
            None => diags.push(
                Stage::Parse,
                sentence,
                "model output did not contain a parseable JSON object",
            ),
        }
    }

    Ok(records)
}

/// Isolates and parses the JSON object inside a generation blob.
///
/// Mentions that are not JSON objects themselves (the model occasionally
/// emits bare strings inside `entities`) are dropped individually so one bad
/// element does not void the whole record.
fn parse_output_blob(blob: &str, diags: &mut Diagnostics) -> Option<ModelOutput> {
    let matched = json_object_re().find(blob)?;
    let value: Value = serde_json::from_str(matched.as_str()).ok()?;
    value.as_object()?;

    let mut output = ModelOutput::default();
    if let Some(entities) = value.get("entities").and_then(Value::as_array) {
        for entity in entities {
            match serde_json::from_value::<RawMention>(entity.clone()) {
                Ok(mention) => output.entities.push(mention),
                Err(err) => diags.push(
                    Stage::Parse,
                    entity.to_string(),
                    format!("entity record rejected: {err}"),
                ),
            }
        }
    }
    Some(output)
}
