//! CEX corpus parser.
//!
//! Turns a raw CEX document into a [`Corpus`]. Only the `#!ctsdata` block
//! is read; every other block is ignored.
//!
//! # Pipeline
//!
//! 1. Locate the data segment: the lines after the `#!ctsdata` line, up to
//!    the next line starting with `#!` (or end of input).
//! 2. Drop comment lines starting with `//`.
//! 3. Split the remaining lines into `#`-delimited records. Quoting is lazy:
//!    a bare `"` inside a field never terminates it.
//! 4. Decode the first field of each record as a [`CitationId`]; the other
//!    fields are concatenated into the passage text.
//! 5. Fold records into works. A new work opens whenever the work key
//!    differs from the previous record's, so a work whose records are
//!    interrupted by another work appears twice.

use crate::citation::CitationId;
use crate::error::ParseError;
use crate::models::{Corpus, Passage, Work};

/// Line that opens the text data block.
pub const DATA_SENTINEL: &str = "#!ctsdata";

const BLOCK_PREFIX: &str = "#!";
const COMMENT_PREFIX: &str = "//";
const DELIMITER: char = '#';
const QUOTE: char = '"';

/// Parse a CEX document.
///
/// Invalid UTF-8 sequences are replaced with U+FFFD before parsing.
pub fn parse(raw: &[u8]) -> Result<Corpus, ParseError> {
    let text = String::from_utf8_lossy(raw);
    let segment = extract_segment(&text)?;

    let mut reader = RecordReader::new(&segment);
    let mut folder = WorkFolder::default();
    let mut record = 0usize;

    while let Some(raw_record) = reader.next_record() {
        let (citation, text) = raw_record.split(record)?;
        folder.push(citation, text);
        record += 1;
    }

    Ok(Corpus::new(folder.finish()))
}

/// A source line, numbered from 1, without its terminator.
#[derive(Debug, Clone, Copy)]
struct Line<'a> {
    number: usize,
    text: &'a str,
}

/// The non-comment lines of the data segment.
fn extract_segment(document: &str) -> Result<Vec<Line<'_>>, ParseError> {
    let mut lines = document
        .lines()
        .enumerate()
        .map(|(i, text)| Line { number: i + 1, text });

    if !lines.any(|l| l.text.trim_end() == DATA_SENTINEL) {
        return Err(ParseError::MissingSentinel);
    }

    Ok(lines
        .take_while(|l| !l.text.starts_with(BLOCK_PREFIX))
        .filter(|l| !l.text.starts_with(COMMENT_PREFIX))
        .collect())
}

#[derive(Debug)]
struct RawRecord {
    line: usize,
    fields: Vec<String>,
}

impl RawRecord {
    /// Decode the citation and join the text fields.
    fn split(self, record: usize) -> Result<(CitationId, String), ParseError> {
        let line = self.line;
        let mut fields = self.fields.into_iter();
        let (Some(first), Some(second)) = (fields.next(), fields.next()) else {
            return Err(ParseError::MalformedRecord { record, line });
        };

        let citation =
            CitationId::parse(&first).ok_or_else(|| ParseError::MalformedCitation {
                record,
                line,
                citation: first.clone(),
            })?;

        let mut text = second;
        text.extend(fields);
        Ok((citation, text))
    }
}

/// Reads `#`-delimited records with lazy quoting.
///
/// A quoted field may span several lines; blank lines between records are
/// skipped.
struct RecordReader<'a> {
    lines: &'a [Line<'a>],
    pos: usize,
}

impl<'a> RecordReader<'a> {
    fn new(lines: &'a [Line<'a>]) -> Self {
        Self { lines, pos: 0 }
    }

    fn next_record(&mut self) -> Option<RawRecord> {
        let lines = self.lines;
        while lines
            .get(self.pos)
            .is_some_and(|l| l.text.trim().is_empty())
        {
            self.pos += 1;
        }

        let first = lines.get(self.pos)?;
        self.pos += 1;

        let mut fields = Vec::new();
        let mut rest = first.text;
        loop {
            rest = rest.trim_start();
            if let Some(quoted) = rest.strip_prefix(QUOTE) {
                let (field, remainder) = self.read_quoted(quoted);
                fields.push(field);
                match remainder {
                    Some(r) => rest = r,
                    None => break,
                }
            } else {
                match rest.find(DELIMITER) {
                    Some(i) => {
                        fields.push(rest[..i].to_string());
                        rest = &rest[i + 1..];
                    }
                    None => {
                        fields.push(rest.to_string());
                        break;
                    }
                }
            }
        }

        Some(RawRecord {
            line: first.number,
            fields,
        })
    }

    /// Read a quoted field whose opening quote is already consumed.
    ///
    /// Returns the field and, when another field follows on the same line,
    /// the text after the delimiter.
    fn read_quoted(&mut self, mut rest: &'a str) -> (String, Option<&'a str>) {
        let lines = self.lines;
        let mut field = String::new();
        loop {
            match rest.find(QUOTE) {
                Some(i) => {
                    field.push_str(&rest[..i]);
                    let after = &rest[i + 1..];
                    if let Some(r) = after.strip_prefix(QUOTE) {
                        field.push(QUOTE);
                        rest = r;
                    } else if let Some(r) = after.strip_prefix(DELIMITER) {
                        return (field, Some(r));
                    } else if after.is_empty() {
                        return (field, None);
                    } else {
                        field.push(QUOTE);
                        rest = after;
                    }
                }
                None => {
                    field.push_str(rest);
                    match lines.get(self.pos) {
                        Some(next) => {
                            field.push('\n');
                            rest = next.text;
                            self.pos += 1;
                        }
                        None => return (field, None),
                    }
                }
            }
        }
    }
}

/// Fold state: either nothing seen yet, or a work still accepting passages.
#[derive(Debug, Default)]
enum Fold {
    #[default]
    Empty,
    Open(Work),
}

#[derive(Debug, Default)]
struct WorkFolder {
    done: Vec<Work>,
    state: Fold,
}

impl WorkFolder {
    fn push(&mut self, citation: CitationId, text: String) {
        let key = citation.work_key();
        let mut work = match std::mem::take(&mut self.state) {
            Fold::Open(work) if work.work_id == key => work,
            Fold::Open(work) => {
                self.done.push(work);
                Work::new(key)
            }
            Fold::Empty => Work::new(key),
        };

        let index = work.passages.len();
        work.passages.push(Passage {
            passage_id: citation.passage_id(),
            text,
            index,
        });
        self.state = Fold::Open(work);
    }

    fn finish(mut self) -> Vec<Work> {
        if let Fold::Open(work) = self.state {
            self.done.push(work);
        }
        self.done
    }
}
