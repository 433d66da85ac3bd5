//! Sparse "svm" row reader.
//!
//! Each non-blank line is `label [qid:<n>] <index>:<value> ...`, optionally
//! followed by a `#` comment. Indices are zero-based; every index with a
//! non-zero value is active for the row. The reader turns active indices
//! into model feature ids by adding the configured offset and returns them
//! sorted and deduplicated, which is what the scorer expects.

use crate::core::constants::DEFAULT_FEATURE_OFFSET;
use crate::core::error::{ForestError, Result};
use crate::core::types::FeatureId;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// One parsed sparse row.
#[derive(Debug, Clone, PartialEq)]
pub struct SvmRow {
    /// Target label from the first column
    pub label: f64,
    /// Active model feature ids, strictly ascending
    pub feature_ids: Vec<FeatureId>,
}

/// Parses one line. Returns `Ok(None)` for blank and comment-only lines.
pub fn parse_svm_line(line: &str, line_no: usize, offset: FeatureId) -> Result<Option<SvmRow>> {
    let content = match line.find('#') {
        Some(pos) => &line[..pos],
        None => line,
    };

    let mut tokens = content.split_whitespace();
    let label_str = match tokens.next() {
        Some(token) => token,
        None => return Ok(None),
    };

    let label = label_str.parse::<f64>().map_err(|_| {
        ForestError::data_loading(format!("line {}: invalid label '{}'", line_no, label_str))
    })?;

    let mut feature_ids = Vec::new();
    for token in tokens {
        let (index_str, value_str) = token.split_once(':').ok_or_else(|| {
            ForestError::data_loading(format!(
                "line {}: expected index:value, got '{}'",
                line_no, token
            ))
        })?;

        if index_str == "qid" {
            continue;
        }

        let index = index_str.parse::<FeatureId>().map_err(|_| {
            ForestError::data_loading(format!("line {}: invalid index '{}'", line_no, index_str))
        })?;
        let value = value_str.parse::<f64>().map_err(|_| {
            ForestError::data_loading(format!("line {}: invalid value '{}'", line_no, value_str))
        })?;

        if value != 0.0 {
            let feature_id = index.checked_add(offset).ok_or_else(|| {
                ForestError::data_loading(format!(
                    "line {}: index {} overflows with offset {}",
                    line_no, index, offset
                ))
            })?;
            feature_ids.push(feature_id);
        }
    }

    feature_ids.sort_unstable();
    feature_ids.dedup();

    Ok(Some(SvmRow { label, feature_ids }))
}

/// Streaming reader over svm rows.
#[derive(Debug)]
pub struct SvmReader<R> {
    reader: R,
    offset: FeatureId,
    line_no: usize,
    buf: String,
}

impl<R: BufRead> SvmReader<R> {
    /// Reader using the default feature offset.
    pub fn new(reader: R) -> Self {
        Self::with_offset(reader, DEFAULT_FEATURE_OFFSET)
    }

    /// Reader adding `offset` to every raw index.
    pub fn with_offset(reader: R, offset: FeatureId) -> Self {
        SvmReader {
            reader,
            offset,
            line_no: 0,
            buf: String::new(),
        }
    }

    /// Reads all remaining rows.
    pub fn read_all(self) -> Result<Vec<SvmRow>> {
        self.collect()
    }
}

impl SvmReader<BufReader<File>> {
    /// Opens an svm file.
    pub fn open<P: AsRef<Path>>(path: P, offset: FeatureId) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Ok(Self::with_offset(BufReader::new(file), offset))
    }
}

impl<R: BufRead> Iterator for SvmReader<R> {
    type Item = Result<SvmRow>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.buf.clear();
            match self.reader.read_line(&mut self.buf) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(e) => return Some(Err(e.into())),
            }
            self.line_no += 1;

            match parse_svm_line(&self.buf, self.line_no, self.offset) {
                Ok(Some(row)) => return Some(Ok(row)),
                Ok(None) => continue,
                Err(e) => return Some(Err(e)),
            }
        }
    }
}
