//! Records and record sets
//!
//! A record is one line of a newline-delimited dataset, stored without its
//! terminator. Record sets are read once per run and consumed read-only.

use std::fmt;
use std::ops::Index;

use crate::error::{Error, Result};

/// One line of a dataset, logically a labeled JSON object
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Record(String);

impl Record {
    /// Create a record from a line of text
    pub fn new(line: impl Into<String>) -> Self {
        Self(line.into())
    }

    /// The raw line
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length of the line in bytes
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the line is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consume the record, returning the line
    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<String> for Record {
    fn from(line: String) -> Self {
        Self(line)
    }
}

impl From<&str> for Record {
    fn from(line: &str) -> Self {
        Self(line.to_owned())
    }
}

impl AsRef<str> for Record {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An ordered sequence of records
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordSet {
    records: Vec<Record>,
}

impl RecordSet {
    /// Create a record set from records
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    /// Split newline-delimited text into records.
    ///
    /// Every `\n` terminates a record. Text after the last `\n` forms a final
    /// record only when non-empty, so a trailing newline does not add an empty
    /// record. Blank lines in the middle of the text are kept.
    pub fn from_text(text: &str) -> Self {
        if text.is_empty() {
            return Self::default();
        }
        let body = text.strip_suffix('\n').unwrap_or(text);
        Self {
            records: body.split('\n').map(Record::from).collect(),
        }
    }

    /// Serialize the records back to newline-delimited text, one terminator
    /// per record
    pub fn to_text(records: &[Record]) -> String {
        let total: usize = records.iter().map(|r| r.len() + 1).sum();
        let mut text = String::with_capacity(total);
        for record in records {
            text.push_str(record.as_str());
            text.push('\n');
        }
        text
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether there are no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Get a record by index
    pub fn get(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }

    /// All records in original order
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Iterate over the records
    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    /// Check that every index refers to an existing record
    pub fn check_indices(&self, indices: &[usize]) -> Result<()> {
        match indices.iter().find(|&&i| i >= self.records.len()) {
            Some(&index) => Err(Error::IndexOutOfBounds {
                index,
                len: self.records.len(),
            }),
            None => Ok(()),
        }
    }

    /// Collect the records at `indices`, in the order the indices are given
    pub fn select(&self, indices: &[usize]) -> Result<Vec<Record>> {
        self.check_indices(indices)?;
        Ok(indices.iter().map(|&i| self.records[i].clone()).collect())
    }
}

impl Index<usize> for RecordSet {
    type Output = Record;

    fn index(&self, index: usize) -> &Record {
        &self.records[index]
    }
}

impl From<Vec<Record>> for RecordSet {
    fn from(records: Vec<Record>) -> Self {
        Self::new(records)
    }
}

impl<R: Into<Record>> FromIterator<R> for RecordSet {
    fn from_iter<I: IntoIterator<Item = R>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(Into::into).collect())
    }
}

impl<'a> IntoIterator for &'a RecordSet {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
