//! Record store trait and an in-memory implementation

use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::record::{Record, RecordSet};

/// Blocking bulk access to newline-delimited record files
pub trait RecordStore {
    /// Read every record at `location`
    fn read_all_lines(&self, location: &str) -> Result<RecordSet>;

    /// Create or overwrite `location` with `records`, one line each
    fn write_all_lines(&mut self, location: &str, records: &[Record]) -> Result<()>;
}

impl<S: RecordStore + ?Sized> RecordStore for &mut S {
    fn read_all_lines(&self, location: &str) -> Result<RecordSet> {
        (**self).read_all_lines(location)
    }

    fn write_all_lines(&mut self, location: &str, records: &[Record]) -> Result<()> {
        (**self).write_all_lines(location, records)
    }
}

impl<S: RecordStore + ?Sized> RecordStore for Box<S> {
    fn read_all_lines(&self, location: &str) -> Result<RecordSet> {
        (**self).read_all_lines(location)
    }

    fn write_all_lines(&mut self, location: &str, records: &[Record]) -> Result<()> {
        (**self).write_all_lines(location, records)
    }
}

/// A store that keeps serialized files in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryRecordStore {
    files: BTreeMap<String, String>,
    writes: usize,
}

impl MemoryRecordStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Place raw newline-delimited text at `location`
    pub fn insert_text(&mut self, location: impl Into<String>, text: impl Into<String>) {
        self.files.insert(location.into(), text.into());
    }

    /// Raw text stored at `location`
    pub fn text(&self, location: &str) -> Option<&str> {
        self.files.get(location).map(String::as_str)
    }

    /// Stored locations in sorted order
    pub fn locations(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    /// Number of files held
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether no files are held
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Number of successful writes since creation
    pub fn write_count(&self) -> usize {
        self.writes
    }
}

impl RecordStore for MemoryRecordStore {
    fn read_all_lines(&self, location: &str) -> Result<RecordSet> {
        self.files
            .get(location)
            .map(|text| RecordSet::from_text(text))
            .ok_or_else(|| Error::storage(location, "no such location"))
    }

    fn write_all_lines(&mut self, location: &str, records: &[Record]) -> Result<()> {
        self.files.insert(location.to_owned(), RecordSet::to_text(records));
        self.writes += 1;
        Ok(())
    }
}
