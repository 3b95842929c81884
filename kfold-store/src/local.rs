//! Record store backed by a local directory
//!
//! Object URLs map to `{root}/{bucket}/{key}` and relative paths to
//! `{root}/{path}`, so a job written against bucket URLs can run unchanged
//! against a local mirror. Absolute paths are used as given.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Component, Path, PathBuf};

use kfold_core::{Record, RecordSet, RecordStore};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::url::ObjectUrl;

/// Options for the local record store
#[derive(Debug, Clone)]
pub struct LocalStoreOptions {
    /// Create missing parent directories on write
    pub create_dirs: bool,

    /// Whether to strip a leading BOM (byte order mark) on read
    pub strip_bom: bool,

    /// Buffer size for reading and writing
    pub buffer_size: usize,
}

impl Default for LocalStoreOptions {
    fn default() -> Self {
        Self {
            create_dirs: true,
            strip_bom: true,
            buffer_size: 64 * 1024, // 64KB
        }
    }
}

/// A record store rooted at a local directory
#[derive(Debug, Clone)]
pub struct LocalRecordStore {
    root: PathBuf,
    options: LocalStoreOptions,
}

impl LocalRecordStore {
    /// Create a store rooted at `root` with default options
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self::with_options(root, LocalStoreOptions::default())
    }

    /// Create a store rooted at `root`
    pub fn with_options<P: AsRef<Path>>(root: P, options: LocalStoreOptions) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            options,
        }
    }

    /// Root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a location to a filesystem path.
    ///
    /// Relative locations may not climb out of the root with `..`.
    pub fn resolve(&self, location: &str) -> Result<PathBuf> {
        let relative = match ObjectUrl::parse(location)? {
            Some(url) => format!("{}/{}", url.bucket(), url.key()),
            None if Path::new(location).is_absolute() => return Ok(PathBuf::from(location)),
            None => location.to_owned(),
        };

        let mut path = self.root.clone();
        for component in Path::new(&relative).components() {
            match component {
                Component::Normal(part) => path.push(part),
                Component::CurDir => {}
                _ => return Err(Error::InvalidLocation(location.to_owned())),
            }
        }
        if path == self.root {
            return Err(Error::InvalidLocation(location.to_owned()));
        }
        Ok(path)
    }

    /// Read the raw text at `location`
    pub fn read_text(&self, location: &str) -> Result<String> {
        let path = self.resolve(location)?;
        debug!(location, path = %path.display(), "opening for read");

        let file = File::open(&path).map_err(|e| Error::io(location, e))?;
        let mut reader = BufReader::with_capacity(self.options.buffer_size, file);
        let mut text = String::new();
        reader
            .read_to_string(&mut text)
            .map_err(|e| Error::io(location, e))?;

        if self.options.strip_bom && text.starts_with('\u{FEFF}') {
            text.drain(..'\u{FEFF}'.len_utf8());
        }
        Ok(text)
    }

    /// Read every record at `location`
    pub fn read_records(&self, location: &str) -> Result<RecordSet> {
        info!(location, "reading records");
        let records = RecordSet::from_text(&self.read_text(location)?);
        info!(location, count = records.len(), "read records");
        Ok(records)
    }

    /// Create or overwrite `location` with one line per record
    pub fn write_records(&self, location: &str, records: &[Record]) -> Result<()> {
        let path = self.resolve(location)?;
        info!(location, count = records.len(), "writing records");

        if self.options.create_dirs {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).map_err(|e| Error::io(location, e))?;
            }
        }

        let file = File::create(&path).map_err(|e| Error::io(location, e))?;
        let mut writer = BufWriter::with_capacity(self.options.buffer_size, file);
        for record in records {
            writeln!(writer, "{record}").map_err(|e| Error::io(location, e))?;
        }
        writer.flush().map_err(|e| Error::io(location, e))?;
        debug!(location, path = %path.display(), "write complete");
        Ok(())
    }
}

impl RecordStore for LocalRecordStore {
    fn read_all_lines(&self, location: &str) -> kfold_core::Result<RecordSet> {
        Ok(self.read_records(location)?)
    }

    fn write_all_lines(&mut self, location: &str, records: &[Record]) -> kfold_core::Result<()> {
        Ok(self.write_records(location, records)?)
    }
}
