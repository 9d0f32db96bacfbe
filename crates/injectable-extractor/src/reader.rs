//! Streaming RF2 reader.
//!
//! Reads SNOMED CT RF2 tab-delimited files one line at a time. The first line
//! is always treated as the header and discarded. Lines that are too short or
//! not valid UTF-8 are counted and skipped; they never end the stream.

use std::fs::File;
use std::io::{BufReader, Read};
use std::marker::PhantomData;
use std::path::Path;

use csv::{Reader, ReaderBuilder, StringRecord};

use crate::types::{ExtractError, ExtractResult};

/// Trait for types that can be built from an RF2 line.
pub trait Rf2Record: Sized {
    /// Minimum number of fields a line needs to be considered a record.
    const MIN_FIELDS: usize;

    /// Builds a record from a line that has at least [`Self::MIN_FIELDS`] fields.
    ///
    /// Returns `None` if the line cannot form a record.
    fn from_record(record: &StringRecord) -> Option<Self>;
}

/// A lazy, forward-only reader over an RF2 file.
///
/// Only the current line is held in memory. Restarting requires reopening
/// the file.
pub struct Rf2Reader<R: Read, T: Rf2Record> {
    reader: Reader<R>,
    record: StringRecord,
    records_read: u64,
    malformed: u64,
    _marker: PhantomData<T>,
}

impl<T: Rf2Record> Rf2Reader<BufReader<File>, T> {
    /// Opens a reader over the file at `path`.
    ///
    /// # Errors
    /// Returns [`ExtractError::FileNotFound`] if the path does not exist, or an
    /// I/O error if it cannot be opened.
    pub fn from_path<P: AsRef<Path>>(path: P) -> ExtractResult<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ExtractError::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let file = File::open(path)?;
        Ok(Self::from_reader(BufReader::new(file)))
    }
}

impl<R: Read, T: Rf2Record> Rf2Reader<R, T> {
    /// Creates a reader over any byte source.
    pub fn from_reader(reader: R) -> Self {
        // RF2 terms contain literal quotes, so quoting must stay off.
        let csv_reader = ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(true)
            .flexible(true)
            .quoting(false)
            .trim(csv::Trim::None)
            .from_reader(reader);

        Self {
            reader: csv_reader,
            record: StringRecord::new(),
            records_read: 0,
            malformed: 0,
            _marker: PhantomData,
        }
    }

    /// Returns the number of well-formed data lines read so far.
    pub fn records_read(&self) -> u64 {
        self.records_read
    }

    /// Returns the number of data lines skipped as malformed so far.
    pub fn malformed(&self) -> u64 {
        self.malformed
    }
}

impl<R: Read, T: Rf2Record> Iterator for Rf2Reader<R, T> {
    type Item = ExtractResult<T>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.reader.read_record(&mut self.record) {
                Ok(true) => {
                    if self.record.len() < T::MIN_FIELDS {
                        self.malformed += 1;
                        continue;
                    }

                    match T::from_record(&self.record) {
                        Some(parsed) => {
                            self.records_read += 1;
                            return Some(Ok(parsed));
                        }
                        None => {
                            self.malformed += 1;
                            continue;
                        }
                    }
                }
                Ok(false) => return None,
                Err(e) if matches!(e.kind(), csv::ErrorKind::Utf8 { .. }) => {
                    self.malformed += 1;
                    continue;
                }
                Err(e) => return Some(Err(e.into())),
            }
        }
    }
}

/// Helper functions for reading RF2 field values.
pub mod parse {
    /// Reads a boolean-like flag.
    ///
    /// RF2 uses `1`/`0`. `true` in any case is also accepted; anything else is
    /// false.
    pub fn flag(value: &str) -> bool {
        let value = value.trim();
        value == "1" || value.eq_ignore_ascii_case("true")
    }

    /// Reads an optional trailing field, treating empty as absent.
    pub fn optional(value: Option<&str>) -> Option<String> {
        value
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }
}
