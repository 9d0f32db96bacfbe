//! SNOMED CT Description file reader.
//!
//! Reads `sct2_Description_*.txt` RF2 files into [`DescriptionRecord`]s.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use csv::StringRecord;
use injectable_types::DescriptionRecord;

use crate::reader::{parse, Rf2Reader, Rf2Record};
use crate::types::ExtractResult;

/// Columns of a description file, in order. Only the first eight are required.
pub const DESCRIPTION_COLUMNS: &[&str] = &[
    "id",
    "effectiveTime",
    "active",
    "moduleId",
    "conceptId",
    "languageCode",
    "typeId",
    "term",
    "caseSignificanceId",
];

/// Number of leading columns every description line must carry.
pub const REQUIRED_DESCRIPTION_FIELDS: usize = 8;

/// Reader yielding description records from an RF2 file.
pub type DescriptionReader<R> = Rf2Reader<R, DescriptionRecord>;

impl Rf2Record for DescriptionRecord {
    const MIN_FIELDS: usize = REQUIRED_DESCRIPTION_FIELDS;

    fn from_record(record: &StringRecord) -> Option<Self> {
        Some(DescriptionRecord {
            id: record.get(0)?.to_string(),
            effective_time: record.get(1)?.to_string(),
            active: parse::flag(record.get(2)?),
            module_id: record.get(3)?.to_string(),
            concept_id: record.get(4)?.trim().to_string(),
            language_code: record.get(5)?.to_string(),
            type_id: record.get(6)?.to_string(),
            term: record.get(7)?.to_string(),
            case_significance_id: parse::optional(record.get(8)),
        })
    }
}

/// Opens a description file for streaming.
pub fn open_descriptions<P: AsRef<Path>>(path: P) -> ExtractResult<DescriptionReader<BufReader<File>>> {
    Rf2Reader::from_path(path)
}
