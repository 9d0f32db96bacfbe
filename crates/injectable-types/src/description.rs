//! SNOMED CT description record.
//!
//! This module provides the [`DescriptionRecord`] struct representing one row
//! of an RF2 Description file as read by the extractor.

/// A description row from a `sct2_Description_*.txt` file.
///
/// Identifier columns are kept exactly as they appear in the file. The
/// extractor never needs them as numbers and malformed identifiers must not
/// cause a row to be rejected.
///
/// # Examples
///
/// ```
/// use injectable_types::DescriptionRecord;
///
/// let description = DescriptionRecord {
///     id: "754786011".to_string(),
///     effective_time: "20020131".to_string(),
///     active: true,
///     module_id: "900000000000207008".to_string(),
///     concept_id: "372687004".to_string(),
///     language_code: "en".to_string(),
///     type_id: "900000000000013009".to_string(),
///     term: "Amoxicillin 500mg injection".to_string(),
///     case_significance_id: None,
/// };
///
/// assert!(description.active);
/// assert_eq!(description.term, "Amoxicillin 500mg injection");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DescriptionRecord {
    /// Identifier of this description.
    pub id: String,
    /// Effective date in YYYYMMDD format.
    pub effective_time: String,
    /// Whether this description is active.
    pub active: bool,
    /// The module containing this description.
    pub module_id: String,
    /// The concept this description belongs to.
    pub concept_id: String,
    /// ISO language code (e.g., "en").
    pub language_code: String,
    /// Description type concept (FSN, synonym or definition).
    pub type_id: String,
    /// The description text/term.
    pub term: String,
    /// Case significance, when the file carries a ninth column.
    pub case_significance_id: Option<String>,
}
