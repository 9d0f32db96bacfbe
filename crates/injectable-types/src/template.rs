//! Injection template: the structured record produced from a description term.

use std::fmt;

use crate::Route;

/// Frequency and duration placeholder used until a clinician edits the template.
pub const AS_DIRECTED: &str = "As directed";

/// Maximum length of a template or injection name, in characters.
pub const MAX_TEMPLATE_NAME_CHARS: usize = 250;

/// Names shorter than or equal to this are not loaded into the catalog.
pub const MIN_INJECTION_NAME_CHARS: usize = 2;

/// A structured injectable medication template.
///
/// # Examples
///
/// ```
/// use injectable_types::{InjectionTemplate, Route};
///
/// let template = InjectionTemplate::new("Amoxicillin", Some("500mg".to_string()), Route::IvOrIm, "372687004");
/// assert_eq!(template.template_name, "Amoxicillin 500mg");
/// assert_eq!(template.dedup_key().as_str(), "amoxicillin-500mg");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InjectionTemplate {
    /// Display name of the template, `"{name} {dose}"` when a dose is known.
    pub template_name: String,
    /// Normalized medication name.
    pub injection_name: String,
    /// Generic name; currently always the normalized name.
    pub generic_name: Option<String>,
    /// Dose with all whitespace removed, e.g. `100IU/mL`.
    pub dose: Option<String>,
    /// Administration route.
    pub route: Route,
    /// Administration frequency.
    pub frequency: String,
    /// Course duration.
    pub duration: String,
    /// Concept identifier the template was derived from.
    pub source_code: String,
}

impl InjectionTemplate {
    /// Assembles a template from a normalized name and optional dose.
    ///
    /// `template_name` is `"{name} {dose}"` when a dose is present, otherwise
    /// the name alone, in both cases cut to [`MAX_TEMPLATE_NAME_CHARS`].
    pub fn new(
        name: impl Into<String>,
        dose: Option<String>,
        route: Route,
        source_code: impl Into<String>,
    ) -> Self {
        let name = name.into();
        let template_name = match &dose {
            Some(dose) => format!("{name} {dose}"),
            None => name.clone(),
        };
        let injection_name = truncate_chars(&name, MAX_TEMPLATE_NAME_CHARS);

        Self {
            template_name: truncate_chars(&template_name, MAX_TEMPLATE_NAME_CHARS),
            generic_name: Some(injection_name.clone()),
            injection_name,
            dose,
            route,
            frequency: AS_DIRECTED.to_string(),
            duration: AS_DIRECTED.to_string(),
            source_code: source_code.into(),
        }
    }

    /// Returns the deduplication key of this template.
    pub fn dedup_key(&self) -> DedupKey {
        DedupKey::new(&self.injection_name, self.dose.as_deref())
    }

    /// Returns true if the injection name is long enough to be loaded.
    pub fn has_loadable_name(&self) -> bool {
        self.injection_name.chars().count() > MIN_INJECTION_NAME_CHARS
    }
}

/// Composite identity of a template: lower-cased name and dose.
///
/// Two templates with the same key describe the same catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DedupKey(String);

impl DedupKey {
    /// Builds the key `lowercase(name) + "-" + lowercase(dose or "")`.
    pub fn new(injection_name: &str, dose: Option<&str>) -> Self {
        Self(format!(
            "{}-{}",
            injection_name.to_lowercase(),
            dose.unwrap_or("").to_lowercase()
        ))
    }

    /// Returns the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DedupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Returns the first `max` characters of `value` with trailing whitespace removed.
pub fn truncate_chars(value: &str, max: usize) -> String {
    match value.char_indices().nth(max) {
        Some((idx, _)) => value[..idx].trim_end().to_string(),
        None => value.trim_end().to_string(),
    }
}
