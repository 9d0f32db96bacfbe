//! Term parser: turns a free-text product term into an [`InjectionTemplate`].
//!
//! Parsing never fails. Every rule table is ordered and the first match wins.

use std::sync::LazyLock;

use injectable_types::{truncate_chars, InjectionTemplate, Route};
use regex::Regex;

/// Maximum length of a normalized medication name, in characters.
pub const MAX_NAME_CHARS: usize = 200;

/// Dose patterns, tried in order against the raw term.
pub const DOSE_PATTERNS: &[&str] = &[
    // amount + unit, optionally per volume: 500mg, 100 IU / mL, 80 mg/2 mL
    r"(?i)\d+(?:[.,]\d+)?\s*(?:mg|mcg|µg|micrograms?|nanograms?|ng|g|iu|units?|ml|mmol|meq)\b(?:\s*/\s*(?:\d+(?:[.,]\d+)?\s*)?(?:ml|l|dose|vial|ampoule|g|kg|hour|hr|h)\b)?",
    // amount + million units
    r"(?i)\d+(?:[.,]\d+)?\s*million\s*units?\b",
    // percentage strength
    r"\d+(?:[.,]\d+)?\s*%",
];

/// Route patterns, tried in order against the lower-cased term, most specific
/// site first.
pub const ROUTE_PATTERNS: &[(&str, Route)] = &[
    (r"intra-?articular", Route::IntraArticular),
    (r"intrathecal", Route::Intrathecal),
    (r"intravitreal", Route::Intravitreal),
    (r"intradermal", Route::Intradermal),
    (r"intraosseous", Route::Intraosseous),
    (r"epidural", Route::Epidural),
    (r"subcutaneous|\bsubcut\b", Route::Subcutaneous),
    (r"intramuscular", Route::Intramuscular),
    (r"intravenous", Route::Intravenous),
    (r"\bsc\b|\bs\.c\.", Route::Subcutaneous),
    (r"\bim\b|\bi\.m\.", Route::Intramuscular),
    (r"\biv\b|\bi\.v\.", Route::Intravenous),
];

/// Suffix patterns stripped from the name, each at its first occurrence
/// together with everything after it.
pub const NAME_SUFFIX_PATTERNS: &[&str] = &[
    r"(?is)\s+injection.*$",
    r"(?is)\s+injectable.*$",
    r"(?is)\s+infusion.*$",
    r"(?is)\s+solution.*$",
    r"(?is)\s+concentrate.*$",
    r"(?is)\s+powder.*$",
    r"(?is)\s+for injection.*$",
    r"(?is)\s+pdr for.*$",
    r"(?is)\s*\d+(?:[.,]\d+)?\s*(?:(?:mg|mcg|µg|micrograms?|nanograms?|ng|g|iu|units?|ml|mmol|meq|million)\b|%).*$",
];

static DOSE_REGEXES: LazyLock<Vec<Regex>> = LazyLock::new(|| compile_all(DOSE_PATTERNS));

static ROUTE_REGEXES: LazyLock<Vec<(Regex, Route)>> = LazyLock::new(|| {
    ROUTE_PATTERNS
        .iter()
        .map(|(pattern, route)| (compile(pattern), *route))
        .collect()
});

static SUFFIX_REGEXES: LazyLock<Vec<Regex>> =
    LazyLock::new(|| compile_all(NAME_SUFFIX_PATTERNS));

static PARENTHETICAL: LazyLock<Regex> = LazyLock::new(|| compile(r"\s*\([^)]*\)"));

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid built-in pattern {pattern:?}: {e}"))
}

fn compile_all(patterns: &[&str]) -> Vec<Regex> {
    patterns.iter().map(|p| compile(p)).collect()
}

/// Parses a product term into a template.
///
/// # Examples
///
/// ```
/// use injectable_extractor::parse_injection_term;
///
/// let template = parse_injection_term("Amoxicillin 500mg injection", "372687004");
/// assert_eq!(template.injection_name, "Amoxicillin");
/// assert_eq!(template.dose.as_deref(), Some("500mg"));
/// assert_eq!(template.route.as_str(), "IV/IM");
/// assert_eq!(template.template_name, "Amoxicillin 500mg");
/// ```
pub fn parse_injection_term(term: &str, concept_id: &str) -> InjectionTemplate {
    let dose = extract_dose(term);
    let route = extract_route(term);
    let name = normalize_name(term);

    InjectionTemplate::new(name, dose, route, concept_id)
}

/// Returns the first dose found in `term` with all whitespace removed.
pub fn extract_dose(term: &str) -> Option<String> {
    DOSE_REGEXES
        .iter()
        .find_map(|re| re.find(term))
        .map(|m| m.as_str().chars().filter(|c| !c.is_whitespace()).collect())
}

/// Returns the most specific route named in `term`, or the default route.
pub fn extract_route(term: &str) -> Route {
    let lower = term.to_lowercase();
    ROUTE_REGEXES
        .iter()
        .find(|(re, _)| re.is_match(&lower))
        .map(|(_, route)| *route)
        .unwrap_or_default()
}

/// Reduces a term to the medication name.
///
/// Falls back to the start of the raw term if nothing is left.
pub fn normalize_name(term: &str) -> String {
    let mut name = PARENTHETICAL.replace_all(term, "").into_owned();

    for re in SUFFIX_REGEXES.iter() {
        if let Some(m) = re.find(&name) {
            name.truncate(m.start());
        }
    }

    let name = name.split_whitespace().collect::<Vec<_>>().join(" ");
    let name = truncate_chars(&name, MAX_NAME_CHARS);

    if name.is_empty() {
        truncate_chars(term, MAX_NAME_CHARS)
    } else {
        name
    }
}
