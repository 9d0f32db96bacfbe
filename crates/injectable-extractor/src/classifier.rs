//! Injectable drug product classifier.
//!
//! Terminology releases mix drug products with procedures, findings and
//! complications that share the same vocabulary ("injection", "infusion").
//! The rules below are evaluated in order and the first one that decides
//! wins:
//!
//! 1. inactive descriptions are rejected;
//! 2. the term must contain an [`INCLUSION_PATTERNS`] entry;
//! 3. the term must not contain any [`EXCLUSION_PATTERNS`] entry;
//! 4. the term must carry a structural product signal;
//! 5. the term must not start with `"injection "`.

use std::sync::LazyLock;

use regex::Regex;

/// Substrings, matched against the lower-cased term, of which at least one
/// must be present.
pub const INCLUSION_PATTERNS: &[&str] = &[
    "injection",
    "injectable",
    "infusion",
    "for injection",
    "inj ",
    " inj",
    "parenteral",
    "iv solution",
    "im solution",
    "sc solution",
];

/// Substrings, matched against the lower-cased term, that reject a term even
/// when an inclusion pattern matched.
pub const EXCLUSION_PATTERNS: &[&str] = &[
    // Procedures
    "injection of",
    "injection into",
    "injection to",
    "injection technique",
    "injection procedure",
    "injection therapy",
    "injection treatment",
    "infusion of",
    "infusion therapy",
    "infusion procedure",
    "administration of",
    "procedure",
    "(procedure)",
    "(regime/therapy)",
    "nerve block",
    "sclerotherapy",
    "vaccination",
    "immunization",
    "immunisation",
    "transfusion",
    "dialysis",
    "aspiration",
    "biopsy",
    "puncture",
    "radiography",
    "imaging",
    "stimulation test",
    "tolerance test",
    "challenge test",
    // Sites and complications
    "injection site",
    "infusion site",
    "injection injury",
    "injection reaction",
    "infusion reaction",
    "complication of",
    "complication",
    "adverse reaction",
    "reaction to",
    "allergy to",
    "extravasation",
    "phlebitis",
    "abscess",
    "infection",
    "lipodystrophy",
    "granuloma",
    "necrosis",
    "fibrosis",
    "injury",
    "wound",
    "poisoning",
    "overdose",
    "toxicity",
    // Findings and situations
    "syndrome",
    "disorder",
    "(disorder)",
    "disease",
    "(finding)",
    "(situation)",
    "(observable entity)",
    "(qualifier value)",
    "(event)",
    "history of",
    "family history",
    "dependence",
    "drug abuse",
    "misuse",
    "drug user",
    "refused",
    "declined",
    "not given",
    "contraindicated",
    "measurement",
    "monitoring",
    "assessment",
    // Devices and equipment
    "catheter",
    "cannula",
    "needle",
    "infusion pump",
    "infusion set",
    "pump",
    "device",
    "(physical object)",
    "equipment",
    // Services and administrative concepts
    "education",
    "advice",
    "training",
    "service",
    "referral",
    "patient",
];

/// Keywords that mark a term as a pharmaceutical product.
pub const PRODUCT_KEYWORDS: &[&str] = &[
    "vial",
    "ampoule",
    "ampule",
    "prefilled",
    "pre-filled",
    "cartridge",
    "pen",
    "suspension",
    "emulsion",
    "concentrate",
    "powder",
    "solution",
    "product",
    "pharmaceutical",
    "(medicinal product)",
    "(clinical drug)",
];

/// Literal prefix of procedure-style terms such as "Injection of ...".
pub const PROCEDURE_PREFIX: &str = "injection ";

static DOSAGE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\d+(?:\.\d+)?\s*(?:(?:mg|g|mcg|µg|micrograms?|iu|units?|ml|mmol|meq)\b|%)")
        .expect("dosage pattern is valid")
});

static PRODUCT_KEYWORD_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    let alternatives: Vec<String> = PRODUCT_KEYWORDS
        .iter()
        .map(|kw| regex::escape(kw))
        .collect();
    Regex::new(&format!(r"(?:^|[^a-z]){}(?:[^a-z]|$)", group(&alternatives)))
        .expect("product keyword pattern is valid")
});

static PRODUCT_NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z][a-z]+\s+[a-z]").expect("product name pattern is valid"));

fn group(alternatives: &[String]) -> String {
    format!("(?:{})", alternatives.join("|"))
}

/// The rule that decided a classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// The description is inactive.
    Inactive,
    /// No inclusion pattern matched.
    NoInclusion,
    /// An exclusion pattern matched.
    Excluded(&'static str),
    /// No dosage, product keyword or product-style name was found.
    NoStructuralSignal,
    /// The term starts with the procedure-style prefix.
    ProcedurePrefix,
    /// The term denotes an injectable drug product.
    Accepted,
}

impl Classification {
    /// Returns true if the term was accepted.
    pub fn is_accepted(self) -> bool {
        self == Self::Accepted
    }
}

/// Classifies a term, reporting which rule decided the outcome.
pub fn classify(term: &str, active: bool) -> Classification {
    if !active {
        return Classification::Inactive;
    }

    let lower = term.to_lowercase();

    if !INCLUSION_PATTERNS.iter().any(|p| lower.contains(p)) {
        return Classification::NoInclusion;
    }

    if let Some(pattern) = EXCLUSION_PATTERNS.iter().find(|p| lower.contains(*p)) {
        return Classification::Excluded(*pattern);
    }

    if !has_structural_signal(term, &lower) {
        return Classification::NoStructuralSignal;
    }

    if lower.starts_with(PROCEDURE_PREFIX) {
        return Classification::ProcedurePrefix;
    }

    Classification::Accepted
}

/// Returns true if `term` denotes an active injectable drug product.
///
/// # Examples
///
/// ```
/// use injectable_extractor::is_injectable_drug_product;
///
/// assert!(is_injectable_drug_product("Amoxicillin 500mg injection", true));
/// assert!(!is_injectable_drug_product("Injection site abscess", true));
/// assert!(!is_injectable_drug_product("Amoxicillin 500mg injection", false));
/// ```
pub fn is_injectable_drug_product(term: &str, active: bool) -> bool {
    classify(term, active).is_accepted()
}

fn has_structural_signal(term: &str, lower: &str) -> bool {
    DOSAGE_PATTERN.is_match(lower)
        || PRODUCT_KEYWORD_PATTERN.is_match(lower)
        || PRODUCT_NAME_PATTERN.is_match(term)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inactive_rejected_first() {
        assert_eq!(
            classify("Amoxicillin 500mg injection", false),
            Classification::Inactive
        );
    }

    #[test]
    fn test_requires_inclusion() {
        assert_eq!(classify("Amoxicillin 500mg capsule", true), Classification::NoInclusion);
        assert_eq!(classify("Paracetamol 500mg tablet", true), Classification::NoInclusion);
    }

    #[test]
    fn test_exclusion_beats_inclusion() {
        assert_eq!(
            classify("Injection site infection", true),
            Classification::Excluded("injection site")
        );
        assert_eq!(
            classify("Injection of steroid into joint", true),
            Classification::Excluded("injection of")
        );
        assert!(!is_injectable_drug_product(
            "Complication of intravenous infusion",
            true
        ));
        assert!(!is_injectable_drug_product(
            "Insertion of central venous catheter for infusion 10 mL",
            true
        ));
    }

    #[test]
    fn test_structural_signals() {
        // Dosage
        assert!(is_injectable_drug_product("heparin 5000 units/mL injection", true));
        assert!(is_injectable_drug_product("sodium chloride 0.9% infusion", true));
        // Product keyword
        assert!(is_injectable_drug_product("ceftriaxone powder for injection", true));
        assert!(is_injectable_drug_product("adrenaline injection prefilled pen", true));
        // Capitalised product-style name
        assert!(is_injectable_drug_product("Ceftriaxone sodium injection", true));
        // None of the above
        assert_eq!(classify("parenteral", true), Classification::NoStructuralSignal);
    }

    #[test]
    fn test_product_keyword_needs_word_boundary() {
        // "pen" inside "penicillin" is not a keyword hit.
        assert_eq!(
            classify("benzylpenicillin injection", true),
            Classification::NoStructuralSignal
        );
    }

    #[test]
    fn test_procedure_prefix_override() {
        assert_eq!(
            classify("Injection 10 mg/mL", true),
            Classification::ProcedurePrefix
        );
        assert_eq!(
            classify("Injection solution vial", true),
            Classification::ProcedurePrefix
        );
    }

    #[test]
    fn test_known_products_accepted() {
        for term in [
            "Amoxicillin 500mg injection",
            "Insulin injection 100 IU / mL",
            "Morphine sulfate 10 mg/mL solution for injection",
            "Benzylpenicillin 1 million units powder for injection",
            "Triamcinolone acetonide 40 mg/mL injectable suspension",
        ] {
            assert!(is_injectable_drug_product(term, true), "{term}");
        }
    }

    #[test]
    fn test_deterministic() {
        let term = "Gentamicin 80 mg/2 mL injection";
        let first = classify(term, true);
        for _ in 0..5 {
            assert_eq!(classify(term, true), first);
        }
    }

    #[test]
    fn test_rule_tables_are_lowercase() {
        for pattern in INCLUSION_PATTERNS
            .iter()
            .chain(EXCLUSION_PATTERNS)
            .chain(PRODUCT_KEYWORDS)
        {
            assert_eq!(*pattern, pattern.to_lowercase());
        }
    }
}
