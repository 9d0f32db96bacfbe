//! Run-wide deduplication of templates by name and dose.

use std::collections::HashSet;

use injectable_types::{DedupKey, InjectionTemplate};

/// Set of dedup keys seen so far, seeded from the existing catalog.
///
/// The first template with a given key wins; every later one is rejected.
#[derive(Debug, Default)]
pub struct Deduplicator {
    seen: HashSet<DedupKey>,
}

impl Deduplicator {
    /// Creates an empty deduplicator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the keys of `(injection_name, dose)` pairs already in the catalog.
    pub fn seed<I, N, D>(&mut self, pairs: I)
    where
        I: IntoIterator<Item = (N, Option<D>)>,
        N: AsRef<str>,
        D: AsRef<str>,
    {
        self.seen.extend(
            pairs
                .into_iter()
                .map(|(name, dose)| DedupKey::new(name.as_ref(), dose.as_ref().map(|d| d.as_ref()))),
        );
    }

    /// Records the template's key. Returns false if the key was already seen.
    pub fn admit(&mut self, template: &InjectionTemplate) -> bool {
        self.seen.insert(template.dedup_key())
    }

    #[cfg(test)]
    fn contains(&self, key: &DedupKey) -> bool {
        self.seen.contains(key)
    }

    /// Number of distinct keys seen.
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    /// Returns true if no key has been seen.
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use injectable_types::Route;

    fn template(name: &str, dose: Option<&str>) -> InjectionTemplate {
        InjectionTemplate::new(name, dose.map(str::to_string), Route::IvOrIm, "1")
    }

    #[test]
    fn test_first_seen_wins() {
        let mut dedup = Deduplicator::new();
        assert!(dedup.admit(&template("Amoxicillin", Some("500mg"))));
        assert!(!dedup.admit(&template("AMOXICILLIN", Some("500MG"))));
        assert!(dedup.admit(&template("Amoxicillin", Some("1g"))));
        assert_eq!(dedup.len(), 2);
    }

    #[test]
    fn test_seeded_keys_reject() {
        let mut dedup = Deduplicator::new();
        dedup.seed(vec![
            ("Heparin".to_string(), Some("5000units/mL".to_string())),
            ("Ceftriaxone".to_string(), None),
        ]);

        assert!(dedup.contains(&DedupKey::new("heparin", Some("5000UNITS/ML"))));
        assert!(!dedup.admit(&template("Ceftriaxone", None)));
        assert!(dedup.admit(&template("Ceftriaxone", Some("1g"))));
    }

    #[test]
    fn test_empty() {
        let dedup = Deduplicator::new();
        assert!(dedup.is_empty());
    }
}
