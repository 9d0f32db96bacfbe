//! Destination catalog interface.
//!
//! The pipeline only ever reads existing keys, checks a template name, inserts
//! a new row and counts rows. It never updates or deletes.

use std::collections::HashSet;

use injectable_types::InjectionTemplate;

use crate::types::{StoreError, StoreResult};

/// A catalog of injection templates.
pub trait TemplateStore {
    /// Returns every `(injection_name, dose)` pair in the catalog.
    fn existing_keys(&self) -> StoreResult<Vec<(String, Option<String>)>>;

    /// Returns true if a row with exactly this template name exists.
    fn template_exists(&self, template_name: &str) -> StoreResult<bool>;

    /// Inserts a new active row.
    fn insert_template(&mut self, template: &InjectionTemplate) -> StoreResult<()>;

    /// Returns the number of rows in the catalog.
    fn count_templates(&self) -> StoreResult<u64>;
}

/// A catalog row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredTemplate {
    /// The template as inserted.
    pub template: InjectionTemplate,
    /// Whether the row is active. Rows inserted by the pipeline always are.
    pub is_active: bool,
}

/// An in-memory catalog, used for dry runs and tests.
#[derive(Debug, Default)]
pub struct MemoryTemplateStore {
    rows: Vec<StoredTemplate>,
    names: HashSet<String>,
}

impl MemoryTemplateStore {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a catalog already holding `templates`.
    pub fn with_templates<I: IntoIterator<Item = InjectionTemplate>>(templates: I) -> Self {
        let mut store = Self::new();
        for template in templates {
            store.push(template);
        }
        store
    }

    /// Returns the rows in insertion order.
    pub fn rows(&self) -> &[StoredTemplate] {
        &self.rows
    }

    fn push(&mut self, template: InjectionTemplate) {
        self.names.insert(template.template_name.clone());
        self.rows.push(StoredTemplate {
            template,
            is_active: true,
        });
    }
}

impl TemplateStore for MemoryTemplateStore {
    fn existing_keys(&self) -> StoreResult<Vec<(String, Option<String>)>> {
        Ok(self
            .rows
            .iter()
            .map(|row| (row.template.injection_name.clone(), row.template.dose.clone()))
            .collect())
    }

    fn template_exists(&self, template_name: &str) -> StoreResult<bool> {
        Ok(self.names.contains(template_name))
    }

    fn insert_template(&mut self, template: &InjectionTemplate) -> StoreResult<()> {
        if self.names.contains(&template.template_name) {
            return Err(StoreError::Rejected(format!(
                "duplicate template_name: {}",
                template.template_name
            )));
        }
        self.push(template.clone());
        Ok(())
    }

    fn count_templates(&self) -> StoreResult<u64> {
        Ok(self.rows.len() as u64)
    }
}
