//! Buffered, existence-checked loading of templates into the catalog.

use injectable_types::{InjectionTemplate, RunStatistics};

use crate::store::TemplateStore;
use crate::types::{PipelineConfig, StoreResult};

/// Result of loading one template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// A new row was inserted.
    Inserted,
    /// A row with the same template name already exists.
    AlreadyExists,
}

/// Checks for an existing row by exact template name and inserts if absent.
pub fn load_template<S: TemplateStore + ?Sized>(
    store: &mut S,
    template: &InjectionTemplate,
) -> StoreResult<InsertOutcome> {
    if store.template_exists(&template.template_name)? {
        return Ok(InsertOutcome::AlreadyExists);
    }
    store.insert_template(template)?;
    Ok(InsertOutcome::Inserted)
}

/// Counts from a single flush.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlushSummary {
    /// Rows inserted.
    pub inserted: u64,
    /// Rows already present.
    pub existing: u64,
    /// Rows that failed.
    pub errors: u64,
}

/// Buffers templates and flushes them to a store in fixed-size batches.
///
/// A failing template is counted and skipped; the rest of the batch still
/// loads. Only the first `max_logged_errors` failures of a run are logged.
#[derive(Debug)]
pub struct BatchLoader {
    buffer: Vec<InjectionTemplate>,
    capacity: usize,
    max_logged_errors: u64,
    flushes: u64,
}

impl BatchLoader {
    /// Creates a loader using the batch size and error-log budget in `config`.
    pub fn new(config: &PipelineConfig) -> Self {
        let capacity = config.batch_size.max(1);
        Self {
            buffer: Vec::with_capacity(capacity),
            capacity,
            max_logged_errors: config.max_logged_errors,
            flushes: 0,
        }
    }

    /// Number of templates waiting to be flushed.
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// Number of non-empty flushes performed so far.
    pub fn flushes(&self) -> u64 {
        self.flushes
    }

    /// Buffers a template, flushing first if the buffer reaches capacity.
    pub fn push<S: TemplateStore + ?Sized>(
        &mut self,
        template: InjectionTemplate,
        store: &mut S,
        stats: &mut RunStatistics,
    ) {
        self.buffer.push(template);
        if self.buffer.len() >= self.capacity {
            self.flush(store, stats);
        }
    }

    /// Loads every buffered template and empties the buffer.
    pub fn flush<S: TemplateStore + ?Sized>(
        &mut self,
        store: &mut S,
        stats: &mut RunStatistics,
    ) -> FlushSummary {
        let mut summary = FlushSummary::default();
        if self.buffer.is_empty() {
            return summary;
        }

        for template in self.buffer.drain(..) {
            match load_template(store, &template) {
                Ok(InsertOutcome::Inserted) => {
                    stats.inserted += 1;
                    summary.inserted += 1;
                }
                Ok(InsertOutcome::AlreadyExists) => {
                    stats.record_existing();
                    summary.existing += 1;
                }
                Err(e) => {
                    stats.errors += 1;
                    summary.errors += 1;
                    if stats.errors <= self.max_logged_errors {
                        tracing::error!(
                            template = %template.template_name,
                            source_code = %template.source_code,
                            "Failed to insert template: {}",
                            e
                        );
                    } else if stats.errors == self.max_logged_errors + 1 {
                        tracing::error!("Further insert failures will not be logged");
                    }
                }
            }
        }

        self.flushes += 1;
        tracing::debug!(
            inserted = summary.inserted,
            existing = summary.existing,
            errors = summary.errors,
            "Flushed batch {}",
            self.flushes
        );
        summary
    }
}
