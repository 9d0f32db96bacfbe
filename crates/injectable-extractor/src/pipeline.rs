//! Extraction orchestrator.
//!
//! Drives Reader → Classifier → Parser → Deduplicator → Loader over an
//! ordered list of description files. Everything runs on the calling thread:
//! the order in which records are seen decides which of two equal keys is
//! inserted.
//!
//! ```ignore
//! let mut store = SqliteTemplateStore::open("catalog.db")?;
//! let report = run_extraction(&[regional, international], &mut store, &PipelineConfig::default())?;
//! println!("inserted {}", report.statistics.inserted);
//! ```

use std::io::Read;
use std::path::Path;
use std::time::Instant;

use injectable_types::{DescriptionRecord, RunReport, RunStatistics};

use crate::batch::BatchLoader;
use crate::classifier::{classify, Classification};
use crate::dedup::Deduplicator;
use crate::description::{open_descriptions, DescriptionReader};
use crate::discovery::format_bytes;
use crate::store::TemplateStore;
use crate::term::parse_injection_term;
use crate::types::{ExtractError, ExtractResult, PipelineConfig, StoreResult};

/// Mutable state shared by every stage of a run.
#[derive(Debug, Default)]
pub struct PipelineContext {
    /// Keys seen in the catalog and earlier in the run.
    pub dedup: Deduplicator,
    /// Run counters.
    pub stats: RunStatistics,
}

impl PipelineContext {
    /// Creates a context seeded with every `(injection_name, dose)` pair already
    /// in `store`.
    pub fn preload<S: TemplateStore + ?Sized>(store: &S) -> StoreResult<Self> {
        let mut dedup = Deduplicator::new();
        dedup.seed(store.existing_keys()?);
        Ok(Self {
            dedup,
            stats: RunStatistics::default(),
        })
    }
}

/// Runs the pipeline stages against one store.
pub struct Extractor<'s, S: TemplateStore + ?Sized> {
    store: &'s mut S,
    loader: BatchLoader,
    progress_interval: u64,
}

impl<'s, S: TemplateStore + ?Sized> Extractor<'s, S> {
    /// Creates an extractor writing to `store`.
    pub fn new(store: &'s mut S, config: &PipelineConfig) -> Self {
        Self {
            store,
            loader: BatchLoader::new(config),
            progress_interval: config.progress_interval,
        }
    }

    /// Streams one description file through the pipeline.
    ///
    /// The batch buffer is flushed at the end of the file. Errors end this
    /// file only.
    pub fn process_file(&mut self, path: &Path, ctx: &mut PipelineContext) -> ExtractResult<()> {
        let mut reader = open_descriptions(path)?;
        let size = std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);
        tracing::info!("Processing {} ({})", path.display(), format_bytes(size));

        let found_before = ctx.stats.found;
        let result = self.process_descriptions(&mut reader, ctx);
        self.finish(ctx);

        tracing::info!(
            records = reader.records_read(),
            malformed = reader.malformed(),
            found = ctx.stats.found - found_before,
            "Finished {}",
            path.display()
        );
        result
    }

    /// Streams records from `reader`, updating the reader counters in `ctx`.
    ///
    /// Does not flush; call [`Extractor::finish`] once the input is exhausted.
    pub fn process_descriptions<R: Read>(
        &mut self,
        reader: &mut DescriptionReader<R>,
        ctx: &mut PipelineContext,
    ) -> ExtractResult<()> {
        let (read_before, malformed_before) = (reader.records_read(), reader.malformed());

        let mut outcome = Ok(());
        while let Some(next) = reader.next() {
            match next {
                Ok(record) => {
                    self.process_record(&record, ctx);
                    let read = reader.records_read();
                    if self.progress_interval > 0 && read % self.progress_interval == 0 {
                        tracing::info!(
                            "Read {} records, found {} injectables so far",
                            read,
                            ctx.stats.found
                        );
                    }
                }
                Err(e) => {
                    outcome = Err(e);
                    break;
                }
            }
        }

        ctx.stats.records_read += reader.records_read() - read_before;
        ctx.stats.malformed_lines += reader.malformed() - malformed_before;
        outcome
    }

    /// Runs a single record through classification, parsing, dedup and the
    /// loader buffer.
    pub fn process_record(&mut self, record: &DescriptionRecord, ctx: &mut PipelineContext) {
        match classify(&record.term, record.active) {
            Classification::Accepted => {}
            Classification::Excluded(pattern) => {
                tracing::trace!(term = %record.term, pattern, "Excluded term");
                return;
            }
            _ => return,
        }

        let template = parse_injection_term(&record.term, &record.concept_id);
        if !template.has_loadable_name() {
            tracing::debug!(term = %record.term, "Parsed name too short, dropping");
            return;
        }

        ctx.stats.found += 1;

        if !ctx.dedup.admit(&template) {
            ctx.stats.record_duplicate();
            return;
        }

        self.loader.push(template, &mut *self.store, &mut ctx.stats);
    }

    /// Flushes anything left in the batch buffer.
    pub fn finish(&mut self, ctx: &mut PipelineContext) {
        self.loader.flush(&mut *self.store, &mut ctx.stats);
    }
}

/// Runs a full extraction over `paths`, in order, into `store`.
///
/// Missing or unreadable files are logged and skipped. Only failures of the
/// catalog-wide queries (preload and row counts) abort the run.
pub fn run_extraction<S, P>(
    paths: &[P],
    store: &mut S,
    config: &PipelineConfig,
) -> ExtractResult<RunReport>
where
    S: TemplateStore + ?Sized,
    P: AsRef<Path>,
{
    let started = Instant::now();

    let catalog_before = store.count_templates()?;
    let mut ctx = PipelineContext::preload(&*store)?;
    tracing::info!(
        "Catalog holds {} templates ({} distinct name/dose keys)",
        catalog_before,
        ctx.dedup.len()
    );

    {
        let mut extractor = Extractor::new(&mut *store, config);
        for path in paths {
            let path = path.as_ref();
            match extractor.process_file(path, &mut ctx) {
                Ok(()) => ctx.stats.files_processed += 1,
                Err(ExtractError::FileNotFound { path }) => {
                    ctx.stats.files_missing += 1;
                    tracing::warn!("Description file not found, skipping: {}", path);
                }
                Err(e) => {
                    tracing::warn!("Stopped reading {}: {}", path.display(), e);
                }
            }
        }
    }

    let catalog_after = store.count_templates()?;
    let stats = ctx.stats;
    let report = RunReport {
        statistics: stats,
        catalog_before,
        catalog_after,
        elapsed_ms: started.elapsed().as_millis() as u64,
    };

    tracing::info!(
        found = stats.found,
        inserted = stats.inserted,
        skipped = stats.skipped,
        errors = stats.errors,
        "Extraction complete: catalog {} -> {} templates in {} ms",
        catalog_before,
        catalog_after,
        report.elapsed_ms
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryTemplateStore;
    use injectable_types::{InjectionTemplate, Route};

    const HEADER: &str =
        "id\teffectiveTime\tactive\tmoduleId\tconceptId\tlanguageCode\ttypeId\tterm\tcaseSignificanceId\n";

    fn line(concept_id: &str, active: &str, term: &str) -> String {
        format!("1\t20250101\t{active}\t900000000000207008\t{concept_id}\ten\t900000000000013009\t{term}\t900000000000448009\n")
    }

    fn run(input: &str, store: &mut MemoryTemplateStore) -> PipelineContext {
        let mut ctx = PipelineContext::preload(&*store).unwrap();
        let mut reader = DescriptionReader::from_reader(input.as_bytes());
        let mut extractor = Extractor::new(store, &PipelineConfig::default());
        extractor.process_descriptions(&mut reader, &mut ctx).unwrap();
        extractor.finish(&mut ctx);
        ctx
    }

    #[test]
    fn test_accepted_term_is_inserted() {
        let input = format!("{HEADER}{}", line("372687004", "1", "Amoxicillin 500mg injection"));
        let mut store = MemoryTemplateStore::new();
        let ctx = run(&input, &mut store);

        assert_eq!(ctx.stats.found, 1);
        assert_eq!(ctx.stats.inserted, 1);
        assert_eq!(ctx.stats.records_read, 1);
        let row = &store.rows()[0];
        assert_eq!(row.template.template_name, "Amoxicillin 500mg");
        assert_eq!(row.template.source_code, "372687004");
        assert!(row.is_active);
    }

    #[test]
    fn test_rejected_term_never_reaches_loader() {
        let input = format!("{HEADER}{}", line("1", "1", "Injection site abscess"));
        let mut store = MemoryTemplateStore::new();
        let ctx = run(&input, &mut store);

        assert_eq!(ctx.stats.found, 0);
        assert_eq!(ctx.stats.records_read, 1);
        assert_eq!(store.count_templates().unwrap(), 0);
    }

    #[test]
    fn test_same_key_twice_in_run() {
        let input = format!(
            "{HEADER}{}{}",
            line("1", "1", "Amoxicillin 500mg injection"),
            line("2", "1", "Amoxicillin 500 mg powder for injection")
        );
        let mut store = MemoryTemplateStore::new();
        let ctx = run(&input, &mut store);

        assert_eq!(ctx.stats.found, 2);
        assert_eq!(ctx.stats.inserted, 1);
        assert_eq!(ctx.stats.skipped, 1);
        assert_eq!(ctx.stats.duplicates, 1);
        assert_eq!(store.rows()[0].template.source_code, "1");
    }

    #[test]
    fn test_key_already_in_catalog() {
        let existing = InjectionTemplate::new("Amoxicillin", Some("500mg".to_string()), Route::IvOrIm, "0");
        let mut store = MemoryTemplateStore::with_templates([existing]);
        let input = format!("{HEADER}{}", line("1", "1", "Amoxicillin 500mg injection"));
        let ctx = run(&input, &mut store);

        assert_eq!(ctx.stats.found, 1);
        assert_eq!(ctx.stats.inserted, 0);
        assert_eq!(ctx.stats.skipped, 1);
        assert_eq!(store.count_templates().unwrap(), 1);
    }

    #[test]
    fn test_inactive_and_malformed_lines() {
        let input = format!(
            "{HEADER}{}short\tline\n{}",
            line("1", "0", "Amoxicillin 500mg injection"),
            line("2", "1", "Morphine 10 mg/mL injection")
        );
        let mut store = MemoryTemplateStore::new();
        let ctx = run(&input, &mut store);

        assert_eq!(ctx.stats.records_read, 2);
        assert_eq!(ctx.stats.malformed_lines, 1);
        assert_eq!(ctx.stats.found, 1);
        assert_eq!(store.rows()[0].template.template_name, "Morphine 10mg/mL");
    }

    #[test]
    fn test_missing_file_is_skipped() {
        let mut store = MemoryTemplateStore::new();
        let report = run_extraction(
            &["/no/such/sct2_Description_Snapshot.txt"],
            &mut store,
            &PipelineConfig::default(),
        )
        .unwrap();

        assert_eq!(report.statistics.files_missing, 1);
        assert_eq!(report.statistics.files_processed, 0);
        assert_eq!(report.catalog_after, 0);
    }
}
