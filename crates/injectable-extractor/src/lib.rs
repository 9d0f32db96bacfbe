//! # injectable-extractor
//!
//! Streams SNOMED CT RF2 description files and loads a catalog of injectable
//! medication templates.
//!
//! A run reads each file line by line and sends every record through four
//! stages. [`is_injectable_drug_product`] accepts a term,
//! [`parse_injection_term`] turns it into a template, the [`Deduplicator`]
//! drops repeated name/dose pairs, and the [`BatchLoader`] inserts the rest
//! through a [`TemplateStore`]. [`run_extraction`] ties the stages together.
//!
//! ```no_run
//! use injectable_extractor::{run_extraction, PipelineConfig, SqliteTemplateStore};
//!
//! let mut store = SqliteTemplateStore::open("catalog.db")?;
//! let report = run_extraction(
//!     &["uk/sct2_Description_Snapshot-en_GB1000000_20250402.txt"],
//!     &mut store,
//!     &PipelineConfig::default(),
//! )?;
//! println!("inserted {} templates", report.statistics.inserted);
//! # Ok::<(), injectable_extractor::ExtractError>(())
//! ```

#![warn(missing_docs)]

pub mod batch;
pub mod classifier;
pub mod dedup;
pub mod description;
pub mod discovery;
pub mod pipeline;
pub mod reader;
pub mod sqlite;
pub mod store;
pub mod term;
pub mod types;

pub use batch::{load_template, BatchLoader, FlushSummary, InsertOutcome};
pub use classifier::{classify, is_injectable_drug_product, Classification};
pub use dedup::Deduplicator;
pub use description::{open_descriptions, DescriptionReader};
pub use discovery::{discover_description_files, DescriptionFile};
pub use pipeline::{run_extraction, Extractor, PipelineContext};
pub use reader::{Rf2Reader, Rf2Record};
pub use sqlite::SqliteTemplateStore;
pub use store::{MemoryTemplateStore, StoredTemplate, TemplateStore};
pub use term::parse_injection_term;
pub use types::{ExtractError, ExtractResult, PipelineConfig, StoreError, StoreResult};

// Re-export injectable-types for convenience
pub use injectable_types;
