//! # injectable-types
//!
//! Type definitions for the injectable medication catalog derived from
//! SNOMED CT description files.
//!
//! ## Features
//!
//! - `serde` (default): Enables serialization/deserialization support via serde.
//!
//! ## Usage
//!
//! ```rust
//! use injectable_types::{InjectionTemplate, Route};
//!
//! let template = InjectionTemplate::new(
//!     "Insulin",
//!     Some("100IU/mL".to_string()),
//!     Route::Subcutaneous,
//!     "411529005",
//! );
//!
//! assert_eq!(template.template_name, "Insulin 100IU/mL");
//! assert_eq!(template.route.as_str(), "SC");
//! ```

#![warn(missing_docs)]

mod description;
mod enums;
mod stats;
mod template;

// Re-export all public types at crate root
pub use description::DescriptionRecord;
pub use enums::{Route, UnknownRoute};
pub use stats::{RunReport, RunStatistics};
pub use template::{
    truncate_chars, DedupKey, InjectionTemplate, AS_DIRECTED, MAX_TEMPLATE_NAME_CHARS,
    MIN_INJECTION_NAME_CHARS,
};
