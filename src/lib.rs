//! rftidy - Rewrite-pipeline engine for tidying Robot Framework test data
//!
//! Takes a parsed document tree and runs an ordered list of rewrite rules
//! over it, each enforcing one structural or stylistic convention.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod model;
pub mod process;
pub mod rules;
pub mod scope;

// Re-export commonly used types
pub use config::{FormatContext, TidyConfig};
pub use error::{ConfigError, Result};
pub use process::{tidy_document, Pipeline};
pub use scope::SelectionWindow;
