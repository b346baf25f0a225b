//! Pipeline construction and document transformation.
//!
//! The run lifecycle has two phases:
//!
//! **Construction:** every configured rule spec is parsed, looked up in the
//! registry, and built with eagerly-validated parameters. Any problem is a
//! [`crate::error::ConfigError`] raised before a single document is read.
//!
//! **Transformation:** the built [`Pipeline`] runs its rules sequentially
//! over each document tree. Transformation itself never fails; a rule that
//! cannot safely rewrite a node leaves it unchanged.
//!
//! The main entry point is [`tidy_document`]; callers that transform many
//! documents build one [`Pipeline`] and reuse it.

pub mod pipeline;

pub use pipeline::{tidy_document, Pipeline};
