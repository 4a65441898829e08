//! Typographic normalization for DOCX documents.
//!
//! The pipeline reads a .docx, resets formatting to a uniform baseline,
//! rewrites the text to canonical Russian typographic form (guillemets,
//! canonical dates, comma decimals, spaced percent signs, thousands
//! grouping), bolds standalone numbers while leaving dates, year references
//! and document identifiers plain, and writes the result to a new file.

pub mod baseline;
pub mod classifier;
pub mod config;
pub mod docx;
pub mod error;
pub mod processor;
pub mod stages;
pub mod types;

pub use classifier::NumericClassifier;
pub use config::FormatConfig;
pub use docx::DocxPackage;
pub use error::TypografError;
pub use processor::DocumentFormatter;
pub use types::{Document, RunReport, Span, StageReport, TextBlock};
