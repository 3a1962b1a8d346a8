//! Style learning: sample management, quantitative metrics, and the
//! LLM-backed analyzer that produces a [`profile::StyleProfile`].

pub mod analyzer;
pub mod documents;
pub mod metrics;
pub mod profile;

pub use analyzer::StyleAnalyzer;
pub use documents::DocumentProcessor;
pub use metrics::{quantitative_analysis, QuantitativeMetrics};
pub use profile::{ProfileStore, StyleProfile};
