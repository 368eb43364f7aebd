//! Data models and configuration.

pub mod config;
pub mod statement;

pub use config::{ClareiaConfig, PipelineMode, ResolvedService};
pub use statement::{ProcessedStatement, StatementItem};
