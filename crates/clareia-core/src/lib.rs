//! Core library for Clareia statement processing.
//!
//! This crate provides:
//! - Text extraction from uploaded statements (with a pluggable extractor)
//! - The instruction prompt for the generative extraction service
//! - A client for the extraction service with typed failure classification
//! - JSON location in free-form replies and schema normalization
//! - Example datasets for the explicit demo mode

pub mod client;
pub mod document;
pub mod error;
pub mod fallback;
pub mod locate;
pub mod models;
pub mod normalize;
pub mod pipeline;
pub mod prompt;

pub use client::{ExtractionClient, HttpReply, ReqwestTransport, Transport};
pub use document::{MediaType, PlaceholderTextExtractor, TextExtractor, UploadedFile};
pub use error::{ClareiaError, ConfigError, ExtractionError, Result};
pub use fallback::{FallbackKind, fallback};
pub use locate::{JsonLocator, locate_json};
pub use models::config::{ClareiaConfig, PipelineMode, ResolvedService};
pub use models::statement::{ProcessedStatement, StatementItem};
pub use normalize::normalize;
pub use pipeline::{StatementPipeline, parse_reply};
pub use prompt::{PromptBuilder, build_prompt};
