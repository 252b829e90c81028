//! Shared data models for avmux.
//!
//! This crate provides Serde-serializable types for:
//! - Media kinds and opaque media references
//! - Encode jobs and their results
//! - Encoding configuration with template defaults

pub mod encoding;
pub mod job;
pub mod media;

// Re-export common types
pub use encoding::{EncodingConfig, RETURN_CODE_SUCCESS};
pub use job::{EncodeJob, EncodeResult, JobId, JobKind};
pub use media::{MediaKind, MediaReference};
