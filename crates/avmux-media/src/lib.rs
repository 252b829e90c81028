//! FFmpeg CLI wrapper for merging audio with still images and video.
//!
//! This crate provides:
//! - Deterministic FFmpeg argument construction for the two mux templates
//! - Collision-avoiding output naming
//! - Media reference resolution with scoped temporary copies
//! - A `ToolkitInvoker` seam so the encode path is testable without FFmpeg

pub mod command;
pub mod error;
pub mod invoker;
pub mod resolver;
pub mod session;

// Re-export common types
pub use command::{generate_output_name, prepare_output_path, MuxCommand};
pub use error::{MediaError, MediaResult};
pub use invoker::{check_ffmpeg, FfmpegInvoker, ToolkitInvoker};
pub use resolver::{ByteSource, ContentIndex, FsMediaStore, ResolvedPath, Resolver};
pub use session::MuxSession;
