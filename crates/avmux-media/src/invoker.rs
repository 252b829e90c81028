//! Toolkit invocation.
//!
//! The external toolkit is a black box invoked with an ordered argument list
//! and reporting back an integer exit code. The trait exists so the mux
//! session can be tested with a fake that records arguments instead of
//! shelling out.

use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::error::{MediaError, MediaResult};

/// One-method contract with the external toolkit: run the argument list to
/// completion, return the exit code. Blocks the caller until the toolkit
/// finishes; no timeout is applied.
#[async_trait]
pub trait ToolkitInvoker: Send + Sync {
    async fn run(&self, args: &[String]) -> MediaResult<i32>;
}

/// Production invoker that spawns the `ffmpeg` binary.
#[derive(Debug, Clone, Default)]
pub struct FfmpegInvoker;

impl FfmpegInvoker {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ToolkitInvoker for FfmpegInvoker {
    async fn run(&self, args: &[String]) -> MediaResult<i32> {
        check_ffmpeg()?;

        debug!("Running FFmpeg: ffmpeg {}", args.join(" "));

        let output = Command::new("ffmpeg")
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await?;

        // A killed process has no exit code; report it as a generic failure.
        let code = output.status.code().unwrap_or(-1);

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!(
                exit_code = code,
                "FFmpeg exited with non-zero status: {}",
                last_lines(&stderr, 5)
            );
        }

        Ok(code)
    }
}

/// Check if FFmpeg is available.
pub fn check_ffmpeg() -> MediaResult<PathBuf> {
    which::which("ffmpeg").map_err(|_| MediaError::FfmpegNotFound)
}

/// Tail of the captured stderr, enough to identify the failure in a log line.
fn last_lines(s: &str, n: usize) -> String {
    let lines: Vec<&str> = s.lines().collect();
    let start = lines.len().saturating_sub(n);
    lines[start..].join("\n")
}
