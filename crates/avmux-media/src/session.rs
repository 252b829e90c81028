//! Mux session: builds the command, invokes the toolkit, reports the result.
//!
//! The session is the explicit request object that replaces ambient picked
//! state: callers construct an [`EncodeJob`] and pass it through. One encode
//! may run at a time; overlapping requests are rejected instead of racing.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

use avmux_models::{EncodeJob, EncodeResult, EncodingConfig, RETURN_CODE_SUCCESS};

use crate::command::{prepare_output_path, MuxCommand};
use crate::error::{MediaError, MediaResult};
use crate::invoker::{FfmpegInvoker, ToolkitInvoker};

/// A mux session owning the encoding config and the toolkit invoker.
pub struct MuxSession {
    invoker: Arc<dyn ToolkitInvoker>,
    config: EncodingConfig,
    in_flight: AtomicBool,
}

impl MuxSession {
    /// Create a session backed by the real FFmpeg binary.
    pub fn new(config: EncodingConfig) -> Self {
        Self::with_invoker(config, Arc::new(FfmpegInvoker::new()))
    }

    /// Create a session with a custom invoker (used by tests to record
    /// arguments instead of shelling out).
    pub fn with_invoker(config: EncodingConfig, invoker: Arc<dyn ToolkitInvoker>) -> Self {
        Self {
            invoker,
            config,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Run one mux operation to completion.
    ///
    /// Fails fast with [`MediaError::Busy`] if another encode is in flight.
    /// A non-success exit code is surfaced as a typed error; no partial
    /// output cleanup is attempted.
    pub async fn encode(&self, job: &EncodeJob) -> MediaResult<EncodeResult> {
        if self.in_flight.swap(true, Ordering::SeqCst) {
            return Err(MediaError::Busy);
        }
        let result = self.encode_inner(job).await;
        self.in_flight.store(false, Ordering::SeqCst);
        result
    }

    async fn encode_inner(&self, job: &EncodeJob) -> MediaResult<EncodeResult> {
        info!(
            job_id = %job.id,
            kind = %job.kind,
            "Muxing {} + {}",
            job.visual.display(),
            job.audio.display()
        );

        let output = prepare_output_path(job).await?;
        let cmd = MuxCommand::new(job, &self.config, &output);
        let exit_code = self.invoker.run(&cmd.build_args()).await?;

        if exit_code != RETURN_CODE_SUCCESS {
            return Err(MediaError::ffmpeg_failed(
                format!("mux of job {} failed", job.id),
                Some(exit_code),
            ));
        }

        info!(job_id = %job.id, "Mux completed: {}", output.display());
        Ok(EncodeResult::new(output, exit_code))
    }
}
