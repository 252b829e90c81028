//! Encode job definitions and results.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::encoding::{
    IMAGE_OUTPUT_PREFIX, IMAGE_SUFFIX_BOUND, RETURN_CODE_SUCCESS, VIDEO_OUTPUT_PREFIX,
    VIDEO_SUFFIX_BOUND,
};

/// Unique identifier for an encode job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct JobId(pub String);

impl JobId {
    /// Generate a new random job ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Create from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of mux operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum JobKind {
    /// Loop a still image over an audio track
    ImageAudio,
    /// Replace a video's audio track, stream-copying the video
    VideoAudio,
}

impl JobKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobKind::ImageAudio => "image_audio",
            JobKind::VideoAudio => "video_audio",
        }
    }

    /// Output filename prefix for this kind.
    pub fn output_prefix(&self) -> &'static str {
        match self {
            JobKind::ImageAudio => IMAGE_OUTPUT_PREFIX,
            JobKind::VideoAudio => VIDEO_OUTPUT_PREFIX,
        }
    }

    /// Exclusive upper bound of the random filename suffix for this kind.
    pub fn suffix_bound(&self) -> u32 {
        match self {
            JobKind::ImageAudio => IMAGE_SUFFIX_BOUND,
            JobKind::VideoAudio => VIDEO_SUFFIX_BOUND,
        }
    }
}

impl fmt::Display for JobKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single mux operation: one visual source, one audio source, one output
/// directory. Constructed immediately before invocation, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct EncodeJob {
    /// Unique job ID
    pub id: JobId,

    /// Kind of operation
    pub kind: JobKind,

    /// Resolved path of the picture-bearing input
    pub visual: PathBuf,

    /// Resolved path of the audio input
    pub audio: PathBuf,

    /// Directory the output file is written into
    pub output_dir: PathBuf,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl EncodeJob {
    /// Create a new job with a fresh ID.
    pub fn new(
        kind: JobKind,
        visual: impl Into<PathBuf>,
        audio: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            id: JobId::new(),
            kind,
            visual: visual.into(),
            audio: audio.into(),
            output_dir: output_dir.into(),
            created_at: Utc::now(),
        }
    }
}

/// Terminal outcome of a mux invocation.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct EncodeResult {
    /// Path of the produced output file
    pub output: PathBuf,

    /// Toolkit exit code
    pub exit_code: i32,
}

impl EncodeResult {
    pub fn new(output: impl Into<PathBuf>, exit_code: i32) -> Self {
        Self {
            output: output.into(),
            exit_code,
        }
    }

    /// True iff the toolkit returned the success sentinel.
    pub fn succeeded(&self) -> bool {
        self.exit_code == RETURN_CODE_SUCCESS
    }

    /// The produced output path.
    pub fn output(&self) -> &Path {
        &self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_ids_are_unique() {
        assert_ne!(JobId::new(), JobId::new());
    }

    #[test]
    fn test_kind_prefixes() {
        assert_eq!(JobKind::ImageAudio.output_prefix(), "merged_video");
        assert_eq!(JobKind::ImageAudio.suffix_bound(), 1010);
        assert_eq!(JobKind::VideoAudio.output_prefix(), "merge_video_file");
        assert_eq!(JobKind::VideoAudio.suffix_bound(), 10100);
    }

    #[test]
    fn test_result_success_sentinel() {
        assert!(EncodeResult::new("/tmp/out.mp4", 0).succeeded());
        assert!(!EncodeResult::new("/tmp/out.mp4", 1).succeeded());
        assert!(!EncodeResult::new("/tmp/out.mp4", -1).succeeded());
    }

    #[test]
    fn test_job_serialization_round_trip() {
        let job = EncodeJob::new(JobKind::VideoAudio, "/v.mp4", "/a.mp3", "/out");
        let json = serde_json::to_string(&job).unwrap();
        let back: EncodeJob = serde_json::from_str(&json).unwrap();
        assert_eq!(back.kind, JobKind::VideoAudio);
        assert_eq!(back.visual, PathBuf::from("/v.mp4"));
    }
}
