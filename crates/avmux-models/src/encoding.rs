//! Encoding configuration for mux jobs.
//!
//! The defaults reproduce the fixed argument templates the external toolkit
//! is invoked with. Changing a field changes the generated argv, so the
//! defaults are the contract and are covered by tests.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Audio codec used for both job kinds
pub const DEFAULT_AUDIO_CODEC: &str = "aac";
/// Video codec used when looping a still image
pub const DEFAULT_IMAGE_VIDEO_CODEC: &str = "mpeg4";
/// Audio bitrate for the image+audio template
pub const DEFAULT_AUDIO_BITRATE: &str = "92k";
/// Forced output container format
pub const DEFAULT_CONTAINER: &str = "mp4";
/// Frame rate the looped still image is read at
pub const DEFAULT_INPUT_FRAME_RATE: u32 = 1;
/// Frame rate the image+audio output is re-stamped to
pub const DEFAULT_OUTPUT_FRAME_RATE: u32 = 2;

/// Toolkit exit code that denotes success; anything else is failure.
pub const RETURN_CODE_SUCCESS: i32 = 0;

/// Output filename prefix for image+audio jobs
pub const IMAGE_OUTPUT_PREFIX: &str = "merged_video";
/// Exclusive upper bound of the random suffix for image+audio jobs
pub const IMAGE_SUFFIX_BOUND: u32 = 1010;
/// Output filename prefix for video+audio jobs
pub const VIDEO_OUTPUT_PREFIX: &str = "merge_video_file";
/// Exclusive upper bound of the random suffix for video+audio jobs
pub const VIDEO_SUFFIX_BOUND: u32 = 10100;

/// Encoding configuration.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct EncodingConfig {
    /// Audio codec (e.g. "aac")
    #[serde(default = "default_audio_codec")]
    pub audio_codec: String,

    /// Video codec for the still-image template (e.g. "mpeg4")
    #[serde(default = "default_image_video_codec")]
    pub image_video_codec: String,

    /// Audio bitrate for the still-image template
    #[serde(default = "default_audio_bitrate")]
    pub audio_bitrate: String,

    /// Output container format
    #[serde(default = "default_container")]
    pub container: String,

    /// Frame rate the looped image input is read at
    #[serde(default = "default_input_frame_rate")]
    pub input_frame_rate: u32,

    /// Frame rate the image+audio output is re-stamped to
    #[serde(default = "default_output_frame_rate")]
    pub output_frame_rate: u32,
}

fn default_audio_codec() -> String {
    DEFAULT_AUDIO_CODEC.to_string()
}
fn default_image_video_codec() -> String {
    DEFAULT_IMAGE_VIDEO_CODEC.to_string()
}
fn default_audio_bitrate() -> String {
    DEFAULT_AUDIO_BITRATE.to_string()
}
fn default_container() -> String {
    DEFAULT_CONTAINER.to_string()
}
fn default_input_frame_rate() -> u32 {
    DEFAULT_INPUT_FRAME_RATE
}
fn default_output_frame_rate() -> u32 {
    DEFAULT_OUTPUT_FRAME_RATE
}

impl Default for EncodingConfig {
    fn default() -> Self {
        Self {
            audio_codec: DEFAULT_AUDIO_CODEC.to_string(),
            image_video_codec: DEFAULT_IMAGE_VIDEO_CODEC.to_string(),
            audio_bitrate: DEFAULT_AUDIO_BITRATE.to_string(),
            container: DEFAULT_CONTAINER.to_string(),
            input_frame_rate: DEFAULT_INPUT_FRAME_RATE,
            output_frame_rate: DEFAULT_OUTPUT_FRAME_RATE,
        }
    }
}

impl EncodingConfig {
    /// Create a new encoding configuration with template defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a new config with a different audio bitrate.
    pub fn with_audio_bitrate(mut self, bitrate: impl Into<String>) -> Self {
        self.audio_bitrate = bitrate.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EncodingConfig::default();
        assert_eq!(config.audio_codec, "aac");
        assert_eq!(config.image_video_codec, "mpeg4");
        assert_eq!(config.audio_bitrate, "92k");
        assert_eq!(config.input_frame_rate, 1);
        assert_eq!(config.output_frame_rate, 2);
    }

    #[test]
    fn test_defaults_fill_missing_fields() {
        let config: EncodingConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.container, "mp4");
        assert_eq!(config.audio_bitrate, "92k");
    }
}
