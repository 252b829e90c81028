//! FFmpeg command construction and output naming.
//!
//! Argument order is a contract, not an implementation detail: the toolkit
//! parses positionally and by flag, so each job kind has one fixed, ordered
//! template. `build_args` is deterministic for a given job and config.

use std::path::{Path, PathBuf};
use rand::Rng;
use tokio::fs;
use tracing::debug;

use avmux_models::{EncodeJob, EncodingConfig, JobKind};

use crate::error::MediaResult;

/// Builder for a single mux invocation.
#[derive(Debug, Clone)]
pub struct MuxCommand {
    kind: JobKind,
    visual: PathBuf,
    audio: PathBuf,
    output: PathBuf,
    config: EncodingConfig,
}

impl MuxCommand {
    /// Create a command for a job writing to `output`.
    pub fn new(job: &EncodeJob, config: &EncodingConfig, output: impl AsRef<Path>) -> Self {
        Self {
            kind: job.kind,
            visual: job.visual.clone(),
            audio: job.audio.clone(),
            output: output.as_ref().to_path_buf(),
            config: config.clone(),
        }
    }

    /// The output path this command writes to.
    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Build the ordered argument list.
    pub fn build_args(&self) -> Vec<String> {
        match self.kind {
            JobKind::ImageAudio => self.build_image_audio_args(),
            JobKind::VideoAudio => self.build_video_audio_args(),
        }
    }

    /// Still image looped at the input frame rate over the audio track,
    /// truncated to the shorter input, re-stamped to the output frame rate.
    fn build_image_audio_args(&self) -> Vec<String> {
        vec![
            "-y".to_string(),
            "-loop".to_string(),
            "1".to_string(),
            "-r".to_string(),
            self.config.input_frame_rate.to_string(),
            "-i".to_string(),
            self.visual.to_string_lossy().to_string(),
            "-i".to_string(),
            self.audio.to_string_lossy().to_string(),
            "-acodec".to_string(),
            self.config.audio_codec.clone(),
            "-vcodec".to_string(),
            self.config.image_video_codec.clone(),
            "-strict".to_string(),
            "experimental".to_string(),
            "-b:a".to_string(),
            self.config.audio_bitrate.clone(),
            "-shortest".to_string(),
            "-f".to_string(),
            self.config.container.clone(),
            "-r".to_string(),
            self.config.output_frame_rate.to_string(),
            self.output.to_string_lossy().to_string(),
        ]
    }

    /// Video stream copied unmodified from input 0, audio re-encoded from
    /// input 1, explicit stream mapping, truncated to the shorter input.
    fn build_video_audio_args(&self) -> Vec<String> {
        vec![
            "-y".to_string(),
            "-i".to_string(),
            self.visual.to_string_lossy().to_string(),
            "-i".to_string(),
            self.audio.to_string_lossy().to_string(),
            "-c:v".to_string(),
            "copy".to_string(),
            "-c:a".to_string(),
            self.config.audio_codec.clone(),
            "-map".to_string(),
            "0:v:0".to_string(),
            "-map".to_string(),
            "1:a:0".to_string(),
            "-shortest".to_string(),
            self.output.to_string_lossy().to_string(),
        ]
    }
}

/// Generate an output filename: prefix, random integer in a bounded range,
/// `.mp4`. Collision avoidance is probabilistic, not a guarantee.
pub fn generate_output_name(kind: JobKind) -> String {
    let suffix = rand::rng().random_range(1..kind.suffix_bound());
    format!("{}{}.mp4", kind.output_prefix(), suffix)
}

/// Pick the final output path for a job, creating the destination directory
/// recursively if absent.
pub async fn prepare_output_path(job: &EncodeJob) -> MediaResult<PathBuf> {
    if !job.output_dir.exists() {
        fs::create_dir_all(&job.output_dir).await?;
    }
    let path = job.output_dir.join(generate_output_name(job.kind));
    debug!("Output path for job {}: {}", job.id, path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use avmux_models::EncodeJob;

    fn image_job() -> EncodeJob {
        EncodeJob::new(JobKind::ImageAudio, "/sdcard/a.jpg", "/tmp/b.mp3", "/sdcard/out")
    }

    fn video_job() -> EncodeJob {
        EncodeJob::new(JobKind::VideoAudio, "/sdcard/v.mp4", "/tmp/b.mp3", "/sdcard/out")
    }

    #[test]
    fn test_image_audio_args_fixed_order() {
        let job = image_job();
        let cmd = MuxCommand::new(&job, &EncodingConfig::default(), "/sdcard/out/merged_video7.mp4");

        let args = cmd.build_args();
        assert_eq!(
            args,
            vec![
                "-y", "-loop", "1", "-r", "1", "-i", "/sdcard/a.jpg", "-i", "/tmp/b.mp3",
                "-acodec", "aac", "-vcodec", "mpeg4", "-strict", "experimental", "-b:a", "92k",
                "-shortest", "-f", "mp4", "-r", "2", "/sdcard/out/merged_video7.mp4",
            ]
        );
    }

    #[test]
    fn test_video_audio_args_map_streams_and_copy_video() {
        let job = video_job();
        let cmd = MuxCommand::new(&job, &EncodingConfig::default(), "/sdcard/out/merge_video_file9.mp4");

        let args = cmd.build_args();
        assert_eq!(
            args,
            vec![
                "-y", "-i", "/sdcard/v.mp4", "-i", "/tmp/b.mp3", "-c:v", "copy", "-c:a", "aac",
                "-map", "0:v:0", "-map", "1:a:0", "-shortest", "/sdcard/out/merge_video_file9.mp4",
            ]
        );

        // Stream-copy for video is a hard requirement: no re-encode flag.
        let copy_pos = args.iter().position(|a| a == "-c:v").unwrap();
        assert_eq!(args[copy_pos + 1], "copy");
        assert!(!args.contains(&"-vcodec".to_string()));

        // Exactly one video stream from input 0, one audio stream from input 1,
        // in that order.
        let maps: Vec<&String> = args
            .iter()
            .enumerate()
            .filter(|(_, a)| *a == "-map")
            .map(|(i, _)| &args[i + 1])
            .collect();
        assert_eq!(maps, vec!["0:v:0", "1:a:0"]);
    }

    #[test]
    fn test_output_name_formula() {
        // Formula, not uniqueness: prefix, integer in range, suffix.
        for _ in 0..50 {
            let name = generate_output_name(JobKind::ImageAudio);
            let digits = name
                .strip_prefix("merged_video")
                .and_then(|r| r.strip_suffix(".mp4"))
                .expect("name should match prefix/suffix formula");
            let n: u32 = digits.parse().expect("suffix should be an integer");
            assert!((1..1010).contains(&n));
        }

        let name = generate_output_name(JobKind::VideoAudio);
        assert!(name.starts_with("merge_video_file"));
        assert!(name.ends_with(".mp4"));
    }

    #[tokio::test]
    async fn test_prepare_output_creates_directory() {
        let dir = tempfile::TempDir::new().unwrap();
        let out_dir = dir.path().join("nested").join("out");
        let job = EncodeJob::new(JobKind::ImageAudio, "/a.jpg", "/b.mp3", &out_dir);

        let path = prepare_output_path(&job).await.unwrap();
        assert!(out_dir.is_dir());
        assert_eq!(path.parent().unwrap(), out_dir);
    }
}
