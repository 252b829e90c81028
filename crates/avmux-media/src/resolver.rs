//! Media reference resolution.
//!
//! Turns an opaque [`MediaReference`] into a filesystem-accessible path.
//! Image and video references are looked up in a content index that stores a
//! backing path column. Audio references are always materialized as a private
//! temporary copy, because audio content is not guaranteed to expose a direct
//! path; one full byte-copy buys uniform downstream handling.
//!
//! Temporary copies are scoped: dropping the returned handle deletes the
//! file, so cleanup happens on all exit paths including failure.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tempfile::TempPath;
use tokio::fs;
use tokio::io::{AsyncRead, AsyncWriteExt};
use tracing::{debug, info};

use avmux_models::{MediaKind, MediaReference};

use crate::error::{MediaError, MediaResult};

/// Prefix for materialized audio copies
const AUDIO_TEMP_PREFIX: &str = "temp_audio";
/// Suffix for materialized audio copies. FFmpeg sniffs the container, so this
/// is cosmetic.
const AUDIO_TEMP_SUFFIX: &str = ".mp3";

/// Content-index lookup: zero or one backing path per reference.
#[async_trait]
pub trait ContentIndex: Send + Sync {
    /// Single-row query for the stored path column. `None` means no row.
    async fn data_path(
        &self,
        reference: &MediaReference,
        kind: MediaKind,
    ) -> MediaResult<Option<PathBuf>>;
}

/// Byte-stream access to a reference's content, used only for audio
/// materialization.
#[async_trait]
pub trait ByteSource: Send + Sync {
    /// Open the reference for reading.
    async fn open(
        &self,
        reference: &MediaReference,
    ) -> MediaResult<Box<dyn AsyncRead + Send + Unpin>>;
}

/// A filesystem-accessible location derived from a media reference.
///
/// `Borrowed` paths are caller-owned, pre-existing files and are never
/// deleted here. `Temp` paths are freshly created copies owned by this
/// handle; the file is deleted when the handle drops.
#[derive(Debug)]
pub enum ResolvedPath {
    /// Pre-existing file backed by the content index
    Borrowed(PathBuf),
    /// Materialized temporary copy, deleted on drop
    Temp(TempPath),
}

impl ResolvedPath {
    /// The filesystem path.
    pub fn path(&self) -> &Path {
        match self {
            ResolvedPath::Borrowed(p) => p,
            ResolvedPath::Temp(t) => t,
        }
    }

    /// True if this handle owns a temporary copy.
    pub fn is_temp(&self) -> bool {
        matches!(self, ResolvedPath::Temp(_))
    }
}

/// Resolver over a media store.
pub struct Resolver<S> {
    store: S,
    cache_dir: PathBuf,
}

impl<S> Resolver<S>
where
    S: ContentIndex + ByteSource,
{
    /// Create a resolver materializing copies under `cache_dir`.
    pub fn new(store: S, cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            store,
            cache_dir: cache_dir.into(),
        }
    }

    /// Resolve a reference into a filesystem path.
    ///
    /// No retries: stream-open failures, copy I/O failures, and missing
    /// index rows are reported as-is.
    pub async fn resolve(
        &self,
        reference: &MediaReference,
        kind: MediaKind,
    ) -> MediaResult<ResolvedPath> {
        match kind {
            MediaKind::Image | MediaKind::Video => {
                let path = self
                    .store
                    .data_path(reference, kind)
                    .await?
                    .ok_or_else(|| MediaError::content_not_found(reference.as_str()))?;
                debug!("Resolved {} reference {} -> {}", kind, reference, path.display());
                Ok(ResolvedPath::Borrowed(path))
            }
            MediaKind::Audio => self.materialize_audio(reference).await,
        }
    }

    /// Copy the reference's byte stream into a fresh temp file under the
    /// cache directory. Always copies, even when the reference already names
    /// a real file.
    async fn materialize_audio(&self, reference: &MediaReference) -> MediaResult<ResolvedPath> {
        if !self.cache_dir.exists() {
            fs::create_dir_all(&self.cache_dir).await?;
        }

        let temp_path = tempfile::Builder::new()
            .prefix(AUDIO_TEMP_PREFIX)
            .suffix(AUDIO_TEMP_SUFFIX)
            .tempfile_in(&self.cache_dir)?
            .into_temp_path();

        let mut reader = self.store.open(reference).await?;
        let mut writer = fs::File::create(&temp_path).await?;
        let bytes = tokio::io::copy(&mut reader, &mut writer).await?;
        writer.flush().await?;

        info!(
            "Materialized audio reference {} -> {} ({} bytes)",
            reference,
            temp_path.display(),
            bytes
        );

        Ok(ResolvedPath::Temp(temp_path))
    }
}

/// Filesystem-backed media store: a reference is a plain path. The content
/// index has a row for every file that exists on disk.
#[derive(Debug, Clone, Default)]
pub struct FsMediaStore;

impl FsMediaStore {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ContentIndex for FsMediaStore {
    async fn data_path(
        &self,
        reference: &MediaReference,
        _kind: MediaKind,
    ) -> MediaResult<Option<PathBuf>> {
        let path = PathBuf::from(reference.as_str());
        if fs::try_exists(&path).await? {
            Ok(Some(path))
        } else {
            Ok(None)
        }
    }
}

#[async_trait]
impl ByteSource for FsMediaStore {
    async fn open(
        &self,
        reference: &MediaReference,
    ) -> MediaResult<Box<dyn AsyncRead + Send + Unpin>> {
        let file = fs::File::open(reference.as_str()).await?;
        Ok(Box::new(file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn resolver(cache: &TempDir) -> Resolver<FsMediaStore> {
        Resolver::new(FsMediaStore::new(), cache.path())
    }

    #[tokio::test]
    async fn test_resolve_video_returns_backing_path() {
        let cache = TempDir::new().unwrap();
        let media = TempDir::new().unwrap();
        let video = media.path().join("clip.mp4");
        fs::write(&video, b"not really a video").await.unwrap();

        let reference = MediaReference::new(video.to_string_lossy());
        let resolved = resolver(&cache)
            .resolve(&reference, MediaKind::Video)
            .await
            .unwrap();

        assert_eq!(resolved.path(), video);
        assert!(!resolved.is_temp());
    }

    #[tokio::test]
    async fn test_resolve_missing_row_is_not_found() {
        let cache = TempDir::new().unwrap();
        let reference = MediaReference::new("/no/such/file.jpg");

        let err = resolver(&cache)
            .resolve(&reference, MediaKind::Image)
            .await
            .unwrap_err();

        assert!(matches!(err, MediaError::ContentNotFound(_)));
    }

    #[tokio::test]
    async fn test_audio_is_always_copied_into_cache() {
        let cache = TempDir::new().unwrap();
        let media = TempDir::new().unwrap();
        let audio = media.path().join("track.mp3");
        fs::write(&audio, b"audio bytes").await.unwrap();

        // The reference names a real, directly usable file; a copy is made
        // regardless.
        let reference = MediaReference::new(audio.to_string_lossy());
        let resolved = resolver(&cache)
            .resolve(&reference, MediaKind::Audio)
            .await
            .unwrap();

        assert!(resolved.is_temp());
        assert_ne!(resolved.path(), audio);
        assert_eq!(resolved.path().parent().unwrap(), cache.path());
        assert_eq!(fs::read(resolved.path()).await.unwrap(), b"audio bytes");

        let name = resolved.path().file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("temp_audio"));
        assert!(name.ends_with(".mp3"));
    }

    #[tokio::test]
    async fn test_temp_copy_deleted_on_drop() {
        let cache = TempDir::new().unwrap();
        let media = TempDir::new().unwrap();
        let audio = media.path().join("track.mp3");
        fs::write(&audio, b"audio bytes").await.unwrap();

        let reference = MediaReference::new(audio.to_string_lossy());
        let resolved = resolver(&cache)
            .resolve(&reference, MediaKind::Audio)
            .await
            .unwrap();
        let copy_path = resolved.path().to_path_buf();

        assert!(copy_path.exists());
        drop(resolved);
        assert!(!copy_path.exists(), "temp copy should be deleted on drop");
        assert!(audio.exists(), "source file must never be deleted");
    }

    #[tokio::test]
    async fn test_audio_stream_open_failure_is_reported() {
        let cache = TempDir::new().unwrap();
        let reference = MediaReference::new("/no/such/track.mp3");

        let err = resolver(&cache)
            .resolve(&reference, MediaKind::Audio)
            .await
            .unwrap_err();

        assert!(matches!(err, MediaError::Io(_)));
    }
}
