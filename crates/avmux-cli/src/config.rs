//! CLI configuration.

use std::path::PathBuf;

/// CLI configuration.
#[derive(Debug, Clone)]
pub struct MuxConfig {
    /// Directory output files are written into unless overridden per run
    pub output_dir: PathBuf,
    /// Cache directory for materialized audio copies
    pub cache_dir: PathBuf,
}

impl Default for MuxConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("avmux_out"),
            cache_dir: std::env::temp_dir().join("avmux"),
        }
    }
}

impl MuxConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            output_dir: std::env::var("AVMUX_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
            cache_dir: std::env::var("AVMUX_CACHE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.cache_dir),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MuxConfig::default();
        assert_eq!(config.output_dir, PathBuf::from("avmux_out"));
        assert!(config.cache_dir.ends_with("avmux"));
    }
}
