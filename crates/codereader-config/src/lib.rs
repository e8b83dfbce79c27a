//! Configuration types for the indexing and search service
//!
//! Two layers are distinguished, matching how the system is actually configured:
//! - [`JobConfig`]: per-job tuning (batch size, chunking, embedding model, scan filters)
//!   that a caller may override per `POST /task` request, merged over
//!   [`JobConfig::default`].
//! - [`ApplicationConfig`]: process-wide settings read once from the environment at
//!   startup (database URIs, embedding provider credentials, HTTP port, log level).

pub mod error;
pub mod validation;

pub use error::{ConfigError, ConfigResult};
pub use validation::{Validate, validate_identifier, validate_non_empty, validate_port,
    validate_range, validate_url};

use serde::{Deserialize, Serialize};

/// Default number of files processed per batch.
pub const DEFAULT_BATCH_SIZE: u32 = 50;
/// Minimum allowed `batchSize`.
pub const MIN_BATCH_SIZE: u32 = 1;
/// Maximum allowed `batchSize`.
pub const MAX_BATCH_SIZE: u32 = 500;

/// Default chunk size, in tokens.
pub const DEFAULT_CHUNK_SIZE: u32 = 1000;
/// Minimum allowed `chunkSize`.
pub const MIN_CHUNK_SIZE: u32 = 500;
/// Maximum allowed `chunkSize`.
pub const MAX_CHUNK_SIZE: u32 = 1500;

/// Default chunk overlap, in tokens.
pub const DEFAULT_CHUNK_OVERLAP: u32 = 100;
/// Minimum allowed `chunkOverlap`.
pub const MIN_CHUNK_OVERLAP: u32 = 0;
/// Maximum allowed `chunkOverlap`.
pub const MAX_CHUNK_OVERLAP: u32 = 500;

/// Default embedding model name.
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";

/// Default maximum file size, in bytes, above which a file is skipped.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 1_048_576;

/// Default file extensions scanned by the indexer (case-insensitive).
pub fn default_extensions() -> Vec<String> {
    [
        ".js", ".ts", ".py", ".go", ".rs", ".java", ".cpp", ".c", ".h", ".md", ".json", ".yaml",
        ".yml",
    ]
    .iter()
    .map(|s| (*s).to_string())
    .collect()
}

/// Default directory names excluded from scanning.
pub fn default_exclude_dirs() -> Vec<String> {
    ["node_modules", ".git", "dist", "build"]
        .iter()
        .map(|s| (*s).to_string())
        .collect()
}

/// Per-job configuration controlling scanning, chunking and embedding.
///
/// Callers may supply a partial override via `POST /task`; unset fields fall back to
/// the default via [`JobConfig::merge_over_defaults`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobConfig {
    /// Number of files processed per batch.
    pub batch_size: u32,
    /// Target chunk size, in tokens.
    pub chunk_size: u32,
    /// Overlap between consecutive chunks, in tokens.
    pub chunk_overlap: u32,
    /// Embedding model identifier passed to the embedding provider.
    pub embedding_model: String,
    /// File extensions included in a scan (case-insensitive, leading dot).
    pub extensions: Vec<String>,
    /// Directory names excluded from a scan, matched against any path segment.
    pub exclude_dirs: Vec<String>,
    /// Maximum file size, in bytes; larger files are skipped.
    pub max_file_size: u64,
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_overlap: DEFAULT_CHUNK_OVERLAP,
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            extensions: default_extensions(),
            exclude_dirs: default_exclude_dirs(),
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }
}

/// A partial `JobConfig` as accepted on `POST /task`; every field is optional and
/// merged over [`JobConfig::default`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobConfigOverride {
    pub batch_size: Option<u32>,
    pub chunk_size: Option<u32>,
    pub chunk_overlap: Option<u32>,
    pub embedding_model: Option<String>,
    pub extensions: Option<Vec<String>>,
    pub exclude_dirs: Option<Vec<String>>,
    pub max_file_size: Option<u64>,
}

impl JobConfig {
    /// Merge an optional partial override over the default configuration, then validate.
    ///
    /// # Errors
    /// Returns `ConfigError::OutOfRange` if a numeric field falls outside its allowed range.
    pub fn merge_over_defaults(over: Option<JobConfigOverride>) -> ConfigResult<Self> {
        let defaults = Self::default();
        let Some(over) = over else {
            return Ok(defaults);
        };
        let merged = Self {
            batch_size: over.batch_size.unwrap_or(defaults.batch_size),
            chunk_size: over.chunk_size.unwrap_or(defaults.chunk_size),
            chunk_overlap: over.chunk_overlap.unwrap_or(defaults.chunk_overlap),
            embedding_model: over.embedding_model.unwrap_or(defaults.embedding_model),
            extensions: over.extensions.unwrap_or(defaults.extensions),
            exclude_dirs: over.exclude_dirs.unwrap_or(defaults.exclude_dirs),
            max_file_size: over.max_file_size.unwrap_or(defaults.max_file_size),
        };
        merged.validate()?;
        Ok(merged)
    }

    /// The recommended maximum file count for a job at this chunk size.
    ///
    /// `max(10, floor(200_000 / (chunkSize * 1.5)))`
    #[must_use]
    pub fn recommended_file_limit(&self) -> u64 {
        let denom = f64::from(self.chunk_size) * 1.5;
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let computed = (200_000.0 / denom).floor() as u64;
        computed.max(10)
    }
}

impl Validate for JobConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_range(
            u64::from(self.batch_size),
            u64::from(MIN_BATCH_SIZE),
            u64::from(MAX_BATCH_SIZE),
            "batchSize",
        )?;
        validate_range(
            u64::from(self.chunk_size),
            u64::from(MIN_CHUNK_SIZE),
            u64::from(MAX_CHUNK_SIZE),
            "chunkSize",
        )?;
        validate_range(
            u64::from(self.chunk_overlap),
            u64::from(MIN_CHUNK_OVERLAP),
            u64::from(MAX_CHUNK_OVERLAP),
            "chunkOverlap",
        )?;
        validate_non_empty(&self.embedding_model, "embeddingModel")?;
        Ok(())
    }
}

/// Process-wide configuration sourced from the environment at startup.
#[derive(Debug, Clone)]
pub struct ApplicationConfig {
    /// Candidate MongoDB connection URIs, in priority order.
    ///
    /// `MONGODB_URI` (legacy single-URI) takes priority if set; otherwise
    /// `MONGODB_ATLAS_URI` then `MONGODB_LOCAL_URI`, whichever are present.
    pub mongodb_uris: Vec<String>,
    /// API key for the embedding provider.
    pub openai_api_key: String,
    /// Optional override for the embedding provider's base URL.
    pub openai_base_url: Option<String>,
    /// HTTP port the API server listens on.
    pub port: u16,
    /// Log level passed to the tracing subscriber (e.g. "info", "debug").
    pub log_level: String,
}

/// Default HTTP port when `CODE_READER_PORT` is unset.
pub const DEFAULT_PORT: u16 = 3000;
/// Default log level when `LOG_LEVEL` is unset.
pub const DEFAULT_LOG_LEVEL: &str = "info";

impl ApplicationConfig {
    /// Load configuration from process environment variables.
    ///
    /// # Errors
    /// Returns `ConfigError::MissingField` if no MongoDB URI candidate or
    /// `OPENAI_API_KEY` is present, and `ConfigError::InvalidPort` if
    /// `CODE_READER_PORT` is set but not a valid non-zero `u16`.
    pub fn from_env() -> ConfigResult<Self> {
        let mongodb_uris = Self::mongodb_uri_candidates();
        if mongodb_uris.is_empty() {
            return Err(ConfigError::MissingField {
                field: "MONGODB_URI|MONGODB_ATLAS_URI|MONGODB_LOCAL_URI".to_string(),
            });
        }

        let openai_api_key =
            std::env::var("OPENAI_API_KEY").map_err(|_| ConfigError::MissingField {
                field: "OPENAI_API_KEY".to_string(),
            })?;
        validate_non_empty(&openai_api_key, "OPENAI_API_KEY")?;

        let openai_base_url = std::env::var("OPENAI_BASE_URL")
            .ok()
            .filter(|s| !s.is_empty());

        let port = match std::env::var("CODE_READER_PORT") {
            Ok(raw) => {
                let parsed: u16 = raw
                    .parse()
                    .map_err(|_| ConfigError::InvalidPort { port: 0 })?;
                validate_port(parsed, "CODE_READER_PORT")?;
                parsed
            }
            Err(_) => DEFAULT_PORT,
        };

        let log_level =
            std::env::var("LOG_LEVEL").unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string());

        Ok(Self {
            mongodb_uris,
            openai_api_key,
            openai_base_url,
            port,
            log_level,
        })
    }

    fn mongodb_uri_candidates() -> Vec<String> {
        if let Ok(uri) = std::env::var("MONGODB_URI") {
            if !uri.is_empty() {
                return vec![uri];
            }
        }
        let mut candidates = Vec::new();
        if let Ok(uri) = std::env::var("MONGODB_ATLAS_URI") {
            if !uri.is_empty() {
                candidates.push(uri);
            }
        }
        if let Ok(uri) = std::env::var("MONGODB_LOCAL_URI") {
            if !uri.is_empty() {
                candidates.push(uri);
            }
        }
        candidates
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_job_config_matches_documented_defaults() {
        let config = JobConfig::default();
        assert_eq!(config.batch_size, 50);
        assert_eq!(config.chunk_size, 1000);
        assert_eq!(config.chunk_overlap, 100);
        assert_eq!(config.embedding_model, "text-embedding-3-small");
        assert_eq!(config.max_file_size, 1_048_576);
        assert_eq!(
            config.exclude_dirs,
            vec!["node_modules", ".git", "dist", "build"]
        );
    }

    #[test]
    fn merge_over_defaults_with_none_returns_defaults() {
        let config = JobConfig::merge_over_defaults(None).expect("defaults always validate");
        assert_eq!(config, JobConfig::default());
    }

    #[test]
    fn merge_over_defaults_applies_partial_override() {
        let over = JobConfigOverride {
            chunk_size: Some(750),
            ..Default::default()
        };
        let config = JobConfig::merge_over_defaults(Some(over)).expect("valid override");
        assert_eq!(config.chunk_size, 750);
        assert_eq!(config.batch_size, DEFAULT_BATCH_SIZE);
    }

    #[test]
    fn merge_over_defaults_rejects_out_of_range_value() {
        let over = JobConfigOverride {
            chunk_size: Some(50),
            ..Default::default()
        };
        let result = JobConfig::merge_over_defaults(Some(over));
        assert!(matches!(result, Err(ConfigError::OutOfRange { .. })));
    }

    #[test]
    fn recommended_file_limit_matches_worked_example() {
        let config = JobConfig::default();
        assert_eq!(config.recommended_file_limit(), 133);
    }

    #[test]
    fn recommended_file_limit_has_a_floor_of_ten() {
        let config = JobConfig {
            chunk_size: MAX_CHUNK_SIZE,
            ..JobConfig::default()
        };
        assert!(config.recommended_file_limit() >= 10);
    }
}
