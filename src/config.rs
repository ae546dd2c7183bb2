//! Scan configuration.

use crate::analysis::{AnalysisError, AnalysisResult};

/// Default prefix of webpack's chunk-loading global (`webpackChunk<project>`).
pub const DEFAULT_WEBPACK_CHUNK_PREFIX: &str = "webpackChunk";

/// Default file name pattern of rolldown's runtime helper module.
pub const DEFAULT_ROLLDOWN_RUNTIME_PATTERN: &str = r"rolldown-runtime\.[a-zA-Z0-9]+\.mjs$";

/// Settings shared by every analyzer in a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanConfig {
    /// Global names starting with this prefix are treated as webpack chunk arrays.
    pub webpack_chunk_prefix: String,
    /// Charge duplicated module factories in bytes as well as by count.
    pub track_duplicate_bytes: bool,
    /// Regex matched against script identifiers to spot the rolldown runtime.
    pub rolldown_runtime_pattern: String,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            webpack_chunk_prefix: DEFAULT_WEBPACK_CHUNK_PREFIX.to_string(),
            track_duplicate_bytes: true,
            rolldown_runtime_pattern: DEFAULT_ROLLDOWN_RUNTIME_PATTERN.to_string(),
        }
    }
}

impl ScanConfig {
    /// Check the configuration before any analyzer is built from it.
    pub fn validate(&self) -> AnalysisResult<()> {
        if self.webpack_chunk_prefix.trim().is_empty() {
            return Err(AnalysisError::InvalidConfig(
                "webpack chunk prefix must not be empty".to_string(),
            ));
        }
        if self.rolldown_runtime_pattern.is_empty() {
            return Err(AnalysisError::InvalidConfig(
                "rolldown runtime pattern must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ScanConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.webpack_chunk_prefix, "webpackChunk");
        assert!(config.track_duplicate_bytes);
    }

    #[test]
    fn test_empty_prefix_rejected() {
        let config = ScanConfig {
            webpack_chunk_prefix: "  ".to_string(),
            ..ScanConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(AnalysisError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_empty_runtime_pattern_rejected() {
        let config = ScanConfig {
            rolldown_runtime_pattern: String::new(),
            ..ScanConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
