use serde::{Deserialize, Serialize};

use crate::search::MatchMode;

/// Default number of results the backend is asked for per session.
pub const DEFAULT_RESULT_LIMIT: usize = 30;

/// Root of `config.toml`.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct RootConfig {
    pub search: SearchConfig,
    pub backend: BackendConfig,
    pub log: LogConfig,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SearchConfig {
    /// Result cap emitted as the leading `limit` predicate.
    pub result_limit: usize,
    /// Match mode a freshly mounted view starts with.
    pub default_mode: MatchMode,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            result_limit: DEFAULT_RESULT_LIMIT,
            default_mode: MatchMode::Contains,
        }
    }
}

/// How to reach the external search backend.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct BackendConfig {
    /// Executable spawned as the backend process.
    pub command: String,
    pub args: Vec<String>,
    /// How long to wait for replies to request/response messages (label enumeration).
    pub request_timeout_ms: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            command: "clipvault-backend".to_string(),
            args: Vec::new(),
            request_timeout_ms: 5_000,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct LogConfig {
    /// Default filter directive, overridden by `RUST_LOG`.
    pub level: String,
    /// Also write a daily rolling log file under the logs directory.
    pub file: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_yields_defaults() {
        let config: RootConfig = toml::from_str("").unwrap();
        assert_eq!(config, RootConfig::default());
        assert_eq!(config.search.result_limit, 30);
        assert_eq!(config.search.default_mode, MatchMode::Contains);
    }

    #[test]
    fn test_partial_sections_keep_other_defaults() {
        let config: RootConfig = toml::from_str(
            r#"
[search]
default_mode = "fuzzy"

[backend]
command = "/usr/local/bin/clip-daemon"
args = ["--stdio"]
"#,
        )
        .unwrap();

        assert_eq!(config.search.result_limit, DEFAULT_RESULT_LIMIT);
        assert_eq!(config.search.default_mode, MatchMode::Fuzzy);
        assert_eq!(config.backend.command, "/usr/local/bin/clip-daemon");
        assert_eq!(config.backend.args, vec!["--stdio".to_string()]);
        assert_eq!(config.backend.request_timeout_ms, 5_000);
        assert_eq!(config.log.level, "info");
    }
}
