//! Backend running as a child process.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use clipvault_core::config::BackendConfig;
use clipvault_core::error::{ClipvaultError, Result};
use clipvault_core::search::{ClipSearchBackend, Predicate, ResultSender, SessionId};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, Command};

use super::JsonLinesBackend;

/// Spawns the configured backend executable and speaks JSON lines over its
/// stdin/stdout. The backend's stderr is forwarded to the log.
///
/// The child is killed when this value is dropped.
pub struct ProcessSearchBackend {
    inner: JsonLinesBackend,
    child: Child,
}

impl ProcessSearchBackend {
    pub fn spawn(config: &BackendConfig) -> Result<Self> {
        tracing::info!(command = %config.command, args = ?config.args, "spawning search backend");

        let mut child = Command::new(&config.command)
            .args(&config.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                ClipvaultError::backend(format!("failed to spawn {}: {}", config.command, e))
            })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| ClipvaultError::internal("backend stdin not captured"))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| ClipvaultError::internal("backend stdout not captured"))?;

        if let Some(stderr) = child.stderr.take() {
            tokio::spawn(async move {
                let mut lines = BufReader::new(stderr).lines();
                while let Ok(Some(line)) = lines.next_line().await {
                    tracing::debug!(target: "clipvault::backend", "{}", line);
                }
            });
        }

        let inner = JsonLinesBackend::new(
            stdout,
            stdin,
            Duration::from_millis(config.request_timeout_ms),
        );
        Ok(Self { inner, child })
    }

    /// OS process id of the backend, if it is still running.
    pub fn pid(&self) -> Option<u32> {
        self.child.id()
    }
}

#[async_trait]
impl ClipSearchBackend for ProcessSearchBackend {
    async fn search(
        &self,
        session_id: SessionId,
        predicates: Vec<Predicate>,
        results: ResultSender,
    ) -> Result<()> {
        self.inner.search(session_id, predicates, results).await
    }

    async fn list_labels(&self) -> Result<Vec<String>> {
        self.inner.list_labels().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_spawn_missing_executable_is_backend_error() {
        let config = BackendConfig {
            command: "clipvault-backend-that-does-not-exist".to_string(),
            ..BackendConfig::default()
        };

        let err = ProcessSearchBackend::spawn(&config).err().unwrap();
        assert!(err.is_backend());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_labels_from_scripted_process() {
        // A shell backend that answers the first request with a fixed label list.
        let config = BackendConfig {
            command: "sh".to_string(),
            args: vec![
                "-c".to_string(),
                r#"read line; echo '{"type":"labels","requestId":1,"labels":["pinned"]}'; sleep 1"#
                    .to_string(),
            ],
            request_timeout_ms: 2_000,
        };

        let backend = ProcessSearchBackend::spawn(&config).unwrap();
        assert!(backend.pid().is_some());
        assert_eq!(backend.list_labels().await.unwrap(), vec!["pinned".to_string()]);
    }
}
