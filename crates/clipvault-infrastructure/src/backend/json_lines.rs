//! Backend client speaking the JSON-lines protocol over any byte stream.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use clipvault_core::error::{ClipvaultError, Result};
use clipvault_core::search::{
    ClipSearchBackend, Predicate, ResultFragment, ResultSender, SessionId,
};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::{Mutex, oneshot};
use tokio::task::JoinHandle;

use super::wire::{BackendMessage, BackendRequest, decode_message, encode_request};

type BoxedWriter = Box<dyn AsyncWrite + Send + Unpin>;

/// Where incoming messages are delivered.
#[derive(Default)]
struct Routes {
    /// Result channel of every session whose stream has not ended.
    sessions: Mutex<HashMap<SessionId, ResultSender>>,
    /// Label requests waiting for their reply.
    pending_labels: Mutex<HashMap<u64, oneshot::Sender<Vec<String>>>>,
    closed: AtomicBool,
}

/// [`ClipSearchBackend`] over a pair of async byte streams.
///
/// Requests are written as JSON lines. A reader task routes every incoming
/// `fragment` to the result channel registered for its session, and drops
/// that channel when the backend announces `sessionEnd`. When the stream
/// closes all channels are dropped, which ends every listener.
pub struct JsonLinesBackend {
    writer: Mutex<BoxedWriter>,
    routes: Arc<Routes>,
    next_request_id: AtomicU64,
    request_timeout: Duration,
    reader: JoinHandle<()>,
}

impl JsonLinesBackend {
    /// Starts the reader task on `reader` and sends requests on `writer`.
    pub fn new<R, W>(reader: R, writer: W, request_timeout: Duration) -> Self
    where
        R: AsyncRead + Send + Unpin + 'static,
        W: AsyncWrite + Send + Unpin + 'static,
    {
        let routes = Arc::new(Routes::default());
        let reader = tokio::spawn(read_loop(reader, routes.clone()));

        Self {
            writer: Mutex::new(Box::new(writer)),
            routes,
            next_request_id: AtomicU64::new(1),
            request_timeout,
            reader,
        }
    }

    /// True once the backend's output stream ended.
    pub fn is_closed(&self) -> bool {
        self.routes.closed.load(Ordering::SeqCst)
    }

    /// Number of sessions whose result stream is still open.
    pub async fn open_sessions(&self) -> usize {
        self.routes.sessions.lock().await.len()
    }

    async fn send(&self, request: &BackendRequest) -> Result<()> {
        if self.is_closed() {
            return Err(ClipvaultError::backend("backend connection closed"));
        }

        let line = encode_request(request)?;
        let mut writer = self.writer.lock().await;
        writer
            .write_all(line.as_bytes())
            .await
            .map_err(|e| ClipvaultError::backend(format!("failed to write request: {e}")))?;
        writer
            .flush()
            .await
            .map_err(|e| ClipvaultError::backend(format!("failed to flush request: {e}")))
    }
}

impl Drop for JsonLinesBackend {
    fn drop(&mut self) {
        self.reader.abort();
    }
}

#[async_trait]
impl ClipSearchBackend for JsonLinesBackend {
    async fn search(
        &self,
        session_id: SessionId,
        predicates: Vec<Predicate>,
        results: ResultSender,
    ) -> Result<()> {
        // Registered first so fragments racing the write are not lost.
        self.routes.sessions.lock().await.insert(session_id, results);

        let request = BackendRequest::Search {
            session_id,
            constraints: predicates,
        };
        if let Err(e) = self.send(&request).await {
            self.routes.sessions.lock().await.remove(&session_id);
            return Err(e);
        }

        tracing::debug!(session_id = %session_id, "search request sent");
        Ok(())
    }

    async fn list_labels(&self) -> Result<Vec<String>> {
        let request_id = self.next_request_id.fetch_add(1, Ordering::SeqCst);
        let (tx, rx) = oneshot::channel();
        self.routes.pending_labels.lock().await.insert(request_id, tx);

        if let Err(e) = self.send(&BackendRequest::ListLabels { request_id }).await {
            self.routes.pending_labels.lock().await.remove(&request_id);
            return Err(e);
        }

        match tokio::time::timeout(self.request_timeout, rx).await {
            Ok(Ok(labels)) => Ok(labels),
            Ok(Err(_)) => Err(ClipvaultError::backend(
                "backend closed before answering label request",
            )),
            Err(_) => {
                self.routes.pending_labels.lock().await.remove(&request_id);
                Err(ClipvaultError::backend(format!(
                    "label request timed out after {}ms",
                    self.request_timeout.as_millis()
                )))
            }
        }
    }
}

async fn read_loop<R>(reader: R, routes: Arc<Routes>)
where
    R: AsyncRead + Send + Unpin + 'static,
{
    let mut reader = BufReader::new(reader);
    let mut line = Vec::new();

    // Lines are read as bytes so a line that is not UTF-8 is skipped like any
    // other undecodable line. Only EOF or a read error ends the connection.
    loop {
        line.clear();
        match reader.read_until(b'\n', &mut line).await {
            Ok(0) => {
                tracing::info!("backend output closed");
                break;
            }
            Ok(_) => {
                if line.iter().all(u8::is_ascii_whitespace) {
                    continue;
                }
                match decode_message(&line) {
                    Ok(message) => route(message, &routes).await,
                    Err(e) => tracing::warn!(error = %e, "ignoring backend line"),
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to read from backend");
                break;
            }
        }
    }

    routes.closed.store(true, Ordering::SeqCst);
    routes.sessions.lock().await.clear();
    routes.pending_labels.lock().await.clear();
}

async fn route(message: BackendMessage, routes: &Routes) {
    match message {
        BackendMessage::Fragment { session_id, clip } => {
            let mut sessions = routes.sessions.lock().await;
            let delivered = match sessions.get(&session_id) {
                Some(tx) => tx.send(ResultFragment::new(session_id, clip)).is_ok(),
                None => {
                    tracing::debug!(session_id = %session_id, "fragment for unknown session dropped");
                    return;
                }
            };
            if !delivered {
                sessions.remove(&session_id);
            }
        }
        BackendMessage::SessionEnd { session_id } => {
            routes.sessions.lock().await.remove(&session_id);
            tracing::debug!(session_id = %session_id, "backend ended session");
        }
        BackendMessage::Labels { request_id, labels } => {
            match routes.pending_labels.lock().await.remove(&request_id) {
                Some(tx) => {
                    let _ = tx.send(labels);
                }
                None => tracing::debug!(request_id, "unexpected label reply"),
            }
        }
        BackendMessage::Error {
            session_id,
            message,
        } => {
            tracing::warn!(session_id = ?session_id, %message, "backend reported an error");
        }
    }
}
