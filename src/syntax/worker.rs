//! Background full-document scans
//!
//! Freshly loaded documents can be tokenized off the edit thread. The worker
//! only ever sees a text snapshot; results come back tagged with the
//! generation they were computed for, and the coordinator drops any result
//! whose generation is no longer current.

use std::io;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use super::catalog::SyntaxCatalog;
use super::token::Token;
use super::tokenizer::scan;

/// Snapshot of a document to tokenize in full
#[derive(Debug, Clone)]
pub struct ScanRequest {
    pub generation: u64,
    pub text: String,
}

/// Tokens for a whole document snapshot
#[derive(Debug, Clone)]
pub struct ScanResult {
    pub generation: u64,
    /// Char length of the scanned snapshot
    pub len: usize,
    pub tokens: Vec<Token>,
}

/// Tokenize a snapshot synchronously
pub fn run_full_scan(request: &ScanRequest, catalog: &SyntaxCatalog) -> ScanResult {
    ScanResult {
        generation: request.generation,
        len: request.text.chars().count(),
        tokens: scan(&request.text, 0, catalog.rules()),
    }
}

/// Dedicated scan thread fed through a channel
pub struct ScanWorker {
    request_tx: Option<Sender<ScanRequest>>,
    result_rx: Receiver<ScanResult>,
    handle: Option<JoinHandle<()>>,
}

impl ScanWorker {
    pub fn spawn(catalog: Arc<SyntaxCatalog>) -> io::Result<Self> {
        let (request_tx, request_rx) = mpsc::channel::<ScanRequest>();
        let (result_tx, result_rx) = mpsc::channel();

        let handle = thread::Builder::new()
            .name("livemark-scan".to_string())
            .spawn(move || {
                while let Ok(mut request) = request_rx.recv() {
                    // Only the newest snapshot matters
                    while let Ok(newer) = request_rx.try_recv() {
                        tracing::debug!(
                            skipped = request.generation,
                            next = newer.generation,
                            "coalescing queued scan requests"
                        );
                        request = newer;
                    }

                    let result = run_full_scan(&request, &catalog);
                    tracing::debug!(
                        generation = result.generation,
                        tokens = result.tokens.len(),
                        "background scan finished"
                    );
                    if result_tx.send(result).is_err() {
                        break;
                    }
                }
            })?;

        Ok(Self {
            request_tx: Some(request_tx),
            result_rx,
            handle: Some(handle),
        })
    }

    /// Queue a snapshot. Returns false if the worker has shut down.
    pub fn submit(&self, request: ScanRequest) -> bool {
        self.request_tx
            .as_ref()
            .is_some_and(|tx| tx.send(request).is_ok())
    }

    /// Poll for a finished scan (non-blocking)
    pub fn try_recv(&self) -> Option<ScanResult> {
        self.result_rx.try_recv().ok()
    }

    /// Stop accepting requests and wait for the thread to exit.
    /// Later `submit` calls return false.
    pub fn shutdown(&mut self) {
        // Closing the request channel ends the worker loop
        self.request_tx.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::warn!("scan worker panicked");
            }
        }
    }

    /// Wait up to `timeout` for a finished scan
    pub fn recv_timeout(&self, timeout: Duration) -> Option<ScanResult> {
        match self.result_rx.recv_timeout(timeout) {
            Ok(result) => Some(result),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }
}

impl Drop for ScanWorker {
    fn drop(&mut self) {
        self.shutdown();
    }
}
