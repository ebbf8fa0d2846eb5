//! Upload notifications drained by a background consumer.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{error, info};

use super::domain::DocumentId;
use super::processing::{DocumentProcessor, DocumentReport, ProcessingError};
use super::repository::{ApplicationRepository, DocumentRepository};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentEvent {
    Created { document_id: DocumentId },
}

/// Returned when the consumer has already shut down.
#[derive(Debug, thiserror::Error)]
#[error("document event queue is closed")]
pub struct QueueClosed;

/// Cloneable handle held by the ingestion side.
#[derive(Debug, Clone)]
pub struct EventSender {
    inner: mpsc::UnboundedSender<DocumentEvent>,
}

impl EventSender {
    pub fn document_created(&self, document_id: DocumentId) -> Result<(), QueueClosed> {
        self.inner
            .send(DocumentEvent::Created { document_id })
            .map_err(|_| QueueClosed)
    }
}

#[derive(Debug)]
pub struct EventReceiver {
    inner: mpsc::UnboundedReceiver<DocumentEvent>,
}

pub fn channel() -> (EventSender, EventReceiver) {
    let (inner_tx, inner_rx) = mpsc::unbounded_channel();
    (
        EventSender { inner: inner_tx },
        EventReceiver { inner: inner_rx },
    )
}

/// Handle one event synchronously.
pub fn handle_event<A, D>(
    processor: &DocumentProcessor<A, D>,
    event: &DocumentEvent,
) -> Result<DocumentReport, ProcessingError>
where
    A: ApplicationRepository + 'static,
    D: DocumentRepository + 'static,
{
    match event {
        DocumentEvent::Created { document_id } => processor.process_document(document_id),
    }
}

/// Drain the queue until every sender is dropped, running each event on a blocking worker.
/// Failures are logged and never stop later events. Returns the number of events handled.
pub async fn run_consumer<A, D>(
    processor: Arc<DocumentProcessor<A, D>>,
    mut receiver: EventReceiver,
) -> usize
where
    A: ApplicationRepository + 'static,
    D: DocumentRepository + 'static,
{
    let mut handled = 0;
    while let Some(event) = receiver.inner.recv().await {
        let worker = Arc::clone(&processor);
        let job = event.clone();
        let result = tokio::task::spawn_blocking(move || handle_event(&worker, &job)).await;

        match result {
            Ok(Ok(report)) => {
                info!(document_id = %report.document_id, outcome = ?report.outcome, "document event handled");
            }
            Ok(Err(err)) => {
                error!(?event, error = %err, "document event failed");
            }
            Err(join_err) => {
                error!(?event, error = %join_err, "document worker panicked");
            }
        }
        handled += 1;
    }
    handled
}
