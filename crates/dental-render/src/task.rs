//! Background document export.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::time::Instant;

use tracing::{info, info_span, warn};

use dental_model::{Dataset, Report, ReportOptions};

use crate::document::{DocumentControl, StaticDocument, render_document_with};
use crate::error::RenderError;

/// Messages sent from the export thread.
#[derive(Debug)]
pub enum DocumentUpdate {
    Progress { page: usize, total: usize },
    Complete(StaticDocument),
    Cancelled,
    Error(String),
}

/// Handle to a running export. Cloning shares the cancel flag.
#[derive(Debug, Clone, Default)]
pub struct ExportHandle {
    cancel_flag: Arc<AtomicBool>,
}

impl ExportHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancel_flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel_flag.load(Ordering::SeqCst)
    }

    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel_flag)
    }
}

/// Spawn a background thread that renders the document.
///
/// Progress and the outcome are sent on `sender`; the finished document is
/// handed over once in [`DocumentUpdate::Complete`].
pub fn spawn_document_export(
    report: Report,
    dataset: Arc<Dataset>,
    options: ReportOptions,
    sender: Sender<DocumentUpdate>,
) -> ExportHandle {
    let handle = ExportHandle::new();
    let cancel_flag = handle.cancel_flag();

    std::thread::spawn(move || {
        let span = info_span!("export", records = dataset.len());
        let _guard = span.enter();
        let started = Instant::now();
        let progress_sender = sender.clone();
        let control = DocumentControl::new()
            .with_cancel_flag(Arc::clone(&cancel_flag))
            .with_progress(move |page, total| {
                progress_sender
                    .send(DocumentUpdate::Progress { page, total })
                    .ok();
            });
        match render_document_with(&report, &dataset, &options, control) {
            Ok(document) => {
                info!(
                    pages = document.page_count(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "document export complete"
                );
                let _ = sender.send(DocumentUpdate::Complete(document));
            }
            Err(RenderError::Cancelled) => {
                info!("document export cancelled");
                let _ = sender.send(DocumentUpdate::Cancelled);
            }
            Err(error) => {
                warn!(%error, "document export failed");
                let _ = sender.send(DocumentUpdate::Error(error.to_string()));
            }
        }
    });

    handle
}
