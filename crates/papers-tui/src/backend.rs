use std::path::PathBuf;
use std::sync::Arc;

use papers_core::upload;
use papers_core::{CourseIndex, PaperCatalog, PapersService};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::tui_event::{BackendCommand, BackendEvent};

/// Receive commands until the channel closes or `cancel` fires. Each command
/// runs on its own task so a slow download never holds up a page load.
pub async fn run_listener(
    service: Arc<dyn PapersService>,
    download_dir: PathBuf,
    mut cmd_rx: mpsc::UnboundedReceiver<BackendCommand>,
    event_tx: mpsc::UnboundedSender<BackendEvent>,
    cancel: CancellationToken,
) {
    loop {
        let cmd = tokio::select! {
            _ = cancel.cancelled() => break,
            cmd = cmd_rx.recv() => match cmd {
                Some(cmd) => cmd,
                None => break,
            },
        };
        let service = Arc::clone(&service);
        let tx = event_tx.clone();
        let download_dir = download_dir.clone();
        tokio::spawn(async move {
            let event = execute(service.as_ref(), &download_dir, cmd).await;
            // The UI may already be gone during shutdown.
            let _ = tx.send(event);
        });
    }
}

/// Run one command to completion and describe the outcome.
pub async fn execute(
    service: &dyn PapersService,
    download_dir: &std::path::Path,
    cmd: BackendCommand,
) -> BackendEvent {
    match cmd {
        BackendCommand::LoadCourses { request_id } => {
            let result = CourseIndex::load(service)
                .await
                .map(|index| index.courses)
                .map_err(|e| {
                    tracing::warn!(error = %e, "course index fetch failed");
                    e.to_string()
                });
            BackendEvent::CoursesLoaded { request_id, result }
        }
        BackendCommand::LoadPapers { request_id, scope } => {
            let result = PaperCatalog::load(service, scope).await.map_err(|e| {
                tracing::warn!(error = %e, "paper catalog fetch failed");
                e.to_string()
            });
            BackendEvent::PapersLoaded { request_id, result }
        }
        BackendCommand::Download { filename } => {
            let result = service
                .download(&filename, download_dir)
                .await
                .map_err(|e| {
                    tracing::warn!(filename, error = %e, "download failed");
                    e.to_string()
                });
            BackendEvent::DownloadFinished { filename, result }
        }
        BackendCommand::Upload { form } => {
            let result = upload::submit(service, &form)
                .await
                .map_err(|e| e.to_string());
            BackendEvent::UploadFinished { result }
        }
    }
}
