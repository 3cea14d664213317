use std::{path::Path, time::Duration};

use fractic_server_error::ServerError;
use futures::{
    stream::{self, StreamExt},
    TryStreamExt,
};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::{
    domain::{
        logic::{batch_state::BatchState, month_detector::MonthDetector},
        repositories::extraction_repository::ExtractionRepository,
    },
    entities::{
        AccountRules, BatchFile, BatchFileId, BatchSummary, FilePayload, ImportConfig,
        ImportResult, DEFAULT_INTER_FILE_DELAY,
    },
    errors::ReadError,
};

/// Owns a batch of statement PDFs and drives them through extraction, one
/// file at a time.
///
/// All operations take `&self`; share the coordinator behind an `Arc` to
/// observe or mutate the batch while `process_all` is running.
pub struct BatchCoordinator<R: ExtractionRepository> {
    repository: R,
    detector: MonthDetector,
    inter_file_delay: Duration,
    state: Mutex<BatchState>,
}

impl<R: ExtractionRepository> BatchCoordinator<R> {
    pub fn new(repository: R, config: &ImportConfig) -> Self {
        Self::with_settings(
            repository,
            config.account_rules.clone(),
            config.inter_file_delay,
        )
    }

    pub fn with_settings(
        repository: R,
        account_rules: AccountRules,
        inter_file_delay: Duration,
    ) -> Self {
        Self {
            repository,
            detector: MonthDetector::new(account_rules),
            inter_file_delay,
            state: Mutex::new(BatchState::default()),
        }
    }

    pub fn with_repository(repository: R) -> Self {
        Self::with_settings(repository, AccountRules::default(), DEFAULT_INTER_FILE_DELAY)
    }

    // Batch contents.
    // ---

    /// Admits the PDFs among `files`; anything else is silently skipped.
    /// Returns the number of files admitted.
    pub async fn add_files(&self, files: Vec<FilePayload>) -> usize {
        let admitted = self.state.lock().await.add_files(files, &self.detector);
        debug!(admitted, "files added to batch");
        admitted
    }

    /// Reads the given files from disk and admits the PDFs among them.
    pub async fn add_paths<P>(&self, paths: Vec<P>) -> Result<usize, ServerError>
    where
        P: AsRef<Path> + Send,
    {
        let payloads = stream::iter(paths)
            .then(|path| async move { read_payload(path.as_ref()).await })
            .try_collect::<Vec<_>>()
            .await?;
        Ok(self.add_files(payloads).await)
    }

    pub async fn remove_file(&self, id: &BatchFileId) -> bool {
        self.state.lock().await.remove(id)
    }

    /// Empties the batch. A running `process_all` stops at its next
    /// suspension point; an extraction already in flight completes, but its
    /// outcome is dropped.
    pub async fn clear(&self) {
        self.state.lock().await.clear();
    }

    pub async fn files(&self) -> Vec<BatchFile> {
        self.state.lock().await.files().to_vec()
    }

    pub async fn file(&self, id: &BatchFileId) -> Option<BatchFile> {
        self.state.lock().await.file(id).cloned()
    }

    pub async fn is_processing(&self) -> bool {
        self.state.lock().await.is_processing()
    }

    pub async fn active_index(&self) -> Option<usize> {
        self.state.lock().await.active_index()
    }

    pub async fn summary(&self) -> BatchSummary {
        self.state.lock().await.summary()
    }

    // Processing.
    // ---

    /// Extracts a single pending file. Returns whether an outcome was
    /// recorded; failures are recorded on the file, never returned.
    pub async fn process_file(&self, id: &BatchFileId) -> bool {
        let payload = {
            let mut state = self.state.lock().await;
            match state.begin_processing(id) {
                Some(payload) => payload,
                None => return false,
            }
        };

        debug!(file = %id, "sending file for extraction");
        let outcome = self.repository.extract(&payload).await;

        let status = self.state.lock().await.complete(id, outcome);
        if status.is_none() {
            debug!(file = %id, "file left the batch during extraction, outcome dropped");
        }
        status.is_some()
    }

    /// Extracts every pending file, in batch order as of this call, waiting
    /// for each extraction before starting the next and pausing between
    /// files. Files in any other status are skipped. Failed files are not
    /// retried.
    ///
    /// Only one run is admitted at a time; a second call while a run is in
    /// progress returns immediately with the current summary.
    pub async fn process_all(&self) -> BatchSummary {
        let ticket = {
            let mut state = self.state.lock().await;
            match state.begin_run() {
                Some(ticket) => ticket,
                None => {
                    warn!("batch is already being processed");
                    return state.summary();
                }
            }
        };
        info!(run = ticket.run_id, files = ticket.ids.len(), "processing batch");

        let last = ticket.ids.len().saturating_sub(1);
        for (i, id) in ticket.ids.iter().enumerate() {
            if ticket.cancel.is_cancelled() {
                break;
            }
            if !self.state.lock().await.activate(id) {
                continue;
            }

            self.process_file(id).await;

            if ticket.cancel.is_cancelled() {
                break;
            }
            if i < last {
                tokio::select! {
                    _ = tokio::time::sleep(self.inter_file_delay) => {}
                    _ = ticket.cancel.cancelled() => break,
                }
            }
        }

        let mut state = self.state.lock().await;
        state.finish_run(ticket.run_id);
        let summary = state.summary();
        if ticket.cancel.is_cancelled() {
            info!(run = ticket.run_id, "batch run cancelled");
        } else {
            info!(
                run = ticket.run_id,
                completed = summary.completed,
                failed = summary.failed,
                transactions = summary.total_transactions,
                "batch run finished"
            );
        }
        summary
    }

    /// Resets a failed (or done) file to pending and extracts it again, on
    /// its own. Runs independently of `process_all`; a file that is being
    /// processed right now is refused.
    pub async fn retry_file(&self, id: &BatchFileId) -> Result<(), ServerError> {
        self.state.lock().await.reset_for_retry(id)?;
        info!(file = %id, "retrying extraction");
        self.process_file(id).await;
        Ok(())
    }

    /// Records the outcome of committing a done file's rows.
    pub async fn mark_imported(
        &self,
        id: &BatchFileId,
        import_result: ImportResult,
    ) -> Result<(), ServerError> {
        self.state.lock().await.mark_imported(id, import_result)
    }
}

async fn read_payload(path: &Path) -> Result<FilePayload, ServerError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| ReadError::with_debug(&path.display().to_string(), &e))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(FilePayload::new(name, None, bytes))
}
