use std::iter;

use chrono::Utc;
use fractic_server_error::ServerError;
use rand::{distributions::Alphanumeric, Rng as _};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::{
    domain::{
        entities::extraction::{DEFAULT_FAILURE_MESSAGE, DEFAULT_REJECTION_MESSAGE},
        logic::month_detector::{refine_period, MonthDetector},
    },
    entities::{
        BatchFile, BatchFileId, BatchFileStatus, BatchSummary, ExtractionOutcome, FilePayload,
        ImportResult,
    },
    errors::{BatchFileBusy, BatchFileNotFound, InvalidStatusTransition},
};

const ID_SUFFIX_LEN: usize = 7;

/// The run currently driving the batch. Dropped (and cancelled) by `clear`.
#[derive(Debug)]
struct ActiveRun {
    id: u64,
    cancel: CancellationToken,
}

/// A run admitted by `begin_run`: the ids to visit, in batch order at the
/// time of the call.
#[derive(Debug)]
pub(crate) struct RunTicket {
    pub(crate) run_id: u64,
    pub(crate) cancel: CancellationToken,
    pub(crate) ids: Vec<BatchFileId>,
}

/// Mutable batch state. Only ever touched under the coordinator's lock, and
/// never across an await.
#[derive(Debug, Default)]
pub(crate) struct BatchState {
    files: Vec<BatchFile>,
    run: Option<ActiveRun>,
    active_index: Option<usize>,
    runs_started: u64,
}

impl BatchState {
    pub(crate) fn files(&self) -> &[BatchFile] {
        &self.files
    }

    pub(crate) fn file(&self, id: &BatchFileId) -> Option<&BatchFile> {
        self.files.iter().find(|f| &f.id == id)
    }

    fn file_mut(&mut self, id: &BatchFileId) -> Option<&mut BatchFile> {
        self.files.iter_mut().find(|f| &f.id == id)
    }

    pub(crate) fn is_processing(&self) -> bool {
        self.run.is_some()
    }

    pub(crate) fn active_index(&self) -> Option<usize> {
        self.active_index
    }

    pub(crate) fn summary(&self) -> BatchSummary {
        BatchSummary::of(&self.files)
    }

    // Admission.
    // ---

    /// Admits the PDF payloads, then re-sorts the whole batch. Returns how
    /// many files were admitted.
    pub(crate) fn add_files(
        &mut self,
        payloads: Vec<FilePayload>,
        detector: &MonthDetector,
    ) -> usize {
        let before = self.files.len();
        for payload in payloads {
            if !payload.is_pdf() {
                debug!(file = %payload.name, "skipping non-PDF file");
                continue;
            }
            let (period, account_type) = detector.detect(&payload.name);
            let id = self.fresh_id(&payload.name);
            self.files.push(BatchFile {
                id,
                payload,
                status: BatchFileStatus::Pending,
                result: None,
                error: None,
                period,
                account_type,
                import_result: None,
            });
        }
        let admitted = self.files.len() - before;
        if admitted > 0 {
            self.sort();
        }
        admitted
    }

    fn fresh_id(&self, filename: &str) -> BatchFileId {
        loop {
            let suffix: String = rand::thread_rng()
                .sample_iter(&Alphanumeric)
                .take(ID_SUFFIX_LEN)
                .map(|c| char::from(c).to_ascii_lowercase())
                .collect();
            let id = BatchFileId(format!(
                "{}-{}-{}",
                filename,
                Utc::now().timestamp_millis(),
                suffix
            ));
            if self.file(&id).is_none() {
                return id;
            }
        }
    }

    /// Files with a month sort by (month, filename); a file without one is
    /// placed by filename alone against every other file. The two runs are
    /// sorted separately and merged by filename so the order stays total.
    fn sort(&mut self) {
        let (mut dated, mut undated): (Vec<_>, Vec<_>) =
            self.files.drain(..).partition(|f| f.period.has_month());
        dated.sort_by(|a, b| {
            a.period
                .month
                .cmp(&b.period.month)
                .then_with(|| a.name().cmp(b.name()))
        });
        undated.sort_by(|a, b| a.name().cmp(b.name()));

        let mut dated = dated.into_iter().peekable();
        let mut undated = undated.into_iter().peekable();
        self.files = iter::from_fn(|| {
            let take_undated = match (dated.peek(), undated.peek()) {
                (Some(d), Some(u)) => u.name() < d.name(),
                (None, _) => true,
                (Some(_), None) => false,
            };
            if take_undated {
                undated.next()
            } else {
                dated.next()
            }
        })
        .collect();
    }

    pub(crate) fn remove(&mut self, id: &BatchFileId) -> bool {
        let before = self.files.len();
        self.files.retain(|f| &f.id != id);
        self.files.len() != before
    }

    pub(crate) fn clear(&mut self) {
        self.files.clear();
        self.active_index = None;
        if let Some(run) = self.run.take() {
            info!(run = run.id, "batch cleared during run, cancelling");
            run.cancel.cancel();
        }
    }

    // Runs.
    // ---

    /// Admits a new run, unless one is already in progress.
    pub(crate) fn begin_run(&mut self) -> Option<RunTicket> {
        if self.run.is_some() {
            return None;
        }
        self.runs_started += 1;
        let cancel = CancellationToken::new();
        self.run = Some(ActiveRun {
            id: self.runs_started,
            cancel: cancel.clone(),
        });
        Some(RunTicket {
            run_id: self.runs_started,
            cancel,
            ids: self.files.iter().map(|f| f.id.clone()).collect(),
        })
    }

    /// Marks `id` as the active entry if it is still in the batch and
    /// pending.
    pub(crate) fn activate(&mut self, id: &BatchFileId) -> bool {
        match self.files.iter().position(|f| &f.id == id) {
            Some(index) if self.files[index].status == BatchFileStatus::Pending => {
                self.active_index = Some(index);
                true
            }
            _ => false,
        }
    }

    /// Ends the run, unless it was already superseded by a `clear`.
    pub(crate) fn finish_run(&mut self, run_id: u64) {
        if self.run.as_ref().is_some_and(|run| run.id == run_id) {
            self.run = None;
            self.active_index = None;
        }
    }

    // Per-file lifecycle.
    // ---

    /// pending -> processing. Returns the payload to extract, or `None` when
    /// the file is gone or not pending.
    pub(crate) fn begin_processing(&mut self, id: &BatchFileId) -> Option<FilePayload> {
        let file = self.file_mut(id)?;
        if file.status != BatchFileStatus::Pending {
            debug!(file = %file.id, status = file.status.as_str(), "not pending, skipping");
            return None;
        }
        file.status = BatchFileStatus::Processing;
        file.error = None;
        Some(file.payload.clone())
    }

    /// processing -> done | error. Returns the new status, or `None` when the
    /// file left the batch (or was reset) while the extraction was in flight;
    /// the outcome is then dropped.
    pub(crate) fn complete(
        &mut self,
        id: &BatchFileId,
        outcome: Result<ExtractionOutcome, ServerError>,
    ) -> Option<BatchFileStatus> {
        let file = self.file_mut(id)?;
        if file.status != BatchFileStatus::Processing {
            return None;
        }

        match outcome {
            Ok(ExtractionOutcome::Extracted(result)) => {
                if !file.period.has_month() {
                    refine_period(
                        &mut file.period,
                        result.statement_period.as_deref(),
                        &result.transaction_dates(),
                    );
                }
                info!(
                    file = %file.id,
                    transactions = result.transaction_count(),
                    "extraction done"
                );
                file.result = Some(result);
                file.status = BatchFileStatus::Done;
            }
            Ok(ExtractionOutcome::Rejected { error }) => {
                let message = non_empty(error).unwrap_or_else(|| DEFAULT_REJECTION_MESSAGE.into());
                warn!(file = %file.id, error = %message, "extraction rejected");
                file.error = Some(message);
                file.status = BatchFileStatus::Error;
            }
            Ok(ExtractionOutcome::Failed {
                data_message,
                message,
            }) => {
                let message = non_empty(data_message)
                    .or_else(|| non_empty(message))
                    .unwrap_or_else(|| DEFAULT_FAILURE_MESSAGE.into());
                warn!(file = %file.id, error = %message, "extraction failed");
                file.error = Some(message);
                file.status = BatchFileStatus::Error;
            }
            Err(e) => {
                let message = non_empty(Some(e.to_string()))
                    .unwrap_or_else(|| DEFAULT_FAILURE_MESSAGE.into());
                warn!(file = %file.id, error = %message, "extraction failed");
                file.error = Some(message);
                file.status = BatchFileStatus::Error;
            }
        }
        Some(file.status)
    }

    /// error | done -> pending, clearing the previous outcome. A file that is
    /// being processed cannot be reset.
    pub(crate) fn reset_for_retry(&mut self, id: &BatchFileId) -> Result<(), ServerError> {
        let file = self
            .file_mut(id)
            .ok_or_else(|| BatchFileNotFound::new(id.as_str()))?;
        match file.status {
            BatchFileStatus::Processing => return Err(BatchFileBusy::new(id.as_str())),
            BatchFileStatus::Pending => {}
            status if status.can_transition_to(BatchFileStatus::Pending) => {}
            status => {
                return Err(InvalidStatusTransition::new(
                    id.as_str(),
                    &status,
                    &BatchFileStatus::Pending,
                ))
            }
        }
        file.status = BatchFileStatus::Pending;
        file.error = None;
        file.result = None;
        file.import_result = None;
        Ok(())
    }

    /// done -> imported.
    pub(crate) fn mark_imported(
        &mut self,
        id: &BatchFileId,
        import_result: ImportResult,
    ) -> Result<(), ServerError> {
        let file = self
            .file_mut(id)
            .ok_or_else(|| BatchFileNotFound::new(id.as_str()))?;
        if !file.status.can_transition_to(BatchFileStatus::Imported) {
            return Err(InvalidStatusTransition::new(
                id.as_str(),
                &file.status,
                &BatchFileStatus::Imported,
            ));
        }
        file.status = BatchFileStatus::Imported;
        file.import_result = Some(import_result);
        Ok(())
    }
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.filter(|s| !s.trim().is_empty())
}
