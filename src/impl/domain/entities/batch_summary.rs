use super::batch_file::{BatchFile, BatchFileStatus};

/// Read-only aggregates over a batch, recomputed on every read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde_derive::Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub completed: usize,
    pub failed: usize,
    pub pending: usize,
    pub progress_percent: u32,
    pub total_transactions: usize,
    pub all_done: bool,
}

impl BatchSummary {
    pub fn of(files: &[BatchFile]) -> Self {
        let count = |status: BatchFileStatus| files.iter().filter(|f| f.status == status).count();

        let total = files.len();
        let completed = count(BatchFileStatus::Done);
        let failed = count(BatchFileStatus::Error);
        let pending = count(BatchFileStatus::Pending);
        let progress_percent = if total == 0 {
            0
        } else {
            (((completed + failed) as f64 / total as f64) * 100.0).round() as u32
        };

        Self {
            total,
            completed,
            failed,
            pending,
            progress_percent,
            total_transactions: files.iter().map(BatchFile::transaction_count).sum(),
            all_done: total > 0 && files.iter().all(|f| f.status.is_finished()),
        }
    }
}
