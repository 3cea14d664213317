use std::{path::Path, sync::Arc};

use fractic_server_error::ServerError;
use iso_currency::Currency;

use crate::{
    data::repositories::extraction_repository_impl::ExtractionRepositoryImpl,
    domain::usecases::batch_coordinator::BatchCoordinator,
    entities::{BatchFile, BatchFileId, BatchSummary, FilePayload, ImportConfig, ImportResult},
    presentation::{
        batch_report_printer::BatchReportPrinter,
        transactions_csv_exporter::TransactionsCsvExporter,
    },
};

/// Batch import of bank-statement PDFs against the HTTP extraction endpoint
/// named in the config.
///
/// Cheap to clone; clones share the same batch, so one clone can run
/// `process_all` while another observes or clears it.
#[derive(Clone)]
pub struct StatementImportUtil {
    coordinator: Arc<BatchCoordinator<ExtractionRepositoryImpl>>,
    currency: Currency,
}

impl StatementImportUtil {
    pub fn new(config: ImportConfig) -> Result<Self, ServerError> {
        config.validate()?;
        let repository = ExtractionRepositoryImpl::new(&config)?;
        Ok(Self {
            coordinator: Arc::new(BatchCoordinator::new(repository, &config)),
            currency: config.currency,
        })
    }

    pub async fn add_files(&self, files: Vec<FilePayload>) -> usize {
        self.coordinator.add_files(files).await
    }

    pub async fn add_paths<P>(&self, paths: Vec<P>) -> Result<usize, ServerError>
    where
        P: AsRef<Path> + Send,
    {
        self.coordinator.add_paths(paths).await
    }

    pub async fn remove_file(&self, id: &BatchFileId) -> bool {
        self.coordinator.remove_file(id).await
    }

    pub async fn clear(&self) {
        self.coordinator.clear().await
    }

    pub async fn process_file(&self, id: &BatchFileId) -> bool {
        self.coordinator.process_file(id).await
    }

    pub async fn process_all(&self) -> BatchSummary {
        self.coordinator.process_all().await
    }

    pub async fn retry_file(&self, id: &BatchFileId) -> Result<(), ServerError> {
        self.coordinator.retry_file(id).await
    }

    pub async fn mark_imported(
        &self,
        id: &BatchFileId,
        import_result: ImportResult,
    ) -> Result<(), ServerError> {
        self.coordinator.mark_imported(id, import_result).await
    }

    pub async fn files(&self) -> Vec<BatchFile> {
        self.coordinator.files().await
    }

    pub async fn is_processing(&self) -> bool {
        self.coordinator.is_processing().await
    }

    pub async fn active_index(&self) -> Option<usize> {
        self.coordinator.active_index().await
    }

    pub async fn summary(&self) -> BatchSummary {
        self.coordinator.summary().await
    }

    /// Plain-text status report of the batch.
    pub async fn report(&self) -> String {
        let files = self.coordinator.files().await;
        let summary = BatchSummary::of(&files);
        BatchReportPrinter::new().print_report(&files, &summary, self.currency)
    }

    /// All extracted rows of done or imported files, as CSV.
    pub async fn export_csv(&self) -> Result<String, ServerError> {
        TransactionsCsvExporter::new().export(&self.coordinator.files().await)
    }
}
