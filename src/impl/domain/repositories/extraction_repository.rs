use std::sync::Arc;

use async_trait::async_trait;
use fractic_server_error::ServerError;

use crate::entities::{ExtractionOutcome, FilePayload};

/// Turns one PDF into transaction rows.
///
/// Implementations report endpoint-level failures through
/// `ExtractionOutcome::{Rejected, Failed}`; `Err` is for failures that never
/// reached the endpoint. Either way the batch records the failure on the file.
#[async_trait]
pub trait ExtractionRepository: Send + Sync {
    async fn extract(&self, file: &FilePayload) -> Result<ExtractionOutcome, ServerError>;
}

#[async_trait]
impl<T: ExtractionRepository + ?Sized> ExtractionRepository for Arc<T> {
    async fn extract(&self, file: &FilePayload) -> Result<ExtractionOutcome, ServerError> {
        (**self).extract(file).await
    }
}
