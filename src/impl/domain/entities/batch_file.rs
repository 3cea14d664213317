use std::sync::Arc;

use super::{
    detected_period::{AccountType, DetectedPeriod},
    extraction::{ExtractionResult, ImportResult},
};

pub(crate) const PDF_MIME_TYPE: &str = "application/pdf";

#[derive(Debug, Clone, PartialEq, Eq, Hash, serde_derive::Serialize)]
#[serde(transparent)]
pub struct BatchFileId(pub(crate) String);

impl BatchFileId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BatchFileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Raw file as submitted by the user.
#[derive(Debug, Clone)]
pub struct FilePayload {
    pub name: String,
    /// Declared media type, when the source provides one.
    pub media_type: Option<String>,
    pub bytes: Arc<[u8]>,
}

impl FilePayload {
    pub fn new(
        name: impl Into<String>,
        media_type: Option<String>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            name: name.into(),
            media_type,
            bytes: Arc::from(bytes.into()),
        }
    }

    /// Admission filter: declared PDF media type, or a `.pdf` extension
    /// (case-insensitive).
    pub fn is_pdf(&self) -> bool {
        self.media_type.as_deref() == Some(PDF_MIME_TYPE)
            || self.name.to_lowercase().ends_with(".pdf")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde_derive::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchFileStatus {
    Pending,
    Processing,
    Done,
    Error,
    /// Set by the commit step once the extracted rows were written.
    Imported,
}

impl BatchFileStatus {
    pub fn can_transition_to(self, next: BatchFileStatus) -> bool {
        use BatchFileStatus::*;
        matches!(
            (self, next),
            (Pending, Processing)
                | (Processing, Done)
                | (Processing, Error)
                | (Done, Imported)
                | (Error, Pending)
                | (Done, Pending)
        )
    }

    /// Done and error both count as finished for batch completion.
    pub fn is_finished(self) -> bool {
        matches!(self, BatchFileStatus::Done | BatchFileStatus::Error)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BatchFileStatus::Pending => "pending",
            BatchFileStatus::Processing => "processing",
            BatchFileStatus::Done => "done",
            BatchFileStatus::Error => "error",
            BatchFileStatus::Imported => "imported",
        }
    }
}

#[derive(Debug, Clone, serde_derive::Serialize)]
pub struct BatchFile {
    pub id: BatchFileId,
    #[serde(skip)]
    pub payload: FilePayload,
    pub status: BatchFileStatus,
    pub result: Option<ExtractionResult>,
    pub error: Option<String>,
    pub period: DetectedPeriod,
    pub account_type: Option<AccountType>,
    pub import_result: Option<ImportResult>,
}

impl BatchFile {
    pub fn name(&self) -> &str {
        &self.payload.name
    }

    pub fn transaction_count(&self) -> usize {
        self.result
            .as_ref()
            .map(ExtractionResult::transaction_count)
            .unwrap_or(0)
    }
}
