/// One transaction row returned by the extraction endpoint.
#[derive(Debug, Clone, PartialEq, serde_derive::Serialize)]
pub struct ExtractedTransaction {
    /// Date as printed on the statement; not normalized.
    pub date: String,
    pub description: String,
    /// Signed amount (withdrawals negative).
    pub amount: f64,
    pub kind: Option<String>,
    pub balance: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, serde_derive::Serialize)]
pub struct ExtractionResult {
    pub transactions: Vec<ExtractedTransaction>,
    /// Free-text period declared on the statement (e.g. "June 1 - June 30,
    /// 2022"), if the endpoint found one.
    pub statement_period: Option<String>,
}

impl ExtractionResult {
    pub fn transaction_count(&self) -> usize {
        self.transactions.len()
    }

    pub fn net_amount(&self) -> f64 {
        self.transactions.iter().map(|tx| tx.amount).sum()
    }

    pub(crate) fn transaction_dates(&self) -> Vec<&str> {
        self.transactions.iter().map(|tx| tx.date.as_str()).collect()
    }
}

/// What a single extraction call produced.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractionOutcome {
    /// The endpoint answered and reported success.
    Extracted(ExtractionResult),
    /// The endpoint answered but reported a logical failure
    /// (`success: false`).
    Rejected { error: Option<String> },
    /// The request itself failed (HTTP error status, unreadable body, ...).
    /// `data_message` is the message carried in the response body, if any;
    /// `message` is the generic transport-level description.
    Failed {
        data_message: Option<String>,
        message: Option<String>,
    },
}

pub(crate) const DEFAULT_REJECTION_MESSAGE: &str = "Failed to extract transactions";
pub(crate) const DEFAULT_FAILURE_MESSAGE: &str = "Failed to process file";

/// Outcome of the commit step that writes a file's transactions to the
/// ledger. Recorded on the file once it has been imported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde_derive::Serialize)]
pub struct ImportResult {
    pub imported: usize,
    pub skipped: usize,
}
