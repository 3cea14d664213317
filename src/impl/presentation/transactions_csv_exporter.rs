use fractic_server_error::ServerError;

use crate::{
    entities::{BatchFile, BatchFileStatus},
    errors::CsvWriteError,
};

const HEADER: [&str; 9] = [
    "file",
    "account",
    "month",
    "year",
    "date",
    "description",
    "amount",
    "type",
    "balance",
];

/// Flattens the extracted rows of done (or already imported) files into one
/// CSV document, each row tagged with where it came from.
pub(crate) struct TransactionsCsvExporter;

impl TransactionsCsvExporter {
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) fn export(&self, files: &[BatchFile]) -> Result<String, ServerError> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer
            .write_record(HEADER)
            .map_err(|e| CsvWriteError::with_debug("header", &e))?;

        let exportable = files.iter().filter(|f| {
            matches!(f.status, BatchFileStatus::Done | BatchFileStatus::Imported)
        });
        for file in exportable {
            let Some(result) = &file.result else {
                continue;
            };
            let account = file.account_type.map(|a| a.as_str()).unwrap_or("");
            let year = file.period.year.map(|y| y.to_string()).unwrap_or_default();
            for tx in &result.transactions {
                writer
                    .write_record([
                        file.name(),
                        account,
                        file.period.month.as_str(),
                        year.as_str(),
                        tx.date.as_str(),
                        tx.description.as_str(),
                        format!("{:.2}", tx.amount).as_str(),
                        tx.kind.as_deref().unwrap_or(""),
                        tx.balance
                            .map(|b| format!("{:.2}", b))
                            .unwrap_or_default()
                            .as_str(),
                    ])
                    .map_err(|e| CsvWriteError::with_debug("transaction", &e))?;
            }
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| CsvWriteError::with_debug("transactions", e.error()))?;
        String::from_utf8(bytes).map_err(|e| CsvWriteError::with_debug("transactions", &e))
    }
}
