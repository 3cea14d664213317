use iso_currency::Currency;

use crate::{
    entities::{BatchFile, BatchSummary},
    presentation::utils::{format_amount, format_period},
};

const ERROR_WRAP_WIDTH: usize = 66;
const ERROR_INDENT: &str = "             ! ";
const ERROR_CONTINUATION_INDENT: &str = "               ";

pub(crate) struct BatchReportPrinter;

impl BatchReportPrinter {
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) fn print_report(
        &self,
        files: &[BatchFile],
        summary: &BatchSummary,
        currency: Currency,
    ) -> String {
        let mut output = String::new();

        output.push_str(
            "; --- Files --------------------------------------------------------------------\n\n",
        );
        self.print_files(&mut output, files, currency);
        output.push('\n');

        output.push_str(
            "; --- Summary ------------------------------------------------------------------\n\n",
        );
        self.print_summary(&mut output, summary);

        output
    }

    fn print_files(&self, output: &mut String, files: &[BatchFile], currency: Currency) {
        if files.is_empty() {
            output.push_str("(no files)\n");
            return;
        }
        for file in files {
            let account = file.account_type.map(|a| a.as_str()).unwrap_or("-");
            let extracted = match &file.result {
                Some(result) => format!(
                    "{:>4} tx  {}",
                    result.transaction_count(),
                    format_amount(result.net_amount(), currency)
                ),
                None => String::new(),
            };
            let line = format!(
                "[{:<10}] {}  {}  {}  {}",
                file.status.as_str(),
                file.name(),
                format_period(file),
                account,
                extracted
            );
            output.push_str(line.trim_end());
            output.push('\n');

            if let Some(error) = &file.error {
                for (i, l) in textwrap::wrap(error, ERROR_WRAP_WIDTH).iter().enumerate() {
                    output.push_str(if i == 0 {
                        ERROR_INDENT
                    } else {
                        ERROR_CONTINUATION_INDENT
                    });
                    output.push_str(l);
                    output.push('\n');
                }
            }
        }
    }

    fn print_summary(&self, output: &mut String, summary: &BatchSummary) {
        output.push_str(&format!(
            "files: {}  done: {}  failed: {}  pending: {}  progress: {}%\n",
            summary.total,
            summary.completed,
            summary.failed,
            summary.pending,
            summary.progress_percent
        ));
        output.push_str(&format!("transactions: {}\n", summary.total_transactions));
        if summary.all_done {
            output.push_str("all files processed\n");
        }
    }
}
