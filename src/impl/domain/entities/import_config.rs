use std::time::Duration;

use iso_currency::Currency;

pub const DEFAULT_FILE_FIELD_NAME: &str = "file";
pub const DEFAULT_INTER_FILE_DELAY: Duration = Duration::from_millis(1000);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Account-number suffixes that identify an account type when the filename
/// carries no keyword. Keywords themselves are fixed.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde_derive::Deserialize)]
#[serde(default)]
pub struct AccountRules {
    pub checking_suffixes: Vec<String>,
    pub savings_suffixes: Vec<String>,
    pub special_suffixes: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct ImportConfig {
    /// Absolute URL of the endpoint that turns a PDF into transaction rows.
    pub extraction_endpoint: String,
    /// Multipart field the PDF is sent under.
    pub file_field_name: String,
    /// Pause between two extraction calls of the same run.
    pub inter_file_delay: Duration,
    pub request_timeout: Duration,
    /// Currency extracted amounts are presented in.
    pub currency: Currency,
    pub account_rules: AccountRules,
}

impl ImportConfig {
    pub fn new(extraction_endpoint: impl Into<String>) -> Self {
        Self {
            extraction_endpoint: extraction_endpoint.into(),
            file_field_name: DEFAULT_FILE_FIELD_NAME.to_string(),
            inter_file_delay: DEFAULT_INTER_FILE_DELAY,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            currency: Currency::USD,
            account_rules: AccountRules::default(),
        }
    }

    pub fn with_file_field_name(mut self, name: impl Into<String>) -> Self {
        self.file_field_name = name.into();
        self
    }

    pub fn with_inter_file_delay(mut self, delay: Duration) -> Self {
        self.inter_file_delay = delay;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }

    pub fn with_account_rules(mut self, rules: AccountRules) -> Self {
        self.account_rules = rules;
        self
    }
}
