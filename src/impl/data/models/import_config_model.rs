use std::{path::Path, str::FromStr, time::Duration};

use fractic_server_error::ServerError;
use iso_currency::Currency;
use reqwest::Url;

use crate::{
    entities::{
        AccountRules, ImportConfig, DEFAULT_FILE_FIELD_NAME, DEFAULT_INTER_FILE_DELAY,
        DEFAULT_REQUEST_TIMEOUT,
    },
    errors::{InvalidConfig, InvalidEndpoint, InvalidRon, ReadError},
};

/// On-disk (RON) shape of `ImportConfig`. Everything but the endpoint is
/// optional.
#[derive(Debug, serde_derive::Deserialize)]
pub(crate) struct ImportConfigModel {
    extraction_endpoint: String,
    #[serde(default)]
    file_field_name: Option<String>,
    #[serde(default)]
    inter_file_delay_ms: Option<u64>,
    #[serde(default)]
    request_timeout_secs: Option<u64>,
    #[serde(default)]
    currency: Option<String>,
    #[serde(default)]
    account_rules: AccountRules,
}

impl FromStr for ImportConfigModel {
    type Err = ServerError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ron::from_str(s).map_err(|e| InvalidRon::with_debug("ImportConfig", &e))
    }
}

impl TryFrom<ImportConfigModel> for ImportConfig {
    type Error = ServerError;
    fn try_from(model: ImportConfigModel) -> Result<Self, Self::Error> {
        let currency = match model.currency {
            Some(code) => Currency::from_code(&code.to_uppercase())
                .ok_or_else(|| InvalidConfig::new(&format!("unknown currency code '{}'", code)))?,
            None => Currency::USD,
        };
        Ok(ImportConfig {
            extraction_endpoint: model.extraction_endpoint,
            file_field_name: model
                .file_field_name
                .unwrap_or_else(|| DEFAULT_FILE_FIELD_NAME.to_string()),
            inter_file_delay: model
                .inter_file_delay_ms
                .map(Duration::from_millis)
                .unwrap_or(DEFAULT_INTER_FILE_DELAY),
            request_timeout: model
                .request_timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT),
            currency,
            account_rules: model.account_rules,
        })
    }
}

impl ImportConfig {
    pub fn from_ron_str(s: &str) -> Result<Self, ServerError> {
        let config: ImportConfig = ImportConfigModel::from_str(s)?.try_into()?;
        config.validate()?;
        Ok(config)
    }

    pub async fn from_ron_file<P>(path: P) -> Result<Self, ServerError>
    where
        P: AsRef<Path> + Send,
    {
        let path = path.as_ref();
        let s = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ReadError::with_debug(&path.display().to_string(), &e))?;
        Self::from_ron_str(&s)
    }

    pub fn validate(&self) -> Result<(), ServerError> {
        let url = Url::parse(&self.extraction_endpoint)
            .map_err(|e| InvalidEndpoint::with_debug(&self.extraction_endpoint, &e))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(InvalidEndpoint::new(&self.extraction_endpoint));
        }
        if self.file_field_name.trim().is_empty() {
            return Err(InvalidConfig::new("file field name must not be empty"));
        }
        let rules = &self.account_rules;
        if let Some(bad) = rules
            .checking_suffixes
            .iter()
            .chain(&rules.savings_suffixes)
            .chain(&rules.special_suffixes)
            .find(|s| s.len() != 4 || !s.chars().all(|c| c.is_ascii_digit()))
        {
            return Err(InvalidConfig::new(&format!(
                "account suffix '{}' is not four digits",
                bad
            )));
        }
        Ok(())
    }
}
