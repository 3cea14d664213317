use fractic_server_error::ServerError;
use serde_json::Value;

use crate::{
    data::models::amount_model::AmountModel,
    entities::{ExtractedTransaction, ExtractionOutcome, ExtractionResult},
    errors::InvalidExtractionResponse,
};

/// Raw HTTP answer of the extraction endpoint.
#[derive(Debug)]
pub(crate) struct ExtractionHttpResponse {
    pub(crate) status: u16,
    pub(crate) reason: Option<String>,
    pub(crate) body: String,
}

/// What came back from one extraction request: an HTTP response of any
/// status, or the transport error text when no response arrived.
#[derive(Debug)]
pub(crate) enum ExtractionExchange {
    Response(ExtractionHttpResponse),
    TransportFailed { message: String },
}

#[derive(Debug, serde_derive::Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ExtractionResponseModel {
    #[serde(default)]
    pub(crate) success: Option<bool>,
    #[serde(default)]
    pub(crate) transactions: Option<Vec<TransactionModel>>,
    #[serde(default, alias = "statement_period")]
    pub(crate) statement_period: Option<String>,
    #[serde(default)]
    pub(crate) error: Option<String>,
}

#[derive(Debug, serde_derive::Deserialize)]
pub(crate) struct TransactionModel {
    #[serde(default)]
    pub(crate) date: String,
    #[serde(default)]
    pub(crate) description: String,
    #[serde(default)]
    pub(crate) amount: AmountModel,
    #[serde(default, rename = "type")]
    pub(crate) kind: Option<String>,
    #[serde(default)]
    pub(crate) balance: Option<AmountModel>,
}

impl From<TransactionModel> for ExtractedTransaction {
    fn from(model: TransactionModel) -> Self {
        ExtractedTransaction {
            date: model.date,
            description: model.description,
            amount: model.amount.into(),
            kind: model.kind,
            balance: model.balance.map(Into::into),
        }
    }
}

impl From<ExtractionResponseModel> for ExtractionOutcome {
    fn from(model: ExtractionResponseModel) -> Self {
        // Only an explicit `success: false` is a logical failure.
        if model.success == Some(false) {
            return ExtractionOutcome::Rejected { error: model.error };
        }
        ExtractionOutcome::Extracted(ExtractionResult {
            transactions: model
                .transactions
                .unwrap_or_default()
                .into_iter()
                .map(Into::into)
                .collect(),
            statement_period: model.statement_period,
        })
    }
}

/// Message carried in an error body, e.g. `{"message": "..."}` or
/// `{"data": {"message": "..."}}`.
fn body_message(body: &Value) -> Option<String> {
    [
        body.get("message"),
        body.get("data").and_then(|d| d.get("message")),
        body.get("error"),
    ]
    .into_iter()
    .flatten()
    .filter_map(Value::as_str)
    .map(str::trim)
    .find(|m| !m.is_empty())
    .map(str::to_string)
}

impl ExtractionExchange {
    pub(crate) fn into_outcome(self) -> Result<ExtractionOutcome, ServerError> {
        match self {
            ExtractionExchange::Response(response) => response.into_outcome(),
            ExtractionExchange::TransportFailed { message } => Ok(ExtractionOutcome::Failed {
                data_message: None,
                message: Some(message),
            }),
        }
    }
}

impl ExtractionHttpResponse {
    pub(crate) fn into_outcome(self) -> Result<ExtractionOutcome, ServerError> {
        if !(200..300).contains(&self.status) {
            let body: Option<Value> = serde_json::from_str(&self.body).ok();
            return Ok(ExtractionOutcome::Failed {
                data_message: body.as_ref().and_then(body_message),
                message: Some(match self.reason {
                    Some(reason) => format!("{} {}", self.status, reason),
                    None => format!("HTTP {}", self.status),
                }),
            });
        }
        let model: ExtractionResponseModel = serde_json::from_str(&self.body)
            .map_err(|e| InvalidExtractionResponse::with_debug(&e.to_string(), &e))?;
        Ok(model.into())
    }
}
