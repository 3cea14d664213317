use std::str::FromStr;

use fractic_server_error::ServerError;
use serde::Deserialize;

use crate::errors::InvalidExtractionResponse;

/// Amount as returned by the extraction endpoint: either a JSON number or a
/// statement-style string such as "$1,234.56", "-12.00" or "(85.10)".
#[derive(Debug, Default)]
pub(crate) struct AmountModel(pub f64);

impl FromStr for AmountModel {
    type Err = ServerError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.replace([',', '$'], "");
        let raw = raw.trim();
        let is_negative = raw.starts_with('(') && raw.ends_with(')');
        let numeric_part = raw.trim_matches(|c| c == '(' || c == ')').trim();
        let amount = numeric_part
            .parse::<f64>()
            .map_err(|_| InvalidExtractionResponse::new(&format!("invalid amount '{}'", s)))?;
        Ok(AmountModel(if is_negative { -amount } else { amount }))
    }
}

#[derive(serde_derive::Deserialize)]
#[serde(untagged)]
enum RawAmount {
    Number(f64),
    Text(String),
}

impl<'de> Deserialize<'de> for AmountModel {
    fn deserialize<D>(deserializer: D) -> Result<AmountModel, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        match RawAmount::deserialize(deserializer)? {
            RawAmount::Number(n) => Ok(AmountModel(n)),
            RawAmount::Text(s) => AmountModel::from_str(&s).map_err(serde::de::Error::custom),
        }
    }
}

impl From<AmountModel> for f64 {
    fn from(amount: AmountModel) -> f64 {
        amount.0
    }
}
