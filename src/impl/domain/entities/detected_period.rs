/// Best-guess statement period derived from a filename (and, failing that,
/// from the extraction result).
///
/// Absence of a match is represented by empty strings and `None`, never by
/// an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde_derive::Serialize)]
pub struct DetectedPeriod {
    /// Zero-padded month ("01".."12"), or empty.
    pub month: String,
    /// Full English month name ("June"), or empty.
    pub month_name: String,
    pub year: Option<i32>,
}

impl DetectedPeriod {
    pub fn has_month(&self) -> bool {
        !self.month.is_empty()
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, serde_derive::Serialize, serde_derive::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    Checking,
    Savings,
    Special,
}

impl AccountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Checking => "checking",
            AccountType::Savings => "savings",
            AccountType::Special => "special",
        }
    }
}

impl std::fmt::Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
