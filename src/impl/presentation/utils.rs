use iso_currency::Currency;
use num_format::{Locale, ToFormattedString as _};

use crate::entities::BatchFile;

/// Format a signed amount with thousands separators, the currency's standard
/// number of decimal places and a trailing currency symbol (ex. "-1,234.50 $",
/// "12,000 ¥").
///
/// Always uses en locale ('.' as decimal mark) regardless of currency.
pub(crate) fn format_amount(amount: f64, currency: Currency) -> String {
    let decimal_places = currency.exponent().unwrap_or(0) as u32;
    let scale = 10i64.pow(decimal_places);
    let minor_units = (amount.abs() * scale as f64).round() as i64;
    let sign = if amount < 0.0 && minor_units != 0 { "-" } else { "" };
    let integer_part = (minor_units / scale).to_formatted_string(&Locale::en);
    if decimal_places == 0 {
        format!("{}{} {}", sign, integer_part, currency.symbol())
    } else {
        format!(
            "{}{}.{:0width$} {}",
            sign,
            integer_part,
            minor_units % scale,
            currency.symbol(),
            width = decimal_places as usize,
        )
    }
}

/// "June 2022", "June", or "-" when nothing was detected.
pub(crate) fn format_period(file: &BatchFile) -> String {
    match (file.period.month_name.as_str(), file.period.year) {
        ("", Some(year)) => year.to_string(),
        ("", None) => "-".to_string(),
        (name, Some(year)) => format!("{} {}", name, year),
        (name, None) => name.to_string(),
    }
}
