use std::sync::LazyLock;

use chrono::Month;
use regex::Regex;
use tracing::debug;

use crate::entities::{AccountRules, AccountType, DetectedPeriod};

static YEAR_MONTH_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{4})(\d{2})").expect("hardcoded regex should be valid"));
static YEAR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{4}").expect("hardcoded regex should be valid"));

/// Calendar order; the first name found wins.
static MONTHS: LazyLock<Vec<Month>> =
    LazyLock::new(|| (1..=12u8).filter_map(|m| Month::try_from(m).ok()).collect());

const CHECKING_KEYWORDS: &[&str] = &["checking"];
const SAVINGS_KEYWORDS: &[&str] = &["savings", "reserve"];
const SPECIAL_KEYWORDS: &[&str] = &["special"];

fn period_of(month: Month, year: Option<i32>) -> DetectedPeriod {
    DetectedPeriod {
        month: format!("{:02}", month.number_from_month()),
        month_name: month.name().to_string(),
        year,
    }
}

fn find_month_name(text: &str) -> Option<Month> {
    let lowered = text.to_lowercase();
    MONTHS
        .iter()
        .find(|m| lowered.contains(&m.name().to_lowercase()))
        .copied()
}

/// Guesses the statement period from a filename.
///
/// Only the first six-digit run is considered (read as YYYYMM). If its month
/// is out of range, or there is no such run, the first full month name in the
/// filename is used instead, with an unknown year.
pub fn detect_period(filename: &str) -> DetectedPeriod {
    if let Some(caps) = YEAR_MONTH_PATTERN.captures(filename) {
        let year = caps[1].parse::<i32>().ok();
        let month = caps[2]
            .parse::<u8>()
            .ok()
            .filter(|m| (1..=12).contains(m))
            .and_then(|m| Month::try_from(m).ok());
        if let Some(month) = month {
            return period_of(month, year);
        }
    }
    find_month_name(filename)
        .map(|month| period_of(month, None))
        .unwrap_or_default()
}

/// Guesses the account a statement belongs to. Rules are tried in the order
/// checking, savings, special; the first match wins.
pub fn detect_account_type(filename: &str, rules: &AccountRules) -> Option<AccountType> {
    let lowered = filename.to_lowercase();
    let hit = |keywords: &[&str], suffixes: &[String]| {
        keywords.iter().any(|k| lowered.contains(k))
            || suffixes.iter().any(|s| !s.is_empty() && lowered.contains(s.as_str()))
    };

    if hit(CHECKING_KEYWORDS, &rules.checking_suffixes) {
        Some(AccountType::Checking)
    } else if hit(SAVINGS_KEYWORDS, &rules.savings_suffixes) {
        Some(AccountType::Savings)
    } else if hit(SPECIAL_KEYWORDS, &rules.special_suffixes) {
        Some(AccountType::Special)
    } else {
        None
    }
}

/// Fills in what the filename could not tell, using the extraction result:
/// the month from the declared statement period and, if still unknown, the
/// year from the first transaction date carrying a four-digit number.
pub fn refine_period(period: &mut DetectedPeriod, statement_period: Option<&str>, dates: &[&str]) {
    if let Some(month) = statement_period.and_then(find_month_name) {
        let year = period.year;
        *period = period_of(month, year);
    }
    if period.year.is_none() {
        period.year = dates
            .iter()
            .find_map(|d| YEAR_PATTERN.find(d))
            .and_then(|m| m.as_str().parse().ok());
    }
    debug!(month = %period.month, year = ?period.year, "refined period from extraction result");
}

/// Runs period and account detection for one file.
#[derive(Debug, Clone, Default)]
pub(crate) struct MonthDetector {
    rules: AccountRules,
}

impl MonthDetector {
    pub(crate) fn new(rules: AccountRules) -> Self {
        Self { rules }
    }

    pub(crate) fn detect(&self, filename: &str) -> (DetectedPeriod, Option<AccountType>) {
        let period = detect_period(filename);
        let account_type = detect_account_type(filename, &self.rules);
        debug!(
            filename,
            month = %period.month,
            year = ?period.year,
            account = ?account_type,
            "detected statement period"
        );
        (period, account_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn year_month_run() {
        let p = detect_period("202206checking.pdf");
        assert_eq!(p.month, "06");
        assert_eq!(p.month_name, "June");
        assert_eq!(p.year, Some(2022));

        let p = detect_period("stmt_acct-202312.pdf");
        assert_eq!((p.month.as_str(), p.year), ("12", Some(2023)));
    }

    #[test]
    fn invalid_month_falls_back_to_names() {
        let p = detect_period("202213-march.pdf");
        assert_eq!(p.month, "03");
        assert_eq!(p.month_name, "March");
        assert_eq!(p.year, None);

        let p = detect_period("202200.pdf");
        assert_eq!(p, DetectedPeriod::default());
    }

    #[test]
    fn only_first_digit_run_counts() {
        // "123499" is the first six-digit run; month 99 is invalid and the
        // later valid run is not considered.
        let p = detect_period("123499-202206.pdf");
        assert_eq!(p, DetectedPeriod::default());
    }

    #[test]
    fn month_name_without_digits() {
        let p = detect_period("june-statement.pdf");
        assert_eq!(p.month, "06");
        assert_eq!(p.month_name, "June");
        assert_eq!(p.year, None);

        let p = detect_period("Statement SEPTEMBER.pdf");
        assert_eq!(p.month, "09");
    }

    #[test]
    fn month_names_in_calendar_order() {
        // Both names present; January comes first in calendar order.
        let p = detect_period("december-january.pdf");
        assert_eq!(p.month_name, "January");
    }

    #[test]
    fn nothing_detected() {
        let p = detect_period("statement.pdf");
        assert_eq!(p.month, "");
        assert_eq!(p.month_name, "");
        assert_eq!(p.year, None);
        assert!(!p.has_month());
    }

    #[test]
    fn account_types() {
        let rules = AccountRules::default();
        assert_eq!(
            detect_account_type("checking-202206.pdf", &rules),
            Some(AccountType::Checking)
        );
        assert_eq!(
            detect_account_type("savings_report.pdf", &rules),
            Some(AccountType::Savings)
        );
        assert_eq!(
            detect_account_type("Reserve Fund.pdf", &rules),
            Some(AccountType::Savings)
        );
        assert_eq!(
            detect_account_type("special-assessment.pdf", &rules),
            Some(AccountType::Special)
        );
        assert_eq!(detect_account_type("random.pdf", &rules), None);
    }

    #[test]
    fn account_rule_order_and_suffixes() {
        let rules = AccountRules {
            checking_suffixes: vec!["4821".into()],
            savings_suffixes: vec!["7710".into()],
            special_suffixes: vec!["3056".into()],
        };
        assert_eq!(
            detect_account_type("x7710.pdf", &rules),
            Some(AccountType::Savings)
        );
        assert_eq!(
            detect_account_type("acct-3056.pdf", &rules),
            Some(AccountType::Special)
        );
        // Checking is tried first.
        assert_eq!(
            detect_account_type("savings-4821.pdf", &rules),
            Some(AccountType::Checking)
        );
    }

    #[test]
    fn refine_from_statement_period_and_dates() {
        let mut p = DetectedPeriod::default();
        refine_period(
            &mut p,
            Some("Statement period: March 1 - March 31"),
            &["3/02", "03/05/2021", "03/09/2022"],
        );
        assert_eq!(p.month, "03");
        assert_eq!(p.month_name, "March");
        assert_eq!(p.year, Some(2021));
    }

    #[test]
    fn refine_keeps_known_year() {
        let mut p = DetectedPeriod {
            year: Some(2020),
            ..Default::default()
        };
        refine_period(&mut p, Some("october"), &["10/01/2024"]);
        assert_eq!(p.month, "10");
        assert_eq!(p.year, Some(2020));
    }

    #[test]
    fn refine_without_information_is_a_no_op() {
        let mut p = DetectedPeriod::default();
        refine_period(&mut p, None, &["n/a"]);
        assert_eq!(p, DetectedPeriod::default());
    }
}
