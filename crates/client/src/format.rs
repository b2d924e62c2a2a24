//! Amount and date formatting shared by every form and list.
//!
//! Amount fields follow one rule: strip every non-digit on each keystroke,
//! show the digits grouped with `.` separators, and strip the separators
//! again before the value is sent. Stripping is canonical (no leading zeros),
//! so the round-trip is idempotent.
use chrono::{Datelike, NaiveDate, Utc};
use chrono_tz::Tz;

pub const THOUSANDS_SEPARATOR: char = '.';

const MONTHS_ID: [&str; 12] = [
    "Januari",
    "Februari",
    "Maret",
    "April",
    "Mei",
    "Juni",
    "Juli",
    "Agustus",
    "September",
    "Oktober",
    "November",
    "Desember",
];

/// Keeps only ASCII digits, without leading zeros (`"0"` stays `"0"`).
#[must_use]
pub fn strip_separators(input: &str) -> String {
    let digits: String = input.chars().filter(char::is_ascii_digit).collect();
    let trimmed = digits.trim_start_matches('0');
    if trimmed.is_empty() && !digits.is_empty() {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Groups the digits of `input` by thousands: `"1500000"` → `"1.500.000"`.
#[must_use]
pub fn format_thousands(input: &str) -> String {
    let digits = strip_separators(input);
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(THOUSANDS_SEPARATOR);
        }
        out.push(ch);
    }
    out
}

/// Display value for an amount field after a keystroke.
#[must_use]
pub fn format_amount_input(raw: &str) -> String {
    format_thousands(raw)
}

/// Like [`format_amount_input`] but keeps a leading `-`, for balances.
#[must_use]
pub fn format_signed_amount_input(raw: &str) -> String {
    match raw.trim_start().strip_prefix('-') {
        Some(rest) => format!("-{}", format_thousands(rest)),
        None => format_thousands(raw),
    }
}

/// [`parse_amount`] with an optional leading `-`.
#[must_use]
pub fn parse_signed_amount(input: &str) -> Option<i64> {
    match input.trim().strip_prefix('-') {
        Some(rest) => parse_amount(rest).map(|value| -value),
        None => parse_amount(input),
    }
}

/// Canonical amount from a (possibly formatted) field value.
///
/// Returns `None` for an empty field or a value that does not fit in `i64`.
#[must_use]
pub fn parse_amount(input: &str) -> Option<i64> {
    let digits = strip_separators(input);
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

/// `1500000` → `"Rp 1.500.000"`, `-25000` → `"-Rp 25.000"`.
#[must_use]
pub fn format_rupiah(amount: i64) -> String {
    let sign = if amount < 0 { "-" } else { "" };
    format!(
        "{sign}Rp {}",
        format_thousands(&amount.unsigned_abs().to_string())
    )
}

#[must_use]
pub fn month_name_id(month: u32) -> &'static str {
    MONTHS_ID
        .get(month.saturating_sub(1) as usize)
        .copied()
        .unwrap_or("")
}

/// `2026-10-19` → `"19 Oktober 2026"`.
#[must_use]
pub fn format_date_id(date: NaiveDate) -> String {
    format!(
        "{} {} {}",
        date.day(),
        month_name_id(date.month()),
        date.year()
    )
}

/// Calendar date "now" in the configured timezone.
#[must_use]
pub fn today_in(tz: Tz) -> NaiveDate {
    Utc::now().with_timezone(&tz).date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_everything_but_digits() {
        assert_eq!(strip_separators("Rp 1.000.000"), "1000000");
        assert_eq!(strip_separators("12a3,4"), "1234");
        assert_eq!(strip_separators("007"), "7");
        assert_eq!(strip_separators("000"), "0");
        assert_eq!(strip_separators("abc"), "");
    }

    #[test]
    fn groups_by_thousands() {
        assert_eq!(format_thousands("0"), "0");
        assert_eq!(format_thousands("999"), "999");
        assert_eq!(format_thousands("1000"), "1.000");
        assert_eq!(format_thousands("1500000"), "1.500.000");
        assert_eq!(format_thousands(""), "");
    }

    #[test]
    fn format_then_strip_returns_the_number() {
        for n in [0u64, 7, 999, 1_000, 50_000, 1_234_567, u64::MAX] {
            let digits = n.to_string();
            assert_eq!(strip_separators(&format_thousands(&digits)), digits);
        }
    }

    #[test]
    fn keystroke_formatting_is_idempotent() {
        let once = format_amount_input("1.0000");
        assert_eq!(once, "10.000");
        assert_eq!(format_amount_input(&once), once);
    }

    #[test]
    fn parse_amount_handles_formatted_and_empty_input() {
        assert_eq!(parse_amount("1.000.000"), Some(1_000_000));
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("99999999999999999999"), None);
    }

    #[test]
    fn signed_amounts_keep_their_sign() {
        assert_eq!(format_signed_amount_input("-25000"), "-25.000");
        assert_eq!(format_signed_amount_input("-"), "-");
        assert_eq!(format_signed_amount_input("25.000-"), "25.000");
        assert_eq!(parse_signed_amount("-25.000"), Some(-25_000));
        assert_eq!(parse_signed_amount("1.000"), Some(1_000));
        assert_eq!(parse_signed_amount("-"), None);
    }

    #[test]
    fn rupiah_and_dates() {
        assert_eq!(format_rupiah(1_500_000), "Rp 1.500.000");
        assert_eq!(format_rupiah(-25_000), "-Rp 25.000");
        assert_eq!(format_rupiah(0), "Rp 0");
        let date = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        assert_eq!(format_date_id(date), "19 Oktober 2026");
        assert_eq!(month_name_id(13), "");
    }
}
