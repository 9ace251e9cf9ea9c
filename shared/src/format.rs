//! 显示格式化：货币 (ETB) 与日期

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;

pub const CURRENCY: &str = "ETB";

/// `ETB 1,234.50`，负数为 `-ETB 12.00`
pub fn format_etb(amount: Decimal) -> String {
    let rounded = amount.round_dp(2);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let fixed = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    format!("{}{} {}.{}", sign, CURRENCY, group_thousands(int_part), frac_part)
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

pub fn format_date(at: &DateTime<Utc>) -> String {
    at.format("%b %d, %Y").to_string()
}

pub fn format_day(day: &NaiveDate) -> String {
    day.format("%b %d, %Y").to_string()
}

pub fn format_datetime(at: &DateTime<Utc>) -> String {
    at.format("%b %d, %Y %H:%M").to_string()
}

/// 可选日期，缺失时显示 `—`
pub fn format_optional_date(at: Option<&DateTime<Utc>>) -> String {
    at.map(format_date).unwrap_or_else(|| "—".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::str::FromStr;

    #[test]
    fn currency() {
        assert_eq!(format_etb(Decimal::ZERO), "ETB 0.00");
        assert_eq!(format_etb(Decimal::from_str("5.5").unwrap()), "ETB 5.50");
        assert_eq!(format_etb(Decimal::from_str("999.999").unwrap()), "ETB 1,000.00");
        assert_eq!(format_etb(Decimal::from_str("1234567.891").unwrap()), "ETB 1,234,567.89");
        assert_eq!(format_etb(Decimal::from_str("-12").unwrap()), "-ETB 12.00");
    }

    #[test]
    fn dates() {
        let at = Utc.with_ymd_and_hms(2026, 1, 5, 14, 30, 0).unwrap();
        assert_eq!(format_date(&at), "Jan 05, 2026");
        assert_eq!(format_datetime(&at), "Jan 05, 2026 14:30");
        assert_eq!(format_optional_date(None), "—");
    }
}
