//! 表单校验规则
//!
//! 纯函数形式的字段校验，错误按字段名收集到 [`FieldErrors`]，
//! 界面层据此在对应输入框下方显示提示。

use regex::Regex;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::sync::LazyLock;

pub const MIN_PASSWORD_LEN: usize = 6;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

/// 埃塞俄比亚手机号：`+2519xxxxxxxx`、`2519xxxxxxxx`、`09xxxxxxxx` 或 `9xxxxxxxx`（7 开头同理）
static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\+?251|0)?[79]\d{8}$").expect("phone pattern is valid")
});

/// 按字段收集的校验错误
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// 同一字段只保留第一条错误
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.0.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// 第一条错误，用于 toast 提示
    pub fn first_message(&self) -> Option<&str> {
        self.0.values().next().map(String::as_str)
    }

    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

// =========================================================
// 单字段规则
// =========================================================

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_RE.is_match(value.trim())
}

/// 号码中的空格与连字符会被忽略
pub fn is_valid_phone(value: &str) -> bool {
    let compact: String = value
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect();
    PHONE_RE.is_match(&compact)
}

/// 密码强度问题，`None` 表示通过
pub fn password_problem(value: &str) -> Option<&'static str> {
    if value.chars().count() < MIN_PASSWORD_LEN {
        return Some("Password must be at least 6 characters");
    }
    if !value.chars().any(|c| c.is_ascii_uppercase()) {
        return Some("Password must contain an uppercase letter");
    }
    if !value.chars().any(|c| c.is_ascii_lowercase()) {
        return Some("Password must contain a lowercase letter");
    }
    if !value.chars().any(|c| c.is_ascii_digit()) {
        return Some("Password must contain a number");
    }
    None
}

// =========================================================
// 收集型辅助函数
// =========================================================

pub fn require(errors: &mut FieldErrors, field: &'static str, label: &str, value: &str) -> bool {
    if value.trim().is_empty() {
        errors.add(field, format!("{} is required", label));
        false
    } else {
        true
    }
}

pub fn require_email(errors: &mut FieldErrors, field: &'static str, value: &str) {
    if require(errors, field, "Email", value) && !is_valid_email(value) {
        errors.add(field, "Enter a valid email address");
    }
}

pub fn require_phone(errors: &mut FieldErrors, field: &'static str, value: &str) {
    if require(errors, field, "Phone number", value) && !is_valid_phone(value) {
        errors.add(field, "Enter a valid phone number (e.g. 0911234567)");
    }
}

/// 可选号码：为空时跳过
pub fn optional_phone(errors: &mut FieldErrors, field: &'static str, value: &str) {
    if !value.trim().is_empty() && !is_valid_phone(value) {
        errors.add(field, "Enter a valid phone number (e.g. 0911234567)");
    }
}

pub fn require_password(errors: &mut FieldErrors, field: &'static str, value: &str) {
    if let Some(problem) = password_problem(value) {
        errors.add(field, problem);
    }
}

/// 解析 `[min, max]` 区间内的十进制数
pub fn parse_decimal_in_range(
    errors: &mut FieldErrors,
    field: &'static str,
    label: &str,
    value: &str,
    min: Decimal,
    max: Option<Decimal>,
) -> Option<Decimal> {
    let Ok(parsed) = value.trim().parse::<Decimal>() else {
        errors.add(field, format!("{} must be a number", label));
        return None;
    };
    if parsed < min || max.is_some_and(|m| parsed > m) {
        let msg = match max {
            Some(m) => format!("{} must be between {} and {}", label, min, m),
            None => format!("{} must be at least {}", label, min),
        };
        errors.add(field, msg);
        return None;
    }
    Some(parsed)
}

/// 非负整数（库存等）
pub fn parse_count(
    errors: &mut FieldErrors,
    field: &'static str,
    label: &str,
    value: &str,
) -> Option<u32> {
    match value.trim().parse::<u32>() {
        Ok(v) => Some(v),
        Err(_) => {
            errors.add(field, format!("{} must be a whole number of 0 or more", label));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_rule() {
        assert!(is_valid_email("manager@pharma.et"));
        assert!(is_valid_email("  a.b@c.co  "));
        assert!(!is_valid_email("manager@pharma"));
        assert!(!is_valid_email("man ager@pharma.et"));
        assert!(!is_valid_email("@pharma.et"));
    }

    #[test]
    fn phone_rule() {
        assert!(is_valid_phone("0911234567"));
        assert!(is_valid_phone("+251911234567"));
        assert!(is_valid_phone("251 711 234 567"));
        assert!(is_valid_phone("0911-234-567"));
        assert!(!is_valid_phone("0811234567"));
        assert!(!is_valid_phone("091123456"));
        assert!(!is_valid_phone("phone"));
    }

    #[test]
    fn password_rule_reports_first_problem() {
        assert_eq!(
            password_problem("Ab1"),
            Some("Password must be at least 6 characters")
        );
        assert_eq!(
            password_problem("abcdef1"),
            Some("Password must contain an uppercase letter")
        );
        assert_eq!(
            password_problem("ABCDEF1"),
            Some("Password must contain a lowercase letter")
        );
        assert_eq!(
            password_problem("Abcdefg"),
            Some("Password must contain a number")
        );
        assert_eq!(password_problem("Abcde1"), None);
    }

    #[test]
    fn first_error_per_field_wins() {
        let mut errors = FieldErrors::new();
        require_email(&mut errors, "email", "");
        require_email(&mut errors, "email", "bad");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("email"), Some("Email is required"));
    }

    #[test]
    fn decimal_range() {
        let mut errors = FieldErrors::new();
        let hundred = Decimal::ONE_HUNDRED;
        assert_eq!(
            parse_decimal_in_range(&mut errors, "d", "Discount", "12.5", Decimal::ZERO, Some(hundred)),
            Some(Decimal::new(125, 1))
        );
        assert!(errors.is_empty());

        assert_eq!(
            parse_decimal_in_range(&mut errors, "d", "Discount", "120", Decimal::ZERO, Some(hundred)),
            None
        );
        assert_eq!(errors.get("d"), Some("Discount must be between 0 and 100"));

        let mut errors = FieldErrors::new();
        assert_eq!(
            parse_decimal_in_range(&mut errors, "p", "Price", "-1", Decimal::ZERO, None),
            None
        );
        assert_eq!(errors.get("p"), Some("Price must be at least 0"));
    }

    #[test]
    fn count_rejects_negative() {
        let mut errors = FieldErrors::new();
        assert_eq!(parse_count(&mut errors, "stock", "Stock", "-3"), None);
        assert!(errors.contains("stock"));
        assert_eq!(parse_count(&mut errors, "other", "Stock", " 7 "), Some(7));
    }
}
