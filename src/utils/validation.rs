use crate::error::{AppError, AppResult};
use regex::Regex;
use std::sync::LazyLock;

pub const TITLE_MAX_LEN: usize = 100;
pub const CITY_MAX_LEN: usize = 50;
pub const CATEGORY_MAX_LEN: usize = 50;
pub const DESCRIPTION_MAX_LEN: usize = 1000;
pub const NAME_MAX_LEN: usize = 100;
pub const EMAIL_MAX_LEN: usize = 254;
pub const PRICE_MIN: i64 = 0;
pub const PRICE_MAX: i64 = 10_000;

static EVENT_HANDLER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)on\w+=").unwrap());
static JAVASCRIPT_SCHEME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)javascript:").unwrap());
static EMAIL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

/// 清理用户输入的文本：去掉尖括号、脚本协议和事件属性，并截断到 `max_len` 个字符
pub fn sanitize_text(text: &str, max_len: usize) -> String {
    let without_brackets: String = text.chars().filter(|c| *c != '<' && *c != '>').collect();
    let without_scheme = JAVASCRIPT_SCHEME.replace_all(&without_brackets, "");
    let cleaned = EVENT_HANDLER.replace_all(&without_scheme, "");
    cleaned.trim().chars().take(max_len).collect()
}

/// Sanitizes a required field and rejects it when nothing is left.
pub fn required_text(field: &str, text: &str, max_len: usize) -> AppResult<String> {
    let cleaned = sanitize_text(text, max_len);
    if cleaned.is_empty() {
        return Err(AppError::ValidationError(format!("{field} is required")));
    }
    Ok(cleaned)
}

pub fn optional_text(text: Option<&str>, max_len: usize) -> Option<String> {
    text.map(|t| sanitize_text(t, max_len))
        .filter(|t| !t.is_empty())
}

pub fn validate_email(email: &str) -> AppResult<String> {
    let email = email.trim();
    if email.len() > EMAIL_MAX_LEN || !EMAIL.is_match(email) {
        return Err(AppError::ValidationError("invalid email address".into()));
    }
    Ok(email.to_ascii_lowercase())
}

pub fn validate_price(price: i64) -> AppResult<i64> {
    if !(PRICE_MIN..=PRICE_MAX).contains(&price) {
        return Err(AppError::ValidationError(format!(
            "price must be between {PRICE_MIN} and {PRICE_MAX}"
        )));
    }
    Ok(price)
}

/// Filters are forgiving: out-of-range values are pulled into range instead of rejected.
pub fn clamp_price(price: i64) -> i64 {
    price.clamp(PRICE_MIN, PRICE_MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_text() {
        assert_eq!(sanitize_text("  Taladro <b>Bosch</b> ", 100), "Taladro bBosch/b");
        assert_eq!(sanitize_text("javascript:alert(1)", 100), "alert(1)");
        assert_eq!(sanitize_text("img onerror=steal()", 100), "img steal()");
        assert_eq!(sanitize_text("abcdef", 3), "abc");
        assert_eq!(sanitize_text("   ", 10), "");
    }

    #[test]
    fn test_required_text() {
        assert!(required_text("title", "<>", 100).is_err());
        assert_eq!(required_text("title", " Carpa ", 100).unwrap(), "Carpa");
    }

    #[test]
    fn test_optional_text() {
        assert_eq!(optional_text(None, 10), None);
        assert_eq!(optional_text(Some("  "), 10), None);
        assert_eq!(optional_text(Some("Madrid"), 10), Some("Madrid".into()));
    }

    #[test]
    fn test_validate_email() {
        assert_eq!(validate_email(" Ahmed@RH.com ").unwrap(), "ahmed@rh.com");
        assert!(validate_email("no-at-sign.com").is_err());
        assert!(validate_email("a b@rh.com").is_err());
        assert!(validate_email(&format!("{}@rh.com", "a".repeat(260))).is_err());
    }

    #[test]
    fn test_price_bounds() {
        assert!(validate_price(250).is_ok());
        assert!(validate_price(-1).is_err());
        assert!(validate_price(10_001).is_err());
        assert_eq!(clamp_price(-5), 0);
        assert_eq!(clamp_price(20_000), 10_000);
    }
}
