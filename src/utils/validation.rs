use crate::utils::error::{HimayaError, Result};
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

const OCTET: &str = r"(?:25[0-5]|2[0-4][0-9]|1[0-9]{2}|[1-9]?[0-9])";
const H16: &str = r"(?:0|[1-9A-Fa-f][0-9A-Fa-f]{0,3})";

/// Dot-atom or quoted local part, then a hostname, IPv4 literal or IPv6 literal.
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    let atom = r"[!#-'*+/-9=?A-Z\^-~-]+";
    let local = format!(r#"(?:{atom}(?:\.{atom})*|"(?:[\]!#-\[\^-~ \t]|\\[\t -~])+")"#);
    let label = r"[0-9A-Za-z](?:[0-9A-Za-z-]{0,61}[0-9A-Za-z])?";
    let ipv4 = format!(r"{OCTET}(?:\.{OCTET}){{3}}");
    let ipv6 = format!(
        concat!(
            r"(?:(?:(?:{h}:){{6}}",
            r"|::(?:{h}:){{5}}",
            r"|[0-9A-Fa-f]{{0,4}}::(?:{h}:){{4}}",
            r"|(?:(?:{h}:)?{h})?::(?:{h}:){{3}}",
            r"|(?:(?:{h}:){{0,2}}{h})?::(?:{h}:){{2}}",
            r"|(?:(?:{h}:){{0,3}}{h})?::{h}:",
            r"|(?:(?:{h}:){{0,4}}{h})?::)",
            r"(?:{h}:{h}|{ipv4})",
            r"|(?:(?:{h}:){{0,5}}{h})?::{h}",
            r"|(?:(?:{h}:){{0,6}}{h})?::)"
        ),
        h = H16,
        ipv4 = ipv4
    );
    let pattern = format!(
        r"^{local}@(?:{label}(?:\.{label})*|\[(?:{ipv4}|IPv6:{ipv6})\])$"
    );
    Regex::new(&pattern).expect("email pattern is a valid regex")
});

/// General address literal, e.g. `user@[tag:content]`. A tag of `IPv6` is only
/// accepted through the strict IPv6 form above.
static EMAIL_GENERAL_LITERAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    let atom = r"[!#-'*+/-9=?A-Z\^-~-]+";
    let local = format!(r#"(?:{atom}(?:\.{atom})*|"(?:[\]!#-\[\^-~ \t]|\\[\t -~])+")"#);
    let pattern = format!(r"^{local}@\[([0-9A-Za-z-]*[0-9A-Za-z]):[!-Z\^-~]+\]$");
    Regex::new(&pattern).expect("address literal pattern is a valid regex")
});

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+[0-9]+$").expect("phone pattern is a valid regex"));

pub fn validate_email(value: &str) -> bool {
    if EMAIL_RE.is_match(value) {
        return true;
    }

    EMAIL_GENERAL_LITERAL_RE
        .captures(value)
        .is_some_and(|caps| &caps[1] != "IPv6")
}

pub fn validate_phone_number(value: &str) -> bool {
    PHONE_RE.is_match(value)
}

/// 帳號類型：email 或手機號碼
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountKind {
    Email,
    Phone,
}

impl AccountKind {
    /// The two patterns are disjoint (a phone number has no `@`), so an
    /// identifier is either exactly one kind or rejected.
    pub fn classify(value: &str) -> Result<Self> {
        match (validate_email(value), validate_phone_number(value)) {
            (true, false) => Ok(AccountKind::Email),
            (false, true) => Ok(AccountKind::Phone),
            _ => Err(HimayaError::AmbiguousAccountType {
                value: value.to_string(),
            }),
        }
    }
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(HimayaError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(HimayaError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(HimayaError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(HimayaError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(HimayaError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(HimayaError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(HimayaError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email_accepts_common_forms() {
        assert!(validate_email("a@b.co"));
        assert!(validate_email("first.last+tag@sub.example.org"));
        assert!(validate_email("\"quoted local\"@example.com"));
        assert!(validate_email("user@localhost"));
    }

    #[test]
    fn test_validate_email_accepts_address_literals() {
        assert!(validate_email("user@[192.168.0.1]"));
        assert!(validate_email("user@[IPv6:2001:db8::1]"));
        assert!(validate_email("user@[IPv6:::1]"));
        assert!(validate_email("user@[x-tag:opaque]"));
    }

    #[test]
    fn test_validate_email_rejects_malformed() {
        assert!(!validate_email("no-at-sign"));
        assert!(!validate_email(""));
        assert!(!validate_email("@example.com"));
        assert!(!validate_email("user@"));
        assert!(!validate_email("two@@example.com"));
        assert!(!validate_email("dots..together@example.com"));
        assert!(!validate_email("user@-leading-hyphen.com"));
        assert!(!validate_email("user name@example.com"));
        assert!(!validate_email("user@[256.1.1.1]"));
        assert!(!validate_email("user@[IPv6:not-an-address]"));
    }

    #[test]
    fn test_validate_phone_number() {
        assert!(validate_phone_number("+14155552671"));
        assert!(validate_phone_number("+1"));
        assert!(!validate_phone_number("14155552671"));
        assert!(!validate_phone_number("+abc"));
        assert!(!validate_phone_number("+1 415 555 2671"));
        assert!(!validate_phone_number("+"));
    }

    #[test]
    fn test_account_kind_classify() {
        assert_eq!(AccountKind::classify("a@b.co").unwrap(), AccountKind::Email);
        assert_eq!(
            AccountKind::classify("+14155552671").unwrap(),
            AccountKind::Phone
        );

        let err = AccountKind::classify("definitely not an account").unwrap_err();
        assert!(matches!(err, HimayaError::AmbiguousAccountType { .. }));
        assert_eq!(err.code(), "Ambiguous Account Type");
    }

    #[test]
    fn test_validate_url() {
        assert!(validate_url("breach_api.base_url", "https://example.com").is_ok());
        assert!(validate_url("breach_api.base_url", "http://example.com").is_ok());
        assert!(validate_url("breach_api.base_url", "").is_err());
        assert!(validate_url("breach_api.base_url", "invalid-url").is_err());
        assert!(validate_url("breach_api.base_url", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("pricing.promos", 0.9, 0.0, 1.0).is_ok());
        assert!(validate_range("pricing.promos", 1.5, 0.0, 1.0).is_err());
    }
}
