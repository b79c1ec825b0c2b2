use regex::Regex;
use std::sync::LazyLock;

static NAME_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-zA-Z\s]{2,}$").unwrap());
static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]{7,15}$").unwrap());
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

/// Answer that means the visitor declines to give an email address.
pub const SKIP_SENTINEL: &str = "skip";

pub fn valid_name(s: &str) -> bool {
    NAME_RE.is_match(s) && s.chars().filter(|c| c.is_ascii_alphabetic()).count() >= 2
}

pub fn valid_phone(s: &str) -> bool {
    PHONE_RE.is_match(s)
}

/// Email is optional: absent, empty and the skip sentinel all pass.
pub fn valid_email(s: Option<&str>) -> bool {
    match s {
        None => true,
        Some(s) if s.is_empty() || is_skip(s) => true,
        Some(s) => EMAIL_RE.is_match(s),
    }
}

pub fn is_skip(s: &str) -> bool {
    s.eq_ignore_ascii_case(SKIP_SENTINEL)
}

/// Maps an accepted email answer to the stored value.
pub fn normalize_email(s: &str) -> Option<String> {
    let s = s.trim();
    if s.is_empty() || is_skip(s) {
        None
    } else {
        Some(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_name() {
        assert!(valid_name("Jo"));
        assert!(valid_name("Jane Doe"));
        assert!(valid_name("Mary Ann Smith"));

        assert!(!valid_name(""));
        assert!(!valid_name("J"));
        assert!(!valid_name("J "));
        assert!(!valid_name("R2D2"));
        assert!(!valid_name("O'Brien"));
        assert!(!valid_name("Jane-Doe"));
    }

    #[test]
    fn test_valid_phone() {
        assert!(valid_phone("5551234"));
        assert!(valid_phone("123456789012345"));

        assert!(!valid_phone("555123"));
        assert!(!valid_phone("1234567890123456"));
        assert!(!valid_phone("555-1234"));
        assert!(!valid_phone("+15551234567"));
        assert!(!valid_phone("555 1234"));
        assert!(!valid_phone("５５５１２３４"));
    }

    #[test]
    fn test_valid_email() {
        assert!(valid_email(None));
        assert!(valid_email(Some("")));
        assert!(valid_email(Some("a@b.c")));
        assert!(valid_email(Some("jane.doe@clinic.example.com")));

        assert!(!valid_email(Some("a@b")));
        assert!(!valid_email(Some("a b@c.d")));
        assert!(!valid_email(Some("a@@b.c")));
        assert!(!valid_email(Some("plainaddress")));
    }

    #[test]
    fn test_skip_sentinel_is_a_decline() {
        assert!(valid_email(Some("skip")));
        assert!(valid_email(Some("SKIP")));
        assert_eq!(normalize_email("skip"), None);
        assert_eq!(normalize_email("Skip"), None);
        assert_eq!(normalize_email(""), None);
        assert_eq!(normalize_email("a@b.c"), Some("a@b.c".to_string()));
    }
}
