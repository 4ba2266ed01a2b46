//! Format validators for the `format` keyword. Each function takes the
//! instance string and reports whether it conforms; `format` itself treats
//! an unknown format name as always-valid (see `keywords::format`).
use std::net::IpAddr;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveTime};
use url::Url;

lazy_static::lazy_static! {
    static ref HOSTNAME_RE: regex::Regex = regex::Regex::new(
        r"^[a-zA-Z0-9]([a-zA-Z0-9\-]{0,61}[a-zA-Z0-9])?(\.[a-zA-Z0-9]([a-zA-Z0-9\-]{0,61}[a-zA-Z0-9])?)*$"
    ).expect("valid regex");
    static ref JSON_POINTER_RE: regex::Regex =
        regex::Regex::new(r"^(/(([^/~])|(~[01]))*)*$").expect("valid regex");
    static ref RELATIVE_JSON_POINTER_RE: regex::Regex =
        regex::Regex::new(r"^(0|[1-9][0-9]*)(#|(/(([^/~])|(~[01]))*)*)$").expect("valid regex");
}

pub fn date(value: &str) -> bool {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
}

pub fn date_time(value: &str) -> bool {
    DateTime::parse_from_rfc3339(value).is_ok()
}

pub fn time(value: &str) -> bool {
    NaiveTime::parse_from_str(value, "%H:%M:%S").is_ok()
        || NaiveTime::parse_from_str(value, "%H:%M:%S%.f").is_ok()
}

pub fn email(value: &str) -> bool {
    email_address::EmailAddress::is_valid(value)
}

pub fn hostname(value: &str) -> bool {
    value.len() <= 255 && HOSTNAME_RE.is_match(value)
}

pub fn ipv4(value: &str) -> bool {
    matches!(IpAddr::from_str(value), Ok(IpAddr::V4(_)))
}

pub fn ipv6(value: &str) -> bool {
    matches!(IpAddr::from_str(value), Ok(IpAddr::V6(_)))
}

pub fn uri(value: &str) -> bool {
    Url::parse(value).is_ok()
}

pub fn uri_reference(value: &str) -> bool {
    Url::parse(value).is_ok() || Url::options().base_url(Some(&placeholder_base())).parse(value).is_ok()
}

pub fn json_pointer(value: &str) -> bool {
    JSON_POINTER_RE.is_match(value)
}

pub fn relative_json_pointer(value: &str) -> bool {
    RELATIVE_JSON_POINTER_RE.is_match(value)
}

pub fn regex_format(value: &str) -> bool {
    regex::Regex::new(value).is_ok()
}

fn placeholder_base() -> Url {
    Url::parse("http://example.com/").expect("valid URL")
}

/// The formats recognized by the Draft 4 meta-schema by default. Additional
/// formats can be registered on a [`crate::metaschema::JsonMetaSchema`]
/// without touching this list.
pub fn draft4_formats() -> Vec<(&'static str, crate::metaschema::FormatValidator)> {
    vec![
        ("date", date),
        ("date-time", date_time),
        ("time", time),
        ("email", email),
        ("hostname", hostname),
        ("ipv4", ipv4),
        ("ipv6", ipv6),
        ("uri", uri),
        ("uri-reference", uri_reference),
        ("json-pointer", json_pointer),
        ("relative-json-pointer", relative_json_pointer),
        ("regex", regex_format),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_time_accepts_rfc3339() {
        assert!(date_time("2020-01-02T10:00:00Z"));
        assert!(!date_time("not-a-date"));
    }

    #[test]
    fn date_accepts_calendar_date_only() {
        assert!(date("2020-01-02"));
        assert!(!date("2020-01-02T10:00:00Z"));
    }

    #[test]
    fn ipv4_rejects_ipv6() {
        assert!(ipv4("127.0.0.1"));
        assert!(!ipv4("::1"));
    }

    #[test]
    fn email_rejects_missing_at_sign() {
        assert!(email("user@example.com"));
        assert!(!email("not-an-email"));
    }

    #[test]
    fn hostname_rejects_overlong_labels() {
        assert!(hostname("example.com"));
        let overlong = "a".repeat(64);
        assert!(!hostname(&overlong));
    }
}
