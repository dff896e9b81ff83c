//! Scalar validators, one per type tag.
//!
//! All validators take the raw string rendering of a value. `Int` and
//! `Boolean` reject quoted input; `Date` accepts an optional pair of
//! surrounding quotes; `Email`, `UUID` and `Auth-Token` match their grammar
//! against the raw text, so surrounding quotes make them fail.

use std::sync::LazyLock;

use regex::Regex;

/// Longest accepted email address.
pub const MAX_EMAIL_LENGTH: usize = 255;

/// Longest accepted local part (before `@`).
pub const MAX_EMAIL_LOCAL_LENGTH: usize = 64;

const UUID_LENGTH: usize = 36;

/// RFC 5321 style address: dot-atom local part, at least two domain labels
/// of up to 63 characters each. The local-part length is checked separately.
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+(\.[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+)*@",
        r"[A-Za-z0-9]([A-Za-z0-9-]{0,61}[A-Za-z0-9])?(\.[A-Za-z0-9]([A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$",
    ))
    .expect("email pattern compiles")
});

static UUID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$")
        .expect("uuid pattern compiles")
});

static AUTH_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Bearer [a-zA-Z0-9]+$").expect("auth token pattern compiles"));

/// Optional leading `-`, then one or more ASCII digits. Never quoted.
pub fn is_int(s: &str) -> bool {
    let digits = s.strip_prefix('-').unwrap_or(s);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Exactly `true` or `false`, unquoted.
pub fn is_boolean(s: &str) -> bool {
    s == "true" || s == "false"
}

/// Non-empty, single line.
pub fn is_string(s: &str) -> bool {
    !s.is_empty() && !s.contains(['\r', '\n'])
}

/// `dd-mm-yyyy`, optionally wrapped in double quotes, and a real calendar day.
pub fn is_date(s: &str) -> bool {
    let clean = if s.starts_with('"') && s.ends_with('"') {
        if s.len() != 12 {
            return false;
        }
        &s[1..11]
    } else if s.len() != 10 {
        return false;
    } else {
        s
    };

    let b = clean.as_bytes();
    if b[2] != b'-' || b[5] != b'-' {
        return false;
    }
    let (Some(day), Some(month), Some(year)) = (
        parse_digits(&b[0..2]),
        parse_digits(&b[3..5]),
        parse_digits(&b[6..10]),
    ) else {
        return false;
    };

    is_calendar_date(day, month, year)
}

/// Address of at most 255 characters with a 1..=64 character local part.
pub fn is_email(s: &str) -> bool {
    if s.len() > MAX_EMAIL_LENGTH {
        return false;
    }
    match s.find('@') {
        Some(at) if (1..=MAX_EMAIL_LOCAL_LENGTH).contains(&at) => EMAIL_RE.is_match(s),
        _ => false,
    }
}

/// 8-4-4-4-12 hex groups, case-insensitive.
pub fn is_uuid(s: &str) -> bool {
    s.len() == UUID_LENGTH && UUID_RE.is_match(s)
}

/// `Bearer ` followed by one or more ASCII alphanumerics.
pub fn is_auth_token(s: &str) -> bool {
    AUTH_TOKEN_RE.is_match(s)
}

fn parse_digits(bytes: &[u8]) -> Option<u32> {
    bytes.iter().try_fold(0u32, |acc, b| {
        b.is_ascii_digit().then(|| acc * 10 + u32::from(b - b'0'))
    })
}

fn is_calendar_date(day: u32, month: u32, year: u32) -> bool {
    const DAYS_IN_MONTH: [u32; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

    if !(1..=12).contains(&month) || day < 1 || !(1000..=9999).contains(&year) {
        return false;
    }
    if month == 2 && is_leap_year(year) {
        return day <= 29;
    }
    day <= DAYS_IN_MONTH[(month - 1) as usize]
}

fn is_leap_year(year: u32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}
