//! Checksum validation for ORCID, ISSN and ISBN

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref ORCID_SHAPE: Regex =
        Regex::new(r"^[0-9]{4}-[0-9]{4}-[0-9]{4}-[0-9]{3}[0-9X]$").unwrap();
    static ref ISSN_SHAPE: Regex = Regex::new(r"^[0-9]{4}-?[0-9]{3}[0-9Xx]$").unwrap();
}

/// Strip the `https://orcid.org/` prefix from an ORCID iD
pub fn normalize_orcid(value: &str) -> String {
    let trimmed = value.trim();
    let lower = trimmed.to_ascii_lowercase();
    for prefix in ["https://orcid.org/", "http://orcid.org/", "orcid.org/"] {
        if lower.starts_with(prefix) {
            return trimmed[prefix.len()..].to_uppercase();
        }
    }
    trimmed.to_uppercase()
}

/// Validate an ORCID iD (`0000-0002-1825-0097`), including its ISO 7064 11,2 check digit.
///
/// Accepts the resolver URL form as well.
pub fn is_valid_orcid(value: &str) -> bool {
    let orcid = normalize_orcid(value);
    if !ORCID_SHAPE.is_match(&orcid) {
        return false;
    }

    let chars: Vec<char> = orcid.chars().filter(|c| *c != '-').collect();
    let mut total: u32 = 0;
    for c in &chars[..15] {
        let digit = c.to_digit(10).unwrap_or(0);
        total = (total + digit) * 2;
    }
    let result = (12 - total % 11) % 11;
    let expected = if result == 10 {
        'X'
    } else {
        char::from_digit(result, 10).unwrap_or('?')
    };
    chars[15] == expected
}

/// Validate an ISSN (`0378-5955`), hyphen optional
pub fn is_valid_issn(value: &str) -> bool {
    let trimmed = value.trim();
    if !ISSN_SHAPE.is_match(trimmed) {
        return false;
    }

    let chars: Vec<char> = trimmed
        .chars()
        .filter(|c| *c != '-')
        .map(|c| c.to_ascii_uppercase())
        .collect();
    let sum: u32 = chars[..7]
        .iter()
        .enumerate()
        .map(|(i, c)| c.to_digit(10).unwrap_or(0) * (8 - i as u32))
        .sum();
    let check = (11 - sum % 11) % 11;
    let expected = if check == 10 {
        'X'
    } else {
        char::from_digit(check, 10).unwrap_or('?')
    };
    chars[7] == expected
}

/// Validate an ISBN-10 or ISBN-13, ignoring hyphens and spaces
pub fn is_valid_isbn(value: &str) -> bool {
    is_valid_isbn_checksum(&normalize_isbn(value))
}

/// Normalize ISBN by removing hyphens and spaces
pub fn normalize_isbn(isbn: &str) -> String {
    isbn.chars()
        .filter(|c| c.is_ascii_digit() || *c == 'X' || *c == 'x')
        .collect::<String>()
        .to_uppercase()
}

fn is_valid_isbn_checksum(isbn: &str) -> bool {
    let digits: Vec<char> = isbn.chars().collect();

    match digits.len() {
        10 => {
            // X is only allowed as the check digit
            if digits[..9].iter().any(|c| *c == 'X') {
                return false;
            }
            let sum: u32 = digits
                .iter()
                .enumerate()
                .map(|(i, &c)| {
                    let value = if c == 'X' {
                        10
                    } else {
                        c.to_digit(10).unwrap_or(0)
                    };
                    value * (10 - i as u32)
                })
                .sum();
            sum % 11 == 0
        }
        13 => {
            if digits.iter().any(|c| *c == 'X') {
                return false;
            }
            let sum: u32 = digits
                .iter()
                .enumerate()
                .map(|(i, &c)| {
                    let value = c.to_digit(10).unwrap_or(0);
                    if i % 2 == 0 {
                        value
                    } else {
                        value * 3
                    }
                })
                .sum();
            sum % 10 == 0
        }
        _ => false,
    }
}
