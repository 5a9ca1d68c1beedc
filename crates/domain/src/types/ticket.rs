//! Ticket key normalization

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static CW_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^CW\s*-*\s*").expect("CW_PREFIX should compile - this is a bug"));

static TRAILING_SUFFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\.\d+|-\d+)$").expect("TRAILING_SUFFIX should compile - this is a bug")
});

static TICKET_DELIMITERS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[|,]+").expect("TICKET_DELIMITERS should compile - this is a bug"));

static DIGIT_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d+").expect("DIGIT_RUN should compile - this is a bug"));

/// Normalize a raw ticket identifier.
///
/// Removes all whitespace, a leading `CW` prefix with optional `-`
/// separators (case-insensitive), then one trailing `.N` or `-N` suffix.
///
/// ```
/// use sheetsync_domain::types::ticket::normalize_ticket_number;
///
/// assert_eq!(normalize_ticket_number("CW - 3615596"), "3615596");
/// assert_eq!(normalize_ticket_number("CW3615596-1"), "3615596");
/// assert_eq!(normalize_ticket_number("3615596.2"), "3615596");
/// ```
pub fn normalize_ticket_number(raw: &str) -> String {
    let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    let without_prefix = CW_PREFIX.replace(&compact, "");
    TRAILING_SUFFIX.replace(&without_prefix, "").into_owned()
}

/// Candidate ticket numbers found in free text.
///
/// Splits on runs of `,` or `|`, then on whitespace, and returns every run
/// of ASCII digits in order. Callers normalize each candidate.
pub fn extract_ticket_numbers(text: &str) -> Vec<String> {
    TICKET_DELIMITERS
        .split(text)
        .flat_map(str::split_whitespace)
        .flat_map(|token| DIGIT_RUN.find_iter(token).map(|m| m.as_str().to_string()))
        .collect()
}

/// Normalized ticket identifier used to match rows across systems.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TicketKey(String);

impl TicketKey {
    /// Normalize `raw`; `None` when nothing is left.
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = normalize_ticket_number(raw);
        if normalized.is_empty() {
            None
        } else {
            Some(Self(normalized))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Order numbers the ERP may file this ticket under.
    ///
    /// Orders are entered either as the bare ticket (optionally with a
    /// `.1`–`.3` split suffix) or with a `CW` prefix and `-1`–`-3` suffix.
    pub fn erp_order_numbers(&self) -> Vec<String> {
        let key = &self.0;
        let mut numbers = Vec::with_capacity(8);
        numbers.push(key.clone());
        numbers.extend((1..=3).map(|n| format!("{key}.{n}")));
        numbers.push(format!("CW{key}"));
        numbers.extend((1..=3).map(|n| format!("CW{key}-{n}")));
        numbers
    }
}

impl fmt::Display for TicketKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TicketKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Validates the documented normalization examples.
    ///
    /// Assertions:
    /// - Prefix with spaced dash, prefix with suffix, bare suffix and plain
    ///   keys all normalize to `"3615596"`.
    #[test]
    fn test_normalize_examples() {
        assert_eq!(normalize_ticket_number("CW - 3615596"), "3615596");
        assert_eq!(normalize_ticket_number("CW3615596-1"), "3615596");
        assert_eq!(normalize_ticket_number("3615596-1"), "3615596");
        assert_eq!(normalize_ticket_number("3615596"), "3615596");
    }

    #[test]
    fn test_normalize_case_and_whitespace() {
        assert_eq!(normalize_ticket_number("  cw-3615596.3 "), "3615596");
        assert_eq!(normalize_ticket_number("Cw  --  36 15 596"), "3615596");
        assert_eq!(normalize_ticket_number("\t3615596\n"), "3615596");
    }

    /// Validates idempotence for well-formed keys.
    ///
    /// Assertions:
    /// - `normalize(normalize(x)) == normalize(x)` for each sample.
    #[test]
    fn test_normalize_idempotent() {
        for raw in ["CW - 3615596", "CW3615596-1", "3615596.2", "3615596", "cw 42-7", ""] {
            let once = normalize_ticket_number(raw);
            assert_eq!(normalize_ticket_number(&once), once, "not idempotent for {raw:?}");
        }
    }

    #[test]
    fn test_normalize_strips_only_last_suffix() {
        assert_eq!(normalize_ticket_number("3615596-1-2"), "3615596-1");
    }

    #[test]
    fn test_normalize_leaves_other_prefixes() {
        assert_eq!(normalize_ticket_number("PWO12345"), "PWO12345");
    }

    /// Validates escalation ticket extraction.
    ///
    /// Assertions:
    /// - `"CW3615596-1, CW3700000-2"` yields digit runs including both
    ///   ticket bodies, which normalize to `"3615596"` and `"3700000"`.
    #[test]
    fn test_extract_ticket_numbers() {
        let found = extract_ticket_numbers("CW3615596-1, CW3700000-2");
        assert_eq!(found, vec!["3615596", "1", "3700000", "2"]);
        let keys: Vec<String> = found.iter().map(|c| normalize_ticket_number(c)).collect();
        assert!(keys.contains(&"3615596".to_string()));
        assert!(keys.contains(&"3700000".to_string()));
    }

    #[test]
    fn test_extract_pipe_and_space_delimited() {
        assert_eq!(
            extract_ticket_numbers("3615596 | 3700000 3800000,,3900000"),
            vec!["3615596", "3700000", "3800000", "3900000"]
        );
        assert!(extract_ticket_numbers("no tickets here").is_empty());
    }

    #[test]
    fn test_ticket_key_parse() {
        assert_eq!(TicketKey::parse("CW-3615596.1").map(|k| k.to_string()), Some("3615596".into()));
        assert_eq!(TicketKey::parse("   "), None);
        assert_eq!(TicketKey::parse("CW-"), None);
    }

    #[test]
    fn test_erp_order_numbers() {
        let key = TicketKey::parse("3615596").unwrap();
        assert_eq!(
            key.erp_order_numbers(),
            vec![
                "3615596",
                "3615596.1",
                "3615596.2",
                "3615596.3",
                "CW3615596",
                "CW3615596-1",
                "CW3615596-2",
                "CW3615596-3",
            ]
        );
    }
}
