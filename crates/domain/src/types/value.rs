//! Typed cell values and the comparison rule used to decide whether a
//! field needs a patch

use std::fmt;

use serde::{Deserialize, Serialize};

/// Value as it travels over the sheet API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Field value as seen by the reconciliation logic.
///
/// `ZeroPadded` marks identifiers such as `"0123"` whose leading zeros carry
/// meaning. A padded digit run matches the same digits written without
/// padding (`123`), but always renders and writes back in its padded form.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    #[default]
    Empty,
    Text(String),
    ZeroPadded(String),
    Number(f64),
    Flag(bool),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        let value = value.into();
        if value.trim().is_empty() {
            Self::Empty
        } else {
            Self::Text(value)
        }
    }

    pub fn number(value: impl Into<f64>) -> Self {
        Self::Number(value.into())
    }

    /// Classify a raw cell value. Strings with a leading zero that parse as
    /// numbers are marked `ZeroPadded`.
    pub fn from_cell(cell: Option<&CellValue>) -> Self {
        match cell {
            None => Self::Empty,
            Some(CellValue::Bool(b)) => Self::Flag(*b),
            Some(CellValue::Number(n)) => Self::Number(*n),
            Some(CellValue::Text(s)) if s.is_empty() => Self::Empty,
            Some(CellValue::Text(s)) if is_zero_padded(s) => Self::ZeroPadded(s.clone()),
            Some(CellValue::Text(s)) => Self::Text(s.clone()),
        }
    }

    /// Like [`from_cell`](Self::from_cell), but keeps the sheet's display
    /// text for integral numbers too large to survive an `f64`.
    pub fn from_cell_with_display(cell: Option<&CellValue>, display: Option<&str>) -> Self {
        match (cell, display) {
            (Some(CellValue::Number(n)), Some(text))
                if n.fract() == 0.0 && n.abs() >= EXACT_INTEGER_LIMIT && is_integer_text(text) =>
            {
                Self::Text(text.trim().to_string())
            }
            _ => Self::from_cell(cell),
        }
    }

    /// Value to send in a cell update; `None` for `Empty`.
    pub fn to_cell(&self) -> Option<CellValue> {
        match self {
            Self::Empty => None,
            Self::Text(s) | Self::ZeroPadded(s) => Some(CellValue::Text(s.clone())),
            Self::Number(n) => Some(CellValue::Number(*n)),
            Self::Flag(b) => Some(CellValue::Bool(*b)),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Canonical string form used for comparison and logging.
    ///
    /// Integral numbers render without a fractional part, numeric text is
    /// rendered the same way, flags render as `1`/`0`.
    pub fn render(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::ZeroPadded(s) => s.clone(),
            Self::Text(s) => match parse_number(s) {
                Some(n) if n.abs() < EXACT_INTEGER_LIMIT => render_number(n),
                _ => s.clone(),
            },
            Self::Number(n) => render_number(*n),
            Self::Flag(b) => if *b { "1" } else { "0" }.to_string(),
        }
    }

    /// Digits of an integral value written without leading zeros.
    fn unpadded_digits(&self) -> Option<String> {
        match self {
            Self::Number(n) if n.fract() == 0.0 && *n >= 0.0 && *n < EXACT_INTEGER_LIMIT => {
                Some(format!("{}", *n as u64))
            }
            Self::Text(s) if is_digit_run(s.trim()) => Some(strip_padding(s.trim()).to_string()),
            _ => None,
        }
    }

    /// Whether `self` (authoritative) differs from `current` enough to warrant
    /// a write. Empty authoritative values never do.
    ///
    /// A padded current value only matches an unpadded authoritative one when
    /// both are plain digit runs; two padded values compare literally.
    pub fn differs_from(&self, current: &FieldValue) -> bool {
        if self.is_empty() {
            return false;
        }
        if let Self::ZeroPadded(padded) = current {
            if is_digit_run(padded) {
                if let Some(digits) = self.unpadded_digits() {
                    return digits != strip_padding(padded);
                }
            }
        }
        self.render() != current.render()
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::text(value)
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::text(value)
    }
}

fn parse_number(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() || !trimmed.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Integral magnitudes from here on are not reliably exact in an `f64`.
const EXACT_INTEGER_LIMIT: f64 = 1e15;

fn is_digit_run(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn is_integer_text(s: &str) -> bool {
    let s = s.trim();
    is_digit_run(s.strip_prefix('-').unwrap_or(s))
}

fn strip_padding(digits: &str) -> &str {
    let stripped = digits.trim_start_matches('0');
    if stripped.is_empty() {
        "0"
    } else {
        stripped
    }
}

fn is_zero_padded(s: &str) -> bool {
    s.len() > 1 && s.starts_with('0') && !s.starts_with("0.") && parse_number(s).is_some()
}

fn render_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < EXACT_INTEGER_LIMIT {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}
