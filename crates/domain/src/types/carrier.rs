//! Carrier detection from tracking number shape

use std::fmt;

use once_cell::sync::Lazy;
use regex::RegexSet;
use serde::{Deserialize, Serialize};

static USPS_PATTERNS: Lazy<RegexSet> = Lazy::new(|| {
    RegexSet::new([
        r"^(94|93|92|95)[0-9]{20}$",
        r"^(94|93|92|95)[0-9]{22}$",
        r"^(70|14|23|03)[0-9]{14}$",
        r"^(M0|82)[0-9]{8}$",
        r"^[A-Z]{2}[0-9]{9}[A-Z]{2}$",
    ])
    .expect("USPS_PATTERNS should compile - this is a bug")
});

static UPS_PATTERNS: Lazy<RegexSet> = Lazy::new(|| {
    RegexSet::new([
        r"^1Z[0-9A-Z]{16}$",
        r"^T+[0-9A-Z]{10}$",
        r"^[0-9]{9}$",
        r"^[0-9]{26}$",
        r"^[0-9]{8}$",
    ])
    .expect("UPS_PATTERNS should compile - this is a bug")
});

static FEDEX_PATTERNS: Lazy<RegexSet> = Lazy::new(|| {
    RegexSet::new([r"^[0-9]{20}$", r"^[0-9]{15}$", r"^[0-9]{12}$", r"^[0-9]{22}$"])
        .expect("FEDEX_PATTERNS should compile - this is a bug")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Carrier {
    Usps,
    Ups,
    FedEx,
}

impl Carrier {
    /// Carrier for a tracking number. USPS patterns win over UPS, UPS over
    /// FedEx.
    pub fn classify(tracking_number: &str) -> Option<Self> {
        let tracking = tracking_number.trim();
        if USPS_PATTERNS.is_match(tracking) {
            Some(Self::Usps)
        } else if UPS_PATTERNS.is_match(tracking) {
            Some(Self::Ups)
        } else if FEDEX_PATTERNS.is_match(tracking) {
            Some(Self::FedEx)
        } else {
            None
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Usps => "USPS",
            Self::Ups => "UPS",
            Self::FedEx => "FedEx",
        }
    }
}

impl fmt::Display for Carrier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
