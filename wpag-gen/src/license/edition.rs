//! Editions and their static entitlements

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::GenError;
use crate::types::{Feature, Technology};

/// Monthly article quota
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quota {
    Limited(u32),
    Unlimited,
}

impl Quota {
    pub fn is_unlimited(&self) -> bool {
        matches!(self, Quota::Unlimited)
    }

    /// Whether this quota allows more articles than `other`
    pub fn exceeds(&self, other: Quota) -> bool {
        match (self, other) {
            (Quota::Unlimited, Quota::Limited(_)) => true,
            (Quota::Limited(a), Quota::Limited(b)) => *a > b,
            (_, Quota::Unlimited) => false,
        }
    }
}

impl fmt::Display for Quota {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quota::Limited(n) => write!(f, "{} articles/month", n),
            Quota::Unlimited => f.write_str("unlimited"),
        }
    }
}

/// License edition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Edition {
    #[default]
    Entry,
    Standard,
    Pro,
}

/// Static entitlements of one edition
#[derive(Debug)]
pub struct EditionSpec {
    pub edition: Edition,
    pub name: &'static str,
    /// Monthly price in JPY
    pub price: u32,
    pub quota: Quota,
    pub technologies: &'static [Technology],
    pub features: &'static [Feature],
    pub description: &'static str,
}

const ALL_TECHNOLOGIES: &[Technology] = &Technology::ALL;

static ENTRY: EditionSpec = EditionSpec {
    edition: Edition::Entry,
    name: "エントリー版",
    price: 12_800,
    quota: Quota::Limited(50),
    technologies: &[Technology::WordPress],
    features: &[Feature::BasicGeneration, Feature::DuplicateCheck],
    description: "WordPress記事のみ、月50記事まで",
};

static STANDARD: EditionSpec = EditionSpec {
    edition: Edition::Standard,
    name: "スタンダード版",
    price: 24_800,
    quota: Quota::Limited(200),
    technologies: ALL_TECHNOLOGIES,
    features: &[
        Feature::BasicGeneration,
        Feature::DuplicateCheck,
        Feature::MultiTech,
        Feature::BulkPublish,
    ],
    description: "6技術対応、月200記事まで",
};

static PRO: EditionSpec = EditionSpec {
    edition: Edition::Pro,
    name: "プロ版",
    price: 49_800,
    quota: Quota::Unlimited,
    technologies: ALL_TECHNOLOGIES,
    features: &Feature::ALL,
    description: "全機能、無制限",
};

impl Edition {
    pub const ALL: [Edition; 3] = [Edition::Entry, Edition::Standard, Edition::Pro];

    pub fn as_str(&self) -> &'static str {
        match self {
            Edition::Entry => "entry",
            Edition::Standard => "standard",
            Edition::Pro => "pro",
        }
    }

    pub fn spec(&self) -> &'static EditionSpec {
        match self {
            Edition::Entry => &ENTRY,
            Edition::Standard => &STANDARD,
            Edition::Pro => &PRO,
        }
    }
}

impl EditionSpec {
    pub fn allows_technology(&self, technology: Technology) -> bool {
        self.technologies.contains(&technology)
    }

    pub fn allows_feature(&self, feature: Feature) -> bool {
        self.features.contains(&feature)
    }

    /// Formatted monthly price, e.g. `¥24,800`
    pub fn price_label(&self) -> String {
        let digits = self.price.to_string();
        let mut out = String::with_capacity(digits.len() + 4);
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                out.push(',');
            }
            out.push(c);
        }
        format!("¥{}", out)
    }
}

impl fmt::Display for Edition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Edition {
    type Err = GenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "entry" => Ok(Edition::Entry),
            "standard" => Ok(Edition::Standard),
            "pro" => Ok(Edition::Pro),
            _ => Err(GenError::Config(format!(
                "Invalid edition '{}' (valid: entry, standard, pro)",
                s
            ))),
        }
    }
}
