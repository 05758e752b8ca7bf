//! Upgrade notices shown when an edition denies a request
//!
//! Notices are plain values. Rendering one never changes what the
//! license gate decided.

use std::fmt;

use crate::license::edition::{EditionSpec, Quota};

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

/// What the operator asked for that the current edition lacks
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpsellReason {
    /// A technology or feature name
    Entitlement(String),
    /// More articles than the remaining quota
    Quota { current: u32, limit: u32 },
}

/// Call-to-action listing the editions that would satisfy the request
#[derive(Debug, Clone)]
pub struct UpsellNotice {
    pub reason: UpsellReason,
    pub current: &'static EditionSpec,
    pub suggestions: Vec<&'static EditionSpec>,
}

impl UpsellNotice {
    pub fn suggested_editions(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.suggestions.iter().map(|s| s.edition.as_str())
    }
}

impl fmt::Display for UpsellNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", RULE)?;
        match &self.reason {
            UpsellReason::Entitlement(name) => {
                writeln!(f, "UPGRADE AVAILABLE")?;
                writeln!(f, "'{}' is available in:", name)?;
                for s in &self.suggestions {
                    writeln!(f)?;
                    writeln!(f, "  {} ({}/month)", s.name, s.price_label())?;
                    writeln!(f, "    {}", s.description)?;
                }
                writeln!(f)?;
                writeln!(
                    f,
                    "Current plan: {} ({}/month)",
                    self.current.name,
                    self.current.price_label()
                )?;
            }
            UpsellReason::Quota { current, limit } => {
                writeln!(f, "MONTHLY LIMIT REACHED ({}/{})", current, limit)?;
                writeln!(f, "Editions with a higher limit:")?;
                for s in &self.suggestions {
                    writeln!(f)?;
                    writeln!(f, "  {} ({}/month)", s.name, s.price_label())?;
                    writeln!(f, "    Limit: {}", s.quota)?;
                    writeln!(f, "    {}", s.description)?;
                }
                writeln!(f)?;
                writeln!(
                    f,
                    "Current plan: {} ({})",
                    self.current.name,
                    Quota::Limited(*limit)
                )?;
            }
        }
        write!(f, "{}", RULE)
    }
}
