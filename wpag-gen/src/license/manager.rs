//! License gate: edition entitlements and the monthly quota
//!
//! Denials are ordinary `false` results. Each denial is logged at warn
//! level together with an [`UpsellNotice`] naming editions that would
//! have allowed the request.

use std::fmt::Write as _;
use std::path::Path;

use wpag_common::PeriodKey;

use crate::license::edition::{Edition, EditionSpec, Quota};
use crate::license::messages::{UpsellNotice, UpsellReason};
use crate::license::usage_store::{UsageRecord, UsageStore};
use crate::types::{Feature, Technology};

/// Usage snapshot for one period
#[derive(Debug, Clone)]
pub struct UsageStats {
    pub edition: &'static EditionSpec,
    pub period: PeriodKey,
    pub current_usage: u32,
    pub limit: Quota,
    /// `None` when the quota is unlimited
    pub remaining: Option<u32>,
    /// 0.0 when the quota is unlimited
    pub usage_percentage: f64,
}

pub struct LicenseManager {
    edition: Edition,
    store: UsageStore,
    usage: UsageRecord,
}

impl LicenseManager {
    /// Create a manager, loading the current usage record from `store`
    pub fn new(edition: Edition, store: UsageStore) -> Self {
        let usage = store.load();
        let spec = edition.spec();

        tracing::info!(
            edition = %edition,
            name = spec.name,
            usage_file = %store.path().display(),
            "License manager initialized"
        );

        Self {
            edition,
            store,
            usage,
        }
    }

    /// Create a manager whose usage file lives in `root_folder`
    pub fn open(edition: Edition, root_folder: &Path) -> Self {
        Self::new(edition, UsageStore::for_edition(root_folder, edition))
    }

    pub fn edition(&self) -> Edition {
        self.edition
    }

    pub fn edition_info(&self) -> &'static EditionSpec {
        self.edition.spec()
    }

    pub fn available_technologies(&self) -> &'static [Technology] {
        self.edition_info().technologies
    }

    pub fn available_features(&self) -> &'static [Feature] {
        self.edition_info().features
    }

    /// Whether the edition covers `technology` (case-insensitive)
    pub fn check_technology_access(&self, technology: &str) -> bool {
        let allowed = technology
            .parse::<Technology>()
            .map(|t| self.edition_info().allows_technology(t))
            .unwrap_or(false);

        if !allowed {
            tracing::warn!(
                technology = %technology,
                edition = self.edition_info().name,
                "Technology not available in this edition"
            );
            if let Some(notice) = self.technology_upsell(technology) {
                tracing::warn!("\n{}", notice);
            }
        }
        allowed
    }

    /// Whether the edition includes `feature` (case-insensitive)
    pub fn check_feature_access(&self, feature: &str) -> bool {
        let allowed = feature
            .parse::<Feature>()
            .map(|f| self.edition_info().allows_feature(f))
            .unwrap_or(false);

        if !allowed {
            tracing::warn!(
                feature = %feature,
                edition = self.edition_info().name,
                "Feature not available in this edition"
            );
            if let Some(notice) = self.feature_upsell(feature) {
                tracing::warn!("\n{}", notice);
            }
        }
        allowed
    }

    /// Typed shorthand for [`Self::check_feature_access`]
    pub fn has_feature(&self, feature: Feature) -> bool {
        self.check_feature_access(feature.as_str())
    }

    /// Whether `requested` more articles fit in this month's quota
    pub fn check_usage_limit(&self, requested: u32) -> bool {
        self.check_usage_limit_in_period(&PeriodKey::current(), requested)
    }

    /// [`Self::check_usage_limit`] for an explicit period
    ///
    /// All or nothing: a request that does not fit entirely is denied.
    pub fn check_usage_limit_in_period(&self, period: &PeriodKey, requested: u32) -> bool {
        let limit = match self.edition_info().quota {
            Quota::Unlimited => return true,
            Quota::Limited(limit) => limit,
        };

        let current = self.usage_in_period(period);
        let total = u64::from(current) + u64::from(requested);

        if total > u64::from(limit) {
            tracing::warn!(
                current,
                limit,
                remaining = limit.saturating_sub(current),
                requested,
                period = %period,
                "Monthly article limit would be exceeded"
            );
            if let Some(notice) = self.quota_upsell(current) {
                tracing::warn!("\n{}", notice);
            }
            return false;
        }

        tracing::info!(after_request = total, limit, "Usage limit check passed");
        true
    }

    /// Add `count` articles to this month's usage and persist the record
    pub fn record_usage(&mut self, count: u32) {
        self.record_usage_in_period(&PeriodKey::current(), count);
    }

    /// [`Self::record_usage`] for an explicit period
    ///
    /// The in-memory count is updated even when the file cannot be written.
    pub fn record_usage_in_period(&mut self, period: &PeriodKey, count: u32) {
        let entry = self.usage.entry(period.as_str().to_string()).or_insert(0);
        *entry = entry.saturating_add(count);
        let current = *entry;

        if let Err(e) = self.store.save(&self.usage) {
            tracing::error!(
                path = %self.store.path().display(),
                error = %e,
                "Failed to save usage record"
            );
        }

        match self.edition_info().quota {
            Quota::Limited(limit) => {
                tracing::info!(current, limit, added = count, period = %period, "Usage recorded")
            }
            Quota::Unlimited => {
                tracing::info!(current, added = count, period = %period, "Usage recorded (unlimited)")
            }
        }
    }

    pub fn usage_in_period(&self, period: &PeriodKey) -> u32 {
        self.usage.get(period.as_str()).copied().unwrap_or(0)
    }

    pub fn get_usage_stats(&self) -> UsageStats {
        self.get_usage_stats_in_period(&PeriodKey::current())
    }

    pub fn get_usage_stats_in_period(&self, period: &PeriodKey) -> UsageStats {
        let spec = self.edition_info();
        let current_usage = self.usage_in_period(period);

        let (remaining, usage_percentage) = match spec.quota {
            Quota::Limited(limit) => (
                Some(limit.saturating_sub(current_usage)),
                if limit == 0 {
                    0.0
                } else {
                    f64::from(current_usage) / f64::from(limit) * 100.0
                },
            ),
            Quota::Unlimited => (None, 0.0),
        };

        UsageStats {
            edition: spec,
            period: period.clone(),
            current_usage,
            limit: spec.quota,
            remaining,
            usage_percentage,
        }
    }

    /// Editions other than this one whose allowlist contains `technology`
    pub fn technology_upsell(&self, technology: &str) -> Option<UpsellNotice> {
        let tech = technology.parse::<Technology>().ok()?;
        self.entitlement_upsell(technology, |spec| spec.allows_technology(tech))
    }

    /// Editions other than this one that include `feature`
    pub fn feature_upsell(&self, feature: &str) -> Option<UpsellNotice> {
        let feat = feature.parse::<Feature>().ok()?;
        self.entitlement_upsell(feature, |spec| spec.allows_feature(feat))
    }

    /// Editions with a higher quota than this one
    pub fn quota_upsell(&self, current_usage: u32) -> Option<UpsellNotice> {
        let current = self.edition_info();
        let Quota::Limited(limit) = current.quota else {
            return None;
        };

        let suggestions = self.other_editions(|spec| spec.quota.exceeds(current.quota));
        if suggestions.is_empty() {
            return None;
        }

        Some(UpsellNotice {
            reason: UpsellReason::Quota {
                current: current_usage,
                limit,
            },
            current,
            suggestions,
        })
    }

    fn entitlement_upsell<F>(&self, name: &str, includes: F) -> Option<UpsellNotice>
    where
        F: Fn(&EditionSpec) -> bool,
    {
        let suggestions = self.other_editions(includes);
        if suggestions.is_empty() {
            return None;
        }

        Some(UpsellNotice {
            reason: UpsellReason::Entitlement(name.trim().to_lowercase()),
            current: self.edition_info(),
            suggestions,
        })
    }

    fn other_editions<F>(&self, predicate: F) -> Vec<&'static EditionSpec>
    where
        F: Fn(&EditionSpec) -> bool,
    {
        Edition::ALL
            .iter()
            .filter(|e| **e != self.edition)
            .map(Edition::spec)
            .filter(|spec| predicate(*spec))
            .collect()
    }

    /// Human-readable summary of the edition and this month's usage
    pub fn edition_report(&self) -> String {
        let spec = self.edition_info();
        let stats = self.get_usage_stats();
        let rule = "=".repeat(60);
        let mut out = String::new();

        // Writing into a String cannot fail
        let _ = writeln!(out, "{}", rule);
        let _ = writeln!(out, "{} ({}/month)", spec.name, spec.price_label());
        let _ = writeln!(out, "{}", rule);
        let _ = writeln!(out, "{}", spec.description);
        let _ = writeln!(out);
        let _ = writeln!(out, "Usage for {}:", stats.period);

        match (stats.limit, stats.remaining) {
            (Quota::Limited(limit), Some(remaining)) => {
                let _ = writeln!(out, "  used:      {}/{} articles", stats.current_usage, limit);
                let _ = writeln!(out, "  remaining: {} articles", remaining);
                let _ = writeln!(out, "  usage:     {:.1}%", stats.usage_percentage);
            }
            _ => {
                let _ = writeln!(out, "  used:      {} articles [unlimited]", stats.current_usage);
            }
        }

        let _ = writeln!(out);
        let _ = writeln!(out, "Technologies:");
        for tech in spec.technologies {
            let _ = writeln!(out, "  - {}", tech);
        }

        let _ = writeln!(out);
        let _ = writeln!(out, "Features:");
        for feature in spec.features {
            let _ = writeln!(out, "  - {}", feature);
        }
        let _ = write!(out, "{}", rule);

        out
    }
}
