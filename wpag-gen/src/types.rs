//! Core domain identifiers: technologies, licensed features, post status
//!
//! All three are closed sets. Strings coming from the CLI or config are
//! parsed here (case-insensitive) and rejected immediately when unknown.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::GenError;

// ============================================================================
// Technology
// ============================================================================

/// Technology an article is written about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Technology {
    WordPress,
    JavaScript,
    Python,
    React,
    Vue,
    Sql,
}

impl Technology {
    pub const ALL: [Technology; 6] = [
        Technology::WordPress,
        Technology::JavaScript,
        Technology::Python,
        Technology::React,
        Technology::Vue,
        Technology::Sql,
    ];

    /// Identifier used in configuration and edition allowlists
    pub fn as_str(&self) -> &'static str {
        match self {
            Technology::WordPress => "wordpress",
            Technology::JavaScript => "javascript",
            Technology::Python => "python",
            Technology::React => "react",
            Technology::Vue => "vue",
            Technology::Sql => "sql",
        }
    }
}

impl fmt::Display for Technology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Technology {
    type Err = GenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Technology::ALL
            .into_iter()
            .find(|t| t.as_str() == wanted)
            .ok_or_else(|| {
                GenError::InvalidInput(format!(
                    "Unknown technology '{}' (expected one of: {})",
                    s,
                    Technology::ALL.map(|t| t.as_str()).join(", ")
                ))
            })
    }
}

// ============================================================================
// Feature
// ============================================================================

/// Licensed capability gated by edition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    BasicGeneration,
    DuplicateCheck,
    MultiTech,
    BulkPublish,
    AdvancedTools,
    TagManagement,
}

impl Feature {
    pub const ALL: [Feature; 6] = [
        Feature::BasicGeneration,
        Feature::DuplicateCheck,
        Feature::MultiTech,
        Feature::BulkPublish,
        Feature::AdvancedTools,
        Feature::TagManagement,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Feature::BasicGeneration => "basic_generation",
            Feature::DuplicateCheck => "duplicate_check",
            Feature::MultiTech => "multi_tech",
            Feature::BulkPublish => "bulk_publish",
            Feature::AdvancedTools => "advanced_tools",
            Feature::TagManagement => "tag_management",
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Feature {
    type Err = GenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Feature::ALL
            .into_iter()
            .find(|f| f.as_str() == wanted)
            .ok_or_else(|| GenError::InvalidInput(format!("Unknown feature '{}'", s)))
    }
}

// ============================================================================
// Post status
// ============================================================================

/// WordPress post status used when publishing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    #[default]
    Publish,
    Draft,
    Private,
    Pending,
}

impl PostStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Publish => "publish",
            PostStatus::Draft => "draft",
            PostStatus::Private => "private",
            PostStatus::Pending => "pending",
        }
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PostStatus {
    type Err = GenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "publish" => Ok(PostStatus::Publish),
            "draft" => Ok(PostStatus::Draft),
            "private" => Ok(PostStatus::Private),
            "pending" => Ok(PostStatus::Pending),
            _ => Err(GenError::Config(format!(
                "Invalid post status '{}' (valid: draft, publish, private, pending)",
                s
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_technology_parse_case_insensitive() {
        assert_eq!("Python".parse::<Technology>().unwrap(), Technology::Python);
        assert_eq!(" WORDPRESS ".parse::<Technology>().unwrap(), Technology::WordPress);
        assert_eq!("vue".parse::<Technology>().unwrap(), Technology::Vue);
    }

    #[test]
    fn test_technology_parse_unknown_rejected() {
        let err = "cobol".parse::<Technology>().unwrap_err();
        assert!(matches!(err, GenError::InvalidInput(_)));
        assert!(err.to_string().contains("wordpress"));
    }

    #[test]
    fn test_technology_display_matches_identifier() {
        for tech in Technology::ALL {
            assert_eq!(tech.to_string().parse::<Technology>().unwrap(), tech);
        }
    }

    #[test]
    fn test_feature_parse() {
        assert_eq!("tag_management".parse::<Feature>().unwrap(), Feature::TagManagement);
        assert!("teleportation".parse::<Feature>().is_err());
    }

    #[test]
    fn test_feature_serde_names() {
        let json = serde_json::to_string(&Feature::BulkPublish).unwrap();
        assert_eq!(json, "\"bulk_publish\"");
    }

    #[test]
    fn test_post_status_parse() {
        assert_eq!("draft".parse::<PostStatus>().unwrap(), PostStatus::Draft);
        assert_eq!("Publish".parse::<PostStatus>().unwrap(), PostStatus::Publish);
        assert!(matches!(
            "scheduled".parse::<PostStatus>(),
            Err(GenError::Config(_))
        ));
    }
}
