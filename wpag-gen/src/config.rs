//! Configuration resolution for wpag
//!
//! Every setting is resolved with the priority CLI argument → environment
//! variable → TOML config → built-in default. Invalid values fail fast
//! with [`GenError::Config`].

use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{info, warn};
use wpag_common::config::{resolve_root_folder, TomlConfig, ROOT_FOLDER_ENV};

use crate::error::{GenError, GenResult};
use crate::license::Edition;
use crate::services::completion_client::{
    CompletionSettings, DEFAULT_BASE_URL, DEFAULT_MAX_TOKENS, DEFAULT_MODEL, DEFAULT_TEMPERATURE,
};
use crate::services::wordpress_client::Credentials;
use crate::types::PostStatus;

pub const EDITION_ENV: &str = "EDITION";
pub const WP_SITE_URL_ENV: &str = "WP_SITE_URL";
pub const WP_USER_ENV: &str = "WP_USER";
pub const WP_APP_PASS_ENV: &str = "WP_APP_PASS";
pub const CATEGORY_ID_ENV: &str = "CATEGORY_ID";
pub const POST_STATUS_ENV: &str = "POST_STATUS";
pub const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";
pub const OPENAI_MODEL_ENV: &str = "OPENAI_MODEL";

/// Values given on the command line
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub root_folder: Option<PathBuf>,
    pub edition: Option<String>,
}

/// WordPress connection and publishing settings
#[derive(Debug, Clone)]
pub struct WordPressSettings {
    pub site_url: String,
    pub credentials: Credentials,
    /// Overrides each technology's default category when set
    pub category_id: Option<u64>,
    pub post_status: PostStatus,
}

/// Completion API settings; the key is checked only when needed
#[derive(Clone)]
pub struct OpenAiSettings {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl std::fmt::Debug for OpenAiSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiSettings")
            .field("api_key", &self.api_key.as_ref().map(|_| "<set>"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

/// Fully resolved runtime configuration
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub root_folder: PathBuf,
    pub edition: Edition,
    pub publish_delay: Duration,
    pub log_level: String,
    pub wordpress: WordPressSettings,
    pub openai: OpenAiSettings,
}

impl GeneratorConfig {
    /// Resolve from CLI overrides, environment and a loaded TOML config
    pub fn resolve(cli: &CliOverrides, toml: &TomlConfig) -> GenResult<Self> {
        let root_folder = resolve_root_folder(
            cli.root_folder.as_deref(),
            ROOT_FOLDER_ENV,
            toml.root_folder.as_deref(),
        );

        let edition = match cli.edition.as_deref() {
            Some(value) => value.parse::<Edition>()?,
            None => match resolve_setting("edition", EDITION_ENV, toml.edition.as_deref()) {
                Some(value) => value.parse::<Edition>()?,
                None => Edition::default(),
            },
        };

        let section = &toml.wordpress;
        let site_url = resolve_setting("site URL", WP_SITE_URL_ENV, section.site_url.as_deref())
            .ok_or_else(|| missing("WordPress site URL", WP_SITE_URL_ENV, "[wordpress].site_url"))?;
        let user = resolve_setting("user", WP_USER_ENV, section.user.as_deref())
            .ok_or_else(|| missing("WordPress user", WP_USER_ENV, "[wordpress].user"))?;
        let app_password =
            resolve_setting("application password", WP_APP_PASS_ENV, section.app_password.as_deref())
                .ok_or_else(|| {
                    missing(
                        "WordPress application password",
                        WP_APP_PASS_ENV,
                        "[wordpress].app_password",
                    )
                })?;

        let category_id = match non_empty_env(CATEGORY_ID_ENV) {
            Some(value) => Some(value.trim().parse::<u64>().map_err(|_| {
                GenError::Config(format!("{} must be a positive integer, got '{}'", CATEGORY_ID_ENV, value))
            })?),
            None => section.category_id,
        };

        let post_status = match resolve_setting("post status", POST_STATUS_ENV, section.post_status.as_deref()) {
            Some(value) => value.parse::<PostStatus>()?,
            None => PostStatus::default(),
        };

        let openai_section = &toml.openai;
        let openai = OpenAiSettings {
            api_key: resolve_setting("OpenAI API key", OPENAI_API_KEY_ENV, openai_section.api_key.as_deref()),
            model: resolve_setting("OpenAI model", OPENAI_MODEL_ENV, openai_section.model.as_deref())
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: openai_section
                .base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            temperature: openai_section.temperature.unwrap_or(DEFAULT_TEMPERATURE),
            max_tokens: openai_section.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
        };

        let publish_delay = Duration::from_secs(
            toml.publish_delay_secs
                .unwrap_or(crate::orchestrator::DEFAULT_PUBLISH_DELAY.as_secs()),
        );

        Ok(Self {
            root_folder,
            edition,
            publish_delay,
            log_level: toml.logging.level.clone(),
            wordpress: WordPressSettings {
                site_url,
                credentials: Credentials::new(user, app_password),
                category_id,
                post_status,
            },
            openai,
        })
    }

    /// Load the TOML file (explicit path or default locations) and resolve
    pub fn load(config_path: Option<&Path>, cli: &CliOverrides) -> GenResult<Self> {
        let toml = wpag_common::config::load_config(config_path)?;
        Self::resolve(cli, &toml)
    }

    /// Completion settings, validating the API key
    pub fn completion_settings(&self) -> GenResult<CompletionSettings> {
        let api_key = self
            .openai
            .api_key
            .clone()
            .ok_or_else(|| missing("OpenAI API key", OPENAI_API_KEY_ENV, "[openai].api_key"))?;

        if !api_key.starts_with("sk-") {
            return Err(GenError::Config(
                "Invalid OpenAI API key format (expected 'sk-' prefix)".to_string(),
            ));
        }

        Ok(CompletionSettings {
            api_key,
            model: self.openai.model.clone(),
            base_url: self.openai.base_url.clone(),
            temperature: self.openai.temperature,
            max_tokens: self.openai.max_tokens,
        })
    }
}

/// Starting point written by `wpag init`; placeholders must be edited
pub fn config_template() -> TomlConfig {
    TomlConfig {
        root_folder: Some(wpag_common::config::get_default_root_folder()),
        edition: Some(Edition::default().as_str().to_string()),
        publish_delay_secs: Some(crate::orchestrator::DEFAULT_PUBLISH_DELAY.as_secs()),
        logging: Default::default(),
        wordpress: wpag_common::config::WordPressSection {
            site_url: Some("https://example.com".to_string()),
            user: Some("editor".to_string()),
            app_password: Some("xxxx xxxx xxxx xxxx".to_string()),
            category_id: None,
            post_status: Some(PostStatus::default().to_string()),
        },
        openai: wpag_common::config::OpenAiSection {
            api_key: Some("sk-...".to_string()),
            model: Some(DEFAULT_MODEL.to_string()),
            base_url: None,
            temperature: Some(DEFAULT_TEMPERATURE),
            max_tokens: Some(DEFAULT_MAX_TOKENS),
        },
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Environment variable first, then TOML value; blank values are ignored
fn resolve_setting(label: &str, env_var: &str, toml_value: Option<&str>) -> Option<String> {
    let env_value = non_empty_env(env_var);
    let toml_value = toml_value.filter(|v| !v.trim().is_empty());

    if env_value.is_some() && toml_value.is_some() {
        warn!(
            "{} found in both environment ({}) and TOML config. Using environment.",
            label, env_var
        );
    }

    if let Some(value) = env_value {
        info!("{} loaded from environment variable", label);
        return Some(value);
    }

    toml_value.map(|value| {
        info!("{} loaded from TOML config", label);
        value.to_string()
    })
}

fn missing(what: &str, env_var: &str, toml_key: &str) -> GenError {
    GenError::Config(format!(
        "{} not configured. Set {} or {} in the config file",
        what, env_var, toml_key
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use wpag_common::config::{OpenAiSection, WordPressSection};

    const ALL_ENV: [&str; 10] = [
        ROOT_FOLDER_ENV,
        EDITION_ENV,
        WP_SITE_URL_ENV,
        WP_USER_ENV,
        WP_APP_PASS_ENV,
        CATEGORY_ID_ENV,
        POST_STATUS_ENV,
        OPENAI_API_KEY_ENV,
        OPENAI_MODEL_ENV,
        "RUST_LOG",
    ];

    fn clear_env() {
        for name in ALL_ENV {
            std::env::remove_var(name);
        }
    }

    fn toml_config() -> TomlConfig {
        TomlConfig {
            root_folder: Some(PathBuf::from("/srv/wpag")),
            edition: Some("standard".to_string()),
            publish_delay_secs: Some(5),
            wordpress: WordPressSection {
                site_url: Some("https://blog.example.com".to_string()),
                user: Some("editor".to_string()),
                app_password: Some("abcd efgh".to_string()),
                category_id: None,
                post_status: Some("draft".to_string()),
            },
            openai: OpenAiSection {
                api_key: Some("sk-toml".to_string()),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    #[serial]
    fn test_resolve_from_toml() {
        clear_env();
        let config = GeneratorConfig::resolve(&CliOverrides::default(), &toml_config()).unwrap();

        assert_eq!(config.root_folder, PathBuf::from("/srv/wpag"));
        assert_eq!(config.edition, Edition::Standard);
        assert_eq!(config.publish_delay, Duration::from_secs(5));
        assert_eq!(config.wordpress.site_url, "https://blog.example.com");
        assert_eq!(config.wordpress.post_status, PostStatus::Draft);
        assert_eq!(config.wordpress.category_id, None);
        assert_eq!(config.openai.model, DEFAULT_MODEL);
    }

    #[test]
    #[serial]
    fn test_env_overrides_toml_and_cli_overrides_env() {
        clear_env();
        std::env::set_var(EDITION_ENV, "pro");
        std::env::set_var(CATEGORY_ID_ENV, "42");
        std::env::set_var(POST_STATUS_ENV, "pending");
        std::env::set_var(OPENAI_MODEL_ENV, "gpt-4o-mini");

        let config = GeneratorConfig::resolve(&CliOverrides::default(), &toml_config()).unwrap();
        assert_eq!(config.edition, Edition::Pro);
        assert_eq!(config.wordpress.category_id, Some(42));
        assert_eq!(config.wordpress.post_status, PostStatus::Pending);
        assert_eq!(config.openai.model, "gpt-4o-mini");

        let cli = CliOverrides {
            root_folder: Some(PathBuf::from("/tmp/cli-root")),
            edition: Some("entry".to_string()),
        };
        let config = GeneratorConfig::resolve(&cli, &toml_config()).unwrap();
        assert_eq!(config.edition, Edition::Entry);
        assert_eq!(config.root_folder, PathBuf::from("/tmp/cli-root"));

        clear_env();
    }

    #[test]
    #[serial]
    fn test_defaults_when_unset() {
        clear_env();
        let mut toml = toml_config();
        toml.edition = None;
        toml.publish_delay_secs = None;
        toml.wordpress.post_status = None;

        let config = GeneratorConfig::resolve(&CliOverrides::default(), &toml).unwrap();
        assert_eq!(config.edition, Edition::Entry);
        assert_eq!(config.publish_delay, Duration::from_secs(30));
        assert_eq!(config.wordpress.post_status, PostStatus::Publish);
    }

    #[test]
    #[serial]
    fn test_invalid_values_fail_fast() {
        clear_env();
        let mut toml = toml_config();
        toml.edition = Some("enterprise".to_string());
        assert!(matches!(
            GeneratorConfig::resolve(&CliOverrides::default(), &toml),
            Err(GenError::Config(_))
        ));

        let mut toml = toml_config();
        toml.wordpress.post_status = Some("scheduled".to_string());
        assert!(matches!(
            GeneratorConfig::resolve(&CliOverrides::default(), &toml),
            Err(GenError::Config(_))
        ));

        std::env::set_var(CATEGORY_ID_ENV, "two");
        assert!(matches!(
            GeneratorConfig::resolve(&CliOverrides::default(), &toml_config()),
            Err(GenError::Config(_))
        ));
        clear_env();
    }

    #[test]
    #[serial]
    fn test_missing_password_is_config_error() {
        clear_env();
        let mut toml = toml_config();
        toml.wordpress.app_password = None;

        let err = GeneratorConfig::resolve(&CliOverrides::default(), &toml).unwrap_err();
        assert!(err.to_string().contains(WP_APP_PASS_ENV));
    }

    #[test]
    #[serial]
    fn test_completion_settings_validates_key() {
        clear_env();
        let config = GeneratorConfig::resolve(&CliOverrides::default(), &toml_config()).unwrap();
        let settings = config.completion_settings().unwrap();
        assert_eq!(settings.api_key, "sk-toml");
        assert_eq!(settings.max_tokens, DEFAULT_MAX_TOKENS);

        let mut toml = toml_config();
        toml.openai.api_key = Some("not-a-key".to_string());
        let config = GeneratorConfig::resolve(&CliOverrides::default(), &toml).unwrap();
        assert!(matches!(config.completion_settings(), Err(GenError::Config(_))));

        toml.openai.api_key = None;
        let config = GeneratorConfig::resolve(&CliOverrides::default(), &toml).unwrap();
        assert!(matches!(config.completion_settings(), Err(GenError::Config(_))));
    }

    #[test]
    #[serial]
    fn test_config_template_resolves() {
        clear_env();
        let config = GeneratorConfig::resolve(&CliOverrides::default(), &config_template()).unwrap();
        assert_eq!(config.edition, Edition::Entry);
        assert_eq!(config.wordpress.post_status, PostStatus::Publish);
        assert_eq!(config.publish_delay, Duration::from_secs(30));
        assert!(config.completion_settings().is_ok());
    }

    #[test]
    fn test_openai_settings_debug_hides_key() {
        let settings = OpenAiSettings {
            api_key: Some("sk-secret".to_string()),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        };
        assert!(!format!("{:?}", settings).contains("sk-secret"));
    }
}
