//! Site configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. The file lives in
//! the content root and is layered over the stock defaults, so a site only
//! needs to spell out the values it wants to change.
//!
//! ## Configuration Options
//!
//! ```toml
//! title = "TechBlog"
//! description = "Personal writings about software technologies"
//! site_url = "https://jeromewu.github.io"
//!
//! [author]
//! name = "Jerome Wu"
//! summary = "Personal writings about software technologies"
//!
//! [social]
//! twitter = "jeromewu"       # free-form handles, used for feed/meta only
//!
//! [[links]]                  # bio icon links, in display order
//! label = "GitHub"
//! url = "https://github.com/jeromewu"
//! icon = "github"            # github | linkedin | medium | file | resume | twitter
//!
//! [avatar]
//! path = "assets/profile-pic.jpg"
//! width = 50
//! height = 50
//! quality = 95
//!
//! [integrations.google_analytics]
//! tracking_id = "UA-179270444-1"
//!
//! [integrations.adsense]
//! publisher_id = "ca-pub-2729756604971245"
//!
//! [integrations.web_fonts]
//! families = ["Noto Sans", "Noto Serif"]
//!
//! [integrations.disqus]
//! shortname = "jeromewu"
//!
//! [feed]
//! enabled = true
//! path = "rss.xml"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
///
/// Renderers never read this directly through a global; the driver loads it
/// once and hands the relevant parts to each component.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    pub title: String,
    pub description: String,
    /// Absolute site URL without trailing slash, used for feed permalinks.
    pub site_url: String,
    /// Document language (`<html lang>` and feed language).
    pub language: String,
    pub author: AuthorConfig,
    /// Free-form social handles (`social.twitter = "..."`).
    pub social: BTreeMap<String, String>,
    /// Bio icon links in display order.
    pub links: Vec<LinkConfig>,
    pub avatar: AvatarConfig,
    /// Optional standalone landing page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub landing: Option<LandingConfig>,
    pub integrations: IntegrationsConfig,
    pub markdown: MarkdownConfig,
    pub feed: FeedConfig,
    /// Optional web app manifest.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manifest: Option<ManifestConfig>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "My Blog".to_string(),
            description: String::new(),
            site_url: String::new(),
            language: "en".to_string(),
            author: AuthorConfig::default(),
            social: BTreeMap::new(),
            links: Vec::new(),
            avatar: AvatarConfig::default(),
            landing: None,
            integrations: IntegrationsConfig::default(),
            markdown: MarkdownConfig::default(),
            feed: FeedConfig::default(),
            manifest: None,
        }
    }
}

static INTEGRATION_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("static regex"));

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.avatar.quality == 0 || self.avatar.quality > 100 {
            return Err(ConfigError::Validation(
                "avatar.quality must be 1-100".into(),
            ));
        }
        if self.avatar.width == 0 || self.avatar.height == 0 {
            return Err(ConfigError::Validation(
                "avatar.width and avatar.height must be non-zero".into(),
            ));
        }
        let ids = [
            (
                "integrations.google_analytics.tracking_id",
                self.integrations.google_analytics.tracking_id.as_deref(),
            ),
            (
                "integrations.adsense.publisher_id",
                self.integrations.adsense.publisher_id.as_deref(),
            ),
            (
                "integrations.disqus.shortname",
                self.integrations.disqus.shortname.as_deref(),
            ),
        ];
        for (key, id) in ids {
            let Some(id) = id else { continue };
            if !id.is_empty() && !INTEGRATION_ID.is_match(id) {
                return Err(ConfigError::Validation(format!(
                    "{key} may only contain letters, digits, '-' and '_': {id:?}"
                )));
            }
        }
        if self.feed.enabled {
            if self.site_url.is_empty() {
                return Err(ConfigError::Validation(
                    "site_url is required when the feed is enabled".into(),
                ));
            }
            if self.feed.path.trim().is_empty() {
                return Err(ConfigError::Validation("feed.path must not be empty".into()));
            }
            if !stays_in_output(&self.feed.path) {
                return Err(ConfigError::Validation(format!(
                    "feed.path must stay inside the output directory: {:?}",
                    self.feed.path
                )));
            }
        }
        if let Some(landing) = &self.landing {
            if landing.path.trim_matches('/').is_empty() {
                return Err(ConfigError::Validation(
                    "landing.path must name a directory".into(),
                ));
            }
            if !stays_in_output(&landing.path) {
                return Err(ConfigError::Validation(format!(
                    "landing.path must stay inside the output directory: {:?}",
                    landing.path
                )));
            }
        }
        Ok(())
    }

    /// Site URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.site_url.trim_end_matches('/')
    }
}

/// Output-relative path with no parent segments or drive prefixes.
fn stays_in_output(path: &str) -> bool {
    !path
        .split(['/', '\\'])
        .any(|seg| seg == ".." || seg.contains(':'))
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuthorConfig {
    pub name: String,
    pub summary: String,
}

/// One bio icon link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LinkConfig {
    /// Accessible label (`aria-label`), e.g. `"GitHub"`.
    #[serde(default)]
    pub label: String,
    pub url: String,
    /// Icon glyph id; resolved when the bio is rendered.
    pub icon: String,
}

/// Profile picture source and the fixed size it is rendered at.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AvatarConfig {
    /// Path relative to the content root.
    pub path: String,
    pub width: u32,
    pub height: u32,
    /// JPEG encoding quality (1-100).
    pub quality: u32,
}

impl Default for AvatarConfig {
    fn default() -> Self {
        Self {
            path: "assets/profile-pic.jpg".to_string(),
            width: 50,
            height: 50,
            quality: 95,
        }
    }
}

/// Standalone landing page: name, icon links, job title, location.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LandingConfig {
    /// Output directory, relative to the site root.
    #[serde(default = "default_landing_path")]
    pub path: String,
    /// Overrides `author.name` on the landing page when set.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub job_title: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub links: Vec<LandingLinkConfig>,
}

fn default_landing_path() -> String {
    "about".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LandingLinkConfig {
    pub href: String,
    pub icon: String,
    #[serde(default)]
    pub alt: String,
}

/// Third-party integrations injected into every page head.
///
/// Each integration is skipped when its identifier is absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IntegrationsConfig {
    pub google_analytics: GoogleAnalyticsConfig,
    pub adsense: AdsenseConfig,
    pub web_fonts: WebFontsConfig,
    pub disqus: DisqusConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GoogleAnalyticsConfig {
    pub tracking_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AdsenseConfig {
    pub publisher_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WebFontsConfig {
    /// Google Fonts family names.
    pub families: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DisqusConfig {
    pub shortname: Option<String>,
}

/// Ordered markdown transform chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MarkdownConfig {
    pub plugins: Vec<PluginDecl>,
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        let mut images = toml::Table::new();
        images.insert("max_width".into(), toml::Value::Integer(630));
        let mut iframe = toml::Table::new();
        iframe.insert(
            "wrapper_style".into(),
            toml::Value::String("margin-bottom: 1.0725rem".into()),
        );
        Self {
            plugins: vec![
                PluginDecl::with_options("images", images),
                PluginDecl::with_options("responsive-iframe", iframe),
                PluginDecl::new("prismjs"),
                PluginDecl::new("copy-linked-files"),
                PluginDecl::new("smartypants"),
            ],
        }
    }
}

/// A named plugin plus its options table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PluginDecl {
    pub resolve: String,
    #[serde(default)]
    pub options: toml::Table,
}

impl PluginDecl {
    pub fn new(resolve: &str) -> Self {
        Self {
            resolve: resolve.to_string(),
            options: toml::Table::new(),
        }
    }

    pub fn with_options(resolve: &str, options: toml::Table) -> Self {
        Self {
            resolve: resolve.to_string(),
            options,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FeedConfig {
    pub enabled: bool,
    /// Output path relative to the site root.
    pub path: String,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            path: "rss.xml".to_string(),
        }
    }
}

/// Web app manifest (`manifest.webmanifest`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ManifestConfig {
    pub name: String,
    #[serde(default)]
    pub short_name: String,
    #[serde(default = "default_start_url")]
    pub start_url: String,
    #[serde(default = "default_background")]
    pub background_color: String,
    #[serde(default = "default_background")]
    pub theme_color: String,
    #[serde(default = "default_display")]
    pub display: String,
    /// Icon path relative to the content root; copied to the output root.
    #[serde(default)]
    pub icon: Option<String>,
}

fn default_start_url() -> String {
    "/".to_string()
}

fn default_background() -> String {
    "#ffffff".to_string()
}

fn default_display() -> String {
    "minimal-ui".to_string()
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay, arrays included, replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = path.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the given content root.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(root)?;
    resolve_config(base, overlay)
}

/// Returns a commented stock `config.toml`, printed by `folio gen-config`.
pub fn stock_config_toml() -> &'static str {
    r##"# folio configuration
# ===================
# Place this file at content/config.toml. Every key is optional; values
# shown are the defaults unless marked as an example.
# Unknown keys will cause an error.

title = "My Blog"
description = ""
# Required when [feed] is enabled.
site_url = ""
language = "en"

[author]
# Leave the name empty to hide the "Written by" line in the bio.
name = ""
summary = ""

# Free-form social handles.
[social]
# twitter = "handle"

# Bio icon links, rendered in this order. Icons:
# github, linkedin, medium, file (alias: resume), twitter
# [[links]]
# label = "GitHub"
# url = "https://github.com/you"
# icon = "github"

# ---------------------------------------------------------------------------
# Profile picture, relative to the content root. Missing file = no avatar.
# ---------------------------------------------------------------------------
[avatar]
path = "assets/profile-pic.jpg"
width = 50
height = 50
quality = 95

# ---------------------------------------------------------------------------
# Optional landing page (example)
# ---------------------------------------------------------------------------
# [landing]
# path = "about"
# job_title = "Software Engineer"
# location = "Taipei City, Taiwan"
# [[landing.links]]
# href = "https://github.com/you"
# icon = "github"
# alt = "github-logo"

# ---------------------------------------------------------------------------
# Head-injected integrations. An absent ID skips that integration.
# ---------------------------------------------------------------------------
[integrations.google_analytics]
# tracking_id = "UA-000000-1"

[integrations.adsense]
# publisher_id = "ca-pub-0000000000000000"

[integrations.web_fonts]
families = []

[integrations.disqus]
# shortname = "your-site"

# ---------------------------------------------------------------------------
# Markdown transform chain, applied in order.
# Steps: images, responsive-iframe, prismjs, copy-linked-files, smartypants
# ---------------------------------------------------------------------------
[[markdown.plugins]]
resolve = "images"
options = { max_width = 630 }

[[markdown.plugins]]
resolve = "responsive-iframe"
options = { wrapper_style = "margin-bottom: 1.0725rem" }

[[markdown.plugins]]
resolve = "prismjs"

[[markdown.plugins]]
resolve = "copy-linked-files"

[[markdown.plugins]]
resolve = "smartypants"

# ---------------------------------------------------------------------------
# RSS feed
# ---------------------------------------------------------------------------
[feed]
enabled = false
path = "rss.xml"

# ---------------------------------------------------------------------------
# Optional web app manifest (example)
# ---------------------------------------------------------------------------
# [manifest]
# name = "My Blog"
# short_name = "Blog"
# start_url = "/"
# background_color = "#ffffff"
# theme_color = "#663399"
# display = "minimal-ui"
# icon = "assets/icon.png"
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_has_no_integrations() {
        let config = SiteConfig::default();
        assert!(config.integrations.google_analytics.tracking_id.is_none());
        assert!(config.integrations.adsense.publisher_id.is_none());
        assert!(config.integrations.web_fonts.families.is_empty());
    }

    #[test]
    fn default_markdown_chain_order() {
        let config = SiteConfig::default();
        let names: Vec<&str> = config
            .markdown
            .plugins
            .iter()
            .map(|p| p.resolve.as_str())
            .collect();
        assert_eq!(
            names,
            [
                "images",
                "responsive-iframe",
                "prismjs",
                "copy-linked-files",
                "smartypants"
            ]
        );
    }

    #[test]
    fn parse_partial_config() {
        let toml = r#"
title = "TechBlog"

[author]
name = "Jerome Wu"
"#;
        let config: SiteConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.title, "TechBlog");
        assert_eq!(config.author.name, "Jerome Wu");
        assert_eq!(config.author.summary, "");
        assert_eq!(config.avatar.width, 50);
    }

    #[test]
    fn parse_links_preserves_order() {
        let toml = r#"
[[links]]
url = "https://medium.com/@x"
icon = "medium"

[[links]]
url = "https://github.com/x"
icon = "github"
"#;
        let config: SiteConfig = toml::from_str(toml).unwrap();
        let icons: Vec<&str> = config.links.iter().map(|l| l.icon.as_str()).collect();
        assert_eq!(icons, ["medium", "github"]);
    }

    #[test]
    fn parse_landing_defaults_path() {
        let toml = r#"
[landing]
job_title = "Engineer"
"#;
        let config: SiteConfig = toml::from_str(toml).unwrap();
        let landing = config.landing.unwrap();
        assert_eq!(landing.path, "about");
        assert!(landing.links.is_empty());
    }

    #[test]
    fn parse_plugin_options() {
        let toml = r#"
[[markdown.plugins]]
resolve = "images"
options = { max_width = 800 }
"#;
        let config: SiteConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.markdown.plugins.len(), 1);
        assert_eq!(
            config.markdown.plugins[0].options["max_width"].as_integer(),
            Some(800)
        );
    }

    // =========================================================================
    // load_config tests
    // =========================================================================

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.title, "My Blog");
        assert!(!config.feed.enabled);
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("config.toml"),
            r#"
title = "TechBlog"
site_url = "https://example.com"

[integrations.adsense]
publisher_id = "ca-pub-123"

[feed]
enabled = true
"#,
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.title, "TechBlog");
        assert_eq!(
            config.integrations.adsense.publisher_id.as_deref(),
            Some("ca-pub-123")
        );
        assert!(config.feed.enabled);
        // Untouched defaults survive the merge
        assert_eq!(config.feed.path, "rss.xml");
        assert_eq!(config.markdown.plugins.len(), 5);
    }

    #[test]
    fn load_config_overlay_replaces_plugin_list() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("config.toml"),
            r#"
[[markdown.plugins]]
resolve = "smartypants"
"#,
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.markdown.plugins, vec![PluginDecl::new("smartypants")]);
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("config.toml"), "this is not valid toml [[[").unwrap();

        let result = load_config(tmp.path());
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn unknown_key_rejected() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("config.toml"),
            r#"
[author]
nmae = "typo"
"#,
        )
        .unwrap();

        let err = load_config(tmp.path()).unwrap_err();
        assert!(err.to_string().contains("unknown field"));
    }

    #[test]
    fn unknown_section_rejected() {
        let result: Result<SiteConfig, _> = toml::from_str("[integrationz]\n");
        assert!(result.is_err());
    }

    // =========================================================================
    // merge_toml tests
    // =========================================================================

    #[test]
    fn merge_toml_table_merge() {
        let base: toml::Value = toml::from_str(
            r#"
[avatar]
width = 50
height = 50
"#,
        )
        .unwrap();
        let overlay: toml::Value = toml::from_str("[avatar]\nwidth = 80\n").unwrap();
        let merged = merge_toml(base, overlay);
        let avatar = merged.get("avatar").unwrap();
        assert_eq!(avatar.get("width").unwrap().as_integer(), Some(80));
        assert_eq!(avatar.get("height").unwrap().as_integer(), Some(50));
    }

    #[test]
    fn merge_toml_array_replaces() {
        let base: toml::Value = toml::from_str("families = [\"A\", \"B\"]").unwrap();
        let overlay: toml::Value = toml::from_str("families = [\"C\"]").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged.get("families").unwrap().as_array().unwrap().len(), 1);
    }

    // =========================================================================
    // Validation tests
    // =========================================================================

    #[test]
    fn validate_default_config_passes() {
        assert!(SiteConfig::default().validate().is_ok());
    }

    #[test]
    fn validate_avatar_quality_bounds() {
        let mut config = SiteConfig::default();
        config.avatar.quality = 100;
        assert!(config.validate().is_ok());
        config.avatar.quality = 0;
        assert!(config.validate().is_err());
        config.avatar.quality = 101;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("quality"));
    }

    #[test]
    fn validate_avatar_dimensions() {
        let mut config = SiteConfig::default();
        config.avatar.height = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn validate_rejects_script_breaking_ids() {
        let mut config = SiteConfig::default();
        config.integrations.google_analytics.tracking_id = Some("UA-1');alert(1);//".into());
        assert!(config.validate().is_err());

        config.integrations.google_analytics.tracking_id = Some("UA-179270444-1".into());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_feed_requires_site_url() {
        let mut config = SiteConfig::default();
        config.feed.enabled = true;
        assert!(config.validate().is_err());
        config.site_url = "https://example.com".into();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_landing_path_not_root() {
        let mut config = SiteConfig::default();
        config.landing = Some(LandingConfig {
            path: "/".into(),
            name: None,
            job_title: String::new(),
            location: String::new(),
            links: vec![],
        });
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_landing_path_stays_in_output() {
        let mut config = SiteConfig::default();
        config.landing = Some(LandingConfig {
            path: "../outside".into(),
            name: None,
            job_title: String::new(),
            location: String::new(),
            links: vec![],
        });
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("landing.path"));

        config.landing.as_mut().unwrap().path = "/me/about/".into();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_feed_path_stays_in_output() {
        let mut config = SiteConfig::default();
        config.site_url = "https://example.com".into();
        config.feed.enabled = true;
        config.feed.path = "feeds/../../rss.xml".into();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("feed.path"));

        config.feed.path = "/feeds/rss.xml".into();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn base_url_strips_trailing_slash() {
        let config = SiteConfig {
            site_url: "https://example.com/".into(),
            ..SiteConfig::default()
        };
        assert_eq!(config.base_url(), "https://example.com");
    }

    // =========================================================================
    // stock_config_toml tests
    // =========================================================================

    #[test]
    fn stock_config_toml_roundtrips_to_defaults() {
        let config: SiteConfig = toml::from_str(stock_config_toml()).unwrap();
        let defaults = SiteConfig::default();
        assert_eq!(config.title, defaults.title);
        assert_eq!(config.avatar.quality, 95);
        assert_eq!(config.markdown.plugins, defaults.markdown.plugins);
        assert!(!config.feed.enabled);
    }

    #[test]
    fn stock_defaults_value_has_all_sections() {
        let val = stock_defaults_value();
        assert!(val.get("author").is_some());
        assert!(val.get("avatar").is_some());
        assert!(val.get("integrations").is_some());
        assert!(val.get("markdown").is_some());
        assert!(val.get("feed").is_some());
    }
}
