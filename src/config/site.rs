//! Site configuration (_config.yml)

use anyhow::{anyhow, Result};
use chrono_tz::Tz;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::content::{Limit, ListingOptions};
use crate::nav::Theme;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub language: String,
    /// IANA timezone for front-matter dates without an offset; empty means UTC
    pub timezone: String,
    pub author: AuthorConfig,

    // URL
    pub url: String,
    pub root: String,

    // Directory
    pub content_dir: String,
    pub posts_dir: String,
    pub projects_dir: String,
    pub public_dir: String,
    pub static_dir: String,

    // Content
    /// Glob patterns selecting content files by name
    pub include: Vec<String>,
    pub render_drafts: bool,
    pub read_timeout_ms: u64,
    /// Moment.js-style display format
    pub date_format: String,

    // Home page
    pub home: HomeConfig,

    // Navigation
    pub menu: IndexMap<String, String>,
    pub theme: ThemeConfig,

    // Widgets
    pub newsletter: NewsletterConfig,
    pub contact: ContactConfig,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        let mut menu = IndexMap::new();
        menu.insert("Posts".to_string(), "/posts".to_string());
        menu.insert("Projects".to_string(), "/projects".to_string());
        menu.insert("Contact".to_string(), "/contact".to_string());

        Self {
            title: "Portfolio".to_string(),
            description: "my portfolio website".to_string(),
            language: "en".to_string(),
            timezone: String::new(),
            author: AuthorConfig::default(),

            url: "http://example.com".to_string(),
            root: "/".to_string(),

            content_dir: "content".to_string(),
            posts_dir: "posts".to_string(),
            projects_dir: "projects".to_string(),
            public_dir: "public".to_string(),
            static_dir: "static".to_string(),

            include: vec!["*.md".to_string(), "*.markdown".to_string()],
            render_drafts: false,
            read_timeout_ms: 5000,
            date_format: "MMMM DD, YYYY".to_string(),

            home: HomeConfig::default(),

            menu,
            theme: ThemeConfig::default(),

            newsletter: NewsletterConfig::default(),
            contact: ContactConfig::default(),

            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        config.timezone()?;
        Ok(config)
    }

    /// Site timezone
    pub fn timezone(&self) -> Result<Tz> {
        let name = self.timezone.trim();
        if name.is_empty() {
            return Ok(Tz::UTC);
        }
        name.parse::<Tz>()
            .map_err(|e| anyhow!("Unknown timezone {:?}: {}", name, e))
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }

    /// Options the repositories read content with
    pub fn listing_options(&self) -> Result<ListingOptions> {
        Ok(ListingOptions {
            timezone: self.timezone()?,
            render_drafts: self.render_drafts,
            read_timeout: self.read_timeout(),
        })
    }
}

/// Site owner, shown in the home page introduction
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthorConfig {
    pub name: String,
    pub bio: String,
    /// Image path relative to the static directory
    pub avatar: Option<String>,
}

impl Default for AuthorConfig {
    fn default() -> Self {
        Self {
            name: "John Doe".to_string(),
            bio: String::new(),
            avatar: None,
        }
    }
}

/// Home page sections
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HomeConfig {
    /// Posts in the "Recent posts" section; all when unset
    pub recent_posts: Option<Limit>,
    /// Projects in the "Recent projects" section; all when unset
    pub recent_projects: Option<Limit>,
}

impl Default for HomeConfig {
    fn default() -> Self {
        Self {
            recent_posts: None,
            recent_projects: Limit::new(2).ok(),
        }
    }
}

/// Theme configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    /// Scheme used until the visitor picks one
    pub default: Theme,
}

/// Newsletter signup card
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NewsletterConfig {
    pub enable: bool,
    pub heading: String,
    pub blurb: String,
    /// Form action of the external mailing-list provider
    pub action: Option<String>,
    pub placeholder: String,
    pub button: String,
}

impl Default for NewsletterConfig {
    fn default() -> Self {
        Self {
            enable: true,
            heading: "Stay Updated".to_string(),
            blurb: "Get our latest news delivered to your inbox.".to_string(),
            action: None,
            placeholder: "name@example.com".to_string(),
            button: "Subscribe".to_string(),
        }
    }
}

/// Contact page links
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactConfig {
    pub email: Option<String>,
    pub github: Option<String>,
    pub twitter: Option<String>,
    pub linkedin: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.content_dir, "content");
        assert_eq!(config.home.recent_projects.map(Limit::get), Some(2));
        assert!(config.home.recent_posts.is_none());
        assert_eq!(config.theme.default, Theme::System);
        let names: Vec<_> = config.menu.keys().cloned().collect();
        assert_eq!(names, vec!["Posts", "Projects", "Contact"]);
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
title: JK | Portfolio
timezone: Africa/Nairobi
author:
  name: Joseph Kitheka
home:
  recent_posts: 3
theme:
  default: dark
menu:
  Projects: /projects
  Posts: /posts
"#;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.title, "JK | Portfolio");
        assert_eq!(config.author.name, "Joseph Kitheka");
        assert_eq!(config.home.recent_posts.map(Limit::get), Some(3));
        assert_eq!(config.home.recent_projects.map(Limit::get), Some(2));
        assert_eq!(config.theme.default, Theme::Dark);
        assert_eq!(config.menu.keys().next().map(String::as_str), Some("Projects"));
        assert_eq!(config.timezone().unwrap(), chrono_tz::Africa::Nairobi);
        assert!(config.newsletter.enable);
    }

    #[test]
    fn test_invalid_limit_rejected() {
        let yaml = "home:\n  recent_projects: 0\n";
        assert!(serde_yaml::from_str::<SiteConfig>(yaml).is_err());
    }

    #[test]
    fn test_unknown_timezone() {
        let config = SiteConfig {
            timezone: "Mars/Olympus".to_string(),
            ..Default::default()
        };
        assert!(config.timezone().is_err());
        assert!(config.listing_options().is_err());
    }
}
