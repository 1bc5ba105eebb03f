//! folio: a small portfolio site engine
//!
//! Posts and projects are markdown documents read through two repositories
//! (`PostRepository`, `ProjectRepository`) and rendered with embedded Tera
//! templates into a home page, listing pages and post pages.

pub mod commands;
pub mod config;
pub mod content;
pub mod generator;
pub mod helpers;
pub mod nav;
pub mod server;
pub mod templates;

use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;

use content::{ContentSource, FsContentSource, PostRepository, ProjectRepository};

/// The main application
#[derive(Clone)]
pub struct Folio {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: std::path::PathBuf,
    /// Content directory (posts and projects live below it)
    pub content_dir: std::path::PathBuf,
    /// Public (output) directory
    pub public_dir: std::path::PathBuf,
    /// Static assets directory
    pub static_dir: std::path::PathBuf,
}

impl Folio {
    /// Create a new instance from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)
                .with_context(|| format!("Failed to load {}", config_path.display()))?
        } else {
            config::SiteConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    /// Create an instance with an explicit configuration
    pub fn with_config<P: AsRef<Path>>(base_dir: P, config: config::SiteConfig) -> Self {
        let base_dir = base_dir.as_ref().to_path_buf();
        let content_dir = base_dir.join(&config.content_dir);
        let public_dir = base_dir.join(&config.public_dir);
        let static_dir = base_dir.join(&config.static_dir);

        Self {
            config,
            base_dir,
            content_dir,
            public_dir,
            static_dir,
        }
    }

    /// The filesystem content store described by the configuration
    pub fn content_source(&self) -> Result<FsContentSource> {
        FsContentSource::new(&self.content_dir)
            .with_dirs(&self.config.posts_dir, &self.config.projects_dir)
            .with_include(&self.config.include)
            .context("Invalid include pattern")
    }

    /// Repositories over the configured content store
    pub fn repositories(&self) -> Result<(PostRepository, ProjectRepository)> {
        let source: Arc<dyn ContentSource> = Arc::new(self.content_source()?);
        self.repositories_with(source)
    }

    /// Repositories over an explicit content source
    pub fn repositories_with(
        &self,
        source: Arc<dyn ContentSource>,
    ) -> Result<(PostRepository, ProjectRepository)> {
        let options = self.config.listing_options()?;
        Ok((
            PostRepository::new(source.clone()).with_options(options.clone()),
            ProjectRepository::new(source).with_options(options),
        ))
    }

    /// Generate the static site
    pub async fn generate(&self) -> Result<()> {
        commands::generate::run(self).await
    }

    /// Clean the public directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }

    /// Create a new post or project
    pub fn new_content(&self, kind: &str, title: &str) -> Result<std::path::PathBuf> {
        commands::new::create(self, kind, title)
    }
}
