//! Create a new post or project

use anyhow::{bail, Result};
use chrono::Utc;
use std::fs;
use std::path::PathBuf;

use crate::Folio;

/// Create a post or project scaffold and return its path
pub fn create(folio: &Folio, kind: &str, title: &str) -> Result<PathBuf> {
    let config = &folio.config;
    let (target_dir, extra) = match kind {
        "post" | "posts" => (folio.content_dir.join(&config.posts_dir), ""),
        "project" | "projects" => (
            folio.content_dir.join(&config.projects_dir),
            "description: \"\"\n# link: https://github.com/you/project\n",
        ),
        _ => bail!("Unknown kind: {}. Available: post, project", kind),
    };

    let slug = slug::slugify(title);
    if slug.is_empty() {
        bail!("Cannot derive a file name from title {:?}", title);
    }

    let file_path = target_dir.join(format!("{}.md", slug));
    if file_path.exists() {
        bail!("File already exists: {:?}", file_path);
    }

    let now = Utc::now().with_timezone(&config.timezone()?);
    let content = format!(
        "---\ntitle: {}\ndate: {}\n{}tags: []\n---\n",
        serde_json::to_string(title)?,
        now.format("%Y-%m-%d %H:%M:%S"),
        extra
    );

    fs::create_dir_all(&target_dir)?;
    fs::write(&file_path, content)?;

    println!("Created: {:?}", file_path);

    Ok(file_path)
}
