//! List site content

use anyhow::{bail, Result};
use serde::Serialize;

use crate::content::Limit;
use crate::helpers::{full_url_for, post_path};
use crate::Folio;

#[derive(Serialize)]
struct Entry<'a, T: Serialize> {
    #[serde(flatten)]
    item: &'a T,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<String>,
}

/// List posts or projects, most recent first
pub async fn run(folio: &Folio, content_type: &str, limit: Option<Limit>, json: bool) -> Result<()> {
    let (posts, projects) = folio.repositories()?;

    match content_type {
        "post" | "posts" => {
            let posts = posts.list_posts(limit).await?;
            if json {
                let entries: Vec<_> = posts
                    .iter()
                    .map(|post| Entry {
                        item: post,
                        url: Some(full_url_for(&folio.config, &post_path(&post.slug))),
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&entries)?);
                return Ok(());
            }

            println!("Posts ({}):", posts.len());
            for post in posts {
                println!(
                    "  {} - {} [{}]",
                    post.published_at.format("%Y-%m-%d"),
                    post.title,
                    post.slug
                );
            }
        }
        "project" | "projects" => {
            let projects = projects.list_projects(limit).await?;
            if json {
                let entries: Vec<_> = projects
                    .iter()
                    .map(|project| Entry {
                        item: project,
                        url: project.link.clone(),
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&entries)?);
                return Ok(());
            }

            println!("Projects ({}):", projects.len());
            for project in projects {
                println!(
                    "  {} - {} [{}]",
                    project.date.format("%Y-%m-%d"),
                    project.title,
                    project.slug
                );
            }
        }
        _ => bail!("Unknown type: {}. Available: posts, projects", content_type),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_list_reports_unavailable_store() {
        let tmp = TempDir::new().unwrap();
        let folio = Folio::new(tmp.path()).unwrap();

        let err = run(&folio, "posts", None, false).await.unwrap_err();
        assert!(err.to_string().contains("unavailable"));
    }

    #[tokio::test]
    async fn test_list_projects() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("content/projects");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("a.md"), "---\ntitle: A\ndate: 2024-02-01\n---\nA.").unwrap();

        let folio = Folio::new(tmp.path()).unwrap();
        run(&folio, "projects", Limit::new(1).ok(), true).await.unwrap();
        assert!(run(&folio, "tags", None, false).await.is_err());
    }
}
