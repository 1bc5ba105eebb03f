//! Built-in site templates using the Tera template engine
//!
//! All templates are embedded directly in the binary.

use anyhow::Result;
use serde::Serialize;
use tera::{Context, Tera};

use crate::nav::MenuItem;

/// Template renderer with the embedded site theme
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("site/layout.html")),
            ("home.html", include_str!("site/home.html")),
            ("posts.html", include_str!("site/posts.html")),
            ("post.html", include_str!("site/post.html")),
            ("projects.html", include_str!("site/projects.html")),
            ("contact.html", include_str!("site/contact.html")),
            ("not_found.html", include_str!("site/not_found.html")),
            ("unavailable.html", include_str!("site/unavailable.html")),
            // Partials
            (
                "partials/header.html",
                include_str!("site/partials/header.html"),
            ),
            (
                "partials/footer.html",
                include_str!("site/partials/footer.html"),
            ),
            (
                "partials/post_list.html",
                include_str!("site/partials/post_list.html"),
            ),
            (
                "partials/project_list.html",
                include_str!("site/partials/project_list.html"),
            ),
            (
                "partials/newsletter.html",
                include_str!("site/partials/newsletter.html"),
            ),
        ])?;

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }
}

/// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct SiteData {
    pub title: String,
    pub description: String,
    pub language: String,
    pub root: String,
    /// Default colour scheme: light, dark or system
    pub theme: String,
    pub author: AuthorData,
    pub menu: Vec<MenuItem>,
    pub current_path: String,
    pub year: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct AuthorData {
    pub name: String,
    pub initials: String,
    pub bio: String,
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostData {
    pub slug: String,
    pub title: String,
    pub date: String,
    pub datetime: String,
    pub excerpt: String,
    pub path: String,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectData {
    pub slug: String,
    pub title: String,
    pub description: String,
    pub date: String,
    pub datetime: String,
    pub link: Option<String>,
    pub tags: Vec<String>,
}

/// A listing section: its items, or why they could not be loaded
#[derive(Debug, Clone, Serialize)]
pub struct ListingData<T> {
    pub items: Vec<T>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewsletterData {
    pub heading: String,
    pub blurb: String,
    pub action: Option<String>,
    pub placeholder: String,
    pub button: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ContactData {
    pub email: Option<String>,
    pub github: Option<String>,
    pub twitter: Option<String>,
    pub linkedin: Option<String>,
}
