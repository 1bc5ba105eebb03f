//! Project models

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::document::{ParsedDocument, SUMMARY_CHARS};
use super::markdown;
use super::source::{Collection, RawDocument};
use super::Listing;
use crate::content::repository::ListingOptions;

/// The projection of a project needed to list it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectSummary {
    /// Unique, URL-safe identifier
    pub slug: String,
    pub title: String,
    /// Plain-text description
    pub description: String,
    /// Ordering key, most recent first
    pub date: DateTime<Utc>,
    /// External page for the project (repository, demo)
    pub link: Option<String>,
    pub tags: Vec<String>,
}

impl Listing for ProjectSummary {
    const COLLECTION: Collection = Collection::Projects;

    fn from_document(doc: &RawDocument, options: &ListingOptions) -> Result<Option<Self>, String> {
        let parsed = ParsedDocument::parse(doc, options.timezone)?;
        if !parsed.fm.published && !options.render_drafts {
            return Ok(None);
        }

        let description = parsed
            .fm
            .description
            .as_deref()
            .filter(|d| !d.trim().is_empty());
        let description = match description {
            Some(description) => markdown::plain_text(description),
            None => markdown::first_paragraph(parsed.body),
        };

        Ok(Some(Self {
            slug: parsed.slug,
            title: parsed.title,
            description: markdown::truncate_chars(&description, SUMMARY_CHARS),
            date: parsed.date,
            link: parsed.fm.link,
            tags: parsed.fm.tags,
        }))
    }

    fn slug(&self) -> &str {
        &self.slug
    }

    fn recency(&self) -> DateTime<Utc> {
        self.date
    }
}
