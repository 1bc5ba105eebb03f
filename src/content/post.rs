//! Post models

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::document::{ParsedDocument, SUMMARY_CHARS};
use super::markdown::{self, MarkdownRenderer};
use super::source::{Collection, RawDocument};
use super::Listing;
use crate::content::repository::ListingOptions;

/// The projection of a post needed to list it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostSummary {
    /// Unique, URL-safe identifier
    pub slug: String,
    pub title: String,
    /// Ordering key, newest first
    pub published_at: DateTime<Utc>,
    /// Plain-text excerpt
    pub excerpt: String,
    pub tags: Vec<String>,
}

/// A full post, for its own page
#[derive(Debug, Clone, Serialize)]
pub struct Post {
    #[serde(flatten)]
    pub summary: PostSummary,
    pub updated: Option<DateTime<Utc>>,
    /// Rendered HTML body
    pub content: String,
}

/// A post as read from the store, body kept for rendering
#[derive(Debug, Clone)]
pub(crate) struct PostRecord {
    pub summary: PostSummary,
    pub updated: Option<DateTime<Utc>>,
    pub body: String,
}

impl PostRecord {
    pub fn render(self, renderer: &MarkdownRenderer) -> anyhow::Result<Post> {
        let (_, full) = MarkdownRenderer::split_excerpt(&self.body);
        Ok(Post {
            content: renderer.render(&full)?,
            summary: self.summary,
            updated: self.updated,
        })
    }
}

impl Listing for PostRecord {
    const COLLECTION: Collection = Collection::Posts;

    fn from_document(doc: &RawDocument, options: &ListingOptions) -> Result<Option<Self>, String> {
        let parsed = ParsedDocument::parse(doc, options.timezone)?;
        if !parsed.fm.published && !options.render_drafts {
            return Ok(None);
        }

        let excerpt = parsed
            .fm
            .excerpt
            .as_deref()
            .filter(|e| !e.trim().is_empty());
        let excerpt = match excerpt {
            Some(excerpt) => markdown::plain_text(excerpt),
            None => match MarkdownRenderer::split_excerpt(parsed.body) {
                (Some(excerpt), _) => markdown::plain_text(&excerpt),
                (None, _) => markdown::first_paragraph(parsed.body),
            },
        };

        let updated = parsed.fm.parse_updated(options.timezone);

        Ok(Some(Self {
            summary: PostSummary {
                slug: parsed.slug,
                title: parsed.title,
                published_at: parsed.date,
                excerpt: markdown::truncate_chars(&excerpt, SUMMARY_CHARS),
                tags: parsed.fm.tags,
            },
            updated,
            body: parsed.body.to_string(),
        }))
    }

    fn slug(&self) -> &str {
        &self.summary.slug
    }

    fn recency(&self) -> DateTime<Utc> {
        self.summary.published_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(body: &str) -> Option<PostRecord> {
        let doc = RawDocument::new("post.md", body);
        PostRecord::from_document(&doc, &ListingOptions::default()).unwrap()
    }

    #[test]
    fn test_excerpt_from_frontmatter() {
        let post = record("---\ntitle: A\ndate: 2024-01-01\nexcerpt: Short **summary**\n---\nBody text.").unwrap();
        assert_eq!(post.summary.excerpt, "Short summary");
    }

    #[test]
    fn test_blank_excerpt_is_derived() {
        let post = record("---\ntitle: A\ndate: 2024-01-01\nexcerpt: '  '\n---\nBody text.").unwrap();
        assert_eq!(post.summary.excerpt, "Body text.");
    }

    #[test]
    fn test_excerpt_from_more_marker() {
        let post = record(
            "---\ntitle: A\ndate: 2024-01-01\n---\nIntro *line*.\n\nSecond.\n<!-- more -->\nRest.",
        )
        .unwrap();
        assert_eq!(post.summary.excerpt, "Intro line. Second.");
    }

    #[test]
    fn test_excerpt_from_first_paragraph() {
        let long = "word ".repeat(60);
        let post = record(&format!("---\ntitle: A\ndate: 2024-01-01\n---\n# Title\n\n{}\n\nNext.", long)).unwrap();
        assert!(post.summary.excerpt.starts_with("word word"));
        assert!(post.summary.excerpt.ends_with("..."));
        assert!(post.summary.excerpt.chars().count() <= SUMMARY_CHARS + 3);
    }

    #[test]
    fn test_unpublished_skipped_unless_drafts() {
        let body = "---\ntitle: A\ndate: 2024-01-01\npublished: false\n---\n";
        assert!(record(body).is_none());

        let doc = RawDocument::new("post.md", body);
        let options = ListingOptions {
            render_drafts: true,
            ..Default::default()
        };
        assert!(PostRecord::from_document(&doc, &options).unwrap().is_some());
    }

    #[test]
    fn test_render_full_post() {
        let post = record("---\ntitle: A\ndate: 2024-01-01\n---\nIntro.\n<!-- more -->\n## More")
            .unwrap()
            .render(&MarkdownRenderer::new())
            .unwrap();
        assert!(post.content.contains("<p>Intro.</p>"));
        assert!(post.content.contains("<h2>More</h2>"));
    }
}
