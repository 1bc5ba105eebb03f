//! Post and project repositories
//!
//! Both repositories are stateless read accessors over an injected
//! [`ContentSource`]. Every call reads the store afresh, under a bounded
//! timeout, and returns either the complete ordered listing or a
//! [`ContentError`]. Errors are handed back to the caller unlogged.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use super::markdown::MarkdownRenderer;
use super::post::{Post, PostRecord, PostSummary};
use super::project::ProjectSummary;
use super::source::{Collection, ContentSource, RawDocument};
use super::{ContentError, Limit};

/// Default bound on a single collection read
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(5);

/// How documents are read and interpreted
#[derive(Debug, Clone)]
pub struct ListingOptions {
    /// Timezone for front-matter dates without an offset
    pub timezone: Tz,
    /// Include documents marked `published: false`
    pub render_drafts: bool,
    pub read_timeout: Duration,
}

impl Default for ListingOptions {
    fn default() -> Self {
        Self {
            timezone: Tz::UTC,
            render_drafts: false,
            read_timeout: DEFAULT_READ_TIMEOUT,
        }
    }
}

/// A record type that can be listed from a collection
pub(crate) trait Listing: Sized {
    const COLLECTION: Collection;

    /// Parse a document. `Ok(None)` skips it (unpublished); `Err` names
    /// what is malformed.
    fn from_document(doc: &RawDocument, options: &ListingOptions) -> Result<Option<Self>, String>;

    fn slug(&self) -> &str;

    fn recency(&self) -> DateTime<Utc>;
}

/// Read, validate, order and truncate one collection
async fn list_collection<T: Listing>(
    source: &dyn ContentSource,
    options: &ListingOptions,
    limit: Option<Limit>,
) -> Result<Vec<T>, ContentError> {
    let documents = read_documents(source, T::COLLECTION, options.read_timeout).await?;

    let mut items: Vec<T> = Vec::with_capacity(documents.len());
    let mut seen = HashSet::new();

    for doc in &documents {
        let malformed =
            |reason: String| ContentError::unavailable(source.describe(), format!("{}: {}", doc.name, reason));

        let Some(item) = T::from_document(doc, options).map_err(malformed)? else {
            continue;
        };
        if !seen.insert(item.slug().to_string()) {
            return Err(malformed(format!("duplicate slug {:?}", item.slug())));
        }
        items.push(item);
    }

    items.sort_by(|a, b| {
        b.recency()
            .cmp(&a.recency())
            .then_with(|| a.slug().cmp(b.slug()))
    });

    if let Some(limit) = limit {
        items.truncate(limit.get());
    }

    Ok(items)
}

async fn read_documents(
    source: &dyn ContentSource,
    collection: Collection,
    read_timeout: Duration,
) -> Result<Vec<RawDocument>, ContentError> {
    match tokio::time::timeout(read_timeout, source.read_collection(collection)).await {
        Ok(result) => result,
        Err(_) => Err(ContentError::unavailable(
            source.describe(),
            format!(
                "reading {} timed out after {}ms",
                collection,
                read_timeout.as_millis()
            ),
        )),
    }
}

/// Read access to blog posts
#[derive(Clone)]
pub struct PostRepository {
    source: Arc<dyn ContentSource>,
    options: ListingOptions,
    renderer: Arc<MarkdownRenderer>,
}

impl PostRepository {
    pub fn new(source: Arc<dyn ContentSource>) -> Self {
        Self {
            source,
            options: ListingOptions::default(),
            renderer: Arc::new(MarkdownRenderer::new()),
        }
    }

    pub fn with_options(mut self, options: ListingOptions) -> Self {
        self.options = options;
        self
    }

    /// List posts newest first. `None` returns every post; a limit larger
    /// than the number of posts returns them all.
    pub async fn list_posts(&self, limit: Option<Limit>) -> Result<Vec<PostSummary>, ContentError> {
        let records =
            list_collection::<PostRecord>(self.source.as_ref(), &self.options, limit).await?;
        Ok(records.into_iter().map(|r| r.summary).collect())
    }

    /// Load one post with its rendered body
    pub async fn get_post(&self, slug: &str) -> Result<Option<Post>, ContentError> {
        let records =
            list_collection::<PostRecord>(self.source.as_ref(), &self.options, None).await?;

        let Some(record) = records.into_iter().find(|r| r.summary.slug == slug) else {
            return Ok(None);
        };

        let name = record.summary.slug.clone();
        record
            .render(&self.renderer)
            .map(Some)
            .map_err(|e| ContentError::unavailable(self.source.describe(), format!("{}: {}", name, e)))
    }
}

/// Read access to portfolio projects
#[derive(Clone)]
pub struct ProjectRepository {
    source: Arc<dyn ContentSource>,
    options: ListingOptions,
}

impl ProjectRepository {
    pub fn new(source: Arc<dyn ContentSource>) -> Self {
        Self {
            source,
            options: ListingOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ListingOptions) -> Self {
        self.options = options;
        self
    }

    /// List projects most recent first, with the same limit and failure
    /// rules as [`PostRepository::list_posts`].
    pub async fn list_projects(
        &self,
        limit: Option<Limit>,
    ) -> Result<Vec<ProjectSummary>, ContentError> {
        list_collection::<ProjectSummary>(self.source.as_ref(), &self.options, limit).await
    }
}
