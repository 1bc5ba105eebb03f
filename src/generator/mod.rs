//! Generator module - renders site pages using built-in Tera templates
//!
//! The generator is the consumer of the post and project repositories. A
//! listing that fails to load is logged here and rendered as a fallback
//! section; it never takes the rest of the page down with it.

use anyhow::Result;
use chrono::{DateTime, Datelike, Utc};
use chrono_tz::Tz;
use indexmap::IndexMap;
use std::fs;
use std::path::PathBuf;
use tera::Context;
use walkdir::WalkDir;

use crate::content::{
    ContentError, Limit, PostRepository, PostSummary, ProjectRepository, ProjectSummary,
};
use crate::helpers::{date_xml, format_date, post_path, url_for};
use crate::nav;
use crate::templates::{
    AuthorData, ContactData, ListingData, NewsletterData, PostData, ProjectData, SiteData,
    TemplateRenderer,
};
use crate::Folio;

/// Result of rendering one route
#[derive(Debug)]
pub enum Rendered {
    Page(String),
    /// Nothing lives at the route; carries the rendered 404 page
    NotFound(String),
    /// The content store failed; carries the rendered fallback page
    Unavailable { page: String, error: ContentError },
}

/// Outcome of a full site generation
#[derive(Debug, Default)]
pub struct GenerateReport {
    pub pages: usize,
    pub assets: usize,
    /// Listings that could not be loaded and were rendered as fallbacks
    pub content_errors: Vec<ContentError>,
}

/// Site renderer
pub struct Generator {
    folio: Folio,
    renderer: TemplateRenderer,
    posts: PostRepository,
    projects: ProjectRepository,
    timezone: Tz,
}

impl Generator {
    /// Create a generator reading the configured content store
    pub fn new(folio: &Folio) -> Result<Self> {
        let (posts, projects) = folio.repositories()?;
        Self::with_repositories(folio, posts, projects)
    }

    /// Create a generator over explicit repositories
    pub fn with_repositories(
        folio: &Folio,
        posts: PostRepository,
        projects: ProjectRepository,
    ) -> Result<Self> {
        Ok(Self {
            folio: folio.clone(),
            renderer: TemplateRenderer::new()?,
            posts,
            projects,
            timezone: folio.config.timezone()?,
        })
    }

    /// Render the page for a route (relative to the site root)
    pub async fn render_route(&self, path: &str, limit: Option<Limit>) -> Result<Rendered> {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => self.render_home().await.map(Rendered::Page),
            ["posts"] => self.render_posts(limit).await.map(Rendered::Page),
            ["posts", slug] => self.render_post(slug).await,
            ["projects"] => self.render_projects(limit).await.map(Rendered::Page),
            ["contact"] => self.render_contact().map(Rendered::Page),
            _ => self.render_not_found(path).map(Rendered::NotFound),
        }
    }

    async fn render_home(&self) -> Result<String> {
        let home = &self.folio.config.home;
        let (posts, projects) = tokio::join!(
            self.posts.list_posts(home.recent_posts),
            self.projects.list_projects(home.recent_projects)
        );

        let mut context = self.base_context("/");
        context.insert("posts", &self.post_listing(posts));
        context.insert("projects", &self.project_listing(projects));
        context.insert("posts_path", &url_for(&self.folio.config, "/posts/"));
        context.insert("projects_path", &url_for(&self.folio.config, "/projects/"));
        context.insert("newsletter", &self.newsletter_data());

        self.renderer.render("home.html", &context)
    }

    async fn render_posts(&self, limit: Option<Limit>) -> Result<String> {
        let posts = self.posts.list_posts(limit).await;

        let mut context = self.base_context("/posts/");
        context.insert("posts", &self.post_listing(posts));

        self.renderer.render("posts.html", &context)
    }

    async fn render_post(&self, slug: &str) -> Result<Rendered> {
        let post = match self.posts.get_post(slug).await {
            Ok(Some(post)) => post,
            Ok(None) => {
                return self
                    .render_not_found(&post_path(slug))
                    .map(Rendered::NotFound)
            }
            Err(error) => {
                tracing::warn!("Failed to load post {}: {}", slug, error);
                let context = self.base_context(&post_path(slug));
                let page = self.renderer.render("unavailable.html", &context)?;
                return Ok(Rendered::Unavailable { page, error });
            }
        };

        let mut context = self.base_context(&post_path(slug));
        context.insert("post", &self.post_data(&post.summary));
        context.insert(
            "updated",
            &post.updated.map(|d| self.display_date(&d)),
        );
        context.insert("content", &post.content);
        context.insert("posts_path", &url_for(&self.folio.config, "/posts/"));

        self.renderer.render("post.html", &context).map(Rendered::Page)
    }

    async fn render_projects(&self, limit: Option<Limit>) -> Result<String> {
        let projects = self.projects.list_projects(limit).await;

        let mut context = self.base_context("/projects/");
        context.insert("projects", &self.project_listing(projects));

        self.renderer.render("projects.html", &context)
    }

    fn render_contact(&self) -> Result<String> {
        let contact = &self.folio.config.contact;

        let mut context = self.base_context("/contact/");
        context.insert(
            "contact",
            &ContactData {
                email: contact.email.clone(),
                github: contact.github.clone(),
                twitter: contact.twitter.clone(),
                linkedin: contact.linkedin.clone(),
            },
        );

        self.renderer.render("contact.html", &context)
    }

    /// Render the 404 page for a path
    pub fn render_not_found(&self, path: &str) -> Result<String> {
        let context = self.base_context(path);
        self.renderer.render("not_found.html", &context)
    }

    /// Generate the entire site into the public directory
    pub async fn generate(&self) -> Result<GenerateReport> {
        fs::create_dir_all(&self.folio.public_dir)?;

        let mut report = GenerateReport {
            assets: self.copy_static_assets()?,
            ..Default::default()
        };

        let mut routes: Vec<String> = ["/", "/posts/", "/projects/", "/contact/"]
            .iter()
            .map(|r| r.to_string())
            .collect();

        let (posts, projects) = tokio::join!(
            self.posts.list_posts(None),
            self.projects.list_projects(None)
        );
        match posts {
            Ok(posts) => routes.extend(posts.iter().map(|p| post_path(&p.slug))),
            Err(e) => report.content_errors.push(e),
        }
        if let Err(e) = projects {
            report.content_errors.push(e);
        }

        for route in &routes {
            match self.render_route(route, None).await? {
                Rendered::Page(html) => {
                    self.write_page(route, &html)?;
                    report.pages += 1;
                }
                Rendered::NotFound(_) => {
                    tracing::warn!("Route {} vanished while generating", route);
                }
                Rendered::Unavailable { error, .. } => report.content_errors.push(error),
            }
        }

        let not_found = self.render_not_found("/404.html")?;
        fs::write(self.folio.public_dir.join("404.html"), not_found)?;

        Ok(report)
    }

    fn write_page(&self, route: &str, html: &str) -> Result<()> {
        let dir = self.folio.public_dir.join(route.trim_matches('/'));
        fs::create_dir_all(&dir)?;
        fs::write(dir.join("index.html"), html)?;
        tracing::debug!("Generated: {}", route);
        Ok(())
    }

    /// Copy static assets (images, stylesheets) into the public directory
    fn copy_static_assets(&self) -> Result<usize> {
        let static_dir = &self.folio.static_dir;
        if !static_dir.exists() {
            return Ok(0);
        }

        let mut copied = 0;
        for entry in WalkDir::new(static_dir).follow_links(true) {
            let entry = entry?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }

            let dest: PathBuf = self.folio.public_dir.join(path.strip_prefix(static_dir)?);
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(path, &dest)?;
            copied += 1;
        }

        Ok(copied)
    }

    fn base_context(&self, current_path: &str) -> Context {
        let mut context = Context::new();
        context.insert("site", &self.site_data(current_path));
        context
    }

    fn site_data(&self, current_path: &str) -> SiteData {
        let config = &self.folio.config;

        let entries: IndexMap<String, String> = config
            .menu
            .iter()
            .map(|(name, path)| (name.clone(), url_for(config, path)))
            .collect();
        let current_path = url_for(config, current_path);

        SiteData {
            title: config.title.clone(),
            description: config.description.clone(),
            language: config.language.clone(),
            root: url_for(config, "/"),
            theme: config.theme.default.to_string(),
            author: AuthorData {
                name: config.author.name.clone(),
                initials: initials(&config.author.name),
                bio: config.author.bio.clone(),
                avatar: config.author.avatar.as_deref().map(|a| url_for(config, a)),
            },
            menu: nav::menu(&entries, &current_path),
            current_path,
            year: Utc::now().year(),
        }
    }

    fn newsletter_data(&self) -> Option<NewsletterData> {
        let newsletter = &self.folio.config.newsletter;
        newsletter.enable.then(|| NewsletterData {
            heading: newsletter.heading.clone(),
            blurb: newsletter.blurb.clone(),
            action: newsletter.action.clone(),
            placeholder: newsletter.placeholder.clone(),
            button: newsletter.button.clone(),
        })
    }

    fn post_listing(&self, result: Result<Vec<PostSummary>, ContentError>) -> ListingData<PostData> {
        listing("posts", result, |p| self.post_data(p))
    }

    fn project_listing(
        &self,
        result: Result<Vec<ProjectSummary>, ContentError>,
    ) -> ListingData<ProjectData> {
        listing("projects", result, |p| ProjectData {
            slug: p.slug.clone(),
            title: p.title.clone(),
            description: p.description.clone(),
            date: self.display_date(&p.date),
            datetime: self.xml_date(&p.date),
            link: p.link.clone(),
            tags: p.tags.clone(),
        })
    }

    fn post_data(&self, post: &PostSummary) -> PostData {
        PostData {
            slug: post.slug.clone(),
            title: post.title.clone(),
            date: self.display_date(&post.published_at),
            datetime: self.xml_date(&post.published_at),
            excerpt: post.excerpt.clone(),
            path: url_for(&self.folio.config, &post_path(&post.slug)),
            tags: post.tags.clone(),
        }
    }

    fn display_date(&self, date: &DateTime<Utc>) -> String {
        format_date(
            &date.with_timezone(&self.timezone),
            &self.folio.config.date_format,
        )
    }

    fn xml_date(&self, date: &DateTime<Utc>) -> String {
        date_xml(&date.with_timezone(&self.timezone))
    }
}

/// Map a listing result into template data, logging a failure
fn listing<T, U>(
    section: &str,
    result: Result<Vec<T>, ContentError>,
    map: impl Fn(&T) -> U,
) -> ListingData<U> {
    match result {
        Ok(items) => ListingData {
            items: items.iter().map(map).collect(),
            error: None,
        },
        Err(e) => {
            tracing::warn!("Failed to load {}: {}", section, e);
            ListingData {
                items: Vec::new(),
                error: Some(e.to_string()),
            }
        }
    }
}

/// "Joseph Kitheka" -> "JK"
fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::content::{Collection, ContentSource, MemoryContentSource, RawDocument};
    use async_trait::async_trait;
    use std::sync::Arc;
    use tempfile::TempDir;

    struct UnreadableSource;

    #[async_trait]
    impl ContentSource for UnreadableSource {
        fn describe(&self) -> String {
            "unreadable".to_string()
        }

        async fn read_collection(&self, _: Collection) -> Result<Vec<RawDocument>, ContentError> {
            Err(ContentError::unavailable("unreadable", "permission denied"))
        }
    }

    fn sample_source() -> Arc<dyn ContentSource> {
        let mut source = MemoryContentSource::new();
        for day in 1..=3 {
            source = source.with_post(
                &format!("post-{day}.md"),
                &format!("---\ntitle: Post {day}\ndate: 2024-01-0{day}\n---\nExcerpt {day}.\n\nBody."),
            );
        }
        for (name, year) in [("alpha", 2021), ("beta", 2022), ("gamma", 2023)] {
            source = source.with_project(
                &format!("{name}.md"),
                &format!("---\ntitle: {name}\ndate: {year}-06-01\n---\nAbout {name}."),
            );
        }
        Arc::new(source)
    }

    fn generator(base: &TempDir, source: Arc<dyn ContentSource>) -> Generator {
        let mut config = SiteConfig::default();
        config.author.name = "Joseph Kitheka".to_string();
        let folio = Folio::with_config(base.path(), config);
        let (posts, projects) = folio.repositories_with(source).unwrap();
        Generator::with_repositories(&folio, posts, projects).unwrap()
    }

    async fn page(generator: &Generator, path: &str) -> String {
        match generator.render_route(path, None).await.unwrap() {
            Rendered::Page(html) => html,
            Rendered::NotFound(_) => panic!("{path} not found"),
            Rendered::Unavailable { .. } => panic!("{path} unavailable"),
        }
    }

    #[test]
    fn test_initials() {
        assert_eq!(initials("Joseph Kitheka"), "JK");
        assert_eq!(initials("ada"), "A");
        assert_eq!(initials(""), "");
    }

    #[tokio::test]
    async fn test_home_page_sections() {
        let tmp = TempDir::new().unwrap();
        let generator = generator(&tmp, sample_source());
        let html = page(&generator, "/").await;

        assert!(html.contains("Hey, I&#39;m Joseph Kitheka."));
        assert!(html.contains(">JK</a>"));
        // All posts, newest first
        let p3 = html.find("Post 3").unwrap();
        let p1 = html.find("Post 1").unwrap();
        assert!(p3 < p1);
        // Two most recent projects only
        assert!(html.contains("gamma"));
        assert!(html.contains("beta"));
        assert!(!html.contains("About alpha."));
        assert!(html.contains("Stay Updated"));
    }

    #[tokio::test]
    async fn test_home_page_falls_back_when_store_unavailable() {
        let tmp = TempDir::new().unwrap();
        let generator = generator(&tmp, Arc::new(UnreadableSource));
        let html = page(&generator, "/").await;

        assert!(html.contains("Posts are unavailable right now"));
        assert!(html.contains("Projects are unavailable right now"));
    }

    #[tokio::test]
    async fn test_empty_store_renders_empty_state() {
        let tmp = TempDir::new().unwrap();
        let generator = generator(&tmp, Arc::new(MemoryContentSource::new()));
        let html = page(&generator, "/projects/").await;
        assert!(html.contains("No projects yet."));
    }

    #[tokio::test]
    async fn test_listing_page_with_limit() {
        let tmp = TempDir::new().unwrap();
        let generator = generator(&tmp, sample_source());
        let html = match generator
            .render_route("/posts", Limit::new(1).ok())
            .await
            .unwrap()
        {
            Rendered::Page(html) => html,
            Rendered::NotFound(_) => panic!("posts not found"),
            Rendered::Unavailable { .. } => panic!("posts unavailable"),
        };
        assert!(html.contains("Post 3"));
        assert!(!html.contains("Post 2"));
        assert!(html.contains(r#"aria-current="page""#));
    }

    #[tokio::test]
    async fn test_post_page_and_not_found() {
        let tmp = TempDir::new().unwrap();
        let generator = generator(&tmp, sample_source());

        let html = page(&generator, "/posts/post-2/").await;
        assert!(html.contains("<p>Excerpt 2.</p>"));

        assert!(matches!(
            generator.render_route("/posts/nope/", None).await.unwrap(),
            Rendered::NotFound(_)
        ));
        assert!(matches!(
            generator.render_route("/unknown", None).await.unwrap(),
            Rendered::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_post_page_falls_back_when_store_unavailable() {
        let tmp = TempDir::new().unwrap();
        let generator = generator(&tmp, Arc::new(UnreadableSource));

        match generator.render_route("/posts/hello/", None).await.unwrap() {
            Rendered::Unavailable { page, error } => {
                assert!(page.contains("Please try again later"));
                assert!(page.contains("Unavailable | Portfolio"));
                assert!(error.is_unavailable());
            }
            other => panic!("expected fallback page, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_generate_writes_site() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("static/images")).unwrap();
        fs::write(tmp.path().join("static/images/me.jpg"), b"jpg").unwrap();

        let generator = generator(&tmp, sample_source());
        let report = generator.generate().await.unwrap();

        assert_eq!(report.pages, 4 + 3);
        assert_eq!(report.assets, 1);
        assert!(report.content_errors.is_empty());

        let public = tmp.path().join("public");
        for page in [
            "index.html",
            "posts/index.html",
            "projects/index.html",
            "contact/index.html",
            "posts/post-1/index.html",
            "404.html",
            "images/me.jpg",
        ] {
            assert!(public.join(page).exists(), "missing {page}");
        }
    }

    #[tokio::test]
    async fn test_generate_reports_content_errors() {
        let tmp = TempDir::new().unwrap();
        let generator = generator(&tmp, Arc::new(UnreadableSource));
        let report = generator.generate().await.unwrap();

        assert_eq!(report.pages, 4);
        assert_eq!(report.content_errors.len(), 2);
        assert!(report.content_errors.iter().all(|e| e.is_unavailable()));
    }
}
