//! Content sources - where post and project documents come from

use async_trait::async_trait;
use glob::Pattern;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::ContentError;

/// A named group of documents in the content store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Posts,
    Projects,
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Collection::Posts => f.write_str("posts"),
            Collection::Projects => f.write_str("projects"),
        }
    }
}

/// One unparsed document as stored in a content source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDocument {
    /// Location of the document inside its collection, used in error reports
    pub name: String,
    /// File name without extension, the fallback slug
    pub stem: String,
    /// Full document text, front-matter included
    pub body: String,
}

impl RawDocument {
    pub fn new(name: impl Into<String>, body: impl Into<String>) -> Self {
        let name = name.into();
        let stem = Path::new(&name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(&name)
            .to_string();
        Self {
            name,
            stem,
            body: body.into(),
        }
    }
}

/// Read access to the content store.
///
/// Implementations must be safe to call from concurrent renders; they hold no
/// mutable state and do no caching.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Human-readable name of the store, used in error messages
    fn describe(&self) -> String;

    /// Read every document of a collection
    async fn read_collection(&self, collection: Collection)
        -> Result<Vec<RawDocument>, ContentError>;
}

/// Content stored as markdown files under a directory
#[derive(Debug, Clone)]
pub struct FsContentSource {
    root: PathBuf,
    posts_dir: PathBuf,
    projects_dir: PathBuf,
    include: Vec<Pattern>,
}

impl FsContentSource {
    /// Create a source reading `<root>/posts` and `<root>/projects`
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            posts_dir: PathBuf::from("posts"),
            projects_dir: PathBuf::from("projects"),
            include: default_patterns(),
        }
    }

    /// Override the collection directories (relative to the root)
    pub fn with_dirs(mut self, posts_dir: impl Into<PathBuf>, projects_dir: impl Into<PathBuf>) -> Self {
        self.posts_dir = posts_dir.into();
        self.projects_dir = projects_dir.into();
        self
    }

    /// Only read files whose name matches one of these glob patterns
    pub fn with_include(mut self, patterns: &[String]) -> Result<Self, glob::PatternError> {
        self.include = patterns
            .iter()
            .map(|p| Pattern::new(p))
            .collect::<Result<_, _>>()?;
        Ok(self)
    }

    /// Directory holding a collection
    pub fn collection_dir(&self, collection: Collection) -> PathBuf {
        match collection {
            Collection::Posts => self.root.join(&self.posts_dir),
            Collection::Projects => self.root.join(&self.projects_dir),
        }
    }
}

fn default_patterns() -> Vec<Pattern> {
    ["*.md", "*.markdown"]
        .iter()
        .filter_map(|p| Pattern::new(p).ok())
        .collect()
}

#[async_trait]
impl ContentSource for FsContentSource {
    fn describe(&self) -> String {
        self.root.display().to_string()
    }

    async fn read_collection(
        &self,
        collection: Collection,
    ) -> Result<Vec<RawDocument>, ContentError> {
        let dir = self.collection_dir(collection);
        let include = self.include.clone();

        tokio::task::spawn_blocking(move || read_dir_documents(&dir, &include))
            .await
            .map_err(|e| ContentError::unavailable(self.describe(), e))?
            .map_err(|reason| ContentError::unavailable(self.describe(), reason))
    }
}

/// Walk a collection directory, reading every included file.
/// Any unreadable entry fails the whole read.
fn read_dir_documents(dir: &Path, include: &[Pattern]) -> Result<Vec<RawDocument>, String> {
    if !dir.is_dir() {
        return Err(format!("{} is not a readable directory", dir.display()));
    }

    let mut documents = Vec::new();

    for entry in WalkDir::new(dir).follow_links(true).sort_by_file_name() {
        let entry = entry.map_err(|e| e.to_string())?;
        let path = entry.path();
        if !path.is_file() || !is_included(path, include) {
            continue;
        }

        let body = fs::read_to_string(path)
            .map_err(|e| format!("failed to read {}: {}", path.display(), e))?;
        let name = path
            .strip_prefix(dir)
            .unwrap_or(path)
            .to_string_lossy()
            .to_string();
        documents.push(RawDocument::new(name, body));
    }

    Ok(documents)
}

fn is_included(path: &Path, include: &[Pattern]) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|name| !name.starts_with('.') && include.iter().any(|p| p.matches(name)))
        .unwrap_or(false)
}

/// In-memory content, for tests and embedding
#[derive(Debug, Clone, Default)]
pub struct MemoryContentSource {
    posts: Vec<RawDocument>,
    projects: Vec<RawDocument>,
}

impl MemoryContentSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_post(mut self, name: &str, body: &str) -> Self {
        self.posts.push(RawDocument::new(name, body));
        self
    }

    pub fn with_project(mut self, name: &str, body: &str) -> Self {
        self.projects.push(RawDocument::new(name, body));
        self
    }
}

#[async_trait]
impl ContentSource for MemoryContentSource {
    fn describe(&self) -> String {
        "memory".to_string()
    }

    async fn read_collection(
        &self,
        collection: Collection,
    ) -> Result<Vec<RawDocument>, ContentError> {
        Ok(match collection {
            Collection::Posts => self.posts.clone(),
            Collection::Projects => self.projects.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, body: &str) {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, body).unwrap();
    }

    #[test]
    fn test_raw_document_stem() {
        let doc = RawDocument::new("2024/hello-world.md", "body");
        assert_eq!(doc.stem, "hello-world");
        assert_eq!(doc.name, "2024/hello-world.md");
    }

    #[tokio::test]
    async fn test_reads_markdown_files_recursively() {
        let tmp = TempDir::new().unwrap();
        let posts = tmp.path().join("posts");
        write(&posts, "b.md", "second");
        write(&posts, "nested/a.markdown", "first");
        write(&posts, "notes.txt", "ignored");
        write(&posts, ".hidden.md", "ignored");
        fs::create_dir_all(tmp.path().join("projects")).unwrap();

        let source = FsContentSource::new(tmp.path());
        let docs = source.read_collection(Collection::Posts).await.unwrap();
        let mut names: Vec<_> = docs.iter().map(|d| d.stem.as_str()).collect();
        names.sort();
        assert_eq!(names, vec!["a", "b"]);

        let projects = source.read_collection(Collection::Projects).await.unwrap();
        assert!(projects.is_empty());
    }

    #[tokio::test]
    async fn test_missing_directory_is_unavailable() {
        let tmp = TempDir::new().unwrap();
        let source = FsContentSource::new(tmp.path().join("nope"));
        let err = source.read_collection(Collection::Posts).await.unwrap_err();
        assert!(err.is_unavailable());
    }

    #[tokio::test]
    async fn test_custom_dirs_and_patterns() {
        let tmp = TempDir::new().unwrap();
        write(&tmp.path().join("writing"), "a.mdx", "mdx");
        write(&tmp.path().join("writing"), "b.md", "md");

        let source = FsContentSource::new(tmp.path())
            .with_dirs("writing", "work")
            .with_include(&["*.mdx".to_string()])
            .unwrap();
        let docs = source.read_collection(Collection::Posts).await.unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].body, "mdx");
    }

    #[test]
    fn test_invalid_pattern() {
        let result = FsContentSource::new(".").with_include(&["[".to_string()]);
        assert!(result.is_err());
    }
}
