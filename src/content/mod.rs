//! Content module - reads posts and projects from the content store

mod document;
mod error;
mod frontmatter;
mod limit;
pub mod markdown;
mod post;
mod project;
pub mod repository;
pub mod source;

pub use error::ContentError;
pub use frontmatter::FrontMatter;
pub use limit::Limit;
pub use markdown::MarkdownRenderer;
pub use post::{Post, PostSummary};
pub use project::ProjectSummary;
pub use repository::{ListingOptions, PostRepository, ProjectRepository};
pub use source::{Collection, ContentSource, FsContentSource, MemoryContentSource, RawDocument};

pub(crate) use repository::Listing;
