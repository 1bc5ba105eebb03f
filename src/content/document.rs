//! Parsing raw documents into the fields every summary shares

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use super::source::RawDocument;
use super::FrontMatter;

/// Maximum length of a derived excerpt or description
pub const SUMMARY_CHARS: usize = 160;

/// A document with its front-matter parsed and required fields checked
pub(crate) struct ParsedDocument<'a> {
    pub fm: FrontMatter,
    pub body: &'a str,
    pub slug: String,
    pub title: String,
    pub date: DateTime<Utc>,
}

impl<'a> ParsedDocument<'a> {
    /// Parse a document. The error string says what is malformed.
    pub fn parse(doc: &'a RawDocument, tz: Tz) -> Result<Self, String> {
        let (fm, body) = FrontMatter::parse(&doc.body).map_err(|e| format!("{:#}", e))?;

        let title = fm
            .title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or("missing title")?
            .to_string();

        let date = match fm.date.as_deref() {
            None => return Err("missing date".to_string()),
            Some(raw) => fm
                .parse_date(tz)
                .ok_or_else(|| format!("unrecognised date {:?}", raw))?,
        };

        let slug = match fm.slug.as_deref().map(str::trim) {
            Some(slug) if !slug.is_empty() => slug::slugify(slug),
            _ => slug::slugify(&doc.stem),
        };
        if slug.is_empty() {
            return Err("cannot derive a slug".to_string());
        }

        Ok(Self {
            fm,
            body,
            slug,
            title,
            date,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(name: &str, body: &str) -> Result<(String, String), String> {
        let doc = RawDocument::new(name, body);
        ParsedDocument::parse(&doc, Tz::UTC).map(|p| (p.slug, p.title))
    }

    #[test]
    fn test_slug_from_file_stem() {
        let (slug, title) = parse("Hello World.md", "---\ntitle: Hi\ndate: 2024-01-01\n---\n").unwrap();
        assert_eq!(slug, "hello-world");
        assert_eq!(title, "Hi");
    }

    #[test]
    fn test_slug_from_frontmatter() {
        let (slug, _) = parse(
            "x.md",
            "---\ntitle: Hi\nslug: My Custom Slug\ndate: 2024-01-01\n---\n",
        )
        .unwrap();
        assert_eq!(slug, "my-custom-slug");
    }

    #[test]
    fn test_missing_fields_are_malformed() {
        assert_eq!(
            parse("a.md", "---\ndate: 2024-01-01\n---\n").unwrap_err(),
            "missing title"
        );
        assert_eq!(
            parse("a.md", "---\ntitle: '  '\ndate: 2024-01-01\n---\n").unwrap_err(),
            "missing title"
        );
        assert_eq!(
            parse("a.md", "---\ntitle: A\n---\n").unwrap_err(),
            "missing date"
        );
        assert!(parse("a.md", "---\ntitle: A\ndate: someday\n---\n")
            .unwrap_err()
            .contains("unrecognised date"));
    }
}
