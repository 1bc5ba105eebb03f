//! Front-matter parsing

use anyhow::{anyhow, bail, Context, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// Custom deserializer that handles both a single string and a list of strings
fn string_or_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{self, SeqAccess, Visitor};
    use std::fmt;

    struct StringOrVec;

    impl<'de> Visitor<'de> for StringOrVec {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or a list of strings")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value.to_string()])
        }

        fn visit_seq<S>(self, mut seq: S) -> Result<Self::Value, S::Error>
        where
            S: SeqAccess<'de>,
        {
            let mut vec = Vec::new();
            while let Some(item) = seq.next_element::<String>()? {
                vec.push(item);
            }
            Ok(vec)
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }
    }

    deserializer.deserialize_any(StringOrVec)
}

/// Front-matter data from a post or project document
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FrontMatter {
    pub title: Option<String>,
    pub date: Option<String>,
    pub updated: Option<String>,
    pub slug: Option<String>,
    pub excerpt: Option<String>,
    pub description: Option<String>,
    #[serde(deserialize_with = "string_or_vec", default)]
    pub tags: Vec<String>,
    /// External URL, used by projects
    pub link: Option<String>,
    pub published: bool,

    /// Additional custom fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for FrontMatter {
    fn default() -> Self {
        Self {
            title: None,
            date: None,
            updated: None,
            slug: None,
            excerpt: None,
            description: None,
            tags: Vec::new(),
            link: None,
            published: true,
            extra: HashMap::new(),
        }
    }
}

impl FrontMatter {
    /// Parse front-matter from content string
    /// Returns (front_matter, remaining_content)
    ///
    /// A document without a front-matter block yields the default front-matter
    /// and the whole document as body. An opened block that is never closed,
    /// or whose contents do not parse, is an error.
    pub fn parse(content: &str) -> Result<(Self, &str)> {
        let content = content.trim_start_matches('\u{feff}').trim_start();

        if content.starts_with("---") {
            let (block, body) = split_fenced(content, "---")?;
            if block.trim().is_empty() {
                return Ok((FrontMatter::default(), body));
            }
            let fm = serde_yaml::from_str(block).context("Failed to parse YAML front-matter")?;
            return Ok((fm, body));
        }

        if content.starts_with("+++") {
            let (block, body) = split_fenced(content, "+++")?;
            return Ok((Self::from_toml(block)?, body));
        }

        if content.starts_with(";;;") {
            let (block, body) = split_fenced(content, ";;;")?;
            let fm = serde_json::from_str(block)
                .map_err(|e| anyhow!("Failed to parse JSON front-matter: {}", e))?;
            return Ok((fm, body));
        }

        if content.starts_with('{') {
            return Self::parse_json_object(content);
        }

        Ok((FrontMatter::default(), content))
    }

    /// TOML dates are native datetimes; they are turned back into strings so
    /// every front-matter flavour goes through the same date parsing.
    fn from_toml(block: &str) -> Result<Self> {
        let mut table: toml::Table =
            toml::from_str(block).context("Failed to parse TOML front-matter")?;
        for (_, value) in table.iter_mut() {
            if let toml::Value::Datetime(dt) = value {
                *value = toml::Value::String(dt.to_string());
            }
        }
        toml::Value::Table(table)
            .try_into()
            .context("Failed to parse TOML front-matter")
    }

    fn parse_json_object(content: &str) -> Result<(Self, &str)> {
        let mut depth = 0usize;
        let mut in_string = false;
        let mut escaped = false;
        let mut end_pos = None;

        for (i, c) in content.char_indices() {
            if in_string {
                match c {
                    _ if escaped => escaped = false,
                    '\\' => escaped = true,
                    '"' => in_string = false,
                    _ => {}
                }
                continue;
            }
            match c {
                '"' => in_string = true,
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        end_pos = Some(i + 1);
                        break;
                    }
                }
                _ => {}
            }
        }

        let end_pos = end_pos.ok_or_else(|| anyhow!("Unterminated JSON front-matter"))?;
        let fm = serde_json::from_str(&content[..end_pos])
            .map_err(|e| anyhow!("Failed to parse JSON front-matter: {}", e))?;
        let remaining = content[end_pos..].trim_start_matches(['\n', '\r']);

        Ok((fm, remaining))
    }

    /// Parse the date field, interpreting naive dates in `tz`
    pub fn parse_date(&self, tz: Tz) -> Option<DateTime<Utc>> {
        self.date.as_deref().and_then(|s| parse_date_string(s, tz))
    }

    /// Parse the updated field, interpreting naive dates in `tz`
    pub fn parse_updated(&self, tz: Tz) -> Option<DateTime<Utc>> {
        self.updated.as_deref().and_then(|s| parse_date_string(s, tz))
    }
}

/// Split `fence ... fence` off the start of `content`.
/// Returns (block, body after the closing fence).
fn split_fenced<'a>(content: &'a str, fence: &str) -> Result<(&'a str, &'a str)> {
    let rest = &content[fence.len()..];
    let rest = rest.trim_start_matches(['\n', '\r']);

    // An empty block closes immediately
    if let Some(body) = rest.strip_prefix(fence) {
        return Ok(("", body.trim_start_matches(['\n', '\r'])));
    }

    let closing = format!("\n{}", fence);
    let Some(end_pos) = rest.find(&closing) else {
        bail!("Front-matter opened with {} is never closed", fence);
    };

    let block = &rest[..end_pos];
    let body = rest[end_pos + closing.len()..].trim_start_matches(['\n', '\r']);
    Ok((block, body))
}

/// Parse a date string in various formats
pub fn parse_date_string(s: &str, tz: Tz) -> Option<DateTime<Utc>> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S %z") {
        return Some(dt.with_timezone(&Utc));
    }

    let datetime_formats = [
        "%Y-%m-%d %H:%M:%S",
        "%Y/%m/%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
    ];
    for fmt in datetime_formats {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return localize(naive, tz);
        }
    }

    for fmt in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return localize(date.and_hms_opt(0, 0, 0)?, tz);
        }
    }

    None
}

fn localize(naive: NaiveDateTime, tz: Tz) -> Option<DateTime<Utc>> {
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}
