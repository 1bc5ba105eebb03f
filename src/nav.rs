//! Header navigation and theme preference

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Whether `current_path` is the page `target_path` points at.
///
/// Trailing slashes are ignored, so `/posts/` and `/posts` match. A section
/// link does not light up for pages below it.
pub fn is_active(current_path: &str, target_path: &str) -> bool {
    normalize(current_path) == normalize(target_path)
}

fn normalize(path: &str) -> &str {
    let path = path.split(['?', '#']).next().unwrap_or(path);
    match path.trim_end_matches('/') {
        "" => "/",
        trimmed => trimmed,
    }
}

/// A header menu entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuItem {
    pub name: String,
    pub path: String,
    pub active: bool,
}

/// Build the header menu, marking the entry for `current_path`
pub fn menu(entries: &IndexMap<String, String>, current_path: &str) -> Vec<MenuItem> {
    entries
        .iter()
        .map(|(name, path)| MenuItem {
            name: name.clone(),
            path: path.clone(),
            active: is_active(current_path, path),
        })
        .collect()
}

/// Colour scheme preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    /// Follow the operating system
    #[default]
    System,
}

#[derive(Error, Debug)]
#[error("Unknown theme {0:?}: expected light, dark or system")]
pub struct ParseThemeError(String);

impl FromStr for Theme {
    type Err = ParseThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            "system" => Ok(Theme::System),
            _ => Err(ParseThemeError(s.to_string())),
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::System => "system",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_active() {
        assert!(is_active("/posts", "/posts"));
        assert!(is_active("/posts/", "/posts"));
        assert!(is_active("/posts?limit=2", "/posts/"));
        assert!(is_active("/", "/"));
        assert!(!is_active("/posts/hello", "/posts"));
        assert!(!is_active("/projects", "/posts"));
        assert!(!is_active("/posts", "/"));
    }

    #[test]
    fn test_menu_marks_active_entry() {
        let mut entries = IndexMap::new();
        entries.insert("Posts".to_string(), "/posts".to_string());
        entries.insert("Projects".to_string(), "/projects".to_string());

        let items = menu(&entries, "/projects/");
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].name, "Posts");
        assert!(!items[0].active);
        assert!(items[1].active);
    }

    #[test]
    fn test_theme_parse_and_display() {
        assert_eq!("Dark".parse::<Theme>().unwrap(), Theme::Dark);
        assert_eq!(" light ".parse::<Theme>().unwrap(), Theme::Light);
        assert_eq!(Theme::default(), Theme::System);
        assert_eq!(Theme::System.to_string(), "system");
        assert!("sepia".parse::<Theme>().is_err());

        let theme: Theme = serde_yaml::from_str("dark").unwrap();
        assert_eq!(theme, Theme::Dark);
    }
}
