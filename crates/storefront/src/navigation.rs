//! Locations and navigation history.
//!
//! A [`Location`] is a path plus an ordered list of query parameters, edited
//! the way a browser's `URLSearchParams` is. The [`Navigator`] records where a
//! controller sent the user: `push` adds a history entry, `replace` rewrites
//! the current one in place.

use core::fmt;

use url::form_urlencoded;

/// A path with its query parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    path: String,
    params: Vec<(String, String)>,
}

impl Location {
    /// A location with no query parameters.
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            params: Vec::new(),
        }
    }

    /// Parse an href such as `/catalog?category=men`. Fragments are dropped.
    #[must_use]
    pub fn parse(href: &str) -> Self {
        let href = href.split('#').next().unwrap_or_default();
        let (path, query) = href.split_once('?').unwrap_or((href, ""));
        let path = if path.is_empty() { "/" } else { path };
        Self {
            path: path.to_string(),
            params: form_urlencoded::parse(query.as_bytes())
                .into_owned()
                .collect(),
        }
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[must_use]
    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    /// First value of `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    #[must_use]
    pub fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Set `key` to `value`: the first occurrence is updated in place and any
    /// others removed; a new key is appended.
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        let mut found = false;
        self.params.retain_mut(|(k, v)| {
            if k != key {
                return true;
            }
            if found {
                return false;
            }
            found = true;
            v.clone_from(&value);
            true
        });
        if !found {
            self.params.push((key.to_string(), value));
        }
    }

    /// Remove every occurrence of `key`.
    pub fn delete(&mut self, key: &str) {
        self.params.retain(|(k, _)| k != key);
    }

    /// Builder form of [`set`](Self::set).
    #[must_use]
    pub fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    /// The encoded query string, without the leading `?`.
    #[must_use]
    pub fn query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(&self.params)
            .finish()
    }
}

impl Default for Location {
    fn default() -> Self {
        Self::new("/")
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)?;
        if !self.params.is_empty() {
            write!(f, "?{}", self.query_string())?;
        }
        Ok(())
    }
}

/// History of locations visited by a controller. Never empty.
#[derive(Debug, Clone)]
pub struct Navigator {
    history: Vec<Location>,
}

impl Navigator {
    /// A history whose only entry is `start`.
    #[must_use]
    pub fn starting_at(start: Location) -> Self {
        Self {
            history: vec![start],
        }
    }

    /// The location currently shown.
    #[must_use]
    pub fn current(&self) -> &Location {
        // `history` always holds at least the starting entry.
        #[allow(clippy::indexing_slicing)]
        &self.history[self.history.len() - 1]
    }

    /// Navigate to `location`, adding a history entry.
    pub fn push(&mut self, location: Location) {
        tracing::debug!(to = %location, "push");
        self.history.push(location);
    }

    /// Rewrite the current entry without adding one.
    pub fn replace(&mut self, location: Location) {
        tracing::debug!(to = %location, "replace");
        if let Some(current) = self.history.last_mut() {
            *current = location;
        }
    }

    /// Go back one entry. Returns `false` at the start of history.
    pub fn back(&mut self) -> bool {
        if self.history.len() > 1 {
            self.history.pop();
            true
        } else {
            false
        }
    }

    /// Every entry, oldest first.
    #[must_use]
    pub fn history(&self) -> &[Location] {
        &self.history
    }
}

impl Default for Navigator {
    fn default() -> Self {
        Self::starting_at(Location::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let location = Location::parse("/catalog?search=linen+shirt&categories=men%2Cwomen#top");
        assert_eq!(location.path(), "/catalog");
        assert_eq!(location.get("search"), Some("linen shirt"));
        assert_eq!(location.get("categories"), Some("men,women"));
        assert_eq!(
            location.to_string(),
            "/catalog?search=linen+shirt&categories=men%2Cwomen"
        );
    }

    #[test]
    fn test_bare_path_has_no_question_mark() {
        assert_eq!(Location::parse("/catalog").to_string(), "/catalog");
        assert_eq!(Location::parse("?page=2").path(), "/");
    }

    #[test]
    fn test_set_replaces_first_and_drops_duplicates() {
        let mut location = Location::parse("/c?a=1&b=2&a=3");
        location.set("a", "9");
        assert_eq!(location.to_string(), "/c?a=9&b=2");

        location.set("z", "new");
        assert_eq!(location.to_string(), "/c?a=9&b=2&z=new");

        location.delete("a");
        assert_eq!(location.to_string(), "/c?b=2&z=new");
    }

    #[test]
    fn test_push_and_replace() {
        let mut nav = Navigator::starting_at(Location::parse("/catalog?category=men"));
        nav.replace(Location::parse("/catalog?categories=men"));
        assert_eq!(nav.history().len(), 1);
        assert_eq!(nav.current().to_string(), "/catalog?categories=men");

        nav.push(Location::parse("/catalog?categories=men&page=2"));
        assert_eq!(nav.history().len(), 2);
        assert!(nav.back());
        assert!(!nav.back());
        assert_eq!(nav.current().to_string(), "/catalog?categories=men");
    }
}
