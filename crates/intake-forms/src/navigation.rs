//! Route patterns and the navigation collaborator.

use std::sync::Mutex;

use crate::error::{FormError, Result};

/// A segment in a route pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
enum RouteSegment {
    /// A literal string segment.
    Literal(String),
    /// A parameter segment (e.g., `{id}`).
    Param(String),
}

/// A client-side route such as `/patients/{id}/register`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePattern {
    pattern: String,
    segments: Vec<RouteSegment>,
}

impl RoutePattern {
    /// Parses a route pattern.
    ///
    /// Pattern syntax:
    /// - `/patients` - Literal path
    /// - `/patients/{id}/register` - Path with a parameter
    ///
    /// # Example
    ///
    /// ```
    /// use intake_forms::RoutePattern;
    ///
    /// let route = RoutePattern::new("/patients/{id}/register").unwrap();
    /// assert_eq!(
    ///     route.reverse(&[("id", "abc123")]),
    ///     Some("/patients/abc123/register".to_string())
    /// );
    /// ```
    pub fn new(pattern: &str) -> Result<Self> {
        if !pattern.starts_with('/') {
            return Err(FormError::InvalidRoute(format!(
                "{pattern:?} must start with '/'"
            )));
        }

        let mut segments = Vec::new();
        for part in pattern.split('/').filter(|s| !s.is_empty()) {
            if let Some(param) = part.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
                if param.is_empty() || param.contains(['{', '}']) {
                    return Err(FormError::InvalidRoute(format!(
                        "bad parameter {part:?} in {pattern:?}"
                    )));
                }
                segments.push(RouteSegment::Param(param.to_string()));
            } else if part.contains(['{', '}']) {
                return Err(FormError::InvalidRoute(format!(
                    "unbalanced braces in {pattern:?}"
                )));
            } else {
                segments.push(RouteSegment::Literal(part.to_string()));
            }
        }

        Ok(Self {
            pattern: pattern.to_string(),
            segments,
        })
    }

    /// Returns the original pattern string.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Returns the parameter names, in order.
    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            RouteSegment::Param(name) => Some(name.as_str()),
            RouteSegment::Literal(_) => None,
        })
    }

    /// Builds a path from parameters. Returns `None` if one is missing.
    ///
    /// Parameter values are percent-encoded so an identifier can never add
    /// path segments.
    pub fn reverse(&self, params: &[(&str, &str)]) -> Option<String> {
        let mut path = String::new();

        for segment in &self.segments {
            path.push('/');
            match segment {
                RouteSegment::Literal(s) => path.push_str(s),
                RouteSegment::Param(name) => {
                    let (_, value) = params.iter().find(|(k, _)| k == name)?;
                    path.push_str(&encode_segment(value));
                }
            }
        }

        if path.is_empty() {
            path.push('/');
        }

        Some(path)
    }
}

fn encode_segment(s: &str) -> String {
    s.bytes()
        .map(|b| match b {
            b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                (b as char).to_string()
            }
            _ => format!("%{b:02X}"),
        })
        .collect()
}

/// Performs client-side route transitions.
pub trait Navigator: Send + Sync {
    /// Navigates to `path`.
    fn navigate(&self, path: &str);
}

/// A navigator that only remembers where it was sent.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    visited: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    /// Creates a navigator with an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Paths navigated to so far, oldest first.
    pub fn visited(&self) -> Vec<String> {
        self.visited
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    /// The most recent path.
    pub fn last(&self) -> Option<String> {
        self.visited().pop()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, path: &str) {
        tracing::debug!(path, "navigate");
        self.visited
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(path.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reverse() {
        let route = RoutePattern::new("/patients/{id}/register").unwrap();
        assert_eq!(
            route.reverse(&[("id", "abc123")]),
            Some("/patients/abc123/register".to_string())
        );
    }

    #[test]
    fn test_reverse_missing_param() {
        let route = RoutePattern::new("/patients/{id}/register").unwrap();
        assert!(route.reverse(&[]).is_none());
    }

    #[test]
    fn test_reverse_encodes_param() {
        let route = RoutePattern::new("/patients/{id}").unwrap();
        assert_eq!(
            route.reverse(&[("id", "a/b c")]),
            Some("/patients/a%2Fb%20c".to_string())
        );
    }

    #[test]
    fn test_param_names() {
        let route = RoutePattern::new("/patients/{id}/appointments/{appointment}").unwrap();
        assert_eq!(
            route.param_names().collect::<Vec<_>>(),
            vec!["id", "appointment"]
        );
    }

    #[test]
    fn test_invalid_patterns() {
        assert!(RoutePattern::new("patients").is_err());
        assert!(RoutePattern::new("/patients/{}").is_err());
        assert!(RoutePattern::new("/patients/{id").is_err());
    }

    #[test]
    fn test_root_reverses_to_slash() {
        let route = RoutePattern::new("/").unwrap();
        assert_eq!(route.reverse(&[]), Some("/".to_string()));
    }

    #[test]
    fn test_recording_navigator() {
        let nav = RecordingNavigator::new();
        nav.navigate("/a");
        nav.navigate("/b");
        assert_eq!(nav.visited(), vec!["/a", "/b"]);
        assert_eq!(nav.last(), Some("/b".to_string()));
    }
}
