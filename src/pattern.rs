//! URI glob patterns used to select a rule.
//!
//! Patterns are matched segment by segment:
//! - `**` matches any number of segments, including none
//! - `*` matches exactly one segment
//! - `{name}` is a template variable and also matches exactly one segment
//! - anything else is matched per segment with glob semantics (`?`, `[a-z]`,
//!   `user-*`), and plain literals match literally
//!
//! Empty segments are ignored on both sides, so `//api//users/` and
//! `/api/users` are the same path.

use glob::{MatchOptions, Pattern, PatternError};

const SEGMENT_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

#[derive(Debug, Clone)]
enum Segment {
    AnyDepth,
    Glob(Pattern),
}

/// A compiled rule URI pattern.
///
/// # Examples
///
/// ```
/// use ownership_guard::UriPattern;
///
/// let pattern = UriPattern::new("/api/staffs/{staffId}/schedules").unwrap();
/// assert!(pattern.matches("/api/staffs/42/schedules"));
/// assert!(!pattern.matches("/api/staffs/42/logs"));
/// ```
#[derive(Debug, Clone)]
pub struct UriPattern {
    raw: String,
    segments: Vec<Segment>,
}

impl UriPattern {
    /// Compiles a pattern.
    ///
    /// # Errors
    ///
    /// Returns the underlying glob error when a segment is not a valid glob,
    /// for example `a**` or an unterminated character class.
    pub fn new(raw: &str) -> Result<Self, PatternError> {
        let segments = split_segments(raw)
            .map(|segment| {
                if segment == "**" {
                    Ok(Segment::AnyDepth)
                } else {
                    Pattern::new(&replace_templates(segment)).map(Segment::Glob)
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            raw: raw.to_string(),
            segments,
        })
    }

    /// Returns the pattern text as configured.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Returns `true` if the request path matches the whole pattern.
    pub fn matches(&self, path: &str) -> bool {
        let path_segments: Vec<&str> = split_segments(path).collect();
        match_segments(&self.segments, &path_segments)
    }
}

fn split_segments(text: &str) -> impl Iterator<Item = &str> {
    text.split('/').filter(|segment| !segment.is_empty())
}

/// Matches in `O(pattern * path)` time regardless of how many `**`
/// segments the pattern has.
///
/// `row[j]` is `true` when the pattern suffix being processed matches
/// `path[j..]`. Rows are built from the last pattern segment backwards.
fn match_segments(pattern: &[Segment], path: &[&str]) -> bool {
    let mut row = vec![false; path.len() + 1];
    row[path.len()] = true;

    for segment in pattern.iter().rev() {
        let mut next = vec![false; path.len() + 1];
        match segment {
            Segment::AnyDepth => {
                let mut reachable = false;
                for j in (0..=path.len()).rev() {
                    reachable |= row[j];
                    next[j] = reachable;
                }
            }
            Segment::Glob(glob) => {
                for (j, head) in path.iter().enumerate() {
                    next[j] = row[j + 1] && glob.matches_with(head, SEGMENT_OPTIONS);
                }
            }
        }
        row = next;
    }

    row[0]
}

/// Rewrites `{name}` template variables into single-segment wildcards.
///
/// An unterminated `{` is kept literally.
fn replace_templates(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    let mut rest = segment;

    while let Some(open) = rest.find('{') {
        match rest[open..].find('}') {
            Some(close) => {
                out.push_str(&rest[..open]);
                out.push('*');
                rest = &rest[open + close + 1..];
            }
            None => break,
        }
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matches(pattern: &str, path: &str) -> bool {
        UriPattern::new(pattern).unwrap().matches(path)
    }

    #[test]
    fn literal_pattern_matches_exactly() {
        assert!(matches("/api/users", "/api/users"));
        assert!(!matches("/api/users", "/api/users/1"));
        assert!(!matches("/api/users", "/api/Users"));
    }

    #[test]
    fn single_star_matches_one_segment() {
        assert!(matches("/api/users/*", "/api/users/7"));
        assert!(!matches("/api/users/*", "/api/users/7/orders"));
        assert!(!matches("/api/users/*", "/api/users"));
    }

    #[test]
    fn double_star_matches_any_depth() {
        assert!(matches("/api/**", "/api/users/7/orders"));
        assert!(matches("/api/**", "/api"));
        assert!(matches("/api/**/orders", "/api/orders"));
        assert!(matches("/api/**/orders", "/api/users/7/orders"));
        assert!(!matches("/api/**/orders", "/api/users/7/invoices"));
        assert!(matches("/**", "/anything/at/all"));
    }

    #[test]
    fn template_variables_match_one_segment() {
        assert!(matches(
            "/api/staffs/{staffId}/schedules",
            "/api/staffs/1/schedules"
        ));
        assert!(!matches(
            "/api/staffs/{staffId}/schedules",
            "/api/staffs/1/2/schedules"
        ));
        assert!(matches("/files/{id}.json", "/files/9.json"));
    }

    #[test]
    fn partial_segment_wildcards() {
        assert!(matches("/api/user-*/profile", "/api/user-42/profile"));
        assert!(!matches("/api/user-*/profile", "/api/admin-42/profile"));
        assert!(matches("/api/v?/items", "/api/v2/items"));
    }

    #[test]
    fn empty_segments_are_ignored() {
        assert!(matches("/api/staffs/{staffId}/users", "//api/staffs/1/users"));
        assert!(matches("/api/staffs/{staffId}/users", "/api//staffs/1/users"));
        assert!(matches("/api/staffs/{staffId}/users", "/api/staffs/1/users/"));
        assert!(matches("/api/**", "//api/x"));
        assert!(matches("/api/users", "api/users"));
        assert!(!matches("/api/staffs/{staffId}/users", "/api/staffs//users"));
        assert!(matches("/", "//"));
    }

    #[test]
    fn many_any_depth_segments_stay_fast() {
        let pattern = format!("{}/end", "/**/x".repeat(12));
        let path = "/x".repeat(400);
        assert!(!matches(&pattern, &path));
        assert!(matches(&pattern, &format!("{}/end", path)));
    }

    #[test]
    fn invalid_glob_is_rejected() {
        assert!(UriPattern::new("/api/a**").is_err());
        assert!(UriPattern::new("/api/[abc").is_err());
    }

    #[test]
    fn template_rewrite() {
        assert_eq!(replace_templates("{id}"), "*");
        assert_eq!(replace_templates("{id}.json"), "*.json");
        assert_eq!(replace_templates("a{x}b{y}"), "a*b*");
        assert_eq!(replace_templates("open{"), "open{");
    }

    #[test]
    fn raw_pattern_is_preserved() {
        let pattern = UriPattern::new("/api/{id}").unwrap();
        assert_eq!(pattern.as_str(), "/api/{id}");
    }
}
