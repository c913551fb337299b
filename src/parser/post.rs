use chrono::{DateTime, Utc};
use regex::Regex;

use crate::app::{Result, SkimmerError};
use crate::domain::PostRecord;
use crate::parser::config::ParserConfig;
use crate::parser::inline::{self, InlineNode};

/// Detached view of one rendered post element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostNode {
    /// Datetime attribute of the time indicator; `None` when the post has no time indicator
    pub datetime: Option<String>,
    /// Content of the text container; `None` when the post has none
    pub content: Option<Vec<InlineNode>>,
    /// Resolved targets of every hyperlink in the post, in document order
    pub links: Vec<String>,
    /// All visible text of the post, used for marker detection
    pub inner_text: String,
}

/// Turns [`PostNode`]s into [`PostRecord`]s.
#[derive(Debug, Clone)]
pub struct PostParser {
    permalink: Regex,
    pinned_markers: Vec<String>,
}

impl PostParser {
    pub fn new(config: &ParserConfig) -> Result<Self> {
        let permalink = Regex::new(&config.permalink_pattern).map_err(|e| {
            SkimmerError::Config(format!(
                "Invalid permalink pattern '{}': {}",
                config.permalink_pattern, e
            ))
        })?;

        if permalink.captures_len() < 2 {
            return Err(SkimmerError::Config(format!(
                "Permalink pattern '{}' needs a capture group for the post id",
                config.permalink_pattern
            )));
        }

        Ok(Self {
            permalink,
            pinned_markers: config.pinned_markers.clone(),
        })
    }

    /// Parse a post. Returns `None` for anything that is not a dated post.
    pub fn parse(&self, node: &PostNode) -> Option<PostRecord> {
        let raw_date = node.datetime.as_deref()?;
        let date = parse_datetime(raw_date)?;

        let text = node
            .content
            .as_deref()
            .map(inline::render)
            .unwrap_or_default();

        let id = node
            .links
            .iter()
            .find_map(|href| self.permalink_id(href))
            .unwrap_or_else(|| PostRecord::fallback_id(raw_date, &text));

        Some(PostRecord::new(id, date, raw_date, text))
    }

    /// Extract the post id from a permalink target.
    pub fn permalink_id(&self, href: &str) -> Option<String> {
        self.permalink
            .captures(href)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    }

    /// Whether the post carries one of the pinned markers.
    pub fn is_pinned(&self, node: &PostNode) -> bool {
        self.pinned_markers
            .iter()
            .any(|marker| !marker.is_empty() && node.inner_text.contains(marker.as_str()))
    }
}

fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| s.parse::<DateTime<Utc>>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn parser() -> PostParser {
        PostParser::new(&ParserConfig::default()).unwrap()
    }

    fn node(datetime: Option<&str>, content: Option<Vec<InlineNode>>, links: &[&str]) -> PostNode {
        PostNode {
            datetime: datetime.map(String::from),
            content,
            links: links.iter().map(|s| s.to_string()).collect(),
            inner_text: String::new(),
        }
    }

    #[test]
    fn test_parse_full_post() {
        let n = node(
            Some("2024-05-01T12:34:00.000Z"),
            Some(vec![InlineNode::text("hello *world*")]),
            &["https://x.com/alice", "https://x.com/alice/status/1785000000000000000"],
        );
        let record = parser().parse(&n).unwrap();
        assert_eq!(record.id, "1785000000000000000");
        assert_eq!(record.date, Utc.with_ymd_and_hms(2024, 5, 1, 12, 34, 0).unwrap());
        assert_eq!(record.raw_date, "2024-05-01T12:34:00.000Z");
        assert_eq!(record.text, r"hello \*world\*");
    }

    #[test]
    fn test_first_permalink_wins() {
        let n = node(
            Some("2024-05-01T12:34:00.000Z"),
            None,
            &["https://x.com/a/status/111", "https://x.com/b/status/222"],
        );
        assert_eq!(parser().parse(&n).unwrap().id, "111");
    }

    #[test]
    fn test_missing_time_indicator_is_not_a_post() {
        let n = node(None, Some(vec![InlineNode::text("Promoted")]), &[]);
        assert!(parser().parse(&n).is_none());
    }

    #[test]
    fn test_unparseable_datetime_is_skipped() {
        let n = node(Some("yesterday"), None, &["https://x.com/a/status/1"]);
        assert!(parser().parse(&n).is_none());

        let empty = node(Some(""), None, &[]);
        assert!(parser().parse(&empty).is_none());
    }

    #[test]
    fn test_media_only_post_has_empty_text() {
        let n = node(Some("2024-05-01T12:34:00Z"), None, &["https://x.com/a/status/9"]);
        let record = parser().parse(&n).unwrap();
        assert_eq!(record.text, "");
        assert_eq!(record.id, "9");
    }

    #[test]
    fn test_fallback_id_is_stable() {
        let n = node(
            Some("2024-05-01T12:34:00.000Z"),
            Some(vec![InlineNode::text("no permalink here at all")]),
            &["https://x.com/alice"],
        );
        let p = parser();
        let first = p.parse(&n).unwrap();
        let second = p.parse(&n).unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(first.id, "2024-05-01T12:34:00.000Zno permal");
    }

    #[test]
    fn test_pinned_markers() {
        let p = parser();
        let mut n = node(Some("2024-05-01T12:34:00Z"), None, &[]);
        n.inner_text = "Pinned\nAlice @alice".into();
        assert!(p.is_pinned(&n));

        n.inner_text = "固定されたポスト".into();
        assert!(p.is_pinned(&n));

        n.inner_text = "Alice @alice · 2h".into();
        assert!(!p.is_pinned(&n));
    }

    #[test]
    fn test_invalid_permalink_pattern_rejected() {
        let config = ParserConfig {
            permalink_pattern: "(".into(),
            ..Default::default()
        };
        assert!(matches!(PostParser::new(&config), Err(SkimmerError::Config(_))));

        let config = ParserConfig {
            permalink_pattern: r"/status/\d+".into(),
            ..Default::default()
        };
        assert!(matches!(PostParser::new(&config), Err(SkimmerError::Config(_))));
    }
}
