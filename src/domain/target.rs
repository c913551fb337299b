use chrono::Duration;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::app::{Result, SkimmerError};
use crate::domain::{DateWindow, DisplayZone};

const SEARCH_ENDPOINT: &str = "https://x.com/search";

/// Where an extraction starts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// A page address given as is: a profile, a permalink or a search
    Page(String),
    /// An account whose posts are found through a date-bounded live search
    User(String),
}

/// Target defaults
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetConfig {
    /// Account used when neither a URL nor a user is given
    pub default_user: Option<String>,
}

impl Target {
    /// Pick the target from an explicit URL, an explicit user, or the configured default user.
    pub fn resolve(url: Option<&str>, user: Option<&str>, config: &TargetConfig) -> Result<Self> {
        if let Some(url) = url {
            Url::parse(url)?;
            return Ok(Self::Page(url.to_string()));
        }

        match user.or(config.default_user.as_deref()) {
            Some(user) => Ok(Self::User(normalize_user(user)?)),
            None => Err(SkimmerError::Config(
                "No target: pass a URL, --user, or set target.default_user".into(),
            )),
        }
    }

    /// Address to open for this target and window.
    pub fn page_url(&self, window: &DateWindow, zone: &DisplayZone) -> Result<String> {
        match self {
            Self::Page(url) => Ok(url.clone()),
            Self::User(user) => Ok(search_url(user, window, zone)?.to_string()),
        }
    }
}

/// Live search for one account's posts inside `window`.
///
/// `since:` takes the start day and `until:` the day after the end day, both in
/// `zone`, because the site treats `until:` as exclusive. The search only narrows
/// what gets rendered; the engine still filters by the exact window.
pub fn search_url(user: &str, window: &DateWindow, zone: &DisplayZone) -> Result<Url> {
    let since = zone.to_naive(window.start).date();
    let mut query = format!("from:{} since:{}", user, since.format("%Y-%m-%d"));
    if let Some(end) = window.end {
        let until = zone.to_naive(end).date() + Duration::days(1);
        query.push_str(&format!(" until:{}", until.format("%Y-%m-%d")));
    }

    let url = Url::parse_with_params(
        SEARCH_ENDPOINT,
        &[("q", query.as_str()), ("src", "typed_query"), ("f", "live")],
    )?;
    Ok(url)
}

fn normalize_user(user: &str) -> Result<String> {
    let user = user.trim().trim_start_matches('@');
    if user.is_empty() || !user.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(SkimmerError::Config(format!("Invalid user name: {:?}", user)));
    }
    Ok(user.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn jst() -> DisplayZone {
        DisplayZone::parse(Some("+09:00")).unwrap()
    }

    #[test]
    fn test_search_url_with_end() {
        let window = DateWindow::new(
            Utc.with_ymd_and_hms(2024, 3, 3, 15, 0, 0).unwrap(),
            Some(Utc.with_ymd_and_hms(2024, 3, 10, 14, 59, 59).unwrap()),
        );
        let url = search_url("alice", &window, &jst()).unwrap();

        assert_eq!(
            url.as_str(),
            "https://x.com/search?q=from%3Aalice+since%3A2024-03-04+until%3A2024-03-11&src=typed_query&f=live"
        );
        let q = url.query_pairs().find(|(k, _)| k == "q").unwrap().1;
        assert_eq!(q, "from:alice since:2024-03-04 until:2024-03-11");
    }

    #[test]
    fn test_search_url_open_ended() {
        let window = DateWindow::new(Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap(), None);
        let zone = DisplayZone::parse(Some("UTC")).unwrap();
        let url = search_url("bob_2", &window, &zone).unwrap();

        let q = url.query_pairs().find(|(k, _)| k == "q").unwrap().1;
        assert_eq!(q, "from:bob_2 since:2024-05-01");
        assert_eq!(url.host_str(), Some("x.com"));
        assert_eq!(url.path(), "/search");
    }

    #[test]
    fn test_resolve_prefers_url_then_user_then_default() {
        let config = TargetConfig {
            default_user: Some("fallback".into()),
        };

        let page = Target::resolve(Some("https://x.com/alice"), None, &config).unwrap();
        assert_eq!(page, Target::Page("https://x.com/alice".into()));

        let user = Target::resolve(None, Some("@alice"), &config).unwrap();
        assert_eq!(user, Target::User("alice".into()));

        let default = Target::resolve(None, None, &config).unwrap();
        assert_eq!(default, Target::User("fallback".into()));
    }

    #[test]
    fn test_resolve_rejects_missing_or_bad_targets() {
        let empty = TargetConfig::default();
        assert!(matches!(Target::resolve(None, None, &empty), Err(SkimmerError::Config(_))));
        assert!(Target::resolve(None, Some("from:bob since:2020"), &empty).is_err());
        assert!(matches!(
            Target::resolve(Some("not a url"), None, &empty),
            Err(SkimmerError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_page_target_ignores_window() {
        let window = DateWindow::new(Utc::now(), None);
        let target = Target::Page("https://x.com/alice/status/42".into());
        let url = target.page_url(&window, &jst()).unwrap();
        assert_eq!(url, "https://x.com/alice/status/42");
    }
}
