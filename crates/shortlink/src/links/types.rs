//! Short link types.

use serde::{Deserialize, Serialize};

use crate::pagination;
use crate::types::{Alias, LongUrl};

/// A short link owned by the signed-in user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShortUrl {
    pub id: u64,

    #[serde(default)]
    pub user_id: Option<u64>,

    #[serde(default)]
    pub title: String,

    /// Destination the short link redirects to.
    #[serde(default, alias = "originalUrl")]
    pub long_url: String,

    pub short_code: String,

    #[serde(default)]
    pub clicks: u64,

    /// Creation time as sent by the backend; see [`crate::format_timestamp`].
    #[serde(default, rename = "createdAt")]
    pub created_at: String,

    #[serde(default, rename = "updatedAt")]
    pub updated_at: String,

    /// Full short URL, when the backend includes it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shortened_url: Option<String>,
}

impl ShortUrl {
    /// The public short URL: `shortened_url` if present, otherwise
    /// `<base>/l/<short_code>`.
    pub fn short_link(&self, base: &str) -> String {
        match self.shortened_url.as_deref() {
            Some(url) if !url.is_empty() => url.to_string(),
            _ => format!("{}/l/{}", base.trim_end_matches('/'), self.short_code),
        }
    }
}

/// Headline numbers for the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DashboardSummary {
    pub username: String,
    pub total_links: u64,
    pub total_clicks: u64,
    pub average_clicks_per_link: f64,
    #[serde(rename = "latestURLs")]
    pub latest_urls: Vec<ShortUrl>,
}

/// Default number of links per page.
pub const DEFAULT_PAGE_LIMIT: u32 = 10;

/// Filters for listing links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UrlQuery {
    pub page: u32,
    pub limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
}

impl Default for UrlQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_LIMIT,
            search: None,
            sort: None,
        }
    }
}

impl UrlQuery {
    /// Query for the first page with default limit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Select a page (1-based; 0 is treated as 1).
    pub fn page(mut self, page: u32) -> Self {
        self.page = page.max(1);
        self
    }

    /// Set the page size (0 is treated as 1).
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = limit.max(1);
        self
    }

    /// Filter by a search term. Empty terms are ignored.
    pub fn search(mut self, term: impl Into<String>) -> Self {
        let term = term.into();
        self.search = (!term.is_empty()).then_some(term);
        self
    }

    /// Sort order understood by the backend. Empty values are ignored.
    pub fn sort(mut self, sort: impl Into<String>) -> Self {
        let sort = sort.into();
        self.sort = (!sort.is_empty()).then_some(sort);
        self
    }
}

/// One page of links.
///
/// The backend returns a bare array, so the totals describe what came back.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UrlPage {
    pub urls: Vec<ShortUrl>,
    pub page: u32,
    pub limit: u32,
    pub total_items: u64,
    pub total_pages: u32,
}

impl UrlPage {
    pub(crate) fn from_urls(query: &UrlQuery, urls: Vec<ShortUrl>) -> Self {
        let total_items = urls.len() as u64;
        Self {
            total_pages: pagination::total_pages(total_items, query.limit),
            total_items,
            page: query.page,
            limit: query.limit,
            urls,
        }
    }
}

/// A link to create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewShortUrl {
    url: LongUrl,
    title: String,
    #[serde(rename = "customAlias", skip_serializing_if = "Option::is_none")]
    custom_alias: Option<Alias>,
}

impl NewShortUrl {
    /// A link to `url` with no title and a generated short code.
    pub fn new(url: LongUrl) -> Self {
        Self {
            url,
            title: String::new(),
            custom_alias: None,
        }
    }

    /// Set a display title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Request a specific short code.
    pub fn custom_alias(mut self, alias: Alias) -> Self {
        self.custom_alias = Some(alias);
        self
    }

    /// Returns the destination.
    pub fn url(&self) -> &LongUrl {
        &self.url
    }

    /// Returns the requested alias, if any.
    pub fn alias(&self) -> Option<&Alias> {
        self.custom_alias.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> serde_json::Value {
        json!({
            "id": 7,
            "user_id": 3,
            "title": "Docs",
            "long_url": "https://docs.rs/serde",
            "short_code": "abc123",
            "clicks": 12,
            "createdAt": "2025-03-01T10:00:00.000Z",
            "updatedAt": "2025-03-02T10:00:00.000Z"
        })
    }

    #[test]
    fn short_url_parses_backend_shape() {
        let url: ShortUrl = serde_json::from_value(sample()).unwrap();
        assert_eq!(url.id, 7);
        assert_eq!(url.user_id, Some(3));
        assert_eq!(url.long_url, "https://docs.rs/serde");
        assert_eq!(url.created_at, "2025-03-01T10:00:00.000Z");
        assert_eq!(url.shortened_url, None);
    }

    #[test]
    fn short_link_fallback() {
        let mut url: ShortUrl = serde_json::from_value(sample()).unwrap();
        assert_eq!(
            url.short_link("http://localhost:3001/"),
            "http://localhost:3001/l/abc123"
        );

        url.shortened_url = Some("https://sho.rt/l/abc123".to_string());
        assert_eq!(url.short_link("http://ignored"), "https://sho.rt/l/abc123");
    }

    #[test]
    fn dashboard_defaults_missing_fields() {
        let summary: DashboardSummary = serde_json::from_value(json!({"username": "ada"})).unwrap();
        assert_eq!(summary.username, "ada");
        assert_eq!(summary.total_links, 0);
        assert!(summary.latest_urls.is_empty());
    }

    #[test]
    fn dashboard_reads_camel_case() {
        let summary: DashboardSummary = serde_json::from_value(json!({
            "username": "ada",
            "totalLinks": 2,
            "totalClicks": 9,
            "averageClicksPerLink": 4.5,
            "latestURLs": [sample()]
        }))
        .unwrap();
        assert_eq!(summary.total_clicks, 9);
        assert_eq!(summary.average_clicks_per_link, 4.5);
        assert_eq!(summary.latest_urls[0].short_code, "abc123");
    }

    #[test]
    fn query_serializes_only_set_filters() {
        let query = UrlQuery::new().page(2).search("").sort("clicks");
        assert_eq!(
            serde_json::to_value(&query).unwrap(),
            json!({"page": 2, "limit": 10, "sort": "clicks"})
        );
    }

    #[test]
    fn page_totals_from_array() {
        let urls: Vec<ShortUrl> = (0..3)
            .map(|i| {
                let mut value = sample();
                value["id"] = json!(i);
                serde_json::from_value(value).unwrap()
            })
            .collect();
        let page = UrlPage::from_urls(&UrlQuery::new().limit(2), urls);
        assert_eq!(page.total_items, 3);
        assert_eq!(page.total_pages, 2);
    }

    #[test]
    fn new_short_url_body() {
        let link = NewShortUrl::new(LongUrl::new("https://example.com").unwrap())
            .title("Example")
            .custom_alias(Alias::new("my-link").unwrap());
        assert_eq!(
            serde_json::to_value(&link).unwrap(),
            json!({"url": "https://example.com", "title": "Example", "customAlias": "my-link"})
        );

        let bare = NewShortUrl::new(LongUrl::new("https://example.com").unwrap());
        assert_eq!(
            serde_json::to_value(&bare).unwrap(),
            json!({"url": "https://example.com", "title": ""})
        );
    }
}
