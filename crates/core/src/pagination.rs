//! Offset pagination metadata shared by list endpoints.
//!
//! List endpoints accept 1-based `page` and `limit` query parameters and
//! advertise neighboring pages through an RFC 5988 `Link` header. The
//! calculation here is pure: callers fetch the total count, compute the
//! metadata, and slice their query with [`Pagination::skip`].

use serde::Deserialize;
use url::Url;

/// Page number used when the client sends none (or garbage).
const DEFAULT_PAGE: i64 = 1;

/// Page size used when the client sends none (or garbage).
const DEFAULT_LIMIT: i64 = 10;

/// Raw `page`/`limit` query parameters.
///
/// Values are accepted as strings so that absent or non-numeric input falls
/// back to the defaults instead of rejecting the request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl PageQuery {
    /// Requested page, defaulting to 1 for absent, non-numeric, or
    /// non-positive input.
    #[must_use]
    pub fn page(&self) -> i64 {
        parse_positive(self.page.as_deref()).unwrap_or(DEFAULT_PAGE)
    }

    /// Requested page size, defaulting to 10 for absent, non-numeric, or
    /// non-positive input.
    #[must_use]
    pub fn limit(&self) -> i64 {
        parse_positive(self.limit.as_deref()).unwrap_or(DEFAULT_LIMIT)
    }
}

fn parse_positive(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|s| s.parse::<i64>().ok()).filter(|n| *n >= 1)
}

/// Computed pagination metadata for an offset-paged listing.
///
/// No page-bounds clamping is performed: a page past the end yields an empty
/// item collection with correct metadata, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page: i64,
    limit: i64,
    total: i64,
}

impl Pagination {
    /// Compute metadata for `page`/`limit` against a total item count.
    #[must_use]
    pub const fn new(page: i64, limit: i64, total: i64) -> Self {
        Self { page, limit, total }
    }

    /// Metadata straight from query parameters.
    #[must_use]
    pub fn from_query(query: &PageQuery, total: i64) -> Self {
        Self::new(query.page(), query.limit(), total)
    }

    /// Number of items to skip before this page.
    #[must_use]
    pub const fn skip(&self) -> i64 {
        self.limit * (self.page - 1)
    }

    /// Page size.
    #[must_use]
    pub const fn limit(&self) -> i64 {
        self.limit
    }

    /// A previous page exists iff the current page is past the first.
    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.page > 1
    }

    /// A next page exists iff items remain past the end of this page.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.skip() + self.limit < self.total
    }

    /// Location of the previous page, if one exists.
    #[must_use]
    pub fn previous_url(&self, base: &Url) -> Option<Url> {
        self.has_previous()
            .then(|| self.page_url(base, self.page - 1))
    }

    /// Location of the next page, if one exists.
    #[must_use]
    pub fn next_url(&self, base: &Url) -> Option<Url> {
        self.has_next().then(|| self.page_url(base, self.page + 1))
    }

    /// RFC 5988 `Link` header value advertising the neighboring pages, or
    /// `None` when neither neighbor exists.
    #[must_use]
    pub fn link_header(&self, base: &Url) -> Option<String> {
        let mut parts = Vec::new();
        if let Some(prev) = self.previous_url(base) {
            parts.push(format!("<{prev}>; rel=\"prev\""));
        }
        if let Some(next) = self.next_url(base) {
            parts.push(format!("<{next}>; rel=\"next\""));
        }
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(", "))
        }
    }

    /// Rebuild `base` with `page`/`limit` substituted, preserving any other
    /// query parameters (filters stay on the navigation links).
    fn page_url(&self, base: &Url, page: i64) -> Url {
        let mut url = base.clone();
        let kept: Vec<(String, String)> = base
            .query_pairs()
            .filter(|(key, _)| key != "page" && key != "limit")
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();

        {
            let mut pairs = url.query_pairs_mut();
            pairs.clear();
            for (key, value) in &kept {
                pairs.append_pair(key, value);
            }
            pairs.append_pair("limit", &self.limit.to_string());
            pairs.append_pair("page", &page.to_string());
        }

        url
    }
}
