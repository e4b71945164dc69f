use bytes::Bytes;
use thiserror::Error;
use url::Url;

const BASE_URL: &str = "https://www.bbc.co.uk";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("unexpected status: {0}")]
    Status(reqwest::StatusCode),
}

pub type Result<T> = std::result::Result<T, ApiError>;

/// HTTP boundary for the catalog site: search page, paginated episode
/// listings, episode pages and image bytes. HTML interpretation lives in
/// the parser, not here.
#[derive(Clone)]
pub struct SoundsClient {
    http: reqwest::Client,
    base_url: String,
}

impl SoundsClient {
    pub fn new() -> Self {
        Self::with_base_url(BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Resolve a possibly-relative href against the site origin.
    pub fn resolve(&self, href: &str) -> Option<Url> {
        Url::parse(href)
            .ok()
            .or_else(|| Url::parse(&self.base_url).ok()?.join(href).ok())
    }

    /// GET the search page for a term and return its HTML.
    pub async fn search_page(&self, term: &str) -> Result<String> {
        let url = format!("{}/sounds/search", self.base_url);
        let response = self.http.get(&url).query(&[("q", term)]).send().await?;
        if !response.status().is_success() {
            return Err(ApiError::Status(response.status()));
        }
        Ok(response.text().await?)
    }

    /// GET one page of a show's episode listing (`?page=N`).
    pub async fn episode_listing_page(&self, show_url: &Url, page: u32) -> Result<String> {
        let response = self
            .http
            .get(show_url.clone())
            .query(&[("page", page)])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(ApiError::Status(response.status()));
        }
        Ok(response.text().await?)
    }

    /// GET an episode page and return its HTML.
    pub async fn page(&self, url: &Url) -> Result<String> {
        let response = self.http.get(url.clone()).send().await?;
        if !response.status().is_success() {
            return Err(ApiError::Status(response.status()));
        }
        Ok(response.text().await?)
    }

    /// GET raw bytes, used for cover images.
    pub async fn fetch_bytes(&self, url: &Url) -> Result<Bytes> {
        let response = self.http.get(url.clone()).send().await?;
        if !response.status().is_success() {
            return Err(ApiError::Status(response.status()));
        }
        Ok(response.bytes().await?)
    }
}

impl Default for SoundsClient {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_relative_href() {
        let client = SoundsClient::with_base_url("https://www.bbc.co.uk");
        let url = client.resolve("/sounds/play/m000abc").unwrap();
        assert_eq!(url.as_str(), "https://www.bbc.co.uk/sounds/play/m000abc");
    }

    #[test]
    fn test_resolve_keeps_absolute_href() {
        let client = SoundsClient::with_base_url("https://www.bbc.co.uk");
        let url = client.resolve("https://ichef.bbci.co.uk/images/a.png").unwrap();
        assert_eq!(url.as_str(), "https://ichef.bbci.co.uk/images/a.png");
    }

    #[tokio::test]
    async fn test_search_page_rejects_non_200() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/sounds/search")
            .match_query(mockito::Matcher::UrlEncoded("q".into(), "news".into()))
            .with_status(500)
            .create_async()
            .await;

        let client = SoundsClient::with_base_url(server.url());
        let result = client.search_page("news").await;
        assert!(matches!(result, Err(ApiError::Status(_))));
        mock.assert_async().await;
    }
}
