//! hh.ru search page scraper.
//!
//! There is no stable public API for anonymous search, so postings are read
//! from the HTML search page: every link into `/vacancy/` is a posting and
//! the `<div>` right after it holds the teaser text.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use reqwest::header::{ACCEPT_LANGUAGE, HeaderMap, HeaderValue, REFERER, USER_AGENT};

use super::JobBoard;
use crate::rate_limit::{AdaptiveLimiter, FetchError, check_response, with_rate_limit};
use crate::{SearchLocation, Vacancy};

pub const BASE_URL: &str = "https://hh.ru";
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/112.0.0.0 Safari/537.36";

/// hh.ru job board.
pub struct HeadHunter {
    client: reqwest::Client,
    limiter: AdaptiveLimiter,
    base_url: String,
    items_on_page: u32,
    timeout: Duration,
}

impl HeadHunter {
    /// Build a board with browser-like default headers.
    pub fn new(request_interval: Duration, timeout: Duration) -> Result<Self, reqwest::Error> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("ru-RU,ru;q=0.9"));
        headers.insert(REFERER, HeaderValue::from_static("https://hh.ru/"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .pool_max_idle_per_host(2)
            .pool_idle_timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            limiter: AdaptiveLimiter::new(request_interval),
            base_url: BASE_URL.to_string(),
            items_on_page: 20,
            timeout,
        })
    }

    pub fn with_items_on_page(mut self, items: u32) -> Self {
        self.items_on_page = items.max(1);
        self
    }

    /// Point the board at another host (mirrors, tests).
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Search page URL for `query` in `location`.
    pub fn search_url(&self, query: &str, location: &SearchLocation) -> String {
        let mut params = vec![
            ("text", query.to_string()),
            ("items_on_page", self.items_on_page.to_string()),
        ];
        if let Some(area) = location.area {
            params.push(("area", area.to_string()));
        }
        if location.remote {
            params.push(("remote", "1".to_string()));
        }

        let base = format!("{}/search/vacancy", self.base_url);
        match reqwest::Url::parse_with_params(&base, &params) {
            Ok(url) => url.to_string(),
            Err(_) => base,
        }
    }

    async fn get_text(&self, url: &str) -> Result<String, FetchError> {
        with_rate_limit("hh.ru", &self.limiter, self.timeout, move || async move {
            let resp = self.client.get(url).timeout(self.timeout).send().await?;
            check_response(&resp)?;
            Ok(resp.text().await?)
        })
        .await
    }
}

impl JobBoard for HeadHunter {
    fn name(&self) -> &str {
        "hh.ru"
    }

    fn search<'a>(
        &'a self,
        query: &'a str,
        location: &'a SearchLocation,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Vacancy>, FetchError>> + Send + 'a>> {
        Box::pin(async move {
            let url = self.search_url(query, location);
            tracing::debug!(%url, query, location = %location.name, "searching");
            let body = self.get_text(&url).await?;

            // Parse in spawn_blocking to avoid !Send scraper types in async context
            let base_url = self.base_url.clone();
            let location_name = location.name.clone();
            let vacancies = tokio::task::spawn_blocking(move || {
                parse_search_results(&body, &base_url, &location_name)
            })
            .await
            .map_err(|e| FetchError::Other(e.to_string()))?;

            tracing::info!(query, location = %location.name, found = vacancies.len(), "search done");
            Ok(vacancies)
        })
    }

    fn fetch_description<'a>(
        &'a self,
        url: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, FetchError>> + Send + 'a>> {
        Box::pin(async move {
            let body = self.get_text(url).await?;
            tokio::task::spawn_blocking(move || parse_description(&body))
                .await
                .map_err(|e| FetchError::Other(e.to_string()))
        })
    }
}

fn joined_text(element: scraper::ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

fn absolute_url(href: &str, base_url: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        href.to_string()
    } else if href.starts_with('/') {
        format!("{}{}", base_url, href)
    } else {
        format!("{}/{}", base_url, href)
    }
}

/// Extract postings from a search results page.
///
/// Links are deduplicated by URL: the first position is kept, the last
/// occurrence's text wins.
pub fn parse_search_results(html: &str, base_url: &str, location: &str) -> Vec<Vacancy> {
    let document = scraper::Html::parse_document(html);
    let links = scraper::Selector::parse("a[href]").unwrap();

    let mut vacancies: Vec<Vacancy> = Vec::new();
    for link in document.select(&links) {
        let Some(href) = link.value().attr("href") else {
            continue;
        };
        if !href.contains("/vacancy/") {
            continue;
        }
        let name = joined_text(link);
        if name.is_empty() {
            continue;
        }

        let snippet = link
            .next_siblings()
            .find_map(scraper::ElementRef::wrap)
            .filter(|el| el.value().name() == "div")
            .map(joined_text)
            .unwrap_or_default();

        let vacancy = Vacancy {
            name,
            url: absolute_url(href, base_url),
            snippet,
            location: location.to_string(),
            description: String::new(),
        };
        match vacancies.iter_mut().find(|v| v.url == vacancy.url) {
            Some(existing) => *existing = vacancy,
            None => vacancies.push(vacancy),
        }
    }
    vacancies
}

/// Extract the description text of a posting page. Empty when absent.
pub fn parse_description(html: &str) -> String {
    let document = scraper::Html::parse_document(html);
    let selector = scraper::Selector::parse(r#"div[data-qa="vacancy-description"]"#).unwrap();
    document
        .select(&selector)
        .next()
        .map(joined_text)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEARCH_PAGE: &str = r#"
        <html><body>
          <div class="serp">
            <a href="/vacancy/101?from=search">  ML   Engineer </a>
            <div><span>Machine learning</span> <span>for ads ranking</span></div>
            <a href="https://hh.ru/vacancy/202">Data Scientist</a>
            <span>not a div</span>
            <a href="/employer/5">Acme</a>
            <a href="/vacancy/303"></a>
            <a href="/vacancy/101?from=search">ML Engineer (senior)</a>
            <div>updated teaser</div>
          </div>
        </body></html>
    "#;

    #[test]
    fn test_parse_search_results() {
        let vacancies = parse_search_results(SEARCH_PAGE, BASE_URL, "Удалённая");
        assert_eq!(vacancies.len(), 2);

        assert_eq!(vacancies[0].url, "https://hh.ru/vacancy/101?from=search");
        assert_eq!(vacancies[0].name, "ML Engineer (senior)");
        assert_eq!(vacancies[0].snippet, "updated teaser");
        assert_eq!(vacancies[0].location, "Удалённая");

        assert_eq!(vacancies[1].url, "https://hh.ru/vacancy/202");
        assert_eq!(vacancies[1].name, "Data Scientist");
        assert_eq!(vacancies[1].snippet, "");
    }

    #[test]
    fn test_snippet_fragments_joined() {
        let html = r#"<a href="/vacancy/1">C++ developer</a><div>
            <p>Low latency</p><p>trading</p></div>"#;
        let vacancies = parse_search_results(html, BASE_URL, "Санкт-Петербург");
        assert_eq!(vacancies[0].snippet, "Low latency trading");
    }

    #[test]
    fn test_parse_description() {
        let html = r#"<div data-qa="vacancy-description"><p>We build</p>
            <ul><li>PyTorch</li><li>Kafka</li></ul></div>"#;
        assert_eq!(parse_description(html), "We build PyTorch Kafka");
        assert_eq!(parse_description("<p>nothing</p>"), "");
    }

    #[test]
    fn test_search_url() {
        let board = HeadHunter::new(Duration::from_millis(500), Duration::from_secs(10)).unwrap();
        let url = board.search_url("machine learning", &SearchLocation::area("Санкт-Петербург", 2));
        assert!(url.starts_with("https://hh.ru/search/vacancy?"));
        assert!(url.contains("text=machine+learning"));
        assert!(url.contains("items_on_page=20"));
        assert!(url.contains("area=2"));
        assert!(!url.contains("remote"));

        let url = board.search_url("C++ developer", &SearchLocation::remote("Удалённая"));
        assert!(url.contains("text=C%2B%2B+developer"));
        assert!(url.contains("remote=1"));
        assert!(!url.contains("area="));
    }

    #[test]
    fn test_search_url_on_mirror() {
        let board = HeadHunter::new(Duration::from_millis(500), Duration::from_secs(10))
            .unwrap()
            .with_base_url("https://spb.hh.ru/")
            .with_items_on_page(50);
        let url = board.search_url("rust", &SearchLocation::area("Санкт-Петербург", 2));
        assert!(url.starts_with("https://spb.hh.ru/search/vacancy?"));
        assert!(url.contains("items_on_page=50"));
    }

    #[test]
    fn test_absolute_url() {
        assert_eq!(absolute_url("/vacancy/1", BASE_URL), "https://hh.ru/vacancy/1");
        assert_eq!(
            absolute_url("https://spb.hh.ru/vacancy/1", BASE_URL),
            "https://spb.hh.ru/vacancy/1"
        );
    }
}
