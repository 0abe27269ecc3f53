//! Mock job board for testing.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::JobBoard;
use crate::rate_limit::FetchError;
use crate::{SearchLocation, Vacancy};

/// A hand-rolled [`JobBoard`] serving canned results.
///
/// Search results are keyed by `(query, location name)`; unknown pairs
/// return no postings. Descriptions are keyed by URL; unknown URLs fail
/// with a 404 so callers can exercise their error path.
#[derive(Default)]
pub struct MockBoard {
    results: HashMap<(String, String), Vec<(String, String, String)>>,
    descriptions: HashMap<String, String>,
    failing_queries: Vec<String>,
    searches: Mutex<Vec<(String, String)>>,
    description_calls: AtomicUsize,
}

impl MockBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a posting returned for `query` in `location`.
    pub fn with_posting(
        mut self,
        query: &str,
        location: &str,
        name: &str,
        url: &str,
        snippet: &str,
    ) -> Self {
        self.results
            .entry((query.to_string(), location.to_string()))
            .or_default()
            .push((name.to_string(), url.to_string(), snippet.to_string()));
        self
    }

    pub fn with_description(mut self, url: &str, description: &str) -> Self {
        self.descriptions
            .insert(url.to_string(), description.to_string());
        self
    }

    /// Make every search for `query` fail.
    pub fn with_failing_query(mut self, query: &str) -> Self {
        self.failing_queries.push(query.to_string());
        self
    }

    /// `(query, location)` pairs searched so far, in call order.
    pub fn searches(&self) -> Vec<(String, String)> {
        self.searches.lock().map(|s| s.clone()).unwrap_or_default()
    }

    pub fn description_calls(&self) -> usize {
        self.description_calls.load(Ordering::SeqCst)
    }
}

impl JobBoard for MockBoard {
    fn name(&self) -> &str {
        "mock"
    }

    fn search<'a>(
        &'a self,
        query: &'a str,
        location: &'a SearchLocation,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Vacancy>, FetchError>> + Send + 'a>> {
        if let Ok(mut searches) = self.searches.lock() {
            searches.push((query.to_string(), location.name.clone()));
        }

        Box::pin(async move {
            if self.failing_queries.iter().any(|q| q == query) {
                return Err(FetchError::Status(503));
            }
            let key = (query.to_string(), location.name.clone());
            Ok(self
                .results
                .get(&key)
                .map(|postings| {
                    postings
                        .iter()
                        .map(|(name, url, snippet)| Vacancy {
                            name: name.clone(),
                            url: url.clone(),
                            snippet: snippet.clone(),
                            location: location.name.clone(),
                            description: String::new(),
                        })
                        .collect()
                })
                .unwrap_or_default())
        })
    }

    fn fetch_description<'a>(
        &'a self,
        url: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, FetchError>> + Send + 'a>> {
        self.description_calls.fetch_add(1, Ordering::SeqCst);
        Box::pin(async move {
            self.descriptions
                .get(url)
                .cloned()
                .ok_or(FetchError::Status(404))
        })
    }
}
