//! Job board trait and implementations.

pub mod hh;
pub mod mock;

use std::future::Future;
use std::pin::Pin;

use crate::rate_limit::FetchError;
use crate::{SearchLocation, Vacancy};

/// A job board that can be searched by keyword and location.
pub trait JobBoard: Send + Sync {
    /// Display name of the board (e.g. "hh.ru").
    fn name(&self) -> &str;

    /// Postings for `query` in `location`. Descriptions are left empty.
    fn search<'a>(
        &'a self,
        query: &'a str,
        location: &'a SearchLocation,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Vacancy>, FetchError>> + Send + 'a>>;

    /// Full description text of the posting at `url`.
    fn fetch_description<'a>(
        &'a self,
        url: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, FetchError>> + Send + 'a>>;
}
