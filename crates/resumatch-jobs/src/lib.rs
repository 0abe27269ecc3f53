//! Collaborators around the segmentation core: a job board scraper, a
//! lexical pre-filter, an embedding client and cosine ranking of vacancies
//! against a résumé profile.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod board;
pub mod embed;
pub mod filter;
pub mod pipeline;
pub mod profile;
pub mod rank;
pub mod rate_limit;

pub use board::JobBoard;
pub use board::hh::HeadHunter;
pub use board::mock::MockBoard;
pub use embed::{Embedder, EmbeddingConfig, HttpEmbedder, MockEmbedder};
pub use filter::{dedup_by_url, filter_vacancies, matches_terms};
pub use pipeline::{SearchConfig, collect_vacancies, fetch_descriptions, score_vacancies};
pub use profile::{profile_text, vacancy_text};
pub use rank::{ScoredVacancy, cosine_similarity, rank};
pub use rate_limit::{AdaptiveLimiter, FetchError};

#[derive(Error, Debug)]
pub enum JobsError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{0}")]
    Fetch(#[from] FetchError),
    #[error("embedding service error: {0}")]
    Embedding(String),
    #[error("no vacancies left after filtering")]
    NoVacancies,
    #[error("cancelled")]
    Cancelled,
}

/// A job posting found on a board.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vacancy {
    pub name: String,
    pub url: String,
    /// Short teaser shown next to the link on the search page.
    pub snippet: String,
    /// Name of the [`SearchLocation`] the posting was found under.
    pub location: String,
    /// Full description, filled in by [`fetch_descriptions`].
    #[serde(default)]
    pub description: String,
}

/// One place to search: a board region, remote postings, or both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchLocation {
    pub name: String,
    /// Board-specific region id (`area` on hh.ru).
    pub area: Option<u32>,
    #[serde(default)]
    pub remote: bool,
}

impl SearchLocation {
    pub fn area(name: &str, area: u32) -> Self {
        Self {
            name: name.to_string(),
            area: Some(area),
            remote: false,
        }
    }

    pub fn remote(name: &str) -> Self {
        Self {
            name: name.to_string(),
            area: None,
            remote: true,
        }
    }

    /// Saint Petersburg and remote postings.
    pub fn defaults() -> Vec<Self> {
        vec![
            Self::area("Санкт-Петербург", 2),
            Self::remote("Удалённая"),
        ]
    }
}
