use tokio_util::sync::CancellationToken;

use crate::board::JobBoard;
use crate::embed::Embedder;
use crate::filter::{DEFAULT_FILTER_TERMS, dedup_by_url, filter_vacancies};
use crate::profile::vacancy_text;
use crate::rank::{DEFAULT_TOP_K, ScoredVacancy, rank};
use crate::{JobsError, SearchLocation, Vacancy};

/// Default search keywords.
pub const DEFAULT_KEYWORDS: &[&str] = &["machine learning", "data science", "C++ developer"];

/// What to search for and how to narrow it down.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub keywords: Vec<String>,
    pub locations: Vec<SearchLocation>,
    /// Lexical filter applied to name and snippet after collection.
    pub filter_terms: Vec<String>,
    pub top_k: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            keywords: DEFAULT_KEYWORDS.iter().map(|s| s.to_string()).collect(),
            locations: SearchLocation::defaults(),
            filter_terms: DEFAULT_FILTER_TERMS.iter().map(|s| s.to_string()).collect(),
            top_k: DEFAULT_TOP_K,
        }
    }
}

/// Search every location × keyword pair, then deduplicate and filter.
///
/// A failed search is logged and skipped. Cancellation stops issuing new
/// searches; whatever was collected so far is still filtered and returned.
/// An empty result after filtering is [`JobsError::NoVacancies`].
pub async fn collect_vacancies(
    board: &dyn JobBoard,
    config: &SearchConfig,
    cancel: &CancellationToken,
) -> Result<Vec<Vacancy>, JobsError> {
    let mut all = Vec::new();

    'outer: for location in &config.locations {
        for keyword in &config.keywords {
            if cancel.is_cancelled() {
                tracing::info!("search cancelled");
                break 'outer;
            }
            match board.search(keyword, location).await {
                Ok(found) => all.extend(found),
                Err(e) => tracing::warn!(
                    board = board.name(),
                    keyword = %keyword,
                    location = %location.name,
                    error = %e,
                    "search failed"
                ),
            }
        }
    }

    let collected = all.len();
    let unique = dedup_by_url(all);
    let unique_count = unique.len();
    let filtered = filter_vacancies(unique, &config.filter_terms);
    tracing::info!(
        collected,
        unique = unique_count,
        filtered = filtered.len(),
        "collected vacancies"
    );

    if filtered.is_empty() {
        return Err(JobsError::NoVacancies);
    }
    Ok(filtered)
}

/// Fill in each posting's description.
///
/// A failed fetch is logged and leaves the description empty. `progress` is
/// called with `(done, total)` after every posting.
pub async fn fetch_descriptions(
    board: &dyn JobBoard,
    vacancies: &mut [Vacancy],
    cancel: &CancellationToken,
    progress: impl Fn(usize, usize),
) -> Result<(), JobsError> {
    let total = vacancies.len();
    for (i, vacancy) in vacancies.iter_mut().enumerate() {
        if cancel.is_cancelled() {
            return Err(JobsError::Cancelled);
        }
        vacancy.description = match board.fetch_description(&vacancy.url).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(url = %vacancy.url, error = %e, "description fetch failed");
                String::new()
            }
        };
        progress(i + 1, total);
    }
    Ok(())
}

/// Embed the profile and every posting in one call and rank the postings.
///
/// Cancellation aborts the pending embedding request with
/// [`JobsError::Cancelled`].
pub async fn score_vacancies(
    embedder: &dyn Embedder,
    profile: &str,
    vacancies: Vec<Vacancy>,
    top_k: usize,
    cancel: &CancellationToken,
) -> Result<Vec<ScoredVacancy>, JobsError> {
    let mut texts = Vec::with_capacity(vacancies.len() + 1);
    texts.push(profile.to_string());
    texts.extend(vacancies.iter().map(vacancy_text));

    let embeddings = tokio::select! {
        biased;
        _ = cancel.cancelled() => return Err(JobsError::Cancelled),
        result = embedder.embed(&texts) => result?,
    };
    if embeddings.len() != texts.len() {
        return Err(JobsError::Embedding(format!(
            "expected {} embeddings, got {}",
            texts.len(),
            embeddings.len()
        )));
    }

    let (profile_embedding, vacancy_embeddings) = embeddings.split_at(1);
    tracing::debug!(
        embedder = embedder.name(),
        dims = profile_embedding[0].len(),
        "ranking vacancies"
    );
    Ok(rank(&profile_embedding[0], vacancies, vacancy_embeddings, top_k))
}
