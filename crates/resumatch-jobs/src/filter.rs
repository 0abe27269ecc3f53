use crate::Vacancy;

/// Default lexical filter terms.
pub const DEFAULT_FILTER_TERMS: &[&str] = &["machine learning", "data science", "С++"];

/// Whether any term occurs in the posting's name or snippet.
///
/// Comparison is case-insensitive substring containment. An empty term list
/// accepts every posting.
pub fn matches_terms<S: AsRef<str>>(vacancy: &Vacancy, terms: &[S]) -> bool {
    if terms.is_empty() {
        return true;
    }
    let haystack = format!("{} {}", vacancy.name, vacancy.snippet).to_lowercase();
    terms
        .iter()
        .map(|t| t.as_ref().trim().to_lowercase())
        .any(|t| !t.is_empty() && haystack.contains(&t))
}

/// Keep only postings matching at least one term, preserving order.
pub fn filter_vacancies<S: AsRef<str>>(vacancies: Vec<Vacancy>, terms: &[S]) -> Vec<Vacancy> {
    let before = vacancies.len();
    let kept: Vec<Vacancy> = vacancies
        .into_iter()
        .filter(|v| matches_terms(v, terms))
        .collect();
    tracing::debug!(before, after = kept.len(), "applied lexical filter");
    kept
}

/// Deduplicate by URL. A repeated URL keeps its first position and takes
/// the later posting's fields.
pub fn dedup_by_url(vacancies: Vec<Vacancy>) -> Vec<Vacancy> {
    let mut out: Vec<Vacancy> = Vec::with_capacity(vacancies.len());
    for vacancy in vacancies {
        match out.iter_mut().find(|v| v.url == vacancy.url) {
            Some(existing) => *existing = vacancy,
            None => out.push(vacancy),
        }
    }
    out
}
