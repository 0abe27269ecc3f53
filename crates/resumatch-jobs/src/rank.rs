use serde::Serialize;

use crate::Vacancy;

/// Default number of postings kept after ranking.
pub const DEFAULT_TOP_K: usize = 20;

/// A posting with its similarity to the résumé profile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredVacancy {
    pub vacancy: Vacancy,
    pub score: f32,
}

/// Cosine similarity between two vectors.
///
/// Returns 0.0 for empty or mismatched inputs and when either vector has
/// zero norm.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

/// Score every posting against `profile` and keep the best `top_k`.
///
/// `embeddings[i]` belongs to `vacancies[i]`. Results are sorted by
/// descending score; equal scores keep input order.
pub fn rank(
    profile: &[f32],
    vacancies: Vec<Vacancy>,
    embeddings: &[Vec<f32>],
    top_k: usize,
) -> Vec<ScoredVacancy> {
    let mut scored: Vec<ScoredVacancy> = vacancies
        .into_iter()
        .zip(embeddings)
        .map(|(vacancy, embedding)| ScoredVacancy {
            score: cosine_similarity(profile, embedding),
            vacancy,
        })
        .collect();
    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored.truncate(top_k);
    scored
}
