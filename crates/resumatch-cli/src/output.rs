use std::io::Write;

use owo_colors::OwoColorize;
use resumatch_core::ResumeSections;
use resumatch_jobs::{ScoredVacancy, Vacancy};

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

/// First `max_chars` characters of `text`, with `...` appended when cut.
pub fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}...", &text[..byte_idx]),
        None => text.to_string(),
    }
}

/// Print every section as a `=== KEY (N chars) ===` block.
pub fn print_sections(
    w: &mut dyn Write,
    sections: &ResumeSections,
    preview_chars: usize,
    color: ColorMode,
) -> std::io::Result<()> {
    if sections.is_empty() {
        writeln!(w, "No text found.")?;
        return Ok(());
    }

    for section in sections {
        let header = format!(
            "=== {} ({} chars) ===",
            section.key.as_str().to_uppercase(),
            section.content.chars().count()
        );
        if color.enabled() {
            writeln!(w, "{}", header.bold().cyan())?;
        } else {
            writeln!(w, "{}", header)?;
        }
        writeln!(w, "{}", preview(&section.content, preview_chars))?;
        writeln!(w)?;
    }
    Ok(())
}

/// Print sections as a JSON object in section order.
pub fn print_sections_json(w: &mut dyn Write, sections: &ResumeSections) -> std::io::Result<()> {
    let json = serde_json::to_string_pretty(sections)?;
    writeln!(w, "{}", json)
}

/// Print the postings collected in a dry run.
pub fn print_vacancies(
    w: &mut dyn Write,
    vacancies: &[Vacancy],
    color: ColorMode,
) -> std::io::Result<()> {
    if color.enabled() {
        writeln!(
            w,
            "{} {} vacancies after filtering\n",
            "DRY RUN:".bold().cyan(),
            vacancies.len()
        )?;
    } else {
        writeln!(w, "DRY RUN: {} vacancies after filtering\n", vacancies.len())?;
    }

    for (i, vacancy) in vacancies.iter().enumerate() {
        if color.enabled() {
            writeln!(w, "[{}] {} ({})", i + 1, vacancy.name.bold(), vacancy.location)?;
            writeln!(w, "    {}", vacancy.url.dimmed())?;
        } else {
            writeln!(w, "[{}] {} ({})", i + 1, vacancy.name, vacancy.location)?;
            writeln!(w, "    {}", vacancy.url)?;
        }
        if !vacancy.snippet.is_empty() {
            writeln!(w, "    {}", preview(&vacancy.snippet, 120))?;
        }
    }
    Ok(())
}

/// Print the ranked postings.
pub fn print_ranking(
    w: &mut dyn Write,
    ranked: &[ScoredVacancy],
    color: ColorMode,
) -> std::io::Result<()> {
    let title = format!("Top {} matching vacancies:", ranked.len());
    if color.enabled() {
        writeln!(w, "{}", title.bold())?;
    } else {
        writeln!(w, "{}", title)?;
    }

    for scored in ranked {
        let vacancy = &scored.vacancy;
        writeln!(w)?;
        if color.enabled() {
            writeln!(w, "- {} ({})", vacancy.name.bold(), vacancy.location)?;
            writeln!(w, "  {}", vacancy.url.dimmed())?;
            let score = format!("{:.2}", scored.score);
            let score = if scored.score >= 0.5 {
                score.green().to_string()
            } else {
                score.yellow().to_string()
            };
            writeln!(w, "  Similarity: {}", score)?;
        } else {
            writeln!(w, "- {} ({})", vacancy.name, vacancy.location)?;
            writeln!(w, "  {}", vacancy.url)?;
            writeln!(w, "  Similarity: {:.2}", scored.score)?;
        }
    }
    Ok(())
}

/// Print the ranked postings as a JSON array, best match first.
pub fn print_ranking_json(w: &mut dyn Write, ranked: &[ScoredVacancy]) -> std::io::Result<()> {
    let json = serde_json::to_string_pretty(ranked)?;
    writeln!(w, "{}", json)
}
