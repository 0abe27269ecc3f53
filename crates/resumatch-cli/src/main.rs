use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tokio_util::sync::CancellationToken;

use resumatch_core::SectionKey;
use resumatch_core::config_file::{self, ConfigFile};
use resumatch_jobs::embed::{DEFAULT_EMBEDDING_MODEL, DEFAULT_EMBEDDING_URL};
use resumatch_jobs::rate_limit::DEFAULT_REQUEST_INTERVAL;
use resumatch_jobs::{EmbeddingConfig, HeadHunter, HttpEmbedder, SearchConfig, SearchLocation};
use resumatch_parsing::{HeadingMode, ParsingConfig, ParsingConfigBuilder};

mod output;

use output::ColorMode;

/// Résumé matcher - split a résumé into sections and rank job postings against it
#[derive(Parser, Debug)]
#[command(name = "resumatch", version, about, long_about = None)]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Split a PDF or text résumé into sections and print them
    Sections {
        /// Path to the résumé (.pdf, .txt, .md)
        file_path: PathBuf,

        /// Print sections as JSON
        #[arg(long)]
        json: bool,

        /// Section that receives text before the first heading
        #[arg(long)]
        default_section: Option<String>,

        /// Only recognize headings at the start of a line
        #[arg(long)]
        anchored: bool,

        /// Also print sections that received no text
        #[arg(long)]
        keep_empty: bool,

        /// Characters shown per section
        #[arg(long, default_value_t = 500)]
        preview: usize,

        /// Path to output file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },

    /// Rank job postings from hh.ru against a résumé
    Match {
        /// Path to the résumé (.pdf, .txt, .md)
        file_path: PathBuf,

        /// Search keyword (repeatable)
        #[arg(short, long = "keyword")]
        keywords: Vec<String>,

        /// Lexical filter term applied to name and teaser (repeatable)
        #[arg(short, long = "filter-term")]
        filter_terms: Vec<String>,

        /// Number of postings to show (at least 1)
        #[arg(long)]
        top: Option<usize>,

        /// Print the ranking as JSON
        #[arg(long)]
        json: bool,

        /// Base URL of an OpenAI-compatible embeddings API
        #[arg(long)]
        embedding_url: Option<String>,

        /// Embedding model name
        #[arg(long)]
        embedding_model: Option<String>,

        /// Path to output file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,

        /// Collect and filter postings, then stop without fetching or ranking
        #[arg(long)]
        dry_run: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let file_config = config_file::load_config();

    match cli.command {
        Command::Sections {
            file_path,
            json,
            default_section,
            anchored,
            keep_empty,
            preview,
            output,
            no_color,
        } => {
            let overrides = ParsingOverrides {
                default_section,
                anchored,
                keep_empty,
            };
            let config = parsing_config(&file_config, &overrides)?;
            sections(&file_path, &config, json, preview, output, no_color)
        }
        Command::Match {
            file_path,
            keywords,
            filter_terms,
            top,
            json,
            embedding_url,
            embedding_model,
            output,
            no_color,
            dry_run,
        } => {
            let parsing = parsing_config(&file_config, &ParsingOverrides::default())?;
            let search = search_config(&file_config, keywords, filter_terms, top)?;
            let embedding = embedding_config(&file_config, embedding_url, embedding_model);
            let board_settings = board_settings(&file_config);
            run_match(
                &file_path,
                &parsing,
                &search,
                embedding,
                board_settings,
                MatchOutput {
                    path: output,
                    json,
                    no_color,
                    dry_run,
                },
            )
            .await
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn open_writer(output: &Option<PathBuf>) -> anyhow::Result<Box<dyn Write>> {
    Ok(match output {
        Some(path) => Box::new(std::fs::File::create(path)?),
        None => Box::new(std::io::stdout()),
    })
}

/// Parsing options given on the command line.
#[derive(Debug, Default)]
struct ParsingOverrides {
    default_section: Option<String>,
    anchored: bool,
    keep_empty: bool,
}

/// Resolve parsing configuration: CLI flags > config file > defaults.
fn parsing_config(file: &ConfigFile, flags: &ParsingOverrides) -> anyhow::Result<ParsingConfig> {
    let section = file.parsing.clone().unwrap_or_default();
    let mut builder = ParsingConfigBuilder::new();

    for entry in section.extra_headings.unwrap_or_default() {
        builder = builder.add_heading(&entry.pattern, entry.section);
    }

    let mode = if flags.anchored {
        Some(HeadingMode::Anchored)
    } else {
        match section.heading_mode.as_deref().map(str::to_lowercase).as_deref() {
            None | Some("search") => None,
            Some("anchored") => Some(HeadingMode::Anchored),
            Some(other) => anyhow::bail!(
                "Unknown heading_mode '{}' in config (expected 'search' or 'anchored')",
                other
            ),
        }
    };
    if let Some(mode) = mode {
        builder = builder.heading_mode(mode);
    }

    let default_section = flags
        .default_section
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .map(SectionKey::from_name)
        .or(section.default_section);
    if let Some(key) = default_section {
        builder = builder.default_section(key);
    }

    let keep_empty = flags.keep_empty || section.keep_empty_sections.unwrap_or(false);
    builder = builder.keep_empty_sections(keep_empty);

    builder
        .build()
        .map_err(|e| anyhow::anyhow!("Invalid heading pattern: {}", e))
}

/// Resolve search settings: CLI flags > config file > defaults.
fn search_config(
    file: &ConfigFile,
    keywords: Vec<String>,
    filter_terms: Vec<String>,
    top: Option<usize>,
) -> anyhow::Result<SearchConfig> {
    let section = file.search.clone().unwrap_or_default();
    let defaults = SearchConfig::default();

    let keywords = if keywords.is_empty() {
        section.keywords.unwrap_or(defaults.keywords)
    } else {
        keywords
    };
    let filter_terms = if filter_terms.is_empty() {
        section.filter_terms.unwrap_or(defaults.filter_terms)
    } else {
        filter_terms
    };
    let locations = section
        .locations
        .map(|entries| {
            entries
                .into_iter()
                .map(|e| SearchLocation {
                    name: e.name,
                    area: e.area,
                    remote: e.remote,
                })
                .collect()
        })
        .unwrap_or(defaults.locations);

    let top_k = top.or(section.top_k).unwrap_or(defaults.top_k);
    if top_k == 0 {
        anyhow::bail!("--top / top_k must be at least 1");
    }

    Ok(SearchConfig {
        keywords,
        locations,
        filter_terms,
        top_k,
    })
}

/// Resolve embedding settings: CLI flags > env vars > config file > defaults.
fn embedding_config(
    file: &ConfigFile,
    url: Option<String>,
    model: Option<String>,
) -> EmbeddingConfig {
    let section = file.embedding.clone().unwrap_or_default();
    let defaults = EmbeddingConfig::default();

    EmbeddingConfig {
        url: url
            .or_else(|| std::env::var("EMBEDDING_URL").ok())
            .or(section.url)
            .unwrap_or_else(|| DEFAULT_EMBEDDING_URL.to_string()),
        model: model
            .or_else(|| std::env::var("EMBEDDING_MODEL").ok())
            .or(section.model)
            .unwrap_or_else(|| DEFAULT_EMBEDDING_MODEL.to_string()),
        api_key: std::env::var("EMBEDDING_API_KEY").ok().or(section.api_key),
        batch_size: section.batch_size.unwrap_or(defaults.batch_size).max(1),
        timeout: defaults.timeout,
    }
}

/// Board pacing and page size from the config file.
#[derive(Debug, Clone)]
struct BoardSettings {
    base_url: Option<String>,
    request_interval: Duration,
    timeout: Duration,
    items_on_page: u32,
}

fn board_settings(file: &ConfigFile) -> BoardSettings {
    let section = file.search.clone().unwrap_or_default();
    BoardSettings {
        base_url: section.base_url,
        request_interval: section
            .request_interval_ms
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_REQUEST_INTERVAL),
        timeout: Duration::from_secs(section.timeout_secs.unwrap_or(15)),
        items_on_page: section.items_on_page.unwrap_or(20),
    }
}

fn sections(
    file_path: &Path,
    config: &ParsingConfig,
    json: bool,
    preview: usize,
    output: Option<PathBuf>,
    no_color: bool,
) -> anyhow::Result<()> {
    if !file_path.exists() {
        anyhow::bail!("File not found: {}", file_path.display());
    }

    let color = ColorMode(!no_color && output.is_none());
    let mut writer = open_writer(&output)?;

    let sections = resumatch_ingest::extract_sections(file_path, config)?;
    if json {
        output::print_sections_json(&mut writer, &sections)?;
    } else {
        output::print_sections(&mut writer, &sections, preview, color)?;
    }
    Ok(())
}

/// Output options of the `match` subcommand.
#[derive(Debug)]
struct MatchOutput {
    path: Option<PathBuf>,
    json: bool,
    no_color: bool,
    dry_run: bool,
}

async fn run_match(
    file_path: &Path,
    parsing: &ParsingConfig,
    search: &SearchConfig,
    embedding: EmbeddingConfig,
    settings: BoardSettings,
    out: MatchOutput,
) -> anyhow::Result<()> {
    if !file_path.exists() {
        anyhow::bail!("File not found: {}", file_path.display());
    }

    let color = ColorMode(!out.no_color && out.path.is_none());
    let mut writer = open_writer(&out.path)?;

    let sections = resumatch_ingest::extract_sections(file_path, parsing)?;
    let profile = resumatch_jobs::profile_text(&sections);
    if profile.is_empty() {
        anyhow::bail!("No text could be extracted from {}", file_path.display());
    }
    tracing::info!(sections = sections.len(), profile_chars = profile.chars().count(), "built profile");

    let mut board = HeadHunter::new(settings.request_interval, settings.timeout)?
        .with_items_on_page(settings.items_on_page);
    if let Some(base_url) = &settings.base_url {
        board = board.with_base_url(base_url);
    }

    let cancel = CancellationToken::new();
    let cancel_clone = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel_clone.cancel();
        }
    });

    let spinner = ProgressBar::new_spinner();
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner.set_message(format!(
        "Searching {} keywords in {} locations...",
        search.keywords.len(),
        search.locations.len()
    ));
    let collected = resumatch_jobs::collect_vacancies(&board, search, &cancel).await;
    spinner.finish_and_clear();
    let mut vacancies = collected?;

    if out.dry_run {
        output::print_vacancies(&mut writer, &vacancies, color)?;
        return Ok(());
    }

    let bar = ProgressBar::new(vacancies.len() as u64);
    bar.set_style(
        ProgressStyle::with_template("{spinner} Fetching descriptions [{bar:30}] {pos}/{len}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> "),
    );
    let fetched = resumatch_jobs::fetch_descriptions(&board, &mut vacancies, &cancel, |done, _| {
        bar.set_position(done as u64);
    })
    .await;
    bar.finish_and_clear();
    fetched?;

    let embedder = HttpEmbedder::new(embedding);
    let ranked =
        resumatch_jobs::score_vacancies(&embedder, &profile, vacancies, search.top_k, &cancel)
            .await?;

    if out.json {
        output::print_ranking_json(&mut writer, &ranked)?;
    } else {
        output::print_ranking(&mut writer, &ranked, color)?;
    }
    Ok(())
}
