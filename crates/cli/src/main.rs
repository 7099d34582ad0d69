use analyzer::{AnalysisError, AnalyzerConfig, ReviewAnalyzer, SentimentSummary};
use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use colored::{ColoredString, Colorize};
use pipeline::TextEncoder;
use review_data::{MovieSummary, ReviewRecord, Sentiment, Vocabulary};
use sources::OmdbCatalog;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// reelfeel - Movie review sentiment analysis
#[derive(Parser)]
#[command(name = "reelfeel")]
#[command(about = "Scrape a movie's audience reviews and score their sentiment", long_about = None)]
struct Cli {
    /// JSON config file; flags and environment variables override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory with the classifier's config.json and model.safetensors
    #[arg(long, env = "REELFEEL_MODEL_DIR")]
    model_dir: Option<PathBuf>,

    /// JSON word index used to encode review text
    #[arg(long, env = "REELFEEL_VOCABULARY")]
    vocabulary: Option<PathBuf>,

    /// Base URL of the review site
    #[arg(long, env = "REELFEEL_REVIEW_BASE_URL")]
    review_base_url: Option<String>,

    /// Timeout for each HTTP request, in seconds
    #[arg(long, env = "REELFEEL_TIMEOUT_SECS")]
    timeout_secs: Option<u64>,

    /// API key for the OMDb movie catalog
    #[arg(long, env = "OMDB_API_KEY", hide_env_values = true)]
    omdb_api_key: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch and score the reviews of one movie
    Analyze {
        /// Movie id on the review site (e.g. tt0133093)
        #[arg(long, conflicts_with = "title", required_unless_present = "title")]
        movie_id: Option<String>,

        /// Look the movie up by title and analyze the first match
        #[arg(long)]
        title: Option<String>,

        /// Only fetch reviews not marked as spoilers
        #[arg(long)]
        spoiler_free: bool,

        /// Print the enriched records and summary as JSON
        #[arg(long)]
        json: bool,

        /// Number of reviews to print (all are scored)
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Search the movie catalog by title
    Search {
        #[arg(long)]
        title: String,
    },

    /// Show catalog details for one movie
    Details {
        #[arg(long)]
        movie_id: String,
    },

    /// Print the token ids a text encodes to
    Encode {
        #[arg(long)]
        text: String,
    },

    /// Print the resolved configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = resolve_config(&cli)?;

    // Dispatch to appropriate command handler
    match cli.command {
        Commands::Analyze {
            movie_id,
            title,
            spoiler_free,
            json,
            limit,
        } => handle_analyze(&config, movie_id, title, spoiler_free, json, limit).await?,
        Commands::Search { title } => handle_search(&config, &title).await?,
        Commands::Details { movie_id } => handle_details(&config, &movie_id).await?,
        Commands::Encode { text } => handle_encode(&config, &text)?,
        Commands::Config => handle_config(&config)?,
    }

    Ok(())
}

/// Layer the config file, then flags and environment, over the defaults
fn resolve_config(cli: &Cli) -> Result<AnalyzerConfig> {
    let mut config = match &cli.config {
        Some(path) => AnalyzerConfig::from_json_file(path)?,
        None => AnalyzerConfig::default(),
    };

    if let Some(dir) = &cli.model_dir {
        config.model_dir = dir.clone();
    }
    if let Some(path) = &cli.vocabulary {
        config.vocabulary_path = path.clone();
    }
    if let Some(url) = &cli.review_base_url {
        config.review_base_url = url.clone();
    }
    if let Some(secs) = cli.timeout_secs {
        config.request_timeout_secs = secs;
    }
    if let Some(key) = &cli.omdb_api_key {
        config.omdb_api_key = Some(key.clone());
    }

    config.validate()?;
    debug!(
        "Using model {} and vocabulary {}",
        config.model_dir.display(),
        config.vocabulary_path.display()
    );
    Ok(config)
}

/// Handle the 'analyze' command
async fn handle_analyze(
    config: &AnalyzerConfig,
    movie_id: Option<String>,
    title: Option<String>,
    spoiler_free: bool,
    json: bool,
    limit: Option<usize>,
) -> Result<()> {
    let (movie_id, movie) = match (movie_id, title) {
        (Some(id), _) => (id, None),
        (None, Some(title)) => {
            let movie = first_match(config, &title).await?;
            (movie.id.clone(), Some(movie))
        }
        (None, None) => return Err(anyhow!("either --movie-id or --title is required")),
    };

    let start = Instant::now();
    let analyzer = ReviewAnalyzer::from_config(config).context("Failed to initialize analyzer")?;
    if !json {
        println!(
            "{} Loaded model '{}' in {:.2?}",
            "✓".green(),
            analyzer.scorer().model_name(),
            start.elapsed()
        );
    }

    let records = match analyzer.analyze_with_options(&movie_id, spoiler_free).await {
        Ok(records) => records,
        Err(AnalysisError::NoReviews { movie_id }) => {
            return Err(anyhow!("Nothing to analyze: no reviews found for {}", movie_id));
        }
        Err(e) => return Err(e).context(format!("Failed to analyze {}", movie_id)),
    };
    let summary = SentimentSummary::from_records(&records);

    if json {
        let output = serde_json::json!({
            "movie_id": movie_id,
            "movie": movie,
            "reviews": records,
            "summary": summary,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    match &movie {
        Some(m) => println!(
            "{}",
            format!("Reviews for {} ({})", m.title, m.year.as_deref().unwrap_or("????"))
                .bold()
                .blue()
        ),
        None => println!("{}", format!("Reviews for {}", movie_id).bold().blue()),
    }
    print_reviews(&records, limit.unwrap_or(records.len()));
    print_summary(&summary);
    Ok(())
}

async fn first_match(config: &AnalyzerConfig, title: &str) -> Result<MovieSummary> {
    let catalog = OmdbCatalog::new(config.catalog_config())?;
    catalog
        .search(title)
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| anyhow!("No movie matching '{}'", title))
}

/// Handle the 'search' command
async fn handle_search(config: &AnalyzerConfig, title: &str) -> Result<()> {
    let catalog = OmdbCatalog::new(config.catalog_config())?;
    let movies = catalog.search(title).await?;

    println!("{}", format!("Search results for '{}':", title).bold().blue());
    if movies.is_empty() {
        println!("  (no matches)");
    }
    for movie in &movies {
        println!(
            "{}: {} ({})",
            movie.id.green(),
            movie.title,
            movie.year.as_deref().unwrap_or("????")
        );
    }
    Ok(())
}

/// Handle the 'details' command
async fn handle_details(config: &AnalyzerConfig, movie_id: &str) -> Result<()> {
    let catalog = OmdbCatalog::new(config.catalog_config())?;
    let details = catalog.details(movie_id).await?;

    println!(
        "{}",
        format!("{} ({})", details.title, details.year.as_deref().unwrap_or("????"))
            .bold()
            .blue()
    );
    print_field("Genres", Some(details.genres.join(", ")).filter(|g| !g.is_empty()));
    print_field("Director", details.director);
    print_field("Runtime", details.runtime);
    print_field("IMDb rating", details.imdb_rating);
    print_field("Plot", details.plot);
    Ok(())
}

fn print_field(label: &str, value: Option<String>) {
    if let Some(value) = value {
        println!("{}{}: {}", "• ".green(), label, value);
    }
}

/// Handle the 'encode' command
fn handle_encode(config: &AnalyzerConfig, text: &str) -> Result<()> {
    let vocabulary = Vocabulary::load_from_file(&config.vocabulary_path)
        .context("Failed to load vocabulary")?;
    let encoder = TextEncoder::new(Arc::new(vocabulary));

    let ids = encoder.encode(text);
    let rendered: Vec<String> = ids.iter().map(u32::to_string).collect();
    println!("[{}]", rendered.join(", "));
    Ok(())
}

/// Handle the 'config' command
fn handle_config(config: &AnalyzerConfig) -> Result<()> {
    let mut shown = config.clone();
    if shown.omdb_api_key.is_some() {
        shown.omdb_api_key = Some("<redacted>".to_string());
    }
    println!("{}", serde_json::to_string_pretty(&shown)?);
    Ok(())
}

fn label(sentiment: Sentiment) -> ColoredString {
    match sentiment {
        Sentiment::Positive => sentiment.as_str().green(),
        Sentiment::Neutral => sentiment.as_str().yellow(),
        Sentiment::Negative => sentiment.as_str().red(),
    }
}

fn print_reviews(records: &[ReviewRecord], limit: usize) {
    const PREVIEW_CHARS: usize = 160;

    for (rank, record) in records.iter().take(limit).enumerate() {
        let (score, sentiment) = match record.assessment {
            Some(a) => (format!("{:.4}", a.score), label(a.sentiment)),
            None => ("-".to_string(), "UNSCORED".dimmed()),
        };
        println!(
            "{}. [{} {}] {} (rating: {})",
            (rank + 1).to_string().green(),
            sentiment,
            score,
            record.title.as_deref().unwrap_or("(untitled)").bold(),
            record.rating.as_deref().unwrap_or("-")
        );

        let mut preview: String = record.content.chars().take(PREVIEW_CHARS).collect();
        if record.content.chars().count() > PREVIEW_CHARS {
            preview.push_str("...");
        }
        println!("   {}", preview);
    }
    if records.len() > limit {
        println!("   ... and {} more", records.len() - limit);
    }
}

fn print_summary(summary: &SentimentSummary) {
    println!();
    println!("{}", "Summary:".bold().blue());
    println!("{}Total reviews: {}", "• ".cyan(), summary.total);
    for entry in &summary.labels {
        println!(
            "{}{}: {} ({:.1}%), mean score {}",
            "• ".cyan(),
            label(entry.sentiment),
            entry.count,
            summary.percentage(entry.sentiment),
            entry
                .mean_score
                .map(|s| format!("{:.2}", s))
                .unwrap_or_else(|| "-".to_string())
        );
    }
    if let Some(mean) = summary.mean_score {
        println!("{}Overall average score: {:.2}", "• ".cyan(), mean);
    }
    if let Some(dominant) = summary.dominant() {
        println!("{}Overall sentiment: {}", "• ".cyan(), label(dominant));
    }
}
