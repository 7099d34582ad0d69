//! Fetch one movie's reviews and print a short listing.
//!
//! Run with: cargo run --package sources --example fetch_reviews -- tt0133093

use sources::ReviewFetcher;
use std::time::Instant;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let movie_id = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "tt0133093".to_string());

    println!("Fetching reviews for {}...\n", movie_id);
    let fetcher = ReviewFetcher::new()?;

    let start = Instant::now();
    let reviews = fetcher.fetch(&movie_id, false).await?;
    let elapsed = start.elapsed();

    println!("=== Fetch Complete ===");
    println!("Time taken: {:?}", elapsed);
    println!("Reviews: {}", reviews.len());

    for review in reviews.iter().take(5) {
        println!(
            "\n[{}] {}\n  {}",
            review.rating.as_deref().unwrap_or("-"),
            review.title.as_deref().unwrap_or("(untitled)"),
            review.content.chars().take(120).collect::<String>()
        );
    }
    Ok(())
}
