//! Parse a saved review listing page and print what was found.
//!
//! Run with: cargo run --package review-data --example parse_page -- page.html

use review_data::ReviewPageParser;
use std::time::Instant;

fn main() -> anyhow::Result<()> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "data/reviews.html".to_string());

    println!("Parsing review page {}...\n", path);
    let html = std::fs::read_to_string(&path)?;

    let start = Instant::now();
    let parser = ReviewPageParser::with_defaults()?;
    let reviews = parser.parse(&html);
    let elapsed = start.elapsed();

    println!("=== Parse Complete ===");
    println!("Time taken: {:?}", elapsed);
    println!("Reviews: {}", reviews.len());
    println!(
        "With title: {}, with rating: {}",
        reviews.iter().filter(|r| r.title.is_some()).count(),
        reviews.iter().filter(|r| r.rating.is_some()).count()
    );

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
