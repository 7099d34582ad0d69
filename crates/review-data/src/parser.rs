//! Parser for review listing pages.
//!
//! The listing page renders one card per review. Each card is located by a
//! fixed CSS class signature, and three fields are read from inside it:
//!
//! | field   | element | class                                           |
//! |---------|---------|-------------------------------------------------|
//! | card    | `div`   | `ipc-list-card__content`                        |
//! | rating  | `span`  | `ipc-rating-star--rating`                       |
//! | title   | `h3`    | `ipc-title__text ipc-title__text--reduced`      |
//! | content | `div`   | `ipc-html-content-inner-div`                    |
//!
//! These class names are the site's markup, not ours. When the site changes
//! them the parser quietly finds fewer (or zero) reviews rather than failing.

use crate::error::{DataError, Result};
use crate::types::ReviewRecord;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

/// CSS selectors for one review card and its fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewSelectors {
    pub container: String,
    pub rating: String,
    pub title: String,
    pub content: String,
}

impl Default for ReviewSelectors {
    fn default() -> Self {
        Self {
            container: "div.ipc-list-card__content".to_string(),
            rating: "span.ipc-rating-star--rating".to_string(),
            title: "h3.ipc-title__text.ipc-title__text--reduced".to_string(),
            content: "div.ipc-html-content-inner-div".to_string(),
        }
    }
}

/// Compiled selectors, reusable across pages
#[derive(Debug, Clone)]
pub struct ReviewPageParser {
    container: Selector,
    rating: Selector,
    title: Selector,
    content: Selector,
}

impl ReviewPageParser {
    /// Compile a parser for the given selectors
    pub fn new(selectors: &ReviewSelectors) -> Result<Self> {
        Ok(Self {
            container: compile(&selectors.container)?,
            rating: compile(&selectors.rating)?,
            title: compile(&selectors.title)?,
            content: compile(&selectors.content)?,
        })
    }

    /// Parser for the review site's current markup
    pub fn with_defaults() -> Result<Self> {
        Self::new(&ReviewSelectors::default())
    }

    /// Extract review records from a listing page, in document order.
    ///
    /// A card missing its rating or title yields `None` for that field.
    /// A card whose content is missing or blank is dropped entirely.
    pub fn parse(&self, html: &str) -> Vec<ReviewRecord> {
        let document = Html::parse_document(html);
        let mut reviews = Vec::new();
        let mut cards = 0usize;

        for card in document.select(&self.container) {
            cards += 1;
            let Some(content) = first_text(&card, &self.content) else {
                debug!("Skipping review card {} without content", cards);
                continue;
            };

            reviews.push(ReviewRecord::new(
                first_text(&card, &self.title),
                content,
                first_text(&card, &self.rating),
            ));
        }

        debug!(
            "Parsed {} reviews from {} review cards",
            reviews.len(),
            cards
        );
        reviews
    }
}

fn compile(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| DataError::InvalidSelector {
        selector: selector.to_string(),
        reason: e.to_string(),
    })
}

/// Text of the first descendant matching `selector`, or `None` when there is
/// no such element or it holds only whitespace
fn first_text(card: &ElementRef<'_>, selector: &Selector) -> Option<String> {
    let element = card.select(selector).next()?;
    let text = collapse_whitespace(element.text());
    if text.is_empty() { None } else { Some(text) }
}

/// Join text nodes with single spaces and trim.
///
/// Text nodes are joined with a separator so words split by `<br>` tags do
/// not run together.
fn collapse_whitespace<'a>(pieces: impl Iterator<Item = &'a str>) -> String {
    let mut buf = String::new();
    for word in pieces.flat_map(str::split_whitespace) {
        if !buf.is_empty() {
            buf.push(' ');
        }
        buf.push_str(word);
    }
    buf
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(rating: Option<&str>, title: Option<&str>, content: Option<&str>) -> String {
        let mut html = String::from(r#"<div class="ipc-list-card__content">"#);
        if let Some(rating) = rating {
            html.push_str(&format!(
                r#"<span class="ipc-rating-star ipc-rating-star--rating">{rating}</span>"#
            ));
        }
        if let Some(title) = title {
            html.push_str(&format!(
                r#"<h3 class="ipc-title__text ipc-title__text--reduced">{title}</h3>"#
            ));
        }
        if let Some(content) = content {
            html.push_str(&format!(
                r#"<div class="ipc-html-content ipc-html-content--base"><div class="ipc-html-content-inner-div" role="presentation">{content}</div></div>"#
            ));
        }
        html.push_str("</div>");
        html
    }

    fn page(cards: &[String]) -> String {
        format!("<html><body><section>{}</section></body></html>", cards.concat())
    }

    #[test]
    fn test_parse_full_cards_in_document_order() {
        let parser = ReviewPageParser::with_defaults().unwrap();
        let html = page(&[
            card(Some("9"), Some("A masterpiece"), Some("Loved every minute.")),
            card(Some("3"), Some("Overrated"), Some("Too long and too loud.")),
        ]);

        let reviews = parser.parse(&html);
        assert_eq!(reviews.len(), 2);
        assert_eq!(reviews[0].title.as_deref(), Some("A masterpiece"));
        assert_eq!(reviews[0].rating.as_deref(), Some("9"));
        assert_eq!(reviews[0].content, "Loved every minute.");
        assert_eq!(reviews[1].title.as_deref(), Some("Overrated"));
        assert!(!reviews[1].is_scored());
    }

    #[test]
    fn test_missing_rating_and_title_are_none() {
        let parser = ReviewPageParser::with_defaults().unwrap();
        let html = page(&[card(None, None, Some("Body only."))]);

        let reviews = parser.parse(&html);
        assert_eq!(reviews.len(), 1);
        assert_eq!(reviews[0].rating, None);
        assert_eq!(reviews[0].title, None);
    }

    #[test]
    fn test_cards_without_content_are_dropped() {
        let parser = ReviewPageParser::with_defaults().unwrap();
        let html = page(&[
            card(Some("7"), Some("No body"), None),
            card(Some("8"), Some("Blank body"), Some("   ")),
            card(Some("6"), Some("Kept"), Some("Fine.")),
        ]);

        let reviews = parser.parse(&html);
        assert_eq!(reviews.len(), 1);
        assert_eq!(reviews[0].title.as_deref(), Some("Kept"));
    }

    #[test]
    fn test_line_breaks_do_not_merge_words() {
        let parser = ReviewPageParser::with_defaults().unwrap();
        let html = page(&[card(None, Some("T"), Some("first line<br/>second   line\n"))]);

        let reviews = parser.parse(&html);
        assert_eq!(reviews[0].content, "first line second line");
    }

    #[test]
    fn test_unrelated_markup_yields_nothing() {
        let parser = ReviewPageParser::with_defaults().unwrap();
        assert!(parser.parse("<html><body><p>Access denied</p></body></html>").is_empty());
        assert!(parser.parse("").is_empty());
    }

    #[test]
    fn test_invalid_selector_is_reported() {
        let selectors = ReviewSelectors {
            container: "div..broken".to_string(),
            ..ReviewSelectors::default()
        };
        let err = ReviewPageParser::new(&selectors).unwrap_err();
        assert!(matches!(err, DataError::InvalidSelector { .. }));
    }
}
