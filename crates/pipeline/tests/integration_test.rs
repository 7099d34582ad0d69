//! Integration tests for the pipeline.
//!
//! These tests load a vocabulary from disk the way the binary does and run
//! parsed review records through the batch encoder.

use pipeline::{BatchEncoder, TextEncoder};
use review_data::{ReviewRecord, ReviewText, SchemaError, Vocabulary, PAD_ID, START_ID, UNKNOWN_ID};
use std::fs;
use std::sync::Arc;

fn create_test_vocabulary() -> Arc<Vocabulary> {
    let path = std::env::temp_dir().join(format!("pipeline-vocab-{}.json", std::process::id()));
    fs::write(
        &path,
        r#"{"the": 1, "and": 2, "a": 3, "movie": 17, "great": 84, "best": 115, "boring": 354}"#,
    )
    .unwrap();
    let vocabulary = Vocabulary::load_from_file(&path).unwrap();
    fs::remove_file(&path).ok();
    Arc::new(vocabulary)
}

fn create_test_reviews() -> Vec<ReviewRecord> {
    vec![
        ReviewRecord::new(
            Some("The best".to_string()),
            "A great movie".to_string(),
            Some("10".to_string()),
        ),
        ReviewRecord::new(Some("Dull".to_string()), "Boring".to_string(), None),
        ReviewRecord::new(
            Some("Meh".to_string()),
            "the the the the the the the the the the".to_string(),
            Some("5".to_string()),
        ),
    ]
}

#[test]
fn test_encode_the_best() {
    let vocabulary = create_test_vocabulary();
    let encoder = TextEncoder::new(vocabulary.clone());

    // base ids shifted by three
    assert_eq!(encoder.encode("The Best"), vec![START_ID, 4, 118]);
    assert_eq!(encoder.encode("The Worst"), vec![START_ID, 4, UNKNOWN_ID]);
}

#[test]
fn test_records_to_padded_batch() {
    let vocabulary = create_test_vocabulary();
    let encoder = BatchEncoder::new(TextEncoder::new(vocabulary), 8);
    let reviews = create_test_reviews();

    let texts: Vec<ReviewText> = reviews.iter().map(|r| r.as_text()).collect();
    let batch = encoder.encode_batch(&texts).unwrap();

    assert_eq!(batch.batch_size(), 3);
    assert_eq!(batch.max_len(), 8);

    // "The best A great movie"
    assert_eq!(
        batch.row(0).unwrap(),
        &[PAD_ID, PAD_ID, START_ID, 4, 118, 6, 87, 20]
    );
    // "Dull Boring", "dull" is not in the vocabulary
    assert_eq!(
        batch.row(1).unwrap(),
        &[PAD_ID, PAD_ID, PAD_ID, PAD_ID, PAD_ID, START_ID, UNKNOWN_ID, 357]
    );
    // 12 ids truncated to the last 8
    assert_eq!(batch.row(2).unwrap(), &[4; 8]);
}

#[test]
fn test_large_batch_preserves_order() {
    let vocabulary = create_test_vocabulary();
    let encoder = BatchEncoder::new(TextEncoder::new(vocabulary), 3);

    let contents: Vec<String> = (0..500)
        .map(|i| if i % 2 == 0 { "great".to_string() } else { "boring".to_string() })
        .collect();
    let texts: Vec<ReviewText> = contents.iter().map(|c| ReviewText::new("", c)).collect();

    let batch = encoder.encode_batch(&texts).unwrap();

    assert_eq!(batch.batch_size(), 500);
    for (i, row) in batch.rows().enumerate() {
        let expected = if i % 2 == 0 { 87 } else { 357 };
        assert_eq!(row, &[PAD_ID, START_ID, expected], "row {}", i);
    }
}

#[test]
fn test_empty_batch_encodes_to_nothing() {
    let vocabulary = create_test_vocabulary();
    let encoder = BatchEncoder::new(TextEncoder::new(vocabulary), 200);

    let batch = encoder.encode_batch(&[]).unwrap();
    assert!(batch.is_empty());
}

#[test]
fn test_untitled_record_fails_the_batch() {
    let vocabulary = create_test_vocabulary();
    let encoder = BatchEncoder::new(TextEncoder::new(vocabulary), 8);
    let reviews = vec![
        ReviewRecord::new(Some("The best".to_string()), "A great movie".to_string(), None),
        ReviewRecord::new(None, "Boring".to_string(), None),
    ];

    let texts: Vec<ReviewText> = reviews.iter().map(|r| r.as_text()).collect();
    let err = encoder.encode_batch(&texts).unwrap_err();

    assert_eq!(err, SchemaError { index: 1, field: "title" });
}
