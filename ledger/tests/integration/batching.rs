//! Batching must not change the combined output.

use ledger::batch::{BatchMerger, MemorySink, OutputSink, RangeBatcher};
use ledger::tagpack::{MAX_TAG_LEN, TAG_ALPHABET};
use proptest::prelude::*;
use test_case::test_case;

/// Writes every batch of `[start, end]` and merges them, returning the
/// combined stream.
fn combined(start: u64, end: u64, batch_size: u64) -> String {
    let batcher = RangeBatcher::new(start, end, batch_size).unwrap();
    let sink = MemorySink::new();

    for batch in batcher.batches() {
        batcher.materialize(&batch, &sink).unwrap();
    }
    BatchMerger::default()
        .merge(batcher.batch_count(), &sink)
        .unwrap();

    sink.get_string("combined_output.txt").unwrap()
}

#[test]
fn small_range_is_split_into_three_batches() {
    let batcher = RangeBatcher::new(0, 9, 4).unwrap();
    let bounds: Vec<_> = batcher.batches().map(|b| (b.start, b.end)).collect();

    assert_eq!(bounds, vec![(0, 3), (4, 7), (8, 9)]);
    assert_eq!(combined(0, 9, 4), combined(0, 9, 10));
}

#[test]
fn combined_output_equals_concatenated_batches() {
    let batcher = RangeBatcher::new(0, 9, 4).unwrap();
    let sink = MemorySink::new();
    for batch in batcher.batches() {
        batcher.materialize(&batch, &sink).unwrap();
    }
    BatchMerger::default().merge(3, &sink).unwrap();

    let concatenated: Vec<u8> = (0..3)
        .flat_map(|i| sink.get(&format!("tags{i}.txt")).unwrap())
        .collect();
    assert_eq!(sink.get("combined_output.txt").unwrap(), concatenated);
}

#[test_case(80_707_200, 80_707_230, 7; "crossing the length cap")]
#[test_case(1, 1000, 33; "uneven batches")]
#[test_case(0, 0, 1; "only zero")]
fn every_line_is_a_well_formed_tag(start: u64, end: u64, batch_size: u64) {
    let output = combined(start, end, batch_size);

    for line in output.lines() {
        assert!(!line.is_empty());
        assert!(line.len() <= MAX_TAG_LEN);
        assert!(line.chars().all(|c| TAG_ALPHABET.contains(&c)));
    }
}

#[test]
fn nothing_is_opened_for_invalid_parameters() {
    let sink = MemorySink::new();

    assert!(RangeBatcher::new(0, 9, 0).is_err());
    assert!(RangeBatcher::new(9, 0, 4).is_err());
    assert!(sink.names().is_empty());
    assert!(sink.open("tags0.txt").is_err());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn batching_is_invisible_in_combined_output(
        start in 0..100_000u64,
        len in 0..500u64,
        batch_size in 1..600u64,
    ) {
        let end = start + len;
        prop_assert_eq!(combined(start, end, batch_size), combined(start, end, len + 1));
    }
}
