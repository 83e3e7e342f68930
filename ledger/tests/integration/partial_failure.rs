//! A batch that can't be written must not stop the other batches.

use assert_matches::assert_matches;
use ledger::batch::SinkNames;
use ledger::error::Error;
use ledger::pipeline::{CancellationToken, GenerateParams, TagGenerator};
use ledger::testing::FlakySink;

fn generator() -> TagGenerator {
    let params = GenerateParams {
        start_range: 0,
        end_range: 9,
        batch_size: 4,
    };
    TagGenerator::new(params, SinkNames::default()).unwrap()
}

#[test]
fn failed_batch_is_reported_and_others_continue() {
    let sink = FlakySink::new().fail_create("tags1.txt");

    let summary = generator().run(&sink, &CancellationToken::new()).unwrap();

    assert!(!summary.is_complete());
    assert_eq!(summary.failures.len(), 1);
    assert_eq!(summary.failures[0].index, 1);
    assert_matches!(summary.failures[0].error, Error::SinkUnavailable { .. });

    // Batches 0 and 2 are still written and merged.
    assert_eq!(summary.merge.merged, 2);
    assert_eq!(
        sink.inner.get_string("combined_output.txt").unwrap(),
        "2PP\n8GG\n9UU\nJLP\nCJG\n"
    );
}

#[test]
fn unreadable_batch_is_merged_as_empty() {
    let sink = FlakySink::new().fail_open("tags0.txt");

    let summary = generator().run(&sink, &CancellationToken::new()).unwrap();

    assert!(summary.failures.is_empty());
    assert_eq!(summary.merge.missing, vec![0]);
    assert!(!summary.is_complete());
    assert_eq!(
        sink.inner.get_string("combined_output.txt").unwrap(),
        "Y98\nLQL\nQCJ\nR80\nJLP\nCJG\n"
    );
}

#[test]
fn combined_stream_failure_is_an_error() {
    let sink = FlakySink::new().fail_create("combined_output.txt");

    assert_matches!(
        generator().run(&sink, &CancellationToken::new()),
        Err(Error::SinkUnavailable { name, .. }) if name == "combined_output.txt"
    );
    assert!(sink.inner.get("tags2.txt").is_some());
}

#[test]
fn cancellation_stops_before_next_batch() {
    let sink = FlakySink::new();
    let cancel = CancellationToken::new();
    cancel.cancel();

    assert_matches!(
        generator().run(&sink, &cancel),
        Err(Error::Cancelled { completed: 0 })
    );
    assert!(sink.inner.names().is_empty());
}
