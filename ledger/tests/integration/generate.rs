//! End-to-end runs against a real directory.

use std::fs;

use assert_matches::assert_matches;
use ledger::batch::{DirectorySink, SinkNames};
use ledger::error::Error;
use ledger::pipeline::{CancellationToken, GenerateParams, TagGenerator};

fn params(start_range: u64, end_range: u64, batch_size: u64) -> GenerateParams {
    GenerateParams {
        start_range,
        end_range,
        batch_size,
    }
}

#[test]
fn run_writes_batch_files_and_combined_file() {
    let dir = tempfile::tempdir().unwrap();
    let sink = DirectorySink::new(dir.path());
    let generator = TagGenerator::new(params(0, 9, 4), SinkNames::default()).unwrap();

    let summary = generator.run(&sink, &CancellationToken::new()).unwrap();

    assert!(summary.is_complete());
    assert_eq!(summary.batches, 3);
    assert_eq!(summary.merge.merged, 3);

    let read = |name: &str| fs::read_to_string(dir.path().join(name)).unwrap();
    assert_eq!(read("tags0.txt"), "2PP\n8GG\n9UU\n");
    assert_eq!(read("tags1.txt"), "Y98\nLQL\nQCJ\nR80\n");
    assert_eq!(read("tags2.txt"), "JLP\nCJG\n");
    assert_eq!(
        read("combined_output.txt"),
        "2PP\n8GG\n9UU\nY98\nLQL\nQCJ\nR80\nJLP\nCJG\n"
    );
}

#[test]
fn rerun_overwrites_previous_output() {
    let dir = tempfile::tempdir().unwrap();
    let sink = DirectorySink::new(dir.path());

    TagGenerator::new(params(1, 9, 9), SinkNames::default())
        .unwrap()
        .run(&sink, &CancellationToken::new())
        .unwrap();
    TagGenerator::new(params(1, 2, 9), SinkNames::default())
        .unwrap()
        .run(&sink, &CancellationToken::new())
        .unwrap();

    let combined = fs::read_to_string(dir.path().join("combined_output.txt")).unwrap();
    assert_eq!(combined, "2PP\n8GG\n");
}

#[test]
fn output_directory_is_created() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("a").join("b");
    let sink = DirectorySink::new(&nested);

    TagGenerator::new(params(1, 3, 2), SinkNames::new("batch", "all.txt"))
        .unwrap()
        .run(&sink, &CancellationToken::new())
        .unwrap();

    assert!(nested.join("batch0.txt").exists());
    assert!(nested.join("batch1.txt").exists());
    assert!(nested.join("all.txt").exists());
}

#[test]
fn invalid_parameters_fail_before_any_file_is_written() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out");

    assert_matches!(
        TagGenerator::new(params(0, 9, 0), SinkNames::default()),
        Err(Error::InvalidBatchSize(0))
    );
    assert_matches!(
        TagGenerator::new(params(10, 0, 4), SinkNames::default()),
        Err(Error::InvalidRange { start: 10, end: 0 })
    );
    assert!(!out.exists());
}

#[test]
fn combined_name_matching_a_batch_is_rejected_before_writing() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out");

    assert_matches!(
        TagGenerator::new(params(0, 9, 4), SinkNames::new("tags", "tags0.txt")),
        Err(Error::CombinedNameCollision { name }) if name == "tags0.txt"
    );
    assert!(!out.exists());

    // A name past the last batch can't collide, and batch 0 keeps its tags.
    let sink = DirectorySink::new(&out);
    let summary = TagGenerator::new(params(0, 9, 4), SinkNames::new("tags", "tags3.txt"))
        .unwrap()
        .run(&sink, &CancellationToken::new())
        .unwrap();

    assert!(summary.is_complete());
    assert_eq!(fs::read_to_string(out.join("tags0.txt")).unwrap(), "2PP\n8GG\n9UU\n");
    assert_eq!(
        fs::read_to_string(out.join("tags3.txt")).unwrap(),
        "2PP\n8GG\n9UU\nY98\nLQL\nQCJ\nR80\nJLP\nCJG\n"
    );
}
