// Integration tests for the transcript formatter pipeline
//
// These cover target-file selection bounds, output naming, and the
// formatted content written to disk.

use anyhow::Result;
use std::fs;
use tempfile::TempDir;
use voxscribe::error::FormatError;
use voxscribe::format::{formatted_path, run_format, select_target};

#[test]
fn empty_directory_reports_no_input_files() -> Result<()> {
    let dir = TempDir::new()?;

    let result = select_target(dir.path(), 0);

    assert!(
        matches!(result, Err(FormatError::NoInputFiles(_))),
        "expected NoInputFiles, got {result:?}"
    );
    Ok(())
}

#[test]
fn out_of_range_index_reports_count() -> Result<()> {
    let dir = TempDir::new()?;
    fs::write(dir.path().join("a.txt"), "one")?;
    fs::write(dir.path().join("b.txt"), "two")?;

    let result = select_target(dir.path(), 5);

    match result {
        Err(FormatError::IndexOutOfRange { index, count }) => {
            assert_eq!(index, 5);
            assert_eq!(count, 2);
        }
        other => panic!("expected IndexOutOfRange, got {other:?}"),
    }
    Ok(())
}

#[test]
fn selection_is_lexicographic_and_txt_only() -> Result<()> {
    let dir = TempDir::new()?;
    // Created out of order on purpose; selection must sort by name.
    fs::write(dir.path().join("zeta.txt"), "")?;
    fs::write(dir.path().join("alpha.txt"), "")?;
    fs::write(dir.path().join("notes.md"), "")?;

    let first = select_target(dir.path(), 0)?;
    let second = select_target(dir.path(), 1)?;

    assert_eq!(first.file_name().unwrap(), "alpha.txt");
    assert_eq!(second.file_name().unwrap(), "zeta.txt");
    assert!(
        matches!(
            select_target(dir.path(), 2),
            Err(FormatError::IndexOutOfRange { count: 2, .. })
        ),
        "non-txt files must not count"
    );
    Ok(())
}

#[test]
fn run_format_writes_sibling_and_keeps_source() -> Result<()> {
    let dir = TempDir::new()?;
    let source = dir.path().join("mic_20260828-101500.txt");
    fs::write(&source, "Hello. Hello. World.")?;

    let out = run_format(dir.path(), 0)?;

    assert_eq!(out, formatted_path(&source));
    assert_ne!(out, source, "must never overwrite the source");
    assert_eq!(fs::read_to_string(&out)?, "Hello.\n\nWorld.");
    assert_eq!(
        fs::read_to_string(&source)?,
        "Hello. Hello. World.",
        "source file must be untouched"
    );
    Ok(())
}

#[test]
fn run_format_output_is_stable_under_reformat() -> Result<()> {
    let dir = TempDir::new()?;
    fs::write(
        dir.path().join("session.txt"),
        "第一句话。 第一句话。 第二句话！ And   an English one.",
    )?;

    let out = run_format(dir.path(), 0)?;
    let formatted = fs::read_to_string(&out)?;

    assert_eq!(
        formatted,
        "第一句话。\n\n第二句话！\n\nAnd an English one."
    );
    assert_eq!(voxscribe::format_transcript(&formatted), formatted);
    Ok(())
}
