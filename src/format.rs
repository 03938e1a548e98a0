//! Transcript formatting: sentence segmentation and adjacent-duplicate removal
//!
//! Fully decoupled from the transcription pipelines; consumes whatever text
//! file either of them produced.

use crate::error::FormatError;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Characters treated as ending a sentence. Covers the CJK full-width marks
/// alongside the ASCII ones; no locale-aware rules beyond this set.
const TERMINAL_MARKS: [char; 7] = ['。', '！', '？', '；', '.', '!', '?'];

/// Normalize a raw transcript into blank-line-separated sentence units with
/// adjacent duplicates removed.
///
/// Idempotent: running the formatter on its own output changes nothing.
pub fn format_transcript(document: &str) -> String {
    // Newlines become spaces; runs of two or more whitespace characters
    // collapse to one space. A single interior tab or CR stays as-is.
    let replaced: String = document
        .chars()
        .map(|c| if c == '\n' { ' ' } else { c })
        .collect();

    let mut collapsed = String::with_capacity(replaced.len());
    let mut run: usize = 0;
    let mut last_ws = ' ';
    for ch in replaced.trim().chars() {
        if ch.is_whitespace() {
            run += 1;
            last_ws = ch;
        } else {
            match run {
                0 => {}
                1 => collapsed.push(last_ws),
                _ => collapsed.push(' '),
            }
            run = 0;
            collapsed.push(ch);
        }
    }

    // Break after every terminal mark; the mark itself is kept.
    let mut segmented = String::with_capacity(collapsed.len() + 16);
    for ch in collapsed.chars() {
        segmented.push(ch);
        if TERMINAL_MARKS.contains(&ch) {
            segmented.push('\n');
        }
    }

    // Keep each trimmed non-empty line unless it repeats the line kept
    // immediately before it. Non-adjacent repeats survive.
    let mut kept: Vec<&str> = Vec::new();
    for line in segmented.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if kept.last() == Some(&line) {
            continue;
        }
        kept.push(line);
    }

    kept.join("\n\n")
}

/// Pick the index-th `.txt` file (lexicographic order) from `dir`.
pub fn select_target(dir: &Path, index: usize) -> Result<PathBuf, FormatError> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().and_then(|e| e.to_str()) == Some("txt"))
        .collect();
    files.sort();

    if files.is_empty() {
        return Err(FormatError::NoInputFiles(dir.display().to_string()));
    }
    if index >= files.len() {
        return Err(FormatError::IndexOutOfRange {
            index,
            count: files.len(),
        });
    }

    Ok(files.swap_remove(index))
}

/// Output path next to the input: `<stem>_formatted.<ext>`. Never the
/// source path itself.
pub fn formatted_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("transcript");
    let ext = input
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("txt");
    input.with_file_name(format!("{stem}_formatted.{ext}"))
}

/// Select, format, and write: the whole formatter invocation.
pub fn run_format(dir: &Path, index: usize) -> Result<PathBuf> {
    let target = select_target(dir, index)?;
    info!("selected file: {}", target.display());

    let text = fs::read_to_string(&target)
        .with_context(|| format!("failed to read {}", target.display()))?;

    let formatted = format_transcript(&text);

    let out_path = formatted_path(&target);
    fs::write(&out_path, &formatted)
        .with_context(|| format!("failed to write {}", out_path.display()))?;

    info!("formatted transcript saved: {}", out_path.display());

    Ok(out_path)
}
