//! Batch conversion pipeline.
//!
//! Walks the source directory, resolves each filename to a book code,
//! converts the document to plain text, segments it, and writes one JSON
//! file per book. A failure in one document is logged and the batch moves
//! on; only a missing input directory or a strict-mode mapping miss aborts
//! the run.

use crate::books;
use crate::config::BatchConfig;
use crate::convert::MarkupConverter;
use crate::segmenter::{BookText, Segmenter};
use anyhow::{Context, Result, anyhow};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Outcome counts for one batch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub processed: usize,
    pub skipped_existing: usize,
    pub skipped_unmapped: usize,
    pub failed: usize,
}

/// Convert every source document under the configured input directory.
pub fn run_batch<C: MarkupConverter>(config: &BatchConfig, converter: &C) -> Result<BatchSummary> {
    let input_dir = Path::new(&config.input.dir);
    if !input_dir.is_dir() {
        return Err(anyhow!("input directory not found: {}", input_dir.display()));
    }
    let output_dir = Path::new(&config.output.dir);
    fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create output directory {}", output_dir.display()))?;

    let segmenter = Segmenter::new(
        &config.segmenter.sanitized_keywords(),
        config.segmenter.continuation_lines,
    );
    let sources = collect_sources(input_dir, &config.input.extension)?;
    info!(
        dir = %input_dir.display(),
        count = sources.len(),
        "Found source documents"
    );

    let mut summary = BatchSummary::default();
    for path in sources {
        let Some(file_name) = path.file_name().and_then(|name| name.to_str()) else {
            warn!(path = %path.display(), "Skipping source with a non-UTF-8 name");
            summary.skipped_unmapped += 1;
            continue;
        };

        let Some(code) = books::lookup(file_name) else {
            if config.books.strict {
                return Err(anyhow!("no book code mapped for {file_name}"));
            }
            warn!(file = file_name, "No book code mapped; skipping");
            summary.skipped_unmapped += 1;
            continue;
        };

        let out_path = output_dir.join(format!("{code}.json"));
        if !config.output.overwrite && out_path.exists() {
            info!(
                file = file_name,
                output = %out_path.display(),
                "Output already exists; skipping"
            );
            summary.skipped_existing += 1;
            continue;
        }

        info!(file = file_name, code, "Processing source document");
        match process_document(&path, &out_path, &segmenter, converter) {
            Ok(book) => {
                summary.processed += 1;
                info!(
                    file = file_name,
                    chapters = book.chapter_count(),
                    verses = book.verse_count(),
                    output = %out_path.display(),
                    "Wrote book JSON"
                );
            }
            Err(err) => {
                summary.failed += 1;
                warn!(file = file_name, "Failed to process document: {err:#}");
            }
        }
    }

    Ok(summary)
}

/// Source files with the configured extension, sorted by name so runs are
/// deterministic regardless of directory order.
fn collect_sources(input_dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let wanted = extension.trim().trim_start_matches('.').to_ascii_lowercase();
    let entries = fs::read_dir(input_dir)
        .with_context(|| format!("failed to read input directory {}", input_dir.display()))?;

    let mut sources = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let matches = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase() == wanted)
            .unwrap_or(false);
        if matches {
            sources.push(path);
        }
    }
    sources.sort();
    Ok(sources)
}

fn process_document<C: MarkupConverter>(
    source: &Path,
    out_path: &Path,
    segmenter: &Segmenter,
    converter: &C,
) -> Result<BookText> {
    let raw =
        fs::read(source).with_context(|| format!("failed to read {}", source.display()))?;
    let text = converter
        .to_plain_text(&raw)
        .with_context(|| format!("failed to convert {}", source.display()))?;
    let book = segmenter.segment(&text);
    if book.is_empty() {
        warn!(path = %source.display(), "No chapters recognized in document");
    }

    let json = serde_json::to_string_pretty(&book).context("failed to serialize book JSON")?;
    fs::write(out_path, json)
        .with_context(|| format!("failed to write {}", out_path.display()))?;
    Ok(book)
}
