use crate::context::RunContext;
use crate::error::RebrandError;
use crate::interrupt;
use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

const CONTEXT: &str = "Content Replace";

/// Totals for one replacement batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    /// Files that received at least one replacement
    pub files: usize,
    pub replacements: usize,
}

/// Eligible files whose content contains `pattern` (case-sensitive).
///
/// Content is decoded lossily here, so a file that only turns out not to be
/// UTF-8 past the sniffed prefix is still selected and its failure is
/// reported by [`replace_in_file`].
pub fn find_files(ctx: &RunContext, pattern: &str) -> Result<Vec<PathBuf>, RebrandError> {
    let classifier = ctx.classifier();
    let mut matches = Vec::new();

    for path in classifier.walk_files()? {
        if !classifier.is_eligible(&path) {
            continue;
        }

        match fs::read(&path) {
            Ok(bytes) if String::from_utf8_lossy(&bytes).contains(pattern) => matches.push(path),
            Ok(_) => {},
            Err(err) => debug!("Skipping {}: {}", path.display(), err),
        }
    }

    Ok(matches)
}

/// Replace every non-overlapping occurrence of `old` with `new` in one file
/// and return the number of occurrences. In dry-run mode nothing is written.
/// Failures are recorded against the run and count as zero.
pub fn replace_in_file(ctx: &mut RunContext, path: &Path, old: &str, new: &str) -> usize {
    match rewrite(path, old, new, ctx.is_dry_run()) {
        Ok(count) => count,
        Err(err) => {
            let message = format!("Failed to process {}: {err:#}", ctx.display(path));
            ctx.log_error(CONTEXT, &message);
            0
        },
    }
}

fn rewrite(path: &Path, old: &str, new: &str, dry_run: bool) -> Result<usize> {
    if old.is_empty() {
        return Ok(0);
    }

    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let count = content.matches(old).count();
    if count == 0 || dry_run {
        return Ok(count);
    }

    write_atomically(path, &content.replace(old, new))?;
    Ok(count)
}

/// Write through a temporary file in the same directory, keeping the
/// original permissions, then move it over the target.
fn write_atomically(path: &Path, content: &str) -> Result<()> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    let permissions = fs::metadata(path)?.permissions();

    let mut temp = tempfile::NamedTempFile::new_in(parent)
        .with_context(|| format!("Failed to create temp file next to {}", path.display()))?;
    temp.write_all(content.as_bytes())?;
    temp.as_file().sync_all()?;
    fs::set_permissions(temp.path(), permissions)?;

    temp.persist(path)
        .map_err(|e| e.error)
        .with_context(|| format!("Failed to atomically replace {}", path.display()))?;

    #[cfg(unix)]
    {
        let dir = File::open(parent)?;
        dir.sync_all()?;
    }

    Ok(())
}

/// Replace `old` with `new` across every eligible file that contains it.
pub fn batch_replace(
    ctx: &mut RunContext,
    old: &str,
    new: &str,
    description: &str,
) -> Result<BatchOutcome, RebrandError> {
    interrupt::checkpoint()?;
    ctx.console()
        .step(&format!("{description}: '{old}' → '{new}'"));

    let files = find_files(ctx, old)?;
    if files.is_empty() {
        ctx.console().detail("No files found containing this pattern");
        return Ok(BatchOutcome::default());
    }
    ctx.console()
        .detail(&format!("Found {} file(s) to update", files.len()));

    let mut outcome = BatchOutcome::default();
    for file in &files {
        interrupt::checkpoint()?;

        let count = replace_in_file(ctx, file, old, new);
        if count == 0 {
            continue;
        }
        outcome.files += 1;
        outcome.replacements += count;

        if ctx.console().is_verbose() {
            let line = if ctx.is_dry_run() {
                format!(
                    "    [DRY RUN] Would update: {} ({count} replacement(s))",
                    ctx.display(file)
                )
            } else {
                format!("    - {} ({count} replacement(s))", ctx.display(file))
            };
            ctx.console().line(&line);
        }
    }

    ctx.stats.files_modified += outcome.files;
    ctx.stats.replacements_made += outcome.replacements;
    debug!(
        pattern = old,
        files = outcome.files,
        replacements = outcome.replacements,
        "batch complete"
    );

    Ok(outcome)
}
