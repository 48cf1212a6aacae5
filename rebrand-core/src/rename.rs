use crate::classifier::FileClassifier;
use crate::context::RunContext;
use crate::error::RebrandError;
use crate::interrupt;
use crate::transaction::OperationKind;
use crate::vcs::VcsMover;
use regex::{NoExpand, Regex, RegexBuilder};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenameKind {
    File,
    Dir,
}

impl RenameKind {
    fn operation(self) -> OperationKind {
        match self {
            Self::File => OperationKind::RenameFile,
            Self::Dir => OperationKind::RenameDir,
        }
    }

    fn context(self) -> &'static str {
        match self {
            Self::File => "File Rename",
            Self::Dir => "Directory Rename",
        }
    }
}

/// A planned rename of one entry within its parent directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rename {
    pub path: PathBuf,
    pub new_path: PathBuf,
    pub kind: RenameKind,
}

/// Case-insensitive matcher for a name fragment. The replacement is
/// inserted literally, whatever the casing of the matched text.
#[derive(Debug, Clone)]
pub struct NameMatcher {
    regex: Regex,
    replacement: String,
}

impl NameMatcher {
    pub fn new(old: &str, new: &str) -> Result<Self, regex::Error> {
        let regex = RegexBuilder::new(&regex::escape(old))
            .case_insensitive(true)
            .build()?;
        Ok(Self {
            regex,
            replacement: new.to_string(),
        })
    }

    /// The substituted name, or None when the name does not match.
    pub fn substitute(&self, name: &str) -> Option<String> {
        if !self.regex.is_match(name) {
            return None;
        }
        Some(
            self.regex
                .replace_all(name, NoExpand(&self.replacement))
                .into_owned(),
        )
    }
}

/// Single-pass case-insensitive substitution of `old` in `name`.
pub fn substitute_name(name: &str, old: &str, new: &str) -> Option<String> {
    NameMatcher::new(old, new).ok()?.substitute(name)
}

fn plan(
    classifier: &FileClassifier,
    old: &str,
    new: &str,
    kind: RenameKind,
) -> Result<Vec<(usize, Rename)>, RebrandError> {
    let matcher = NameMatcher::new(old, new)
        .map_err(|e| RebrandError::Config(format!("invalid rename pattern '{old}': {e}")))?;

    let mut planned = Vec::new();
    for entry in classifier.walk_tree()? {
        let file_type = entry.file_type();
        let wanted = match kind {
            RenameKind::File => file_type.is_file(),
            RenameKind::Dir => file_type.is_dir(),
        };
        if !wanted {
            continue;
        }

        let Some(name) = entry.file_name().to_str() else {
            debug!("Skipping non UTF-8 name: {}", entry.path().display());
            continue;
        };
        let Some(new_name) = matcher.substitute(name) else {
            continue;
        };
        if new_name == name {
            continue;
        }

        let path = entry.path().to_path_buf();
        let new_path = path.with_file_name(&new_name);
        planned.push((
            entry.depth(),
            Rename {
                path,
                new_path,
                kind,
            },
        ));
    }

    Ok(planned)
}

/// Regular files whose name contains `old` in any casing, in walk order.
pub fn plan_file_renames(
    classifier: &FileClassifier,
    old: &str,
    new: &str,
) -> Result<Vec<Rename>, RebrandError> {
    Ok(plan(classifier, old, new, RenameKind::File)?
        .into_iter()
        .map(|(_, rename)| rename)
        .collect())
}

/// Directories whose name contains `old` in any casing, deepest first.
/// The tree is snapshotted before anything moves; entries of equal depth
/// keep walk order.
pub fn plan_dir_renames(
    classifier: &FileClassifier,
    old: &str,
    new: &str,
) -> Result<Vec<Rename>, RebrandError> {
    let mut planned = plan(classifier, old, new, RenameKind::Dir)?;
    planned.sort_by(|a, b| b.0.cmp(&a.0));
    Ok(planned.into_iter().map(|(_, rename)| rename).collect())
}

pub fn rename_files(
    ctx: &mut RunContext,
    old: &str,
    new: &str,
    description: &str,
) -> Result<(), RebrandError> {
    interrupt::checkpoint()?;
    ctx.console().step(description);

    let renames = plan_file_renames(ctx.classifier(), old, new)?;
    if renames.is_empty() {
        ctx.console()
            .detail(&format!("No files found with '{old}' in name"));
        return Ok(());
    }
    execute_renames(ctx, &renames)
}

pub fn rename_directories(
    ctx: &mut RunContext,
    old: &str,
    new: &str,
    description: &str,
) -> Result<(), RebrandError> {
    interrupt::checkpoint()?;
    ctx.console().step(description);

    let renames = plan_dir_renames(ctx.classifier(), old, new)?;
    if renames.is_empty() {
        ctx.console()
            .detail(&format!("No directories found with '{old}' in name"));
        return Ok(());
    }
    execute_renames(ctx, &renames)
}

/// Carry out planned renames, recording each attempt. A failed rename is
/// logged and the rest continue.
pub fn execute_renames(ctx: &mut RunContext, renames: &[Rename]) -> Result<(), RebrandError> {
    for rename in renames {
        interrupt::checkpoint()?;

        let message = format!(
            "Rename: {} → {}",
            ctx.display(&rename.path),
            ctx.display(&rename.new_path)
        );
        if ctx.is_dry_run() {
            ctx.console().detail(&format!("[DRY RUN] {message}"));
            continue;
        }
        ctx.console().detail(&message);

        let context = rename.kind.context();
        match move_entry(ctx.mover(), &rename.path, &rename.new_path) {
            Ok(moved_by_vcs) => {
                ctx.transactions.record(
                    rename.kind.operation(),
                    &rename.path,
                    &rename.new_path,
                    true,
                );
                match rename.kind {
                    RenameKind::File => ctx.stats.files_renamed += 1,
                    RenameKind::Dir => ctx.stats.dirs_renamed += 1,
                }

                if !moved_by_vcs && ctx.mover().is_some() {
                    let name = rename
                        .new_path
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_default();
                    ctx.log_warning(
                        context,
                        &format!("{name} renamed without git (history may be lost)"),
                    );
                }
            },
            Err(err) => {
                ctx.transactions.record(
                    rename.kind.operation(),
                    &rename.path,
                    &rename.new_path,
                    false,
                );
                let message = format!("Failed to rename {}: {err}", ctx.display(&rename.path));
                ctx.log_error(context, &message);
            },
        }
    }

    Ok(())
}

fn is_case_only(from: &Path, to: &Path) -> bool {
    from != to && from.to_string_lossy().to_lowercase() == to.to_string_lossy().to_lowercase()
}

/// Probe `dir` with a lower-case temp file and look for its upper-case twin.
/// The probe is removed again; a failed removal is logged.
fn is_case_insensitive_fs(dir: &Path) -> bool {
    let probe = match tempfile::Builder::new()
        .prefix(".rebrand_case_probe")
        .tempfile_in(dir)
    {
        Ok(probe) => probe,
        Err(err) => {
            debug!("Case probe in {} failed: {}", dir.display(), err);
            return false;
        },
    };

    let upper = probe
        .path()
        .file_name()
        .map(|name| dir.join(name.to_string_lossy().to_uppercase()));
    let insensitive = upper.is_some_and(|path| path.exists());

    let probe_path = probe.path().to_path_buf();
    if let Err(err) = probe.close() {
        warn!(
            "Failed to remove case probe {}: {}",
            probe_path.display(),
            err
        );
    }
    insensitive
}

/// Move one entry. Tries the version-control mover first and falls back to
/// a filesystem rename. Returns true when the mover did the work.
pub fn move_entry(
    mover: Option<&dyn VcsMover>,
    from: &Path,
    to: &Path,
) -> Result<bool, RebrandError> {
    let case_only = is_case_only(from, to);
    if to.exists() && !case_only {
        return Err(RebrandError::RenameConflict {
            source_path: from.to_path_buf(),
            target: to.to_path_buf(),
        });
    }

    if let Some(mover) = mover {
        match mover.mv(from, to) {
            Ok(()) => return Ok(true),
            Err(err) => debug!("{} move failed, falling back: {}", mover.name(), err),
        }
    }

    let parent = from.parent().unwrap_or_else(|| Path::new("."));
    if case_only && is_case_insensitive_fs(parent) {
        let temp = from.with_extension(format!("{}.rebrand.tmp", std::process::id()));
        debug!("Case-only rename, going through {}", temp.display());
        fs::rename(from, &temp).map_err(|e| RebrandError::io(from, e))?;
        fs::rename(&temp, to).map_err(|e| RebrandError::io(to, e))?;
    } else {
        fs::rename(from, to).map_err(|e| RebrandError::io(from, e))?;
    }

    Ok(false)
}
