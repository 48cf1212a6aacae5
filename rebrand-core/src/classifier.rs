//! Decides which paths take part in content scanning.
//!
//! A file is eligible when its name is not in the excluded file set, none of
//! its segments (relative to the tree root) is an excluded directory, and its
//! first 512 bytes decode as UTF-8. Unreadable files are simply ineligible.

use crate::config::Config;
use crate::error::RebrandError;
use std::collections::BTreeSet;
use std::ffi::OsStr;
use std::fs::File;
use std::io::Read;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Documentation/meta files, the tool's own scripts and its log file.
pub const EXCLUDED_FILES: &[&str] = &[
    "rebranding_notes.md",
    "CUSTOMIZATIONS.md",
    "FORAGEN_REBRANDING.md",
    "CHANGELOG.md",
    "README.gemini.md",
    "rebrand_to_foragen_cli.py",
    "verify_rebranding.py",
    ".rebrand-transaction.json",
];

/// Version-control metadata, dependency and build output directories.
pub const EXCLUDED_DIRS: &[&str] = &[".git", "node_modules", ".npm", "dist", "build", ".rebrand"];

/// Number of leading bytes that must decode for a file to count as text.
pub const SNIFF_LEN: u64 = 512;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exclusions {
    files: BTreeSet<String>,
    dirs: BTreeSet<String>,
}

impl Default for Exclusions {
    fn default() -> Self {
        Self {
            files: EXCLUDED_FILES.iter().map(ToString::to_string).collect(),
            dirs: EXCLUDED_DIRS.iter().map(ToString::to_string).collect(),
        }
    }
}

impl Exclusions {
    /// The fixed sets plus additional names. Extras never remove a fixed entry.
    pub fn with_extra(files: &[String], dirs: &[String]) -> Self {
        let mut exclusions = Self::default();
        exclusions.files.extend(files.iter().cloned());
        exclusions.dirs.extend(dirs.iter().cloned());
        exclusions
    }

    pub fn from_config(config: &Config) -> Self {
        let mut exclusions = Self::with_extra(&config.exclude.files, &config.exclude.dirs);
        exclusions
            .files
            .insert(config.defaults.transaction_log.clone());
        exclusions
    }

    pub fn excludes_file_name(&self, name: &OsStr) -> bool {
        name.to_str().is_some_and(|n| self.files.contains(n))
    }

    pub fn excludes_dir_name(&self, name: &OsStr) -> bool {
        name.to_str().is_some_and(|n| self.dirs.contains(n))
    }

    pub fn dir_names(&self) -> impl Iterator<Item = &str> {
        self.dirs.iter().map(String::as_str)
    }
}

/// Eligibility decisions for one tree root.
#[derive(Debug, Clone)]
pub struct FileClassifier {
    root: PathBuf,
    exclusions: Arc<Exclusions>,
}

impl FileClassifier {
    pub fn new(root: impl Into<PathBuf>, exclusions: Exclusions) -> Self {
        Self {
            root: root.into(),
            exclusions: Arc::new(exclusions),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn exclusions(&self) -> &Exclusions {
        &self.exclusions
    }

    /// Path relative to the root, or the path itself when it lies elsewhere.
    pub fn relative<'a>(&self, path: &'a Path) -> &'a Path {
        path.strip_prefix(&self.root).unwrap_or(path)
    }

    /// Name or segment exclusion only; does not touch the filesystem.
    pub fn is_excluded(&self, path: &Path) -> bool {
        if path
            .file_name()
            .is_some_and(|name| self.exclusions.excludes_file_name(name))
        {
            return true;
        }

        self.relative(path).components().any(|component| match component {
            Component::Normal(segment) => self.exclusions.excludes_dir_name(segment),
            _ => false,
        })
    }

    pub fn is_eligible(&self, path: &Path) -> bool {
        !self.is_excluded(path) && looks_like_text(path)
    }

    fn ensure_root(&self) -> Result<(), RebrandError> {
        if self.root.is_dir() {
            Ok(())
        } else {
            Err(RebrandError::Walk {
                root: self.root.clone(),
                message: "not a directory".to_string(),
            })
        }
    }

    /// Every regular file under the root, excluded directories pruned,
    /// in file-name order. Hidden files are included and ignore files are
    /// not consulted: the exclusion sets are the only filter.
    ///
    /// Symlinks are not followed and are never yielded, so a linked file is
    /// not rewritten and content outside the tree is never touched.
    pub fn walk_files(&self) -> Result<Vec<PathBuf>, RebrandError> {
        self.ensure_root()?;
        let walker = crate::configure_walker(&self.root, Arc::clone(&self.exclusions)).build();

        let mut files = Vec::new();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    debug!("Skipping unreadable entry: {}", err);
                    continue;
                },
            };

            if entry.file_type().is_some_and(|t| t.is_file()) {
                files.push(entry.into_path());
            }
        }
        Ok(files)
    }

    /// Files and directories under the root (the root itself excluded),
    /// excluded directories pruned, in file-name order.
    ///
    /// Symlinks are not followed. They are yielded as symlink entries, which
    /// neither file nor directory renames pick up.
    pub fn walk_tree(&self) -> Result<Vec<walkdir::DirEntry>, RebrandError> {
        self.ensure_root()?;
        let exclusions = Arc::clone(&self.exclusions);
        let entries = walkdir::WalkDir::new(&self.root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(move |entry| {
                entry.depth() == 0
                    || !(entry.file_type().is_dir()
                        && exclusions.excludes_dir_name(entry.file_name()))
            })
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(err) => {
                    debug!("Skipping unreadable entry: {}", err);
                    None
                },
            })
            .filter(|entry| entry.depth() > 0)
            .collect();
        Ok(entries)
    }
}

/// True when the first [`SNIFF_LEN`] bytes are valid UTF-8. A multi-byte
/// sequence cut short by the limit still counts as text.
pub fn looks_like_text(path: &Path) -> bool {
    let Ok(file) = File::open(path) else {
        return false;
    };

    let mut head = Vec::with_capacity(SNIFF_LEN as usize);
    if file.take(SNIFF_LEN).read_to_end(&mut head).is_err() {
        return false;
    }

    match std::str::from_utf8(&head) {
        Ok(_) => true,
        Err(err) => err.error_len().is_none(),
    }
}
