#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::option_if_let_else)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod classifier;
pub mod config;
pub mod console;
pub mod context;
pub mod error;
pub mod flow;
pub mod interrupt;
pub mod operations;
pub mod output;
pub mod patterns;
pub mod rename;
pub mod replace;
pub mod transaction;
pub mod vcs;
pub mod verify;

pub use classifier::{Exclusions, FileClassifier};
pub use config::Config;
pub use console::Console;
pub use context::{RebrandStats, RunContext, RunOptions};
pub use error::RebrandError;
pub use flow::{preflight, run_phases, PhaseOutcome, Preflight};
pub use operations::{rebrand_operation, verify_operation, RunReport};
pub use output::{format_verification_failure, OutputFormat, OutputFormatter};
pub use patterns::{apply_flows_to_text, check_ordering, Flow, PatternEntry, PatternTier, FLOWS};
pub use rename::{substitute_name, Rename, RenameKind};
pub use transaction::{OperationKind, TransactionLog, TransactionRecord};
pub use vcs::{GitMover, VcsMover};
pub use verify::{CheckDetail, MatchDetail, VerificationResults, Verifier};

use ignore::WalkBuilder;
use std::path::Path;
use std::sync::Arc;

/// Configure a `WalkBuilder` for content scanning.
///
/// Ignore files are not consulted and hidden entries are included: the
/// exclusion sets are the only filter. Excluded directories are pruned so
/// their contents are never visited, and entries are yielded in file-name
/// order so runs are deterministic.
pub fn configure_walker(root: &Path, exclusions: Arc<Exclusions>) -> WalkBuilder {
    let mut builder = WalkBuilder::new(root);
    builder
        .standard_filters(false)
        .hidden(false)
        .follow_links(false)
        .sort_by_file_name(|a, b| a.cmp(b))
        .filter_entry(move |entry| {
            entry.depth() == 0
                || !(entry.file_type().is_some_and(|t| t.is_dir())
                    && exclusions.excludes_dir_name(entry.file_name()))
        });
    builder
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_walker_ignores_gitignore_and_prunes_excluded_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(root.join(".gitignore"), "generated/\n").unwrap();
        fs::create_dir_all(root.join("generated")).unwrap();
        fs::create_dir_all(root.join("dist")).unwrap();
        fs::write(root.join("generated/qwen.ts"), "qwen").unwrap();
        fs::write(root.join("dist/qwen.js"), "qwen").unwrap();

        let files: Vec<_> = configure_walker(root, Arc::new(Exclusions::default()))
            .build()
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_some_and(|t| t.is_file()))
            .map(|e| e.path().strip_prefix(root).unwrap().to_path_buf())
            .collect();

        assert!(files.contains(&Path::new("generated/qwen.ts").to_path_buf()));
        assert!(files.contains(&Path::new(".gitignore").to_path_buf()));
        assert!(!files.iter().any(|p| p.starts_with("dist")));
    }
}
