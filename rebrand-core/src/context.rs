use crate::classifier::{Exclusions, FileClassifier};
use crate::config::Config;
use crate::console::Console;
use crate::transaction::TransactionLog;
use crate::vcs::{GitMover, VcsMover};
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use std::path::{Path, PathBuf};

/// Counters and messages accumulated over one run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RebrandStats {
    pub files_modified: usize,
    pub files_renamed: usize,
    pub dirs_renamed: usize,
    pub replacements_made: usize,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl RebrandStats {
    pub fn add_error(&mut self, context: &str, error: &str) {
        self.errors.push(format!("{context}: {error}"));
    }

    pub fn add_warning(&mut self, context: &str, warning: &str) {
        self.warnings.push(format!("{context}: {warning}"));
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn summary(&self) -> String {
        let mut output = String::new();
        writeln!(output, "Statistics:").unwrap();
        writeln!(output, "  Files modified: {}", self.files_modified).unwrap();
        writeln!(output, "  Files renamed: {}", self.files_renamed).unwrap();
        writeln!(output, "  Directories renamed: {}", self.dirs_renamed).unwrap();
        writeln!(output, "  Total replacements: {}", self.replacements_made).unwrap();
        if !self.warnings.is_empty() {
            writeln!(output, "  Warnings: {}", self.warnings.len()).unwrap();
        }
        if !self.errors.is_empty() {
            writeln!(output, "  Errors: {}", self.errors.len()).unwrap();
        }
        output
    }
}

/// Switches for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    /// Count and report, write nothing
    pub dry_run: bool,
    /// Try a version-control move before a plain rename
    pub use_git: bool,
    /// Transaction log location, relative to the root
    pub transaction_log: PathBuf,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            use_git: true,
            transaction_log: PathBuf::from(crate::config::DEFAULT_TRANSACTION_LOG),
        }
    }
}

impl RunOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            dry_run: false,
            use_git: config.defaults.use_git,
            transaction_log: PathBuf::from(&config.defaults.transaction_log),
        }
    }
}

/// Everything a phase needs: where to work, how to report, and the
/// run-wide state it accumulates into.
#[derive(Debug)]
pub struct RunContext {
    classifier: FileClassifier,
    options: RunOptions,
    console: Console,
    mover: Option<Box<dyn VcsMover>>,
    pub stats: RebrandStats,
    pub transactions: TransactionLog,
}

impl RunContext {
    pub fn new(
        root: impl Into<PathBuf>,
        exclusions: Exclusions,
        options: RunOptions,
        console: Console,
    ) -> Self {
        let root = root.into();
        let mover: Option<Box<dyn VcsMover>> = if options.use_git {
            Some(Box::new(GitMover::new(&root)))
        } else {
            None
        };
        let transactions = TransactionLog::new(root.join(&options.transaction_log));

        Self {
            classifier: FileClassifier::new(root, exclusions),
            options,
            console,
            mover,
            stats: RebrandStats::default(),
            transactions,
        }
    }

    /// Replace the version-control mover (None disables it).
    #[must_use]
    pub fn with_mover(mut self, mover: Option<Box<dyn VcsMover>>) -> Self {
        self.mover = mover;
        self
    }

    pub fn root(&self) -> &Path {
        self.classifier.root()
    }

    pub fn classifier(&self) -> &FileClassifier {
        &self.classifier
    }

    pub fn console(&self) -> &Console {
        &self.console
    }

    pub fn options(&self) -> &RunOptions {
        &self.options
    }

    pub fn is_dry_run(&self) -> bool {
        self.options.dry_run
    }

    pub fn mover(&self) -> Option<&dyn VcsMover> {
        self.mover.as_deref()
    }

    /// Root-relative display form of a path
    pub fn display(&self, path: &Path) -> String {
        self.classifier.relative(path).display().to_string()
    }

    pub fn log_error(&mut self, context: &str, message: &str) {
        tracing::error!(context, "{}", message);
        self.console.error(message);
        self.stats.add_error(context, message);
    }

    pub fn log_warning(&mut self, context: &str, message: &str) {
        tracing::warn!(context, "{}", message);
        self.console.warning(message);
        self.stats.add_warning(context, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_messages_carry_context() {
        let mut stats = RebrandStats::default();
        stats.add_error("File Rename", "Failed to rename a.ts");
        stats.add_warning("Directory Rename", "fora renamed without git");

        assert!(stats.has_errors());
        assert_eq!(stats.errors, vec!["File Rename: Failed to rename a.ts"]);
        assert_eq!(
            stats.warnings,
            vec!["Directory Rename: fora renamed without git"]
        );
    }

    #[test]
    fn test_summary_lists_counters() {
        let stats = RebrandStats {
            files_modified: 3,
            files_renamed: 1,
            dirs_renamed: 2,
            replacements_made: 9,
            errors: vec![],
            warnings: vec!["General: careful".to_string()],
        };

        let summary = stats.summary();
        assert!(summary.contains("Files modified: 3"));
        assert!(summary.contains("Files renamed: 1"));
        assert!(summary.contains("Directories renamed: 2"));
        assert!(summary.contains("Total replacements: 9"));
        assert!(summary.contains("Warnings: 1"));
        assert!(!summary.contains("Errors:"));
    }

    #[test]
    fn test_context_without_git_has_no_mover() {
        let options = RunOptions {
            use_git: false,
            ..RunOptions::default()
        };
        let ctx = RunContext::new("/tmp/tree", Exclusions::default(), options, Console::silent());

        assert!(ctx.mover().is_none());
        assert_eq!(
            ctx.transactions.path(),
            Path::new("/tmp/tree/.rebrand-transaction.json")
        );
        assert_eq!(ctx.display(Path::new("/tmp/tree/src/a.ts")), "src/a.ts");
    }

    #[test]
    fn test_log_error_records_stats() {
        let mut ctx = RunContext::new(
            "/tmp/tree",
            Exclusions::default(),
            RunOptions::default(),
            Console::silent(),
        );
        ctx.log_error("Content Replace", "Failed to process src/a.ts");
        ctx.log_warning("File Rename", "a.ts renamed without git (history may be lost)");

        assert_eq!(ctx.stats.errors.len(), 1);
        assert_eq!(ctx.stats.warnings.len(), 1);
    }
}
