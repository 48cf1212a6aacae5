//! Drives the ordered phases of a run: the compound content flow, the
//! simple content flow, then file and directory renames.
//!
//! A phase that fails is recorded against its name and the next phase still
//! runs. An interrupt is the only error that stops the sequence.

use crate::context::RunContext;
use crate::error::RebrandError;
use crate::interrupt;
use crate::patterns::{
    Flow, FLOWS, PREFLIGHT_PATTERNS, RENAME_PHASE_NAME, RENAME_PHASE_TITLE, RENAME_STEPS,
};
use crate::rename::{self, RenameKind};
use crate::replace;
use comfy_table::{Cell, Color, Table};
use serde::{Deserialize, Serialize};
use tracing::info;

/// One unit of the run
#[derive(Debug, Clone, Copy)]
pub enum Phase {
    Content(&'static Flow),
    Renames,
}

impl Phase {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Content(flow) => flow.name,
            Self::Renames => RENAME_PHASE_NAME,
        }
    }
}

/// The phases in execution order.
pub fn phases() -> Vec<Phase> {
    FLOWS
        .iter()
        .map(Phase::Content)
        .chain(std::iter::once(Phase::Renames))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseOutcome {
    pub name: String,
    pub completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Run every tier of a content flow in order.
pub fn run_flow(ctx: &mut RunContext, flow: &Flow) -> Result<(), RebrandError> {
    ctx.console().banner(flow.title);

    for tier in flow.tiers {
        interrupt::checkpoint()?;
        ctx.console().step(tier.name);
        for entry in tier.entries {
            replace::batch_replace(ctx, entry.old, entry.new, entry.description)?;
        }
    }

    Ok(())
}

/// Run the four rename steps: files then directories, compound then simple.
pub fn run_renames(ctx: &mut RunContext) -> Result<(), RebrandError> {
    ctx.console().banner(RENAME_PHASE_TITLE);

    for step in RENAME_STEPS {
        match step.kind {
            RenameKind::File => rename::rename_files(ctx, step.old, step.new, step.description)?,
            RenameKind::Dir => {
                rename::rename_directories(ctx, step.old, step.new, step.description)?;
            },
        }
    }

    Ok(())
}

pub fn run_phases(ctx: &mut RunContext) -> Result<Vec<PhaseOutcome>, RebrandError> {
    let mut outcomes = Vec::new();

    for phase in phases() {
        interrupt::checkpoint()?;
        info!(phase = phase.name(), "starting phase");

        let result = match phase {
            Phase::Content(flow) => run_flow(ctx, flow),
            Phase::Renames => run_renames(ctx),
        };

        match result {
            Ok(()) => outcomes.push(PhaseOutcome {
                name: phase.name().to_string(),
                completed: true,
                error: None,
            }),
            Err(err) if err.is_interrupt() => return Err(err),
            Err(err) => {
                let message = format!("{} failed: {err}", phase.name());
                ctx.log_error(phase.name(), &message);
                outcomes.push(PhaseOutcome {
                    name: phase.name().to_string(),
                    completed: false,
                    error: Some(err.to_string()),
                });
            },
        }
    }

    Ok(outcomes)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternCount {
    pub pattern: String,
    pub files: usize,
}

/// How many eligible files contain each legacy form before anything changes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preflight {
    pub counts: Vec<PatternCount>,
    pub total: usize,
}

impl Preflight {
    /// Nothing left to rebrand
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    pub fn render_table(&self, use_color: bool) -> String {
        let mut table = Table::new();
        if use_color {
            table.enforce_styling();
            table.set_header(vec![
                Cell::new("Pattern").fg(Color::Cyan),
                Cell::new("Files").fg(Color::Cyan),
            ]);
        } else {
            table.set_header(vec!["Pattern", "Files"]);
        }

        for count in &self.counts {
            table.add_row(vec![format!("'{}'", count.pattern), count.files.to_string()]);
        }
        table.add_row(vec!["Total".to_string(), self.total.to_string()]);

        table.to_string()
    }
}

/// Count files containing each legacy form. A file matching several forms
/// is counted once per form.
pub fn preflight(ctx: &RunContext) -> Result<Preflight, RebrandError> {
    let mut counts = Vec::new();
    for pattern in PREFLIGHT_PATTERNS {
        interrupt::checkpoint()?;
        let files = replace::find_files(ctx, pattern)?.len();
        counts.push(PatternCount {
            pattern: (*pattern).to_string(),
            files,
        });
    }

    let total = counts.iter().map(|c| c.files).sum();
    Ok(Preflight { counts, total })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::Exclusions;
    use crate::console::Console;
    use crate::context::RunOptions;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn context(root: &Path) -> RunContext {
        let options = RunOptions {
            use_git: false,
            ..RunOptions::default()
        };
        RunContext::new(root, Exclusions::default(), options, Console::silent())
    }

    #[test]
    fn test_phase_order() {
        let names: Vec<_> = phases().iter().map(Phase::name).collect();
        assert_eq!(
            names,
            vec![
                "Flow 1 (qwen-code → foragen-cli)",
                "Flow 2 (qwen → fora)",
                "Phase 3 (File renames)",
            ]
        );
    }

    #[test]
    fn test_preflight_counts_per_pattern() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(root.join("a.md"), "qwen-code and Qwen").unwrap();
        fs::write(root.join("b.md"), "QWEN_DIR").unwrap();
        fs::write(root.join("CHANGELOG.md"), "qwen").unwrap();

        let report = preflight(&context(root)).unwrap();
        let counts: Vec<_> = report.counts.iter().map(|c| c.files).collect();
        assert_eq!(counts, vec![1, 1, 1, 1]);
        assert_eq!(report.total, 4);
        assert!(!report.is_empty());

        let table = report.render_table(false);
        assert!(table.contains("'qwen-code'"));
        assert!(table.contains("Total"));
    }

    #[test]
    fn test_preflight_clean_tree_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("a.md"), "foragen-cli").unwrap();

        assert!(preflight(&context(temp_dir.path())).unwrap().is_empty());
    }

    #[test]
    fn test_failed_phases_are_recorded_and_sequence_continues() {
        let temp_dir = TempDir::new().unwrap();
        let mut ctx = context(&temp_dir.path().join("missing"));

        let outcomes = run_phases(&mut ctx).unwrap();
        assert_eq!(outcomes.len(), 3);
        assert!(outcomes.iter().all(|o| !o.completed));
        assert_eq!(ctx.stats.errors.len(), 3);
        assert!(ctx.stats.errors[0]
            .starts_with("Flow 1 (qwen-code → foragen-cli): Flow 1 (qwen-code → foragen-cli) failed"));
    }

    #[test]
    fn test_run_phases_rebrands_tree() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("packages/qwen-code/src")).unwrap();
        fs::write(
            root.join("packages/qwen-code/src/qwenClient.ts"),
            "import { QwenLogger } from '@qwen-code/qwen-code-core';\n",
        )
        .unwrap();

        let mut ctx = context(root);
        let outcomes = run_phases(&mut ctx).unwrap();

        assert!(outcomes.iter().all(|o| o.completed));
        let path = root.join("packages/foragen-cli/src/foraClient.ts");
        assert_eq!(
            fs::read_to_string(path).unwrap(),
            "import { ForaLogger } from '@jeffreysblake/foragen-cli-core';\n"
        );
        assert_eq!(ctx.stats.files_renamed, 1);
        assert_eq!(ctx.stats.dirs_renamed, 1);
    }
}
