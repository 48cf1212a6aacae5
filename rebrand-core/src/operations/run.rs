use crate::context::{RebrandStats, RunContext};
use crate::flow::{self, PhaseOutcome, Preflight};
use crate::interrupt::ConfirmationPromptGuard;
use anyhow::{Context, Result};
use nu_ansi_term::Color as AnsiColor;
use serde::{Deserialize, Serialize};
use std::io::{self, Write as IoWrite};
use std::path::PathBuf;

/// Everything a finished (or cancelled) run produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    pub dry_run: bool,
    /// Stopped before any phase ran
    pub cancelled: bool,
    pub preflight: Preflight,
    pub phases: Vec<PhaseOutcome>,
    pub stats: RebrandStats,
    /// Where the transaction log was written, if it was
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_log: Option<PathBuf>,
}

impl RunReport {
    fn cancelled(ctx: &RunContext, preflight: Preflight) -> Self {
        Self {
            dry_run: ctx.is_dry_run(),
            cancelled: true,
            preflight,
            phases: Vec::new(),
            stats: ctx.stats.clone(),
            transaction_log: None,
        }
    }

    pub fn success(&self) -> bool {
        !self.stats.has_errors()
    }
}

/// Rebrand operation - pre-flight, confirmation, phases, transaction log
pub fn rebrand_operation(ctx: &mut RunContext, auto_approve: bool) -> Result<RunReport> {
    let console = *ctx.console();
    console.line(&console.paint(
        AnsiColor::Blue,
        "Starting rebranding: qwen-code → foragen-cli",
    ));
    if ctx.is_dry_run() {
        console.line(&console.paint(
            AnsiColor::Yellow,
            "DRY RUN MODE - No changes will be made",
        ));
    }

    console.blank();
    console.step("Pre-flight check");
    let preflight = flow::preflight(ctx).context("Pre-flight check failed")?;
    console.line(&preflight.render_table(console.use_color()));

    if preflight.is_empty() {
        console.line(&console.paint(AnsiColor::Yellow, "No files found to rebrand!"));
        console.line(&console.paint(AnsiColor::Yellow, "Rebranding cancelled."));
        return Ok(RunReport::cancelled(ctx, preflight));
    }

    if !ctx.is_dry_run() && !auto_approve {
        console.line(&console.paint(
            AnsiColor::Yellow,
            &format!("This will modify {} files in place.", preflight.total),
        ));
        let confirmed = {
            let _guard = ConfirmationPromptGuard::activate();
            get_user_confirmation()?
        };
        if !confirmed {
            console.line(&console.paint(AnsiColor::Yellow, "Rebranding cancelled."));
            return Ok(RunReport::cancelled(ctx, preflight));
        }
    }

    let phases = flow::run_phases(ctx)?;

    let mut transaction_log = None;
    if !ctx.is_dry_run() {
        match ctx.transactions.save() {
            Ok(()) => {
                transaction_log = Some(ctx.transactions.path().to_path_buf());
                console.line(&console.paint(
                    AnsiColor::Green,
                    &format!(
                        "Transaction log saved to: {}",
                        ctx.display(ctx.transactions.path())
                    ),
                ));
            },
            Err(err) => {
                ctx.log_warning("Transaction Log", &format!("{err:#}"));
            },
        }
    }

    Ok(RunReport {
        dry_run: ctx.is_dry_run(),
        cancelled: false,
        preflight,
        phases,
        stats: ctx.stats.clone(),
        transaction_log,
    })
}

fn get_user_confirmation() -> Result<bool> {
    print!("Proceed with rebranding? [y/N]: ");
    IoWrite::flush(&mut io::stdout()).context("Failed to flush stdout")?;

    let mut input = String::new();
    io::stdin()
        .read_line(&mut input)
        .context("Failed to read user input")?;
    let input = input.trim().to_lowercase();

    Ok(input == "y" || input == "yes")
}
