use crate::cli::RunArgs;
use anyhow::{anyhow, Context, Result};
use nu_ansi_term::Color as AnsiColor;
use rebrand_core::{
    rebrand_operation, vcs, Config, Console, Exclusions, OutputFormatter, RebrandStats,
    RunContext, RunOptions,
};
use std::path::Path;
use std::process::Command;
use tracing::{debug, error};

pub fn handle_run(root: &Path, config: &Config, args: &RunArgs, use_color: bool) -> Result<i32> {
    if args.json && !(args.yes || args.dry_run) {
        return Err(anyhow!(
            "--json cannot answer the confirmation prompt; pass --yes or --dry-run"
        ));
    }

    let console = if args.json {
        Console::silent()
    } else {
        Console::new(use_color, args.verbose || config.defaults.verbose)
    };

    let mut options = RunOptions::from_config(config);
    options.dry_run = args.dry_run;
    options.use_git = options.use_git && !args.no_git;

    let mut ctx = RunContext::new(root, Exclusions::from_config(config), options, console);
    let mut report = rebrand_operation(&mut ctx, args.yes)?;

    if report.cancelled {
        if args.json {
            println!("{}", report.format_json());
        }
        return Ok(0);
    }

    if !console.is_silent() {
        println!();
        println!("{}", console.rule());
        println!("{}", console.paint(AnsiColor::Green, "Rebranding complete!"));
        println!("{}", console.rule());
        println!();
        print!("{}", report.format_summary());
    }

    if !args.dry_run {
        console.line("\nNext steps:");
        console.line("1. Review changes: git status");
        if args.verify {
            console.line("2. Running verification...");
            run_verification(root, use_color, &console, &mut report.stats);
        } else {
            console.line("2. Run verification: rebrand verify");
        }
        console.line("3. Test build: npm run build");
        console.line(
            "4. Commit changes: git commit -m 'Complete rebranding from qwen-code to foragen-cli'",
        );

        if args.stage {
            console.line("\n5. Staging changes...");
            stage_changes(root, &console, &mut report.stats);
        }
    }

    if args.json {
        println!("{}", report.format_json());
    }

    Ok(i32::from(report.stats.has_errors()))
}

/// Run `rebrand verify` as a child process and relay what it printed.
///
/// A failing verification is reported by the child itself; only a child
/// that could not be started counts as an error of this run.
fn run_verification(root: &Path, use_color: bool, console: &Console, stats: &mut RebrandStats) {
    let output = std::env::current_exe()
        .context("Failed to locate the rebrand executable")
        .and_then(|exe| {
            let mut command = Command::new(exe);
            command.arg("verify").arg("-C").arg(root);
            if !use_color {
                command.arg("--no-color");
            }
            command
                .output()
                .context("Failed to start the verification process")
        });

    match output {
        Ok(output) => {
            debug!(status = ?output.status, "verification finished");
            print!("{}", String::from_utf8_lossy(&output.stdout));
            if !output.status.success() {
                eprint!("{}", String::from_utf8_lossy(&output.stderr));
            }
        },
        Err(err) => {
            let message = format!("Failed to run verification: {err:#}");
            error!(context = "Verification", "{}", message);
            console.error(&message);
            stats.add_error("Verification", &message);
        },
    }
}

fn stage_changes(root: &Path, console: &Console, stats: &mut RebrandStats) {
    match vcs::stage_all(root) {
        Ok(()) => console.line(&console.paint(AnsiColor::Green, "All changes staged in git")),
        Err(err) => {
            let message = format!("Failed to stage changes: {err}");
            error!(context = "Git Stage", "{}", message);
            console.error(&message);
            stats.add_error("Git Stage", &message);
        },
    }
}
