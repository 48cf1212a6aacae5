use anyhow::Context;
use clap::Parser;
use rebrand_core::{error, interrupt, Config};
use std::io::{self, IsTerminal};
use std::process;

mod cli;
mod run;
mod verify;

use cli::{Cli, Commands, LogLevel};

fn main() {
    // A second Ctrl-C while the prompt is blocking on stdin has nothing to wait for
    ctrlc::set_handler(|| {
        if interrupt::confirmation_prompt_active() {
            eprintln!("\nInterrupted by user");
            process::exit(130);
        }
        eprintln!("\nReceived SIGINT. Stopping after the current step...");
        interrupt::request_interrupt();
    })
    .expect("Error setting SIGINT handler");

    let cli = Cli::parse();
    init_tracing(cli.log_level);

    // Handle -C directory flag
    if let Some(ref dir) = cli.directory {
        std::env::set_current_dir(dir)
            .with_context(|| format!("Failed to change to directory: {}", dir.display()))
            .unwrap_or_else(|e| {
                eprintln!("Error: {e:#}");
                process::exit(2);
            });
    }

    let root = std::env::current_dir()
        .context("Failed to read the current directory")
        .unwrap_or_else(|e| {
            eprintln!("Error: {e:#}");
            process::exit(2);
        });

    let config = Config::load(&root).unwrap_or_else(|e| {
        eprintln!("Error: {e:#}");
        process::exit(2);
    });

    let use_color = !cli.no_color
        && config
            .defaults
            .use_color
            .unwrap_or_else(|| io::stdout().is_terminal());

    let result = match cli.command {
        Commands::Run(args) => run::handle_run(&root, &config, &args, use_color),
        Commands::Verify { json } => verify::handle_verify(&root, &config, json, use_color),
    };

    match result {
        Ok(_) if interrupt::is_interrupted() => {
            eprintln!("Operation interrupted");
            process::exit(130);
        },
        Ok(code) => process::exit(code),
        Err(e) if error::is_interrupt(&e) => {
            eprintln!("Operation interrupted");
            process::exit(130);
        },
        Err(e) => {
            eprintln!("Error: {e:#}");
            process::exit(1);
        },
    }
}

/// Initialize tracing subscriber.
fn init_tracing(level: LogLevel) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_tracing_level().to_string()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}
