use crate::operations::RunReport;
use crate::verify::VerificationResults;
use serde_json::json;
use std::fmt::Write;

/// Messages listed in a run summary before collapsing to "... and N more"
pub const SUMMARY_MESSAGE_LIMIT: usize = 10;

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Summary,
    Json,
}

/// Trait for formatting output in different formats
pub trait OutputFormatter {
    fn format(&self, format: OutputFormat) -> String {
        match format {
            OutputFormat::Json => self.format_json(),
            OutputFormat::Summary => self.format_summary(),
        }
    }
    fn format_json(&self) -> String;
    fn format_summary(&self) -> String;
}

fn write_messages(output: &mut String, title: &str, messages: &[String]) {
    if messages.is_empty() {
        return;
    }
    writeln!(output, "\n{} ({}):", title, messages.len()).unwrap();
    for message in messages.iter().take(SUMMARY_MESSAGE_LIMIT) {
        writeln!(output, "  - {}", message).unwrap();
    }
    if messages.len() > SUMMARY_MESSAGE_LIMIT {
        writeln!(
            output,
            "  ... and {} more",
            messages.len() - SUMMARY_MESSAGE_LIMIT
        )
        .unwrap();
    }
}

impl OutputFormatter for RunReport {
    fn format_json(&self) -> String {
        serde_json::to_string_pretty(&json!({
            "success": self.success(),
            "operation": "run",
            "dry_run": self.dry_run,
            "cancelled": self.cancelled,
            "preflight": self.preflight,
            "phases": self.phases,
            "summary": {
                "files_modified": self.stats.files_modified,
                "files_renamed": self.stats.files_renamed,
                "dirs_renamed": self.stats.dirs_renamed,
                "replacements_made": self.stats.replacements_made,
            },
            "errors": self.stats.errors,
            "warnings": self.stats.warnings,
            "transaction_log": self.transaction_log,
        }))
        .unwrap_or_default()
    }

    fn format_summary(&self) -> String {
        if self.cancelled {
            return "Rebranding cancelled.\n".to_string();
        }

        let mut output = self.stats.summary();
        write_messages(&mut output, "Warnings", &self.stats.warnings);
        write_messages(&mut output, "Errors", &self.stats.errors);

        if self.dry_run {
            writeln!(output, "\nThis was a DRY RUN - no changes were made").unwrap();
            writeln!(output, "Run without --dry-run to apply changes").unwrap();
        }
        output
    }
}

impl OutputFormatter for VerificationResults {
    fn format_json(&self) -> String {
        serde_json::to_string_pretty(&json!({
            "success": self.success(),
            "checks_passed": self.checks_passed,
            "errors": self.errors,
            "warnings": self.warnings,
            "error_details": self.error_details,
            "warning_details": self.warning_details,
        }))
        .unwrap_or_default()
    }

    fn format_summary(&self) -> String {
        let mut output = String::new();

        if self.errors == 0 && self.warnings == 0 {
            writeln!(output, "✓ Verification PASSED!").unwrap();
            writeln!(output, "All checks completed successfully.").unwrap();
            writeln!(output, "\nChecks passed: {}", self.checks_passed).unwrap();
        } else if self.errors == 0 {
            writeln!(output, "⚠ Verification completed with WARNINGS").unwrap();
            writeln!(output, "Checks passed: {}", self.checks_passed).unwrap();
            writeln!(output, "Warnings: {}\n", self.warnings).unwrap();
            writeln!(
                output,
                "These are typically references to upstream documentation."
            )
            .unwrap();
            writeln!(
                output,
                "Review the warnings above to ensure they are acceptable."
            )
            .unwrap();
        } else {
            writeln!(output, "✗ Verification FAILED!").unwrap();
            writeln!(output, "Checks passed: {}", self.checks_passed).unwrap();
            writeln!(output, "Errors: {}", self.errors).unwrap();
            if self.warnings > 0 {
                writeln!(output, "Warnings: {}", self.warnings).unwrap();
            }
            writeln!(output, "\nPlease fix the errors above before proceeding.").unwrap();
        }

        output
    }
}

/// JSON body printed when verification cannot complete
pub fn format_verification_failure(error: &str) -> String {
    serde_json::to_string_pretty(&json!({
        "success": false,
        "error": error,
        "checks_passed": 0,
        "errors": 1,
        "warnings": 0,
    }))
    .unwrap_or_default()
}
