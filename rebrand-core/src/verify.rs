//! Post-run verification: a fixed checklist of pattern scans, manifest and
//! file-system checks. Every check adds exactly one pass, warning or error.

use crate::classifier::FileClassifier;
use crate::console::Console;
use crate::error::RebrandError;
use crate::interrupt;
use nu_ansi_term::Color as AnsiColor;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::debug;

/// Longest line excerpt kept in a match detail
pub const MAX_CONTENT_CHARS: usize = 80;

/// Matches printed per check in human mode
pub const MAX_DISPLAYED_MATCHES: usize = 20;

/// Markers that turn an error match into a warning (compared case-insensitively)
pub const UPSTREAM_MARKERS: &[&str] = &[
    "upstream",
    "original repository",
    "based on",
    "adapted from",
    "fork of",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatternCheck {
    pub pattern: &'static str,
    pub description: &'static str,
    /// Treat `pattern` as a regular expression instead of a literal
    pub is_regex: bool,
    pub severity: Severity,
    /// Lines containing one of these are downgraded to warnings
    pub acceptable_contexts: &'static [&'static str],
}

const fn error_pattern(pattern: &'static str, description: &'static str) -> Check {
    Check::Pattern(PatternCheck {
        pattern,
        description,
        is_regex: false,
        severity: Severity::Error,
        acceptable_contexts: &[],
    })
}

const fn warning_pattern(pattern: &'static str, description: &'static str) -> Check {
    Check::Pattern(PatternCheck {
        pattern,
        description,
        is_regex: false,
        severity: Severity::Warning,
        acceptable_contexts: &[],
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
    Pattern(PatternCheck),
    /// `manifest` must not contain `"<old_key>":` and must contain `"<new_key>":`
    ManifestBin {
        manifest: &'static str,
        old_key: &'static str,
        new_key: &'static str,
    },
    /// No directory path has two adjacent segments equal to `segment`
    NestedDirectory { segment: &'static str },
    /// The root-relative path must not exist
    FileAbsent {
        path: &'static str,
        description: &'static str,
    },
}

impl Check {
    /// Label used in match details
    pub fn label(&self) -> String {
        match self {
            Self::Pattern(p) => format!("{} ({})", p.pattern, p.description),
            Self::ManifestBin { manifest, .. } => format!("{manifest} bin entry"),
            Self::NestedDirectory { segment } => format!("nested '{segment}' directories"),
            Self::FileAbsent { path, .. } => format!("{path} absent"),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Section {
    pub title: &'static str,
    pub checks: &'static [Check],
}

pub const CHECKLIST: &[Section] = &[
    Section {
        title: "Package Name Checks",
        checks: &[
            error_pattern("@qwen-code/qwen-code-core", "old core package name"),
            error_pattern("@qwen-code/qwen-code-test-utils", "old test-utils package name"),
            error_pattern("@qwen-code/qwen-code", "old cli package name"),
            error_pattern("@google/gemini-cli", "gemini package references"),
        ],
    },
    Section {
        title: "URL and Repository Checks",
        checks: &[
            Check::Pattern(PatternCheck {
                pattern: "QwenLM/qwen-code",
                description: "upstream GitHub URLs",
                is_regex: false,
                severity: Severity::Error,
                acceptable_contexts: UPSTREAM_MARKERS,
            }),
            warning_pattern("ghcr.io/qwenlm/qwen-code", "upstream container image"),
            warning_pattern("qwenlm.github.io/qwen-code-docs", "upstream docs URLs"),
        ],
    },
    Section {
        title: "VS Code Extension Checks",
        checks: &[
            error_pattern("qwenlm.qwen-code-vscode", "old VS Code extension ID"),
            error_pattern("qwen-code-vscode-ide-companion", "old VS Code companion package"),
        ],
    },
    Section {
        title: "Environment Variable Checks",
        checks: &[
            error_pattern("QWEN_CODE_COMPANION_EXTENSION_NAME", "old env var"),
            error_pattern("QWEN_CODE_IDE_SERVER_PORT", "old env var"),
            error_pattern("QWEN_CODE_IDE_WORKSPACE_PATH", "old env var"),
            error_pattern("QWEN_CODE_SYSTEM_SETTINGS_PATH", "old env var"),
            error_pattern("QWEN_CODE_VERSION", "old env var"),
        ],
    },
    Section {
        title: "Code Identifier Checks",
        checks: &[
            error_pattern("QwenCodeAgent", "old agent class name"),
            error_pattern("class QwenCode", "QwenCode classes"),
            error_pattern("qwenCodeInfo", "qwenCode variables"),
        ],
    },
    Section {
        title: "File and Directory Path Checks",
        checks: &[
            error_pattern("qwen-code-sandbox", "old sandbox name"),
            error_pattern("qwen-code-oauth", "old OAuth service name"),
            error_pattern("/qwen-code/", "qwen-code in paths"),
        ],
    },
    Section {
        title: "Binary and Command Checks",
        checks: &[Check::ManifestBin {
            manifest: "package.json",
            old_key: "qwen",
            new_key: "fora",
        }],
    },
    Section {
        title: "Nested Directory Checks",
        checks: &[
            Check::NestedDirectory { segment: "fora" },
            Check::NestedDirectory {
                segment: "foragen-cli",
            },
        ],
    },
    Section {
        title: "Workflow File Checks",
        checks: &[
            Check::FileAbsent {
                path: ".github/workflows/qwen-code-pr-review.yml",
                description: "old PR review workflow",
            },
            Check::FileAbsent {
                path: ".github/workflows/qwen-scheduled-issue-triage.yml",
                description: "old scheduled triage workflow",
            },
            Check::FileAbsent {
                path: ".github/workflows/qwen-automated-issue-triage.yml",
                description: "old automated triage workflow",
            },
        ],
    },
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchDetail {
    pub file: String,
    pub line: usize,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckDetail {
    pub check: String,
    pub matches: Vec<MatchDetail>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Aggregate verification result
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationResults {
    pub checks_passed: usize,
    pub errors: usize,
    pub warnings: usize,
    pub error_details: Vec<CheckDetail>,
    pub warning_details: Vec<CheckDetail>,
}

impl VerificationResults {
    pub fn add_pass(&mut self) {
        self.checks_passed += 1;
    }

    pub fn add_error(&mut self, detail: CheckDetail) {
        self.errors += 1;
        self.error_details.push(detail);
    }

    pub fn add_warning(&mut self, detail: CheckDetail) {
        self.warnings += 1;
        self.warning_details.push(detail);
    }

    /// Warnings alone never fail verification
    pub fn success(&self) -> bool {
        self.errors == 0
    }

    pub fn exit_code(&self) -> i32 {
        i32::from(!self.success())
    }

    /// Record one check outcome
    pub fn record(&mut self, outcome: CheckOutcome) {
        match outcome {
            CheckOutcome::Pass => self.add_pass(),
            CheckOutcome::Warning(detail) => self.add_warning(detail),
            CheckOutcome::Error(detail) => self.add_error(detail),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    Pass,
    Warning(CheckDetail),
    Error(CheckDetail),
}

impl CheckOutcome {
    fn failed(severity: Severity, detail: CheckDetail) -> Self {
        match severity {
            Severity::Warning => Self::Warning(detail),
            Severity::Error => Self::Error(detail),
        }
    }
}

fn truncate(line: &str) -> String {
    line.chars().take(MAX_CONTENT_CHARS).collect()
}

pub struct Verifier {
    classifier: FileClassifier,
    console: Console,
}

impl Verifier {
    pub fn new(classifier: FileClassifier, console: Console) -> Self {
        Self {
            classifier,
            console,
        }
    }

    /// Run the whole checklist.
    pub fn run(&self) -> Result<VerificationResults, RebrandError> {
        self.run_sections(CHECKLIST)
    }

    pub fn run_sections(&self, sections: &[Section]) -> Result<VerificationResults, RebrandError> {
        let mut results = VerificationResults::default();
        self.console.line(&self.console.paint(
            AnsiColor::Blue,
            "Verifying rebranding from qwen-code to foragen-cli",
        ));
        self.console.blank();

        for section in sections {
            interrupt::checkpoint()?;
            self.console.section(section.title);
            for check in section.checks {
                interrupt::checkpoint()?;
                let outcome = self.evaluate(check)?;
                self.report(check, &outcome);
                results.record(outcome);
            }
            self.console.blank();
        }

        Ok(results)
    }

    /// Lines of eligible files matching `regex`, in walk order.
    pub fn find_matches(&self, regex: &Regex) -> Result<Vec<MatchDetail>, RebrandError> {
        let mut matches = Vec::new();
        for path in self.classifier.walk_files()? {
            if !self.classifier.is_eligible(&path) {
                continue;
            }
            let content = match fs::read_to_string(&path) {
                Ok(content) => content,
                Err(err) => {
                    debug!("Skipping {}: {}", path.display(), err);
                    continue;
                },
            };

            let file = self.classifier.relative(&path).display().to_string();
            for (index, line) in content.lines().enumerate() {
                if regex.is_match(line) {
                    matches.push(MatchDetail {
                        file: file.clone(),
                        line: index + 1,
                        content: line.trim().to_string(),
                    });
                }
            }
        }
        Ok(matches)
    }

    pub fn evaluate(&self, check: &Check) -> Result<CheckOutcome, RebrandError> {
        match check {
            Check::Pattern(pattern) => self.evaluate_pattern(check, pattern),
            Check::ManifestBin {
                manifest,
                old_key,
                new_key,
            } => Ok(self.evaluate_manifest(check, manifest, old_key, new_key)),
            Check::NestedDirectory { segment } => self.evaluate_nested(check, segment),
            Check::FileAbsent { path, .. } => {
                if self.classifier.root().join(path).exists() {
                    Ok(CheckOutcome::Error(CheckDetail {
                        check: check.label(),
                        matches: Vec::new(),
                        message: Some(format!("File still exists: {path}")),
                    }))
                } else {
                    Ok(CheckOutcome::Pass)
                }
            },
        }
    }

    fn evaluate_pattern(
        &self,
        check: &Check,
        pattern: &PatternCheck,
    ) -> Result<CheckOutcome, RebrandError> {
        let source = if pattern.is_regex {
            pattern.pattern.to_string()
        } else {
            regex::escape(pattern.pattern)
        };
        let regex = RegexBuilder::new(&source)
            .case_insensitive(true)
            .build()
            .map_err(|e| RebrandError::Config(format!("invalid check pattern: {e}")))?;

        let matches = self.find_matches(&regex)?;
        if matches.is_empty() {
            return Ok(CheckOutcome::Pass);
        }

        // Most severe class among the surviving matches
        let severity = matches
            .iter()
            .map(|m| {
                let line = m.content.to_lowercase();
                let acceptable = pattern
                    .acceptable_contexts
                    .iter()
                    .any(|marker| line.contains(&marker.to_lowercase()));
                if acceptable {
                    Severity::Warning
                } else {
                    pattern.severity
                }
            })
            .max()
            .unwrap_or(pattern.severity);

        let matches = matches
            .into_iter()
            .map(|m| MatchDetail {
                content: truncate(&m.content),
                ..m
            })
            .collect();

        Ok(CheckOutcome::failed(
            severity,
            CheckDetail {
                check: check.label(),
                matches,
                message: None,
            },
        ))
    }

    fn evaluate_manifest(
        &self,
        check: &Check,
        manifest: &str,
        old_key: &str,
        new_key: &str,
    ) -> CheckOutcome {
        let path = self.classifier.root().join(manifest);
        let detail = |message: String| CheckDetail {
            check: check.label(),
            matches: Vec::new(),
            message: Some(message),
        };

        if !path.exists() {
            return CheckOutcome::Warning(detail(format!("{manifest} not found")));
        }

        match fs::read_to_string(&path) {
            Ok(content) => {
                if content.contains(&format!("\"{old_key}\":")) {
                    CheckOutcome::Error(detail(format!("Still has '{old_key}' bin entry")))
                } else if !content.contains(&format!("\"{new_key}\":")) {
                    CheckOutcome::Error(detail(format!("Missing '{new_key}' bin entry")))
                } else {
                    CheckOutcome::Pass
                }
            },
            Err(err) => CheckOutcome::Error(detail(format!("Failed to read {manifest}: {err}"))),
        }
    }

    fn evaluate_nested(&self, check: &Check, segment: &str) -> Result<CheckOutcome, RebrandError> {
        let mut nested = Vec::new();
        for entry in self.classifier.walk_tree()? {
            if !entry.file_type().is_dir() {
                continue;
            }
            let relative: PathBuf = self.classifier.relative(entry.path()).to_path_buf();
            let segments: Vec<_> = relative.iter().collect();
            if segments
                .windows(2)
                .any(|pair| pair[0] == segment && pair[1] == segment)
            {
                nested.push(MatchDetail {
                    file: relative.display().to_string(),
                    line: 0,
                    content: String::new(),
                });
            }
        }

        if nested.is_empty() {
            Ok(CheckOutcome::Pass)
        } else {
            Ok(CheckOutcome::Error(CheckDetail {
                check: check.label(),
                matches: nested,
                message: None,
            }))
        }
    }

    fn status(&self, outcome: &CheckOutcome) -> String {
        match outcome {
            CheckOutcome::Pass => self.console.paint(AnsiColor::Green, "OK"),
            CheckOutcome::Warning(_) => self.console.paint(AnsiColor::Yellow, "WARN"),
            CheckOutcome::Error(_) => self.console.paint(AnsiColor::Red, "FAIL"),
        }
    }

    fn report(&self, check: &Check, outcome: &CheckOutcome) {
        if self.console.is_silent() {
            return;
        }
        for line in self.describe(check, outcome) {
            self.console.line(&line);
        }
        if !matches!(outcome, CheckOutcome::Pass) {
            self.console.blank();
        }
    }

    /// Human-readable lines for one check: the heading with its status,
    /// then the message and up to [`MAX_DISPLAYED_MATCHES`] matches.
    pub fn describe(&self, check: &Check, outcome: &CheckOutcome) -> Vec<String> {
        let heading = match check {
            Check::Pattern(p) => format!("Checking for '{}' ({})...", p.pattern, p.description),
            Check::ManifestBin { manifest, .. } => format!("Checking {manifest} bin entry..."),
            Check::NestedDirectory { segment } => {
                format!("Checking for nested '{segment}' directories...")
            },
            Check::FileAbsent { description, .. } => {
                format!("Checking that {description} doesn't exist...")
            },
        };
        let mut lines = vec![format!("{heading} {}", self.status(outcome))];

        let detail = match outcome {
            CheckOutcome::Pass => return lines,
            CheckOutcome::Warning(detail) | CheckOutcome::Error(detail) => detail,
        };

        if let Some(message) = &detail.message {
            lines.push(format!("  {message}"));
        }
        for m in detail.matches.iter().take(MAX_DISPLAYED_MATCHES) {
            if m.line == 0 {
                lines.push(format!("  {}", m.file));
            } else {
                lines.push(format!("  {}:{}: {}", m.file, m.line, m.content));
            }
        }
        if detail.matches.len() > MAX_DISPLAYED_MATCHES {
            lines.push(self.console.paint(
                AnsiColor::Yellow,
                &format!(
                    "  ... and {} more",
                    detail.matches.len() - MAX_DISPLAYED_MATCHES
                ),
            ));
        }
        lines
    }
}
