//! The ordered replacement tables.
//!
//! Entries run strictly in sequence: every replacement sees the output of
//! the ones before it. Longer and more specific strings therefore come
//! before any string they contain, and no replacement may produce text a
//! later entry would match again. [`check_ordering`] enforces both rules.

use crate::rename::RenameKind;
use std::fmt;

/// One literal, case-sensitive substitution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatternEntry {
    pub old: &'static str,
    pub new: &'static str,
    pub description: &'static str,
}

const fn entry(old: &'static str, new: &'static str, description: &'static str) -> PatternEntry {
    PatternEntry {
        old,
        new,
        description,
    }
}

/// A titled group of entries within a flow
#[derive(Debug, Clone, Copy)]
pub struct PatternTier {
    pub name: &'static str,
    pub entries: &'static [PatternEntry],
}

#[derive(Debug, Clone, Copy)]
pub struct Flow {
    /// Short name used for phase outcomes and error context
    pub name: &'static str,
    /// Banner shown before the flow runs
    pub title: &'static str,
    pub tiers: &'static [PatternTier],
}

impl Flow {
    pub fn entries(&self) -> impl Iterator<Item = &'static PatternEntry> {
        self.tiers.iter().flat_map(|tier| tier.entries.iter())
    }
}

/// Compound `qwen-code` forms, most specific first.
pub const FLOW_COMPOUND: Flow = Flow {
    name: "Flow 1 (qwen-code → foragen-cli)",
    title: "FLOW 1: qwen-code → foragen-cli (Compound Pattern)",
    tiers: &[
        PatternTier {
            name: "Phase 1.1: Package scopes",
            entries: &[
                entry(
                    "@qwen-code/qwen-code-core",
                    "@jeffreysblake/foragen-cli-core",
                    "Package: core",
                ),
                entry(
                    "@qwen-code/qwen-code-test-utils",
                    "@jeffreysblake/foragen-cli-test-utils",
                    "Package: test-utils",
                ),
                entry(
                    "@qwen-code/qwen-code",
                    "@jeffreysblake/foragen-cli",
                    "Package: cli",
                ),
                entry(
                    "@google/gemini-cli-test-utils",
                    "@jeffreysblake/foragen-cli-test-utils",
                    "Package: test-utils (from gemini)",
                ),
            ],
        },
        PatternTier {
            name: "Phase 1.2: GitHub URLs and container references",
            entries: &[
                entry(
                    "https://github.com/QwenLM/qwen-code.git",
                    "https://github.com/jeffreysblake/foragen-cli.git",
                    "Git remote URL",
                ),
                entry(
                    "QwenLM/qwen-code-action",
                    "jeffreysblake/foragen-cli-action",
                    "GitHub Action URL",
                ),
                entry(
                    "QwenLM/qwen-code",
                    "jeffreysblake/foragen-cli",
                    "GitHub repo URL",
                ),
                entry(
                    "QwenLM/Qwen3-Coder/blob/main/README.md",
                    "jeffreysblake/foragen-cli/blob/main/README.md",
                    "QwenLM docs redirect to CLI repo",
                ),
                entry(
                    "ghcr.io/qwenlm/qwen-code",
                    "foragen-cli-sandbox",
                    "Container image (local)",
                ),
                entry(
                    "qwenlm.qwen-code-vscode-ide-companion",
                    "jeffreysblake.foragen-cli-vscode-companion",
                    "VS Code extension ID",
                ),
            ],
        },
        PatternTier {
            name: "Phase 1.3: Environment variables (UPPER_SNAKE_CASE)",
            entries: &[
                entry(
                    "QWEN_CODE_COMPANION_EXTENSION_NAME",
                    "FORAGEN_CLI_COMPANION_EXTENSION_NAME",
                    "Env var: companion extension name",
                ),
                entry(
                    "QWEN_CODE_IDE_SERVER_PORT",
                    "FORAGEN_CLI_IDE_SERVER_PORT",
                    "Env var: IDE server port",
                ),
                entry(
                    "QWEN_CODE_IDE_WORKSPACE_PATH",
                    "FORAGEN_CLI_IDE_WORKSPACE_PATH",
                    "Env var: IDE workspace path",
                ),
                entry(
                    "QWEN_CODE_IDE_SERVER_STDIO_COMMAND",
                    "FORAGEN_CLI_IDE_SERVER_STDIO_COMMAND",
                    "Env var: IDE server stdio command",
                ),
                entry(
                    "QWEN_CODE_IDE_SERVER_STDIO_ARGS",
                    "FORAGEN_CLI_IDE_SERVER_STDIO_ARGS",
                    "Env var: IDE server stdio args",
                ),
                entry(
                    "QWEN_CODE_SYSTEM_SETTINGS_PATH",
                    "FORAGEN_CLI_SYSTEM_SETTINGS_PATH",
                    "Env var: system settings path",
                ),
                entry(
                    "QWEN_CODE_SYSTEM_DEFAULTS_PATH",
                    "FORAGEN_CLI_SYSTEM_DEFAULTS_PATH",
                    "Env var: system defaults path",
                ),
                entry(
                    "QWEN_CODE_VERSION",
                    "FORAGEN_CLI_VERSION",
                    "Env var: version",
                ),
                entry(
                    "QWEN_CODE_TOOL_CALL_STYLE",
                    "FORAGEN_CLI_TOOL_CALL_STYLE",
                    "Env var: tool call style",
                ),
                entry(
                    "QWEN_CODE_FORCE_ENCRYPTED_FILE_STORAGE",
                    "FORAGEN_CLI_FORCE_ENCRYPTED_FILE_STORAGE",
                    "Env var: force encrypted storage",
                ),
            ],
        },
        PatternTier {
            name: "Phase 1.4: PascalCase QwenCode identifiers",
            entries: &[
                entry("QwenCodeAgent", "ForagenCliAgent", "Class: QwenCodeAgent"),
                entry("QwenCode/", "ForagenCli/", "User-Agent prefix"),
                entry(
                    "/Library/Application Support/QwenCode",
                    "/Library/Application Support/ForagenCli",
                    "macOS app support path",
                ),
                entry(
                    "qwen-code.runQwenCode",
                    "foragen-cli.runForagenCli",
                    "VS Code command",
                ),
                entry("runQwenCode", "runForagenCli", "VS Code command handler"),
            ],
        },
        PatternTier {
            name: "Phase 1.5: kebab-case qwen-code-* compounds",
            entries: &[
                entry(
                    "qwen-code-vscode-ide-companion",
                    "foragen-cli-vscode-companion",
                    "VS Code companion",
                ),
                entry(
                    "qwen-code-companion-mcp-server",
                    "foragen-cli-companion-mcp-server",
                    "MCP server",
                ),
                entry(
                    "qwen-code-tool-modify-diffs",
                    "foragen-cli-tool-modify-diffs",
                    "tool modify diffs",
                ),
                entry(
                    "qwen-code-test-workspace-",
                    "foragen-cli-test-workspace-",
                    "test workspace prefix",
                ),
                entry(
                    "qwen-code-test-home-",
                    "foragen-cli-test-home-",
                    "test home prefix",
                ),
                entry("qwen-code-test-root", "foragen-cli-test-root", "test root"),
                entry(
                    "qwen-code-ide-server-",
                    "foragen-cli-ide-server-",
                    "IDE server prefix",
                ),
                entry("qwen-code-mcp-client", "foragen-cli-mcp-client", "MCP client"),
                entry(
                    "qwen-code-telemetry-",
                    "foragen-cli-telemetry-",
                    "telemetry prefix",
                ),
                entry(
                    "qwen-code-releases-",
                    "foragen-cli-releases-",
                    "releases prefix",
                ),
                entry(
                    "qwen-code-warnings.txt",
                    "foragen-cli-warnings.txt",
                    "warnings file",
                ),
                entry("qwen-code-linters", "foragen-cli-linters", "linters temp dir"),
                entry("qwen-code-modify-", "foragen-cli-modify-", "modify prefix"),
                entry(
                    "qwen-code-dev-script",
                    "fora-cli-dev-script",
                    "dev script user agent",
                ),
                entry("qwen-code-setup.sh", "foragen-cli-setup.sh", "setup script"),
                entry("qwen-code-oauth", "foragen-cli-oauth", "OAuth keychain"),
                entry("qwen-code-cli", "foragen-cli", "CLI name"),
                entry("qwen-code-sandbox", "foragen-cli-sandbox", "sandbox image"),
                entry(
                    "qwen-code-pr-review.yml",
                    "foragen-cli-pr-review.yml",
                    "PR review workflow",
                ),
            ],
        },
        PatternTier {
            name: "Phase 1.6: Space-separated compounds",
            entries: &[
                entry("Qwen Code", "Foragen CLI", "Compound: Qwen Code"),
                entry("QWEN CODE", "FORAGEN CLI", "Compound: QWEN CODE"),
                entry("qwen code", "foragen cli", "Compound: qwen code"),
                entry("Qwen code", "Foragen cli", "Compound: Qwen code"),
                entry("qwen Code", "foragen Cli", "Compound: qwen Code"),
            ],
        },
        PatternTier {
            name: "Phase 1.7: Simple qwen-code/qwen_code replacements",
            entries: &[
                entry("QWEN_CODE", "FORAGEN_CLI", "Simple: QWEN_CODE"),
                entry("Qwen-Code", "Foragen-Cli", "Simple: Qwen-Code"),
                entry("qwen-code", "foragen-cli", "Simple: qwen-code"),
                entry("qwen_code", "foragen_cli", "Simple: qwen_code"),
            ],
        },
    ],
};

/// Bare `qwen` forms, after every compound has been handled.
pub const FLOW_SIMPLE: Flow = Flow {
    name: "Flow 2 (qwen → fora)",
    title: "FLOW 2: qwen → fora (Simple Pattern)",
    tiers: &[
        PatternTier {
            name: "Phase 2.1: Compound qwen identifiers",
            entries: &[
                entry(
                    "QwenContentGenerator",
                    "ForaContentGenerator",
                    "Class: QwenContentGenerator",
                ),
                entry("QwenLogger", "ForaLogger", "Class: QwenLogger"),
                entry("QwenOAuth", "ForaOAuth", "Class/prefix: QwenOAuth"),
                entry("useQwenAuth", "useForaAuth", "Hook: useQwenAuth"),
                entry("qwenOAuth", "foraOAuth", "Variable: qwenOAuth"),
                entry(
                    "qwenCodeInfoMessageShown",
                    "foragenCliInfoMessageShown",
                    "Variable: qwenCodeInfoMessageShown",
                ),
            ],
        },
        PatternTier {
            name: "Phase 2.2: Simple qwen replacements",
            entries: &[
                entry("QWEN_OAUTH", "FORA_OAUTH", "Env var: QWEN_OAUTH"),
                entry("QWEN_DIR", "FORA_DIR", "Constant: QWEN_DIR"),
                entry("QWEN", "FORA", "Simple: QWEN"),
                entry("Qwen", "Fora", "Simple: Qwen"),
                entry("qwen", "fora", "Simple: qwen"),
            ],
        },
    ],
};

/// Content flows in execution order.
pub const FLOWS: &[Flow] = &[FLOW_COMPOUND, FLOW_SIMPLE];

/// One rename pass over file or directory names
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenameStep {
    pub kind: RenameKind,
    pub old: &'static str,
    pub new: &'static str,
    pub description: &'static str,
}

pub const RENAME_PHASE_NAME: &str = "Phase 3 (File renames)";
pub const RENAME_PHASE_TITLE: &str = "PHASE 3: File and Directory Renames";

/// Files before directories, compound before simple.
pub const RENAME_STEPS: &[RenameStep] = &[
    RenameStep {
        kind: RenameKind::File,
        old: "qwen-code",
        new: "foragen-cli",
        description: "Phase 3.1: Rename files containing 'qwen-code'",
    },
    RenameStep {
        kind: RenameKind::File,
        old: "qwen",
        new: "fora",
        description: "Phase 3.2: Rename files containing 'qwen'",
    },
    RenameStep {
        kind: RenameKind::Dir,
        old: "qwen-code",
        new: "foragen-cli",
        description: "Phase 3.3: Rename directories containing 'qwen-code'",
    },
    RenameStep {
        kind: RenameKind::Dir,
        old: "qwen",
        new: "fora",
        description: "Phase 3.4: Rename directories containing 'qwen'",
    },
];

/// Strings counted by the pre-flight check.
pub const PREFLIGHT_PATTERNS: &[&str] = &["qwen-code", "qwen", "Qwen", "QWEN"];

/// Apply every flow to an in-memory string, in order.
/// Returns the result and the number of replacements made.
pub fn apply_flows_to_text(text: &str, flows: &[Flow]) -> (String, usize) {
    let mut current = text.to_string();
    let mut total = 0;
    for pattern in flows.iter().flat_map(Flow::entries) {
        let count = current.matches(pattern.old).count();
        if count > 0 {
            total += count;
            current = current.replace(pattern.old, pattern.new);
        }
    }
    (current, total)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationKind {
    /// The entry has an empty old string or maps a string to itself
    Degenerate,
    /// An earlier entry's old string occurs inside this entry's old string,
    /// so this entry can never match
    Shadowed,
    /// This entry's old string occurs inside an earlier entry's output
    Rematched,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderingViolation {
    pub kind: ViolationKind,
    pub earlier: PatternEntry,
    pub later: PatternEntry,
}

impl fmt::Display for OrderingViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ViolationKind::Degenerate => write!(f, "'{}' is a no-op entry", self.later.old),
            ViolationKind::Shadowed => write!(
                f,
                "'{}' is consumed by earlier '{}'",
                self.later.old, self.earlier.old
            ),
            ViolationKind::Rematched => write!(
                f,
                "'{}' matches the output of earlier '{}' → '{}'",
                self.later.old, self.earlier.old, self.earlier.new
            ),
        }
    }
}

/// Check the flattened sequence of every flow for ordering mistakes.
pub fn check_ordering(flows: &[Flow]) -> Vec<OrderingViolation> {
    let entries: Vec<&PatternEntry> = flows.iter().flat_map(Flow::entries).collect();
    let mut violations = Vec::new();

    for (i, later) in entries.iter().enumerate() {
        if later.old.is_empty() || later.old == later.new {
            violations.push(OrderingViolation {
                kind: ViolationKind::Degenerate,
                earlier: **later,
                later: **later,
            });
            continue;
        }

        for earlier in &entries[..i] {
            if earlier.old.is_empty() {
                continue;
            }
            if later.old.contains(earlier.old) {
                violations.push(OrderingViolation {
                    kind: ViolationKind::Shadowed,
                    earlier: **earlier,
                    later: **later,
                });
            }
            if earlier.new.contains(later.old) {
                violations.push(OrderingViolation {
                    kind: ViolationKind::Rematched,
                    earlier: **earlier,
                    later: **later,
                });
            }
        }
    }

    violations
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_are_correctly_ordered() {
        let violations = check_ordering(FLOWS);
        assert!(
            violations.is_empty(),
            "ordering violations: {:#?}",
            violations
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_check_ordering_flags_shadowed_entry() {
        const BAD: Flow = Flow {
            name: "bad",
            title: "bad",
            tiers: &[PatternTier {
                name: "bad",
                entries: &[
                    entry("qwen", "fora", "simple"),
                    entry("qwen-code", "foragen-cli", "compound"),
                ],
            }],
        };

        let violations = check_ordering(&[BAD]);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].kind, ViolationKind::Shadowed);
        assert_eq!(violations[0].later.old, "qwen-code");
    }

    #[test]
    fn test_check_ordering_flags_rematched_output() {
        const BAD: Flow = Flow {
            name: "bad",
            title: "bad",
            tiers: &[PatternTier {
                name: "bad",
                entries: &[
                    entry("QwenLM", "ForaLM", "org"),
                    entry("Fora", "Foragen", "expand"),
                ],
            }],
        };

        let violations = check_ordering(&[BAD]);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].kind, ViolationKind::Rematched);
    }

    #[test]
    fn test_check_ordering_flags_degenerate_entry() {
        const BAD: Flow = Flow {
            name: "bad",
            title: "bad",
            tiers: &[PatternTier {
                name: "bad",
                entries: &[entry("qwen", "qwen", "noop")],
            }],
        };

        assert_eq!(check_ordering(&[BAD])[0].kind, ViolationKind::Degenerate);
    }

    #[test]
    fn test_entries_preserve_casing_convention() {
        for pattern in FLOWS.iter().flat_map(Flow::entries) {
            let old_has_lower = pattern.old.chars().any(char::is_lowercase);
            let old_has_upper = pattern.old.chars().any(char::is_uppercase);
            if !old_has_lower {
                assert!(
                    !pattern.new.chars().any(char::is_lowercase),
                    "{} → {} loses UPPER casing",
                    pattern.old,
                    pattern.new
                );
            }
            if !old_has_upper {
                assert!(
                    !pattern.new.chars().any(char::is_uppercase),
                    "{} → {} loses lower casing",
                    pattern.old,
                    pattern.new
                );
            }
        }
    }

    #[test]
    fn test_compound_forms_win_over_simple_forms() {
        let (text, count) = apply_flows_to_text(
            "npm i @qwen-code/qwen-code-core && QWEN_CODE_VERSION=1 qwen",
            FLOWS,
        );
        assert_eq!(
            text,
            "npm i @jeffreysblake/foragen-cli-core && FORAGEN_CLI_VERSION=1 fora"
        );
        assert_eq!(count, 3);
    }

    #[test]
    fn test_git_remote_url_keeps_suffix() {
        let (text, _) = apply_flows_to_text(
            "git clone https://github.com/QwenLM/qwen-code.git",
            FLOWS,
        );
        assert_eq!(
            text,
            "git clone https://github.com/jeffreysblake/foragen-cli.git"
        );
    }

    #[test]
    fn test_each_casing_maps_to_same_casing() {
        let (text, _) = apply_flows_to_text(
            "Qwen Code / QWEN CODE / qwen code / Qwen / QWEN / qwen / qwen_code",
            FLOWS,
        );
        assert_eq!(
            text,
            "Foragen CLI / FORAGEN CLI / foragen cli / Fora / FORA / fora / foragen_cli"
        );
    }

    #[test]
    fn test_rename_steps_run_files_before_directories() {
        let kinds: Vec<_> = RENAME_STEPS.iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![
                RenameKind::File,
                RenameKind::File,
                RenameKind::Dir,
                RenameKind::Dir
            ]
        );
        assert_eq!(RENAME_STEPS[0].old, "qwen-code");
        assert_eq!(RENAME_STEPS[1].old, "qwen");
    }
}
