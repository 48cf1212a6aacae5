use rebrand_core::{
    flow, Console, Exclusions, OperationKind, RebrandStats, RunContext, RunOptions, TransactionLog,
};
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

fn run(root: &Path) -> RebrandStats {
    let mut ctx = context(root);
    let outcomes = flow::run_phases(&mut ctx).unwrap();
    assert!(outcomes.iter().all(|o| o.completed), "{outcomes:?}");
    ctx.transactions.save().unwrap();
    ctx.stats
}

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn read(root: &Path, relative: &str) -> String {
    fs::read_to_string(root.join(relative)).unwrap()
}

#[test]
fn test_full_flow_rewrites_content_and_paths() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write(
        root,
        "package.json",
        r#"{"name": "@qwen-code/qwen-code", "bin": {"qwen": "dist/index.js"}}"#,
    );
    write(
        root,
        "packages/qwen-code/src/qwenLogger.ts",
        "export class QwenLogger {}\nconst dir = QWEN_DIR;\n",
    );
    write(root, "docs/qwen-code-setup.md", "Install Qwen Code from QwenLM/qwen-code.\n");

    let stats = run(root);
    assert!(stats.errors.is_empty(), "{:?}", stats.errors);
    assert_eq!(stats.files_renamed, 2);
    assert_eq!(stats.dirs_renamed, 1);

    assert_eq!(
        read(root, "package.json"),
        r#"{"name": "@jeffreysblake/foragen-cli", "bin": {"fora": "dist/index.js"}}"#
    );
    assert_eq!(
        read(root, "packages/foragen-cli/src/foraLogger.ts"),
        "export class ForaLogger {}\nconst dir = FORA_DIR;\n"
    );
    assert_eq!(
        read(root, "docs/foragen-cli-setup.md"),
        "Install Foragen CLI from jeffreysblake/foragen-cli.\n"
    );
    assert!(!root.join("packages/qwen-code").exists());
}

#[test]
fn test_second_run_is_a_no_op() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write(root, "src/qwen/qwenClient.ts", "QWEN_CODE_VERSION qwen-code Qwen\n");
    write(root, "README.md", "Qwen Code works with qwen.\n");

    let first = run(root);
    assert!(first.replacements_made > 0);

    let second = run(root);
    assert_eq!(second.replacements_made, 0);
    assert_eq!(second.files_modified, 0);
    assert_eq!(second.files_renamed, 0);
    assert_eq!(second.dirs_renamed, 0);
    assert!(second.errors.is_empty());
}

#[test]
fn test_each_old_occurrence_becomes_a_new_one() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    let content = "qwen-code one\nqwen-code two\nsee qwen-code-sandbox\n";
    write(root, "notes.txt", content);

    run(root);

    let rewritten = read(root, "notes.txt");
    assert_eq!(rewritten.matches("qwen-code").count(), 0);
    assert!(rewritten.matches("foragen-cli").count() >= content.matches("qwen-code").count());
    assert!(!rewritten.contains("foragen-cli-cli"));
    assert!(!rewritten.contains("fora-code"));
}

#[test]
fn test_casing_is_preserved() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write(
        root,
        "casing.ts",
        "QWEN_CODE_VERSION\nQwenLogger\nqwenOAuth\nqwen\nQwen Code\n",
    );

    run(root);

    assert_eq!(
        read(root, "casing.ts"),
        "FORAGEN_CLI_VERSION\nForaLogger\nforaOAuth\nfora\nForagen CLI\n"
    );
}

#[test]
fn test_directories_are_renamed_deepest_first() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write(root, "qwen/qwen-utils/qwen-deep/file.txt", "plain\n");

    run(root);

    assert!(root.join("fora/fora-utils/fora-deep/file.txt").exists());

    let records = TransactionLog::load(&root.join(".rebrand-transaction.json")).unwrap();
    let dirs: Vec<_> = records
        .iter()
        .filter(|r| r.operation == OperationKind::RenameDir)
        .collect();
    assert_eq!(dirs.len(), 3);
    assert!(dirs.iter().all(|r| r.success));
    let depths: Vec<_> = dirs.iter().map(|r| r.old.components().count()).collect();
    let mut sorted = depths.clone();
    sorted.sort_by(|a, b| b.cmp(a));
    assert_eq!(depths, sorted);
}

#[test]
fn test_excluded_files_are_byte_identical() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    let binary: &[u8] = &[0xff, 0xfe, 0x00, b'q', b'w', b'e', b'n', 0xc3, 0x28];
    write(root, "CHANGELOG.md", "Qwen Code 1.0\n");
    write(root, "node_modules/qwen/index.js", "module.exports = 'qwen';\n");
    write(root, ".git/config", "url = https://github.com/QwenLM/qwen-code.git\n");
    write(root, "src/app.ts", "qwen\n");
    fs::write(root.join("logo-qwen.bin"), binary).unwrap();

    run(root);

    assert_eq!(read(root, "CHANGELOG.md"), "Qwen Code 1.0\n");
    assert_eq!(
        read(root, "node_modules/qwen/index.js"),
        "module.exports = 'qwen';\n"
    );
    assert_eq!(
        read(root, ".git/config"),
        "url = https://github.com/QwenLM/qwen-code.git\n"
    );
    assert_eq!(read(root, "src/app.ts"), "fora\n");
    // Binary content is untouched even though the name is rebranded
    assert_eq!(fs::read(root.join("logo-fora.bin")).unwrap(), binary);
}

#[test]
fn test_rename_conflict_is_logged_and_batch_continues() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write(root, "a/qwen.md", "old\n");
    write(root, "a/fora.md", "already here\n");
    write(root, "b/qwen.md", "moves\n");

    let mut ctx = context(root);
    flow::run_phases(&mut ctx).unwrap();

    assert_eq!(ctx.stats.errors.len(), 1);
    assert!(ctx.stats.errors[0].starts_with("File Rename: "));
    assert_eq!(read(root, "a/fora.md"), "already here\n");
    assert!(root.join("a/qwen.md").exists());
    assert_eq!(read(root, "b/fora.md"), "moves\n");

    let failed: Vec<_> = ctx
        .transactions
        .operations()
        .iter()
        .filter(|r| !r.success)
        .collect();
    assert_eq!(failed.len(), 1);
}

#[test]
fn test_unreadable_file_is_reported_and_others_still_rewritten() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    let mut undecodable = "// generated\n".repeat(50).into_bytes();
    undecodable.extend_from_slice(b"const name = 'qwen';\n\xfe\n");
    fs::write(root.join("bundle.js"), &undecodable).unwrap();
    write(root, "src/main.ts", "import { qwen } from './qwen';\n");

    let mut ctx = context(root);
    let outcomes = flow::run_phases(&mut ctx).unwrap();
    assert!(outcomes.iter().all(|o| o.completed));

    assert_eq!(read(root, "src/main.ts"), "import { fora } from './fora';\n");
    assert_eq!(fs::read(root.join("bundle.js")).unwrap(), undecodable);
    assert_eq!(ctx.stats.errors.len(), 1, "{:?}", ctx.stats.errors);
    assert!(ctx.stats.errors[0].contains("bundle.js"));
    assert_eq!(ctx.stats.files_modified, 1);
}

#[cfg(unix)]
#[test]
fn test_symlinks_are_not_followed() {
    use std::os::unix::fs::symlink;

    let outside = TempDir::new().unwrap();
    fs::write(outside.path().join("qwen.txt"), "qwen\n").unwrap();
    fs::create_dir_all(outside.path().join("qwen-lib")).unwrap();
    fs::write(outside.path().join("qwen-lib/index.ts"), "qwen\n").unwrap();

    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write(root, "src/app.ts", "qwen\n");
    symlink(outside.path().join("qwen.txt"), root.join("qwen-link.txt")).unwrap();
    symlink(outside.path().join("qwen-lib"), root.join("qwen-lib")).unwrap();

    let stats = run(root);
    assert!(stats.errors.is_empty(), "{:?}", stats.errors);

    assert_eq!(read(root, "src/app.ts"), "fora\n");
    assert_eq!(stats.files_renamed, 0);
    assert_eq!(stats.dirs_renamed, 0);
    assert!(fs::symlink_metadata(root.join("qwen-link.txt"))
        .unwrap()
        .file_type()
        .is_symlink());
    assert!(fs::symlink_metadata(root.join("qwen-lib"))
        .unwrap()
        .file_type()
        .is_symlink());
    assert_eq!(
        fs::read_to_string(outside.path().join("qwen.txt")).unwrap(),
        "qwen\n"
    );
    assert_eq!(
        fs::read_to_string(outside.path().join("qwen-lib/index.ts")).unwrap(),
        "qwen\n"
    );
}
