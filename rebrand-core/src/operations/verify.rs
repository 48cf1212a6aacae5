use crate::classifier::{Exclusions, FileClassifier};
use crate::console::Console;
use crate::verify::{VerificationResults, Verifier};
use anyhow::{Context, Result};
use std::path::Path;

/// Verify operation - runs the whole checklist against `root`
pub fn verify_operation(
    root: &Path,
    exclusions: Exclusions,
    console: Console,
) -> Result<VerificationResults> {
    let verifier = Verifier::new(FileClassifier::new(root, exclusions), console);
    verifier
        .run()
        .with_context(|| format!("Verification of {} failed", root.display()))
}
