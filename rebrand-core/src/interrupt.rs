use crate::error::RebrandError;
use std::sync::atomic::{AtomicBool, Ordering};

/// Set by the signal handler when the user asks us to stop.
static INTERRUPT_REQUESTED: AtomicBool = AtomicBool::new(false);

/// Tracks whether we are currently prompting the user for confirmation.
static CONFIRMATION_PROMPT_ACTIVE: AtomicBool = AtomicBool::new(false);

/// Record an interrupt. Work in progress stops at the next checkpoint.
pub fn request_interrupt() {
    INTERRUPT_REQUESTED.store(true, Ordering::SeqCst);
}

pub fn is_interrupted() -> bool {
    INTERRUPT_REQUESTED.load(Ordering::SeqCst)
}

/// Clear a pending interrupt.
pub fn reset() {
    INTERRUPT_REQUESTED.store(false, Ordering::SeqCst);
}

/// Checkpoint between units of work.
pub fn checkpoint() -> Result<(), RebrandError> {
    check(&INTERRUPT_REQUESTED)
}

fn check(flag: &AtomicBool) -> Result<(), RebrandError> {
    if flag.load(Ordering::SeqCst) {
        Err(RebrandError::Interrupted)
    } else {
        Ok(())
    }
}

/// RAII helper that marks the confirmation prompt as active while it is in scope.
pub struct ConfirmationPromptGuard;

impl ConfirmationPromptGuard {
    /// Activate the confirmation prompt state until the guard is dropped.
    pub fn activate() -> Self {
        CONFIRMATION_PROMPT_ACTIVE.store(true, Ordering::SeqCst);
        Self
    }
}

impl Drop for ConfirmationPromptGuard {
    fn drop(&mut self) {
        CONFIRMATION_PROMPT_ACTIVE.store(false, Ordering::SeqCst);
    }
}

/// Returns true when the confirmation prompt is currently waiting for input.
pub fn confirmation_prompt_active() -> bool {
    CONFIRMATION_PROMPT_ACTIVE.load(Ordering::SeqCst)
}
