//! Operator prompts.

/// Asks the operator to confirm a destructive action.
pub trait Confirm: Send + Sync {
    /// Show `message` and return whether the operator agreed.
    fn confirm(&self, message: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn confirm(&self, message: &str) -> bool {
        self(message)
    }
}

/// Answers every prompt the same way; for scripted use (`--yes`) and tests.
#[derive(Debug, Clone, Copy)]
pub struct AutoConfirm(pub bool);

impl Confirm for AutoConfirm {
    fn confirm(&self, message: &str) -> bool {
        tracing::debug!(message, answer = self.0, "Auto-answered confirmation");
        self.0
    }
}
