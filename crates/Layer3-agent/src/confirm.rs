//! Confirmation gate - the human-in-the-loop approval step
//!
//! Tools flagged `requires_confirmation` pass through this gate before
//! executing. The gate is an injected capability so the orchestrator can be
//! exercised without a terminal.

use crate::parser::ToolCallRequest;
use async_trait::async_trait;

/// First-round decision for a confirmable tool call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmationDecision {
    /// Execute the tool
    Proceed,

    /// Show the full `content` parameter, then decide again
    ViewFullContent,

    /// Skip this tool call; it still produces a result
    Cancel,
}

/// Second-round decision after the full content was shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinalDecision {
    Proceed,
    Cancel,
}

/// Synchronous human-in-the-loop approval. Implementations may block on
/// interactive input indefinitely.
#[async_trait]
pub trait ConfirmationGate: Send + Sync {
    /// Decide whether to run a tool call
    async fn decide(&self, call: &ToolCallRequest) -> ConfirmationDecision;

    /// Display the full content parameter to the user
    async fn show_content(&self, content: &str);

    /// Re-decide after the content was displayed; viewing again is not
    /// offered a second time
    async fn decide_final(&self, call: &ToolCallRequest) -> FinalDecision;
}

/// Gate that approves everything. Used by `--yes` runs and tests.
pub struct AutoApproveGate;

#[async_trait]
impl ConfirmationGate for AutoApproveGate {
    async fn decide(&self, _call: &ToolCallRequest) -> ConfirmationDecision {
        ConfirmationDecision::Proceed
    }

    async fn show_content(&self, _content: &str) {}

    async fn decide_final(&self, _call: &ToolCallRequest) -> FinalDecision {
        FinalDecision::Proceed
    }
}
