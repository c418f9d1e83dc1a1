//! Interactive confirmation gate on stdin
//!
//! Blocks on input by design: this is the synchronous human-in-the-loop
//! step before any destructive tool runs.

use async_trait::async_trait;
use ember_agent::{ConfirmationDecision, ConfirmationGate, FinalDecision, ToolCallRequest};

pub struct InteractiveGate;

#[async_trait]
impl ConfirmationGate for InteractiveGate {
    async fn decide(&self, _call: &ToolCallRequest) -> ConfirmationDecision {
        match prompt_line(">> Execute? [y/n/v]: ").await.trim().to_lowercase().as_str() {
            "y" | "yes" => ConfirmationDecision::Proceed,
            "v" | "view" => ConfirmationDecision::ViewFullContent,
            _ => ConfirmationDecision::Cancel,
        }
    }

    async fn show_content(&self, content: &str) {
        println!("\n{}", "=".repeat(80));
        println!("{}", content);
        println!("{}\n", "=".repeat(80));
    }

    async fn decide_final(&self, _call: &ToolCallRequest) -> FinalDecision {
        match prompt_line(">> Execute? [y/n]: ").await.trim().to_lowercase().as_str() {
            "y" | "yes" => FinalDecision::Proceed,
            _ => FinalDecision::Cancel,
        }
    }
}

/// Read one line from stdin without blocking the runtime worker
async fn prompt_line(prompt: &str) -> String {
    let prompt = prompt.to_string();
    tokio::task::spawn_blocking(move || {
        use std::io::Write;
        print!("{}", prompt);
        let _ = std::io::stdout().flush();
        let mut line = String::new();
        let _ = std::io::stdin().read_line(&mut line);
        line
    })
    .await
    .unwrap_or_default()
}
