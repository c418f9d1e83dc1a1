//! Core agent implementation - the multi-turn orchestration loop
//!
//! One turn: send history to the gateway, parse the reply, gate and execute
//! each recovered tool call strictly in parse order, append the results,
//! decide whether to continue. Tool-level failures are deliberately fed
//! back to the model as correctable signals; only a gateway failure or an
//! unparseable reply ends the task early.

use crate::confirm::{ConfirmationDecision, ConfirmationGate, FinalDecision};
use crate::conversation::ConversationState;
use crate::parser::{detects_completion, parse_tool_calls, ToolCallRequest};
use crate::prompt::build_system_prompt;
use ember_foundation::Config;
use ember_provider::LlmGateway;
use ember_tool::{ToolRegistry, ToolResult};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{info, warn};

/// How a task execution ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOutcome {
    /// The model signalled completion
    Completed,

    /// The turn budget ran out; not a failure
    TurnLimitReached,

    /// No tool call and no completion signal could be recovered
    Unparseable,

    /// The model endpoint failed; no retry is attempted
    GatewayFailed(String),
}

impl TaskOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, TaskOutcome::Unparseable | TaskOutcome::GatewayFailed(_))
    }
}

/// Summary of a finished task execution
#[derive(Debug, Clone)]
pub struct TaskReport {
    pub outcome: TaskOutcome,
    pub turns: usize,
    pub tool_calls_executed: usize,
}

/// Events emitted while a task runs, consumed by the interface layer
#[derive(Debug, Clone)]
pub enum AgentEvent {
    /// A new turn begins
    TurnStart { turn: usize, max_turns: usize },

    /// The model replied
    ModelResponded { latency_ms: u64, total_tokens: u32 },

    /// A tool call is about to be gated/executed
    ToolRequested {
        name: String,
        reasoning: String,
        parameters: Value,
        index: usize,
        total: usize,
    },

    /// A tool call finished (including cancelled and not-found)
    ToolFinished {
        name: String,
        success: bool,
        summary: String,
    },

    /// Something the user should see but the loop survives
    Warning(String),
}

/// The agent that drives one task to completion
pub struct Agent {
    config: Config,
    gateway: Arc<dyn LlmGateway>,
    tools: Arc<ToolRegistry>,
    gate: Arc<dyn ConfirmationGate>,
}

impl Agent {
    /// Create an agent for an immutable session configuration.
    /// Reconfiguration means constructing a new agent.
    pub fn new(
        config: Config,
        gateway: Arc<dyn LlmGateway>,
        tools: Arc<ToolRegistry>,
        gate: Arc<dyn ConfirmationGate>,
    ) -> Self {
        Self {
            config,
            gateway,
            tools,
            gate,
        }
    }

    /// Execute a task with the multi-turn conversation loop.
    pub async fn run_task(&self, task: &str, events: mpsc::Sender<AgentEvent>) -> TaskReport {
        let mut state = ConversationState::new();
        state.add_system(build_system_prompt(
            &self.config.workspace,
            &self.tools.definitions(),
        ));
        state.add_user(format!(
            "Task: {}\nWorkspace: {}",
            task,
            self.config.workspace.display()
        ));

        let mut executed = 0usize;

        loop {
            let turn = state.turn_index();
            let _ = events
                .send(AgentEvent::TurnStart {
                    turn,
                    max_turns: self.config.max_turns,
                })
                .await;

            let completion = match self
                .gateway
                .generate(
                    state.messages(),
                    self.config.temperature,
                    self.config.max_tokens,
                )
                .await
            {
                Ok(completion) => completion,
                Err(e) => {
                    warn!("Gateway failed: {}", e);
                    state.set_terminal();
                    return TaskReport {
                        outcome: TaskOutcome::GatewayFailed(e.to_string()),
                        turns: turn,
                        tool_calls_executed: executed,
                    };
                }
            };

            let _ = events
                .send(AgentEvent::ModelResponded {
                    latency_ms: completion.latency_ms,
                    total_tokens: completion.usage.total_tokens,
                })
                .await;

            state.add_assistant(&completion.content);

            let calls = parse_tool_calls(&completion.content);
            if calls.is_empty() {
                state.set_terminal();
                return if detects_completion(&completion.content) {
                    info!("Task completed after {} turn(s)", turn);
                    TaskReport {
                        outcome: TaskOutcome::Completed,
                        turns: turn,
                        tool_calls_executed: executed,
                    }
                } else {
                    let _ = events
                        .send(AgentEvent::Warning(
                            "No tool calls detected. Model may not understand the format."
                                .to_string(),
                        ))
                        .await;
                    TaskReport {
                        outcome: TaskOutcome::Unparseable,
                        turns: turn,
                        tool_calls_executed: executed,
                    }
                };
            }

            // Execute strictly in parse order; each call fully completes
            // (including its confirmation prompt) before the next begins
            let total = calls.len();
            let mut results = Vec::with_capacity(total);
            for (i, call) in calls.iter().enumerate() {
                let result = self.execute_call(call, i + 1, total, &events).await;
                executed += 1;
                results.push(format!("{}: {}", call.tool_name, result_summary(&result)));
            }

            // Reaching the cap terminates without marking the task failed
            if turn == self.config.max_turns {
                state.set_terminal();
                return TaskReport {
                    outcome: TaskOutcome::TurnLimitReached,
                    turns: turn,
                    tool_calls_executed: executed,
                };
            }

            state.add_user(format!(
                "Results:\n{}\n\nContinue or say 'Task completed'.",
                results.join("\n")
            ));
            state.begin_next_turn();
        }
    }

    /// Resolve, gate, and execute one tool call. Every failure mode folds
    /// into the returned result.
    async fn execute_call(
        &self,
        call: &ToolCallRequest,
        index: usize,
        total: usize,
        events: &mpsc::Sender<AgentEvent>,
    ) -> ToolResult {
        let _ = events
            .send(AgentEvent::ToolRequested {
                name: call.tool_name.clone(),
                reasoning: call.reasoning.clone(),
                parameters: call.parameters.clone(),
                index,
                total,
            })
            .await;

        let result = match self.tools.get(&call.tool_name) {
            None => ToolResult::error(format!("Tool not found: {}", call.tool_name)),
            Some(tool) => {
                if tool.definition().requires_confirmation {
                    match self.gate.decide(call).await {
                        ConfirmationDecision::Proceed => {
                            tool.execute(call.parameters.clone()).await
                        }
                        ConfirmationDecision::Cancel => ToolResult::cancelled(),
                        ConfirmationDecision::ViewFullContent => {
                            let content = call
                                .parameters
                                .get("content")
                                .and_then(|v| v.as_str())
                                .unwrap_or("(no content parameter)");
                            self.gate.show_content(content).await;
                            match self.gate.decide_final(call).await {
                                FinalDecision::Proceed => {
                                    tool.execute(call.parameters.clone()).await
                                }
                                FinalDecision::Cancel => ToolResult::cancelled(),
                            }
                        }
                    }
                } else {
                    tool.execute(call.parameters.clone()).await
                }
            }
        };

        let _ = events
            .send(AgentEvent::ToolFinished {
                name: call.tool_name.clone(),
                success: result.success,
                summary: result_summary(&result),
            })
            .await;

        result
    }
}

/// The per-call line fed back to the model
fn result_summary(result: &ToolResult) -> String {
    if result.success {
        if result.output.is_empty() {
            "Success".to_string()
        } else {
            result.output.clone()
        }
    } else if let Some(error) = &result.error {
        format!("Error: {}", error)
    } else {
        // Cancelled calls carry their text in output
        result.output.clone()
    }
}
