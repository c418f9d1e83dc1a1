//! Command implementations

use crate::confirm::InteractiveGate;
use crate::ui;
use anyhow::{anyhow, Result};
use ember_agent::{Agent, AgentEvent, AutoApproveGate, ConfirmationGate, TaskOutcome};
use ember_core::{CommandExecutor, Workspace};
use ember_foundation::Config;
use ember_provider::create_gateway;
use ember_tool::ToolRegistry;
use std::sync::Arc;
use tokio::sync::mpsc;

fn build_workspace(config: &Config) -> Result<Arc<Workspace>> {
    Ok(Arc::new(Workspace::new(
        &config.workspace,
        &config.ignore_patterns,
    )?))
}

fn build_registry(config: &Config) -> Result<Arc<ToolRegistry>> {
    let workspace = build_workspace(config)?;
    let executor = Arc::new(CommandExecutor::new(&config.workspace));
    Ok(Arc::new(ToolRegistry::with_builtins(
        workspace,
        executor,
        config.safe_mode,
    )))
}

/// Execute a task with the autonomous agent
pub async fn run_task(config: Config, task: &str, auto_approve: bool) -> Result<()> {
    ui::print_logo();
    ui::print_info(&format!("Workspace:  {}", config.workspace.display()));
    ui::print_info(&format!("Provider:   {}", config.provider));
    ui::print_info(&format!("Endpoint:   {}", config.endpoint));
    ui::print_info(&format!("Model:      {}", config.model));
    println!();

    let gateway = create_gateway(&config)?;
    if !gateway.ping().await {
        ui::print_warning(&format!(
            "Model server at {} is not responding; the first turn may fail",
            config.endpoint
        ));
    }

    let tools = build_registry(&config)?;
    let gate: Arc<dyn ConfirmationGate> = if auto_approve {
        Arc::new(AutoApproveGate)
    } else {
        Arc::new(InteractiveGate)
    };

    ui::print_separator();
    ui::print_bold("AGENT EXECUTION STARTED");
    ui::print_separator();
    println!();
    ui::print_bold(&format!("Task: {}", task));

    let agent = Agent::new(config, gateway, tools, gate);
    let (tx, rx) = mpsc::channel(100);
    let renderer = tokio::spawn(render_events(rx));

    let report = agent.run_task(task, tx).await;
    let _ = renderer.await;

    println!();
    ui::print_separator();
    match report.outcome {
        TaskOutcome::Completed => {
            ui::print_success(&format!(
                "Task completed in {} turn(s), {} tool call(s)",
                report.turns, report.tool_calls_executed
            ));
            Ok(())
        }
        TaskOutcome::TurnLimitReached => {
            ui::print_warning(&format!(
                "Turn budget exhausted after {} turn(s); the task was not declared complete",
                report.turns
            ));
            Ok(())
        }
        TaskOutcome::Unparseable => Err(anyhow!(
            "Model response format was not understood; aborting after {} turn(s)",
            report.turns
        )),
        TaskOutcome::GatewayFailed(message) => Err(anyhow!("LLM request failed: {}", message)),
    }
}

/// Render agent progress events to the console
async fn render_events(mut rx: mpsc::Receiver<AgentEvent>) {
    while let Some(event) = rx.recv().await {
        match event {
            AgentEvent::TurnStart { turn, max_turns } => {
                println!("\n[Turn {}/{}]", turn, max_turns);
                ui::print_info("Requesting AI action...");
            }
            AgentEvent::ModelResponded {
                latency_ms,
                total_tokens,
            } => {
                if total_tokens > 0 {
                    ui::print_success(&format!(
                        "Response ({} ms, {} tokens)",
                        latency_ms, total_tokens
                    ));
                } else {
                    ui::print_success(&format!("Response ({} ms)", latency_ms));
                }
            }
            AgentEvent::ToolRequested {
                name,
                reasoning,
                parameters,
                index,
                total,
            } => {
                ui::print_separator();
                println!("\n>> AI wants to: {} [{}/{}]", name, index, total);
                if !reasoning.is_empty() {
                    println!("   Reason: {}", reasoning);
                }
                if let Some(object) = parameters.as_object() {
                    if !object.is_empty() {
                        println!("\n   Parameters:");
                        for (key, value) in object {
                            let rendered = match value.as_str() {
                                Some(s) => s.to_string(),
                                None => value.to_string(),
                            };
                            println!("     - {}: {}", key, ui::truncate(&rendered, 200));
                        }
                    }
                }
                println!();
            }
            AgentEvent::ToolFinished {
                name,
                success,
                summary,
            } => {
                if success {
                    ui::print_success(&format!("{}: {}", name, ui::truncate(&summary, 200)));
                } else {
                    ui::print_error(&format!("{}: {}", name, ui::truncate(&summary, 200)));
                }
            }
            AgentEvent::Warning(message) => {
                ui::print_warning(&message);
            }
        }
    }
}

/// List the registered tools and their confirmation classes
pub fn show_tools(config: &Config) -> Result<()> {
    let registry = build_registry(config)?;
    ui::print_header("Available Tools");
    println!();
    for (i, def) in registry.definitions().iter().enumerate() {
        let class = if def.requires_confirmation {
            "[Confirm]"
        } else {
            "[Auto]"
        };
        println!("  {}. {} {}", i + 1, def.name, class);
        println!("     {}", def.description);
        println!();
    }
    Ok(())
}

/// Show the session configuration
pub async fn show_status(config: &Config) -> Result<()> {
    let registry = build_registry(config)?;
    ui::print_header("Agent Status");
    println!();
    println!("  Workspace:   {}", config.workspace.display());
    println!("  Provider:    {}", config.provider);
    println!("  Endpoint:    {}", config.endpoint);
    println!("  Model:       {}", config.model);
    println!("  Max turns:   {}", config.max_turns);
    println!("  Safe mode:   {}", if config.safe_mode { "on" } else { "off" });
    println!("  Tools:       {}", registry.len());
    println!();
    Ok(())
}

/// Test the model server connection
pub async fn ping(config: &Config) -> Result<()> {
    ui::print_header("Testing LLM Connection");
    let gateway = create_gateway(config)?;
    if gateway.ping().await {
        ui::print_success(&format!("Model server at {} is reachable", config.endpoint));
        Ok(())
    } else {
        ui::print_error(&format!(
            "Model server at {} is not responding",
            config.endpoint
        ));
        Err(anyhow!("connection test failed"))
    }
}

/// Print the workspace directory tree
pub fn show_tree(config: &Config, max_depth: usize) -> Result<()> {
    let workspace = build_workspace(config)?;
    ui::print_header("Directory Tree");
    println!("{}", workspace.get_tree(max_depth));
    Ok(())
}

/// Print code statistics for the workspace
pub fn analyze(config: &Config, pattern: &str) -> Result<()> {
    let workspace = build_workspace(config)?;
    let stats = workspace.count_lines(pattern);

    ui::print_header(&format!("Code Analysis ({})", pattern));
    println!();
    println!("  Total Files:    {}", stats.total_files);
    println!("  Total Lines:    {}", stats.total_lines);
    println!("  Code Lines:     {}", stats.code_lines);
    println!("  Comment Lines:  {}", stats.comment_lines);
    println!("  Blank Lines:    {}", stats.blank_lines);
    println!();
    if stats.total_lines > 0 {
        let code_ratio = stats.code_lines as f64 / stats.total_lines as f64 * 100.0;
        let comment_ratio = stats.comment_lines as f64 / stats.total_lines as f64 * 100.0;
        println!("  Code Ratio:     {:.1}%", code_ratio);
        println!("  Comment Ratio:  {:.1}%", comment_ratio);
        println!();
    }
    Ok(())
}
