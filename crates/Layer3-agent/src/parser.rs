//! Tool call parsing - recovers structured invocations from raw model text
//!
//! Local models emit structured intent inconsistently: sometimes clean
//! fenced JSON, sometimes provider-specific channel markers, sometimes
//! output truncated mid-value by the generation limit. Parsing cascades
//! through three tiers, each attempted only when the previous one produced
//! nothing, trading precision for recall as it goes. Parsing never fails;
//! the worst case is an empty result.

use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

/// Marker tokens some local models wrap JSON payloads in
const MARKER_TOKENS: &[&str] = &["<|constrain|>json<|message|>", "<|message|>"];

/// Words that signal the model considers the task finished. Scanned only
/// when no tool call parses. Known-fragile: a stray "success" mid-sentence
/// counts, and a novel phrasing does not.
const COMPLETION_WORDS: &[&str] = &["done", "completed", "finished", "success", "task completed"];

/// A structured tool invocation recovered from model output
#[derive(Debug, Clone, PartialEq)]
pub struct ToolCallRequest {
    /// Name of the tool to invoke
    pub tool_name: String,

    /// Arguments as a JSON object
    pub parameters: Value,

    /// Model-stated rationale, empty when absent
    pub reasoning: String,
}

/// Extract tool calls from a model reply. Returns the calls in the order
/// they appear; an unparseable reply yields an empty list, never an error.
pub fn parse_tool_calls(text: &str) -> Vec<ToolCallRequest> {
    let calls = parse_fenced_blocks(text);
    if !calls.is_empty() {
        return calls;
    }

    let calls = parse_marker_blocks(text);
    if !calls.is_empty() {
        return calls;
    }

    parse_brace_scan(text)
}

/// Check the completion-word heuristic (case-insensitive substring scan)
pub fn detects_completion(text: &str) -> bool {
    let lowered = text.to_lowercase();
    COMPLETION_WORDS.iter().any(|word| lowered.contains(word))
}

// ============================================================================
// Tier 1: fenced ```json blocks
// ============================================================================

fn fence_regex() -> &'static Regex {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    FENCE.get_or_init(|| {
        Regex::new(r"(?si)```json\s*\n(.*?)\n\s*```").expect("fence regex is valid")
    })
}

fn parse_fenced_blocks(text: &str) -> Vec<ToolCallRequest> {
    let mut calls = Vec::new();
    for captures in fence_regex().captures_iter(text) {
        let body = captures[1].trim();
        // One bad block does not abort the scan of the others
        match serde_json::from_str::<Value>(body) {
            Ok(value) => {
                if let Some(call) = request_from_value(&value) {
                    calls.push(call);
                }
            }
            Err(e) => {
                tracing::debug!("Skipping unparseable fenced block: {}", e);
            }
        }
    }
    calls
}

// ============================================================================
// Tier 2: marker-delimited recovery
// ============================================================================

fn parse_marker_blocks(text: &str) -> Vec<ToolCallRequest> {
    for marker in MARKER_TOKENS {
        let mut calls = Vec::new();
        let mut search_from = 0;

        while let Some(offset) = text[search_from..].find(*marker) {
            let after = search_from + offset + marker.len();
            search_from = after;

            let body = text[after..].trim_start();
            if !body.starts_with('{') {
                continue;
            }

            match balanced_object_end(body) {
                Some(end) => {
                    if let Ok(value) = serde_json::from_str::<Value>(&body[..end]) {
                        if let Some(call) = request_from_value(&value) {
                            calls.push(call);
                        }
                    }
                }
                None => {
                    // Depth never returned to zero: the generation was cut
                    // off. Append the missing closers and retry once.
                    let deficit = open_brace_deficit(body);
                    if deficit > 0 {
                        let repaired = format!("{}{}", body, "}".repeat(deficit));
                        if let Ok(value) = serde_json::from_str::<Value>(&repaired) {
                            if let Some(call) = request_from_value(&value) {
                                tracing::debug!(tool = %call.tool_name, "Recovered truncated tool call");
                                calls.push(call);
                            }
                        }
                    }
                }
            }
        }

        // Stop after the first marker type that yields anything
        if !calls.is_empty() {
            return calls;
        }
    }
    Vec::new()
}

// ============================================================================
// Tier 3: last-resort brace scan
// ============================================================================

fn parse_brace_scan(text: &str) -> Vec<ToolCallRequest> {
    for (i, c) in text.char_indices() {
        if c != '{' {
            continue;
        }
        if let Some(end) = balanced_object_end(&text[i..]) {
            if let Ok(value) = serde_json::from_str::<Value>(&text[i..i + end]) {
                if let Some(call) = request_from_value(&value) {
                    // Accept the first object carrying a "tool" key
                    return vec![call];
                }
            }
        }
    }
    Vec::new()
}

// ============================================================================
// Shared helpers
// ============================================================================

/// Build a request from a JSON value if it is an object with a "tool" key
fn request_from_value(value: &Value) -> Option<ToolCallRequest> {
    let object = value.as_object()?;
    let tool_name = object.get("tool")?.as_str()?.to_string();
    let parameters = object
        .get("parameters")
        .cloned()
        .unwrap_or_else(|| Value::Object(serde_json::Map::new()));
    let reasoning = object
        .get("reason")
        .or_else(|| object.get("reasoning"))
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string();

    Some(ToolCallRequest {
        tool_name,
        parameters,
        reasoning,
    })
}

/// Byte offset just past the `}` matching the `{` the text starts with.
/// Braces inside string literals do not count.
fn balanced_object_end(text: &str) -> Option<usize> {
    debug_assert!(text.starts_with('{'));
    let mut depth = 0i32;
    let mut in_string = false;
    let mut escape_next = false;

    for (i, c) in text.char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }
        match c {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            '{' if !in_string => depth += 1,
            '}' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            _ => {}
        }
    }
    None
}

/// Number of `{` left unmatched at end-of-text (outside string literals)
fn open_brace_deficit(text: &str) -> usize {
    let mut depth = 0i32;
    let mut in_string = false;
    let mut escape_next = false;

    for c in text.chars() {
        if escape_next {
            escape_next = false;
            continue;
        }
        match c {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            '{' if !in_string => depth += 1,
            '}' if !in_string => depth -= 1,
            _ => {}
        }
    }
    depth.max(0) as usize
}
