//! Cloud request validation.
//!
//! Checks run in a fixed order and the first failure wins: consent, task
//! allowlist, harassment, prompt injection, then task-specific length
//! bounds. Failures are values, never errors.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::patterns::{
    HARASSMENT_PATTERNS, ILLEGAL_ITEM_LABELS, INJECTION_PATTERNS, role_override_spans,
};

/// Tasks permitted to reach the cloud endpoint. Anything else is rejected.
pub const ALLOWED_TASKS: &[&str] = &["describe-scene", "answer-question", "summarize-usage"];

/// Maximum input length for the describe-scene task.
const DESCRIBE_SCENE_MAX_INPUT: usize = 1000;

/// A request to offload work to the cloud vision endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloudRequest {
    /// Requested task; must be on [`ALLOWED_TASKS`].
    pub task: String,
    /// Free-text input accompanying the task.
    pub input: String,
    /// Whether the user has explicitly opted in to cloud processing.
    pub user_opted_in: bool,
}

/// Outcome of validating a [`CloudRequest`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Validation {
    /// Whether the request may proceed.
    pub valid: bool,
    /// Rejection reason, present when `valid` is false.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl Validation {
    fn ok() -> Self {
        Self {
            valid: true,
            reason: None,
        }
    }

    fn rejected(reason: impl Into<String>) -> Self {
        Self {
            valid: false,
            reason: Some(reason.into()),
        }
    }
}

/// Whether `task` is on the allowlist.
#[must_use]
pub fn is_task_allowed(task: &str) -> bool {
    ALLOWED_TASKS.contains(&task)
}

/// Whether `text` matches the harassment vocabulary.
#[must_use]
pub fn contains_harassment(text: &str) -> bool {
    HARASSMENT_PATTERNS.iter().any(|p| p.is_match(text))
}

/// Whether `text` contains a prompt-injection attempt.
#[must_use]
pub fn contains_prompt_injection(text: &str) -> bool {
    INJECTION_PATTERNS.iter().any(|p| p.is_match(text)) || !role_override_spans(text).is_empty()
}

/// Whether `label` names a disallowed item.
///
/// Exact match or bidirectional substring overlap against the fixed
/// vocabulary, so "my gun case" and "gu" both hit the "gun" entry.
#[must_use]
pub fn is_illegal_item_label(label: &str) -> bool {
    let normalized = label.trim().to_lowercase();
    if normalized.is_empty() {
        return false;
    }

    ILLEGAL_ITEM_LABELS
        .iter()
        .any(|illegal| normalized == *illegal || normalized.contains(illegal) || illegal.contains(normalized.as_str()))
}

/// Validate a cloud request. Never errs; rejection reasons are values.
pub fn validate(request: &CloudRequest) -> Validation {
    if !request.user_opted_in {
        return Validation::rejected("User has not opted in to cloud processing");
    }

    if !is_task_allowed(&request.task) {
        debug!(task = %request.task, "task rejected by allowlist");
        return Validation::rejected(format!("Task '{}' is not allowed", request.task));
    }

    if contains_harassment(&request.input) {
        return Validation::rejected("Input contains inappropriate content");
    }

    if contains_prompt_injection(&request.input) {
        return Validation::rejected("Input contains prompt injection attempt");
    }

    if request.task == "describe-scene" && request.input.chars().count() > DESCRIBE_SCENE_MAX_INPUT
    {
        return Validation::rejected("Scene description input too long");
    }

    Validation::ok()
}
