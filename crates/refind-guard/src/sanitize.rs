//! Input and speech-output sanitizers.

use std::sync::LazyLock;

use regex::Regex;

use crate::patterns::{
    HARM_PATTERNS, INJECTION_PATTERNS, PII_PATTERNS, REDACTION_MARKER, role_override_spans,
};

/// Maximum input length forwarded to the cloud path.
const MAX_INPUT_LEN: usize = 2000;

/// Maximum text length handed to speech synthesis, bounding audio duration.
const MAX_TTS_LEN: usize = 120;

static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"https?://\S+").unwrap());

static TTS_PHONE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r"\b\d{3}-\d{3}-\d{4}\b").unwrap(),
        Regex::new(r"\(\d{3}\)\s*\d{3}-\d{4}").unwrap(),
    ]
});

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").unwrap());

/// Sanitize free text before it may reach the cloud path.
///
/// Trims, truncates to 2000 chars (with an ellipsis marker), then replaces
/// every match of the PII, injection, and harm pattern groups with
/// [`REDACTION_MARKER`].
pub fn sanitize_input(input: &str) -> String {
    let mut sanitized = input.trim().to_owned();

    if sanitized.chars().count() > MAX_INPUT_LEN {
        sanitized = sanitized.chars().take(MAX_INPUT_LEN).collect::<String>() + "...";
    }

    for pattern in PII_PATTERNS
        .iter()
        .chain(INJECTION_PATTERNS.iter())
        .chain(HARM_PATTERNS.iter())
    {
        sanitized = pattern
            .replace_all(&sanitized, REDACTION_MARKER)
            .into_owned();
    }

    redact_spans(&sanitized, &role_override_spans(&sanitized))
}

/// Replace the given byte spans with the redaction marker.
///
/// Spans are applied back-to-front so earlier offsets stay valid. Overlapping
/// spans are merged by the ordering.
fn redact_spans(text: &str, spans: &[(usize, usize)]) -> String {
    if spans.is_empty() {
        return text.to_owned();
    }
    let mut sorted = spans.to_vec();
    sorted.sort_by_key(|s| s.0);
    sorted.dedup();

    let mut result = text.to_owned();
    for (start, end) in sorted.into_iter().rev() {
        if start <= result.len() && end <= result.len() && start < end {
            result.replace_range(start..end, REDACTION_MARKER);
        }
    }
    result
}

/// Sanitize any text destined for speech synthesis.
///
/// Strips URLs, phone numbers, and email addresses, then truncates to 120
/// characters with an ellipsis. Idempotent: sanitizing already-sanitized
/// text returns it unchanged.
pub fn sanitize_tts_output(text: &str) -> String {
    let mut sanitized = text.trim().to_owned();

    sanitized = URL_PATTERN.replace_all(&sanitized, "").into_owned();
    for pattern in TTS_PHONE_PATTERNS.iter() {
        sanitized = pattern.replace_all(&sanitized, "").into_owned();
    }
    sanitized = EMAIL_PATTERN.replace_all(&sanitized, "").into_owned();

    if sanitized.chars().count() > MAX_TTS_LEN {
        sanitized = sanitized.chars().take(MAX_TTS_LEN - 3).collect::<String>() + "...";
    }

    sanitized
}
