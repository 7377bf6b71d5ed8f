//! Compiled content-filter pattern tables.
//!
//! Pattern groups cover PII, prompt-injection phrasings, harm vocabulary,
//! harassment, and the disallowed-item labels. All patterns are compiled
//! once at first use.

use std::sync::LazyLock;

use regex::Regex;

/// Marker substituted for redacted spans.
pub const REDACTION_MARKER: &str = "[REDACTED]";

/// PII patterns: government-ID-like, phone-like, email, and street-address
/// shaped text.
pub static PII_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        // SSN-like
        Regex::new(r"\b\d{3}-\d{2}-\d{4}\b").unwrap(),
        // phone-like
        Regex::new(r"\b\d{3}-\d{3}-\d{4}\b").unwrap(),
        // email
        Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").unwrap(),
        // street address
        Regex::new(r"(?i)\b\d{1,5}\s\w+\s(street|st|avenue|ave|road|rd|boulevard|blvd|lane|ln|drive|dr)\b")
            .unwrap(),
    ]
});

/// Prompt-injection phrasings with no allowed continuation.
///
/// Role-override attempts (`act as`, `pretend`) carry an allowed
/// continuation and are handled by [`role_override_spans`].
pub static INJECTION_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r"(?i)ignore\s+(previous|above|all)\s+(instructions|prompts|rules)").unwrap(),
        Regex::new(r"(?i)forget\s+(everything|all|previous)").unwrap(),
        Regex::new(r"(?i)system\s*[:=]\s*").unwrap(),
        Regex::new(r"(?i)\[system\]").unwrap(),
        Regex::new(r"(?i)assistant\s*[:=]\s*").unwrap(),
        Regex::new(r"(?i)reveal\s+(secret|key|password|token)").unwrap(),
        Regex::new(r"(?i)output\s+(your|the)\s+(instructions|prompt|system)").unwrap(),
    ]
});

/// Explicit harm/weapon/drug/exploit vocabulary.
pub static HARM_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(
            r"(?i)\b(weapon|gun|knife|explosive|bomb|violence|attack|harm|kill|murder|suicide)\b",
        )
        .unwrap(),
        Regex::new(r"(?i)\b(drug|cocaine|heroin|meth|marijuana|prescription)\b").unwrap(),
        Regex::new(r"(?i)\b(hack|exploit|bypass|jailbreak|crack)\b").unwrap(),
    ]
});

/// Harassment vocabulary.
pub static HARASSMENT_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r"(?i)\b(hate|discriminat|racist|sexist|homophob|transphob)\b").unwrap(),
        Regex::new(r"(?i)\b(stupid|idiot|retard|moron|dumb)\b").unwrap(),
        Regex::new(r"(?i)\b(kill\s+yourself|kys)\b").unwrap(),
    ]
});

static ACT_AS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bact\s+as\s+([A-Za-z]+)").unwrap());

static PRETEND: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bpretend\b(\s+to\s+be\s+[A-Za-z]+)?").unwrap());

/// Byte spans of role-override attempts in `text`.
///
/// `act as accessibility` and `pretend to be helpful` are the only allowed
/// continuations; any other `act as X` / `pretend ...` counts.
pub fn role_override_spans(text: &str) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();

    for caps in ACT_AS.captures_iter(text) {
        let role = caps.get(1).map(|m| m.as_str().to_lowercase());
        if role.as_deref() != Some("accessibility") {
            let m = caps.get(0).expect("whole match");
            spans.push((m.start(), m.end()));
        }
    }

    for caps in PRETEND.captures_iter(text) {
        let continuation = caps
            .get(1)
            .map(|m| m.as_str().to_lowercase())
            .unwrap_or_default();
        let allowed = continuation
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            == "to be helpful";
        if !allowed {
            let m = caps.get(0).expect("whole match");
            spans.push((m.start(), m.end()));
        }
    }

    spans
}

/// Labels the finder refuses to teach or search for.
pub const ILLEGAL_ITEM_LABELS: &[&str] = &[
    "weapon",
    "gun",
    "knife",
    "explosive",
    "bomb",
    "drug",
    "cocaine",
    "heroin",
    "meth",
    "marijuana",
    "prescription",
    "stolen",
    "illegal",
    "contraband",
    "ammunition",
    "firearm",
    "narcotic",
    "controlled substance",
];
