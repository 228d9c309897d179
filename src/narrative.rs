//! Narrative isolation for raw SWIFT messages.
//!
//! MT799 bodies mix structured fields (`:20:` references, `:21:` related
//! references) with one free-text narrative. [`extract_narrative`] tries a
//! fixed chain of rules and returns the first non-empty candidate:
//!
//! 1. a `77E:` narrative field
//! 2. an explicit `Narrative:` label
//! 3. the last `NNa:` field tag in the message
//! 4. a `79:` narrative field, read from the line after its tag line (the
//!    tag line itself usually carries a reference)
//!
//! A candidate runs from its marker to the next field delimiter: a new line
//! opening another field tag, a `-` block trailer line, or a closing `}`.
//! When no rule yields text the trimmed input comes back unchanged, so
//! extraction never fails.

use std::sync::LazyLock;

use regex::Regex;

/// `77E:` or `:77E:` at the start of a line or block.
static FIELD_77E: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)(?:^|\{)[ \t]*:?77E:").unwrap());

/// Free-standing `Narrative:` label.
static NARRATIVE_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bnarrative[ \t]*:").unwrap());

/// Two digits plus a letter (`20C:`, `:79Z:`) at the start of a line or block.
static FIELD_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)(?:^|\{)[ \t]*:?\d{2}[A-Z]:").unwrap());

/// `79:` or `:79:` at the start of a line or block.
static FIELD_79: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)(?:^|\{)[ \t]*:?79:").unwrap());

/// End of a field: next tag line (letter optional), block trailer, or `}`.
static FIELD_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\r?\n[ \t]*(?::?\d{2}[A-Z]?:|-)|\}").unwrap());

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Extraction rules in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NarrativeRule {
    /// `77E:` narrative field.
    Field77E,
    /// Explicit `Narrative:` label.
    NarrativeLabel,
    /// Last two-digit-plus-letter field tag.
    LastFieldTag,
    /// `79:` narrative field.
    Field79,
}

impl NarrativeRule {
    /// All rules, highest priority first.
    pub const CHAIN: [NarrativeRule; 4] = [
        NarrativeRule::Field77E,
        NarrativeRule::NarrativeLabel,
        NarrativeRule::LastFieldTag,
        NarrativeRule::Field79,
    ];

    /// Rule name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Field77E => "field_77e",
            Self::NarrativeLabel => "narrative_label",
            Self::LastFieldTag => "last_field_tag",
            Self::Field79 => "field_79",
        }
    }

    /// Byte offset just past this rule's marker, if the marker occurs.
    fn marker_end(&self, raw: &str) -> Option<usize> {
        match self {
            Self::Field77E => FIELD_77E.find(raw).map(|m| m.end()),
            Self::NarrativeLabel => NARRATIVE_LABEL.find(raw).map(|m| m.end()),
            Self::LastFieldTag => FIELD_TAG.find_iter(raw).last().map(|m| m.end()),
            Self::Field79 => FIELD_79.find(raw).map(|m| m.end()),
        }
    }

    /// Apply this rule, returning the cleaned candidate if non-empty.
    pub fn apply(&self, raw: &str) -> Option<String> {
        let start = self.marker_end(raw)?;
        let tail = &raw[start..];
        let end = FIELD_END.find(tail).map_or(tail.len(), |m| m.start());
        let body = &tail[..end];
        let candidate = match self {
            Self::Field79 => skip_tag_line(body),
            _ => collapse_whitespace(body),
        };
        (!candidate.is_empty()).then_some(candidate)
    }
}

/// Isolate the narrative portion of a raw SWIFT message.
///
/// Total: returns the trimmed input when no rule matches.
pub fn extract_narrative(raw: &str) -> String {
    match extract_with_rule(raw) {
        Some((_, narrative)) => narrative,
        None => raw.trim().to_string(),
    }
}

/// Like [`extract_narrative`], but reports which rule matched.
///
/// Returns `None` when the fallback (whole message) applies.
pub fn extract_with_rule(raw: &str) -> Option<(NarrativeRule, String)> {
    NarrativeRule::CHAIN
        .iter()
        .find_map(|rule| rule.apply(raw).map(|text| (*rule, text)))
}

/// Body of a `79:` field without its tag line; the tag line alone when
/// nothing follows it.
fn skip_tag_line(body: &str) -> String {
    let rest = body
        .split_once('\n')
        .map(|(_, rest)| collapse_whitespace(rest))
        .unwrap_or_default();
    if rest.is_empty() {
        collapse_whitespace(body)
    } else {
        rest
    }
}

/// Trim, and fold line breaks and whitespace runs into single spaces.
fn collapse_whitespace(text: &str) -> String {
    WHITESPACE.replace_all(text.trim(), " ").into_owned()
}
