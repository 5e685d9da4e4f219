//! Bounded JSON repair for model output
//!
//! One strict decode, then at most one repair pass. The pass runs every
//! heuristic in a fixed order and re-decodes once. Nothing loops.

use std::fmt;

use serde_json::Value;
use tracing::{debug, warn};

/// One text transformation applied during the repair pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepairAction {
    /// Markdown code fences or prose around the JSON block removed
    StripWrapper,
    /// Typographic quotes replaced with ASCII quotes
    NormalizeQuotes,
    /// Commas before a closing bracket removed
    RemoveTrailingCommas,
    /// Unterminated string or missing brackets closed
    CloseBrackets,
}

impl RepairAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StripWrapper => "strip_wrapper",
            Self::NormalizeQuotes => "normalize_quotes",
            Self::RemoveTrailingCommas => "remove_trailing_commas",
            Self::CloseBrackets => "close_brackets",
        }
    }
}

impl fmt::Display for RepairAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of decoding raw model text
#[derive(Debug, Clone, PartialEq)]
pub enum DecodeOutcome {
    /// Strict decode succeeded
    Decoded(Value),
    /// Decode succeeded after the repair pass
    Repaired { value: Value, actions: Vec<RepairAction> },
    /// Repair pass did not produce valid JSON
    Failed { actions: Vec<RepairAction>, error: String },
}

impl DecodeOutcome {
    /// Number of repair actions that changed the text
    pub fn repair_count(&self) -> u32 {
        match self {
            Self::Decoded(_) => 0,
            Self::Repaired { actions, .. } | Self::Failed { actions, .. } => actions.len() as u32,
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            Self::Decoded(_) => "decoded",
            Self::Repaired { .. } => "repaired",
            Self::Failed { .. } => "failed",
        }
    }
}

/// Decode model text as JSON, repairing it once if needed
pub fn decode(raw: &str) -> DecodeOutcome {
    let trimmed = raw.trim();
    debug!(len = trimmed.len(), "decode: called");

    let strict_error = match serde_json::from_str::<Value>(trimmed) {
        Ok(value) => {
            debug!("decode: strict decode succeeded");
            return DecodeOutcome::Decoded(value);
        }
        Err(e) => e,
    };
    debug!(error = %strict_error, "decode: strict decode failed, running repair pass");

    let (repaired, actions) = repair(trimmed);
    match serde_json::from_str::<Value>(&repaired) {
        Ok(value) => {
            debug!(?actions, "decode: repaired");
            DecodeOutcome::Repaired { value, actions }
        }
        Err(e) => {
            warn!(?actions, error = %e, "Model response could not be repaired");
            DecodeOutcome::Failed {
                actions,
                error: e.to_string(),
            }
        }
    }
}

/// Run every heuristic once, recording the ones that changed the text
fn repair(text: &str) -> (String, Vec<RepairAction>) {
    let mut actions = Vec::new();
    let mut current = text.to_string();

    let steps: [(RepairAction, fn(&str) -> String); 4] = [
        (RepairAction::StripWrapper, strip_wrapper),
        (RepairAction::NormalizeQuotes, normalize_quotes),
        (RepairAction::RemoveTrailingCommas, remove_trailing_commas),
        (RepairAction::CloseBrackets, close_brackets),
    ];

    for (action, step) in steps {
        let next = step(&current);
        if next != current {
            debug!(%action, "repair: applied");
            actions.push(action);
            current = next;
        }
    }

    (current, actions)
}

/// Drop code fences and any prose around the JSON block
fn strip_wrapper(text: &str) -> String {
    let unfenced = match text.find("```") {
        Some(open) => {
            let after = &text[open + 3..];
            // Skip an info string such as `json`
            let body_start = after.find('\n').map(|i| i + 1).unwrap_or(0);
            let body = &after[body_start..];
            match body.find("```") {
                Some(close) => &body[..close],
                None => body,
            }
        }
        None => text,
    };

    // Scan top-level blocks left to right. Bracketed prose such as
    // "my top [3] picks" closes early and is passed over; a block that never
    // closes is the truncated response itself.
    let mut fallback: Option<&str> = None;
    let mut pos = 0;
    while let Some(offset) = unfenced[pos..].find(['{', '[']) {
        let start = pos + offset;
        let candidate = &unfenced[start..];
        let Some(end) = value_end(candidate) else {
            debug!(start, "strip_wrapper: unclosed block runs to the end");
            return candidate.trim().to_string();
        };
        let block = &candidate[..end];
        if serde_json::from_str::<Value>(block).is_ok_and(|v| is_plan_shaped(&v)) {
            debug!(start, "strip_wrapper: found decodable block");
            return block.trim().to_string();
        }
        let prefer = block.starts_with('{') && !fallback.is_some_and(|f| f.starts_with('{'));
        if fallback.is_none() || prefer {
            fallback = Some(block);
        }
        pos = start + end;
    }

    fallback.unwrap_or(unfenced).trim().to_string()
}

/// An object, or an array holding at least one object
fn is_plan_shaped(value: &Value) -> bool {
    match value {
        Value::Object(_) => true,
        Value::Array(items) => items.iter().any(Value::is_object),
        _ => false,
    }
}

/// Byte offset just past the value that opens at index 0, if it closes
fn value_end(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in text.char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' | '[' => depth += 1,
            '}' | ']' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(i + c.len_utf8());
                }
            }
            _ => {}
        }
    }
    None
}

fn normalize_quotes(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{201F}' => '"',
            '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{201B}' => '\'',
            other => other,
        })
        .collect()
}

/// Remove commas followed only by whitespace and a closer (or end of text)
fn remove_trailing_commas(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut in_string = false;
    let mut escaped = false;

    for (i, &c) in chars.iter().enumerate() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            out.push(c);
            continue;
        }
        if c == '"' {
            in_string = true;
        }
        if c == ',' {
            let next = chars[i + 1..].iter().find(|ch| !ch.is_whitespace());
            if matches!(next, None | Some('}') | Some(']')) {
                continue;
            }
        }
        out.push(c);
    }
    out
}

/// Close an unterminated string, then any open arrays and objects
fn close_brackets(text: &str) -> String {
    let mut stack = Vec::new();
    let mut in_string = false;
    let mut escaped = false;

    for c in text.chars() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => stack.push('}'),
            '[' => stack.push(']'),
            '}' | ']' => {
                stack.pop();
            }
            _ => {}
        }
    }

    if !in_string && stack.is_empty() {
        return text.to_string();
    }

    let mut out = text.to_string();
    if in_string {
        if escaped {
            out.pop();
        }
        out.push('"');
    }

    let trimmed_len = out.trim_end().len();
    out.truncate(trimmed_len);
    if out.ends_with(',') {
        out.pop();
    } else if out.ends_with(':') {
        out.push_str("null");
    }

    while let Some(closer) = stack.pop() {
        out.push(closer);
    }
    out
}
