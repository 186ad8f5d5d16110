//! Pulling structured data out of free-form model replies.
//!
//! Models wrap JSON in markdown fences or surround it with chatter. Both are
//! tolerated here; anything else is reported as a malformed-output violation
//! so the retry loop can ask again.

use fabulist_error::Violation;
use serde::de::DeserializeOwned;

/// Most candidates considered per reply.
const MAX_CANDIDATES: usize = 16;

/// Extract the JSON payload from a reply that may contain markdown or extra text.
///
/// Strategies, in order:
/// 1. Markdown code blocks: ```json ... ``` or a bare ``` fence
/// 2. Balanced braces or brackets, in the order they open
///
/// The first candidate that is valid JSON wins. Bracketed prose such as
/// `[Part 1]` is skipped in favour of a later object.
///
/// # Errors
///
/// Returns a `Malformed` violation if no JSON-looking text is found.
///
/// # Examples
///
/// ```
/// use fabulist_narrative::extract_json;
///
/// let reply = "Here is the outline:\n```json\n{\"parts\": []}\n```\nEnjoy!";
/// assert_eq!(extract_json(reply).unwrap(), "{\"parts\": []}");
///
/// let chatty = "Sure! {\"speaker\": \"Max\", \"content\": \"Woof {happy}\"} Hope this helps.";
/// assert!(extract_json(chatty).unwrap().ends_with("\"}"));
/// ```
pub fn extract_json(response: &str) -> Result<String, Violation> {
    let candidates = json_candidates(response);

    if let Some(valid) = candidates
        .iter()
        .find(|c| serde_json::from_str::<serde_json::Value>(c).is_ok())
    {
        return Ok(valid.clone());
    }

    candidates.into_iter().next().ok_or_else(|| no_json(response))
}

/// Extract and deserialize a reply in one step.
///
/// Every candidate is tried in turn until one matches `T`.
///
/// # Errors
///
/// Returns a `Malformed` violation if no JSON is found or none of it matches `T`.
pub fn parse_reply<T: DeserializeOwned>(response: &str) -> Result<T, Violation> {
    let candidates = json_candidates(response);
    let mut last_error = None;

    for candidate in &candidates {
        match serde_json::from_str(candidate) {
            Ok(value) => return Ok(value),
            Err(e) => last_error = Some(e),
        }
    }

    match last_error {
        Some(e) => Err(Violation::malformed(format!(
            "reply JSON does not match the expected shape: {}",
            e
        ))),
        None => Err(no_json(response)),
    }
}

fn no_json(response: &str) -> Violation {
    tracing::debug!(response_length = response.len(), "No JSON found in model reply");
    Violation::malformed(format!(
        "no JSON found in reply of {} characters; reply with a single JSON object only",
        response.len()
    ))
}

/// Possible JSON payloads, most likely first.
fn json_candidates(response: &str) -> Vec<String> {
    let mut candidates = Vec::new();

    if let Some(block) = extract_from_code_block(response) {
        candidates.push(block);
    }

    for (start, open) in response.char_indices().filter(|(_, c)| *c == '{' || *c == '[') {
        if candidates.len() >= MAX_CANDIDATES {
            break;
        }
        let close = if open == '{' { '}' } else { ']' };
        if let Some(found) = extract_balanced(&response[start..], open, close)
            && !candidates.contains(&found)
        {
            candidates.push(found);
        }
    }

    candidates
}

/// Content of the first markdown code block, with any language tag skipped.
fn extract_from_code_block(response: &str) -> Option<String> {
    let start = response.find("```")? + 3;
    let rest = &response[start..];

    let block = match rest.find("```") {
        Some(end) => &rest[..end],
        // Truncated reply
        None => rest,
    };

    let first_line_end = block.find('\n').unwrap_or(block.len());
    let first_line = &block[..first_line_end];
    let body = if first_line.contains('{') || first_line.contains('[') {
        // One-line block: drop an inline tag such as `json`
        block
            .trim_start()
            .trim_start_matches(|c: char| c.is_ascii_alphanumeric())
    } else {
        &block[first_line_end..]
    };

    let body = body.trim();
    if body.is_empty() {
        None
    } else {
        Some(body.to_string())
    }
}

/// Text from the leading `open` to its matching `close`, ignoring
/// delimiters inside string literals.
fn extract_balanced(text: &str, open: char, close: char) -> Option<String> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escape_next = false;

    for (i, ch) in text.char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }

        match ch {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            c if c == open && !in_string => depth += 1,
            c if c == close && !in_string => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(text[..i + ch.len_utf8()].to_string());
                }
            }
            _ => {}
        }
    }

    None
}
