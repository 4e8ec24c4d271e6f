use crate::{content_type::ContentType, resolver::ValueResolver, size::size_of};
use serde_json::Value;
use similar::{ChangeTag, TextDiff};

pub const GENERATE_DIFF_KEY: &str = "verifier.generateDiff";

const NOT_SET: &str = "NOT_SET";
const DIFF_CONTEXT_LINES: usize = 3;

/// An error carries the description of a malformed size threshold. It is up
/// to the caller to log it and carry on without a diff.
pub fn should_generate_diff(resolver: &dyn ValueResolver, length: usize) -> Result<bool, String> {
    let value = resolver
        .resolve_value(GENERATE_DIFF_KEY, Some(NOT_SET))
        .map(|value| value.to_lowercase());

    match value.as_deref() {
        None | Some("not_set") | Some("true") => Ok(true),
        Some("false") | Some("") => Ok(false),
        Some(threshold) => size_of(threshold).map(|threshold| length as u64 <= threshold),
    }
}

/// Renders the diff between the expected and actual bodies, pretty printing
/// whichever side is JSON.
pub fn generate_full_diff(
    actual: &str,
    actual_content_type: &ContentType,
    expected: &str,
    expected_is_json: bool,
) -> Vec<String> {
    let actual_body = format_body(actual, actual_content_type.is_json());
    let expected_body = format_body(expected, expected_is_json);

    generate_diff(&expected_body, &actual_body)
}

fn format_body(body: &str, is_json: bool) -> String {
    if body.is_empty() {
        String::new()
    } else if is_json {
        pretty_print(body)
    } else {
        body.to_string()
    }
}

fn pretty_print(json: &str) -> String {
    serde_json::from_str::<Value>(json)
        .and_then(|value| serde_json::to_string_pretty(&value))
        .unwrap_or_else(|e| {
            tracing::debug!("Body is not valid JSON, diffing it as text: {}", e);
            json.to_string()
        })
}

/// Line diff with a few lines of context around each change. Lines are
/// prefixed with `-`, `+` or a space; separate hunks are split by an empty line.
pub fn generate_diff(expected: &str, actual: &str) -> Vec<String> {
    let diff = TextDiff::from_lines(expected, actual);
    let mut lines = Vec::new();

    for (index, group) in diff.grouped_ops(DIFF_CONTEXT_LINES).iter().enumerate() {
        if index > 0 {
            lines.push(String::new());
        }

        for op in group {
            for change in diff.iter_changes(op) {
                let sign = match change.tag() {
                    ChangeTag::Delete => '-',
                    ChangeTag::Insert => '+',
                    ChangeTag::Equal => ' ',
                };
                lines.push(format!(
                    "{}{}",
                    sign,
                    change.value().trim_end_matches(|c: char| c == '\n' || c == '\r')
                ));
            }
        }
    }

    lines
}
