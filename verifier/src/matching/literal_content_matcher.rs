use super::{BodyMatchResult, ContentMatcher, MatchingContext};
use crate::{data::OptionalBody, mismatch::BodyMismatch};

/// Compares bodies byte for byte. Used when no matcher is registered for the content type.
#[derive(Debug, Default, Clone, Copy)]
pub struct LiteralContentMatcher;

impl ContentMatcher for LiteralContentMatcher {
    fn match_body(
        &self,
        expected: &OptionalBody,
        actual: &OptionalBody,
        _context: &MatchingContext,
    ) -> BodyMatchResult {
        if expected.is_null_or_empty() {
            return BodyMatchResult::default();
        }

        let expected_body = expected.value_as_string();
        let mut mismatches = Vec::new();

        if actual.is_null_or_empty() {
            mismatches.push(BodyMismatch::new(
                Some(expected_body.clone()),
                None,
                format!("Expected body '{}' but was missing", expected_body),
            ));
        } else if actual.value() != expected.value() {
            let actual_body = actual.value_as_string();
            mismatches.push(BodyMismatch::new(
                Some(expected_body.clone()),
                Some(actual_body.clone()),
                format!(
                    "Actual body '{}' is not equal to the expected body '{}'",
                    actual_body, expected_body
                ),
            ));
        }

        BodyMatchResult::from_mismatches(mismatches)
    }
}
