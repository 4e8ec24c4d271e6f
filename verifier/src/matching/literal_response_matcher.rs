use super::{ContentMatcherRegistry, MatchingContext, ResponseMatcher};
use crate::{
    content_type::ContentType,
    data::Response,
    mismatch::{BodyTypeMismatch, HeaderMismatch, Mismatch, StatusMismatch},
};
use serde_json::Value;
use std::collections::HashMap;

/// Status and header equality, with bodies handed to the content matcher
/// registered for the expected content type.
#[derive(Debug, Default, Clone, Copy)]
pub struct LiteralResponseMatcher;

impl LiteralResponseMatcher {
    fn header_mismatches(expected: &Response, actual: &Response) -> Vec<Mismatch> {
        let mut mismatches = Vec::new();

        for (header_key, expected_values) in &expected.headers {
            let expected_value = expected_values.join(", ");
            let actual_values = actual
                .headers
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(header_key))
                .map(|(_, values)| values);

            let mismatch = match actual_values {
                None => Some(HeaderMismatch {
                    header_key: header_key.clone(),
                    expected: expected_value.clone(),
                    actual: String::new(),
                    mismatch: format!("Expected a header '{}' but was missing", header_key),
                }),
                Some(actual_values) => {
                    let actual_value = actual_values.join(", ");
                    if Self::header_values_equal(header_key, &expected_value, &actual_value) {
                        None
                    } else {
                        Some(HeaderMismatch {
                            header_key: header_key.clone(),
                            mismatch: format!(
                                "Expected header '{}' to have value '{}' but was '{}'",
                                header_key, expected_value, actual_value
                            ),
                            expected: expected_value.clone(),
                            actual: actual_value,
                        })
                    }
                }
            };

            mismatches.extend(mismatch.map(Mismatch::from));
        }

        mismatches
    }

    fn header_values_equal(header_key: &str, expected: &str, actual: &str) -> bool {
        if header_key.eq_ignore_ascii_case("content-type") {
            if let (Some(expected), Some(actual)) =
                (ContentType::parse(expected), ContentType::parse(actual))
            {
                return expected == actual;
            }
        }

        split_header_value(expected) == split_header_value(actual)
    }

    fn body_mismatches(
        expected: &Response,
        actual: &Response,
        content_matchers: &ContentMatcherRegistry,
        plugin_configuration: &HashMap<String, Value>,
    ) -> Vec<Mismatch> {
        if expected.body.is_null_or_empty() {
            return Vec::new();
        }

        let expected_content_type = expected.content_type();
        if let (Some(expected_type), Some(actual_type)) =
            (&expected_content_type, actual.content_type())
        {
            if expected_type.base_type() != actual_type.base_type() {
                return vec![BodyTypeMismatch::new(
                    expected_type.base_type(),
                    actual_type.base_type(),
                )
                .into()];
            }
        }

        let context = MatchingContext::new(
            expected.matching_rules.rules_for_category("body"),
            false,
            plugin_configuration.clone(),
        );

        content_matchers
            .lookup_or_fallback(expected_content_type.as_ref())
            .match_body(&expected.body, &actual.body, &context)
            .into_mismatches()
    }
}

impl ResponseMatcher for LiteralResponseMatcher {
    fn response_mismatches(
        &self,
        expected: &Response,
        actual: &Response,
        content_matchers: &ContentMatcherRegistry,
        plugin_configuration: &HashMap<String, Value>,
    ) -> Vec<Mismatch> {
        let mut mismatches = Vec::new();

        if expected.status != actual.status {
            mismatches.push(
                StatusMismatch {
                    expected: expected.status,
                    actual: actual.status,
                }
                .into(),
            );
        }

        mismatches.extend(Self::header_mismatches(expected, actual));
        mismatches.extend(Self::body_mismatches(
            expected,
            actual,
            content_matchers,
            plugin_configuration,
        ));

        mismatches
    }
}

fn split_header_value(value: &str) -> Vec<&str> {
    value
        .split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .collect()
}
