use super::{MatchingContext, MetadataMatcher};
use crate::{
    content_type::ContentType,
    data::CONTENT_TYPE_METADATA_KEYS,
    mismatch::{MetadataMismatch, Mismatch},
};
use serde_json::Value;
use std::collections::HashMap;

#[derive(Debug, Default, Clone, Copy)]
pub struct LiteralMetadataMatcher;

impl LiteralMetadataMatcher {
    fn values_equal(key: &str, expected: &Value, actual: &Value) -> bool {
        if CONTENT_TYPE_METADATA_KEYS.contains(&key) {
            let parsed = (
                expected.as_str().and_then(ContentType::parse),
                actual.as_str().and_then(ContentType::parse),
            );
            if let (Some(expected), Some(actual)) = parsed {
                return expected.base_type() == actual.base_type();
            }
        }

        match (expected, actual) {
            (Value::String(expected), actual) if !actual.is_string() => {
                *expected == actual.to_string()
            }
            (expected, Value::String(actual)) if !expected.is_string() => {
                expected.to_string() == *actual
            }
            (expected, actual) => expected == actual,
        }
    }
}

impl MetadataMatcher for LiteralMetadataMatcher {
    fn compare_metadata(
        &self,
        expected: &HashMap<String, Value>,
        actual: &HashMap<String, Value>,
        context: &MatchingContext,
    ) -> Vec<Mismatch> {
        let mut mismatches = Vec::new();

        for (key, expected_value) in expected {
            match actual.get(key) {
                None => mismatches.push(MetadataMismatch {
                    key: key.clone(),
                    expected: expected_value.clone(),
                    actual: Value::Null,
                    mismatch: format!("Expected metadata key '{}' but was missing", key),
                }),
                Some(actual_value) if !Self::values_equal(key, expected_value, actual_value) => {
                    mismatches.push(MetadataMismatch {
                        key: key.clone(),
                        expected: expected_value.clone(),
                        actual: actual_value.clone(),
                        mismatch: format!(
                            "Expected metadata key '{}' to have value {} but was {}",
                            key, expected_value, actual_value
                        ),
                    })
                }
                Some(_) => {}
            }
        }

        if !context.allow_unexpected_keys {
            for (key, actual_value) in actual {
                if !expected.contains_key(key) {
                    mismatches.push(MetadataMismatch {
                        key: key.clone(),
                        expected: Value::Null,
                        actual: actual_value.clone(),
                        mismatch: format!("Unexpected metadata key '{}'", key),
                    });
                }
            }
        }

        mismatches.into_iter().map(Mismatch::from).collect()
    }
}
