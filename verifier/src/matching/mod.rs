mod literal_content_matcher;
mod literal_metadata_matcher;
mod literal_response_matcher;

use crate::{
    content_type::ContentType,
    data::{OptionalBody, Response},
    mismatch::{BodyMismatch, BodyTypeMismatch, Mismatch},
};
pub use literal_content_matcher::LiteralContentMatcher;
pub use literal_metadata_matcher::LiteralMetadataMatcher;
pub use literal_response_matcher::LiteralResponseMatcher;
use serde_json::Value;
use std::{collections::HashMap, fmt::Debug, sync::Arc};

/// Matching rules for one category (`body`, `metadata`, ...), keyed by path.
/// The rules themselves are opaque to the comparison.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchingRuleCategory {
    pub name: String,
    pub rules: HashMap<String, Vec<Value>>,
}

impl MatchingRuleCategory {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            rules: HashMap::new(),
        }
    }

    pub fn add_rule<S: Into<String>>(&mut self, path: S, rule: Value) -> &mut Self {
        self.rules.entry(path.into()).or_default().push(rule);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchingRules {
    categories: HashMap<String, MatchingRuleCategory>,
}

impl MatchingRules {
    pub fn add_category<S: Into<String>>(&mut self, name: S) -> &mut MatchingRuleCategory {
        let name = name.into();
        self.categories
            .entry(name.clone())
            .or_insert_with(|| MatchingRuleCategory::new(name))
    }

    pub fn rules_for_category(&self, name: &str) -> MatchingRuleCategory {
        self.categories
            .get(name)
            .cloned()
            .unwrap_or_else(|| MatchingRuleCategory::new(name))
    }
}

#[derive(Debug, Clone)]
pub struct MatchingContext {
    pub matchers: MatchingRuleCategory,
    pub allow_unexpected_keys: bool,
    pub plugin_configuration: HashMap<String, Value>,
}

impl MatchingContext {
    pub fn new(
        matchers: MatchingRuleCategory,
        allow_unexpected_keys: bool,
        plugin_configuration: HashMap<String, Value>,
    ) -> Self {
        Self {
            matchers,
            allow_unexpected_keys,
            plugin_configuration,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BodyItemMatchResult {
    pub key: String,
    pub result: Vec<BodyMismatch>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BodyMatchResult {
    pub type_mismatch: Option<BodyTypeMismatch>,
    pub body_results: Vec<BodyItemMatchResult>,
}

impl BodyMatchResult {
    pub fn from_mismatches(mismatches: Vec<BodyMismatch>) -> Self {
        let mut body_results: Vec<BodyItemMatchResult> = Vec::new();

        for mismatch in mismatches {
            match body_results.iter_mut().find(|item| item.key == mismatch.path) {
                Some(item) => item.result.push(mismatch),
                None => body_results.push(BodyItemMatchResult {
                    key: mismatch.path.clone(),
                    result: vec![mismatch],
                }),
            }
        }

        Self {
            type_mismatch: None,
            body_results,
        }
    }

    /// A type mismatch comes first so it short-circuits body grouping.
    pub fn into_mismatches(self) -> Vec<Mismatch> {
        self.type_mismatch
            .into_iter()
            .map(Mismatch::from)
            .chain(
                self.body_results
                    .into_iter()
                    .flat_map(|item| item.result)
                    .map(Mismatch::from),
            )
            .collect()
    }
}

pub trait ContentMatcher: Debug {
    fn match_body(
        &self,
        expected: &OptionalBody,
        actual: &OptionalBody,
        context: &MatchingContext,
    ) -> BodyMatchResult;
}

pub trait ResponseMatcher: Debug {
    fn response_mismatches(
        &self,
        expected: &Response,
        actual: &Response,
        content_matchers: &ContentMatcherRegistry,
        plugin_configuration: &HashMap<String, Value>,
    ) -> Vec<Mismatch>;
}

pub trait MetadataMatcher: Debug {
    fn compare_metadata(
        &self,
        expected: &HashMap<String, Value>,
        actual: &HashMap<String, Value>,
        context: &MatchingContext,
    ) -> Vec<Mismatch>;
}

/// Content matchers keyed by base media type. Lookups that find nothing land
/// on the literal matcher.
#[derive(Debug, Default)]
pub struct ContentMatcherRegistry {
    matchers: HashMap<String, Arc<dyn ContentMatcher + Send + Sync>>,
    fallback: LiteralContentMatcher,
}

impl ContentMatcherRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<S: AsRef<str>, CM: ContentMatcher + Send + Sync + 'static>(
        &mut self,
        media_type: S,
        matcher: CM,
    ) -> &mut Self {
        self.register_shared(media_type, Arc::new(matcher))
    }

    pub fn register_shared<S: AsRef<str>>(
        &mut self,
        media_type: S,
        matcher: Arc<dyn ContentMatcher + Send + Sync>,
    ) -> &mut Self {
        self.matchers
            .insert(normalise_media_type(media_type.as_ref()), matcher);
        self
    }

    pub fn lookup(&self, media_type: &str) -> Option<Arc<dyn ContentMatcher + Send + Sync>> {
        self.matchers.get(&normalise_media_type(media_type)).cloned()
    }

    pub fn lookup_or_fallback(&self, content_type: Option<&ContentType>) -> &dyn ContentMatcher {
        match content_type.and_then(|ct| self.matchers.get(ct.base_type())) {
            Some(matcher) => {
                tracing::trace!("Using registered content matcher {:?}", matcher);
                &**matcher
            }
            None => {
                tracing::trace!(
                    "No content matcher registered for {:?}, comparing bodies literally",
                    content_type.map(ContentType::base_type)
                );
                &self.fallback
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }
}

fn normalise_media_type(media_type: &str) -> String {
    ContentType::parse(media_type)
        .map(|content_type| content_type.base_type().to_string())
        .unwrap_or_else(|| media_type.trim().to_lowercase())
}
