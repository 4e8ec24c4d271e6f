use crate::{
    matching::{
        ContentMatcherRegistry, LiteralMetadataMatcher, LiteralResponseMatcher, MetadataMatcher,
        ResponseMatcher,
    },
    resolver::{EnvironmentResolver, ValueResolver},
};
use serde_json::Value;
use std::{collections::HashMap, sync::Arc};

/// The collaborators a comparison runs with. Read-only once built, so one
/// configuration can be shared between concurrent comparisons.
#[derive(Debug, Default)]
pub struct ComparisonConfiguration {
    response_matcher: Option<Arc<dyn ResponseMatcher + Send + Sync>>,
    metadata_matcher: Option<Arc<dyn MetadataMatcher + Send + Sync>>,
    value_resolver: Option<Arc<dyn ValueResolver + Send + Sync>>,
    content_matchers: ContentMatcherRegistry,
    plugin_configuration: HashMap<String, Value>,
}

impl ComparisonConfiguration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn response_matcher(&self) -> Arc<dyn ResponseMatcher + Send + Sync> {
        self.response_matcher
            .clone()
            .unwrap_or_else(|| Arc::new(LiteralResponseMatcher))
    }

    pub fn set_response_matcher(&mut self, matcher: Arc<dyn ResponseMatcher + Send + Sync>) {
        self.response_matcher = Some(matcher);
    }

    pub fn metadata_matcher(&self) -> Arc<dyn MetadataMatcher + Send + Sync> {
        self.metadata_matcher
            .clone()
            .unwrap_or_else(|| Arc::new(LiteralMetadataMatcher))
    }

    pub fn set_metadata_matcher(&mut self, matcher: Arc<dyn MetadataMatcher + Send + Sync>) {
        self.metadata_matcher = Some(matcher);
    }

    /// Where the diff policy reads its settings; the process environment by default.
    pub fn value_resolver(&self) -> Arc<dyn ValueResolver + Send + Sync> {
        self.value_resolver
            .clone()
            .unwrap_or_else(|| Arc::new(EnvironmentResolver))
    }

    pub fn set_value_resolver(&mut self, resolver: Arc<dyn ValueResolver + Send + Sync>) {
        self.value_resolver = Some(resolver);
    }

    pub fn content_matchers(&self) -> &ContentMatcherRegistry {
        &self.content_matchers
    }

    pub fn add_content_matchers<
        F: FnOnce(&mut ContentMatcherRegistry) -> &mut ContentMatcherRegistry,
    >(
        &mut self,
        func: F,
    ) {
        let _ = func(&mut self.content_matchers);
    }

    pub fn plugin_configuration(&self) -> &HashMap<String, Value> {
        &self.plugin_configuration
    }

    pub fn set_plugin_configuration<S: Into<String>>(&mut self, plugin: S, configuration: Value) {
        self.plugin_configuration
            .insert(plugin.into(), configuration);
    }
}
