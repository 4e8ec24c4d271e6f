use std::{collections::HashMap, env, fmt::Debug};

/// Read-only lookup of configuration values by key.
pub trait ValueResolver: Debug {
    fn resolve_value(&self, key: &str, default: Option<&str>) -> Option<String>;
}

/// Resolves values from the process environment. A key is looked up as-is
/// first, then in its `UPPER_SNAKE` form (`verifier.generateDiff` becomes
/// `VERIFIER_GENERATEDIFF`).
#[derive(Debug, Default, Clone, Copy)]
pub struct EnvironmentResolver;

impl EnvironmentResolver {
    pub fn environment_key(key: &str) -> String {
        key.chars()
            .map(|c| match c {
                '.' | '-' => '_',
                c => c.to_ascii_uppercase(),
            })
            .collect()
    }
}

impl ValueResolver for EnvironmentResolver {
    fn resolve_value(&self, key: &str, default: Option<&str>) -> Option<String> {
        env::var(key)
            .or_else(|_| env::var(Self::environment_key(key)))
            .ok()
            .or_else(|| default.map(String::from))
    }
}

#[derive(Debug, Default, Clone)]
pub struct MapValueResolver {
    values: HashMap<String, String>,
}

impl MapValueResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value<S1: Into<String>, S2: Into<String>>(mut self, key: S1, value: S2) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }
}

impl ValueResolver for MapValueResolver {
    fn resolve_value(&self, key: &str, default: Option<&str>) -> Option<String> {
        self.values
            .get(key)
            .cloned()
            .or_else(|| default.map(String::from))
    }
}
