// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::declared::{DeclaredConfig, StaticConfig};
use crate::config::loader::load_declared_config;
use crate::errors::ConfigLoadError;

/// Builds one declared configuration instance.
pub type ConfigFactory =
    Arc<dyn Fn() -> Result<Arc<dyn DeclaredConfig>, ConfigLoadError> + Send + Sync>;

/// Declared configuration types, grouped by scope and keyed by PascalCase type name.
///
/// A scope is usually a module path (see [`crate::traits::ConfigScope`]), but
/// any string works. Registration is explicit: nothing is discovered implicitly.
///
/// # Example
/// ```
/// use plyght::config::{ConfigRegistry, StaticConfig};
/// use serde_json::json;
///
/// let mut registry = ConfigRegistry::new();
/// registry.register_static(
///     "app::settings",
///     "OpensearchConfig",
///     StaticConfig::new(json!({"hosts": []}).as_object().cloned().unwrap_or_default()),
/// );
///
/// assert!(registry.contains("app::settings", "OpensearchConfig"));
/// ```
#[derive(Default, Clone)]
pub struct ConfigRegistry {
    scopes: HashMap<String, HashMap<String, ConfigFactory>>,
}

impl ConfigRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory. A later registration under the same name replaces the earlier one.
    pub fn register<F>(&mut self, scope: &str, type_name: &str, factory: F) -> &mut Self
    where
        F: Fn() -> Result<Arc<dyn DeclaredConfig>, ConfigLoadError> + Send + Sync + 'static,
    {
        self.scopes
            .entry(scope.to_string())
            .or_default()
            .insert(type_name.to_string(), Arc::new(factory));
        self
    }

    /// Register a fixed configuration value; every resolution shares it.
    pub fn register_static(
        &mut self,
        scope: &str,
        type_name: &str,
        config: StaticConfig,
    ) -> &mut Self {
        let shared: Arc<dyn DeclaredConfig> = Arc::new(config);
        self.register(scope, type_name, move || Ok(Arc::clone(&shared)))
    }

    /// Register a configuration file; it is read when the type is resolved.
    pub fn register_file(
        &mut self,
        scope: &str,
        type_name: &str,
        path: impl Into<PathBuf>,
    ) -> &mut Self {
        let path = path.into();
        self.register(scope, type_name, move || {
            let config: Arc<dyn DeclaredConfig> = Arc::new(load_declared_config(&path)?);
            Ok(config)
        })
    }

    pub fn has_scope(&self, scope: &str) -> bool {
        self.scopes.contains_key(scope)
    }

    pub fn contains(&self, scope: &str, type_name: &str) -> bool {
        self.factory(scope, type_name).is_some()
    }

    pub fn factory(&self, scope: &str, type_name: &str) -> Option<&ConfigFactory> {
        self.scopes.get(scope)?.get(type_name)
    }

    /// Type names registered in a scope, sorted.
    pub fn type_names(&self, scope: &str) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .scopes
            .get(scope)
            .map(|types| types.keys().map(String::as_str).collect())
            .unwrap_or_default();
        names.sort_unstable();
        names
    }
}

impl std::fmt::Debug for ConfigRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut scopes: Vec<&String> = self.scopes.keys().collect();
        scopes.sort_unstable();
        f.debug_struct("ConfigRegistry")
            .field("scopes", &scopes)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Map;

    #[test]
    fn test_register_and_lookup() {
        let mut registry = ConfigRegistry::new();
        registry
            .register_static("a", "KafkaConfig", StaticConfig::default())
            .register_static("a", "Neo4jConfig", StaticConfig::default())
            .register_static("b", "KafkaConfig", StaticConfig::default());

        assert!(registry.has_scope("a"));
        assert!(!registry.has_scope("c"));
        assert!(registry.contains("b", "KafkaConfig"));
        assert!(!registry.contains("b", "Neo4jConfig"));
        assert_eq!(registry.type_names("a"), vec!["KafkaConfig", "Neo4jConfig"]);
        assert!(registry.type_names("c").is_empty());
    }

    #[test]
    fn test_static_registration_is_shared() {
        let mut options = Map::new();
        options.insert("uri".into(), "redis://cache:6379".into());

        let mut registry = ConfigRegistry::new();
        registry.register_static("s", "CacheConfig", StaticConfig::new(options));

        let factory = registry.factory("s", "CacheConfig").unwrap();
        let first = factory().unwrap();
        let second = factory().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_file_registration_is_lazy() {
        let mut registry = ConfigRegistry::new();
        registry.register_file("files", "S3Config", "/nonexistent/plyght/s3.yaml");

        assert!(registry.contains("files", "S3Config"));
        let factory = registry.factory("files", "S3Config").unwrap();
        assert!(matches!(factory(), Err(ConfigLoadError::Io { .. })));
    }
}
