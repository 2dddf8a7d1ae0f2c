// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Resolution of a configuration kind to a declared configuration instance.
//!
//! A wrapper type names its configuration by kind (`"opensearch_config"`).
//! The resolver turns the kind into a type name (`OpensearchConfig`), finds
//! it in a scope of the [`ConfigRegistry`], builds it once and hands back a
//! [`BoundConfig`]. Every wrapper instance then merges its own overrides over
//! the bound source at construction.

use std::fmt;
use std::sync::Arc;

use crate::config::case::pascal;
use crate::config::declared::DeclaredConfig;
use crate::config::options::{ConfigOverrides, Configuration};
use crate::config::registry::ConfigRegistry;
use crate::errors::ClientError;
use crate::observability::messages::config::{ConfigurationMissing, ConfigurationResolved};
use crate::observability::messages::StructuredLog;
use crate::traits::ConfigScope;

/// A resolved declared configuration, shared by every wrapper built from it.
#[derive(Clone)]
pub struct BoundConfig {
    type_name: String,
    scope: String,
    source: Arc<dyn DeclaredConfig>,
}

impl BoundConfig {
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }

    pub fn source(&self) -> &Arc<dyn DeclaredConfig> {
        &self.source
    }

    /// Merge per-instance overrides over the declared options.
    pub fn merge(&self, overrides: ConfigOverrides) -> Configuration {
        Configuration::merged(Some(self.source.dump()), overrides)
    }
}

impl fmt::Debug for BoundConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundConfig")
            .field("type_name", &self.type_name)
            .field("scope", &self.scope)
            .field("source", &self.source)
            .finish()
    }
}

/// Merge an optional bound configuration with explicit overrides.
///
/// Every wrapper constructor goes through here, so the merge happens once per
/// instance and never again.
pub fn merge_options(bound: Option<&BoundConfig>, overrides: ConfigOverrides) -> Configuration {
    match bound {
        Some(bound) => bound.merge(overrides),
        None => Configuration::from_overrides(overrides),
    }
}

#[derive(Debug, Clone)]
pub struct ConfigResolver {
    registry: Arc<ConfigRegistry>,
}

impl ConfigResolver {
    pub fn new(registry: ConfigRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }

    pub fn registry(&self) -> &ConfigRegistry {
        &self.registry
    }

    /// Resolve `kind` (snake_case) in `scope`.
    ///
    /// Fails with `ConfigurationNotFound` naming the expected type and the
    /// scope when the scope or type is unknown, or the factory fails.
    pub fn resolve(&self, kind: &str, scope: &str) -> Result<BoundConfig, ClientError> {
        let type_name = pascal(kind);

        let factory = match self.registry.factory(scope, &type_name) {
            Some(factory) => factory,
            None => {
                ConfigurationMissing {
                    type_name: &type_name,
                    scope,
                    reason: None,
                }
                .log();
                return Err(ClientError::ConfigurationNotFound {
                    type_name,
                    scope: scope.to_string(),
                    detail: None,
                });
            }
        };

        let source = factory().map_err(|error| {
            let reason = error.to_string();
            ConfigurationMissing {
                type_name: &type_name,
                scope,
                reason: Some(&reason),
            }
            .log();
            ClientError::ConfigurationNotFound {
                type_name: type_name.clone(),
                scope: scope.to_string(),
                detail: Some(reason),
            }
        })?;

        ConfigurationResolved {
            type_name: &type_name,
            scope,
            option_count: source.dump().len(),
        }
        .log();

        Ok(BoundConfig {
            type_name,
            scope: scope.to_string(),
            source,
        })
    }

    /// Resolve `kind` for wrapper type `T`, searching `T`'s own scope unless a hint is given.
    pub fn resolve_for<T: ConfigScope>(
        &self,
        kind: &str,
        scope_hint: Option<&str>,
    ) -> Result<BoundConfig, ClientError> {
        self.resolve(kind, scope_hint.unwrap_or(T::CONFIG_SCOPE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StaticConfig;
    use crate::errors::ConfigLoadError;
    use serde_json::json;

    struct SettingsScoped;

    impl ConfigScope for SettingsScoped {
        const CONFIG_SCOPE: &'static str = "app::settings";
    }

    fn resolver() -> ConfigResolver {
        let mut registry = ConfigRegistry::new();
        registry.register_static(
            "app::settings",
            "OpensearchConfig",
            StaticConfig::new(
                json!({"hosts": [{"host": "a", "port": 9200}], "use_ssl": false})
                    .as_object()
                    .cloned()
                    .unwrap(),
            ),
        );
        registry.register("app::settings", "BrokenConfig", || {
            Err(ConfigLoadError::NotAMapping("a string"))
        });
        ConfigResolver::new(registry)
    }

    #[test]
    fn test_resolve_binds_pascal_type() {
        let bound = resolver().resolve("opensearch_config", "app::settings").unwrap();
        assert_eq!(bound.type_name(), "OpensearchConfig");
        assert_eq!(bound.scope(), "app::settings");

        let config = bound.merge(ConfigOverrides::new().set("use_ssl", true));
        assert_eq!(config.get_bool("use_ssl"), Some(true));
        assert!(config.contains_key("hosts"));
    }

    #[test]
    fn test_resolve_errors_name_type_and_scope() {
        struct TestCase {
            kind: &'static str,
            scope: &'static str,
            expected_type: &'static str,
            has_detail: bool,
        }

        let test_cases = vec![
            TestCase {
                kind: "kafka_config",
                scope: "app::settings",
                expected_type: "KafkaConfig",
                has_detail: false,
            },
            TestCase {
                kind: "opensearch_config",
                scope: "other::scope",
                expected_type: "OpensearchConfig",
                has_detail: false,
            },
            TestCase {
                kind: "broken_config",
                scope: "app::settings",
                expected_type: "BrokenConfig",
                has_detail: true,
            },
        ];

        let resolver = resolver();
        for test_case in test_cases {
            match resolver.resolve(test_case.kind, test_case.scope) {
                Err(ClientError::ConfigurationNotFound {
                    type_name,
                    scope,
                    detail,
                }) => {
                    assert_eq!(type_name, test_case.expected_type);
                    assert_eq!(scope, test_case.scope);
                    assert_eq!(detail.is_some(), test_case.has_detail, "{}", test_case.kind);
                }
                other => panic!("{}: expected ConfigurationNotFound, got {:?}", test_case.kind, other),
            }
        }
    }

    #[test]
    fn test_resolve_for_uses_type_scope_unless_hinted() {
        let resolver = resolver();
        assert!(resolver
            .resolve_for::<SettingsScoped>("opensearch_config", None)
            .is_ok());

        let err = resolver
            .resolve_for::<SettingsScoped>("opensearch_config", Some("elsewhere"))
            .unwrap_err();
        assert!(err.to_string().contains("'elsewhere'"));
    }

    #[test]
    fn test_merge_options_without_bound_config() {
        let config = merge_options(None, ConfigOverrides::new().set("uri", "s3://bucket"));
        assert_eq!(config.get_str("uri"), Some("s3://bucket"));
        assert_eq!(config.len(), 1);
    }
}
