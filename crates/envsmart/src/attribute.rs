use crate::errors::{EnvSmartError, EnvSmartResult};
use crate::ids::EnvId;
use crate::registry::Registry;
use crate::resolve::CandidateMap;
use indexmap::IndexMap;
use std::fmt::Debug;
use tracing::{trace, warn};

/// Who contributed a value to an attribute.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ValueSource {
    /// Default given where the attribute is declared
    #[display("default")]
    Default,
    /// Value given when the item is constructed
    #[display("init")]
    Init,
    /// Value assigned after construction
    #[display("override")]
    Override,
    /// Value set by a builder on the items it produces
    #[display("builder")]
    Builder,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contribution<V> {
    pub value: V,
    pub source: ValueSource,
}

/// Per-env and per-group values of one attribute.
///
/// Conflicts are not detected when values are contributed: a later value for a more specific
/// group legitimately refines an earlier, less specific one. They surface when the attribute
/// is resolved for an env.
#[derive(Debug, Clone)]
pub struct AttributeValueStore<V> {
    attribute: String,
    values: IndexMap<String, Contribution<V>>,
    frozen: bool,
}

impl<V> AttributeValueStore<V> {
    pub fn new<S: Into<String>>(attribute: S) -> Self {
        AttributeValueStore {
            attribute: attribute.into(),
            values: IndexMap::new(),
            frozen: false,
        }
    }

    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    pub fn contribute<K: Into<String>>(
        &mut self,
        key: K,
        value: V,
        source: ValueSource,
    ) -> EnvSmartResult<()> {
        self.contribute_ex(key, value, source, false)
    }

    /// Insert or overwrite the value for `key`. Once frozen, only `force` lets a value in.
    pub fn contribute_ex<K: Into<String>>(
        &mut self,
        key: K,
        value: V,
        source: ValueSource,
        force: bool,
    ) -> EnvSmartResult<()> {
        let key = key.into();
        if self.frozen {
            if !force {
                return Err(EnvSmartError::StoreFrozen {
                    attribute: self.attribute.clone(),
                    key,
                });
            }
            warn!(
                attribute = self.attribute.as_str(),
                key = key.as_str(),
                %source,
                "forced assignment to frozen attribute"
            );
        }

        trace!(
            attribute = self.attribute.as_str(),
            key = key.as_str(),
            %source,
            "contribute"
        );
        self.values.insert(key, Contribution { value, source });
        Ok(())
    }

    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn contribution<S: AsRef<str>>(&self, key: S) -> Option<&Contribution<V>> {
        self.values.get(key.as_ref())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Check that every key names an env or group of `registry`.
    pub fn validate_keys(&self, registry: &Registry) -> EnvSmartResult<()> {
        self.values
            .keys()
            .try_for_each(|key| registry.lookup(key).map(|_| ()))
    }
}

impl<V: Debug> AttributeValueStore<V> {
    /// Resolve without changing state.
    pub fn resolve_for(&self, registry: &Registry, env: EnvId) -> EnvSmartResult<Option<&V>> {
        Ok(registry.resolve_value(env, self)?.map(|r| r.value))
    }

    /// Resolve, and freeze the store if a value was found.
    pub fn read(&mut self, registry: &Registry, env: EnvId) -> EnvSmartResult<Option<&V>> {
        let resolved = registry.resolve_value::<V, _>(env, &*self)?;
        let Some(source) = resolved.map(|r| r.source) else {
            return Ok(None);
        };

        self.frozen = true;
        let key = registry.name_of(source)?;
        Ok(self.values.get(key).map(|c| &c.value))
    }
}

impl<V> CandidateMap<V> for AttributeValueStore<V> {
    fn candidate(&self, name: &str) -> Option<&V> {
        self.values.get(name).map(|c| &c.value)
    }
}
