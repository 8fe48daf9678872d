use crate::attribute::{AttributeValueStore, ValueSource};
use crate::errors::{EnvSmartError, EnvSmartResult};
use crate::ids::{EnvId, EnvOrGroupId};
use crate::macros::contribute;
use crate::registry::Registry;
use crate::select::Specificity;
use indexmap::IndexMap;
use itertools::Itertools;
use std::fmt::Debug;

/// A named configuration item whose attributes hold per-env values.
///
/// Creating an item freezes the registry: the env universe must be complete before any
/// values are assigned against it.
#[derive(Debug)]
pub struct ConfigItem<'r, V> {
    registry: &'r Registry,
    name: String,
    attributes: IndexMap<String, AttributeValueStore<V>>,
    include: Vec<EnvOrGroupId>,
    exclude: Vec<EnvOrGroupId>,
}

impl<'r, V> ConfigItem<'r, V> {
    pub fn new<S: Into<String>>(registry: &'r Registry, name: S) -> Self {
        registry.freeze();
        ConfigItem {
            registry,
            name: name.into(),
            attributes: IndexMap::new(),
            include: vec![],
            exclude: vec![],
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn registry(&self) -> &'r Registry {
        self.registry
    }

    /// Assign values, keyed by env or group name, with [`ValueSource::Init`].
    pub fn set<A, K, I>(&mut self, attribute: A, values: I) -> EnvSmartResult<()>
    where
        A: Into<String>,
        K: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        self.set_ex(attribute, values, ValueSource::Init, false)
    }

    /// Assign values. Every key is checked against the registry before any value is stored.
    pub fn set_ex<A, K, I>(
        &mut self,
        attribute: A,
        values: I,
        source: ValueSource,
        force: bool,
    ) -> EnvSmartResult<()>
    where
        A: Into<String>,
        K: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        let values = values
            .into_iter()
            .map(|(k, v)| (k.into(), v))
            .collect_vec();
        for (key, _) in values.iter() {
            self.registry.lookup(key)?;
        }

        let attribute = attribute.into();
        let store = self
            .attributes
            .entry(attribute.clone())
            .or_insert_with(|| AttributeValueStore::new(attribute));
        for (key, value) in values {
            contribute!(store, key, value, source, force)?;
        }
        Ok(())
    }

    /// Restrict the item to the given envs and groups.
    pub fn include(&mut self, envs: &[EnvOrGroupId]) -> EnvSmartResult<()> {
        self.registry.check_ids(envs)?;
        self.include.extend_from_slice(envs);
        Ok(())
    }

    /// Remove the item from the given envs and groups.
    pub fn exclude(&mut self, envs: &[EnvOrGroupId]) -> EnvSmartResult<()> {
        self.registry.check_ids(envs)?;
        self.exclude.extend_from_slice(envs);
        Ok(())
    }

    /// Whether the item exists in `env`. The more specific of the include and exclude lists
    /// decides; when neither names the env, the item exists unless an include list is given.
    pub fn is_included(&self, env: EnvId) -> EnvSmartResult<bool> {
        let selected = self
            .registry
            .select_more_specific(env, &self.include, &self.exclude)?;
        Ok(match selected {
            Specificity::First => true,
            Specificity::Second => false,
            Specificity::Neither => self.include.is_empty(),
        })
    }

    pub fn attribute<S: AsRef<str>>(&self, attribute: S) -> Option<&AttributeValueStore<V>> {
        self.attributes.get(attribute.as_ref())
    }

    pub fn attribute_names(&self) -> impl Iterator<Item = &str> {
        self.attributes.keys().map(String::as_str)
    }

    pub fn freeze(&mut self) {
        self.attributes.values_mut().for_each(AttributeValueStore::freeze);
    }

    fn store_mut(&mut self, attribute: &str) -> EnvSmartResult<&mut AttributeValueStore<V>> {
        let item = &self.name;
        self.attributes
            .get_mut(attribute)
            .ok_or_else(|| EnvSmartError::UnknownAttribute {
                item: item.clone(),
                attribute: attribute.to_string(),
            })
    }
}

impl<'r, V: Debug> ConfigItem<'r, V> {
    /// Read an attribute for `env`. A found value freezes the attribute.
    pub fn get<S: AsRef<str>>(&mut self, attribute: S, env: EnvId) -> EnvSmartResult<Option<&V>> {
        let registry = self.registry;
        self.store_mut(attribute.as_ref())?.read(registry, env)
    }

    pub fn get_required<S: AsRef<str>>(&mut self, attribute: S, env: EnvId) -> EnvSmartResult<&V> {
        let attribute = attribute.as_ref();
        let registry = self.registry;
        self.store_mut(attribute)?
            .read(registry, env)?
            .ok_or_else(|| EnvSmartError::MissingValue {
                attribute: attribute.to_string(),
                env: registry.name_of_unchecked(env.into()).to_string(),
            })
    }

    /// Resolve every attribute for `env`, in assignment order. Does not freeze anything.
    pub fn materialize(&self, env: EnvId) -> EnvSmartResult<IndexMap<String, Option<&V>>> {
        self.attributes
            .iter()
            .map(|(name, store)| Ok((name.clone(), store.resolve_for(self.registry, env)?)))
            .collect()
    }
}
