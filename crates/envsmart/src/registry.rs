use crate::env::{Environment, EnvironmentGroup, mask_contains};
use crate::errors::{EnvSmartError, EnvSmartResult, NameKind};
use crate::ids::{EnvId, EnvOrGroupId, GroupId, RegistryId};
use crate::lookup::{FrozenState, LookupTable, compute_lookup_tables};
use crate::options::RegistryOptions;
use envsmart_util::bitmask::BitMask;
use fxhash::{FxHashMap, FxHashSet};
use indexmap::IndexSet;
use itertools::Itertools;
use once_cell::sync::OnceCell;
use tracing::debug;

/// Owns the universe of envs and groups.
///
/// Declarations take `&mut self`. Freezing takes `&self` and happens at most once: either
/// through [`Registry::freeze`] or implicitly on the first resolution. After that the registry
/// is read-only and can be shared between threads.
#[derive(Debug)]
pub struct Registry {
    id: RegistryId,
    options: RegistryOptions,
    envs: Vec<Environment>,
    groups: Vec<EnvironmentGroup>,
    names: FxHashMap<String, EnvOrGroupId>,
    // Everything that is a direct member of some group: the rest is top-level
    nested: FxHashSet<EnvOrGroupId>,
    // Bit 0 is never handed out
    next_bit: usize,
    frozen: OnceCell<FrozenState>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    pub fn new() -> Registry {
        Self::with_options(RegistryOptions::default())
    }

    pub fn with_options(options: RegistryOptions) -> Registry {
        Registry {
            id: RegistryId::next(),
            options,
            envs: Vec::new(),
            groups: Vec::new(),
            names: FxHashMap::default(),
            nested: FxHashSet::default(),
            next_bit: 1,
            frozen: OnceCell::new(),
        }
    }

    pub fn id(&self) -> RegistryId {
        self.id
    }

    pub fn options(&self) -> &RegistryOptions {
        &self.options
    }

    fn check_open(&self, name: &str) -> EnvSmartResult<()> {
        if self.is_frozen() {
            return Err(EnvSmartError::RegistryFrozen {
                name: name.to_string(),
            });
        }
        Ok(())
    }

    fn validate_name(&self, name: &str, kind: NameKind) -> EnvSmartResult<()> {
        let invalid = |reason| EnvSmartError::InvalidName {
            name: name.to_string(),
            reason,
        };

        if name.is_empty() {
            return Err(invalid("name must not be empty"));
        }
        if name.starts_with('_') {
            return Err(invalid("name must not start with '_'"));
        }
        if name == self.options.default_group_name {
            return Err(invalid("name is reserved for the default group"));
        }
        if self.options.reserved_names.iter().any(|r| r == name) {
            return Err(invalid("name is a reserved word"));
        }
        if let Some(pattern) = &self.options.name_pattern
            && !pattern.is_match(name)
        {
            return Err(invalid("name does not match the configured name pattern"));
        }

        if let Some(existing) = self.names.get(name) {
            return Err(EnvSmartError::NameCollision {
                name: name.to_string(),
                kind,
                existing: match existing {
                    EnvOrGroupId::Env(_) => NameKind::Env,
                    EnvOrGroupId::Group(_) => NameKind::Group,
                },
            });
        }

        Ok(())
    }

    fn allocate_bit(&mut self) -> usize {
        let bit = self.next_bit;
        self.next_bit += 1;
        bit
    }

    pub fn declare_env<S: AsRef<str>>(&mut self, name: S) -> EnvSmartResult<EnvId> {
        let name = name.as_ref();
        self.check_open(name)?;
        self.validate_name(name, NameKind::Env)?;

        let id = EnvId {
            registry: self.id,
            index: self.envs.len(),
        };
        let bit = self.allocate_bit();
        debug!(name, bit, "declare env");

        self.envs.push(Environment::new(id, name.to_string(), bit));
        self.names.insert(name.to_string(), id.into());
        Ok(id)
    }

    pub fn declare_group<S: AsRef<str>>(
        &mut self,
        name: S,
        members: &[EnvOrGroupId],
    ) -> EnvSmartResult<GroupId> {
        let name = name.as_ref();
        self.check_open(name)?;
        self.validate_name(name, NameKind::Group)?;

        if members.is_empty() {
            return Err(EnvSmartError::EmptyGroup {
                group: name.to_string(),
            });
        }
        if members.iter().any(|m| m.registry() != self.id) {
            return Err(EnvSmartError::ForeignMember {
                group: name.to_string(),
            });
        }
        if let Some(dup) = members.iter().duplicates().next() {
            return Err(EnvSmartError::DuplicateMember {
                group: name.to_string(),
                member: self.name_of_unchecked(*dup).to_string(),
            });
        }

        let bit = self.allocate_bit();
        let mut mask = BitMask::with_bit(bit);
        let mut envs = IndexSet::new();
        let mut groups = IndexSet::new();
        for member in members {
            match *member {
                EnvOrGroupId::Env(e) => {
                    mask.union_with(&self.envs[e.index].mask);
                    envs.insert(e);
                }
                EnvOrGroupId::Group(g) => {
                    let group = &self.groups[g.index];
                    mask.union_with(&group.mask);
                    groups.insert(g);
                    groups.extend(group.groups.iter().copied());
                    envs.extend(group.envs.iter().copied());
                }
            }
        }

        let id = GroupId {
            registry: self.id,
            index: self.groups.len(),
        };
        debug!(
            name,
            bit,
            members = %members.iter().map(|m| self.name_of_unchecked(*m)).join(", "),
            "declare group"
        );

        self.nested.extend(members.iter().copied());
        self.groups.push(EnvironmentGroup {
            id,
            name: name.to_string(),
            bit,
            mask,
            members: members.to_vec(),
            envs: envs.into_iter().collect(),
            groups: groups.into_iter().collect(),
        });
        self.names.insert(name.to_string(), id.into());
        Ok(id)
    }

    /// Freeze the registry: synthesize the default group and compute every env's lookup
    /// order. Calling this more than once has no further effect.
    pub fn freeze(&self) {
        self.frozen();
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen.get().is_some()
    }

    pub(crate) fn frozen(&self) -> &FrozenState {
        self.frozen.get_or_init(|| {
            let default_group = self.build_default_group();
            let tables = compute_lookup_tables(&self.envs, &self.groups, default_group.id);
            debug!(
                envs = self.envs.len(),
                groups = self.groups.len(),
                default_group = default_group.name.as_str(),
                "registry frozen"
            );
            FrozenState {
                default_group,
                tables,
            }
        })
    }

    fn build_default_group(&self) -> EnvironmentGroup {
        let members = self
            .groups
            .iter()
            .map(|g| EnvOrGroupId::from(g.id))
            .chain(self.envs.iter().map(|e| EnvOrGroupId::from(e.id)))
            .filter(|m| !self.nested.contains(m))
            .collect_vec();

        let bit = self.next_bit;
        let mut mask = BitMask::with_bit(bit);
        for member in members.iter() {
            mask.union_with(self.mask_of_unchecked(*member));
        }

        EnvironmentGroup {
            id: GroupId {
                registry: self.id,
                index: self.groups.len(),
            },
            name: self.options.default_group_name.clone(),
            bit,
            mask,
            members,
            envs: self.envs.iter().map(|e| e.id).collect(),
            groups: self.groups.iter().map(|g| g.id).collect(),
        }
    }

    pub(crate) fn lookup_table(&self, env: EnvId) -> EnvSmartResult<&LookupTable> {
        self.check_id(env.into())?;
        Ok(&self.frozen().tables[env.index])
    }

    fn check_id(&self, id: EnvOrGroupId) -> EnvSmartResult<()> {
        if id.registry() != self.id {
            return Err(EnvSmartError::ForeignId);
        }
        Ok(())
    }

    pub(crate) fn check_ids(&self, ids: &[EnvOrGroupId]) -> EnvSmartResult<()> {
        ids.iter().try_for_each(|id| self.check_id(*id))
    }

    pub fn env(&self, id: EnvId) -> EnvSmartResult<&Environment> {
        self.check_id(id.into())?;
        Ok(&self.envs[id.index])
    }

    /// Look up a group. The default group is only available once the registry is frozen.
    pub fn group(&self, id: GroupId) -> EnvSmartResult<&EnvironmentGroup> {
        self.check_id(id.into())?;
        if id.index < self.groups.len() {
            return Ok(&self.groups[id.index]);
        }
        self.frozen
            .get()
            .map(|f| &f.default_group)
            .ok_or(EnvSmartError::ForeignId)
    }

    // Ids taken from this registry's own tables are always valid
    pub(crate) fn group_unchecked(&self, id: GroupId) -> &EnvironmentGroup {
        if id.index < self.groups.len() {
            &self.groups[id.index]
        } else {
            &self.frozen().default_group
        }
    }

    pub(crate) fn name_of_unchecked(&self, id: EnvOrGroupId) -> &str {
        match id {
            EnvOrGroupId::Env(e) => &self.envs[e.index].name,
            EnvOrGroupId::Group(g) => &self.group_unchecked(g).name,
        }
    }

    pub(crate) fn mask_of_unchecked(&self, id: EnvOrGroupId) -> &BitMask {
        match id {
            EnvOrGroupId::Env(e) => &self.envs[e.index].mask,
            EnvOrGroupId::Group(g) => &self.group_unchecked(g).mask,
        }
    }

    pub fn name_of(&self, id: EnvOrGroupId) -> EnvSmartResult<&str> {
        match id {
            EnvOrGroupId::Env(e) => self.env(e).map(Environment::name),
            EnvOrGroupId::Group(g) => self.group(g).map(EnvironmentGroup::name),
        }
    }

    /// Find an env or group by name. The default group name is recognized once frozen.
    pub fn lookup<S: AsRef<str>>(&self, name: S) -> EnvSmartResult<EnvOrGroupId> {
        let name = name.as_ref();
        if let Some(id) = self.names.get(name) {
            return Ok(*id);
        }
        if let Some(frozen) = self.frozen.get()
            && frozen.default_group.name == name
        {
            return Ok(frozen.default_group.id.into());
        }
        Err(EnvSmartError::UnknownName {
            name: name.to_string(),
        })
    }

    pub fn env_from_name<S: AsRef<str>>(&self, name: S) -> EnvSmartResult<&Environment> {
        let name = name.as_ref();
        match self.lookup(name)? {
            EnvOrGroupId::Env(e) => self.env(e),
            EnvOrGroupId::Group(_) => Err(EnvSmartError::UnknownName {
                name: name.to_string(),
            }),
        }
    }

    pub fn group_from_name<S: AsRef<str>>(&self, name: S) -> EnvSmartResult<&EnvironmentGroup> {
        let name = name.as_ref();
        match self.lookup(name)? {
            EnvOrGroupId::Group(g) => self.group(g),
            EnvOrGroupId::Env(_) => Err(EnvSmartError::UnknownName {
                name: name.to_string(),
            }),
        }
    }

    /// Declared envs, in declaration order.
    pub fn envs(&self) -> impl Iterator<Item = &Environment> {
        self.envs.iter()
    }

    /// Declared groups, in declaration order. Does not include the default group.
    pub fn groups(&self) -> impl Iterator<Item = &EnvironmentGroup> {
        self.groups.iter()
    }

    pub fn default_group(&self) -> Option<&EnvironmentGroup> {
        self.frozen.get().map(|f| &f.default_group)
    }

    /// `true` if `outer` properly contains `inner`, i.e. `inner` is more specific.
    pub fn contains(&self, outer: EnvOrGroupId, inner: EnvOrGroupId) -> EnvSmartResult<bool> {
        self.check_ids(&[outer, inner])?;
        if let EnvOrGroupId::Group(g) = outer {
            // Resolve the default group only if frozen
            self.group(g)?;
        }
        if let EnvOrGroupId::Group(g) = inner {
            self.group(g)?;
        }
        Ok(mask_contains(
            self.mask_of_unchecked(outer),
            self.mask_of_unchecked(inner),
        ))
    }

    /// Groups containing `env`, most specific first, ending with the default group. Freezes
    /// the registry.
    pub fn lookup_order(&self, env: EnvId) -> EnvSmartResult<&[GroupId]> {
        Ok(&self.lookup_table(env)?.order)
    }

    /// Groups that are ambiguous with `group` when resolving for `env`. Freezes the registry.
    pub fn ambiguous_with(&self, env: EnvId, group: GroupId) -> EnvSmartResult<&[GroupId]> {
        self.check_id(group.into())?;
        Ok(self.lookup_table(env)?.ambiguous_with(group))
    }
}
