use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_REGISTRY_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of one [`Registry`](crate::registry::Registry) instance. Ids handed out by a
/// registry carry it, so members and lookups from another registry can be rejected.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegistryId(u64);

impl RegistryId {
    pub(crate) fn next() -> Self {
        RegistryId(NEXT_REGISTRY_ID.fetch_add(1, Ordering::Relaxed))
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EnvId {
    pub(crate) registry: RegistryId,
    pub(crate) index: usize,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupId {
    pub(crate) registry: RegistryId,
    pub(crate) index: usize,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, derive_more::From)]
pub enum EnvOrGroupId {
    Env(EnvId),
    Group(GroupId),
}

impl EnvOrGroupId {
    pub fn registry(&self) -> RegistryId {
        match self {
            EnvOrGroupId::Env(e) => e.registry,
            EnvOrGroupId::Group(g) => g.registry,
        }
    }

    pub fn as_env(&self) -> Option<EnvId> {
        match self {
            EnvOrGroupId::Env(e) => Some(*e),
            EnvOrGroupId::Group(_) => None,
        }
    }

    pub fn as_group(&self) -> Option<GroupId> {
        match self {
            EnvOrGroupId::Env(_) => None,
            EnvOrGroupId::Group(g) => Some(*g),
        }
    }
}
