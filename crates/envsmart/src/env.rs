use crate::ids::{EnvId, EnvOrGroupId, GroupId};
use envsmart_util::bitmask::BitMask;

/// `true` if `outer` properly contains `inner`.
///
/// Every env and group owns a distinct bit, so two different entries never have equal masks
/// and this is a strict partial order.
pub(crate) fn mask_contains(outer: &BitMask, inner: &BitMask) -> bool {
    inner.is_subset_of(outer) && inner != outer
}

/// A leaf deployment target, e.g. `prod`.
#[derive(Debug)]
pub struct Environment {
    pub(crate) id: EnvId,
    pub(crate) name: String,
    pub(crate) bit: usize,
    pub(crate) mask: BitMask,
}

impl Environment {
    pub(crate) fn new(id: EnvId, name: String, bit: usize) -> Self {
        Environment {
            id,
            name,
            bit,
            mask: BitMask::with_bit(bit),
        }
    }

    pub fn id(&self) -> EnvId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bit(&self) -> usize {
        self.bit
    }

    pub fn mask(&self) -> &BitMask {
        &self.mask
    }
}

/// A named set of envs and other groups.
///
/// The mask is the union of the member masks plus a bit owned by the group itself. The own
/// bit makes a group distinguishable from any other group with the same env membership, so
/// containment between groups follows declared nesting only.
#[derive(Debug)]
pub struct EnvironmentGroup {
    pub(crate) id: GroupId,
    pub(crate) name: String,
    pub(crate) bit: usize,
    pub(crate) mask: BitMask,
    pub(crate) members: Vec<EnvOrGroupId>,
    // Flattened, each entry once, in the order first reached
    pub(crate) envs: Vec<EnvId>,
    pub(crate) groups: Vec<GroupId>,
}

impl EnvironmentGroup {
    pub fn id(&self) -> GroupId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bit(&self) -> usize {
        self.bit
    }

    pub fn mask(&self) -> &BitMask {
        &self.mask
    }

    /// Direct members, in declaration order.
    pub fn members(&self) -> &[EnvOrGroupId] {
        &self.members
    }

    /// Every env reachable through this group and its nested groups.
    pub fn envs(&self) -> &[EnvId] {
        &self.envs
    }

    /// Every group nested in this group, at any depth.
    pub fn groups(&self) -> &[GroupId] {
        &self.groups
    }

    pub fn contains_env(&self, env: &Environment) -> bool {
        mask_contains(&self.mask, &env.mask)
    }

    pub fn contains_group(&self, group: &EnvironmentGroup) -> bool {
        mask_contains(&self.mask, &group.mask)
    }
}
