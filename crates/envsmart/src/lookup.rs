/*!
Freeze-time precomputation of per-env lookup orders and ambiguity tables.

For an env `e`, the lookup order is every declared group containing `e`, ordered by the
number of bits in the group mask and then by declaration order, followed by the implicit
default group. A group's mask is a strict superset of the mask of every group nested in
it, so a group always comes before every group that contains it.

Two groups in the order where neither contains the other are *ambiguous* for `e`: if both
have a value, there is no single most specific one.
 */

use crate::env::{Environment, EnvironmentGroup, mask_contains};
use crate::ids::GroupId;
use fxhash::FxHashMap;
use itertools::Itertools;
use tracing::trace;

#[derive(Debug, Default)]
pub(crate) struct LookupTable {
    pub(crate) order: Vec<GroupId>,
    pub(crate) ambiguous: FxHashMap<GroupId, Vec<GroupId>>,
}

impl LookupTable {
    pub(crate) fn ambiguous_with(&self, group: GroupId) -> &[GroupId] {
        self.ambiguous.get(&group).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// State computed exactly once, when the registry freezes.
#[derive(Debug)]
pub(crate) struct FrozenState {
    pub(crate) default_group: EnvironmentGroup,
    /// Indexed by env index
    pub(crate) tables: Vec<LookupTable>,
}

pub(crate) fn compute_lookup_table(
    env: &Environment,
    groups: &[EnvironmentGroup],
    default_group: GroupId,
) -> LookupTable {
    let containing = groups
        .iter()
        .filter(|g| g.contains_env(env))
        .sorted_by_key(|g| (g.mask.count_ones(), g.id.index))
        .collect_vec();

    let mut ambiguous: FxHashMap<GroupId, Vec<GroupId>> = FxHashMap::default();
    for (i, a) in containing.iter().enumerate() {
        for b in &containing[i + 1..] {
            if !mask_contains(&a.mask, &b.mask) && !mask_contains(&b.mask, &a.mask) {
                trace!(env = env.name(), a = a.name(), b = b.name(), "ambiguous groups");
                ambiguous.entry(a.id).or_default().push(b.id);
                ambiguous.entry(b.id).or_default().push(a.id);
            }
        }
    }

    let mut order = containing.iter().map(|g| g.id).collect_vec();
    order.push(default_group);

    LookupTable { order, ambiguous }
}

pub(crate) fn compute_lookup_tables(
    envs: &[Environment],
    groups: &[EnvironmentGroup],
    default_group: GroupId,
) -> Vec<LookupTable> {
    envs.iter()
        .map(|env| compute_lookup_table(env, groups, default_group))
        .collect()
}
