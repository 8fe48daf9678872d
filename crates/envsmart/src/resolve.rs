use crate::errors::{AmbiguousResolution, Competitor, EnvSmartResult};
use crate::ids::{EnvId, EnvOrGroupId};
use crate::registry::Registry;
use indexmap::IndexMap;
use itertools::Itertools;
use std::collections::{BTreeMap, HashMap};
use std::fmt::Debug;
use std::hash::BuildHasher;
use tracing::trace;

/// Any map from env or group name to a candidate value.
pub trait CandidateMap<V> {
    fn candidate(&self, name: &str) -> Option<&V>;
}

impl<V, S: BuildHasher> CandidateMap<V> for IndexMap<String, V, S> {
    fn candidate(&self, name: &str) -> Option<&V> {
        self.get(name)
    }
}

impl<V, S: BuildHasher> CandidateMap<V> for HashMap<String, V, S> {
    fn candidate(&self, name: &str) -> Option<&V> {
        self.get(name)
    }
}

impl<V> CandidateMap<V> for BTreeMap<String, V> {
    fn candidate(&self, name: &str) -> Option<&V> {
        self.get(name)
    }
}

/// The winning value and the env or group whose key it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolved<'c, V> {
    pub value: &'c V,
    pub source: EnvOrGroupId,
}

impl Registry {
    /// Pick the most specific value for `env` out of `candidates`.
    ///
    /// A value keyed by the env's own name always wins. Otherwise the first group in the
    /// env's lookup order that has a value wins, unless any group ambiguous with it also has
    /// a value; then every such group is reported in an
    /// [`AmbiguousResolution`](crate::errors::AmbiguousResolution). `Ok(None)` means no
    /// candidate applies, not even one for the default group.
    ///
    /// Freezes the registry if it is not frozen yet.
    pub fn resolve_value<'c, V, M>(
        &self,
        env: EnvId,
        candidates: &'c M,
    ) -> EnvSmartResult<Option<Resolved<'c, V>>>
    where
        V: Debug + 'c,
        M: CandidateMap<V> + ?Sized,
    {
        let table = self.lookup_table(env)?;
        let env_name = self.env(env)?.name();

        if let Some(value) = candidates.candidate(env_name) {
            trace!(env = env_name, "direct env value");
            return Ok(Some(Resolved {
                value,
                source: env.into(),
            }));
        }

        for group_id in table.order.iter().copied() {
            let group = self.group_unchecked(group_id);
            let Some(value) = candidates.candidate(group.name()) else {
                continue;
            };

            let competitors = table
                .ambiguous_with(group_id)
                .iter()
                .filter_map(|other| {
                    let other = self.group_unchecked(*other);
                    candidates.candidate(other.name()).map(|v| Competitor {
                        id: other.id().into(),
                        name: other.name().to_string(),
                        value: format!("{v:?}"),
                    })
                })
                .collect_vec();

            if !competitors.is_empty() {
                trace!(
                    env = env_name,
                    group = group.name(),
                    competitors = competitors.len(),
                    "ambiguous resolution"
                );
                return Err(AmbiguousResolution {
                    env: env_name.to_string(),
                    winner: Competitor {
                        id: group_id.into(),
                        name: group.name().to_string(),
                        value: format!("{value:?}"),
                    },
                    competitors,
                }
                .into());
            }

            trace!(env = env_name, group = group.name(), "resolved from group");
            return Ok(Some(Resolved {
                value,
                source: group_id.into(),
            }));
        }

        trace!(env = env_name, "no value");
        Ok(None)
    }
}
