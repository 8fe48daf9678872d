use crate::env::mask_contains;
use crate::errors::{AmbiguousSelection, EnvSmartResult};
use crate::ids::{EnvId, EnvOrGroupId};
use crate::registry::Registry;
use std::iter::once;
use tracing::trace;

/// Which of two env/group lists applies most specifically to an env.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Specificity {
    First,
    Second,
    Neither,
}

impl Registry {
    /// Decide which of `first` and `second` claims `env` most specifically, e.g. an include
    /// list against an exclude list.
    ///
    /// Each list is matched against `env` itself and then its lookup order; the earliest
    /// element found is that list's match. When both lists match, the more specific match
    /// wins. Matching the identical element, or two elements where neither contains the
    /// other, is an [`AmbiguousSelection`].
    pub fn select_more_specific(
        &self,
        env: EnvId,
        first: &[EnvOrGroupId],
        second: &[EnvOrGroupId],
    ) -> EnvSmartResult<Specificity> {
        self.check_ids(first)?;
        self.check_ids(second)?;
        let table = self.lookup_table(env)?;

        let chain = once(EnvOrGroupId::Env(env))
            .chain(table.order.iter().copied().map(EnvOrGroupId::Group));
        let find = |list: &[EnvOrGroupId]| chain.clone().find(|eg| list.contains(eg));

        let ret = match (find(first), find(second)) {
            (None, None) => Specificity::Neither,
            (Some(_), None) => Specificity::First,
            (None, Some(_)) => Specificity::Second,
            (Some(eg1), Some(eg2)) => {
                let mask1 = self.mask_of_unchecked(eg1);
                let mask2 = self.mask_of_unchecked(eg2);
                if eg1 != eg2 && mask_contains(mask2, mask1) {
                    Specificity::First
                } else if eg1 != eg2 && mask_contains(mask1, mask2) {
                    Specificity::Second
                } else {
                    return Err(AmbiguousSelection {
                        env: self.name_of_unchecked(env.into()).to_string(),
                        first: eg1,
                        first_name: self.name_of_unchecked(eg1).to_string(),
                        second: eg2,
                        second_name: self.name_of_unchecked(eg2).to_string(),
                    }
                    .into());
                }
            }
        };

        trace!(
            env = self.name_of_unchecked(env.into()),
            selected = ?ret,
            "select more specific"
        );
        Ok(ret)
    }
}
