//!
//! ## Introduction
//! This crate resolves configuration values that differ per deployment environment. A
//! configuration declares its envs (`prod`, `staging`, `dev1`, ...) and groups of them, then
//! assigns attribute values keyed by env or group name. When the configuration is
//! materialized for one env, the most specific applicable value is picked, and any value
//! that cannot be picked unambiguously is reported instead of guessed.
//!
//! ## Terminology
//!
//! ### Envs, groups, and the default group
//! Consider these declarations:
//!
//! ```text
//! envs:    dev1 dev2 prod
//! groups:  g_dev = [dev1, dev2]
//!          g_all_dev = [g_dev]
//! ```
//!
//! `dev1` is contained in `g_dev`, and `g_dev` in `g_all_dev`. When the [`Registry`] freezes,
//! it adds an implicit **default group** (named `default` unless configured otherwise) whose
//! members are all top-level entries, here `g_all_dev` and `prod`. Every env is therefore
//! contained in at least one group.
//!
//! ### Masks
//! Every env and group owns one bit. An env's **mask** is its bit; a group's mask is its own
//! bit plus the masks of its members. "`a` contains `b`" is a subset test on masks. Because
//! groups carry their own bit, two groups with the same envs still don't contain each other
//! unless one is declared inside the other.
//!
//! ### Lookup order and ambiguity
//! For each env, the **lookup order** lists every group containing it, most specific first,
//! with the default group last. Two groups in that list where neither contains the other are
//! **ambiguous** for that env:
//!
//! ```text
//! groups:  g_dev = [dev1, dev2]
//!          g_first = [dev1, prod]
//! values:  g_dev = 2, g_first = 3
//! ```
//!
//! Resolving for `dev1` fails: both groups contain `dev1` and neither is more specific.
//! Resolving for `dev2` gives `2`, and for `prod` gives `3`. A value given for the env itself
//! always wins, so adding `dev1 = 1` makes `dev1` resolve to `1`.
//!
//! Both tables are computed once, when the registry freezes.
//!
//! ### Attribute stores and items
//! An [`AttributeValueStore`](attribute::AttributeValueStore) collects the values of one
//! attribute from several places (declared defaults, constructor values, later overrides).
//! Reading a value for an env freezes the store; later assignments need `force`. A
//! [`ConfigItem`](item::ConfigItem) groups stores by attribute name and adds include/exclude
//! lists deciding in which envs the item exists.
//!
//! ```
//! use envsmart::{Registry, env_values};
//!
//! let mut registry = Registry::new();
//! let dev1 = registry.declare_env("dev1").unwrap();
//! let dev2 = registry.declare_env("dev2").unwrap();
//! let prod = registry.declare_env("prod").unwrap();
//! registry.declare_group("g_dev", &[dev1.into(), dev2.into()]).unwrap();
//!
//! let values = env_values!(default => 7, g_dev => 2, dev1 => 1);
//! let resolve = |env| *registry.resolve_value(env, &values).unwrap().unwrap().value;
//! assert_eq!(resolve(dev1), 1);
//! assert_eq!(resolve(dev2), 2);
//! assert_eq!(resolve(prod), 7);
//! ```
extern crate self as envsmart;

pub mod attribute;
pub mod env;
pub mod errors;
pub mod ids;
pub mod item;
pub mod lookup;
pub mod macros;
pub mod options;
pub mod registry;
pub mod resolve;
pub mod select;

#[cfg(test)]
mod tests;

use indexmap::IndexMap;

pub use envsmart_macros::env_values;
pub use ids::{EnvId, EnvOrGroupId, GroupId};
pub use registry::Registry;

/// Map of env or group name to value, as built by [`env_values!`].
pub type EnvValues<V> = IndexMap<String, V>;
