use crate::errors::{EnvSmartError, NameKind};
use crate::ids::EnvOrGroupId;
use crate::env_values;
use crate::options::{RegistryOptions, RegistryOptionsBuilder};
use crate::registry::Registry;
use crate::tests::dev_envs;
use pretty_assertions::assert_eq;
use regex::Regex;

fn invalid_reason(err: EnvSmartError) -> &'static str {
    match err {
        EnvSmartError::InvalidName { reason, .. } => reason,
        other => panic!("expected InvalidName, got {other:?}"),
    }
}

#[test]
fn invalid_names() {
    let mut r = Registry::new();

    let err = r.declare_env("").unwrap_err();
    assert_eq!(invalid_reason(err), "name must not be empty");

    let err = r.declare_env("_private").unwrap_err();
    assert_eq!(invalid_reason(err), "name must not start with '_'");

    let err = r.declare_env("default").unwrap_err();
    assert_eq!(invalid_reason(err), "name is reserved for the default group");

    let dev = r.declare_env("dev").unwrap();
    let err = r.declare_group("_g", &[dev.into()]).unwrap_err();
    assert_eq!(invalid_reason(err), "name must not start with '_'");
}

#[test]
fn configured_names() {
    let options = RegistryOptionsBuilder::default()
        .default_group_name("everything")
        .reserved_names(vec!["self".to_string()])
        .name_pattern(Regex::new(r"^[a-z][a-z0-9]*$").unwrap())
        .build()
        .unwrap();
    let mut r = Registry::with_options(options);

    // `default` is an ordinary name once the default group is called something else
    let default = r.declare_env("default").unwrap();

    let err = r.declare_env("everything").unwrap_err();
    assert_eq!(invalid_reason(err), "name is reserved for the default group");

    let err = r.declare_env("self").unwrap_err();
    assert_eq!(invalid_reason(err), "name is a reserved word");

    let err = r.declare_env("Prod").unwrap_err();
    assert_eq!(
        invalid_reason(err),
        "name does not match the configured name pattern"
    );

    r.freeze();
    let group = r.default_group().unwrap();
    assert_eq!(group.name(), "everything");
    assert_eq!(group.envs(), &[default]);
}

#[test]
fn default_group_name_is_the_only_builtin_reserved_word() {
    let options = RegistryOptions::default();
    assert!(options.reserved_names.is_empty());

    let mut r = Registry::with_options(options);
    let self_env = r.declare_env("self").unwrap();
    let type_env = r.declare_env("type").unwrap();
    assert!(r.declare_env("default").is_err());

    let values = env_values!(self => 1, type => 2);
    assert_eq!(*r.resolve_value(self_env, &values).unwrap().unwrap().value, 1);
    assert_eq!(*r.resolve_value(type_env, &values).unwrap().unwrap().value, 2);
}

#[test]
fn name_collisions() {
    let mut d = dev_envs();

    assert_eq!(
        d.registry.declare_env("dev1"),
        Err(EnvSmartError::NameCollision {
            name: "dev1".into(),
            kind: NameKind::Env,
            existing: NameKind::Env,
        })
    );
    assert_eq!(
        d.registry.declare_env("g_dev"),
        Err(EnvSmartError::NameCollision {
            name: "g_dev".into(),
            kind: NameKind::Env,
            existing: NameKind::Group,
        })
    );
    assert_eq!(
        d.registry.declare_group("prod", &[d.dev1.into()]),
        Err(EnvSmartError::NameCollision {
            name: "prod".into(),
            kind: NameKind::Group,
            existing: NameKind::Env,
        })
    );

    let err = d.registry.declare_env("g_dev").unwrap_err();
    assert_eq!(
        err.to_string(),
        r#"Can't create env named "g_dev", the name is already used by group"#
    );
}

#[test]
fn invalid_groups() {
    let mut d = dev_envs();

    assert_eq!(
        d.registry.declare_group("g_empty", &[]),
        Err(EnvSmartError::EmptyGroup {
            group: "g_empty".into()
        })
    );
    assert_eq!(
        d.registry
            .declare_group("g_dup", &[d.dev1.into(), d.prod.into(), d.dev1.into()]),
        Err(EnvSmartError::DuplicateMember {
            group: "g_dup".into(),
            member: "dev1".into(),
        })
    );

    let mut other = Registry::new();
    let foreign = other.declare_env("foreign").unwrap();
    assert_eq!(
        d.registry
            .declare_group("g_foreign", &[d.dev1.into(), foreign.into()]),
        Err(EnvSmartError::ForeignMember {
            group: "g_foreign".into()
        })
    );

    // Nothing was declared by the failed calls
    assert_eq!(d.registry.groups().count(), 1);
    assert!(d.registry.lookup("g_dup").is_err());
}

#[test]
fn frozen_registry() {
    let mut d = dev_envs();
    d.registry.freeze();
    d.registry.freeze();
    assert!(d.registry.is_frozen());

    assert_eq!(
        d.registry.declare_env("staging"),
        Err(EnvSmartError::RegistryFrozen {
            name: "staging".into()
        })
    );
    assert_eq!(
        d.registry.declare_group("g_prod", &[d.prod.into()]),
        Err(EnvSmartError::RegistryFrozen {
            name: "g_prod".into()
        })
    );
}

#[test]
fn bits_are_sequential_from_one() {
    let d = dev_envs();
    let r = &d.registry;

    assert_eq!(r.env(d.dev1).unwrap().bit(), 1);
    assert_eq!(r.env(d.dev2).unwrap().bit(), 2);
    assert_eq!(r.env(d.prod).unwrap().bit(), 3);

    let g_dev = r.group(d.g_dev).unwrap();
    assert_eq!(g_dev.bit(), 4);
    assert_eq!(g_dev.mask().iter_ones().collect::<Vec<_>>(), vec![1, 2, 4]);

    r.freeze();
    let default = r.default_group().unwrap();
    assert_eq!(default.bit(), 5);
    assert_eq!(
        default.mask().iter_ones().collect::<Vec<_>>(),
        vec![1, 2, 3, 4, 5]
    );
}

#[test]
fn nested_groups_flatten() {
    let mut r = Registry::new();
    let a = r.declare_env("a").unwrap();
    let b = r.declare_env("b").unwrap();
    let c = r.declare_env("c").unwrap();
    let inner = r.declare_group("inner", &[a.into(), b.into()]).unwrap();
    let middle = r.declare_group("middle", &[inner.into(), a.into()]).unwrap();
    let outer = r.declare_group("outer", &[c.into(), middle.into()]).unwrap();

    let middle_group = r.group(middle).unwrap();
    assert_eq!(
        middle_group.members(),
        &[EnvOrGroupId::from(inner), EnvOrGroupId::from(a)]
    );
    assert_eq!(middle_group.envs(), &[a, b]);
    assert_eq!(middle_group.groups(), &[inner]);

    let outer_group = r.group(outer).unwrap();
    assert_eq!(outer_group.envs(), &[c, a, b]);
    assert_eq!(outer_group.groups(), &[middle, inner]);

    assert!(r.contains(outer.into(), inner.into()).unwrap());
    assert!(r.contains(outer.into(), a.into()).unwrap());
    assert!(!r.contains(inner.into(), outer.into()).unwrap());
    assert!(!r.contains(inner.into(), c.into()).unwrap());
    assert!(!r.contains(inner.into(), inner.into()).unwrap());
}

#[test]
fn default_group_members_are_top_level() {
    let d = dev_envs();
    d.registry.freeze();

    let default = d.registry.default_group().unwrap();
    assert_eq!(default.name(), "default");
    assert_eq!(
        default.members(),
        &[EnvOrGroupId::from(d.g_dev), EnvOrGroupId::from(d.prod)]
    );
    assert_eq!(default.envs(), &[d.dev1, d.dev2, d.prod]);
    assert_eq!(default.groups(), &[d.g_dev]);
}

#[test]
fn lookup_by_name() {
    let d = dev_envs();
    let r = &d.registry;

    assert_eq!(r.lookup("dev2").unwrap(), EnvOrGroupId::Env(d.dev2));
    assert_eq!(r.lookup("g_dev").unwrap(), EnvOrGroupId::Group(d.g_dev));
    assert_eq!(r.env_from_name("prod").unwrap().id(), d.prod);
    assert_eq!(r.group_from_name("g_dev").unwrap().id(), d.g_dev);
    assert_eq!(
        r.env_from_name("g_dev").unwrap_err(),
        EnvSmartError::UnknownName {
            name: "g_dev".into()
        }
    );
    assert_eq!(r.name_of(d.dev1.into()).unwrap(), "dev1");

    // The default group only exists once frozen
    assert!(r.lookup("default").is_err());
    assert!(r.default_group().is_none());
    r.freeze();
    let default = r.lookup("default").unwrap();
    assert_eq!(r.name_of(default).unwrap(), "default");
    assert_eq!(r.group_from_name("default").unwrap().envs().len(), 3);

    let mut other = Registry::new();
    let foreign = other.declare_env("dev1").unwrap();
    assert_eq!(r.env(foreign).unwrap_err(), EnvSmartError::ForeignId);
}
