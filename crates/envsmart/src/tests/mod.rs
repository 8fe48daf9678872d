mod names;

use crate::ids::{EnvId, GroupId};
use crate::registry::Registry;

/// `dev1`, `dev2` in `g_dev`, plus `prod`.
pub(crate) struct DevEnvs {
    pub(crate) registry: Registry,
    pub(crate) dev1: EnvId,
    pub(crate) dev2: EnvId,
    pub(crate) prod: EnvId,
    pub(crate) g_dev: GroupId,
}

pub(crate) fn dev_envs() -> DevEnvs {
    let mut registry = Registry::new();
    let dev1 = registry.declare_env("dev1").unwrap();
    let dev2 = registry.declare_env("dev2").unwrap();
    let prod = registry.declare_env("prod").unwrap();
    let g_dev = registry
        .declare_group("g_dev", &[dev1.into(), dev2.into()])
        .unwrap();

    DevEnvs {
        registry,
        dev1,
        dev2,
        prod,
        g_dev,
    }
}

#[cfg(test)]
mod test {
    use crate::tests::dev_envs;

    #[test]
    fn registry_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<crate::registry::Registry>();
    }

    #[test]
    fn fixture() {
        let d = dev_envs();
        assert!(!d.registry.is_frozen());
        assert_eq!(d.registry.envs().count(), 3);
        assert_eq!(d.registry.groups().count(), 1);
        assert_eq!(d.registry.env(d.prod).unwrap().name(), "prod");
        assert_eq!(d.registry.group(d.g_dev).unwrap().name(), "g_dev");
    }
}
