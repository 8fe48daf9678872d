use crate::attribute::{AttributeValueStore, ValueSource};
use crate::errors::EnvSmartResult;
use default_args::default_args;

extern crate self as _current_crate;

default_args! {
    export pub fn crate::macros::contribute<V, K: Into<String>>(store: &mut AttributeValueStore<V>, key: K, value: V, source: ValueSource, force: bool = false) -> EnvSmartResult<()> {
        store.contribute_ex(key, value, source, force)
    }
}

pub(crate) use contribute;
