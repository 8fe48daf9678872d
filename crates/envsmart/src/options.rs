use derive_builder::Builder;
use regex::Regex;

pub const DEFAULT_GROUP_NAME: &str = "default";

/// Registry configuration.
///
/// ```
/// use envsmart::options::RegistryOptionsBuilder;
/// use regex::Regex;
///
/// let options = RegistryOptionsBuilder::default()
///     .default_group_name("all")
///     .reserved_names(vec!["self".to_string()])
///     .name_pattern(Regex::new(r"^[a-z][a-z0-9_]*$").unwrap())
///     .build()
///     .unwrap();
/// assert_eq!(options.default_group_name, "all");
/// ```
#[derive(Debug, Builder, Clone)]
#[builder(setter(into))]
pub struct RegistryOptions {
    /// Name of the implicit group that contains every env, synthesized at freeze
    #[builder(default = "DEFAULT_GROUP_NAME.to_string()")]
    pub default_group_name: String,

    /// Names that may not be used for envs or groups. Empty by default: the default group
    /// name is the only built-in reserved word. Keywords such as `self` are accepted as
    /// names, and [`env_values!`](crate::env_values) takes them as keys.
    #[builder(default)]
    pub reserved_names: Vec<String>,

    /// If set, every env and group name must match
    #[builder(default, setter(strip_option))]
    pub name_pattern: Option<Regex>,
}

impl Default for RegistryOptions {
    fn default() -> Self {
        Self {
            default_group_name: DEFAULT_GROUP_NAME.to_string(),
            reserved_names: vec![],
            name_pattern: None,
        }
    }
}
