use crate::ids::EnvOrGroupId;
use itertools::Itertools;
use std::fmt::{Display, Formatter};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EnvSmartError {
    #[error("Invalid env or group name {name:?}: {reason}")]
    InvalidName { name: String, reason: &'static str },

    #[error("Can't create {kind} named {name:?}, the name is already used by {existing}")]
    NameCollision {
        name: String,
        kind: NameKind,
        existing: NameKind,
    },

    #[error("Group {group:?} must have at least one member")]
    EmptyGroup { group: String },

    #[error("Group {group:?} lists member {member:?} more than once")]
    DuplicateMember { group: String, member: String },

    #[error("Group {group:?} has a member that belongs to a different registry")]
    ForeignMember { group: String },

    #[error("Env or group id belongs to a different registry")]
    ForeignId,

    #[error("Can't declare {name:?}, the registry is frozen")]
    RegistryFrozen { name: String },

    #[error("No such env or group: {name:?}")]
    UnknownName { name: String },

    #[error("Item {item:?} has no attribute {attribute:?}")]
    UnknownAttribute { item: String, attribute: String },

    #[error("Can't assign {key:?} on attribute {attribute:?}, the value has already been read")]
    StoreFrozen { attribute: String, key: String },

    #[error("Attribute {attribute:?} has no value for env {env:?}")]
    MissingValue { attribute: String, env: String },

    #[error(transparent)]
    AmbiguousResolution(#[from] AmbiguousResolution),

    #[error(transparent)]
    AmbiguousSelection(#[from] AmbiguousSelection),
}

pub type EnvSmartResult<T> = Result<T, EnvSmartError>;

#[derive(Debug, Copy, Clone, PartialEq, Eq, derive_more::Display)]
pub enum NameKind {
    #[display("env")]
    Env,
    #[display("group")]
    Group,
}

/// One side of an ambiguous resolution: the env or group key and its contributed value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Competitor {
    pub id: EnvOrGroupId,
    pub name: String,
    /// `Debug` rendering of the contributed value
    pub value: String,
}

impl Display for Competitor {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}={}", self.name, self.value)
    }
}

/// A value was given for several groups containing the env, with no single most specific
/// group among them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error(
    "Value for env {env:?} is specified more than once, with no single most specific group \
     or direct env value: {winner}, {}",
    .competitors.iter().join(", ")
)]
pub struct AmbiguousResolution {
    pub env: String,
    /// The first matching group in the env's lookup order
    pub winner: Competitor,
    /// Every other matching group that is not nested with `winner`
    pub competitors: Vec<Competitor>,
}

impl AmbiguousResolution {
    /// Names of all groups involved, winner first.
    pub fn group_names(&self) -> Vec<&str> {
        std::iter::once(&self.winner)
            .chain(self.competitors.iter())
            .map(|c| c.name.as_str())
            .collect()
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error(
    "Ambiguous selection for env {env:?}: {first_name:?} and {second_name:?} are equally specific"
)]
pub struct AmbiguousSelection {
    pub env: String,
    pub first: EnvOrGroupId,
    pub first_name: String,
    pub second: EnvOrGroupId,
    pub second_name: String,
}
