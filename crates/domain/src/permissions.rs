use crate::shared::{entity::ID, InvalidVariantError};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::{fmt::Display, iter::FromIterator, str::FromStr};
use thiserror::Error;

/// A single permission token held by a `User` for a specific `Event`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Grant {
    Read,
    ReadOnly,
    Modify,
    Delete,
    /// Umbrella grant implying every other `Grant`
    All,
}

impl Grant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::ReadOnly => "read_only",
            Self::Modify => "modify",
            Self::Delete => "delete",
            Self::All => "all",
        }
    }
}

impl Display for Grant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Grant {
    type Err = InvalidVariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "read" => Ok(Self::Read),
            "read_only" => Ok(Self::ReadOnly),
            "modify" => Ok(Self::Modify),
            "delete" => Ok(Self::Delete),
            "all" => Ok(Self::All),
            _ => Err(InvalidVariantError::new("grant", s)),
        }
    }
}

/// Actions on an `Event` that are guarded by the `Permissions` map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Read,
    Modify,
    Delete,
}

impl Action {
    /// A single matching `Grant` is enough. `read` and `read_only` both allow reading.
    pub fn is_granted_by(&self, grant: &Grant) -> bool {
        matches!(
            (self, grant),
            (_, Grant::All)
                | (Action::Read, Grant::Read)
                | (Action::Read, Grant::ReadOnly)
                | (Action::Modify, Grant::Modify)
                | (Action::Delete, Grant::Delete)
        )
    }
}

impl Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let action = match self {
            Self::Read => "read",
            Self::Modify => "modify",
            Self::Delete => "delete",
        };
        write!(f, "{}", action)
    }
}

#[derive(Error, Debug, PartialEq)]
#[error("User: {user_id} does not have permission to {action} this event")]
pub struct Forbidden {
    pub user_id: ID,
    pub action: Action,
}

/// Per event mapping from a `User` to the set of `Grant`s it holds.
///
/// Keys are not required to be members of the event roster, see
/// `Event::roster_desync`. A `User` without an entry holds no grants,
/// so an empty map authorizes nobody.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permissions(BTreeMap<ID, BTreeSet<Grant>>);

impl Permissions {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn grants(&self, user_id: &ID) -> Option<&BTreeSet<Grant>> {
        self.0.get(user_id)
    }

    pub fn allows(&self, user_id: &ID, action: Action) -> bool {
        match self.grants(user_id) {
            Some(grants) => grants.iter().any(|grant| action.is_granted_by(grant)),
            None => false,
        }
    }

    /// Decides whether `user_id` may perform `action`
    pub fn authorize(&self, user_id: &ID, action: Action) -> Result<(), Forbidden> {
        if self.allows(user_id, action) {
            Ok(())
        } else {
            Err(Forbidden {
                user_id: *user_id,
                action,
            })
        }
    }

    /// Unions `grants` into the grant set of `user_id`, creating an empty set first
    /// when the user has no entry. Granting the same `Grant` twice has no effect.
    pub fn grant<I>(&mut self, user_id: ID, grants: I)
    where
        I: IntoIterator<Item = Grant>,
    {
        self.0.entry(user_id).or_default().extend(grants);
    }

    pub fn user_ids(&self) -> impl Iterator<Item = &ID> {
        self.0.keys()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl<I> FromIterator<(ID, I)> for Permissions
where
    I: IntoIterator<Item = Grant>,
{
    fn from_iter<T: IntoIterator<Item = (ID, I)>>(iter: T) -> Self {
        let mut permissions = Self::new();
        for (user_id, grants) in iter {
            permissions.grant(user_id, grants);
        }
        permissions
    }
}
