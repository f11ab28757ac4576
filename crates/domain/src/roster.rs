use crate::{permissions::Grant, shared::entity::ID};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::iter::FromIterator;

/// The set of `User`s participating in an `Event`. Membership is unique by `ID`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Roster(BTreeSet<ID>);

impl Roster {
    pub fn new() -> Self {
        Default::default()
    }

    /// Returns `false` if the user was already a participant
    pub fn insert(&mut self, user_id: ID) -> bool {
        self.0.insert(user_id)
    }

    pub fn contains(&self, user_id: &ID) -> bool {
        self.0.contains(user_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ID> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_vec(&self) -> Vec<ID> {
        self.0.iter().cloned().collect()
    }
}

impl FromIterator<ID> for Roster {
    fn from_iter<T: IntoIterator<Item = ID>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A participant to add to an `Event` together with the `Grant`s it should receive
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantGrants {
    pub user_id: ID,
    #[serde(rename = "permissions")]
    pub grants: Vec<Grant>,
}

impl ParticipantGrants {
    pub fn new(user_id: ID, grants: Vec<Grant>) -> Self {
        Self { user_id, grants }
    }
}
