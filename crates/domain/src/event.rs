use crate::{
    permissions::{Action, Forbidden, Grant, Permissions},
    roster::{ParticipantGrants, Roster},
    shared::{
        entity::{Entity, ID},
        InvalidVariantError,
    },
    timespan::TimeSpan,
};
use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventCategory {
    Personal,
    Team,
    Project,
}

impl EventCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Personal => "personal",
            Self::Team => "team",
            Self::Project => "project",
        }
    }
}

impl Default for EventCategory {
    fn default() -> Self {
        Self::Personal
    }
}

impl Display for EventCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EventCategory {
    type Err = InvalidVariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "personal" => Ok(Self::Personal),
            "team" => Ok(Self::Team),
            "project" => Ok(Self::Project),
            _ => Err(InvalidVariantError::new("event category", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: ID,
    pub title: String,
    pub start_ts: i64,
    pub end_ts: i64,
    pub category: EventCategory,
    pub description: String,
    pub location: String,
    pub is_recurring: bool,
    /// Opaque, nothing expands it
    pub recurrence_pattern: String,
    pub participants: Roster,
    pub permissions: Permissions,
    /// Bumped by the store on every save, used to detect concurrent writers
    pub version: i64,
    pub created: i64,
    pub updated: i64,
}

impl Entity for Event {
    fn id(&self) -> &ID {
        &self.id
    }
}

impl Event {
    pub fn timespan(&self) -> TimeSpan {
        TimeSpan::new(self.start_ts, self.end_ts)
    }

    pub fn overlaps(&self, timespan: &TimeSpan) -> bool {
        self.timespan().overlaps(timespan)
    }

    pub fn is_participant(&self, user_id: &ID) -> bool {
        self.participants.contains(user_id)
    }

    pub fn authorize(&self, user_id: &ID, action: Action) -> Result<(), Forbidden> {
        self.permissions.authorize(user_id, action)
    }

    /// Adds the given users to the roster and unions their grants into the
    /// permission map. Existing participants and grants are never removed.
    pub fn add_participants(&mut self, participants: &[ParticipantGrants]) {
        for participant in participants {
            self.participants.insert(participant.user_id);
            self.permissions
                .grant(participant.user_id, participant.grants.iter().cloned());
        }
    }

    /// Makes `user_id` a participant holding every permission
    pub fn add_owner(&mut self, user_id: ID) {
        self.participants.insert(user_id);
        self.permissions.grant(user_id, vec![Grant::All]);
    }

    pub fn apply_patch(&mut self, patch: EventPatch) {
        let EventPatch {
            title,
            start_ts,
            end_ts,
            category,
            description,
            location,
            is_recurring,
            recurrence_pattern,
            permissions,
        } = patch;

        if let Some(title) = title {
            self.title = title;
        }
        if let Some(start_ts) = start_ts {
            self.start_ts = start_ts;
        }
        if let Some(end_ts) = end_ts {
            self.end_ts = end_ts;
        }
        if let Some(category) = category {
            self.category = category;
        }
        if let Some(description) = description {
            self.description = description;
        }
        if let Some(location) = location {
            self.location = location;
        }
        if let Some(is_recurring) = is_recurring {
            self.is_recurring = is_recurring;
        }
        if let Some(recurrence_pattern) = recurrence_pattern {
            self.recurrence_pattern = recurrence_pattern;
        }
        if let Some(permissions) = permissions {
            self.permissions = permissions;
        }
    }

    /// Compares the roster with the keys of the permission map. Returns `None`
    /// when every participant has an entry and every entry is a participant.
    pub fn roster_desync(&self) -> Option<RosterDesync> {
        let grants_without_participant = self
            .permissions
            .user_ids()
            .filter(|user_id| !self.participants.contains(user_id))
            .cloned()
            .collect::<Vec<_>>();
        let participants_without_grants = self
            .participants
            .iter()
            .filter(|user_id| self.permissions.grants(user_id).is_none())
            .cloned()
            .collect::<Vec<_>>();

        if grants_without_participant.is_empty() && participants_without_grants.is_empty() {
            None
        } else {
            Some(RosterDesync {
                grants_without_participant,
                participants_without_grants,
            })
        }
    }
}

/// Disagreement between an `Event`s roster and its permission map
#[derive(Debug, Clone, PartialEq)]
pub struct RosterDesync {
    /// Keys of the permission map that are not in the roster
    pub grants_without_participant: Vec<ID>,
    /// Roster members without any entry in the permission map
    pub participants_without_grants: Vec<ID>,
}

/// The fields of an `Event` a client is allowed to change.
///
/// Relational and bookkeeping fields (id, participants, version, timestamps)
/// are not part of it, unknown fields are rejected when deserializing.
/// A provided `permissions` map replaces the existing one.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct EventPatch {
    pub title: Option<String>,
    pub start_ts: Option<i64>,
    pub end_ts: Option<i64>,
    pub category: Option<EventCategory>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub is_recurring: Option<bool>,
    pub recurrence_pattern: Option<String>,
    pub permissions: Option<Permissions>,
}

#[cfg(test)]
mod test {
    use super::*;

    fn generate_event() -> Event {
        Event {
            id: ID::new(1),
            title: "Team Meeting".into(),
            start_ts: 1000,
            end_ts: 2000,
            category: EventCategory::Team,
            description: "Project discussion".into(),
            location: "Conference Room 1".into(),
            is_recurring: false,
            recurrence_pattern: "".into(),
            participants: Default::default(),
            permissions: Default::default(),
            version: 0,
            created: 0,
            updated: 0,
        }
    }

    #[test]
    fn merging_participants_keeps_existing_state() {
        let mut event = generate_event();
        event.add_owner(ID::new(1));
        event.add_participants(&[ParticipantGrants::new(ID::new(2), vec![Grant::Read])]);
        event.add_participants(&[
            ParticipantGrants::new(ID::new(2), vec![Grant::Modify]),
            ParticipantGrants::new(ID::new(3), vec![Grant::ReadOnly]),
        ]);

        assert_eq!(
            event.participants.to_vec(),
            vec![ID::new(1), ID::new(2), ID::new(3)]
        );
        assert_eq!(
            event.permissions.grants(&ID::new(1)).unwrap().len(),
            1,
            "owner grants must not change"
        );
        assert!(event.permissions.allows(&ID::new(2), Action::Read));
        assert!(event.permissions.allows(&ID::new(2), Action::Modify));
        assert!(!event.permissions.allows(&ID::new(3), Action::Modify));
    }

    #[test]
    fn merging_the_same_grants_twice_is_idempotent() {
        let mut event = generate_event();
        let participants = vec![ParticipantGrants::new(
            ID::new(7),
            vec![Grant::Read, Grant::Modify],
        )];
        event.add_participants(&participants);
        let once = event.clone();
        event.add_participants(&participants);
        assert_eq!(event, once);
    }

    #[test]
    fn patch_only_touches_provided_fields() {
        let mut event = generate_event();
        event.add_owner(ID::new(1));
        let original = event.clone();

        event.apply_patch(EventPatch {
            title: Some("Retro".into()),
            end_ts: Some(3000),
            ..Default::default()
        });

        assert_eq!(event.title, "Retro");
        assert_eq!(event.end_ts, 3000);
        assert_eq!(event.start_ts, original.start_ts);
        assert_eq!(event.location, original.location);
        assert_eq!(event.participants, original.participants);
        assert_eq!(event.permissions, original.permissions);
    }

    #[test]
    fn patch_replaces_the_permission_map() {
        let mut event = generate_event();
        event.add_owner(ID::new(1));
        let permissions: Permissions = vec![(ID::new(2), vec![Grant::Read])].into_iter().collect();

        event.apply_patch(EventPatch {
            permissions: Some(permissions.clone()),
            ..Default::default()
        });

        assert_eq!(event.permissions, permissions);
        assert!(event.is_participant(&ID::new(1)));
    }

    #[test]
    fn patch_rejects_relational_fields() {
        let patch = serde_json::from_str::<EventPatch>(r#"{"title": "New"}"#).unwrap();
        assert_eq!(patch.title, Some("New".into()));

        assert!(serde_json::from_str::<EventPatch>(r#"{"participants": [1, 2]}"#).is_err());
        assert!(serde_json::from_str::<EventPatch>(r#"{"id": 5}"#).is_err());
        assert!(serde_json::from_str::<EventPatch>(r#"{"version": 5}"#).is_err());
    }

    #[test]
    fn detects_roster_desync() {
        let mut event = generate_event();
        event.add_owner(ID::new(1));
        assert_eq!(event.roster_desync(), None);

        event.participants.insert(ID::new(2));
        event.permissions.grant(ID::new(3), vec![Grant::Read]);

        assert_eq!(
            event.roster_desync(),
            Some(RosterDesync {
                grants_without_participant: vec![ID::new(3)],
                participants_without_grants: vec![ID::new(2)],
            })
        );
    }

    #[test]
    fn overlap_uses_the_event_interval() {
        let event = generate_event();
        assert!(event.overlaps(&TimeSpan::new(2000, 2500)));
        assert!(event.overlaps(&TimeSpan::new(500, 1000)));
        assert!(!event.overlaps(&TimeSpan::new(2001, 2500)));
    }

    #[test]
    fn categories_round_trip_through_strings() {
        for category in [EventCategory::Personal, EventCategory::Team, EventCategory::Project].iter() {
            assert_eq!(category.as_str().parse::<EventCategory>(), Ok(*category));
        }
        assert!("meeting".parse::<EventCategory>().is_err());
    }
}
