use crate::error::AgendaError;
use agenda_domain::{Action, Event, ID};

/// Checks that `acting_user_id` holds a `Grant` on `event` covering `action`.
///
/// `all` covers every action, `read` is also covered by `read_only`.
/// Missing entries in the `Permissions` map authorize nothing.
pub fn authorize(event: &Event, acting_user_id: &ID, action: Action) -> Result<(), AgendaError> {
    event
        .authorize(acting_user_id, action)
        .map_err(AgendaError::from)
}

#[cfg(test)]
mod test {
    use super::*;
    use agenda_domain::{EventCategory, Grant, ParticipantGrants};

    fn generate_event(grants: Vec<(i64, Vec<Grant>)>) -> Event {
        let mut e = Event {
            id: ID::new(1),
            title: "Launch Event".into(),
            start_ts: 0,
            end_ts: 100,
            category: EventCategory::Personal,
            description: Default::default(),
            location: Default::default(),
            is_recurring: false,
            recurrence_pattern: Default::default(),
            participants: Default::default(),
            permissions: Default::default(),
            version: 0,
            created: 0,
            updated: 0,
        };
        let grants = grants
            .into_iter()
            .map(|(user_id, grants)| ParticipantGrants::new(ID::new(user_id), grants))
            .collect::<Vec<_>>();
        e.add_participants(&grants);
        e
    }

    #[test]
    fn all_grant_authorizes_delete() {
        let e = generate_event(vec![(1, vec![Grant::All])]);
        assert_eq!(authorize(&e, &ID::new(1), Action::Delete), Ok(()));
    }

    #[test]
    fn read_only_grant_does_not_authorize_modify() {
        let e = generate_event(vec![(2, vec![Grant::ReadOnly])]);
        let res = authorize(&e, &ID::new(2), Action::Modify);
        assert!(matches!(res, Err(AgendaError::Forbidden(_))));
        assert_eq!(authorize(&e, &ID::new(2), Action::Read), Ok(()));
    }

    #[test]
    fn unknown_user_is_forbidden() {
        let e = generate_event(vec![(1, vec![Grant::All])]);
        for action in [Action::Read, Action::Modify, Action::Delete].iter() {
            assert!(authorize(&e, &ID::new(3), *action).is_err());
        }
    }
}
