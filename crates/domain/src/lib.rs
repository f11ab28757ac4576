mod conflict;
mod event;
mod permissions;
mod roster;
mod shared;
mod timespan;
mod user;

pub use conflict::{filter_conflicting_events, ConflictReport};
pub use event::{Event, EventCategory, EventPatch, RosterDesync};
pub use permissions::{Action, Forbidden, Grant, Permissions};
pub use roster::{ParticipantGrants, Roster};
pub use shared::entity::{Entity, InvalidIDError, ID};
pub use shared::InvalidVariantError;
pub use timespan::{InvalidTimeSpanError, TimeSpan, TimeSpanDateTime};
pub use user::{Role, Status, User};
