mod add_participants;
mod create_event;
mod delete_event;
mod detect_conflicts;
mod get_all_events;
mod get_event;
mod get_my_events;
mod pagination;
mod subscribers;
mod update_event;

pub use add_participants::add_participants;
pub use create_event::{create_event, CreateEventInput};
pub use delete_event::delete_event;
pub use detect_conflicts::detect_conflicts;
pub use get_event::get_event;
pub use get_all_events::get_all_events;
pub use get_my_events::get_my_events;
pub use pagination::{EventsPage, Pagination};
pub use update_event::update_event;
