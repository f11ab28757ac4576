//! Inbound calls of the event engine. Every call takes the acting `User`
//! explicitly and returns an `AgendaError` on failure.

mod error;
mod event;
mod shared;

pub use error::AgendaError;
pub use event::*;
pub use shared::auth::authorize;
