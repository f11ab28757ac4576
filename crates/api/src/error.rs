use agenda_domain::Forbidden;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum AgendaError {
    #[error("Internal server error")]
    InternalError,
    #[error("Invalid data provided: Error message: `{0}`")]
    BadClientData(String),
    #[error("There was a conflict with the request. Error message: `{0}`")]
    Conflict(String),
    #[error("Forbidden request. Error message: `{0}`")]
    Forbidden(String),
    #[error("404 Not found. Error message: `{0}`")]
    NotFound(String),
}

impl From<Forbidden> for AgendaError {
    fn from(e: Forbidden) -> Self {
        Self::Forbidden(e.to_string())
    }
}
