use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct Config {
    /// Postgres connection string. The in-memory repositories are used when it is missing.
    pub database_url: Option<String>,
    /// How many times a read-modify-write of an `Event` is retried after losing
    /// a race against a concurrent writer, before giving up with a conflict.
    pub max_save_retries: usize,
    /// Page size used when listing the `Event`s of a `User` without an explicit limit
    pub default_events_page_size: usize,
    /// Upper bound for the page size when listing the `Event`s of a `User`.
    /// Larger requested limits are clamped to it.
    pub events_page_limit: usize,
}

fn parse_env_var(name: &str, default: usize) -> usize {
    match std::env::var(name) {
        Ok(value) => match value.parse::<usize>() {
            Ok(value) => value,
            Err(_) => {
                warn!(
                    "The given {}: {} is not valid, falling back to the default: {}.",
                    name, value, default
                );
                default
            }
        },
        Err(_) => default,
    }
}

impl Config {
    pub fn new() -> Self {
        let database_url = match std::env::var("DATABASE_URL") {
            Ok(url) => Some(url),
            Err(_) => {
                info!("Did not find DATABASE_URL environment variable. Events and users will be kept in memory.");
                None
            }
        };

        let events_page_limit = parse_env_var("AGENDA_EVENTS_PAGE_LIMIT", 50).max(1);

        Self {
            database_url,
            max_save_retries: parse_env_var("AGENDA_MAX_SAVE_RETRIES", 3),
            default_events_page_size: events_page_limit.min(10),
            events_page_limit,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
