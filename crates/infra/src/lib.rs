mod config;
mod repos;
mod system;

pub use config::Config;
pub use repos::{
    EventsQuery, IEventRepo, IUserRepo, ParticipantEventsQuery, Repos, StaleEventError,
};
use std::sync::Arc;
pub use system::{ISys, RealSys, StaticTimeSys};
use tracing::warn;

#[derive(Clone)]
pub struct AgendaContext {
    pub repos: Repos,
    pub config: Config,
    pub sys: Arc<dyn ISys>,
}

impl AgendaContext {
    pub fn create_inmemory() -> Self {
        Self {
            repos: Repos::create_inmemory(),
            config: Config::new(),
            sys: Arc::new(RealSys {}),
        }
    }

    async fn create_postgres(config: Config, connection_string: &str) -> anyhow::Result<Self> {
        let repos = Repos::create_postgres(connection_string).await?;
        Ok(Self {
            repos,
            config,
            sys: Arc::new(RealSys {}),
        })
    }
}

/// Will setup the infrastructure context given the environment.
/// Postgres is used when `DATABASE_URL` is set, otherwise everything is kept in memory.
pub async fn setup_context() -> anyhow::Result<AgendaContext> {
    let config = Config::new();
    match config.database_url.clone() {
        Some(url) => AgendaContext::create_postgres(config, &url).await,
        None => {
            warn!("Running with in-memory repositories, nothing will be persisted");
            let mut ctx = AgendaContext::create_inmemory();
            ctx.config = config;
            Ok(ctx)
        }
    }
}
