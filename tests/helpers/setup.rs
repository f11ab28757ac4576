use agenda_domain::{Role, User};
use agenda_infra::{AgendaContext, Config, StaticTimeSys};
use std::sync::Arc;

pub struct TestApp {
    pub ctx: AgendaContext,
    pub config: Config,
}

impl TestApp {
    pub async fn create_user(&self, first_name: &str) -> User {
        self.ctx
            .repos
            .users
            .insert(&User::new(first_name))
            .await
            .expect("Expected to create user")
    }

    pub async fn create_admin(&self, first_name: &str) -> User {
        let mut admin = User::new(first_name);
        admin.role = Role::Admin;
        self.ctx
            .repos
            .users
            .insert(&admin)
            .await
            .expect("Expected to create admin")
    }
}

// In-memory engine with a frozen clock
pub async fn spawn_app() -> TestApp {
    let mut ctx = AgendaContext::create_inmemory();
    ctx.sys = Arc::new(StaticTimeSys(super::utils::at(8, 0)));
    ctx.config.max_save_retries = 3;
    ctx.config.default_events_page_size = 10;
    ctx.config.events_page_limit = 50;

    let config = ctx.config.clone();
    TestApp { ctx, config }
}
