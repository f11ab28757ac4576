mod seed;
mod telemetry;

use agenda_infra::setup_context;
use telemetry::{get_subscriber, init_subscriber};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = get_subscriber("agenda".into(), "info".into());
    init_subscriber(subscriber)?;

    // Runs the migrations when backed by postgres
    let context = setup_context().await?;

    seed::run(&context).await?;
    info!("Agenda is set up");

    Ok(())
}
