mod telemetry;

use remindd_dispatch::start_dispatch_job;
use remindd_infra::setup_context;
use telemetry::{get_subscriber, init_subscriber};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = get_subscriber("remindd".into(), "info".into());
    init_subscriber(subscriber);

    let context = setup_context().await;
    let job = start_dispatch_job(context);

    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received, letting the in-flight cycle finish");
    job.stop().await;

    Ok(())
}
