use anyhow::Context;
use bistro_client::{HttpClient, LiveClient};
use bistro_pos::{PosService, TillConfig, TracingNotifier, init_logger_with_file, live, print_banner};
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Configuration (.env + environment)
    let config = TillConfig::from_env().context("invalid configuration")?;

    // 2. Logging
    init_logger_with_file(Some(config.log_level.as_str()), config.log_dir.as_deref());
    print_banner();
    tracing::info!(api = %config.client.base_url, "Bistro till starting...");

    // 3. Load open orders
    let http = HttpClient::new(&config.client).context("cannot build HTTP client")?;
    let service = PosService::new(http, TracingNotifier);
    let count = service.refresh_board().await?;
    tracing::info!(count, "Open orders loaded");

    // 4. Follow the live channel until Ctrl-C
    let live_client = LiveClient::connect(config.live())
        .await
        .context("cannot connect to the live order channel")?;
    let shutdown = CancellationToken::new();
    let follower = tokio::spawn(live::follow(
        service.board(),
        live_client.subscribe(),
        shutdown.clone(),
    ));

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutting down");
    shutdown.cancel();
    live_client.shutdown().await;

    if let Some(applied) = live::join_follower(follower).await {
        tracing::info!(applied, "Live updates applied");
    }
    Ok(())
}
