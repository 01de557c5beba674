use anyhow::{Context, Result};
use leaderboard_api::config::AppConfig;
use leaderboard_api::state::AppState;
use leaderboard_api::{router, worker_loop};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cfg = AppConfig::from_env()?;

    let (state, eval_rx) = AppState::new(cfg.clone());

    // Evaluations run off the request path; intake only enqueues.
    tokio::spawn(worker_loop::run_worker_loop(state.clone(), eval_rx));

    let app = router(state);

    let addr = &cfg.bind_addr;
    info!(workers = cfg.eval_workers, ttl_secs = cfg.cache_ttl.as_secs(), "starting");
    println!("leaderboard-api listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    axum::serve(listener, app).await.context("server exited")?;

    Ok(())
}
