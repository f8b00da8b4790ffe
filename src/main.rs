// =============================================================================
// Scalp Signal - Main Entry Point
// =============================================================================
//
// Polls the spot rate on a fixed cadence, runs every tick through the
// indicator engine and serves the latest signal to the dashboard.  The
// service only classifies; it never places orders.
// =============================================================================

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use scalp_signal::api;
use scalp_signal::app_state::AppState;
use scalp_signal::market_data::{NewsFeed, PriceFeed};
use scalp_signal::runtime_config::RuntimeConfig;

const CONFIG_PATH: &str = "scalper_config.json";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Environment & config ──────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut config = RuntimeConfig::load(CONFIG_PATH).unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        RuntimeConfig::default()
    });
    config.apply_env_overrides();

    if let Err(e) = config.validate() {
        warn!(error = %format!("{e:#}"), "Invalid config, using defaults");
        let mut fallback = RuntimeConfig::default();
        fallback.apply_env_overrides();
        config = fallback;
    }

    info!(
        pair = %config.pair(),
        ema_fast = config.engine.ema_fast_period,
        ema_slow = config.engine.ema_slow_period,
        rsi_period = config.engine.rsi_period,
        poll_interval_ms = config.poll_interval_ms,
        "Scalp signal starting"
    );

    // ── 2. Shared state & feeds ──────────────────────────────────────────
    let price_feed = PriceFeed::new(&config)?;
    let news_feed = NewsFeed::new(config.news_api_url.clone(), config.news_max_items)?;
    let poll_interval = Duration::from_millis(config.poll_interval_ms);
    let news_interval = Duration::from_secs(config.news_interval_secs);
    let bind_addr = config.bind_addr.clone();

    let state = Arc::new(AppState::new(config));

    // ── 3. Price loop ────────────────────────────────────────────────────
    if price_feed.is_configured() {
        let poll_state = state.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(poll_interval);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                poll_price(&poll_state, &price_feed).await;
            }
        });
    } else {
        warn!("SCALPER_PRICE_API_KEY is not set; price polling disabled");
    }

    // ── 4. News loop ─────────────────────────────────────────────────────
    if news_feed.is_enabled() {
        let news_state = state.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(news_interval);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                match news_feed.fetch().await {
                    Ok(items) => news_state.set_news(items),
                    Err(e) => warn!(error = %format!("{e:#}"), "news refresh failed"),
                }
            }
        });
    }

    // ── 5. API server ────────────────────────────────────────────────────
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind API server on {bind_addr}"))?;
    info!(addr = %bind_addr, "API server listening");

    let app = api::rest::router(state.clone());
    let server = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            error!(error = %e, "API server failed");
        }
    });

    // ── 6. Graceful shutdown ─────────────────────────────────────────────
    tokio::signal::ctrl_c().await?;
    warn!("Shutdown signal received - stopping");
    server.abort();

    info!(
        state_version = state.current_state_version(),
        "Scalp signal shut down complete."
    );
    Ok(())
}

/// One poll cycle: fetch, evaluate, log.  Failures never stop the loop.
async fn poll_price(state: &AppState, feed: &PriceFeed) {
    let tick = match feed.fetch_tick().await {
        Ok(Some(tick)) => tick,
        Ok(None) => return,
        Err(e) => {
            let msg = format!("{e:#}");
            warn!(error = %msg, "price fetch failed");
            state.record_fetch_error(msg);
            return;
        }
    };

    match state.ingest(tick) {
        Ok(result) => info!(
            price = tick.price,
            signal = %result.signal,
            trend = result.trend,
            rsi = ?result.indicators.rsi,
            volatility = ?result.indicators.volatility,
            change_1m = ?result.indicators.change_1m,
            "signal evaluated"
        ),
        Err(rejection) => warn!(%rejection, price = tick.price, "tick dropped"),
    }
}
