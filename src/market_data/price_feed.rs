// =============================================================================
// Price Feed - Alpha Vantage CURRENCY_EXCHANGE_RATE polling client
// =============================================================================
//
// SECURITY: The API key is sent as a query parameter and is never logged.
// The free tier is rate limited; keep the poll interval in the seconds range.
//
// Response shape:
//   { "Realtime Currency Exchange Rate": { "5. Exchange Rate": "2412.3500", ... } }
// =============================================================================

use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::{debug, instrument, warn};

use crate::runtime_config::RuntimeConfig;
use crate::types::PriceTick;

const RATE_OBJECT_KEY: &str = "Realtime Currency Exchange Rate";
const RATE_FIELD_KEY: &str = "5. Exchange Rate";

/// Extract a usable exchange rate from a response body.
///
/// `None` when the rate field is missing, unparseable, non-finite or not
/// positive.
pub fn parse_exchange_rate(body: &serde_json::Value) -> Option<f64> {
    let raw = &body[RATE_OBJECT_KEY][RATE_FIELD_KEY];
    let rate = match raw {
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok()?,
        other => other.as_f64()?,
    };
    (rate.is_finite() && rate > 0.0).then_some(rate)
}

/// Polls the latest spot rate for one currency pair.
#[derive(Clone)]
pub struct PriceFeed {
    client: reqwest::Client,
    url: String,
    api_key: String,
    from_currency: String,
    to_currency: String,
}

impl PriceFeed {
    pub fn new(config: &RuntimeConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .context("failed to build price feed HTTP client")?;

        debug!(pair = %config.pair(), url = %config.price_api_url, "PriceFeed initialised");

        Ok(Self {
            client,
            url: config.price_api_url.clone(),
            api_key: config.price_api_key.clone(),
            from_currency: config.from_currency.clone(),
            to_currency: config.to_currency.clone(),
        })
    }

    /// Whether an API key is present.  Without one every request would be
    /// refused, so the poller is not started.
    pub fn is_configured(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    /// Fetch the current rate and stamp it with the local fetch time.
    ///
    /// Transport and JSON failures are errors; a well-formed response that
    /// does not carry a usable rate (rate-limit notices, bad values) yields
    /// `Ok(None)`.
    #[instrument(skip(self), name = "price_feed::fetch_tick")]
    pub async fn fetch_tick(&self) -> Result<Option<PriceTick>> {
        let resp = self
            .client
            .get(&self.url)
            .query(&[
                ("function", "CURRENCY_EXCHANGE_RATE"),
                ("from_currency", self.from_currency.as_str()),
                ("to_currency", self.to_currency.as_str()),
                ("apikey", self.api_key.as_str()),
            ])
            .send()
            .await
            .context("exchange rate request failed")?;

        let status = resp.status();
        if !status.is_success() {
            anyhow::bail!("exchange rate endpoint returned {status}");
        }

        let body: serde_json::Value = resp
            .json()
            .await
            .context("failed to parse exchange rate response")?;

        if body.get(RATE_OBJECT_KEY).is_none() {
            warn!(response = %body, "unexpected price API response");
            return Ok(None);
        }

        Ok(parse_exchange_rate(&body).map(|price| PriceTick::new(Utc::now(), price)))
    }
}
