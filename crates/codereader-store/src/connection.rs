//! Connection bootstrap: dual/triple-URI candidate selection with a bounded
//! server-selection timeout, and exponential-backoff reconnect.

use crate::error::{StoreError, StoreResult};
use mongodb::Client;
use mongodb::options::ClientOptions;
use std::time::Duration;

/// Server-selection timeout applied to each candidate URI probe.
pub const SELECTION_TIMEOUT: Duration = Duration::from_secs(5);
/// Connect timeout applied per candidate.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
/// Minimum pooled connections.
pub const MIN_POOL_SIZE: u32 = 2;
/// Maximum pooled connections.
pub const MAX_POOL_SIZE: u32 = 10;

const MAX_RECONNECT_ATTEMPTS: u32 = 3;
const INITIAL_BACKOFF: Duration = Duration::from_secs(1);
const MAX_BACKOFF: Duration = Duration::from_secs(60);

/// Try each candidate URI in priority order, committing to the first that answers a
/// ping within [`SELECTION_TIMEOUT`]. Does not retry a failed URI once it has been
/// passed over in favor of a later one.
pub async fn connect(uris: &[String]) -> StoreResult<Client> {
    if uris.is_empty() {
        return Err(StoreError::Connection(
            "no MongoDB URI candidates configured".to_string(),
        ));
    }

    let mut last_err = None;
    for uri in uris {
        match try_connect_with_backoff(uri).await {
            Ok(client) => return Ok(client),
            Err(err) => {
                tracing::warn!(uri = %redact(uri), error = %err, "MongoDB candidate URI failed");
                last_err = Some(err);
            }
        }
    }

    Err(last_err.unwrap_or_else(|| {
        StoreError::Connection("all MongoDB URI candidates failed".to_string())
    }))
}

async fn try_connect_with_backoff(uri: &str) -> StoreResult<Client> {
    let mut backoff = INITIAL_BACKOFF;
    let mut attempt = 0;
    loop {
        attempt += 1;
        match try_connect_once(uri).await {
            Ok(client) => return Ok(client),
            Err(err) if attempt < MAX_RECONNECT_ATTEMPTS => {
                tracing::warn!(
                    attempt,
                    backoff_secs = backoff.as_secs(),
                    error = %err,
                    "MongoDB connection attempt failed, retrying"
                );
                tokio::time::sleep(backoff).await;
                backoff = (backoff * 2).min(MAX_BACKOFF);
            }
            Err(err) => return Err(err),
        }
    }
}

async fn try_connect_once(uri: &str) -> StoreResult<Client> {
    let mut options = ClientOptions::parse(uri).await?;
    options.server_selection_timeout = Some(SELECTION_TIMEOUT);
    options.connect_timeout = Some(CONNECT_TIMEOUT);
    options.min_pool_size = Some(MIN_POOL_SIZE);
    options.max_pool_size = Some(MAX_POOL_SIZE);

    let client = Client::with_options(options)?;
    client
        .database("admin")
        .run_command(bson::doc! { "ping": 1 })
        .await?;
    Ok(client)
}

fn redact(uri: &str) -> String {
    uri.find("@").map_or_else(
        || uri.to_string(),
        |at| format!("***{}", &uri[at..]),
    )
}
