//! Serves a slow track-list query through a Redis-backed coalescing cache
//!
//! Environment:
//! - `HERD_REDIS_URL` (default `redis://127.0.0.1:6379`)
//! - `HERD_BIND_ADDR` (default `0.0.0.0:3000`)
//! - `HERD_CACHE_KEY` (default `user-key`)

use async_trait::async_trait;
use herd_cache::prelude::*;
use herd_cache_axum::router;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

const QUERY_DELAY: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Track {
    track_id: u32,
    name: String,
    composer: Option<String>,
}

struct TrackCatalog;

#[async_trait]
impl Loader<Vec<Track>> for TrackCatalog {
    async fn load(&self) -> std::result::Result<Vec<Track>, BoxError> {
        tracing::info!(target: "herd_cache", "running track query");
        tokio::time::sleep(QUERY_DELAY).await;

        Ok(vec![
            Track {
                track_id: 23,
                name: "Walk On Water".into(),
                composer: Some("Steven Tyler, Joe Perry".into()),
            },
            Track {
                track_id: 45,
                name: "Believe Me".into(),
                composer: None,
            },
            Track {
                track_id: 77,
                name: "Enter Sandman".into(),
                composer: Some("James Hetfield, Lars Ulrich".into()),
            },
        ])
    }
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let redis_url = env_or("HERD_REDIS_URL", "redis://127.0.0.1:6379");
    let bind_addr = env_or("HERD_BIND_ADDR", "0.0.0.0:3000");
    let cache_key = env_or("HERD_CACHE_KEY", "user-key");

    let store = RedisStore::new(RedisConfig::new(redis_url.as_str())).await?;
    let cache = CoalescingCache::new(store);
    let tracks: ReadThrough<_, _, _, Vec<Track>, _> =
        ReadThrough::new(cache, cache_key, TrackCatalog);

    let listener = TcpListener::bind(&bind_addr).await?;
    tracing::info!(target: "herd_cache", %bind_addr, %redis_url, "listening");

    axum::serve(listener, router(tracks)).await?;
    Ok(())
}
