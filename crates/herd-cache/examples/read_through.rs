use async_trait::async_trait;
use herd_cache::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
struct Album {
    id: u32,
    title: String,
    artist: String,
}

struct AlbumQuery {
    // Simulated database round trips
    executed: Arc<AtomicUsize>,
}

#[async_trait]
impl Loader<Vec<Album>> for AlbumQuery {
    async fn load(&self) -> std::result::Result<Vec<Album>, BoxError> {
        self.executed.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(200)).await;

        Ok(vec![
            Album { id: 1, title: "For Those About To Rock".into(), artist: "AC/DC".into() },
            Album { id: 4, title: "Let There Be Rock".into(), artist: "AC/DC".into() },
        ])
    }
}

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let executed = Arc::new(AtomicUsize::new(0));
    let cache = CoalescingCache::new(MemoryStore::new(MemoryConfig::default()));

    // Keep albums for 30 seconds instead of the 10 second default
    let albums: ReadThrough<_, _, _, Vec<Album>, _> = ReadThrough::new(
        cache,
        "albums",
        AlbumQuery { executed: executed.clone() },
    )
    .with_options(CacheOpts::new().ttl_secs(30));

    println!("--- First wave: 5 concurrent readers ---");
    let handles: Vec<_> = (0..5)
        .map(|_| {
            let albums = albums.clone();
            tokio::spawn(async move { albums.get().await })
        })
        .collect();
    for h in handles {
        println!("Got {} albums", h.await??.len());
    }

    println!("--- Second read: served from cache ---");
    let cached = albums.get().await?;
    println!("Got {} albums", cached.len());

    println!("Queries executed: {}", executed.load(Ordering::SeqCst));
    assert_eq!(executed.load(Ordering::SeqCst), 1);

    Ok(())
}
