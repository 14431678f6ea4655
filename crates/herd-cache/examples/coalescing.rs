use herd_cache::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::time::sleep;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
struct Track {
    id: u32,
    name: String,
}

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    // 1. Setup cache
    let store = MemoryStore::new(MemoryConfig::default());
    let cache = CoalescingCache::new(store);

    // 2. Shared counter to track actual queries
    let query_count = Arc::new(AtomicUsize::new(0));

    let mut handles = Vec::new();
    let key = "user-key";

    println!("Spawning 10 concurrent requests for key '{}'...", key);

    // 3. Launch concurrent requests
    for _ in 0..10 {
        let cache = cache.clone();
        let query_count = query_count.clone();

        handles.push(tokio::spawn(async move {
            let tracks: Vec<Track> = cache
                .get_or_populate(key, || async move {
                    // Simulate a slow query (100ms)
                    sleep(Duration::from_millis(100)).await;

                    let count = query_count.fetch_add(1, Ordering::SeqCst) + 1;
                    println!("Querying... (count: {})", count);

                    Ok::<_, String>(vec![
                        Track { id: 23, name: "Put The Finger On You".into() },
                        Track { id: 45, name: "Whole Lotta Rosie".into() },
                    ])
                })
                .await
                .unwrap();

            assert_eq!(tracks.len(), 2);
        }));
    }

    // 4. Wait for all to complete
    for h in handles {
        h.await?;
    }

    // 5. Verify coalescing
    let total = query_count.load(Ordering::SeqCst);
    println!("Total queries performed: {}", total);

    if total != 1 {
        panic!("Coalescing failed! Expected 1 query, got {}", total);
    } else {
        println!("SUCCESS: Request coalescing worked correctly.");
    }

    Ok(())
}
