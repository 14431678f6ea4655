use herd_cache::prelude::*;

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let redis_url =
        std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string());

    println!("Connecting to Redis at {}", redis_url);

    let config = RedisConfig::new(redis_url).pool_size(5).prefix("example");

    match RedisStore::new(config).await {
        Ok(store) => {
            let cache = CoalescingCache::new(store);

            // Explicit write with a short TTL; the store's reply is checked
            cache
                .set_with("hello", "world".to_string(), CacheOpts::new().ttl_secs(5))
                .await?;

            let value: Option<String> = cache.get("hello").await?;
            println!("Found: {:?}", value);

            // Coalesced read-through on a fresh key
            let numbers: Vec<u32> = cache
                .get_or_populate("numbers", || async { Ok::<_, String>(vec![23, 45, 77]) })
                .await?;
            println!("Populated: {:?}", numbers);
        }
        Err(e) => {
            println!("Could not connect to Redis: {}", e);
            println!("Skipping example.");
        }
    }

    Ok(())
}
