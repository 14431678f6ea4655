use herd_cache::TracingMetrics;
use herd_cache::prelude::*;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing subscriber
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::TRACE) // Enable TRACE to see latency logs
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("setting default subscriber failed");

    // 2. Create a cache that reports through tracing
    let store = MemoryStore::new(MemoryConfig::default());
    let metrics = TracingMetrics::new().with_service_name("example-service");

    let cache = CoalescingCache::with_serializer_and_metrics(
        store,
        JsonSerializer,
        metrics,
        CacheConfig::default(),
    );

    // 3. Miss, populate, then hit
    let first: String = cache
        .get_or_populate("greeting", || async { Ok::<_, String>("hello".to_string()) })
        .await?;
    println!("Got: {}", first);

    let second: Option<String> = cache.get("greeting").await?;
    println!("Got: {:?}", second);

    // 4. A failing producer shows up as a warning
    let failed = cache
        .get_or_populate::<String, _, _, _>("broken", || async {
            Err::<String, _>("upstream timed out")
        })
        .await;
    println!("Got: {:?}", failed);

    Ok(())
}
