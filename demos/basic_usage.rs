//! Basic usage example of the tagged cache.

use std::time::Duration;
use tagged_cache::backend::{BackendOptions, InMemoryBackend};
use tagged_cache::error::Result;
use tagged_cache::{CacheBackend, FreezableBackend, IterableBackend, TaggableBackend};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Debug)
        .try_init()
        .ok();

    println!("\n=== Tagged Cache - Basic Example ===\n");

    // 1. Initialize cache backend
    println!("1. Initializing in-memory cache backend...");
    let options = BackendOptions::new("pages").with_default_lifetime(600);
    let mut backend = InMemoryBackend::new(options)?;
    println!("   ✓ Cache backend ready\n");

    // 2. Store rendered pages with tags
    println!("2. Storing pages:");
    backend
        .set("home", b"<h1>Home</h1>".to_vec(), &["layout", "nav"], None)
        .await?;
    backend
        .set("about", b"<h1>About</h1>".to_vec(), &["layout"], None)
        .await?;
    backend
        .set("robots", b"User-agent: *".to_vec(), &[], Some(Duration::ZERO))
        .await?;
    println!("   ✓ home [layout, nav], about [layout], robots (no expiry)\n");

    // 3. Read back
    println!("3. Reading home:");
    if let Some(data) = backend.get("home").await? {
        println!("   ✓ {}\n", String::from_utf8_lossy(&data));
    }

    // 4. Look up by tag
    println!("4. Pages tagged with layout:");
    let mut pages: Vec<String> = backend
        .find_identifiers_by_tag("layout")
        .await?
        .into_iter()
        .collect();
    pages.sort();
    println!("   ✓ {:?}\n", pages);

    // 5. Invalidate by tag
    println!("5. Layout changed, flushing tag layout:");
    let flushed = backend.flush_by_tag("layout").await?;
    println!("   ✓ {} pages flushed", flushed);
    println!("   home cached: {}", backend.has("home").await?);
    println!("   robots cached: {}\n", backend.has("robots").await?);

    // 6. Iterate over the entries index
    println!("6. Walking the entries index:");
    backend.rewind();
    while backend.valid().await? {
        let key = backend.key().await?.unwrap_or_default();
        let state = if backend.current().await?.is_some() {
            "live"
        } else {
            "stale"
        };
        println!("   - {} ({})", key, state);
        backend.next();
    }
    let pruned = backend.collect_garbage().await?;
    println!("   ✓ {} stale identifiers pruned\n", pruned);

    // 7. Freeze
    println!("7. Freezing the cache:");
    backend.freeze().await?;
    let rejected = backend.set("home", b"<h1>Home</h1>".to_vec(), &[], None);
    match rejected.await {
        Err(e) if e.is_frozen() => println!("   ✓ Write rejected: {}", e),
        other => println!("   ⚠ Unexpected result: {:?}", other),
    }
    println!("   frozen: {}\n", backend.is_frozen().await?);

    // 8. Flush everything
    println!("8. Flushing the cache:");
    backend.flush().await?;
    println!("   ✓ frozen: {}", backend.is_frozen().await?);
    println!("   ✓ robots cached: {}\n", backend.has("robots").await?);

    println!("=== Example Complete ===\n");
    Ok(())
}
