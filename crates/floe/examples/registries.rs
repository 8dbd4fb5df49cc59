//! Wires the two registry modes together with a `tracing` subscriber, so
//! degraded-mode reports (if any) land on stderr.
//!
//! ```bash
//! cargo run --example registries
//! ```

use floe::{LocalRegistry, MonotonicClock, SharedRegistry, TracingSink};
use std::sync::Arc;
use std::thread::scope;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    // Process-wide generation: one slot per id kind, shared across threads.
    let registry = Arc::new(SharedRegistry::new(2, MonotonicClock::new(), TracingSink));

    scope(|s| {
        for worker in 0..4 {
            let registry = Arc::clone(&registry);
            s.spawn(move || {
                for _ in 0..3 {
                    let id = registry.next_id(1 + worker % 2).unwrap();
                    println!("worker {worker}: {id}");
                }
            });
        }
    });

    // Exclusively-owned generation: no locks, open-ended key space.
    let mut local = LocalRegistry::new(MonotonicClock::new(), TracingSink);
    for key in [10, 10, 11] {
        let id = local.next_id(key);
        println!("local key {key}: {id:?}");
    }
}
