use anyhow::{ensure, Result};
use log::info;
use std::sync::Arc;
use std::thread;
use std::time::Instant;
use unique_id_registry::{IdRegistry, RegisterResult};

// cargo run --release --example concurrent-registration [THREADS] [MAX_ID]
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();
    let threads: usize = args.get(1).map(|s| s.parse()).transpose()?.unwrap_or(64);
    let max_id: i32 = args.get(2).map(|s| s.parse()).transpose()?.unwrap_or(15);

    let registry = Arc::new(IdRegistry::new());

    let start = Instant::now();
    let handles: Vec<_> = (0..threads)
        .map(|_| {
            let registry = registry.clone();
            thread::spawn(move || registry.register_id(0, max_id))
        })
        .collect();

    let mut results: Vec<RegisterResult> = Vec::with_capacity(threads);
    for handle in handles {
        results.push(handle.join().map_err(|_| anyhow::anyhow!("caller thread panicked"))?);
    }
    let duration = start.elapsed();

    let won = results.iter().filter(|r| r.is_ok()).count();
    let lost = results.len() - won;
    info!("{} threads, range [0, {}]: {} ids handed out, {} refused in {:?}", threads, max_id, won, lost, duration);

    let expected = expected_winners(threads, max_id);
    ensure!(won == expected, "expected {} winners, got {}", expected, won);
    ensure!(registry.len() == expected, "registry holds {} ids", registry.len());
    Ok(())
}

/// How many of `threads` callers of `register_id(0, max_id)` should get an id.
///
/// A negative `max_id` is a backwards range, so every caller is refused.
fn expected_winners(threads: usize, max_id: i32) -> usize {
    usize::try_from(max_id).map_or(0, |m| (m + 1).min(threads))
}

#[test]
fn backwards_range_expects_no_winners() {
    assert_eq!(expected_winners(4, -1), 0);
    assert_eq!(expected_winners(4, -5), 0);
    assert_eq!(expected_winners(4, i32::MIN), 0);

    let registry = IdRegistry::new();
    let won = (0..4).filter(|_| registry.register_id(0, -5).is_ok()).count();
    assert_eq!(won, expected_winners(4, -5));
    assert!(registry.is_empty());
}

#[test]
fn winners_are_capped_by_range_and_callers() {
    assert_eq!(expected_winners(4, 0), 1);
    assert_eq!(expected_winners(64, 15), 16);
    assert_eq!(expected_winners(4, 15), 4);
    assert_eq!(expected_winners(4, i32::MAX), 4);
}
