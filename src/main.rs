//! Signum Vanity Address Generator CLI
//!
//! Usage:
//!   signum_vanity                                # any address, sanity run
//!   signum_vanity -m S-BEER-????-????-?????      # find a themed prefix
//!   signum_vanity -m "S-????-????-????-?????" -l 24 -d fr -s mysalt

use std::process;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use signum_vanity::{Config, SearchPool, SearchResult};

/// How long the main loop blocks on the result channel per iteration.
const RESULT_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Grace period for a winner racing with Ctrl+C: workers publish their
/// result before raising the stop flag, so a short drain settles the race.
const SHUTDOWN_GRACE: Duration = Duration::from_millis(200);

fn main() {
    let config = Config::parse();
    init_tracing();

    let mask = match config.compile_mask() {
        Ok(mask) => mask,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            process::exit(1);
        }
    };

    println!("Signum Vanity Address Generator");
    println!("===============================");
    println!("Mask:       {}", mask.as_str());
    println!("Difficulty: {}", mask.difficulty_description());
    println!("Workers:    {}", config.worker_count());
    println!("Mnemonic:   {} words ({})", config.length, config.dict);
    println!();

    let pool = SearchPool::new(
        config.worker_count(),
        mask,
        config.phrase_source(),
        config.salt.clone(),
        Duration::from_secs(config.report_interval),
    );

    ctrlc_handler(pool.stop_flag_clone());

    println!("Searching... (Press Ctrl+C to stop)\n");

    let outcome = loop {
        match pool.wait_for_result(RESULT_POLL_INTERVAL) {
            Some(Ok(result)) => break Some(result),
            Some(Err(e)) => {
                eprintln!("Worker failure: {}", e);
                pool.join();
                process::exit(1);
            }
            None if pool.is_stopped() => match pool.wait_for_result(SHUTDOWN_GRACE) {
                Some(Ok(result)) => break Some(result),
                Some(Err(e)) => {
                    eprintln!("Worker failure: {}", e);
                    pool.join();
                    process::exit(1);
                }
                None => break None,
            },
            None => {}
        }
    };

    let total = pool.total_attempts();
    let elapsed = pool.elapsed();
    let rate = pool.attempts_per_second();
    pool.join();

    match outcome {
        Some(result) => {
            print_result(&result);
            println!("--- Final Statistics ---");
            println!("Total attempts: {}", format_number(total));
            println!("Time elapsed:   {:.2}s", elapsed.as_secs_f64());
            println!("Average speed:  {}/s", format_number(rate as u64));
        }
        None => {
            println!("\nStopped before a match was found.");
        }
    }
}

fn print_result(result: &SearchResult) {
    println!("\n=== Match found ===");
    println!("Passphrase: {}", result.passphrase);
    println!("Address:    {}", result.address);
    println!(
        "Worker:     {} ({} attempts in {:.2}s)",
        result.worker_id,
        format_number(result.attempts),
        result.elapsed.as_secs_f64()
    );
    println!();
}

fn format_number(n: u64) -> String {
    if n >= 1_000_000_000 {
        format!("{:.2}B", n as f64 / 1_000_000_000.0)
    } else if n >= 1_000_000 {
        format!("{:.2}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.2}K", n as f64 / 1_000.0)
    } else {
        n.to_string()
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();
}

fn ctrlc_handler(stop_flag: std::sync::Arc<std::sync::atomic::AtomicBool>) {
    ctrlc::set_handler(move || {
        stop_flag.store(true, std::sync::atomic::Ordering::Relaxed);
    })
    .expect("Error setting Ctrl-C handler");
}
