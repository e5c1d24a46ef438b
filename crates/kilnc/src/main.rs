//! Kiln benchmark driver CLI.

use std::time::Duration;

use kilnc::commands::{bench_ctor, bench_dict};
use kilnc::{init_tracing, parse_bench_options};

fn main() {
    init_tracing();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    let command = &args[1];

    match command.as_str() {
        "bench-dict" => {
            let config = parse_bench_options(&args[2..]);
            match bench_dict(&config) {
                Ok(report) => {
                    println!(
                        "bench-dict: {} types, {} rounds, initial capacity {}",
                        config.types, config.rounds, config.capacity
                    );
                    print_timing("TypeCache", report.cache, config.rounds);
                    print_timing("FxHashMap", report.map, config.rounds);
                    println!(
                        "  cache: {} entries, {} slots, {} growths (sum {})",
                        report.cache_stats.len,
                        report.cache_stats.capacity,
                        report.cache_stats.growths,
                        report.sum
                    );
                }
                Err(err) => {
                    eprintln!("error: {err}");
                    std::process::exit(1);
                }
            }
        }
        "bench-ctor" => {
            let config = parse_bench_options(&args[2..]);
            match bench_ctor(config.rounds) {
                Ok(report) => {
                    println!(
                        "bench-ctor: {} rounds, {} instances per variant",
                        config.rounds, report.constructed
                    );
                    print_timing("reflection", report.reflect, config.rounds);
                    print_timing("cached thunk", report.cached, config.rounds);
                    print_timing("shared thunk", report.shared, config.rounds);
                }
                Err(err) => {
                    eprintln!("error: {err}");
                    std::process::exit(1);
                }
            }
        }
        "help" | "--help" | "-h" => {
            print_usage();
        }
        _ => {
            eprintln!("Unknown command: {command}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    }
}

#[expect(clippy::cast_precision_loss, reason = "display only")]
fn print_timing(label: &str, elapsed: Duration, rounds: usize) {
    let per_round = elapsed.as_secs_f64() * 1e9 / rounds.max(1) as f64;
    println!("  {label:<14} {elapsed:>12.3?}  ({per_round:.1} ns/round)");
}

fn print_usage() {
    println!("Kiln benchmark driver");
    println!();
    println!("Usage: kilnc <command> [options]");
    println!();
    println!("Commands:");
    println!("  bench-dict           TypeCache lookups against FxHashMap");
    println!("  bench-ctor           Construction via resolution and cached thunks");
    println!("  help                 Show this help message");
    println!();
    println!("Options:");
    println!("  --types=<n>          Types per sampled set (default: 80)");
    println!("  --rounds=<n>         Measured rounds (default: 10000)");
    println!("  --capacity=<n>       Initial cache capacity (default: 32)");
    println!("  --seed=<n>           Type sampler seed (default: 123456)");
    println!();
    println!("Logging:");
    println!("  KILN_LOG=<filter>    tracing filter, e.g. KILN_LOG=kiln_cache=debug");
}
