//! Benchmark options parsed from the command line.

/// Options shared by the benchmark commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BenchConfig {
    /// Size of each sampled type set.
    pub types: usize,
    /// Repetitions of the measured loop.
    pub rounds: usize,
    /// Initial capacity of the cache under test.
    pub capacity: usize,
    /// Seed for the type sampler.
    pub seed: u64,
}

impl BenchConfig {
    pub const DEFAULT_TYPES: usize = 80;
    pub const DEFAULT_ROUNDS: usize = 10_000;
    pub const DEFAULT_CAPACITY: usize = 32;
    pub const DEFAULT_SEED: u64 = 123_456;
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            types: Self::DEFAULT_TYPES,
            rounds: Self::DEFAULT_ROUNDS,
            capacity: Self::DEFAULT_CAPACITY,
            seed: Self::DEFAULT_SEED,
        }
    }
}

/// Parse `--types=`, `--rounds=`, `--capacity=` and `--seed=` flags.
///
/// Unknown flags and malformed values are reported on stderr and leave the
/// default in place.
pub fn parse_bench_options(args: &[String]) -> BenchConfig {
    let mut config = BenchConfig::default();

    for arg in args {
        if let Some(value) = arg.strip_prefix("--types=") {
            parse_positive(value, "types", &mut config.types);
        } else if let Some(value) = arg.strip_prefix("--rounds=") {
            parse_positive(value, "rounds", &mut config.rounds);
        } else if let Some(value) = arg.strip_prefix("--capacity=") {
            parse_positive(value, "capacity", &mut config.capacity);
        } else if let Some(value) = arg.strip_prefix("--seed=") {
            match value.parse() {
                Ok(seed) => config.seed = seed,
                Err(_) => eprintln!("warning: invalid seed '{value}', using {}", config.seed),
            }
        } else {
            eprintln!("warning: unknown option '{arg}'");
        }
    }

    config
}

fn parse_positive(value: &str, name: &str, slot: &mut usize) {
    match value.parse::<usize>() {
        Ok(parsed) if parsed > 0 => *slot = parsed,
        _ => eprintln!("warning: invalid {name} '{value}', using {slot}"),
    }
}
