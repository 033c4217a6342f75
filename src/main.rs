//! EVONOMICS - CLI Entry Point
//!
//! Agent-based evolutionary economy simulator.

use clap::{Parser, Subcommand};
use evonomics::analysis::{DeathCensus, GenePoolCensus};
use evonomics::ensemble::run_ensemble;
use evonomics::{benchmark, Config, World};
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "evonomics")]
#[command(version)]
#[command(about = "Agent-based simulator of evolving resource economies")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a new simulation
    Run {
        /// Configuration file (YAML)
        #[arg(short, long, default_value = "config.yaml")]
        config: PathBuf,

        /// Number of periods to simulate
        #[arg(short, long, default_value = "1000")]
        periods: u64,

        /// Random seed for reproducibility
        #[arg(long)]
        seed: Option<u64>,

        /// Quiet mode (minimal output)
        #[arg(short, long)]
        quiet: bool,

        /// Write the sampled statistics history as JSON
        #[arg(long)]
        export_stats: Option<PathBuf>,
    },

    /// Run independent simulations in parallel, one per seed
    Ensemble {
        /// Configuration file (YAML)
        #[arg(short, long, default_value = "config.yaml")]
        config: PathBuf,

        /// Number of periods per run
        #[arg(short, long, default_value = "1000")]
        periods: u64,

        /// Number of runs
        #[arg(short = 'n', long, default_value = "8")]
        runs: u64,

        /// Seed of the first run; the rest follow consecutively
        #[arg(long, default_value = "1")]
        base_seed: u64,
    },

    /// Run performance benchmark
    Benchmark {
        /// Number of periods
        #[arg(short, long, default_value = "1000")]
        periods: u64,

        /// Population size
        #[arg(short = 'n', long, default_value = "1000")]
        population: usize,
    },

    /// Generate default configuration file
    Init {
        /// Output path
        #[arg(short, long, default_value = "config.yaml")]
        output: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            periods,
            seed,
            quiet,
            export_stats,
        } => run_simulation(config, periods, seed, quiet, export_stats),

        Commands::Ensemble {
            config,
            periods,
            runs,
            base_seed,
        } => run_many(config, periods, runs, base_seed),

        Commands::Benchmark { periods, population } => {
            init_logging("info");
            run_benchmark(periods, population)
        }

        Commands::Init { output } => {
            init_logging("info");
            generate_config(output)
        }
    }
}

fn init_logging(default_level: &str) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}

fn load_config(config_path: &Path) -> Result<Config, Box<dyn std::error::Error>> {
    if config_path.exists() {
        let config = Config::from_file(config_path)?;
        init_logging(&config.logging.log_level);
        log::info!("Loaded config from: {:?}", config_path);
        Ok(config)
    } else {
        let config = Config::default();
        init_logging(&config.logging.log_level);
        log::info!("Using default configuration");
        Ok(config)
    }
}

fn run_simulation(
    config_path: PathBuf,
    periods: u64,
    seed: Option<u64>,
    quiet: bool,
    export_stats: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(&config_path)?;

    let mut world = if let Some(s) = seed {
        World::new_with_seed(config.clone(), s)
    } else {
        World::new(config.clone())
    };

    println!("Starting simulation");
    println!("  Seed: {}", world.seed());
    println!("  Initial population: {}", world.population());
    println!("  Initial resources: {:.0}", world.resource_level());
    println!("  Periods: {}", periods);
    println!();

    let start = Instant::now();
    let stats_interval = config.logging.stats_interval.max(1);

    for i in 0..periods {
        world.advance_one_period();

        if !quiet && i % stats_interval == 0 {
            if let Some(stat) = world.period_stats.last() {
                println!("{}", stat.summary());
            }
        }

        if world.is_extinct() {
            println!("\nPopulation extinct at period {}", world.time);
            break;
        }
    }

    let elapsed = start.elapsed();
    let periods_per_sec = world.period_stats.len() as f64 / elapsed.as_secs_f64().max(f64::EPSILON);

    println!();
    println!("=== Simulation Complete ===");
    println!("Time: {:.2}s", elapsed.as_secs_f64());
    println!("Periods: {}", world.period_stats.len());
    println!("Speed: {:.1} periods/s", periods_per_sec);
    println!("Final population: {}", world.population());
    println!("Groups: {} ({} formed)", world.live_group_count(), world.groups.len());
    println!("Resources: {:.0}", world.resource_level());
    println!();
    println!("{}", GenePoolCensus::from_living(&world.organisms).summary());
    println!("{}", DeathCensus::from_dead(&world.dead).summary());

    if let Some(path) = export_stats {
        world.stats_history.save(&path)?;
        println!("Stats history: {:?}", path);
    }

    Ok(())
}

fn run_many(
    config_path: PathBuf,
    periods: u64,
    runs: u64,
    base_seed: u64,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(&config_path)?;
    let seeds: Vec<u64> = (0..runs).map(|i| base_seed.wrapping_add(i)).collect();

    println!("=== EVONOMICS Ensemble ===");
    println!("Runs: {}", seeds.len());
    println!("Periods: {}", periods);
    println!();

    let start = Instant::now();
    let results = run_ensemble(&config, &seeds, periods);
    let elapsed = start.elapsed();

    for result in &results {
        println!("{}", result.summary());
    }

    let survived = results.iter().filter(|r| r.final_population > 0).count();
    println!();
    println!("Survived: {}/{}", survived, results.len());
    println!("Time: {:.2}s", elapsed.as_secs_f64());

    Ok(())
}

fn run_benchmark(periods: u64, population: usize) -> Result<(), Box<dyn std::error::Error>> {
    println!("=== EVONOMICS Benchmark ===");
    println!("Periods: {}", periods);
    println!("Population: {}", population);
    println!();

    let result = benchmark(periods, population);
    println!("{}", result);

    Ok(())
}

fn generate_config(output: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::default();
    config.save(&output)?;
    println!("Configuration saved to: {:?}", output);
    Ok(())
}
