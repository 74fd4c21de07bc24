//! EvoLife CLI - Run simulations from a preset or JSON configuration.

#[cfg(feature = "dhat-heap")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use evolife::{
    compute::GenerationDriver,
    schema::{Experiment, FieldSeed, PRESET_NAMES, SimulationConfig},
    snapshot::Snapshot,
};

/// Parsed command line.
struct Args {
    experiment: String,
    steps: u64,
    load: Option<PathBuf>,
    save: Option<PathBuf>,
}

fn main() {
    #[cfg(feature = "dhat-heap")]
    let _profiler = dhat::Profiler::new_heap();

    env_logger::init();

    let raw: Vec<String> = std::env::args().collect();

    match raw.get(1).map(String::as_str) {
        Some("--example") => {
            print_example_config();
            return;
        }
        Some("--list") => {
            for name in PRESET_NAMES {
                println!("{}", name);
            }
            return;
        }
        Some(_) => {}
        None => {
            print_usage(&raw[0]);
            std::process::exit(1);
        }
    }

    let args = parse_args(&raw).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        eprintln!();
        print_usage(&raw[0]);
        std::process::exit(1);
    });

    let experiment = load_experiment(&args.experiment).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });
    let config = experiment.config.clone();

    println!("EvoLife Simulation");
    println!("==================");
    println!("Grid: {}x{}", config.width, config.height);
    println!(
        "death_speed: {}, birth_cost: {}, max_genes: {}",
        config.death_speed, config.birth_cost, config.max_genes
    );
    match config.random_seed {
        Some(seed) => println!("Random seed: {}", seed),
        None => println!("Random seed: entropy"),
    }
    println!("Steps: {}", args.steps);
    println!();

    // Initialize
    let driver = match &args.load {
        Some(path) => Snapshot::load(path)
            .map_err(|e| format!("Error reading snapshot {}: {}", path.display(), e))
            .and_then(|snapshot| {
                GenerationDriver::from_snapshot(config, &snapshot).map_err(|e| e.to_string())
            }),
        None => GenerationDriver::new(config, &experiment.seed).map_err(|e| e.to_string()),
    };
    let mut driver = driver.unwrap_or_else(|e| {
        eprintln!("{}", e);
        std::process::exit(1);
    });

    println!("Initial state:");
    print_stats(&driver);
    println!();

    // Run simulation
    println!("Running simulation...");
    let start = Instant::now();
    let steps = args.steps;

    for i in 0..steps {
        driver.step();

        // Print progress every 10%
        if (i + 1) % (steps / 10).max(1) == 0 {
            let stats = driver.stats();
            let elapsed = start.elapsed().as_secs_f32();
            println!(
                "  Step {}/{}: population={}, species={}, {:.1} steps/s",
                i + 1,
                steps,
                stats.population,
                stats.species,
                (i + 1) as f32 / elapsed
            );
        }
    }

    let elapsed = start.elapsed();

    println!();
    println!("Final state (tick {}):", driver.tick());
    print_stats(&driver);
    println!();
    println!(
        "Time: {:.2}s ({:.1} steps/s)",
        elapsed.as_secs_f32(),
        steps as f32 / elapsed.as_secs_f32()
    );

    if let Some(path) = &args.save {
        if let Err(e) = driver.snapshot().save(path) {
            eprintln!("Error writing snapshot {}: {}", path.display(), e);
            std::process::exit(1);
        }
        println!("Saved snapshot to {}", path.display());
    }
}

fn print_usage(program: &str) {
    eprintln!(
        "Usage: {} <preset|config.json> [steps] [--load FILE] [--save FILE]",
        program
    );
    eprintln!();
    eprintln!("Run an EvoLife simulation from a preset or JSON configuration.");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  preset       One of the built-in experiments (see --list)");
    eprintln!("  config.json  Path to simulation configuration file");
    eprintln!("  steps        Number of simulation steps (default: 100)");
    eprintln!("  --load FILE  Resume from a snapshot instead of seeding");
    eprintln!("  --save FILE  Write the final generation to a snapshot");
    eprintln!();
    eprintln!("Example configuration is generated with --example flag.");
}

fn parse_args(raw: &[String]) -> Result<Args, String> {
    let mut experiment = None;
    let mut steps = None;
    let mut load = None;
    let mut save = None;

    let mut iter = raw.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--load" => load = Some(PathBuf::from(iter.next().ok_or("--load needs a file")?)),
            "--save" => save = Some(PathBuf::from(iter.next().ok_or("--save needs a file")?)),
            _ if experiment.is_none() => experiment = Some(arg.clone()),
            _ if steps.is_none() => {
                steps = Some(
                    arg.parse()
                        .map_err(|_| format!("Invalid step count: {}", arg))?,
                )
            }
            _ => return Err(format!("Unexpected argument: {}", arg)),
        }
    }

    Ok(Args {
        experiment: experiment.ok_or("Missing preset or configuration")?,
        steps: steps.unwrap_or(100),
        load,
        save,
    })
}

/// Resolve a preset name, or read a JSON config and its optional
/// `<name>.seed.json` companion.
fn load_experiment(name: &str) -> Result<Experiment, String> {
    if let Some(experiment) = Experiment::preset(name) {
        return Ok(experiment);
    }

    let config_path = Path::new(name);
    if !config_path.exists() {
        return Err(format!(
            "{} is neither a preset ({}) nor a file",
            name,
            PRESET_NAMES.join(", ")
        ));
    }

    let config_str = fs::read_to_string(config_path)
        .map_err(|e| format!("Error reading config file: {}", e))?;
    let config: SimulationConfig =
        serde_json::from_str(&config_str).map_err(|e| format!("Error parsing config: {}", e))?;

    // Load or create seed
    let seed_path = config_path.with_extension("seed.json");
    let seed: FieldSeed = if seed_path.exists() {
        let seed_str = fs::read_to_string(&seed_path)
            .map_err(|e| format!("Error reading seed file: {}", e))?;
        serde_json::from_str(&seed_str).map_err(|e| format!("Error parsing seed: {}", e))?
    } else {
        FieldSeed::default()
    };

    Ok(Experiment { config, seed })
}

fn print_stats(driver: &GenerationDriver) {
    let stats = driver.stats();
    println!("  Population: {}", stats.population);
    println!("  Species: {}", stats.species);
    println!("  Mean energy: {:.2}", stats.mean_energy);
    for s in stats.top_species.iter().take(5) {
        println!("    {:<20} {}", s.rule, s.count);
    }
}

fn print_example_config() {
    let experiment = Experiment::default();

    let (config, seed) = match (
        serde_json::to_string_pretty(&experiment.config),
        serde_json::to_string_pretty(&experiment.seed),
    ) {
        (Ok(config), Ok(seed)) => (config, seed),
        (Err(e), _) | (_, Err(e)) => {
            eprintln!("Error serializing example: {}", e);
            std::process::exit(1);
        }
    };

    println!("Example configuration (config.json):");
    println!("{}", config);
    println!();
    println!("Example seed (config.seed.json):");
    println!("{}", seed);
}
