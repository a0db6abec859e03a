//! evonet CLI - Evolve an XOR network from a JSON configuration.

#[cfg(feature = "dhat-heap")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use evonet::{compute::evolution::Trainer, schema::EvolutionConfig};

const XOR_CASES: [([f64; 2], f64); 4] = [
    ([0.0, 0.0], 0.0),
    ([0.0, 1.0], 1.0),
    ([1.0, 0.0], 1.0),
    ([1.0, 1.0], 0.0),
];

fn main() {
    #[cfg(feature = "dhat-heap")]
    let _profiler = dhat::Profiler::new_heap();

    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <config.json> [generations]", args[0]);
        eprintln!();
        eprintln!("Evolve a feedforward network against XOR from a JSON configuration.");
        eprintln!();
        eprintln!("Arguments:");
        eprintln!("  config.json  Path to evolution configuration file");
        eprintln!("  generations  Generation cap override (default: from config)");
        eprintln!();
        eprintln!("Example configuration is generated with --example flag.");
        std::process::exit(1);
    }

    if args[1] == "--example" {
        print_example_config();
        return;
    }

    let config_path = PathBuf::from(&args[1]);

    let config_str = fs::read_to_string(&config_path).unwrap_or_else(|e| {
        eprintln!("Error reading config file: {}", e);
        std::process::exit(1);
    });

    let mut config: EvolutionConfig = serde_json::from_str(&config_str).unwrap_or_else(|e| {
        eprintln!("Error parsing config: {}", e);
        std::process::exit(1);
    });

    if let Some(generations) = args.get(2).and_then(|s| s.parse().ok()) {
        config.population.max_generations = generations;
    }

    println!("evonet - evolutionary weight training");
    println!("=====================================");
    println!("{}", config);
    println!();

    let max_generations = config.population.max_generations;
    let mut trainer = Trainer::new(config, xor_fitness).unwrap_or_else(|e| {
        eprintln!("Invalid configuration: {}", e);
        std::process::exit(1);
    });

    println!("Evolving...");
    let start = Instant::now();

    let stats = trainer.run_with_callback(|progress| {
        // Print progress every 10%
        let interval = (max_generations / 10).max(1);
        if progress.generation % interval == 0 {
            println!(
                "  Generation {}/{}: best={:.4}, avg={:.4}, stagnation={}",
                progress.generation,
                max_generations,
                progress.best_fitness,
                progress.avg_fitness,
                progress.stagnation_count
            );
        }
    });

    let elapsed = start.elapsed();

    println!();
    println!("Finished: {:?} after {} generations", stats.stop_reason, stats.generations);
    println!("  Best fitness: {:.4} (of a possible 4.0)", stats.best_fitness);
    println!("  Final average fitness: {:.4}", stats.final_avg_fitness);
    println!(
        "  {} evaluations in {:.2}s",
        stats.total_evaluations,
        elapsed.as_secs_f64()
    );

    if let Some(net) = trainer.best_network() {
        println!();
        println!("Best network on XOR:");
        for (inputs, want) in &XOR_CASES {
            let out = net.update(inputs);
            println!(
                "  {:?} -> {:.4} (want {}, rounds to {})",
                inputs,
                out[0],
                want,
                out[0].round()
            );
        }
    }
}

/// Fitness: 4 minus the total squared error over the four XOR cases, so a
/// perfect network scores 4 and fitness stays non-negative.
fn xor_fitness(net: &evonet::NeuralNet) -> f64 {
    let error: f64 = XOR_CASES
        .iter()
        .map(|(inputs, want)| (net.update(inputs)[0] - want).powi(2))
        .sum();
    4.0 - error
}

fn print_example_config() {
    let mut config = EvolutionConfig::default();
    config.network.num_inputs = 2;
    config.network.num_hidden_layers = 1;
    config.network.neurons_per_hidden_layer = 4;
    config.population.size = 60;
    config.population.max_generations = 300;
    config.population.target_fitness = Some(3.9);
    config.random_seed = Some(42);

    match serde_json::to_string_pretty(&config) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error generating example config: {}", e);
            std::process::exit(1);
        }
    }
}
