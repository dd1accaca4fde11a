//! Main benchmark CLI executable.

use std::env;
use std::path::PathBuf;

use inference_bench::benchmarks::{
    BenchmarkResult, BenchmarkRunner, ConfigLoader, DEFAULT_CONFIG_PATH,
};
use log::error;

struct Arguments {
    config: PathBuf,
    output_dir: PathBuf,
}

fn main() {
    env_logger::init();

    let Some(arguments) = parse_arguments(env::args().skip(1).collect()) else {
        print_usage();
        std::process::exit(1);
    };

    if let Err(e) = run(&arguments) {
        error!("Benchmark execution failed: {}", e);
        std::process::exit(1);
    }
}

fn run(arguments: &Arguments) -> BenchmarkResult<()> {
    let config = ConfigLoader::load_experiment_config(&arguments.config)?;
    BenchmarkRunner::run_experiment(&config, &arguments.output_dir)
}

fn parse_arguments(args: Vec<String>) -> Option<Arguments> {
    let mut arguments = Arguments {
        config: PathBuf::from(DEFAULT_CONFIG_PATH),
        output_dir: PathBuf::from("."),
    };

    let mut args = args.into_iter();
    while let Some(flag) = args.next() {
        match flag.as_str() {
            "--config" => arguments.config = PathBuf::from(args.next()?),
            "--output-dir" => arguments.output_dir = PathBuf::from(args.next()?),
            _ => return None,
        }
    }
    Some(arguments)
}

fn print_usage() {
    println!("Usage:");
    println!("  cargo run --bin benchmark --release                                  # Run configs/experiment.json");
    println!("  cargo run --bin benchmark --release -- --config <path>              # Run another experiment file");
    println!("  cargo run --bin benchmark --release -- --output-dir <dir>           # Write results under <dir>");
}
