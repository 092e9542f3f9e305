//! Times generation and verification of 64 MiB of records.
//! can be run with `RUST_LOG=warn cargo run --release --example benchmark`

use std::error::Error;
use std::time::Instant;

use log::warn;

use ndjson_gen::config::GeneratorConfig;
use ndjson_gen::generator::generate;
use ndjson_gen::verify::verify_file;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let config = GeneratorConfig {
        output_path: std::env::temp_dir().join("ndjson-gen-benchmark.gz"),
        threshold_bytes: 64 * 1024 * 1024,
        seed: Some(0),
        ..GeneratorConfig::default()
    };

    let start = Instant::now();
    let summary = generate(&config)?;
    let elapsed = start.elapsed();
    warn!(
        "Generating {} records took: {:.2?}",
        summary.records, elapsed
    );

    let start_verify = Instant::now();
    verify_file(&config.output_path, &config.shape)?;
    warn!("Verifying took: {:.2?}", start_verify.elapsed());

    warn!("Total took: {:.2?}", start.elapsed());
    std::fs::remove_file(&config.output_path)?;

    Ok(())
}
